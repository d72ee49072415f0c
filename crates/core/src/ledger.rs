//! Transaction data model and the network client interface.
//!
//! The toolkit builds [`TransactionBody`] values and hands them to a
//! [`LedgerClient`] for freezing and (in autonomous mode) execution. The
//! client owns signing and node communication; everything here is the data
//! contract between the two sides.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::{AccountId, ContractId, TokenId, TopicId};
use crate::errors::KitError;
use crate::key::{KeyCategory, PublicKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Fungible,
    NonFungible,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fungible => f.write_str("fungible"),
            Self::NonFungible => f.write_str("non_fungible"),
        }
    }
}

/// Ledger-native transaction identity: `payer@seconds.nanos`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TransactionId {
    pub payer: AccountId,
    pub valid_start_seconds: i64,
    pub valid_start_nanos: u32,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid transaction id `{input}`: expected `payer@seconds.nanos`")]
pub struct TransactionIdError {
    pub input: String,
}

impl TransactionId {
    /// New id with a jittered valid-start slightly in the past, so two ids
    /// generated in the same instant do not collide.
    pub fn generate(payer: AccountId) -> Self {
        let now = Utc::now();
        let backdate_nanos: u32 = rand::thread_rng().gen_range(0..4_000_000_000u32);
        let seconds = now.timestamp() - i64::from(backdate_nanos / 1_000_000_000);
        let nanos = now
            .timestamp_subsec_nanos()
            .wrapping_sub(backdate_nanos % 1_000_000_000)
            % 1_000_000_000;

        Self { payer, valid_start_seconds: seconds, valid_start_nanos: nanos }
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}.{:09}", self.payer, self.valid_start_seconds, self.valid_start_nanos)
    }
}

impl FromStr for TransactionId {
    type Err = TransactionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || TransactionIdError { input: s.to_string() };

        let (payer, stamp) = s.split_once('@').ok_or_else(err)?;
        let payer: AccountId = payer.parse().map_err(|_| err())?;
        let (seconds, nanos) = stamp.split_once('.').ok_or_else(err)?;
        let valid_start_seconds = seconds.parse().map_err(|_| err())?;
        let valid_start_nanos = nanos.parse().map_err(|_| err())?;

        Ok(Self { payer, valid_start_seconds, valid_start_nanos })
    }
}

impl TryFrom<String> for TransactionId {
    type Error = TransactionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TransactionId> for String {
    fn from(value: TransactionId) -> Self {
        value.to_string()
    }
}

/// One signed-amount leg of a base-currency transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TinybarTransfer {
    pub account_id: AccountId,
    pub amount: i64,
}

/// One recipient leg of a token transfer, in smallest units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransfer {
    pub account_id: AccountId,
    pub amount: i64,
}

/// Key slots on a token, grouped because create and update carry the same
/// set and authorization walks them uniformly.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenKeys {
    pub admin_key: Option<PublicKey>,
    pub kyc_key: Option<PublicKey>,
    pub freeze_key: Option<PublicKey>,
    pub wipe_key: Option<PublicKey>,
    pub supply_key: Option<PublicKey>,
    pub pause_key: Option<PublicKey>,
    pub fee_schedule_key: Option<PublicKey>,
    pub metadata_key: Option<PublicKey>,
}

impl TokenKeys {
    /// Category/value pairs in a fixed order, for authorization walks.
    pub fn entries(&self) -> [(KeyCategory, Option<&PublicKey>); 8] {
        [
            (KeyCategory::Admin, self.admin_key.as_ref()),
            (KeyCategory::Kyc, self.kyc_key.as_ref()),
            (KeyCategory::Freeze, self.freeze_key.as_ref()),
            (KeyCategory::Wipe, self.wipe_key.as_ref()),
            (KeyCategory::Supply, self.supply_key.as_ref()),
            (KeyCategory::Pause, self.pause_key.as_ref()),
            (KeyCategory::FeeSchedule, self.fee_schedule_key.as_ref()),
            (KeyCategory::Metadata, self.metadata_key.as_ref()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.entries().iter().all(|(_, key)| key.is_none())
    }
}

/// A fully specified transaction, ready to freeze.
///
/// One variant per supported operation; the builder maps normalized
/// parameters onto these and nothing else touches them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransactionBody {
    TransferHbar {
        transfers: Vec<TinybarTransfer>,
        memo: Option<String>,
    },
    TokenCreate {
        name: String,
        symbol: String,
        token_type: TokenType,
        decimals: u32,
        initial_supply: i64,
        treasury_account_id: AccountId,
        keys: TokenKeys,
        memo: Option<String>,
    },
    TokenUpdate {
        token_id: TokenId,
        name: Option<String>,
        symbol: Option<String>,
        memo: Option<String>,
        treasury_account_id: Option<AccountId>,
        keys: TokenKeys,
    },
    TokenMint {
        token_id: TokenId,
        amount: i64,
        metadata: Vec<Vec<u8>>,
    },
    TokenAssociate {
        account_id: AccountId,
        token_ids: Vec<TokenId>,
    },
    TokenDissociate {
        account_id: AccountId,
        token_ids: Vec<TokenId>,
    },
    TokenAirdrop {
        token_id: TokenId,
        sender_id: AccountId,
        transfers: Vec<TokenTransfer>,
    },
    TopicCreate {
        memo: Option<String>,
        admin_key: Option<PublicKey>,
        submit_key: Option<PublicKey>,
    },
    TopicUpdate {
        topic_id: TopicId,
        memo: Option<String>,
        admin_key: Option<PublicKey>,
        submit_key: Option<PublicKey>,
    },
    TopicDelete {
        topic_id: TopicId,
    },
    TopicMessageSubmit {
        topic_id: TopicId,
        message: Vec<u8>,
    },
    ContractExecute {
        contract_id: ContractId,
        gas: u64,
        payable_tinybars: i64,
        call_data: Vec<u8>,
    },
}

/// A transaction with its assigned id, the unit a client freezes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub body: TransactionBody,
}

/// A frozen transaction: immutable, serializable, not yet signed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrozenTransaction {
    pub transaction: Transaction,
}

impl FrozenTransaction {
    /// Serialized unsigned form handed to external signers.
    pub fn to_bytes(&self) -> Result<Vec<u8>, KitError> {
        serde_json::to_vec(&self.transaction)
            .map_err(|e| KitError::validation(format!("transaction serialization failed: {e}")))
    }
}

/// Receipt returned by the network after a submitted transaction settles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub status: String,
    pub transaction_id: TransactionId,
    pub account_id: Option<AccountId>,
    pub token_id: Option<TokenId>,
    pub topic_id: Option<TopicId>,
    pub contract_id: Option<ContractId>,
    pub topic_sequence_number: Option<u64>,
}

/// Network client interface: operator identity plus the transaction
/// lifecycle primitives. Signing happens inside `execute`, behind this trait;
/// the toolkit never sees key material for it.
#[async_trait::async_trait]
pub trait LedgerClient: Send + Sync {
    fn operator_account_id(&self) -> Option<AccountId>;

    fn operator_public_key(&self) -> Option<PublicKey>;

    async fn freeze(&self, transaction: Transaction) -> Result<FrozenTransaction, KitError>;

    async fn execute(&self, frozen: &FrozenTransaction) -> Result<TransactionReceipt, KitError>;
}
