//! Read-only query service interface and the entity state it returns.
//!
//! The toolkit only ever consumes this trait; the mirror crate provides the
//! HTTP implementation and tests substitute in-memory fakes. Lookups are
//! keyed by network identity, never cached here, and never retried.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entity::{AccountId, ContractId, EvmAddress, TokenId, TopicId};
use crate::errors::KitError;
use crate::key::{KeyCategory, PublicKey};
use crate::ledger::TokenType;

/// Subset of an entity's current on-chain keys, fetched once per
/// authorization check.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityKeySnapshot {
    pub admin_key: Option<PublicKey>,
    pub kyc_key: Option<PublicKey>,
    pub freeze_key: Option<PublicKey>,
    pub wipe_key: Option<PublicKey>,
    pub supply_key: Option<PublicKey>,
    pub pause_key: Option<PublicKey>,
    pub fee_schedule_key: Option<PublicKey>,
    pub metadata_key: Option<PublicKey>,
    pub submit_key: Option<PublicKey>,
}

impl EntityKeySnapshot {
    pub fn key(&self, category: KeyCategory) -> Option<&PublicKey> {
        match category {
            KeyCategory::Admin => self.admin_key.as_ref(),
            KeyCategory::Kyc => self.kyc_key.as_ref(),
            KeyCategory::Freeze => self.freeze_key.as_ref(),
            KeyCategory::Wipe => self.wipe_key.as_ref(),
            KeyCategory::Supply => self.supply_key.as_ref(),
            KeyCategory::Pause => self.pause_key.as_ref(),
            KeyCategory::FeeSchedule => self.fee_schedule_key.as_ref(),
            KeyCategory::Metadata => self.metadata_key.as_ref(),
            KeyCategory::Submit => self.submit_key.as_ref(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub account_id: AccountId,
    pub evm_address: Option<EvmAddress>,
    pub key: Option<PublicKey>,
    pub balance_tinybars: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub token_id: TokenId,
    pub name: String,
    pub symbol: String,
    pub token_type: TokenType,
    pub decimals: u32,
    pub total_supply: i64,
    pub treasury_account_id: Option<AccountId>,
    pub memo: Option<String>,
    pub keys: EntityKeySnapshot,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicInfo {
    pub topic_id: TopicId,
    pub memo: Option<String>,
    pub keys: EntityKeySnapshot,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub contract_id: ContractId,
    pub evm_address: EvmAddress,
    pub memo: Option<String>,
}

/// Current base-currency exchange rate as reported by the network.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub cent_equivalent: i64,
    pub hbar_equivalent: i64,
    pub expiration_time: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub result: String,
    pub consensus_timestamp: Option<String>,
    pub charged_fee_tinybars: i64,
    pub memo: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAirdrop {
    pub sender_id: AccountId,
    pub receiver_id: AccountId,
    pub token_id: TokenId,
    pub amount: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub token_id: TokenId,
    pub balance: i64,
    pub decimals: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicMessage {
    pub sequence_number: u64,
    pub consensus_timestamp: String,
    /// Message payload, decoded to UTF-8 where possible.
    pub message: String,
}

/// Read-only lookups of on-chain entity state.
///
/// Missing entities surface as [`KitError::NotFound`], transport failures as
/// [`KitError::Network`]. Implementations own the network-name to base-URL
/// mapping; this interface is network-agnostic.
#[async_trait]
pub trait QueryService: Send + Sync {
    async fn get_account(&self, account_id: &AccountId) -> Result<AccountInfo, KitError>;

    async fn get_token_info(&self, token_id: &TokenId) -> Result<TokenInfo, KitError>;

    async fn get_topic_info(&self, topic_id: &TopicId) -> Result<TopicInfo, KitError>;

    /// `contract` accepts either a native id (`0.0.x`) or an EVM address.
    async fn get_contract_info(&self, contract: &str) -> Result<ContractInfo, KitError>;

    async fn get_transaction_record(
        &self,
        transaction_id: &str,
    ) -> Result<TransactionRecord, KitError>;

    async fn get_exchange_rate(&self) -> Result<ExchangeRate, KitError>;

    async fn get_pending_airdrops(
        &self,
        receiver_id: &AccountId,
    ) -> Result<Vec<PendingAirdrop>, KitError>;

    async fn get_account_token_balances(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<TokenBalance>, KitError>;

    async fn get_topic_messages(
        &self,
        topic_id: &TopicId,
        limit: Option<u32>,
    ) -> Result<Vec<TopicMessage>, KitError>;
}

#[cfg(test)]
mod tests {
    use super::EntityKeySnapshot;
    use crate::key::KeyCategory;

    #[test]
    fn snapshot_lookup_by_category() {
        let key = "e02a6f31f3e9e7e3ab1c5f9df1c8e9b2a4d6c8e0f2a4b6c8d0e2f4a6b8c0d2e4"
            .parse()
            .unwrap();
        let snapshot = EntityKeySnapshot { submit_key: Some(key), ..Default::default() };

        assert!(snapshot.key(KeyCategory::Submit).is_some());
        assert!(snapshot.key(KeyCategory::Admin).is_none());
        assert!(snapshot.key(KeyCategory::Kyc).is_none());
    }
}
