//! Wire shapes of the mirror-node REST API and their mapping onto the core
//! query types.
//!
//! The REST API is loose with numbers (supplies and decimals arrive as
//! strings) and with keys (a key slot can be null, a simple key, or an
//! opaque protobuf-encoded structure). Conversion is where that looseness
//! gets resolved; anything we cannot interpret becomes `None` rather than a
//! hard failure, with a trace for the operator.

use base64::Engine;
use serde::Deserialize;
use tracing::warn;

use hederakit_core::{
    AccountInfo, ContractInfo, EntityKeySnapshot, ExchangeRate, KitError, PendingAirdrop,
    PublicKey, TokenBalance, TokenInfo, TokenType, TopicInfo, TopicMessage, TransactionRecord,
};

#[derive(Debug, Deserialize)]
pub(crate) struct RawKey {
    #[serde(rename = "_type")]
    pub key_type: Option<String>,
    pub key: Option<String>,
}

impl RawKey {
    /// Simple keys parse; key lists and other protobuf-encoded structures
    /// are treated as absent for comparison purposes.
    pub fn into_public_key(self) -> Option<PublicKey> {
        let material = self.key?;
        match material.parse::<PublicKey>() {
            Ok(key) => Some(key),
            Err(_) => {
                warn!(
                    key_type = self.key_type.as_deref().unwrap_or("unknown"),
                    "unparseable key material in mirror response, treating as absent"
                );
                None
            }
        }
    }
}

fn key_of(raw: Option<RawKey>) -> Option<PublicKey> {
    raw.and_then(RawKey::into_public_key)
}

fn parse_num<T: std::str::FromStr>(value: &str, what: &str) -> Result<T, KitError> {
    value
        .parse()
        .map_err(|_| KitError::network(format!("unexpected mirror response: bad {what} `{value}`")))
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawBalance {
    pub balance: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAccount {
    pub account: String,
    pub evm_address: Option<String>,
    pub key: Option<RawKey>,
    pub balance: Option<RawBalance>,
}

impl RawAccount {
    pub fn into_info(self) -> Result<AccountInfo, KitError> {
        Ok(AccountInfo {
            account_id: self.account.parse()?,
            evm_address: self.evm_address.and_then(|addr| addr.parse().ok()),
            key: key_of(self.key),
            balance_tinybars: self.balance.map(|b| b.balance).unwrap_or(0),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawToken {
    pub token_id: String,
    pub name: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub decimals: String,
    pub total_supply: String,
    pub treasury_account_id: Option<String>,
    pub memo: Option<String>,
    pub admin_key: Option<RawKey>,
    pub kyc_key: Option<RawKey>,
    pub freeze_key: Option<RawKey>,
    pub wipe_key: Option<RawKey>,
    pub supply_key: Option<RawKey>,
    pub pause_key: Option<RawKey>,
    pub fee_schedule_key: Option<RawKey>,
    pub metadata_key: Option<RawKey>,
}

impl RawToken {
    pub fn into_info(self) -> Result<TokenInfo, KitError> {
        let token_type = match self.token_type.as_str() {
            "NON_FUNGIBLE_UNIQUE" => TokenType::NonFungible,
            _ => TokenType::Fungible,
        };

        Ok(TokenInfo {
            token_id: self.token_id.parse()?,
            name: self.name,
            symbol: self.symbol,
            token_type,
            decimals: parse_num(&self.decimals, "token decimals")?,
            total_supply: parse_num(&self.total_supply, "token supply")?,
            treasury_account_id: self.treasury_account_id.and_then(|id| id.parse().ok()),
            memo: self.memo.filter(|m| !m.is_empty()),
            keys: EntityKeySnapshot {
                admin_key: key_of(self.admin_key),
                kyc_key: key_of(self.kyc_key),
                freeze_key: key_of(self.freeze_key),
                wipe_key: key_of(self.wipe_key),
                supply_key: key_of(self.supply_key),
                pause_key: key_of(self.pause_key),
                fee_schedule_key: key_of(self.fee_schedule_key),
                metadata_key: key_of(self.metadata_key),
                submit_key: None,
            },
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTopic {
    pub topic_id: String,
    pub memo: Option<String>,
    pub admin_key: Option<RawKey>,
    pub submit_key: Option<RawKey>,
}

impl RawTopic {
    pub fn into_info(self) -> Result<TopicInfo, KitError> {
        Ok(TopicInfo {
            topic_id: self.topic_id.parse()?,
            memo: self.memo.filter(|m| !m.is_empty()),
            keys: EntityKeySnapshot {
                admin_key: key_of(self.admin_key),
                submit_key: key_of(self.submit_key),
                ..Default::default()
            },
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawContract {
    pub contract_id: String,
    pub evm_address: String,
    pub memo: Option<String>,
}

impl RawContract {
    pub fn into_info(self) -> Result<ContractInfo, KitError> {
        Ok(ContractInfo {
            contract_id: self.contract_id.parse()?,
            evm_address: self.evm_address.parse().map_err(|_| {
                KitError::network(format!(
                    "unexpected mirror response: bad evm address `{}`",
                    self.evm_address
                ))
            })?,
            memo: self.memo.filter(|m| !m.is_empty()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawExchangeRateEnvelope {
    pub current_rate: RawExchangeRate,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawExchangeRate {
    pub cent_equivalent: i64,
    pub hbar_equivalent: i64,
    pub expiration_time: Option<i64>,
}

impl RawExchangeRateEnvelope {
    pub fn into_rate(self) -> ExchangeRate {
        ExchangeRate {
            cent_equivalent: self.current_rate.cent_equivalent,
            hbar_equivalent: self.current_rate.hbar_equivalent,
            expiration_time: self.current_rate.expiration_time.map(|t| t.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTransactionPage {
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTransaction {
    pub transaction_id: String,
    pub result: String,
    pub consensus_timestamp: Option<String>,
    #[serde(default)]
    pub charged_tx_fee: i64,
    pub memo_base64: Option<String>,
}

impl RawTransaction {
    pub fn into_record(self) -> TransactionRecord {
        let memo = self.memo_base64.and_then(|encoded| {
            let bytes = base64::engine::general_purpose::STANDARD.decode(encoded).ok()?;
            let text = String::from_utf8(bytes).ok()?;
            (!text.is_empty()).then_some(text)
        });

        TransactionRecord {
            transaction_id: self.transaction_id,
            result: self.result,
            consensus_timestamp: self.consensus_timestamp,
            charged_fee_tinybars: self.charged_tx_fee,
            memo,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAirdropPage {
    #[serde(default)]
    pub airdrops: Vec<RawAirdrop>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAirdrop {
    pub sender_id: String,
    pub receiver_id: String,
    pub token_id: String,
    pub amount: i64,
}

impl RawAirdrop {
    pub fn into_pending(self) -> Result<PendingAirdrop, KitError> {
        Ok(PendingAirdrop {
            sender_id: self.sender_id.parse()?,
            receiver_id: self.receiver_id.parse()?,
            token_id: self.token_id.parse()?,
            amount: self.amount,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTokenBalancePage {
    #[serde(default)]
    pub tokens: Vec<RawTokenBalance>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTokenBalance {
    pub token_id: String,
    pub balance: i64,
    #[serde(default)]
    pub decimals: u32,
}

impl RawTokenBalance {
    pub fn into_balance(self) -> Result<TokenBalance, KitError> {
        Ok(TokenBalance {
            token_id: self.token_id.parse()?,
            balance: self.balance,
            decimals: self.decimals,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTopicMessagePage {
    #[serde(default)]
    pub messages: Vec<RawTopicMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTopicMessage {
    pub sequence_number: u64,
    pub consensus_timestamp: String,
    pub message: String,
}

impl RawTopicMessage {
    pub fn into_message(self) -> TopicMessage {
        // Payloads arrive base64-encoded; fall back to the raw string for
        // anything that is not valid UTF-8 after decoding.
        let message = base64::engine::general_purpose::STANDARD
            .decode(&self.message)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .unwrap_or(self.message);

        TopicMessage {
            sequence_number: self.sequence_number,
            consensus_timestamp: self.consensus_timestamp,
            message,
        }
    }
}
