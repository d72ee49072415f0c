pub mod amount;
pub mod config;
pub mod context;
pub mod entity;
pub mod errors;
pub mod key;
pub mod ledger;
pub mod query;
pub mod result;

pub use amount::{from_smallest_units, hbar_to_tinybars, to_smallest_units, AmountError, HBAR_DECIMALS};
pub use config::{ConfigError, KitConfig, LedgerNetwork, LoadOptions, MirrorConfig, OperatorConfig};
pub use context::{ExecutionContext, ExecutionMode};
pub use entity::{AccountId, ContractId, EntityIdError, EvmAddress, EvmAddressError, TokenId, TopicId};
pub use errors::{FieldViolation, KitError, ValidationReport};
pub use key::{KeyCategory, KeyError, KeyInput, KeyKind, KeySpec, PublicKey};
pub use ledger::{
    FrozenTransaction, LedgerClient, TinybarTransfer, TokenKeys, TokenTransfer, TokenType,
    Transaction, TransactionBody, TransactionId, TransactionReceipt,
};
pub use query::{
    AccountInfo, ContractInfo, EntityKeySnapshot, ExchangeRate, PendingAirdrop, QueryService,
    TokenBalance, TokenInfo, TopicInfo, TopicMessage, TransactionRecord,
};
pub use result::{
    QueryResult, RawTransactionResponse, TransactionResult, STATUS_INVALID_TRANSACTION,
    STATUS_PENDING_SIGNATURE, STATUS_SUCCESS,
};
