//! Operation entry points: the stable contract the surrounding agent-tool
//! layer depends on.
//!
//! Every mutating entry point accepts `(client, context, raw_params)`, runs
//! normalize → authorize (updates only) → build → execute, and returns the
//! uniform result envelope. Read-only entry points go straight to the query
//! service. An error raised anywhere inside is converted at this boundary;
//! nothing panics or propagates past it.

mod contract;
mod query;
mod token;
mod topic;
mod transfer;

pub use contract::execute_contract;
pub use query::{
    get_account_token_balances, get_contract_info, get_exchange_rate, get_hbar_balance,
    get_pending_airdrops, get_token_info, get_topic_info, get_topic_messages,
    get_transaction_record, AccountLookupRequest, ContractLookupRequest, HbarBalance,
    TokenLookupRequest, TopicLookupRequest, TopicMessagesRequest, TransactionLookupRequest,
};
pub use token::{airdrop_token, associate_token, create_token, dissociate_token, mint_token, update_token};
pub use topic::{create_topic, delete_topic, submit_topic_message, update_topic};
pub use transfer::transfer_hbar;
