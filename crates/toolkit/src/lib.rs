//! Agent-facing transaction toolkit.
//!
//! Turns loosely specified, human-authored operation parameters into fully
//! specified, authorized, network-ready transactions. The pipeline behind
//! every operation entry point:
//!
//! 1. **Normalize** (`normalise`) - resolve accounts and tri-state keys,
//!    convert display amounts exactly, collect every field violation.
//! 2. **Authorize** (`authorize`) - for updates on keyed entities, reject
//!    changes the caller's key cannot make, before building anything.
//! 3. **Build** (`builder`) - pure mapping onto transaction bodies.
//! 4. **Execute** (`execute`) - autonomous sign-and-submit, or freeze and
//!    serialize for an external signer, behind one strategy interface.
//!
//! Entry points never leak errors; everything converges on the uniform
//! result envelope from `hederakit-core`.

pub mod abi;
pub mod authorize;
pub mod builder;
pub mod execute;
pub mod normalise;
pub mod operations;
pub mod resolver;

#[cfg(test)]
pub(crate) mod testutil;

pub use execute::{strategy_for, AutonomousExecution, ExecutionStrategy, ReturnBytesExecution};
pub use operations::{
    airdrop_token, associate_token, create_token, create_topic, delete_topic, dissociate_token,
    execute_contract, get_account_token_balances, get_contract_info, get_exchange_rate,
    get_hbar_balance, get_pending_airdrops, get_token_info, get_topic_info, get_topic_messages,
    get_transaction_record, mint_token, submit_topic_message, transfer_hbar, update_token,
    update_topic,
};
