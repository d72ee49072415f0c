//! Account and key resolution.
//!
//! Every operation that needs "the caller's account" or "the caller's key"
//! goes through here; normalizers never reimplement the fallback chain. The
//! chain is: explicit parameter, then the context's pinned identity, then
//! the client operator.

use tracing::debug;

use hederakit_core::{
    AccountId, EvmAddress, ExecutionContext, ExecutionMode, KitError, LedgerClient, PublicKey,
    QueryService,
};

/// The account an operation acts as when none is given explicitly.
pub fn default_account(
    context: &ExecutionContext,
    client: &dyn LedgerClient,
) -> Result<AccountId, KitError> {
    context
        .account_id
        .clone()
        .or_else(|| client.operator_account_id())
        .ok_or_else(|| {
            KitError::resolution(
                "no account available: set an account on the execution context or configure a client operator",
            )
        })
}

/// The public key that will ultimately sign.
///
/// In autonomous mode that is the operator key, available without I/O. In
/// return-bytes mode the operator is only a delegate; the real signer is the
/// resolved default account, so its key must be fetched from chain state.
pub async fn default_public_key(
    context: &ExecutionContext,
    client: &dyn LedgerClient,
) -> Result<PublicKey, KitError> {
    match context.mode {
        ExecutionMode::Autonomous => client
            .operator_public_key()
            .ok_or_else(|| KitError::resolution("client has no operator public key configured")),
        ExecutionMode::ReturnBytes => {
            let account = default_account(context, client)?;
            debug!(%account, "fetching on-chain key for deferred signer");
            let info = context.query.get_account(&account).await?;
            info.key.ok_or_else(|| {
                KitError::resolution(format!("no public key on record for account {account}"))
            })
        }
    }
}

/// An explicitly provided account wins; otherwise fall back to the default.
pub fn resolve_account(
    provided: Option<&AccountId>,
    context: &ExecutionContext,
    client: &dyn LedgerClient,
) -> Result<AccountId, KitError> {
    match provided {
        Some(account) => Ok(account.clone()),
        None => default_account(context, client),
    }
}

/// Shape check for a native `shard.realm.num` address. Pure, no I/O.
pub fn is_hedera_address(value: &str) -> bool {
    value.parse::<AccountId>().is_ok()
}

/// Map a mixed native/EVM address to its EVM form.
///
/// EVM addresses pass through unchanged. Native ids are looked up; accounts
/// without an EVM alias on record fall back to the long-zero encoding of the
/// entity number.
pub async fn hedera_evm_address(
    address: &str,
    query: &dyn QueryService,
) -> Result<EvmAddress, KitError> {
    if let Ok(evm) = address.parse::<EvmAddress>() {
        return Ok(evm);
    }

    let account: AccountId = address.parse()?;
    let info = query.get_account(&account).await?;
    Ok(info.evm_address.unwrap_or_else(|| long_zero_address(&account)))
}

/// Long-zero form: shard and realm zero-extended in front of the entity
/// number, big-endian.
pub fn long_zero_address(account: &AccountId) -> EvmAddress {
    let mut bytes = [0u8; 20];
    bytes[..4].copy_from_slice(&(account.shard as u32).to_be_bytes());
    bytes[4..12].copy_from_slice(&account.realm.to_be_bytes());
    bytes[12..].copy_from_slice(&account.num.to_be_bytes());
    EvmAddress(bytes)
}
