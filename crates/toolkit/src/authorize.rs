//! Client-side authorization for update operations on keyed entities.
//!
//! The protocol would reject these transactions anyway; checking against a
//! fresh entity snapshot here avoids a wasted round trip and produces
//! messages a caller can act on. Runs strictly before the builder, only for
//! updates. Snapshots are fetched per check and never cached.

use tracing::debug;

use hederakit_core::{
    EntityKeySnapshot, ExecutionContext, KeyCategory, KitError, LedgerClient, PublicKey,
};

use crate::normalise::{UpdateTokenParams, UpdateTopicParams};
use crate::resolver;

/// Validate a token update against the token's current on-chain keys.
pub async fn authorize_token_update(
    params: &UpdateTokenParams,
    context: &ExecutionContext,
    client: &dyn LedgerClient,
) -> Result<(), KitError> {
    let info = context.query.get_token_info(&params.token_id).await?;
    let caller_key = resolver::default_public_key(context, client).await?;
    debug!(token_id = %params.token_id, "checking update authorization");

    ensure_admin("token", &params.token_id.to_string(), &info.keys, &caller_key)?;
    ensure_categories_exist("token", &info.keys, &params.keys.entries())
}

/// Validate a topic update against the topic's current on-chain keys.
pub async fn authorize_topic_update(
    params: &UpdateTopicParams,
    context: &ExecutionContext,
    client: &dyn LedgerClient,
) -> Result<(), KitError> {
    let info = context.query.get_topic_info(&params.topic_id).await?;
    let caller_key = resolver::default_public_key(context, client).await?;
    debug!(topic_id = %params.topic_id, "checking update authorization");

    ensure_admin("topic", &params.topic_id.to_string(), &info.keys, &caller_key)?;
    ensure_categories_exist(
        "topic",
        &info.keys,
        &[
            (KeyCategory::Admin, params.admin_key.as_ref()),
            (KeyCategory::Submit, params.submit_key.as_ref()),
        ],
    )
}

/// An entity without an admin key is immutable; one with an admin key only
/// accepts updates from that key's holder. Keys compare in raw hex form.
fn ensure_admin(
    entity: &str,
    entity_id: &str,
    snapshot: &EntityKeySnapshot,
    caller_key: &PublicKey,
) -> Result<(), KitError> {
    let admin = snapshot.key(KeyCategory::Admin).ok_or_else(|| {
        KitError::authorization(format!(
            "the {entity} {entity_id} is immutable: it was created without an adminKey and can never be updated"
        ))
    })?;

    if admin.as_hex() != caller_key.as_hex() {
        return Err(KitError::authorization(format!(
            "You do not have permission to update this {entity}: the adminKey does not match your public key"
        )));
    }

    Ok(())
}

/// A key category an entity was created without can never be added later,
/// even by the admin.
fn ensure_categories_exist(
    entity: &str,
    snapshot: &EntityKeySnapshot,
    requested: &[(KeyCategory, Option<&PublicKey>)],
) -> Result<(), KitError> {
    for (category, value) in requested {
        if value.is_some() && snapshot.key(*category).is_none() {
            let field = category.field_name();
            return Err(KitError::authorization(format!(
                "Cannot update {field}: {entity} was created without a {field}"
            )));
        }
    }
    Ok(())
}
