use tracing::warn;

use hederakit_core::{ExecutionContext, KitError, LedgerClient, TransactionResult};

use crate::authorize;
use crate::builder;
use crate::execute::strategy_for;
use crate::normalise::{
    self, AirdropTokenRequest, CreateTokenRequest, MintTokenRequest, TokenAssociationRequest,
    UpdateTokenRequest,
};

pub async fn create_token(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: CreateTokenRequest,
) -> TransactionResult {
    match create_token_inner(client, context, &raw).await {
        Ok(result) => result,
        Err(error) => {
            warn!(%error, "create_token failed");
            TransactionResult::failure("Failed to create token", &error)
        }
    }
}

async fn create_token_inner(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: &CreateTokenRequest,
) -> Result<TransactionResult, KitError> {
    let params = normalise::normalise_create_token(raw, context, client).await?;
    let symbol = params.symbol.clone();
    let body = builder::create_token(params);
    let raw_response = strategy_for(context.mode).execute(client, context, body).await?;

    Ok(TransactionResult::settled(raw_response, |raw| match raw.token_id.as_deref() {
        Some(id) => format!("Created token {symbol} ({id})"),
        None => format!("Created token {symbol}"),
    }))
}

/// Change a token's metadata or keys. Authorization runs against the
/// current on-chain snapshot before any transaction is built.
pub async fn update_token(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: UpdateTokenRequest,
) -> TransactionResult {
    match update_token_inner(client, context, &raw).await {
        Ok(result) => result,
        Err(error) => {
            warn!(%error, "update_token failed");
            TransactionResult::failure("Failed to update token", &error)
        }
    }
}

async fn update_token_inner(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: &UpdateTokenRequest,
) -> Result<TransactionResult, KitError> {
    let params = normalise::normalise_update_token(raw, context, client).await?;
    authorize::authorize_token_update(&params, context, client).await?;

    let token_id = params.token_id.clone();
    let body = builder::update_token(params);
    let raw_response = strategy_for(context.mode).execute(client, context, body).await?;

    Ok(TransactionResult::settled(raw_response, |_| format!("Updated token {token_id}")))
}

pub async fn mint_token(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: MintTokenRequest,
) -> TransactionResult {
    match mint_token_inner(client, context, &raw).await {
        Ok(result) => result,
        Err(error) => {
            warn!(%error, "mint_token failed");
            TransactionResult::failure("Failed to mint token", &error)
        }
    }
}

async fn mint_token_inner(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: &MintTokenRequest,
) -> Result<TransactionResult, KitError> {
    let params = normalise::normalise_mint_token(raw, context).await?;
    let token_id = params.token_id.clone();
    let body = builder::mint_token(params);
    let raw_response = strategy_for(context.mode).execute(client, context, body).await?;

    Ok(TransactionResult::settled(raw_response, |_| format!("Minted supply on token {token_id}")))
}

pub async fn associate_token(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: TokenAssociationRequest,
) -> TransactionResult {
    match associate_token_inner(client, context, &raw).await {
        Ok(result) => result,
        Err(error) => {
            warn!(%error, "associate_token failed");
            TransactionResult::failure("Failed to associate token", &error)
        }
    }
}

async fn associate_token_inner(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: &TokenAssociationRequest,
) -> Result<TransactionResult, KitError> {
    let params = normalise::normalise_token_association(raw, context, client).await?;
    let count = params.token_ids.len();
    let account_id = params.account_id.clone();
    let body = builder::associate_token(params);
    let raw_response = strategy_for(context.mode).execute(client, context, body).await?;

    Ok(TransactionResult::settled(raw_response, |_| {
        format!("Associated {count} token(s) with account {account_id}")
    }))
}

pub async fn dissociate_token(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: TokenAssociationRequest,
) -> TransactionResult {
    match dissociate_token_inner(client, context, &raw).await {
        Ok(result) => result,
        Err(error) => {
            warn!(%error, "dissociate_token failed");
            TransactionResult::failure("Failed to dissociate token", &error)
        }
    }
}

async fn dissociate_token_inner(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: &TokenAssociationRequest,
) -> Result<TransactionResult, KitError> {
    let params = normalise::normalise_token_association(raw, context, client).await?;
    let count = params.token_ids.len();
    let account_id = params.account_id.clone();
    let body = builder::dissociate_token(params);
    let raw_response = strategy_for(context.mode).execute(client, context, body).await?;

    Ok(TransactionResult::settled(raw_response, |_| {
        format!("Dissociated {count} token(s) from account {account_id}")
    }))
}

pub async fn airdrop_token(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: AirdropTokenRequest,
) -> TransactionResult {
    match airdrop_token_inner(client, context, &raw).await {
        Ok(result) => result,
        Err(error) => {
            warn!(%error, "airdrop_token failed");
            TransactionResult::failure("Failed to airdrop token", &error)
        }
    }
}

async fn airdrop_token_inner(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: &AirdropTokenRequest,
) -> Result<TransactionResult, KitError> {
    let params = normalise::normalise_airdrop_token(raw, context, client).await?;
    let token_id = params.token_id.clone();
    let recipients = params.transfers.len();
    let body = builder::airdrop_token(params);
    let raw_response = strategy_for(context.mode).execute(client, context, body).await?;

    Ok(TransactionResult::settled(raw_response, |_| {
        format!("Airdropped token {token_id} to {recipients} recipient(s)")
    }))
}
