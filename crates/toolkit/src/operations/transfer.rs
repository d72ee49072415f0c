use tracing::warn;

use hederakit_core::{ExecutionContext, KitError, LedgerClient, TransactionResult};

use crate::builder;
use crate::execute::strategy_for;
use crate::normalise::{self, TransferHbarRequest};

/// Move base currency between accounts. Destination legs come from the
/// caller; the balancing source leg is appended during normalization.
pub async fn transfer_hbar(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: TransferHbarRequest,
) -> TransactionResult {
    match transfer_hbar_inner(client, context, &raw).await {
        Ok(result) => result,
        Err(error) => {
            warn!(%error, "transfer_hbar failed");
            TransactionResult::failure("Failed to transfer HBAR", &error)
        }
    }
}

async fn transfer_hbar_inner(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: &TransferHbarRequest,
) -> Result<TransactionResult, KitError> {
    let params = normalise::normalise_transfer_hbar(raw, context, client).await?;
    let body = builder::transfer_hbar(params);
    let raw_response = strategy_for(context.mode).execute(client, context, body).await?;

    Ok(TransactionResult::settled(raw_response, |raw| {
        match raw.transaction_id.as_deref() {
            Some(id) => format!("HBAR transfer complete (transaction {id})"),
            None => "HBAR transfer complete".to_string(),
        }
    }))
}
