use tracing::warn;

use hederakit_core::{ExecutionContext, KitError, LedgerClient, TransactionResult};

use crate::builder;
use crate::execute::strategy_for;
use crate::normalise::{self, ExecuteContractRequest};

/// Call a deployed contract. Mixed native/EVM addressing is resolved during
/// normalization and the call data is ABI-encoded there too.
pub async fn execute_contract(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: ExecuteContractRequest,
) -> TransactionResult {
    match execute_contract_inner(client, context, &raw).await {
        Ok(result) => result,
        Err(error) => {
            warn!(%error, "execute_contract failed");
            TransactionResult::failure("Failed to execute contract", &error)
        }
    }
}

async fn execute_contract_inner(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: &ExecuteContractRequest,
) -> Result<TransactionResult, KitError> {
    let params = normalise::normalise_execute_contract(raw, context).await?;
    let contract_id = params.contract_id.clone();
    let function_name = raw.function_name.trim().to_string();
    let body = builder::execute_contract(params);
    let raw_response = strategy_for(context.mode).execute(client, context, body).await?;

    Ok(TransactionResult::settled(raw_response, |_| {
        format!("Called {function_name} on contract {contract_id}")
    }))
}
