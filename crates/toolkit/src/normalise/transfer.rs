use rust_decimal::Decimal;
use serde::Deserialize;

use hederakit_core::{
    hbar_to_tinybars, AccountId, ExecutionContext, KitError, LedgerClient, TinybarTransfer,
    ValidationReport,
};

use crate::resolver;

/// Raw base-currency transfer: destination legs in display units, source
/// and memo optional.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferHbarRequest {
    pub transfers: Vec<HbarTransferInput>,
    #[serde(default)]
    pub source_account_id: Option<String>,
    #[serde(default)]
    pub transaction_memo: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HbarTransferInput {
    pub account_id: String,
    pub amount: Decimal,
}

/// Fully balanced transfer in tinybars: the destination legs plus one
/// appended source leg holding the exact negative sum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HbarTransferParams {
    pub transfers: Vec<TinybarTransfer>,
    pub memo: Option<String>,
}

pub async fn normalise_transfer_hbar(
    raw: &TransferHbarRequest,
    context: &ExecutionContext,
    client: &dyn LedgerClient,
) -> Result<HbarTransferParams, KitError> {
    let mut report = ValidationReport::new();
    let mut legs: Vec<TinybarTransfer> = Vec::with_capacity(raw.transfers.len() + 1);

    for (index, leg) in raw.transfers.iter().enumerate() {
        let account = match leg.account_id.parse::<AccountId>() {
            Ok(account) => Some(account),
            Err(error) => {
                report.push(format!("transfers[{index}].accountId"), error);
                None
            }
        };

        // Directed legs must move value toward the destination; the
        // balancing leg is the only place a negative amount belongs.
        if leg.amount <= Decimal::ZERO {
            report.push(
                format!("transfers[{index}].amount"),
                format!("Invalid transfer amount: {}", leg.amount),
            );
            continue;
        }

        let tinybars = match hbar_to_tinybars(leg.amount) {
            Ok(tinybars) => tinybars,
            Err(error) => {
                report.push(format!("transfers[{index}].amount"), error);
                continue;
            }
        };

        if let Some(account_id) = account {
            legs.push(TinybarTransfer { account_id, amount: tinybars });
        }
    }

    let source = match &raw.source_account_id {
        Some(provided) => match provided.parse::<AccountId>() {
            Ok(account) => Some(account),
            Err(error) => {
                report.push("sourceAccountId", error);
                None
            }
        },
        None => Some(resolver::default_account(context, client)?),
    };

    report.into_result()?;
    let source = source.expect("source resolved when report is clean");

    let mut total: i64 = 0;
    for leg in &legs {
        total = total.checked_add(leg.amount).ok_or_else(|| {
            KitError::validation("transfer total overflows the smallest-unit range")
        })?;
    }

    // The appended leg guarantees the zero-sum invariant; with no
    // destination legs it degenerates to a single zero-amount leg.
    legs.push(TinybarTransfer { account_id: source, amount: -total });

    Ok(HbarTransferParams { transfers: legs, memo: raw.transaction_memo.clone() })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;
    use std::sync::Arc;

    use rust_decimal::Decimal;

    use hederakit_core::{ExecutionContext, ExecutionMode, KitError};

    use super::{normalise_transfer_hbar, HbarTransferInput, TransferHbarRequest};
    use crate::testutil::{account, key, StubClient, StubQuery};

    fn context() -> ExecutionContext {
        ExecutionContext::new(ExecutionMode::Autonomous, Arc::new(StubQuery::default()))
    }

    fn client() -> StubClient {
        StubClient::with_operator(account("0.0.2"), key("aa"))
    }

    fn leg(account_id: &str, amount: &str) -> HbarTransferInput {
        HbarTransferInput {
            account_id: account_id.to_string(),
            amount: Decimal::from_str(amount).unwrap(),
        }
    }

    #[tokio::test]
    async fn appends_balancing_leg_on_the_source_account() {
        let raw = TransferHbarRequest {
            transfers: vec![leg("0.0.1002", "10")],
            source_account_id: Some("0.0.1001".to_string()),
            transaction_memo: None,
        };

        let params = normalise_transfer_hbar(&raw, &context(), &client()).await.unwrap();

        assert_eq!(params.transfers.len(), 2);
        assert_eq!(params.transfers[0].account_id, account("0.0.1002"));
        assert_eq!(params.transfers[0].amount, 1_000_000_000);
        assert_eq!(params.transfers[1].account_id, account("0.0.1001"));
        assert_eq!(params.transfers[1].amount, -1_000_000_000);
    }

    #[tokio::test]
    async fn legs_always_sum_to_zero() {
        let raw = TransferHbarRequest {
            transfers: vec![
                leg("0.0.1002", "1.5"),
                leg("0.0.1003", "0.00000001"),
                leg("0.0.1004", "42"),
            ],
            source_account_id: None,
            transaction_memo: Some("payout".to_string()),
        };

        let params = normalise_transfer_hbar(&raw, &context(), &client()).await.unwrap();

        let sum: i64 = params.transfers.iter().map(|t| t.amount).sum();
        assert_eq!(sum, 0);
        // unspecified source falls back to the operator
        assert_eq!(params.transfers.last().unwrap().account_id, account("0.0.2"));
        assert_eq!(params.memo.as_deref(), Some("payout"));
    }

    #[tokio::test]
    async fn empty_transfer_list_yields_single_zero_leg() {
        let raw = TransferHbarRequest {
            transfers: vec![],
            source_account_id: Some("0.0.1001".to_string()),
            transaction_memo: None,
        };

        let params = normalise_transfer_hbar(&raw, &context(), &client()).await.unwrap();

        assert_eq!(params.transfers.len(), 1);
        assert_eq!(params.transfers[0].account_id, account("0.0.1001"));
        assert_eq!(params.transfers[0].amount, 0);
    }

    #[tokio::test]
    async fn negative_amount_fails_with_the_offending_value() {
        let raw = TransferHbarRequest {
            transfers: vec![leg("0.0.1002", "-0.1")],
            source_account_id: Some("0.0.1001".to_string()),
            transaction_memo: None,
        };

        let error = normalise_transfer_hbar(&raw, &context(), &client()).await.unwrap_err();
        assert!(error.to_string().contains("Invalid transfer amount: -0.1"));
    }

    #[tokio::test]
    async fn all_violations_are_reported_together() {
        let raw = TransferHbarRequest {
            transfers: vec![leg("not-an-account", "5"), leg("0.0.1003", "0")],
            source_account_id: Some("also-bad".to_string()),
            transaction_memo: None,
        };

        let error = normalise_transfer_hbar(&raw, &context(), &client()).await.unwrap_err();
        let message = error.to_string();

        assert!(message.contains("Field \"transfers[0].accountId\""));
        assert!(message.contains("Field \"transfers[1].amount\" - Invalid transfer amount: 0"));
        assert!(message.contains("Field \"sourceAccountId\""));
    }

    #[tokio::test]
    async fn sub_tinybar_amount_is_rejected() {
        let raw = TransferHbarRequest {
            transfers: vec![leg("0.0.1002", "0.000000001")],
            source_account_id: Some("0.0.1001".to_string()),
            transaction_memo: None,
        };

        let error = normalise_transfer_hbar(&raw, &context(), &client()).await.unwrap_err();
        assert!(matches!(error, KitError::Validation(_)));
        assert!(error.to_string().contains("transfers[0].amount"));
    }
}
