//! Uniform result envelope returned by every operation entry point.
//!
//! Success or failure, mutation or query, the caller always receives the
//! same shape: a machine-readable `raw` payload plus a `human_message`
//! summarizing it for chat surfaces. A raw error must never escape an entry
//! point; it is converted here instead.

use serde::{Deserialize, Serialize};

use crate::errors::KitError;

/// Receipt status of a successfully settled transaction.
pub const STATUS_SUCCESS: &str = "SUCCESS";
/// Marker status for any operation that failed before or during submission.
pub const STATUS_INVALID_TRANSACTION: &str = "INVALID_TRANSACTION";
/// Status of a serialized-but-unsubmitted transaction awaiting a signature.
pub const STATUS_PENDING_SIGNATURE: &str = "PENDING_SIGNATURE";

/// Machine-readable half of the envelope.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTransactionResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_sequence_number: Option<u64>,
    /// Base64 of the frozen, unsigned transaction (return-bytes mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_bytes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionResult {
    pub raw: RawTransactionResponse,
    pub human_message: String,
}

impl TransactionResult {
    /// Wrap a raw response, describing it with `describe` unless the
    /// transaction is still awaiting an external signature.
    pub fn settled(
        raw: RawTransactionResponse,
        describe: impl FnOnce(&RawTransactionResponse) -> String,
    ) -> Self {
        let human_message = if raw.transaction_bytes.is_some() {
            "Transaction serialized; a signature is required before it can be submitted."
                .to_string()
        } else {
            describe(&raw)
        };
        Self { raw, human_message }
    }

    /// Default rendering for operations without a bespoke formatter.
    pub fn settled_default(raw: RawTransactionResponse) -> Self {
        Self::settled(raw, |raw| {
            serde_json::to_string(raw).unwrap_or_else(|_| raw.status.clone())
        })
    }

    /// The single failure shape every error category converges on.
    pub fn failure(prefix: &str, error: &KitError) -> Self {
        let message = error.to_string();
        Self {
            raw: RawTransactionResponse {
                status: STATUS_INVALID_TRANSACTION.to_string(),
                error: Some(message.clone()),
                ..Default::default()
            },
            human_message: format!("{prefix}: {message}"),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.raw.error.is_some()
    }
}

/// Envelope for read-only operations: same contract, operation-specific
/// payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub human_message: String,
}

impl<T> QueryResult<T> {
    pub fn success(raw: T, human_message: impl Into<String>) -> Self {
        Self { raw: Some(raw), error: None, human_message: human_message.into() }
    }

    pub fn failure(prefix: &str, error: &KitError) -> Self {
        let message = error.to_string();
        Self { raw: None, error: Some(message.clone()), human_message: format!("{prefix}: {message}") }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        QueryResult, RawTransactionResponse, TransactionResult, STATUS_INVALID_TRANSACTION,
        STATUS_SUCCESS,
    };
    use crate::errors::KitError;

    #[test]
    fn failure_carries_marker_status_and_prefixed_message() {
        let error = KitError::validation("Field \"tokenId\" - missing required value");
        let result = TransactionResult::failure("Failed to update token", &error);

        assert_eq!(result.raw.status, STATUS_INVALID_TRANSACTION);
        assert!(result.is_failure());
        assert!(result.human_message.starts_with("Failed to update token: "));
        assert!(result.human_message.contains("Field \"tokenId\""));
    }

    #[test]
    fn settled_uses_formatter_when_no_bytes_pending() {
        let raw = RawTransactionResponse {
            status: STATUS_SUCCESS.to_string(),
            transaction_id: Some("0.0.2@1.000000001".to_string()),
            ..Default::default()
        };
        let result = TransactionResult::settled(raw, |r| format!("done: {}", r.status));
        assert_eq!(result.human_message, "done: SUCCESS");
    }

    #[test]
    fn settled_reports_pending_signature_over_formatter() {
        let raw = RawTransactionResponse {
            status: super::STATUS_PENDING_SIGNATURE.to_string(),
            transaction_bytes: Some("AAAA".to_string()),
            ..Default::default()
        };
        let result = TransactionResult::settled(raw, |_| "should not appear".to_string());
        assert!(result.human_message.contains("signature is required"));
    }

    #[test]
    fn query_failure_has_no_payload() {
        let result: QueryResult<u64> =
            QueryResult::failure("Failed to fetch balance", &KitError::network("boom"));
        assert!(result.is_failure());
        assert!(result.raw.is_none());
        assert_eq!(result.human_message, "Failed to fetch balance: boom");
    }

    #[test]
    fn raw_response_omits_absent_fields_in_json() {
        let raw = RawTransactionResponse {
            status: STATUS_SUCCESS.to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&raw).unwrap();
        assert_eq!(json, "{\"status\":\"SUCCESS\"}");
    }
}
