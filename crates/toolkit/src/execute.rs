//! Mode-aware execution of built transactions.
//!
//! One strategy per execution mode, selected once per context. Autonomous
//! freezes, submits and derives the response from the receipt; return-bytes
//! freezes and serializes without ever submitting. Both produce the same raw
//! response shape.

use async_trait::async_trait;
use base64::Engine;
use tracing::debug;

use hederakit_core::{
    ExecutionContext, ExecutionMode, KitError, LedgerClient, RawTransactionResponse, Transaction,
    TransactionBody, TransactionId, STATUS_PENDING_SIGNATURE,
};

use crate::resolver;

#[async_trait]
pub trait ExecutionStrategy: Send + Sync {
    async fn execute(
        &self,
        client: &dyn LedgerClient,
        context: &ExecutionContext,
        body: TransactionBody,
    ) -> Result<RawTransactionResponse, KitError>;
}

/// Select the strategy for a context's mode. Two terminal behaviors, no
/// transitions between them.
pub fn strategy_for(mode: ExecutionMode) -> &'static dyn ExecutionStrategy {
    match mode {
        ExecutionMode::Autonomous => &AutonomousExecution,
        ExecutionMode::ReturnBytes => &ReturnBytesExecution,
    }
}

/// Sign-and-submit path: the client operator holds signing authority.
pub struct AutonomousExecution;

#[async_trait]
impl ExecutionStrategy for AutonomousExecution {
    async fn execute(
        &self,
        client: &dyn LedgerClient,
        context: &ExecutionContext,
        body: TransactionBody,
    ) -> Result<RawTransactionResponse, KitError> {
        let payer = resolver::default_account(context, client)?;
        let transaction = Transaction { id: TransactionId::generate(payer), body };

        let frozen = client.freeze(transaction).await?;
        let receipt = client.execute(&frozen).await?;
        debug!(status = %receipt.status, transaction_id = %receipt.transaction_id, "transaction settled");

        Ok(RawTransactionResponse {
            status: receipt.status,
            transaction_id: Some(receipt.transaction_id.to_string()),
            account_id: receipt.account_id.map(|id| id.to_string()),
            token_id: receipt.token_id.map(|id| id.to_string()),
            topic_id: receipt.topic_id.map(|id| id.to_string()),
            contract_id: receipt.contract_id.map(|id| id.to_string()),
            topic_sequence_number: receipt.topic_sequence_number,
            transaction_bytes: None,
            error: None,
        })
    }
}

/// Human-in-the-loop path: freeze, serialize, hand the bytes back. Never
/// submits, never fetches a receipt.
pub struct ReturnBytesExecution;

#[async_trait]
impl ExecutionStrategy for ReturnBytesExecution {
    async fn execute(
        &self,
        client: &dyn LedgerClient,
        context: &ExecutionContext,
        body: TransactionBody,
    ) -> Result<RawTransactionResponse, KitError> {
        // The payer is the deferred signer, not the delegate operator.
        let payer = resolver::default_account(context, client)?;
        let transaction = Transaction { id: TransactionId::generate(payer), body };

        let frozen = client.freeze(transaction).await?;
        let bytes = frozen.to_bytes()?;
        debug!(byte_len = bytes.len(), "transaction serialized for external signing");

        Ok(RawTransactionResponse {
            status: STATUS_PENDING_SIGNATURE.to_string(),
            transaction_bytes: Some(base64::engine::general_purpose::STANDARD.encode(bytes)),
            ..Default::default()
        })
    }
}
