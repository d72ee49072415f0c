use tracing::warn;

use hederakit_core::{ExecutionContext, KitError, LedgerClient, TransactionResult};

use crate::authorize;
use crate::builder;
use crate::execute::strategy_for;
use crate::normalise::{
    self, CreateTopicRequest, DeleteTopicRequest, SubmitTopicMessageRequest, UpdateTopicRequest,
};

pub async fn create_topic(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: CreateTopicRequest,
) -> TransactionResult {
    match create_topic_inner(client, context, &raw).await {
        Ok(result) => result,
        Err(error) => {
            warn!(%error, "create_topic failed");
            TransactionResult::failure("Failed to create topic", &error)
        }
    }
}

async fn create_topic_inner(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: &CreateTopicRequest,
) -> Result<TransactionResult, KitError> {
    let params = normalise::normalise_create_topic(raw, context, client).await?;
    let body = builder::create_topic(params);
    let raw_response = strategy_for(context.mode).execute(client, context, body).await?;

    Ok(TransactionResult::settled(raw_response, |raw| match raw.topic_id.as_deref() {
        Some(id) => format!("Created topic {id}"),
        None => "Created topic".to_string(),
    }))
}

/// Change a topic's memo or keys, gated by the same admin-key rules as
/// token updates.
pub async fn update_topic(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: UpdateTopicRequest,
) -> TransactionResult {
    match update_topic_inner(client, context, &raw).await {
        Ok(result) => result,
        Err(error) => {
            warn!(%error, "update_topic failed");
            TransactionResult::failure("Failed to update topic", &error)
        }
    }
}

async fn update_topic_inner(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: &UpdateTopicRequest,
) -> Result<TransactionResult, KitError> {
    let params = normalise::normalise_update_topic(raw, context, client).await?;
    authorize::authorize_topic_update(&params, context, client).await?;

    let topic_id = params.topic_id.clone();
    let body = builder::update_topic(params);
    let raw_response = strategy_for(context.mode).execute(client, context, body).await?;

    Ok(TransactionResult::settled(raw_response, |_| format!("Updated topic {topic_id}")))
}

pub async fn delete_topic(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: DeleteTopicRequest,
) -> TransactionResult {
    match delete_topic_inner(client, context, &raw).await {
        Ok(result) => result,
        Err(error) => {
            warn!(%error, "delete_topic failed");
            TransactionResult::failure("Failed to delete topic", &error)
        }
    }
}

async fn delete_topic_inner(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: &DeleteTopicRequest,
) -> Result<TransactionResult, KitError> {
    let params = normalise::normalise_delete_topic(raw)?;
    let topic_id = params.topic_id.clone();
    let body = builder::delete_topic(params);
    let raw_response = strategy_for(context.mode).execute(client, context, body).await?;

    Ok(TransactionResult::settled(raw_response, |_| format!("Deleted topic {topic_id}")))
}

pub async fn submit_topic_message(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: SubmitTopicMessageRequest,
) -> TransactionResult {
    match submit_topic_message_inner(client, context, &raw).await {
        Ok(result) => result,
        Err(error) => {
            warn!(%error, "submit_topic_message failed");
            TransactionResult::failure("Failed to submit topic message", &error)
        }
    }
}

async fn submit_topic_message_inner(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: &SubmitTopicMessageRequest,
) -> Result<TransactionResult, KitError> {
    let params = normalise::normalise_submit_topic_message(raw)?;
    let topic_id = params.topic_id.clone();
    let body = builder::submit_topic_message(params);
    let raw_response = strategy_for(context.mode).execute(client, context, body).await?;

    Ok(TransactionResult::settled(raw_response, |raw| match raw.topic_sequence_number {
        Some(sequence) => format!("Submitted message {sequence} to topic {topic_id}"),
        None => format!("Submitted message to topic {topic_id}"),
    }))
}
