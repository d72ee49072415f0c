use serde::Deserialize;

use hederakit_core::{
    ExecutionContext, KeyInput, KitError, LedgerClient, PublicKey, TopicId, ValidationReport,
};

use super::resolve_key;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicRequest {
    #[serde(default)]
    pub topic_memo: Option<String>,
    #[serde(default)]
    pub admin_key: Option<KeyInput>,
    #[serde(default)]
    pub submit_key: Option<KeyInput>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateTopicParams {
    pub memo: Option<String>,
    pub admin_key: Option<PublicKey>,
    pub submit_key: Option<PublicKey>,
}

pub async fn normalise_create_topic(
    raw: &CreateTopicRequest,
    context: &ExecutionContext,
    client: &dyn LedgerClient,
) -> Result<CreateTopicParams, KitError> {
    let mut report = ValidationReport::new();

    let admin_key =
        resolve_key(raw.admin_key.as_ref(), "adminKey", context, client, &mut report).await?;
    let submit_key =
        resolve_key(raw.submit_key.as_ref(), "submitKey", context, client, &mut report).await?;

    report.finish(CreateTopicParams { memo: raw.topic_memo.clone(), admin_key, submit_key })
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTopicRequest {
    pub topic_id: String,
    #[serde(default)]
    pub topic_memo: Option<String>,
    #[serde(default)]
    pub admin_key: Option<KeyInput>,
    #[serde(default)]
    pub submit_key: Option<KeyInput>,
}

/// Only fields the caller touched appear; omitted keys stay absent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateTopicParams {
    pub topic_id: TopicId,
    pub memo: Option<String>,
    pub admin_key: Option<PublicKey>,
    pub submit_key: Option<PublicKey>,
}

pub async fn normalise_update_topic(
    raw: &UpdateTopicRequest,
    context: &ExecutionContext,
    client: &dyn LedgerClient,
) -> Result<UpdateTopicParams, KitError> {
    let mut report = ValidationReport::new();

    let topic_id = match raw.topic_id.parse::<TopicId>() {
        Ok(id) => Some(id),
        Err(error) => {
            report.push("topicId", error);
            None
        }
    };

    let admin_key =
        resolve_key(raw.admin_key.as_ref(), "adminKey", context, client, &mut report).await?;
    let submit_key =
        resolve_key(raw.submit_key.as_ref(), "submitKey", context, client, &mut report).await?;

    report.into_result()?;
    Ok(UpdateTopicParams {
        topic_id: topic_id.expect("topic id parsed when report is clean"),
        memo: raw.topic_memo.clone(),
        admin_key,
        submit_key,
    })
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTopicRequest {
    pub topic_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteTopicParams {
    pub topic_id: TopicId,
}

pub fn normalise_delete_topic(raw: &DeleteTopicRequest) -> Result<DeleteTopicParams, KitError> {
    let mut report = ValidationReport::new();
    let topic_id = match raw.topic_id.parse::<TopicId>() {
        Ok(id) => Some(id),
        Err(error) => {
            report.push("topicId", error);
            None
        }
    };

    report.into_result()?;
    Ok(DeleteTopicParams { topic_id: topic_id.expect("topic id parsed when report is clean") })
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTopicMessageRequest {
    pub topic_id: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitTopicMessageParams {
    pub topic_id: TopicId,
    pub message: Vec<u8>,
}

pub fn normalise_submit_topic_message(
    raw: &SubmitTopicMessageRequest,
) -> Result<SubmitTopicMessageParams, KitError> {
    let mut report = ValidationReport::new();

    let topic_id = match raw.topic_id.parse::<TopicId>() {
        Ok(id) => Some(id),
        Err(error) => {
            report.push("topicId", error);
            None
        }
    };
    if raw.message.is_empty() {
        report.push("message", "missing required value");
    }

    report.into_result()?;
    Ok(SubmitTopicMessageParams {
        topic_id: topic_id.expect("topic id parsed when report is clean"),
        message: raw.message.clone().into_bytes(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hederakit_core::{ExecutionContext, ExecutionMode, KeyInput};

    use super::{
        normalise_create_topic, normalise_submit_topic_message, normalise_update_topic,
        CreateTopicRequest, SubmitTopicMessageRequest, UpdateTopicRequest,
    };
    use crate::testutil::{account, key, topic, StubClient, StubQuery};

    fn context() -> ExecutionContext {
        ExecutionContext::new(ExecutionMode::Autonomous, Arc::new(StubQuery::default()))
    }

    fn client() -> StubClient {
        StubClient::with_operator(account("0.0.2"), key("aa"))
    }

    #[tokio::test]
    async fn create_without_keys_stays_keyless() {
        let raw = CreateTopicRequest::default();
        let params = normalise_create_topic(&raw, &context(), &client()).await.unwrap();

        assert!(params.admin_key.is_none());
        assert!(params.submit_key.is_none());
        assert!(params.memo.is_none());
    }

    #[tokio::test]
    async fn create_with_submit_key_true_uses_default_key() {
        let raw = CreateTopicRequest {
            topic_memo: Some("updates".to_string()),
            admin_key: None,
            submit_key: Some(KeyInput::Flag(true)),
        };
        let params = normalise_create_topic(&raw, &context(), &client()).await.unwrap();

        assert_eq!(params.submit_key, Some(key("aa")));
        assert!(params.admin_key.is_none());
    }

    #[tokio::test]
    async fn update_collects_topic_id_and_key_violations() {
        let raw = UpdateTopicRequest {
            topic_id: "nope".to_string(),
            topic_memo: None,
            admin_key: None,
            submit_key: Some(KeyInput::Key("zz-not-hex".to_string())),
        };

        let error = normalise_update_topic(&raw, &context(), &client()).await.unwrap_err();
        let message = error.to_string();
        assert!(message.contains("Field \"topicId\""));
        assert!(message.contains("Field \"submitKey\""));
    }

    #[tokio::test]
    async fn update_passes_through_touched_fields_only() {
        let raw = UpdateTopicRequest {
            topic_id: "0.0.7777".to_string(),
            topic_memo: None,
            admin_key: None,
            submit_key: Some(KeyInput::Flag(true)),
        };

        let params = normalise_update_topic(&raw, &context(), &client()).await.unwrap();
        assert_eq!(params.topic_id, topic("0.0.7777"));
        assert!(params.memo.is_none());
        assert!(params.admin_key.is_none());
        assert_eq!(params.submit_key, Some(key("aa")));
    }

    #[test]
    fn submit_message_requires_content() {
        let raw = SubmitTopicMessageRequest {
            topic_id: "0.0.7777".to_string(),
            message: String::new(),
        };
        let error = normalise_submit_topic_message(&raw).unwrap_err();
        assert!(error.to_string().contains("Field \"message\""));
    }

    #[test]
    fn submit_message_carries_utf8_bytes() {
        let raw = SubmitTopicMessageRequest {
            topic_id: "0.0.7777".to_string(),
            message: "hello".to_string(),
        };
        let params = normalise_submit_topic_message(&raw).unwrap();
        assert_eq!(params.message, b"hello");
    }
}
