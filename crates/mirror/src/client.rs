use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use hederakit_core::{
    AccountId, AccountInfo, ContractInfo, ExchangeRate, KitError, LedgerNetwork, MirrorConfig,
    PendingAirdrop, QueryService, TokenBalance, TokenId, TokenInfo, TopicId, TopicInfo,
    TopicMessage, TransactionRecord,
};

use crate::dto;

/// Read-only client for one mirror-node base URL.
#[derive(Clone, Debug)]
pub struct MirrorClient {
    http: reqwest::Client,
    base_url: String,
}

impl MirrorClient {
    /// Resolve the base URL for `network` from the injected configuration.
    pub fn new(network: LedgerNetwork, config: &MirrorConfig) -> Result<Self, KitError> {
        let base_url = config
            .base_url(network)
            .map_err(|e| KitError::validation(e.to_string()))?
            .trim_end_matches('/')
            .to_string();

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| KitError::network(format!("could not build mirror client: {e}")))?;

        Ok(Self { http, base_url })
    }

    /// Point directly at a base URL, bypassing the network table.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, KitError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "mirror lookup");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| KitError::network(format!("mirror request failed: {e}")))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(KitError::not_found(format!("no entity found at {path}")));
        }
        if !response.status().is_success() {
            return Err(KitError::network(format!(
                "mirror request to {path} returned {}",
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| KitError::network(format!("could not decode mirror response: {e}")))
    }
}

/// Rewrite a not-found error with an entity-specific message, leave
/// everything else untouched.
fn describe_not_found(error: KitError, what: impl FnOnce() -> String) -> KitError {
    match error {
        KitError::NotFound(_) => KitError::not_found(what()),
        other => other,
    }
}

/// Mirror transaction paths use `payer-seconds-nanos` where the rest of the
/// system writes `payer@seconds.nanos`.
fn mirror_transaction_id(transaction_id: &str) -> String {
    match transaction_id.split_once('@') {
        Some((payer, stamp)) => format!("{payer}-{}", stamp.replace('.', "-")),
        None => transaction_id.to_string(),
    }
}

#[async_trait]
impl QueryService for MirrorClient {
    async fn get_account(&self, account_id: &AccountId) -> Result<AccountInfo, KitError> {
        let raw: dto::RawAccount = self
            .get_json(&format!("/api/v1/accounts/{account_id}"))
            .await
            .map_err(|e| describe_not_found(e, || format!("account {account_id} was not found")))?;
        raw.into_info()
    }

    async fn get_token_info(&self, token_id: &TokenId) -> Result<TokenInfo, KitError> {
        let raw: dto::RawToken = self
            .get_json(&format!("/api/v1/tokens/{token_id}"))
            .await
            .map_err(|e| describe_not_found(e, || format!("token {token_id} was not found")))?;
        raw.into_info()
    }

    async fn get_topic_info(&self, topic_id: &TopicId) -> Result<TopicInfo, KitError> {
        let raw: dto::RawTopic = self
            .get_json(&format!("/api/v1/topics/{topic_id}"))
            .await
            .map_err(|e| describe_not_found(e, || format!("topic {topic_id} was not found")))?;
        raw.into_info()
    }

    async fn get_contract_info(&self, contract: &str) -> Result<ContractInfo, KitError> {
        let raw: dto::RawContract = self
            .get_json(&format!("/api/v1/contracts/{contract}"))
            .await
            .map_err(|e| describe_not_found(e, || format!("contract {contract} was not found")))?;
        raw.into_info()
    }

    async fn get_transaction_record(
        &self,
        transaction_id: &str,
    ) -> Result<TransactionRecord, KitError> {
        let path = format!("/api/v1/transactions/{}", mirror_transaction_id(transaction_id));
        let page: dto::RawTransactionPage = self.get_json(&path).await.map_err(|e| {
            describe_not_found(e, || format!("transaction {transaction_id} was not found"))
        })?;

        page.transactions
            .into_iter()
            .next()
            .map(dto::RawTransaction::into_record)
            .ok_or_else(|| KitError::not_found(format!("transaction {transaction_id} was not found")))
    }

    async fn get_exchange_rate(&self) -> Result<ExchangeRate, KitError> {
        let raw: dto::RawExchangeRateEnvelope =
            self.get_json("/api/v1/network/exchangerate").await?;
        Ok(raw.into_rate())
    }

    async fn get_pending_airdrops(
        &self,
        receiver_id: &AccountId,
    ) -> Result<Vec<PendingAirdrop>, KitError> {
        let page: dto::RawAirdropPage = self
            .get_json(&format!("/api/v1/accounts/{receiver_id}/airdrops/pending"))
            .await
            .map_err(|e| {
                describe_not_found(e, || format!("account {receiver_id} was not found"))
            })?;
        page.airdrops.into_iter().map(dto::RawAirdrop::into_pending).collect()
    }

    async fn get_account_token_balances(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<TokenBalance>, KitError> {
        let page: dto::RawTokenBalancePage = self
            .get_json(&format!("/api/v1/accounts/{account_id}/tokens"))
            .await
            .map_err(|e| describe_not_found(e, || format!("account {account_id} was not found")))?;
        page.tokens.into_iter().map(dto::RawTokenBalance::into_balance).collect()
    }

    async fn get_topic_messages(
        &self,
        topic_id: &TopicId,
        limit: Option<u32>,
    ) -> Result<Vec<TopicMessage>, KitError> {
        let mut path = format!("/api/v1/topics/{topic_id}/messages");
        if let Some(limit) = limit {
            path.push_str(&format!("?limit={limit}"));
        }

        let page: dto::RawTopicMessagePage = self
            .get_json(&path)
            .await
            .map_err(|e| describe_not_found(e, || format!("topic {topic_id} was not found")))?;
        Ok(page.messages.into_iter().map(dto::RawTopicMessage::into_message).collect())
    }
}
