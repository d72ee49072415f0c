//! Read-only operation entry points.
//!
//! Thin passthroughs to the query service wrapped in the uniform envelope;
//! failures convert at this boundary exactly like mutations.

use serde::{Deserialize, Serialize};
use tracing::warn;

use hederakit_core::{
    from_smallest_units, AccountId, ContractInfo, ExchangeRate, ExecutionContext, KitError,
    LedgerClient, PendingAirdrop, QueryResult, TokenBalance, TokenId, TokenInfo, TopicId,
    TopicInfo, TopicMessage, TransactionRecord, HBAR_DECIMALS,
};

use crate::resolver;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountLookupRequest {
    #[serde(default)]
    pub account_id: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenLookupRequest {
    pub token_id: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicLookupRequest {
    pub topic_id: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicMessagesRequest {
    pub topic_id: String,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractLookupRequest {
    pub contract_id: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLookupRequest {
    pub transaction_id: String,
}

/// Balance payload with both the integer and display renderings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HbarBalance {
    pub account_id: String,
    pub tinybars: i64,
    pub hbar: String,
}

fn resolve_lookup_account(
    raw: &AccountLookupRequest,
    context: &ExecutionContext,
    client: &dyn LedgerClient,
) -> Result<AccountId, KitError> {
    match &raw.account_id {
        Some(provided) => provided.parse::<AccountId>().map_err(Into::into),
        None => resolver::default_account(context, client),
    }
}

pub async fn get_hbar_balance(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: AccountLookupRequest,
) -> QueryResult<HbarBalance> {
    let lookup = async {
        let account_id = resolve_lookup_account(&raw, context, client)?;
        let info = context.query.get_account(&account_id).await?;
        Ok::<_, KitError>(HbarBalance {
            account_id: account_id.to_string(),
            tinybars: info.balance_tinybars,
            hbar: from_smallest_units(info.balance_tinybars, HBAR_DECIMALS).to_string(),
        })
    };

    match lookup.await {
        Ok(balance) => {
            let message =
                format!("Account {} holds {} HBAR", balance.account_id, balance.hbar);
            QueryResult::success(balance, message)
        }
        Err(error) => {
            warn!(%error, "get_hbar_balance failed");
            QueryResult::failure("Failed to fetch HBAR balance", &error)
        }
    }
}

pub async fn get_account_token_balances(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: AccountLookupRequest,
) -> QueryResult<Vec<TokenBalance>> {
    let lookup = async {
        let account_id = resolve_lookup_account(&raw, context, client)?;
        let balances = context.query.get_account_token_balances(&account_id).await?;
        Ok::<_, KitError>((account_id, balances))
    };

    match lookup.await {
        Ok((account_id, balances)) => {
            let message =
                format!("Account {account_id} holds {} token balance(s)", balances.len());
            QueryResult::success(balances, message)
        }
        Err(error) => {
            warn!(%error, "get_account_token_balances failed");
            QueryResult::failure("Failed to fetch token balances", &error)
        }
    }
}

pub async fn get_token_info(
    context: &ExecutionContext,
    raw: TokenLookupRequest,
) -> QueryResult<TokenInfo> {
    let lookup = async {
        let token_id: TokenId = raw.token_id.parse()?;
        context.query.get_token_info(&token_id).await
    };

    match lookup.await {
        Ok(info) => {
            let message = format!("Token {} ({}) fetched", info.token_id, info.symbol);
            QueryResult::success(info, message)
        }
        Err(error) => {
            warn!(%error, "get_token_info failed");
            QueryResult::failure("Failed to fetch token info", &error)
        }
    }
}

pub async fn get_topic_info(
    context: &ExecutionContext,
    raw: TopicLookupRequest,
) -> QueryResult<TopicInfo> {
    let lookup = async {
        let topic_id: TopicId = raw.topic_id.parse()?;
        context.query.get_topic_info(&topic_id).await
    };

    match lookup.await {
        Ok(info) => {
            let message = format!("Topic {} fetched", info.topic_id);
            QueryResult::success(info, message)
        }
        Err(error) => {
            warn!(%error, "get_topic_info failed");
            QueryResult::failure("Failed to fetch topic info", &error)
        }
    }
}

pub async fn get_topic_messages(
    context: &ExecutionContext,
    raw: TopicMessagesRequest,
) -> QueryResult<Vec<TopicMessage>> {
    let lookup = async {
        let topic_id: TopicId = raw.topic_id.parse()?;
        let messages = context.query.get_topic_messages(&topic_id, raw.limit).await?;
        Ok::<_, KitError>((topic_id, messages))
    };

    match lookup.await {
        Ok((topic_id, messages)) => {
            let message = format!("Fetched {} message(s) from topic {topic_id}", messages.len());
            QueryResult::success(messages, message)
        }
        Err(error) => {
            warn!(%error, "get_topic_messages failed");
            QueryResult::failure("Failed to fetch topic messages", &error)
        }
    }
}

pub async fn get_contract_info(
    context: &ExecutionContext,
    raw: ContractLookupRequest,
) -> QueryResult<ContractInfo> {
    match context.query.get_contract_info(&raw.contract_id).await {
        Ok(info) => {
            let message = format!("Contract {} fetched", info.contract_id);
            QueryResult::success(info, message)
        }
        Err(error) => {
            warn!(%error, "get_contract_info failed");
            QueryResult::failure("Failed to fetch contract info", &error)
        }
    }
}

pub async fn get_exchange_rate(context: &ExecutionContext) -> QueryResult<ExchangeRate> {
    match context.query.get_exchange_rate().await {
        Ok(rate) => {
            let message = format!(
                "Current exchange rate: {} HBAR = {} cents",
                rate.hbar_equivalent, rate.cent_equivalent
            );
            QueryResult::success(rate, message)
        }
        Err(error) => {
            warn!(%error, "get_exchange_rate failed");
            QueryResult::failure("Failed to fetch exchange rate", &error)
        }
    }
}

pub async fn get_transaction_record(
    context: &ExecutionContext,
    raw: TransactionLookupRequest,
) -> QueryResult<TransactionRecord> {
    match context.query.get_transaction_record(&raw.transaction_id).await {
        Ok(record) => {
            let message =
                format!("Transaction {} settled with {}", record.transaction_id, record.result);
            QueryResult::success(record, message)
        }
        Err(error) => {
            warn!(%error, "get_transaction_record failed");
            QueryResult::failure("Failed to fetch transaction record", &error)
        }
    }
}

pub async fn get_pending_airdrops(
    client: &dyn LedgerClient,
    context: &ExecutionContext,
    raw: AccountLookupRequest,
) -> QueryResult<Vec<PendingAirdrop>> {
    let lookup = async {
        let account_id = resolve_lookup_account(&raw, context, client)?;
        let airdrops = context.query.get_pending_airdrops(&account_id).await?;
        Ok::<_, KitError>((account_id, airdrops))
    };

    match lookup.await {
        Ok((account_id, airdrops)) => {
            let message =
                format!("Account {account_id} has {} pending airdrop(s)", airdrops.len());
            QueryResult::success(airdrops, message)
        }
        Err(error) => {
            warn!(%error, "get_pending_airdrops failed");
            QueryResult::failure("Failed to fetch pending airdrops", &error)
        }
    }
}
