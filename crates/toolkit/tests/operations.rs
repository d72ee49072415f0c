//! End-to-end operation scenarios against in-memory collaborators.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use base64::Engine;
use rust_decimal::Decimal;

use hederakit_core::{
    AccountId, AccountInfo, ContractInfo, EntityKeySnapshot, ExchangeRate, ExecutionContext,
    ExecutionMode, FrozenTransaction, KitError, LedgerClient, PendingAirdrop, PublicKey,
    QueryService, TinybarTransfer, TokenBalance, TokenId, TokenInfo, TokenType, TopicId,
    TopicInfo, TopicMessage, Transaction, TransactionBody, TransactionReceipt, TransactionRecord,
    STATUS_INVALID_TRANSACTION, STATUS_SUCCESS,
};
use hederakit_toolkit::normalise::{
    HbarTransferInput, TokenAssociationRequest, TransferHbarRequest, UpdateTokenRequest,
    UpdateTopicRequest,
};
use hederakit_toolkit::{dissociate_token, get_hbar_balance, transfer_hbar, update_token, update_topic};
use hederakit_toolkit::operations::AccountLookupRequest;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter("debug").with_test_writer().try_init();
}

fn account(id: &str) -> AccountId {
    id.parse().unwrap()
}

fn keymat(seed: &str) -> PublicKey {
    seed.chars().cycle().take(64).collect::<String>().parse().unwrap()
}

#[derive(Default)]
struct FakeQuery {
    accounts: HashMap<AccountId, AccountInfo>,
    tokens: HashMap<TokenId, TokenInfo>,
    topics: HashMap<TopicId, TopicInfo>,
}

impl FakeQuery {
    fn with_account(mut self, id: &str, signing_key: Option<PublicKey>) -> Self {
        let account_id = account(id);
        self.accounts.insert(
            account_id.clone(),
            AccountInfo {
                account_id,
                evm_address: None,
                key: signing_key,
                balance_tinybars: 5_000_000_000,
            },
        );
        self
    }

    fn with_token(mut self, id: &str, keys: EntityKeySnapshot) -> Self {
        let token_id: TokenId = id.parse().unwrap();
        self.tokens.insert(
            token_id.clone(),
            TokenInfo {
                token_id,
                name: "Demo".to_string(),
                symbol: "DMO".to_string(),
                token_type: TokenType::Fungible,
                decimals: 2,
                total_supply: 0,
                treasury_account_id: None,
                memo: None,
                keys,
            },
        );
        self
    }

    fn with_topic(mut self, id: &str, keys: EntityKeySnapshot) -> Self {
        let topic_id: TopicId = id.parse().unwrap();
        self.topics.insert(topic_id.clone(), TopicInfo { topic_id, memo: None, keys });
        self
    }
}

#[async_trait]
impl QueryService for FakeQuery {
    async fn get_account(&self, account_id: &AccountId) -> Result<AccountInfo, KitError> {
        self.accounts
            .get(account_id)
            .cloned()
            .ok_or_else(|| KitError::not_found(format!("account {account_id} was not found")))
    }

    async fn get_token_info(&self, token_id: &TokenId) -> Result<TokenInfo, KitError> {
        self.tokens
            .get(token_id)
            .cloned()
            .ok_or_else(|| KitError::not_found(format!("token {token_id} was not found")))
    }

    async fn get_topic_info(&self, topic_id: &TopicId) -> Result<TopicInfo, KitError> {
        self.topics
            .get(topic_id)
            .cloned()
            .ok_or_else(|| KitError::not_found(format!("topic {topic_id} was not found")))
    }

    async fn get_contract_info(&self, contract: &str) -> Result<ContractInfo, KitError> {
        Err(KitError::not_found(format!("contract {contract} was not found")))
    }

    async fn get_transaction_record(
        &self,
        transaction_id: &str,
    ) -> Result<TransactionRecord, KitError> {
        Err(KitError::not_found(format!("transaction {transaction_id} was not found")))
    }

    async fn get_exchange_rate(&self) -> Result<ExchangeRate, KitError> {
        Ok(ExchangeRate { cent_equivalent: 12, hbar_equivalent: 1, expiration_time: None })
    }

    async fn get_pending_airdrops(
        &self,
        _receiver_id: &AccountId,
    ) -> Result<Vec<PendingAirdrop>, KitError> {
        Ok(Vec::new())
    }

    async fn get_account_token_balances(
        &self,
        _account_id: &AccountId,
    ) -> Result<Vec<TokenBalance>, KitError> {
        Ok(Vec::new())
    }

    async fn get_topic_messages(
        &self,
        _topic_id: &TopicId,
        _limit: Option<u32>,
    ) -> Result<Vec<TopicMessage>, KitError> {
        Ok(Vec::new())
    }
}

struct FakeClient {
    operator_account: Option<AccountId>,
    operator_key: Option<PublicKey>,
    frozen: Mutex<Vec<Transaction>>,
    executed: Mutex<Vec<FrozenTransaction>>,
}

impl FakeClient {
    fn new(operator: &str, operator_key: PublicKey) -> Self {
        Self {
            operator_account: Some(account(operator)),
            operator_key: Some(operator_key),
            frozen: Mutex::new(Vec::new()),
            executed: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl LedgerClient for FakeClient {
    fn operator_account_id(&self) -> Option<AccountId> {
        self.operator_account.clone()
    }

    fn operator_public_key(&self) -> Option<PublicKey> {
        self.operator_key.clone()
    }

    async fn freeze(&self, transaction: Transaction) -> Result<FrozenTransaction, KitError> {
        self.frozen.lock().unwrap().push(transaction.clone());
        Ok(FrozenTransaction { transaction })
    }

    async fn execute(&self, frozen: &FrozenTransaction) -> Result<TransactionReceipt, KitError> {
        self.executed.lock().unwrap().push(frozen.clone());
        Ok(TransactionReceipt {
            status: STATUS_SUCCESS.to_string(),
            transaction_id: frozen.transaction.id.clone(),
            account_id: None,
            token_id: None,
            topic_id: None,
            contract_id: None,
            topic_sequence_number: None,
        })
    }
}

fn autonomous(query: FakeQuery) -> ExecutionContext {
    ExecutionContext::new(ExecutionMode::Autonomous, Arc::new(query))
}

#[tokio::test]
async fn transfer_hbar_produces_two_balanced_legs() {
    init_tracing();
    let client = FakeClient::new("0.0.2", keymat("aa"));
    let context = autonomous(FakeQuery::default());

    let result = transfer_hbar(
        &client,
        &context,
        TransferHbarRequest {
            transfers: vec![HbarTransferInput {
                account_id: "0.0.1002".to_string(),
                amount: Decimal::from(10),
            }],
            source_account_id: Some("0.0.1001".to_string()),
            transaction_memo: None,
        },
    )
    .await;

    assert!(!result.is_failure(), "unexpected failure: {}", result.human_message);
    assert_eq!(result.raw.status, STATUS_SUCCESS);
    assert!(result.raw.transaction_id.is_some());

    let frozen = client.frozen.lock().unwrap();
    match &frozen[0].body {
        TransactionBody::TransferHbar { transfers, .. } => {
            assert_eq!(
                transfers,
                &vec![
                    TinybarTransfer { account_id: account("0.0.1002"), amount: 1_000_000_000 },
                    TinybarTransfer { account_id: account("0.0.1001"), amount: -1_000_000_000 },
                ]
            );
        }
        other => panic!("unexpected body: {other:?}"),
    }
}

#[tokio::test]
async fn update_token_with_foreign_admin_key_is_denied() {
    init_tracing();
    let client = FakeClient::new("0.0.2", keymat("aa"));
    let query = FakeQuery::default().with_token(
        "0.0.4242",
        EntityKeySnapshot {
            admin_key: Some(keymat("bb")),
            kyc_key: Some(keymat("bb")),
            ..Default::default()
        },
    );
    let context = autonomous(query);

    let raw: UpdateTokenRequest =
        serde_json::from_str(r#"{"tokenId": "0.0.4242", "kycKey": true}"#).unwrap();
    let result = update_token(&client, &context, raw).await;

    assert!(result.is_failure());
    assert_eq!(result.raw.status, STATUS_INVALID_TRANSACTION);
    assert!(result.human_message.contains("You do not have permission"));
    assert!(result.human_message.contains("the adminKey does not match your public key"));
    // rejected before anything was built or frozen
    assert!(client.frozen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn update_topic_cannot_add_a_submit_key_the_topic_never_had() {
    init_tracing();
    let operator_key = keymat("aa");
    let client = FakeClient::new("0.0.2", operator_key.clone());
    let query = FakeQuery::default().with_topic(
        "0.0.7777",
        EntityKeySnapshot { admin_key: Some(operator_key), ..Default::default() },
    );
    let context = autonomous(query);

    let raw: UpdateTopicRequest =
        serde_json::from_str(r#"{"topicId": "0.0.7777", "submitKey": true}"#).unwrap();
    let result = update_topic(&client, &context, raw).await;

    assert!(result.is_failure());
    assert!(result
        .human_message
        .contains("Cannot update submitKey: topic was created without a submitKey"));
}

#[tokio::test]
async fn update_topic_in_return_bytes_mode_serializes_without_submitting() {
    init_tracing();
    let signer_key = keymat("cc");
    let client = FakeClient::new("0.0.2", keymat("aa"));
    let query = FakeQuery::default()
        .with_account("0.0.1001", Some(signer_key.clone()))
        .with_topic(
            "0.0.7777",
            EntityKeySnapshot {
                admin_key: Some(signer_key.clone()),
                submit_key: Some(keymat("dd")),
                ..Default::default()
            },
        );
    let context = ExecutionContext::new(ExecutionMode::ReturnBytes, Arc::new(query))
        .with_account(account("0.0.1001"));

    let raw: UpdateTopicRequest =
        serde_json::from_str(r#"{"topicId": "0.0.7777", "submitKey": true}"#).unwrap();
    let result = update_topic(&client, &context, raw).await;

    assert!(!result.is_failure(), "unexpected failure: {}", result.human_message);
    assert!(result.raw.transaction_id.is_none());
    assert!(result.human_message.contains("signature is required"));
    assert!(client.executed.lock().unwrap().is_empty());

    // the serialized payload is the frozen update, payed by the signer
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(result.raw.transaction_bytes.unwrap())
        .unwrap();
    let transaction: Transaction = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(transaction.id.payer, account("0.0.1001"));
    match transaction.body {
        TransactionBody::TopicUpdate { submit_key, admin_key, .. } => {
            // true resolved to the deferred signer's on-chain key
            assert_eq!(submit_key, Some(signer_key));
            assert!(admin_key.is_none());
        }
        other => panic!("unexpected body: {other:?}"),
    }
}

#[tokio::test]
async fn dissociate_with_empty_token_list_is_a_validation_failure() {
    init_tracing();
    let client = FakeClient::new("0.0.2", keymat("aa"));
    let context = autonomous(FakeQuery::default());

    let result = dissociate_token(
        &client,
        &context,
        TokenAssociationRequest { account_id: None, token_ids: vec![] },
    )
    .await;

    assert!(result.is_failure());
    assert_eq!(result.raw.status, STATUS_INVALID_TRANSACTION);
    assert!(result.human_message.starts_with("Failed to dissociate token: "));
    assert!(result.human_message.contains("Field \"tokenIds\""));
    assert!(client.frozen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn exact_boundary_amount_moves_one_tinybar() {
    init_tracing();
    let client = FakeClient::new("0.0.2", keymat("aa"));
    let context = autonomous(FakeQuery::default());

    let result = transfer_hbar(
        &client,
        &context,
        TransferHbarRequest {
            transfers: vec![HbarTransferInput {
                account_id: "0.0.1002".to_string(),
                amount: Decimal::from_str("0.00000001").unwrap(),
            }],
            source_account_id: None,
            transaction_memo: None,
        },
    )
    .await;

    assert!(!result.is_failure());
    let frozen = client.frozen.lock().unwrap();
    match &frozen[0].body {
        TransactionBody::TransferHbar { transfers, .. } => {
            assert_eq!(transfers[0].amount, 1);
            assert_eq!(transfers[1].amount, -1);
        }
        other => panic!("unexpected body: {other:?}"),
    }
}

#[tokio::test]
async fn balance_query_falls_back_to_the_operator_account() {
    init_tracing();
    let client = FakeClient::new("0.0.2", keymat("aa"));
    let query = FakeQuery::default().with_account("0.0.2", None);
    let context = autonomous(query);

    let result = get_hbar_balance(&client, &context, AccountLookupRequest::default()).await;

    assert!(!result.is_failure());
    let balance = result.raw.unwrap();
    assert_eq!(balance.account_id, "0.0.2");
    assert_eq!(balance.tinybars, 5_000_000_000);
    assert_eq!(balance.hbar, "50");
}

#[tokio::test]
async fn query_failures_use_the_same_envelope_discipline() {
    init_tracing();
    let client = FakeClient::new("0.0.2", keymat("aa"));
    let context = autonomous(FakeQuery::default());

    let result = get_hbar_balance(
        &client,
        &context,
        AccountLookupRequest { account_id: Some("0.0.9999".to_string()) },
    )
    .await;

    assert!(result.is_failure());
    assert!(result.human_message.starts_with("Failed to fetch HBAR balance: "));
    assert!(result.human_message.contains("was not found"));
}
