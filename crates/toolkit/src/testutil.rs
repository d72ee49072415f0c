//! In-memory fakes shared by the unit tests in this crate.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use hederakit_core::{
    AccountId, AccountInfo, ContractInfo, EvmAddress, ExchangeRate, FrozenTransaction, KitError,
    LedgerClient, PendingAirdrop, PublicKey, QueryService, TokenBalance, TokenId, TokenInfo,
    TopicId, TopicInfo, TopicMessage, Transaction, TransactionBody, TransactionReceipt,
    TransactionRecord, STATUS_SUCCESS,
};

pub(crate) fn account(id: &str) -> AccountId {
    id.parse().expect("test account id")
}

pub(crate) fn token(id: &str) -> TokenId {
    id.parse().expect("test token id")
}

pub(crate) fn topic(id: &str) -> TopicId {
    id.parse().expect("test topic id")
}

/// Deterministic ed25519-shaped key material from a short hex seed.
pub(crate) fn key(seed: &str) -> PublicKey {
    seed.chars()
        .cycle()
        .take(64)
        .collect::<String>()
        .parse()
        .expect("test key")
}

#[derive(Default)]
pub(crate) struct StubQuery {
    pub accounts: HashMap<AccountId, AccountInfo>,
    pub tokens: HashMap<TokenId, TokenInfo>,
    pub topics: HashMap<TopicId, TopicInfo>,
    pub contracts: HashMap<String, ContractInfo>,
}

impl StubQuery {
    pub fn with_account(mut self, account_id: AccountId, signing_key: Option<PublicKey>) -> Self {
        self.accounts.insert(
            account_id.clone(),
            AccountInfo { account_id, evm_address: None, key: signing_key, balance_tinybars: 0 },
        );
        self
    }

    pub fn with_token(mut self, info: TokenInfo) -> Self {
        self.tokens.insert(info.token_id.clone(), info);
        self
    }

    pub fn with_topic(mut self, info: TopicInfo) -> Self {
        self.topics.insert(info.topic_id.clone(), info);
        self
    }

    pub fn with_contract(mut self, lookup: &str, info: ContractInfo) -> Self {
        self.contracts.insert(lookup.to_string(), info);
        self
    }
}

#[async_trait]
impl QueryService for StubQuery {
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
        self.contracts
            .get(contract)
            .cloned()
            .ok_or_else(|| KitError::not_found(format!("contract {contract} was not found")))
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

/// Records what was frozen and executed; receipts carry a created-entity id
/// matching the transaction kind.
pub(crate) struct StubClient {
    operator_account: Option<AccountId>,
    operator_key: Option<PublicKey>,
    pub frozen: Mutex<Vec<Transaction>>,
    pub executed: Mutex<Vec<FrozenTransaction>>,
}

impl StubClient {
    pub fn with_operator(account_id: AccountId, operator_key: PublicKey) -> Self {
        Self {
            operator_account: Some(account_id),
            operator_key: Some(operator_key),
            frozen: Mutex::new(Vec::new()),
            executed: Mutex::new(Vec::new()),
        }
    }

    pub fn anonymous() -> Self {
        Self {
            operator_account: None,
            operator_key: None,
            frozen: Mutex::new(Vec::new()),
            executed: Mutex::new(Vec::new()),
        }
    }

    pub fn executed_count(&self) -> usize {
        self.executed.lock().unwrap().len()
    }
}

#[async_trait]
impl LedgerClient for StubClient {
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

        let mut receipt = TransactionReceipt {
            status: STATUS_SUCCESS.to_string(),
            transaction_id: frozen.transaction.id.clone(),
            account_id: None,
            token_id: None,
            topic_id: None,
            contract_id: None,
            topic_sequence_number: None,
        };

        match &frozen.transaction.body {
            TransactionBody::TokenCreate { .. } => receipt.token_id = Some(token("0.0.5005")),
            TransactionBody::TopicCreate { .. } => receipt.topic_id = Some(topic("0.0.7007")),
            TransactionBody::TopicMessageSubmit { .. } => receipt.topic_sequence_number = Some(1),
            _ => {}
        }

        Ok(receipt)
    }
}

pub(crate) fn evm(address: &str) -> EvmAddress {
    address.parse().expect("test evm address")
}
