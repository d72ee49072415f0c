//! Per-call execution context.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::entity::AccountId;
use crate::query::QueryService;

/// How a built transaction leaves the toolkit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// The client's operator signs and submits directly.
    Autonomous,
    /// Freeze and serialize only; an external signer submits later.
    ReturnBytes,
}

/// Everything an operation call carries besides its parameters: the
/// execution mode, the caller's pinned identity (if any) and the query
/// service handle. Supplied fresh per call, never mutated, never persisted.
#[derive(Clone)]
pub struct ExecutionContext {
    pub mode: ExecutionMode,
    pub account_id: Option<AccountId>,
    pub query: Arc<dyn QueryService>,
}

impl ExecutionContext {
    pub fn new(mode: ExecutionMode, query: Arc<dyn QueryService>) -> Self {
        Self { mode, account_id: None, query }
    }

    pub fn with_account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("mode", &self.mode)
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}
