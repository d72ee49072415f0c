//! Error taxonomy shared by every layer of the toolkit.
//!
//! Five categories, all recoverable: validation (bad parameter shape, caught
//! before any network call), resolution (no default account or key),
//! authorization (key mismatch or immutable entity), not-found (entity absent
//! per the query service) and network (a collaborator call failed). They all
//! converge on the same failure envelope at the operation boundary.

use std::fmt;

use thiserror::Error;

use crate::amount::AmountError;
use crate::entity::{EntityIdError, EvmAddressError};
use crate::key::KeyError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum KitError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Resolution(String),
    #[error("{0}")]
    Authorization(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Network(String),
}

impl KitError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn resolution(message: impl Into<String>) -> Self {
        Self::Resolution(message.into())
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }
}

impl From<EntityIdError> for KitError {
    fn from(value: EntityIdError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<EvmAddressError> for KitError {
    fn from(value: EvmAddressError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<KeyError> for KitError {
    fn from(value: KeyError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<AmountError> for KitError {
    fn from(value: AmountError) -> Self {
        Self::Validation(value.to_string())
    }
}

/// One field-level violation inside an aggregated validation failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field \"{}\" - {}", self.field, self.reason)
    }
}

/// Collect-then-report validation.
///
/// Normalizers push every violation they find instead of failing on the
/// first, so an agent caller sees all offending fields in one message and can
/// self-correct in a single retry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<FieldViolation>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, reason: impl fmt::Display) {
        self.violations.push(FieldViolation { field: field.into(), reason: reason.to_string() });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Ok when clean, otherwise one `KitError::Validation` enumerating every
    /// violation.
    pub fn into_result(self) -> Result<(), KitError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(KitError::Validation(self.to_string()))
        }
    }

    /// Like [`Self::into_result`], but yields `value` when clean.
    pub fn finish<T>(self, value: T) -> Result<T, KitError> {
        self.into_result().map(|_| value)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.violations.iter().map(|v| v.to_string()).collect();
        f.write_str(&rendered.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::{KitError, ValidationReport};

    #[test]
    fn empty_report_is_ok() {
        assert_eq!(ValidationReport::new().into_result(), Ok(()));
    }

    #[test]
    fn report_enumerates_every_field() {
        let mut report = ValidationReport::new();
        report.push("tokenId", "missing required value");
        report.push("transfers[1].amount", "Invalid transfer amount: -0.1");

        let error = report.into_result().expect_err("two violations");
        let message = error.to_string();
        assert!(message.contains("Field \"tokenId\" - missing required value"));
        assert!(message.contains("Field \"transfers[1].amount\" - Invalid transfer amount: -0.1"));
        assert!(matches!(error, KitError::Validation(_)));
    }

    #[test]
    fn finish_passes_value_through_when_clean() {
        let report = ValidationReport::new();
        assert_eq!(report.finish(42), Ok(42));
    }

    #[test]
    fn entity_id_errors_become_validation_errors() {
        let parse_err = "nope".parse::<crate::entity::AccountId>().unwrap_err();
        let kit: KitError = parse_err.into();
        assert!(matches!(kit, KitError::Validation(_)));
    }
}
