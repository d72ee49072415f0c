//! Public keys and the tri-state key parameter.
//!
//! Callers describe key fields with a boolean-or-string value: `true` means
//! "use my default key", a string is explicit key material, and `false` or
//! omission both mean "leave the field alone". [`KeySpec`] makes that rule a
//! tagged union resolved in exactly one place instead of truthiness checks
//! scattered across call sites.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// DER prefix mirror nodes emit in front of a raw ed25519 public key.
const ED25519_DER_PREFIX: &str = "302a300506032b6570032100";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    Ed25519,
    EcdsaSecp256k1,
}

/// Validated public key material, normalized to lowercase hex.
///
/// Authorization compares keys in this raw string form, so normalization at
/// parse time is what makes two renderings of the same key equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicKey {
    hex: String,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid public key `{input}`: {reason}")]
pub struct KeyError {
    pub input: String,
    pub reason: String,
}

impl PublicKey {
    pub fn kind(&self) -> KeyKind {
        if self.hex.len() == 64 {
            KeyKind::Ed25519
        } else {
            KeyKind::EcdsaSecp256k1
        }
    }

    /// Raw lowercase hex form, the comparison key for authorization checks.
    pub fn as_hex(&self) -> &str {
        &self.hex
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason: &str| KeyError { input: s.to_string(), reason: reason.to_string() };

        let mut digits = s.trim().to_ascii_lowercase();
        if let Some(stripped) = digits.strip_prefix("0x") {
            digits = stripped.to_string();
        }
        if let Some(stripped) = digits.strip_prefix(ED25519_DER_PREFIX) {
            digits = stripped.to_string();
        }

        if digits.is_empty() {
            return Err(err("empty key material"));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err("not valid hex"));
        }
        match digits.len() {
            // raw ed25519
            64 => {}
            // compressed secp256k1, leading 02/03
            66 if digits.starts_with("02") || digits.starts_with("03") => {}
            _ => return Err(err("expected a 32-byte ed25519 or compressed ECDSA key")),
        }

        Ok(Self { hex: digits })
    }
}

impl TryFrom<String> for PublicKey {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PublicKey> for String {
    fn from(value: PublicKey) -> Self {
        value.hex
    }
}

/// Raw wire form of a key field: JSON boolean or string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyInput {
    Flag(bool),
    Key(String),
}

/// Tri-state key parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeySpec {
    /// Field not touched; never appears in normalized output.
    Unset,
    /// Resolve to the caller's default public key.
    UseDefault,
    /// Explicit key material; must parse as a [`PublicKey`].
    Explicit(String),
}

impl KeySpec {
    /// The one place the boolean-or-string-or-absent rule is interpreted.
    /// `false` and omission are both `Unset`.
    pub fn from_input(input: Option<&KeyInput>) -> Self {
        match input {
            None | Some(KeyInput::Flag(false)) => Self::Unset,
            Some(KeyInput::Flag(true)) => Self::UseDefault,
            Some(KeyInput::Key(key)) => Self::Explicit(key.clone()),
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

/// Named key slots a ledger entity can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCategory {
    Admin,
    Kyc,
    Freeze,
    Wipe,
    Supply,
    Pause,
    FeeSchedule,
    Metadata,
    Submit,
}

impl KeyCategory {
    /// Caller-facing field name, used verbatim in error messages.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Admin => "adminKey",
            Self::Kyc => "kycKey",
            Self::Freeze => "freezeKey",
            Self::Wipe => "wipeKey",
            Self::Supply => "supplyKey",
            Self::Pause => "pauseKey",
            Self::FeeSchedule => "feeScheduleKey",
            Self::Metadata => "metadataKey",
            Self::Submit => "submitKey",
        }
    }
}
