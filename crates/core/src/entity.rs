//! Ledger entity identifiers.
//!
//! Accounts, tokens, topics and contracts are all addressed by a
//! `shard.realm.num` triple. Each gets its own newtype so an account id can
//! never be passed where a token id is expected; the wire form is always the
//! dotted string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid entity id `{input}`: expected `shard.realm.num`")]
pub struct EntityIdError {
    pub input: String,
}

fn parse_triple(input: &str) -> Result<(u64, u64, u64), EntityIdError> {
    let mut parts = input.split('.');
    let err = || EntityIdError { input: input.to_string() };

    let shard = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
    let realm = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
    let num = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;

    if parts.next().is_some() {
        return Err(err());
    }

    Ok((shard, realm, num))
}

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name {
            pub shard: u64,
            pub realm: u64,
            pub num: u64,
        }

        impl $name {
            pub fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self { shard, realm, num }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
            }
        }

        impl FromStr for $name {
            type Err = EntityIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let (shard, realm, num) = parse_triple(s)?;
                Ok(Self { shard, realm, num })
            }
        }

        impl TryFrom<String> for $name {
            type Error = EntityIdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.to_string()
            }
        }
    };
}

entity_id! {
    /// A ledger account, e.g. `0.0.1001`.
    AccountId
}
entity_id! {
    /// A fungible or non-fungible token collection.
    TokenId
}
entity_id! {
    /// A consensus topic.
    TopicId
}
entity_id! {
    /// A deployed smart contract.
    ContractId
}

/// A 20-byte EVM address, rendered as lowercase `0x`-prefixed hex.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EvmAddress(pub [u8; 20]);

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid EVM address `{input}`: expected 0x followed by 40 hex characters")]
pub struct EvmAddressError {
    pub input: String,
}

impl EvmAddress {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for EvmAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for EvmAddress {
    type Err = EvmAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || EvmAddressError { input: s.to_string() };
        let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).ok_or_else(err)?;
        let bytes = hex::decode(digits).map_err(|_| err())?;
        let bytes: [u8; 20] = bytes.try_into().map_err(|_| err())?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for EvmAddress {
    type Error = EvmAddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EvmAddress> for String {
    fn from(value: EvmAddress) -> Self {
        value.to_string()
    }
}
