//! Toolkit configuration.
//!
//! Loaded from a TOML file with `${VAR}` environment interpolation, then
//! overridden by `HEDERAKIT_*` environment variables. The network-name to
//! mirror-base-URL table lives here and is injected into query-service
//! construction, so test doubles can supply arbitrary mappings.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use crate::entity::AccountId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerNetwork {
    Mainnet,
    Testnet,
    Previewnet,
}

impl LedgerNetwork {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Previewnet => "previewnet",
        }
    }
}

impl std::str::FromStr for LedgerNetwork {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "previewnet" => Ok(Self::Previewnet),
            other => Err(ConfigError::Validation(format!(
                "unsupported network `{other}` (expected mainnet|testnet|previewnet)"
            ))),
        }
    }
}

/// Mirror-node endpoints keyed by network name.
#[derive(Clone, Debug)]
pub struct MirrorConfig {
    pub base_urls: HashMap<LedgerNetwork, String>,
    pub timeout_secs: u64,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        let mut base_urls = HashMap::new();
        base_urls.insert(
            LedgerNetwork::Mainnet,
            "https://mainnet-public.mirrornode.hedera.com".to_string(),
        );
        base_urls
            .insert(LedgerNetwork::Testnet, "https://testnet.mirrornode.hedera.com".to_string());
        base_urls.insert(
            LedgerNetwork::Previewnet,
            "https://previewnet.mirrornode.hedera.com".to_string(),
        );
        Self { base_urls, timeout_secs: 30 }
    }
}

impl MirrorConfig {
    pub fn base_url(&self, network: LedgerNetwork) -> Result<&str, ConfigError> {
        self.base_urls.get(&network).map(String::as_str).ok_or_else(|| {
            ConfigError::Validation(format!("no mirror base URL configured for {}", network.name()))
        })
    }
}

/// The signing identity an autonomous client operates as.
#[derive(Clone, Debug)]
pub struct OperatorConfig {
    pub account_id: AccountId,
    pub private_key: SecretString,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Clone, Debug)]
pub struct KitConfig {
    pub network: LedgerNetwork,
    pub mirror: MirrorConfig,
    pub operator: Option<OperatorConfig>,
    pub logging: LoggingConfig,
}

impl Default for KitConfig {
    fn default() -> Self {
        Self {
            network: LedgerNetwork::Testnet,
            mirror: MirrorConfig::default(),
            operator: None,
            logging: LoggingConfig { level: "info".to_string() },
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    network: Option<String>,
    mirror: Option<MirrorPatch>,
    operator: Option<OperatorPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct MirrorPatch {
    base_urls: Option<HashMap<String, String>>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct OperatorPatch {
    account_id: Option<String>,
    private_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
}

impl KitConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("hederakit.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(network) = patch.network {
            self.network = network.parse()?;
        }

        if let Some(mirror) = patch.mirror {
            if let Some(base_urls) = mirror.base_urls {
                for (network, url) in base_urls {
                    self.mirror.base_urls.insert(network.parse()?, url);
                }
            }
            if let Some(timeout_secs) = mirror.timeout_secs {
                self.mirror.timeout_secs = timeout_secs;
            }
        }

        if let Some(operator) = patch.operator {
            if let (Some(account_id), Some(operator_key_value)) =
                (operator.account_id, operator.private_key)
            {
                let account_id = account_id.parse().map_err(|_| {
                    ConfigError::Validation("operator.account_id must be a `shard.realm.num` id".to_string())
                })?;
                self.operator =
                    Some(OperatorConfig { account_id, private_key: operator_key_value.into() });
            } else {
                return Err(ConfigError::Validation(
                    "operator requires both account_id and private_key".to_string(),
                ));
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("HEDERAKIT_NETWORK") {
            self.network = value.parse()?;
        }
        if let Some(value) = read_env("HEDERAKIT_MIRROR_URL") {
            self.mirror.base_urls.insert(self.network, value);
        }
        if let Some(value) = read_env("HEDERAKIT_MIRROR_TIMEOUT_SECS") {
            self.mirror.timeout_secs = value.parse().map_err(|_| {
                ConfigError::InvalidEnvOverride {
                    key: "HEDERAKIT_MIRROR_TIMEOUT_SECS".to_string(),
                    value,
                }
            })?;
        }

        let operator_id = read_env("HEDERAKIT_OPERATOR_ID");
        let operator_key = read_env("HEDERAKIT_OPERATOR_KEY");
        match (operator_id, operator_key) {
            (Some(account_id), Some(operator_key_value)) => {
                let account_id = account_id.clone().parse().map_err(|_| {
                    ConfigError::InvalidEnvOverride {
                        key: "HEDERAKIT_OPERATOR_ID".to_string(),
                        value: account_id,
                    }
                })?;
                self.operator =
                    Some(OperatorConfig { account_id, private_key: operator_key_value.into() });
            }
            (None, None) => {}
            _ => {
                return Err(ConfigError::Validation(
                    "HEDERAKIT_OPERATOR_ID and HEDERAKIT_OPERATOR_KEY must be set together"
                        .to_string(),
                ));
            }
        }

        if let Some(value) = read_env("HEDERAKIT_LOG_LEVEL") {
            self.logging.level = value;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mirror.base_url(self.network)?;

        if self.mirror.timeout_secs == 0 || self.mirror.timeout_secs > 300 {
            return Err(ConfigError::Validation(
                "mirror.timeout_secs must be in range 1..=300".to_string(),
            ));
        }

        if let Some(operator) = &self.operator {
            if operator.private_key.expose_secret().trim().is_empty() {
                return Err(ConfigError::Validation(
                    "operator.private_key must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("hederakit.toml"), PathBuf::from("config/hederakit.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}
