//! Runtime configuration.
//!
//! Defaults are overridden by environment variables:
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `DAO_FACTORY_ACCOUNT_ID` | `account_id` | `factory.test` |
//! | `DAO_FACTORY_BUFFER_SIZE` | `buffer_size` | `32` |
//! | `DAO_FACTORY_PAYLOAD_PATH` | `payload_path` | unset |

use crate::model::{AccountId, Payload};
use std::path::PathBuf;
use thiserror::Error;

pub const ACCOUNT_ID_VAR: &str = "DAO_FACTORY_ACCOUNT_ID";
pub const BUFFER_SIZE_VAR: &str = "DAO_FACTORY_BUFFER_SIZE";
pub const PAYLOAD_PATH_VAR: &str = "DAO_FACTORY_PAYLOAD_PATH";

const DEFAULT_ACCOUNT_ID: &str = "factory.test";
const DEFAULT_BUFFER_SIZE: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },

    #[error("No payload path configured (set {PAYLOAD_PATH_VAR})")]
    MissingPayload,

    #[error("Failed to read payload {path}: {source}")]
    PayloadRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryConfig {
    /// The factory's own address.
    pub account_id: AccountId,
    /// Capacity of the actor's request channel.
    pub buffer_size: usize,
    /// File holding the code deployed to every child.
    pub payload_path: Option<PathBuf>,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            account_id: AccountId::parse(DEFAULT_ACCOUNT_ID)
                .unwrap_or_else(|_| unreachable!("default factory account id is valid")),
            buffer_size: DEFAULT_BUFFER_SIZE,
            payload_path: None,
        }
    }
}

impl FactoryConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(account_id) = lookup(ACCOUNT_ID_VAR) {
            config.account_id = AccountId::parse(account_id).map_err(|e| ConfigError::InvalidValue {
                var: ACCOUNT_ID_VAR,
                reason: e.to_string(),
            })?;
        }

        if let Some(buffer_size) = lookup(BUFFER_SIZE_VAR) {
            config.buffer_size = match buffer_size.parse::<usize>() {
                Ok(0) => {
                    return Err(ConfigError::InvalidValue {
                        var: BUFFER_SIZE_VAR,
                        reason: "must be greater than zero".to_string(),
                    })
                }
                Ok(size) => size,
                Err(e) => {
                    return Err(ConfigError::InvalidValue {
                        var: BUFFER_SIZE_VAR,
                        reason: e.to_string(),
                    })
                }
            };
        }

        if let Some(path) = lookup(PAYLOAD_PATH_VAR) {
            config.payload_path = Some(PathBuf::from(path));
        }

        Ok(config)
    }

    /// Reads the configured payload file.
    pub fn load_payload(&self) -> Result<Payload, ConfigError> {
        let path = self.payload_path.as_ref().ok_or(ConfigError::MissingPayload)?;
        let bytes = std::fs::read(path).map_err(|source| ConfigError::PayloadRead {
            path: path.clone(),
            source,
        })?;
        Ok(Payload::from_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn defaults_without_overrides() {
        let config = FactoryConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, FactoryConfig::default());
        assert_eq!(config.account_id.as_str(), "factory.test");
        assert_eq!(config.buffer_size, 32);
    }

    #[test]
    fn applies_overrides() {
        let config = FactoryConfig::from_lookup(lookup(&[
            (ACCOUNT_ID_VAR, "daos.near"),
            (BUFFER_SIZE_VAR, "8"),
            (PAYLOAD_PATH_VAR, "/tmp/dao.wasm"),
        ]))
        .unwrap();

        assert_eq!(config.account_id.as_str(), "daos.near");
        assert_eq!(config.buffer_size, 8);
        assert_eq!(config.payload_path, Some(PathBuf::from("/tmp/dao.wasm")));
    }

    #[test]
    fn rejects_bad_values() {
        let err = FactoryConfig::from_lookup(lookup(&[(ACCOUNT_ID_VAR, "Bad Id")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: ACCOUNT_ID_VAR, .. }));

        let err = FactoryConfig::from_lookup(lookup(&[(BUFFER_SIZE_VAR, "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: BUFFER_SIZE_VAR, .. }));

        let err = FactoryConfig::from_lookup(lookup(&[(BUFFER_SIZE_VAR, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { var: BUFFER_SIZE_VAR, .. }));
    }

    #[test]
    fn load_payload_requires_path() {
        let config = FactoryConfig::default();
        assert!(matches!(config.load_payload(), Err(ConfigError::MissingPayload)));
    }

    #[test]
    fn load_payload_reads_configured_file() {
        let path = std::env::temp_dir().join(format!("dao-factory-{}.wasm", std::process::id()));
        std::fs::write(&path, b"\0asm\x01\0\0\0").unwrap();
        let config = FactoryConfig {
            payload_path: Some(path.clone()),
            ..FactoryConfig::default()
        };

        let payload = config.load_payload().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(payload.as_bytes(), b"\0asm\x01\0\0\0");
    }

    #[test]
    fn load_payload_reports_missing_file() {
        let config = FactoryConfig {
            payload_path: Some(PathBuf::from("/definitely/not/here.wasm")),
            ..FactoryConfig::default()
        };
        assert!(matches!(config.load_payload(), Err(ConfigError::PayloadRead { .. })));
    }
}
