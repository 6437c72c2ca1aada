//! Configuration module for paycard.
//!
//! Handles loading the invoice and host settings from a TOML file plus
//! CLI overrides.

pub mod file;

use crate::config::file::FileConfig;
use paycard_core::controller::SessionSettings;
use paycard_sdk::objects::SessionParams;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Loaded configuration result containing all parts.
pub struct LoadedConfig {
    pub params: SessionParams,
    pub settings: SessionSettings,
    pub store_path: PathBuf,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    order_id_override: Option<String>,
    store_override: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(
        config_path: impl AsRef<Path>,
        order_id_override: Option<String>,
        store_override: Option<PathBuf>,
    ) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            order_id_override,
            store_override,
        }
    }

    /// Read, validate and build the configuration.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        self.load_str(&config_content, OffsetDateTime::now_utc())
    }

    /// Reload the configuration (used during SIGHUP). The result describes a
    /// new invoice that replaces the running session.
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    fn load_str(&self, content: &str, now: OffsetDateTime) -> Result<LoadedConfig, ConfigError> {
        let mut file_config: FileConfig = toml::from_str(content)?;

        // Apply CLI overrides
        if let Some(order_id) = &self.order_id_override {
            file_config.session.order_id = Some(order_id.clone());
        }
        if let Some(path) = &self.store_override {
            file_config.store.path = path.clone();
        }

        self.validate(&file_config)?;
        self.build_loaded_config(file_config, now)
    }

    fn validate(&self, config: &FileConfig) -> Result<(), ConfigError> {
        if config.session.pay_address.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "session.pay_address must not be empty".to_string(),
            ));
        }
        if config.session.coin.bridging && !config.session.coin.is_bridgeable() {
            tracing::warn!(
                chain_id = ?config.session.coin.evm_chain_id(),
                currency = %config.session.coin.currency,
                "Bridging requested but the coin has no EVM chain id or bridge token, bridging disabled"
            );
        }
        Ok(())
    }

    fn build_loaded_config(
        &self,
        file_config: FileConfig,
        now: OffsetDateTime,
    ) -> Result<LoadedConfig, ConfigError> {
        let session = file_config.session;

        let time_of_generation = match session.time_of_generation_ms {
            Some(ms) => OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000)
                .map_err(|e| {
                    ConfigError::ValidationError(format!(
                        "session.time_of_generation_ms out of range: {e}"
                    ))
                })?,
            None => now,
        };
        let order_id = session
            .order_id
            .unwrap_or_else(|| Uuid::now_v7().to_string());

        Ok(LoadedConfig {
            params: SessionParams {
                order_id,
                time_of_generation,
                pay_address: session.pay_address,
                pay_amount: session.pay_amount,
                coin: session.coin,
                qr_code: session.qr_code,
            },
            settings: SessionSettings {
                integrator: file_config.integrator,
                wallet_link: file_config.wallet_link,
            },
            store_path: file_config.store.path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[session]
order_id = "from-file"
time_of_generation_ms = 1700000000123
pay_address = "0xABC"
pay_amount = "19.16"

[session.coin]
blockchain = "polygon"
currency = "USDC"
"#;

    fn now() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_800_000_000).unwrap()
    }

    #[test]
    fn test_builds_session_params() {
        let loader = ConfigLoader::new("unused.toml", None, None);
        let loaded = loader.load_str(CONFIG, now()).unwrap();
        assert_eq!(loaded.params.order_id, "from-file");
        assert_eq!(
            loaded.params.time_of_generation,
            OffsetDateTime::from_unix_timestamp_nanos(1_700_000_000_123_000_000).unwrap()
        );
        assert_eq!(loaded.params.pay_amount_text(), "19.16");
        assert_eq!(loaded.store_path, PathBuf::from("./paycard-store.json"));
    }

    #[test]
    fn test_cli_overrides_win() {
        let loader = ConfigLoader::new(
            "unused.toml",
            Some("from-cli".to_string()),
            Some(PathBuf::from("/var/lib/paycard.json")),
        );
        let loaded = loader.load_str(CONFIG, now()).unwrap();
        assert_eq!(loaded.params.order_id, "from-cli");
        assert_eq!(loaded.store_path, PathBuf::from("/var/lib/paycard.json"));
    }

    #[test]
    fn test_defaults_generation_time_and_order_id() {
        let minimal = r#"
[session]
pay_address = "0xABC"
pay_amount = 3

[session.coin]
blockchain = "base"
currency = "USDC"
"#;
        let loader = ConfigLoader::new("unused.toml", None, None);
        let loaded = loader.load_str(minimal, now()).unwrap();
        assert_eq!(loaded.params.time_of_generation, now());
        assert!(Uuid::parse_str(&loaded.params.order_id).is_ok());
    }

    #[test]
    fn test_rejects_empty_address() {
        let config = CONFIG.replace("0xABC", " ");
        let loader = ConfigLoader::new("unused.toml", None, None);
        assert!(matches!(
            loader.load_str(&config, now()),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
