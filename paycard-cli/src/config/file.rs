//! TOML file configuration structures.
//!
//! These structs directly map to the `paycard.toml` file format.

use paycard_sdk::deeplink::WalletLinkConfig;
use paycard_sdk::objects::{CoinDescriptor, IntegratorIdentity};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    pub session: SessionConfig,
    #[serde(default)]
    pub integrator: IntegratorIdentity,
    #[serde(default)]
    pub wallet_link: WalletLinkConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// The invoice to show.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Order identifier. A fresh one is generated when absent.
    #[serde(default)]
    pub order_id: Option<String>,
    /// Invoice generation time in unix milliseconds. Defaults to load time.
    #[serde(default)]
    pub time_of_generation_ms: Option<i64>,
    pub pay_address: String,
    pub pay_amount: Decimal,
    /// QR code image reference, shown as-is.
    #[serde(default)]
    pub qr_code: Option<String>,
    pub coin: CoinDescriptor,
}

/// Where the current order identifier is persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./paycard-store.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}
