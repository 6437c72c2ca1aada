//! External wallet deep link.
//!
//! The link is opaque to the session: it is assembled from the pay address and
//! amount and handed to the host, never validated or followed here.

use serde::{Deserialize, Serialize};

const DEFAULT_BASE: &str = "https://link.trustwallet.com/send";
const DEFAULT_ASSET: &str = "c195_tTR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";
const DEFAULT_MEMO: &str = "test";

/// Shape of the wallet "send" link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletLinkConfig {
    /// Scheme, host and path up to `send`.
    #[serde(default = "default_base")]
    pub base: String,
    /// Wallet-specific asset id of the payment coin.
    #[serde(default = "default_asset")]
    pub asset: String,
    #[serde(default = "default_memo")]
    pub memo: String,
}

fn default_base() -> String {
    DEFAULT_BASE.to_string()
}

fn default_asset() -> String {
    DEFAULT_ASSET.to_string()
}

fn default_memo() -> String {
    DEFAULT_MEMO.to_string()
}

impl Default for WalletLinkConfig {
    fn default() -> Self {
        Self {
            base: default_base(),
            asset: default_asset(),
            memo: default_memo(),
        }
    }
}

impl WalletLinkConfig {
    /// Build `<base>?asset=..&address=..&amount=..&memo=..`.
    pub fn send_link(&self, pay_address: &str, pay_amount: &str) -> String {
        format!(
            "{}?asset={}&address={}&amount={}&memo={}",
            self.base,
            urlencoding::encode(&self.asset),
            urlencoding::encode(pay_address),
            urlencoding::encode(pay_amount),
            urlencoding::encode(&self.memo),
        )
    }
}
