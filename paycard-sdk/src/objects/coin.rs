//! Coin descriptor supplied by the host for the coin the payer selected.

use serde::{Deserialize, Serialize};

use super::blockchains::Blockchain;

/// The coin a payment session is denominated in.
///
/// `bridging` is the host's capability flag for the in-session bridging
/// widget. A descriptor is only bridgeable when the flag is set, an EVM chain
/// id is known and a bridge token address is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinDescriptor {
    /// Ticker symbol, e.g. `USDC`.
    pub currency: String,
    /// EIP-155 chain id. Takes precedence over the one implied by `blockchain`.
    #[serde(default)]
    pub chain_id: Option<u64>,
    /// Well-known network, used for display and as a chain id fallback.
    #[serde(default)]
    pub blockchain: Option<Blockchain>,
    /// Token contract address used by the bridging widget.
    #[serde(default)]
    pub bridge_token: Option<String>,
    /// Icon shown next to the coin.
    #[serde(default)]
    pub web_image: Option<String>,
    #[serde(default)]
    pub bridging: bool,
}

impl CoinDescriptor {
    /// The EVM chain id of the coin, if any.
    pub fn evm_chain_id(&self) -> Option<u64> {
        self.chain_id
            .or_else(|| self.blockchain.and_then(Blockchain::evm_chain_id))
    }

    /// Returns `true` if the bridging widget may be offered for this coin.
    pub fn is_bridgeable(&self) -> bool {
        self.bridging && self.evm_chain_id().is_some() && self.bridge_token.is_some()
    }
}
