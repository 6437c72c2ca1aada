use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// All blockchains a payment session can settle on
pub enum Blockchain {
    #[serde(rename = "eth")]
    Ethereum,
    #[serde(rename = "polygon")]
    Polygon,
    #[serde(rename = "base")]
    Base,
    #[serde(rename = "arb")]
    ArbitrumOne,
    #[serde(rename = "linea")]
    Linea,
    #[serde(rename = "op")]
    Optimism,
    #[serde(rename = "avaxc")]
    AvalancheC,
    #[serde(rename = "tron")]
    Tron,
}

impl Blockchain {
    /// EIP-155 chain id, `None` for non-EVM chains.
    pub fn evm_chain_id(self) -> Option<u64> {
        match self {
            Blockchain::Ethereum => Some(1),
            Blockchain::Polygon => Some(137),
            Blockchain::Base => Some(8453),
            Blockchain::ArbitrumOne => Some(42161),
            Blockchain::Linea => Some(59144),
            Blockchain::Optimism => Some(10),
            Blockchain::AvalancheC => Some(43114),
            Blockchain::Tron => None,
        }
    }
}

impl std::fmt::Display for Blockchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Blockchain::Ethereum => "Ethereum",
            Blockchain::Polygon => "Polygon",
            Blockchain::Base => "Base",
            Blockchain::ArbitrumOne => "Arbitrum One",
            Blockchain::Linea => "Linea",
            Blockchain::Optimism => "Optimism",
            Blockchain::AvalancheC => "Avalanche C-Chain",
            Blockchain::Tron => "Tron",
        };
        f.write_str(name)
    }
}
