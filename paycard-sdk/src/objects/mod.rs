pub mod blockchains;
pub mod bridge;
pub mod coin;
pub mod session;

pub use blockchains::Blockchain;
pub use bridge::{
    BridgeAssetRef, BridgeDestination, BridgeWidgetConfig, ChainType, DisabledUi, HiddenUi,
    IntegratorIdentity, WidgetSubvariant,
};
pub use coin::CoinDescriptor;
pub use session::SessionParams;
