//! Gate in front of the external bridging widget.
//!
//! The widget configuration is derived from the live session parameters every
//! time it is requested and handed out as an immutable snapshot. Nothing here
//! is cached.

use paycard_sdk::objects::{
    BridgeAssetRef, BridgeDestination, BridgeWidgetConfig, ChainType, CoinDescriptor, DisabledUi,
    HiddenUi, IntegratorIdentity, SessionParams, WidgetSubvariant,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;
use tracing::debug;

/// Fixed power of ten used to scale pay amounts into minor units.
pub const MINOR_UNIT_DECIMALS: u32 = 6;

/// Errors that can occur while producing a widget configuration.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The amount is negative or too large for integer minor units.
    #[error("pay amount {0} cannot be expressed in minor units")]
    InvalidAmount(Decimal),

    /// The configuration was requested while the widget is hidden.
    #[error("bridge widget is hidden")]
    Hidden,

    /// The session's coin does not support bridging.
    #[error("bridging is not offered for this coin")]
    NotOffered,
}

/// `round(amount * 10^6)`, rounding halves away from zero.
pub fn to_minor_units(amount: Decimal) -> Result<u64, BridgeError> {
    if amount < Decimal::ZERO {
        return Err(BridgeError::InvalidAmount(amount));
    }
    amount
        .checked_mul(Decimal::from(10u64.pow(MINOR_UNIT_DECIMALS)))
        .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_u64())
        .ok_or(BridgeError::InvalidAmount(amount))
}

/// Derive the asset reference for the current session parameters.
pub fn derive_asset_ref(params: &SessionParams) -> Result<BridgeAssetRef, BridgeError> {
    let coin = &params.coin;
    let (Some(chain_id), Some(token_address)) =
        (coin.evm_chain_id(), coin.bridge_token.as_ref())
    else {
        return Err(BridgeError::NotOffered);
    };
    let symbol = coin.currency.clone();

    Ok(BridgeAssetRef {
        chain_id,
        token_address: token_address.clone(),
        display_name: symbol.clone(),
        symbol,
        amount_minor_units: to_minor_units(params.pay_amount)?,
        icon_url: coin.web_image.clone(),
    })
}

/// Derive the full widget configuration. The destination is always the
/// session's pay address and the payer cannot edit it.
pub fn derive_widget_config(
    params: &SessionParams,
    integrator: &IntegratorIdentity,
) -> Result<BridgeWidgetConfig, BridgeError> {
    let token = derive_asset_ref(params)?;

    Ok(BridgeWidgetConfig {
        integrator: integrator.integrator.clone(),
        to_address: BridgeDestination {
            address: params.pay_address.clone(),
            chain_type: ChainType::Evm,
            name: integrator.tool_name.clone(),
            logo_uri: integrator.tool_logo_uri.clone(),
        },
        subvariant: WidgetSubvariant::Custom,
        disabled_ui: vec![DisabledUi::ToAddress],
        hidden_ui: vec![HiddenUi::Appearance, HiddenUi::Language],
        use_recommended_route: true,
        token,
        contract_calls: Vec::new(),
    })
}

/// Visibility toggle of the bridging widget.
///
/// Only exists for bridgeable coins: a host with no gate must not offer the
/// toggle control at all.
#[derive(Debug, Default)]
pub struct BridgeWidgetGate {
    visible: bool,
}

impl BridgeWidgetGate {
    /// A hidden gate if `coin` supports bridging, otherwise `None`.
    pub fn offer(coin: &CoinDescriptor) -> Option<Self> {
        if !coin.is_bridgeable() {
            debug!(
                chain_id = ?coin.evm_chain_id(),
                currency = %coin.currency,
                "Coin is not bridgeable, bridge widget not offered"
            );
            return None;
        }
        Some(Self { visible: false })
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flip visibility and return the new value.
    pub fn toggle(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    /// Whether the toggle can be used with these parameters. An amount that
    /// cannot be scaled makes the widget unavailable rather than misconfigured.
    pub fn is_available(&self, params: &SessionParams) -> bool {
        to_minor_units(params.pay_amount).is_ok()
    }

    /// Fresh configuration snapshot; only valid while visible.
    pub fn current_config(
        &self,
        params: &SessionParams,
        integrator: &IntegratorIdentity,
    ) -> Result<BridgeWidgetConfig, BridgeError> {
        if !self.visible {
            return Err(BridgeError::Hidden);
        }
        derive_widget_config(params, integrator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paycard_sdk::objects::Blockchain;
    use std::str::FromStr;
    use time::OffsetDateTime;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn params(amount: &str) -> SessionParams {
        SessionParams {
            order_id: "order-1".to_string(),
            time_of_generation: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
            pay_address: "0xABC".to_string(),
            pay_amount: dec(amount),
            coin: CoinDescriptor {
                currency: "USDT".to_string(),
                chain_id: None,
                blockchain: Some(Blockchain::Ethereum),
                bridge_token: Some("0x58efE15C0404aB22F87E4495D71f6f2077e862bE".to_string()),
                web_image: Some("https://img.example/usdt.png".to_string()),
                bridging: true,
            },
            qr_code: None,
        }
    }

    #[test]
    fn test_minor_units_scaling() {
        assert_eq!(to_minor_units(dec("19.16")).unwrap(), 19_160_000);
        assert_eq!(to_minor_units(dec("0.000001")).unwrap(), 1);
        assert_eq!(to_minor_units(dec("0")).unwrap(), 0);
        assert_eq!(to_minor_units(dec("0.0000005")).unwrap(), 1);
        assert_eq!(to_minor_units(dec("0.0000004")).unwrap(), 0);
    }

    #[test]
    fn test_minor_units_rejects_unrepresentable_amounts() {
        assert!(matches!(
            to_minor_units(dec("-1")),
            Err(BridgeError::InvalidAmount(_))
        ));
        assert!(matches!(
            to_minor_units(dec("99999999999999999999")),
            Err(BridgeError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_gate_not_offered_without_capability() {
        let mut coin = params("1").coin;
        coin.bridging = false;
        assert!(BridgeWidgetGate::offer(&coin).is_none());
    }

    #[test]
    fn test_config_only_while_visible() {
        let mut gate = BridgeWidgetGate::offer(&params("19.16").coin).unwrap();
        let integrator = IntegratorIdentity::default();
        assert!(matches!(
            gate.current_config(&params("19.16"), &integrator),
            Err(BridgeError::Hidden)
        ));

        assert!(gate.toggle());
        let config = gate.current_config(&params("19.16"), &integrator).unwrap();
        assert_eq!(config.to_address.address, "0xABC");
        assert!(!config.destination_editable());
        assert_eq!(config.token.chain_id, 1);
        assert_eq!(config.token.symbol, "USDT");
        assert_eq!(config.token.amount_minor_units, 19_160_000);
        assert_eq!(config.integrator, integrator.integrator);

        assert!(!gate.toggle());
        assert!(!gate.is_visible());
    }

    #[test]
    fn test_config_tracks_live_parameters() {
        let mut gate = BridgeWidgetGate::offer(&params("1").coin).unwrap();
        gate.toggle();
        let integrator = IntegratorIdentity::default();

        let first = gate.current_config(&params("19.16"), &integrator).unwrap();
        let mut changed = params("20.5");
        changed.pay_address = "0xDEF".to_string();
        let second = gate.current_config(&changed, &integrator).unwrap();

        assert_eq!(first.token.amount_minor_units, 19_160_000);
        assert_eq!(second.token.amount_minor_units, 20_500_000);
        assert_eq!(second.to_address.address, "0xDEF");
    }

    #[test]
    fn test_negative_amount_makes_gate_unavailable() {
        let gate = BridgeWidgetGate::offer(&params("1").coin).unwrap();
        assert!(gate.is_available(&params("19.16")));
        assert!(!gate.is_available(&params("-3")));
    }

    #[test]
    fn test_config_for_chain_outside_known_networks() {
        let mut bsc = params("2.5");
        bsc.coin = CoinDescriptor {
            currency: "WETH".to_string(),
            chain_id: Some(56),
            blockchain: None,
            bridge_token: Some("0x2170Ed0880ac9A755fd29B2688956BD959F933F8".to_string()),
            web_image: None,
            bridging: true,
        };
        let mut gate = BridgeWidgetGate::offer(&bsc.coin).unwrap();
        gate.toggle();

        let config = gate
            .current_config(&bsc, &IntegratorIdentity::default())
            .unwrap();
        assert_eq!(config.token.chain_id, 56);
        assert_eq!(config.token.symbol, "WETH");
        assert_eq!(config.token.display_name, "WETH");
        assert_eq!(config.token.amount_minor_units, 2_500_000);
    }
}
