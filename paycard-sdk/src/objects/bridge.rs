//! Configuration handed to the external bridging widget.
//!
//! Field names follow the widget's own JSON schema so a host can pass a
//! serialized [`BridgeWidgetConfig`] straight through.

use serde::{Deserialize, Serialize};

/// The asset and amount the widget should deliver to the session address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeAssetRef {
    pub chain_id: u64,
    #[serde(rename = "address")]
    pub token_address: String,
    pub symbol: String,
    #[serde(rename = "name")]
    pub display_name: String,
    /// `pay_amount` scaled by 10^6 and rounded.
    #[serde(rename = "amount")]
    pub amount_minor_units: u64,
    #[serde(rename = "logoURI", skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChainType {
    Evm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisabledUi {
    ToAddress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HiddenUi {
    Appearance,
    Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WidgetSubvariant {
    Custom,
}

/// Who is embedding the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegratorIdentity {
    /// Integrator id reported to the bridging service.
    #[serde(default = "default_integrator")]
    pub integrator: String,
    /// Label of the destination wallet inside the widget.
    #[serde(default = "default_tool_name")]
    pub tool_name: String,
    #[serde(default)]
    pub tool_logo_uri: Option<String>,
}

fn default_integrator() -> String {
    "Evouchr".to_string()
}

fn default_tool_name() -> String {
    "Evouchr Wallet".to_string()
}

impl Default for IntegratorIdentity {
    fn default() -> Self {
        Self {
            integrator: default_integrator(),
            tool_name: default_tool_name(),
            tool_logo_uri: None,
        }
    }
}

/// Destination of the bridged funds. Always the session's pay address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeDestination {
    pub address: String,
    pub chain_type: ChainType,
    pub name: String,
    #[serde(rename = "logoURI", skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
}

/// Immutable snapshot of the widget configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeWidgetConfig {
    pub integrator: String,
    pub to_address: BridgeDestination,
    pub subvariant: WidgetSubvariant,
    #[serde(rename = "disabledUI")]
    pub disabled_ui: Vec<DisabledUi>,
    #[serde(rename = "hiddenUI")]
    pub hidden_ui: Vec<HiddenUi>,
    pub use_recommended_route: bool,
    pub token: BridgeAssetRef,
    /// Extra contract calls executed after bridging. The session never adds any.
    pub contract_calls: Vec<serde_json::Value>,
}

impl BridgeWidgetConfig {
    /// Whether the payer can edit the destination address in the widget.
    pub fn destination_editable(&self) -> bool {
        !self.disabled_ui.contains(&DisabledUi::ToAddress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_config_uses_widget_field_names() {
        let config = BridgeWidgetConfig {
            integrator: "Evouchr".to_string(),
            to_address: BridgeDestination {
                address: "0xABC".to_string(),
                chain_type: ChainType::Evm,
                name: "Evouchr Wallet".to_string(),
                logo_uri: None,
            },
            subvariant: WidgetSubvariant::Custom,
            disabled_ui: vec![DisabledUi::ToAddress],
            hidden_ui: vec![HiddenUi::Appearance, HiddenUi::Language],
            use_recommended_route: true,
            token: BridgeAssetRef {
                chain_id: 1,
                token_address: "0xdead".to_string(),
                symbol: "USDT".to_string(),
                display_name: "USDT".to_string(),
                amount_minor_units: 19_160_000,
                icon_url: Some("https://img.example/usdt.png".to_string()),
            },
            contract_calls: vec![],
        };

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["toAddress"]["chainType"], "EVM");
        assert_eq!(json["disabledUI"][0], "toAddress");
        assert_eq!(json["hiddenUI"][1], "language");
        assert_eq!(json["token"]["amount"], 19_160_000);
        assert_eq!(json["token"]["logoURI"], "https://img.example/usdt.png");
        assert!(!config.destination_editable());
    }
}
