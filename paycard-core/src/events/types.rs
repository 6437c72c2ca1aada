//! Event type definitions.

use crate::controller::HostSignals;
use crate::copy_feedback::CopyField;
use crate::countdown::CountdownTick;
use paycard_sdk::objects::{BridgeWidgetConfig, SessionParams};
use time::OffsetDateTime;

/// Actions requested by the host on behalf of the payer.
#[derive(Debug, Clone)]
pub enum SessionCommand {
    /// Copy a field to the clipboard.
    Copy(CopyField),
    /// Show or hide the bridging widget.
    ToggleBridge,
    /// Produce the external wallet deep link.
    WalletLink,
    /// A new invoice replaces the running session.
    Replace(Box<SessionParams>),
}

/// State changes reported to the host.
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    /// A session started (initially or after a replacement).
    Started {
        order_id: String,
        deadline: OffsetDateTime,
        bridge_offered: bool,
    },
    /// Countdown recomputed.
    Tick(CountdownTick),
    /// The payment window closed. Carries both host signals at once.
    Expired(HostSignals),
    /// A "copied" indicator went on or off.
    CopyFeedback { field: CopyField, active: bool },
    /// The clipboard could not be written.
    CopyUnavailable { field: CopyField, reason: String },
    /// Bridging widget visibility changed; `config` is set when visible.
    BridgeVisibility {
        visible: bool,
        config: Option<Box<BridgeWidgetConfig>>,
    },
    /// The bridging toggle cannot be used.
    BridgeUnavailable { reason: String },
    /// External wallet deep link for the current invoice.
    WalletLink(String),
}
