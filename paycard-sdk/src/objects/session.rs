//! Host-supplied inputs of one payment session.

use rust_decimal::Decimal;
use time::OffsetDateTime;

use super::coin::CoinDescriptor;

/// Immutable snapshot of everything the host hands to a session.
///
/// A new invoice is a new `SessionParams`; the core never mutates one.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionParams {
    /// Identifier of the order this invoice belongs to.
    pub order_id: String,
    /// When the invoice was generated. The payment window starts here.
    pub time_of_generation: OffsetDateTime,
    /// Address the payer sends funds to.
    pub pay_address: String,
    /// Amount to pay, in asset units.
    pub pay_amount: Decimal,
    pub coin: CoinDescriptor,
    /// Opaque QR code image reference, passed through to the renderer.
    pub qr_code: Option<String>,
}

impl SessionParams {
    /// Text placed on the clipboard when the payer copies the amount.
    pub fn pay_amount_text(&self) -> String {
        self.pay_amount.normalize().to_string()
    }
}
