//! Plain-text rendering of session updates.

use paycard_core::events::SessionUpdate;
use paycard_sdk::objects::SessionParams;
use std::io::Write;

pub const HELP: &str =
    "Commands: [a]ddress copy, a[m]ount copy, [b]ridge toggle, [w]allet link, [h]elp, [q]uit";

pub struct Renderer<W> {
    out: W,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Print the static part of the payment card.
    pub fn invoice(&mut self, params: &SessionParams) -> std::io::Result<()> {
        writeln!(
            self.out,
            "Send exactly {} {}",
            params.pay_amount_text(),
            params.coin.currency
        )?;
        writeln!(self.out, "  to      {}", params.pay_address)?;
        match (params.coin.blockchain, params.coin.evm_chain_id()) {
            (Some(blockchain), _) => writeln!(self.out, "  chain   {blockchain}")?,
            (None, Some(chain_id)) => writeln!(self.out, "  chain   {chain_id}")?,
            (None, None) => {}
        }
        if let Some(qr_code) = &params.qr_code {
            writeln!(self.out, "  qr code {qr_code}")?;
        }
        Ok(())
    }

    pub fn render(&mut self, update: &SessionUpdate) -> std::io::Result<()> {
        match update {
            SessionUpdate::Started {
                order_id,
                deadline,
                bridge_offered,
            } => {
                writeln!(self.out, "Order {order_id}, valid until {deadline}")?;
                if *bridge_offered {
                    writeln!(self.out, "Bridging from another chain is available.")?;
                }
                writeln!(self.out, "{HELP}")?;
            }
            SessionUpdate::Tick(tick) => {
                write!(self.out, "\r{tick} [{:5.1}%]", tick.progress_percent)?;
            }
            SessionUpdate::Expired(_) => {
                writeln!(self.out)?;
                writeln!(
                    self.out,
                    "Payment window expired. Reload the configuration (SIGHUP) for a new invoice."
                )?;
            }
            SessionUpdate::CopyFeedback { field, active } => {
                if *active {
                    writeln!(self.out, "\n{field} copied!")?;
                }
            }
            SessionUpdate::CopyUnavailable { field, reason } => {
                writeln!(self.out, "\ncould not copy {field}: {reason}")?;
            }
            SessionUpdate::BridgeVisibility { visible, config } => match config {
                Some(config) if *visible => {
                    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;
                    writeln!(self.out, "\nBridge widget configuration:\n{json}")?;
                }
                _ => writeln!(self.out, "\nBridge widget hidden.")?,
            },
            SessionUpdate::BridgeUnavailable { reason } => {
                writeln!(self.out, "\nbridging unavailable: {reason}")?;
            }
            SessionUpdate::WalletLink(link) => {
                writeln!(self.out, "\nOpen in wallet: {link}")?;
            }
        }
        self.out.flush()
    }
}
