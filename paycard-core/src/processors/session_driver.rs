//! SessionDriver processor.
//!
//! The SessionDriver is responsible for:
//! - Owning one `SessionController` for the lifetime of the host
//! - Receiving `SessionCommand` events from the host
//! - Sleeping until the controller's next timer is due, then advancing it
//! - Emitting every resulting `SessionUpdate` to the host
//! - Tearing the session down (cancelling all timers) on shutdown
//!
//! Time is read through a [`Clock`], so the wall clock is the only thing the
//! driver adds on top of the controller.

use crate::controller::SessionController;
use crate::copy_feedback::Clipboard;
use crate::events::{SessionCommand, SessionCommandReceiver, SessionUpdate, SessionUpdateSender};
use crate::store::OrderIdStore;
use time::OffsetDateTime;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Source of "now" for a running session.
pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

/// The system wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// SessionDriver runs a session's timers and commands on tokio.
pub struct SessionDriver<S, C, K = SystemClock> {
    controller: SessionController<S, C>,
    clock: K,
}

impl<S, C, K> SessionDriver<S, C, K>
where
    S: OrderIdStore,
    C: Clipboard,
    K: Clock,
{
    /// Create a new SessionDriver.
    pub fn new(controller: SessionController<S, C>, clock: K) -> Self {
        Self { controller, clock }
    }

    /// Run until shutdown is signaled or the command channel closes.
    ///
    /// Returns the torn-down controller so the host can inspect its final
    /// state.
    pub async fn run(
        mut self,
        mut shutdown_rx: watch::Receiver<bool>,
        mut command_rx: SessionCommandReceiver,
        update_tx: SessionUpdateSender,
    ) -> SessionController<S, C> {
        info!("SessionDriver started");

        let started = vec![self.controller.started_update()];
        if forward(&update_tx, started).await {
            loop {
                let wait = self.time_until_next_deadline();

                tokio::select! {
                    biased;

                    // Shutdown has highest priority.
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            info!("SessionDriver received shutdown signal");
                            break;
                        }
                    }

                    // Host commands before timers, so a copy racing with a
                    // copy-feedback expiry is applied first.
                    command = command_rx.recv() => {
                        let Some(command) = command else {
                            info!("SessionCommand channel closed");
                            break;
                        };
                        debug!(?command, "Received SessionCommand");
                        let updates = self.handle_command(command);
                        if !forward(&update_tx, updates).await {
                            break;
                        }
                    }

                    // Next timer is due.
                    _ = sleep_for(wait) => {
                        let updates = self.controller.advance(self.clock.now());
                        if !forward(&update_tx, updates).await {
                            break;
                        }
                    }
                }
            }
        }

        self.controller.teardown();
        info!("SessionDriver shutdown complete");
        self.controller
    }

    fn handle_command(&mut self, command: SessionCommand) -> Vec<SessionUpdate> {
        let now = self.clock.now();
        match command {
            SessionCommand::Copy(field) => match self.controller.copy(field, now) {
                Ok(updates) => updates,
                Err(e) => vec![SessionUpdate::CopyUnavailable {
                    field,
                    reason: e.to_string(),
                }],
            },
            SessionCommand::ToggleBridge => match self.controller.toggle_bridge() {
                Ok(update) => vec![update],
                Err(e) => {
                    warn!(error = %e, "Bridge toggle rejected");
                    vec![SessionUpdate::BridgeUnavailable {
                        reason: e.to_string(),
                    }]
                }
            },
            SessionCommand::WalletLink => {
                vec![SessionUpdate::WalletLink(self.controller.wallet_link())]
            }
            SessionCommand::Replace(params) => vec![self.controller.replace(*params, now)],
        }
    }

    fn time_until_next_deadline(&self) -> Option<std::time::Duration> {
        self.controller.next_deadline().map(|deadline| {
            std::time::Duration::try_from(deadline - self.clock.now())
                .unwrap_or(std::time::Duration::ZERO)
        })
    }
}

/// Sleep for `wait`, or forever when nothing is scheduled.
async fn sleep_for(wait: Option<std::time::Duration>) {
    match wait {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

/// Send updates in order. Returns `false` once the host is gone.
async fn forward(update_tx: &SessionUpdateSender, updates: Vec<SessionUpdate>) -> bool {
    for update in updates {
        if let Err(e) = update_tx.send(update).await {
            warn!(error = %e, "Failed to send SessionUpdate, receiver dropped");
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{HostSignals, SessionSettings};
    use crate::copy_feedback::{CopyError, CopyField};
    use crate::events::{session_command_channel, session_update_channel};
    use crate::store::InMemoryOrderIdStore;
    use paycard_sdk::objects::{Blockchain, CoinDescriptor, SessionParams};
    use rust_decimal::Decimal;
    use time::Duration;

    struct FixedClock(OffsetDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> OffsetDateTime {
            self.0
        }
    }

    #[derive(Default)]
    struct RecordingClipboard {
        contents: Vec<String>,
    }

    impl Clipboard for RecordingClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), CopyError> {
            self.contents.push(text.to_string());
            Ok(())
        }
    }

    fn t0() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
    }

    fn controller() -> SessionController<InMemoryOrderIdStore, RecordingClipboard> {
        let params = SessionParams {
            order_id: "order-7".to_string(),
            time_of_generation: t0(),
            pay_address: "TXyz".to_string(),
            pay_amount: Decimal::new(1916, 2),
            coin: CoinDescriptor {
                currency: "USDT".to_string(),
                chain_id: None,
                blockchain: Some(Blockchain::Tron),
                bridge_token: None,
                web_image: None,
                bridging: false,
            },
            qr_code: None,
        };
        SessionController::new(
            params,
            SessionSettings::default(),
            InMemoryOrderIdStore::with_order_id("order-7"),
            RecordingClipboard::default(),
            t0(),
        )
    }

    #[tokio::test]
    async fn test_driver_expires_overdue_session_and_handles_commands() {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (command_tx, command_rx) = session_command_channel();
        let (update_tx, mut update_rx) = session_update_channel();

        let driver = SessionDriver::new(controller(), FixedClock(t0() + Duration::hours(3)));
        let handle = tokio::spawn(driver.run(shutdown_rx, command_rx, update_tx));

        assert!(matches!(
            update_rx.recv().await.unwrap(),
            SessionUpdate::Started { bridge_offered: false, .. }
        ));
        assert!(matches!(
            update_rx.recv().await.unwrap(),
            SessionUpdate::Tick(tick) if tick.is_complete()
        ));
        assert!(matches!(
            update_rx.recv().await.unwrap(),
            SessionUpdate::Expired(HostSignals::EXPIRED)
        ));

        command_tx
            .send(SessionCommand::Copy(CopyField::Amount))
            .await
            .unwrap();
        assert!(matches!(
            update_rx.recv().await.unwrap(),
            SessionUpdate::CopyFeedback {
                field: CopyField::Amount,
                active: true
            }
        ));

        command_tx.send(SessionCommand::ToggleBridge).await.unwrap();
        assert!(matches!(
            update_rx.recv().await.unwrap(),
            SessionUpdate::BridgeUnavailable { .. }
        ));

        command_tx.send(SessionCommand::WalletLink).await.unwrap();
        let SessionUpdate::WalletLink(link) = update_rx.recv().await.unwrap() else {
            panic!("expected wallet link");
        };
        assert!(link.contains("address=TXyz&amount=19.16"));

        shutdown_tx.send(true).unwrap();
        let controller = handle.await.unwrap();
        assert!(controller.is_torn_down());
        assert_eq!(controller.store().order_id(), Some(""));
        assert_eq!(controller.clipboard().contents, vec!["19.16"]);
        assert_eq!(controller.next_deadline(), None);
    }

    #[tokio::test]
    async fn test_driver_stops_when_commands_close() {
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let (command_tx, command_rx) = session_command_channel();
        let (update_tx, mut update_rx) = session_update_channel();

        let driver = SessionDriver::new(controller(), FixedClock(t0() + Duration::minutes(1)));
        let handle = tokio::spawn(driver.run(shutdown_rx, command_rx, update_tx));

        assert!(matches!(
            update_rx.recv().await.unwrap(),
            SessionUpdate::Started { .. }
        ));
        drop(command_tx);

        let controller = handle.await.unwrap();
        assert!(controller.is_torn_down());
        assert!(!controller.is_expired());
        assert_eq!(controller.signals(), HostSignals::ACTIVE);
        assert_eq!(controller.store().writes(), 0);
    }
}
