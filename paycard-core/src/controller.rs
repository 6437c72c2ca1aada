//! SessionController: composition root of one payment session.
//!
//! The controller is responsible for:
//! - Driving the countdown from its own timer queue (one tick per second,
//!   never past the deadline)
//! - Clearing the persisted order identifier and flipping both host signals
//!   when the payment window expires
//! - Binding the address/amount copy actions to the copy feedback coordinator
//! - Owning the bridging widget gate when the coin supports bridging
//!
//! It never reads the clock: every operation takes `now`, so the same code
//! runs under tokio in production and under a virtual clock in tests.

use crate::bridge::{BridgeError, BridgeWidgetGate};
use crate::copy_feedback::{
    Clipboard, CopyError, CopyFeedbackCoordinator, CopyFeedbackState, CopyField,
};
use crate::countdown::{CountdownSession, CountdownTick, SessionWindow, TickOutcome};
use crate::events::SessionUpdate;
use crate::store::OrderIdStore;
use crate::timers::{SessionTimer, TimerQueue};
use paycard_sdk::deeplink::WalletLinkConfig;
use paycard_sdk::objects::{BridgeWidgetConfig, IntegratorIdentity, SessionParams};
use time::{Duration, OffsetDateTime};
use tracing::{debug, error, info};

/// Cadence of countdown ticks.
const TICK_INTERVAL: Duration = Duration::SECOND;

/// The two booleans a session reports to its host.
///
/// Always replaced as a whole, so a host never observes only one of them
/// flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostSignals {
    /// Ask the payer to start over.
    pub show_reentry_prompt: bool,
    /// An invoice is currently shown.
    pub invoice_generated: bool,
}

impl HostSignals {
    /// An invoice is being shown.
    pub const ACTIVE: Self = Self {
        show_reentry_prompt: false,
        invoice_generated: true,
    };

    /// The payment window closed.
    pub const EXPIRED: Self = Self {
        show_reentry_prompt: true,
        invoice_generated: false,
    };
}

/// Host-level settings that outlive individual invoices.
#[derive(Debug, Clone, Default)]
pub struct SessionSettings {
    pub integrator: IntegratorIdentity,
    pub wallet_link: WalletLinkConfig,
}

/// One ephemeral payment session.
pub struct SessionController<S, C> {
    params: SessionParams,
    settings: SessionSettings,
    countdown: CountdownSession,
    copy_feedback: CopyFeedbackCoordinator,
    bridge: Option<BridgeWidgetGate>,
    timers: TimerQueue<SessionTimer>,
    signals: HostSignals,
    store: S,
    clipboard: C,
    torn_down: bool,
}

impl<S, C> SessionController<S, C>
where
    S: OrderIdStore,
    C: Clipboard,
{
    /// Start a session. The first countdown tick is due at `now`.
    pub fn new(
        params: SessionParams,
        settings: SessionSettings,
        store: S,
        clipboard: C,
        now: OffsetDateTime,
    ) -> Self {
        let window = SessionWindow::new(params.time_of_generation);
        let mut controller = Self {
            params,
            settings,
            countdown: CountdownSession::new(window),
            copy_feedback: CopyFeedbackCoordinator::new(),
            bridge: None,
            timers: TimerQueue::new(),
            signals: HostSignals::ACTIVE,
            store,
            clipboard,
            torn_down: false,
        };
        controller.start(now);
        controller
    }

    fn start(&mut self, now: OffsetDateTime) {
        self.timers.clear();
        self.countdown = CountdownSession::new(SessionWindow::new(self.params.time_of_generation));
        self.copy_feedback = CopyFeedbackCoordinator::new();
        self.bridge = BridgeWidgetGate::offer(&self.params.coin);
        self.signals = HostSignals::ACTIVE;
        self.torn_down = false;
        self.timers.schedule_at(now, SessionTimer::CountdownTick);

        info!(
            order_id = %self.params.order_id,
            deadline = %self.countdown.window().deadline(),
            bridge_offered = self.bridge.is_some(),
            "Payment session started"
        );
    }

    /// Update describing the session that is currently running.
    pub fn started_update(&self) -> SessionUpdate {
        SessionUpdate::Started {
            order_id: self.params.order_id.clone(),
            deadline: self.countdown.window().deadline(),
            bridge_offered: self.bridge_offered(),
        }
    }

    /// Run every timer due at `now`, in schedule order.
    pub fn advance(&mut self, now: OffsetDateTime) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        if self.torn_down {
            return updates;
        }

        while let Some((id, timer)) = self.timers.pop_due(now) {
            match timer {
                SessionTimer::CountdownTick => self.on_countdown_tick(now, &mut updates),
                SessionTimer::CopyFeedbackExpired(field) => {
                    if self.copy_feedback.expire(field, id) {
                        updates.push(SessionUpdate::CopyFeedback {
                            field,
                            active: false,
                        });
                    }
                }
            }
        }

        updates
    }

    fn on_countdown_tick(&mut self, now: OffsetDateTime, updates: &mut Vec<SessionUpdate>) {
        match self.countdown.tick(now) {
            TickOutcome::Running(tick) => {
                updates.push(SessionUpdate::Tick(tick));
                let next = (now + TICK_INTERVAL).min(self.countdown.window().deadline());
                self.timers.schedule_at(next, SessionTimer::CountdownTick);
            }
            TickOutcome::Expired(tick) => {
                updates.push(SessionUpdate::Tick(tick));
                self.expire();
                updates.push(SessionUpdate::Expired(self.signals));
            }
            TickOutcome::AlreadyExpired => {
                debug!(order_id = %self.params.order_id, "Ignoring tick of expired session");
            }
        }
    }

    fn expire(&mut self) {
        if let Err(e) = self.store.clear_order_id() {
            error!(
                order_id = %self.params.order_id,
                error = %e,
                "Failed to clear persisted order id"
            );
        }
        self.signals = HostSignals::EXPIRED;
        info!(
            order_id = %self.params.order_id,
            "Session expired, invoice must be generated again"
        );
    }

    /// Copy a field's current value and light its indicator.
    pub fn copy(
        &mut self,
        field: CopyField,
        now: OffsetDateTime,
    ) -> Result<Vec<SessionUpdate>, CopyError> {
        if self.torn_down {
            return Ok(Vec::new());
        }

        let value = match field {
            CopyField::Address => self.params.pay_address.clone(),
            CopyField::Amount => self.params.pay_amount_text(),
        };
        let deactivated = self.copy_feedback.copy(
            field,
            &value,
            now,
            &mut self.clipboard,
            &mut self.timers,
        )?;

        let mut updates = Vec::with_capacity(2);
        if let Some(other) = deactivated {
            updates.push(SessionUpdate::CopyFeedback {
                field: other,
                active: false,
            });
        }
        updates.push(SessionUpdate::CopyFeedback {
            field,
            active: true,
        });
        Ok(updates)
    }

    pub fn copy_address(&mut self, now: OffsetDateTime) -> Result<Vec<SessionUpdate>, CopyError> {
        self.copy(CopyField::Address, now)
    }

    pub fn copy_amount(&mut self, now: OffsetDateTime) -> Result<Vec<SessionUpdate>, CopyError> {
        self.copy(CopyField::Amount, now)
    }

    /// Whether the host should show the bridging toggle.
    pub fn bridge_offered(&self) -> bool {
        self.bridge
            .as_ref()
            .is_some_and(|gate| gate.is_available(&self.params))
    }

    /// Flip bridging widget visibility. When it becomes visible the update
    /// carries a freshly derived configuration.
    pub fn toggle_bridge(&mut self) -> Result<SessionUpdate, BridgeError> {
        let Some(gate) = self.bridge.as_mut() else {
            return Err(BridgeError::NotOffered);
        };
        if !gate.is_available(&self.params) {
            return Err(BridgeError::InvalidAmount(self.params.pay_amount));
        }

        if !gate.toggle() {
            return Ok(SessionUpdate::BridgeVisibility {
                visible: false,
                config: None,
            });
        }
        match gate.current_config(&self.params, &self.settings.integrator) {
            Ok(config) => Ok(SessionUpdate::BridgeVisibility {
                visible: true,
                config: Some(Box::new(config)),
            }),
            Err(e) => {
                gate.toggle();
                Err(e)
            }
        }
    }

    /// Configuration for the visible bridging widget.
    pub fn bridge_config(&self) -> Result<BridgeWidgetConfig, BridgeError> {
        let gate = self.bridge.as_ref().ok_or(BridgeError::NotOffered)?;
        gate.current_config(&self.params, &self.settings.integrator)
    }

    /// External wallet deep link for the current invoice.
    pub fn wallet_link(&self) -> String {
        self.settings
            .wallet_link
            .send_link(&self.params.pay_address, &self.params.pay_amount_text())
    }

    /// Register a handler for the expiration of the current invoice. A
    /// replacement invoice starts with no handlers.
    pub fn on_expire(&mut self, handler: impl FnOnce() + Send + 'static) {
        self.countdown.on_expire(handler);
    }

    /// A new invoice replaces this session. Every pending timer of the old
    /// one is cancelled before the new countdown starts.
    pub fn replace(&mut self, params: SessionParams, now: OffsetDateTime) -> SessionUpdate {
        info!(
            previous_order_id = %self.params.order_id,
            order_id = %params.order_id,
            "Replacing payment session"
        );
        self.params = params;
        self.start(now);
        self.started_update()
    }

    /// Cancel every pending timer. Later `advance` and `copy` calls are no-ops.
    pub fn teardown(&mut self) {
        self.copy_feedback.reset(&mut self.timers);
        let cancelled = self.timers.clear();
        self.torn_down = true;
        debug!(order_id = %self.params.order_id, cancelled, "Payment session torn down");
    }

    /// When `advance` should next be called.
    pub fn next_deadline(&self) -> Option<OffsetDateTime> {
        if self.torn_down {
            return None;
        }
        self.timers.next_deadline()
    }

    /// Countdown at `now`, without side effects.
    pub fn snapshot(&self, now: OffsetDateTime) -> CountdownTick {
        CountdownTick::at(self.countdown.window(), now)
    }

    pub fn copy_state(&self, field: CopyField) -> CopyFeedbackState {
        self.copy_feedback.state(field)
    }

    pub fn signals(&self) -> HostSignals {
        self.signals
    }

    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    pub fn is_expired(&self) -> bool {
        self.countdown.is_expired()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }
}
