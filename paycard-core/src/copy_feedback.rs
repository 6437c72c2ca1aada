//! "Copied!" indicators for the address and amount fields.
//!
//! At most one indicator is lit. Copying a field lights its indicator, puts
//! out the other one immediately, and replaces whatever auto-expiry was
//! pending with a fresh one (cancel-and-reschedule). A stale expiry can
//! therefore never put out a newer indicator.

use crate::timers::{SessionTimer, TimerId, TimerQueue};
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

/// How long a "copied" indicator stays lit.
pub const COPY_FEEDBACK_DURATION: Duration = Duration::milliseconds(2000);

/// A copyable field of the payment card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyField {
    Address,
    Amount,
}

impl CopyField {
    pub const ALL: [CopyField; 2] = [CopyField::Address, CopyField::Amount];
}

impl std::fmt::Display for CopyField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CopyField::Address => f.write_str("address"),
            CopyField::Amount => f.write_str("amount"),
        }
    }
}

/// Indicator state of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CopyFeedbackState {
    pub active: bool,
    pub expires_at: Option<OffsetDateTime>,
}

/// Errors that can occur while copying a value.
#[derive(Debug, Error)]
pub enum CopyError {
    /// The platform clipboard cannot be written to.
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// The system clipboard, as far as a session is concerned.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), CopyError>;
}

impl<C: Clipboard + ?Sized> Clipboard for Box<C> {
    fn write_text(&mut self, text: &str) -> Result<(), CopyError> {
        (**self).write_text(text)
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveFeedback {
    field: CopyField,
    expires_at: OffsetDateTime,
    timer: TimerId,
}

/// Owns the two mutually exclusive "copied" indicators.
#[derive(Debug, Default)]
pub struct CopyFeedbackCoordinator {
    active: Option<ActiveFeedback>,
}

impl CopyFeedbackCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, field: CopyField) -> CopyFeedbackState {
        match self.active {
            Some(active) if active.field == field => CopyFeedbackState {
                active: true,
                expires_at: Some(active.expires_at),
            },
            _ => CopyFeedbackState::default(),
        }
    }

    pub fn active_field(&self) -> Option<CopyField> {
        self.active.map(|a| a.field)
    }

    /// Copy `value` to the clipboard and light `field`'s indicator.
    ///
    /// Returns the other field if its indicator was put out by this call.
    /// When the clipboard write fails nothing changes.
    pub fn copy<C: Clipboard + ?Sized>(
        &mut self,
        field: CopyField,
        value: &str,
        now: OffsetDateTime,
        clipboard: &mut C,
        timers: &mut TimerQueue<SessionTimer>,
    ) -> Result<Option<CopyField>, CopyError> {
        if let Err(e) = clipboard.write_text(value) {
            warn!(%field, error = %e, "Copy failed, leaving feedback untouched");
            return Err(e);
        }

        let deactivated = self.active.take().and_then(|previous| {
            timers.cancel(previous.timer);
            (previous.field != field).then_some(previous.field)
        });

        let expires_at = now + COPY_FEEDBACK_DURATION;
        let timer = timers.schedule_at(expires_at, SessionTimer::CopyFeedbackExpired(field));
        self.active = Some(ActiveFeedback {
            field,
            expires_at,
            timer,
        });

        debug!(%field, ?deactivated, %expires_at, "Copy feedback activated");
        Ok(deactivated)
    }

    /// Handle a fired auto-expiry. Returns `true` if an indicator went out.
    pub fn expire(&mut self, field: CopyField, timer: TimerId) -> bool {
        match self.active {
            Some(active) if active.field == field && active.timer == timer => {
                self.active = None;
                debug!(%field, "Copy feedback expired");
                true
            }
            _ => false,
        }
    }

    /// Put out any indicator and cancel its pending expiry.
    pub fn reset(&mut self, timers: &mut TimerQueue<SessionTimer>) {
        if let Some(active) = self.active.take() {
            timers.cancel(active.timer);
        }
    }
}
