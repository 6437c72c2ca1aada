//! Deadline-driven countdown of a payment window.
//!
//! Every tick is recomputed from the absolute start of the window, so a host
//! that misses ticks (sleeping laptop, backgrounded tab) catches up on the
//! next one instead of drifting. All arithmetic is in whole milliseconds;
//! hours/minutes/seconds exist only for display.

use time::{Duration, OffsetDateTime};
use tracing::{debug, info};

/// Length of the payment window.
pub const SESSION_DURATION: Duration = Duration::hours(2);

/// The interval during which a generated payment request is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    started_at: OffsetDateTime,
    duration: Duration,
}

impl SessionWindow {
    /// A window of [`SESSION_DURATION`] starting at `started_at`.
    pub fn new(started_at: OffsetDateTime) -> Self {
        Self::with_duration(started_at, SESSION_DURATION)
    }

    /// Windows shorter than one millisecond are raised to one millisecond.
    pub fn with_duration(started_at: OffsetDateTime, duration: Duration) -> Self {
        Self {
            started_at,
            duration: duration.max(Duration::MILLISECOND),
        }
    }

    pub fn started_at(&self) -> OffsetDateTime {
        self.started_at
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn deadline(&self) -> OffsetDateTime {
        self.started_at + self.duration
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration.whole_milliseconds().clamp(1, u64::MAX as i128) as u64
    }

    /// `max(0, started_at + duration - now)`, never more than the window.
    pub fn remaining_ms(&self, now: OffsetDateTime) -> u64 {
        let remaining = (self.deadline() - now).whole_milliseconds();
        remaining.clamp(0, self.duration_ms() as i128) as u64
    }
}

/// Countdown state derived for one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountdownTick {
    pub remaining_ms: u64,
    /// Elapsed share of the window, `0.0..=100.0`.
    pub progress_percent: f64,
}

impl CountdownTick {
    /// Pure derivation of the tick at `now`.
    pub fn at(window: &SessionWindow, now: OffsetDateTime) -> Self {
        Self::from_remaining(window, window.remaining_ms(now))
    }

    fn from_remaining(window: &SessionWindow, remaining_ms: u64) -> Self {
        let duration_ms = window.duration_ms();
        let remaining_ms = remaining_ms.min(duration_ms);
        let elapsed = (duration_ms - remaining_ms) as f64;
        let progress_percent = (elapsed / duration_ms as f64 * 100.0).clamp(0.0, 100.0);
        Self {
            remaining_ms,
            progress_percent,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_ms == 0
    }

    /// Whole hours, minutes and seconds left.
    pub fn hms(&self) -> (u64, u64, u64) {
        let total_seconds = self.remaining_ms / 1000;
        (
            total_seconds / 3600,
            (total_seconds % 3600) / 60,
            total_seconds % 60,
        )
    }
}

impl std::fmt::Display for CountdownTick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_complete() {
            return f.write_str("Expired");
        }
        let (hours, minutes, seconds) = self.hms();
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
    }
}

/// Result of feeding one instant into a [`CountdownSession`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Time is left.
    Running(CountdownTick),
    /// This tick reached zero. Reported once per session.
    Expired(CountdownTick),
    /// The session had already expired; nothing happened.
    AlreadyExpired,
}

type ExpireHandler = Box<dyn FnOnce() + Send>;

/// Countdown of a single payment window with a one-shot expiration.
///
/// Progress never moves backwards: ticks delivered out of order report the
/// lowest remaining time seen so far. Once expired, further ticks are no-ops.
pub struct CountdownSession {
    window: SessionWindow,
    lowest_remaining_ms: u64,
    expired: bool,
    expire_handlers: Vec<ExpireHandler>,
}

impl CountdownSession {
    pub fn new(window: SessionWindow) -> Self {
        Self {
            window,
            lowest_remaining_ms: window.duration_ms(),
            expired: false,
            expire_handlers: Vec::new(),
        }
    }

    pub fn window(&self) -> &SessionWindow {
        &self.window
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Register a handler run on the tick where remaining time reaches zero.
    ///
    /// Handlers registered after expiration are dropped without running.
    pub fn on_expire(&mut self, handler: impl FnOnce() + Send + 'static) {
        if self.expired {
            debug!("Countdown already expired, dropping expire handler");
            return;
        }
        self.expire_handlers.push(Box::new(handler));
    }

    /// Recompute the countdown at `now`.
    pub fn tick(&mut self, now: OffsetDateTime) -> TickOutcome {
        if self.expired {
            return TickOutcome::AlreadyExpired;
        }

        let remaining_ms = self.window.remaining_ms(now).min(self.lowest_remaining_ms);
        self.lowest_remaining_ms = remaining_ms;
        let tick = CountdownTick::from_remaining(&self.window, remaining_ms);

        if remaining_ms > 0 {
            return TickOutcome::Running(tick);
        }

        self.expired = true;
        info!(
            started_at = %self.window.started_at(),
            deadline = %self.window.deadline(),
            "Payment window expired"
        );
        for handler in self.expire_handlers.drain(..) {
            handler();
        }
        TickOutcome::Expired(tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn t0() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
    }

    #[test]
    fn test_progress_bounds_and_monotonicity() {
        let window = SessionWindow::new(t0());
        assert_eq!(CountdownTick::at(&window, t0()).progress_percent, 0.0);
        assert_eq!(CountdownTick::at(&window, t0()).remaining_ms, 7_200_000);

        let end = CountdownTick::at(&window, t0() + SESSION_DURATION);
        assert_eq!(end.progress_percent, 100.0);
        assert_eq!(end.remaining_ms, 0);

        let mut last = -1.0;
        for step in 0..=7_200 {
            let tick = CountdownTick::at(&window, t0() + Duration::seconds(step));
            assert!(tick.progress_percent >= last);
            assert!((0.0..=100.0).contains(&tick.progress_percent));
            last = tick.progress_percent;
        }
    }

    #[test]
    fn test_clamped_outside_window() {
        let window = SessionWindow::new(t0());
        let before = CountdownTick::at(&window, t0() - Duration::minutes(5));
        assert_eq!(before.remaining_ms, 7_200_000);
        assert_eq!(before.progress_percent, 0.0);

        let after = CountdownTick::at(&window, t0() + Duration::hours(30));
        assert_eq!(after.remaining_ms, 0);
        assert_eq!(after.progress_percent, 100.0);
    }

    #[test]
    fn test_display_zero_pads() {
        let window = SessionWindow::new(t0());
        let tick = CountdownTick::at(&window, t0() + Duration::seconds(3_599));
        assert_eq!(tick.to_string(), "01:00:01");

        let tick = CountdownTick::at(&window, t0() + Duration::milliseconds(7_190_500));
        assert_eq!(tick.to_string(), "00:00:09");

        let tick = CountdownTick::at(&window, t0() + SESSION_DURATION);
        assert_eq!(tick.to_string(), "Expired");
    }

    #[test]
    fn test_expires_exactly_once_with_jumps_and_reordering() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut session = CountdownSession::new(SessionWindow::new(t0()));
        let counter = fired.clone();
        session.on_expire(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(matches!(
            session.tick(t0() + Duration::minutes(10)),
            TickOutcome::Running(_)
        ));
        // backgrounded host comes back long after the deadline
        assert!(matches!(
            session.tick(t0() + Duration::hours(5)),
            TickOutcome::Expired(tick) if tick.progress_percent == 100.0
        ));
        // stale tick from before the deadline
        assert_eq!(
            session.tick(t0() + Duration::minutes(20)),
            TickOutcome::AlreadyExpired
        );
        assert_eq!(
            session.tick(t0() + Duration::hours(6)),
            TickOutcome::AlreadyExpired
        );

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(session.is_expired());
    }

    #[test]
    fn test_out_of_order_ticks_never_reduce_progress() {
        let mut session = CountdownSession::new(SessionWindow::new(t0()));
        let TickOutcome::Running(later) = session.tick(t0() + Duration::minutes(60)) else {
            panic!("expected running");
        };
        let TickOutcome::Running(earlier) = session.tick(t0() + Duration::minutes(30)) else {
            panic!("expected running");
        };
        assert_eq!(later.progress_percent, 50.0);
        assert_eq!(earlier, later);
    }

    #[test]
    fn test_handler_registered_after_expiry_is_dropped() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut session = CountdownSession::new(SessionWindow::new(t0()));
        session.tick(t0() + SESSION_DURATION);

        let counter = fired.clone();
        session.on_expire(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        session.tick(t0() + SESSION_DURATION + Duration::seconds(1));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
