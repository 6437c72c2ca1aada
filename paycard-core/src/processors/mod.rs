//! Async processors that run a session inside a tokio runtime.
//!
//! - `SessionDriver`: Receives `SessionCommand`, runs due timers, emits
//!   `SessionUpdate`

pub mod session_driver;

pub use session_driver::{Clock, SessionDriver, SystemClock};
