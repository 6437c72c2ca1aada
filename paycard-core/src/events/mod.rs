//! Messages exchanged between a running session and its host.
//!
//! # Flow
//!
//! 1. The host sends `SessionCommand`s (copy, toggle bridge, new invoice)
//!    to the `SessionDriver`.
//! 2. The driver applies them to its `SessionController`, runs due timers,
//!    and emits `SessionUpdate`s back to the host for rendering.
//!
//! Updates are snapshots: the host never has to ask the session for state.

pub mod channels;
pub mod types;

pub use channels::{
    DEFAULT_CHANNEL_BUFFER, SessionCommandReceiver, SessionCommandSender, SessionUpdateReceiver,
    SessionUpdateSender, session_command_channel, session_update_channel,
};

pub use types::{SessionCommand, SessionUpdate};
