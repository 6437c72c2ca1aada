//! Event channel factories and handles.

use super::types::{SessionCommand, SessionUpdate};
use tokio::sync::mpsc;

/// Default buffer size for session channels.
///
/// Commands come from a single payer and updates arrive once per second, so
/// a small buffer is plenty.
pub const DEFAULT_CHANNEL_BUFFER: usize = 64;

/// Sender handle for SessionCommand events.
pub type SessionCommandSender = mpsc::Sender<SessionCommand>;
/// Receiver handle for SessionCommand events.
pub type SessionCommandReceiver = mpsc::Receiver<SessionCommand>;

/// Sender handle for SessionUpdate events.
pub type SessionUpdateSender = mpsc::Sender<SessionUpdate>;
/// Receiver handle for SessionUpdate events.
pub type SessionUpdateReceiver = mpsc::Receiver<SessionUpdate>;

/// Create a new SessionCommand channel.
///
/// Multiple senders can be cloned from the returned sender (input handling,
/// config reload).
pub fn session_command_channel() -> (SessionCommandSender, SessionCommandReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}

/// Create a new SessionUpdate channel.
pub fn session_update_channel() -> (SessionUpdateSender, SessionUpdateReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}
