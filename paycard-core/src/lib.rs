#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod bridge;
pub mod controller;
pub mod copy_feedback;
pub mod countdown;
pub mod events;
pub mod processors;
pub mod store;
pub mod timers;
