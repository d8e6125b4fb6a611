//! TermBridge Library
//!
//! Raw serial console bridge: connects the local terminal to a serial device,
//! restoring the terminal however the session ends.

pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use domain::error::{BridgeError, BridgeResult};
pub use domain::config::{CommandConfig, SessionConfig};
pub use domain::outcome::SessionOutcome;
pub use core::session::{run_session, BridgeState, Session, SessionReport};
pub use core::bridge::{BridgeLoop, LocalConsole, TrafficCounters};
pub use infrastructure::terminal::TerminalModeGuard;
