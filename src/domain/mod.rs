// Domain module - Configuration, outcomes and errors
pub mod config;
pub mod error;
pub mod outcome;

pub use config::{CommandConfig, SessionConfig};
pub use error::{BridgeError, BridgeResult};
pub use outcome::SessionOutcome;
