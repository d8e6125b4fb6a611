use thiserror::Error;

use crate::domain::outcome::SessionOutcome;

/// TermBridge unified error type
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Unsupported baud rate {0} (supported: {})", crate::core::speed::supported_rates_list())]
    UnsupportedSpeed(i32),

    #[error("Failed to open serial device '{path}': {source}")]
    OpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to configure serial device '{path}': {source}")]
    DeviceConfigureFailed {
        path: String,
        #[source]
        source: nix::Error,
    },

    #[error("Failed to configure local terminal: {0}")]
    TerminalConfigureFailed(#[source] std::io::Error),

    #[error("Multiplexed wait failed: {0}")]
    MultiplexFailed(#[source] nix::Error),

    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Output error: {0}")]
    Output(String),
}

impl BridgeError {
    /// The session outcome this error ends a bridging session with, if any.
    pub fn outcome(&self) -> Option<SessionOutcome> {
        match self {
            Self::UnsupportedSpeed(_) => Some(SessionOutcome::UnsupportedSpeed),
            Self::OpenFailed { .. } => Some(SessionOutcome::OpenFailed),
            Self::DeviceConfigureFailed { .. } => Some(SessionOutcome::DeviceConfigureFailed),
            Self::TerminalConfigureFailed(_) => Some(SessionOutcome::TerminalConfigureFailed),
            Self::MultiplexFailed(_) => Some(SessionOutcome::MultiplexFailed),
            _ => None,
        }
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;
