//! CLI Exit Codes
//!
//! Process exit codes for each way a run can end.

use crate::domain::error::BridgeError;
use crate::domain::outcome::SessionOutcome;

/// Exit code constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCodes;

impl ExitCodes {
    /// Success, including a session that ended because the device went away
    pub const SUCCESS: u8 = 0;

    /// Baud rate outside the supported set
    pub const UNSUPPORTED_SPEED: u8 = 1;

    /// Device could not be opened
    pub const OPEN_FAILED: u8 = 2;

    /// Device attributes could not be applied
    pub const DEVICE_CONFIGURE_FAILED: u8 = 3;

    /// Local terminal attributes could not be applied
    pub const TERMINAL_CONFIGURE_FAILED: u8 = 4;

    /// Readiness wait failed
    pub const MULTIPLEX_FAILED: u8 = 5;

    /// Invalid arguments or input data
    pub const INVALID_INPUT: u8 = 64;

    /// Serial port layer error
    pub const SERIAL_ERROR: u8 = 69;

    /// I/O or output error
    pub const IO_ERROR: u8 = 74;
}

/// Exit code for a finished session.
pub fn outcome_exit_code(outcome: SessionOutcome) -> u8 {
    match outcome {
        SessionOutcome::PeerDisconnected => ExitCodes::SUCCESS,
        SessionOutcome::UnsupportedSpeed => ExitCodes::UNSUPPORTED_SPEED,
        SessionOutcome::OpenFailed => ExitCodes::OPEN_FAILED,
        SessionOutcome::DeviceConfigureFailed => ExitCodes::DEVICE_CONFIGURE_FAILED,
        SessionOutcome::TerminalConfigureFailed => ExitCodes::TERMINAL_CONFIGURE_FAILED,
        SessionOutcome::MultiplexFailed => ExitCodes::MULTIPLEX_FAILED,
    }
}

/// Exit code for an error that ended a command.
pub fn error_exit_code(error: &BridgeError) -> u8 {
    if let Some(outcome) = error.outcome() {
        return outcome_exit_code(outcome);
    }
    match error {
        BridgeError::InvalidInput(_) => ExitCodes::INVALID_INPUT,
        BridgeError::Serial(_) => ExitCodes::SERIAL_ERROR,
        _ => ExitCodes::IO_ERROR,
    }
}
