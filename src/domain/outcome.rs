use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a bridging session ended.
///
/// `PeerDisconnected` is the normal end of a session that got past configuration;
/// every other kind is a failure and maps to its own negative status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// The device stopped producing data (unplugged, hung up, read error)
    PeerDisconnected,
    /// Requested baud rate is outside the supported set
    UnsupportedSpeed,
    /// Device could not be opened
    OpenFailed,
    /// Device attributes could not be read or applied
    DeviceConfigureFailed,
    /// Local terminal attributes could not be read or applied
    TerminalConfigureFailed,
    /// The readiness wait failed with something other than an interruption
    MultiplexFailed,
}

impl SessionOutcome {
    /// Status code reported to the caller. Zero means the session ran and ended normally.
    pub fn status_code(self) -> i32 {
        match self {
            Self::PeerDisconnected => 0,
            Self::UnsupportedSpeed => -1,
            Self::OpenFailed => -2,
            Self::DeviceConfigureFailed => -3,
            Self::TerminalConfigureFailed => -4,
            Self::MultiplexFailed => -5,
        }
    }

    pub fn is_success(self) -> bool {
        self.status_code() == 0
    }
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionOutcome::PeerDisconnected => write!(f, "peer disconnected"),
            SessionOutcome::UnsupportedSpeed => write!(f, "unsupported speed"),
            SessionOutcome::OpenFailed => write!(f, "open failed"),
            SessionOutcome::DeviceConfigureFailed => write!(f, "device configure failed"),
            SessionOutcome::TerminalConfigureFailed => write!(f, "terminal configure failed"),
            SessionOutcome::MultiplexFailed => write!(f, "multiplex failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL: [SessionOutcome; 6] = [
        SessionOutcome::PeerDisconnected,
        SessionOutcome::UnsupportedSpeed,
        SessionOutcome::OpenFailed,
        SessionOutcome::DeviceConfigureFailed,
        SessionOutcome::TerminalConfigureFailed,
        SessionOutcome::MultiplexFailed,
    ];

    #[test]
    fn test_status_codes_are_distinct() {
        let codes: HashSet<i32> = ALL.iter().map(|o| o.status_code()).collect();
        assert_eq!(codes.len(), ALL.len());
    }

    #[test]
    fn test_only_disconnect_is_success() {
        for outcome in ALL {
            if outcome == SessionOutcome::PeerDisconnected {
                assert!(outcome.is_success());
            } else {
                assert!(!outcome.is_success());
                assert!(outcome.status_code() < 0, "{} should be negative", outcome);
            }
        }
    }

    #[test]
    fn test_outcome_json_names() {
        let json = serde_json::to_string(&SessionOutcome::TerminalConfigureFailed).unwrap();
        assert_eq!(json, "\"terminal_configure_failed\"");
    }
}
