use crate::core::bridge::{BridgeLoop, LocalConsole, TrafficCounters};
use crate::domain::{config::SessionConfig, error::BridgeError, outcome::SessionOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Write};
use std::os::fd::AsFd;
use tracing::{debug, error, info};

/// Lifecycle of a bridging session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BridgeState {
    /// Created, nothing acquired yet
    Idle,
    /// Resolving speed, opening the device, switching the terminal
    Configuring,
    /// Bridging traffic
    Running,
    /// Giving the terminal back and closing the device
    Draining,
    /// Finished; the outcome is final
    Closed,
}

impl fmt::Display for BridgeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeState::Idle => write!(f, "Idle"),
            BridgeState::Configuring => write!(f, "Configuring"),
            BridgeState::Running => write!(f, "Running"),
            BridgeState::Draining => write!(f, "Draining"),
            BridgeState::Closed => write!(f, "Closed"),
        }
    }
}

/// What a finished session reports to its caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub device: String,
    pub baud: i32,
    pub outcome: SessionOutcome,
    pub status_code: i32,
    pub traffic: TrafficCounters,
    /// Human readable cause for failed sessions
    pub diagnostic: Option<String>,
}

impl SessionReport {
    fn new(config: &SessionConfig, outcome: SessionOutcome) -> Self {
        Self {
            device: config.device.clone(),
            baud: config.baud,
            outcome,
            status_code: outcome.status_code(),
            traffic: TrafficCounters::default(),
            diagnostic: None,
        }
    }

    fn failed(config: &SessionConfig, outcome: SessionOutcome, error: &BridgeError) -> Self {
        let mut report = Self::new(config, outcome);
        report.diagnostic = Some(error.to_string());
        report
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

/// One interactive bridging session between the local console and a serial device
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    state: BridgeState,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: BridgeState::Idle,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// Bridge the process's standard input and output to the device.
    pub fn run(&mut self) -> SessionReport {
        match LocalConsole::stdio() {
            Ok(console) => self.run_with(console),
            Err(e) => {
                self.transition(BridgeState::Configuring);
                self.fail(e)
            }
        }
    }

    /// Bridge the given console to the device until it disconnects or the wait fails.
    pub fn run_with<I, O>(&mut self, console: LocalConsole<I, O>) -> SessionReport
    where
        I: Read + AsFd,
        O: Write,
    {
        self.transition(BridgeState::Configuring);
        let mut bridge = match BridgeLoop::connect(&self.config, console) {
            Ok(bridge) => bridge,
            Err(e) => return self.fail(e),
        };

        self.transition(BridgeState::Running);
        info!(device = %self.config.device, baud = self.config.baud, "Bridge running");
        let result = bridge.run();

        self.transition(BridgeState::Draining);
        let traffic = bridge.close();
        self.transition(BridgeState::Closed);

        let mut report = match result {
            Ok(()) => SessionReport::new(&self.config, SessionOutcome::PeerDisconnected),
            Err(errno) => SessionReport::failed(
                &self.config,
                SessionOutcome::MultiplexFailed,
                &BridgeError::MultiplexFailed(errno),
            ),
        };
        report.traffic = traffic;

        info!(
            outcome = %report.outcome,
            from_device = traffic.bytes_from_device,
            to_device = traffic.bytes_to_device,
            "Session finished"
        );
        report
    }

    fn fail(&mut self, error: BridgeError) -> SessionReport {
        error!("{}", error);
        self.transition(BridgeState::Closed);
        let outcome = match error.outcome() {
            Some(outcome) => outcome,
            // Setup only raises classified errors, except while preparing the local console
            None => SessionOutcome::TerminalConfigureFailed,
        };
        SessionReport::failed(&self.config, outcome, &error)
    }

    fn transition(&mut self, next: BridgeState) {
        debug!("Session state {} -> {}", self.state, next);
        self.state = next;
    }
}

/// Run a bridging session on the process's standard streams.
pub fn run_session(config: SessionConfig) -> SessionReport {
    Session::new(config).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::net::UnixStream;

    fn console() -> (LocalConsole<UnixStream, Vec<u8>>, UnixStream) {
        let (input, keys) = UnixStream::pair().unwrap();
        (LocalConsole::new(input, Vec::new()), keys)
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new(SessionConfig::new("/dev/ttyUSB0", 9600));
        assert_eq!(session.state(), BridgeState::Idle);
        assert_eq!(session.config().baud, 9600);
    }

    #[test]
    fn test_unsupported_speed_closes_without_running() {
        let (console, _keys) = console();
        let mut session = Session::new(SessionConfig::new("/dev/ttyUSB0", 4800));

        let report = session.run_with(console);
        assert_eq!(report.outcome, SessionOutcome::UnsupportedSpeed);
        assert_eq!(report.status_code, -1);
        assert!(report.diagnostic.unwrap().contains("4800"));
        assert_eq!(session.state(), BridgeState::Closed);
    }

    #[test]
    fn test_open_failure_reports_distinct_status() {
        let (console, _keys) = console();
        let mut session = Session::new(SessionConfig::new("/dev/does-not-exist-termbridge", 115200));

        let report = session.run_with(console);
        assert_eq!(report.outcome, SessionOutcome::OpenFailed);
        assert_eq!(report.status_code, -2);
        assert!(!report.is_success());
        assert_eq!(report.traffic, TrafficCounters::default());
    }

    #[test]
    fn test_failed_wait_reports_multiplex_failure() {
        let config = SessionConfig::new("/dev/ttyUSB0", 115200);
        let error = BridgeError::MultiplexFailed(nix::Error::EINVAL);

        let report = SessionReport::failed(&config, SessionOutcome::MultiplexFailed, &error);
        assert_eq!(report.outcome, SessionOutcome::MultiplexFailed);
        assert_eq!(report.status_code, -5);
        assert_eq!(report.diagnostic, Some(error.to_string()));
    }

    #[test]
    fn test_unclassified_setup_error_is_a_terminal_failure() {
        let mut session = Session::new(SessionConfig::new("/dev/ttyUSB0", 115200));
        let error = BridgeError::Io(std::io::Error::new(std::io::ErrorKind::Other, "stdin closed"));

        let report = session.fail(error);
        assert_eq!(report.outcome, SessionOutcome::TerminalConfigureFailed);
        assert_eq!(report.status_code, -4);
        assert_eq!(session.state(), BridgeState::Closed);
    }
}
