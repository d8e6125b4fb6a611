use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Interactive session configuration.
///
/// Device path and baud rate are the only knobs a bridging session has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Path to the serial character device
    pub device: String,
    /// Requested baud rate, validated when the session starts
    #[serde(default = "default_baud_rate")]
    pub baud: i32,
}

impl SessionConfig {
    pub fn new(device: impl Into<String>, baud: i32) -> Self {
        Self {
            device: device.into(),
            baud,
        }
    }
}

/// Request/response helper settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandConfig {
    /// Quiet period that ends response collection, in milliseconds
    #[serde(default = "default_response_timeout")]
    pub timeout_ms: u64,
    /// Upper bound on collected response bytes
    #[serde(default = "default_max_response_bytes")]
    pub max_bytes: usize,
    /// Append a carriage return to the command
    #[serde(default = "default_terminator")]
    pub terminator: bool,
}

impl CommandConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_response_timeout(),
            max_bytes: default_max_response_bytes(),
            terminator: default_terminator(),
        }
    }
}

pub fn default_baud_rate() -> i32 {
    115_200
}

fn default_response_timeout() -> u64 {
    500
}

fn default_max_response_bytes() -> usize {
    4096
}

fn default_terminator() -> bool {
    true
}
