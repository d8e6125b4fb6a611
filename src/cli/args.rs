use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::domain::config::{default_baud_rate, CommandConfig, SessionConfig};

/// Command line arguments for TermBridge
#[derive(Parser, Debug)]
#[command(
    name = "termbridge",
    version = env!("CARGO_PKG_VERSION"),
    about = "Raw serial console bridge for embedded devices",
    long_about = "Connects the local terminal to a serial device in raw mode. Keystrokes go to the device (Enter is sent as carriage return), device output goes to the screen, and the terminal is restored when the session ends."
)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bridge the terminal to a serial device
    Connect(ConnectArgs),
    /// Send one command to a serial device and print its response
    Command(CommandArgs),
    /// List available serial ports
    List,
    /// Display version information
    Version,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
    /// Table output
    Table,
}

/// Interactive bridge arguments
#[derive(ClapArgs, Debug)]
pub struct ConnectArgs {
    /// Serial device path, e.g. /dev/ttyUSB0
    pub device: String,

    /// Baud rate (9600, 19200, 38400, 57600 or 115200)
    #[arg(short, long, default_value_t = default_baud_rate(), allow_negative_numbers = true)]
    pub baud: i32,
}

impl From<&ConnectArgs> for SessionConfig {
    fn from(args: &ConnectArgs) -> Self {
        SessionConfig::new(args.device.clone(), args.baud)
    }
}

/// Request/response arguments
#[derive(ClapArgs, Debug)]
pub struct CommandArgs {
    /// Serial device path
    pub device: String,

    /// Data to send (text, hex or base64)
    pub data: String,

    /// Baud rate
    #[arg(short, long, default_value_t = default_baud_rate(), allow_negative_numbers = true)]
    pub baud: i32,

    /// Data format of the request and the printed response
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: DataFormat,

    /// Quiet period that ends the response, in milliseconds
    #[arg(short, long = "timeout-ms", default_value = "500")]
    pub timeout_ms: u64,

    /// Maximum response size in bytes
    #[arg(long, default_value = "4096")]
    pub max_bytes: usize,

    /// Do not append a carriage return to the request
    #[arg(long)]
    pub no_terminator: bool,
}

impl From<&CommandArgs> for CommandConfig {
    fn from(args: &CommandArgs) -> Self {
        CommandConfig {
            timeout_ms: args.timeout_ms,
            max_bytes: args.max_bytes,
            terminator: !args.no_terminator,
        }
    }
}

/// Data format argument
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Text,
    Hex,
    Base64,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataFormat::Text => write!(f, "text"),
            DataFormat::Hex => write!(f, "hex"),
            DataFormat::Base64 => write!(f, "base64"),
        }
    }
}
