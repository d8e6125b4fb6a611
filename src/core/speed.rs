use nix::sys::termios::BaudRate;

use crate::domain::error::{BridgeError, BridgeResult};

/// Baud rates a session can be opened at. The set is closed; there is no nearest match.
pub const SUPPORTED_RATES: [i32; 5] = [9600, 19200, 38400, 57600, 115200];

/// Translate a requested rate into the platform speed token.
pub fn resolve_speed(rate: i32) -> BridgeResult<BaudRate> {
    match rate {
        9600 => Ok(BaudRate::B9600),
        19200 => Ok(BaudRate::B19200),
        38400 => Ok(BaudRate::B38400),
        57600 => Ok(BaudRate::B57600),
        115200 => Ok(BaudRate::B115200),
        _ => Err(BridgeError::UnsupportedSpeed(rate)),
    }
}

/// Comma separated list of supported rates, for diagnostics.
pub fn supported_rates_list() -> String {
    SUPPORTED_RATES
        .iter()
        .map(|rate| rate.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
