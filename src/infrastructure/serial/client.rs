use crate::core::speed::resolve_speed;
use crate::domain::{
    config::CommandConfig,
    error::{BridgeError, BridgeResult},
};
use serde::Serialize;
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{self, Read, Write};
use std::time::Duration;
use tracing::{debug, info};

/// Read timeout used until a command sets its own
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Size of a single read while collecting a response
const RESPONSE_CHUNK_SIZE: usize = 256;

/// Port operations the request/response helper needs beyond plain reads and writes.
///
/// Implementors read with a timeout and report an expired timeout as
/// [`io::ErrorKind::TimedOut`].
pub trait CommandPort: Read + Write {
    /// Drop whatever the device sent before the current request.
    fn discard_input(&mut self) -> BridgeResult<()>;

    /// Set how long a read waits for the first byte.
    fn set_read_timeout(&mut self, timeout: Duration) -> BridgeResult<()>;
}

impl CommandPort for Box<dyn SerialPort> {
    fn discard_input(&mut self) -> BridgeResult<()> {
        self.clear(ClearBuffer::Input)?;
        Ok(())
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> BridgeResult<()> {
        self.set_timeout(timeout)?;
        Ok(())
    }
}

/// Blocking serial handle with open/read/write/close primitives and a
/// "send command, collect response" helper.
pub struct SerialClient<P = Box<dyn SerialPort>> {
    port: P,
    path: String,
}

impl SerialClient {
    /// Open `path` at `rate` (8N1, no flow control).
    ///
    /// The rate must be one of the rates an interactive session accepts.
    pub fn open(path: &str, rate: i32) -> BridgeResult<Self> {
        resolve_speed(rate)?;

        let port = serialport::new(path, rate as u32)
            .data_bits(DataBits::Eight)
            .stop_bits(StopBits::One)
            .parity(Parity::None)
            .flow_control(FlowControl::None)
            .timeout(DEFAULT_READ_TIMEOUT)
            .open()
            .map_err(|e| BridgeError::OpenFailed {
                path: path.to_string(),
                source: io::Error::from(e),
            })?;

        info!(device = path, baud = rate, "Serial port opened");
        Ok(Self::with_port(port, path))
    }
}

impl<P: CommandPort> SerialClient<P> {
    /// Wrap an already opened port.
    pub fn with_port(port: P, path: impl Into<String>) -> Self {
        Self {
            port,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The wrapped port.
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Write all of `data` and flush. Returns the number of bytes written.
    pub fn write(&mut self, data: &[u8]) -> BridgeResult<usize> {
        self.port.write_all(data)?;
        self.port.flush()?;
        debug!("Sent {} bytes over serial", data.len());
        Ok(data.len())
    }

    /// Single read into `buf`. An expired read timeout yields `Ok(0)`.
    pub fn read(&mut self, buf: &mut [u8]) -> BridgeResult<usize> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(ref e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    /// Send `command` and collect the device's answer.
    ///
    /// Input pending before the request is discarded. Collection stops once the
    /// device stays quiet for `config.timeout()` or `config.max_bytes` have arrived.
    pub fn run_command(&mut self, command: &[u8], config: &CommandConfig) -> BridgeResult<Vec<u8>> {
        if config.max_bytes == 0 {
            return Err(BridgeError::InvalidInput(
                "Response size limit must be at least one byte".to_string(),
            ));
        }

        self.port.discard_input()?;
        self.port.set_read_timeout(config.timeout())?;

        let mut request = command.to_vec();
        if config.terminator {
            request.push(b'\r');
        }
        self.write(&request)?;

        let mut response = Vec::new();
        let mut chunk = [0u8; RESPONSE_CHUNK_SIZE];
        while response.len() < config.max_bytes {
            let n = self.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            response.extend_from_slice(&chunk[..n]);
        }
        response.truncate(config.max_bytes);

        debug!(device = %self.path, "Collected {} response bytes", response.len());
        Ok(response)
    }

    /// Release the port.
    pub fn close(self) {
        debug!(device = %self.path, "Serial port closed");
    }
}

/// A serial port found on the system
#[derive(Debug, Clone, Serialize)]
pub struct PortInfo {
    pub name: String,
    pub kind: String,
    pub description: Option<String>,
}

impl From<serialport::SerialPortInfo> for PortInfo {
    fn from(info: serialport::SerialPortInfo) -> Self {
        let (kind, description) = match info.port_type {
            serialport::SerialPortType::UsbPort(usb) => {
                let description = match (usb.manufacturer, usb.product) {
                    (Some(m), Some(p)) => Some(format!("{} {}", m, p)),
                    (m, p) => m.or(p),
                };
                (
                    format!("usb {:04x}:{:04x}", usb.vid, usb.pid),
                    description,
                )
            }
            serialport::SerialPortType::PciPort => ("pci".to_string(), None),
            serialport::SerialPortType::BluetoothPort => ("bluetooth".to_string(), None),
            serialport::SerialPortType::Unknown => ("unknown".to_string(), None),
        };

        Self {
            name: info.port_name,
            kind,
            description,
        }
    }
}

/// Enumerate serial ports present on the system.
pub fn available_ports() -> BridgeResult<Vec<PortInfo>> {
    let ports = serialport::available_ports()?;
    Ok(ports.into_iter().map(PortInfo::from).collect())
}
