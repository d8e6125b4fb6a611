use crate::domain::error::{BridgeError, BridgeResult};
use nix::sys::termios::{self, BaudRate, ControlFlags, SetArg};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::fd::{AsFd, BorrowedFd};
use std::os::unix::fs::OpenOptionsExt;
use tracing::{debug, info};

/// An open serial device in raw mode.
///
/// The handle is closed when the value is dropped. A `Device` only exists once both
/// the open and the attribute configuration succeeded.
#[derive(Debug)]
pub struct Device {
    file: File,
    path: String,
    speed: BaudRate,
}

impl Device {
    /// Open `path` for reading and writing without making it the controlling terminal,
    /// then switch it to raw mode at `speed`.
    pub fn open(path: &str, speed: BaudRate) -> BridgeResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY)
            .open(path)
            .map_err(|source| BridgeError::OpenFailed {
                path: path.to_string(),
                source,
            })?;
        debug!(device = path, "Serial device opened");

        // On failure `file` is dropped here, so no handle outlives the error.
        configure_raw(file.as_fd(), speed).map_err(|source| BridgeError::DeviceConfigureFailed {
            path: path.to_string(),
            source,
        })?;

        info!(device = path, speed = ?speed, "Serial device configured for raw mode");

        Ok(Self {
            file,
            path: path.to_string(),
            speed,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn speed(&self) -> BaudRate {
        self.speed
    }
}

/// Raw byte exchange: no line editing, echo, signals or translation; receiver on,
/// modem control lines ignored, hardware flow control off.
fn configure_raw(fd: BorrowedFd<'_>, speed: BaudRate) -> nix::Result<()> {
    let mut tty = termios::tcgetattr(fd)?;

    termios::cfmakeraw(&mut tty);
    termios::cfsetspeed(&mut tty, speed)?;
    tty.control_flags |= ControlFlags::CLOCAL | ControlFlags::CREAD;
    tty.control_flags &= !ControlFlags::CRTSCTS;

    termios::tcsetattr(fd, SetArg::TCSANOW, &tty)
}

impl Read for Device {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for Device {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl AsFd for Device {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        debug!(device = %self.path, "Serial device closed");
    }
}
