// Terminal module - Local terminal mode management
use crate::domain::error::{BridgeError, BridgeResult};
use nix::sys::termios::{self, LocalFlags, SetArg, SpecialCharacterIndices, Termios};
use std::io;
use std::os::fd::{AsFd, BorrowedFd, OwnedFd};
use tracing::{debug, warn};

/// Keeps the local terminal in unbuffered, no-echo mode while alive.
///
/// The original attributes are captured once in [`TerminalModeGuard::engage`] and put
/// back by [`TerminalModeGuard::restore`], which runs at the latest when the guard is
/// dropped. Restoring an inactive guard does nothing.
#[derive(Debug)]
pub struct TerminalModeGuard {
    fd: OwnedFd,
    snapshot: Termios,
    active: bool,
}

impl TerminalModeGuard {
    /// Capture the attributes of the terminal behind `fd` and switch it to byte-at-a-time
    /// input without echo. All other flags keep their original values.
    pub fn engage(fd: BorrowedFd<'_>) -> BridgeResult<Self> {
        // The guard keeps its own descriptor so it can restore independently of the
        // stream it was created from.
        let fd = fd
            .try_clone_to_owned()
            .map_err(BridgeError::TerminalConfigureFailed)?;

        let snapshot = termios::tcgetattr(fd.as_fd()).map_err(terminal_error)?;

        let mut raw = snapshot.clone();
        raw.local_flags &= !(LocalFlags::ICANON | LocalFlags::ECHO);
        raw.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
        raw.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;

        termios::tcsetattr(fd.as_fd(), SetArg::TCSANOW, &raw).map_err(terminal_error)?;
        debug!("Local terminal switched to raw input");

        Ok(Self {
            fd,
            snapshot,
            active: true,
        })
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Attributes captured before the terminal was modified
    pub fn snapshot(&self) -> &Termios {
        &self.snapshot
    }

    /// Put the captured attributes back. Subsequent calls are no-ops.
    pub fn restore(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;

        match termios::tcsetattr(self.fd.as_fd(), SetArg::TCSANOW, &self.snapshot) {
            Ok(()) => debug!("Local terminal mode restored"),
            Err(e) => warn!("Failed to restore local terminal mode: {}", e),
        }
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        self.restore();
    }
}

fn terminal_error(errno: nix::Error) -> BridgeError {
    BridgeError::TerminalConfigureFailed(io::Error::from(errno))
}
