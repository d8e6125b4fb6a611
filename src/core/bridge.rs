use crate::core::speed::resolve_speed;
use crate::domain::{
    config::SessionConfig,
    error::{BridgeError, BridgeResult},
};
use crate::infrastructure::serial::device::Device;
use crate::infrastructure::terminal::TerminalModeGuard;
use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read, Stdout, Write};
use std::os::fd::AsFd;
use tracing::{debug, info, warn};

/// Largest single read from the device
pub const DEVICE_CHUNK_SIZE: usize = 255;

const LINE_FEED: u8 = b'\n';
const CARRIAGE_RETURN: u8 = b'\r';

/// Rewrite a keystroke for the device: line-feed becomes carriage-return,
/// everything else passes through.
pub fn translate_outgoing(byte: u8) -> u8 {
    if byte == LINE_FEED {
        CARRIAGE_RETURN
    } else {
        byte
    }
}

/// Bytes moved in each direction during a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficCounters {
    pub bytes_from_device: u64,
    pub bytes_to_device: u64,
    pub write_failures: u64,
}

/// The user's side of the bridge
pub struct LocalConsole<I, O> {
    pub input: I,
    pub output: O,
}

impl<I, O> LocalConsole<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }
}

impl LocalConsole<File, Stdout> {
    /// The process's standard input and output.
    ///
    /// Input is read through its own descriptor, unbuffered, so that readiness
    /// reported by the wait always matches what a read returns.
    pub fn stdio() -> BridgeResult<Self> {
        let input = io::stdin()
            .as_fd()
            .try_clone_to_owned()
            .map_err(BridgeError::TerminalConfigureFailed)?;
        Ok(Self::new(File::from(input), io::stdout()))
    }
}

enum Readiness {
    /// A signal arrived before anything became ready
    Interrupted,
    Ready { device: bool, input: bool },
}

/// Moves bytes between a device and the local console until the device goes away.
pub struct BridgeLoop<D, I, O> {
    // Fields drop in declaration order: the terminal comes back before the device closes.
    guard: Option<TerminalModeGuard>,
    device: D,
    input: I,
    output: O,
    input_open: bool,
    counters: TrafficCounters,
}

impl<I: Read + AsFd, O: Write> BridgeLoop<Device, I, O> {
    /// Resolve the speed, open and configure the device, then put the local terminal
    /// into raw input mode.
    ///
    /// Each step only runs when the previous one succeeded, and whatever was acquired
    /// before a failure is released on the way out.
    pub fn connect(config: &SessionConfig, console: LocalConsole<I, O>) -> BridgeResult<Self> {
        let speed = resolve_speed(config.baud)?;
        let device = Device::open(&config.device, speed)?;
        let guard = TerminalModeGuard::engage(console.input.as_fd())?;

        let mut bridge = Self::new(device, console.input, console.output).with_guard(guard);
        bridge.announce(&format!("Connected to {} at {} baud.", config.device, config.baud));
        Ok(bridge)
    }
}

impl<D, I, O> BridgeLoop<D, I, O>
where
    D: Read + Write + AsFd,
    I: Read + AsFd,
    O: Write,
{
    pub fn new(device: D, input: I, output: O) -> Self {
        Self {
            guard: None,
            device,
            input,
            output,
            input_open: true,
            counters: TrafficCounters::default(),
        }
    }

    /// Hand the terminal guard to the loop so it is released together with the device.
    pub fn with_guard(mut self, guard: TerminalModeGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Print a status line on the local output.
    pub fn announce(&mut self, line: &str) {
        let result = writeln!(self.output, "{}", line).and_then(|_| self.output.flush());
        if let Err(e) = result {
            warn!("Failed to write status line: {}", e);
        }
    }

    /// Bridge traffic until the device disconnects.
    ///
    /// Returns `Ok(())` when the device went away and the wait's error when waiting
    /// for readiness failed. Interrupted waits are retried.
    pub fn run(&mut self) -> nix::Result<()> {
        loop {
            let (device_ready, input_ready) = match self.wait() {
                Ok(Readiness::Interrupted) => continue,
                Ok(Readiness::Ready { device, input }) => (device, input),
                Err(e) => {
                    warn!("Readiness wait failed: {}", e);
                    return Err(e);
                }
            };

            if device_ready && !self.pump_device() {
                info!("Serial device disconnected");
                return Ok(());
            }
            if input_ready {
                self.pump_input();
            }
        }
    }

    /// Restore the terminal, then close the device.
    pub fn close(mut self) -> TrafficCounters {
        if let Some(mut guard) = self.guard.take() {
            guard.restore();
        }
        let counters = self.counters;
        drop(self);
        counters
    }

    /// Block until the device or the local input is readable. No timeout.
    fn wait(&self) -> nix::Result<Readiness> {
        let mut fds = [
            PollFd::new(self.device.as_fd(), PollFlags::POLLIN),
            PollFd::new(self.input.as_fd(), PollFlags::POLLIN),
        ];
        let watched = if self.input_open { fds.len() } else { 1 };

        match poll(&mut fds[..watched], PollTimeout::NONE) {
            Ok(_) => {}
            Err(Errno::EINTR) => return Ok(Readiness::Interrupted),
            Err(e) => return Err(e),
        }

        // Hang-ups and errors count as readable so the next read observes them.
        let ready = |fd: &PollFd| {
            fd.revents().map_or(false, |events| {
                events.intersects(
                    PollFlags::POLLIN | PollFlags::POLLHUP | PollFlags::POLLERR | PollFlags::POLLNVAL,
                )
            })
        };

        Ok(Readiness::Ready {
            device: ready(&fds[0]),
            input: watched > 1 && ready(&fds[1]),
        })
    }

    /// Forward one chunk from the device to the local output.
    /// Returns `false` once the device is gone.
    fn pump_device(&mut self) -> bool {
        let mut buf = [0u8; DEVICE_CHUNK_SIZE];
        let n = match self.device.read(&mut buf) {
            Ok(0) => return false,
            Ok(n) => n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => return true,
            Err(e) => {
                debug!("Serial read failed: {}", e);
                return false;
            }
        };

        self.counters.bytes_from_device += n as u64;
        let result = self.output.write_all(&buf[..n]).and_then(|_| self.output.flush());
        if let Err(e) = result {
            self.counters.write_failures += 1;
            warn!("Dropped {} bytes for the local output: {}", n, e);
        }
        true
    }

    /// Forward a single keystroke to the device.
    fn pump_input(&mut self) {
        let mut byte = [0u8; 1];
        match self.input.read(&mut byte) {
            Ok(1) => {}
            Ok(_) => {
                // End of input is not fatal, but there is nothing left to wait for.
                debug!("Local input reached end of stream");
                self.input_open = false;
                return;
            }
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => return,
            Err(e) => {
                debug!("Local input read failed, no longer watching it: {}", e);
                self.input_open = false;
                return;
            }
        }

        let out = [translate_outgoing(byte[0])];
        match self.device.write_all(&out) {
            Ok(()) => self.counters.bytes_to_device += 1,
            Err(e) => {
                self.counters.write_failures += 1;
                warn!("Dropped keystroke for the serial device: {}", e);
            }
        }
    }
}
