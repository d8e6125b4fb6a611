use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::time::Duration;

use termbridge::infrastructure::serial::CommandPort;
use termbridge::BridgeResult;

/// In-memory serial port that answers every request with a canned reply
#[derive(Default)]
pub struct MockPort {
    pub pending: VecDeque<u8>,
    pub written: Vec<u8>,
    pub reply: Vec<u8>,
    pub discards: usize,
    pub timeout: Option<Duration>,
}

impl MockPort {
    pub fn replying(reply: &[u8]) -> Self {
        Self {
            reply: reply.to_vec(),
            ..Self::default()
        }
    }
}

impl Read for MockPort {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pending.is_empty() {
            return Err(io::ErrorKind::TimedOut.into());
        }
        let len = buf.len().min(self.pending.len());
        for (slot, byte) in buf.iter_mut().zip(self.pending.drain(..len)) {
            *slot = byte;
        }
        Ok(len)
    }
}

impl Write for MockPort {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        self.pending.extend(self.reply.iter().copied());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl CommandPort for MockPort {
    fn discard_input(&mut self) -> BridgeResult<()> {
        self.pending.clear();
        self.discards += 1;
        Ok(())
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> BridgeResult<()> {
        self.timeout = Some(timeout);
        Ok(())
    }
}
