use std::io::{self, Read, Write};
use std::os::fd::AsFd;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use nix::poll::{poll, PollFd, PollFlags, PollTimeout};

pub const WAIT_LIMIT: Duration = Duration::from_secs(5);

/// Local output double that the test thread can inspect while the bridge writes to it
#[derive(Default, Clone)]
pub struct SharedBuffer {
    data: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn contents(&self) -> Vec<u8> {
        self.data.lock().unwrap().clone()
    }

    /// Wait until the buffer holds at least `len` bytes.
    pub fn wait_for_len(&self, len: usize) -> Vec<u8> {
        let deadline = Instant::now() + WAIT_LIMIT;
        loop {
            let contents = self.contents();
            if contents.len() >= len {
                return contents;
            }
            assert!(Instant::now() < deadline, "timed out waiting for output, have {:?}", contents);
            thread::sleep(Duration::from_millis(5));
        }
    }

    /// Wait until the buffer ends with `suffix`.
    pub fn wait_for_suffix(&self, suffix: &[u8]) -> Vec<u8> {
        let deadline = Instant::now() + WAIT_LIMIT;
        loop {
            let contents = self.contents();
            if contents.ends_with(suffix) {
                return contents;
            }
            assert!(Instant::now() < deadline, "timed out waiting for output, have {:?}", contents);
            thread::sleep(Duration::from_millis(5));
        }
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Read exactly `len` bytes, failing the test instead of blocking forever.
pub fn read_exact_timeout<R: Read + AsFd>(source: &mut R, len: usize) -> Vec<u8> {
    let mut received = Vec::new();
    let mut chunk = [0u8; 256];
    while received.len() < len {
        let mut fds = [PollFd::new(source.as_fd(), PollFlags::POLLIN)];
        let ready = poll(&mut fds, PollTimeout::from(5000u16)).unwrap();
        assert!(ready > 0, "timed out reading, have {:?}", received);
        let want = (len - received.len()).min(chunk.len());
        let n = source.read(&mut chunk[..want]).unwrap();
        assert!(n > 0, "stream closed early, have {:?}", received);
        received.extend_from_slice(&chunk[..n]);
    }
    received
}
