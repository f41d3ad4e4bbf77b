//! Where raw input comes from: a readiness check plus one record per read.

use std::fs::File;
use std::io::{self, Read};
use std::os::fd::{AsFd, BorrowedFd};
use std::path::{Path, PathBuf};
use std::time::Duration;

use evdevil::event::InputEvent;
use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};

use super::event::{parse_input_event, EventLayout};

/// A poll-driven source of raw input events.
pub trait SampleSource {
    /// True when a record can be read without blocking.
    fn is_ready(&mut self) -> io::Result<bool>;

    /// Read one record. `Ok(None)` means the record was malformed and skipped.
    fn read_event(&mut self) -> io::Result<Option<InputEvent>>;
}

/// An evdev character device read in `struct input_event` records.
pub struct DeviceSource {
    file: File,
    path: PathBuf,
    layout: EventLayout,
    malformed: u64,
}

impl DeviceSource {
    pub fn open(path: impl AsRef<Path>, layout: EventLayout) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        log::info!("Opened touch device {} ({} records)", path.display(), layout);

        Ok(Self {
            file,
            path,
            layout,
            malformed: 0,
        })
    }

    /// Block in poll(2) until readable or `timeout` passes.
    pub fn wait_ready(&self, timeout: Duration) -> io::Result<bool> {
        let ms = timeout.as_millis().min(i32::MAX as u128) as i32;
        poll_readable(self.file.as_fd(), ms)
    }
}

impl SampleSource for DeviceSource {
    fn is_ready(&mut self) -> io::Result<bool> {
        poll_readable(self.file.as_fd(), 0)
    }

    fn read_event(&mut self) -> io::Result<Option<InputEvent>> {
        let mut buf = [0u8; super::event::INPUT_EVENT_SIZE_64];
        let record = &mut buf[..self.layout.size()];
        self.file.read_exact(record)?;

        match parse_input_event(record) {
            Some((_, event)) => Ok(Some(event)),
            None => {
                self.malformed += 1;
                log::warn!("Malformed input record from {} ({} so far)", self.path.display(), self.malformed);
                Ok(None)
            }
        }
    }
}

/// Hang-ups and errors count as readable so the next read reports them.
fn poll_readable(fd: BorrowedFd<'_>, timeout_ms: i32) -> io::Result<bool> {
    let mut fds = [PollFd::new(fd, PollFlags::POLLIN)];
    let timeout = PollTimeout::try_from(timeout_ms).unwrap_or(PollTimeout::MAX);

    match poll(&mut fds, timeout) {
        Ok(0) => Ok(false),
        Ok(_) => Ok(fds[0]
            .revents()
            .is_some_and(|r| r.intersects(PollFlags::POLLIN | PollFlags::POLLHUP | PollFlags::POLLERR))),
        Err(Errno::EINTR) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
