use std::fs::OpenOptions;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, IntoRawFd, OwnedFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::debug;

use crate::config::{LineConfig, LineSettings};
use crate::error::{LineError, Result};
use crate::io::{self, Payload};
use crate::termios;
use crate::timing::ReadTiming;

/// An open serial device in raw mode.
///
/// The descriptor is released when the value is dropped or passed to [`close`](Self::close),
/// so a line can never be used after it has been closed.
pub struct SerialLine {
    fd: OwnedFd,
    path: Option<PathBuf>,
}

impl SerialLine {
    /// Open `path` and program it with [`LineConfig::default`] (9600 baud, `(0, 5)` timing).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, &LineConfig::default())
    }

    /// Open `path` read-write without acquiring it as a controlling terminal, with
    /// synchronous writes, and apply `config`.
    ///
    /// If configuration fails the descriptor is closed before the error is returned.
    pub fn open_with_config(path: impl AsRef<Path>, config: &LineConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY | libc::O_SYNC)
            .open(&path)
            .map_err(|source| LineError::Open {
                path: path.clone(),
                source,
            })?;
        let fd = OwnedFd::from(file);

        if let Err(err) = termios::configure(&fd, config) {
            debug!(?path, error = %err, "configuration failed, releasing descriptor");
            return Err(err);
        }

        debug!(?path, fd = fd.as_raw_fd(), "opened serial line");
        Ok(Self {
            fd,
            path: Some(path),
        })
    }

    /// Device path, when the line was opened by path.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Reapply the full raw-mode configuration.
    pub fn configure(&self, config: &LineConfig) -> Result<()> {
        termios::configure(&self.fd, config)
    }

    /// Change only the timing to `(min_bytes, 5)`.
    pub fn set_blocking(&self, min_bytes: u8) -> Result<()> {
        termios::set_blocking(&self.fd, min_bytes)
    }

    pub fn set_timing(&self, timing: ReadTiming) -> Result<()> {
        termios::set_timing(&self.fd, timing)
    }

    pub fn settings(&self) -> Result<LineSettings> {
        termios::read_settings(&self.fd)
    }

    /// One bounded `read(2)` under the current timing mode.
    pub fn read_chunk(&self, buf: &mut [u8]) -> Result<usize> {
        Ok(io::read_chunk(&self.fd, buf)?)
    }

    /// Drain everything currently available. See [`io::drain`](crate::io::drain).
    pub fn read(&self) -> Bytes {
        io::drain(&self.fd)
    }

    /// Write the payload with a single `write(2)` and return the count the OS accepted.
    pub fn write<'a>(&self, payload: impl Into<Payload<'a>>) -> Result<usize> {
        Ok(io::write_payload(&self.fd, payload)?)
    }

    /// Release the descriptor. Failures from `close(2)` are logged, not returned.
    pub fn close(self) {
        let fd = self.fd.into_raw_fd();

        // SAFETY: `fd` came out of the OwnedFd above and is not used again.
        let rc = unsafe { libc::close(fd) };
        if rc != 0 {
            debug!(fd, error = %std::io::Error::last_os_error(), "close failed");
        } else {
            debug!(fd, "closed serial line");
        }
    }
}

/// Reject descriptor values that can never name an open file.
pub fn check_descriptor(fd: RawFd) -> Result<RawFd> {
    if fd < 0 {
        return Err(LineError::invalid_argument(format!(
            "descriptor must be non-negative, got {fd}"
        )));
    }
    Ok(fd)
}

impl AsFd for SerialLine {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl AsRawFd for SerialLine {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl IntoRawFd for SerialLine {
    fn into_raw_fd(self) -> RawFd {
        self.fd.into_raw_fd()
    }
}

impl FromRawFd for SerialLine {
    /// Adopt a descriptor that was configured earlier, e.g. one handed out by
    /// [`into_raw_fd`](IntoRawFd::into_raw_fd).
    ///
    /// # Safety
    /// `fd` must be open and not owned by anything else.
    unsafe fn from_raw_fd(fd: RawFd) -> Self {
        Self {
            // SAFETY: Ownership is transferred by the caller.
            fd: unsafe { OwnedFd::from_raw_fd(fd) },
            path: None,
        }
    }
}

impl std::fmt::Debug for SerialLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLine")
            .field("fd", &self.fd.as_raw_fd())
            .field("path", &self.path)
            .finish()
    }
}
