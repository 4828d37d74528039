//! Descriptor-level read and write primitives.
//!
//! These operate on any [`AsFd`] so the integer-descriptor surfaces (C ABI, Node addon)
//! can share them with [`SerialLine`](crate::SerialLine).

use std::io::{self, ErrorKind};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd};

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

/// Upper bound on the bytes requested by a single `read(2)` during a drain.
pub const CHUNK_SIZE: usize = 16;

/// Outgoing data in either of the forms callers hand to `write`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    Bytes(&'a [u8]),
    /// Written as its UTF-8 encoding.
    Text(&'a str),
}

impl<'a> Payload<'a> {
    pub fn as_bytes(&self) -> &'a [u8] {
        match *self {
            Payload::Bytes(bytes) => bytes,
            Payload::Text(text) => text.as_bytes(),
        }
    }
}

impl<'a> From<&'a [u8]> for Payload<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Payload::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for Payload<'a> {
    fn from(text: &'a str) -> Self {
        Payload::Text(text)
    }
}

/// Issue one `read(2)` into `buf`, retrying only when interrupted by a signal.
///
/// How long this blocks is governed entirely by the descriptor's VMIN/VTIME pair.
pub fn read_chunk(fd: impl AsFd, buf: &mut [u8]) -> io::Result<usize> {
    let raw = fd.as_fd().as_raw_fd();
    loop {
        // SAFETY: `buf` is valid for writes of `buf.len()` bytes for the whole call.
        let rc = unsafe { libc::read(raw, buf.as_mut_ptr().cast::<libc::c_void>(), buf.len()) };
        if rc >= 0 {
            return Ok(rc as usize);
        }

        let err = io::Error::last_os_error();
        if err.kind() != ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

/// Read [`CHUNK_SIZE`] bytes at a time until a read returns nothing, and return
/// everything collected.
///
/// A read error ends the drain exactly like an empty read does, so a failing device
/// and a quiet one both yield whatever was accumulated so far. Bytes that arrive after
/// a gap longer than the per-read timeout land in the next drain.
///
/// Under [`ReadMode::Blocking`](crate::ReadMode::Blocking) or
/// [`ReadMode::AfterFirstByte`](crate::ReadMode::AfterFirstByte) no read returns empty
/// until more data arrives, so the drain blocks until then.
pub fn drain(fd: impl AsFd) -> Bytes {
    let fd: BorrowedFd<'_> = fd.as_fd();
    let mut out = BytesMut::new();
    let mut chunk = [0u8; CHUNK_SIZE];

    loop {
        match read_chunk(fd, &mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                trace!(fd = fd.as_raw_fd(), len = n, "drained chunk");
                out.extend_from_slice(&chunk[..n]);
            }
            Err(err) => {
                debug!(fd = fd.as_raw_fd(), error = %err, "read failed, ending drain");
                break;
            }
        }
    }

    out.freeze()
}

/// Issue a single `write(2)` with the whole payload.
///
/// The returned count may be short; completing a partial write is left to the caller.
/// An empty payload returns `Ok(0)` without a system call.
pub fn write_once(fd: impl AsFd, data: &[u8]) -> io::Result<usize> {
    if data.is_empty() {
        return Ok(0);
    }

    let raw = fd.as_fd().as_raw_fd();
    loop {
        // SAFETY: `data` is valid for reads of `data.len()` bytes for the whole call.
        let rc = unsafe { libc::write(raw, data.as_ptr().cast::<libc::c_void>(), data.len()) };
        if rc >= 0 {
            let written = rc as usize;
            if written < data.len() {
                debug!(fd = raw, written, requested = data.len(), "partial write");
            }
            return Ok(written);
        }

        let err = io::Error::last_os_error();
        if err.kind() != ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

/// [`write_once`] for either payload form.
pub fn write_payload<'a>(fd: impl AsFd, payload: impl Into<Payload<'a>>) -> io::Result<usize> {
    write_once(fd, payload.into().as_bytes())
}
