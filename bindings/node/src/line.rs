use std::os::fd::{BorrowedFd, FromRawFd, IntoRawFd};

use napi::bindgen_prelude::{Buffer, Either};
use napi::Result;
use napi_derive::napi;
use rawtty_line::{check_descriptor, io, termios, ReadTiming, SerialLine};
use tracing::debug;

use crate::error::to_napi_error;

/// Returned by `write` when the OS rejects the write.
const WRITE_FAILED: i64 = -1;

fn borrow_descriptor<'a>(fd: i32, context: &str) -> Result<BorrowedFd<'a>> {
    let fd = check_descriptor(fd).map_err(|err| to_napi_error(context, err))?;
    // SAFETY: `fd` is non-negative and only used for termios and read/write calls, which
    // fail with EBADF if JavaScript already closed it.
    Ok(unsafe { BorrowedFd::borrow_raw(fd) })
}

/// Open `path` in raw mode (9600 baud, half-second reads) and return its descriptor.
#[napi]
pub fn open(path: String) -> Result<i32> {
    let line = SerialLine::open(&path).map_err(|err| to_napi_error("open failed", err))?;
    Ok(line.into_raw_fd())
}

#[napi]
pub fn close(fd: i32) -> Result<()> {
    let fd = check_descriptor(fd).map_err(|err| to_napi_error("close failed", err))?;
    // SAFETY: JavaScript hands back a descriptor obtained from `open` and stops using it.
    let line = unsafe { SerialLine::from_raw_fd(fd) };
    line.close();
    Ok(())
}

/// Drain everything currently available. Read errors yield an empty buffer.
#[napi]
pub fn read(fd: i32) -> Result<Buffer> {
    let fd = borrow_descriptor(fd, "read failed")?;
    Ok(io::drain(fd).to_vec().into())
}

/// Write a Buffer, or a string as UTF-8, with one `write(2)`.
#[napi]
pub fn write(fd: i32, data: Either<Buffer, String>) -> Result<i64> {
    let fd = borrow_descriptor(fd, "write failed")?;
    let written = match &data {
        Either::A(buffer) => io::write_once(fd, buffer.as_ref()),
        Either::B(text) => io::write_once(fd, text.as_bytes()),
    };

    match written {
        Ok(n) => Ok(i64::try_from(n).unwrap_or(i64::MAX)),
        Err(err) => {
            debug!(error = %err, "write failed");
            Ok(WRITE_FAILED)
        }
    }
}

/// Reconfigure reads to wait for `minBytes` with the half-second timer.
#[napi]
pub fn set_blocking(fd: i32, min_bytes: u32) -> Result<()> {
    let fd = borrow_descriptor(fd, "setBlocking failed")?;
    let timing = ReadTiming::checked(
        i64::from(min_bytes),
        i64::from(ReadTiming::RECONFIGURE_TIMEOUT_DECISECONDS),
    )
    .map_err(|err| to_napi_error("setBlocking failed", err))?;
    termios::set_timing(fd, timing).map_err(|err| to_napi_error("setBlocking failed", err))
}
