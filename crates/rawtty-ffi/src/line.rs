use std::os::fd::{FromRawFd, IntoRawFd};
use std::os::raw::{c_char, c_int};

use rawtty_line::{io, termios, ReadTiming, SerialLine};
use tracing::debug;

use crate::args;
use crate::buffer::write_buffer_out;
use crate::error;
use crate::types::{RawTtyBuffer, RawTtyResult, RAWTTY_INVALID};

/// Open `path` in raw mode (9600 baud, `(0, 5)` timing) and return its descriptor.
///
/// Returns `-1` on failure; `rawtty_last_error` describes the cause.
///
/// # Safety
/// `path` must be a non-null pointer to a valid UTF-8, NUL-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn rawtty_open(path: *const c_char) -> c_int {
    crate::ffi_boundary(RAWTTY_INVALID, || {
        error::clear_error_state();

        let path = {
            // SAFETY: We validate null and UTF-8 in helper.
            match unsafe { args::required_str_arg(path, "path") } {
                Some(v) => v,
                None => return RAWTTY_INVALID,
            }
        };

        match SerialLine::open(path) {
            Ok(line) => line.into_raw_fd(),
            Err(err) => {
                let _ = error::map_line_error(&err);
                RAWTTY_INVALID
            }
        }
    })
}

/// Close a descriptor returned by `rawtty_open`. Failures are not reported.
///
/// # Safety
/// `fd` must have come from `rawtty_open` and must not be used again afterwards.
#[no_mangle]
pub unsafe extern "C" fn rawtty_close(fd: c_int) {
    crate::ffi_boundary((), || {
        error::clear_error_state();

        if args::descriptor_arg(fd).is_none() {
            return;
        }

        // SAFETY: The caller hands ownership of `fd` back to us.
        let line = unsafe { SerialLine::from_raw_fd(fd) };
        line.close();
    });
}

/// Reconfigure only the timing of an open descriptor to `(min_bytes, 5)`.
#[no_mangle]
pub extern "C" fn rawtty_set_blocking(fd: c_int, min_bytes: c_int) -> RawTtyResult {
    crate::ffi_boundary(RawTtyResult::Internal, || {
        error::clear_error_state();

        let Some(fd) = args::descriptor_arg(fd) else {
            return RawTtyResult::InvalidArgument;
        };
        let timing = match ReadTiming::checked(
            i64::from(min_bytes),
            i64::from(ReadTiming::RECONFIGURE_TIMEOUT_DECISECONDS),
        ) {
            Ok(timing) => timing,
            Err(err) => return error::map_line_error(&err),
        };

        match termios::set_timing(fd, timing) {
            Ok(()) => RawTtyResult::Ok,
            Err(err) => error::map_line_error(&err),
        }
    })
}

/// Drain everything currently available on `fd` into `out_buffer`.
///
/// Read errors (including a descriptor that has been closed) end the drain and yield
/// the bytes collected so far, possibly none; they are not reported as failures.
///
/// # Safety
/// `out_buffer` must be a valid writable pointer. If `out_buffer->data` already holds a
/// prior payload from this library, it is freed first.
#[no_mangle]
pub unsafe extern "C" fn rawtty_read(fd: c_int, out_buffer: *mut RawTtyBuffer) -> RawTtyResult {
    crate::ffi_boundary(RawTtyResult::Internal, || {
        error::clear_error_state();

        if out_buffer.is_null() {
            return error::set_invalid_argument("out_buffer cannot be null");
        }
        let Some(fd) = args::descriptor_arg(fd) else {
            return RawTtyResult::InvalidArgument;
        };

        let data = io::drain(fd);
        write_buffer_out(out_buffer, &data)
    })
}

/// Write `len` bytes with a single `write(2)`.
///
/// Returns the count the OS accepted, which may be short, or `-1` on invalid input or
/// a failed write.
///
/// # Safety
/// If `len > 0`, `data` must be non-null and readable for `len` bytes.
#[no_mangle]
pub unsafe extern "C" fn rawtty_write(fd: c_int, data: *const u8, len: usize) -> isize {
    crate::ffi_boundary(RAWTTY_INVALID as isize, || {
        error::clear_error_state();

        let payload = {
            // SAFETY: We validate pointer/length pairing in helper.
            match unsafe { args::bytes_arg(data, len, "data") } {
                Some(v) => v,
                None => return RAWTTY_INVALID as isize,
            }
        };

        write_payload(fd, payload)
    })
}

/// Write a NUL-terminated UTF-8 string (without its terminator).
///
/// # Safety
/// `text` must be a non-null pointer to a valid UTF-8, NUL-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn rawtty_write_str(fd: c_int, text: *const c_char) -> isize {
    crate::ffi_boundary(RAWTTY_INVALID as isize, || {
        error::clear_error_state();

        let text = {
            // SAFETY: We validate null and UTF-8 in helper.
            match unsafe { args::required_str_arg(text, "text") } {
                Some(v) => v,
                None => return RAWTTY_INVALID as isize,
            }
        };

        write_payload(fd, text.as_bytes())
    })
}

fn write_payload(fd: c_int, payload: &[u8]) -> isize {
    let Some(fd) = args::descriptor_arg(fd) else {
        return RAWTTY_INVALID as isize;
    };

    match io::write_once(fd, payload) {
        Ok(written) => isize::try_from(written).unwrap_or(isize::MAX),
        Err(err) => {
            debug!(error = %err, "write failed");
            let _ = error::map_line_error(&err.into());
            RAWTTY_INVALID as isize
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::{CStr, CString};
    use std::io::{Read, Write};
    use std::os::unix::ffi::OsStringExt;

    use super::*;

    fn last_error() -> String {
        // SAFETY: rawtty_last_error returns a pointer to a thread-local CString.
        unsafe { CStr::from_ptr(crate::rawtty_last_error()) }
            .to_string_lossy()
            .into_owned()
    }

    /// Controller side of a fresh pty and the NUL-terminated path of its subordinate.
    fn pty() -> (std::fs::File, CString) {
        let (controller, path) = rawtty_line::testpty::open_controller();
        let path = CString::new(path.into_os_string().into_vec()).expect("pty path has no NUL");
        (controller, path)
    }

    fn read_all(fd: c_int) -> Vec<u8> {
        let mut buffer = RawTtyBuffer::default();
        // SAFETY: `buffer` is a valid local.
        assert_eq!(unsafe { rawtty_read(fd, &mut buffer) }, RawTtyResult::Ok);
        let bytes = if buffer.data.is_null() {
            Vec::new()
        } else {
            // SAFETY: populated by rawtty_read with `len` readable bytes.
            unsafe { std::slice::from_raw_parts(buffer.data, buffer.len) }.to_vec()
        };
        // SAFETY: populated by rawtty_read.
        unsafe { crate::rawtty_buffer_free(&mut buffer) };
        bytes
    }

    #[test]
    fn open_missing_device_returns_sentinel() {
        let path = CString::new("/dev/rawtty-missing").unwrap();
        // SAFETY: `path` is a valid C string.
        let fd = unsafe { rawtty_open(path.as_ptr()) };
        assert_eq!(fd, -1);
        assert!(last_error().contains("/dev/rawtty-missing"));
    }

    #[test]
    fn open_null_path_is_invalid() {
        // SAFETY: null is explicitly handled.
        assert_eq!(unsafe { rawtty_open(std::ptr::null()) }, -1);
        assert!(last_error().contains("path cannot be null"));
    }

    #[test]
    fn loopback_write_and_read() {
        let (mut controller, path) = pty();
        // SAFETY: `path` is a valid C string.
        let fd = unsafe { rawtty_open(path.as_ptr()) };
        assert!(fd >= 0, "open failed: {}", last_error());

        let text = CString::new("Kx").unwrap();
        // SAFETY: `text` is a valid C string.
        assert_eq!(unsafe { rawtty_write_str(fd, text.as_ptr()) }, 2);
        // SAFETY: slice is readable for its length.
        assert_eq!(unsafe { rawtty_write(fd, b"Kx".as_ptr(), 2) }, 2);
        let mut wire = [0u8; 4];
        controller.read_exact(&mut wire).unwrap();
        assert_eq!(&wire, b"KxKx");

        controller.write_all(b"reply").unwrap();
        assert_eq!(read_all(fd), b"reply");

        // SAFETY: `fd` came from rawtty_open.
        unsafe { rawtty_close(fd) };
    }

    #[test]
    fn zero_length_write_returns_zero() {
        let (_controller, path) = pty();
        // SAFETY: `path` is a valid C string.
        let fd = unsafe { rawtty_open(path.as_ptr()) };
        assert!(fd >= 0);

        // SAFETY: len 0 permits a null pointer.
        assert_eq!(unsafe { rawtty_write(fd, std::ptr::null(), 0) }, 0);
        // SAFETY: `fd` came from rawtty_open.
        unsafe { rawtty_close(fd) };
    }

    #[test]
    fn null_data_with_length_is_sentinel() {
        // SAFETY: null with len > 0 is explicitly handled.
        assert_eq!(unsafe { rawtty_write(0, std::ptr::null(), 4) }, -1);
        assert!(last_error().contains("data cannot be null"));
    }

    #[test]
    fn read_on_unopened_descriptor_is_empty() {
        let mut buffer = RawTtyBuffer::default();
        // SAFETY: `buffer` is a valid local.
        assert_eq!(
            unsafe { rawtty_read(c_int::MAX, &mut buffer) },
            RawTtyResult::Ok
        );
        assert!(buffer.data.is_null());
        assert_eq!(buffer.len, 0);
    }

    #[test]
    fn negative_descriptor_is_rejected() {
        let mut buffer = RawTtyBuffer::default();
        // SAFETY: `buffer` is a valid local.
        assert_eq!(
            unsafe { rawtty_read(-1, &mut buffer) },
            RawTtyResult::InvalidArgument
        );
        assert_eq!(rawtty_set_blocking(-1, 1), RawTtyResult::InvalidArgument);
    }

    #[test]
    fn set_blocking_validates_range_and_applies() {
        let (_controller, path) = pty();
        // SAFETY: `path` is a valid C string.
        let fd = unsafe { rawtty_open(path.as_ptr()) };
        assert!(fd >= 0);

        assert_eq!(rawtty_set_blocking(fd, 300), RawTtyResult::InvalidArgument);
        assert_eq!(rawtty_set_blocking(fd, 4), RawTtyResult::Ok);

        // SAFETY: `fd` is open and owned by this test until rawtty_close.
        let borrowed = unsafe { std::os::fd::BorrowedFd::borrow_raw(fd) };
        let settings = termios::read_settings(borrowed).unwrap();
        assert_eq!(settings.timing, ReadTiming::new(4, 5));

        // SAFETY: `fd` came from rawtty_open.
        unsafe { rawtty_close(fd) };
    }
}
