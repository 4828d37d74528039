#![cfg(unix)]

// Runs alone in its own binary so the closed descriptor value cannot be reused by a
// concurrent test before the read below.

use std::ffi::CString;
use std::os::unix::ffi::OsStringExt;

use rawtty_ffi::{
    rawtty_buffer_free, rawtty_close, rawtty_open, rawtty_read, RawTtyBuffer, RawTtyResult,
};
use rawtty_line::testpty;

#[test]
fn read_after_close_yields_empty_buffer() {
    let (_controller, path) = testpty::open_controller();
    let path = CString::new(path.into_os_string().into_vec()).expect("pty path has no NUL");

    // SAFETY: `path` is a valid C string.
    let fd = unsafe { rawtty_open(path.as_ptr()) };
    assert!(fd >= 0);
    // SAFETY: `fd` came from rawtty_open and is not used as an owned descriptor again.
    unsafe { rawtty_close(fd) };

    let mut buffer = RawTtyBuffer::default();
    // SAFETY: `buffer` is a valid local.
    assert_eq!(unsafe { rawtty_read(fd, &mut buffer) }, RawTtyResult::Ok);
    assert!(buffer.data.is_null());
    assert_eq!(buffer.len, 0);
    // SAFETY: populated by rawtty_read.
    unsafe { rawtty_buffer_free(&mut buffer) };
}
