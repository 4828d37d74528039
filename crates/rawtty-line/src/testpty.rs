//! Pseudo-terminal pairs used as a loopback serial line in tests.
//!
//! Built for this crate's tests, and for dependents' tests with the `testing` feature.

use std::ffi::CStr;
use std::fs::{File, OpenOptions};
use std::os::fd::{AsFd, BorrowedFd, FromRawFd};
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;

/// A controller/subordinate pty pair. The controller side plays the remote device.
pub struct PtyPair {
    controller: File,
    subordinate: File,
}

impl PtyPair {
    pub fn open() -> Self {
        let (controller, path) = open_controller();
        let subordinate = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY)
            .open(&path)
            .expect("pty subordinate should open");
        Self {
            controller,
            subordinate,
        }
    }

    pub fn controller(&self) -> &File {
        &self.controller
    }

    pub fn subordinate(&self) -> BorrowedFd<'_> {
        self.subordinate.as_fd()
    }
}

/// Allocate a pty and return its controller plus the subordinate device path,
/// leaving the subordinate side for the caller to open.
pub fn open_controller() -> (File, PathBuf) {
    // SAFETY: posix_openpt has no pointer arguments.
    let fd = unsafe { libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY) };
    assert!(fd >= 0, "posix_openpt failed: {}", std::io::Error::last_os_error());

    // SAFETY: `fd` was just returned by posix_openpt and is owned by nothing else.
    let controller = unsafe { File::from_raw_fd(fd) };

    // SAFETY: `fd` is an open pty controller.
    unsafe {
        assert_eq!(libc::grantpt(fd), 0, "grantpt failed");
        assert_eq!(libc::unlockpt(fd), 0, "unlockpt failed");
    }

    (controller, subordinate_name(fd))
}

#[cfg(target_os = "linux")]
fn subordinate_name(fd: libc::c_int) -> PathBuf {
    let mut buf = [0 as libc::c_char; 128];
    // SAFETY: `buf` is writable for its full length, which is passed alongside it.
    let rc = unsafe { libc::ptsname_r(fd, buf.as_mut_ptr(), buf.len()) };
    assert_eq!(rc, 0, "ptsname_r failed");
    // SAFETY: ptsname_r NUL-terminates the name on success.
    let name = unsafe { CStr::from_ptr(buf.as_ptr()) };
    PathBuf::from(name.to_string_lossy().into_owned())
}

#[cfg(not(target_os = "linux"))]
fn subordinate_name(fd: libc::c_int) -> PathBuf {
    // SAFETY: ptsname returns a pointer to static storage; tests copy it out immediately.
    let ptr = unsafe { libc::ptsname(fd) };
    assert!(!ptr.is_null(), "ptsname failed");
    // SAFETY: non-null result of ptsname is a NUL-terminated string.
    let name = unsafe { CStr::from_ptr(ptr) };
    PathBuf::from(name.to_string_lossy().into_owned())
}
