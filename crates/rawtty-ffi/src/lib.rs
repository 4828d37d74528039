//! rawtty-ffi: C-ABI exports of the raw serial line primitives.
//!
//! Lines are identified by their integer descriptor, exactly as returned by
//! `rawtty_open`. Failures set a thread-local message readable via `rawtty_last_error`.

mod args;
mod buffer;
mod error;
mod line;
mod types;

use std::panic::AssertUnwindSafe;

pub use buffer::rawtty_buffer_free;
pub use line::{
    rawtty_close, rawtty_open, rawtty_read, rawtty_set_blocking, rawtty_write, rawtty_write_str,
};
pub use types::{
    RawTtyBuffer, RawTtyResult, RAWTTY_ERR_CONFIGURATION, RAWTTY_ERR_INTERNAL,
    RAWTTY_ERR_INVALID_ARGUMENT, RAWTTY_ERR_IO, RAWTTY_ERR_OPEN, RAWTTY_INVALID, RAWTTY_OK,
};

fn ffi_boundary<T>(on_panic: T, f: impl FnOnce() -> T) -> T {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(_) => {
            error::set_panic_error();
            on_panic
        }
    }
}

/// Message describing the most recent failure on this thread, or an empty string.
#[no_mangle]
pub extern "C" fn rawtty_last_error() -> *const std::os::raw::c_char {
    ffi_boundary(std::ptr::null(), error::last_error_ptr)
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;

    use super::*;

    #[test]
    fn last_error_starts_empty() {
        error::clear_error_state();
        let ptr = rawtty_last_error();
        assert!(!ptr.is_null());

        // SAFETY: rawtty_last_error returns a pointer to a thread-local CString.
        let text = unsafe { CStr::from_ptr(ptr).to_str().unwrap() };
        assert!(text.is_empty());
    }

    #[test]
    fn panics_are_contained() {
        let result = ffi_boundary(RawTtyResult::Internal, || -> RawTtyResult {
            panic!("boom");
        });
        assert_eq!(result, RawTtyResult::Internal);

        // SAFETY: rawtty_last_error returns a pointer to a thread-local CString.
        let text = unsafe { CStr::from_ptr(rawtty_last_error()) };
        assert_eq!(text.to_str().unwrap(), "panic across FFI boundary");
    }
}
