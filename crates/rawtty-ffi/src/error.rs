use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;

use rawtty_line::LineError;

use crate::types::RawTtyResult;

thread_local! {
    static LAST_ERROR: RefCell<CString> = RefCell::new(CString::default());
}

pub(crate) fn clear_error_state() {
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::default();
    });
}

pub(crate) fn set_error_message(message: impl Into<String>) {
    let message = message.into();
    let sanitized = message.replace('\0', "?");
    LAST_ERROR.with(|state| {
        *state.borrow_mut() = CString::new(sanitized).unwrap_or_default();
    });
}

pub(crate) fn set_invalid_argument(message: impl Into<String>) -> RawTtyResult {
    set_error_message(message);
    RawTtyResult::InvalidArgument
}

pub(crate) fn set_panic_error() {
    set_error_message("panic across FFI boundary");
}

pub(crate) fn map_line_error(err: &LineError) -> RawTtyResult {
    set_error_message(err.to_string());
    match err {
        LineError::Open { .. } => RawTtyResult::OpenError,
        LineError::Configuration { .. } => RawTtyResult::ConfigurationError,
        LineError::InvalidArgument(_) => RawTtyResult::InvalidArgument,
        LineError::Io(_) => RawTtyResult::IoError,
    }
}

pub(crate) fn last_error_ptr() -> *const c_char {
    LAST_ERROR.with(|state| state.borrow().as_ptr())
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;

    use super::*;

    fn last_error() -> String {
        // SAFETY: last_error_ptr points at the thread-local CString.
        unsafe { CStr::from_ptr(last_error_ptr()) }
            .to_string_lossy()
            .into_owned()
    }

    #[test]
    fn nul_bytes_are_replaced() {
        set_error_message("bad\0path");
        assert_eq!(last_error(), "bad?path");
        clear_error_state();
        assert!(last_error().is_empty());
    }

    #[test]
    fn line_errors_map_to_codes() {
        let err = LineError::InvalidArgument("min_bytes".into());
        assert_eq!(map_line_error(&err), RawTtyResult::InvalidArgument);
        assert!(last_error().contains("min_bytes"));

        let err = LineError::Configuration {
            step: "tcsetattr",
            source: std::io::Error::from_raw_os_error(25),
        };
        assert_eq!(map_line_error(&err), RawTtyResult::ConfigurationError);
        assert!(last_error().contains("tcsetattr"));
    }
}
