#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawTtyResult {
    Ok = 0,
    InvalidArgument = 1,
    OpenError = 2,
    ConfigurationError = 3,
    IoError = 4,
    Internal = 99,
}

#[allow(dead_code)]
pub const RAWTTY_OK: RawTtyResult = RawTtyResult::Ok;
#[allow(dead_code)]
pub const RAWTTY_ERR_INVALID_ARGUMENT: RawTtyResult = RawTtyResult::InvalidArgument;
#[allow(dead_code)]
pub const RAWTTY_ERR_OPEN: RawTtyResult = RawTtyResult::OpenError;
#[allow(dead_code)]
pub const RAWTTY_ERR_CONFIGURATION: RawTtyResult = RawTtyResult::ConfigurationError;
#[allow(dead_code)]
pub const RAWTTY_ERR_IO: RawTtyResult = RawTtyResult::IoError;
#[allow(dead_code)]
pub const RAWTTY_ERR_INTERNAL: RawTtyResult = RawTtyResult::Internal;

/// Returned by `rawtty_open` on failure and by `rawtty_write*` on invalid input.
pub const RAWTTY_INVALID: i32 = -1;

/// Bytes returned by `rawtty_read`, owned by this library until `rawtty_buffer_free`.
#[repr(C)]
#[derive(Debug)]
pub struct RawTtyBuffer {
    pub data: *mut u8,
    pub len: usize,
}

impl Default for RawTtyBuffer {
    fn default() -> Self {
        Self {
            data: std::ptr::null_mut(),
            len: 0,
        }
    }
}
