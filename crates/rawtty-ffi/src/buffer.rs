use std::ptr;

use crate::error;
use crate::types::{RawTtyBuffer, RawTtyResult};

/// Move `payload` into `out`, freeing whatever it held from an earlier call.
pub(crate) fn write_buffer_out(out: *mut RawTtyBuffer, payload: &[u8]) -> RawTtyResult {
    if out.is_null() {
        return error::set_invalid_argument("out_buffer cannot be null");
    }

    let buffer = {
        // SAFETY: Pointer validity is guaranteed by the caller.
        unsafe { &mut *out }
    };
    release(buffer);

    let boxed: Box<[u8]> = payload.to_vec().into_boxed_slice();
    let len = boxed.len();
    buffer.data = if len == 0 {
        ptr::null_mut()
    } else {
        Box::into_raw(boxed) as *mut u8
    };
    buffer.len = len;

    RawTtyResult::Ok
}

fn release(buffer: &mut RawTtyBuffer) {
    if !buffer.data.is_null() {
        let slice_ptr = ptr::slice_from_raw_parts_mut(buffer.data, buffer.len);
        // SAFETY: Non-null `data` is only ever set from a `Box<[u8]>` in write_buffer_out.
        unsafe {
            drop(Box::from_raw(slice_ptr));
        }
    }
    *buffer = RawTtyBuffer::default();
}

/// Free bytes held by a [`RawTtyBuffer`] populated by `rawtty_read`.
///
/// # Safety
/// `buffer` must be either null or a valid pointer to a `RawTtyBuffer` created by caller code.
/// If `buffer->data` is non-null, it must have originated from this library.
#[no_mangle]
pub unsafe extern "C" fn rawtty_buffer_free(buffer: *mut RawTtyBuffer) {
    crate::ffi_boundary((), || {
        if buffer.is_null() {
            return;
        }

        // SAFETY: Pointer validity is guaranteed by the caller.
        release(unsafe { &mut *buffer });
    });
}
