use crate::error::{with_last_error_mut, DefaultPlumeError, PlumeError, PlumeErrorCode};
use plume_core::{KernelError, StabilityClass};
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use tracing::warn;

/// Set the thread-local error message and code.
/// Internal helper for FFI functions to record failure details.
/// Accepts any type implementing `PlumeError` trait.
pub(crate) fn set_last_error(error: &impl PlumeError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
/// More efficient than handling results for immediate errors.
#[inline]
pub(crate) fn track_error(error: &impl PlumeError) -> PlumeErrorCode {
    set_last_error(error);
    error.code()
}

/// Record the outcome of a kernel call and return its code.
/// Success clears any error left by an earlier call on this thread.
pub(crate) fn track_result(result: Result<(), KernelError>) -> PlumeErrorCode {
    match result {
        Ok(()) => {
            clear_last_error();
            PlumeErrorCode::Ok
        }
        Err(err) => track_error(&DefaultPlumeError::from(&err)),
    }
}

/// Clear the thread-local error message and code.
/// Internal helper called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = PlumeErrorCode::Ok;
    });
}

/// Resolve a C stability label; null or unreadable labels fall back to class D.
///
/// # Safety
/// `label` must be null or point to a valid null-terminated C string.
pub(crate) unsafe fn stability_from_ptr(label: *const c_char) -> StabilityClass {
    if label.is_null() {
        return StabilityClass::default();
    }
    match CStr::from_ptr(label).to_str() {
        Ok(text) => StabilityClass::from_label(text),
        Err(_) => {
            warn!("Stability class label is not valid UTF-8, using class D");
            StabilityClass::default()
        }
    }
}
