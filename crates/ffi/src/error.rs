use plume_core::KernelError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for FFI error types.
///
/// This trait provides a unified way to handle errors across the FFI boundary,
/// allowing both simple error codes and custom error messages.
///
/// # Design
/// - `code()` - Returns the error code to be passed across FFI boundary
/// - `msg()` - Returns the error message for diagnostic purposes
pub(crate) trait PlumeError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> PlumeErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `PlumeError` for boundary-level failures and
/// kernel errors converted for the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultPlumeError {
    code: PlumeErrorCode,
    msg: String,
}

impl DefaultPlumeError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"grid"`, `"vehicles"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: PlumeErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for grid dimensions whose product overflows `usize`.
    ///
    /// # Arguments
    /// * `rows` - Declared row count
    /// * `cols` - Declared column count
    pub fn grid_too_large(rows: usize, cols: usize) -> Self {
        Self {
            code: PlumeErrorCode::InvalidGridShape,
            msg: format!("Grid dimensions {rows}x{cols} overflow the address space"),
        }
    }
}

impl From<&KernelError> for DefaultPlumeError {
    fn from(error: &KernelError) -> Self {
        let code = match error {
            KernelError::GridShape { .. } => PlumeErrorCode::InvalidGridShape,
            KernelError::InvalidGeometry(_) => PlumeErrorCode::InvalidGeometry,
            KernelError::WindowOutOfRange { .. } => PlumeErrorCode::WindowOutOfRange,
            KernelError::InvalidWindSpeed(_) => PlumeErrorCode::InvalidWindSpeed,
            KernelError::InvalidWindDirection(_) => PlumeErrorCode::InvalidWindDirection,
            KernelError::MalformedSource { .. } => PlumeErrorCode::MalformedSource,
            KernelError::InvalidParameter { .. } | KernelError::SeriesMismatch { .. } => {
                PlumeErrorCode::InvalidParameter
            }
            KernelError::InvalidConfig(_) => PlumeErrorCode::InvalidConfig,
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl PlumeError for DefaultPlumeError {
    fn code(&self) -> PlumeErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by plume kernel functions.
/// Follows standard C convention: 0 = success, non-zero = error.
///
/// On any non-zero code the grid passed to the call is left unchanged.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlumeErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Grid dimensions are zero or do not match the geometry's resolution.
    InvalidGridShape = 2,

    /// Geometry bounds are not finite, inverted, or the resolution is zero.
    InvalidGeometry = 3,

    /// Window bounds are inverted or extend past the grid.
    WindowOutOfRange = 4,

    /// Wind speed is zero, negative or not finite.
    InvalidWindSpeed = 5,

    /// Wind direction is not finite.
    InvalidWindDirection = 6,

    /// A vehicle in a batch has a non-finite position or an invalid speed.
    MalformedSource = 7,

    /// A scalar parameter (emission rate, plume height, emission factor) is invalid.
    InvalidParameter = 8,

    /// The kernel configuration failed validation.
    InvalidConfig = 9,
}

impl From<DefaultPlumeError> for PlumeErrorCode {
    fn from(error: DefaultPlumeError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// Allows callers to retrieve diagnostic information after a failed call.
    /// The `CString` is stored to prevent memory leaks when returning raw pointers via FFI.
    static LAST_ERROR: RefCell<(Option<CString>, PlumeErrorCode)> = const { RefCell::new((None, PlumeErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, PlumeErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, PlumeErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call on this thread failed.
/// - `null` if the last call succeeded or the message cannot be converted to a C string.
///
/// # Thread Safety
/// Error messages are stored per-thread (thread-local storage), so this is thread-safe.
/// Each thread has its own independent error state.
///
/// # Lifetime
/// The returned pointer is valid until:
/// - The next FFI call on this thread that sets or clears the error
/// - The thread terminates
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// PlumeErrorCode err = plume_update_batch(grid, 100, 100, geometry, vehicles, n,
///                                         2.0, 0.0, 0.5, "B", NULL);
/// if (err != Ok) {
///     const char* error = plume_get_last_error();
///     if (error) {
///         fprintf(stderr, "Batch update failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn plume_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns:
/// - `PlumeErrorCode::Ok` (0) if the last call on this thread succeeded
/// - The specific error code from the last failed operation
///
/// # Thread Safety
/// Error codes are stored per-thread (thread-local storage), so this is thread-safe.
/// Each thread has its own independent error state.
#[no_mangle]
pub extern "C" fn plume_get_last_error_code() -> PlumeErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
