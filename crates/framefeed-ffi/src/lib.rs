//! framefeed-ffi: C-ABI exports for the framefeed polling façade.
//!
//! Handles cross this boundary as plain integers (`0` is never a live
//! session), frame pixels are copied into caller-owned buffers, and no
//! callback ever crosses back. Every export is wrapped against panics;
//! failures leave a thread-local message readable through
//! [`framefeed_last_error`].
//!
//! The process-global registry connects sessions through the built-in
//! pattern connector unless an embedder installs a real one with
//! [`install_connector`] before the first call.

mod client;
mod error;
mod types;

use std::panic::AssertUnwindSafe;

pub use client::{
    framefeed_create, framefeed_destroy, framefeed_frame_data, framefeed_frame_info,
    framefeed_shutdown, framefeed_status, framefeed_update, install_connector,
};
pub use types::{
    FramefeedHandle, FRAMEFEED_ERR_CONNECT_FAILED, FRAMEFEED_ERR_DECODE_FAILED,
    FRAMEFEED_ERR_STREAM_ENDED, FRAMEFEED_ERR_TRANSPORT_FAILED, FRAMEFEED_STATUS_CONNECTED,
    FRAMEFEED_STATUS_CONNECTING, FRAMEFEED_STATUS_DISCONNECTED, FRAMEFEED_STATUS_NOT_FOUND,
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

#[no_mangle]
pub extern "C" fn framefeed_last_error() -> *const std::os::raw::c_char {
    ffi_boundary(std::ptr::null(), error::last_error_ptr)
}

#[cfg(test)]
mod tests {
    use std::ffi::CStr;

    use super::*;

    #[test]
    fn test_last_error_returns_non_null_pointer() {
        error::clear_error_state();
        let ptr = framefeed_last_error();
        assert!(!ptr.is_null());

        // SAFETY: framefeed_last_error returns a pointer to a thread-local
        // CString.
        let text = unsafe { CStr::from_ptr(ptr).to_str().unwrap() };
        assert!(text.is_empty());
    }
}
