use framefeed_client::{ClientHandle, ClientRegistry};
use framefeed_source::{PatternConnector, SourceConnector, StreamConfig};

use std::ffi::CStr;
use std::os::raw::c_char;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration;

use crate::error;
use crate::types::{FramefeedHandle, FRAMEFEED_STATUS_NOT_FOUND};

static REGISTRY: OnceLock<ClientRegistry> = OnceLock::new();
static PENDING_CONNECTOR: Mutex<Option<Arc<dyn SourceConnector>>> = Mutex::new(None);

/// Installs the connector the process-global registry will use.
///
/// Rust embedders call this before the first façade call to replace the
/// built-in pattern connector with a real transport. Once the registry
/// exists the install is refused and `false` comes back.
pub fn install_connector(connector: Arc<dyn SourceConnector>) -> bool {
    if REGISTRY.get().is_some() {
        return false;
    }
    *PENDING_CONNECTOR
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = Some(connector);
    REGISTRY.get().is_none()
}

fn registry() -> &'static ClientRegistry {
    REGISTRY.get_or_init(|| {
        let connector = PENDING_CONNECTOR
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_else(|| Arc::new(PatternConnector::default()));
        ClientRegistry::new(connector)
    })
}

/// # Safety
/// `ptr` must be null or point to a NUL-terminated string.
unsafe fn required_str_arg(ptr: *const c_char, name: &str) -> Option<String> {
    if ptr.is_null() {
        error::set_invalid_argument(format!("{name} cannot be null"));
        return None;
    }
    // SAFETY: Null was checked; termination is the caller's contract.
    let raw = unsafe { CStr::from_ptr(ptr) };
    match raw.to_str() {
        Ok(text) => Some(text.to_owned()),
        Err(_) => {
            error::set_invalid_argument(format!("{name} must be valid UTF-8"));
            None
        }
    }
}

/// Creates a session against `endpoint`/`stream` and returns its handle,
/// or 0 on failure. Connection failures are not create failures: the
/// handle comes back immediately and the failure surfaces later through
/// `framefeed_status`.
///
/// # Safety
/// `endpoint` and `stream` must each be null or a valid NUL-terminated
/// UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn framefeed_create(
    endpoint: *const c_char,
    stream: *const c_char,
    target_latency_ms: i32,
) -> FramefeedHandle {
    crate::ffi_boundary(0, || {
        error::clear_error_state();

        // SAFETY: Deferred to this function's caller contract.
        let Some(endpoint) = (unsafe { required_str_arg(endpoint, "endpoint") }) else {
            return 0;
        };
        // SAFETY: Deferred to this function's caller contract.
        let Some(stream) = (unsafe { required_str_arg(stream, "stream") }) else {
            return 0;
        };

        let config = StreamConfig::new(endpoint, stream)
            .with_target_latency(Duration::from_millis(target_latency_ms.max(0) as u64));
        match registry().create(config) {
            Ok(handle) => handle.raw(),
            Err(err) => {
                error::set_error_message(err.to_string());
                0
            }
        }
    })
}

/// Destroys the session behind `handle`. Idempotent; unknown and stale
/// handles are ignored.
#[no_mangle]
pub extern "C" fn framefeed_destroy(handle: FramefeedHandle) {
    crate::ffi_boundary((), || {
        error::clear_error_state();
        registry().destroy(ClientHandle::from_raw(handle));
    });
}

/// Pops the oldest queued frame into the current-frame slot. Returns the
/// session's liveness; false for unknown handles.
#[no_mangle]
pub extern "C" fn framefeed_update(handle: FramefeedHandle) -> bool {
    crate::ffi_boundary(false, || {
        error::clear_error_state();
        registry().update(ClientHandle::from_raw(handle))
    })
}

/// Writes the unread frame's dimensions through the out-pointers. False
/// when no unread frame is waiting.
///
/// # Safety
/// `out_width` and `out_height` must each be null or valid for a `u32`
/// write.
#[no_mangle]
pub unsafe extern "C" fn framefeed_frame_info(
    handle: FramefeedHandle,
    out_width: *mut u32,
    out_height: *mut u32,
) -> bool {
    crate::ffi_boundary(false, || {
        error::clear_error_state();
        if out_width.is_null() || out_height.is_null() {
            error::set_invalid_argument("out_width/out_height cannot be null");
            return false;
        }
        match registry().frame_info(ClientHandle::from_raw(handle)) {
            Some(info) => {
                // SAFETY: Null was checked; validity is the caller's
                // contract.
                unsafe {
                    *out_width = info.width;
                    *out_height = info.height;
                }
                true
            }
            None => false,
        }
    })
}

/// Copies the unread frame's pixels into `buffer` and marks it read.
/// Exactly `width * height * 4` bytes are written on success; on any
/// failure (no unread frame, buffer too small, unknown handle) the buffer
/// is untouched.
///
/// # Safety
/// `buffer` must be null or valid for writes of `buffer_len` bytes.
#[no_mangle]
pub unsafe extern "C" fn framefeed_frame_data(
    handle: FramefeedHandle,
    buffer: *mut u8,
    buffer_len: usize,
) -> bool {
    crate::ffi_boundary(false, || {
        error::clear_error_state();
        if buffer.is_null() {
            error::set_invalid_argument("buffer cannot be null");
            return false;
        }
        // SAFETY: Null was checked; the length is the caller's contract.
        let buf = unsafe { std::slice::from_raw_parts_mut(buffer, buffer_len) };
        registry().copy_frame_data(ClientHandle::from_raw(handle), buf)
    })
}

/// Connection status code for `handle`: 0 disconnected, 1 connecting,
/// 2 connected, negative error codes, `FRAMEFEED_STATUS_NOT_FOUND` when
/// the handle resolves to no session.
#[no_mangle]
pub extern "C" fn framefeed_status(handle: FramefeedHandle) -> i32 {
    crate::ffi_boundary(FRAMEFEED_STATUS_NOT_FOUND, || {
        error::clear_error_state();
        registry().status_code(ClientHandle::from_raw(handle))
    })
}

/// Destroys every live session, joining their workers. The registry
/// itself stays usable afterwards.
#[no_mangle]
pub extern "C" fn framefeed_shutdown() {
    crate::ffi_boundary((), || {
        error::clear_error_state();
        registry().destroy_all();
    });
}
