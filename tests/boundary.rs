// safe_call behavior at a native callback boundary.
use std::ffi::CStr;
use std::fmt;
use std::os::raw::c_char;
use std::sync::Mutex;

use tango_config::boundary::{CLogFn, GENERIC_FAILURE, TracingSink, safe_call};
use tango_config::core::entry::keys;
use tango_config::core::memory::MemoryConfig;
use tango_config::core::status::{ConfigError, ErrorCode};
use tango_config::core::store::{get_entry, set_entry};

#[derive(Default)]
struct Logs(Vec<String>);

impl Logs {
    fn sink(&mut self) -> impl FnMut(&CStr) + '_ {
        |message: &CStr| self.0.push(message.to_string_lossy().into_owned())
    }
}

#[derive(Debug)]
struct DeviceBusy;

impl fmt::Display for DeviceBusy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("device busy")
    }
}

impl std::error::Error for DeviceBusy {}

/// A host object whose methods are invoked from native callbacks.
struct DepthApp {
    store: MemoryConfig,
}

impl DepthApp {
    fn configure(&mut self, mode: i32) -> Result<i32, ConfigError> {
        set_entry::<keys::DepthMode, _>(&mut self.store, &mode)?;
        get_entry::<keys::DepthMode, _>(&self.store)
    }
}

#[test]
fn config_error_returns_its_code_with_one_log() {
    let mut logs = Logs::default();
    let status = safe_call(
        logs.sink(),
        &mut (),
        |_, ()| -> Result<i32, ConfigError> { Err(ConfigError::new(-3, "ctx")) },
        (),
    );
    assert_eq!(status, -3);
    assert_eq!(logs.0.len(), 1);
    assert!(logs.0[0].contains("ctx"));
    assert!(logs.0[0].contains("camera"));
}

#[test]
fn unrelated_error_returns_generic_failure_with_type_hint() {
    let mut logs = Logs::default();
    let status = safe_call(
        logs.sink(),
        &mut (),
        |_, ()| -> Result<i32, DeviceBusy> { Err(DeviceBusy) },
        (),
    );
    assert_eq!(status, GENERIC_FAILURE);
    assert_eq!(logs.0.len(), 1);
    assert!(logs.0[0].contains("device busy"));
    assert!(logs.0[0].contains("DeviceBusy"));
}

#[test]
fn normal_return_passes_through_without_logging() {
    let mut logs = Logs::default();
    let status = safe_call(
        logs.sink(),
        &mut (),
        |_, ()| -> Result<i32, ConfigError> { Ok(7) },
        (),
    );
    assert_eq!(status, 7);
    assert!(logs.0.is_empty());
}

#[test]
fn panic_returns_generic_failure_with_fixed_message() {
    let mut logs = Logs::default();
    let status = safe_call(
        logs.sink(),
        &mut (),
        |_, ()| -> Result<i32, ConfigError> { panic!("callback exploded") },
        (),
    );
    assert_eq!(status, GENERIC_FAILURE);
    assert_eq!(logs.0, ["Unhandled failure of non-standard type."]);
}

#[test]
fn method_with_args_on_target() {
    let mut app = DepthApp {
        store: MemoryConfig::new(),
    };

    let mut logs = Logs::default();
    let status = safe_call(logs.sink(), &mut app, DepthApp::configure, 2);
    assert_eq!(status, 2);
    assert!(logs.0.is_empty());

    app.store
        .fail_set("config_depth_mode", ErrorCode::NoMotionTrackingPermission.raw());
    let status = safe_call(logs.sink(), &mut app, DepthApp::configure, 4);
    assert_eq!(status, ErrorCode::NoMotionTrackingPermission.raw());
    assert_eq!(logs.0.len(), 1);
    assert!(logs.0[0].contains("Failed to set configuration parameter 'config_depth_mode'"));
}

static C_LOGS: Mutex<Vec<String>> = Mutex::new(Vec::new());

unsafe extern "C" fn c_log(message: *const c_char) {
    let text = unsafe { CStr::from_ptr(message) }
        .to_string_lossy()
        .into_owned();
    C_LOGS.lock().expect("log lock").push(text);
}

#[test]
fn c_log_callback_receives_terminated_message() {
    let status = safe_call(
        CLogFn(c_log),
        &mut (),
        |_, ()| -> Result<i32, ConfigError> {
            Err(ConfigError::new(ErrorCode::Invalid.raw(), "bind"))
        },
        (),
    );
    assert_eq!(status, ErrorCode::Invalid.raw());
    let logs = C_LOGS.lock().expect("log lock");
    assert_eq!(
        logs.as_slice(),
        ["Unhandled Tango error: bind failed because The input argument is invalid."]
    );
}

#[test]
fn tracing_sink_is_a_log_sink() {
    let status = safe_call(
        TracingSink,
        &mut (),
        |_, ()| -> Result<i32, String> { Err("no subscriber needed".to_string()) },
        (),
    );
    assert_eq!(status, GENERIC_FAILURE);
}
