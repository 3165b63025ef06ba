//! Purpose: Reduce failures to status codes where errors and panics must not cross a call
//!          boundary (e.g. callbacks dispatched by the native SDK into host code).
//! Exports: `safe_call`, `LogSink`, `CLogFn`, `TracingSink`, `GENERIC_FAILURE`.
//! Role: Last-resort handler at `extern "C"` entry points; everything else returns `Result`.
//! Invariants: Success passes the operation's status through and logs nothing.
//! Invariants: Every failure path logs exactly one message and returns a nonzero status.
use std::error::Error as StdError;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};

use crate::core::status::{ConfigError, ErrorCode};

/// Status returned for failures that carry no Tango status code of their own.
pub const GENERIC_FAILURE: i32 = ErrorCode::Error.raw();

const UNKNOWN_FAILURE: &str = "Unhandled failure of non-standard type.";

/// Receives one fully formatted, NUL-terminated message per failed call.
pub trait LogSink {
    fn log(&mut self, message: &CStr);
}

impl<F> LogSink for F
where
    F: FnMut(&CStr),
{
    fn log(&mut self, message: &CStr) {
        self(message)
    }
}

/// A C logging callback, e.g. a host's `__android_log_write` wrapper.
#[derive(Clone, Copy, Debug)]
pub struct CLogFn(pub unsafe extern "C" fn(*const c_char));

impl LogSink for CLogFn {
    fn log(&mut self, message: &CStr) {
        unsafe { (self.0)(message.as_ptr()) }
    }
}

/// Forwards boundary messages to `tracing` at error level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&mut self, message: &CStr) {
        tracing::error!(target: "tango_config::boundary", "{}", message.to_string_lossy());
    }
}

/// Runs `operation(target, args)` and turns any failure into a status code.
///
/// - `Ok(status)` is returned unchanged.
/// - An error with a [`ConfigError`] anywhere in its source chain returns that error's code.
/// - Any other error returns [`GENERIC_FAILURE`]; the log names its description and type.
/// - A panic returns [`GENERIC_FAILURE`] with a fixed message. The process panic hook still
///   runs as usual.
pub fn safe_call<C, A, E, F>(mut log: impl LogSink, target: &mut C, operation: F, args: A) -> i32
where
    C: ?Sized,
    F: FnOnce(&mut C, A) -> Result<i32, E>,
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| operation(target, args)));
    let (status, message) = match outcome {
        Ok(Ok(status)) => return status,
        Ok(Err(err)) => describe_error(err.into(), std::any::type_name::<E>()),
        Err(_) => (GENERIC_FAILURE, UNKNOWN_FAILURE.to_string()),
    };
    emit(&mut log, message);
    status
}

fn describe_error(err: Box<dyn StdError + Send + Sync>, type_name: &str) -> (i32, String) {
    match find_config_error(err.as_ref()) {
        Some(config_err) if config_err.code() != 0 => {
            (config_err.code(), config_error_message(config_err))
        }
        Some(config_err) => (GENERIC_FAILURE, config_error_message(config_err)),
        None => (
            GENERIC_FAILURE,
            format!("Unhandled error: {err} ({type_name})"),
        ),
    }
}

fn find_config_error<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a ConfigError> {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(config_err) = err.downcast_ref::<ConfigError>() {
            return Some(config_err);
        }
        // `Box<ConfigError>` is boxed again on the way in and forwards `source()` past itself.
        if let Some(config_err) = err.downcast_ref::<Box<ConfigError>>() {
            return Some(config_err);
        }
        current = err.source();
    }
    None
}

fn config_error_message(err: &ConfigError) -> String {
    let classified = err.classified_message();
    let context = err.context();
    if context.is_empty() || context == classified {
        format!("Unhandled Tango error: {classified}")
    } else {
        format!("Unhandled Tango error: {context} failed because {classified}")
    }
}

fn emit(log: &mut impl LogSink, message: String) {
    let message = CString::new(message.replace('\0', "\\0")).unwrap_or_default();
    log.log(&message);
}
