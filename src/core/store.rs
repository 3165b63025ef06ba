//! Purpose: Typed get/set accessors over an untyped native configuration store.
//! Exports: `NativeConfig`, `get`, `set`, `get_entry`, `set_entry`, `read_key`, `write_key`,
//!          `to_string`.
//! Role: The only place that turns native status codes from config calls into `ConfigError`s.
//! Invariants: Each accessor issues at most one native call and returns a complete value or an
//!             error, never a partial value.
//! Invariants: `get_entry`/`set_entry` check permission at compile time; `read_key`/`write_key`
//!             check it at runtime before any native call; `get`/`set` by name do not check it.
use std::ffi::{CStr, CString};

use crate::core::entry::{ConfigKey, Entry, access};
use crate::core::error::{Error, ErrorKind};
use crate::core::status::{ConfigError, ErrorCode};
use crate::core::value::{ConfigValue, SetValue, Value};

/// The native store's call surface. Every method returns a status code, 0 meaning success.
///
/// Stores are borrowed, never owned, by the accessors. Implementations need not be
/// thread-safe; callers serialize access to one store themselves.
pub trait NativeConfig {
    fn get_bool(&self, name: &CStr, value: &mut bool) -> i32;
    fn get_int32(&self, name: &CStr, value: &mut i32) -> i32;
    fn get_int64(&self, name: &CStr, value: &mut i64) -> i32;
    fn get_double(&self, name: &CStr, value: &mut f64) -> i32;

    /// Copies at most `value.len()` bytes. A NUL terminator is not guaranteed, and
    /// truncation is not reported.
    fn get_string(&self, name: &CStr, value: &mut [u8]) -> i32;

    fn set_bool(&mut self, name: &CStr, value: bool) -> i32;
    fn set_int32(&mut self, name: &CStr, value: i32) -> i32;
    fn set_int64(&mut self, name: &CStr, value: i64) -> i32;
    fn set_double(&mut self, name: &CStr, value: f64) -> i32;
    fn set_string(&mut self, name: &CStr, value: &CStr) -> i32;

    /// Diagnostic dump of the whole store, or `None` when the native side produced nothing.
    fn dump(&self) -> Option<String>;
}

#[derive(Clone, Copy)]
enum Direction {
    Get,
    Set,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::Get => "get",
            Direction::Set => "set",
        }
    }
}

fn access_context(direction: Direction, name: &str) -> String {
    format!(
        "Failed to {} configuration parameter '{name}'",
        direction.as_str()
    )
}

fn check_access(status: i32, direction: Direction, name: &str) -> Result<(), ConfigError> {
    if status == 0 {
        return Ok(());
    }
    tracing::debug!(
        name,
        status,
        op = direction.as_str(),
        "native config access failed"
    );
    Err(ConfigError::new(status, access_context(direction, name)))
}

fn c_name(direction: Direction, name: &str) -> Result<CString, ConfigError> {
    CString::new(name).map_err(|_| {
        ConfigError::new(ErrorCode::Invalid.raw(), access_context(direction, name))
    })
}

/// Reads `name` as a `T`. `T` must be one of the five supported value types.
pub fn get<T, S>(store: &S, name: &str) -> Result<T, ConfigError>
where
    T: ConfigValue,
    S: NativeConfig + ?Sized,
{
    let c_name = c_name(Direction::Get, name)?;
    get_c(store, name, &c_name)
}

fn get_c<T, S>(store: &S, name: &str, c_name: &CStr) -> Result<T, ConfigError>
where
    T: ConfigValue,
    S: NativeConfig + ?Sized,
{
    let (status, value) = T::get_native(store, c_name);
    check_access(status, Direction::Get, name)?;
    Ok(value)
}

/// Writes `value` to `name` with the native call for `T`.
pub fn set<T, S>(store: &mut S, name: &str, value: &T) -> Result<(), ConfigError>
where
    T: SetValue + ?Sized,
    S: NativeConfig + ?Sized,
{
    let c_name = c_name(Direction::Set, name)?;
    set_c(store, name, &c_name, value)
}

fn set_c<T, S>(store: &mut S, name: &str, c_name: &CStr, value: &T) -> Result<(), ConfigError>
where
    T: SetValue + ?Sized,
    S: NativeConfig + ?Sized,
{
    let status = value.set_native(store, c_name);
    check_access(status, Direction::Set, name)
}

/// Reads a compile-time entry; the return type comes from the entry.
///
/// Write-only entries do not compile:
///
/// ```compile_fail
/// use tango_config::config_entry;
/// use tango_config::core::memory::MemoryConfig;
/// use tango_config::core::store::get_entry;
///
/// config_entry!(struct Token: WriteOnly, String, "config_write_only_token");
///
/// let store = MemoryConfig::new();
/// let _ = get_entry::<Token, _>(&store);
/// ```
pub fn get_entry<E, S>(store: &S) -> Result<E::Value, ConfigError>
where
    E: Entry,
    E::Access: access::CanRead,
    S: NativeConfig + ?Sized,
{
    get_c(store, E::NAME, E::C_NAME)
}

/// Writes a compile-time entry.
///
/// Read-only entries do not compile:
///
/// ```compile_fail
/// use tango_config::core::entry::keys;
/// use tango_config::core::memory::MemoryConfig;
/// use tango_config::core::store::set_entry;
///
/// let mut store = MemoryConfig::new();
/// let _ = set_entry::<keys::MaxPointCloudElements, _>(&mut store, &100);
/// ```
pub fn set_entry<E, S>(store: &mut S, value: &E::Value) -> Result<(), ConfigError>
where
    E: Entry,
    E::Access: access::CanWrite,
    S: NativeConfig + ?Sized,
{
    set_c(store, E::NAME, E::C_NAME, value)
}

/// Reads a built-in entry chosen at runtime. Permission is checked before the native call.
pub fn read_key<S>(store: &S, key: ConfigKey) -> Result<Value, ConfigError>
where
    S: NativeConfig + ?Sized,
{
    use crate::core::value::ValueType;

    let info = key.lookup();
    if !info.permission.is_readable() {
        return Err(ConfigError::new(
            ErrorCode::Invalid.raw(),
            access_context(Direction::Get, info.name),
        ));
    }
    let value = match info.value_type {
        ValueType::Bool => get_c::<bool, _>(store, info.name, info.c_name)?.into_value(),
        ValueType::Int32 => get_c::<i32, _>(store, info.name, info.c_name)?.into_value(),
        ValueType::Int64 => get_c::<i64, _>(store, info.name, info.c_name)?.into_value(),
        ValueType::Double => get_c::<f64, _>(store, info.name, info.c_name)?.into_value(),
        ValueType::String => get_c::<String, _>(store, info.name, info.c_name)?.into_value(),
    };
    Ok(value)
}

/// Writes a built-in entry chosen at runtime. Permission and value type are checked before
/// the native call.
pub fn write_key<S>(store: &mut S, key: ConfigKey, value: &Value) -> Result<(), ConfigError>
where
    S: NativeConfig + ?Sized,
{
    let info = key.lookup();
    if !info.permission.is_writable() || info.value_type != value.value_type() {
        return Err(ConfigError::new(
            ErrorCode::Invalid.raw(),
            access_context(Direction::Set, info.name),
        ));
    }
    match value {
        Value::Bool(value) => set_c(store, info.name, info.c_name, value),
        Value::Int32(value) => set_c(store, info.name, info.c_name, value),
        Value::Int64(value) => set_c(store, info.name, info.c_name, value),
        Value::Double(value) => set_c(store, info.name, info.c_name, value),
        Value::String(value) => set_c(store, info.name, info.c_name, value.as_str()),
    }
}

/// Serializes the whole store for diagnostics.
///
/// Fails with an uncategorized `Error`: the native call reports no status code.
pub fn to_string<S>(store: &S) -> Result<String, Error>
where
    S: NativeConfig + ?Sized,
{
    store
        .dump()
        .ok_or_else(|| Error::new(ErrorKind::Internal).with_message("config to_string failed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entry::keys;
    use crate::core::memory::MemoryConfig;

    #[test]
    fn get_failure_carries_code_and_context() {
        let mut store = MemoryConfig::new();
        store.fail_get("config_color_iso", ErrorCode::NoCameraPermission.raw());

        let err = get::<i32, _>(&store, "config_color_iso").unwrap_err();
        assert!(err.is(ErrorCode::NoCameraPermission));
        assert_eq!(
            err.context(),
            "Failed to get configuration parameter 'config_color_iso'"
        );
        assert_eq!(store.native_calls(), 1);
    }

    #[test]
    fn interior_nul_name_is_rejected_without_native_call() {
        let mut store = MemoryConfig::new();
        let err = set(&mut store, "bad\0name", &true).unwrap_err();
        assert!(err.is(ErrorCode::Invalid));
        assert!(err.context().starts_with("Failed to set"));

        let err = get::<bool, _>(&store, "bad\0name").unwrap_err();
        assert!(err.is(ErrorCode::Invalid));
        assert_eq!(store.native_calls(), 0);
    }

    #[test]
    fn entry_accessors_use_canonical_names() {
        let mut store = MemoryConfig::new();
        set_entry::<keys::DepthMode, _>(&mut store, &2).expect("set");
        assert_eq!(get::<i32, _>(&store, "config_depth_mode").expect("get"), 2);
        assert_eq!(get_entry::<keys::DepthMode, _>(&store).expect("get"), 2);
    }

    #[test]
    fn write_key_rejects_read_only_before_native_call() {
        let mut store = MemoryConfig::new();
        let err = write_key(&mut store, ConfigKey::MaxPointCloudElements, &Value::Int32(1))
            .unwrap_err();
        assert!(err.is(ErrorCode::Invalid));
        assert_eq!(
            err.context(),
            "Failed to set configuration parameter 'max_point_cloud_elements'"
        );
        assert_eq!(store.native_calls(), 0);
    }

    #[test]
    fn write_key_rejects_mismatched_type() {
        let mut store = MemoryConfig::new();
        let err =
            write_key(&mut store, ConfigKey::DepthMode, &Value::Bool(true)).unwrap_err();
        assert!(err.is(ErrorCode::Invalid));
        assert_eq!(store.native_calls(), 0);
    }

    #[test]
    fn read_key_dispatches_on_registry_type() {
        let mut store = MemoryConfig::new();
        store.insert("depth_period_in_seconds", Value::Double(0.2));
        let value = read_key(&store, ConfigKey::DepthPeriodInSeconds).expect("read");
        assert_eq!(value, Value::Double(0.2));
    }

    #[test]
    fn to_string_failure_is_uncategorized() {
        let mut store = MemoryConfig::new();
        store.fail_to_string();
        let err = to_string(&store).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.status().is_none());
    }
}
