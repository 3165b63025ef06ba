//! Purpose: In-memory `NativeConfig` that records writes and replays them on reads.
//! Exports: `MemoryConfig`.
//! Role: Test double for the accessors and backing store for the diagnostic CLI.
//! Invariants: Behaves like the native store: untyped by name, status codes for failures,
//!             string reads copy at most the caller's buffer without terminating it.
//! Invariants: Every trait call counts as one native call, including injected failures.
use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::ffi::CStr;

use serde_json::Value as JsonValue;

use crate::core::error::{Error, ErrorKind};
use crate::core::status::ErrorCode;
use crate::core::store::NativeConfig;
use crate::core::value::Value;

#[derive(Debug, Default)]
pub struct MemoryConfig {
    values: BTreeMap<String, Value>,
    get_failures: HashMap<String, i32>,
    set_failures: HashMap<String, i32>,
    dump_fails: bool,
    calls: Cell<usize>,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a store from a flat JSON object of `name: value` pairs.
    ///
    /// Integers become `int64` (readable as `int32` when they fit), other numbers `double`.
    pub fn from_json(json: &JsonValue) -> Result<Self, Error> {
        let object = json.as_object().ok_or_else(|| {
            Error::new(ErrorKind::Usage).with_message("seed must be a JSON object")
        })?;
        let mut store = Self::new();
        for (name, value) in object {
            let value = match value {
                JsonValue::Bool(value) => Value::Bool(*value),
                JsonValue::Number(number) => match number.as_i64() {
                    Some(value) => Value::Int64(value),
                    None => Value::Double(number.as_f64().unwrap_or(f64::NAN)),
                },
                JsonValue::String(value) => Value::String(value.clone()),
                _ => {
                    return Err(Error::new(ErrorKind::Usage)
                        .with_message(format!("seed value for '{name}' must be a scalar")));
                }
            };
            store.insert(name, value);
        }
        Ok(store)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Makes every read of `name` fail with `code`.
    pub fn fail_get(&mut self, name: impl Into<String>, code: i32) {
        self.get_failures.insert(name.into(), code);
    }

    /// Makes every write of `name` fail with `code`; the stored value is left untouched.
    pub fn fail_set(&mut self, name: impl Into<String>, code: i32) {
        self.set_failures.insert(name.into(), code);
    }

    /// Makes `dump` return nothing.
    pub fn fail_to_string(&mut self) {
        self.dump_fails = true;
    }

    pub fn native_calls(&self) -> usize {
        self.calls.get()
    }

    fn read(&self, name: &CStr) -> Result<&Value, i32> {
        self.calls.set(self.calls.get() + 1);
        let name = name.to_str().map_err(|_| ErrorCode::Invalid.raw())?;
        if let Some(code) = self.get_failures.get(name) {
            return Err(*code);
        }
        self.values.get(name).ok_or(ErrorCode::Invalid.raw())
    }

    fn write(&mut self, name: &CStr, value: Value) -> i32 {
        self.calls.set(self.calls.get() + 1);
        let Ok(name) = name.to_str() else {
            return ErrorCode::Invalid.raw();
        };
        if let Some(code) = self.set_failures.get(name) {
            return *code;
        }
        self.values.insert(name.to_string(), value);
        0
    }
}

fn status_of<T>(result: Result<T, i32>, out: &mut T) -> i32 {
    match result {
        Ok(value) => {
            *out = value;
            0
        }
        Err(code) => code,
    }
}

impl NativeConfig for MemoryConfig {
    fn get_bool(&self, name: &CStr, value: &mut bool) -> i32 {
        let result = self.read(name).and_then(|stored| match stored {
            Value::Bool(stored) => Ok(*stored),
            _ => Err(ErrorCode::Invalid.raw()),
        });
        status_of(result, value)
    }

    fn get_int32(&self, name: &CStr, value: &mut i32) -> i32 {
        let result = self.read(name).and_then(|stored| match stored {
            Value::Int32(stored) => Ok(*stored),
            Value::Int64(stored) => i32::try_from(*stored).map_err(|_| ErrorCode::Invalid.raw()),
            _ => Err(ErrorCode::Invalid.raw()),
        });
        status_of(result, value)
    }

    fn get_int64(&self, name: &CStr, value: &mut i64) -> i32 {
        let result = self.read(name).and_then(|stored| match stored {
            Value::Int32(stored) => Ok(i64::from(*stored)),
            Value::Int64(stored) => Ok(*stored),
            _ => Err(ErrorCode::Invalid.raw()),
        });
        status_of(result, value)
    }

    fn get_double(&self, name: &CStr, value: &mut f64) -> i32 {
        let result = self.read(name).and_then(|stored| match stored {
            Value::Double(stored) => Ok(*stored),
            _ => Err(ErrorCode::Invalid.raw()),
        });
        status_of(result, value)
    }

    fn get_string(&self, name: &CStr, value: &mut [u8]) -> i32 {
        let stored = match self.read(name) {
            Ok(Value::String(stored)) => stored.as_bytes(),
            Ok(_) => return ErrorCode::Invalid.raw(),
            Err(code) => return code,
        };
        let len = stored.len().min(value.len());
        value[..len].copy_from_slice(&stored[..len]);
        if len < value.len() {
            value[len] = 0;
        }
        0
    }

    fn set_bool(&mut self, name: &CStr, value: bool) -> i32 {
        self.write(name, Value::Bool(value))
    }

    fn set_int32(&mut self, name: &CStr, value: i32) -> i32 {
        self.write(name, Value::Int32(value))
    }

    fn set_int64(&mut self, name: &CStr, value: i64) -> i32 {
        self.write(name, Value::Int64(value))
    }

    fn set_double(&mut self, name: &CStr, value: f64) -> i32 {
        self.write(name, Value::Double(value))
    }

    fn set_string(&mut self, name: &CStr, value: &CStr) -> i32 {
        match value.to_str() {
            Ok(value) => self.write(name, Value::String(value.to_string())),
            Err(_) => {
                self.calls.set(self.calls.get() + 1);
                ErrorCode::Invalid.raw()
            }
        }
    }

    fn dump(&self) -> Option<String> {
        self.calls.set(self.calls.get() + 1);
        if self.dump_fails {
            return None;
        }
        let mut out = String::new();
        for (name, value) in &self.values {
            out.push_str(name);
            out.push('=');
            out.push_str(&value.to_string());
            out.push('\n');
        }
        Some(out)
    }
}
