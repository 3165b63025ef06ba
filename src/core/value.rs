//! Purpose: The closed set of configuration value types and their native dispatch.
//! Exports: `ValueType`, `Value`, `ConfigValue`, `SetValue`, `MAX_STRING_LEN`.
//! Role: One native call per value type; the sealed traits reject any other type at build time.
//! Invariants: String reads never exceed `MAX_STRING_LEN` bytes and are always NUL-terminated
//!             before decoding. Truncation is silent (the native API does not report it).
use std::ffi::{CStr, CString};
use std::fmt;

use serde::Serialize;

use crate::core::status::ErrorCode;
use crate::core::store::NativeConfig;

/// Largest string the native store hands back, in bytes, excluding the terminator.
pub const MAX_STRING_LEN: usize = 4000;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Bool,
    Int32,
    Int64,
    Double,
    String,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Int32 => "int32",
            ValueType::Int64 => "int64",
            ValueType::Double => "double",
            ValueType::String => "string",
        }
    }

    pub fn parse(input: &str) -> Option<ValueType> {
        match input {
            "bool" => Some(ValueType::Bool),
            "int32" | "i32" => Some(ValueType::Int32),
            "int64" | "i64" => Some(ValueType::Int64),
            "double" | "f64" => Some(ValueType::Double),
            "string" | "str" => Some(ValueType::String),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dynamically typed configuration value.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Double(f64),
    String(String),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Bool(_) => ValueType::Bool,
            Value::Int32(_) => ValueType::Int32,
            Value::Int64(_) => ValueType::Int64,
            Value::Double(_) => ValueType::Double,
            Value::String(_) => ValueType::String,
        }
    }

    /// Parses command-line text as a value of type `ty`.
    pub fn parse_as(ty: ValueType, input: &str) -> Option<Value> {
        match ty {
            ValueType::Bool => match input {
                "true" | "1" => Some(Value::Bool(true)),
                "false" | "0" => Some(Value::Bool(false)),
                _ => None,
            },
            ValueType::Int32 => input.parse().ok().map(Value::Int32),
            ValueType::Int64 => input.parse().ok().map(Value::Int64),
            ValueType::Double => input.parse().ok().map(Value::Double),
            ValueType::String => Some(Value::String(input.to_string())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int32(value) => write!(f, "{value}"),
            Value::Int64(value) => write!(f, "{value}"),
            Value::Double(value) => write!(f, "{value}"),
            Value::String(value) => f.write_str(value),
        }
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for bool {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
    impl Sealed for String {}
    impl Sealed for str {}
}

/// Types that can be written to the native store.
pub trait SetValue: sealed::Sealed {
    const TYPE: ValueType;

    /// Issues the single native write for this type and returns its status.
    fn set_native<S: NativeConfig + ?Sized>(&self, store: &mut S, name: &CStr) -> i32;
}

/// Types that can be read back from the native store.
pub trait ConfigValue: SetValue + Sized {
    /// Issues the single native read for this type; the value is meaningful only on status 0.
    fn get_native<S: NativeConfig + ?Sized>(store: &S, name: &CStr) -> (i32, Self);

    fn into_value(self) -> Value;
}

impl SetValue for bool {
    const TYPE: ValueType = ValueType::Bool;

    fn set_native<S: NativeConfig + ?Sized>(&self, store: &mut S, name: &CStr) -> i32 {
        store.set_bool(name, *self)
    }
}

impl ConfigValue for bool {
    fn get_native<S: NativeConfig + ?Sized>(store: &S, name: &CStr) -> (i32, Self) {
        let mut value = false;
        let status = store.get_bool(name, &mut value);
        (status, value)
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl SetValue for i32 {
    const TYPE: ValueType = ValueType::Int32;

    fn set_native<S: NativeConfig + ?Sized>(&self, store: &mut S, name: &CStr) -> i32 {
        store.set_int32(name, *self)
    }
}

impl ConfigValue for i32 {
    fn get_native<S: NativeConfig + ?Sized>(store: &S, name: &CStr) -> (i32, Self) {
        let mut value = 0;
        let status = store.get_int32(name, &mut value);
        (status, value)
    }

    fn into_value(self) -> Value {
        Value::Int32(self)
    }
}

impl SetValue for i64 {
    const TYPE: ValueType = ValueType::Int64;

    fn set_native<S: NativeConfig + ?Sized>(&self, store: &mut S, name: &CStr) -> i32 {
        store.set_int64(name, *self)
    }
}

impl ConfigValue for i64 {
    fn get_native<S: NativeConfig + ?Sized>(store: &S, name: &CStr) -> (i32, Self) {
        let mut value = 0;
        let status = store.get_int64(name, &mut value);
        (status, value)
    }

    fn into_value(self) -> Value {
        Value::Int64(self)
    }
}

impl SetValue for f64 {
    const TYPE: ValueType = ValueType::Double;

    fn set_native<S: NativeConfig + ?Sized>(&self, store: &mut S, name: &CStr) -> i32 {
        store.set_double(name, *self)
    }
}

impl ConfigValue for f64 {
    fn get_native<S: NativeConfig + ?Sized>(store: &S, name: &CStr) -> (i32, Self) {
        let mut value = 0.0;
        let status = store.get_double(name, &mut value);
        (status, value)
    }

    fn into_value(self) -> Value {
        Value::Double(self)
    }
}

impl SetValue for str {
    const TYPE: ValueType = ValueType::String;

    fn set_native<S: NativeConfig + ?Sized>(&self, store: &mut S, name: &CStr) -> i32 {
        // The native side only sees up to the first NUL, which would silently
        // store a different value.
        match CString::new(self) {
            Ok(value) => store.set_string(name, &value),
            Err(_) => ErrorCode::Invalid.raw(),
        }
    }
}

impl SetValue for String {
    const TYPE: ValueType = ValueType::String;

    fn set_native<S: NativeConfig + ?Sized>(&self, store: &mut S, name: &CStr) -> i32 {
        self.as_str().set_native(store, name)
    }
}

impl ConfigValue for String {
    fn get_native<S: NativeConfig + ?Sized>(store: &S, name: &CStr) -> (i32, Self) {
        let mut buf = vec![0u8; MAX_STRING_LEN + 1];
        let status = store.get_string(name, &mut buf[..MAX_STRING_LEN]);
        buf[MAX_STRING_LEN] = 0;
        (status, decode_c_buf(&buf))
    }

    fn into_value(self) -> Value {
        Value::String(self)
    }
}

// Cuts at the first NUL. A multi-byte character split by truncation is dropped
// rather than replaced.
fn decode_c_buf(buf: &[u8]) -> String {
    let end = buf.iter().position(|byte| *byte == 0).unwrap_or(buf.len());
    let bytes = &buf[..end];
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(err) if err.error_len().is_none() => {
            String::from_utf8_lossy(&bytes[..err.valid_up_to()]).into_owned()
        }
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}
