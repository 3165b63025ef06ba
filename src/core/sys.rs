//! Purpose: Raw bindings to the Tango client SDK config API plus handle wrappers.
//! Exports: `TangoConfig`, `ConfigType`, `RawConfig`, `UniqueConfig`, the `TangoConfig_*` symbols.
//! Role: Native backing for `NativeConfig`; compiled only with the `native` feature.
//! Invariants: All FFI interaction for config access is confined to this module.
//! Invariants: `UniqueConfig` frees its handle exactly once; `RawConfig` never frees.
#![allow(non_snake_case)]

use std::ffi::CStr;
use std::marker::PhantomData;
use std::os::raw::{c_char, c_int, c_void};
use std::ptr::NonNull;

use crate::core::store::NativeConfig;

pub type TangoConfig = *mut c_void;
pub type TangoErrorType = c_int;

/// Which configuration snapshot `TangoService_getConfig` returns.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(C)]
pub enum ConfigType {
    Default = 0,
    Current = 1,
    MotionTracking = 2,
    AreaLearning = 3,
    Runtime = 4,
}

unsafe extern "C" {
    pub fn TangoService_getConfig(config_type: ConfigType) -> TangoConfig;
    pub fn TangoConfig_free(config: TangoConfig);
    pub fn TangoConfig_toString(config: TangoConfig) -> *mut c_char;

    pub fn TangoConfig_getBool(
        config: TangoConfig,
        key: *const c_char,
        value: *mut bool,
    ) -> TangoErrorType;
    pub fn TangoConfig_getInt32(
        config: TangoConfig,
        key: *const c_char,
        value: *mut i32,
    ) -> TangoErrorType;
    pub fn TangoConfig_getInt64(
        config: TangoConfig,
        key: *const c_char,
        value: *mut i64,
    ) -> TangoErrorType;
    pub fn TangoConfig_getDouble(
        config: TangoConfig,
        key: *const c_char,
        value: *mut f64,
    ) -> TangoErrorType;
    pub fn TangoConfig_getString(
        config: TangoConfig,
        key: *const c_char,
        value: *mut c_char,
        size: usize,
    ) -> TangoErrorType;

    pub fn TangoConfig_setBool(config: TangoConfig, key: *const c_char, value: bool)
    -> TangoErrorType;
    pub fn TangoConfig_setInt32(config: TangoConfig, key: *const c_char, value: i32)
    -> TangoErrorType;
    pub fn TangoConfig_setInt64(config: TangoConfig, key: *const c_char, value: i64)
    -> TangoErrorType;
    pub fn TangoConfig_setDouble(config: TangoConfig, key: *const c_char, value: f64)
    -> TangoErrorType;
    pub fn TangoConfig_setString(
        config: TangoConfig,
        key: *const c_char,
        value: *const c_char,
    ) -> TangoErrorType;
}

/// A borrowed native handle. The owner (usually a [`UniqueConfig`]) must outlive it.
#[derive(Debug)]
pub struct RawConfig<'a> {
    handle: NonNull<c_void>,
    _owner: PhantomData<&'a mut c_void>,
}

impl<'a> RawConfig<'a> {
    /// # Safety
    /// `handle` must be a live `TangoConfig` for `'a` and not be freed during that time.
    pub unsafe fn from_raw(handle: TangoConfig) -> Option<Self> {
        NonNull::new(handle).map(|handle| Self {
            handle,
            _owner: PhantomData,
        })
    }

    pub fn as_ptr(&self) -> TangoConfig {
        self.handle.as_ptr()
    }
}

impl NativeConfig for RawConfig<'_> {
    fn get_bool(&self, name: &CStr, value: &mut bool) -> i32 {
        unsafe { TangoConfig_getBool(self.as_ptr(), name.as_ptr(), value) }
    }

    fn get_int32(&self, name: &CStr, value: &mut i32) -> i32 {
        unsafe { TangoConfig_getInt32(self.as_ptr(), name.as_ptr(), value) }
    }

    fn get_int64(&self, name: &CStr, value: &mut i64) -> i32 {
        unsafe { TangoConfig_getInt64(self.as_ptr(), name.as_ptr(), value) }
    }

    fn get_double(&self, name: &CStr, value: &mut f64) -> i32 {
        unsafe { TangoConfig_getDouble(self.as_ptr(), name.as_ptr(), value) }
    }

    fn get_string(&self, name: &CStr, value: &mut [u8]) -> i32 {
        unsafe {
            TangoConfig_getString(
                self.as_ptr(),
                name.as_ptr(),
                value.as_mut_ptr() as *mut c_char,
                value.len(),
            )
        }
    }

    fn set_bool(&mut self, name: &CStr, value: bool) -> i32 {
        unsafe { TangoConfig_setBool(self.as_ptr(), name.as_ptr(), value) }
    }

    fn set_int32(&mut self, name: &CStr, value: i32) -> i32 {
        unsafe { TangoConfig_setInt32(self.as_ptr(), name.as_ptr(), value) }
    }

    fn set_int64(&mut self, name: &CStr, value: i64) -> i32 {
        unsafe { TangoConfig_setInt64(self.as_ptr(), name.as_ptr(), value) }
    }

    fn set_double(&mut self, name: &CStr, value: f64) -> i32 {
        unsafe { TangoConfig_setDouble(self.as_ptr(), name.as_ptr(), value) }
    }

    fn set_string(&mut self, name: &CStr, value: &CStr) -> i32 {
        unsafe { TangoConfig_setString(self.as_ptr(), name.as_ptr(), value.as_ptr()) }
    }

    fn dump(&self) -> Option<String> {
        let ptr = unsafe { TangoConfig_toString(self.as_ptr()) };
        if ptr.is_null() {
            return None;
        }
        let text = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
        // Allocated by the SDK with malloc.
        unsafe {
            libc::free(ptr as *mut libc::c_void);
        }
        Some(text)
    }
}

/// An owned native handle, released with `TangoConfig_free` on drop.
#[derive(Debug)]
pub struct UniqueConfig {
    handle: Option<NonNull<c_void>>,
}

impl UniqueConfig {
    /// A handle that owns nothing.
    pub fn null() -> Self {
        Self { handle: None }
    }

    /// # Safety
    /// `handle` must be null or a `TangoConfig` not owned by anything else.
    pub unsafe fn wrap(handle: TangoConfig) -> Self {
        Self {
            handle: NonNull::new(handle),
        }
    }

    pub fn service(config_type: ConfigType) -> Self {
        unsafe { Self::wrap(TangoService_getConfig(config_type)) }
    }

    pub fn is_null(&self) -> bool {
        self.handle.is_none()
    }

    pub fn get(&mut self) -> Option<RawConfig<'_>> {
        self.handle.map(|handle| RawConfig {
            handle,
            _owner: PhantomData,
        })
    }

    /// Frees the current handle, if any, and takes ownership of `handle`.
    ///
    /// # Safety
    /// Same contract as [`UniqueConfig::wrap`].
    pub unsafe fn reset(&mut self, handle: TangoConfig) {
        self.release();
        self.handle = NonNull::new(handle);
    }

    /// Gives up ownership without freeing.
    pub fn into_raw(mut self) -> TangoConfig {
        self.handle
            .take()
            .map_or(std::ptr::null_mut(), |handle| handle.as_ptr())
    }

    fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            unsafe { TangoConfig_free(handle.as_ptr()) }
        }
    }
}

impl Drop for UniqueConfig {
    fn drop(&mut self) {
        self.release();
    }
}
