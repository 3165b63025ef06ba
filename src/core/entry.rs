//! Purpose: Compile-time registry of Tango configuration entries.
//! Exports: `ConfigKey`, `EntryInfo`, `Permission`, `Entry`, `KeyedEntry`, `access`, `keys`,
//!          `config_entry!`.
//! Role: Binds each key to its canonical name, value type and permission, at both type and
//!       value level; accessors in `core::store` resolve keys through here.
//! Invariants: `ConfigKey::lookup` is total; each key has exactly one entry (one macro row).
//! Invariants: `ConfigKey` discriminants are build-specific; persist `name`, never the number.
use std::ffi::CStr;
use std::fmt;

use serde::Serialize;

use crate::core::value::{ConfigValue, SetValue, ValueType};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl Permission {
    pub const fn is_readable(self) -> bool {
        matches!(self, Permission::ReadOnly | Permission::ReadWrite)
    }

    pub const fn is_writable(self) -> bool {
        matches!(self, Permission::WriteOnly | Permission::ReadWrite)
    }

    pub fn short(self) -> &'static str {
        match self {
            Permission::ReadOnly => "ro",
            Permission::WriteOnly => "wo",
            Permission::ReadWrite => "rw",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short())
    }
}

/// Type-level permissions, so access direction can be checked by trait bounds.
pub mod access {
    use super::Permission;

    pub trait Access {
        const PERMISSION: Permission;
    }

    /// Implemented by access markers that allow reads.
    pub trait CanRead: Access {}

    /// Implemented by access markers that allow writes.
    pub trait CanWrite: Access {}

    #[derive(Clone, Copy, Debug)]
    pub struct ReadOnly;

    #[derive(Clone, Copy, Debug)]
    pub struct WriteOnly;

    #[derive(Clone, Copy, Debug)]
    pub struct ReadWrite;

    impl Access for ReadOnly {
        const PERMISSION: Permission = Permission::ReadOnly;
    }

    impl Access for WriteOnly {
        const PERMISSION: Permission = Permission::WriteOnly;
    }

    impl Access for ReadWrite {
        const PERMISSION: Permission = Permission::ReadWrite;
    }

    impl CanRead for ReadOnly {}
    impl CanRead for ReadWrite {}
    impl CanWrite for WriteOnly {}
    impl CanWrite for ReadWrite {}
}

/// A configuration entry known at compile time.
///
/// Implement with [`config_entry!`](crate::config_entry) rather than by hand.
pub trait Entry {
    const NAME: &'static str;
    const C_NAME: &'static CStr;
    const PERMISSION: Permission = <Self::Access as access::Access>::PERMISSION;
    const VALUE_TYPE: ValueType = <Self::Value as SetValue>::TYPE;

    type Value: ConfigValue;
    type Access: access::Access;
}

/// Built-in entries, which also have a runtime [`ConfigKey`].
pub trait KeyedEntry: Entry {
    const KEY: ConfigKey;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct EntryInfo {
    pub name: &'static str,
    #[serde(skip)]
    pub c_name: &'static CStr,
    pub value_type: ValueType,
    pub permission: Permission,
}

#[doc(hidden)]
pub const fn c_name(with_nul: &'static str) -> &'static CStr {
    match CStr::from_bytes_with_nul(with_nul.as_bytes()) {
        Ok(name) => name,
        Err(_) => panic!("config entry names must not contain NUL"),
    }
}

/// Declares a marker type implementing [`Entry`].
///
/// ```
/// use tango_config::config_entry;
/// use tango_config::core::entry::{Entry, Permission};
///
/// config_entry!(
///     /// A key added by a newer SDK.
///     pub struct DepthFramerateHint: ReadWrite, i32, "config_depth_framerate_hint"
/// );
///
/// assert_eq!(DepthFramerateHint::NAME, "config_depth_framerate_hint");
/// assert_eq!(DepthFramerateHint::PERMISSION, Permission::ReadWrite);
/// ```
#[macro_export]
macro_rules! config_entry {
    ($(#[$meta:meta])* $vis:vis struct $marker:ident: $access:ident, $value:ty, $name:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug)]
        $vis struct $marker;

        impl $crate::core::entry::Entry for $marker {
            const NAME: &'static str = $name;
            const C_NAME: &'static ::std::ffi::CStr =
                $crate::core::entry::c_name(concat!($name, "\0"));

            type Value = $value;
            type Access = $crate::core::entry::access::$access;
        }
    };
}

macro_rules! registry {
    ($($key:ident => $access:ident, $value:ty, $name:literal;)*) => {
        /// Runtime identifier for a built-in entry.
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
        pub enum ConfigKey {
            $($key,)*
        }

        impl ConfigKey {
            pub const ALL: &'static [ConfigKey] = &[$(ConfigKey::$key,)*];

            pub const fn lookup(self) -> EntryInfo {
                match self {
                    $(ConfigKey::$key => EntryInfo {
                        name: <keys::$key as Entry>::NAME,
                        c_name: <keys::$key as Entry>::C_NAME,
                        value_type: <$value as SetValue>::TYPE,
                        permission: <access::$access as access::Access>::PERMISSION,
                    },)*
                }
            }
        }

        /// One marker type per built-in entry, for compile-time checked access.
        pub mod keys {
            use super::{ConfigKey, KeyedEntry};

            $(
                $crate::config_entry!(pub struct $key: $access, $value, $name);

                impl KeyedEntry for $key {
                    const KEY: ConfigKey = ConfigKey::$key;
                }
            )*
        }
    };
}

registry! {
    ColorModeAuto => ReadWrite, bool, "config_color_mode_auto";
    ColorIso => ReadWrite, i32, "config_color_iso";
    ColorExp => ReadWrite, i32, "config_color_exp";
    DepthMode => ReadWrite, i32, "config_depth_mode";
    EnableAutoRecovery => ReadWrite, bool, "config_enable_auto_recovery";
    EnableColorCamera => ReadWrite, bool, "config_enable_color_camera";
    EnableDepth => ReadWrite, bool, "config_enable_depth";
    EnableLowLatencyImuIntegration => ReadWrite, bool, "config_enable_low_latency_imu_integration";
    EnableLearningMode => ReadWrite, bool, "config_enable_learning_mode";
    EnableMotionTracking => ReadWrite, bool, "config_enable_motion_tracking";
    HighRatePose => ReadWrite, bool, "config_high_rate_pose";
    SmoothPose => ReadWrite, bool, "config_smooth_pose";
    LoadAreaDescriptionUuid => ReadWrite, String, "config_load_area_description_UUID";
    EnableDatasetRecording => ReadWrite, bool, "config_enable_dataset_recording";
    EnableDriftCorrection => ReadWrite, bool, "config_enable_drift_correction";
    ExperimentalEnableSceneReconstruction => ReadWrite, bool, "config_experimental_enable_scene_reconstruction";
    ServiceLibraryVersion => ReadOnly, String, "tango_service_library_version";
    DepthPeriodInSeconds => ReadOnly, f64, "depth_period_in_seconds";
    MaxPointCloudElements => ReadOnly, i32, "max_point_cloud_elements";
    RuntimeDepthFramerate => ReadWrite, i32, "config_runtime_depth_framerate";
}

impl ConfigKey {
    pub fn name(self) -> &'static str {
        self.lookup().name
    }

    pub fn from_name(name: &str) -> Option<ConfigKey> {
        ConfigKey::ALL
            .iter()
            .copied()
            .find(|key| key.lookup().name == name)
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
