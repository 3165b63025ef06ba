//! Purpose: Typed, permission-checked access to the Tango service configuration store.
//! Exports: `core` (status translation, entry registry, accessors, stores, errors),
//!          `boundary` (`safe_call` and log sinks), plus the `check_status!` and
//!          `config_entry!` macros.
//! Role: Library backing the `tango-config` CLI and any host that embeds the Tango SDK.
//! Invariants: Native status codes surface as `ConfigError`; only `boundary` turns errors
//!             back into status codes.
//! Invariants: No internal threads or locking; one store handle is used by one caller at a time.
//!
//! ```
//! use tango_config::core::entry::keys;
//! use tango_config::core::memory::MemoryConfig;
//! use tango_config::core::store::{get, get_entry, set_entry};
//!
//! let mut store = MemoryConfig::new();
//! set_entry::<keys::EnableColorCamera, _>(&mut store, &false)?;
//! assert!(!get_entry::<keys::EnableColorCamera, _>(&store)?);
//! assert!(!get::<bool, _>(&store, "config_enable_color_camera")?);
//! # Ok::<(), tango_config::core::status::ConfigError>(())
//! ```
pub mod boundary;
pub mod core;
