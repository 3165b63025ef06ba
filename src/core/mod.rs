// Core modules: status translation, entry registry, typed accessors, and stores.
pub mod entry;
pub mod error;
pub mod memory;
pub mod status;
pub mod store;
#[cfg(feature = "native")]
pub mod sys;
pub mod value;
