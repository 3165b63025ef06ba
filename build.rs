//! Purpose: Link the Tango client SDK when the `native` feature is enabled.
//! Role: Cargo build-script; emits link directives and rebuild triggers only.
//! Invariants: Without `native`, the script emits nothing beyond its own rerun triggers.
//! Invariants: Uses only Cargo-provided env vars plus `TANGO_SDK_LIB_DIR`.
use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=TANGO_SDK_LIB_DIR");

    if env::var_os("CARGO_FEATURE_NATIVE").is_none() {
        return;
    }

    if let Some(dir) = env::var_os("TANGO_SDK_LIB_DIR") {
        let dir = PathBuf::from(dir);
        if !dir.is_dir() {
            panic!(
                "TANGO_SDK_LIB_DIR=`{}` is not a directory.\n\
                 Fix: point it at the folder containing libtango_client_api, or unset it to \
                 use the default linker search path.",
                dir.display()
            );
        }
        println!("cargo:rustc-link-search=native={}", dir.display());
    }

    let target = env::var("TARGET").unwrap_or_default();
    if target.contains("android") {
        println!("cargo:rustc-link-lib=dylib=tango_client_api");
    } else {
        println!("cargo:rustc-link-lib=tango_client_api");
    }
}
