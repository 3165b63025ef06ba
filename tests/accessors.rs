// Accessor contract tests against the in-memory store.
use tango_config::core::entry::{ConfigKey, Entry, keys};
use tango_config::core::error::ErrorKind;
use tango_config::core::memory::MemoryConfig;
use tango_config::core::status::{Category, ErrorCode, ErrorCondition};
use tango_config::core::store::{get, get_entry, read_key, set, set_entry, to_string, write_key};
use tango_config::core::value::{MAX_STRING_LEN, Value, ValueType};

#[test]
fn round_trip_every_value_type_by_name() {
    let mut store = MemoryConfig::new();

    set(&mut store, "custom_bool", &true).expect("set bool");
    set(&mut store, "custom_i32", &-12i32).expect("set i32");
    set(&mut store, "custom_i64", &(1i64 << 40)).expect("set i64");
    set(&mut store, "custom_f64", &0.125f64).expect("set f64");
    set(&mut store, "custom_string", "hello").expect("set str");
    set(&mut store, "custom_owned", &"world".to_string()).expect("set String");

    assert!(get::<bool, _>(&store, "custom_bool").expect("get bool"));
    assert_eq!(get::<i32, _>(&store, "custom_i32").expect("get i32"), -12);
    assert_eq!(get::<i64, _>(&store, "custom_i64").expect("get i64"), 1i64 << 40);
    assert_eq!(get::<f64, _>(&store, "custom_f64").expect("get f64"), 0.125);
    assert_eq!(get::<String, _>(&store, "custom_string").expect("get str"), "hello");
    assert_eq!(get::<String, _>(&store, "custom_owned").expect("get String"), "world");
}

#[test]
fn round_trip_every_writable_entry() {
    let mut store = MemoryConfig::new();
    for key in ConfigKey::ALL {
        let info = key.lookup();
        if !info.permission.is_writable() {
            continue;
        }
        let value = match info.value_type {
            ValueType::Bool => Value::Bool(true),
            ValueType::Int32 => Value::Int32(30),
            ValueType::Int64 => Value::Int64(-30),
            ValueType::Double => Value::Double(1.5),
            ValueType::String => Value::String(format!("{}-value", info.name)),
        };
        write_key(&mut store, *key, &value).expect("write");
        assert_eq!(read_key(&store, *key).expect("read"), value, "{}", info.name);
    }

    set_entry::<keys::LoadAreaDescriptionUuid, _>(&mut store, &"adf-uuid".to_string())
        .expect("set uuid");
    assert_eq!(
        get_entry::<keys::LoadAreaDescriptionUuid, _>(&store).expect("get uuid"),
        "adf-uuid"
    );
    set_entry::<keys::EnableMotionTracking, _>(&mut store, &false).expect("set bool");
    assert!(!get_entry::<keys::EnableMotionTracking, _>(&store).expect("get bool"));
}

#[test]
fn read_only_entries_are_readable_by_entry() {
    let mut store = MemoryConfig::new();
    store.insert(keys::ServiceLibraryVersion::NAME, Value::String("1.54".to_string()));
    store.insert(keys::MaxPointCloudElements::NAME, Value::Int32(60_000));

    assert_eq!(
        get_entry::<keys::ServiceLibraryVersion, _>(&store).expect("version"),
        "1.54"
    );
    assert_eq!(
        get_entry::<keys::MaxPointCloudElements, _>(&store).expect("max"),
        60_000
    );
}

#[test]
fn runtime_permission_check_issues_no_native_call() {
    let mut store = MemoryConfig::new();
    for key in ConfigKey::ALL {
        if key.lookup().permission.is_writable() {
            continue;
        }
        let err = write_key(&mut store, *key, &Value::Int32(0)).expect_err("read-only");
        assert!(err.is(ErrorCode::Invalid));
        assert!(err.context().contains(key.name()));
    }
    assert_eq!(store.native_calls(), 0);
}

#[test]
fn name_indexed_set_does_not_check_permission() {
    let mut store = MemoryConfig::new();
    set(&mut store, "max_point_cloud_elements", &5i32).expect("unchecked write");
    assert_eq!(store.value("max_point_cloud_elements"), Some(&Value::Int32(5)));
}

#[test]
fn get_failure_reports_code_and_name() {
    let codes = [
        ErrorCode::Error.raw(),
        ErrorCode::Invalid.raw(),
        ErrorCode::NoDatasetPermission.raw(),
        -42,
    ];
    for code in codes {
        let mut store = MemoryConfig::new();
        store.fail_get("config_depth_mode", code);

        let err = get_entry::<keys::DepthMode, _>(&store).expect_err("get fails");
        assert_eq!(err.code(), code);
        assert_eq!(err.category(), Category::tango());
        assert!(err.context().contains("config_depth_mode"));
        assert!(err.context().contains("get"));
        assert!(err.to_string().contains("config_depth_mode"));
        assert_eq!(store.native_calls(), 1);
    }
}

#[test]
fn set_failure_reports_code_and_name_and_keeps_old_value() {
    let mut store = MemoryConfig::new();
    store.insert("config_enable_depth", Value::Bool(true));
    store.fail_set("config_enable_depth", ErrorCode::NoCameraPermission.raw());

    let err = set_entry::<keys::EnableDepth, _>(&mut store, &false).expect_err("set fails");
    assert_eq!(
        err.condition(),
        ErrorCondition::tango(ErrorCode::NoCameraPermission)
    );
    assert_eq!(
        err.context(),
        "Failed to set configuration parameter 'config_enable_depth'"
    );
    assert_eq!(store.value("config_enable_depth"), Some(&Value::Bool(true)));
}

#[test]
fn missing_or_mistyped_values_fail_as_invalid() {
    let mut store = MemoryConfig::new();
    store.insert("config_color_iso", Value::String("100".to_string()));

    let err = get::<i32, _>(&store, "config_color_iso").expect_err("mistyped");
    assert!(err.is(ErrorCode::Invalid));
    let err = get::<bool, _>(&store, "config_missing").expect_err("missing");
    assert!(err.is(ErrorCode::Invalid));
}

#[test]
fn long_strings_are_truncated_without_error() {
    let mut store = MemoryConfig::new();
    let long = "x".repeat(MAX_STRING_LEN + 1000);
    store.insert("config_load_area_description_UUID", Value::String(long));

    let value = get_entry::<keys::LoadAreaDescriptionUuid, _>(&store).expect("truncated read");
    assert_eq!(value.len(), MAX_STRING_LEN);
    assert!(value.bytes().all(|byte| byte == b'x'));
}

#[test]
fn strings_at_the_limit_are_kept_whole() {
    let mut store = MemoryConfig::new();
    let exact = "y".repeat(MAX_STRING_LEN);
    set(&mut store, "custom", exact.as_str()).expect("set");
    assert_eq!(get::<String, _>(&store, "custom").expect("get"), exact);
}

#[test]
fn strings_with_interior_nul_are_rejected() {
    let mut store = MemoryConfig::new();
    let err = set(&mut store, "custom", "a\0b").expect_err("nul");
    assert!(err.is(ErrorCode::Invalid));
    assert_eq!(store.value("custom"), None);
}

#[test]
fn to_string_dumps_or_fails_without_status() {
    let mut store = MemoryConfig::new();
    set_entry::<keys::DepthMode, _>(&mut store, &3).expect("set");
    assert_eq!(to_string(&store).expect("dump"), "config_depth_mode=3\n");

    store.fail_to_string();
    let err = to_string(&store).expect_err("dump fails");
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(err.status().is_none());
}
