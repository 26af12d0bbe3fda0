use gosub_webstorage::{create_local_storage, create_session_storage, Storage, StorageOptions, StorageValue};
use serde_json::json;

struct Area {
    kind: &'static str,
    storage: Storage,
    _dir: Option<tempfile::TempDir>,
}

fn areas() -> Vec<Area> {
    let _ = env_logger::builder().is_test(true).try_init();

    let dir = tempfile::tempdir().expect("temp dir");
    let db_file = dir.path().join(format!("{}.sqlite", uuid::Uuid::new_v4()));

    let (local, _) = create_local_storage(db_file.as_path(), StorageOptions::default()).expect("local storage");
    let (session, _) = create_session_storage(StorageOptions::default()).expect("session storage");

    vec![
        Area {
            kind: "localStorage",
            storage: local,
            _dir: Some(dir),
        },
        Area {
            kind: "sessionStorage",
            storage: session,
            _dir: None,
        },
    ]
}

#[test]
fn clear_removes_items() {
    for Area { kind, storage, _dir } in areas() {
        storage.set_item("demo", "Hello, world!").unwrap();
        storage.clear().unwrap();

        assert_eq!(storage.get_item("demo").unwrap(), None, "{kind}");
        assert_eq!(storage.length().unwrap(), 0, "{kind}");
        assert_eq!(storage.key(0).unwrap(), None, "{kind}");
    }
}

#[test]
fn clear_on_empty_area_is_fine() {
    for Area { kind, storage, _dir } in areas() {
        storage.clear().unwrap();
        storage.clear().unwrap();
        assert_eq!(storage.length().unwrap(), 0, "{kind}");
        assert_eq!(storage.usage(), 0, "{kind}");
    }
}

#[test]
fn key_lookups() {
    for Area { kind, storage, _dir } in areas() {
        storage.set_item("demo", "Hello, world!").unwrap();

        assert_eq!(storage.key(0).unwrap().as_deref(), Some("demo"), "{kind}: valid index");
        assert_eq!(storage.key(1).unwrap(), None, "{kind}: invalid index");
        assert_eq!(storage.key(0.1).unwrap().as_deref(), Some("demo"), "{kind}: valid fraction");
        assert_eq!(storage.key(1.1).unwrap(), None, "{kind}: invalid fraction");
        assert_eq!(storage.key(-1).unwrap(), None, "{kind}: negative index");
    }
}

#[test]
fn key_follows_insertion_order_not_updates() {
    for Area { kind, storage, _dir } in areas() {
        storage.set_item("first", "1").unwrap();
        storage.set_item("second", "2").unwrap();
        storage.set_item("third", "3").unwrap();
        storage.set_item("first", "updated").unwrap();

        let keys: Vec<_> = (0..3).map(|i| storage.key(i).unwrap().unwrap()).collect();
        assert_eq!(keys, ["first", "second", "third"], "{kind}");

        storage.remove_item("second").unwrap();
        assert_eq!(storage.key(1).unwrap().as_deref(), Some("third"), "{kind}");
        assert_eq!(storage.key(2).unwrap(), None, "{kind}");
    }
}

#[test]
fn length_counts_items() {
    for Area { kind, storage, _dir } in areas() {
        storage.set_item("demo", "Hello, world!").unwrap();
        assert_eq!(storage.length().unwrap(), 1, "{kind}");

        storage.clear().unwrap();
        assert_eq!(storage.length().unwrap(), 0, "{kind}");
    }
}

#[test]
fn remove_item() {
    for Area { kind, storage, _dir } in areas() {
        storage.set_item("demo", "Hello, world!").unwrap();
        storage.remove_item("demo").unwrap();
        assert_eq!(storage.get_item("demo").unwrap(), None, "{kind}");
    }
}

#[test]
fn set_and_get_coerce_values() {
    let cases: Vec<(StorageValue, &str)> = vec![
        ("Hello, world!".into(), "Hello, world!"),
        (1.into(), "1"),
        (true.into(), "true"),
        (StorageValue::Null, "null"),
        (json!({}).into(), "[object Object]"),
        (StorageValue::Undefined, "undefined"),
        (1_i128.into(), "1"),
        (StorageValue::Symbol(Some("foo".into())), "Symbol(foo)"),
        (u64::MAX.into(), "18446744073709551615"),
        (i64::MIN.into(), "-9223372036854775808"),
        (9_007_199_254_740_993_i64.into(), "9007199254740993"),
        (1e21.into(), "1e+21"),
        (1e-7.into(), "1e-7"),
        (0.1_f32.into(), "0.1"),
    ];

    for Area { kind, storage, _dir } in areas() {
        for (input, expected) in &cases {
            storage.set_item("demo", input.clone()).unwrap();
            assert_eq!(storage.get_item("demo").unwrap().as_deref(), Some(*expected), "{kind}: {input:?}");
        }
    }
}

#[test]
fn round_trip_unicode() {
    for Area { kind, storage, _dir } in areas() {
        let value = "héllo wörld \u{1F600} 日本語";
        storage.set_item("ключ", value).unwrap();
        assert_eq!(storage.get_item("ключ").unwrap().as_deref(), Some(value), "{kind}");
        assert_eq!(storage.get_item("").unwrap(), None, "{kind}");
    }
}

#[test]
fn arity_is_enforced_for_dynamic_calls() {
    for Area { kind, storage, _dir } in areas() {
        for method in ["getItem", "setItem", "removeItem", "key"] {
            let err = storage.call(method, &[]).unwrap_err();
            assert_eq!(err.name(), "TypeError", "{kind}");
            assert!(err.to_string().contains(method), "{kind}: {err}");
        }
    }
}
