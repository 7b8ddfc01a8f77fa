use super::*;
use serde_json::json;
use std::collections::hash_map::DefaultHasher;
use std::io::Write;

fn service_account() -> Value {
    json!({
        "type": "service_account",
        "project_id": "test-project",
        "client_email": "test@test-project.iam.gserviceaccount.com"
    })
}

fn create_config() -> Configuration {
    Configuration::new(
        json!({ "apiKey": "test-key", "projectId": "test-project" }),
        service_account(),
        "https://test-project.firebaseio.com",
        "test-project.appspot.com",
    )
    .unwrap()
}

fn hash_of(config: &Configuration) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn test_produce_headers() {
    let config = create_config();
    let headers = config.produce_headers();

    assert_eq!(headers.len(), 4);
    assert_eq!(
        serde_json::from_str::<Value>(&headers["firebaseconfig"]).unwrap(),
        json!({ "apiKey": "test-key", "projectId": "test-project" })
    );
    assert_eq!(
        serde_json::from_str::<Value>(&headers["serviceaccount"]).unwrap(),
        service_account()
    );
    assert_eq!(headers["databaseurl"], "https://test-project.firebaseio.com");
    assert_eq!(headers["storagebucket"], "test-project.appspot.com");
}

#[test]
fn test_default_base_url() {
    let config = create_config();
    assert_eq!(config.base_url(), DEFAULT_BASE_URL);

    let config = config.with_base_url("http://localhost:8080");
    assert_eq!(config.base_url(), "http://localhost:8080");
}

#[test]
fn test_headers_follow_mutation() {
    let mut config = create_config();
    let before = config.produce_headers();

    config
        .set("firebase_config", json!({ "apiKey": "rotated-key" }))
        .unwrap();
    let after = config.produce_headers();

    assert_ne!(before["firebaseconfig"], after["firebaseconfig"]);
    assert_eq!(
        serde_json::from_str::<Value>(&after["firebaseconfig"]).unwrap(),
        json!({ "apiKey": "rotated-key" })
    );
    assert_eq!(before["databaseurl"], after["databaseurl"]);
}

#[test]
fn test_service_account_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(serde_json::to_string(&service_account()).unwrap().as_bytes())
        .unwrap();

    let from_file = Configuration::new(
        json!({ "apiKey": "test-key", "projectId": "test-project" }),
        file.path(),
        "https://test-project.firebaseio.com",
        "test-project.appspot.com",
    )
    .unwrap();

    // The file is only read while constructing.
    let path = file.path().to_path_buf();
    drop(file);
    assert!(!path.exists());

    assert_eq!(from_file.service_account(), &service_account());
    assert_eq!(from_file.produce_headers(), create_config().produce_headers());
}

#[test]
fn test_service_account_missing_file() {
    let result = Configuration::new(
        json!({}),
        PathBuf::from("/definitely/not/here/service-account.json"),
        "https://test-project.firebaseio.com",
        "test-project.appspot.com",
    );

    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_service_account_invalid_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{ not json").unwrap();

    let result = Configuration::new(json!({}), file.path(), "", "");

    assert!(matches!(result, Err(ConfigError::Json(_))));
}

#[test]
fn test_get_and_set_fields() {
    let mut config = create_config();

    assert_eq!(
        config.get("database_url").unwrap(),
        json!("https://test-project.firebaseio.com")
    );
    assert_eq!(config.get("service_account").unwrap(), service_account());

    config
        .set("storage_bucket", json!("other-bucket.appspot.com"))
        .unwrap();
    assert_eq!(config.storage_bucket(), "other-bucket.appspot.com");
    assert_eq!(
        config.produce_headers()["storagebucket"],
        "other-bucket.appspot.com"
    );
}

#[test]
fn test_unknown_field() {
    let mut config = create_config();

    assert!(matches!(
        config.get("base_url"),
        Err(ConfigError::UnknownField(key)) if key == "base_url"
    ));
    assert!(matches!(
        config.set("project", json!("x")),
        Err(ConfigError::UnknownField(_))
    ));
}

#[test]
fn test_set_string_field_rejects_other_types() {
    let mut config = create_config();

    let result = config.set("database_url", json!(42));

    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue { field: "database_url" })
    ));
    assert_eq!(config.database_url(), "https://test-project.firebaseio.com");
}

#[test]
fn test_len_and_entries() {
    let config = create_config();
    assert_eq!(config.len(), 4);
    assert!(!config.is_empty());

    let keys: Vec<&str> = config.entries().map(|(key, _)| key).collect();
    assert_eq!(keys, FIELDS);
}

#[test]
fn test_equality_ignores_base_url() {
    let a = create_config();
    let b = create_config().with_base_url("http://localhost:1234");

    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));

    let mut c = create_config();
    c.set("database_url", json!("https://other.firebaseio.com"))
        .unwrap();
    assert_ne!(a, c);
}

#[test]
fn test_hash_is_independent_of_key_order() {
    let a = Configuration::new(json!({ "a": 1, "b": 2 }), json!({}), "db", "bucket").unwrap();
    let b = Configuration::new(
        serde_json::from_str(r#"{ "b": 2, "a": 1 }"#).unwrap(),
        json!({}),
        "db",
        "bucket",
    )
    .unwrap();

    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
}

#[test]
fn test_display_renders_headers() {
    let config = create_config();
    let rendered: Value = serde_json::from_str(&config.to_string()).unwrap();

    assert_eq!(rendered["storagebucket"], "test-project.appspot.com");
    assert_eq!(rendered["databaseurl"], "https://test-project.firebaseio.com");
}

#[test]
fn test_headers_escape_non_ascii() {
    let mut config = create_config();
    config
        .set("firebase_config", json!({ "projectName": "Café" }))
        .unwrap();
    config
        .set("service_account", json!({ "note": "😀 \"quoted\"" }))
        .unwrap();

    let headers = config.produce_headers();

    assert_eq!(headers["firebaseconfig"], r#"{"projectName":"Caf\u00e9"}"#);
    assert_eq!(
        headers["serviceaccount"],
        r#"{"note":"\ud83d\ude00 \"quoted\""}"#
    );
    assert!(headers.values().all(|value| value.is_ascii()));
    assert_eq!(
        serde_json::from_str::<Value>(&headers["firebaseconfig"]).unwrap(),
        json!({ "projectName": "Café" })
    );
}
