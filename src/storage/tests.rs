use super::*;
use crate::core::is_error;
use httpmock::prelude::*;
use serde_json::json;
use std::io::Write;

fn create_storage(base_url: String) -> FirebaseStorage {
    let config = Configuration::new(
        json!({ "projectId": "test-project" }),
        json!({ "project_id": "test-project" }),
        "https://test-project.firebaseio.com",
        "test-bucket",
    )
    .unwrap()
    .with_base_url(base_url);
    FirebaseStorage::new(&config)
}

#[tokio::test]
async fn test_upload_byte8_array() {
    let server = MockServer::start();
    let storage = create_storage(server.url(""));

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/uploadByte8Array")
            .header("storagebucket", "test-bucket")
            .json_body(json!({
                "path": "test-file.txt",
                "imageBase64": "SGVsbG8sIFdvcmxkIQ=="
            }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({ "path": "test-file.txt" }));
    });

    let result = storage
        .upload_byte8_array("test-file.txt", "SGVsbG8sIFdvcmxkIQ==")
        .await;
    assert_eq!(result, json!({ "path": "test-file.txt" }));

    mock.assert();
}

#[tokio::test]
async fn test_upload_bytes_encodes_base64() {
    let server = MockServer::start();
    let storage = create_storage(server.url(""));

    let mock = server.mock(|when, then| {
        when.method(POST).path("/uploadByte8Array").json_body(json!({
            "path": "test-file.txt",
            "imageBase64": "SGVsbG8sIFdvcmxkIQ=="
        }));
        then.status(200).json_body(json!({ "ok": true }));
    });

    let result = storage.upload_bytes("test-file.txt", b"Hello, World!").await;
    assert_eq!(result, json!({ "ok": true }));

    mock.assert();
}

#[tokio::test]
async fn test_upload_file() {
    let server = MockServer::start();
    let storage = create_storage(server.url(""));

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("hello.txt");
    std::fs::File::create(&file_path)
        .unwrap()
        .write_all(b"Hello, World!")
        .unwrap();

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/uploadFile")
            .header("storagebucket", "test-bucket")
            .body_includes("name=\"path\"")
            .body_includes("uploads/hello.txt")
            .body_includes("name=\"file\"; filename=\"hello.txt\"")
            .body_includes("Hello, World!");
        then.status(200).json_body(json!({ "uploaded": true }));
    });

    let result = storage
        .upload_file(&file_path, "uploads/hello.txt")
        .await
        .unwrap();
    assert_eq!(result, json!({ "uploaded": true }));

    mock.assert();
}

#[tokio::test]
async fn test_upload_file_missing_local_file() {
    let storage = create_storage("http://127.0.0.1:1".to_string());

    let result = storage
        .upload_file("/definitely/not/here.png", "uploads/here.png")
        .await;

    assert!(matches!(result, Err(StorageError::Io { .. })));
}

#[tokio::test]
async fn test_upload_file_failure_is_returned_as_value() {
    let storage = create_storage("http://127.0.0.1:1".to_string());

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"content").unwrap();

    let result = storage
        .upload_file(file.path(), "uploads/content.bin")
        .await
        .unwrap();
    assert!(is_error(&result));
}

#[tokio::test]
async fn test_get_download_url() {
    let server = MockServer::start();
    let storage = create_storage(server.url(""));

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/getDownloadURL")
            .json_body(json!({ "path": "test-file.txt" }));
        then.status(200).json_body(json!({
            "url": "https://storage.example.com/test-bucket/test-file.txt?token=abc"
        }));
    });

    let result = storage.get_download_url("test-file.txt").await;
    assert_eq!(
        result["url"],
        "https://storage.example.com/test-bucket/test-file.txt?token=abc"
    );

    mock.assert();
}

#[tokio::test]
async fn test_delete_file() {
    let server = MockServer::start();
    let storage = create_storage(server.url(""));

    let mock = server.mock(|when, then| {
        when.method(DELETE)
            .path("/deleteFile")
            .json_body(json!({ "path": "test-file.txt" }));
        then.status(200).json_body(json!({ "deleted": true }));
    });

    let result = storage.delete_file("test-file.txt").await;
    assert_eq!(result, json!({ "deleted": true }));

    mock.assert();
}

#[tokio::test]
async fn test_unreachable_backend_never_raises() {
    let storage = create_storage("http://127.0.0.1:1".to_string());
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"content").unwrap();

    let results = vec![
        storage.upload_byte8_array("a.txt", "YQ==").await,
        storage.upload_bytes("a.txt", b"a").await,
        storage.get_download_url("a.txt").await,
        storage.delete_file("a.txt").await,
        storage.upload_file(file.path(), "a.txt").await.unwrap(),
    ];

    for result in results {
        assert!(is_error(&result));
        assert_eq!(result.as_object().unwrap().len(), 1);
    }
}
