//! Cloud Storage for Firebase module.
//!
//! Uploads, download URLs and deletions for objects in the bucket named by the
//! [`Configuration`]. Uploads can be sent either as base64 text or as a multipart file.
//!
//! # Examples
//!
//! ```rust,no_run
//! # use databridge::DataBridge;
//! # async fn run(app: DataBridge) -> Result<(), databridge::storage::StorageError> {
//! let storage = app.storage();
//!
//! let _ = storage.upload_bytes("greetings/hello.txt", b"Hello, World!").await;
//! let _ = storage.upload_file("./avatar.png", "avatars/alice.png").await?;
//! let url = storage.get_download_url("avatars/alice.png").await;
//! # Ok(())
//! # }
//! ```

use crate::config::Configuration;
use crate::core::{Dispatcher, FilePart, Method};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncReadExt;

#[cfg(test)]
mod tests;

/// Errors raised before a Storage request is sent.
///
/// Remote failures are not reported here; they come back as `{"error": "..."}` values.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The local file to upload could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Client for the bridge backend's Storage endpoints.
#[derive(Clone)]
pub struct FirebaseStorage {
    config: Configuration,
    dispatcher: Dispatcher,
}

impl FirebaseStorage {
    /// Creates a new `FirebaseStorage` instance.
    ///
    /// This is typically called via `DataBridge::storage()`.
    pub fn new(config: &Configuration) -> Self {
        Self {
            config: config.clone(),
            dispatcher: Dispatcher::new(config),
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        self.dispatcher.base_url()
    }

    /// Uploads base64-encoded content to `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - The object path within the bucket (e.g. "images/profile.png").
    /// * `image_base64` - The content, base64-encoded.
    pub async fn upload_byte8_array(&self, path: &str, image_base64: &str) -> Value {
        let body = json!({ "path": path, "imageBase64": image_base64 });
        self.dispatcher
            .send(Method::Post, "uploadByte8Array", Some(body), None, None)
            .await
    }

    /// Base64-encodes `content` and uploads it with [`FirebaseStorage::upload_byte8_array`].
    pub async fn upload_bytes(&self, path: &str, content: &[u8]) -> Value {
        self.upload_byte8_array(path, &STANDARD.encode(content)).await
    }

    /// Uploads the local file at `file_path` to `path` as a multipart form.
    ///
    /// The file is attached under the form field `file`. Failing to read it is an error;
    /// anything that goes wrong afterwards is reported in the returned value.
    pub async fn upload_file(
        &self,
        file_path: impl AsRef<Path>,
        path: &str,
    ) -> Result<Value, StorageError> {
        let file_path = file_path.as_ref();
        let content = read_file(file_path).await?;
        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());

        let files = vec![FilePart::new("file", file_name, content)];
        Ok(self
            .dispatcher
            .send(
                Method::Post,
                "uploadFile",
                Some(json!({ "path": path })),
                None,
                Some(files),
            )
            .await)
    }

    /// Asks the backend for a download URL for the object at `path`.
    pub async fn get_download_url(&self, path: &str) -> Value {
        self.dispatcher
            .send(Method::Post, "getDownloadURL", Some(json!({ "path": path })), None, None)
            .await
    }

    /// Deletes the object at `path`.
    pub async fn delete_file(&self, path: &str) -> Value {
        self.dispatcher
            .send(Method::Delete, "deleteFile", Some(json!({ "path": path })), None, None)
            .await
    }
}

// The handle is closed when this returns, before the upload starts.
async fn read_file(path: &Path) -> Result<Vec<u8>, StorageError> {
    let io_error = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::File::open(path).await.map_err(io_error)?;
    let mut content = Vec::new();
    file.read_to_end(&mut content).await.map_err(io_error)?;
    Ok(content)
}
