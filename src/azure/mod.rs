//! Azure Blob Storage module.
//!
//! [`BlobStorage`] manages the blobs of a single container. Constructing it creates the container
//! if needed; an already existing container only produces a warning. The remote calls themselves
//! go through a [`BlobBackend`], normally the Azure SDK backed [`AzureBackend`].
//!
//! # Examples
//!
//! ```rust,no_run
//! # use databridge::azure::{BlobError, BlobStorage};
//! # async fn run() -> Result<(), BlobError> {
//! let storage = BlobStorage::connect(
//!     "reports",
//!     "DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=a2V5;EndpointSuffix=core.windows.net",
//! )
//! .await?;
//!
//! storage.create_file(b"hello".to_vec(), "hello.txt").await?;
//! assert!(storage.contains("hello.txt").await?);
//! let first = storage.get(0).await?;
//! # Ok(())
//! # }
//! ```

pub mod backend;


pub use backend::AzureBackend;

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur during Blob Storage operations.
#[derive(Error, Debug)]
pub enum BlobError {
    /// Wrapper for errors returned by the Azure SDK.
    #[error("Azure error: {0}")]
    Azure(#[from] azure_core::Error),
    /// The container already exists.
    #[error("Container already exists: {0}")]
    ContainerExists(String),
    /// The connection string could not be turned into credentials.
    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),
    /// A blob index outside of the current listing.
    #[error("Index out of range: {index} (container holds {len} blobs)")]
    IndexOutOfRange { index: usize, len: usize },
}

pub type BlobResult<T> = Result<T, BlobError>;

/// Container and blob operations of a blob storage account.
#[async_trait]
pub trait BlobBackend: Send + Sync {
    /// Creates `container`. Fails with [`BlobError::ContainerExists`] if it is already there.
    async fn create_container(&self, container: &str) -> BlobResult<()>;

    /// Writes `data` to `name`, replacing any existing blob.
    async fn put_blob(&self, container: &str, name: &str, data: Bytes) -> BlobResult<()>;

    /// Lists the names of every blob in `container`, in the order the service returns them.
    async fn list_blob_names(&self, container: &str) -> BlobResult<Vec<String>>;

    async fn get_blob(&self, container: &str, name: &str) -> BlobResult<Bytes>;

    /// Deletes `container` together with all of its blobs.
    async fn delete_container(&self, container: &str) -> BlobResult<()>;
}

/// Client for the blobs of one container.
///
/// The container is a remote resource: dropping the client leaves it in place, and
/// [`BlobStorage::delete_container`] removes it for every client.
#[derive(Clone)]
pub struct BlobStorage {
    container_name: String,
    backend: Arc<dyn BlobBackend>,
}

impl BlobStorage {
    /// Connects to the account described by `connection_string` and ensures `container_name`
    /// exists.
    pub async fn connect(
        container_name: impl Into<String>,
        connection_string: &str,
    ) -> BlobResult<Self> {
        let backend = AzureBackend::from_connection_string(connection_string)?;
        Self::with_backend(container_name, Arc::new(backend)).await
    }

    /// Creates a client over an arbitrary backend and ensures `container_name` exists.
    pub async fn with_backend(
        container_name: impl Into<String>,
        backend: Arc<dyn BlobBackend>,
    ) -> BlobResult<Self> {
        let container_name = container_name.into();

        match backend.create_container(&container_name).await {
            Ok(()) => debug!(container = %container_name, "Created blob container"),
            Err(BlobError::ContainerExists(_)) => {
                warn!(container = %container_name, "Container already exists")
            }
            Err(e) => return Err(e),
        }

        Ok(Self {
            container_name,
            backend,
        })
    }

    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    /// Uploads `data` as `name`, overwriting any blob of the same name.
    pub async fn create_file(&self, data: impl Into<Bytes>, name: &str) -> BlobResult<()> {
        self.backend
            .put_blob(&self.container_name, name, data.into())
            .await
    }

    /// Lists the names of all blobs in the container.
    pub async fn find_files(&self) -> BlobResult<Vec<String>> {
        self.backend.list_blob_names(&self.container_name).await
    }

    /// Downloads the full content of `name`.
    pub async fn download_file(&self, name: &str) -> BlobResult<Bytes> {
        self.backend.get_blob(&self.container_name, name).await
    }

    /// Deletes the container and every blob in it. This cannot be undone.
    pub async fn delete_container(&self) -> BlobResult<()> {
        self.backend.delete_container(&self.container_name).await
    }

    /// Number of blobs in the container.
    pub async fn len(&self) -> BlobResult<usize> {
        Ok(self.find_files().await?.len())
    }

    pub async fn is_empty(&self) -> BlobResult<bool> {
        Ok(self.len().await? == 0)
    }

    /// Name of the blob at `index` in the listing returned by [`BlobStorage::find_files`].
    pub async fn get(&self, index: usize) -> BlobResult<String> {
        let mut names = self.find_files().await?;
        let len = names.len();
        if index < len {
            Ok(names.swap_remove(index))
        } else {
            Err(BlobError::IndexOutOfRange { index, len })
        }
    }

    /// Returns `true` if a blob called `name` exists in the container.
    pub async fn contains(&self, name: &str) -> BlobResult<bool> {
        Ok(self.find_files().await?.iter().any(|n| n == name))
    }
}

impl fmt::Debug for BlobStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobStorage")
            .field("container_name", &self.container_name)
            .finish()
    }
}

impl fmt::Display for BlobStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AzureStorage: Container '{}'", self.container_name)
    }
}
