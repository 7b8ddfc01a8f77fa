//! Azure Blob Storage backend built on the Azure SDK.

use super::{BlobBackend, BlobError, BlobResult};
use async_trait::async_trait;
use azure_storage::{CloudLocation, ConnectionString};
use azure_storage_blobs::prelude::*;
use bytes::Bytes;
use futures::StreamExt;
use tracing::debug;

/// [`BlobBackend`] talking to a storage account through `azure_storage_blobs`.
#[derive(Clone)]
pub struct AzureBackend {
    builder: ClientBuilder,
}

impl AzureBackend {
    /// Builds a backend from an Azure Storage connection string.
    ///
    /// A `BlobEndpoint` entry (as used by the Azurite emulator) takes precedence over the
    /// account's public endpoint.
    pub fn from_connection_string(connection_string: &str) -> BlobResult<Self> {
        let parsed = ConnectionString::new(connection_string)?;

        if parsed.use_development_storage == Some(true) {
            return Ok(Self {
                builder: ClientBuilder::emulator(),
            });
        }

        let account = parsed.account_name.ok_or_else(|| {
            BlobError::InvalidConnectionString("AccountName is missing".to_string())
        })?;
        let credentials = parsed.storage_credentials()?;

        let builder = match parsed.blob_endpoint {
            Some(uri) => ClientBuilder::with_location(
                CloudLocation::Custom {
                    account: account.to_string(),
                    uri: uri.to_string(),
                },
                credentials,
            ),
            None => ClientBuilder::new(account, credentials),
        };

        debug!(account = %account, "Created Azure blob backend");

        Ok(Self { builder })
    }

    fn container_client(&self, container: &str) -> ContainerClient {
        self.builder.clone().container_client(container)
    }
}

fn is_container_exists(error: &azure_core::Error) -> bool {
    error
        .as_http_error()
        .and_then(|e| e.error_code())
        .map(|code| code == "ContainerAlreadyExists")
        .unwrap_or(false)
}

#[async_trait]
impl BlobBackend for AzureBackend {
    async fn create_container(&self, container: &str) -> BlobResult<()> {
        match self.container_client(container).create().await {
            Ok(_) => Ok(()),
            Err(e) if is_container_exists(&e) => {
                Err(BlobError::ContainerExists(container.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn put_blob(&self, container: &str, name: &str, data: Bytes) -> BlobResult<()> {
        // Put Blob replaces an existing block blob of the same name.
        self.container_client(container)
            .blob_client(name)
            .put_block_blob(data)
            .await?;
        Ok(())
    }

    async fn list_blob_names(&self, container: &str) -> BlobResult<Vec<String>> {
        let mut pages = self.container_client(container).list_blobs().into_stream();
        let mut names = Vec::new();

        while let Some(page) = pages.next().await {
            let page = page?;
            names.extend(page.blobs.blobs().map(|blob| blob.name.clone()));
        }

        Ok(names)
    }

    async fn get_blob(&self, container: &str, name: &str) -> BlobResult<Bytes> {
        let content = self
            .container_client(container)
            .blob_client(name)
            .get_content()
            .await?;
        Ok(Bytes::from(content))
    }

    async fn delete_container(&self, container: &str) -> BlobResult<()> {
        self.container_client(container).delete().await?;
        Ok(())
    }
}
