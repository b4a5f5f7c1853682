//! Asset fetching for `ADD_IMAGE`.
//!
//! The interpreter only sees the [`AssetSource`] trait; production uses
//! [`HttpAssetSource`], tests plug in a canned source.

use std::time::Duration;

use async_trait::async_trait;

/// An image stored in the designer's asset library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub id: String,
    /// Where the asset was fetched from.
    pub url: String,
    pub content_type: Option<String>,
    pub size_bytes: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("unsupported asset reference: {0}")]
    UnsupportedReference(String),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server responded with status {0}")]
    Status(u16),
}

/// Resolves an asset reference into a stored asset.
#[async_trait]
pub trait AssetSource: Send + Sync {
    async fn fetch(&self, reference: &str) -> Result<Asset, AssetError>;
}

/// Downloads assets over HTTP(S).
pub struct HttpAssetSource {
    client: reqwest::Client,
}

impl HttpAssetSource {
    pub fn new(timeout: Duration) -> Result<Self, AssetError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AssetSource for HttpAssetSource {
    async fn fetch(&self, reference: &str) -> Result<Asset, AssetError> {
        if !(reference.starts_with("http://") || reference.starts_with("https://")) {
            return Err(AssetError::UnsupportedReference(reference.to_string()));
        }

        let response = self.client.get(reference).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AssetError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        tracing::debug!(url = %reference, size = body.len(), "Fetched asset");

        Ok(Asset {
            id: uuid::Uuid::new_v4().simple().to_string(),
            url: reference.to_string(),
            content_type,
            size_bytes: body.len(),
        })
    }
}
