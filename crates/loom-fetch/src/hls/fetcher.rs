// HTTP access for manifests, segments and whole media files.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use reqwest::{Client, Response};
use tracing::{debug, trace, warn};
use url::Url;

use crate::config::FetchConfig;
use crate::error::{Result, RetrievalError};

/// Single GET requests against the media host. No retries.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn fetch_bytes(&self, url: &Url) -> Result<Bytes>;

    /// Fetches a manifest as text.
    async fn fetch_text(&self, url: &Url) -> Result<String> {
        let body = self.fetch_bytes(url).await?;
        String::from_utf8(body.to_vec()).map_err(|e| {
            RetrievalError::malformed(format!("playlist {url} is not valid UTF-8: {e}"))
        })
    }

    /// Fetches a whole file, failing with `PayloadTooLarge` once it grows past `limit`.
    async fn fetch_capped(&self, url: &Url, limit: u64) -> Result<Bytes> {
        let body = self.fetch_bytes(url).await?;
        let size = body.len() as u64;
        if size > limit {
            return Err(RetrievalError::PayloadTooLarge { size, limit });
        }
        Ok(body)
    }
}

/// [`HttpFetch`] over a `reqwest` client carrying the browser headers.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        Ok(Self::with_client(config.build_client()?))
    }

    /// Wraps an existing client. Its default headers are used as they are.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn get(&self, url: &Url) -> Result<Response> {
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| RetrievalError::network(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::http_status(status, url.as_str()));
        }
        Ok(response)
    }
}

#[async_trait]
impl HttpFetch for HttpFetcher {
    async fn fetch_bytes(&self, url: &Url) -> Result<Bytes> {
        let body = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|e| RetrievalError::network(url.as_str(), e))?;
        trace!(url = %url, bytes = body.len(), "Fetched body");
        Ok(body)
    }

    async fn fetch_capped(&self, url: &Url, limit: u64) -> Result<Bytes> {
        let response = self.get(url).await?;

        if let Some(size) = response.content_length()
            && size > limit
        {
            warn!(url = %url, size, limit, "Declared content length exceeds budget");
            return Err(RetrievalError::PayloadTooLarge { size, limit });
        }

        let mut body = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| RetrievalError::network(url.as_str(), e))?;
            body.extend_from_slice(&chunk);

            let size = body.len() as u64;
            if size > limit {
                warn!(url = %url, size, limit, "Download exceeded budget, aborting");
                return Err(RetrievalError::PayloadTooLarge { size, limit });
            }
        }
        Ok(body.freeze())
    }
}
