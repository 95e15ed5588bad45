use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::error::{Result, RetrievalError};

/// Where the media for a request lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// HLS master playlist, possibly signed
    Manifest(Url),
    /// A media file fetched whole
    Direct(Url),
}

impl MediaSource {
    pub fn url(&self) -> &Url {
        match self {
            Self::Manifest(url) | Self::Direct(url) => url,
        }
    }
}

/// Maps a user supplied link to a [`MediaSource`].
///
/// Share pages have to be turned into a manifest URL by a platform lookup; that lookup
/// is provided by implementing this trait.
#[async_trait]
pub trait SourceResolver: Send + Sync {
    async fn resolve(&self, input: &str) -> Result<MediaSource>;
}

pub fn parse_url(input: &str) -> Result<Url> {
    let url =
        Url::parse(input.trim()).map_err(|e| RetrievalError::invalid_url(input, e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(RetrievalError::invalid_url(input, format!("unsupported scheme `{scheme}`"))),
    }
}

/// `loom.com/share/<id>` style links.
pub fn is_share_link(url: &Url) -> bool {
    let host = url.host_str().unwrap_or_default();
    let on_loom = host == "loom.com" || host.ends_with(".loom.com");
    on_loom && url.path().starts_with("/share/")
}

pub fn is_manifest_url(url: &Url) -> bool {
    url.path().to_ascii_lowercase().ends_with(".m3u8")
}

/// Classifies links without any network lookup.
///
/// `.m3u8` URLs are manifests, share links are rejected with `UnresolvedSource`,
/// everything else is fetched whole.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectSourceResolver;

#[async_trait]
impl SourceResolver for DirectSourceResolver {
    async fn resolve(&self, input: &str) -> Result<MediaSource> {
        let url = parse_url(input)?;
        let source = if is_manifest_url(&url) {
            MediaSource::Manifest(url)
        } else if is_share_link(&url) {
            return Err(RetrievalError::UnresolvedSource {
                url: url.to_string(),
            });
        } else {
            MediaSource::Direct(url)
        };
        debug!(?source, "Classified source");
        Ok(source)
    }
}
