use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, RetrievalError>;

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("invalid URL `{input}`: {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("no resolver could map `{url}` to a manifest or media URL")]
    UnresolvedSource { url: String },

    #[error("HTTP request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request failed with HTTP {status} for {url}")]
    HttpStatus { status: StatusCode, url: String },

    #[error("malformed manifest: {reason}")]
    MalformedManifest { reason: String },

    #[error("no variant with bandwidth in [{min}, {max}] bits/s")]
    NoSuitableVariant { min: u64, max: u64 },

    #[error("segment download failed for {url}: {source}")]
    SegmentDownload {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: u64, limit: u64 },

    #[error("configuration error: {reason}")]
    Configuration { reason: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl RetrievalError {
    pub fn invalid_url(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    pub fn http_status(status: StatusCode, url: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            url: url.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedManifest {
            reason: reason.into(),
        }
    }

    pub fn segment_download(url: impl Into<String>, source: RetrievalError) -> Self {
        Self::SegmentDownload {
            url: url.into(),
            source: Box::new(source),
        }
    }

    /// Transport failures and non-success statuses.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::HttpStatus { .. })
    }

    /// URL of the segment that aborted the download, if any.
    pub fn failed_segment(&self) -> Option<&str> {
        match self {
            Self::SegmentDownload { url, .. } => Some(url),
            _ => None,
        }
    }
}
