use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::error::{Result, RetrievalError};

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/142.0.0.0 Safari/537.36";

/// Site the media CDN expects requests to come from.
pub const DEFAULT_ORIGIN: &str = "https://www.loom.com";

/// Size cap shared by the HLS path and whole-file downloads.
pub const DEFAULT_MAX_TOTAL_BYTES: u64 = 20 * 1024 * 1024;

pub const DEFAULT_MAX_SEGMENTS: usize = 5;

/// Limits applied to a single retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadBudget {
    /// Number of leading segments fetched from a media manifest
    pub max_segments: usize,
    /// Largest accepted payload, inclusive
    pub max_total_bytes: u64,
}

impl Default for DownloadBudget {
    fn default() -> Self {
        Self {
            max_segments: DEFAULT_MAX_SEGMENTS,
            max_total_bytes: DEFAULT_MAX_TOTAL_BYTES,
        }
    }
}

impl DownloadBudget {
    pub fn ensure_within(&self, size: u64) -> Result<()> {
        if size > self.max_total_bytes {
            return Err(RetrievalError::PayloadTooLarge {
                size,
                limit: self.max_total_bytes,
            });
        }
        Ok(())
    }
}

/// Inclusive bandwidth window a variant must fall into to be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandwidthRange {
    pub min: u64,
    pub max: u64,
}

impl Default for BandwidthRange {
    fn default() -> Self {
        Self {
            min: 100_000,
            max: 1_500_000,
        }
    }
}

impl BandwidthRange {
    pub fn contains(&self, bandwidth: u64) -> bool {
        (self.min..=self.max).contains(&bandwidth)
    }
}

/// Configurable options for a retrieval
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string sent with every request
    pub user_agent: String,

    /// Value of the `Origin` header; `Referer` is derived from it
    pub origin: String,

    /// Extra headers, merged over the browser defaults
    pub headers: HeaderMap,

    /// Connection timeout; `None` keeps the transport default
    pub connect_timeout: Option<Duration>,

    /// Overall request timeout; `None` keeps the transport default
    pub timeout: Option<Duration>,

    /// Whether to follow redirects
    pub follow_redirects: bool,

    pub budget: DownloadBudget,

    pub bandwidth: BandwidthRange,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            origin: DEFAULT_ORIGIN.to_owned(),
            headers: HeaderMap::new(),
            connect_timeout: None,
            timeout: None,
            follow_redirects: true,
            budget: DownloadBudget::default(),
            bandwidth: BandwidthRange::default(),
        }
    }
}

impl FetchConfig {
    pub fn builder() -> FetchConfigBuilder {
        FetchConfigBuilder::new()
    }

    /// Headers that make requests look like they come from a desktop browser
    /// viewing the hosting site. The CDN refuses manifests and segments without them.
    pub fn browser_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(reqwest::header::ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(reqwest::header::USER_AGENT, header_value(&self.user_agent)?);
        headers.insert(reqwest::header::ORIGIN, header_value(&self.origin)?);
        let referer = format!("{}/", self.origin.trim_end_matches('/'));
        headers.insert(reqwest::header::REFERER, header_value(&referer)?);

        for (name, value) in self.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }
        Ok(headers)
    }

    pub fn build_client(&self) -> Result<Client> {
        let mut builder = Client::builder().default_headers(self.browser_headers()?);

        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if !self.follow_redirects {
            builder = builder.redirect(reqwest::redirect::Policy::none());
        }

        builder.build().map_err(|e| RetrievalError::Configuration {
            reason: format!("failed to build HTTP client: {e}"),
        })
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| RetrievalError::Configuration {
        reason: format!("invalid header value `{value}`: {e}"),
    })
}

/// Builder for [`FetchConfig`]
#[derive(Debug, Default)]
pub struct FetchConfigBuilder {
    config: FetchConfig,
}

impl FetchConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.config.origin = origin.into();
        self
    }

    /// Adds a header; names or values that are not valid HTTP are skipped.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.config.headers.insert(name, value);
        }
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.config.follow_redirects = follow;
        self
    }

    pub fn max_segments(mut self, max_segments: usize) -> Self {
        self.config.budget.max_segments = max_segments;
        self
    }

    pub fn max_total_bytes(mut self, max_total_bytes: u64) -> Self {
        self.config.budget.max_total_bytes = max_total_bytes;
        self
    }

    pub fn bandwidth(mut self, min: u64, max: u64) -> Self {
        self.config.bandwidth = BandwidthRange { min, max };
        self
    }

    pub fn build(self) -> FetchConfig {
        self.config
    }
}
