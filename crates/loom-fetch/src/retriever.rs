// Retrieval pipeline: source → master playlist → variant playlist → segments → buffer.

use std::path::Path;

use bytes::Bytes;
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::FetchConfig;
use crate::error::Result;
use crate::hls::{
    AuthContext, HttpFetch, HttpFetcher, SegmentDownloader, SegmentUrlResolver, StreamAssembler,
    VariantSelector,
};
use crate::payload::{MediaMime, MediaPayload};
use crate::source::{DirectSourceResolver, MediaSource, SourceResolver};

/// Runs one retrieval at a time; every call builds its own state.
pub struct Retriever<F = HttpFetcher, R = DirectSourceResolver> {
    fetcher: F,
    resolver: R,
    config: FetchConfig,
}

impl Retriever {
    pub fn new(config: FetchConfig) -> Result<Self> {
        Ok(Self {
            fetcher: HttpFetcher::new(&config)?,
            resolver: DirectSourceResolver,
            config,
        })
    }
}

impl<F: HttpFetch, R: SourceResolver> Retriever<F, R> {
    pub fn with_parts(fetcher: F, resolver: R, config: FetchConfig) -> Self {
        Self {
            fetcher,
            resolver,
            config,
        }
    }

    /// Replaces the link classifier, e.g. with a share-link lookup.
    pub fn with_resolver<R2: SourceResolver>(self, resolver: R2) -> Retriever<F, R2> {
        Retriever {
            fetcher: self.fetcher,
            resolver,
            config: self.config,
        }
    }

    /// Resolves `input` and retrieves a bounded sample of its media.
    #[instrument(skip(self))]
    pub async fn retrieve(&self, input: &str) -> Result<MediaPayload> {
        let source = self.resolver.resolve(input).await?;
        debug!(url = %source.url(), "Resolved source");
        match source {
            MediaSource::Manifest(url) => self.retrieve_hls(&url).await,
            MediaSource::Direct(url) => self.retrieve_direct(&url).await,
        }
    }

    /// Downloads the leading segments of the lowest suitable variant of `manifest_url`.
    #[instrument(skip_all, fields(url = %manifest_url))]
    pub async fn retrieve_hls(&self, manifest_url: &Url) -> Result<MediaPayload> {
        let auth = AuthContext::from_url(manifest_url);

        let master = self.fetcher.fetch_text(manifest_url).await?;
        let variant = VariantSelector::new(self.config.bandwidth).select(&master, manifest_url)?;

        let media = self.fetcher.fetch_text(&variant.url).await?;
        let segments = SegmentUrlResolver::new(auth).resolve(&media, &variant.url)?;
        info!(
            segments = segments.len(),
            max_segments = self.config.budget.max_segments,
            "Resolved segment list"
        );

        let chunks = SegmentDownloader::new(&self.fetcher)
            .download_prefix(&segments, &self.config.budget)
            .await?;
        let buffer = StreamAssembler::assemble(chunks, &self.config.budget)?;

        Ok(MediaPayload::new(buffer.into_bytes(), MediaMime::TransportStream))
    }

    /// Fetches a media file whole; aborts once it grows past the size budget.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn retrieve_direct(&self, url: &Url) -> Result<MediaPayload> {
        let data = self
            .fetcher
            .fetch_capped(url, self.config.budget.max_total_bytes)
            .await?;
        info!(bytes = data.len(), "Downloaded media file");
        Ok(MediaPayload::new(data, MediaMime::Mp4))
    }

    /// Accepts media that was uploaded instead of linked.
    pub fn from_upload(&self, data: Bytes, mime: MediaMime) -> Result<MediaPayload> {
        self.config.budget.ensure_within(data.len() as u64)?;
        Ok(MediaPayload::new(data, mime))
    }

    /// Reads a local media file and applies the same size budget.
    pub async fn from_file(&self, path: &Path, mime: MediaMime) -> Result<MediaPayload> {
        let size = tokio::fs::metadata(path).await?.len();
        self.config.budget.ensure_within(size)?;

        let data = tokio::fs::read(path).await?;
        self.from_upload(Bytes::from(data), mime)
    }
}
