// Bounded, strictly sequential segment download.

use bytes::Bytes;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::DownloadBudget;
use crate::error::{Result, RetrievalError};
use crate::hls::fetcher::HttpFetch;

pub struct SegmentDownloader<'a, F: HttpFetch + ?Sized> {
    fetcher: &'a F,
}

impl<'a, F: HttpFetch + ?Sized> SegmentDownloader<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Self { fetcher }
    }

    /// Fetches the first `budget.max_segments` URLs one after another, in list order.
    ///
    /// The first failing segment aborts the whole download; nothing fetched before it
    /// is returned and nothing after it is requested. Each segment is capped to what is
    /// left of `budget.max_total_bytes`, so an oversized one is dropped mid-stream.
    #[instrument(skip_all, fields(available = segments.len(), max = budget.max_segments))]
    pub async fn download_prefix(
        &self,
        segments: &[Url],
        budget: &DownloadBudget,
    ) -> Result<Vec<Bytes>> {
        let take = budget.max_segments.min(segments.len());
        let limit = budget.max_total_bytes;
        let mut chunks = Vec::with_capacity(take);
        let mut total = 0u64;

        for (index, url) in segments.iter().take(take).enumerate() {
            let remaining = limit.saturating_sub(total);
            let chunk = match self.fetcher.fetch_capped(url, remaining).await {
                Ok(chunk) => chunk,
                Err(RetrievalError::PayloadTooLarge { size, .. }) => {
                    let size = total + size;
                    warn!(index, size, limit, "Segments exceed the size budget");
                    return Err(RetrievalError::PayloadTooLarge { size, limit });
                }
                Err(e) => return Err(RetrievalError::segment_download(url.as_str(), e)),
            };
            total += chunk.len() as u64;
            debug!(index, bytes = chunk.len(), total, "Fetched segment");
            chunks.push(chunk);
        }

        Ok(chunks)
    }
}
