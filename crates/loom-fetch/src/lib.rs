//! Bounded media retrieval for accent analysis.
//!
//! A signed HLS master playlist is narrowed to one low-bitrate variant, the first few
//! transport stream segments of that variant are fetched in order, and the result is
//! concatenated into a single buffer under a hard size cap. Direct media links and
//! uploads bypass the playlist path but share the same cap.
//!
//! ```no_run
//! # async fn run() -> loom_fetch::Result<()> {
//! use loom_fetch::{AnalysisRequest, FetchConfig, Retriever};
//!
//! let retriever = Retriever::new(FetchConfig::default())?;
//! let payload = retriever
//!     .retrieve("https://cdn.example/abc/playlist.m3u8?Policy=p&Signature=s")
//!     .await?;
//! let body = AnalysisRequest::accent(&payload);
//! # let _ = body;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod hls;
pub mod payload;
pub mod retriever;
pub mod source;

pub use config::{BandwidthRange, DownloadBudget, FetchConfig, FetchConfigBuilder};
pub use error::{Result, RetrievalError};
pub use payload::{AnalysisRequest, InlineData, MediaMime, MediaPayload};
pub use retriever::Retriever;
pub use source::{DirectSourceResolver, MediaSource, SourceResolver};
