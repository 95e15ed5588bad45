// HLS retrieval: manifest scanning, variant selection, segment resolution and download.

pub mod assembler;
pub mod auth;
pub mod downloader;
pub mod fetcher;
pub mod scanner;
pub mod segments;
pub mod variant;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports for easier access
pub use assembler::{MediaBuffer, StreamAssembler};
pub use auth::AuthContext;
pub use downloader::SegmentDownloader;
pub use fetcher::{HttpFetch, HttpFetcher};
pub use scanner::{PlaylistEntry, PlaylistScanner};
pub use segments::{MediaManifest, SegmentRef, SegmentUrlResolver};
pub use variant::{MasterManifest, SelectedVariant, Variant, VariantSelector};
