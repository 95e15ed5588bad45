// Media playlist parsing and segment URL resolution.

use tracing::debug;
use url::Url;

use crate::error::Result;
use crate::hls::auth::AuthContext;
use crate::hls::scanner::{PlaylistEntry, PlaylistScanner};

const TS_EXTENSION: &str = ".ts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRef {
    pub uri: String,
}

impl SegmentRef {
    /// Transport stream segments are recognised by file extension only; entries with
    /// other container extensions are skipped.
    pub fn is_transport_stream(uri: &str) -> bool {
        let path = uri.split(['?', '#']).next().unwrap_or(uri);
        path.len() > TS_EXTENSION.len()
            && path
                .get(path.len() - TS_EXTENSION.len()..)
                .is_some_and(|ext| ext.eq_ignore_ascii_case(TS_EXTENSION))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaManifest {
    pub segments: Vec<SegmentRef>,
}

impl MediaManifest {
    pub fn parse(text: &str) -> Result<Self> {
        let mut segments = Vec::new();
        for entry in PlaylistScanner::new(text) {
            if let PlaylistEntry::Uri(uri) = entry?
                && SegmentRef::is_transport_stream(uri)
            {
                segments.push(SegmentRef {
                    uri: uri.to_string(),
                });
            }
        }
        debug!(segments = segments.len(), "Parsed media playlist");
        Ok(Self { segments })
    }
}

/// Turns a media playlist into the ordered list of fetchable segment URLs.
#[derive(Debug, Clone, Default)]
pub struct SegmentUrlResolver {
    auth: AuthContext,
}

impl SegmentUrlResolver {
    pub fn new(auth: AuthContext) -> Self {
        Self { auth }
    }

    /// Every segment of the playlist, in playlist order. No budget is applied here.
    pub fn resolve(&self, text: &str, variant_url: &Url) -> Result<Vec<Url>> {
        MediaManifest::parse(text)?
            .segments
            .iter()
            .map(|segment| self.auth.resolve(variant_url, &segment.uri))
            .collect()
    }
}
