// Master playlist parsing and bitrate-ladder selection.

use tracing::{debug, info};
use url::Url;

use crate::config::BandwidthRange;
use crate::error::{Result, RetrievalError};
use crate::hls::auth::AuthContext;
use crate::hls::scanner::{PlaylistEntry, PlaylistScanner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Declared peak bandwidth in bits per second
    pub bandwidth: u64,
    /// Variant playlist URI, relative or absolute
    pub uri: String,
}

/// Bitrate ladder of a master playlist, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasterManifest {
    pub variants: Vec<Variant>,
}

impl MasterManifest {
    pub fn parse(text: &str) -> Result<Self> {
        let mut variants = Vec::new();
        for entry in PlaylistScanner::new(text) {
            if let PlaylistEntry::Variant { bandwidth, uri } = entry? {
                variants.push(Variant {
                    bandwidth,
                    uri: uri.to_string(),
                });
            }
        }
        debug!(variants = variants.len(), "Parsed master playlist");
        Ok(Self { variants })
    }
}

/// Variant picked from a master playlist, resolved to a fetchable URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedVariant {
    pub url: Url,
    pub bandwidth: u64,
}

/// Picks the lowest-bandwidth variant inside a bandwidth window.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariantSelector {
    range: BandwidthRange,
}

impl VariantSelector {
    pub fn new(range: BandwidthRange) -> Self {
        Self { range }
    }

    /// Lowest bandwidth inside the window; the first of equal candidates wins.
    pub fn choose<'a>(&self, manifest: &'a MasterManifest) -> Result<&'a Variant> {
        let mut best: Option<&Variant> = None;
        for variant in &manifest.variants {
            if !self.range.contains(variant.bandwidth) {
                continue;
            }
            if best.is_none_or(|current| variant.bandwidth < current.bandwidth) {
                best = Some(variant);
            }
        }

        best.ok_or(RetrievalError::NoSuitableVariant {
            min: self.range.min,
            max: self.range.max,
        })
    }

    /// Parses `text`, chooses a variant and resolves its URI against `manifest_url`.
    ///
    /// A relative variant URI inherits the authorization query of the master playlist.
    pub fn select(&self, text: &str, manifest_url: &Url) -> Result<SelectedVariant> {
        let manifest = MasterManifest::parse(text)?;
        let variant = self.choose(&manifest)?;

        let url = AuthContext::from_url(manifest_url).resolve(manifest_url, &variant.uri)?;
        info!(
            bandwidth = variant.bandwidth,
            uri = %variant.uri,
            candidates = manifest.variants.len(),
            "Selected variant"
        );
        Ok(SelectedVariant {
            url,
            bandwidth: variant.bandwidth,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ladder(bandwidths: &[u64]) -> String {
        let mut text = String::from("#EXTM3U\n#EXT-X-VERSION:3\n");
        for (i, bw) in bandwidths.iter().enumerate() {
            text.push_str(&format!("#EXT-X-STREAM-INF:BANDWIDTH={bw}\nv{i}/playlist.m3u8\n"));
        }
        text
    }

    #[rstest]
    #[case(&[2_000_000, 800_000, 50_000], 800_000)]
    #[case(&[1_200_000, 400_000, 900_000], 400_000)]
    #[case(&[100_000, 1_500_000], 100_000)]
    #[case(&[1_500_000, 1_600_000], 1_500_000)]
    #[case(&[99_999, 1_500_001, 700_000], 700_000)]
    fn picks_minimum_inside_window(#[case] bandwidths: &[u64], #[case] expected: u64) {
        let manifest = MasterManifest::parse(&ladder(bandwidths)).unwrap();
        let chosen = VariantSelector::default().choose(&manifest).unwrap();
        assert_eq!(chosen.bandwidth, expected);
    }

    #[rstest]
    #[case(&[])]
    #[case(&[50_000, 2_000_000])]
    #[case(&[99_999, 1_500_001])]
    fn fails_without_candidate_in_window(#[case] bandwidths: &[u64]) {
        let manifest = MasterManifest::parse(&ladder(bandwidths)).unwrap();
        assert!(matches!(
            VariantSelector::default().choose(&manifest),
            Err(RetrievalError::NoSuitableVariant {
                min: 100_000,
                max: 1_500_000
            })
        ));
    }

    #[test]
    fn ties_keep_first_occurrence() {
        let manifest = MasterManifest::parse(&ladder(&[600_000, 600_000])).unwrap();
        let chosen = VariantSelector::default().choose(&manifest).unwrap();
        assert_eq!(chosen.uri, "v0/playlist.m3u8");
    }

    #[test]
    fn select_resolves_relative_uri_with_token() {
        let text = "#EXTM3U\n\
                    #EXT-X-STREAM-INF:BANDWIDTH=2000000\nhigh/playlist.m3u8\n\
                    #EXT-X-STREAM-INF:BANDWIDTH=800000\nmid/playlist.m3u8\n\
                    #EXT-X-STREAM-INF:BANDWIDTH=50000\nlow/playlist.m3u8\n";
        let master = Url::parse("https://cdn.test/r/abc/master.m3u8?Policy=p&Signature=s").unwrap();

        let selected = VariantSelector::default().select(text, &master).unwrap();
        assert_eq!(selected.bandwidth, 800_000);
        assert_eq!(
            selected.url.as_str(),
            "https://cdn.test/r/abc/mid/playlist.m3u8?Policy=p&Signature=s"
        );
    }

    #[test]
    fn select_keeps_absolute_uri() {
        let text = "#EXT-X-STREAM-INF:BANDWIDTH=500000\nhttps://other.test/v.m3u8?t=own\n";
        let master = Url::parse("https://cdn.test/master.m3u8?t=master").unwrap();

        let selected = VariantSelector::default().select(text, &master).unwrap();
        assert_eq!(selected.url.as_str(), "https://other.test/v.m3u8?t=own");
    }

    #[test]
    fn custom_window_is_honoured() {
        let manifest = MasterManifest::parse(&ladder(&[50_000, 800_000])).unwrap();
        let chosen = VariantSelector::new(BandwidthRange {
            min: 10_000,
            max: 60_000,
        })
        .choose(&manifest)
        .unwrap();
        assert_eq!(chosen.bandwidth, 50_000);
    }

    #[test]
    fn variants_without_bandwidth_are_not_candidates() {
        let text = "#EXTM3U\n\
                    #EXT-X-STREAM-INF:AVERAGE-BANDWIDTH=300000,CODECS=\"avc1\"\n\
                    nobw/playlist.m3u8\n\
                    #EXT-X-STREAM-INF:BANDWIDTH=800000\n\
                    mid/playlist.m3u8\n";
        let master = Url::parse("https://cdn.test/master.m3u8?t=1").unwrap();

        let selected = VariantSelector::default().select(text, &master).unwrap();
        assert_eq!(selected.bandwidth, 800_000);
        assert_eq!(
            selected.url.as_str(),
            "https://cdn.test/mid/playlist.m3u8?t=1"
        );
    }
}
