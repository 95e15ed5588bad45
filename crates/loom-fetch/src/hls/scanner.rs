// Line-pair scanner for HLS playlists.
//
// A `#EXT-X-STREAM-INF` tag line is always followed by the URI line of the variant it
// describes. The scanner keeps that pairing as explicit state so that a tag without its
// URI surfaces as a `MalformedManifest` instead of a silently dropped entry. A tag that
// declares no BANDWIDTH still claims its URI line, but yields no entry.

use crate::error::{Result, RetrievalError};

const STREAM_INF_TAG: &str = "#EXT-X-STREAM-INF:";
const BANDWIDTH_ATTR: &str = "BANDWIDTH";

/// One meaningful entry of a playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistEntry<'a> {
    /// A stream-info tag together with the URI line that follows it
    Variant { bandwidth: u64, uri: &'a str },
    /// A URI line not claimed by a stream-info tag, e.g. a media segment
    Uri(&'a str),
}

#[derive(Debug, Clone, Copy)]
enum ScanState {
    Idle,
    AwaitingUri {
        bandwidth: Option<u64>,
        tag_line: usize,
    },
}

/// Iterates the entries of a playlist text in order of appearance.
///
/// Blank lines are skipped; other tags and comments are ignored unless a variant URI is
/// pending, in which case they make the manifest malformed. The iterator stops after
/// the first error.
pub struct PlaylistScanner<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    state: ScanState,
    done: bool,
}

impl<'a> PlaylistScanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            state: ScanState::Idle,
            done: false,
        }
    }

    fn fail(&mut self, reason: String) -> Option<Result<PlaylistEntry<'a>>> {
        self.done = true;
        Some(Err(RetrievalError::malformed(reason)))
    }
}

impl<'a> Iterator for PlaylistScanner<'a> {
    type Item = Result<PlaylistEntry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let Some((index, raw)) = self.lines.next() else {
                self.done = true;
                return match self.state {
                    ScanState::Idle => None,
                    ScanState::AwaitingUri { tag_line, .. } => self.fail(format!(
                        "stream info on line {} has no URI line",
                        tag_line + 1
                    )),
                };
            };
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            match self.state {
                ScanState::AwaitingUri {
                    bandwidth,
                    tag_line,
                } => {
                    if line.starts_with('#') {
                        return self.fail(format!(
                            "stream info on line {} is followed by `{line}` instead of a URI",
                            tag_line + 1
                        ));
                    }
                    self.state = ScanState::Idle;
                    if let Some(bandwidth) = bandwidth {
                        return Some(Ok(PlaylistEntry::Variant {
                            bandwidth,
                            uri: line,
                        }));
                    }
                }
                ScanState::Idle => {
                    if let Some(attributes) = line.strip_prefix(STREAM_INF_TAG) {
                        match parse_bandwidth(attributes) {
                            Ok(bandwidth) => {
                                self.state = ScanState::AwaitingUri {
                                    bandwidth,
                                    tag_line: index,
                                };
                            }
                            Err(reason) => {
                                return self.fail(format!("line {}: {reason}", index + 1));
                            }
                        }
                    } else if !line.starts_with('#') {
                        return Some(Ok(PlaylistEntry::Uri(line)));
                    }
                }
            }
        }
    }
}

/// Splits an attribute list on commas that are not inside quoted strings.
fn split_attributes(attributes: &str) -> impl Iterator<Item = &str> {
    let mut in_quotes = false;
    attributes
        .split(move |c: char| {
            if c == '"' {
                in_quotes = !in_quotes;
            }
            c == ',' && !in_quotes
        })
        .map(str::trim)
        .filter(|attr| !attr.is_empty())
}

/// `Ok(None)` when the attribute list declares no BANDWIDTH.
fn parse_bandwidth(attributes: &str) -> std::result::Result<Option<u64>, String> {
    let Some(value) = split_attributes(attributes)
        .filter_map(|attr| attr.split_once('='))
        .find(|(key, _)| key.trim() == BANDWIDTH_ATTR)
        .map(|(_, value)| value.trim())
    else {
        return Ok(None);
    };

    value
        .parse::<u64>()
        .map(Some)
        .map_err(|e| format!("invalid BANDWIDTH `{value}`: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Result<Vec<PlaylistEntry<'_>>> {
        PlaylistScanner::new(text).collect()
    }

    #[test]
    fn pairs_stream_info_with_next_line() {
        let text = "#EXTM3U\n\
                    #EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=640x360\n\
                    mid/playlist.m3u8\n";
        assert_eq!(
            scan(text).unwrap(),
            vec![PlaylistEntry::Variant {
                bandwidth: 800_000,
                uri: "mid/playlist.m3u8"
            }]
        );
    }

    #[test]
    fn ignores_average_bandwidth_and_quoted_commas() {
        let text = "#EXTM3U\n\
                    #EXT-X-STREAM-INF:AVERAGE-BANDWIDTH=1,CODECS=\"avc1.4d401e,mp4a.40.2\",BANDWIDTH=450000\n\
                    low.m3u8\n";
        assert_eq!(
            scan(text).unwrap(),
            vec![PlaylistEntry::Variant {
                bandwidth: 450_000,
                uri: "low.m3u8"
            }]
        );
    }

    #[test]
    fn plain_uri_lines_are_reported_in_order() {
        let text = "#EXTM3U\n#EXTINF:2.0,\n0.ts\n\n#EXTINF:2.0,\n1.ts\n#EXT-X-ENDLIST\n";
        assert_eq!(
            scan(text).unwrap(),
            vec![PlaylistEntry::Uri("0.ts"), PlaylistEntry::Uri("1.ts")]
        );
    }

    #[test]
    fn trailing_stream_info_is_malformed() {
        let text = "#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=800000\n";
        let err = scan(text).unwrap_err();
        assert!(matches!(err, RetrievalError::MalformedManifest { .. }));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn stream_info_followed_by_tag_is_malformed() {
        let text = "#EXT-X-STREAM-INF:BANDWIDTH=800000\n\
                    #EXT-X-STREAM-INF:BANDWIDTH=900000\n\
                    a.m3u8\n";
        assert!(matches!(
            scan(text),
            Err(RetrievalError::MalformedManifest { .. })
        ));
    }

    #[test]
    fn non_numeric_bandwidth_is_malformed() {
        let text = "#EXT-X-STREAM-INF:BANDWIDTH=fast\na.m3u8\n";
        assert!(matches!(
            scan(text),
            Err(RetrievalError::MalformedManifest { .. })
        ));
    }

    #[test]
    fn scanner_stops_after_error() {
        let mut scanner = PlaylistScanner::new("#EXT-X-STREAM-INF:BANDWIDTH=x\na.m3u8\nb.ts\n");
        assert!(scanner.next().unwrap().is_err());
        assert!(scanner.next().is_none());
    }

    #[test]
    fn stream_info_without_bandwidth_claims_its_uri() {
        let text = "#EXTM3U\n\
                    #EXT-X-STREAM-INF:AVERAGE-BANDWIDTH=300000,CODECS=\"avc1\"\n\
                    nobw/playlist.m3u8\n\
                    #EXT-X-STREAM-INF:BANDWIDTH=800000\n\
                    mid/playlist.m3u8\n";
        assert_eq!(
            scan(text).unwrap(),
            vec![PlaylistEntry::Variant {
                bandwidth: 800_000,
                uri: "mid/playlist.m3u8"
            }]
        );
    }

    #[test]
    fn stream_info_without_bandwidth_still_needs_a_uri() {
        let text = "#EXTM3U\n#EXT-X-STREAM-INF:CODECS=\"avc1\"\n";
        assert!(matches!(
            scan(text),
            Err(RetrievalError::MalformedManifest { .. })
        ));
    }
}
