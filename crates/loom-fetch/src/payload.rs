//! Handoff format for the accent analysis service.
//!
//! Media travels inline: raw bytes are base64 encoded and tagged with a MIME type,
//! next to the text prompt, in a `generateContent` style request body.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub const ACCENT_PROMPT: &str = "Given the following video, answer:\n\
1. What is the speaker's English accent? (e.g., British, American, Australian, etc.)\n\
2. What is your confidence in this classification (0-100%)?\n\
3. Give a short summary or explanation for your answer.\n\
Respond in JSON with keys: accent, confidence, explanation.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaMime {
    /// Complete container file, e.g. a direct link or an upload
    Mp4,
    /// Prefix of an HLS stream made of concatenated transport stream segments
    TransportStream,
    Other(String),
}

impl MediaMime {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Mp4 => "video/mp4",
            Self::TransportStream => "video/mp2t",
            Self::Other(mime) => mime,
        }
    }

    pub fn from_mime(mime: &str) -> Self {
        match mime.trim().to_ascii_lowercase().as_str() {
            "video/mp4" => Self::Mp4,
            "video/mp2t" => Self::TransportStream,
            other => Self::Other(other.to_string()),
        }
    }

    /// File extension matching the media type.
    pub fn extension(&self) -> &str {
        match self {
            Self::Mp4 => "mp4",
            Self::TransportStream => "ts",
            Self::Other(_) => "bin",
        }
    }
}

/// Retrieved media, already checked against the size budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPayload {
    pub data: Bytes,
    pub mime: MediaMime,
}

impl MediaPayload {
    pub fn new(data: Bytes, mime: MediaMime) -> Self {
        Self { data, mime }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn inline_data(&self) -> InlineData {
        InlineData {
            mime_type: self.mime.as_str().to_string(),
            data: STANDARD.encode(&self.data),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Media { inline_data: InlineData },
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// Request body handed to the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub contents: Vec<Content>,
}

impl AnalysisRequest {
    pub fn new(payload: &MediaPayload, prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::Media {
                        inline_data: payload.inline_data(),
                    },
                    Part::Text {
                        text: prompt.into(),
                    },
                ],
            }],
        }
    }

    pub fn accent(payload: &MediaPayload) -> Self {
        Self::new(payload, ACCENT_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mime_strings() {
        assert_eq!(MediaMime::Mp4.as_str(), "video/mp4");
        assert_eq!(MediaMime::TransportStream.as_str(), "video/mp2t");
        assert_eq!(
            MediaMime::from_mime("Video/MP2T"),
            MediaMime::TransportStream
        );
        assert_eq!(
            MediaMime::from_mime("video/webm"),
            MediaMime::Other("video/webm".to_string())
        );
        assert_eq!(MediaMime::TransportStream.extension(), "ts");
    }

    #[test]
    fn inline_data_is_base64() {
        let payload = MediaPayload::new(Bytes::from_static(b"hello"), MediaMime::Mp4);
        let inline = payload.inline_data();
        assert_eq!(inline.mime_type, "video/mp4");
        assert_eq!(inline.data, "aGVsbG8=");
    }

    #[test]
    fn request_body_shape() {
        let payload =
            MediaPayload::new(Bytes::from_static(b"\x47\x40"), MediaMime::TransportStream);
        let body = serde_json::to_value(AnalysisRequest::new(&payload, "which accent?")).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{
                    "parts": [
                        { "inline_data": { "mime_type": "video/mp2t", "data": "R0A=" } },
                        { "text": "which accent?" }
                    ]
                }]
            })
        );
    }

    #[test]
    fn accent_prompt_asks_for_json_keys() {
        let payload = MediaPayload::new(Bytes::new(), MediaMime::Mp4);
        let request = AnalysisRequest::accent(&payload);
        let Part::Text { text } = &request.contents[0].parts[1] else {
            panic!("expected text part");
        };
        assert!(text.contains("accent, confidence, explanation"));
    }
}
