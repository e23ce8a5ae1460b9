pub mod clipboard;
pub mod config;
pub mod error;
pub mod fetch;
pub mod notify;
pub mod output;
pub mod page;
pub mod panel;
pub mod payload;
pub mod pipeline;
pub mod strategy;
pub mod subtitle;
pub mod youtube;

use serde::Serialize;
use url::Url;

pub use error::{ExtractError, Result};

/// The watch page a single extraction runs against
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoReference {
    pub url: String,
    pub video_id: String,
}

impl VideoReference {
    /// Validate a page URL, distinguishing "not a watch page" from "watch page without an id".
    pub fn from_url(url: &str) -> Result<Self> {
        let url = url.trim();
        if !is_watch_page(url) {
            return Err(ExtractError::NotAWatchPage { url: url.to_string() });
        }
        let video_id = extract_video_id(url).ok_or_else(|| ExtractError::MissingVideoId { url: url.to_string() })?;
        Ok(Self {
            url: url.to_string(),
            video_id,
        })
    }
}

/// A single normalized transcript line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptSegment {
    pub timestamp_label: String,
    pub start_seconds: u64,
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(timestamp_label: impl Into<String>, text: impl Into<String>) -> Self {
        let timestamp_label = timestamp_label.into();
        let start_seconds = parse_timestamp_label(&timestamp_label);
        Self {
            timestamp_label,
            start_seconds,
            text: text.into(),
        }
    }
}

/// Whether the captions were generated by speech recognition or written by hand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Auto,
    Manual,
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceType::Auto => write!(f, "Auto-generated"),
            SourceType::Manual => write!(f, "Manual"),
        }
    }
}

/// Complete transcript for a video. Never empty.
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub language: String,
    pub source_type: SourceType,
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    pub fn new(language: impl Into<String>, source_type: SourceType, segments: Vec<TranscriptSegment>) -> Result<Self> {
        if segments.is_empty() {
            return Err(ExtractError::EmptyTranscript);
        }
        Ok(Self {
            language: language.into(),
            source_type,
            segments,
        })
    }
}

/// True for `*youtube.com/watch` URLs, regardless of query
pub fn is_watch_page(input: &str) -> bool {
    match Url::parse(input.trim()) {
        Ok(url) => url.host_str().is_some_and(|h| h.contains("youtube.com")) && url.path() == "/watch",
        Err(_) => false,
    }
}

/// Extract the `v` parameter from a YouTube watch URL
pub fn extract_video_id(input: &str) -> Option<String> {
    if !is_watch_page(input) {
        return None;
    }
    let url = Url::parse(input.trim()).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "v")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

/// `MM:SS` or `HH:MM:SS` to seconds; anything else is 0
pub fn parse_timestamp_label(label: &str) -> u64 {
    let parts: Option<Vec<u64>> = label.trim().split(':').map(|p| p.trim().parse::<u64>().ok()).collect();
    let seconds = match parts.as_deref() {
        Some([m, s]) => m.checked_mul(60).and_then(|v| v.checked_add(*s)),
        Some([h, m, s]) => h
            .checked_mul(3600)
            .and_then(|v| v.checked_add(m.checked_mul(60)?))
            .and_then(|v| v.checked_add(*s)),
        _ => None,
    };
    seconds.unwrap_or(0)
}

/// Render an offset in seconds as zero-padded `HH:MM:SS`
pub fn format_offset(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
