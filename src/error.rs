use thiserror::Error;

/// Every way a single extraction can fail. All variants are terminal for the
/// invocation; the messages are shown to the user as-is.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Please navigate to a YouTube video page to extract a transcript ({url})")]
    NotAWatchPage { url: String },

    #[error("Could not extract a video ID from {url}")]
    MissingVideoId { url: String },

    #[error("Could not find the player response embedded in the page")]
    PayloadNotFound,

    #[error("This video has no caption tracks")]
    NoCaptionTracks,

    #[error("Transcript button not found. Make sure the video has captions enabled.")]
    NoTranscriptButton,

    #[error("No transcript segments found in the panel")]
    NoSegments,

    #[error("Failed to fetch {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("No valid transcript segments could be extracted")]
    EmptyTranscript,

    #[error("Failed to copy transcript to clipboard: {reason}")]
    ClipboardWriteFailed { reason: String },
}

impl From<reqwest::Error> for ExtractError {
    fn from(e: reqwest::Error) -> Self {
        ExtractError::FetchFailed {
            url: e.url().map(|u| u.to_string()).unwrap_or_default(),
            reason: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
