use log::{error, info};

use crate::pipeline::Extraction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A one-line message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    /// Summary after the report has been delivered to `destination`
    pub fn delivered(extraction: &Extraction, destination: &str) -> Self {
        let transcript = &extraction.transcript;
        Self::success(format!(
            "Extraction successful! {} segments ({}, {}) {destination}.",
            transcript.segments.len(),
            transcript.source_type,
            transcript.language.to_uppercase(),
        ))
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            NoticeKind::Success => write!(f, "\x1b[32m✅\x1b[0m {}", self.message),
            NoticeKind::Error => write!(f, "\x1b[31m❌\x1b[0m {}", self.message),
        }
    }
}

/// Show a notice on stderr and log it. Never fails.
pub fn notify(notice: &Notice) {
    match notice.kind {
        NoticeKind::Success => info!("{}", notice.message),
        NoticeKind::Error => error!("{}", notice.message),
    }
    eprintln!("{notice}");
}
