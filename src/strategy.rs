use std::str::FromStr;

use log::{debug, info};

use crate::error::{ExtractError, Result};
use crate::fetch::Fetcher;
use crate::page::{Page, WaitOptions};
use crate::subtitle::{self, Cue};
use crate::youtube::{self, TranscriptApi};
use crate::{Transcript, TranscriptSegment, VideoReference, format_offset, panel, payload};

/// One self-contained way of obtaining a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Scrape the rendered transcript panel
    DomPanel,
    /// Look the transcript up by video id, then by watch URL
    LibraryFetch,
    /// Embedded player response plus the caption track's WebVTT file
    PayloadSubtitle,
}

impl Strategy {
    /// Order tried when none is configured
    pub const FALLBACK_ORDER: [Strategy; 3] = [Strategy::PayloadSubtitle, Strategy::LibraryFetch, Strategy::DomPanel];
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::DomPanel => write!(f, "panel"),
            Strategy::LibraryFetch => write!(f, "library"),
            Strategy::PayloadSubtitle => write!(f, "payload"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "panel" | "dom" => Ok(Strategy::DomPanel),
            "library" => Ok(Strategy::LibraryFetch),
            "payload" => Ok(Strategy::PayloadSubtitle),
            other => Err(format!("unknown strategy: {other}")),
        }
    }
}

/// What a strategy may touch
pub struct Sources<'a, F, A> {
    pub fetcher: &'a F,
    pub api: &'a A,
    pub lang: &'a str,
    pub wait: &'a WaitOptions,
}

pub async fn locate<P: Page, F: Fetcher, A: TranscriptApi>(
    strategy: Strategy,
    page: &mut P,
    reference: &VideoReference,
    sources: &Sources<'_, F, A>,
) -> Result<Transcript> {
    debug!("Trying strategy {strategy}");
    match strategy {
        Strategy::DomPanel => panel::extract(page, sources.wait).await,
        Strategy::LibraryFetch => library_fetch(sources.api, reference, sources.lang).await,
        Strategy::PayloadSubtitle => payload_subtitle(page, sources.fetcher, sources.lang).await,
    }
}

/// Look up by id; on failure retry once by the full watch URL
pub async fn library_fetch<A: TranscriptApi>(api: &A, reference: &VideoReference, lang: &str) -> Result<Transcript> {
    let timed = match api.fetch_transcript(&reference.video_id, lang).await {
        Ok(t) => t,
        Err(e) => {
            debug!("Lookup by id failed: {e}; retrying with {}", reference.url);
            api.fetch_transcript(&reference.url, lang).await?
        }
    };

    let segments: Vec<TranscriptSegment> = timed
        .cues
        .iter()
        .map(|cue| TranscriptSegment::new(format_offset(cue.offset), cue.text.to_uppercase()))
        .collect();
    info!("Fetched {} cues ({})", segments.len(), timed.language);
    Transcript::new(timed.language, timed.source_type, segments)
}

/// Player response, caption track, WebVTT body, merged cues
pub async fn payload_subtitle<P: Page, F: Fetcher>(page: &P, fetcher: &F, lang: &str) -> Result<Transcript> {
    let player_response = payload::locate_player_response(page)?;

    let tracks = youtube::caption_tracks(&player_response);
    let track = youtube::select_track(&tracks, lang).ok_or(ExtractError::NoCaptionTracks)?;
    debug!("Using caption track: lang={} kind={:?}", track.language_code, track.kind);

    let url = youtube::subtitle_url(&track.base_url)?;
    let body = fetcher.fetch(&url).await?;

    let cues = subtitle::parse_cues(&body);
    let merged = subtitle::merge_cues(&cues);
    info!("Parsed {} cues into {} lines ({})", cues.len(), merged.len(), track.language_code);

    Transcript::new(
        track.language_code.clone(),
        track.source_type(),
        merged.iter().map(Cue::to_segment).collect(),
    )
}
