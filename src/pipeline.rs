use log::{debug, info};
use serde::Serialize;
use serde_json::Value;

use crate::error::{ExtractError, Result};
use crate::fetch::Fetcher;
use crate::page::{self, Page, Snapshot, WaitOptions};
use crate::strategy::{self, Sources, Strategy};
use crate::youtube::{self, TranscriptApi};
use crate::{Transcript, VideoReference, payload};

/// Where the page's element tree comes from
pub enum PageSource {
    /// GET the watch URL
    Fetch,
    /// HTML already in hand, e.g. a saved copy of the rendered page
    Html(String),
}

/// Everything a report is rendered from
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub title: String,
    pub url: String,
    pub transcript: Transcript,
}

#[derive(Debug, Clone)]
pub struct Settings {
    /// `None` tries every strategy in fallback order
    pub strategy: Option<Strategy>,
    pub lang: String,
    pub wait: WaitOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            strategy: None,
            lang: "en".to_string(),
            wait: WaitOptions::default(),
        }
    }
}

pub struct Extractor<F, A> {
    fetcher: F,
    api: A,
    settings: Settings,
}

impl<F: Fetcher, A: TranscriptApi> Extractor<F, A> {
    pub fn new(fetcher: F, api: A, settings: Settings) -> Self {
        Self { fetcher, api, settings }
    }

    /// Validate the URL, load the page, then extract
    pub async fn run(&self, url: &str, source: PageSource, globals: Vec<(String, Value)>) -> Result<Extraction> {
        let reference = VideoReference::from_url(url)?;
        info!("Extracting transcript for video {}", reference.video_id);

        let html = match source {
            PageSource::Fetch => self.fetcher.fetch(&reference.url).await?,
            PageSource::Html(html) => html,
        };
        let mut page = globals
            .into_iter()
            .fold(Snapshot::new(reference.url.clone(), &html), |page, (name, value)| {
                page.with_global(name, value)
            });

        self.extract(&mut page, &reference).await
    }

    pub async fn extract<P: Page>(&self, page: &mut P, reference: &VideoReference) -> Result<Extraction> {
        let title = resolve_title(page);
        debug!("Title for {}: {title}", page.url());

        let sources = Sources {
            fetcher: &self.fetcher,
            api: &self.api,
            lang: &self.settings.lang,
            wait: &self.settings.wait,
        };

        let candidates = match self.settings.strategy {
            Some(s) => vec![s],
            None => Strategy::FALLBACK_ORDER.to_vec(),
        };

        let mut first_err = None;
        for candidate in candidates {
            match strategy::locate(candidate, page, reference, &sources).await {
                Ok(transcript) => {
                    info!(
                        "Strategy {candidate} produced {} segments ({}, {})",
                        transcript.segments.len(),
                        transcript.language,
                        transcript.source_type
                    );
                    return Ok(Extraction {
                        title,
                        url: reference.url.clone(),
                        transcript,
                    });
                }
                Err(e) => {
                    debug!("Strategy {candidate} failed: {e}");
                    first_err.get_or_insert(e);
                }
            }
        }

        // candidates is never empty
        Err(first_err.unwrap_or(ExtractError::EmptyTranscript))
    }
}

/// Page selectors, then the player response's title, then the sentinel
fn resolve_title<P: Page>(page: &P) -> String {
    let title = page::resolve_title(page.document());
    if title != page::UNKNOWN_TITLE {
        return title;
    }
    payload::locate_player_response(page)
        .ok()
        .and_then(|pr| youtube::video_title(&pr))
        .unwrap_or(title)
}
