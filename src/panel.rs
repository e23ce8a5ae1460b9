use log::{debug, info};
use scraper::{ElementRef, Html};

use crate::error::{ExtractError, Result};
use crate::page::{
    ClickTarget, Page, WaitOptions, element_text, find_first_matching_text, has_match, is_visible, parse_selector, wait_until,
};
use crate::{SourceType, Transcript, TranscriptSegment};

const EXPAND_SELECTOR: &str = r#"#expand-sizer, tp-yt-paper-button[id="expand-sizer"]"#;

const TRANSCRIPT_BUTTON_SELECTORS: &[&str] = &[
    r#"button[aria-label*="Show transcript"], button[aria-label*="transcript"]"#,
    r#"button[aria-label*="顯示轉錄稿"], button[aria-label*="轉錄稿"]"#,
    r#"ytd-button-renderer button[aria-label*="transcript"]"#,
    r#"ytd-button-renderer button[aria-label*="轉錄稿"]"#,
    "ytd-video-description-transcript-section-renderer button",
    r#"ytd-expandable-video-description-body-renderer button[aria-label*="transcript"]"#,
];

/// Button label terms, one per UI locale
const TRANSCRIPT_TERMS: &[&str] = &["transcript", "轉錄稿"];

const SEGMENT_CONTAINER: &str = "ytd-transcript-segment-list-renderer, ytd-transcript-segment-renderer";

const SEGMENT_SELECTORS: &[&str] = &[
    "ytd-transcript-segment-renderer",
    ".segment.style-scope.ytd-transcript-segment-renderer",
    r#"[class*="transcript-segment"]"#,
];

const TIMESTAMP_SELECTORS: &[&str] = &[
    ".segment-timestamp",
    ".segment-start-offset .segment-timestamp",
    r#"[class*="timestamp"]"#,
    ".ytd-transcript-segment-renderer .segment-start-offset div",
];

const TEXT_SELECTORS: &[&str] = &[
    ".segment-text",
    "yt-formatted-string.segment-text",
    r#"yt-formatted-string[class*="segment-text"]"#,
    r#"[class*="segment-text"]"#,
    ".ytd-transcript-segment-renderer yt-formatted-string",
];

const TRANSCRIPT_HEADER: &str = "ytd-transcript-section-header-renderer h2";

/// Open the transcript panel and scrape its segments
pub async fn extract<P: Page>(page: &mut P, opts: &WaitOptions) -> Result<Transcript> {
    expand_description(page).await;

    let live = page.is_live();
    let button = wait_until(live, opts, || find_transcript_button(page.document()))
        .await
        .ok_or(ExtractError::NoTranscriptButton)?;

    debug!("Clicking transcript button {button:?}");
    if !page.click(&button).await {
        debug!("Transcript button click did not land: {button:?}");
    }

    wait_until(live, opts, || has_match(page.document(), SEGMENT_CONTAINER).then_some(()))
        .await
        .ok_or(ExtractError::NoSegments)?;

    let document = page.document();
    let elements = segment_elements(document);
    if elements.is_empty() {
        return Err(ExtractError::NoSegments);
    }

    let segments: Vec<TranscriptSegment> = elements.into_iter().filter_map(read_segment).collect();
    info!("Extracted {} transcript segments from the panel", segments.len());

    Transcript::new(detect_language(document), SourceType::Auto, segments)
}

async fn expand_description<P: Page>(page: &mut P) {
    let target = parse_selector(EXPAND_SELECTOR).and_then(|selector| {
        page.document()
            .select(&selector)
            .next()
            .filter(|el| is_visible(*el))
            .map(|_| ClickTarget::new(EXPAND_SELECTOR, 0))
    });
    if let Some(target) = target {
        debug!("Clicking expand description button");
        if !page.click(&target).await {
            debug!("Expand description click did not land");
        }
    }
}

/// Ordered selectors first (visible matches only), then any button whose text
/// or aria-label mentions a transcript term
fn find_transcript_button(document: &Html) -> Option<ClickTarget> {
    let by_selector = TRANSCRIPT_BUTTON_SELECTORS.iter().find_map(|candidate| {
        let selector = parse_selector(candidate)?;
        let index = document.select(&selector).position(is_visible)?;
        debug!("Found transcript button with selector {candidate:?}");
        Some(ClickTarget::new(*candidate, index))
    });
    if by_selector.is_some() {
        return by_selector;
    }

    let buttons = parse_selector("button")?;
    let index = document.select(&buttons).position(|button| {
        let text = button.text().collect::<String>();
        let aria = button.value().attr("aria-label").unwrap_or_default();
        TRANSCRIPT_TERMS
            .iter()
            .any(|term| text.contains(term) || aria.contains(term))
    })?;
    debug!("Found transcript button by text at index {index}");
    Some(ClickTarget::new("button", index))
}

fn segment_elements(document: &Html) -> Vec<ElementRef<'_>> {
    SEGMENT_SELECTORS
        .iter()
        .filter_map(|candidate| parse_selector(candidate))
        .map(|selector| document.select(&selector).collect::<Vec<_>>())
        .find(|found| !found.is_empty())
        .unwrap_or_default()
}

fn read_segment(element: ElementRef<'_>) -> Option<TranscriptSegment> {
    let timestamp = find_first_matching_text(element, TIMESTAMP_SELECTORS)?;
    let text = find_first_matching_text(element, TEXT_SELECTORS)?;
    Some(TranscriptSegment::new(timestamp, text))
}

fn detect_language(document: &Html) -> &'static str {
    let Some(header) = parse_selector(TRANSCRIPT_HEADER).and_then(|s| document.select(&s).next()) else {
        return "en";
    };
    let header_zh = element_text(header).is_some_and(|t| t.contains("轉錄稿"));
    let doc_zh = document
        .root_element()
        .value()
        .attr("lang")
        .is_some_and(|lang| lang.starts_with("zh"));
    if header_zh || doc_zh { "zh" } else { "en" }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::Value;

    use super::*;
    use crate::page::Snapshot;

    const URL: &str = "https://www.youtube.com/watch?v=ABC123";

    const PANEL: &str = r#"
        <ytd-transcript-segment-list-renderer>
          <ytd-transcript-segment-renderer>
            <div class="segment-start-offset"><div class="segment-timestamp"> 0:01 </div></div>
            <yt-formatted-string class="segment-text">Hello there</yt-formatted-string>
          </ytd-transcript-segment-renderer>
          <ytd-transcript-segment-renderer>
            <div class="segment-timestamp">1:02</div>
            <yt-formatted-string class="segment-text"></yt-formatted-string>
          </ytd-transcript-segment-renderer>
          <ytd-transcript-segment-renderer>
            <div class="segment-timestamp">1:02:03</div>
            <yt-formatted-string class="segment-text">General Kenobi</yt-formatted-string>
          </ytd-transcript-segment-renderer>
        </ytd-transcript-segment-list-renderer>"#;

    fn fast() -> WaitOptions {
        WaitOptions {
            timeout: Duration::from_millis(200),
            poll_interval: Duration::from_millis(5),
        }
    }

    fn rendered(body: &str) -> String {
        format!("<html><body>{body}</body></html>")
    }

    #[tokio::test]
    async fn test_snapshot_with_open_panel() {
        let html = rendered(&format!(
            r#"<button id="expand-sizer">more</button>
               <button aria-label="Show transcript">Show transcript</button>{PANEL}"#
        ));
        let mut page = Snapshot::new(URL, &html);
        let transcript = extract(&mut page, &fast()).await.unwrap();

        assert_eq!(transcript.language, "en");
        assert_eq!(transcript.source_type, SourceType::Auto);
        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[0], TranscriptSegment::new("0:01", "Hello there"));
        assert_eq!(transcript.segments[1].start_seconds, 3723);

        let clicks = page.clicks();
        assert_eq!(clicks.len(), 2);
        assert_eq!(clicks[0].selector, EXPAND_SELECTOR);
    }

    #[tokio::test]
    async fn test_hidden_expand_not_clicked() {
        let html = rendered(&format!(
            r#"<div hidden><button id="expand-sizer">more</button></div>
               <button aria-label="Show transcript">x</button>{PANEL}"#
        ));
        let mut page = Snapshot::new(URL, &html);
        extract(&mut page, &fast()).await.unwrap();
        assert_eq!(page.clicks().len(), 1);
    }

    #[tokio::test]
    async fn test_button_found_by_text() {
        let html = rendered(&format!("<button>open transcript</button>{PANEL}"));
        let doc = Html::parse_document(&html);
        assert_eq!(find_transcript_button(&doc), Some(ClickTarget::new("button", 0)));

        let mut page = Snapshot::new(URL, &html);
        assert!(extract(&mut page, &fast()).await.is_ok());
    }

    #[test]
    fn test_hidden_selector_match_skipped() {
        let html = rendered(
            r#"<div style="display:none"><button aria-label="Show transcript">a</button></div>
               <button aria-label="Show transcript">b</button>"#,
        );
        let doc = Html::parse_document(&html);
        let target = find_transcript_button(&doc).unwrap();
        assert_eq!(target.index, 1);
    }

    #[tokio::test]
    async fn test_no_button() {
        let mut page = Snapshot::new(URL, &rendered(PANEL));
        assert!(matches!(
            extract(&mut page, &fast()).await,
            Err(ExtractError::NoTranscriptButton)
        ));
    }

    #[tokio::test]
    async fn test_panel_never_appears() {
        let mut page = Snapshot::new(URL, &rendered(r#"<button aria-label="Show transcript">x</button>"#));
        assert!(matches!(extract(&mut page, &fast()).await, Err(ExtractError::NoSegments)));
    }

    #[tokio::test]
    async fn test_segments_without_text() {
        let html = rendered(
            r#"<button aria-label="Show transcript">x</button>
               <ytd-transcript-segment-renderer><div class="segment-timestamp">0:01</div></ytd-transcript-segment-renderer>"#,
        );
        let mut page = Snapshot::new(URL, &html);
        assert!(matches!(
            extract(&mut page, &fast()).await,
            Err(ExtractError::EmptyTranscript)
        ));
    }

    #[test]
    fn test_detect_chinese() {
        let doc = Html::parse_document(&rendered(
            "<ytd-transcript-section-header-renderer><h2>轉錄稿</h2></ytd-transcript-section-header-renderer>",
        ));
        assert_eq!(detect_language(&doc), "zh");

        let doc = Html::parse_document(
            r#"<html lang="zh-TW"><body><ytd-transcript-section-header-renderer><h2>Transcript</h2></ytd-transcript-section-header-renderer></body></html>"#,
        );
        assert_eq!(detect_language(&doc), "zh");

        let doc = Html::parse_document(r#"<html lang="zh-TW"><body></body></html>"#);
        assert_eq!(detect_language(&doc), "en");
    }

    /// A page whose panel renders only after the transcript button is clicked
    struct LivePage {
        before: Html,
        after: Html,
        opened: bool,
        responsive: bool,
        clicks: usize,
    }

    impl Page for LivePage {
        fn url(&self) -> &str {
            URL
        }

        fn document(&self) -> &Html {
            if self.opened { &self.after } else { &self.before }
        }

        fn global(&self, _name: &str) -> Option<&Value> {
            None
        }

        async fn click(&mut self, target: &ClickTarget) -> bool {
            self.clicks += 1;
            if !self.responsive {
                return false;
            }
            if target.selector.contains("transcript") {
                self.opened = true;
            }
            true
        }
    }

    #[tokio::test]
    async fn test_live_page_opens_after_click() {
        let button = r#"<button aria-label="Show transcript">x</button>"#;
        let mut page = LivePage {
            before: Html::parse_document(&rendered(button)),
            after: Html::parse_document(&rendered(&format!("{button}{PANEL}"))),
            opened: false,
            responsive: true,
            clicks: 0,
        };
        let transcript = extract(&mut page, &fast()).await.unwrap();
        assert_eq!(transcript.segments.len(), 2);
    }

    #[tokio::test]
    async fn test_live_page_times_out_without_button() {
        let mut page = LivePage {
            before: Html::parse_document(&rendered("<p>loading</p>")),
            after: Html::parse_document(&rendered(PANEL)),
            opened: false,
            responsive: true,
            clicks: 0,
        };
        assert!(matches!(
            extract(&mut page, &fast()).await,
            Err(ExtractError::NoTranscriptButton)
        ));
    }

    #[tokio::test]
    async fn test_unanswered_click_reports_no_segments() {
        let button = r#"<button aria-label="Show transcript">x</button>"#;
        let mut page = LivePage {
            before: Html::parse_document(&rendered(button)),
            after: Html::parse_document(&rendered(&format!("{button}{PANEL}"))),
            opened: false,
            responsive: false,
            clicks: 0,
        };
        assert!(matches!(extract(&mut page, &fast()).await, Err(ExtractError::NoSegments)));
        assert_eq!(page.clicks, 1);
    }
}
