use std::collections::HashMap;
use std::time::Duration;

use log::debug;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use tokio::time::Instant;

pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Most specific first
pub const TITLE_SELECTORS: &[&str] = &[
    "h1.ytd-video-primary-info-renderer yt-formatted-string",
    "h1.ytd-watch-metadata #title",
    "#title h1",
    r#"h1[class*="title"]"#,
    ".ytd-video-primary-info-renderer h1",
    "ytd-video-primary-info-renderer h1",
];

/// An element to click: the `index`-th match of `selector` in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickTarget {
    pub selector: String,
    pub index: usize,
}

impl ClickTarget {
    pub fn new(selector: impl Into<String>, index: usize) -> Self {
        Self {
            selector: selector.into(),
            index,
        }
    }
}

/// Read access to a rendered watch page plus the few interactions extraction needs
#[allow(async_fn_in_trait)]
pub trait Page {
    fn url(&self) -> &str;

    /// The element tree as of now
    fn document(&self) -> &Html;

    /// A page-global binding such as `ytInitialPlayerResponse`
    fn global(&self, name: &str) -> Option<&Value>;

    /// Returns false when the target does not resolve to an element
    async fn click(&mut self, target: &ClickTarget) -> bool;

    /// Whether the tree can change between two polls
    fn is_live(&self) -> bool {
        true
    }
}

/// A static page: a fetched watch page or a saved copy of the rendered one
pub struct Snapshot {
    url: String,
    document: Html,
    globals: HashMap<String, Value>,
    clicks: Vec<ClickTarget>,
}

impl Snapshot {
    pub fn new(url: impl Into<String>, html: &str) -> Self {
        Self {
            url: url.into(),
            document: Html::parse_document(html),
            globals: HashMap::new(),
            clicks: Vec::new(),
        }
    }

    pub fn with_global(mut self, name: impl Into<String>, value: Value) -> Self {
        self.globals.insert(name.into(), value);
        self
    }

    pub fn clicks(&self) -> &[ClickTarget] {
        &self.clicks
    }
}

impl Page for Snapshot {
    fn url(&self) -> &str {
        &self.url
    }

    fn document(&self) -> &Html {
        &self.document
    }

    fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    async fn click(&mut self, target: &ClickTarget) -> bool {
        let found = resolve(&self.document, target).is_some();
        debug!("Snapshot click {target:?} (found={found})");
        self.clicks.push(target.clone());
        found
    }

    fn is_live(&self) -> bool {
        false
    }
}

pub fn resolve<'a>(document: &'a Html, target: &ClickTarget) -> Option<ElementRef<'a>> {
    let selector = parse_selector(&target.selector)?;
    document.select(&selector).nth(target.index)
}

pub fn parse_selector(candidate: &str) -> Option<Selector> {
    match Selector::parse(candidate) {
        Ok(s) => Some(s),
        Err(e) => {
            debug!("Skipping selector {candidate:?}: {e}");
            None
        }
    }
}

/// Trimmed text of an element, `None` when blank
pub fn element_text(element: ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<String>();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Try each candidate selector in order; the first one whose first match has
/// non-empty text wins.
pub fn find_first_matching_text(scope: ElementRef<'_>, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|candidate| {
        let selector = parse_selector(candidate)?;
        let text = scope.select(&selector).next().and_then(element_text)?;
        debug!("Matched {candidate:?}");
        Some(text)
    })
}

pub fn resolve_title(document: &Html) -> String {
    find_first_matching_text(document.root_element(), TITLE_SELECTORS).unwrap_or_else(|| UNKNOWN_TITLE.to_string())
}

/// Neither the element nor any ancestor is `hidden` or inline `display: none`
pub fn is_visible(element: ElementRef<'_>) -> bool {
    std::iter::once(*element)
        .chain(element.ancestors())
        .filter_map(|node| node.value().as_element())
        .all(|el| {
            let hidden_style = el
                .attr("style")
                .map(|s| s.replace(' ', "").to_ascii_lowercase().contains("display:none"))
                .unwrap_or(false);
            el.attr("hidden").is_none() && !hidden_style
        })
}

pub fn has_match(document: &Html, selector: &str) -> bool {
    parse_selector(selector).is_some_and(|s| document.select(&s).next().is_some())
}

/// Bounds for every wait on the page
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            poll_interval: Duration::from_millis(250),
        }
    }
}

/// Poll `probe` until it yields or the timeout passes. A static page is probed once.
pub async fn wait_until<T>(live: bool, opts: &WaitOptions, mut probe: impl FnMut() -> Option<T>) -> Option<T> {
    let deadline = Instant::now() + opts.timeout;
    loop {
        if let Some(found) = probe() {
            return Some(found);
        }
        if !live || Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(opts.poll_interval).await;
    }
}
