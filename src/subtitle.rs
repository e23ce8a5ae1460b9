use std::sync::LazyLock;

use regex::Regex;

use crate::TranscriptSegment;

const SEPARATOR: &str = " --> ";
const HEADER_KEYWORDS: &[&str] = &["WEBVTT", "Kind:", "Language:"];

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// One timed entry of a WebVTT body, labelled `(HH:MM:SS)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    pub label: String,
    pub text: String,
}

impl Cue {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }

    pub fn to_segment(&self) -> TranscriptSegment {
        let bare = self.label.trim_start_matches('(').trim_end_matches(')');
        TranscriptSegment::new(bare, self.text.clone())
    }
}

/// Parse a WebVTT body into cues in file order
pub fn parse_cues(body: &str) -> Vec<Cue> {
    let mut cues = Vec::new();
    let mut open: Option<Cue> = None;

    let mut lines = body.lines().map(str::trim).peekable();
    while let Some(line) = lines.next() {
        if line.is_empty() {
            continue;
        }
        // header block only; cue text may start with the same words
        if open.is_none() && HEADER_KEYWORDS.iter().any(|k| line.starts_with(k)) {
            continue;
        }
        if is_cue_identifier(line, lines.peek().copied()) {
            continue;
        }

        if let Some((start, _)) = line.split_once(SEPARATOR) {
            if let Some(cue) = open.take() {
                cues.push(cue);
            }
            open = Some(Cue::new(cue_label(start), String::new()));
            continue;
        }

        if let Some(cue) = open.as_mut() {
            let text = clean_text(line);
            if text.is_empty() {
                continue;
            }
            if !cue.text.is_empty() {
                cue.text.push(' ');
            }
            cue.text.push_str(&text);
        }
    }

    if let Some(cue) = open {
        cues.push(cue);
    }
    cues
}

/// A numeric id on the line right before a timing line
fn is_cue_identifier(line: &str, next: Option<&str>) -> bool {
    line.chars().all(|c| c.is_ascii_digit()) && next.is_some_and(|n| n.contains(SEPARATOR))
}

/// `00:00:01.000` or `00:01.000` to `(00:00:01)`
fn cue_label(start: &str) -> String {
    let whole = start.trim().split('.').next().unwrap_or_default();
    let mut fields: Vec<&str> = whole.split(':').collect();
    while fields.len() < 3 {
        fields.insert(0, "0");
    }
    let padded = fields.iter().map(|f| format!("{f:0>2}")).collect::<Vec<_>>().join(":");
    format!("({padded})")
}

fn clean_text(line: &str) -> String {
    let stripped = TAG_RE.replace_all(line, "");
    html_escape::decode_html_entities(stripped.trim()).to_string()
}

/// Collapse runs of cues sharing a label into one upper-cased cue
pub fn merge_cues(cues: &[Cue]) -> Vec<Cue> {
    let mut merged: Vec<Cue> = Vec::new();
    let mut current: Option<Cue> = None;

    for cue in cues {
        match current.as_mut() {
            Some(acc) if acc.label == cue.label => {
                if !cue.text.is_empty() {
                    if !acc.text.is_empty() {
                        acc.text.push(' ');
                    }
                    acc.text.push_str(&cue.text);
                }
            }
            _ => {
                if let Some(done) = current.take() {
                    merged.push(flush(done));
                }
                current = Some(cue.clone());
            }
        }
    }

    if let Some(done) = current {
        merged.push(flush(done));
    }
    merged
}

fn flush(cue: Cue) -> Cue {
    Cue::new(cue.label, cue.text.to_uppercase())
}
