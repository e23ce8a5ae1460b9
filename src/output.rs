use chrono::{DateTime, Local};

use crate::Transcript;
use crate::pipeline::Extraction;

pub const DEFAULT_PROMPT_TEMPLATE: &str = "\
Please summarize the following YouTube video transcript. \
Start with a one-paragraph overview, then list the key points in order, \
then note any conclusions or recommendations the speaker makes.

Title: {title}
URL: {url}

Transcript:
{transcript}
";

/// Header block followed by one `[label] text` line per segment
pub fn render_structured(extraction: &Extraction, extracted_at: DateTime<Local>) -> String {
    let transcript = &extraction.transcript;

    let mut output = format!("Title: {}\n", extraction.title);
    output += &format!("URL: {}\n", extraction.url);
    output += &format!("Language: {}\n", transcript.language.to_uppercase());
    output += &format!("Type: {}\n", transcript.source_type);
    output += &format!("Extracted: {}\n", extracted_at.format("%Y-%m-%d %H:%M:%S"));

    output += "\n--- TRANSCRIPT ---\n\n";
    for segment in &transcript.segments {
        output += &format!("[{}] {}\n", segment.timestamp_label, segment.text);
    }
    output += "\n--- END TRANSCRIPT ---\n";

    output
}

/// Fill `{title}`, `{url}` and `{transcript}` in a prompt template
pub fn render_prompt(extraction: &Extraction, template: &str) -> String {
    template
        .replace("{title}", &extraction.title)
        .replace("{url}", &extraction.url)
        .replace("{transcript}", &merged_line(&extraction.transcript))
}

/// Render the whole extraction as JSON
pub fn render_json(extraction: &Extraction) -> String {
    serde_json::to_string_pretty(extraction).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

/// All segments on one line: `(label) text` joined by single spaces
pub fn merged_line(transcript: &Transcript) -> String {
    transcript
        .segments
        .iter()
        .map(|s| format!("({}) {}", s.timestamp_label, s.text))
        .collect::<Vec<_>>()
        .join(" ")
}
