use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use scraper::Selector;
use serde_json::Value;

use crate::error::{ExtractError, Result};
use crate::page::{Page, element_text};

pub const PLAYER_RESPONSE_GLOBAL: &str = "ytInitialPlayerResponse";
const LEGACY_PLAYER_GLOBAL: &str = "ytplayer";

/// A textual marker that precedes the JSON object, optionally required to be
/// followed by a sibling key
struct ScriptPattern {
    prefix: Regex,
    followed_by: Option<&'static str>,
}

static SCRIPT_PATTERNS: LazyLock<Vec<ScriptPattern>> = LazyLock::new(|| {
    [
        (r"var\s+ytInitialPlayerResponse\s*=\s*", None),
        (r#"window\[\s*["']ytInitialPlayerResponse["']\s*\]\s*=\s*"#, None),
        (r#""ytInitialPlayerResponse"\s*:\s*"#, Some(r#","ytInitialData""#)),
        (r"ytInitialPlayerResponse\s*=\s*", None),
    ]
    .into_iter()
    .map(|(prefix, followed_by)| ScriptPattern {
        prefix: Regex::new(prefix).unwrap(),
        followed_by,
    })
    .collect()
});

static LEGACY_CONFIG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"ytplayer\.config\s*=\s*").unwrap());

/// Find the player response: global binding, then inline scripts, then the legacy player config
pub fn locate_player_response<P: Page>(page: &P) -> Result<Value> {
    if let Some(value) = page.global(PLAYER_RESPONSE_GLOBAL).filter(|v| v.is_object()) {
        debug!("Player response from global binding");
        return Ok(value.clone());
    }

    if let Some(value) = scan_scripts(page) {
        return Ok(value);
    }

    if let Some(value) = page
        .global(LEGACY_PLAYER_GLOBAL)
        .and_then(|ytplayer| ytplayer.get("config"))
        .and_then(config_player_response)
    {
        debug!("Player response from legacy player config");
        return Ok(value);
    }

    if let Some(value) = scan_legacy_scripts(page) {
        debug!("Player response from legacy player config script");
        return Ok(value);
    }

    Err(ExtractError::PayloadNotFound)
}

fn scan_scripts<P: Page>(page: &P) -> Option<Value> {
    let selector = Selector::parse("script").ok()?;
    page.document()
        .select(&selector)
        .filter_map(element_text)
        .filter(|body| body.contains(PLAYER_RESPONSE_GLOBAL))
        .find_map(|body| parse_script(&body))
}

fn scan_legacy_scripts<P: Page>(page: &P) -> Option<Value> {
    let selector = Selector::parse("script").ok()?;
    page.document()
        .select(&selector)
        .filter_map(element_text)
        .filter(|body| body.contains(LEGACY_PLAYER_GLOBAL))
        .find_map(|body| {
            LEGACY_CONFIG_RE
                .find_iter(&body)
                .filter_map(|m| json_object_at(&body[m.end()..], None))
                .find_map(|config| config_player_response(&config))
        })
}

/// The first pattern occurrence in a script body that yields a JSON object
pub fn parse_script(body: &str) -> Option<Value> {
    SCRIPT_PATTERNS.iter().find_map(|pattern| {
        pattern.prefix.find_iter(body).find_map(|m| {
            let value = json_object_at(&body[m.end()..], pattern.followed_by);
            if value.is_some() {
                debug!("Player response matched {:?}", pattern.prefix.as_str());
            }
            value
        })
    })
}

/// Parse one JSON object from the start of `text`, ignoring whatever trails it
fn json_object_at(text: &str, followed_by: Option<&str>) -> Option<Value> {
    let mut stream = serde_json::Deserializer::from_str(text).into_iter::<Value>();
    let value = match stream.next()? {
        Ok(v) if v.is_object() => v,
        Ok(_) => return None,
        Err(e) => {
            debug!("Skipping unparseable player response candidate: {e}");
            return None;
        }
    };
    match followed_by {
        Some(sibling) if !text[stream.byte_offset()..].starts_with(sibling) => None,
        _ => Some(value),
    }
}

/// `ytplayer.config.args.player_response` holds the payload as a JSON string (or, rarely, an object)
fn config_player_response(config: &Value) -> Option<Value> {
    match config.pointer("/args/player_response")? {
        Value::String(s) => serde_json::from_str::<Value>(s).ok().filter(Value::is_object),
        other if other.is_object() => Some(other.clone()),
        _ => None,
    }
}
