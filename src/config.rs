use std::path::PathBuf;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub default_lang: Option<String>,
    pub default_format: Option<String>,
    pub default_strategy: Option<String>,
    pub element_timeout_ms: Option<u64>,
    pub clipboard_command: Option<String>,
    pub prompt_template: Option<String>,
}

impl Config {
    /// Load config from ~/.config/ytclip/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytclip")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
default_lang = "es"
default_format = "prompt"
default_strategy = "payload"
element_timeout_ms = 5000
clipboard_command = "xclip -selection clipboard"
prompt_template = "Summarize {title}: {transcript}"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_lang.as_deref(), Some("es"));
        assert_eq!(config.default_format.as_deref(), Some("prompt"));
        assert_eq!(config.default_strategy.as_deref(), Some("payload"));
        assert_eq!(config.element_timeout_ms, Some(5000));
        assert_eq!(config.clipboard_command.as_deref(), Some("xclip -selection clipboard"));
        assert_eq!(config.prompt_template.as_deref(), Some("Summarize {title}: {transcript}"));
    }

    #[test]
    fn test_parse_empty_config() {
        let toml_str = "";
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!(config.default_lang.is_none());
        assert!(config.default_format.is_none());
        assert!(config.element_timeout_ms.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"default_lang = "fr""#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_lang.as_deref(), Some("fr"));
        assert!(config.default_strategy.is_none());
    }
}
