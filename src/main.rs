use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use eyre::{Result, bail};
use log::{debug, info};

mod cli;

use cli::{Cli, OutputFormat};
use ytclip::fetch::HttpFetcher;
use ytclip::notify::{Notice, notify};
use ytclip::page::WaitOptions;
use ytclip::pipeline::{Extractor, PageSource, Settings};
use ytclip::strategy::Strategy;
use ytclip::youtube::InnerTube;

const CLIPBOARD_PROGRAMS: &[&str] = &["pbcopy", "clip", "wl-copy", "xclip", "xsel"];

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytclip.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytclip")
        .join("logs")
}

fn find_on_path(name: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .flat_map(|dir| [dir.join(name), dir.join(format!("{name}.exe"))])
        .find(|candidate| candidate.is_file())
}

fn build_after_help() -> String {
    let lines = CLIPBOARD_PROGRAMS
        .iter()
        .filter_map(|name| find_on_path(name).map(|p| format!("  \x1b[32m✅\x1b[0m {name:<9} {}", p.display())))
        .collect::<Vec<_>>();

    let clipboard = if lines.is_empty() {
        "  \x1b[31m❌\x1b[0m none found (use --stdout, --output or clipboard_command in the config)".to_string()
    } else {
        lines.join("\n")
    };

    let log_path = log_dir().join("ytclip.log");
    let config_path = ytclip::config::config_path();

    format!(
        "\nCLIPBOARD PROGRAMS:\n{clipboard}\n\nConfig is read from: {}\nLogs are written to: {}",
        config_path.display(),
        log_path.display()
    )
}

fn read_url(cli: &Cli) -> Result<String> {
    if let Some(ref url) = cli.url {
        return Ok(url.trim().to_string());
    }
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if !line.trim().is_empty() {
            return Ok(line.trim().to_string());
        }
    }
    bail!("no URL provided\n\nUsage: ytclip <URL>\n       echo <URL> | ytclip");
}

fn settings(cli: &Cli, config: &ytclip::config::Config) -> Settings {
    let strategy = cli.strategy.map(Strategy::from).or_else(|| {
        config
            .default_strategy
            .as_deref()
            .and_then(|s| s.parse::<Strategy>().map_err(|e| debug!("Config default_strategy: {e}")).ok())
    });

    let mut wait = WaitOptions::default();
    if let Some(ms) = cli.timeout.or(config.element_timeout_ms) {
        wait.timeout = Duration::from_millis(ms);
    }

    Settings {
        strategy,
        lang: cli
            .lang
            .clone()
            .or_else(|| config.default_lang.clone())
            .unwrap_or_else(|| "en".to_string()),
        wait,
    }
}

async fn deliver(cli: &Cli, config: &ytclip::config::Config) -> Result<Notice> {
    let url = read_url(cli)?;

    let source = match cli.html {
        Some(ref path) => PageSource::Html(std::fs::read_to_string(path)?),
        None => PageSource::Fetch,
    };

    let mut globals = Vec::new();
    if let Some(ref path) = cli.player_response {
        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        globals.push((ytclip::payload::PLAYER_RESPONSE_GLOBAL.to_string(), value));
    }

    let settings = settings(cli, config);
    if cli.verbose {
        let strategy = settings.strategy.map(|s| s.to_string()).unwrap_or_else(|| "auto".to_string());
        eprintln!("Strategy: {strategy}\nLanguage: {}", settings.lang);
    }

    let client = reqwest::Client::new();
    let api = InnerTube::new(HttpFetcher::new(client.clone()), client.clone());
    let extractor = Extractor::new(HttpFetcher::new(client), api, settings);
    let extraction = extractor.run(&url, source, globals).await?;

    if cli.verbose {
        eprintln!(
            "Video: {}\nLanguage: {}\nType: {}\nSegments: {}",
            extraction.title,
            extraction.transcript.language,
            extraction.transcript.source_type,
            extraction.transcript.segments.len(),
        );
    }

    let format = cli
        .format
        .or_else(|| {
            config
                .default_format
                .as_deref()
                .and_then(|f| OutputFormat::from_str(f, true).ok())
        })
        .unwrap_or(OutputFormat::Structured);

    let rendered = match format {
        OutputFormat::Structured => ytclip::output::render_structured(&extraction, chrono::Local::now()),
        OutputFormat::Prompt => ytclip::output::render_prompt(
            &extraction,
            config
                .prompt_template
                .as_deref()
                .unwrap_or(ytclip::output::DEFAULT_PROMPT_TEMPLATE),
        ),
        OutputFormat::Json => ytclip::output::render_json(&extraction),
    };

    let destination = if let Some(ref path) = cli.output {
        std::fs::write(path, &rendered)?;
        format!("written to {}", path.display())
    } else if cli.stdout {
        println!("{rendered}");
        "written to stdout".to_string()
    } else {
        ytclip::clipboard::copy(&rendered, config.clipboard_command.as_deref())?;
        "copied to clipboard".to_string()
    };

    Ok(Notice::delivered(&extraction, &destination))
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = ytclip::config::Config::load().unwrap_or_default();

    if cli.verbose {
        let config_path = ytclip::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
    }

    match deliver(&cli, &config).await {
        Ok(notice) => {
            notify(&notice);
            Ok(())
        }
        Err(e) => {
            notify(&Notice::error(e.to_string()));
            std::process::exit(1);
        }
    }
}
