use clap::Parser;
use std::path::PathBuf;

use ytclip::strategy::Strategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Structured,
    Prompt,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StrategyArg {
    Panel,
    Library,
    Payload,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Panel => Strategy::DomPanel,
            StrategyArg::Library => Strategy::LibraryFetch,
            StrategyArg::Payload => Strategy::PayloadSubtitle,
        }
    }
}

#[derive(Parser)]
#[command(
    name = "ytclip",
    about = "Copy a YouTube video's transcript to the clipboard",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// YouTube watch URL (reads the first line of stdin if omitted)
    pub url: Option<String>,

    /// Report format: structured (default), prompt, json
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Transcript source; tries payload, library, panel in turn if omitted
    #[arg(short, long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Preferred caption language
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Saved HTML of the rendered watch page, used instead of fetching the URL
    #[arg(long)]
    pub html: Option<PathBuf>,

    /// JSON dump of ytInitialPlayerResponse, exposed to extraction as the page global
    #[arg(long)]
    pub player_response: Option<PathBuf>,

    /// Timeout in milliseconds for every wait on page elements
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Print the report instead of copying it
    #[arg(long)]
    pub stdout: bool,

    /// Write the report to a file instead of copying it
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show extraction method and metadata
    #[arg(short, long)]
    pub verbose: bool,
}
