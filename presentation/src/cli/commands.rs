//! CLI command definitions

use clap::Parser;
use council_application::CouncilSelection;
use council_domain::OutputFormat;
use std::path::PathBuf;

/// CLI arguments for llm-council
#[derive(Parser, Debug)]
#[command(name = "llm-council")]
#[command(author, version, about = "LLM Council - Multiple LLMs answer, peer-rank each other, and a chairman synthesizes")]
#[command(long_about = r#"
LLM Council asks several models the same question and combines their answers.

The process has three stages:
1. Individual Responses: every council member answers independently, in parallel
2. Peer Ranking: members rank each other's answers with the authors hidden
3. Chairman Synthesis: the chairman writes one answer from the responses and ranking

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./council.toml      Project-level config
3. ~/.config/llm-council/config.toml   Global config
4. LLM_COUNCIL_* environment variables

Example:
  llm-council "What is the best database for real-time apps?"
  llm-council --tier budget "Explain CRDTs in two paragraphs"
  llm-council -m openai/gpt-5.2 -m x-ai/grok-4 --chairman openai/gpt-5.2 "Tabs or spaces?"
"#)]
pub struct Cli {
    /// The question to ask the council
    pub question: Option<String>,

    /// Cost tier: budget, balanced or premium
    #[arg(short, long, value_name = "TIER")]
    pub tier: Option<String>,

    /// Models to include in the council (can be specified multiple times)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Vec<String>,

    /// Model that writes the final synthesis
    #[arg(long, value_name = "MODEL")]
    pub chairman: Option<String>,

    /// Output format: synthesis, full or json
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Shorthand for `--output json`
    #[arg(long, conflicts_with = "output")]
    pub json: bool,

    /// Use the built-in tier lineups instead of querying the model catalog
    #[arg(long)]
    pub no_discovery: bool,

    /// Show the tier lineups and exit
    #[arg(long)]
    pub show_models: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Output format from flags, then config, then the default
    pub fn output_format(&self, configured: Option<OutputFormat>) -> OutputFormat {
        if self.json {
            return OutputFormat::Json;
        }
        self.output.or(configured).unwrap_or_default()
    }

    /// Apply command-line overrides on top of the configured selection
    pub fn apply_to(&self, mut selection: CouncilSelection) -> CouncilSelection {
        if let Some(tier) = &self.tier {
            selection.tier = Some(tier.clone());
        }
        if !self.model.is_empty() {
            selection.models = self.model.clone();
        }
        if let Some(chairman) = &self.chairman {
            selection.chairman = Some(chairman.clone());
        }
        if self.no_discovery {
            selection.dynamic_discovery = false;
        }
        selection
    }

    /// Default tracing filter for the verbosity level
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Progress bars are only drawn for human-readable output
    pub fn show_progress(&self, format: OutputFormat) -> bool {
        !self.quiet && format != OutputFormat::Json
    }
}
