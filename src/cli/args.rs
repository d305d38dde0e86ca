//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    budget::BudgetCommands, calc::CalcArgs, completions::CompletionsArgs, config::ConfigCommands,
    form::FormArgs, rate::RateArgs,
};

#[derive(Parser)]
#[command(name = "orca")]
#[command(author, version, about = "Orca budget pricing toolkit")]
#[command(long_about = "Price freelance production jobs: sum labor, gear and extra costs, then gross up for margin and tax.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Price a job from cost and markup values
    Calc(CalcArgs),

    /// Recalculate a saved form snapshot
    Form(FormArgs),

    /// Budget documents (new, show, print, summary)
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Size an hourly rate from a monthly goal
    Rate(RateArgs),

    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// JSON format (for programming)
    Json,
    /// Tab-separated values (for piping)
    Tsv,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}

impl OutputFormat {
    /// Resolve `auto` against a configured default format name
    pub fn or_default(self, configured: Option<&str>) -> Self {
        if self != OutputFormat::Auto {
            return self;
        }
        configured
            .and_then(|name| OutputFormat::from_str(name, true).ok())
            .unwrap_or(OutputFormat::Auto)
    }
}
