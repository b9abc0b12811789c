//! CLI argument parsing for ideaflow

use crate::stats::Metric;
use crate::team::EffortScope;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "ideaflow")]
#[command(version)]
#[command(about = "Product lifecycle phase durations and cycle-time statistics", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML); defaults to the built-in configuration
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Enable debug tracing to stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Cycle time from parking-lot exit to done, per year and team
    CycleTime {
        /// Product-cycle dataset (JSON)
        dataset: PathBuf,

        /// Which ideas count, by number of contributing teams
        #[arg(long = "scope", value_enum)]
        scope: Option<EffortScope>,

        /// Statistic to highlight
        #[arg(long = "metric", value_enum)]
        metric: Option<Metric>,

        /// Year to compare (repeatable); defaults to the configured years
        #[arg(long = "year", value_name = "YEAR")]
        years: Vec<i32>,
    },

    /// Days spent in each lifecycle phase, per year and team
    Lifecycle {
        /// Product-cycle dataset (JSON)
        dataset: PathBuf,

        /// Statistic to plot
        #[arg(long = "metric", value_enum)]
        metric: Option<Metric>,

        /// Year to show (repeatable); defaults to the configured years
        #[arg(long = "year", value_name = "YEAR")]
        years: Vec<i32>,
    },

    /// Per-idea phase durations
    Phases {
        /// Product-cycle dataset (JSON)
        dataset: PathBuf,

        /// Only show the idea with this key
        #[arg(long = "idea", value_name = "KEY")]
        idea: Option<String>,
    },

    /// Sprint-goal success rate over recent sprints
    SprintGoals {
        /// Sprint-goals file (JSON)
        sprints: PathBuf,

        /// Team to chart; falls back to the first configured team
        #[arg(long = "team", value_name = "TEAM")]
        team: Option<String>,

        /// Number of most recent sprints
        #[arg(long = "lookback", value_name = "N")]
        lookback: Option<usize>,
    },

    /// Backlog composition by priority and UAT aging
    Backlog {
        /// Tracker snapshot (JSON)
        snapshot: PathBuf,

        /// Team key, or `all`
        #[arg(long = "team", value_name = "KEY")]
        team: Option<String>,
    },
}
