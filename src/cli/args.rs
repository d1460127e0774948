//! CLI argument definitions.
//!
//! All Clap derive structs for `handcricket` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

// ============================================================================
// Root CLI
// ============================================================================

/// Hand-cricket match engine.
#[derive(Parser, Debug)]
#[command(name = "handcricket", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "HANDCRICKET_COLOR")]
    pub color: ColorChoice,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a scripted match from a scenario file.
    Simulate(SimulateArgs),

    /// Play an interactive match on the terminal.
    Play(PlayArgs),

    /// Validate scenario or engine-config files without running them.
    Validate(ValidateArgs),

    /// Display version information.
    Version(VersionArgs),
}

/// Arguments for `simulate`.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Path to the YAML scenario file.
    pub scenario: PathBuf,

    /// Path to an engine configuration file (defaults apply when omitted).
    #[arg(short, long, env = "HANDCRICKET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also record every event as JSONL to this file.
    #[arg(long)]
    pub events: Option<PathBuf>,

    /// Output format for the event stream.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for `play`.
#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Path to a YAML roster file (a scenario file; any actions in it are
    /// applied before the interactive session starts).
    pub roster: PathBuf,

    /// Path to an engine configuration file (defaults apply when omitted).
    #[arg(short, long, env = "HANDCRICKET_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// What the files are.
    #[arg(long, default_value = "scenario")]
    pub kind: FileKind,

    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Kind of file passed to `validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FileKind {
    /// Match scenario file.
    #[default]
    Scenario,
    /// Engine configuration file.
    EngineConfig,
}

// ============================================================================
// Tests
// ============================================================================
