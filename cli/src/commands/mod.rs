//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod demo;
pub mod order;

/// Export format for meeting minutes
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportArg {
    /// Markdown minutes
    Markdown,
    /// CSV event rows
    Csv,
}

/// CLI arguments for stackline
#[derive(Parser, Debug)]
#[command(name = "stackline")]
#[command(author, version, about = "Meeting facilitation - priority stacks and consensus decisions")]
#[command(long_about = r#"
Stackline keeps a prioritized speaking queue (the "stack") and resolves
group proposals by consensus.

Queue ordering, highest first:
1. Points (process, information, clarification)
2. Direct responses to the current speaker
3. Progressive-stack boosts (invite tags, fresh voices), when enabled
4. First in, first out

Configuration files are loaded from (in priority order):
1. STACKLINE_* environment variables
2. --config <path>     Explicit config file
3. ./stackline.toml    Project-level config

Example:
  stackline demo
  stackline demo --export csv
  stackline order stack.json
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a scripted meeting through the full facilitation flow
    Demo(DemoArgs),
    /// Order a queue described in a JSON file and explain each position
    Order(OrderArgs),
}

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Print the meeting minutes at the end in this format
    #[arg(short, long, value_enum, default_value = "markdown")]
    pub export: ExportArg,

    /// Write meeting events to this JSONL file (overrides the configured
    /// path)
    #[arg(long, value_name = "PATH")]
    pub event_log: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct OrderArgs {
    /// JSON file describing the queue (see `order --help`)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}
