//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tutor")]
#[command(about = "Socratic writing tutor: score, coach, revise, reflect", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Load configuration from this YAML file instead of .tutor/config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive tutoring session
    Session(SessionArgs),

    /// Show the rubric dimensions and score anchors
    Rubric,

    /// Print the effective configuration
    Config,
}

#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionArgs {
    /// Read the first essay from a file instead of the terminal
    #[arg(short, long)]
    pub essay: Option<PathBuf>,

    /// Write the session as JSON when it ends
    #[arg(long)]
    pub export: bool,

    /// Seed for phrase selection, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,
}
