//! Socratic Tutor CLI entry point.

use anyhow::Result;
use clap::Parser;

use socratic_tutor::cli::{commands, handle_error, Cli, Commands};
use socratic_tutor::infrastructure::logging::LoggerImpl;
use socratic_tutor::ConfigLoader;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli.command, cli.config.as_deref(), cli.json).await {
        handle_error(err, cli.json);
    }
}

async fn run(command: Commands, config_file: Option<&std::path::Path>, json: bool) -> Result<()> {
    let config = match config_file {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    // Guard flushes the file appender on drop.
    let _logger = LoggerImpl::init(&config.logging)?;

    match command {
        Commands::Session(args) => commands::session::execute(args, &config, json).await,
        Commands::Rubric => commands::rubric::execute(&config, json),
        Commands::Config => commands::config::execute(&config, json),
    }
}
