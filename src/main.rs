//! hierarchy-repair CLI entry point.

use anyhow::{Context, Result};
use clap::Parser;

use hierarchy_repair::cli::{commands, handle_error, Cli, Commands};
use hierarchy_repair::infrastructure::config::ConfigLoader;
use hierarchy_repair::infrastructure::logging::{LogConfig, LoggerImpl};
use hierarchy_repair::Config;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.json;

    if let Err(err) = run(cli).await {
        handle_error(err, json_mode);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let _logger = LoggerImpl::init(&LogConfig::from(&config.logging)).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Init(args) => commands::init::execute(args, &config, cli.json).await,
        Commands::Repair(args) => commands::repair::execute(args, &config, cli.json).await,
        Commands::Audit(args) => commands::audit::execute(args, &config, cli.json).await,
        Commands::Status => commands::status::execute(&config, cli.json).await,
        Commands::Spans(args) => commands::spans::execute(args, &config, cli.json).await,
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    if let Some(database) = &cli.database {
        config.database.path.clone_from(database);
    }
    Ok(config)
}
