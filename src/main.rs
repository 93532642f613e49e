use anyhow::Result;
use async_std::task;
use clap::Parser;

use cookieswap::cli::{self, Cli};
use cookieswap::config::{AppConfig, set_config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The config may carry the log level, but its fallback warning needs logging up first
    let loaded = cli.config.as_deref().map(AppConfig::load);
    let config_level = match &loaded {
        Some(Ok(cfg)) => cfg.log_level.clone(),
        _ => None,
    };
    init_logging(cli.log_level.as_deref().or(config_level.as_deref()).unwrap_or("info"));

    if let Some(loaded) = loaded {
        set_config(loaded.unwrap_or_else(AppConfig::fall_back));
    }

    task::block_on(cli::run(cli))
}

fn init_logging(level: &str) {
    let level = level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}
