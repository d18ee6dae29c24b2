#![doc = include_str!("../README.md")]

mod app;

use app::commands;
use app::config::{AppConfig, CliArgs};
use app::telemetry::init_telemetry;
use clap::Parser;
use std::process::ExitCode;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = AppConfig::try_from(args)?;

    init_telemetry(config.log_json)?;

    if cfg!(debug_assertions) {
        tracing::debug!("Running with full config: {:#?}", config);
    }

    commands::run(config).await
}
