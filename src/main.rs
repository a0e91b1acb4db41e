use clap::Parser;

mod app;
mod chat;
mod cli;
mod commands;
mod config;
mod core;
mod display;
mod input;
mod providers;
mod utils;

use crate::app::Application;
use crate::cli::Args;
use crate::commands::create_command_registry;
use crate::config::Config;

#[tokio::main]
async fn main() {
    // Logs go to stderr so they never interleave with the transcript
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            display::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let app = Application::new(args, config, create_command_registry());

    if let Err(e) = app.run().await {
        display::display_error(&e.to_string());
        std::process::exit(1);
    }
}
