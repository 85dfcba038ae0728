mod app;
mod command;
mod config;
mod constants;
mod engine;
mod error;
mod mail;
mod ui;

use anyhow::Result;
use std::env;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::Session;
use crate::config::Config;
use crate::engine::spawn_inbox_engine;
use crate::mail::HttpMailService;

fn setup_logging() {
    use std::fs::OpenOptions;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("debug,inbox_sync=debug"));

    // stdout belongs to the prompt, so logs go to a file in the config directory
    let log_file = Config::config_dir()
        .ok()
        .map(|dir| dir.join("inbox-sync.log"))
        .and_then(|path| {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .ok()
        });

    if let Some(file) = log_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        // Fallback to stderr if file logging fails
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_usage() {
    eprintln!(
        r#"inbox-sync - Keep a paged mailbox listing in sync with a mail service

Usage: inbox-sync [command]

Commands:
    (none)      Start the interactive inbox
    init        Write a default configuration file
    help        Show this help message

Configuration file: ~/.config/inbox-sync/config.toml
"#
    );
}

fn run_init() -> Result<()> {
    let path = Config::config_path()?;
    if path.exists() {
        println!("Configuration already exists at {}", path.display());
        return Ok(());
    }
    Config::default().save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some("init") => run_init(),
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            std::process::exit(1);
        }
        None => {
            let config = Config::load()?;
            config.ensure_dirs()?;
            setup_logging();
            tracing::info!("Using mail service at {}", config.service.base_url);

            let service =
                HttpMailService::new(&config.service.base_url, config.request_timeout())?;
            let handle = spawn_inbox_engine(Arc::new(service), config.engine_settings());
            Session::new(handle).run().await
        }
    }
}
