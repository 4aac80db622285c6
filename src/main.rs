// src/main.rs - Operator console for remote printer sessions
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use printdeck::config::{self, Config};
use printdeck::console::{self, ConsoleCommand, RefreshTarget};
use printdeck::{ControllerOptions, HttpPrinterService, SessionController};

const DEFAULT_CONFIG_PATH: &str = "printdeck.toml";

#[derive(Debug, Parser)]
#[command(name = "printdeck", version, about = "Supervise remote 3D-printer sessions")]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<String>,
    /// Printer service base URL, overrides the config file
    #[arg(short, long)]
    server: Option<String>,
    /// Status poll interval in milliseconds, overrides the config file
    #[arg(long)]
    poll_interval_ms: Option<u64>,
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn resolve_config(args: &Args) -> Result<Config, config::ConfigError> {
    let mut config = match &args.config {
        Some(path) => config::load_config(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => config::load_config(DEFAULT_CONFIG_PATH)?,
        None => Config::default(),
    };
    if let Some(server) = &args.server {
        config.server.base_url = server.clone();
    }
    if let Some(ms) = args.poll_interval_ms {
        config.poller.interval_ms = ms;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting printdeck operator console");

    let config = resolve_config(&args).map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        Box::new(e) as Box<dyn std::error::Error + Send + Sync + 'static>
    })?;

    tracing::info!("Printer service: {}", config.server.base_url);
    tracing::info!("Status poll interval: {} ms", config.poller.interval_ms);

    let service = HttpPrinterService::new(config.server.base_url.clone(), config.request_timeout())?;
    let mut controller = SessionController::start(
        Arc::new(service),
        ControllerOptions {
            poll_interval: config.poll_interval(),
            load_lists_on_start: true,
        },
    );

    // Let the mount-time fetches land before the first prompt.
    tokio::time::sleep(Duration::from_millis(200)).await;
    println!("{}", console::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else { break };
        let cmd = match ConsoleCommand::parse(&line) {
            Ok(cmd) => cmd,
            Err(console::ParseError::Empty) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        match cmd {
            ConsoleCommand::Quit => break,
            ConsoleCommand::Help => println!("{}", console::HELP),
            ConsoleCommand::Status => println!("{}", console::render_view(&controller.view().await)),
            ConsoleCommand::Sessions => {
                let view = controller.sessions().view().await;
                println!("{}", console::render_sessions(&view, controller.current_session().as_ref()));
            }
            ConsoleCommand::Files => println!("{}", console::render_files(&controller.files().view().await)),
            ConsoleCommand::Refresh(target) => {
                if matches!(target, RefreshTarget::All | RefreshTarget::Status) {
                    controller.refresh_status();
                }
                if matches!(target, RefreshTarget::All | RefreshTarget::Sessions) {
                    let _ = controller.refresh_sessions().await;
                    let view = controller.sessions().view().await;
                    println!("{}", console::render_sessions(&view, controller.current_session().as_ref()));
                }
                if matches!(target, RefreshTarget::All | RefreshTarget::Files) {
                    let _ = controller.refresh_files().await;
                    println!("{}", console::render_files(&controller.files().view().await));
                }
            }
            ConsoleCommand::Select(id) => {
                controller.select_session(id.clone());
                println!("Selected session: {}", id);
            }
            ConsoleCommand::Send(command) => {
                match console::until_interrupted(controller.dispatch(command), tokio::signal::ctrl_c()).await {
                    Some(outcome) => println!("{}", console::render_outcome(&outcome)),
                    None => break,
                }
            }
        }
    }

    controller.shutdown().await;
    tracing::info!("Goodbye");
    Ok(())
}
