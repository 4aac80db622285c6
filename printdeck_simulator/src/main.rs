// printdeck-sim: serve a simulated printer service for local use
use std::time::Duration;

use clap::Parser;
use printdeck_simulator::printer::seed_files;
use printdeck_simulator::{create_router, SimConfig, SimState};

#[derive(Debug, Parser)]
#[command(name = "printdeck-sim", version, about = "Simulated remote printer service")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,
    /// Session id to expose (repeatable)
    #[arg(short, long = "session")]
    sessions: Vec<String>,
    /// Number of gcode files to seed
    #[arg(short, long, default_value_t = 10)]
    files: usize,
    /// Seconds a print, homing or level test keeps the printer busy
    #[arg(long, default_value_t = 30)]
    job_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    let sessions = if args.sessions.is_empty() {
        vec![uuid::Uuid::new_v4().to_string()]
    } else {
        args.sessions
    };
    tracing::info!("Sessions: {}", sessions.join(", "));

    let config = SimConfig {
        sessions,
        files: seed_files(args.files),
        job_duration: Duration::from_secs(args.job_secs),
    };
    let app = create_router(SimState::new(config));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port)).await?;
    tracing::info!("Simulated printer service listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
