//! Topicwise: diversity-aware topic planning server.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use topicwise_core::TopicwiseConfig;
use topicwise_server::{build_router, cli, AppState};

fn resolve_data_dir() -> PathBuf {
    std::env::var("TOPICWISE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

fn parse_arg<T: std::str::FromStr>(args: &[String], index: usize, default: T) -> anyhow::Result<T> {
    match args.get(index) {
        Some(raw) => raw
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid number: {}", raw)),
        None => Ok(default),
    }
}

fn open_state() -> anyhow::Result<AppState> {
    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());
    let config = TopicwiseConfig::from_env(&data_dir)?;
    AppState::open(config).map_err(|e| anyhow::anyhow!("Failed to open history: {}", e))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "report" => {
                let export = args[2..].iter().any(|a| a == "--export");
                let args: Vec<String> = args.iter().filter(|a| *a != "--export").cloned().collect();
                let state = open_state()?;
                let days = parse_arg(&args, 2, state.config.diversity.lookback_days)?;
                let mut rng = rand::thread_rng();
                print!("{}", cli::diversity_report(&state, days, &mut rng)?);
                if export {
                    let path = cli::export_report(&state, days, &mut rng)?;
                    println!("\nReport exported to {}", path.display());
                }
                return Ok(());
            }
            "calendar" => {
                let state = open_state()?;
                let days = parse_arg(&args, 2, 7usize)?;
                let per_day = parse_arg(&args, 3, 1usize)?;
                let mut rng = rand::thread_rng();
                print!("{}", cli::calendar(&state, days, per_day, &mut rng)?);
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("Topicwise: diversity-aware topic planning");
                println!();
                println!("Usage: topicwise [command]");
                println!();
                println!("Commands:");
                println!("  (none)                     Start the server");
                println!("  report [days] [--export]   Print a diversity report, optionally saving JSON");
                println!("  calendar [days] [per-day]  Print a content calendar");
                println!("  help                       Show this help message");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'topicwise help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let state = Arc::new(open_state()?);
    let port = state.config.port;
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Topicwise server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
