use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use risklens_core::projections::{active_flag_count, peak_threat_day, primary_threat};
use risklens_core::{DashboardSnapshot, FetchConfig, FetchPhase, HttpReportSource, Session};
use tracing_subscriber::EnvFilter;

mod viewer;
#[cfg(test)]
mod viewer_tests;

#[derive(Debug, Parser)]
#[command(name = "risklens")]
#[command(about = "Security analytics dashboard for the RiskLens report service")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Report endpoint returning the analytics JSON payload.
    #[arg(long, default_value_t = FetchConfig::default().endpoint)]
    endpoint: String,

    #[arg(long, default_value_t = 8000)]
    timeout_ms: u64,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch one report and print the normalized snapshot.
    Fetch {
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
    /// Interactive dashboard.
    View,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
    Ndjson,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let config = FetchConfig {
        endpoint: cli.endpoint.clone(),
        request_timeout: Duration::from_millis(cli.timeout_ms),
    };

    let source = HttpReportSource::new(&config)?;
    let mut session = Session::new(source);

    match cli.command {
        Command::Fetch { format } => {
            session.load().await;
            if let FetchPhase::Failure(message) = session.phase() {
                anyhow::bail!("fetch failed: {message}");
            }
            if let Some(snapshot) = session.snapshot() {
                print_snapshot(snapshot, format)?;
            }
        }
        Command::View => {
            viewer::run_viewer(&mut session).await?;
        }
    }

    Ok(())
}

fn print_snapshot(snapshot: &DashboardSnapshot, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(snapshot)?);
        }
        OutputFormat::Ndjson => {
            println!("{}", serde_json::to_string(snapshot)?);
        }
        OutputFormat::Human => {
            println!("=== RiskLens Report ===");
            println!(
                "Model:      accuracy={} status={}",
                snapshot.model_performance.accuracy, snapshot.model_performance.status
            );
            println!(
                "Threats:    total={} primary={}",
                snapshot.threat_analytics.total_threat_count,
                primary_threat(&snapshot.threat_analytics)
            );
            if let Some((day, count)) = peak_threat_day(&snapshot.threat_analytics) {
                println!("Peak day:   {day} ({count} threats)");
            }
            println!(
                "Users:      {} active flags",
                active_flag_count(&snapshot.user_activity)
            );
            for user in &snapshot.user_activity {
                println!(
                    "  {:<12} events={:<4} last_active={}",
                    user.user_id, user.threat_events, user.last_active
                );
            }
        }
    }

    Ok(())
}
