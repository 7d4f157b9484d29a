//! meterboard - Water usage dashboard with period-switching charts

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use meterboard_core::{
    ChartBinding, NotificationCenter, Period, SyntheticUsageSource, UsagePeriodController,
    UsageSource,
};
use meterboard_tui::{App, tui_registry};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

const CHART_ID: &str = "usage-chart";

#[derive(Parser)]
#[command(
    name = "meterboard",
    version,
    about = "Water usage dashboard",
    long_about = "A terminal dashboard for water meter usage.\n\
                  \n\
                  Shows hourly, daily, and monthly usage charts with live period\n\
                  switching. Data is synthetic until a backend source is wired in.\n\
                  \n\
                  Keys:\n\
                    d / w / m    switch to day / week / month\n\
                    q            quit\n\
                  \n\
                  Environment Variables:\n\
                    METERBOARD_METER_ID      Meter to display\n\
                    METERBOARD_SEED          Seed for reproducible synthetic data\n\
                    METERBOARD_LATENCY_MS    Simulated fetch latency\n\
                    METERBOARD_LOG           Log level filter"
)]
struct Cli {
    #[command(subcommand)]
    mode: Option<Mode>,

    /// Meter to display
    #[arg(long, default_value = "MTR-001", env = "METERBOARD_METER_ID")]
    meter_id: String,

    /// Seed for reproducible synthetic data (default: OS entropy)
    #[arg(long, env = "METERBOARD_SEED")]
    seed: Option<u64>,

    /// Simulated fetch latency in milliseconds
    #[arg(long, default_value_t = 500, env = "METERBOARD_LATENCY_MS")]
    latency_ms: u64,

    /// Initial chart kind (line|bar)
    #[arg(long, default_value = "line")]
    chart_kind: String,

    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, default_value = "warn", env = "METERBOARD_LOG")]
    log_level: String,
}

#[derive(Subcommand)]
enum Mode {
    /// Run the TUI dashboard (default)
    Tui,
    /// Print one period's descriptor as JSON and exit
    Sample {
        /// Period to sample (day|week|month)
        #[arg(default_value = "day")]
        period: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();
    let mode = cli.mode.take().unwrap_or(Mode::Tui);

    // Logs go to stderr so they do not fight the TUI on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let latency = Duration::from_millis(cli.latency_ms);
    let source = match cli.seed {
        Some(seed) => SyntheticUsageSource::with_seed(seed).with_latency(latency),
        None => SyntheticUsageSource::new().with_latency(latency),
    };
    let source = Arc::new(source);

    match mode {
        Mode::Tui => run_tui(&cli, source).await,
        Mode::Sample { period } => run_sample(&cli, source, &period).await,
    }
}

async fn run_tui(cli: &Cli, source: Arc<SyntheticUsageSource>) -> Result<()> {
    let notifications = Arc::new(NotificationCenter::new());
    let (engine, registry) = tui_registry();
    let controller = Arc::new(UsagePeriodController::new(registry, source.clone()));

    // Initial render from an embedded-manifest style binding
    let initial = source
        .fetch_usage(&cli.meter_id, Period::Day)
        .await
        .context("Failed to load initial usage data")?;
    let binding = ChartBinding {
        chart_id: CHART_ID.to_string(),
        kind: cli.chart_kind.clone(),
        data: serde_json::to_value(&initial)?,
        meter_id: Some(cli.meter_id.clone()),
    };

    let report = controller.initialize_charts(&[binding]);
    for error in &report.errors {
        warn!(chart_id = %error.chart_id, message = %error.message, "Chart skipped");
    }
    anyhow::ensure!(
        report.charts_initialized > 0,
        "No charts could be initialized"
    );

    let mut app = App::new(
        controller,
        engine,
        notifications,
        CHART_ID,
        cli.meter_id.clone(),
    );
    meterboard_tui::run(&mut app).await
}

async fn run_sample(cli: &Cli, source: Arc<SyntheticUsageSource>, period: &str) -> Result<()> {
    let period: Period = period.parse()?;
    let descriptor = source.fetch_usage(&cli.meter_id, period).await?;
    println!("{}", serde_json::to_string_pretty(&descriptor)?);
    Ok(())
}
