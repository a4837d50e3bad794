//! Omaha watch face host runtime
//!
//! Runs the weather loop against the real network with a simulated
//! location service, printing what the face would show.

mod runtime;

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use omaha_drivers::clock::SystemClock;
use omaha_drivers::config::HostConfig;
use omaha_drivers::network::HttpNetworkClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

use runtime::Runtime;

#[derive(Debug, Parser)]
#[command(name = "omahawatch")]
#[command(about = "Periodic location and weather refresh for the Omaha watch face")]
struct Cli {
    /// TOML configuration file; built-in defaults when absent
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log filter, overriding RUST_LOG (e.g. "debug" or "omaha_core=trace")
    #[arg(long = "log-level")]
    log_level: Option<String>,
    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<HostConfig> {
    match path {
        Some(path) => HostConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => {
            let config = HostConfig::default();
            config.validate().context("validating default configuration")?;
            Ok(config)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let config = load_config(cli.config.as_ref())?;
    let network = HttpNetworkClient::new(config.network.proxy.as_deref())
        .context("building http client")?;
    let clock = SystemClock::new();

    let mut runtime = Runtime::new(&config, network, clock);
    runtime.start();
    info!(
        refresh_s = config.station.refresh_interval_s,
        tick_ms = config.tick_interval_ms,
        "omahawatch running"
    );

    let period = Duration::from_millis(config.tick_interval_ms);
    let mut ticks = 0u64;
    while cli.ticks.map_or(true, |limit| ticks < limit) {
        thread::sleep(period);
        runtime.step();
        ticks += 1;
    }

    info!(
        ticks,
        phase = ?runtime.phase(),
        errors = runtime.station().errors().len(),
        "tick limit reached, exiting"
    );
    Ok(())
}
