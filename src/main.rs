//! vrinteract - pointer-ray interaction for VR instruction panels
//!
//! Headless driver: runs the instruction interface against a scripted
//! controller and writes the interaction events as JSON lines.

mod config;
mod headless;
mod scripted_input;

use anyhow::Result;
use clap::Parser;
use config::{InterfaceConfig, DEFAULT_CONFIG_PATH};
use headless::HeadlessConfig;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless VR instruction-panel session", long_about = None)]
struct Args {
    /// Interface configuration (TOML)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Controller pose script (JSON); without one the pointer presses Next
    #[arg(long)]
    script: Option<PathBuf>,

    /// Write interaction events to this JSONL file
    #[arg(long)]
    event_log: Option<PathBuf>,

    /// Stop after this many ticks (overrides the config)
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Write the effective configuration to the config path and exit
    #[arg(long)]
    write_config: bool,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting vrinteract v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let interface = InterfaceConfig::load_from_path(&args.config);

    if args.write_config {
        interface.save_to_path(&args.config)?;
        println!("wrote {}", args.config.display());
        return Ok(());
    }

    let summary = headless::run(HeadlessConfig {
        interface,
        script: args.script,
        event_log: args.event_log,
        max_ticks: args.max_ticks,
        label: args.config.display().to_string(),
    })?;

    info!(
        ticks = summary.ticks,
        clicks = summary.clicks,
        page = summary.page,
        completed = summary.completed,
        collision_ticks = summary.collision_ticks,
        events = summary.events,
        "session finished"
    );
    println!(
        "{} after {} ticks: {} clicks, page {}, {} events",
        if summary.completed { "completed" } else { "stopped" },
        summary.ticks,
        summary.clicks,
        summary.page + 1,
        summary.events
    );
    Ok(())
}
