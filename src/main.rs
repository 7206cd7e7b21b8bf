//! Headless runner for the scripted demo scenarios.
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use limpet::config::LimpetConfig;
use limpet::init_logging;
use limpet::scenario::ScenarioKind;
use limpet::FixedStep;
use log::info;

/// Surface-walking locomotion and perception demo
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON configuration file; missing fields take defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Demo world to run
    #[arg(short, long, value_enum, default_value_t = ScenarioKind::Floor)]
    scenario: ScenarioKind,

    /// Number of fixed ticks to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Fixed tick rate in Hz
    #[arg(long, default_value_t = 60.0)]
    hz: f32,

    /// Write a JSON run summary to this path
    #[arg(short, long)]
    report: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> Result<LimpetConfig> {
    match path {
        Some(path) => LimpetConfig::from_path(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(LimpetConfig::default()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(args.config.as_ref())?;
    let clock = FixedStep::from_hz(args.hz).context("invalid --hz")?;
    info!(
        "running {} for {} ticks at {} Hz",
        args.scenario, args.ticks, args.hz
    );
    let summary = args
        .scenario
        .run(config, &clock, args.ticks)
        .context("building scenario")?;

    info!(
        "body ended at {:?} (grounded {}/{} ticks), peak alarm {}, {} transitions",
        summary.body_position,
        summary.grounded_ticks,
        summary.ticks,
        summary.peak_alarm,
        summary.alarm_transitions
    );
    for agent in &summary.agents {
        info!(
            "{} {} (charge {:.2}) at {:?}",
            agent.id, agent.level, agent.value, agent.position
        );
    }

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&summary).context("serialising run summary")?;
        fs::write(path, json)
            .with_context(|| format!("writing report to {}", path.display()))?;
        info!("report written to {}", path.display());
    }
    Ok(())
}
