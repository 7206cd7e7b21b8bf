//! Loading configuration from JSON files on disk.
//!
//! The tests share one scratch path under the system temp directory, so they
//! run serially.
use std::fs;
use std::path::PathBuf;

use anyhow::{ensure, Result};
use limpet::config::{ConfigError, ConfigLoadError, LimpetConfig};
use limpet::scenario::ScenarioKind;
use limpet::FixedStep;
use rstest::rstest;
use serial_test::serial;

fn scratch_path() -> PathBuf {
    std::env::temp_dir().join(format!("limpet-config-{}.json", std::process::id()))
}

fn write_config(json: &str) -> Result<PathBuf> {
    let path = scratch_path();
    fs::write(&path, json)?;
    Ok(path)
}

#[rstest]
#[serial]
fn partial_file_keeps_defaults_for_missing_fields() -> Result<()> {
    let path = write_config(
        r#"{
            "body": { "move_speed": 7.5 },
            "agent": { "detection": { "detect_distance": 4.0 } }
        }"#,
    )?;
    let config = LimpetConfig::from_path(&path)?;
    let defaults = LimpetConfig::default();
    ensure!(config.body.move_speed == 7.5);
    ensure!(config.body.gravity_strength == defaults.body.gravity_strength);
    ensure!(config.agent.detection.detect_distance == 4.0);
    ensure!(config.camera == defaults.camera);
    fs::remove_file(path)?;
    Ok(())
}

#[rstest]
#[serial]
fn invalid_values_are_rejected_with_the_field_name() -> Result<()> {
    let path = write_config(r#"{ "camera": { "min_pitch": 50.0, "max_pitch": 10.0 } }"#)?;
    let err = LimpetConfig::from_path(&path).err();
    fs::remove_file(path)?;
    ensure!(
        matches!(
            err,
            Some(ConfigLoadError::Invalid(ConfigError::InvertedRange { field: "pitch", .. }))
        ),
        "unexpected result {err:?}"
    );
    Ok(())
}

#[rstest]
#[serial]
fn malformed_json_is_a_parse_error() -> Result<()> {
    let path = write_config("{ body: ")?;
    let err = LimpetConfig::from_path(&path).err();
    fs::remove_file(path)?;
    ensure!(matches!(err, Some(ConfigLoadError::Parse(_))), "unexpected result {err:?}");
    Ok(())
}

#[rstest]
#[serial]
fn missing_file_reports_its_path() -> Result<()> {
    let path = scratch_path().with_extension("absent");
    let err = LimpetConfig::from_path(&path).err();
    let Some(ConfigLoadError::Io { path: reported, .. }) = &err else {
        anyhow::bail!("expected an I/O error, got {err:?}");
    };
    ensure!(*reported == path);
    Ok(())
}

#[rstest]
#[serial]
fn loaded_config_drives_a_scenario() -> Result<()> {
    let path = write_config(r#"{ "body": { "move_speed": 0.0 } }"#)?;
    let config = LimpetConfig::from_path(&path)?;
    fs::remove_file(path)?;
    let summary = ScenarioKind::Floor.run(config, &FixedStep::default(), 60)?;
    // A body that cannot walk stays at its spawn.
    ensure!(summary.body_position[0].abs() < 1e-4);
    ensure!(summary.body_position[2].abs() < 1e-4);
    Ok(())
}
