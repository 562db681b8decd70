//! Command line interface
//!
//! `generate` prints a program for the configured parameters with any
//! flags applied on top; `sync` prints the spindle speed and cutting speed
//! after reconciling an edit.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use polarmill_camtools::{ParameterEdit, ParameterStore, ProgramOptions};
use polarmill_core::{MillingDirection, ShapeKind};
use polarmill_settings::{default_config_path, Config};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    name = "polarmill",
    version,
    about = "G12.1 polar interpolation programs for polygons and flats"
)]
pub struct Cli {
    /// Config file (.toml or .json); defaults to the platform config file if present
    #[arg(long, global = true, env = "POLARMILL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the program for the current parameters
    Generate(GenerateCommand),
    /// Reconcile spindle speed and cutting speed for a tool
    Sync(SyncCommand),
}

/// Overrides for the configured machining parameters
#[derive(Args, Debug, Default)]
pub struct ParameterArgs {
    /// Shape: 6, 4, 2 or custom
    #[arg(long)]
    pub shape: Option<ShapeKind>,
    /// Side count for custom shapes
    #[arg(long)]
    pub sides: Option<u32>,
    /// Across-flats size S (mm)
    #[arg(short = 's', long)]
    pub across_flats: Option<f64>,
    /// Corner radius R (mm)
    #[arg(short = 'r', long)]
    pub corner_radius: Option<f64>,
    /// Depth of cut (mm)
    #[arg(long)]
    pub depth: Option<f64>,
    /// Tool diameter D (mm)
    #[arg(short = 'd', long)]
    pub tool_diameter: Option<f64>,
    /// Flute count Z
    #[arg(short = 'z', long)]
    pub flutes: Option<u32>,
    /// climb or conventional
    #[arg(long)]
    pub direction: Option<MillingDirection>,
    /// Spindle speed (RPM); cutting speed follows
    #[arg(long, conflicts_with = "vc")]
    pub rpm: Option<u32>,
    /// Cutting speed Vc (m/min); spindle speed follows
    #[arg(long)]
    pub vc: Option<f64>,
    /// Feed per tooth Fz (mm)
    #[arg(long)]
    pub fz: Option<f64>,
}

impl ParameterArgs {
    /// Flags as edits, in the order an operator would enter them
    pub fn edits(&self) -> Vec<ParameterEdit> {
        let mut edits = Vec::new();
        if let Some(shape) = self.shape {
            edits.push(ParameterEdit::Shape(shape));
        }
        if let Some(sides) = self.sides {
            edits.push(ParameterEdit::Sides(sides));
        }
        if let Some(value) = self.across_flats {
            edits.push(ParameterEdit::AcrossFlats(value));
        }
        if let Some(value) = self.corner_radius {
            edits.push(ParameterEdit::CornerRadius(value));
        }
        if let Some(value) = self.depth {
            edits.push(ParameterEdit::Depth(value));
        }
        if let Some(value) = self.tool_diameter {
            edits.push(ParameterEdit::ToolDiameter(value));
        }
        if let Some(value) = self.flutes {
            edits.push(ParameterEdit::FluteCount(value));
        }
        if let Some(direction) = self.direction {
            edits.push(ParameterEdit::Direction(direction));
        }
        if let Some(rpm) = self.rpm {
            edits.push(ParameterEdit::SpindleRpm(rpm));
        }
        if let Some(vc) = self.vc {
            edits.push(ParameterEdit::CuttingSpeed(vc));
        }
        if let Some(value) = self.fz {
            edits.push(ParameterEdit::FeedPerTooth(value));
        }
        edits
    }
}

#[derive(Args, Debug)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub params: ParameterArgs,

    /// Program number for the O word
    #[arg(long)]
    pub program_number: Option<u32>,

    /// Print path, display points and program as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SyncCommand {
    /// Tool diameter D (mm)
    #[arg(short = 'd', long)]
    pub tool_diameter: f64,
    /// Spindle speed (RPM)
    #[arg(long, conflicts_with = "vc")]
    pub rpm: Option<u32>,
    /// Cutting speed Vc (m/min)
    #[arg(long)]
    pub vc: Option<f64>,
}

/// Load the explicit config file, else the default one if it exists, else defaults
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = path {
        return Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    match default_config_path() {
        Ok(path) if path.exists() => {
            debug!(path = %path.display(), "Using default config file");
            Config::load_from_file(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))
        }
        _ => Ok(Config::default()),
    }
}

/// Apply edits and let any spindle recomputation they scheduled run to completion
fn settle(store: &mut ParameterStore, edits: &[ParameterEdit]) {
    let now = Instant::now();
    for edit in edits {
        store.apply(*edit, now);
    }
    if let Some(deadline) = store.pending_deadline() {
        store.poll(deadline);
    }
}

/// Execute a parsed command and return what should be printed
pub fn run(cli: &Cli) -> anyhow::Result<String> {
    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Command::Generate(cmd) => {
            let options = ProgramOptions {
                program_number: cmd
                    .program_number
                    .unwrap_or(config.program.program_number),
            };
            let mut store =
                ParameterStore::with_settings(config.machining.clone(), config.quiet_period(), options);
            settle(&mut store, &cmd.params.edits());

            let result = store.compute().context("Failed to generate program")?;
            info!(
                feed_rate = result.feed_rate,
                stock_diameter = result.stock_diameter,
                "Program ready"
            );

            if cmd.json {
                Ok(result.to_json()?)
            } else {
                Ok(result.program.clone())
            }
        }
        Command::Sync(cmd) => {
            let mut store = config.parameter_store();
            let mut edits = vec![ParameterEdit::ToolDiameter(cmd.tool_diameter)];
            if let Some(rpm) = cmd.rpm {
                edits.push(ParameterEdit::SpindleRpm(rpm));
            }
            if let Some(vc) = cmd.vc {
                edits.push(ParameterEdit::CuttingSpeed(vc));
            }
            settle(&mut store, &edits);

            let p = store.params();
            Ok(format!(
                "D={} RPM={} Vc={} F={}",
                p.tool_diameter,
                p.spindle_rpm,
                p.cutting_speed,
                store.feed_rate()
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_file() -> (TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("polarmill.toml");
        Config::default().save_to_file(&path).unwrap();
        let path = path.to_string_lossy().into_owned();
        (dir, path)
    }

    fn run_args(args: &[&str]) -> String {
        let cli = Cli::try_parse_from(args).unwrap();
        run(&cli).unwrap()
    }

    #[test]
    fn test_edits_follow_flags() {
        let args = ParameterArgs {
            shape: Some(ShapeKind::Square),
            across_flats: Some(20.0),
            rpm: Some(3000),
            ..ParameterArgs::default()
        };
        assert_eq!(
            args.edits(),
            vec![
                ParameterEdit::Shape(ShapeKind::Square),
                ParameterEdit::AcrossFlats(20.0),
                ParameterEdit::SpindleRpm(3000),
            ]
        );
    }

    #[test]
    fn test_settle_runs_pending_sync() {
        let mut store = ParameterStore::default();
        settle(&mut store, &[ParameterEdit::SpindleRpm(3000)]);
        assert_eq!(store.params().cutting_speed, 113.0);
        assert!(store.pending_deadline().is_none());
    }

    #[test]
    fn test_generate_defaults() {
        let (_dir, config) = config_file();
        let output = run_args(&["polarmill", "--config", &config, "generate"]);

        assert!(output.starts_with("%\nO0001(N6 S27 D12 R0.5)\n"));
        assert!(output.contains("G0 X46.18 Z2. C0."));
        assert!(output.contains(" F400\n"));
        assert!(output.ends_with("M30\n%"));
    }

    #[test]
    fn test_generate_with_overrides() {
        let (_dir, config) = config_file();
        let output = run_args(&[
            "polarmill",
            "generate",
            "--config",
            &config,
            "--shape",
            "2",
            "-s",
            "20",
            "-d",
            "10",
            "-r",
            "1",
            "--direction",
            "conventional",
            "--program-number",
            "7",
        ]);

        assert!(output.starts_with("%\nO0007(N2 S20 D10 R1)\n"));
        assert!(output.contains("G0 X33. Z2. C0."));
        assert_eq!(output.matches("G02").count(), 2);
    }

    #[test]
    fn test_generate_json() {
        let (_dir, config) = config_file();
        let output = run_args(&["polarmill", "--config", &config, "generate", "--json"]);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["feed_rate"], 400);
        assert_eq!(value["frame"]["sides"], 6);
        assert!(value["program"].as_str().unwrap().contains("G12.1"));
    }

    #[test]
    fn test_generate_rejects_invalid_parameters() {
        let (_dir, config) = config_file();
        let cli =
            Cli::try_parse_from(["polarmill", "--config", &config, "generate", "-d", "0"]).unwrap();
        assert!(run(&cli).is_err());
    }

    #[test]
    fn test_sync_rpm_updates_vc() {
        let (_dir, config) = config_file();
        let output = run_args(&[
            "polarmill", "--config", &config, "sync", "-d", "12", "--rpm", "3000",
        ]);
        assert_eq!(output, "D=12 RPM=3000 Vc=113 F=600");
    }

    #[test]
    fn test_sync_vc_updates_rpm() {
        let (_dir, config) = config_file();
        let output = run_args(&["polarmill", "--config", &config, "sync", "-d", "12", "--vc", "90"]);
        assert_eq!(output, "D=12 RPM=2387 Vc=90 F=477");
    }

    #[test]
    fn test_rpm_and_vc_conflict() {
        assert!(
            Cli::try_parse_from(["polarmill", "sync", "-d", "12", "--rpm", "1", "--vc", "2"])
                .is_err()
        );
    }
}
