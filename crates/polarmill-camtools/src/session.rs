//! Parameter store
//!
//! Owns the live [`MachiningParameters`] for one session, routes spindle
//! edits through [`SpindleSync`] and keeps the last generated program.

use std::time::{Duration, Instant};

use polarmill_core::{MachiningParameters, MillingDirection, ShapeKind};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::CamToolResult;
use crate::path_sampler::SimulationFrame;
use crate::polar_program::{display_stock_diameter, PolarProgramEmitter, ProgramOptions};
use crate::polygon_toolpath::{compute_path, ToolpathPath};
use crate::speeds_feeds::compute_feed_rate;
use crate::spindle_sync::{SpindleSync, DEFAULT_QUIET_PERIOD};

/// A single operator edit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterEdit {
    Shape(ShapeKind),
    Sides(u32),
    AcrossFlats(f64),
    CornerRadius(f64),
    Depth(f64),
    ToolDiameter(f64),
    FluteCount(u32),
    Direction(MillingDirection),
    SpindleRpm(u32),
    CuttingSpeed(f64),
    FeedPerTooth(f64),
}

/// Everything produced by one compute
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedProgram {
    pub program: String,
    pub path: ToolpathPath,
    pub frame: SimulationFrame,
    pub feed_rate: u32,
    pub stock_diameter: f64,
}

impl GeneratedProgram {
    /// Pretty JSON with program, path and display frame
    pub fn to_json(&self) -> CamToolResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Run the full pipeline for one parameter snapshot
pub fn generate_program(
    params: &MachiningParameters,
    options: &ProgramOptions,
) -> CamToolResult<GeneratedProgram> {
    let path = compute_path(params)?;
    let feed_rate = compute_feed_rate(params);
    let program = PolarProgramEmitter::new(options.clone()).emit(params, &path, feed_rate);
    let frame = SimulationFrame::new(params, &path);

    Ok(GeneratedProgram {
        program,
        path,
        frame,
        feed_rate,
        stock_diameter: display_stock_diameter(params),
    })
}

/// Live parameters plus the most recent result
#[derive(Debug)]
pub struct ParameterStore {
    params: MachiningParameters,
    sync: SpindleSync,
    options: ProgramOptions,
    last: Option<GeneratedProgram>,
}

impl ParameterStore {
    /// Store with the default quiet period and program options
    pub fn new(params: MachiningParameters) -> Self {
        Self::with_settings(params, DEFAULT_QUIET_PERIOD, ProgramOptions::default())
    }

    pub fn with_settings(
        params: MachiningParameters,
        quiet_period: Duration,
        options: ProgramOptions,
    ) -> Self {
        Self {
            params,
            sync: SpindleSync::new(quiet_period),
            options,
            last: None,
        }
    }

    pub fn params(&self) -> &MachiningParameters {
        &self.params
    }

    /// Apply an edit at `now`.
    ///
    /// Tool diameter, spindle speed and cutting speed go through the sync
    /// policy; every other field is written directly.
    pub fn apply(&mut self, edit: ParameterEdit, now: Instant) {
        let p = &mut self.params;
        match edit {
            ParameterEdit::Shape(shape) => p.shape = shape,
            ParameterEdit::Sides(sides) => p.sides = sides,
            ParameterEdit::AcrossFlats(value) => p.across_flats = value,
            ParameterEdit::CornerRadius(value) => p.corner_radius = value,
            ParameterEdit::Depth(value) => p.depth = value,
            ParameterEdit::FluteCount(value) => p.flute_count = value,
            ParameterEdit::Direction(direction) => p.direction = direction,
            ParameterEdit::FeedPerTooth(value) => p.feed_per_tooth = value,
            ParameterEdit::ToolDiameter(value) => self.sync.on_diameter_changed(p, value, now),
            ParameterEdit::SpindleRpm(rpm) => {
                self.sync.on_rpm_edited(p, rpm, now);
            }
            ParameterEdit::CuttingSpeed(vc) => {
                self.sync.on_vc_edited(p, vc, now);
            }
        }
    }

    /// Run a due spindle recomputation; returns whether one ran
    pub fn poll(&mut self, now: Instant) -> bool {
        self.sync.poll(&mut self.params, now)
    }

    /// Deadline of the pending spindle recomputation
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.sync.pending_deadline()
    }

    /// Generate path, program and display frame from the current parameters.
    ///
    /// On failure the previous result stays available through
    /// [`ParameterStore::last_program`].
    pub fn compute(&mut self) -> CamToolResult<&GeneratedProgram> {
        match generate_program(&self.params, &self.options) {
            Ok(program) => {
                info!(
                    sides = self.params.side_count(),
                    segments = program.path.len(),
                    feed_rate = program.feed_rate,
                    "Generated polar program"
                );
                let program: &GeneratedProgram = self.last.insert(program);
                Ok(program)
            }
            Err(e) => {
                warn!("Rejected compute, keeping previous program: {}", e);
                Err(e)
            }
        }
    }

    pub fn last_program(&self) -> Option<&GeneratedProgram> {
        self.last.as_ref()
    }

    /// Stock diameter for the current parameters, rounded to 0.01 mm
    pub fn stock_diameter(&self) -> f64 {
        display_stock_diameter(&self.params)
    }

    /// Feed rate for the current parameters (mm/min)
    pub fn feed_rate(&self) -> u32 {
        compute_feed_rate(&self.params)
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(MachiningParameters::default())
    }
}
