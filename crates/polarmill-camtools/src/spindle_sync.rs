//! Spindle speed / cutting speed synchronisation
//!
//! Keeps `spindle_rpm` and `cutting_speed` consistent through the tool
//! diameter (`Vc = pi * D * RPM / 1000`) while the operator edits either one.
//!
//! - A diameter change recomputes Vc from RPM immediately.
//! - An RPM or Vc edit schedules a recomputation of the other value after a
//!   quiet period. Every new edit cancels the pending one (debounce).
//! - A recomputation writes the other value through the normal edit path,
//!   tagged with its source, so it can never schedule the reverse recomputation.
//!
//! The policy does not own a clock. Callers pass the current [`Instant`] with
//! every event and call [`SpindleSync::poll`] (or [`SpindleSync::fire`] with the
//! token they were handed) once the deadline is reached.

use std::fmt;
use std::time::{Duration, Instant};

use polarmill_core::MachiningParameters;
use tracing::{debug, trace};

use crate::speeds_feeds::{cutting_speed_for, spindle_rpm_for};

/// Quiet period between the last edit and the recomputation
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(2500);

/// Which value the operator edited, and therefore which one is authoritative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncSource {
    /// Spindle speed was edited; cutting speed follows
    SpindleRpm,
    /// Cutting speed was edited; spindle speed follows
    CuttingSpeed,
}

impl fmt::Display for SyncSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpindleRpm => write!(f, "rpm"),
            Self::CuttingSpeed => write!(f, "vc"),
        }
    }
}

/// Identifies one scheduled recomputation
///
/// Only the token of the currently pending recomputation is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl fmt::Display for TimerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timer({})", self.0)
    }
}

/// A scheduled recomputation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRecompute {
    /// Token handed out when this recomputation was scheduled
    pub token: TimerToken,
    /// Value whose edit triggered the recomputation
    pub source: SyncSource,
    /// When the recomputation becomes due
    pub deadline: Instant,
}

/// Debounced, loop-safe RPM/Vc reconciliation
#[derive(Debug)]
pub struct SpindleSync {
    quiet_period: Duration,
    pending: Option<PendingRecompute>,
    next_token: u64,
    in_flight: Option<SyncSource>,
    last_edited: Option<SyncSource>,
}

impl SpindleSync {
    /// Create a policy with the given quiet period
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
            next_token: 0,
            in_flight: None,
            last_edited: None,
        }
    }

    /// Quiet period applied to every edit
    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// The recomputation waiting for its deadline, if any
    pub fn pending(&self) -> Option<PendingRecompute> {
        self.pending
    }

    /// Deadline of the pending recomputation
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.deadline)
    }

    /// The value the operator edited most recently
    pub fn last_edited(&self) -> Option<SyncSource> {
        self.last_edited
    }

    /// Tool diameter changed: recompute Vc from RPM right away.
    ///
    /// A pending recomputation is rescheduled with a fresh quiet period.
    pub fn on_diameter_changed(
        &mut self,
        params: &mut MachiningParameters,
        diameter: f64,
        now: Instant,
    ) {
        params.tool_diameter = diameter;
        if let Some(vc) = cutting_speed_for(diameter, params.spindle_rpm) {
            debug!(diameter, rpm = params.spindle_rpm, vc, "Cutting speed follows tool diameter");
            params.cutting_speed = vc;
        }
        if let Some(pending) = self.pending {
            self.schedule(pending.source, now);
        }
    }

    /// Operator edited the spindle speed.
    ///
    /// Returns the token of the scheduled Vc recomputation, or `None` when the
    /// write came from a Vc-driven recomputation.
    pub fn on_rpm_edited(
        &mut self,
        params: &mut MachiningParameters,
        rpm: u32,
        now: Instant,
    ) -> Option<TimerToken> {
        params.spindle_rpm = rpm;
        if !self.accepts_edit(SyncSource::SpindleRpm) {
            return None;
        }
        self.last_edited = Some(SyncSource::SpindleRpm);
        Some(self.schedule(SyncSource::SpindleRpm, now))
    }

    /// Operator edited the cutting speed.
    ///
    /// Returns the token of the scheduled RPM recomputation, or `None` when the
    /// write came from an RPM-driven recomputation.
    pub fn on_vc_edited(
        &mut self,
        params: &mut MachiningParameters,
        cutting_speed: f64,
        now: Instant,
    ) -> Option<TimerToken> {
        params.cutting_speed = cutting_speed;
        if !self.accepts_edit(SyncSource::CuttingSpeed) {
            return None;
        }
        self.last_edited = Some(SyncSource::CuttingSpeed);
        Some(self.schedule(SyncSource::CuttingSpeed, now))
    }

    /// Run the recomputation identified by `token`.
    ///
    /// Returns `false` without touching `params` when `token` was superseded.
    pub fn fire(
        &mut self,
        params: &mut MachiningParameters,
        token: TimerToken,
        now: Instant,
    ) -> bool {
        let pending = match self.pending {
            Some(pending) if pending.token == token => pending,
            _ => {
                trace!(%token, "Ignoring superseded spindle sync timer");
                return false;
            }
        };
        self.pending = None;
        self.recompute(params, pending.source, now);
        true
    }

    /// Run the pending recomputation if its deadline has passed.
    pub fn poll(&mut self, params: &mut MachiningParameters, now: Instant) -> bool {
        match self.pending {
            Some(pending) if now >= pending.deadline => self.fire(params, pending.token, now),
            _ => false,
        }
    }

    fn accepts_edit(&self, source: SyncSource) -> bool {
        self.in_flight.is_none_or(|in_flight| in_flight == source)
    }

    fn schedule(&mut self, source: SyncSource, now: Instant) -> TimerToken {
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        if let Some(previous) = self.pending.replace(PendingRecompute {
            token,
            source,
            deadline: now + self.quiet_period,
        }) {
            trace!(previous = %previous.token, "Cancelled pending spindle sync");
        }
        debug!(%token, %source, "Scheduled spindle sync");
        token
    }

    fn recompute(&mut self, params: &mut MachiningParameters, source: SyncSource, now: Instant) {
        self.in_flight = Some(source);
        match source {
            SyncSource::SpindleRpm => {
                if let Some(vc) = cutting_speed_for(params.tool_diameter, params.spindle_rpm) {
                    debug!(rpm = params.spindle_rpm, vc, "Cutting speed follows spindle speed");
                    self.on_vc_edited(params, vc, now);
                }
            }
            SyncSource::CuttingSpeed => {
                if let Some(rpm) = spindle_rpm_for(params.tool_diameter, params.cutting_speed) {
                    debug!(vc = params.cutting_speed, rpm, "Spindle speed follows cutting speed");
                    self.on_rpm_edited(params, rpm, now);
                }
            }
        }
        self.in_flight = None;
    }
}

impl Default for SpindleSync {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}
