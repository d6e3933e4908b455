//! Tick Reports and Run Traces
//!
//! `TickReport` is the one value the host reads per tick. `RunTrace`
//! collects sampled reports so a whole run can be dumped as JSON and
//! inspected offline.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// What one tick produced, in host-facing terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    /// Seconds of simulated time since level load
    pub elapsed: f32,
    /// Smoothed dread scalar, 0..=100
    pub tension: f32,
    /// Pursuer-to-player distance in world units; infinite with no pursuer
    pub pursuer_distance: f32,
    /// The run ended this tick
    pub caught: bool,
}

/// A sampled record of one run, for tuning sessions and regression diffs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunTrace {
    pub level: u32,
    pub seed: u64,
    pub reports: Vec<TickReport>,
}

impl RunTrace {
    pub fn new(level: u32, seed: u64) -> Self {
        Self {
            level,
            seed,
            reports: Vec::new(),
        }
    }

    /// Record a report; callers decide the sampling cadence
    pub fn push(&mut self, report: TickReport) {
        self.reports.push(report);
    }

    /// Peak tension seen over the recorded run
    pub fn peak_tension(&self) -> f32 {
        self.reports.iter().map(|r| r.tension).fold(0.0, f32::max)
    }

    /// The tick the run ended on, if it did
    pub fn capture_tick(&self) -> Option<u64> {
        self.reports.iter().find(|r| r.caught).map(|r| r.tick)
    }

    /// Write the trace as pretty JSON
    pub fn write_json(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }
}
