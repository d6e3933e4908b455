//! Tension Estimation
//!
//! A single 0..=100 scalar that the host maps to audio and atmosphere. The
//! estimator is pure state plus an `update` step; the ECS system layer feeds
//! it observations each tick.
//!
//! The value chases a per-tick target through a first-order low-pass filter,
//! so spikes ramp in over a fraction of a second instead of snapping. The
//! target itself is the larger of a narrative baseline and an immediate
//! threat reading (pursuer closeness plus gaze alignment).

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::TensionConfig;

/// Resource: the smoothed dread scalar and the observations that produced
/// its current target. The raw observations are kept visible for tracing
/// and tests.
#[derive(Resource, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TensionState {
    /// Smoothed output, 0..=100
    pub value: f32,
    /// Last closeness reading, 0..=1 (1 = pursuer adjacent)
    pub closeness: f32,
    /// Last gaze reading, 0..=1 (1 = looking straight at the pursuer)
    pub gaze: f32,
    /// Narrative floor derived from the story meters, 0..=100
    pub baseline: f32,
}

/// One tick's worth of threat inputs, computed by the system layer
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreatObservation {
    /// Pursuer proximity mapped through the smoothstep falloff, 0..=1
    pub closeness: f32,
    /// How directly the player faces the pursuer, 0..=1
    pub gaze: f32,
}

impl TensionState {
    /// Start a level with the value resting on the narrative baseline
    pub fn with_baseline(guilt: f32, obsession: f32, config: &TensionConfig) -> Self {
        let baseline =
            (guilt * config.guilt_weight + obsession * config.obsession_weight).clamp(0.0, 100.0);
        Self {
            value: baseline,
            closeness: 0.0,
            gaze: 0.0,
            baseline,
        }
    }

    /// Advance the filter by `dt` seconds toward the target implied by
    /// `observation`. The target is the max of the baseline and the scaled
    /// threat reading, so calm exploration still carries narrative weight.
    pub fn update(&mut self, observation: ThreatObservation, config: &TensionConfig, dt: f32) {
        self.closeness = observation.closeness.clamp(0.0, 1.0);
        self.gaze = observation.gaze.clamp(0.0, 1.0);

        let threat = (self.closeness * config.closeness_weight
            + self.gaze * config.gaze_weight)
            .clamp(0.0, 1.0)
            * 100.0;
        let target = self.baseline.max(threat);

        // Frame-rate independent low-pass: identical trajectories whether
        // stepped at 30Hz or 144Hz
        let blend = 1.0 - (-dt * config.smoothing_rate).exp();
        self.value += (target - self.value) * blend;
        self.value = self.value.clamp(0.0, 100.0);
    }

    /// Instant additive pressure (wanderer stares). Applied after the
    /// filter step so it reads as a push, not a new target.
    pub fn add_pressure(&mut self, amount: f32) {
        self.value = (self.value + amount).clamp(0.0, 100.0);
    }

    /// Story-driven one-shot shift, positive or negative
    pub fn nudge(&mut self, amount: f32) {
        self.value = (self.value + amount).clamp(0.0, 100.0);
    }

    /// Re-derive the narrative floor after a mid-run story change. The live
    /// value is left alone; it chases the new floor through the filter.
    pub fn rebase(&mut self, guilt: f32, obsession: f32, config: &TensionConfig) {
        self.baseline =
            (guilt * config.guilt_weight + obsession * config.obsession_weight).clamp(0.0, 100.0);
    }
}

impl Default for TensionState {
    fn default() -> Self {
        Self {
            value: 0.0,
            closeness: 0.0,
            gaze: 0.0,
            baseline: 0.0,
        }
    }
}

/// Map a distance onto 0..=1 with a cubic-Hermite smoothstep: 0 at or
/// beyond `far`, 1 at or inside `near`, smooth in between
pub fn smoothstep_falloff(far: f32, near: f32, distance: f32) -> f32 {
    if far <= near {
        return if distance <= near { 1.0 } else { 0.0 };
    }
    let t = ((far - distance) / (far - near)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
