//! Spin planning and the eased spin animation.

use crate::wheel::{angle_to_target, sector_at_pointer};
use crate::{DisplaySegment, WheelError};
use log::debug;
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use std::ops::RangeInclusive;

/// Where the wheel is in its spin cycle. Controls are enabled only in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpinState {
    Idle,
    Spinning,
    Locked { remaining_ms: f64 },
}

impl SpinState {
    pub fn is_idle(&self) -> bool {
        matches!(self, SpinState::Idle)
    }
}

/// The chosen landing sector and the rotation that reaches it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    /// Index into the doubled display list.
    pub target_index: usize,
    pub extra_rotations: u32,
    pub angle_to_target: f64,
    /// Absolute clockwise rotation in degrees at which the wheel stops.
    pub final_deg: f64,
}

impl SpinPlan {
    pub fn for_target(target_index: usize, display_count: usize, extra_rotations: u32) -> Self {
        let final_deg = extra_rotations as f64 * 360.0 + angle_to_target(target_index, display_count);
        // Taken back from the sum so that `final_deg mod 360` matches it exactly
        Self {
            target_index,
            extra_rotations,
            angle_to_target: final_deg.rem_euclid(360.0),
            final_deg,
        }
    }

    /// Pick a uniformly random sector and a random number of full turns.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        display_count: usize,
        rotations: RangeInclusive<u32>,
    ) -> Result<Self, WheelError> {
        let sectors = Uniform::new(0, display_count).map_err(|_| WheelError::NoSegments)?;
        let target_index = sectors.sample(rng);
        let extra_rotations = rng.random_range(rotations);
        let plan = Self::for_target(target_index, display_count, extra_rotations);
        debug!(
            "Spin plan: sector {}/{} with {} extra turns, final {:.2}deg",
            target_index, display_count, extra_rotations, plan.final_deg
        );
        Ok(plan)
    }
}

/// The prize the wheel landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpinResult {
    /// Index into the authoritative segment list.
    pub index: usize,
    pub label: String,
}

/// Map a final rotation to the winning segment of the doubled display list.
pub fn resolve_winner(final_deg: f64, display: &[DisplaySegment]) -> Option<SpinResult> {
    if display.is_empty() {
        return None;
    }
    let landed = &display[sector_at_pointer(final_deg, display.len())];
    Some(SpinResult {
        index: landed.original_index,
        label: landed.label.clone(),
    })
}

/// Easing function for smooth deceleration: `1 - (1 - t)^3`
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// One sample of a running animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinFrame {
    pub rotation_deg: f64,
    /// Linear time progress in `[0, 1]`.
    pub progress: f64,
    pub finished: bool,
}

/// Time-based interpolation from a start rotation to the plan's target.
///
/// Driven by [`SpinAnimation::sample`] once per display refresh.
#[derive(Debug, Clone)]
pub struct SpinAnimation {
    start_deg: f64,
    target_deg: f64,
    started_at: f64,
    duration_ms: f64,
    last_progress: f64,
}

impl SpinAnimation {
    pub fn new(start_deg: f64, target_deg: f64, started_at: f64, duration_ms: f64) -> Self {
        Self {
            start_deg,
            target_deg,
            started_at,
            duration_ms,
            last_progress: 0.0,
        }
    }

    pub fn start_deg(&self) -> f64 {
        self.start_deg
    }

    pub fn sample(&mut self, now: f64) -> SpinFrame {
        let raw = if self.duration_ms > 0.0 {
            (now - self.started_at) / self.duration_ms
        } else {
            1.0
        };
        // Frame timestamps can precede the start stamp slightly; never go backwards
        let progress = raw.clamp(0.0, 1.0).max(self.last_progress);
        self.last_progress = progress;

        if progress >= 1.0 {
            return SpinFrame {
                rotation_deg: self.target_deg,
                progress: 1.0,
                finished: true,
            };
        }
        let eased = ease_out_cubic(progress);
        SpinFrame {
            rotation_deg: self.start_deg + (self.target_deg - self.start_deg) * eased,
            progress,
            finished: false,
        }
    }
}
