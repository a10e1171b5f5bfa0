//! Application-level configuration constants.

// Persistence
pub const STORAGE_KEY: &str = "prizeWheelItems";

// Spin timing
pub const SPIN_DURATION_MS: f64 = 10_000.0;
pub const LOCKOUT_MS: f64 = 5.0 * 60.0 * 1000.0;
pub const MIN_EXTRA_ROTATIONS: u32 = 5;
pub const MAX_EXTRA_ROTATIONS: u32 = 8;

// Tick tones glide from the start pitch down to the end pitch over the spin
pub const TICK_START_FREQ: f64 = 1200.0;
pub const TICK_END_FREQ: f64 = 600.0;
pub const TICK_VOLUME: f64 = 0.06;
pub const TICK_DURATION_S: f64 = 0.07;

// Win chime
pub const CHIME_NOTES: [f32; 3] = [880.0, 1100.0, 1320.0];
pub const CHIME_STAGGER_S: f64 = 0.12;
pub const CHIME_VOLUME: f32 = 0.12;

// Colors
pub const FALLBACK_COLOR: &str = "#999999";
pub const EMPTY_WHEEL_COLOR: &str = "#cccccc";
pub const DEFAULT_FORM_COLOR: &str = "#ff6384";

/// Tunables for a single wheel instance.
///
/// `Default` uses the constants above; tests build instances with shorter
/// durations.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelConfig {
    pub spin_duration_ms: f64,
    pub lockout_ms: f64,
    pub min_extra_rotations: u32,
    pub max_extra_rotations: u32,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            spin_duration_ms: SPIN_DURATION_MS,
            lockout_ms: LOCKOUT_MS,
            min_extra_rotations: MIN_EXTRA_ROTATIONS,
            max_extra_rotations: MAX_EXTRA_ROTATIONS,
        }
    }
}

impl WheelConfig {
    /// Swap inverted rotation bounds so the range is never empty.
    pub fn normalized(mut self) -> Self {
        if self.min_extra_rotations > self.max_extra_rotations {
            std::mem::swap(&mut self.min_extra_rotations, &mut self.max_extra_rotations);
        }
        self
    }
}
