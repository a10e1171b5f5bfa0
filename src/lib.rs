//! Prize wheel core: segment model, spin math, feedback timing and the
//! browser adapters (canvas, Web Audio, localStorage) used by the Yew UI.

use std::fmt;

pub mod audio;
pub mod cache;
pub mod config;
pub mod controller;
pub mod feedback;
pub mod prize_store;
pub mod render;
pub mod spin;
pub mod utils;
pub mod wheel;

pub use controller::WheelController;
pub use prize_store::{KeyValueStore, LocalStore, MemoryStore, PrizeStore};
pub use spin::{SpinPlan, SpinResult, SpinState};

/// One prize slot on the wheel. Position in the list decides its angular slot.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    pub label: String,
    pub color: String,
}

impl Segment {
    pub fn new(label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
        }
    }
}

/// A drawn sector. The wheel shows every segment twice; `original_index`
/// points back into the authoritative segment list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySegment {
    pub label: String,
    pub color: String,
    pub original_index: usize,
}

/// Build the doubled display list: `[s0, s1, .., sN-1, s0, s1, .., sN-1]`.
pub fn double_segments(segments: &[Segment]) -> Vec<DisplaySegment> {
    let base = segments.iter().enumerate().map(|(i, s)| DisplaySegment {
        label: s.label.clone(),
        color: s.color.clone(),
        original_index: i,
    });
    base.clone().chain(base).collect()
}

// Rejections returned by the controller. The UI treats all of them as no-ops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WheelError {
    /// A spin is running or the post-spin lockout is active.
    Busy,
    NoSegments,
    EmptyLabel,
    IndexOutOfRange {
        index: usize,
        len: usize,
    },
}

impl fmt::Display for WheelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WheelError::Busy => write!(f, "Wheel is spinning or locked"),
            WheelError::NoSegments => write!(f, "Wheel has no segments to spin"),
            WheelError::EmptyLabel => write!(f, "Prize label cannot be empty"),
            WheelError::IndexOutOfRange { index, len } => write!(
                f,
                "Prize index {} out of range (list has {} entries)",
                index, len
            ),
        }
    }
}

impl std::error::Error for WheelError {}
