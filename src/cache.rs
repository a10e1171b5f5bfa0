//! Lazily built display list for the wheel.
//!
//! The wheel draws every segment twice. Building that list is cheap but it
//! is read on every frame during a spin, so the controller keeps one copy and
//! drops it whenever the segment list changes.
//!
//! # Cache Value Structure
//! - `Vec<DisplaySegment>`: `2 × N` sectors, each tagged with the index of
//!   the segment it came from

use crate::{double_segments, DisplaySegment, Segment};

#[derive(Debug, Default)]
pub struct DisplayCache {
    entries: Option<Vec<DisplaySegment>>,
}

impl DisplayCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached list, building it from `segments` if empty.
    pub fn get_or_build(&mut self, segments: &[Segment]) -> &[DisplaySegment] {
        self.entries
            .get_or_insert_with(|| double_segments(segments))
            .as_slice()
    }

    pub fn invalidate(&mut self) {
        self.entries = None;
    }

    pub fn is_built(&self) -> bool {
        self.entries.is_some()
    }
}
