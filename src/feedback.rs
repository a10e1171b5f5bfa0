//! Spin feedback: tick tones on sector crossings, the win chime, and the two
//! on-screen countdowns.
//!
//! Nothing here touches the browser. Tones are plain descriptions handed to
//! [`crate::audio::WebAudio`], countdowns are polled with frame timestamps.

use crate::config::{
    CHIME_NOTES, CHIME_STAGGER_S, CHIME_VOLUME, TICK_DURATION_S, TICK_END_FREQ, TICK_START_FREQ,
    TICK_VOLUME,
};
use crate::utils::{format_ms_to_mmss, format_ms_to_tenths};
use crate::wheel::sector_at_pointer;

/// Gain shape applied to a tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// Fast attack, exponential decay. Used for ticks.
    Pluck,
    /// Short attack, linear release. Used for chime notes.
    Bell,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub volume: f32,
    /// Seconds.
    pub duration: f64,
    /// Seconds after "now" at which the tone starts.
    pub delay: f64,
    pub envelope: Envelope,
}

/// Tick for a sector crossing at linear spin `progress` in `[0, 1]`.
///
/// Pitch glides down and volume halves over the spin, like a wheel's clicks
/// slowing against the pointer.
pub fn tick_tone(progress: f64) -> Tone {
    let p = progress.clamp(0.0, 1.0);
    let freq = (TICK_START_FREQ - (TICK_START_FREQ - TICK_END_FREQ) * p).round();
    Tone {
        frequency: freq as f32,
        volume: (TICK_VOLUME * (1.0 - 0.5 * p)) as f32,
        duration: TICK_DURATION_S,
        delay: 0.0,
        envelope: Envelope::Pluck,
    }
}

/// Three ascending notes with staggered starts.
pub fn win_chime() -> Vec<Tone> {
    CHIME_NOTES
        .iter()
        .enumerate()
        .map(|(i, &frequency)| Tone {
            frequency,
            volume: CHIME_VOLUME,
            duration: 0.11,
            delay: i as f64 * CHIME_STAGGER_S,
            envelope: Envelope::Bell,
        })
        .collect()
}

/// Detects sector boundary crossings between animation samples.
#[derive(Debug, Default)]
pub struct TickTracker {
    enabled: bool,
    previous: Option<usize>,
}

impl TickTracker {
    /// Enable ticking, seeded with the sector under the pointer at `rotation_deg`.
    pub fn start(&mut self, rotation_deg: f64, count: usize) {
        self.enabled = true;
        self.previous = Some(sector_at_pointer(rotation_deg, count));
    }

    pub fn stop(&mut self) {
        self.enabled = false;
        self.previous = None;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns a tick when the sector under the pointer changed since the last sample.
    pub fn observe(&mut self, rotation_deg: f64, count: usize, progress: f64) -> Option<Tone> {
        if !self.enabled {
            return None;
        }
        let current = sector_at_pointer(rotation_deg, count);
        if self.previous == Some(current) {
            return None;
        }
        self.previous = Some(current);
        Some(tick_tone(progress))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownFormat {
    /// `9.4s`
    Tenths,
    /// `04:59`
    MinutesSeconds,
}

impl CountdownFormat {
    fn render(self, ms: f64) -> String {
        match self {
            CountdownFormat::Tenths => format_ms_to_tenths(ms),
            CountdownFormat::MinutesSeconds => format_ms_to_mmss(ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CountdownStatus {
    Stopped,
    Running { remaining_ms: f64 },
    /// Reached zero on this poll. The countdown is stopped afterwards.
    Finished,
}

/// A visible countdown polled once per frame.
#[derive(Debug, Clone)]
pub struct Countdown {
    format: CountdownFormat,
    clear_on_finish: bool,
    started_at: Option<f64>,
    duration_ms: f64,
    text: String,
}

impl Countdown {
    pub fn new(format: CountdownFormat, clear_on_finish: bool) -> Self {
        Self {
            format,
            clear_on_finish,
            started_at: None,
            duration_ms: 0.0,
            text: String::new(),
        }
    }

    /// (Re)start from `now`. The display shows the full duration immediately.
    pub fn start(&mut self, now: f64, duration_ms: f64) {
        self.started_at = Some(now);
        self.duration_ms = duration_ms;
        self.text = self.format.render(duration_ms);
    }

    /// Stop and clear the display. Safe to call when already stopped.
    pub fn stop(&mut self) {
        self.started_at = None;
        self.text.clear();
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn remaining_ms(&self, now: f64) -> f64 {
        match self.started_at {
            Some(start) => (self.duration_ms - (now - start)).clamp(0.0, self.duration_ms),
            None => 0.0,
        }
    }

    pub fn poll(&mut self, now: f64) -> CountdownStatus {
        if self.started_at.is_none() {
            return CountdownStatus::Stopped;
        }
        let remaining = self.remaining_ms(now);
        if remaining > 0.0 {
            self.text = self.format.render(remaining);
            return CountdownStatus::Running {
                remaining_ms: remaining,
            };
        }
        self.started_at = None;
        self.show_finished();
        CountdownStatus::Finished
    }

    /// Run out immediately, as if zero was reached. Returns `false` when it
    /// was not running.
    pub fn finish(&mut self) -> bool {
        if self.started_at.take().is_none() {
            return false;
        }
        self.show_finished();
        true
    }

    fn show_finished(&mut self) {
        if self.clear_on_finish {
            self.text.clear();
        } else {
            self.text = self.format.render(0.0);
        }
    }
}
