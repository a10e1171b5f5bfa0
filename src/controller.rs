//! The wheel's single owner of state.
//!
//! `WheelController` holds the prize list, the display cache, the current
//! rotation, the spin state, both countdowns and the RNG. It has no timers of
//! its own: the UI calls [`WheelController::update`] once per animation frame
//! with the frame timestamp and acts on the returned events.

use crate::cache::DisplayCache;
use crate::config::WheelConfig;
use crate::feedback::{win_chime, Countdown, CountdownFormat, CountdownStatus, TickTracker, Tone};
use crate::prize_store::{KeyValueStore, PrizeStore};
use crate::spin::{resolve_winner, SpinAnimation, SpinPlan, SpinResult, SpinState};
use crate::utils::{clean_label, is_free_spin, normalize_color};
use crate::{DisplaySegment, Segment, WheelError};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Something the UI has to act on after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum SpinEvent {
    Play(Tone),
    Landed(SpinResult),
    SpinCountdownFinished,
    LockoutStarted { duration_ms: f64 },
    LockoutFinished,
}

pub struct WheelController<S: KeyValueStore> {
    config: WheelConfig,
    store: PrizeStore<S>,
    segments: Vec<Segment>,
    display: DisplayCache,
    rotation_deg: f64,
    state: SpinState,
    animation: Option<SpinAnimation>,
    ticks: TickTracker,
    spin_countdown: Countdown,
    lockout: Countdown,
    result: Option<SpinResult>,
    rng: StdRng,
}

impl<S: KeyValueStore> WheelController<S> {
    /// Load the saved prizes from `backend` and start idle.
    pub fn initialize(backend: S, config: WheelConfig) -> Self {
        Self::with_rng(backend, config, StdRng::from_os_rng())
    }

    pub fn with_rng(backend: S, config: WheelConfig, rng: StdRng) -> Self {
        let store = PrizeStore::new(backend);
        let segments = store.load();
        Self {
            config: config.normalized(),
            store,
            segments,
            display: DisplayCache::new(),
            rotation_deg: 0.0,
            state: SpinState::Idle,
            animation: None,
            ticks: TickTracker::default(),
            spin_countdown: Countdown::new(CountdownFormat::Tenths, false),
            lockout: Countdown::new(CountdownFormat::MinutesSeconds, true),
            result: None,
            rng,
        }
    }

    /// Stop the animation and both countdowns and return to idle.
    pub fn teardown(&mut self) {
        self.animation = None;
        self.ticks.stop();
        self.spin_countdown.stop();
        self.lockout.stop();
        self.state = SpinState::Idle;
        debug!("Wheel controller torn down");
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn display_segments(&mut self) -> &[DisplaySegment] {
        self.display.get_or_build(&self.segments)
    }

    pub fn rotation_deg(&self) -> f64 {
        self.rotation_deg
    }

    pub fn state(&self) -> SpinState {
        self.state
    }

    pub fn controls_enabled(&self) -> bool {
        self.state.is_idle()
    }

    pub fn last_result(&self) -> Option<&SpinResult> {
        self.result.as_ref()
    }

    pub fn spin_countdown_text(&self) -> &str {
        self.spin_countdown.text()
    }

    pub fn lockout_text(&self) -> &str {
        self.lockout.text()
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.state, SpinState::Locked { .. })
    }

    pub fn ticking(&self) -> bool {
        self.ticks.is_enabled()
    }

    /// Whether the UI should keep requesting animation frames.
    pub fn needs_frames(&self) -> bool {
        self.animation.is_some() || self.spin_countdown.is_running() || self.lockout.is_running()
    }

    /// Start a spin at time `now`.
    pub fn spin(&mut self, now: f64) -> Result<SpinPlan, WheelError> {
        if !self.state.is_idle() {
            return Err(WheelError::Busy);
        }
        let rotations = self.config.min_extra_rotations..=self.config.max_extra_rotations;
        let count = self.display.get_or_build(&self.segments).len();
        let plan = SpinPlan::random(&mut self.rng, count, rotations)?;
        self.start_spin(plan, now);
        Ok(plan)
    }

    /// Start a spin towards a fixed display sector. Deterministic counterpart
    /// of [`WheelController::spin`].
    pub fn spin_to(
        &mut self,
        target_index: usize,
        extra_rotations: u32,
        now: f64,
    ) -> Result<SpinPlan, WheelError> {
        if !self.state.is_idle() {
            return Err(WheelError::Busy);
        }
        let count = self.display.get_or_build(&self.segments).len();
        if count == 0 {
            return Err(WheelError::NoSegments);
        }
        if target_index >= count {
            return Err(WheelError::IndexOutOfRange {
                index: target_index,
                len: count,
            });
        }
        let plan = SpinPlan::for_target(target_index, count, extra_rotations);
        self.start_spin(plan, now);
        Ok(plan)
    }

    fn start_spin(&mut self, plan: SpinPlan, now: f64) {
        let count = self.display.get_or_build(&self.segments).len();
        let start = self.rotation_deg.rem_euclid(360.0);
        self.rotation_deg = start;
        self.result = None;
        self.state = SpinState::Spinning;
        self.animation = Some(SpinAnimation::new(
            start,
            plan.final_deg,
            now,
            self.config.spin_duration_ms,
        ));
        self.spin_countdown.start(now, self.config.spin_duration_ms);
        self.ticks.start(start, count);
        info!(
            "Spinning from {:.2}deg to {:.2}deg",
            start, plan.final_deg
        );
    }

    /// Advance animation and countdowns to `now`.
    pub fn update(&mut self, now: f64) -> Vec<SpinEvent> {
        let mut events = Vec::new();

        if let Some(anim) = self.animation.as_mut() {
            let frame = anim.sample(now);
            self.rotation_deg = frame.rotation_deg;
            let count = self.display.get_or_build(&self.segments).len();
            if let Some(tone) = self.ticks.observe(frame.rotation_deg, count, frame.progress) {
                events.push(SpinEvent::Play(tone));
            }
            if frame.finished {
                self.animation = None;
                self.complete_spin(now, &mut events);
            }
        }

        if self.spin_countdown.poll(now) == CountdownStatus::Finished {
            events.push(SpinEvent::SpinCountdownFinished);
        }

        match self.lockout.poll(now) {
            CountdownStatus::Running { remaining_ms } => {
                self.state = SpinState::Locked { remaining_ms };
            }
            CountdownStatus::Finished => {
                info!("Lockout over");
                self.state = SpinState::Idle;
                events.push(SpinEvent::LockoutFinished);
            }
            CountdownStatus::Stopped => {}
        }

        events
    }

    fn complete_spin(&mut self, now: f64, events: &mut Vec<SpinEvent>) {
        let final_deg = self.rotation_deg;
        let winner = resolve_winner(final_deg, self.display.get_or_build(&self.segments));

        self.ticks.stop();
        // The countdown shares the animation's duration but may trail it by a rounding step
        if self.spin_countdown.finish() {
            events.push(SpinEvent::SpinCountdownFinished);
        }
        events.extend(win_chime().into_iter().map(SpinEvent::Play));

        let Some(winner) = winner else {
            self.state = SpinState::Idle;
            return;
        };
        info!("Landed on #{} {:?}", winner.index, winner.label);
        self.result = Some(winner.clone());
        let free_spin = is_free_spin(&winner.label);
        events.push(SpinEvent::Landed(winner));

        if free_spin {
            self.state = SpinState::Idle;
        } else {
            self.start_lockout(now);
            events.push(SpinEvent::LockoutStarted {
                duration_ms: self.config.lockout_ms,
            });
        }
    }

    fn start_lockout(&mut self, now: f64) {
        self.lockout.start(now, self.config.lockout_ms);
        self.state = SpinState::Locked {
            remaining_ms: self.config.lockout_ms,
        };
    }

    /// End the lockout early and re-enable the controls.
    pub fn cancel_lockout(&mut self) {
        if !self.is_locked() {
            return;
        }
        self.lockout.stop();
        self.state = SpinState::Idle;
    }

    pub fn add_prize(&mut self, label: &str, color: &str) -> Result<(), WheelError> {
        if !self.state.is_idle() {
            return Err(WheelError::Busy);
        }
        let label = clean_label(label).ok_or(WheelError::EmptyLabel)?;
        self.segments.push(Segment::new(label, normalize_color(color)));
        self.after_edit();
        Ok(())
    }

    pub fn remove_prize(&mut self, index: usize) -> Result<Segment, WheelError> {
        if !self.state.is_idle() {
            return Err(WheelError::Busy);
        }
        if index >= self.segments.len() {
            return Err(WheelError::IndexOutOfRange {
                index,
                len: self.segments.len(),
            });
        }
        let removed = self.segments.remove(index);
        self.after_edit();
        Ok(removed)
    }

    fn after_edit(&mut self) {
        self.store.save(&self.segments);
        self.rotation_deg = 0.0;
        self.display.invalidate();
        debug!("Prize list now has {} entries", self.segments.len());
    }

    pub fn store(&self) -> &PrizeStore<S> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prize_store::{default_prizes, MemoryStore};
    use crate::wheel::sector_at_pointer;

    fn config() -> WheelConfig {
        WheelConfig {
            spin_duration_ms: 1_000.0,
            lockout_ms: 5_000.0,
            ..WheelConfig::default()
        }
    }

    fn controller() -> WheelController<MemoryStore> {
        WheelController::with_rng(MemoryStore::new(), config(), StdRng::seed_from_u64(3))
    }

    fn run_until_idle_or_locked(c: &mut WheelController<MemoryStore>, from: f64) -> Vec<SpinEvent> {
        let mut events = Vec::new();
        let mut t = from;
        while c.state() == SpinState::Spinning {
            t += 16.0;
            events.extend(c.update(t));
        }
        events
    }

    #[test]
    fn starts_idle_with_defaults() {
        let c = controller();
        assert_eq!(c.segments(), default_prizes().as_slice());
        assert!(c.controls_enabled());
        assert!(!c.needs_frames());
    }

    #[test]
    fn mystery_target_locks_the_wheel() {
        let mut c = controller();
        let plan = c.spin_to(3, 5, 0.0).unwrap();
        assert_eq!(plan.angle_to_target, 281.25);
        assert!(!c.controls_enabled());
        assert_eq!(c.spin_countdown_text(), "1.0s");

        let events = c.update(1_000.0);
        assert_eq!(c.rotation_deg(), plan.final_deg);
        assert!(events.contains(&SpinEvent::Landed(SpinResult {
            index: 3,
            label: "Mystery ???".to_string()
        })));
        assert!(events.contains(&SpinEvent::LockoutStarted { duration_ms: 5_000.0 }));
        assert_eq!(c.state(), SpinState::Locked { remaining_ms: 5_000.0 });
        assert_eq!(c.lockout_text(), "00:05");
        assert!(events.contains(&SpinEvent::SpinCountdownFinished));
        assert_eq!(c.spin_countdown_text(), "0.0s");
        assert!(!c.ticking());
        assert!(c.needs_frames());

        c.update(3_000.0);
        assert_eq!(c.state(), SpinState::Locked { remaining_ms: 3_000.0 });
        assert_eq!(c.spin(3_000.0), Err(WheelError::Busy));

        let events = c.update(6_000.0);
        assert_eq!(events, vec![SpinEvent::LockoutFinished]);
        assert!(c.controls_enabled());
        assert_eq!(c.lockout_text(), "");
        assert!(!c.needs_frames());
    }

    #[test]
    fn free_spin_returns_straight_to_idle() {
        let mut c = controller();
        // Display sector 15 is the second copy of "Free Spin   "
        c.spin_to(15, 6, 0.0).unwrap();
        let events = c.update(1_000.0);
        assert_eq!(c.last_result().map(|r| r.index), Some(7));
        assert!(c.controls_enabled());
        assert_eq!(c.lockout_text(), "");
        assert!(!events
            .iter()
            .any(|e| matches!(e, SpinEvent::LockoutStarted { .. })));
        assert!(c.spin(1_001.0).is_ok());
    }

    #[test]
    fn random_spins_land_on_their_target() {
        let mut c = controller();
        let mut now = 0.0;
        for _ in 0..50 {
            let plan = c.spin(now).unwrap();
            assert!((5..=8).contains(&plan.extra_rotations));
            let events = run_until_idle_or_locked(&mut c, now);
            let finished = events
                .iter()
                .filter(|e| **e == SpinEvent::SpinCountdownFinished)
                .count();
            assert_eq!(finished, 1);
            let won = c.last_result().cloned().unwrap();
            assert_eq!(won.index, plan.target_index % c.segments().len());
            now += 10_000.0;
            c.update(now);
            c.cancel_lockout();
            assert!(c.controls_enabled());
        }
    }

    #[test]
    fn spin_is_rejected_while_spinning() {
        let mut c = controller();
        c.spin(0.0).unwrap();
        assert_eq!(c.spin(10.0), Err(WheelError::Busy));
        assert_eq!(c.add_prize("X", "#000000"), Err(WheelError::Busy));
        assert_eq!(c.remove_prize(0), Err(WheelError::Busy));
        assert_eq!(c.store().backend().writes(), 0);
    }

    #[test]
    fn ticks_follow_sector_changes_and_glide_down() {
        let mut c = controller();
        c.spin_to(0, 5, 0.0).unwrap();
        let mut freqs = Vec::new();
        let mut t = 0.0;
        let mut last_sector = sector_at_pointer(c.rotation_deg(), 16);
        let mut changes = 0;
        while c.state() == SpinState::Spinning {
            t += 16.0;
            for e in c.update(t) {
                if let SpinEvent::Play(tone) = e {
                    if tone.envelope == crate::feedback::Envelope::Pluck {
                        freqs.push(tone.frequency);
                    }
                }
            }
            let sector = sector_at_pointer(c.rotation_deg(), 16);
            if sector != last_sector {
                changes += 1;
                last_sector = sector;
            }
        }
        assert_eq!(freqs.len(), changes);
        assert!(freqs.len() > 16);
        assert!(freqs.windows(2).all(|w| w[0] >= w[1]));
        assert!(freqs.iter().all(|f| (600.0..=1200.0).contains(f)));
    }

    #[test]
    fn completion_plays_three_note_chime() {
        let mut c = controller();
        c.spin_to(2, 5, 0.0).unwrap();
        let bells = c
            .update(2_000.0)
            .into_iter()
            .filter(|e| {
                matches!(e, SpinEvent::Play(t) if t.envelope == crate::feedback::Envelope::Bell)
            })
            .count();
        assert_eq!(bells, 3);
    }

    #[test]
    fn next_spin_starts_from_normalized_rotation() {
        let mut c = controller();
        let plan = c.spin_to(15, 5, 0.0).unwrap();
        c.update(1_000.0);
        assert_eq!(c.rotation_deg(), plan.final_deg);
        c.spin_to(1, 5, 2_000.0).unwrap();
        assert!(c.rotation_deg() < 360.0);
        assert_eq!(c.rotation_deg(), plan.final_deg.rem_euclid(360.0));
    }

    #[test]
    fn add_prize_persists_and_resets() {
        let mut c = controller();
        c.spin_to(15, 5, 0.0).unwrap();
        c.update(1_000.0);
        assert!(c.rotation_deg() > 0.0);

        c.add_prize("  Ice cream ", "").unwrap();
        assert_eq!(c.segments().len(), 9);
        assert_eq!(c.segments()[8], Segment::new("Ice cream", "#999999"));
        assert_eq!(c.rotation_deg(), 0.0);
        assert_eq!(c.display_segments().len(), 18);
        assert_eq!(c.store().load(), c.segments());
        assert_eq!(c.store().backend().writes(), 1);
    }

    #[test]
    fn empty_label_is_a_no_op() {
        let mut c = controller();
        assert_eq!(c.add_prize("   ", "#123456"), Err(WheelError::EmptyLabel));
        assert_eq!(c.segments().len(), 8);
        assert_eq!(c.store().backend().writes(), 0);
    }

    #[test]
    fn remove_prize_shifts_and_persists() {
        let mut c = controller();
        let second = c.segments()[1].clone();
        c.remove_prize(0).unwrap();
        assert_eq!(c.segments().len(), 7);
        assert_eq!(c.segments()[0], second);
        assert_eq!(c.display_segments().len(), 14);
        assert_eq!(c.store().backend().writes(), 1);

        assert_eq!(
            c.remove_prize(7),
            Err(WheelError::IndexOutOfRange { index: 7, len: 7 })
        );
        assert_eq!(c.segments().len(), 7);
        assert_eq!(c.store().backend().writes(), 1);
    }

    #[test]
    fn empty_wheel_cannot_spin() {
        let mut c = controller();
        while !c.segments().is_empty() {
            c.remove_prize(0).unwrap();
        }
        assert_eq!(c.spin(0.0), Err(WheelError::NoSegments));
        assert!(c.controls_enabled());
        // An emptied list is not restored until the next load
        assert_eq!(c.store().load(), default_prizes());
    }

    #[test]
    fn teardown_stops_everything() {
        let mut c = controller();
        c.spin(0.0).unwrap();
        c.update(100.0);
        c.teardown();
        assert!(c.controls_enabled());
        assert!(!c.needs_frames());
        assert_eq!(c.spin_countdown_text(), "");
        assert!(c.update(5_000.0).is_empty());
    }
}
