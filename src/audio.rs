//! Web Audio playback of synthesized tones.

use crate::feedback::{Envelope, Tone};
use log::{debug, warn};
use web_sys::{AudioContext, GainNode, OscillatorType};

const SILENCE: f32 = 0.0001;

/// Lazily created audio context.
///
/// Browsers only allow an `AudioContext` to start from a user gesture, so
/// [`WebAudio::arm`] is called from the spin click handler. Until then every
/// tone is dropped.
#[derive(Default)]
pub struct WebAudio {
    ctx: Option<AudioContext>,
}

impl WebAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self) {
        if self.ctx.is_some() {
            return;
        }
        match AudioContext::new() {
            Ok(ctx) => {
                let _ = ctx.resume();
                self.ctx = Some(ctx);
            }
            Err(e) => warn!("Audio unavailable: {:?}", e),
        }
    }

    pub fn play(&self, tone: &Tone) {
        let Some(ctx) = &self.ctx else {
            return;
        };
        if play_tone(ctx, tone).is_none() {
            debug!("Dropped tone at {}Hz", tone.frequency);
        }
    }
}

fn play_tone(ctx: &AudioContext, tone: &Tone) -> Option<()> {
    let start = ctx.current_time() + tone.delay;
    let end = start + tone.duration;

    let osc = ctx.create_oscillator().ok()?;
    let Ok(gain): Result<GainNode, _> = ctx.create_gain() else {
        return None;
    };

    osc.set_type(OscillatorType::Sine);
    osc.frequency().set_value_at_time(tone.frequency, start).ok()?;

    let g = gain.gain();
    g.set_value_at_time(0.0, start).ok()?;
    let stop_at = match tone.envelope {
        Envelope::Pluck => {
            g.linear_ramp_to_value_at_time(tone.volume, start + 0.006).ok()?;
            g.exponential_ramp_to_value_at_time(SILENCE, end).ok()?;
            end + 0.02
        }
        Envelope::Bell => {
            g.linear_ramp_to_value_at_time(tone.volume, start + 0.01).ok()?;
            g.linear_ramp_to_value_at_time(SILENCE, end).ok()?;
            end + 0.03
        }
    };

    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;
    osc.start_with_when(start).ok()?;
    osc.stop_with_when(stop_at).ok()?;
    Some(())
}
