//! Web Audio backend
//!
//! Procedurally generated cues - no external files needed.

use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

use super::{AudioSink, Cue, Unlock, combo_chord, hit_note};
use crate::catalog::Tier;

pub struct WebAudioSink {
    ctx: Option<AudioContext>,
}

impl Default for WebAudioSink {
    fn default() -> Self {
        Self::new()
    }
}

impl WebAudioSink {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx }
    }

    /// Handle the host awaits to learn when the unlock has landed
    pub fn context(&self) -> Option<AudioContext> {
        self.ctx.clone()
    }

    /// Oscillator routed through its own gain node
    fn voice(&self, ctx: &AudioContext, freq: f32, kind: OscillatorType) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(kind);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Plucked note: instant attack, exponential decay
    fn pluck(&self, ctx: &AudioContext, freq: f32, kind: OscillatorType, vol: f32, at: f64, len: f64) {
        let Some((osc, gain)) = self.voice(ctx, freq, kind) else {
            return;
        };
        gain.gain().set_value_at_time(vol, at).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, at + len)
            .ok();
        osc.start_with_when(at).ok();
        osc.stop_with_when(at + len + 0.02).ok();
    }

    /// Membrane thump: pitch drops fast
    fn thump(&self, ctx: &AudioContext, from: f32, to: f32, vol: f32, len: f64) {
        let Some((osc, gain)) = self.voice(ctx, from, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();
        gain.gain().set_value_at_time(vol, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + len)
            .ok();
        osc.frequency().set_value_at_time(from, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(to, t + 0.02)
            .ok();
        osc.start().ok();
        osc.stop_with_when(t + len + 0.02).ok();
    }
}

impl AudioSink for WebAudioSink {
    fn unlock(&mut self) -> Unlock {
        let Some(ctx) = &self.ctx else {
            // Nothing to unlock; cues are dropped by the missing context anyway
            return Unlock::Ready;
        };
        if ctx.state() == AudioContextState::Running {
            return Unlock::Ready;
        }
        let _ = ctx.resume();
        Unlock::Pending
    }

    fn play(&mut self, cue: Cue, vol: f32) {
        let Some(ctx) = self.ctx.as_ref() else { return };
        let t = ctx.current_time();

        match cue {
            Cue::Launch => self.thump(ctx, 392.0, 98.0, vol * 0.55, 0.12),
            Cue::Hit { combo, tier } => {
                self.pluck(ctx, hit_note(combo), OscillatorType::Triangle, vol * 0.5, t, 0.15);
                if tier == Tier::Heinous {
                    self.thump(ctx, 260.0, 65.0, vol * 0.7, 0.25);
                }
            }
            Cue::Combo { level } => {
                for freq in combo_chord(level) {
                    self.pluck(ctx, freq, OscillatorType::Sine, vol * 0.2, t, 0.12);
                }
            }
            Cue::Miss => self.pluck(ctx, 65.41, OscillatorType::Sine, vol * 0.3, t, 0.4),
            Cue::Tick => self.pluck(ctx, 1046.5, OscillatorType::Square, vol * 0.05, t, 0.03),
            Cue::Victory => {
                let chords: [([f32; 3], f64, f64); 3] = [
                    ([261.63, 329.63, 392.00], 0.0, 0.25),
                    ([329.63, 392.00, 523.25], 0.15, 0.25),
                    ([392.00, 523.25, 659.25], 0.3, 0.5),
                ];
                for (notes, offset, len) in chords {
                    for freq in notes {
                        self.pluck(ctx, freq, OscillatorType::Sine, vol * 0.2, t + offset, len);
                    }
                }
            }
        }
    }
}
