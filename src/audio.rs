//! Audio system
//!
//! The game never talks to a sound device directly: the simulation records
//! `GameEvent`s and `AudioManager` turns them into sound effects and music
//! cues on an `AudioBackend`. Backend failures are logged and dropped, so a
//! missing audio device never affects the game.
//!
//! On the web the backend is procedural Web Audio (oscillators, no files).

use std::fmt;

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Jump, double jump and dash
    Jump,
    /// Hard landing
    Bump,
    /// Player died
    Hurt,
    /// Goal reached
    Gem,
    /// Menu action confirmed
    Select,
}

/// Audio backend failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// No audio context (unsupported browser, insecure context, native build)
    Unavailable,
    /// Creating or wiring an audio node failed
    Node(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::Unavailable => write!(f, "audio unavailable"),
            AudioError::Node(msg) => write!(f, "audio node error: {msg}"),
        }
    }
}

impl std::error::Error for AudioError {}

/// Something that can make noise
pub trait AudioBackend {
    /// Play a one-shot effect at `volume` (0.0 - 1.0)
    fn play_effect(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
    /// Start the looping background music, replacing any current track
    fn start_music(&mut self, volume: f32) -> Result<(), AudioError>;
    /// Stop the background music; stopping silence is fine
    fn stop_music(&mut self) -> Result<(), AudioError>;
    /// Resume a suspended device (browsers require a user gesture)
    fn resume(&mut self) {}
}

/// Silent backend for native builds and tests
#[derive(Debug, Default)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn play_effect(&mut self, effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
        log::debug!("(silent) effect {:?}", effect);
        Ok(())
    }

    fn start_music(&mut self, _volume: f32) -> Result<(), AudioError> {
        log::debug!("(silent) music start");
        Ok(())
    }

    fn stop_music(&mut self) -> Result<(), AudioError> {
        log::debug!("(silent) music stop");
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Box<dyn AudioBackend>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    music_playing: bool,
}

impl AudioManager {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            muted: false,
            music_playing: false,
        }
    }

    /// Platform default: Web Audio in the browser, silence elsewhere
    pub fn for_platform() -> Self {
        #[cfg(target_arch = "wasm32")]
        let backend: Box<dyn AudioBackend> = Box::new(web::WebAudioBackend::new());
        #[cfg(not(target_arch = "wasm32"))]
        let backend: Box<dyn AudioBackend> = Box::new(NullBackend);
        Self::new(backend)
    }

    /// Copy volumes from player settings
    pub fn apply_settings(&mut self, settings: &crate::Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.music_volume = settings.music_volume.clamp(0.0, 1.0);
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&mut self) {
        self.backend.resume();
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted && self.music_playing {
            self.stop_music();
        }
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    fn effective_volume(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }

    /// Play a sound effect, ignoring failures
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(self.sfx_volume);
        if vol <= 0.0 {
            return;
        }
        if let Err(e) = self.backend.play_effect(effect, vol) {
            log::debug!("Sound effect {:?} dropped: {}", effect, e);
        }
    }

    fn start_music(&mut self) {
        let vol = self.effective_volume(self.music_volume);
        if vol <= 0.0 {
            return;
        }
        match self.backend.start_music(vol) {
            Ok(()) => self.music_playing = true,
            Err(e) => log::debug!("Music start dropped: {}", e),
        }
    }

    fn stop_music(&mut self) {
        if let Err(e) = self.backend.stop_music() {
            log::debug!("Music stop dropped: {}", e);
        }
        self.music_playing = false;
    }

    /// React to one simulation event
    pub fn handle_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Jumped | GameEvent::DoubleJumped | GameEvent::Dashed => {
                self.play(SoundEffect::Jump)
            }
            GameEvent::Landed => self.play(SoundEffect::Bump),
            GameEvent::Died => self.play(SoundEffect::Hurt),
            GameEvent::GoalReached { .. } => self.play(SoundEffect::Gem),
            GameEvent::MenuSelect => self.play(SoundEffect::Select),
            GameEvent::MusicStart => self.start_music(),
            GameEvent::MusicStop => self.stop_music(),
        }
    }

    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            self.handle_event(event);
        }
    }
}

/// Start one voice per frequency. Voices that started stay in `voices`
/// even when a later one fails, so they can still be stopped.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn start_voices<V>(
    freqs: &[f32],
    voices: &mut Vec<V>,
    mut start: impl FnMut(f32) -> Result<V, AudioError>,
) -> Result<(), AudioError> {
    for &freq in freqs {
        voices.push(start(freq)?);
    }
    Ok(())
}

/// Stop and drop every voice; the first failure is returned after all were tried
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn stop_voices<V>(
    voices: &mut Vec<V>,
    mut stop: impl FnMut(&V) -> Result<(), AudioError>,
) -> Result<(), AudioError> {
    let mut result = Ok(());
    for voice in voices.drain(..) {
        if let Err(e) = stop(&voice) {
            if result.is_ok() {
                result = Err(e);
            }
        }
    }
    result
}

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioBackend, AudioError, SoundEffect, start_voices, stop_voices};

    fn node_err(e: wasm_bindgen::JsValue) -> AudioError {
        AudioError::Node(format!("{e:?}"))
    }

    /// Procedural Web Audio sounds
    pub struct WebAudioBackend {
        ctx: Option<AudioContext>,
        music: Vec<OscillatorNode>,
    }

    impl WebAudioBackend {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                music: Vec::new(),
            }
        }

        fn ctx(&self) -> Result<&AudioContext, AudioError> {
            let ctx = self.ctx.as_ref().ok_or(AudioError::Unavailable)?;
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            Ok(ctx)
        }

        /// Oscillator wired through its own gain node to the speakers
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Result<(OscillatorNode, GainNode), AudioError> {
            let osc = ctx.create_oscillator().map_err(node_err)?;
            let gain = ctx.create_gain().map_err(node_err)?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).map_err(node_err)?;
            gain.connect_with_audio_node(&ctx.destination()).map_err(node_err)?;

            Ok((osc, gain))
        }

        /// Single decaying note with an optional pitch sweep
        fn blip(
            ctx: &AudioContext,
            osc_type: OscillatorType,
            from: f32,
            to: f32,
            start: f64,
            length: f64,
            vol: f32,
        ) -> Result<(), AudioError> {
            let (osc, gain) = Self::create_osc(ctx, from, osc_type)?;
            gain.gain().set_value_at_time(vol, start).map_err(node_err)?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, start + length)
                .map_err(node_err)?;
            if to != from {
                osc.frequency().set_value_at_time(from, start).map_err(node_err)?;
                osc.frequency()
                    .exponential_ramp_to_value_at_time(to, start + length)
                    .map_err(node_err)?;
            }
            osc.start_with_when(start).map_err(node_err)?;
            osc.stop_with_when(start + length + 0.05).map_err(node_err)?;
            Ok(())
        }
    }

    impl AudioBackend for WebAudioBackend {
        fn play_effect(&mut self, effect: SoundEffect, vol: f32) -> Result<(), AudioError> {
            let ctx = self.ctx()?;
            let t = ctx.current_time();

            match effect {
                // Quick rising chirp
                SoundEffect::Jump => {
                    Self::blip(ctx, OscillatorType::Triangle, 300.0, 700.0, t, 0.12, vol * 0.3)
                }
                // Low thud
                SoundEffect::Bump => {
                    Self::blip(ctx, OscillatorType::Sine, 150.0, 60.0, t, 0.1, vol * 0.5)
                }
                // Descending buzz
                SoundEffect::Hurt => {
                    Self::blip(ctx, OscillatorType::Sawtooth, 400.0, 80.0, t, 0.4, vol * 0.35)
                }
                // Bright arpeggio
                SoundEffect::Gem => {
                    for (i, freq) in [600.0, 800.0, 1000.0, 1200.0].iter().enumerate() {
                        let start = t + i as f64 * 0.08;
                        Self::blip(ctx, OscillatorType::Sine, *freq, *freq, start, 0.2, vol * 0.25)?;
                    }
                    Ok(())
                }
                // Short click
                SoundEffect::Select => {
                    Self::blip(ctx, OscillatorType::Square, 800.0, 800.0, t, 0.05, vol * 0.15)
                }
            }
        }

        fn start_music(&mut self, vol: f32) -> Result<(), AudioError> {
            self.stop_music()?;
            let ctx = self.ctx()?.clone();

            // Quiet root + fifth drone
            start_voices(&[110.0, 164.8], &mut self.music, |freq| {
                let (osc, gain) = Self::create_osc(&ctx, freq, OscillatorType::Triangle)?;
                gain.gain().set_value(vol * 0.08);
                osc.start().map_err(node_err)?;
                Ok(osc)
            })
        }

        fn stop_music(&mut self) -> Result<(), AudioError> {
            stop_voices(&mut self.music, |osc| osc.stop().map_err(node_err))
        }

        fn resume(&mut self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }
    }
}
