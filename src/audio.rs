//! Audio cues
//!
//! The game only needs two cues. Playback goes through a `SoundBackend`:
//! `RodioBackend` plays the loaded WAV clips on the default output device,
//! the bell stands in when no device opens, and tests record what was played.

use std::collections::HashMap;
use std::io::Write;

use rodio::{OutputStream, OutputStreamHandle, Sink, StreamError};

use crate::assets::{Assets, SoundClip};
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Fan collected
    Collect,
    /// Heater hit the player
    Hit,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 2] = [SoundEffect::Collect, SoundEffect::Hit];

    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::FanCollected { .. } => Some(SoundEffect::Collect),
            GameEvent::PlayerHit { .. } => Some(SoundEffect::Hit),
            _ => None,
        }
    }

    /// Asset file backing this cue
    pub fn file_name(&self) -> &'static str {
        match self {
            SoundEffect::Collect => "collect.wav",
            SoundEffect::Hit => "lose.wav",
        }
    }
}

/// Something that can make a noise
pub trait SoundBackend {
    /// Play `effect` at `volume` (0.0 - 1.0, never 0)
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Plays the loaded clips through rodio, one detached sink per cue
pub struct RodioBackend {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    clips: HashMap<SoundEffect, SoundClip>,
}

impl RodioBackend {
    /// Open the default output device
    pub fn try_new(assets: &Assets) -> Result<Self, StreamError> {
        let (stream, handle) = OutputStream::try_default()?;
        let clips = SoundEffect::ALL
            .into_iter()
            .filter_map(|effect| assets.sound(effect).map(|clip| (effect, clip.clone())))
            .collect();
        Ok(Self {
            _stream: stream,
            handle,
            clips,
        })
    }
}

impl SoundBackend for RodioBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        let Some(clip) = self.clips.get(&effect) else {
            log::debug!("No clip loaded for {:?}", effect);
            return;
        };
        match Sink::try_new(&self.handle) {
            Ok(sink) => {
                sink.set_volume(volume);
                sink.append(clip.source());
                sink.detach();
            }
            Err(e) => log::warn!("Could not play {:?}: {}", effect, e),
        }
    }
}

/// Terminal bell, used when no audio device is available
#[derive(Debug, Default)]
pub struct BellBackend;

impl SoundBackend for BellBackend {
    fn play(&mut self, effect: SoundEffect, _volume: f32) {
        let mut out = std::io::stdout();
        if out.write_all(b"\x07").and_then(|_| out.flush()).is_err() {
            log::debug!("Bell for {:?} could not be written", effect);
        }
    }
}

/// Backend that plays nothing
#[derive(Debug, Default)]
pub struct SilentBackend;

impl SoundBackend for SilentBackend {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) {}
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Box<dyn SoundBackend>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(Box::new(SilentBackend))
    }
}

impl AudioManager {
    pub fn new(backend: Box<dyn SoundBackend>) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
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
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.backend.play(effect, vol);
    }
}
