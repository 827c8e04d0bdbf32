//! Startup assets: three sprites and two sound cues
//!
//! Everything is loaded once before the first frame. Any failure is returned
//! as an `AssetError`; the binary treats it as fatal.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use rodio::decoder::DecoderError;
use rodio::source::Buffered;
use rodio::{Decoder, Source};
use thiserror::Error;

use crate::audio::SoundEffect;
use crate::consts::*;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to decode sound {path}: {source}")]
    Sound {
        path: PathBuf,
        #[source]
        source: DecoderError,
    },
}

/// Sprites the renderer can blit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Player,
    Heater,
    FastHeater,
    Fan,
    LifeIcon,
}

impl SpriteId {
    pub const ALL: [SpriteId; 5] = [
        SpriteId::Player,
        SpriteId::Heater,
        SpriteId::FastHeater,
        SpriteId::Fan,
        SpriteId::LifeIcon,
    ];

    /// Source image file
    pub fn file_name(&self) -> &'static str {
        match self {
            SpriteId::Player | SpriteId::LifeIcon => "ac.png",
            SpriteId::Heater | SpriteId::FastHeater => "heater.png",
            SpriteId::Fan => "fan.png",
        }
    }

    /// Size the image is scaled to at load time, in pixels
    pub fn size(&self) -> (u32, u32) {
        match self {
            SpriteId::Player => pixels(PLAYER_SIZE),
            SpriteId::Heater => pixels(HEATER_SIZE),
            SpriteId::FastHeater => pixels(FAST_HEATER_SIZE),
            SpriteId::Fan => pixels(FAN_SIZE),
            SpriteId::LifeIcon => pixels(LIFE_ICON_SIZE),
        }
    }
}

fn pixels((w, h): (f32, f32)) -> (u32, u32) {
    (w as u32, h as u32)
}

/// Decoded RGBA sprite
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA
    pub pixels: Vec<[u8; 4]>,
}

impl Sprite {
    /// Decode `bytes` and scale to `width` x `height`
    pub fn decode(bytes: &[u8], width: u32, height: u32) -> Result<Self, image::ImageError> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let scaled = imageops::resize(&rgba, width, height, FilterType::Nearest);
        Ok(Self {
            width,
            height,
            pixels: scaled.pixels().map(|p| p.0).collect(),
        })
    }

    /// Nearest pixel at normalized coordinates (0..1)
    pub fn sample(&self, u: f32, v: f32) -> [u8; 4] {
        if self.width == 0 || self.height == 0 {
            return [0; 4];
        }
        let x = ((u * self.width as f32) as i64).clamp(0, self.width as i64 - 1) as usize;
        let y = ((v * self.height as f32) as i64).clamp(0, self.height as i64 - 1) as usize;
        self.pixels[y * self.width as usize + x]
    }
}

/// Playback source handed to a sink
pub type ClipSource = Buffered<Decoder<Cursor<Vec<u8>>>>;

/// Decoded sound cue; clones share the decoded samples
#[derive(Clone)]
pub struct SoundClip(ClipSource);

impl SoundClip {
    pub fn decode(bytes: Vec<u8>) -> Result<Self, DecoderError> {
        let decoder = Decoder::new(Cursor::new(bytes))?;
        Ok(Self(decoder.buffered()))
    }

    /// Fresh playback source positioned at the start
    pub fn source(&self) -> ClipSource {
        self.0.clone()
    }

    pub fn channels(&self) -> u16 {
        self.0.channels()
    }

    pub fn sample_rate(&self) -> u32 {
        self.0.sample_rate()
    }
}

impl fmt::Debug for SoundClip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoundClip")
            .field("channels", &self.channels())
            .field("sample_rate", &self.sample_rate())
            .finish()
    }
}

/// Everything loaded from the assets directory
#[derive(Debug, Clone)]
pub struct Assets {
    sprites: HashMap<SpriteId, Sprite>,
    sounds: HashMap<SoundEffect, SoundClip>,
}

impl Assets {
    /// Load every sprite and sound from `dir`
    pub fn load(dir: &Path) -> Result<Self, AssetError> {
        let mut sprites = HashMap::new();
        for id in SpriteId::ALL {
            let path = dir.join(id.file_name());
            let bytes = read(&path)?;
            let (w, h) = id.size();
            let sprite = Sprite::decode(&bytes, w, h)
                .map_err(|source| AssetError::Image { path, source })?;
            sprites.insert(id, sprite);
        }

        let mut sounds = HashMap::new();
        for effect in SoundEffect::ALL {
            let path = dir.join(effect.file_name());
            let bytes = read(&path)?;
            let clip =
                SoundClip::decode(bytes).map_err(|source| AssetError::Sound { path, source })?;
            sounds.insert(effect, clip);
        }

        log::info!(
            "Loaded {} sprites and {} sounds from {}",
            sprites.len(),
            sounds.len(),
            dir.display()
        );
        Ok(Self { sprites, sounds })
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(&id)
    }

    pub fn sound(&self, effect: SoundEffect) -> Option<&SoundClip> {
        self.sounds.get(&effect)
    }
}

fn read(path: &Path) -> Result<Vec<u8>, AssetError> {
    fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })
}
