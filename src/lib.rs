//! Temperature Control - a single-screen arcade game
//!
//! Core modules:
//! - `sim`: Simulation (player, heaters, fans, power-ups, particles, game phases)
//! - `renderer`: Read-only render pass onto an injected `Canvas`
//! - `platform`: Terminal frontend (canvas rasterizer, keyboard input)
//! - `highscores`: Single-integer high score file
//! - `settings`: Player preferences (JSON)
//! - `assets`: Sprite and sound loading
//! - `ledger`: External score submission (`ScoreSink`)
//! - `app`: Fixed-timestep game loop gluing the above together

pub mod app;
pub mod assets;
pub mod audio;
pub mod geometry;
pub mod highscores;
pub mod ledger;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use geometry::Rect;
pub use highscores::HighScoreStore;
pub use ledger::ScoreSink;
pub use settings::Settings;

/// Game configuration constants
///
/// The game was tuned per 60 Hz frame; values here are per second so the
/// simulation can run on any `dt`.
pub mod consts {
    /// Simulation rate
    pub const TICK_RATE: f32 = 60.0;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the app loop will try to catch up on
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Playfield dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Player (AC unit)
    pub const PLAYER_SIZE: (f32, f32) = (60.0, 45.0);
    pub const PLAYER_SPEED: f32 = 9.0 * TICK_RATE;
    pub const MAX_LIVES: u8 = 3;
    pub const INVINCIBILITY_SECS: f64 = 2.0;
    pub const WOBBLE_SECS: f32 = 15.0 / TICK_RATE;
    /// Fraction of the remaining wobble removed per 60 Hz frame
    pub const WOBBLE_RECOVERY: f32 = 0.1;

    /// HUD life icon
    pub const LIFE_ICON_SIZE: (f32, f32) = (35.0, 25.0);

    /// Heaters
    pub const HEATER_SIZE: (f32, f32) = (70.0, 70.0);
    pub const FAST_HEATER_SIZE: (f32, f32) = (50.0, 50.0);
    pub const HEATER_BASE_SPEED: f32 = 1.5 * TICK_RATE;
    pub const FAST_HEATER_BASE_SPEED: f32 = 2.5 * TICK_RATE;
    /// Score points per extra pixel-per-frame of heater speed
    pub const HEATER_SPEED_SCORE_DIVISOR: f32 = 150.0;
    /// Heaters spawn this far above or below the playfield
    pub const HEATER_SPAWN_MARGIN: f32 = 50.0;
    /// Every multiple of this score adds a heater
    pub const HEATER_SCORE_MILESTONE: u32 = 70;

    /// Fans
    pub const FAN_SIZE: (f32, f32) = (50.0, 50.0);
    pub const FAN_POINTS: u32 = 10;
    pub const BOOSTED_FAN_POINTS: u32 = 30;
    pub const FAN_SPIN_DEG_PER_SEC: f32 = 5.0 * TICK_RATE;
    /// Keep-out border for fan and power-up placement
    pub const SPAWN_BORDER: f32 = 50.0;
    pub const ECHO_SCALE_PER_SEC: f32 = 0.1 * TICK_RATE;
    pub const ECHO_FADE_PER_SEC: f32 = 15.0 * TICK_RATE;

    /// Power-ups
    pub const POWERUP_SIZE: f32 = 35.0;
    pub const POWERUP_EFFECT_SECS: f64 = 6.0;
    pub const POWERUP_SPAWN_MIN_SECS: f64 = 15.0;
    pub const POWERUP_SPAWN_MAX_SECS: f64 = 20.0;
    pub const FANS_PER_SCORE_BOOST: u32 = 6;
    pub const FANS_PER_LIFE: u32 = 10;

    /// Blast ability
    pub const FREEZE_SECS: f64 = 3.0;
    pub const BLAST_COOLDOWN_SECS: f64 = 10.0;

    /// Screen shake after taking damage
    pub const SHAKE_SECS: f32 = 20.0 / TICK_RATE;
    pub const SHAKE_AMPLITUDE: f32 = 8.0;

    /// Heater pulse animation phase speed (radians per second)
    pub const PULSE_RATE: f32 = 0.1 * TICK_RATE;

    /// Game-over fireworks
    pub const BURST_PARTICLES: usize = 100;
    pub const PARTICLE_MIN_SPEED: f32 = 2.0 * TICK_RATE;
    pub const PARTICLE_MAX_SPEED: f32 = 6.0 * TICK_RATE;
    pub const PARTICLE_GRAVITY: f32 = 0.1 * TICK_RATE * TICK_RATE;
    pub const PARTICLE_SHRINK_PER_SEC: f32 = 0.08 * TICK_RATE;
    pub const PARTICLE_LIFE_SECS: f32 = 80.0 / TICK_RATE;
    pub const PARTICLE_MIN_RADIUS: u32 = 4;
    pub const PARTICLE_MAX_RADIUS: u32 = 7;
}

/// Frame-rate independent exponential approach
///
/// `rate_per_frame` is the fraction of the remaining distance covered in one
/// 60 Hz frame; the result is the fraction to cover in `dt` seconds.
#[inline]
pub fn approach_factor(rate_per_frame: f32, dt: f32) -> f32 {
    1.0 - (1.0 - rate_per_frame).powf(dt * consts::TICK_RATE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approach_factor_matches_one_frame() {
        let f = approach_factor(0.1, consts::SIM_DT);
        assert!((f - 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_approach_factor_zero_dt() {
        assert_eq!(approach_factor(0.1, 0.0), 0.0);
    }
}
