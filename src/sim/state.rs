//! Session state and core simulation types
//!
//! Everything the update loop mutates lives in [`SessionState`]; the renderer
//! only ever reads it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::particles::Particle;
use crate::consts::*;
use crate::geometry::Rect;

/// Which screen the game is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start key
    TitleScreen,
    /// Active gameplay
    Playing,
    /// Gameplay suspended, resumes on the pause key
    Paused,
    /// Lives ran out; fireworks, then the score screen
    GameOver,
}

/// Squash-and-stretch applied to the player sprite after moving
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wobble {
    pub scale: Vec2,
    /// Seconds of recovery left
    pub remaining: f32,
}

impl Default for Wobble {
    fn default() -> Self {
        Self {
            scale: Vec2::ONE,
            remaining: 0.0,
        }
    }
}

impl Wobble {
    pub fn horizontal() -> Self {
        Self {
            scale: Vec2::new(1.3, 0.7),
            remaining: WOBBLE_SECS,
        }
    }

    pub fn vertical() -> Self {
        Self {
            scale: Vec2::new(0.7, 1.3),
            remaining: WOBBLE_SECS,
        }
    }

    /// Ease the scale back toward 1.0 while the recovery window lasts
    pub fn recover(&mut self, dt: f32) {
        if self.remaining <= 0.0 {
            return;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        let t = crate::approach_factor(WOBBLE_RECOVERY, dt);
        self.scale += (Vec2::ONE - self.scale) * t;
    }
}

/// The player's air conditioner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    pub wobble: Wobble,
    /// Damage immunity deadline (session clock), set after a hit
    pub invincible_until: Option<f64>,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            rect: Rect::from_center(
                Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0),
                PLAYER_SIZE.into(),
            ),
            wobble: Wobble::default(),
            invincible_until: None,
        }
    }
}

impl Player {
    /// Post-hit invincibility (shield power-ups are tracked separately)
    pub fn is_invincible(&self) -> bool {
        self.invincible_until.is_some()
    }
}

/// Heater variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaterKind {
    Normal,
    /// Smaller and quicker
    Fast,
}

impl HeaterKind {
    pub fn size(&self) -> Vec2 {
        match self {
            HeaterKind::Normal => HEATER_SIZE.into(),
            HeaterKind::Fast => FAST_HEATER_SIZE.into(),
        }
    }

    /// Speed (pixels/second) of a heater spawned at `score`
    pub fn speed_at(&self, score: u32) -> f32 {
        let base = match self {
            HeaterKind::Normal => HEATER_BASE_SPEED,
            HeaterKind::Fast => FAST_HEATER_BASE_SPEED,
        };
        base + score as f32 / HEATER_SPEED_SCORE_DIVISOR * TICK_RATE
    }
}

/// A heat-seeking enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heater {
    pub id: u32,
    pub kind: HeaterKind,
    pub rect: Rect,
    /// Pixels per second, fixed at spawn
    pub speed: f32,
    /// Blast freeze deadline (session clock)
    pub frozen_until: Option<f64>,
}

impl Heater {
    pub fn new(id: u32, kind: HeaterKind, center: Vec2, score: u32) -> Self {
        Self {
            id,
            kind,
            rect: Rect::from_center(center, kind.size()),
            speed: kind.speed_at(score),
            frozen_until: None,
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_until.is_some()
    }
}

/// The collectible fan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fan {
    pub rect: Rect,
}

impl Fan {
    pub fn at(center: Vec2) -> Self {
        Self {
            rect: Rect::from_center(center, FAN_SIZE.into()),
        }
    }
}

/// Fading "pop" left behind where a fan was collected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanEcho {
    pub center: Vec2,
    pub scale: f32,
    /// 0-255
    pub alpha: f32,
}

impl FanEcho {
    pub fn at(center: Vec2) -> Self {
        Self {
            center,
            scale: 1.0,
            alpha: 255.0,
        }
    }

    /// Grow and fade; returns false once fully transparent
    pub fn advance(&mut self, dt: f32) -> bool {
        self.scale += ECHO_SCALE_PER_SEC * dt;
        self.alpha -= ECHO_FADE_PER_SEC * dt;
        self.alpha > 0.0
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Temporary immunity to heaters
    Shield,
    /// Fans are worth triple for a while
    ScoreBoost,
    /// One extra life, up to the cap
    Life,
}

impl PowerUpKind {
    /// HUD label
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "SHIELD",
            PowerUpKind::ScoreBoost => "SCORE BOOST",
            PowerUpKind::Life => "LIFE",
        }
    }
}

/// A power-up waiting on the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub rect: Rect,
}

/// A collected timed power-up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub kind: PowerUpKind,
    pub expires_at: f64,
}

/// Things that happened during a tick, for audio and persistence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new session started (from title or game over)
    SessionStarted,
    Paused,
    Resumed,
    FanCollected { points: u32 },
    HeaterSpawned { kind: HeaterKind },
    PlayerHit { lives_left: u8 },
    PowerUpSpawned { kind: PowerUpKind },
    PowerUpCollected { kind: PowerUpKind },
    BlastFired,
    GameOver { score: u32, new_high_score: bool },
}

/// Complete mutable state of one game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Seconds of gameplay elapsed this session; every deadline is on this clock
    pub clock: f64,
    pub score: u32,
    pub lives: u8,
    /// Best score seen, carried across sessions
    pub high_score: u32,
    /// Whether this session beat the high score it started with
    pub new_high_score: bool,
    pub player: Player,
    pub heaters: Vec<Heater>,
    pub fan: Fan,
    pub fan_echoes: Vec<FanEcho>,
    /// At most one power-up on the field
    pub powerup: Option<PowerUp>,
    pub effect: Option<ActiveEffect>,
    /// When the next shield tries to spawn
    pub powerup_spawn_at: f64,
    /// Fans collected toward the next score boost
    pub fans_toward_boost: u32,
    /// Fans collected toward the next extra life (counted while lives < 3)
    pub fans_toward_life: u32,
    /// Blast is unavailable until this time
    pub blast_cooldown_until: Option<f64>,
    /// Seconds of screen shake left
    pub screen_shake: f32,
    /// Fan sprite rotation (degrees)
    pub fan_rotation: f32,
    /// Heater pulse animation phase (radians)
    pub pulse_phase: f32,
    /// Game-over fireworks
    pub particles: Vec<Particle>,
    /// Events emitted since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl SessionState {
    /// Create a game sitting on the title screen
    pub fn new(seed: u64, high_score: u32) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::TitleScreen,
            clock: 0.0,
            score: 0,
            lives: MAX_LIVES,
            high_score,
            new_high_score: false,
            player: Player::default(),
            heaters: Vec::new(),
            fan: Fan::at(Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 4.0)),
            fan_echoes: Vec::new(),
            powerup: None,
            effect: None,
            powerup_spawn_at: 0.0,
            fans_toward_boost: 0,
            fans_toward_life: 0,
            blast_cooldown_until: None,
            screen_shake: 0.0,
            fan_rotation: 0.0,
            pulse_phase: 0.0,
            particles: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };
        state.reset();
        state
    }

    /// Start a fresh session: new player, one heater, new fan, full lives.
    ///
    /// The phase, RNG stream and high score carry over.
    pub fn reset(&mut self) {
        self.clock = 0.0;
        self.score = 0;
        self.lives = MAX_LIVES;
        self.new_high_score = false;
        self.player = Player::default();
        self.heaters.clear();
        self.fan_echoes.clear();
        self.particles.clear();
        self.powerup = None;
        self.effect = None;
        self.fans_toward_boost = 0;
        self.fans_toward_life = 0;
        self.blast_cooldown_until = None;
        self.screen_shake = 0.0;
        self.fan_rotation = 0.0;
        self.pulse_phase = 0.0;
        self.next_id = 1;

        self.spawn_heater();
        self.fan = Fan::at(self.random_field_point());
        self.powerup_spawn_at = self.next_powerup_spawn_time();
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Random point inside the playfield's spawn border
    pub fn random_field_point(&mut self) -> Vec2 {
        let x = self
            .rng
            .random_range(SPAWN_BORDER..=SCREEN_WIDTH - SPAWN_BORDER);
        let y = self
            .rng
            .random_range(SPAWN_BORDER..=SCREEN_HEIGHT - SPAWN_BORDER);
        Vec2::new(x.round(), y.round())
    }

    /// Deadline for the next timed shield spawn
    pub fn next_powerup_spawn_time(&mut self) -> f64 {
        self.clock
            + self
                .rng
                .random_range(POWERUP_SPAWN_MIN_SECS..=POWERUP_SPAWN_MAX_SECS)
    }

    /// Whether the blast ability can be used
    pub fn blast_ready(&self) -> bool {
        self.blast_cooldown_until.is_none()
    }

    /// Kind of the timed power-up currently running
    pub fn active_effect(&self) -> Option<PowerUpKind> {
        self.effect.map(|e| e.kind)
    }

    /// Damage is ignored while invincible after a hit or while shielded
    pub fn is_protected(&self) -> bool {
        self.player.is_invincible() || self.active_effect() == Some(PowerUpKind::Shield)
    }

    /// Points the next fan is worth
    pub fn fan_value(&self) -> u32 {
        if self.active_effect() == Some(PowerUpKind::ScoreBoost) {
            BOOSTED_FAN_POINTS
        } else {
            FAN_POINTS
        }
    }

    /// Whether the game-over text may be shown (fireworks finished)
    pub fn game_over_revealed(&self) -> bool {
        self.phase == GamePhase::GameOver && self.particles.is_empty()
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_on_title_screen() {
        let state = SessionState::new(7, 100);
        assert_eq!(state.phase, GamePhase::TitleScreen);
        assert_eq!(state.lives, MAX_LIVES);
        assert_eq!(state.high_score, 100);
        assert_eq!(state.heaters.len(), 1);
        assert!(state.powerup.is_none());
        assert!(state.blast_ready());
    }

    #[test]
    fn test_reset_clears_session_keeps_high_score() {
        let mut state = SessionState::new(7, 50);
        state.score = 140;
        state.high_score = 140;
        state.lives = 1;
        state.heaters.push(Heater::new(99, HeaterKind::Fast, Vec2::ZERO, 0));
        state.blast_cooldown_until = Some(4.0);
        state.reset();
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, MAX_LIVES);
        assert_eq!(state.high_score, 140);
        assert_eq!(state.heaters.len(), 1);
        assert!(state.blast_ready());
    }

    #[test]
    fn test_random_field_point_in_bounds() {
        let mut state = SessionState::new(3, 0);
        for _ in 0..200 {
            let p = state.random_field_point();
            assert!((SPAWN_BORDER..=SCREEN_WIDTH - SPAWN_BORDER).contains(&p.x));
            assert!((SPAWN_BORDER..=SCREEN_HEIGHT - SPAWN_BORDER).contains(&p.y));
        }
    }

    #[test]
    fn test_powerup_spawn_window() {
        let mut state = SessionState::new(11, 0);
        for _ in 0..100 {
            let t = state.next_powerup_spawn_time();
            assert!((POWERUP_SPAWN_MIN_SECS..=POWERUP_SPAWN_MAX_SECS).contains(&t));
        }
    }

    #[test]
    fn test_heater_speed_scales_with_score() {
        assert_eq!(HeaterKind::Normal.speed_at(0), 90.0);
        assert_eq!(HeaterKind::Fast.speed_at(0), 150.0);
        assert_eq!(HeaterKind::Normal.speed_at(150), 150.0);
    }

    #[test]
    fn test_wobble_recovers_toward_one() {
        let mut wobble = Wobble::horizontal();
        for _ in 0..20 {
            wobble.recover(SIM_DT);
        }
        assert_eq!(wobble.remaining, 0.0);
        assert!(wobble.scale.x < 1.3 && wobble.scale.x > 1.0);
        assert!(wobble.scale.y > 0.7 && wobble.scale.y < 1.0);
        let frozen = wobble.scale;
        wobble.recover(SIM_DT);
        assert_eq!(wobble.scale, frozen);
    }

    #[test]
    fn test_fan_echo_fades_out() {
        let mut echo = FanEcho::at(Vec2::ZERO);
        let mut frames = 0;
        while echo.advance(SIM_DT) {
            frames += 1;
        }
        assert_eq!(frames, 16);
        assert!(echo.scale > 2.0);
    }
}
