//! Fixed timestep simulation tick
//!
//! Phase transitions and the per-tick gameplay update.

use glam::Vec2;

use super::particles::{burst, update_particles};
use super::state::{FanEcho, GameEvent, GamePhase, SessionState, Wobble};
use crate::consts::*;
use crate::geometry::Rect;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held direction keys
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Start from the title screen (Space)
    pub start: bool,
    /// Pause toggle (P)
    pub pause: bool,
    /// Freeze heaters (Shift)
    pub blast: bool,
    /// Restart after game over (R)
    pub restart: bool,
}

impl TickInput {
    /// Copy with the one-shot keys cleared, keeping held directions
    pub fn held_only(&self) -> Self {
        Self {
            left: self.left,
            right: self.right,
            up: self.up,
            down: self.down,
            ..Default::default()
        }
    }

    fn direction(&self) -> Vec2 {
        let x = self.right as i32 - self.left as i32;
        let y = self.down as i32 - self.up as i32;
        Vec2::new(x as f32, y as f32)
    }
}

/// Advance the game by one timestep
pub fn tick(state: &mut SessionState, input: &TickInput, dt: f32) {
    match state.phase {
        GamePhase::TitleScreen => {
            if input.start {
                start_session(state);
            }
        }
        GamePhase::Paused => {
            if input.pause {
                state.phase = GamePhase::Playing;
                state.emit(GameEvent::Resumed);
                log::debug!("Resumed at {:.2}s", state.clock);
            }
        }
        GamePhase::GameOver => {
            update_particles(&mut state.particles, dt);
            if input.restart {
                start_session(state);
            }
        }
        GamePhase::Playing => {
            if input.pause {
                state.phase = GamePhase::Paused;
                state.emit(GameEvent::Paused);
                log::debug!("Paused at {:.2}s", state.clock);
                return;
            }
            if input.blast {
                state.fire_blast();
            }
            update_playing(state, input, dt);
        }
    }
}

/// Reset the session and enter gameplay
fn start_session(state: &mut SessionState) {
    state.reset();
    state.phase = GamePhase::Playing;
    state.emit(GameEvent::SessionStarted);
    log::debug!("Session started (high score {})", state.high_score);
}

/// One tick of active gameplay
fn update_playing(state: &mut SessionState, input: &TickInput, dt: f32) {
    state.clock += f64::from(dt);

    // Animations
    state.fan_rotation = (state.fan_rotation + FAN_SPIN_DEG_PER_SEC * dt) % 360.0;
    state.pulse_phase += PULSE_RATE * dt;
    state.player.wobble.recover(dt);
    state.screen_shake = (state.screen_shake - dt).max(0.0);

    move_player(state, input.direction(), dt);
    expire_timers(state);

    state.move_heaters(dt);
    state.check_heater_contact();
    if state.phase != GamePhase::Playing {
        return;
    }

    state.update_powerup_timer();
    collect_fan(state);
    state.check_powerup_pickup();

    state.fan_echoes.retain_mut(|echo| echo.advance(dt));
}

/// Move the player inside the playfield and trigger the wobble
fn move_player(state: &mut SessionState, dir: Vec2, dt: f32) {
    if dir == Vec2::ZERO {
        return;
    }
    let bounds = Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT);
    let before = state.player.rect.pos;
    state.player.rect.pos += dir * PLAYER_SPEED * dt;
    state.player.rect.clamp_within(&bounds);
    let moved = state.player.rect.pos - before;

    if moved.x != 0.0 {
        state.player.wobble = Wobble::horizontal();
    } else if moved.y != 0.0 {
        state.player.wobble = Wobble::vertical();
    }
}

/// Clear invincibility, blast cooldown and power-up effect once they run out
fn expire_timers(state: &mut SessionState) {
    let now = state.clock;
    if state.player.invincible_until.is_some_and(|t| now > t) {
        state.player.invincible_until = None;
    }
    if state.blast_cooldown_until.is_some_and(|t| now > t) {
        state.blast_cooldown_until = None;
    }
    state.expire_effect();
}

/// Score the fan if the player touches it, then move it somewhere new
fn collect_fan(state: &mut SessionState) {
    if !state.player.rect.overlaps(&state.fan.rect) {
        return;
    }

    let points = state.fan_value();
    let before = state.score;
    state.score += points;
    state.emit(GameEvent::FanCollected { points });
    state.fan_echoes.push(FanEcho::at(state.fan.rect.center()));

    if state.score > state.high_score {
        state.high_score = state.score;
        state.new_high_score = true;
    }

    // One more heater for every milestone crossed
    let milestones = state.score / HEATER_SCORE_MILESTONE - before / HEATER_SCORE_MILESTONE;
    for _ in 0..milestones {
        state.spawn_heater();
    }

    state.count_fan_for_milestones();

    let center = state.random_field_point();
    state.fan.rect.set_center(center);
}

impl SessionState {
    /// Lives ran out: fireworks at the player's last position
    pub(crate) fn enter_game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.particles = burst(self.player.rect.center(), BURST_PARTICLES, &mut self.rng);
        self.emit(GameEvent::GameOver {
            score: self.score,
            new_high_score: self.new_high_score,
        });
        log::info!(
            "Game over: score {} (high score {})",
            self.score,
            self.high_score
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{PowerUpKind, SessionState};

    fn start() -> TickInput {
        TickInput {
            start: true,
            ..Default::default()
        }
    }

    fn pause() -> TickInput {
        TickInput {
            pause: true,
            ..Default::default()
        }
    }

    /// Started game with the player in the top-left corner, where power-ups
    /// never spawn, and the heater and fan parked out of reach
    fn playing_state(seed: u64) -> SessionState {
        playing_state_with_high(seed, 0)
    }

    fn playing_state_with_high(seed: u64, high_score: u32) -> SessionState {
        let mut state = SessionState::new(seed, high_score);
        tick(&mut state, &start(), SIM_DT);
        state.player.rect.pos = Vec2::ZERO;
        park_heaters(&mut state);
        park_fan(&mut state);
        state
    }

    fn park_heaters(state: &mut SessionState) {
        for heater in &mut state.heaters {
            heater.rect.set_center(Vec2::new(-5000.0, -5000.0));
            heater.speed = 0.0;
        }
    }

    fn park_fan(state: &mut SessionState) {
        state.fan.rect.set_center(Vec2::new(700.0, 500.0));
    }

    /// Put the fan under the player and run one tick
    fn collect_one_fan(state: &mut SessionState) {
        let center = state.player.rect.center();
        state.fan.rect.set_center(center);
        tick(state, &TickInput::default(), SIM_DT);
        park_fan(state);
    }

    fn put_powerup_on_player(state: &mut SessionState) {
        let center = state.player.rect.center();
        if let Some(p) = state.powerup.as_mut() {
            p.rect.set_center(center);
        }
    }

    #[test]
    fn test_title_to_playing() {
        let mut state = SessionState::new(1, 0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::TitleScreen);
        tick(&mut state, &start(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.drain_events().contains(&GameEvent::SessionStarted));
    }

    #[test]
    fn test_tick_pause() {
        let mut state = playing_state(2);
        tick(&mut state, &pause(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        tick(&mut state, &pause(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_restart_only_from_game_over() {
        let mut state = playing_state(3);
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        state.score = 40;
        tick(&mut state, &restart, SIM_DT);
        assert_eq!(state.score, 40);

        state.enter_game_over();
        tick(&mut state, &restart, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_start_ignored_while_playing() {
        let mut state = playing_state(4);
        state.score = 20;
        tick(&mut state, &start(), SIM_DT);
        assert_eq!(state.score, 20);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_clock_frozen_while_paused() {
        let mut state = playing_state(5);
        tick(&mut state, &TickInput::default(), SIM_DT);
        let clock = state.clock;
        tick(&mut state, &pause(), SIM_DT);
        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.clock, clock);
    }

    #[test]
    fn test_player_moves_and_wobbles() {
        let mut state = playing_state(6);
        let before = state.player.rect.center();
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        tick(&mut state, &right, SIM_DT);
        let after = state.player.rect.center();
        assert!((after.x - before.x - 9.0).abs() < 1e-3);
        assert_eq!(state.player.wobble.scale, Vec2::new(1.3, 0.7));
    }

    #[test]
    fn test_player_stays_on_screen() {
        let mut state = playing_state(7);
        let left_up = TickInput {
            left: true,
            up: true,
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut state, &left_up, SIM_DT);
        }
        assert_eq!(state.player.rect.pos, Vec2::ZERO);
    }

    #[test]
    fn test_fan_pickup_awards_ten() {
        let mut state = playing_state(8);
        collect_one_fan(&mut state);
        assert_eq!(state.score, FAN_POINTS);
        assert_eq!(state.fan_echoes.len(), 1);
        assert!(state.drain_events().contains(&GameEvent::FanCollected { points: 10 }));
    }

    #[test]
    fn test_six_fans_then_boost_then_thirty_points() {
        let mut state = playing_state(9);
        for _ in 0..5 {
            collect_one_fan(&mut state);
        }
        assert!(state.powerup.is_none());
        collect_one_fan(&mut state);
        assert_eq!(state.score, 60);
        assert_eq!(
            state.powerup.as_ref().map(|p| p.kind),
            Some(PowerUpKind::ScoreBoost)
        );

        put_powerup_on_player(&mut state);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.active_effect(), Some(PowerUpKind::ScoreBoost));

        // 60 -> 90 also crosses 70 and adds a heater
        collect_one_fan(&mut state);
        assert_eq!(state.score, 90);
        assert!(state.drain_events().contains(&GameEvent::FanCollected { points: 30 }));
    }

    #[test]
    fn test_crossing_seventy_adds_one_heater() {
        let mut state = playing_state(10);
        state.score = 63;
        let heaters = state.heaters.len();
        collect_one_fan(&mut state);
        assert_eq!(state.score, 73);
        assert_eq!(state.heaters.len(), heaters + 1);

        park_heaters(&mut state);
        collect_one_fan(&mut state);
        assert_eq!(state.score, 83);
        assert_eq!(state.heaters.len(), heaters + 1);
    }

    #[test]
    fn test_high_score_tracks_score() {
        let mut state = playing_state_with_high(11, 15);
        collect_one_fan(&mut state);
        assert_eq!(state.high_score, 15);
        assert!(!state.new_high_score);
        collect_one_fan(&mut state);
        assert_eq!(state.high_score, 20);
        assert!(state.new_high_score);
    }

    #[test]
    fn test_invincibility_expires_after_two_seconds() {
        let mut state = playing_state(12);
        let center = state.player.rect.center();
        state.heaters[0].rect.set_center(center);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.lives, 2);
        assert!(state.player.is_invincible());

        // Still touching: no further damage inside the window
        for _ in 0..110 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.lives, 2);

        park_heaters(&mut state);
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(!state.player.is_invincible());
    }

    #[test]
    fn test_blast_input_freezes_heaters() {
        let mut state = playing_state(13);
        let blast = TickInput {
            blast: true,
            ..Default::default()
        };
        tick(&mut state, &blast, SIM_DT);
        assert!(!state.blast_ready());
        assert!(state.heaters.iter().all(|h| h.is_frozen()));

        // Cooldown runs out after ten seconds of play
        for _ in 0..601 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.blast_ready());
        assert!(state.heaters.iter().all(|h| !h.is_frozen()));
    }

    #[test]
    fn test_game_over_text_waits_for_particles() {
        let mut state = playing_state(14);
        state.lives = 1;
        let center = state.player.rect.center();
        state.heaters[0].rect.set_center(center);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.game_over_revealed());

        let game_overs = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);

        for _ in 0..90 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.game_over_revealed());
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_echoes_fade() {
        let mut state = playing_state(15);
        collect_one_fan(&mut state);
        assert_eq!(state.fan_echoes.len(), 1);
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.fan_echoes.is_empty());
    }

    /// Tick with no input until `done` holds, returning the ticks taken
    fn tick_until(
        state: &mut SessionState,
        limit: u32,
        done: impl Fn(&SessionState) -> bool,
    ) -> u32 {
        for n in 1..=limit {
            tick(state, &TickInput::default(), SIM_DT);
            if done(state) {
                return n;
            }
        }
        panic!("condition not reached in {} ticks", limit);
    }

    #[test]
    fn test_timed_shield_spawns_during_play() {
        let mut state = playing_state(16);
        let deadline = state.powerup_spawn_at;
        assert!((POWERUP_SPAWN_MIN_SECS..=POWERUP_SPAWN_MAX_SECS).contains(&deadline));
        state.drain_events();

        tick_until(&mut state, 21 * 60, |s| s.powerup.is_some());
        assert_eq!(
            state.powerup.as_ref().map(|p| p.kind),
            Some(PowerUpKind::Shield)
        );
        assert!(state.clock > deadline);
        assert!(state.clock <= deadline + f64::from(SIM_DT) * 1.5);
        assert!(state.drain_events().contains(&GameEvent::PowerUpSpawned {
            kind: PowerUpKind::Shield
        }));
        assert_eq!(state.lives, MAX_LIVES);
    }

    #[test]
    fn test_damage_resumes_when_shield_ends() {
        let mut state = playing_state(17);
        assert!(state.spawn_powerup(PowerUpKind::Shield));
        put_powerup_on_player(&mut state);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.active_effect(), Some(PowerUpKind::Shield));
        let picked_up = state.clock;

        // Heater sits on the player for the whole shield window
        let center = state.player.rect.center();
        state.heaters[0].rect.set_center(center);
        for _ in 0..(7 * 60) {
            tick(&mut state, &TickInput::default(), SIM_DT);
            if state.effect.is_none() {
                break;
            }
            assert_eq!(state.lives, MAX_LIVES);
        }

        assert_eq!(state.active_effect(), None);
        let shielded_for = state.clock - picked_up;
        assert!(shielded_for > POWERUP_EFFECT_SECS);
        assert!(shielded_for < POWERUP_EFFECT_SECS + 2.0 * f64::from(SIM_DT));
        // Expiry and the hit land on the same tick
        assert_eq!(state.lives, MAX_LIVES - 1);
        assert!(state.player.is_invincible());
    }

    #[test]
    fn test_score_boost_expires_back_to_ten() {
        let mut state = playing_state(18);
        assert!(state.spawn_powerup(PowerUpKind::ScoreBoost));
        put_powerup_on_player(&mut state);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.active_effect(), Some(PowerUpKind::ScoreBoost));

        collect_one_fan(&mut state);
        assert_eq!(state.score, BOOSTED_FAN_POINTS);

        tick_until(&mut state, 7 * 60, |s| s.effect.is_none());
        state.drain_events();
        collect_one_fan(&mut state);
        assert_eq!(state.score, BOOSTED_FAN_POINTS + FAN_POINTS);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::FanCollected { points: FAN_POINTS })
        );
    }

    #[test]
    fn test_held_only_clears_one_shots() {
        let input = TickInput {
            left: true,
            pause: true,
            blast: true,
            ..Default::default()
        };
        let held = input.held_only();
        assert!(held.left);
        assert!(!held.pause && !held.blast);
    }
}
