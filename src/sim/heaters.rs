//! Heater behaviour: spawning, homing, blast freezes and contact damage

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::state::{GameEvent, Heater, HeaterKind, SessionState};
use crate::consts::*;

/// Normal heaters are twice as common as fast ones
const HEATER_KIND_TABLE: [HeaterKind; 3] = [HeaterKind::Normal, HeaterKind::Normal, HeaterKind::Fast];

impl Heater {
    /// Move toward `target` by at most `speed * dt` on each axis independently.
    ///
    /// Frozen heaters stay put.
    pub fn step_toward(&mut self, target: Vec2, dt: f32) {
        if self.is_frozen() {
            return;
        }
        let max_step = self.speed * dt;
        let delta = target - self.rect.center();
        self.rect.pos += delta.clamp(Vec2::splat(-max_step), Vec2::splat(max_step));
    }

    /// Freeze for the blast duration; already-frozen heaters keep their deadline
    pub fn freeze(&mut self, now: f64) {
        if self.frozen_until.is_none() {
            self.frozen_until = Some(now + FREEZE_SECS);
        }
    }

    /// Clear the freeze once its deadline has passed
    pub fn thaw_if_expired(&mut self, now: f64) {
        if self.frozen_until.is_some_and(|until| now > until) {
            self.frozen_until = None;
        }
    }
}

impl SessionState {
    /// Add a heater just off the top or bottom edge, speed scaled by the current score
    pub fn spawn_heater(&mut self) {
        let kind = *HEATER_KIND_TABLE
            .choose(&mut self.rng)
            .unwrap_or(&HeaterKind::Normal);
        let x = self.rng.random_range(0..=SCREEN_WIDTH as u32) as f32;
        let y = if self.rng.random_bool(0.5) {
            -HEATER_SPAWN_MARGIN
        } else {
            SCREEN_HEIGHT + HEATER_SPAWN_MARGIN
        };
        let id = self.next_entity_id();
        self.heaters
            .push(Heater::new(id, kind, Vec2::new(x, y), self.score));
        self.emit(GameEvent::HeaterSpawned { kind });
    }

    /// Freeze every unfrozen heater and start the cooldown.
    ///
    /// Returns false (and does nothing) outside gameplay or while cooling down.
    pub fn fire_blast(&mut self) -> bool {
        if self.phase != super::GamePhase::Playing || !self.blast_ready() {
            return false;
        }
        let now = self.clock;
        self.blast_cooldown_until = Some(now + BLAST_COOLDOWN_SECS);
        for heater in &mut self.heaters {
            heater.freeze(now);
        }
        self.emit(GameEvent::BlastFired);
        true
    }

    /// Thaw expired heaters and move the rest toward the player
    pub(crate) fn move_heaters(&mut self, dt: f32) {
        let now = self.clock;
        let target = self.player.rect.center();
        for heater in &mut self.heaters {
            heater.thaw_if_expired(now);
            heater.step_toward(target, dt);
        }
    }

    /// Apply damage if the player touches any heater while unprotected.
    ///
    /// At most one life is lost per tick: the hit itself grants invincibility.
    pub(crate) fn check_heater_contact(&mut self) {
        if self.is_protected() {
            return;
        }
        let player = self.player.rect;
        if !self.heaters.iter().any(|h| h.rect.overlaps(&player)) {
            return;
        }

        self.lives = self.lives.saturating_sub(1);
        self.player.invincible_until = Some(self.clock + INVINCIBILITY_SECS);
        self.screen_shake = SHAKE_SECS;
        self.emit(GameEvent::PlayerHit {
            lives_left: self.lives,
        });

        if self.lives == 0 {
            self.enter_game_over();
        }
    }
}
