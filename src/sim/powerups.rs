//! Power-up lifecycle: timed shield spawns, milestone spawns, pickup effects

use glam::Vec2;

use super::state::{ActiveEffect, GameEvent, PowerUp, PowerUpKind, SessionState};
use crate::consts::*;
use crate::geometry::Rect;

impl SessionState {
    /// Place a power-up on the field unless one is already there.
    ///
    /// A timed shield spawn re-arms the spawn timer; milestone spawns leave it alone.
    pub fn spawn_powerup(&mut self, kind: PowerUpKind) -> bool {
        if self.powerup.is_some() {
            return false;
        }
        let corner = self.random_field_point();
        self.powerup = Some(PowerUp {
            kind,
            rect: Rect {
                pos: corner,
                size: Vec2::splat(POWERUP_SIZE),
            },
        });
        if kind == PowerUpKind::Shield {
            self.powerup_spawn_at = self.next_powerup_spawn_time();
        }
        self.emit(GameEvent::PowerUpSpawned { kind });
        true
    }

    /// Spawn a shield once the timer runs out and the field is clear
    pub(crate) fn update_powerup_timer(&mut self) {
        if self.powerup.is_none() && self.clock > self.powerup_spawn_at {
            self.spawn_powerup(PowerUpKind::Shield);
        }
    }

    /// Drop the running effect once it expires
    pub(crate) fn expire_effect(&mut self) {
        if self.effect.is_some_and(|e| self.clock > e.expires_at) {
            self.effect = None;
        }
    }

    /// Pick up the field power-up if the player touches it
    pub(crate) fn check_powerup_pickup(&mut self) {
        let touching = self
            .powerup
            .as_ref()
            .is_some_and(|p| p.rect.overlaps(&self.player.rect));
        if !touching {
            return;
        }
        let Some(powerup) = self.powerup.take() else {
            return;
        };

        match powerup.kind {
            PowerUpKind::Life => {
                self.lives = (self.lives + 1).min(MAX_LIVES);
            }
            kind => {
                self.effect = Some(ActiveEffect {
                    kind,
                    expires_at: self.clock + POWERUP_EFFECT_SECS,
                });
            }
        }
        self.emit(GameEvent::PowerUpCollected {
            kind: powerup.kind,
        });
    }

    /// Count a fan toward the score-boost and extra-life milestones
    pub(crate) fn count_fan_for_milestones(&mut self) {
        self.fans_toward_boost += 1;
        if self.lives < MAX_LIVES {
            self.fans_toward_life += 1;
        }

        if self.fans_toward_boost >= FANS_PER_SCORE_BOOST {
            self.spawn_powerup(PowerUpKind::ScoreBoost);
            self.fans_toward_boost = 0;
        }
        if self.fans_toward_life >= FANS_PER_LIFE && self.lives < MAX_LIVES {
            self.spawn_powerup(PowerUpKind::Life);
            self.fans_toward_life = 0;
        }
    }
}
