//! Game-over fireworks
//!
//! A radial burst of particles under gravity. The game-over text waits until
//! every particle has burned out.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Firework palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ember {
    Red,
    Orange,
    Yellow,
    White,
}

const EMBERS: [Ember; 4] = [Ember::Red, Ember::Orange, Ember::Yellow, Ember::White];

/// A single spark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Ember,
    pub radius: f32,
    /// Seconds left
    pub life: f32,
}

impl Particle {
    /// Spark flying off from `origin` in a random direction
    pub fn spark<R: Rng + ?Sized>(origin: Vec2, rng: &mut R) -> Self {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(PARTICLE_MIN_SPEED..=PARTICLE_MAX_SPEED);
        Self {
            pos: origin,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            color: *EMBERS.choose(rng).unwrap_or(&Ember::White),
            radius: rng.random_range(PARTICLE_MIN_RADIUS..=PARTICLE_MAX_RADIUS) as f32,
            life: PARTICLE_LIFE_SECS,
        }
    }

    /// Advance one step; returns false once the spark has burned out
    pub fn update(&mut self, dt: f32) -> bool {
        self.vel.y += PARTICLE_GRAVITY * dt;
        self.pos += self.vel * dt;
        self.life -= dt;
        self.radius -= PARTICLE_SHRINK_PER_SEC * dt;
        self.is_alive()
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0 && self.radius > 0.0
    }
}

/// Spawn `count` sparks at `origin`
pub fn burst<R: Rng + ?Sized>(origin: Vec2, count: usize, rng: &mut R) -> Vec<Particle> {
    (0..count).map(|_| Particle::spark(origin, rng)).collect()
}

/// Advance every particle and drop the dead ones
pub fn update_particles(particles: &mut Vec<Particle>, dt: f32) {
    particles.retain_mut(|p| p.update(dt));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_burst_properties() {
        let mut rng = Pcg32::seed_from_u64(5);
        let origin = Vec2::new(400.0, 300.0);
        let sparks = burst(origin, BURST_PARTICLES, &mut rng);
        assert_eq!(sparks.len(), BURST_PARTICLES);
        for p in &sparks {
            assert_eq!(p.pos, origin);
            let speed = p.vel.length();
            assert!(speed >= PARTICLE_MIN_SPEED - 0.01 && speed <= PARTICLE_MAX_SPEED + 0.01);
            assert!((4.0..=7.0).contains(&p.radius));
            assert_eq!(p.life, PARTICLE_LIFE_SECS);
        }
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            color: Ember::Red,
            radius: 5.0,
            life: 1.0,
        };
        p.update(SIM_DT);
        assert!(p.vel.y > 0.0);
        assert!(p.pos.y > 0.0);
        assert!(p.radius < 5.0);
    }

    #[test]
    fn test_small_particle_dies_from_shrinking() {
        // radius 4 shrinks 0.08/frame: gone after 50 frames, well before 80
        let mut p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            color: Ember::Yellow,
            radius: 4.0,
            life: PARTICLE_LIFE_SECS,
        };
        let mut frames = 0;
        while p.update(SIM_DT) {
            frames += 1;
        }
        assert!((49..=50).contains(&frames));
    }

    #[test]
    fn test_burst_burns_out_within_life() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut sparks = burst(Vec2::ZERO, 100, &mut rng);
        for _ in 0..79 {
            update_particles(&mut sparks, SIM_DT);
        }
        // Even the largest sparks are capped by their 80-frame life
        for _ in 0..3 {
            update_particles(&mut sparks, SIM_DT);
        }
        assert!(sparks.is_empty());
    }
}
