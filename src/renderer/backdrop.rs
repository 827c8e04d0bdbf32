//! Background: dark vortex rings and drifting clouds
//!
//! Purely visual, owned by the app rather than the session. It keeps moving
//! in every phase, including pause and the menus.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{Canvas, Color, palette, shapes};
use crate::consts::*;

const VORTEX_RINGS: u32 = 40;
const VORTEX_RING_SPACING: f32 = 30.0;
/// Clouds re-enter this far left of the screen
const CLOUD_REENTRY_X: f32 = -200.0;

#[derive(Debug, Clone)]
pub struct Cloud {
    /// Top-left of the cloud's bounding square
    pub pos: Vec2,
    pub diameter: f32,
    /// Pixels per second to the right
    pub speed: f32,
    pub color: Color,
}

impl Cloud {
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.diameter * 0.5)
    }
}

#[derive(Debug, Clone)]
pub struct Backdrop {
    rng: Pcg32,
    ring_colors: Vec<Color>,
    pub clouds: Vec<Cloud>,
}

impl Backdrop {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let ring_colors = (0..VORTEX_RINGS)
            .map(|_| {
                palette::rgb(
                    rng.random_range(10..=30),
                    rng.random_range(15..=40),
                    rng.random_range(20..=50),
                )
            })
            .collect();
        let clouds = [
            (0.5, 200.0, palette::rgba(20, 25, 50, 80)),
            (0.8, 150.0, palette::rgba(25, 35, 60, 90)),
            (1.2, 100.0, palette::rgba(30, 45, 70, 100)),
        ]
        .into_iter()
        .map(|(px_per_frame, diameter, color)| Cloud {
            pos: Vec2::new(
                rng.random_range(CLOUD_REENTRY_X..=SCREEN_WIDTH),
                rng.random_range(0.0..=SCREEN_HEIGHT),
            ),
            diameter,
            speed: px_per_frame * TICK_RATE,
            color,
        })
        .collect();
        Self {
            rng,
            ring_colors,
            clouds,
        }
    }

    /// Drift the clouds, wrapping back to the left edge
    pub fn update(&mut self, dt: f32) {
        for cloud in &mut self.clouds {
            cloud.pos.x += cloud.speed * dt;
            if cloud.pos.x > SCREEN_WIDTH {
                cloud.pos = Vec2::new(
                    CLOUD_REENTRY_X,
                    self.rng.random_range(0.0..=SCREEN_HEIGHT),
                );
            }
        }
    }

    pub fn draw(&self, canvas: &mut dyn Canvas) {
        let center = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0);
        for (radius, color) in shapes::vortex_radii(VORTEX_RINGS, VORTEX_RING_SPACING)
            .zip(&self.ring_colors)
        {
            canvas.fill_circle(center, radius, *color);
        }
        for cloud in &self.clouds {
            canvas.fill_circle(cloud.center(), cloud.diameter * 0.5, cloud.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::DrawList;

    #[test]
    fn test_clouds_drift_and_wrap() {
        let mut backdrop = Backdrop::new(3);
        backdrop.clouds[0].pos.x = SCREEN_WIDTH;
        backdrop.clouds[1].pos.x = 0.0;
        backdrop.update(SIM_DT);
        assert_eq!(backdrop.clouds[0].pos.x, CLOUD_REENTRY_X);
        assert!((backdrop.clouds[1].pos.x - 0.8).abs() < 1e-3);
    }

    #[test]
    fn test_draws_rings_then_clouds() {
        let backdrop = Backdrop::new(3);
        let mut list = DrawList::default();
        backdrop.draw(&mut list);
        assert_eq!(list.circle_count(), VORTEX_RINGS as usize + 3);
    }
}
