//! Playfield entities

use glam::Vec2;

use super::{Blit, Canvas, palette, shapes};
use crate::assets::SpriteId;
use crate::consts::*;
use crate::geometry::Rect;
use crate::sim::{Ember, HeaterKind, Particle, PowerUp, PowerUpKind, SessionState};

/// Milliseconds per on/off phase of the invincibility blink
const BLINK_MS: u64 = 150;

/// Random-looking playfield offset while the screen shakes
pub fn shake_offset(state: &SessionState) -> Vec2 {
    if state.screen_shake <= 0.0 {
        return Vec2::ZERO;
    }
    // Hash the frame number so the shake is stable for a given frame
    let frame = (state.clock * TICK_RATE as f64) as u32;
    let h = frame.wrapping_add(state.seed as u32).wrapping_mul(2654435761);
    let span = 2 * SHAKE_AMPLITUDE as u32 + 1;
    Vec2::new(
        (h % span) as f32 - SHAKE_AMPLITUDE,
        ((h >> 16) % span) as f32 - SHAKE_AMPLITUDE,
    )
}

/// Whether the player sprite is hidden this frame by the invincibility blink
pub fn player_blinked_out(state: &SessionState) -> bool {
    state.player.is_invincible() && ((state.clock * 1000.0) as u64 / BLINK_MS) % 2 == 0
}

pub fn draw_playfield(canvas: &mut dyn Canvas, state: &SessionState, offset: Vec2) {
    let fan_size = Vec2::from(FAN_SIZE);
    for echo in &state.fan_echoes {
        canvas.sprite(
            SpriteId::Fan,
            Blit {
                alpha: (echo.alpha / 255.0).clamp(0.0, 1.0),
                ..Blit::at(echo.center + offset, fan_size * echo.scale)
            },
        );
    }

    canvas.sprite(
        SpriteId::Fan,
        Blit {
            rotation: state.fan_rotation,
            ..Blit::at(state.fan.rect.center() + offset, fan_size)
        },
    );

    if let Some(powerup) = &state.powerup {
        draw_powerup(canvas, powerup, offset);
    }

    let pulse = 1.0 + state.pulse_phase.sin() * 0.1;
    for heater in &state.heaters {
        let id = match heater.kind {
            HeaterKind::Normal => SpriteId::Heater,
            HeaterKind::Fast => SpriteId::FastHeater,
        };
        canvas.sprite(
            id,
            Blit {
                tint: heater.is_frozen().then_some(palette::FROST_TINT),
                ..Blit::at(heater.rect.center() + offset, heater.rect.size * pulse)
            },
        );
    }

    let player = &state.player;
    let center = player.rect.center() + offset;
    if !player_blinked_out(state) {
        canvas.sprite(
            SpriteId::Player,
            Blit::at(center, Vec2::from(PLAYER_SIZE) * player.wobble.scale),
        );
    }
    if state.active_effect() == Some(PowerUpKind::Shield) {
        let radius = (player.rect.width() + 20.0) * 0.5;
        canvas.fill_circle(center, radius, palette::SHIELD_BUBBLE);
    }
}

/// Power-up icon: star, framed box, or heart box
pub fn draw_powerup(canvas: &mut dyn Canvas, powerup: &PowerUp, offset: Vec2) {
    let rect = Rect {
        pos: powerup.rect.pos + offset,
        size: powerup.rect.size,
    };
    match powerup.kind {
        PowerUpKind::ScoreBoost => {
            canvas.fill_rect(rect, palette::BLACK);
            for tri in shapes::star(&rect) {
                canvas.fill_polygon(&tri, palette::YELLOW);
            }
        }
        PowerUpKind::Shield => {
            canvas.fill_rect(rect, palette::CYAN);
            canvas.stroke_rect(rect.inflate(-5.0), 4.0, palette::WHITE);
        }
        PowerUpKind::Life => {
            canvas.fill_rect(rect, palette::PINK);
            for lobe in shapes::heart_lobes(&rect) {
                canvas.fill_circle(lobe, 8.0, palette::RED);
            }
        }
    }
}

pub fn ember_color(ember: Ember) -> super::Color {
    match ember {
        Ember::Red => palette::RED,
        Ember::Orange => palette::ORANGE,
        Ember::Yellow => palette::YELLOW,
        Ember::White => palette::WHITE,
    }
}

pub fn draw_particles(canvas: &mut dyn Canvas, particles: &[Particle]) {
    for p in particles.iter().filter(|p| p.is_alive()) {
        canvas.fill_circle(p.pos, p.radius, ember_color(p.color));
    }
}
