//! HUD overlay and menu screens

use glam::Vec2;

use super::{Anchor, Blit, Canvas, TextSize, palette};
use crate::assets::SpriteId;
use crate::consts::*;
use crate::sim::{PowerUpKind, SessionState};

const MARGIN: f32 = 10.0;
const LIFE_ICON_SPACING: f32 = 40.0;

fn mid_x() -> f32 {
    SCREEN_WIDTH / 2.0
}

/// Blast status line: whole seconds left (rounded up) or READY
pub fn blast_label(state: &SessionState) -> String {
    match state.blast_cooldown_until {
        Some(until) => {
            let remaining = (until - state.clock).max(0.0).floor() as u64;
            format!("Blast: {}s", remaining + 1)
        }
        None => "Blast: READY".to_string(),
    }
}

pub fn draw_hud(canvas: &mut dyn Canvas, state: &SessionState) {
    canvas.text(
        &format!("SCORE: {}", state.score),
        Vec2::new(MARGIN, MARGIN),
        TextSize::Main,
        Anchor::TopLeft,
        palette::WHITE,
    );
    canvas.text(
        &format!("HIGH SCORE: {}", state.high_score),
        Vec2::new(SCREEN_WIDTH - MARGIN, MARGIN),
        TextSize::Main,
        Anchor::TopRight,
        palette::YELLOW,
    );

    let icon = Vec2::from(LIFE_ICON_SIZE);
    for i in 0..state.lives {
        let top_left = Vec2::new(MARGIN + i as f32 * LIFE_ICON_SPACING, SCREEN_HEIGHT - 40.0);
        canvas.sprite(SpriteId::LifeIcon, Blit::at(top_left + icon * 0.5, icon));
    }

    let blast_color = if state.blast_ready() {
        palette::CYAN
    } else {
        palette::RED
    };
    canvas.text(
        &blast_label(state),
        Vec2::new(SCREEN_WIDTH - MARGIN, SCREEN_HEIGHT - MARGIN),
        TextSize::Small,
        Anchor::BottomRight,
        blast_color,
    );

    if let Some(kind) = state.active_effect() {
        let color = match kind {
            PowerUpKind::ScoreBoost => palette::YELLOW,
            PowerUpKind::Shield => palette::CYAN,
            PowerUpKind::Life => palette::BLUE,
        };
        canvas.text(
            &format!("{}!", kind.label()),
            Vec2::new(mid_x(), MARGIN),
            TextSize::Small,
            Anchor::TopCenter,
            color,
        );
    }

    if state.lives < MAX_LIVES {
        canvas.text(
            &format!("Fans for Life: {}/{}", state.fans_toward_life, FANS_PER_LIFE),
            Vec2::new(MARGIN, SCREEN_HEIGHT - 70.0),
            TextSize::Small,
            Anchor::BottomLeft,
            palette::PINK,
        );
    }
}

pub fn draw_title(canvas: &mut dyn Canvas, state: &SessionState) {
    canvas.text(
        "Temperature Control!",
        Vec2::new(mid_x(), SCREEN_HEIGHT / 3.0),
        TextSize::Title,
        Anchor::Center,
        palette::BLUE,
    );
    canvas.text(
        &format!("High Score: {}", state.high_score),
        Vec2::new(mid_x(), SCREEN_HEIGHT / 2.0),
        TextSize::Main,
        Anchor::Center,
        palette::YELLOW,
    );
    canvas.text(
        "Press SPACE to Start",
        Vec2::new(mid_x(), SCREEN_HEIGHT / 2.0 + 60.0),
        TextSize::Main,
        Anchor::Center,
        palette::WHITE,
    );
}

pub fn draw_paused(canvas: &mut dyn Canvas) {
    canvas.text(
        "PAUSED",
        Vec2::new(mid_x(), SCREEN_HEIGHT / 2.0 - 50.0),
        TextSize::Title,
        Anchor::Center,
        palette::ORANGE,
    );
    canvas.text(
        "Press 'P' to Resume",
        Vec2::new(mid_x(), SCREEN_HEIGHT / 2.0 + 40.0),
        TextSize::Main,
        Anchor::Center,
        palette::WHITE,
    );
}

pub fn draw_game_over(canvas: &mut dyn Canvas, state: &SessionState) {
    canvas.text(
        "GAME OVER",
        Vec2::new(mid_x(), SCREEN_HEIGHT / 3.0),
        TextSize::Title,
        Anchor::Center,
        palette::RED,
    );
    if state.new_high_score {
        canvas.text(
            "New High Score!",
            Vec2::new(mid_x(), SCREEN_HEIGHT / 2.0 - 50.0),
            TextSize::Main,
            Anchor::Center,
            palette::GREEN,
        );
    }
    canvas.text(
        &format!("Your Score: {}", state.score),
        Vec2::new(mid_x(), SCREEN_HEIGHT / 2.0),
        TextSize::Main,
        Anchor::Center,
        palette::WHITE,
    );
    canvas.text(
        "Press 'R' to Restart",
        Vec2::new(mid_x(), SCREEN_HEIGHT / 2.0 + 100.0),
        TextSize::Main,
        Anchor::Center,
        palette::WHITE,
    );
}

pub fn draw_fps(canvas: &mut dyn Canvas, fps: f32) {
    canvas.text(
        &format!("FPS: {:.0}", fps),
        Vec2::new(MARGIN, MARGIN + 30.0),
        TextSize::Small,
        Anchor::TopLeft,
        palette::GREEN,
    );
}
