//! Rendering module
//!
//! Rendering is a read-only pass over `SessionState` onto an injected
//! `Canvas`. The terminal frontend rasterizes the calls; tests record them in
//! a `DrawList`.

pub mod backdrop;
pub mod draw_list;
pub mod hud;
pub mod scene;
pub mod shapes;

use glam::Vec2;

pub use backdrop::Backdrop;
pub use draw_list::{DrawCmd, DrawList};

use crate::assets::SpriteId;
use crate::geometry::Rect;
use crate::settings::Settings;
use crate::sim::{GamePhase, SessionState};

/// Linear RGBA, 0.0 - 1.0
pub type Color = [f32; 4];

/// Game palette
pub mod palette {
    use super::Color;

    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        [
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ]
    }

    pub const WHITE: Color = rgb(255, 255, 255);
    pub const YELLOW: Color = rgb(255, 255, 0);
    pub const GREEN: Color = rgb(0, 255, 150);
    pub const ORANGE: Color = rgb(255, 165, 0);
    pub const BLUE: Color = rgb(60, 120, 255);
    pub const RED: Color = rgb(255, 50, 50);
    pub const CYAN: Color = rgb(0, 200, 255);
    pub const BLACK: Color = rgb(0, 0, 0);
    pub const PINK: Color = rgb(255, 105, 180);
    pub const BACKGROUND: Color = rgb(10, 15, 30);
    /// Multiplied into frozen heaters
    pub const FROST_TINT: Color = rgba(0, 100, 200, 150);
    pub const SHIELD_BUBBLE: Color = rgba(0, 200, 255, 100);
}

/// Font sizes, roughly matching 90/40/28 px fonts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Title,
    Main,
    Small,
}

impl TextSize {
    /// Line height in logical pixels
    pub fn height(&self) -> f32 {
        match self {
            TextSize::Title => 64.0,
            TextSize::Main => 28.0,
            TextSize::Small => 20.0,
        }
    }
}

/// Which point of the text box `pos` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Center,
    TopLeft,
    TopRight,
    TopCenter,
    BottomLeft,
    BottomRight,
}

/// Sprite blit parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blit {
    pub center: Vec2,
    /// Drawn size in pixels (after wobble/pulse/echo scaling)
    pub size: Vec2,
    /// Counter-clockwise degrees
    pub rotation: f32,
    pub alpha: f32,
    /// Multiplied into each pixel
    pub tint: Option<Color>,
}

impl Blit {
    pub fn at(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            size,
            rotation: 0.0,
            alpha: 1.0,
            tint: None,
        }
    }
}

/// Drawing surface
///
/// All coordinates are logical 800x600 pixels, origin top-left.
pub trait Canvas {
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);
    fn text(&mut self, text: &str, pos: Vec2, size: TextSize, anchor: Anchor, color: Color);
    fn sprite(&mut self, id: SpriteId, blit: Blit);
}

/// Per-frame values that are not part of the session
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInfo {
    pub fps: f32,
}

/// Draw one frame
pub fn render(
    canvas: &mut dyn Canvas,
    state: &SessionState,
    backdrop: &Backdrop,
    settings: &Settings,
    frame: FrameInfo,
) {
    canvas.clear(palette::BACKGROUND);
    backdrop.draw(canvas);

    match state.phase {
        GamePhase::Playing => {
            let offset = if settings.effective_screen_shake() {
                scene::shake_offset(state)
            } else {
                Vec2::ZERO
            };
            scene::draw_playfield(canvas, state, offset);
            hud::draw_hud(canvas, state);
        }
        GamePhase::TitleScreen => hud::draw_title(canvas, state),
        GamePhase::Paused => hud::draw_paused(canvas),
        GamePhase::GameOver => {
            if settings.particles {
                scene::draw_particles(canvas, &state.particles);
            }
            if state.game_over_revealed() {
                hud::draw_game_over(canvas, state);
            }
        }
    }

    if settings.show_fps {
        hud::draw_fps(canvas, frame.fps);
    }
}
