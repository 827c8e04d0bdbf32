//! Recording canvas
//!
//! Stores every draw call so frames can be inspected without a terminal.

use glam::Vec2;

use super::{Anchor, Blit, Canvas, Color, TextSize};
use crate::assets::SpriteId;
use crate::geometry::Rect;

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Color),
    FillRect(Rect, Color),
    StrokeRect(Rect, f32, Color),
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Polygon(Vec<Vec2>, Color),
    Text {
        text: String,
        pos: Vec2,
        size: TextSize,
        anchor: Anchor,
        color: Color,
    },
    Sprite(SpriteId, Blit),
}

#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub cmds: Vec<DrawCmd>,
}

impl DrawList {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.cmds.iter().filter_map(|c| match c {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t == needle)
    }

    pub fn has_text_starting(&self, prefix: &str) -> bool {
        self.texts().any(|t| t.starts_with(prefix))
    }

    pub fn sprites(&self, id: SpriteId) -> impl Iterator<Item = &Blit> {
        self.cmds.iter().filter_map(move |c| match c {
            DrawCmd::Sprite(s, blit) if *s == id => Some(blit),
            _ => None,
        })
    }

    pub fn sprite_count(&self, id: SpriteId) -> usize {
        self.sprites(id).count()
    }

    pub fn circle_count(&self) -> usize {
        self.cmds
            .iter()
            .filter(|c| matches!(c, DrawCmd::Circle { .. }))
            .count()
    }
}

impl Canvas for DrawList {
    fn clear(&mut self, color: Color) {
        self.cmds.push(DrawCmd::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.cmds.push(DrawCmd::FillRect(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color) {
        self.cmds.push(DrawCmd::StrokeRect(rect, width, color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.cmds.push(DrawCmd::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.cmds.push(DrawCmd::Polygon(points.to_vec(), color));
    }

    fn text(&mut self, text: &str, pos: Vec2, size: TextSize, anchor: Anchor, color: Color) {
        self.cmds.push(DrawCmd::Text {
            text: text.to_string(),
            pos,
            size,
            anchor,
            color,
        });
    }

    fn sprite(&mut self, id: SpriteId, blit: Blit) {
        self.cmds.push(DrawCmd::Sprite(id, blit));
    }
}
