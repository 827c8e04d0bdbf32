//! Software rasterizer behind the terminal canvas
//!
//! Draw calls in logical 800x600 space are scaled onto a small RGB pixel
//! grid (two pixels per terminal cell, stacked vertically). Text is not
//! rasterized; it is kept as cell-positioned overlays.

use glam::Vec2;

use crate::assets::{Assets, SpriteId};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::geometry::Rect;
use crate::renderer::shapes::polygon_contains;
use crate::renderer::{Anchor, Blit, Canvas, Color, TextSize};

/// Text placed on the cell grid
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    pub col: u16,
    pub row: u16,
    pub text: String,
    pub color: Color,
    pub bold: bool,
}

/// RGB pixel grid plus pending text
#[derive(Debug, Clone)]
pub struct Framebuffer {
    pub cols: u16,
    pub rows: u16,
    width: usize,
    height: usize,
    /// Device pixels per logical pixel
    scale: Vec2,
    pixels: Vec<[f32; 3]>,
    pub texts: Vec<TextOverlay>,
}

impl Framebuffer {
    /// Grid for a terminal of `cols` x `rows` cells
    pub fn new(cols: u16, rows: u16) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let width = cols as usize;
        let height = rows as usize * 2;
        Self {
            cols,
            rows,
            width,
            height,
            scale: Vec2::new(
                width as f32 / SCREEN_WIDTH,
                height as f32 / SCREEN_HEIGHT,
            ),
            pixels: vec![[0.0; 3]; width * height],
            texts: Vec::new(),
        }
    }

    pub fn pixel_width(&self) -> usize {
        self.width
    }

    pub fn pixel_height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> [f32; 3] {
        self.pixels[y * self.width + x]
    }

    /// Top and bottom pixel colors of a cell
    pub fn cell(&self, col: u16, row: u16) -> ([f32; 3], [f32; 3]) {
        let x = col as usize;
        let y = row as usize * 2;
        (self.pixel(x, y), self.pixel(x, y + 1))
    }

    fn blend(&mut self, x: usize, y: usize, color: [f32; 3], alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let a = alpha.min(1.0);
        let dst = &mut self.pixels[y * self.width + x];
        for (d, s) in dst.iter_mut().zip(color) {
            *d += (s - *d) * a;
        }
    }

    /// Device pixel range covering a logical box, clipped to the grid
    fn pixel_span(&self, min: Vec2, max: Vec2) -> (usize, usize, usize, usize) {
        let lo = (min * self.scale).floor().max(Vec2::ZERO);
        let hi = (max * self.scale).ceil();
        let x1 = (hi.x.max(0.0) as usize).min(self.width);
        let y1 = (hi.y.max(0.0) as usize).min(self.height);
        ((lo.x as usize).min(x1), (lo.y as usize).min(y1), x1, y1)
    }

    /// Logical position of a device pixel's center
    fn logical(&self, x: usize, y: usize) -> Vec2 {
        Vec2::new(x as f32 + 0.5, y as f32 + 0.5) / self.scale
    }

    fn fill_where(
        &mut self,
        min: Vec2,
        max: Vec2,
        color: Color,
        inside: impl Fn(Vec2) -> bool,
    ) -> usize {
        let (x0, y0, x1, y1) = self.pixel_span(min, max);
        let rgb = [color[0], color[1], color[2]];
        let mut hits = 0;
        for y in y0..y1 {
            for x in x0..x1 {
                if inside(self.logical(x, y)) {
                    self.blend(x, y, rgb, color[3]);
                    hits += 1;
                }
            }
        }
        hits
    }

    /// Plot the single pixel under `p`, for shapes smaller than a pixel
    fn plot(&mut self, p: Vec2, color: Color) {
        let d = p * self.scale;
        if d.x < 0.0 || d.y < 0.0 {
            return;
        }
        let (x, y) = (d.x as usize, d.y as usize);
        if x < self.width && y < self.height {
            self.blend(x, y, [color[0], color[1], color[2]], color[3]);
        }
    }

    /// Place text on the cell grid according to its anchor
    pub fn layout_text(&self, text: &str, pos: Vec2, anchor: Anchor) -> (u16, u16) {
        let w = text.chars().count() as i32;
        let col = (pos.x * self.scale.x) as i32;
        let row = (pos.y * self.scale.y / 2.0) as i32;
        let (col, row) = match anchor {
            Anchor::TopLeft => (col, row),
            Anchor::TopRight => (col - w, row),
            Anchor::TopCenter | Anchor::Center => (col - w / 2, row),
            Anchor::BottomLeft => (col, row - 1),
            Anchor::BottomRight => (col - w, row - 1),
        };
        let max_col = (self.cols as i32 - w).max(0);
        (
            col.clamp(0, max_col) as u16,
            row.clamp(0, self.rows as i32 - 1) as u16,
        )
    }
}

/// Canvas that rasterizes onto a `Framebuffer`, sampling loaded sprites
pub struct RasterCanvas<'a> {
    pub fb: Framebuffer,
    assets: &'a Assets,
}

impl<'a> RasterCanvas<'a> {
    pub fn new(fb: Framebuffer, assets: &'a Assets) -> Self {
        Self { fb, assets }
    }
}

impl Canvas for RasterCanvas<'_> {
    fn clear(&mut self, color: Color) {
        self.fb.pixels.fill([color[0], color[1], color[2]]);
        self.fb.texts.clear();
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let (min, max) = (rect.pos, rect.pos + rect.size);
        if self.fb.fill_where(min, max, color, |p| rect.contains_point(p)) == 0 {
            self.fb.plot(rect.center(), color);
        }
    }

    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color) {
        let inner = rect.inflate(-width);
        let (min, max) = (rect.pos, rect.pos + rect.size);
        self.fb.fill_where(min, max, color, |p| {
            rect.contains_point(p) && !inner.contains_point(p)
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let r = Vec2::splat(radius);
        let r2 = radius * radius;
        let hits = self
            .fb
            .fill_where(center - r, center + r, color, |p| p.distance_squared(center) <= r2);
        if hits == 0 && radius > 0.0 {
            self.fb.plot(center, color);
        }
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        let Some(first) = points.first() else {
            return;
        };
        let (min, max) = points
            .iter()
            .fold((*first, *first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        self.fb.fill_where(min, max, color, |p| polygon_contains(points, p));
    }

    fn text(&mut self, text: &str, pos: Vec2, size: TextSize, anchor: Anchor, color: Color) {
        let (col, row) = self.fb.layout_text(text, pos, anchor);
        self.fb.texts.push(TextOverlay {
            col,
            row,
            text: text.to_string(),
            color,
            bold: size == TextSize::Title,
        });
    }

    fn sprite(&mut self, id: SpriteId, blit: Blit) {
        let assets = self.assets;
        let Some(sprite) = assets.sprite(id) else {
            return;
        };
        if blit.size.x <= 0.0 || blit.size.y <= 0.0 {
            return;
        }
        let reach = Vec2::splat(blit.size.length() * 0.5);
        let (x0, y0, x1, y1) = self.fb.pixel_span(blit.center - reach, blit.center + reach);
        let unrotate = Vec2::from_angle(blit.rotation.to_radians());
        let tint = blit.tint.unwrap_or([1.0; 4]);
        for y in y0..y1 {
            for x in x0..x1 {
                let local = unrotate.rotate(self.fb.logical(x, y) - blit.center);
                let uv = local / blit.size + Vec2::splat(0.5);
                if !(0.0..1.0).contains(&uv.x) || !(0.0..1.0).contains(&uv.y) {
                    continue;
                }
                let [r, g, b, a] = sprite.sample(uv.x, uv.y);
                let rgb = [
                    r as f32 / 255.0 * tint[0],
                    g as f32 / 255.0 * tint[1],
                    b as f32 / 255.0 * tint[2],
                ];
                let alpha = a as f32 / 255.0 * blit.alpha * tint[3];
                self.fb.blend(x, y, rgb, alpha);
            }
        }
    }
}
