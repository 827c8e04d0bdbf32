//! Shape generation for 2D primitives

use glam::Vec2;

use crate::geometry::Rect;

/// Two overlapping triangles forming a six-pointed star inside `rect`
///
/// Upward triangle first, then the downward one.
pub fn star(rect: &Rect) -> [[Vec2; 3]; 2] {
    let cx = rect.center().x;
    [
        [
            Vec2::new(cx, rect.top() + 5.0),
            Vec2::new(rect.right() - 7.0, rect.bottom() - 7.0),
            Vec2::new(rect.left() + 7.0, rect.bottom() - 7.0),
        ],
        [
            Vec2::new(cx, rect.bottom() - 5.0),
            Vec2::new(rect.left() + 7.0, rect.top() + 12.0),
            Vec2::new(rect.right() - 7.0, rect.top() + 12.0),
        ],
    ]
}

/// Centers of the two "heart" lobes on the life icon
pub fn heart_lobes(rect: &Rect) -> [Vec2; 2] {
    let cx = rect.center().x;
    let y = rect.top() + 12.0;
    [Vec2::new(cx - 8.0, y), Vec2::new(cx + 8.0, y)]
}

/// Radii of the backdrop vortex rings, largest first
pub fn vortex_radii(count: u32, spacing: f32) -> impl Iterator<Item = f32> {
    (1..=count).rev().map(move |i| i as f32 * spacing)
}

/// Even-odd point-in-polygon test
pub fn polygon_contains(points: &[Vec2], p: Vec2) -> bool {
    let mut inside = false;
    let mut j = points.len().wrapping_sub(1);
    for (i, a) in points.iter().enumerate() {
        let b = points[j];
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}
