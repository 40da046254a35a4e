//! Collision detection between falling objects and the ship
//!
//! Both are axis-aligned boxes. A hit is a center-distance test scaled by the
//! ship's size, so it is forgiving at the edges.

use glam::Vec2;

use crate::consts::COLLISION_FACTOR;
use crate::lane_center_x;
use crate::settings::Playfield;

/// Axis-aligned box by center and full size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub center: Vec2,
    pub size: Vec2,
}

impl BoundingBox {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    /// Top-left corner (screen coordinates, y down)
    pub fn top_left(&self) -> Vec2 {
        self.center - self.size / 2.0
    }
}

/// Check whether a falling object hits the ship
///
/// Collision holds when the centers are closer than 0.6x the ship's width
/// horizontally and 0.6x its height vertically.
#[inline]
pub fn collides(object: &BoundingBox, ship: &BoundingBox) -> bool {
    let delta = (object.center - ship.center).abs();
    delta.x < ship.size.x * COLLISION_FACTOR && delta.y < ship.size.y * COLLISION_FACTOR
}

/// Box of a falling object in `lane` at fall progress `progress` (0 = top)
pub fn object_box(field: &Playfield, lane_count: usize, lane: usize, progress: f32) -> BoundingBox {
    let top = progress * field.height;
    BoundingBox::new(
        Vec2::new(
            lane_center_x(lane, lane_count, field.width),
            top + field.object_size / 2.0,
        ),
        Vec2::splat(field.object_size),
    )
}

/// Box of the ship in `lane`, resting above the bottom margin
pub fn ship_box(field: &Playfield, lane_count: usize, lane: usize) -> BoundingBox {
    BoundingBox::new(
        Vec2::new(
            lane_center_x(lane, lane_count, field.width),
            field.height - field.ship_height / 2.0 - field.ship_bottom_margin,
        ),
        Vec2::new(field.ship_width, field.ship_height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ship() -> BoundingBox {
        BoundingBox::new(Vec2::new(500.0, 1000.0), Vec2::new(200.0, 100.0))
    }

    #[test]
    fn test_object_at_ship_center_collides() {
        let object = BoundingBox::new(Vec2::new(500.0, 1000.0), Vec2::splat(300.0));
        assert!(collides(&object, &ship()));
    }

    #[test]
    fn test_horizontal_limit() {
        // 0.6 x 200 = 120
        let near = BoundingBox::new(Vec2::new(619.0, 1000.0), Vec2::splat(300.0));
        let past = BoundingBox::new(Vec2::new(621.0, 1000.0), Vec2::splat(300.0));
        let far = BoundingBox::new(Vec2::new(379.0, 1000.0), Vec2::splat(300.0));
        assert!(collides(&near, &ship()));
        assert!(!collides(&past, &ship()));
        assert!(!collides(&far, &ship()));
    }

    #[test]
    fn test_vertical_limit_uses_ship_height() {
        // 0.6 x 100 = 60
        let above = BoundingBox::new(Vec2::new(500.0, 941.0), Vec2::splat(300.0));
        let clear = BoundingBox::new(Vec2::new(500.0, 939.0), Vec2::splat(300.0));
        assert!(collides(&above, &ship()));
        assert!(!collides(&clear, &ship()));
    }

    #[test]
    fn test_default_geometry() {
        let field = Playfield::default();
        let ship = ship_box(&field, 5, 2);
        assert!((ship.center.x - 540.0).abs() < 0.001);
        assert!((ship.center.y - (1920.0 - 100.0 - 100.0)).abs() < 0.001);

        // Same lane: a hit somewhere during the fall
        let hits = (0..=100)
            .map(|i| object_box(&field, 5, 2, i as f32 / 100.0))
            .any(|b| collides(&b, &ship));
        assert!(hits);

        // Adjacent lane never hits
        let hits = (0..=100)
            .map(|i| object_box(&field, 5, 3, i as f32 / 100.0))
            .any(|b| collides(&b, &ship));
        assert!(!hits);

        // Fresh spawn is nowhere near the ship
        assert!(!collides(&object_box(&field, 5, 2, 0.0), &ship));
    }

    #[test]
    fn test_top_left() {
        let b = BoundingBox::new(Vec2::new(150.0, 150.0), Vec2::splat(300.0));
        assert_eq!(b.top_left(), Vec2::ZERO);
    }
}
