//! Axis-aligned collision detection
//!
//! Everything in the arena is a rectangle: the actor's forgiving hitbox, single
//! obstacles, and the two halves of a paired barrier. Overlap is strict, so
//! rectangles that merely touch along an edge do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Obstacle, ObstacleKind, ObstacleRole};
use crate::tuning::Insets;

/// An axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Shrink the rectangle by per-edge insets
    pub fn inset(&self, insets: Insets) -> Self {
        Self::new(
            self.pos.x + insets.left,
            self.pos.y + insets.top,
            self.size.x - insets.left - insets.right,
            self.size.y - insets.top - insets.bottom,
        )
    }

    /// Standard AABB overlap test
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

/// Result of testing the actor against one obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    None,
    Collected,
    Penalized,
}

/// Paired barrier test: horizontal overlap, and the hitbox pokes out of the gap
///
/// The barrier halves span `[0, top_height)` and `(bottom_y, ∞)`, so only the
/// vertical extent relative to the gap matters.
pub fn barrier_collision(hitbox: &Rect, x: f32, width: f32, top_height: f32, bottom_y: f32) -> bool {
    hitbox.left() < x + width
        && hitbox.right() > x
        && (hitbox.top() < top_height || hitbox.bottom() > bottom_y)
}

/// Classify the contact between the actor's hitbox and an obstacle
pub fn test_collision(hitbox: &Rect, obstacle: &Obstacle) -> Outcome {
    let hit = match obstacle.kind {
        ObstacleKind::Barrier {
            top_height,
            bottom_y,
            ..
        } => barrier_collision(hitbox, obstacle.pos.x, obstacle.size.x, top_height, bottom_y),
        _ => hitbox.overlaps(&obstacle.bounds()),
    };

    if !hit {
        return Outcome::None;
    }

    match obstacle.kind.role() {
        ObstacleRole::Collectible => Outcome::Collected,
        ObstacleRole::Hazard => Outcome::Penalized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::BirdKind;

    fn obstacle(kind: ObstacleKind, x: f32, y: f32, w: f32, h: f32) -> Obstacle {
        Obstacle {
            id: 1,
            kind,
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            speed: 2.0,
            phase: 0.0,
        }
    }

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(20.0, 0.0, 5.0, 5.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 20.0, 5.0, 5.0)));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_inset_shrinks_each_edge() {
        let r = Rect::new(100.0, 200.0, 30.0, 25.0).inset(Insets::uniform(3.0));
        assert_eq!(r, Rect::new(103.0, 203.0, 24.0, 19.0));
    }

    #[test]
    fn test_inset_makes_near_miss_forgiving() {
        let drawn = Rect::new(100.0, 100.0, 30.0, 25.0);
        let grazing = Rect::new(128.0, 100.0, 10.0, 10.0);
        assert!(drawn.overlaps(&grazing));
        assert!(!drawn.inset(Insets::uniform(3.0)).overlaps(&grazing));
    }

    #[test]
    fn test_barrier_inside_gap_is_safe() {
        let hitbox = Rect::new(100.0, 150.0, 24.0, 19.0);
        assert!(!barrier_collision(&hitbox, 90.0, 50.0, 100.0, 320.0));
    }

    #[test]
    fn test_barrier_top_and_bottom_hits() {
        let above = Rect::new(100.0, 90.0, 24.0, 19.0);
        assert!(barrier_collision(&above, 90.0, 50.0, 100.0, 320.0));
        let below = Rect::new(100.0, 310.0, 24.0, 19.0);
        assert!(barrier_collision(&below, 90.0, 50.0, 100.0, 320.0));
    }

    #[test]
    fn test_barrier_requires_horizontal_overlap() {
        let above = Rect::new(10.0, 0.0, 24.0, 19.0);
        assert!(!barrier_collision(&above, 90.0, 50.0, 100.0, 320.0));
    }

    #[test]
    fn test_outcome_by_role() {
        let hitbox = Rect::new(0.0, 0.0, 20.0, 20.0);
        let bubble = obstacle(ObstacleKind::Bubble, 10.0, 10.0, 15.0, 15.0);
        assert_eq!(test_collision(&hitbox, &bubble), Outcome::Collected);

        let bird = obstacle(ObstacleKind::Bird(BirdKind::Eagle), 10.0, 10.0, 35.0, 20.0);
        assert_eq!(test_collision(&hitbox, &bird), Outcome::Penalized);

        let far = obstacle(ObstacleKind::Bubble, 300.0, 10.0, 15.0, 15.0);
        assert_eq!(test_collision(&hitbox, &far), Outcome::None);
    }

    #[test]
    fn test_barrier_outcome_uses_gap_not_rect() {
        let hitbox = Rect::new(100.0, 150.0, 24.0, 19.0);
        let pipe = obstacle(
            ObstacleKind::Barrier {
                top_height: 100.0,
                bottom_y: 320.0,
                passed: false,
            },
            90.0,
            0.0,
            50.0,
            480.0,
        );
        // The pipe's full-height rect overlaps, but the actor sits in the gap
        assert_eq!(test_collision(&hitbox, &pipe), Outcome::None);
    }
}
