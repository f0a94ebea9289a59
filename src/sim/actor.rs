//! The player-controlled body
//!
//! Velocity integrates a fixed per-tick acceleration chosen by the ascend
//! intent, is clamped every tick, then the variant's boundary policy corrects
//! the position.

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::tuning::{ActorProfile, Arena, BoundaryPolicy, Insets, PhysicsProfile};

/// What the boundary policy did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryOutcome {
    /// Inside the playfield
    Free,
    /// Clamped at a margin and bounced
    Bounced,
    /// Resting on the floor, grace window still open
    Grounded,
    /// Rested on the floor for the whole grace window
    GraceExpired,
}

/// Presentation tilt for a velocity, clamped to `±max`
#[inline]
pub fn rotation_for_velocity(velocity: f32, factor: f32, max: f32) -> f32 {
    (velocity * factor).clamp(-max, max)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Fixed per variant
    pub x: f32,
    /// Top edge, or vertical center when `centered`
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub centered: bool,
    /// Signed, positive is downward
    pub velocity: f32,
    /// Derived from velocity (radians)
    pub rotation: f32,
    /// When the actor first rested on the floor (grace-period policy only)
    pub grounded_since_ms: Option<f64>,
    pub hitbox_inset: Insets,
}

impl Actor {
    pub fn new(profile: &ActorProfile) -> Self {
        Self {
            x: profile.start_x,
            y: profile.start_y,
            width: profile.width,
            height: profile.height,
            centered: profile.centered,
            velocity: 0.0,
            rotation: 0.0,
            grounded_since_ms: None,
            hitbox_inset: profile.hitbox_inset,
        }
    }

    /// Distance from `y` up to the drawn top edge
    fn top_extent(&self) -> f32 {
        if self.centered { self.height / 2.0 } else { 0.0 }
    }

    /// Distance from `y` down to the drawn bottom edge
    fn bottom_extent(&self) -> f32 {
        if self.centered {
            self.height / 2.0
        } else {
            self.height
        }
    }

    /// Drawn bounding box
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y - self.top_extent(), self.width, self.height)
    }

    /// Collision box, inset from the drawn box
    pub fn hitbox(&self) -> Rect {
        self.bounds().inset(self.hitbox_inset)
    }

    /// Integrate one tick and apply the boundary policy
    pub fn advance(
        &mut self,
        ascending: bool,
        physics: &PhysicsProfile,
        arena: &Arena,
        now_ms: f64,
    ) -> BoundaryOutcome {
        let accel = if ascending {
            physics.ascend_accel
        } else {
            physics.descend_accel
        };
        self.velocity = (self.velocity + accel).clamp(physics.v_min, physics.v_max);
        self.y += self.velocity;
        // Tilt follows the velocity before any bounce correction
        self.rotation =
            rotation_for_velocity(self.velocity, physics.rotation_factor, physics.max_rotation);

        let outcome = match physics.boundary {
            BoundaryPolicy::SoftBounce {
                top_margin,
                bottom_margin,
                damping,
            } => self.soft_bounce(top_margin, arena.height - bottom_margin, damping),
            BoundaryPolicy::GracePeriod {
                grace_ms,
                ceiling_damping,
            } => self.grace_period(grace_ms, ceiling_damping, arena, now_ms),
        };

        // Bounce damping on an asymmetric clamp could otherwise overshoot
        self.velocity = self.velocity.clamp(physics.v_min, physics.v_max);
        outcome
    }

    fn soft_bounce(&mut self, top: f32, floor: f32, damping: f32) -> BoundaryOutcome {
        if self.y < top {
            self.y = top;
            self.velocity = self.velocity.abs() * damping;
            BoundaryOutcome::Bounced
        } else if self.y > floor {
            self.y = floor;
            self.velocity = -self.velocity.abs() * damping;
            BoundaryOutcome::Bounced
        } else {
            BoundaryOutcome::Free
        }
    }

    fn grace_period(
        &mut self,
        grace_ms: f64,
        ceiling_damping: f32,
        arena: &Arena,
        now_ms: f64,
    ) -> BoundaryOutcome {
        let ceiling = self.top_extent();
        let floor = arena.height - self.bottom_extent();

        if self.y < ceiling {
            self.y = ceiling;
            self.velocity = (self.velocity * ceiling_damping).max(0.0);
            self.grounded_since_ms = None;
            BoundaryOutcome::Bounced
        } else if self.y > floor {
            self.y = floor;
            self.velocity = 0.0;
            let since = *self.grounded_since_ms.get_or_insert(now_ms);
            if now_ms - since >= grace_ms {
                self.grounded_since_ms = None;
                BoundaryOutcome::GraceExpired
            } else {
                BoundaryOutcome::Grounded
            }
        } else {
            self.grounded_since_ms = None;
            BoundaryOutcome::Free
        }
    }

    /// Teleport to mid-screen at rest (after a life is lost)
    pub fn reposition_mid(&mut self, arena: &Arena) {
        self.y = arena.mid_height();
        self.velocity = 0.0;
        self.rotation = 0.0;
        self.grounded_since_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{Variant, VariantConfig};

    fn setup(variant: Variant) -> (Actor, VariantConfig) {
        let config = VariantConfig::preset(variant);
        (Actor::new(&config.actor), config)
    }

    #[test]
    fn test_descend_scenario_accelerates_to_clamp() {
        // Soft bounce, descend 0.5, clamp [-8, 8], start at y=240
        let (mut actor, config) = setup(Variant::Aquatic);
        let mut last_y = actor.y;
        for i in 1..=10 {
            let outcome = actor.advance(false, &config.physics, &config.arena, 0.0);
            assert_eq!(outcome, BoundaryOutcome::Free);
            assert!((actor.velocity - 0.5 * i as f32).abs() < 1e-5);
            assert!(actor.y > last_y);
            last_y = actor.y;
        }
        assert!((actor.y - 267.5).abs() < 1e-3);

        // Keep falling: velocity holds at the clamp until the floor engages
        let floor = config.arena.height - 40.0;
        let mut bounced = false;
        for _ in 0..40 {
            let before = actor.y;
            match actor.advance(false, &config.physics, &config.arena, 0.0) {
                BoundaryOutcome::Bounced => {
                    bounced = true;
                    break;
                }
                _ => {
                    assert!(actor.velocity <= 8.0);
                    assert!(actor.y > before);
                }
            }
        }
        assert!(bounced);
        assert_eq!(actor.y, floor);
        assert!(actor.velocity < 0.0);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let (mut actor, config) = setup(Variant::Aquatic);
        // Caller decides intent; exactly-at-threshold maps to descending
        let ascending = 1.0_f32 > config.physics.threshold;
        actor.advance(ascending, &config.physics, &config.arena, 0.0);
        assert!(actor.velocity > 0.0);
    }

    #[test]
    fn test_velocity_clamped_every_tick() {
        let (mut actor, config) = setup(Variant::Aviation);
        actor.velocity = 100.0;
        actor.advance(false, &config.physics, &config.arena, 0.0);
        assert!(actor.velocity <= config.physics.v_max);
        actor.velocity = -100.0;
        actor.advance(true, &config.physics, &config.arena, 0.0);
        assert!(actor.velocity >= config.physics.v_min);
    }

    #[test]
    fn test_soft_bounce_top_is_damped() {
        let (mut actor, config) = setup(Variant::Aviation);
        actor.y = 21.0;
        actor.velocity = -5.0;
        let outcome = actor.advance(true, &config.physics, &config.arena, 0.0);
        assert_eq!(outcome, BoundaryOutcome::Bounced);
        assert_eq!(actor.y, 20.0);
        // |-5.6| * 0.3
        assert!((actor.velocity - 1.68).abs() < 1e-4);
    }

    #[test]
    fn test_bounce_tick_keeps_pre_bounce_tilt() {
        let (mut actor, config) = setup(Variant::Aviation);
        actor.y = 21.0;
        actor.velocity = -5.0;
        actor.advance(true, &config.physics, &config.arena, 0.0);
        // Tilt from -5.6 (nose up), not from the damped rebound
        assert!((actor.rotation - (-0.28)).abs() < 1e-5);

        let floor = config.arena.height - 40.0;
        actor.y = floor - 1.0;
        actor.velocity = 5.0;
        actor.advance(false, &config.physics, &config.arena, 0.0);
        assert_eq!(actor.y, floor);
        assert!(actor.velocity < 0.0);
        assert!(actor.rotation > 0.0);
    }

    #[test]
    fn test_rotation_follows_velocity() {
        assert_eq!(rotation_for_velocity(2.0, 0.05, 0.3), 0.1);
        assert_eq!(rotation_for_velocity(20.0, 0.05, 0.3), 0.3);
        assert_eq!(rotation_for_velocity(-20.0, 0.05, 0.5), -0.5);
    }

    #[test]
    fn test_grace_ceiling_never_pushes_up() {
        let (mut actor, config) = setup(Variant::ObstacleCourse);
        actor.y = 1.0;
        actor.velocity = -5.0;
        let outcome = actor.advance(true, &config.physics, &config.arena, 0.0);
        assert_eq!(outcome, BoundaryOutcome::Bounced);
        assert_eq!(actor.y, 0.0);
        assert_eq!(actor.velocity, 0.0);
    }

    #[test]
    fn test_grace_timer_starts_and_expires() {
        let (mut actor, config) = setup(Variant::ObstacleCourse);
        let floor = config.arena.height - actor.height;
        actor.y = floor;
        actor.velocity = 1.0;

        let outcome = actor.advance(false, &config.physics, &config.arena, 0.0);
        assert_eq!(outcome, BoundaryOutcome::Grounded);
        assert_eq!(actor.grounded_since_ms, Some(0.0));
        assert_eq!(actor.velocity, 0.0);

        let outcome = actor.advance(false, &config.physics, &config.arena, 999.0);
        assert_eq!(outcome, BoundaryOutcome::Grounded);

        let outcome = actor.advance(false, &config.physics, &config.arena, 1000.0);
        assert_eq!(outcome, BoundaryOutcome::GraceExpired);
        assert_eq!(actor.grounded_since_ms, None);
    }

    #[test]
    fn test_leaving_floor_cancels_grace() {
        let (mut actor, config) = setup(Variant::ObstacleCourse);
        actor.y = config.arena.height - actor.height;
        actor.velocity = 1.0;
        actor.advance(false, &config.physics, &config.arena, 0.0);
        assert!(actor.grounded_since_ms.is_some());

        let outcome = actor.advance(true, &config.physics, &config.arena, 500.0);
        assert_eq!(outcome, BoundaryOutcome::Free);
        assert_eq!(actor.grounded_since_ms, None);
    }

    #[test]
    fn test_centered_hitbox() {
        let (actor, _) = setup(Variant::Aquatic);
        // Fish at (50, 240), 40x30 centered, inset l10 t5 r0 b5
        assert_eq!(actor.hitbox(), Rect::new(60.0, 230.0, 30.0, 20.0));
    }

    #[test]
    fn test_reposition_mid() {
        let (mut actor, config) = setup(Variant::ObstacleCourse);
        actor.y = 400.0;
        actor.velocity = 3.0;
        actor.grounded_since_ms = Some(10.0);
        actor.reposition_mid(&config.arena);
        assert_eq!(actor.y, 240.0);
        assert_eq!(actor.velocity, 0.0);
        assert_eq!(actor.grounded_since_ms, None);
    }
}
