//! Data-driven game balance
//!
//! One engine runs every game; what makes the fish, the airplane and the
//! flappy bird feel different is the [`VariantConfig`] handed to it. Presets
//! carry the shipped constants, and every config is validated once at
//! construction so the tick path never has to second-guess its inputs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_ARENA_HEIGHT, DEFAULT_ARENA_WIDTH};

/// The playable game variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Variant {
    /// Fish collecting bubbles under water
    #[default]
    Aquatic,
    /// Airplane dodging birds
    Aviation,
    /// Bird threading pipe gaps
    ObstacleCourse,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Aquatic, Variant::Aviation, Variant::ObstacleCourse];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Aquatic => "aquatic",
            Variant::Aviation => "aviation",
            Variant::ObstacleCourse => "obstacle-course",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "aquatic" | "fish" => Some(Variant::Aquatic),
            "aviation" | "airplane" | "plane" => Some(Variant::Aviation),
            "obstacle-course" | "course" | "flappy" | "bird" => Some(Variant::ObstacleCourse),
            _ => None,
        }
    }
}

/// Construction-time configuration defects
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("spawn interval must be positive, got {0} ms")]
    NonPositiveInterval(f64),
    #[error("max concurrent obstacles must be at least 1")]
    ZeroMaxConcurrent,
    #[error("velocity clamp is inverted: v_min {v_min} > v_max {v_max}")]
    InvertedVelocityClamp { v_min: f32, v_max: f32 },
    #[error("max lives must be at least 1")]
    ZeroMaxLives,
    #[error("{field} range is inverted: {min} > {max}")]
    InvertedRange { field: &'static str, min: f32, max: f32 },
    #[error("grace period must be positive, got {0} ms")]
    NonPositiveGrace(f64),
    #[error("damping factor {0} must be within [0, 1]")]
    DampingOutOfRange(f32),
    #[error("bird species table must contain at least one entry")]
    NoSpecies,
    #[error("arena must have positive dimensions, got {width}x{height}")]
    NonPositiveArena { width: f32, height: f32 },
    #[error("actor size must be positive and larger than its hitbox inset")]
    DegenerateActor,
    #[error("distance scoring needs a non-zero step per point")]
    ZeroScoreStep,
    #[error("distance scoring needs non-zero units per tick")]
    ZeroDistancePerTick,
    #[error("penalty must cost at least one half heart")]
    ZeroPenalty,
    #[error("{field} must move left at a positive speed, got {value}")]
    NonPositiveSpeed { field: &'static str, value: f32 },
    #[error("{field} must be positive, got {value}")]
    NonPositiveSize { field: &'static str, value: f32 },
}

/// Playfield dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: DEFAULT_ARENA_WIDTH,
            height: DEFAULT_ARENA_HEIGHT,
        }
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn mid_height(&self) -> f32 {
        self.height / 2.0
    }
}

/// What happens when the actor reaches the top or bottom of the arena
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BoundaryPolicy {
    /// Clamp to the margin and bounce back with damped speed
    SoftBounce {
        top_margin: f32,
        bottom_margin: f32,
        damping: f32,
    },
    /// Resting on the floor is tolerated for `grace_ms`, then costs a life
    GracePeriod {
        grace_ms: f64,
        /// Applied when hitting the ceiling; the result never points downward-negative
        ceiling_damping: f32,
    },
}

/// Per-variant actor dynamics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsProfile {
    /// Ascend iff the control value is strictly greater than this
    pub threshold: f32,
    pub ascend_accel: f32,
    pub descend_accel: f32,
    pub v_min: f32,
    pub v_max: f32,
    /// Rotation = velocity * factor, clamped to +-max_rotation (radians)
    pub rotation_factor: f32,
    pub max_rotation: f32,
    pub boundary: BoundaryPolicy,
}

/// Insets shrinking the drawn box into the collision box
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Insets {
    pub const fn uniform(v: f32) -> Self {
        Self {
            left: v,
            top: v,
            right: v,
            bottom: v,
        }
    }
}

/// Actor body and start pose
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorProfile {
    pub start_x: f32,
    pub start_y: f32,
    pub width: f32,
    pub height: f32,
    /// True when `y` names the vertical center of the body instead of its top
    pub centered: bool,
    pub hitbox_inset: Insets,
}

/// One bird species in the aviation flock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BirdSpecies {
    pub kind: BirdKind,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BirdKind {
    Seagull,
    Eagle,
    Pigeon,
}

/// How new obstacles are shaped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObstacleTemplate {
    /// Collectible square drifting left
    Bubble {
        size: f32,
        speed_min: f32,
        speed_max: f32,
        /// Distance kept from the top and bottom edges
        vertical_margin: f32,
    },
    /// Hazard picked uniformly from a species table
    Bird {
        species: Vec<BirdSpecies>,
        spawn_offset_x: f32,
        vertical_margin: f32,
    },
    /// Top and bottom barrier with a gap between them
    Barrier {
        width: f32,
        speed: f32,
        gap_min: f32,
        gap_max: f32,
        /// Minimum length of either barrier half
        edge_margin: f32,
    },
}

/// Timer, cap and separation rules for the obstacle factory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnPolicy {
    pub interval_ms: f64,
    pub max_concurrent: usize,
    /// The newest live obstacle must have moved this far in from the right edge
    pub min_separation: Option<f32>,
    pub template: ObstacleTemplate,
}

/// Decorative background bodies; never collide
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneryPolicy {
    pub interval_ms: f64,
    pub width_min: f32,
    pub width_max: f32,
    pub height_min: f32,
    pub height_max: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub spawn_offset_x: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
}

/// Consequence of an obstacle leaving the screen untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissPolicy {
    Neutral,
    Penalized,
}

/// How points are earned
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScoreRule {
    /// One point per collected obstacle
    Collect,
    /// One point when a barrier's right edge passes the actor
    PassBarrier,
    /// Distance accrues every tick; one point per `units_per_point`
    Distance { units_per_tick: u32, units_per_point: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionPolicy {
    pub miss: MissPolicy,
    pub score: ScoreRule,
    /// Hazard hits move the actor to mid-screen with zero velocity
    pub reposition_on_hit: bool,
    /// Repositioning also clears every obstacle in flight
    pub clear_obstacles_on_reposition: bool,
    /// Half-heart units lost per penalty
    pub penalty: u32,
}

/// Complete tuning for one variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantConfig {
    pub variant: Variant,
    pub arena: Arena,
    pub max_lives: u32,
    pub actor: ActorProfile,
    pub physics: PhysicsProfile,
    pub spawn: SpawnPolicy,
    pub collision: CollisionPolicy,
    #[serde(default)]
    pub scenery: Option<SceneryPolicy>,
}

impl VariantConfig {
    /// Shipped constants for a variant, on the default arena
    pub fn preset(variant: Variant) -> Self {
        match variant {
            Variant::Aquatic => Self::aquatic(),
            Variant::Aviation => Self::aviation(),
            Variant::ObstacleCourse => Self::obstacle_course(),
        }
    }

    fn aquatic() -> Self {
        Self {
            variant: Variant::Aquatic,
            arena: Arena::default(),
            max_lives: 5,
            actor: ActorProfile {
                start_x: 50.0,
                start_y: 240.0,
                width: 40.0,
                height: 30.0,
                centered: true,
                hitbox_inset: Insets {
                    left: 10.0,
                    top: 5.0,
                    right: 0.0,
                    bottom: 5.0,
                },
            },
            physics: PhysicsProfile {
                threshold: 1.0,
                ascend_accel: -0.5,
                descend_accel: 0.5,
                v_min: -8.0,
                v_max: 8.0,
                rotation_factor: 0.02,
                max_rotation: 0.3,
                boundary: BoundaryPolicy::SoftBounce {
                    top_margin: 40.0,
                    bottom_margin: 40.0,
                    damping: 0.5,
                },
            },
            spawn: SpawnPolicy {
                interval_ms: 3000.0,
                max_concurrent: 3,
                min_separation: None,
                template: ObstacleTemplate::Bubble {
                    size: 15.0,
                    speed_min: 1.5,
                    speed_max: 2.5,
                    vertical_margin: 30.0,
                },
            },
            collision: CollisionPolicy {
                miss: MissPolicy::Penalized,
                score: ScoreRule::Collect,
                reposition_on_hit: false,
                clear_obstacles_on_reposition: false,
                penalty: 1,
            },
            scenery: None,
        }
    }

    fn aviation() -> Self {
        Self {
            variant: Variant::Aviation,
            arena: Arena::default(),
            max_lives: 6,
            actor: ActorProfile {
                start_x: 80.0,
                start_y: 240.0,
                width: 50.0,
                height: 25.0,
                centered: false,
                hitbox_inset: Insets {
                    left: 5.0,
                    top: 2.0,
                    right: 5.0,
                    bottom: 2.0,
                },
            },
            physics: PhysicsProfile {
                threshold: 1.0,
                ascend_accel: -0.6,
                descend_accel: 0.4,
                v_min: -6.0,
                v_max: 6.0,
                rotation_factor: 0.05,
                max_rotation: 0.3,
                boundary: BoundaryPolicy::SoftBounce {
                    top_margin: 20.0,
                    bottom_margin: 40.0,
                    damping: 0.3,
                },
            },
            spawn: SpawnPolicy {
                interval_ms: 2500.0,
                max_concurrent: 4,
                min_separation: None,
                template: ObstacleTemplate::Bird {
                    species: vec![
                        BirdSpecies {
                            kind: BirdKind::Seagull,
                            width: 25.0,
                            height: 15.0,
                            speed: 2.2,
                        },
                        BirdSpecies {
                            kind: BirdKind::Eagle,
                            width: 35.0,
                            height: 20.0,
                            speed: 1.8,
                        },
                        BirdSpecies {
                            kind: BirdKind::Pigeon,
                            width: 20.0,
                            height: 12.0,
                            speed: 2.5,
                        },
                    ],
                    spawn_offset_x: 20.0,
                    vertical_margin: 50.0,
                },
            },
            collision: CollisionPolicy {
                miss: MissPolicy::Neutral,
                score: ScoreRule::Distance {
                    units_per_tick: 2,
                    units_per_point: 100,
                },
                reposition_on_hit: false,
                clear_obstacles_on_reposition: false,
                penalty: 1,
            },
            scenery: Some(SceneryPolicy {
                interval_ms: 8000.0,
                width_min: 60.0,
                width_max: 100.0,
                height_min: 30.0,
                height_max: 50.0,
                speed_min: 0.5,
                speed_max: 0.8,
                spawn_offset_x: 50.0,
                top_margin: 50.0,
                bottom_margin: 100.0,
            }),
        }
    }

    fn obstacle_course() -> Self {
        Self {
            variant: Variant::ObstacleCourse,
            arena: Arena::default(),
            max_lives: 6,
            actor: ActorProfile {
                start_x: 100.0,
                start_y: 240.0,
                width: 30.0,
                height: 25.0,
                centered: false,
                hitbox_inset: Insets::uniform(3.0),
            },
            physics: PhysicsProfile {
                threshold: 0.7,
                // Constant gravity 0.15 plus a 0.4 lift while ascending
                ascend_accel: -0.25,
                descend_accel: 0.15,
                v_min: -5.0,
                v_max: 4.0,
                rotation_factor: 0.05,
                max_rotation: 0.5,
                boundary: BoundaryPolicy::GracePeriod {
                    grace_ms: 1000.0,
                    ceiling_damping: 0.3,
                },
            },
            spawn: SpawnPolicy {
                interval_ms: 4000.0,
                max_concurrent: 8,
                min_separation: Some(250.0),
                template: ObstacleTemplate::Barrier {
                    width: 50.0,
                    speed: 1.2,
                    gap_min: 220.0,
                    gap_max: 220.0,
                    edge_margin: 80.0,
                },
            },
            collision: CollisionPolicy {
                miss: MissPolicy::Neutral,
                score: ScoreRule::PassBarrier,
                reposition_on_hit: true,
                clear_obstacles_on_reposition: false,
                penalty: 1,
            },
            scenery: None,
        }
    }

    /// Same tuning on a different playfield
    pub fn with_arena(mut self, arena: Arena) -> Self {
        self.arena = arena;
        self
    }

    /// Reject configurations that cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.arena.is_valid() {
            return Err(ConfigError::NonPositiveArena {
                width: self.arena.width,
                height: self.arena.height,
            });
        }
        if self.max_lives == 0 {
            return Err(ConfigError::ZeroMaxLives);
        }

        let a = &self.actor;
        finite("actor.start_x", a.start_x)?;
        finite("actor.start_y", a.start_y)?;
        let inset = a.hitbox_inset;
        if !(a.width > 0.0
            && a.height > 0.0
            && inset.left + inset.right < a.width
            && inset.top + inset.bottom < a.height)
        {
            return Err(ConfigError::DegenerateActor);
        }

        let p = &self.physics;
        finite("physics.threshold", p.threshold)?;
        finite("physics.ascend_accel", p.ascend_accel)?;
        finite("physics.descend_accel", p.descend_accel)?;
        finite("physics.v_min", p.v_min)?;
        finite("physics.v_max", p.v_max)?;
        finite("physics.rotation_factor", p.rotation_factor)?;
        finite("physics.max_rotation", p.max_rotation)?;
        if p.v_min > p.v_max {
            return Err(ConfigError::InvertedVelocityClamp {
                v_min: p.v_min,
                v_max: p.v_max,
            });
        }
        match p.boundary {
            BoundaryPolicy::SoftBounce {
                top_margin,
                bottom_margin,
                damping,
            } => {
                finite("boundary.top_margin", top_margin)?;
                finite("boundary.bottom_margin", bottom_margin)?;
                check_damping(damping)?;
            }
            BoundaryPolicy::GracePeriod {
                grace_ms,
                ceiling_damping,
            } => {
                if !grace_ms.is_finite() || grace_ms <= 0.0 {
                    return Err(ConfigError::NonPositiveGrace(grace_ms));
                }
                check_damping(ceiling_damping)?;
            }
        }

        let s = &self.spawn;
        if !s.interval_ms.is_finite() || s.interval_ms <= 0.0 {
            return Err(ConfigError::NonPositiveInterval(s.interval_ms));
        }
        if s.max_concurrent == 0 {
            return Err(ConfigError::ZeroMaxConcurrent);
        }
        if let Some(sep) = s.min_separation {
            finite("spawn.min_separation", sep)?;
        }
        match &s.template {
            ObstacleTemplate::Bubble {
                size,
                speed_min,
                speed_max,
                vertical_margin,
            } => {
                positive_size("bubble.size", *size)?;
                finite("bubble.vertical_margin", *vertical_margin)?;
                ordered("bubble.speed", *speed_min, *speed_max)?;
                positive_speed("bubble.speed_min", *speed_min)?;
            }
            ObstacleTemplate::Bird {
                species,
                spawn_offset_x,
                vertical_margin,
            } => {
                if species.is_empty() {
                    return Err(ConfigError::NoSpecies);
                }
                finite("bird.spawn_offset_x", *spawn_offset_x)?;
                finite("bird.vertical_margin", *vertical_margin)?;
                for sp in species {
                    positive_size("bird.width", sp.width)?;
                    positive_size("bird.height", sp.height)?;
                    positive_speed("bird.speed", sp.speed)?;
                }
            }
            ObstacleTemplate::Barrier {
                width,
                speed,
                gap_min,
                gap_max,
                edge_margin,
            } => {
                positive_size("barrier.width", *width)?;
                positive_speed("barrier.speed", *speed)?;
                finite("barrier.edge_margin", *edge_margin)?;
                ordered("barrier.gap", *gap_min, *gap_max)?;
            }
        }

        if self.collision.penalty == 0 {
            return Err(ConfigError::ZeroPenalty);
        }
        if let ScoreRule::Distance {
            units_per_tick,
            units_per_point,
        } = self.collision.score
        {
            if units_per_point == 0 {
                return Err(ConfigError::ZeroScoreStep);
            }
            if units_per_tick == 0 {
                return Err(ConfigError::ZeroDistancePerTick);
            }
        }

        if let Some(sc) = &self.scenery {
            if !sc.interval_ms.is_finite() || sc.interval_ms <= 0.0 {
                return Err(ConfigError::NonPositiveInterval(sc.interval_ms));
            }
            ordered("scenery.width", sc.width_min, sc.width_max)?;
            ordered("scenery.height", sc.height_min, sc.height_max)?;
            ordered("scenery.speed", sc.speed_min, sc.speed_max)?;
            positive_size("scenery.width_min", sc.width_min)?;
            positive_size("scenery.height_min", sc.height_min)?;
            positive_speed("scenery.speed_min", sc.speed_min)?;
        }

        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite {
            field,
            value: value as f64,
        })
    }
}

fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    finite(field, min)?;
    finite(field, max)?;
    if min > max {
        return Err(ConfigError::InvertedRange { field, min, max });
    }
    Ok(())
}

fn positive_speed(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NonPositiveSpeed { field, value });
    }
    Ok(())
}

fn positive_size(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NonPositiveSize { field, value });
    }
    Ok(())
}

fn check_damping(damping: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&damping) {
        Ok(())
    } else {
        Err(ConfigError::DampingOutOfRange(damping))
    }
}
