//! Read-only render snapshots
//!
//! A snapshot owns copies of everything it shows, so a renderer may keep one
//! across ticks without it changing underneath.

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::state::{GameState, ObstacleKind};
use crate::consts::HALF_HEARTS_PER_HEART;
use crate::tuning::{Arena, Variant};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorPose {
    /// Drawn bounding box
    pub bounds: Rect,
    pub hitbox: Rect,
    pub rotation: f32,
    pub velocity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: u32,
    pub kind: ObstacleKind,
    pub bounds: Rect,
    pub phase: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneryView {
    pub id: u32,
    pub bounds: Rect,
}

/// One displayed heart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeartSlot {
    Full,
    Half,
    Empty,
}

/// Split half-heart units into displayed heart slots
pub fn hearts(lives: u32, max_lives: u32) -> Vec<HeartSlot> {
    let slots = max_lives.div_ceil(HALF_HEARTS_PER_HEART);
    let full = lives / HALF_HEARTS_PER_HEART;
    let has_half = lives % HALF_HEARTS_PER_HEART == 1;

    (0..slots)
        .map(|i| {
            if i < full {
                HeartSlot::Full
            } else if i == full && has_half {
                HeartSlot::Half
            } else {
                HeartSlot::Empty
            }
        })
        .collect()
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub variant: Variant,
    pub arena: Arena,
    pub tick: u64,
    pub actor: ActorPose,
    /// Live obstacles in spawn order
    pub obstacles: Vec<ObstacleView>,
    pub scenery: Vec<SceneryView>,
    pub score: u64,
    pub lives: u32,
    pub max_lives: u32,
    pub game_over: bool,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            variant: state.variant,
            arena: state.arena,
            tick: state.time_ticks,
            actor: ActorPose {
                bounds: state.actor.bounds(),
                hitbox: state.actor.hitbox(),
                rotation: state.actor.rotation,
                velocity: state.actor.velocity,
            },
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    kind: o.kind,
                    bounds: o.bounds(),
                    phase: o.phase,
                })
                .collect(),
            scenery: state
                .scenery
                .iter()
                .map(|s| SceneryView {
                    id: s.id,
                    bounds: Rect {
                        pos: s.pos,
                        size: s.size,
                    },
                })
                .collect(),
            score: state.score,
            lives: state.lives,
            max_lives: state.max_lives,
            game_over: state.is_game_over(),
        }
    }

    pub fn hearts(&self) -> Vec<HeartSlot> {
        hearts(self.lives, self.max_lives)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::VariantConfig;

    #[test]
    fn test_hearts_layout() {
        use HeartSlot::*;
        assert_eq!(hearts(6, 6), vec![Full, Full, Full]);
        assert_eq!(hearts(5, 6), vec![Full, Full, Half]);
        assert_eq!(hearts(3, 6), vec![Full, Half, Empty]);
        assert_eq!(hearts(0, 6), vec![Empty, Empty, Empty]);
        // Odd maximum rounds up to a whole slot
        assert_eq!(hearts(5, 5), vec![Full, Full, Half]);
    }

    #[test]
    fn test_snapshot_is_a_copy() {
        let config = VariantConfig::preset(Variant::Aquatic);
        let mut state = GameState::new(&config);
        let snapshot = RenderSnapshot::capture(&state);

        state.actor.y = 10.0;
        state.score = 42;
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.actor.bounds.pos.y, 225.0);
        assert_eq!(snapshot.lives, 5);
        assert!(!snapshot.game_over);
    }

    #[test]
    fn test_snapshot_serializes() {
        let config = VariantConfig::preset(Variant::ObstacleCourse);
        let state = GameState::new(&config);
        let json = serde_json::to_string(&RenderSnapshot::capture(&state)).unwrap();
        assert!(json.contains("\"variant\":\"ObstacleCourse\""));
        assert!(json.contains("\"game_over\":false"));
    }
}
