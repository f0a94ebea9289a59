//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]; the engine owns it
//! exclusively and collaborators only ever see snapshots.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::collision::Rect;
use super::spawn::{ObstacleSpawner, ScenerySpawner};
use crate::tuning::{Arena, BirdKind, Variant, VariantConfig};

/// Wing animation advance per tick (radians)
pub const WING_FLAP_STEP: f32 = 0.3;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Lives ran out; only a reset leaves this phase
    GameOver,
}

/// Whether touching an obstacle scores or hurts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleRole {
    Collectible,
    Hazard,
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Bubble,
    Bird(BirdKind),
    /// Paired top/bottom barrier; the gap spans `top_height..bottom_y`
    Barrier {
        top_height: f32,
        bottom_y: f32,
        /// Set once the barrier has scored by passing the actor
        passed: bool,
    },
}

impl ObstacleKind {
    pub fn role(&self) -> ObstacleRole {
        match self {
            ObstacleKind::Bubble => ObstacleRole::Collectible,
            ObstacleKind::Bird(_) | ObstacleKind::Barrier { .. } => ObstacleRole::Hazard,
        }
    }
}

/// A moving obstacle entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Leftward speed per tick, fixed at spawn
    pub speed: f32,
    /// Animation phase (presentation only)
    pub phase: f32,
}

impl Obstacle {
    /// Move left by the spawn speed
    pub fn advance(&mut self) {
        self.pos.x -= self.speed;
        if matches!(self.kind, ObstacleKind::Bird(_)) {
            self.phase = (self.phase + WING_FLAP_STEP) % std::f32::consts::TAU;
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Fully past the left edge
    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.size.x < 0.0
    }
}

/// A decorative background body (clouds); never collides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenery {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl Scenery {
    pub fn advance(&mut self) {
        self.pos.x -= self.speed;
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.size.x < 0.0
    }
}

/// Why a life was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PenaltyCause {
    /// Touched a hazard
    Hit { obstacle: u32 },
    /// Let an obstacle leave the screen untouched
    Missed { obstacle: u32 },
    /// Rested on the floor past the grace window
    Grounded,
}

/// Discrete events emitted to collaborators (audio, HUD)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A point was scored; `None` for distance milestones
    Collected { obstacle: Option<u32> },
    Penalized { cause: PenaltyCause },
    GameOver { final_score: u64 },
}

/// Complete game state (deterministic given inputs and RNG draws)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub variant: Variant,
    pub phase: GamePhase,
    /// Never decreases during a game
    pub score: u64,
    /// Half-heart units
    pub lives: u32,
    pub max_lives: u32,
    pub actor: Actor,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub scenery: Vec<Scenery>,
    /// Current boundary constants (changed by resize only)
    pub arena: Arena,
    pub spawner: ObstacleSpawner,
    pub scenery_spawner: ScenerySpawner,
    /// Accumulated distance units for distance scoring
    pub distance: u64,
    /// Simulation tick counter (frozen once the game is over)
    pub time_ticks: u64,
}

impl GameState {
    /// Start-of-game state for a variant
    pub fn new(config: &VariantConfig) -> Self {
        Self {
            variant: config.variant,
            phase: GamePhase::Running,
            score: 0,
            lives: config.max_lives,
            max_lives: config.max_lives,
            actor: Actor::new(&config.actor),
            obstacles: Vec::new(),
            scenery: Vec::new(),
            arena: config.arena,
            spawner: ObstacleSpawner::default(),
            scenery_spawner: ScenerySpawner::default(),
            distance: 0,
            time_ticks: 0,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Remove `units` half-hearts; flips to GameOver when none remain
    ///
    /// Returns true if this call ended the game.
    pub fn lose_lives(&mut self, units: u32) -> bool {
        if self.is_game_over() {
            return false;
        }
        self.lives = self.lives.saturating_sub(units);
        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            return true;
        }
        false
    }

    pub fn add_point(&mut self) {
        self.score += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_matches_config() {
        let config = VariantConfig::preset(Variant::Aviation);
        let state = GameState::new(&config);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.lives, 6);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.actor.x, 80.0);
        assert_eq!(state.actor.y, 240.0);
        assert_eq!(state.actor.velocity, 0.0);
    }

    #[test]
    fn test_lose_lives_saturates_and_ends_game() {
        let config = VariantConfig::preset(Variant::Aquatic);
        let mut state = GameState::new(&config);
        state.lives = 1;
        assert!(state.lose_lives(3));
        assert_eq!(state.lives, 0);
        assert!(state.is_game_over());
        // Already over: no further change
        assert!(!state.lose_lives(1));
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn test_obstacle_advance_and_retire() {
        let mut bubble = Obstacle {
            id: 3,
            kind: ObstacleKind::Bubble,
            pos: Vec2::new(1.0, 50.0),
            size: Vec2::new(15.0, 15.0),
            speed: 2.0,
            phase: 0.0,
        };
        bubble.advance();
        assert_eq!(bubble.pos.x, -1.0);
        assert!(!bubble.is_off_screen());
        for _ in 0..8 {
            bubble.advance();
        }
        assert!(bubble.is_off_screen());
    }

    #[test]
    fn test_roles() {
        assert_eq!(ObstacleKind::Bubble.role(), ObstacleRole::Collectible);
        assert_eq!(ObstacleKind::Bird(BirdKind::Pigeon).role(), ObstacleRole::Hazard);
        let barrier = ObstacleKind::Barrier {
            top_height: 1.0,
            bottom_y: 2.0,
            passed: false,
        };
        assert_eq!(barrier.role(), ObstacleRole::Hazard);
    }
}
