//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per host frame, driven by the frame timestamp
//! - Injected RNG only
//! - Stable iteration order (obstacles in spawn order)
//! - No rendering, audio or platform dependencies

pub mod actor;
pub mod collision;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use actor::{Actor, BoundaryOutcome};
pub use collision::{Outcome, Rect, test_collision};
pub use snapshot::{HeartSlot, RenderSnapshot, hearts};
pub use spawn::{ObstacleSpawner, ScenerySpawner};
pub use state::{
    GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, ObstacleRole, PenaltyCause, Scenery,
};
pub use tick::{TickInput, TickOutput, ascend_intent, tick};
