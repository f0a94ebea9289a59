//! Mouth Arcade - one-button arcade games steered by a single control value
//!
//! A sensor (typically a mouth-openness detector) publishes one number per
//! frame; values above a variant's threshold make the actor rise. The same
//! engine drives three variants: a fish collecting bubbles, an airplane
//! dodging birds and a bird threading barrier gaps.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actor physics, spawning, collisions, game state)
//! - `tuning`: Data-driven per-variant configuration
//! - `control`: Control value sources shared with the sensor thread
//! - `engine`: Frame loop owning state, RNG and the last snapshot
//! - `audio`: Tone and music cues driven by game events
//! - `settings`: Persisted user preferences

pub mod audio;
pub mod control;
pub mod engine;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use control::{ControlSource, ControlWriter, SharedControl};
pub use engine::Engine;
pub use settings::Settings;
pub use tuning::{ConfigError, Variant, VariantConfig};

/// Game configuration constants
pub mod consts {
    /// Default playfield size in pixels
    pub const DEFAULT_ARENA_WIDTH: f32 = 400.0;
    pub const DEFAULT_ARENA_HEIGHT: f32 = 480.0;

    /// Host frame period assumed by the headless runner (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Lives are counted in half hearts
    pub const HALF_HEARTS_PER_HEART: u32 = 2;
}
