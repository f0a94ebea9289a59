//! Frame driver
//!
//! The engine is the only owner of the game state. The host calls
//! [`Engine::frame`] once per display refresh; renderers and audio only see
//! the snapshot and events it returns.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::control::ControlSource;
use crate::sim::{GameState, RenderSnapshot, TickInput, TickOutput, tick};
use crate::tuning::{Arena, ConfigError, VariantConfig};

pub struct Engine<C: ControlSource> {
    config: VariantConfig,
    state: GameState,
    rng: Pcg32,
    seed: u64,
    control: C,
    last_snapshot: RenderSnapshot,
}

impl<C: ControlSource> Engine<C> {
    /// Validate the config and start a fresh game
    pub fn new(config: VariantConfig, seed: u64, control: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = GameState::new(&config);
        let last_snapshot = RenderSnapshot::capture(&state);
        log::info!(
            "starting {} on {}x{} (seed {seed})",
            config.variant.as_str(),
            config.arena.width,
            config.arena.height
        );
        Ok(Self {
            config,
            state,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            control,
            last_snapshot,
        })
    }

    /// Sample the control source and advance one tick
    pub fn frame(&mut self, now_ms: f64) -> TickOutput {
        let control_value = self.control.sample_control_value();
        self.step(&TickInput {
            control_value,
            now_ms,
        })
    }

    /// Advance one tick with an explicit input
    pub fn step(&mut self, input: &TickInput) -> TickOutput {
        let output = tick(&mut self.state, &self.config, input, &mut self.rng);
        self.last_snapshot = output.snapshot.clone();
        output
    }

    /// Start a new game with the same config; the RNG stream continues
    pub fn reset(&mut self) {
        self.state = GameState::new(&self.config);
        self.last_snapshot = RenderSnapshot::capture(&self.state);
        log::info!("reset {}", self.config.variant.as_str());
    }

    /// Change the playfield bounds without moving anything
    ///
    /// Returns false (and changes nothing) for non-finite or non-positive sizes.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let arena = Arena::new(width, height);
        if !arena.is_valid() {
            log::warn!("ignoring resize to {width}x{height}");
            return false;
        }
        self.config.arena = arena;
        self.state.arena = arena;
        self.last_snapshot = RenderSnapshot::capture(&self.state);
        log::info!("resized to {width}x{height}");
        true
    }

    /// Latest snapshot; stays valid after later ticks
    pub fn snapshot(&self) -> &RenderSnapshot {
        &self.last_snapshot
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &VariantConfig {
        &self.config
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn control_mut(&mut self) -> &mut C {
        &mut self.control
    }
}
