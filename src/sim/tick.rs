//! Per-frame simulation tick
//!
//! One call advances the game by exactly one frame: actor, spawners, then each
//! obstacle in spawn order (advance, collide, retire or keep). Given the same
//! state, input and RNG draws, a tick always produces the same result.

use rand::Rng;

use super::actor::BoundaryOutcome;
use super::collision::{Outcome, test_collision};
use super::snapshot::RenderSnapshot;
use super::state::{GameEvent, GameState, ObstacleKind, PenaltyCause};
use crate::tuning::{MissPolicy, ScoreRule, VariantConfig};

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Latest control value; `None` when the sensor has nothing (yet)
    pub control_value: Option<f32>,
    /// Host frame timestamp in milliseconds
    pub now_ms: f64,
}

/// What a tick hands to the collaborators
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutput {
    pub snapshot: RenderSnapshot,
    /// Events in the order they happened
    pub events: Vec<GameEvent>,
}

/// Ascend iff the value is present, finite and strictly above the threshold
#[inline]
pub fn ascend_intent(control_value: Option<f32>, threshold: f32) -> bool {
    matches!(control_value, Some(v) if v.is_finite() && v > threshold)
}

/// Advance the game state by one frame
pub fn tick<R: Rng + ?Sized>(
    state: &mut GameState,
    config: &VariantConfig,
    input: &TickInput,
    rng: &mut R,
) -> TickOutput {
    let mut events = Vec::new();

    if state.is_game_over() {
        return finish(state, events);
    }

    state.time_ticks += 1;

    // Actor
    let ascending = ascend_intent(input.control_value, config.physics.threshold);
    let boundary = state
        .actor
        .advance(ascending, &config.physics, &state.arena, input.now_ms);
    if boundary == BoundaryOutcome::GraceExpired {
        if penalize(state, config, PenaltyCause::Grounded, &mut events) {
            return finish(state, events);
        }
        reposition(state, config);
    }

    // Distance scoring
    if let ScoreRule::Distance {
        units_per_tick,
        units_per_point,
    } = config.collision.score
    {
        let step = units_per_point as u64;
        let before = state.distance / step;
        state.distance += units_per_tick as u64;
        // One point per milestone crossed, even if a tick jumps past several
        for _ in before..state.distance / step {
            state.add_point();
            events.push(GameEvent::Collected { obstacle: None });
        }
    }

    // Spawning
    if let Some(obstacle) = state.spawner.maybe_spawn(
        input.now_ms,
        &state.obstacles,
        &config.spawn,
        &state.arena,
        rng,
    ) {
        log::debug!(
            "spawned {:?} #{} at ({:.0}, {:.0})",
            obstacle.kind,
            obstacle.id,
            obstacle.pos.x,
            obstacle.pos.y
        );
        state.obstacles.push(obstacle);
    }
    if let Some(policy) = &config.scenery {
        if let Some(cloud) =
            state
                .scenery_spawner
                .maybe_spawn(input.now_ms, policy, &state.arena, rng)
        {
            state.scenery.push(cloud);
        }
    }

    // Scenery drifts and never interacts
    for cloud in &mut state.scenery {
        cloud.advance();
    }
    state.scenery.retain(|c| !c.is_off_screen());

    resolve_obstacles(state, config, &mut events);

    finish(state, events)
}

fn finish(state: &GameState, events: Vec<GameEvent>) -> TickOutput {
    TickOutput {
        snapshot: RenderSnapshot::capture(state),
        events,
    }
}

/// Advance, collide and retire every obstacle, stopping at game over
fn resolve_obstacles(state: &mut GameState, config: &VariantConfig, events: &mut Vec<GameEvent>) {
    let policy = &config.collision;
    let obstacles = std::mem::take(&mut state.obstacles);
    let mut kept = Vec::with_capacity(obstacles.len());
    let mut cleared = false;

    for mut obstacle in obstacles {
        if cleared {
            break;
        }
        if state.is_game_over() {
            // Untouched for the rest of this tick
            kept.push(obstacle);
            continue;
        }

        obstacle.advance();

        match test_collision(&state.actor.hitbox(), &obstacle) {
            Outcome::Collected => {
                state.add_point();
                log::debug!("collected #{} (score {})", obstacle.id, state.score);
                events.push(GameEvent::Collected {
                    obstacle: Some(obstacle.id),
                });
                continue;
            }
            Outcome::Penalized => {
                let cause = PenaltyCause::Hit {
                    obstacle: obstacle.id,
                };
                let over = penalize(state, config, cause, events);
                if !over && policy.reposition_on_hit && reposition(state, config) {
                    kept.clear();
                    cleared = true;
                }
                continue;
            }
            Outcome::None => {}
        }

        if policy.score == ScoreRule::PassBarrier {
            if let ObstacleKind::Barrier { passed, .. } = &mut obstacle.kind {
                if !*passed && obstacle.pos.x + obstacle.size.x < state.actor.x {
                    *passed = true;
                    state.add_point();
                    events.push(GameEvent::Collected {
                        obstacle: Some(obstacle.id),
                    });
                }
            }
        }

        if obstacle.is_off_screen() {
            if policy.miss == MissPolicy::Penalized {
                let cause = PenaltyCause::Missed {
                    obstacle: obstacle.id,
                };
                penalize(state, config, cause, events);
            }
            continue;
        }

        kept.push(obstacle);
    }

    state.obstacles = kept;
}

/// Apply one penalty; returns true if it ended the game
fn penalize(
    state: &mut GameState,
    config: &VariantConfig,
    cause: PenaltyCause,
    events: &mut Vec<GameEvent>,
) -> bool {
    let over = state.lose_lives(config.collision.penalty);
    log::debug!("penalized: {:?} (lives {})", cause, state.lives);
    events.push(GameEvent::Penalized { cause });
    if over {
        log::info!("game over with score {}", state.score);
        events.push(GameEvent::GameOver {
            final_score: state.score,
        });
    }
    over
}

/// Move the actor to mid-screen; returns true if obstacles were cleared too
fn reposition(state: &mut GameState, config: &VariantConfig) -> bool {
    state.actor.reposition_mid(&state.arena);
    if config.collision.clear_obstacles_on_reposition {
        state.obstacles.clear();
        return true;
    }
    false
}
