//! Timer-gated obstacle and scenery factories
//!
//! Spawning only draws from the injected RNG, so a seeded generator replays
//! the exact same sequence of obstacles.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Obstacle, ObstacleKind, Scenery};
use crate::tuning::{Arena, ObstacleTemplate, SceneryPolicy, SpawnPolicy};

/// Uniform draw from `[lo, hi)`, collapsing to `lo` for empty ranges
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Tracks the last spawn time of one factory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimer {
    last_ms: Option<f64>,
}

impl SpawnTimer {
    pub fn last_ms(&self) -> Option<f64> {
        self.last_ms
    }

    /// Whether strictly more than `interval_ms` has passed since the last spawn
    ///
    /// The first call starts the clock instead, so nothing appears until one
    /// interval into the game.
    pub fn due(&mut self, now_ms: f64, interval_ms: f64) -> bool {
        match self.last_ms {
            None => {
                self.last_ms = Some(now_ms);
                false
            }
            Some(last) => now_ms - last > interval_ms,
        }
    }

    pub fn mark(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
    }
}

/// Obstacle factory gated by interval, concurrency cap and separation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpawner {
    timer: SpawnTimer,
    next_id: u32,
}

impl Default for ObstacleSpawner {
    fn default() -> Self {
        Self {
            timer: SpawnTimer::default(),
            next_id: 1,
        }
    }
}

impl ObstacleSpawner {
    pub fn last_spawn_ms(&self) -> Option<f64> {
        self.timer.last_ms()
    }

    /// Create an obstacle if every gate is open
    ///
    /// `live` is the current obstacle list in spawn order; its last entry is
    /// the newest obstacle for the separation check.
    pub fn maybe_spawn<R: Rng + ?Sized>(
        &mut self,
        now_ms: f64,
        live: &[Obstacle],
        policy: &SpawnPolicy,
        arena: &Arena,
        rng: &mut R,
    ) -> Option<Obstacle> {
        if !self.timer.due(now_ms, policy.interval_ms) {
            return None;
        }
        if live.len() >= policy.max_concurrent {
            return None;
        }
        if let (Some(sep), Some(newest)) = (policy.min_separation, live.last()) {
            if newest.pos.x >= arena.width - sep {
                return None;
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        self.timer.mark(now_ms);
        Some(build_obstacle(id, &policy.template, arena, rng))
    }
}

/// Draw a fresh obstacle just past the right edge
pub fn build_obstacle<R: Rng + ?Sized>(
    id: u32,
    template: &ObstacleTemplate,
    arena: &Arena,
    rng: &mut R,
) -> Obstacle {
    match template {
        ObstacleTemplate::Bubble {
            size,
            speed_min,
            speed_max,
            vertical_margin,
        } => {
            let y = uniform(rng, *vertical_margin, arena.height - vertical_margin);
            Obstacle {
                id,
                kind: ObstacleKind::Bubble,
                pos: Vec2::new(arena.width, y),
                size: Vec2::splat(*size),
                speed: uniform(rng, *speed_min, *speed_max),
                phase: 0.0,
            }
        }
        ObstacleTemplate::Bird {
            species,
            spawn_offset_x,
            vertical_margin,
        } => {
            let pick = species[rng.random_range(0..species.len())];
            let y = uniform(rng, *vertical_margin, arena.height - vertical_margin);
            Obstacle {
                id,
                kind: ObstacleKind::Bird(pick.kind),
                pos: Vec2::new(arena.width + spawn_offset_x, y),
                size: Vec2::new(pick.width, pick.height),
                speed: pick.speed,
                phase: uniform(rng, 0.0, std::f32::consts::TAU),
            }
        }
        ObstacleTemplate::Barrier {
            width,
            speed,
            gap_min,
            gap_max,
            edge_margin,
        } => {
            let gap = uniform(rng, *gap_min, *gap_max);
            let top_height = uniform(rng, *edge_margin, arena.height - gap - edge_margin);
            Obstacle {
                id,
                kind: ObstacleKind::Barrier {
                    top_height,
                    bottom_y: top_height + gap,
                    passed: false,
                },
                pos: Vec2::new(arena.width, 0.0),
                size: Vec2::new(*width, arena.height),
                speed: *speed,
                phase: 0.0,
            }
        }
    }
}

/// Background decoration factory (interval only, no cap)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenerySpawner {
    timer: SpawnTimer,
    next_id: u32,
}

impl Default for ScenerySpawner {
    fn default() -> Self {
        Self {
            timer: SpawnTimer::default(),
            next_id: 1,
        }
    }
}

impl ScenerySpawner {
    pub fn maybe_spawn<R: Rng + ?Sized>(
        &mut self,
        now_ms: f64,
        policy: &SceneryPolicy,
        arena: &Arena,
        rng: &mut R,
    ) -> Option<Scenery> {
        if !self.timer.due(now_ms, policy.interval_ms) {
            return None;
        }
        self.timer.mark(now_ms);
        let id = self.next_id;
        self.next_id += 1;

        let y = uniform(rng, policy.top_margin, arena.height - policy.bottom_margin);
        Some(Scenery {
            id,
            pos: Vec2::new(arena.width + policy.spawn_offset_x, y),
            size: Vec2::new(
                uniform(rng, policy.width_min, policy.width_max),
                uniform(rng, policy.height_min, policy.height_max),
            ),
            speed: uniform(rng, policy.speed_min, policy.speed_max),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{Variant, VariantConfig};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_first_call_starts_clock() {
        let config = VariantConfig::preset(Variant::Aquatic);
        let mut rng = Pcg32::seed_from_u64(7);
        let mut spawner = ObstacleSpawner::default();

        assert!(spawner.maybe_spawn(0.0, &[], &config.spawn, &config.arena, &mut rng).is_none());
        assert!(spawner.maybe_spawn(3000.0, &[], &config.spawn, &config.arena, &mut rng).is_none());
        let bubble = spawner
            .maybe_spawn(3001.0, &[], &config.spawn, &config.arena, &mut rng)
            .expect("interval elapsed");
        assert_eq!(bubble.pos.x, config.arena.width);
        assert_eq!(spawner.last_spawn_ms(), Some(3001.0));
    }

    #[test]
    fn test_cap_blocks_spawn_without_resetting_timer() {
        let config = VariantConfig::preset(Variant::Aquatic);
        let mut rng = Pcg32::seed_from_u64(7);
        let mut spawner = ObstacleSpawner::default();
        spawner.maybe_spawn(0.0, &[], &config.spawn, &config.arena, &mut rng);

        let live: Vec<Obstacle> = (0..3)
            .map(|i| build_obstacle(100 + i, &config.spawn.template, &config.arena, &mut rng))
            .collect();
        assert!(spawner.maybe_spawn(5000.0, &live, &config.spawn, &config.arena, &mut rng).is_none());
        assert_eq!(spawner.last_spawn_ms(), Some(0.0));

        assert!(spawner.maybe_spawn(5001.0, &live[..2], &config.spawn, &config.arena, &mut rng).is_some());
    }

    #[test]
    fn test_bubble_ranges() {
        let config = VariantConfig::preset(Variant::Aquatic);
        let mut rng = Pcg32::seed_from_u64(1);
        for id in 0..200 {
            let o = build_obstacle(id, &config.spawn.template, &config.arena, &mut rng);
            assert_eq!(o.kind, ObstacleKind::Bubble);
            assert_eq!(o.size, Vec2::splat(15.0));
            assert!((30.0..450.0).contains(&o.pos.y));
            assert!((1.5..2.5).contains(&o.speed));
        }
    }

    #[test]
    fn test_bird_species_sizes() {
        let config = VariantConfig::preset(Variant::Aviation);
        let mut rng = Pcg32::seed_from_u64(2);
        for id in 0..200 {
            let o = build_obstacle(id, &config.spawn.template, &config.arena, &mut rng);
            let ObstacleKind::Bird(kind) = o.kind else {
                panic!("expected a bird, got {:?}", o.kind);
            };
            let expected = match kind {
                crate::tuning::BirdKind::Eagle => (35.0, 20.0, 1.8),
                crate::tuning::BirdKind::Seagull => (25.0, 15.0, 2.2),
                crate::tuning::BirdKind::Pigeon => (20.0, 12.0, 2.5),
            };
            assert_eq!((o.size.x, o.size.y, o.speed), expected);
            assert_eq!(o.pos.x, config.arena.width + 20.0);
            assert!((50.0..430.0).contains(&o.pos.y));
        }
    }

    #[test]
    fn test_barrier_gap_bounds() {
        let config = VariantConfig::preset(Variant::ObstacleCourse);
        let mut rng = Pcg32::seed_from_u64(3);
        for id in 0..200 {
            let o = build_obstacle(id, &config.spawn.template, &config.arena, &mut rng);
            let ObstacleKind::Barrier {
                top_height,
                bottom_y,
                passed,
            } = o.kind
            else {
                panic!("expected a barrier");
            };
            assert!(!passed);
            assert!((bottom_y - top_height - 220.0).abs() < 1e-3);
            assert!(top_height >= 80.0);
            assert!(bottom_y <= config.arena.height - 80.0 + 1e-3);
        }
    }

    #[test]
    fn test_barrier_on_tiny_arena_still_has_gap() {
        let config = VariantConfig::preset(Variant::ObstacleCourse);
        let arena = Arena::new(400.0, 200.0);
        let mut rng = Pcg32::seed_from_u64(3);
        let o = build_obstacle(1, &config.spawn.template, &arena, &mut rng);
        let ObstacleKind::Barrier { top_height, bottom_y, .. } = o.kind else {
            panic!("expected a barrier");
        };
        assert_eq!(top_height, 80.0);
        assert_eq!(bottom_y, 300.0);
    }

    #[test]
    fn test_barrier_separation_gate() {
        let config = VariantConfig::preset(Variant::ObstacleCourse);
        let mut rng = Pcg32::seed_from_u64(4);
        let mut spawner = ObstacleSpawner::default();
        spawner.maybe_spawn(0.0, &[], &config.spawn, &config.arena, &mut rng);

        let mut newest = build_obstacle(50, &config.spawn.template, &config.arena, &mut rng);
        newest.pos.x = config.arena.width - 200.0;
        let live = vec![newest.clone()];
        assert!(spawner.maybe_spawn(9000.0, &live, &config.spawn, &config.arena, &mut rng).is_none());

        newest.pos.x = config.arena.width - 251.0;
        let live = vec![newest];
        assert!(spawner.maybe_spawn(9000.0, &live, &config.spawn, &config.arena, &mut rng).is_some());
    }

    #[test]
    fn test_scenery_interval() {
        let config = VariantConfig::preset(Variant::Aviation);
        let policy = config.scenery.expect("aviation has clouds");
        let mut rng = Pcg32::seed_from_u64(5);
        let mut spawner = ScenerySpawner::default();
        assert!(spawner.maybe_spawn(0.0, &policy, &config.arena, &mut rng).is_none());
        assert!(spawner.maybe_spawn(8000.0, &policy, &config.arena, &mut rng).is_none());
        let cloud = spawner
            .maybe_spawn(8000.5, &policy, &config.arena, &mut rng)
            .expect("interval elapsed");
        assert_eq!(cloud.pos.x, config.arena.width + 50.0);
        assert!((60.0..100.0).contains(&cloud.size.x));
        assert!((30.0..50.0).contains(&cloud.size.y));
    }

    #[test]
    fn test_same_seed_same_obstacles() {
        let config = VariantConfig::preset(Variant::Aviation);
        let mut a = Pcg32::seed_from_u64(99);
        let mut b = Pcg32::seed_from_u64(99);
        for id in 0..20 {
            assert_eq!(
                build_obstacle(id, &config.spawn.template, &config.arena, &mut a),
                build_obstacle(id, &config.spawn.template, &config.arena, &mut b)
            );
        }
    }

    proptest! {
        #[test]
        fn spawner_respects_cap_and_interval(
            seed in 0u64..500,
            steps in proptest::collection::vec((1.0f64..400.0, 0usize..6), 10..120)
        ) {
            let config = VariantConfig::preset(Variant::Aviation);
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut spawner = ObstacleSpawner::default();
            let mut now = 0.0;
            let mut last_spawn: Option<f64> = None;

            for (dt, live_count) in steps {
                now += dt;
                let live: Vec<Obstacle> = (0..live_count as u32)
                    .map(|i| build_obstacle(1000 + i, &config.spawn.template, &config.arena, &mut rng))
                    .collect();
                if spawner.maybe_spawn(now, &live, &config.spawn, &config.arena, &mut rng).is_some() {
                    prop_assert!(live_count < config.spawn.max_concurrent);
                    if let Some(prev) = last_spawn {
                        prop_assert!(now - prev > config.spawn.interval_ms);
                    }
                    last_spawn = Some(now);
                }
            }
        }
    }
}
