use rand::Rng;
use serde::{Deserialize, Serialize};

use skyrun_core::geometry::Aabb;

use crate::config::SimConfig;
use crate::decor::{Decoration, generate_decorations};
use crate::entities::{
    Axis, Goal, Hostile, Pickup, Platform, PlatformMotion, PowerUpProp, Spring,
};
use crate::levels::LevelProfile;
use crate::powerups::PowerUpKind;

/// Horizontal jitter range of helper platforms around the segment centre.
const HELPER_JITTER: f32 = 120.0;
/// Helper platforms sit this far below their segment, plus up to `HELPER_DROP_SPAN`.
const HELPER_DROP: f32 = 75.0;
const HELPER_DROP_SPAN: f32 = 45.0;
/// Spawn heights above the segment top.
const HOSTILE_LIFT: f32 = 30.0;
const PICKUP_LIFT: f32 = 40.0;
const SPRING_LIFT: f32 = 20.0;
const POWERUP_LIFT: f32 = 25.0;
/// Goal placement relative to the world's right edge and floor.
const GOAL_INSET: f32 = 150.0;
const GOAL_LIFT: f32 = 120.0;

/// Every entity of one generated level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// 1-based level index.
    pub number: u32,
    pub profile: LevelProfile,
    pub platforms: Vec<Platform>,
    pub hostiles: Vec<Hostile>,
    pub pickups: Vec<Pickup>,
    pub springs: Vec<Spring>,
    pub powerups: Vec<PowerUpProp>,
    pub goal: Goal,
    pub decorations: Vec<Decoration>,
}

impl Level {
    /// A level with nothing but a floor spanning the world and the goal.
    pub fn empty(number: u32, profile: LevelProfile, config: &SimConfig) -> Self {
        let w = config.world.world_width;
        let h = config.world.world_height();
        let thickness = config.generation.platform_thickness;
        Self {
            number,
            profile,
            platforms: vec![Platform::fixed(0.0, h - thickness, w, thickness)],
            hostiles: Vec::new(),
            pickups: Vec::new(),
            springs: Vec::new(),
            powerups: Vec::new(),
            goal: Goal::new(w - GOAL_INSET, h - GOAL_LIFT),
            decorations: Vec::new(),
        }
    }

    /// Number of colliding entities, goal included.
    pub fn entity_count(&self) -> usize {
        self.platforms.len()
            + self.hostiles.len()
            + self.pickups.len()
            + self.springs.len()
            + self.powerups.len()
            + 1
    }
}

/// Vertical offset of segment `i` above the world floor.
pub fn segment_height(i: u32, difficulty: f32, config: &SimConfig) -> f32 {
    let g = &config.generation;
    let wave = (i as f32 * g.angular_step).sin() * g.amplitude_scale * difficulty;
    (g.base_height + wave).max(g.min_height)
}

/// Generate the full entity set for a level.
///
/// All randomness comes from `rng`, so a seeded generator reproduces the
/// same level exactly.
pub fn generate_level<R: Rng + ?Sized>(
    number: u32,
    profile: &LevelProfile,
    config: &SimConfig,
    rng: &mut R,
) -> Level {
    let g = &config.generation;
    let physics = &config.physics;
    let w = config.world.world_width;
    let h = config.world.world_height();

    let mut level = Level {
        number,
        profile: profile.clone(),
        platforms: Vec::with_capacity(g.segments as usize * 2 + 2),
        hostiles: Vec::new(),
        pickups: Vec::new(),
        springs: Vec::new(),
        powerups: Vec::new(),
        goal: Goal::new(w - GOAL_INSET, h - GOAL_LIFT),
        decorations: Vec::new(),
    };

    // Start platform at the world origin
    level.platforms.push(Platform::fixed(
        0.0,
        h - g.platform_thickness,
        g.edge_platform_width,
        g.platform_thickness,
    ));

    for i in 0..g.segments {
        let x = g.first_segment_x + i as f32 * g.stride;
        let y = h - segment_height(i, profile.difficulty, config);
        let width = g.min_width + rng.random::<f32>() * (g.max_width - g.min_width);
        let bounds = Aabb::new(x, y, width, g.platform_thickness);

        if rng.random::<f32>() < g.moving_chance {
            level.platforms.push(Platform::oscillating(
                bounds,
                Axis::Vertical,
                g.oscillation_amplitude,
                g.phase_step,
            ));
        } else {
            level.platforms.push(Platform {
                bounds,
                motion: PlatformMotion::Static,
            });
        }

        // Helper platform between segments to ease jump chains
        if i + 2 < g.segments && rng.random::<f32>() < g.helper_chance {
            let mid_x = x + width / 2.0 + (rng.random::<f32>() - 0.5) * HELPER_JITTER;
            let mid_y = y + HELPER_DROP + rng.random::<f32>() * HELPER_DROP_SPAN;
            level.platforms.push(Platform::fixed(
                mid_x,
                mid_y,
                g.helper_width,
                g.helper_thickness,
            ));
        }

        let cx = x + width / 2.0;

        if rng.random::<f32>() < profile.enemy_density {
            level.hostiles.push(Hostile::new(
                cx,
                y - HOSTILE_LIFT,
                physics.hostile_speed,
                physics.hostile_size,
            ));
        }

        if rng.random::<f32>() < profile.collectible_density {
            level.pickups.push(Pickup::new(cx, y - PICKUP_LIFT));
        }

        if rng.random::<f32>() < g.spring_chance {
            level.springs.push(Spring::new(cx, y - SPRING_LIFT));
        }

        if rng.random::<f32>() < g.powerup_chance {
            level
                .powerups
                .push(PowerUpProp::new(cx, y - POWERUP_LIFT, PowerUpKind::Mushroom));
        }
    }

    // End platform near the right edge
    level.platforms.push(Platform::fixed(
        w - g.edge_platform_width,
        h - g.platform_thickness,
        g.edge_platform_width,
        g.platform_thickness,
    ));

    level.decorations = generate_decorations(&config.world, rng);

    tracing::info!(
        level = number,
        theme = %profile.theme,
        platforms = level.platforms.len(),
        hostiles = level.hostiles.len(),
        pickups = level.pickups.len(),
        springs = level.springs.len(),
        powerups = level.powerups.len(),
        "Generated level"
    );

    level
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::default_levels;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn gen_level(seed: u64, number: u32) -> Level {
        let config = SimConfig::default();
        let profile = &config.levels[number as usize - 1];
        let mut rng = StdRng::seed_from_u64(seed);
        generate_level(number, profile, &config, &mut rng)
    }

    #[test]
    fn same_seed_same_level() {
        let a = gen_level(42, 1);
        let b = gen_level(42, 1);
        assert_eq!(a, b, "Same seed must produce identical entity sets");
    }

    #[test]
    fn different_seeds_differ() {
        let a = gen_level(42, 3);
        let b = gen_level(43, 3);
        assert_ne!(a.platforms, b.platforms);
    }

    #[test]
    fn start_and_end_platforms_present() {
        let config = SimConfig::default();
        let level = gen_level(7, 1);
        let first = &level.platforms[0];
        assert_eq!(first.bounds.x, 0.0);
        assert!(!first.is_moving());
        let last = level.platforms.last().unwrap();
        assert_eq!(
            last.bounds.right(),
            config.world.world_width,
            "end platform must reach the world edge"
        );
        assert!(level.goal.bounds.x > last.bounds.x);
        assert!(level.goal.bounds.right() <= config.world.world_width);
    }

    #[test]
    fn platform_count_within_budget() {
        let config = SimConfig::default();
        let level = gen_level(9, 2);
        let segments = config.generation.segments as usize;
        // start + segments + end, plus at most one helper per segment
        assert!(level.platforms.len() >= segments + 2);
        assert!(level.platforms.len() <= segments * 2 + 2);
    }

    #[test]
    fn segment_heights_respect_minimum() {
        let config = SimConfig::default();
        for level in default_levels() {
            for i in 0..config.generation.segments {
                let height = segment_height(i, level.difficulty, &config);
                assert!(height >= config.generation.min_height);
            }
        }
    }

    #[test]
    fn moving_chance_one_makes_every_segment_move() {
        let mut config = SimConfig::default();
        config.generation.moving_chance = 1.0;
        config.generation.helper_chance = 0.0;
        let mut rng = StdRng::seed_from_u64(5);
        let level = generate_level(1, &config.levels[0].clone(), &config, &mut rng);
        let moving = level.platforms.iter().filter(|p| p.is_moving()).count();
        assert_eq!(moving, config.generation.segments as usize);
    }

    #[test]
    fn zero_densities_spawn_nothing() {
        let mut config = SimConfig::default();
        config.generation.spring_chance = 0.0;
        config.generation.powerup_chance = 0.0;
        let profile = LevelProfile {
            enemy_density: 0.0,
            collectible_density: 0.0,
            ..LevelProfile::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        let level = generate_level(1, &profile, &config, &mut rng);
        assert!(level.hostiles.is_empty());
        assert!(level.pickups.is_empty());
        assert!(level.springs.is_empty());
        assert!(level.powerups.is_empty());
    }

    #[test]
    fn full_densities_spawn_on_every_segment() {
        let config = SimConfig::default();
        let profile = LevelProfile {
            enemy_density: 1.0,
            collectible_density: 1.0,
            ..LevelProfile::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        let level = generate_level(1, &profile, &config, &mut rng);
        assert_eq!(level.hostiles.len(), config.generation.segments as usize);
        assert_eq!(level.pickups.len(), config.generation.segments as usize);
    }

    #[test]
    fn harder_levels_spread_wider() {
        let config = SimConfig::default();
        let spread = |difficulty: f32| {
            let heights: Vec<f32> = (0..config.generation.segments)
                .map(|i| segment_height(i, difficulty, &config))
                .collect();
            let max = heights.iter().cloned().fold(f32::MIN, f32::max);
            let min = heights.iter().cloned().fold(f32::MAX, f32::min);
            max - min
        };
        assert!(spread(3.0) > spread(1.0));
    }

    #[test]
    fn empty_level_has_floor_and_goal() {
        let config = SimConfig::default();
        let level = Level::empty(1, LevelProfile::default(), &config);
        assert_eq!(level.platforms.len(), 1);
        assert_eq!(level.entity_count(), 2);
        assert_eq!(level.platforms[0].bounds.width, config.world.world_width);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn generated_entities_are_finite(seed in 0u64..500, number in 1u32..=5) {
                let level = gen_level(seed, number);
                for p in &level.platforms {
                    prop_assert!(p.bounds.is_finite());
                    prop_assert!(p.bounds.width > 0.0);
                }
                for h in &level.hostiles {
                    prop_assert!(h.is_finite());
                }
                prop_assert!(level.goal.bounds.is_finite());
            }

            #[test]
            fn generation_is_reproducible(seed in 0u64..200) {
                prop_assert_eq!(gen_level(seed, 2), gen_level(seed, 2));
            }
        }
    }
}
