use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use skyrun_core::error::SimError;
use skyrun_core::time::NOMINAL_TICK_RATE_HZ;

use crate::character::CharacterKind;
use crate::levels::{LevelProfile, default_levels};

/// World and viewport dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Horizontal extent of a level. The world is exactly one viewport tall.
    pub world_width: f32,
    pub start_x: f32,
    /// Actor spawn height measured up from the bottom of the world.
    pub start_height: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1200.0,
            viewport_height: 800.0,
            world_width: 6000.0,
            start_x: 50.0,
            start_height: 100.0,
        }
    }
}

impl WorldConfig {
    pub fn world_height(&self) -> f32 {
        self.viewport_height
    }

    pub fn start_y(&self) -> f32 {
        self.world_height() - self.start_height
    }
}

/// Per-tick kinematic constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Added to actor vertical velocity every tick.
    pub gravity: f32,
    /// Horizontal velocity multiplier applied while no direction is held.
    pub friction: f32,
    pub move_speed: f32,
    pub jump_power: f32,
    pub actor_width: f32,
    pub actor_height: f32,
    pub hostile_gravity: f32,
    pub hostile_speed: f32,
    pub hostile_size: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.6,
            friction: 0.7,
            move_speed: 8.0,
            jump_power: 22.0,
            actor_width: 45.0,
            actor_height: 45.0,
            hostile_gravity: 0.8,
            hostile_speed: 1.5,
            hostile_size: 38.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Fraction of the remaining distance covered each tick, in (0, 1].
    pub smoothing: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { smoothing: 0.1 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub starting_lives: i32,
    pub stomp_points: u64,
    pub pickup_points: u64,
    pub powerup_points: u64,
    pub goal_points: u64,
    /// Upward bounce after a stomp, as a fraction of jump power.
    pub stomp_bounce: f32,
    /// Upward launch from a spring, as a multiple of jump power.
    pub spring_boost: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            starting_lives: 3,
            stomp_points: 200,
            pickup_points: 100,
            powerup_points: 500,
            goal_points: 1000,
            stomp_bounce: 0.7,
            spring_boost: 1.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    pub size_multiplier: f32,
    pub speed_multiplier: f32,
    pub jump_multiplier: f32,
    pub duration_ticks: u32,
    pub bonus_lives: i32,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            size_multiplier: 1.5,
            speed_multiplier: 1.2,
            jump_multiplier: 1.1,
            // 30 s at the nominal 60 Hz.
            duration_ticks: 1800,
            bonus_lives: 1,
        }
    }
}

/// Procedural level layout parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub segments: u32,
    pub stride: f32,
    pub first_segment_x: f32,
    pub platform_thickness: f32,
    pub base_height: f32,
    pub min_height: f32,
    pub amplitude_scale: f32,
    pub angular_step: f32,
    pub min_width: f32,
    pub max_width: f32,
    pub edge_platform_width: f32,
    pub moving_chance: f32,
    pub oscillation_amplitude: f32,
    pub phase_step: f32,
    pub helper_chance: f32,
    pub helper_width: f32,
    pub helper_thickness: f32,
    pub spring_chance: f32,
    pub powerup_chance: f32,
    /// Ticks a spring stays in its activated animation.
    pub spring_activation_ticks: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            segments: 60,
            stride: 100.0,
            first_segment_x: 250.0,
            platform_thickness: 30.0,
            base_height: 60.0,
            min_height: 80.0,
            amplitude_scale: 80.0,
            angular_step: 0.2,
            min_width: 100.0,
            max_width: 200.0,
            edge_platform_width: 300.0,
            moving_chance: 0.3,
            oscillation_amplitude: 100.0,
            phase_step: 0.02,
            helper_chance: 0.3,
            helper_width: 90.0,
            helper_thickness: 22.0,
            spring_chance: 0.1,
            powerup_chance: 0.05,
            spring_activation_ticks: 6,
        }
    }
}

/// Top-level engine configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub world: WorldConfig,
    pub physics: PhysicsConfig,
    pub camera: CameraConfig,
    pub scoring: ScoringConfig,
    pub powerup: PowerUpConfig,
    pub generation: GenerationConfig,
    pub levels: Vec<LevelProfile>,
    pub character: CharacterKind,
    /// Fixed RNG seed. `None` seeds from the OS.
    pub seed: Option<u64>,
    pub tick_rate_hz: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            physics: PhysicsConfig::default(),
            camera: CameraConfig::default(),
            scoring: ScoringConfig::default(),
            powerup: PowerUpConfig::default(),
            generation: GenerationConfig::default(),
            levels: default_levels(),
            character: CharacterKind::default(),
            seed: None,
            tick_rate_hz: NOMINAL_TICK_RATE_HZ,
        }
    }
}

impl SimConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path =
            std::env::var("SKYRUN_CONFIG").unwrap_or_else(|_| "config/skyrun.toml".to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Self {
        let config = match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse {path}: {e}, using defaults");
                SimConfig::default()
            }),
            Err(_) => {
                tracing::debug!("No config at {path}, using defaults");
                SimConfig::default()
            },
        };
        config.sanitized()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SimError> {
        toml::from_str::<SimConfig>(content).map_err(|e| SimError::InvalidConfig(e.to_string()))
    }

    /// Number of playable levels.
    pub fn max_level(&self) -> u32 {
        self.levels.len().max(1) as u32
    }

    /// Describe every out-of-range value.
    pub fn validate(&self) -> Vec<String> {
        let mut check = Checker::report_only();
        self.clone().check(&mut check);
        check.problems
    }

    /// Replace every out-of-range value with a usable one, logging each fix.
    /// Non-finite floats fall back to their section default.
    pub fn sanitized(mut self) -> Self {
        let mut check = Checker::fixing();
        self.check(&mut check);
        for problem in &check.problems {
            tracing::warn!("Config: {problem}, clamping");
        }
        self
    }

    fn check(&mut self, c: &mut Checker) {
        if self.levels.is_empty() {
            c.problems.push("levels table is empty".to_string());
            if c.fix {
                self.levels = default_levels();
            }
        }

        let d = WorldConfig::default();
        let w = &mut self.world;
        c.reset("world.viewport_width", &mut w.viewport_width, d.viewport_width, 1.0..=MAX_EXTENT);
        c.reset(
            "world.viewport_height",
            &mut w.viewport_height,
            d.viewport_height,
            1.0..=MAX_EXTENT,
        );
        c.reset("world.world_width", &mut w.world_width, d.world_width, 1.0..=MAX_EXTENT);
        if w.world_width < w.viewport_width {
            c.problems.push(format!(
                "world_width {} is narrower than viewport_width {}",
                w.world_width, w.viewport_width
            ));
            if c.fix {
                w.world_width = w.viewport_width;
            }
        }
        c.reset("world.start_x", &mut w.start_x, d.start_x, 0.0..=MAX_EXTENT);
        c.reset("world.start_height", &mut w.start_height, d.start_height, 0.0..=MAX_EXTENT);

        let smoothing = &mut self.camera.smoothing;
        if !(*smoothing > 0.0 && *smoothing <= 1.0) {
            c.problems.push(format!("camera.smoothing {smoothing} outside (0, 1]"));
            if c.fix {
                *smoothing = CameraConfig::default().smoothing;
            }
        }

        let d = PhysicsConfig::default();
        let p = &mut self.physics;
        c.reset("physics.gravity", &mut p.gravity, d.gravity, 0.0..=MAX_SPEED);
        c.clamp("physics.friction", &mut p.friction, d.friction, 0.0..=1.0);
        c.reset("physics.move_speed", &mut p.move_speed, d.move_speed, 0.0..=MAX_SPEED);
        c.reset("physics.jump_power", &mut p.jump_power, d.jump_power, 0.0..=MAX_SPEED);
        c.reset("physics.actor_width", &mut p.actor_width, d.actor_width, 1.0..=MAX_SIZE);
        c.reset("physics.actor_height", &mut p.actor_height, d.actor_height, 1.0..=MAX_SIZE);
        c.reset(
            "physics.hostile_gravity",
            &mut p.hostile_gravity,
            d.hostile_gravity,
            0.0..=MAX_SPEED,
        );
        c.reset("physics.hostile_speed", &mut p.hostile_speed, d.hostile_speed, 0.0..=MAX_SPEED);
        c.reset("physics.hostile_size", &mut p.hostile_size, d.hostile_size, 1.0..=MAX_SIZE);

        let d = ScoringConfig::default();
        let s = &mut self.scoring;
        c.reset("scoring.stomp_bounce", &mut s.stomp_bounce, d.stomp_bounce, 0.0..=MAX_FACTOR);
        c.reset("scoring.spring_boost", &mut s.spring_boost, d.spring_boost, 0.0..=MAX_FACTOR);
        if s.starting_lives <= 0 {
            c.problems.push("scoring.starting_lives must be positive".to_string());
            if c.fix {
                s.starting_lives = d.starting_lives;
            }
        }

        let d = PowerUpConfig::default();
        let m = &mut self.powerup;
        c.reset(
            "powerup.size_multiplier",
            &mut m.size_multiplier,
            d.size_multiplier,
            MIN_FACTOR..=MAX_FACTOR,
        );
        c.reset(
            "powerup.speed_multiplier",
            &mut m.speed_multiplier,
            d.speed_multiplier,
            MIN_FACTOR..=MAX_FACTOR,
        );
        c.reset(
            "powerup.jump_multiplier",
            &mut m.jump_multiplier,
            d.jump_multiplier,
            MIN_FACTOR..=MAX_FACTOR,
        );

        let d = GenerationConfig::default();
        let g = &mut self.generation;
        c.reset("generation.stride", &mut g.stride, d.stride, 1.0..=MAX_SIZE);
        c.reset(
            "generation.first_segment_x",
            &mut g.first_segment_x,
            d.first_segment_x,
            0.0..=MAX_EXTENT,
        );
        c.reset(
            "generation.platform_thickness",
            &mut g.platform_thickness,
            d.platform_thickness,
            1.0..=MAX_SIZE,
        );
        c.reset("generation.base_height", &mut g.base_height, d.base_height, 0.0..=MAX_EXTENT);
        c.reset("generation.min_height", &mut g.min_height, d.min_height, 0.0..=MAX_EXTENT);
        c.reset(
            "generation.amplitude_scale",
            &mut g.amplitude_scale,
            d.amplitude_scale,
            0.0..=MAX_EXTENT,
        );
        c.reset("generation.angular_step", &mut g.angular_step, d.angular_step, 0.0..=MAX_FACTOR);
        c.reset("generation.min_width", &mut g.min_width, d.min_width, 1.0..=MAX_EXTENT);
        c.reset("generation.max_width", &mut g.max_width, d.max_width, 1.0..=MAX_EXTENT);
        if g.min_width > g.max_width {
            c.problems.push("generation.min_width exceeds max_width".to_string());
            if c.fix {
                std::mem::swap(&mut g.min_width, &mut g.max_width);
            }
        }
        c.reset(
            "generation.edge_platform_width",
            &mut g.edge_platform_width,
            d.edge_platform_width,
            1.0..=MAX_EXTENT,
        );
        c.reset(
            "generation.oscillation_amplitude",
            &mut g.oscillation_amplitude,
            d.oscillation_amplitude,
            0.0..=MAX_EXTENT,
        );
        c.reset("generation.phase_step", &mut g.phase_step, d.phase_step, 0.0..=1.0);
        c.reset("generation.helper_width", &mut g.helper_width, d.helper_width, 1.0..=MAX_SIZE);
        c.reset(
            "generation.helper_thickness",
            &mut g.helper_thickness,
            d.helper_thickness,
            1.0..=MAX_SIZE,
        );
        c.clamp("generation.moving_chance", &mut g.moving_chance, d.moving_chance, 0.0..=1.0);
        c.clamp("generation.helper_chance", &mut g.helper_chance, d.helper_chance, 0.0..=1.0);
        c.clamp("generation.spring_chance", &mut g.spring_chance, d.spring_chance, 0.0..=1.0);
        c.clamp("generation.powerup_chance", &mut g.powerup_chance, d.powerup_chance, 0.0..=1.0);

        let d = LevelProfile::default();
        for (i, level) in self.levels.iter_mut().enumerate() {
            let n = i + 1;
            c.reset(
                &format!("level {n} difficulty"),
                &mut level.difficulty,
                d.difficulty,
                0.0..=MAX_FACTOR,
            );
            c.clamp(
                &format!("level {n} enemy_density"),
                &mut level.enemy_density,
                d.enemy_density,
                0.0..=1.0,
            );
            c.clamp(
                &format!("level {n} collectible_density"),
                &mut level.collectible_density,
                d.collectible_density,
                0.0..=1.0,
            );
        }

        c.reset("tick_rate_hz", &mut self.tick_rate_hz, NOMINAL_TICK_RATE_HZ, 1.0..=1000.0);
    }
}

/// Upper bound on world-space distances.
const MAX_EXTENT: f32 = 100_000.0;
/// Upper bound on entity and platform sizes.
const MAX_SIZE: f32 = 10_000.0;
/// Upper bound on per-tick speeds and accelerations.
const MAX_SPEED: f32 = 1_000.0;
const MIN_FACTOR: f32 = 0.1;
const MAX_FACTOR: f32 = 10.0;

/// Collects range problems and, when fixing, repairs them in place.
/// `RangeInclusive::contains` is false for NaN, so non-finite values are
/// always reported.
struct Checker {
    fix: bool,
    problems: Vec<String>,
}

impl Checker {
    fn report_only() -> Self {
        Self {
            fix: false,
            problems: Vec::new(),
        }
    }

    fn fixing() -> Self {
        Self {
            fix: true,
            problems: Vec::new(),
        }
    }

    /// Out-of-range values fall back to `default`.
    fn reset(&mut self, name: &str, value: &mut f32, default: f32, range: RangeInclusive<f32>) {
        if self.flag(name, *value, &range) {
            *value = default;
        }
    }

    /// Finite out-of-range values are clamped; non-finite ones fall back to `default`.
    fn clamp(&mut self, name: &str, value: &mut f32, default: f32, range: RangeInclusive<f32>) {
        if self.flag(name, *value, &range) {
            *value = if value.is_finite() {
                value.clamp(*range.start(), *range.end())
            } else {
                default
            };
        }
    }

    /// Records a problem and returns whether the caller should repair it.
    fn flag(&mut self, name: &str, value: f32, range: &RangeInclusive<f32>) -> bool {
        if range.contains(&value) {
            return false;
        }
        self.problems.push(format!(
            "{name} {value} outside [{}, {}]",
            range.start(),
            range.end()
        ));
        self.fix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_empty(), "{:?}", config.validate());
        assert_eq!(config.max_level(), 5);
        assert_eq!(config.world.world_height(), config.world.viewport_height);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = SimConfig::from_toml_str(
            r#"
            seed = 7

            [physics]
            gravity = 1.0
            "#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.physics.gravity, 1.0);
        assert_eq!(config.physics.jump_power, 22.0);
        assert_eq!(config.levels.len(), 5);
    }

    #[test]
    fn levels_table_parses() {
        let config = SimConfig::from_toml_str(
            r#"
            [[levels]]
            name = "Test Grounds"
            theme = "ice"
            difficulty = 2.0
            enemy_density = 0.5
            collectible_density = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(config.max_level(), 1);
        assert_eq!(config.levels[0].name, "Test Grounds");
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let shipped =
            SimConfig::from_toml_str(include_str!("../../../config/skyrun.toml")).unwrap();
        let defaults = SimConfig::default();
        assert!(shipped.validate().is_empty(), "{:?}", shipped.validate());
        assert_eq!(shipped.levels, defaults.levels);
        assert_eq!(shipped.physics.jump_power, defaults.physics.jump_power);
        assert_eq!(
            shipped.generation.segments,
            defaults.generation.segments
        );
        assert_eq!(shipped.powerup.duration_ticks, defaults.powerup.duration_ticks);
        assert_eq!(shipped.seed, None);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = SimConfig::load_from("/nonexistent/skyrun.toml");
        assert_eq!(config.world.world_width, 6000.0);
    }

    #[test]
    fn garbage_toml_is_an_error() {
        let err = SimConfig::from_toml_str("this is = = not toml").unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn sanitize_clamps_bad_values() {
        let mut config = SimConfig::default();
        config.levels.clear();
        config.camera.smoothing = 0.0;
        config.generation.spring_chance = 4.0;
        config.world.world_width = 10.0;
        config.scoring.starting_lives = 0;
        assert!(!config.validate().is_empty());

        let config = config.sanitized();
        assert!(config.validate().is_empty(), "{:?}", config.validate());
        assert_eq!(config.levels.len(), 5);
        assert_eq!(config.generation.spring_chance, 1.0);
        assert_eq!(config.world.world_width, config.world.viewport_width);
        assert_eq!(config.scoring.starting_lives, 3);
    }

    #[test]
    fn nan_knobs_fall_back_to_defaults() {
        let config = SimConfig::from_toml_str(
            r#"
            tick_rate_hz = inf

            [physics]
            friction = nan
            gravity = nan

            [generation]
            spring_chance = nan
            stride = -inf
            "#,
        )
        .unwrap();
        let problems = config.validate();
        assert_eq!(problems.len(), 5, "{problems:?}");
        assert!(problems.iter().any(|p| p.starts_with("physics.friction NaN")));

        let config = config.sanitized();
        assert!(config.validate().is_empty(), "{:?}", config.validate());
        let defaults = SimConfig::default();
        assert_eq!(config.physics.friction, defaults.physics.friction);
        assert_eq!(config.physics.gravity, defaults.physics.gravity);
        assert_eq!(config.generation.spring_chance, defaults.generation.spring_chance);
        assert_eq!(config.generation.stride, defaults.generation.stride);
        assert_eq!(config.tick_rate_hz, defaults.tick_rate_hz);
    }

    #[test]
    fn nonsense_sizes_reset_rather_than_clamp() {
        let mut config = SimConfig::default();
        config.physics.actor_width = -5.0;
        config.powerup.size_multiplier = 0.0;
        config.levels[2].difficulty = f32::NAN;
        config.levels[2].enemy_density = f32::NAN;

        let config = config.sanitized();
        assert!(config.validate().is_empty(), "{:?}", config.validate());
        assert_eq!(config.physics.actor_width, 45.0);
        assert_eq!(config.powerup.size_multiplier, 1.5);
        assert!(config.levels[2].difficulty.is_finite());
        assert!((0.0..=1.0).contains(&config.levels[2].enemy_density));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_float() -> impl Strategy<Value = f32> {
            prop_oneof![
                Just(f32::NAN),
                Just(f32::INFINITY),
                Just(f32::NEG_INFINITY),
                -1.0e6f32..1.0e6,
            ]
        }

        proptest! {
            #[test]
            fn sanitized_config_always_validates(
                gravity in any_float(),
                friction in any_float(),
                smoothing in any_float(),
                world_width in any_float(),
                min_width in any_float(),
                max_width in any_float(),
                chance in any_float(),
                tick_rate in any_float(),
            ) {
                let mut config = SimConfig::default();
                config.physics.gravity = gravity;
                config.physics.friction = friction;
                config.camera.smoothing = smoothing;
                config.world.world_width = world_width;
                config.generation.min_width = min_width;
                config.generation.max_width = max_width;
                config.generation.moving_chance = chance;
                config.tick_rate_hz = tick_rate;
                let config = config.sanitized();
                prop_assert!(config.validate().is_empty(), "{:?}", config.validate());
            }
        }
    }
}
