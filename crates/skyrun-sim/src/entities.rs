use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use skyrun_core::geometry::Aabb;

use crate::config::{PhysicsConfig, PowerUpConfig};
use crate::powerups::{ActivePowerUp, PowerUpKind};

/// Animation phase increments per tick, render-only.
const ACTOR_ANIM_STEP: f32 = 0.3;
const PICKUP_ANIM_STEP: f32 = 0.2;
const PROP_ANIM_STEP: f32 = 0.1;

pub const PICKUP_SIZE: f32 = 30.0;
pub const SPRING_WIDTH: f32 = 20.0;
pub const SPRING_HEIGHT: f32 = 15.0;
pub const POWERUP_WIDTH: f32 = 20.0;
pub const POWERUP_HEIGHT: f32 = 25.0;
pub const GOAL_WIDTH: f32 = 20.0;
pub const GOAL_HEIGHT: f32 = 80.0;

/// Actor stats without any power-up applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorStats {
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub jump_power: f32,
}

impl ActorStats {
    pub fn from_config(physics: &PhysicsConfig) -> Self {
        Self {
            width: physics.actor_width,
            height: physics.actor_height,
            speed: physics.move_speed,
            jump_power: physics.jump_power,
        }
    }
}

/// The player-controlled entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
    pub jump_power: f32,
    /// +1 facing right, -1 facing left.
    pub facing: f32,
    pub on_ground: bool,
    pub base: ActorStats,
    pub powerup: Option<ActivePowerUp>,
    pub anim_phase: f32,
}

impl Actor {
    pub fn new(x: f32, y: f32, base: ActorStats) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            width: base.width,
            height: base.height,
            speed: base.speed,
            jump_power: base.jump_power,
            facing: 1.0,
            on_ground: false,
            base,
            powerup: None,
            anim_phase: 0.0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    pub fn is_powered(&self) -> bool {
        self.powerup.is_some()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.vx.is_finite() && self.vy.is_finite()
    }

    /// Move back to a spawn point. Horizontal velocity is kept, matching a
    /// hit that only cancels the fall.
    pub fn respawn(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.vy = 0.0;
    }

    /// Full reset for a new level: spawn point, zero velocity, no power-up.
    pub fn reset_to(&mut self, x: f32, y: f32) {
        self.remove_powerup();
        self.x = x;
        self.y = y;
        self.vx = 0.0;
        self.vy = 0.0;
        self.on_ground = false;
        self.facing = 1.0;
    }

    /// Apply a power-up, computing the new stats from the base stats so that
    /// repeated pickups never compound. Collecting while already powered
    /// restarts the countdown.
    pub fn apply_powerup(&mut self, kind: PowerUpKind, config: &PowerUpConfig) {
        let (size, speed, jump) = kind.multipliers(config);
        self.set_size(self.base.width * size, self.base.height * size);
        self.speed = self.base.speed * speed;
        self.jump_power = self.base.jump_power * jump;
        match self.powerup.as_mut() {
            Some(active) if active.kind == kind => active.refresh(config.duration_ticks),
            _ => self.powerup = Some(ActivePowerUp::new(kind, config.duration_ticks)),
        }
    }

    /// Strip any power-up and restore the base stats exactly.
    /// Returns whether a power-up was active.
    pub fn remove_powerup(&mut self) -> bool {
        let had = self.powerup.take().is_some();
        self.set_size(self.base.width, self.base.height);
        self.speed = self.base.speed;
        self.jump_power = self.base.jump_power;
        had
    }

    /// Resolve a damaging hit. A power-up absorbs the hit; returns `true`
    /// when a life must be lost instead.
    pub fn take_damage(&mut self) -> bool {
        !self.remove_powerup()
    }

    /// Count down the power-up. Returns `true` on the tick it expires.
    pub fn tick_powerup(&mut self) -> bool {
        let expired = match self.powerup.as_mut() {
            Some(active) => {
                active.tick();
                active.is_expired()
            },
            None => false,
        };
        if expired {
            self.remove_powerup();
        }
        expired
    }

    pub fn advance_animation(&mut self) {
        self.anim_phase = (self.anim_phase + ACTOR_ANIM_STEP) % TAU;
    }

    /// Resize keeping the feet where they are.
    fn set_size(&mut self, width: f32, height: f32) {
        self.y += self.height - height;
        self.width = width;
        self.height = height;
    }
}

/// Axis a moving platform oscillates along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// Sinusoidal motion. Position is recomputed from the phase every tick and
/// never integrated, so it cannot drift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillation {
    pub axis: Axis,
    pub origin: f32,
    pub amplitude: f32,
    /// Kept in `[0, TAU)`.
    pub phase: f32,
    pub phase_step: f32,
}

impl Oscillation {
    pub fn offset_at(&self, phase: f32) -> f32 {
        self.origin + phase.sin() * self.amplitude
    }

    pub fn offset(&self) -> f32 {
        self.offset_at(self.phase)
    }

    pub fn advance(&mut self) {
        self.phase = (self.phase + self.phase_step).rem_euclid(TAU);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlatformMotion {
    Static,
    Oscillating(Oscillation),
}

/// Solid platform, static or moving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub bounds: Aabb,
    pub motion: PlatformMotion,
}

impl Platform {
    pub fn fixed(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            bounds: Aabb::new(x, y, width, height),
            motion: PlatformMotion::Static,
        }
    }

    pub fn oscillating(bounds: Aabb, axis: Axis, amplitude: f32, phase_step: f32) -> Self {
        let origin = match axis {
            Axis::Vertical => bounds.y,
            Axis::Horizontal => bounds.x,
        };
        Self {
            bounds,
            motion: PlatformMotion::Oscillating(Oscillation {
                axis,
                origin,
                amplitude,
                phase: 0.0,
                phase_step,
            }),
        }
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.motion, PlatformMotion::Oscillating(_))
    }

    /// Advance the phase and place the platform at its phase position.
    pub fn update(&mut self) {
        if let PlatformMotion::Oscillating(osc) = &mut self.motion {
            osc.advance();
            let offset = osc.offset();
            match osc.axis {
                Axis::Vertical => self.bounds.y = offset,
                Axis::Horizontal => self.bounds.x = offset,
            }
        }
    }
}

/// Patrolling enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hostile {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
}

impl Hostile {
    pub fn new(x: f32, y: f32, speed: f32, size: f32) -> Self {
        Self {
            x,
            y,
            vx: -speed,
            vy: 0.0,
            size,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.size, self.size)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.vx.is_finite() && self.vy.is_finite()
    }
}

/// Collectible coin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub bounds: Aabb,
    pub anim_phase: f32,
}

impl Pickup {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            bounds: Aabb::new(x, y, PICKUP_SIZE, PICKUP_SIZE),
            anim_phase: 0.0,
        }
    }

    pub fn update(&mut self) {
        self.anim_phase = (self.anim_phase + PICKUP_ANIM_STEP) % TAU;
    }
}

/// Launch pad. Activation only drives its own animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    pub bounds: Aabb,
    pub anim_phase: f32,
    pub activation_ticks: u32,
}

impl Spring {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            bounds: Aabb::new(x, y, SPRING_WIDTH, SPRING_HEIGHT),
            anim_phase: 0.0,
            activation_ticks: 0,
        }
    }

    pub fn is_activated(&self) -> bool {
        self.activation_ticks > 0
    }

    pub fn activate(&mut self, ticks: u32) {
        self.activation_ticks = ticks;
    }

    pub fn update(&mut self) {
        self.anim_phase = (self.anim_phase + PROP_ANIM_STEP) % TAU;
        self.activation_ticks = self.activation_ticks.saturating_sub(1);
    }
}

/// Collectible power-up prop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpProp {
    pub bounds: Aabb,
    pub kind: PowerUpKind,
    pub anim_phase: f32,
}

impl PowerUpProp {
    pub fn new(x: f32, y: f32, kind: PowerUpKind) -> Self {
        Self {
            bounds: Aabb::new(x, y, POWERUP_WIDTH, POWERUP_HEIGHT),
            kind,
            anim_phase: 0.0,
        }
    }

    pub fn update(&mut self) {
        self.anim_phase = (self.anim_phase + PROP_ANIM_STEP) % TAU;
    }
}

/// End-of-level flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub bounds: Aabb,
    pub anim_phase: f32,
}

impl Goal {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            bounds: Aabb::new(x, y, GOAL_WIDTH, GOAL_HEIGHT),
            anim_phase: 0.0,
        }
    }

    pub fn update(&mut self) {
        self.anim_phase = (self.anim_phase + PROP_ANIM_STEP) % TAU;
    }
}
