use serde::{Deserialize, Serialize};

use skyrun_core::powerup;

use crate::config::PowerUpConfig;

/// Power-up types that can be collected in a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Grows the actor, speeds it up, and absorbs one hit.
    Mushroom,
}

impl powerup::PowerUpKind for PowerUpKind {
    fn is_timed(&self) -> bool {
        match self {
            PowerUpKind::Mushroom => true,
        }
    }
}

impl PowerUpKind {
    /// Multipliers (size, speed, jump) applied to the actor's base stats.
    pub fn multipliers(&self, config: &PowerUpConfig) -> (f32, f32, f32) {
        match self {
            PowerUpKind::Mushroom => (
                config.size_multiplier,
                config.speed_multiplier,
                config.jump_multiplier,
            ),
        }
    }
}

/// Active power-up effect on the actor.
pub type ActivePowerUp = powerup::ActivePowerUp<PowerUpKind>;
