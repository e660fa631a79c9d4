use serde::{Deserialize, Serialize};

use crate::config::{CameraConfig, WorldConfig};
use crate::entities::Actor;

/// Smoothed viewport offset that follows the actor. Derived state: it is
/// recomputed from the actor every tick and never feeds back into the
/// simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub x: f32,
    pub y: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub smoothing: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            target_x: 0.0,
            target_y: 0.0,
            smoothing: config.smoothing,
        }
    }

    /// Snap back to the world origin.
    pub fn reset(&mut self) {
        self.x = 0.0;
        self.y = 0.0;
        self.target_x = 0.0;
        self.target_y = 0.0;
    }

    /// Retarget on the actor and low-pass toward the target.
    pub fn update(&mut self, actor: &Actor, world: &WorldConfig) {
        let max_x = (world.world_width - world.viewport_width).max(0.0);
        let max_y = (world.world_height() - world.viewport_height).max(0.0);

        self.target_x = clamp_finite(actor.x - world.viewport_width / 2.0, max_x);
        self.target_y = clamp_finite(actor.y - world.viewport_height / 2.0, max_y);

        self.x = (self.x + (self.target_x - self.x) * self.smoothing).clamp(0.0, max_x);
        self.y = (self.y + (self.target_y - self.y) * self.smoothing).clamp(0.0, max_y);
    }
}

fn clamp_finite(v: f32, max: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, max) } else { 0.0 }
}
