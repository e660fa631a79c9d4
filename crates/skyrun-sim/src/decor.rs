use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::WorldConfig;

/// World width the base decoration counts are tuned for.
const REFERENCE_WIDTH: f32 = 6000.0;
const CLOUDS: u32 = 15;
const MOUNTAINS: u32 = 8;
const TREES: u32 = 20;
const BUSHES: u32 = 15;
const FLOWERS: u32 = 30;
/// Clouds leaving the right edge reappear here.
const CLOUD_WRAP_X: f32 = -100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecorKind {
    Cloud,
    Mountain,
    Tree,
    Bush,
    Flower,
}

/// Background element. Never collides with anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub kind: DecorKind,
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    /// Horizontal drift per tick (clouds only).
    pub drift: f32,
    pub anim_phase: f32,
    pub anim_step: f32,
}

impl Decoration {
    pub fn update(&mut self, world_width: f32) {
        self.anim_phase = (self.anim_phase + self.anim_step) % TAU;
        if self.drift != 0.0 {
            self.x += self.drift;
            if self.x > world_width {
                self.x = CLOUD_WRAP_X;
            }
        }
    }
}

fn scaled(count: u32, world_width: f32) -> u32 {
    ((count as f32) * world_width / REFERENCE_WIDTH).round().max(1.0) as u32
}

/// Scatter background decorations across the world.
pub fn generate_decorations<R: Rng + ?Sized>(world: &WorldConfig, rng: &mut R) -> Vec<Decoration> {
    let w = world.world_width;
    let h = world.world_height();
    let mut out = Vec::new();

    for _ in 0..scaled(CLOUDS, w) {
        out.push(Decoration {
            kind: DecorKind::Cloud,
            x: rng.random::<f32>() * w,
            y: rng.random::<f32>() * (h * 0.4),
            scale: rng.random::<f32>() * 0.5 + 0.5,
            drift: 0.2 + rng.random::<f32>() * 0.3,
            anim_phase: rng.random::<f32>() * TAU,
            anim_step: 0.01,
        });
    }

    let mountains = scaled(MOUNTAINS, w);
    for i in 0..mountains {
        out.push(Decoration {
            kind: DecorKind::Mountain,
            x: i as f32 * (w / mountains as f32),
            y: h - 100.0,
            scale: rng.random::<f32>() * 0.3 + 0.7,
            drift: 0.0,
            anim_phase: 0.0,
            anim_step: 0.0,
        });
    }

    for (kind, count, scale_min, scale_span, step) in [
        (DecorKind::Tree, TREES, 0.6, 0.4, 0.02),
        (DecorKind::Bush, BUSHES, 0.4, 0.3, 0.03),
        (DecorKind::Flower, FLOWERS, 0.3, 0.2, 0.05),
    ] {
        for _ in 0..scaled(count, w) {
            out.push(Decoration {
                kind,
                x: rng.random::<f32>() * w,
                y: h - 20.0,
                scale: rng.random::<f32>() * scale_span + scale_min,
                drift: 0.0,
                anim_phase: rng.random::<f32>() * TAU,
                anim_step: step,
            });
        }
    }

    out
}
