use serde::{Deserialize, Serialize};

use skyrun_core::events::{GameState, HudState};
use skyrun_core::geometry::Aabb;
use skyrun_core::theme::Theme;

use crate::camera::Camera;
use crate::character::CharacterKind;
use crate::decor::{DecorKind, Decoration};
use crate::entities::{Actor, Goal, Hostile, Pickup, Platform, PowerUpProp, Spring};
use crate::level_gen::Level;
use crate::powerups::PowerUpKind;

/// Read-only view of one entity, tagged by kind so the renderer matches on
/// a closed set instead of looking callbacks up by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityView {
    Decoration {
        decor: DecorKind,
        x: f32,
        y: f32,
        scale: f32,
        anim_phase: f32,
    },
    Platform {
        bounds: Aabb,
        moving: bool,
    },
    Hostile {
        bounds: Aabb,
        vx: f32,
    },
    Pickup {
        bounds: Aabb,
        anim_phase: f32,
    },
    Spring {
        bounds: Aabb,
        activated: bool,
        anim_phase: f32,
    },
    PowerUp {
        bounds: Aabb,
        powerup: PowerUpKind,
        anim_phase: f32,
    },
    Goal {
        bounds: Aabb,
        anim_phase: f32,
    },
    Actor {
        bounds: Aabb,
        facing: f32,
        powered: bool,
        anim_phase: f32,
        character: CharacterKind,
    },
}

impl EntityView {
    /// Collision box, or `None` for background decorations.
    pub fn bounds(&self) -> Option<Aabb> {
        match self {
            EntityView::Decoration { .. } => None,
            EntityView::Platform { bounds, .. }
            | EntityView::Hostile { bounds, .. }
            | EntityView::Pickup { bounds, .. }
            | EntityView::Spring { bounds, .. }
            | EntityView::PowerUp { bounds, .. }
            | EntityView::Goal { bounds, .. }
            | EntityView::Actor { bounds, .. } => Some(*bounds),
        }
    }
}

impl From<&Decoration> for EntityView {
    fn from(d: &Decoration) -> Self {
        EntityView::Decoration {
            decor: d.kind,
            x: d.x,
            y: d.y,
            scale: d.scale,
            anim_phase: d.anim_phase,
        }
    }
}

impl From<&Platform> for EntityView {
    fn from(p: &Platform) -> Self {
        EntityView::Platform {
            bounds: p.bounds,
            moving: p.is_moving(),
        }
    }
}

impl From<&Hostile> for EntityView {
    fn from(h: &Hostile) -> Self {
        EntityView::Hostile {
            bounds: h.bounds(),
            vx: h.vx,
        }
    }
}

impl From<&Pickup> for EntityView {
    fn from(p: &Pickup) -> Self {
        EntityView::Pickup {
            bounds: p.bounds,
            anim_phase: p.anim_phase,
        }
    }
}

impl From<&Spring> for EntityView {
    fn from(s: &Spring) -> Self {
        EntityView::Spring {
            bounds: s.bounds,
            activated: s.is_activated(),
            anim_phase: s.anim_phase,
        }
    }
}

impl From<&PowerUpProp> for EntityView {
    fn from(p: &PowerUpProp) -> Self {
        EntityView::PowerUp {
            bounds: p.bounds,
            powerup: p.kind,
            anim_phase: p.anim_phase,
        }
    }
}

impl From<&Goal> for EntityView {
    fn from(g: &Goal) -> Self {
        EntityView::Goal {
            bounds: g.bounds,
            anim_phase: g.anim_phase,
        }
    }
}

/// Level palette handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub sky: String,
    pub ground: String,
    pub platform: String,
    pub decoration: String,
}

/// Everything a renderer needs for one frame, in back-to-front draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub state: GameState,
    pub camera_x: f32,
    pub camera_y: f32,
    pub theme: Theme,
    pub level_name: String,
    pub palette: Palette,
    pub character: CharacterKind,
    pub hud: HudState,
    pub entities: Vec<EntityView>,
}

impl RenderSnapshot {
    pub fn capture(
        state: GameState,
        camera: &Camera,
        level: &Level,
        actor: &Actor,
        character: CharacterKind,
        hud: HudState,
    ) -> Self {
        let profile = &level.profile;
        let mut entities = Vec::with_capacity(level.decorations.len() + level.entity_count() + 1);
        entities.extend(level.decorations.iter().map(EntityView::from));
        entities.extend(level.platforms.iter().map(EntityView::from));
        entities.extend(level.pickups.iter().map(EntityView::from));
        entities.extend(level.springs.iter().map(EntityView::from));
        entities.extend(level.powerups.iter().map(EntityView::from));
        entities.push(EntityView::from(&level.goal));
        entities.extend(level.hostiles.iter().map(EntityView::from));
        entities.push(EntityView::Actor {
            bounds: actor.bounds(),
            facing: actor.facing,
            powered: actor.is_powered(),
            anim_phase: actor.anim_phase,
            character,
        });

        Self {
            state,
            camera_x: camera.x,
            camera_y: camera.y,
            theme: profile.theme,
            level_name: profile.name.clone(),
            palette: Palette {
                sky: profile.sky_color.clone(),
                ground: profile.ground_color.clone(),
                platform: profile.platform_color.clone(),
                decoration: profile.decoration_color.clone(),
            },
            character,
            hud,
            entities,
        }
    }

    /// Encode as MessagePack for a renderer bridge.
    pub fn to_msgpack(&self) -> Result<Vec<u8>, rmp_serde::encode::Error> {
        rmp_serde::to_vec(self)
    }

    pub fn count<F: Fn(&EntityView) -> bool>(&self, pred: F) -> usize {
        self.entities.iter().filter(|e| pred(e)).count()
    }
}
