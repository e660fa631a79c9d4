use serde::{Deserialize, Serialize};

use crate::theme::Theme;

/// Top-level state of a play session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Start,
    Playing,
    Victory,
    GameOver,
    Complete,
}

impl GameState {
    /// Only `Playing` advances physics and collision dispatch.
    pub fn is_simulating(&self) -> bool {
        matches!(self, GameState::Playing)
    }
}

/// Fire-and-forget audio triggers consumed by an external audio collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AudioCue {
    Jump,
    Coin,
    EnemyDefeated,
    Victory,
    GameOver,
    MusicStart { theme: Theme },
    MusicStop,
}

/// Values the HUD displays. Pushed to the HUD collaborator at most once per
/// tick, and only when something changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudState {
    pub score: u64,
    pub lives: i32,
    pub level: u32,
    pub powered_up: bool,
}

/// Where a life was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageSource {
    Hostile,
    Fall,
}

/// Events emitted by the session during a tick or a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    StateChanged { from: GameState, to: GameState },
    LevelStarted { level: u32, theme: Theme },
    EnemyDefeated { x: f32, y: f32 },
    PickupCollected { x: f32, y: f32 },
    SpringLaunched { x: f32, y: f32 },
    PowerUpGained,
    PowerUpLost,
    PowerUpExpired,
    LifeLost { source: DamageSource, lives: i32 },
    ParticleBurst { x: f32, y: f32, color: String },
}
