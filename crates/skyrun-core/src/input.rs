use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Logical keys the simulation understands. The host maps hardware events
/// onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalKey {
    Left,
    Right,
    Jump,
    Continue,
    Restart,
    ToggleMusic,
}

impl LogicalKey {
    pub const ALL: [LogicalKey; 6] = [
        LogicalKey::Left,
        LogicalKey::Right,
        LogicalKey::Jump,
        LogicalKey::Continue,
        LogicalKey::Restart,
        LogicalKey::ToggleMusic,
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
struct KeyState {
    held: bool,
    /// Set on a released -> pressed transition, cleared by `consume`.
    latched: bool,
}

/// Key state latched between ticks.
///
/// Movement keys are read level-triggered through [`InputState::held`].
/// Command keys (continue, restart, music toggle) are read edge-triggered
/// through [`InputState::consume`]: one physical press yields exactly one
/// `true`, no matter how many ticks the key stays down.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputState {
    keys: HashMap<LogicalKey, KeyState>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the host's current pressed state for `key`.
    pub fn set(&mut self, key: LogicalKey, pressed: bool) {
        let state = self.keys.entry(key).or_default();
        if pressed && !state.held {
            state.latched = true;
        }
        state.held = pressed;
    }

    pub fn press(&mut self, key: LogicalKey) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: LogicalKey) {
        self.set(key, false);
    }

    /// Replace the whole key map in one call, as a host refreshing its
    /// snapshot once per frame would.
    pub fn apply_frame(&mut self, pressed: &HashMap<LogicalKey, bool>) {
        for key in LogicalKey::ALL {
            self.set(key, pressed.get(&key).copied().unwrap_or(false));
        }
    }

    pub fn held(&self, key: LogicalKey) -> bool {
        self.keys.get(&key).is_some_and(|s| s.held)
    }

    /// Take a pending press. Returns `true` at most once per press.
    pub fn consume(&mut self, key: LogicalKey) -> bool {
        match self.keys.get_mut(&key) {
            Some(state) if state.latched => {
                state.latched = false;
                true
            },
            _ => false,
        }
    }

    /// Drop pending presses without touching held state.
    pub fn clear_latches(&mut self) {
        for state in self.keys.values_mut() {
            state.latched = false;
        }
    }

    /// Horizontal intent: -1, 0 or +1. Left wins when both are held.
    pub fn horizontal(&self) -> f32 {
        if self.held(LogicalKey::Left) {
            -1.0
        } else if self.held(LogicalKey::Right) {
            1.0
        } else {
            0.0
        }
    }
}
