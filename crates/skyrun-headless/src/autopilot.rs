use std::collections::HashMap;

use skyrun_core::events::GameState;
use skyrun_core::input::LogicalKey;

/// Ticks without forward progress before the autopilot jumps.
const STALL_TICKS: u32 = 8;
/// How long a scheduled jump holds the key.
const JUMP_HOLD_TICKS: u64 = 6;
/// No scheduled jumps this close to the goal; a hop can clear the flag.
const GOAL_APPROACH: f32 = 300.0;

/// What the autopilot sees of the session before each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub state: GameState,
    pub tick: u64,
    pub x: f32,
    pub on_ground: bool,
    pub goal_x: f32,
}

/// Scripted input policy: run toward the goal, hop on a schedule or when
/// stuck, press through the menus.
#[derive(Debug, Clone)]
pub struct Autopilot {
    jump_every: u64,
    restart_on_game_over: bool,
    last_distance: f32,
    stalled: u32,
    command_down: bool,
}

impl Autopilot {
    pub fn new(jump_every: u64, restart_on_game_over: bool) -> Self {
        Self {
            jump_every: jump_every.max(1),
            restart_on_game_over,
            last_distance: f32::INFINITY,
            stalled: 0,
            command_down: false,
        }
    }

    /// Key map for the next tick.
    pub fn plan(&mut self, obs: Observation) -> HashMap<LogicalKey, bool> {
        let mut keys = HashMap::new();
        match obs.state {
            GameState::Playing => {
                self.command_down = false;
                let distance = (obs.goal_x - obs.x).abs();
                if distance < self.last_distance {
                    self.stalled = 0;
                } else {
                    self.stalled = self.stalled.saturating_add(1);
                }
                self.last_distance = distance;

                let scheduled =
                    distance > GOAL_APPROACH && obs.tick % self.jump_every < JUMP_HOLD_TICKS;
                let stuck = self.stalled >= STALL_TICKS && obs.on_ground;
                let key = if obs.x <= obs.goal_x {
                    LogicalKey::Right
                } else {
                    LogicalKey::Left
                };
                keys.insert(key, true);
                keys.insert(LogicalKey::Jump, scheduled || stuck);
            },
            GameState::Victory => self.pulse(&mut keys, LogicalKey::Continue),
            GameState::GameOver if self.restart_on_game_over => {
                self.pulse(&mut keys, LogicalKey::Restart);
            },
            GameState::Start | GameState::GameOver | GameState::Complete => {
                self.command_down = false;
            },
        }
        keys
    }

    /// Alternate press and release so each press registers once.
    fn pulse(&mut self, keys: &mut HashMap<LogicalKey, bool>, key: LogicalKey) {
        self.command_down = !self.command_down;
        keys.insert(key, self.command_down);
        self.last_distance = f32::INFINITY;
        self.stalled = 0;
    }
}
