pub mod camera;
pub mod character;
pub mod config;
pub mod decor;
pub mod dispatch;
pub mod entities;
pub mod level_gen;
pub mod levels;
pub mod physics;
pub mod powerups;
pub mod snapshot;

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;

use skyrun_core::error::SimError;
use skyrun_core::events::{AudioCue, GameEvent, GameState, HudState};
use skyrun_core::input::{InputState, LogicalKey};
use skyrun_core::services::Services;

use camera::Camera;
use character::CharacterKind;
use dispatch::{Dispatcher, Outcome, Progress};
use entities::{Actor, ActorStats};
use level_gen::{Level, generate_level};
use levels::{clamp_level, profile_for};

pub use config::SimConfig;
pub use snapshot::RenderSnapshot;

/// One play session: the state machine that owns the world, the actor, the
/// camera and the score, and advances them one fixed step per host frame.
pub struct Session {
    config: SimConfig,
    rng: StdRng,
    services: Services,
    input: InputState,
    state: GameState,
    progress: Progress,
    level: Level,
    actor: Actor,
    camera: Camera,
    character: CharacterKind,
    music_muted: bool,
    last_hud: Option<HudState>,
    ticks: u64,
}

impl Session {
    /// Create a session in `Start`. Seeds from `config.seed` when set,
    /// otherwise from the OS.
    pub fn new(config: SimConfig, services: Services) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, services, rng)
    }

    /// Create a session with an explicit random source.
    pub fn with_rng(config: SimConfig, services: Services, rng: StdRng) -> Self {
        let config = config.sanitized();
        let profile = profile_for(&config.levels, 1);
        let level = Level::empty(1, profile, &config);
        let actor = Actor::new(
            config.world.start_x,
            config.world.start_y(),
            ActorStats::from_config(&config.physics),
        );
        Self {
            rng,
            services,
            input: InputState::new(),
            state: GameState::Start,
            progress: Progress::new(&config),
            level,
            actor,
            camera: Camera::new(&config.camera),
            character: config.character,
            music_muted: false,
            last_hud: None,
            ticks: 0,
            config,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn hud(&self) -> HudState {
        self.progress.hud(self.actor.is_powered())
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn character(&self) -> CharacterKind {
        self.character
    }

    pub fn is_music_muted(&self) -> bool {
        self.music_muted
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Direct access for hosts that script scenarios.
    pub fn actor_mut(&mut self) -> &mut Actor {
        &mut self.actor
    }

    /// Direct access for hosts that script scenarios.
    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn set_key(&mut self, key: LogicalKey, pressed: bool) {
        self.input.set(key, pressed);
    }

    /// Replace the whole key map, as the host does once per frame.
    pub fn apply_input(&mut self, pressed: &HashMap<LogicalKey, bool>) {
        self.input.apply_frame(pressed);
    }

    /// Pick the playable character. Only honoured on the start screen.
    pub fn select_character(&mut self, character: CharacterKind) -> bool {
        if self.state != GameState::Start {
            tracing::debug!(?character, state = ?self.state, "Character change ignored");
            return false;
        }
        self.character = character;
        true
    }

    /// `Start -> Playing`: fresh progress, level 1, actor at the start.
    pub fn begin(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.state != GameState::Start {
            tracing::debug!(state = ?self.state, "begin ignored");
            return events;
        }
        self.progress = Progress::new(&self.config);
        self.load_level(1, &mut events);
        self.transition(GameState::Playing, &mut events);
        self.start_music();
        self.sync_hud(true);
        events
    }

    /// `Victory -> Playing` on the next level, or `Victory -> Complete`
    /// after the last one.
    pub fn continue_to_next_level(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.state != GameState::Victory {
            tracing::debug!(state = ?self.state, "continue ignored");
            return events;
        }
        if self.progress.level >= self.config.max_level() {
            self.transition(GameState::Complete, &mut events);
            self.services.play(AudioCue::MusicStop);
            self.services.play(AudioCue::Victory);
        } else {
            let next = self.progress.level + 1;
            self.load_level(next, &mut events);
            self.transition(GameState::Playing, &mut events);
            self.start_music();
        }
        self.sync_hud(false);
        events
    }

    /// `GameOver | Complete -> Start` with all session state reset.
    pub fn restart(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !matches!(self.state, GameState::GameOver | GameState::Complete) {
            tracing::debug!(state = ?self.state, "restart ignored");
            return events;
        }
        self.progress = Progress::new(&self.config);
        self.level = Level::empty(1, profile_for(&self.config.levels, 1), &self.config);
        self.reset_actor_and_camera();
        self.transition(GameState::Start, &mut events);
        self.sync_hud(true);
        events
    }

    /// Advance one fixed step. Only `Playing` runs physics and dispatch;
    /// other states only handle their command keys.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.ticks += 1;

        if self.input.consume(LogicalKey::ToggleMusic) {
            self.toggle_music();
        }

        if self.state.is_simulating() {
            self.simulate(&mut events);
        }
        match self.state {
            GameState::Victory => {
                if self.input.consume(LogicalKey::Continue) {
                    events.extend(self.continue_to_next_level());
                }
            },
            GameState::GameOver | GameState::Complete => {
                if self.input.consume(LogicalKey::Restart) {
                    events.extend(self.restart());
                }
            },
            GameState::Start | GameState::Playing => {},
        }

        self.sync_hud(false);
        events
    }

    /// Current frame for the renderer.
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(
            self.state,
            &self.camera,
            &self.level,
            &self.actor,
            self.character,
            self.hud(),
        )
    }

    /// MessagePack-encoded snapshot.
    pub fn serialize_snapshot(&self) -> Result<Vec<u8>, SimError> {
        Ok(self.snapshot().to_msgpack()?)
    }

    fn simulate(&mut self, events: &mut Vec<GameEvent>) {
        if self.actor.tick_powerup() {
            events.push(GameEvent::PowerUpExpired);
        }

        let world_width = self.config.world.world_width;
        physics::step_platforms(&mut self.level.platforms);
        for d in &mut self.level.decorations {
            d.update(world_width);
        }
        for p in &mut self.level.pickups {
            p.update();
        }
        for s in &mut self.level.springs {
            s.update();
        }
        for p in &mut self.level.powerups {
            p.update();
        }
        self.level.goal.update();

        match physics::tick_actor(
            &mut self.actor,
            &self.input,
            &self.level.platforms,
            &self.config,
        ) {
            Ok(step) => {
                if step.jumped {
                    self.services.play(AudioCue::Jump);
                }
            },
            Err(e) => {
                self.abort(e, events);
                return;
            },
        }

        self.step_hostiles();
        self.camera.update(&self.actor, &self.config.world);

        let outcome = Dispatcher::new(&self.config, &mut self.services, events).run(
            &mut self.actor,
            &mut self.level,
            &mut self.progress,
        );

        match outcome {
            Outcome::Playing => {
                if let Err(e) = self.check_invariants() {
                    self.abort(e, events);
                }
            },
            Outcome::Victory => {
                self.transition(GameState::Victory, events);
                self.services.play(AudioCue::MusicStop);
                self.services.play(AudioCue::Victory);
            },
            Outcome::GameOver => self.game_over(events),
        }
    }

    /// Move hostiles and cull the ones that left the world for good.
    fn step_hostiles(&mut self) {
        let cull_y = self.config.world.world_height() * 2.0;
        let mut culled = Vec::new();
        for (i, hostile) in self.level.hostiles.iter_mut().enumerate() {
            if let Err(e) = physics::tick_hostile(hostile, i, &self.level.platforms, &self.config) {
                tracing::debug!(error = %e, "Culling hostile");
                culled.push(i);
            } else if hostile.y > cull_y {
                culled.push(i);
            }
        }
        dispatch::compact(&mut self.level.hostiles, &culled);
    }

    fn check_invariants(&self) -> Result<(), SimError> {
        if !self.actor.is_finite() {
            return Err(SimError::NonFinite {
                entity: "actor",
                index: 0,
            });
        }
        if self.progress.lives <= 0 {
            return Err(SimError::Invariant(format!(
                "lives {} while playing",
                self.progress.lives
            )));
        }
        Ok(())
    }

    /// Corrupted state ends the session with the best-known score.
    fn abort(&mut self, error: SimError, events: &mut Vec<GameEvent>) {
        tracing::error!(error = %error, score = self.progress.score, "Forcing game over");
        self.game_over(events);
    }

    fn game_over(&mut self, events: &mut Vec<GameEvent>) {
        self.transition(GameState::GameOver, events);
        self.services.play(AudioCue::MusicStop);
        self.services.play(AudioCue::GameOver);
    }

    /// Generate `level` and put the actor and camera back at the start.
    /// Dropping the old level drops every spring timer with it.
    fn load_level(&mut self, level: u32, events: &mut Vec<GameEvent>) {
        let level = clamp_level(level, self.config.max_level());
        let profile = profile_for(&self.config.levels, level);
        self.level = generate_level(level, &profile, &self.config, &mut self.rng);
        self.progress.level = level;
        self.reset_actor_and_camera();
        events.push(GameEvent::LevelStarted {
            level,
            theme: profile.theme,
        });
    }

    fn reset_actor_and_camera(&mut self) {
        let world = &self.config.world;
        self.actor.reset_to(world.start_x, world.start_y());
        self.camera.reset();
    }

    fn transition(&mut self, to: GameState, events: &mut Vec<GameEvent>) {
        let from = self.state;
        if from == to {
            return;
        }
        tracing::info!(
            ?from,
            ?to,
            level = self.progress.level,
            score = self.progress.score,
            "State change"
        );
        self.state = to;
        // A press from the previous state must not fire in the new one.
        self.input.clear_latches();
        events.push(GameEvent::StateChanged { from, to });
    }

    fn start_music(&mut self) {
        if !self.music_muted {
            self.services.play(AudioCue::MusicStart {
                theme: self.level.profile.theme,
            });
        }
    }

    fn toggle_music(&mut self) {
        self.music_muted = !self.music_muted;
        tracing::debug!(muted = self.music_muted, "Music toggled");
        if self.music_muted {
            self.services.play(AudioCue::MusicStop);
        } else if self.state == GameState::Playing {
            self.start_music();
        }
    }

    fn sync_hud(&mut self, force: bool) {
        let hud = self.hud();
        if force || self.last_hud != Some(hud) {
            self.services.hud.sync(&hud);
            self.last_hud = Some(hud);
        }
    }
}
