use serde::{Deserialize, Serialize};

use skyrun_core::events::{AudioCue, DamageSource, GameEvent, HudState};
use skyrun_core::services::Services;

use crate::config::SimConfig;
use crate::entities::Actor;
use crate::level_gen::Level;

const STOMP_COLOR: &str = "#FF0000";
const PICKUP_COLOR: &str = "#FFD700";
const SPRING_COLOR: &str = "#FFD700";
const POWERUP_COLOR: &str = "#FF0000";
const POWERUP_LOST_COLOR: &str = "#FF0000";

/// Score, lives and level index for the running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub score: u64,
    pub lives: i32,
    /// 1-based, always within `[1, max_level]`.
    pub level: u32,
}

impl Progress {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            score: 0,
            lives: config.scoring.starting_lives,
            level: 1,
        }
    }

    pub fn add_points(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    pub fn hud(&self, powered_up: bool) -> HudState {
        HudState {
            score: self.score,
            lives: self.lives,
            level: self.level,
            powered_up,
        }
    }
}

/// What the dispatcher decided for the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Playing,
    Victory,
    GameOver,
}

/// Drop the entries at `doomed` (ascending, unique) in one pass.
pub(crate) fn compact<T>(items: &mut Vec<T>, doomed: &[usize]) {
    if doomed.is_empty() {
        return;
    }
    let mut next = doomed.iter().copied().peekable();
    let mut index = 0;
    items.retain(|_| {
        let drop = next.peek() == Some(&index);
        if drop {
            next.next();
        }
        index += 1;
        !drop
    });
}

/// Turns post-resolution overlaps into score, lives, power-up and state
/// changes. Categories run in a fixed order and removals are applied only
/// after each category's scan.
pub struct Dispatcher<'a> {
    config: &'a SimConfig,
    services: &'a mut Services,
    events: &'a mut Vec<GameEvent>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        config: &'a SimConfig,
        services: &'a mut Services,
        events: &'a mut Vec<GameEvent>,
    ) -> Self {
        Self {
            config,
            services,
            events,
        }
    }

    /// Run every category for one tick. Stops early once the outcome leaves
    /// `Playing`.
    pub fn run(
        &mut self,
        actor: &mut Actor,
        level: &mut Level,
        progress: &mut Progress,
    ) -> Outcome {
        let steps: [fn(&mut Self, &mut Actor, &mut Level, &mut Progress) -> Outcome; 6] = [
            Self::hostiles,
            Self::pickups,
            Self::springs,
            Self::powerups,
            Self::fall_check,
            Self::goal_check,
        ];
        for step in steps {
            let outcome = step(self, actor, level, progress);
            if outcome != Outcome::Playing {
                return outcome;
            }
        }
        Outcome::Playing
    }

    fn particles(&mut self, x: f32, y: f32, color: &str) {
        self.events.push(GameEvent::ParticleBurst {
            x,
            y,
            color: color.to_string(),
        });
    }

    /// Stomp from above, otherwise take a hit.
    pub fn hostiles(
        &mut self,
        actor: &mut Actor,
        level: &mut Level,
        progress: &mut Progress,
    ) -> Outcome {
        let mut defeated = Vec::new();
        let mut outcome = Outcome::Playing;

        for (i, hostile) in level.hostiles.iter().enumerate() {
            if !hostile.is_finite() {
                tracing::debug!(index = i, "Skipping non-finite hostile");
                continue;
            }
            if !actor.bounds().overlaps(&hostile.bounds()) {
                continue;
            }
            if actor.vy > 0.0 && actor.y < hostile.y {
                defeated.push(i);
                progress.add_points(self.config.scoring.stomp_points);
                actor.vy = -actor.jump_power * self.config.scoring.stomp_bounce;
                self.services.play(AudioCue::EnemyDefeated);
                self.events.push(GameEvent::EnemyDefeated {
                    x: hostile.x,
                    y: hostile.y,
                });
                self.particles(hostile.x, hostile.y, STOMP_COLOR);
            } else {
                outcome = self.damage(actor, progress, DamageSource::Hostile);
                if outcome == Outcome::GameOver {
                    break;
                }
            }
        }

        compact(&mut level.hostiles, &defeated);
        outcome
    }

    pub fn pickups(
        &mut self,
        actor: &mut Actor,
        level: &mut Level,
        progress: &mut Progress,
    ) -> Outcome {
        let bounds = actor.bounds();
        let mut collected = Vec::new();
        for (i, pickup) in level.pickups.iter().enumerate() {
            if bounds.overlaps(&pickup.bounds) {
                collected.push(i);
                progress.add_points(self.config.scoring.pickup_points);
                self.services.play(AudioCue::Coin);
                self.events.push(GameEvent::PickupCollected {
                    x: pickup.bounds.x,
                    y: pickup.bounds.y,
                });
                self.particles(pickup.bounds.x, pickup.bounds.y, PICKUP_COLOR);
            }
        }
        compact(&mut level.pickups, &collected);
        Outcome::Playing
    }

    /// Springs are never consumed. Touching one launches the actor.
    pub fn springs(
        &mut self,
        actor: &mut Actor,
        level: &mut Level,
        _progress: &mut Progress,
    ) -> Outcome {
        for spring in &mut level.springs {
            if actor.bounds().overlaps(&spring.bounds) {
                spring.activate(self.config.generation.spring_activation_ticks);
                actor.vy = -actor.jump_power * self.config.scoring.spring_boost;
                actor.on_ground = false;
                self.services.play(AudioCue::Jump);
                self.events.push(GameEvent::SpringLaunched {
                    x: spring.bounds.x,
                    y: spring.bounds.y,
                });
                self.particles(spring.bounds.x, spring.bounds.y, SPRING_COLOR);
            }
        }
        Outcome::Playing
    }

    pub fn powerups(
        &mut self,
        actor: &mut Actor,
        level: &mut Level,
        progress: &mut Progress,
    ) -> Outcome {
        let mut collected = Vec::new();
        for (i, prop) in level.powerups.iter().enumerate() {
            if !actor.bounds().overlaps(&prop.bounds) {
                continue;
            }
            collected.push(i);
            actor.apply_powerup(prop.kind, &self.config.powerup);
            progress.add_points(self.config.scoring.powerup_points);
            progress.lives = progress.lives.saturating_add(self.config.powerup.bonus_lives);
            self.services.play(AudioCue::Coin);
            self.events.push(GameEvent::PowerUpGained);
            self.particles(prop.bounds.x, prop.bounds.y, POWERUP_COLOR);
        }
        compact(&mut level.powerups, &collected);
        Outcome::Playing
    }

    /// Falling below the world always costs a life, power-up or not.
    pub fn fall_check(
        &mut self,
        actor: &mut Actor,
        _level: &mut Level,
        progress: &mut Progress,
    ) -> Outcome {
        if actor.y > self.config.world.world_height() {
            self.lose_life(actor, progress, DamageSource::Fall)
        } else {
            Outcome::Playing
        }
    }

    pub fn goal_check(
        &mut self,
        actor: &mut Actor,
        level: &mut Level,
        progress: &mut Progress,
    ) -> Outcome {
        if actor.bounds().overlaps(&level.goal.bounds) {
            progress.add_points(self.config.scoring.goal_points);
            Outcome::Victory
        } else {
            Outcome::Playing
        }
    }

    /// Hostile contact: a power-up absorbs the hit, otherwise a life is lost.
    fn damage(
        &mut self,
        actor: &mut Actor,
        progress: &mut Progress,
        source: DamageSource,
    ) -> Outcome {
        if actor.take_damage() {
            self.lose_life(actor, progress, source)
        } else {
            self.events.push(GameEvent::PowerUpLost);
            self.particles(actor.x, actor.y, POWERUP_LOST_COLOR);
            Outcome::Playing
        }
    }

    fn lose_life(
        &mut self,
        actor: &mut Actor,
        progress: &mut Progress,
        source: DamageSource,
    ) -> Outcome {
        progress.lives -= 1;
        self.events.push(GameEvent::LifeLost {
            source,
            lives: progress.lives,
        });
        tracing::debug!(?source, lives = progress.lives, "Life lost");
        if progress.lives <= 0 {
            return Outcome::GameOver;
        }
        let world = &self.config.world;
        actor.respawn(world.start_x, world.start_y());
        Outcome::Playing
    }
}
