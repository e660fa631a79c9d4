use skyrun_core::error::SimError;
use skyrun_core::geometry::Aabb;
use skyrun_core::input::{InputState, LogicalKey};

use crate::config::SimConfig;
use crate::entities::{Actor, Hostile, Platform};

/// Anything the platform resolver can push around.
pub trait Body {
    fn bounds(&self) -> Aabb;
    fn velocity(&self) -> (f32, f32);
    fn place(&mut self, x: f32, y: f32);
    fn stop_vertical(&mut self);
}

impl Body for Actor {
    fn bounds(&self) -> Aabb {
        Actor::bounds(self)
    }

    fn velocity(&self) -> (f32, f32) {
        (self.vx, self.vy)
    }

    fn place(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    fn stop_vertical(&mut self) {
        self.vy = 0.0;
    }
}

impl Body for Hostile {
    fn bounds(&self) -> Aabb {
        Hostile::bounds(self)
    }

    fn velocity(&self) -> (f32, f32) {
        (self.vx, self.vy)
    }

    fn place(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    fn stop_vertical(&mut self) {
        self.vy = 0.0;
    }
}

/// Outcome of resolving one body against one platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// No overlap.
    Clear,
    /// Came down onto the top; `y` is the snapped body top.
    Land { y: f32 },
    /// Came up into the underside; `y` is the snapped body top.
    Ceiling { y: f32 },
    /// Pushed out sideways; `x` is the snapped body left edge.
    Push { x: f32 },
    /// Overlapping with no velocity to resolve along.
    Unresolved,
}

/// Resolve an overlap by incoming-velocity axis priority: landing first,
/// then head bumps, then lateral push-out along the horizontal velocity.
pub fn resolve_against_platform(
    body: Aabb,
    previous: Aabb,
    vx: f32,
    vy: f32,
    platform: &Aabb,
) -> Resolution {
    if !body.overlaps(platform) {
        return Resolution::Clear;
    }
    if vy > 0.0 && previous.top() < platform.top() {
        Resolution::Land {
            y: platform.top() - body.height,
        }
    } else if vy < 0.0 && previous.bottom() > platform.bottom() {
        Resolution::Ceiling {
            y: platform.bottom(),
        }
    } else if vx > 0.0 {
        Resolution::Push {
            x: platform.left() - body.width,
        }
    } else if vx < 0.0 {
        Resolution::Push {
            x: platform.right(),
        }
    } else {
        Resolution::Unresolved
    }
}

/// What a body touched while being resolved against every platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contact {
    pub grounded: bool,
    pub blocked: bool,
}

/// Resolve `body` against every platform in order. `previous` is the body's
/// bounds at the start of the tick.
pub fn resolve_platforms<B: Body>(body: &mut B, previous: Aabb, platforms: &[Platform]) -> Contact {
    let mut contact = Contact::default();
    for platform in platforms {
        let bounds = body.bounds();
        let (vx, vy) = body.velocity();
        match resolve_against_platform(bounds, previous, vx, vy, &platform.bounds) {
            Resolution::Clear | Resolution::Unresolved => {},
            Resolution::Land { y } => {
                body.place(bounds.x, y);
                body.stop_vertical();
                contact.grounded = true;
            },
            Resolution::Ceiling { y } => {
                body.place(bounds.x, y);
                body.stop_vertical();
            },
            Resolution::Push { x } => {
                body.place(x, bounds.y);
                contact.blocked = true;
            },
        }
    }
    contact
}

/// Advance every moving platform by one phase step.
pub fn step_platforms(platforms: &mut [Platform]) {
    for platform in platforms {
        platform.update();
    }
}

/// Result of one actor physics step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActorStep {
    pub jumped: bool,
    pub landed: bool,
}

/// Advance the actor by one tick: input, gravity, integration, platform
/// resolution, then the horizontal world clamp. There is no vertical clamp.
pub fn tick_actor(
    actor: &mut Actor,
    input: &InputState,
    platforms: &[Platform],
    config: &SimConfig,
) -> Result<ActorStep, SimError> {
    let physics = &config.physics;
    let mut step = ActorStep::default();
    let previous = actor.bounds();

    let dir = input.horizontal();
    if dir != 0.0 {
        actor.vx = dir * actor.speed;
        actor.facing = dir;
    } else {
        actor.vx *= physics.friction;
    }

    if input.held(LogicalKey::Jump) && actor.on_ground {
        actor.vy = -actor.jump_power;
        actor.on_ground = false;
        step.jumped = true;
    }

    // Semi-implicit Euler: velocity first, then position
    actor.vy += physics.gravity;
    actor.x += actor.vx;
    actor.y += actor.vy;
    actor.advance_animation();

    actor.on_ground = false;
    let contact = resolve_platforms(actor, previous, platforms);
    actor.on_ground = contact.grounded;
    step.landed = contact.grounded;

    let max_x = (config.world.world_width - actor.width).max(0.0);
    actor.x = actor.x.clamp(0.0, max_x);

    if !actor.is_finite() {
        return Err(SimError::NonFinite {
            entity: "actor",
            index: 0,
        });
    }
    Ok(step)
}

/// Advance a hostile by one tick. Hostiles patrol at constant speed, rest on
/// platform tops and turn around at walls and world edges.
pub fn tick_hostile(
    hostile: &mut Hostile,
    index: usize,
    platforms: &[Platform],
    config: &SimConfig,
) -> Result<(), SimError> {
    let previous = hostile.bounds();

    hostile.vy += config.physics.hostile_gravity;
    hostile.x += hostile.vx;
    hostile.y += hostile.vy;

    let contact = resolve_platforms(hostile, previous, platforms);
    if contact.blocked {
        hostile.vx = -hostile.vx;
    }

    let max_x = (config.world.world_width - hostile.size).max(0.0);
    if hostile.x <= 0.0 {
        hostile.x = 0.0;
        hostile.vx = hostile.vx.abs();
    } else if hostile.x >= max_x {
        hostile.x = max_x;
        hostile.vx = -hostile.vx.abs();
    }

    if !hostile.is_finite() {
        return Err(SimError::NonFinite {
            entity: "hostile",
            index,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ActorStats, Axis};

    fn config() -> SimConfig {
        SimConfig::default()
    }

    fn actor_at(x: f32, y: f32) -> Actor {
        Actor::new(x, y, ActorStats::from_config(&config().physics))
    }

    fn floor() -> Vec<Platform> {
        vec![Platform::fixed(0.0, 770.0, 6000.0, 30.0)]
    }

    #[test]
    fn landing_snaps_to_top() {
        let platform = Aabb::new(0.0, 100.0, 200.0, 30.0);
        let previous = Aabb::new(10.0, 50.0, 45.0, 45.0);
        let body = Aabb::new(10.0, 60.0, 45.0, 45.0);
        assert_eq!(
            resolve_against_platform(body, previous, 0.0, 10.0, &platform),
            Resolution::Land { y: 55.0 }
        );
    }

    #[test]
    fn head_bump_snaps_to_underside() {
        let platform = Aabb::new(0.0, 100.0, 200.0, 30.0);
        let previous = Aabb::new(10.0, 135.0, 45.0, 45.0);
        let body = Aabb::new(10.0, 120.0, 45.0, 45.0);
        assert_eq!(
            resolve_against_platform(body, previous, 0.0, -15.0, &platform),
            Resolution::Ceiling { y: 130.0 }
        );
    }

    #[test]
    fn lateral_push_follows_velocity() {
        let platform = Aabb::new(100.0, 100.0, 200.0, 30.0);
        let body = Aabb::new(60.0, 95.0, 45.0, 45.0);
        // Moving right, already level with the platform: pushed to its left edge.
        assert_eq!(
            resolve_against_platform(body, body, 8.0, 0.0, &platform),
            Resolution::Push { x: 55.0 }
        );
        let body = Aabb::new(290.0, 95.0, 45.0, 45.0);
        assert_eq!(
            resolve_against_platform(body, body, -8.0, 0.0, &platform),
            Resolution::Push { x: 300.0 }
        );
    }

    #[test]
    fn landing_beats_lateral_push() {
        let platform = Aabb::new(100.0, 100.0, 200.0, 30.0);
        let previous = Aabb::new(90.0, 50.0, 45.0, 45.0);
        let body = Aabb::new(98.0, 62.0, 45.0, 45.0);
        let r = resolve_against_platform(body, previous, 8.0, 12.0, &platform);
        assert!(matches!(r, Resolution::Land { .. }), "got {r:?}");
    }

    #[test]
    fn no_overlap_is_clear() {
        let platform = Aabb::new(0.0, 100.0, 200.0, 30.0);
        let body = Aabb::new(300.0, 0.0, 45.0, 45.0);
        assert_eq!(
            resolve_against_platform(body, body, 5.0, 5.0, &platform),
            Resolution::Clear
        );
    }

    #[test]
    fn touching_edges_do_not_collide() {
        let platform = Aabb::new(0.0, 100.0, 200.0, 30.0);
        let body = Aabb::new(10.0, 55.0, 45.0, 45.0);
        assert_eq!(
            resolve_against_platform(body, body, 0.0, 0.0, &platform),
            Resolution::Clear
        );
    }

    #[test]
    fn actor_comes_to_rest_on_floor() {
        let config = config();
        let platforms = floor();
        let mut actor = actor_at(100.0, 600.0);
        let input = InputState::new();
        for _ in 0..200 {
            tick_actor(&mut actor, &input, &platforms, &config).unwrap();
        }
        assert!(actor.on_ground);
        assert_eq!(actor.vy, 0.0);
        assert_eq!(actor.y + actor.height, 770.0);
    }

    #[test]
    fn jump_only_from_ground() {
        let config = config();
        let platforms = floor();
        let mut actor = actor_at(100.0, 725.0);
        let mut input = InputState::new();
        tick_actor(&mut actor, &input, &platforms, &config).unwrap();
        assert!(actor.on_ground);

        input.press(LogicalKey::Jump);
        let step = tick_actor(&mut actor, &input, &platforms, &config).unwrap();
        assert!(step.jumped);
        assert!(actor.vy < 0.0);
        assert!(!actor.on_ground);

        // Holding jump in mid-air does nothing.
        let vy = actor.vy;
        let step = tick_actor(&mut actor, &input, &platforms, &config).unwrap();
        assert!(!step.jumped);
        assert_eq!(actor.vy, vy + config.physics.gravity);
    }

    #[test]
    fn friction_decays_velocity_without_input() {
        let config = config();
        let platforms = floor();
        let mut actor = actor_at(100.0, 725.0);
        let mut input = InputState::new();
        input.press(LogicalKey::Right);
        tick_actor(&mut actor, &input, &platforms, &config).unwrap();
        assert_eq!(actor.vx, actor.speed);
        assert_eq!(actor.facing, 1.0);

        input.release(LogicalKey::Right);
        tick_actor(&mut actor, &input, &platforms, &config).unwrap();
        assert!((actor.vx - actor.speed * 0.7).abs() < 1e-5);
        assert!(actor.vx > 0.0, "friction approaches rest, never reverses");
    }

    #[test]
    fn actor_clamped_to_world() {
        let config = config();
        let platforms = floor();
        let mut actor = actor_at(2.0, 725.0);
        let mut input = InputState::new();
        input.press(LogicalKey::Left);
        tick_actor(&mut actor, &input, &platforms, &config).unwrap();
        assert_eq!(actor.x, 0.0);
        assert_eq!(actor.facing, -1.0);

        let mut actor = actor_at(5950.0, 725.0);
        input.release(LogicalKey::Left);
        input.press(LogicalKey::Right);
        tick_actor(&mut actor, &input, &platforms, &config).unwrap();
        assert_eq!(actor.x, 6000.0 - actor.width);
    }

    #[test]
    fn no_vertical_clamp() {
        let config = config();
        let mut actor = actor_at(100.0, 790.0);
        let input = InputState::new();
        for _ in 0..10 {
            tick_actor(&mut actor, &input, &[], &config).unwrap();
        }
        assert!(actor.y > config.world.world_height());
    }

    #[test]
    fn non_finite_actor_is_reported() {
        let config = config();
        let mut actor = actor_at(100.0, 100.0);
        actor.vy = f32::NAN;
        let err = tick_actor(&mut actor, &InputState::new(), &[], &config).unwrap_err();
        assert!(matches!(err, SimError::NonFinite { entity: "actor", .. }));
    }

    #[test]
    fn actor_rides_moving_platform() {
        let config = config();
        let mut platforms = vec![Platform::oscillating(
            Aabb::new(0.0, 500.0, 300.0, 30.0),
            Axis::Vertical,
            100.0,
            0.02,
        )];
        let mut actor = actor_at(100.0, 455.0);
        let input = InputState::new();
        for _ in 0..300 {
            step_platforms(&mut platforms);
            tick_actor(&mut actor, &input, &platforms, &config).unwrap();
        }
        assert!(actor.on_ground);
        assert!((actor.y + actor.height - platforms[0].bounds.top()).abs() < 1e-3);
    }

    #[test]
    fn hostile_rests_on_platform() {
        let config = config();
        let platforms = floor();
        let mut h = Hostile::new(500.0, 700.0, 1.5, 38.0);
        for _ in 0..100 {
            tick_hostile(&mut h, 0, &platforms, &config).unwrap();
        }
        assert_eq!(h.y + h.size, 770.0);
        assert_eq!(h.vy, 0.0);
        assert!(h.x < 500.0);
    }

    #[test]
    fn hostile_turns_at_world_edges() {
        let config = config();
        let platforms = floor();
        let mut h = Hostile::new(1.0, 732.0, 1.5, 38.0);
        tick_hostile(&mut h, 0, &platforms, &config).unwrap();
        assert_eq!(h.x, 0.0);
        assert!(h.vx > 0.0);

        let mut h = Hostile::new(6000.0 - 38.0, 732.0, 1.5, 38.0);
        h.vx = 1.5;
        tick_hostile(&mut h, 0, &platforms, &config).unwrap();
        assert!(h.vx < 0.0);
        assert_eq!(h.x, 6000.0 - 38.0);
    }

    #[test]
    fn hostile_turns_at_walls() {
        let config = config();
        let mut platforms = floor();
        platforms.push(Platform::fixed(400.0, 700.0, 50.0, 70.0));
        let mut h = Hostile::new(451.0, 732.0, 1.5, 38.0);
        tick_hostile(&mut h, 0, &platforms, &config).unwrap();
        assert_eq!(h.x, 450.0);
        assert!(h.vx > 0.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn resting_actor_stays_grounded(
                x in 0.0f32..5900.0,
                ticks in 1usize..400,
            ) {
                let config = config();
                let platforms = floor();
                let mut actor = actor_at(x, 770.0 - 45.0);
                let input = InputState::new();
                for _ in 0..ticks {
                    tick_actor(&mut actor, &input, &platforms, &config).unwrap();
                    prop_assert!(actor.on_ground);
                    prop_assert_eq!(actor.vy, 0.0);
                }
            }

            #[test]
            fn actor_x_stays_in_world(
                x in 0.0f32..5955.0,
                dir in prop_oneof![Just(LogicalKey::Left), Just(LogicalKey::Right)],
                ticks in 1usize..1000,
            ) {
                let config = config();
                let platforms = floor();
                let mut actor = actor_at(x, 725.0);
                let mut input = InputState::new();
                input.press(dir);
                for _ in 0..ticks {
                    tick_actor(&mut actor, &input, &platforms, &config).unwrap();
                    prop_assert!(actor.x >= 0.0);
                    prop_assert!(actor.x <= config.world.world_width - actor.width);
                }
            }

            #[test]
            fn falling_actor_never_tunnels(
                x in 0.0f32..5900.0,
                height in 50.0f32..700.0,
            ) {
                let config = config();
                let platforms = floor();
                let mut actor = actor_at(x, 770.0 - 45.0 - height);
                let input = InputState::new();
                for _ in 0..300 {
                    tick_actor(&mut actor, &input, &platforms, &config).unwrap();
                    prop_assert!(actor.y + actor.height <= 770.0 + 1e-3);
                }
            }
        }
    }
}
