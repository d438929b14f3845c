//! The little guy's behaviour: a timer-driven state machine over
//! [`ActorState`].
//!
//! ```text
//! Idle ──(dwell)──> Walking | Pondering | Throwing
//! Walking ──(arrived)──> Idle
//! Pondering | Throwing ──(dwell)──> Idle
//! SleepingInBed ──(dwell)──> Idle        (via the bed releasing it)
//! PickedUp                               (entered and left by dragging)
//! ```

use lg_core::{ActorComponent, ActorState, BallState, EntityId, EntityKind, Vec2, World};
use log::debug;

use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::system::System;
use crate::{holding, mood, motion};

/// The actor component of `id`, if it is an actor.
pub fn component(world: &World, id: EntityId) -> Option<&ActorComponent> {
    world.get_entity(id)?.components.actor.as_ref()
}

/// Mutable access to the actor component of `id`.
pub fn component_mut(world: &mut World, id: EntityId) -> Option<&mut ActorComponent> {
    world.get_entity_mut(id)?.components.actor.as_mut()
}

/// The ball `actor` holds, provided it has finished gliding into the hand.
pub fn carried_ball(world: &World, actor: EntityId) -> Option<EntityId> {
    let ball = world.holding().held_by(actor)?;
    let state = world.get_entity(ball)?.components.ball.as_ref()?.state;
    (state == BallState::Carried).then_some(ball)
}

/// Put `id` into `state`, running the entry actions: a fresh dwell time,
/// a walk target, the trail switch, and a chance of a mood bubble.
pub fn set_state(ctx: &mut SimContext<'_>, id: EntityId, state: ActorState) {
    let config = ctx.config;
    let Some(entity) = ctx.world.get_entity(id) else {
        return;
    };
    if entity.kind != EntityKind::Actor {
        return;
    }
    let room = ctx.world.bounds() - entity.size;

    let dwell = match state {
        ActorState::Idle => ctx.sample(config.actor.idle_time),
        ActorState::Pondering => ctx.sample(config.actor.ponder_time),
        ActorState::Throwing => config.actor.throw_animation,
        ActorState::SleepingInBed => config.actor.bed_sleep_time,
        ActorState::Walking | ActorState::PickedUp | ActorState::CarriedByBed => 0.0,
    };
    let walk = if state == ActorState::Walking {
        let target = Vec2::new(ctx.unit() * room.x.max(0.0), ctx.unit() * room.y.max(0.0));
        let rate = ctx.sample(config.actor.trail_rate).max(f32::EPSILON);
        Some((target, 1.0 / rate))
    } else {
        None
    };
    let holding_ball = ctx.world.holding().is_holding(id);

    let Some(actor) = component_mut(ctx.world, id) else {
        return;
    };
    let from = actor.enter(state, dwell);
    actor.trail_active = walk.is_some();
    if let Some((target, interval)) = walk {
        actor.walk_target = target;
        actor.trail_timer = interval;
    }

    if from != state {
        debug!("{id}: {from} -> {state}");
        ctx.emit(
            SimEventKind::ActorStateChanged {
                entity: id,
                from,
                to: state,
            },
            format!("{id} goes from {from} to {state}"),
        );
    }

    let cue = match state {
        ActorState::Idle if holding_ball => mood::IDLE_WITH_BALL,
        ActorState::Idle => mood::IDLE,
        ActorState::Walking => mood::WALKING,
        ActorState::Pondering => mood::PONDERING.lasting(dwell),
        ActorState::Throwing => mood::THROWING,
        ActorState::PickedUp => mood::PICKED_UP,
        ActorState::SleepingInBed => mood::SLEEPING.lasting(dwell),
        ActorState::CarriedByBed => mood::CARRIED,
    };
    mood::offer(ctx, id, cue);
}

/// Throw the carried `ball` in a random direction and play the throw.
pub fn throw_ball(ctx: &mut SimContext<'_>, actor: EntityId, ball: EntityId) {
    let tuning = &ctx.config.actor;
    let (speed_x, speed_y) = (tuning.ball_throw_x, tuning.ball_throw_y);
    let cooldown = tuning.pickup_cooldown;
    let direction = if ctx.unit() < 0.5 { -1.0 } else { 1.0 };
    let velocity = Vec2::new(direction * ctx.sample(speed_x), ctx.sample(speed_y));

    holding::stop_holding(ctx, actor, ball);
    motion::launch(ctx, ball, velocity);
    if let Some(component) = component_mut(ctx.world, actor) {
        component.pickup_cooldown = cooldown;
    }
    set_state(ctx, actor, ActorState::Throwing);
}

/// Second phase of every tick: actor timers, decisions, walking, and trails.
#[derive(Debug, Default)]
pub struct ActorSystem;

impl ActorSystem {
    fn step(ctx: &mut SimContext<'_>, id: EntityId, dt: f32) {
        let Some(actor) = component_mut(ctx.world, id) else {
            return;
        };
        actor.state_timer += dt;
        actor.tick_cooldowns(dt);
        actor.tick_mood(dt);
        let (state, elapsed, dwell) = (actor.state, actor.state_timer, actor.dwell);

        match state {
            ActorState::Idle if elapsed >= dwell => Self::decide(ctx, id),
            ActorState::Walking => Self::walk(ctx, id, dt),
            ActorState::Pondering | ActorState::Throwing if elapsed >= dwell => {
                set_state(ctx, id, ActorState::Idle);
            }
            ActorState::SleepingInBed if elapsed >= dwell => Self::wake(ctx, id),
            _ => {}
        }

        Self::trail(ctx, id, dt);
    }

    fn decide(ctx: &mut SimContext<'_>, id: EntityId) {
        let actor = &ctx.config.actor;
        let (throw_p, ponder_p) = (actor.throw_probability, actor.ponder_probability);
        if let Some(ball) = carried_ball(ctx.world, id) {
            if ctx.chance(throw_p) {
                throw_ball(ctx, id, ball);
            } else {
                set_state(ctx, id, ActorState::Walking);
            }
        } else if ctx.chance(ponder_p) {
            set_state(ctx, id, ActorState::Pondering);
        } else {
            set_state(ctx, id, ActorState::Walking);
        }
    }

    fn walk(ctx: &mut SimContext<'_>, id: EntityId, dt: f32) {
        let (speed, arrive) = (ctx.config.actor.walk_speed, ctx.config.actor.arrive_distance);
        let (Some(entity), Some(actor)) = (ctx.world.get_entity(id), component(ctx.world, id))
        else {
            return;
        };
        let position = entity.position();
        let offset = actor.walk_target - position;
        let distance = offset.length();

        if distance < arrive {
            set_state(ctx, id, ActorState::Idle);
            return;
        }
        let stride = speed * dt;
        let next = if stride >= distance {
            actor.walk_target
        } else {
            position + offset.normalize_or_zero() * stride
        };
        let _ = ctx.world.set_position(id, next);
    }

    fn wake(ctx: &mut SimContext<'_>, id: EntityId) {
        match ctx.world.holding().holder_of(id) {
            Some(bed) => {
                holding::stop_holding(ctx, bed, id);
            }
            None => {
                let cooldown = ctx.config.actor.bed_cooldown;
                if let Some(actor) = component_mut(ctx.world, id) {
                    actor.bed_cooldown = cooldown;
                }
                set_state(ctx, id, ActorState::Idle);
            }
        }
    }

    fn trail(ctx: &mut SimContext<'_>, id: EntityId, dt: f32) {
        let Some(actor) = component_mut(ctx.world, id) else {
            return;
        };
        if !actor.trail_active {
            return;
        }
        actor.trail_timer -= dt;
        if actor.trail_timer > 0.0 {
            return;
        }
        let target = actor.walk_target;

        let rate = ctx.sample(ctx.config.actor.trail_rate).max(f32::EPSILON);
        let Some(entity) = ctx.world.get_entity_mut(id) else {
            return;
        };
        let position = entity.position();
        let at = Vec2::new(position.x + entity.size.x / 2.0, position.y);
        let heading = (target - position).normalize_or_zero();
        if let Some(actor) = entity.components.actor.as_mut() {
            actor.trail_timer = 1.0 / rate;
        }
        ctx.emit(
            SimEventKind::Trail {
                entity: id,
                at,
                heading,
            },
            format!("{id} leaves a footstep at {at}"),
        );
    }
}

impl System for ActorSystem {
    fn name(&self) -> &str {
        "actors"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let dt = ctx.dt();
        for id in ctx.world.ids_of_kind(EntityKind::Actor) {
            Self::step(ctx, id, dt);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
