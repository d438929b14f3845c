//! Proximity rules that form holding pairs on their own: actors catching
//! balls, actors climbing into beds, and resting balls snapping to actors.
//!
//! Entities are visited in id order so the outcome never depends on
//! anything but the world state and the seed.

use lg_core::{ActorState, BallState, Entity, EntityId, EntityKind};
use log::trace;

use crate::context::SimContext;
use crate::error::SimResult;
use crate::system::System;
use crate::{bed, holding};

fn is_loose_ball(entity: &Entity) -> bool {
    entity
        .components
        .ball
        .as_ref()
        .is_some_and(|b| b.state == BallState::Free)
        && !entity.is_dragged()
}

/// Whether an actor would take a ball offered to it right now.
fn is_available_actor(entity: &Entity, holding_something: bool) -> bool {
    let ready = entity
        .components
        .actor
        .as_ref()
        .is_some_and(|a| a.is_receptive() && a.pickup_cooldown <= 0.0);
    ready && !holding_something && !entity.is_dragged()
}

/// Snap a resting ball to the first available actor within the snap margin.
///
/// The caller decides whether the ball is eligible (free and not held).
pub(crate) fn try_ball_snap(ctx: &mut SimContext<'_>, ball: EntityId) -> bool {
    let margin = ctx.config.interaction.ball_snap_margin;
    let world = &*ctx.world;
    let actor = world.first_overlapping(ball, EntityKind::Actor, margin, |e| {
        is_available_actor(e, world.holding().is_holding(e.id))
    });
    match actor {
        Some(actor) => {
            trace!("{ball} snaps to {actor}");
            holding::start_holding(ctx, actor, ball)
        }
        None => false,
    }
}

/// Fifth phase of every tick: proximity-driven pickups.
#[derive(Debug, Default)]
pub struct InteractionSystem;

impl InteractionSystem {
    fn catch_ball(ctx: &mut SimContext<'_>, actor: EntityId) {
        let world = &*ctx.world;
        let Some(component) = world
            .get_entity(actor)
            .and_then(|e| e.components.actor.as_ref())
        else {
            return;
        };
        if component.skips_ball_pickup() || world.holding().is_holding(actor) {
            return;
        }
        let margin = ctx.config.interaction.collision_margin;
        let ball = world.first_overlapping(actor, EntityKind::Ball, margin, |e| {
            is_loose_ball(e) && !world.holding().is_held(e.id)
        });
        if let Some(ball) = ball {
            holding::start_holding(ctx, actor, ball);
        }
    }

    fn seek_bed(ctx: &mut SimContext<'_>, actor: EntityId) {
        let world = &*ctx.world;
        let Some(component) = world
            .get_entity(actor)
            .and_then(|e| e.components.actor.as_ref())
        else {
            return;
        };
        let wandering = matches!(component.state, ActorState::Idle | ActorState::Walking);
        if !wandering || component.bed_cooldown > 0.0 || world.holding().is_held(actor) {
            return;
        }
        let margin = ctx.config.interaction.bed_interaction_margin;
        let found = world.first_overlapping(actor, EntityKind::Bed, margin, |e| {
            bed::is_free(world, e)
        });
        if let Some(found) = found {
            holding::start_holding(ctx, found, actor);
        }
    }

    fn settle_ball(ctx: &mut SimContext<'_>, ball: EntityId) {
        let eligible = ctx
            .world
            .get_entity(ball)
            .is_some_and(|e| is_loose_ball(e) && !e.has_active_physics())
            && !ctx.world.holding().is_held(ball);
        if eligible {
            try_ball_snap(ctx, ball);
        }
    }
}

impl System for InteractionSystem {
    fn name(&self) -> &str {
        "interactions"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        for actor in ctx.world.ids_of_kind(EntityKind::Actor) {
            Self::catch_ball(ctx, actor);
            Self::seek_bed(ctx, actor);
        }
        for ball in ctx.world.ids_of_kind(EntityKind::Ball) {
            Self::settle_ball(ctx, ball);
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
