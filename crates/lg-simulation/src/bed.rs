use lg_core::{ActorState, Entity, EntityId, EntityKind, Vec2, World};
use log::debug;

use crate::context::SimContext;
use crate::error::SimResult;
use crate::system::System;
use crate::{actor, holding};

/// The actor lying in `bed`, asleep or along for the ride.
pub fn occupant(world: &World, bed: EntityId) -> Option<EntityId> {
    world.holding().held_by(bed)
}

/// Whether `bed` can take a sleeper right now: empty and not being dragged.
pub fn is_free(world: &World, bed: &Entity) -> bool {
    bed.kind == EntityKind::Bed && !world.holding().is_holding(bed.id) && !bed.is_dragged()
}

/// Where `actor` lies when asleep in `bed`.
pub fn sleeping_position(world: &World, bed: EntityId, actor: EntityId) -> Option<Vec2> {
    holding::hold_position(world, bed, actor)
}

/// Wake and release whoever sleeps in `bed`. Returns the former occupant.
pub fn evict(ctx: &mut SimContext<'_>, bed: EntityId) -> Option<EntityId> {
    let sleeper = occupant(ctx.world, bed)?;
    debug!("{bed} evicts {sleeper}");
    holding::stop_holding(ctx, bed, sleeper).then_some(sleeper)
}

/// Pick up the first actor a dragged, empty `bed` passes over and carry it
/// along. Returns the passenger.
pub fn scoop(ctx: &mut SimContext<'_>, bed: EntityId) -> Option<EntityId> {
    let margin = ctx.config.interaction.bed_interaction_margin;
    let world = &*ctx.world;
    let actor = world.first_overlapping(bed, EntityKind::Actor, margin, |e| {
        let settled = e
            .components
            .actor
            .as_ref()
            .is_some_and(|a| {
                matches!(a.state, ActorState::PickedUp | ActorState::SleepingInBed)
            });
        !settled && !e.is_dragged() && !world.holding().is_held(e.id)
    })?;
    debug!("{bed} scoops up {actor}");
    holding::start_holding(ctx, bed, actor).then_some(actor)
}

/// Let a passenger off `bed`. Sleepers are left alone.
pub fn unload(ctx: &mut SimContext<'_>, bed: EntityId) -> Option<EntityId> {
    let passenger = occupant(ctx.world, bed)?;
    let riding = actor::component(ctx.world, passenger)
        .is_some_and(|a| a.state == ActorState::CarriedByBed);
    if !riding {
        return None;
    }
    holding::stop_holding(ctx, bed, passenger).then_some(passenger)
}

/// Fourth phase of every tick. A dragged bed never keeps a sleeper: one is
/// put out first. An empty dragged bed scoops up actors it passes over, and
/// a bed at rest lets its passenger off.
#[derive(Debug, Default)]
pub struct BedSystem;

impl System for BedSystem {
    fn name(&self) -> &str {
        "beds"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        for id in ctx.world.ids_of_kind(EntityKind::Bed) {
            let dragged = ctx.world.get_entity(id).is_some_and(Entity::is_dragged);
            if !dragged {
                unload(ctx, id);
                continue;
            }
            let sleeper = occupant(ctx.world, id)
                .and_then(|a| actor::component(ctx.world, a))
                .is_some_and(|a| a.state == ActorState::SleepingInBed);
            if sleeper {
                evict(ctx, id);
            }
            if occupant(ctx.world, id).is_none() {
                scoop(ctx, id);
            }
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
