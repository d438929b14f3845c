//! The holder/held protocol on top of [`lg_core::HoldingTable`].
//!
//! The table keeps the relationship one-to-one; this module adds the
//! entity-specific reactions (a ball starts its catch animation, an actor
//! falls asleep or rides along on a dragged bed) and keeps held entities glued to their holders.

use lg_core::{ActorState, BallState, EntityId, EntityKind, HoldPair, Vec2, World};
use log::debug;

use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::system::System;
use crate::{actor, ball, mood, motion};

/// Where `holder` keeps `held`, or `None` if either is missing.
///
/// Actors carry a ball against their left edge at half height; beds and
/// anything else centre what they hold.
pub fn hold_position(world: &World, holder: EntityId, held: EntityId) -> Option<Vec2> {
    let holder = world.get_entity(holder)?;
    let held = world.get_entity(held)?;
    let origin = holder.position();
    Some(match holder.kind {
        EntityKind::Actor => Vec2::new(
            origin.x - held.size.x / 2.0,
            origin.y + holder.size.y / 2.0 - held.size.y / 2.0,
        ),
        EntityKind::Bed | EntityKind::Ball => origin + (holder.size - held.size) * 0.5,
    })
}

/// Whether the pair is allowed: the kinds must fit (actor holds ball, bed
/// holds actor) and the table must accept it.
pub fn can_hold(world: &World, holder: EntityId, held: EntityId) -> bool {
    match (world.get_entity(holder), world.get_entity(held)) {
        (Some(h), Some(x)) => h.kind.can_carry(x.kind) && world.holding().can_hold(holder, held),
        _ => false,
    }
}

/// Attach `held` to `holder`, releasing whatever either was attached to
/// first. Returns false if the pair is not allowed.
pub fn start_holding(ctx: &mut SimContext<'_>, holder: EntityId, held: EntityId) -> bool {
    if !can_hold(ctx.world, holder, held) {
        return false;
    }
    let Some(transfer) = ctx.world.holding_mut().start_holding(holder, held) else {
        return false;
    };
    if !transfer.is_new {
        return true;
    }

    for pair in transfer.released {
        on_end_held(ctx, pair);
    }
    debug!("{} now holds {}", holder, held);
    ctx.emit(
        SimEventKind::HoldingStarted { holder, held },
        format!("{holder} picks up {held}"),
    );
    on_begin_held(ctx, transfer.attached);
    true
}

/// Sever `holder -> held`. A no-op returning false when that pair is not in place.
pub fn stop_holding(ctx: &mut SimContext<'_>, holder: EntityId, held: EntityId) -> bool {
    if !ctx.world.holding_mut().stop_holding(holder, held) {
        return false;
    }
    on_end_held(ctx, HoldPair { holder, held });
    true
}

/// Release whatever `holder` holds. Returns the released entity.
pub fn release_held(ctx: &mut SimContext<'_>, holder: EntityId) -> Option<EntityId> {
    let pair = ctx.world.holding_mut().release_held(holder)?;
    on_end_held(ctx, pair);
    Some(pair.held)
}

/// Release `held` from whoever holds it. Returns the former holder.
pub fn release_from_holder(ctx: &mut SimContext<'_>, held: EntityId) -> Option<EntityId> {
    let pair = ctx.world.holding_mut().release_holder_of(held)?;
    on_end_held(ctx, pair);
    Some(pair.holder)
}

/// Release what `holder` holds and toss it: a small arc for a ball, a hop
/// for an actor. Returns the dropped entity.
pub fn drop_with_physics(ctx: &mut SimContext<'_>, holder: EntityId) -> Option<EntityId> {
    let held = release_held(ctx, holder)?;
    let kind = ctx.world.get_entity(held)?.kind;
    let velocity = match kind {
        EntityKind::Ball => {
            let tuning = &ctx.config.ball;
            let (spread, lift) = (tuning.arc_spread_x, tuning.arc_launch_y);
            Vec2::new(ctx.spread(spread), ctx.sample(lift))
        }
        EntityKind::Actor => {
            let tuning = &ctx.config.actor;
            let (spread, lift) = (tuning.drop_spread_x, tuning.drop_launch_y);
            Vec2::new(ctx.spread(spread), ctx.sample(lift))
        }
        EntityKind::Bed => Vec2::ZERO,
    };
    motion::launch(ctx, held, velocity);
    Some(held)
}

fn on_begin_held(ctx: &mut SimContext<'_>, pair: HoldPair) {
    let Some(kind) = ctx.world.get_entity(pair.held).map(|e| e.kind) else {
        return;
    };
    match kind {
        EntityKind::Ball => {
            motion::halt(ctx.world, pair.held);
            let start = ctx
                .world
                .get_entity(pair.held)
                .map(lg_core::Entity::position)
                .unwrap_or_default();
            ball::begin_catch(ctx, pair.held, start);
            if ctx.world.get_entity(pair.holder).map(|e| e.kind) == Some(EntityKind::Actor) {
                mood::offer(ctx, pair.holder, mood::CATCHING);
            }
        }
        EntityKind::Actor => {
            let carried = ctx
                .world
                .get_entity(pair.holder)
                .is_some_and(lg_core::Entity::is_dragged);
            let state = if carried {
                ActorState::CarriedByBed
            } else {
                ActorState::SleepingInBed
            };
            drop_with_physics(ctx, pair.held);
            motion::halt(ctx.world, pair.held);
            actor::set_state(ctx, pair.held, state);
            if let Some(pos) = hold_position(ctx.world, pair.holder, pair.held) {
                let _ = ctx.world.set_position(pair.held, pos);
            }
        }
        EntityKind::Bed => {}
    }
}

fn on_end_held(ctx: &mut SimContext<'_>, pair: HoldPair) {
    debug!("{} releases {}", pair.holder, pair.held);
    ctx.emit(
        SimEventKind::HoldingEnded {
            holder: pair.holder,
            held: pair.held,
        },
        format!("{} lets go of {}", pair.holder, pair.held),
    );

    let Some(entity) = ctx.world.get_entity(pair.held) else {
        return;
    };
    match entity.kind {
        EntityKind::Ball => {
            let attached = entity
                .components
                .ball
                .as_ref()
                .is_some_and(|b| matches!(b.state, BallState::BeingCaught | BallState::Carried));
            if attached {
                ball::set_state(ctx, pair.held, BallState::Free);
            }
        }
        EntityKind::Actor => {
            let in_bed = entity.components.actor.as_ref().is_some_and(|a| {
                matches!(a.state, ActorState::SleepingInBed | ActorState::CarriedByBed)
            });
            if in_bed {
                let cooldown = ctx.config.actor.bed_cooldown;
                if let Some(actor) = actor::component_mut(ctx.world, pair.held) {
                    actor.bed_cooldown = cooldown;
                }
                actor::set_state(ctx, pair.held, ActorState::Idle);
            }
        }
        EntityKind::Bed => {}
    }
}

/// Nesting depth of `id`: how many holders sit above it.
fn depth(world: &World, mut id: EntityId) -> usize {
    let mut depth = 0;
    while let Some(holder) = world.holding().holder_of(id) {
        depth += 1;
        id = holder;
        if depth > world.holding().len() {
            break;
        }
    }
    depth
}

/// Move every held entity to its holder's hold position, outermost holders
/// first. Balls still gliding into a hand are left to their animation.
pub fn sync_held_positions(world: &mut World) {
    let mut pairs: Vec<HoldPair> = world.holding().pairs().collect();
    pairs.sort_by_key(|p| depth(world, p.holder));
    for pair in pairs {
        let catching = world
            .get_entity(pair.held)
            .and_then(|e| e.components.ball.as_ref())
            .is_some_and(|b| b.state == BallState::BeingCaught);
        if catching {
            continue;
        }
        if let Some(pos) = hold_position(world, pair.holder, pair.held) {
            let _ = world.set_position(pair.held, pos);
        }
    }
}

/// Final phase of every tick: glue held entities to their holders.
#[derive(Debug, Default)]
pub struct HoldingSyncSystem;

impl System for HoldingSyncSystem {
    fn name(&self) -> &str {
        "holding-sync"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        sync_held_positions(ctx.world);
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
