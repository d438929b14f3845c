//! Pointer interaction: picking entities up, carrying them, and letting go.
//!
//! At most one entity is dragged at a time. While dragged it follows the
//! pointer and sways; on release it is thrown with a scaled-down copy of
//! the pointer's recent velocity.

use lg_core::{ActorState, BallState, EntityId, EntityKind, Vec2, World};
use log::debug;

use crate::context::SimContext;
use crate::error::{SimError, SimResult};
use crate::event::SimEventKind;
use crate::{actor, ball, bed, holding, interaction, motion};

/// The entity under the pointer and where on it the pointer grabbed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveDrag {
    /// The dragged entity.
    pub entity: EntityId,
    /// Pointer position relative to the entity's bottom-left corner.
    pub offset: Vec2,
}

/// The entity a press at `point` would pick up.
///
/// Balls win over everything, then beds with someone asleep in them, then
/// actors, then empty beds. Within a kind the most recently added wins.
pub fn pick_at(world: &World, point: Vec2) -> Option<EntityId> {
    let occupied_bed = world
        .entities()
        .filter(|e| e.kind == EntityKind::Bed && e.contains_point(point))
        .filter(|e| {
            bed::occupant(world, e.id)
                .and_then(|a| actor::component(world, a))
                .is_some_and(|a| a.state == ActorState::SleepingInBed)
        })
        .map(|e| e.id)
        .last();

    world
        .topmost_at(point, EntityKind::Ball)
        .or(occupied_bed)
        .or_else(|| world.topmost_at(point, EntityKind::Actor))
        .or_else(|| world.topmost_at(point, EntityKind::Bed))
}

/// Pick `id` up with the pointer at `point`.
pub fn begin_drag(ctx: &mut SimContext<'_>, id: EntityId, point: Vec2) -> SimResult<ActiveDrag> {
    let entity = ctx.world.entity(id)?;
    if entity.components.sway.is_none() {
        return Err(SimError::NotDraggable(id));
    }
    let kind = entity.kind;
    let grab = match kind {
        EntityKind::Actor => ctx.config.actor.grab_point,
        EntityKind::Ball => ctx.config.ball.grab_point,
        EntityKind::Bed => ctx.config.bed.grab_point,
    };
    let offset = grab.scale_by(entity.size);

    match kind {
        EntityKind::Actor => {
            holding::drop_with_physics(ctx, id);
            if let Some(bed) = ctx.world.holding().holder_of(id) {
                holding::stop_holding(ctx, bed, id);
            }
            actor::set_state(ctx, id, ActorState::PickedUp);
        }
        EntityKind::Ball => {
            holding::release_from_holder(ctx, id);
            ball::set_state(ctx, id, BallState::PickedUp);
        }
        EntityKind::Bed => {
            bed::evict(ctx, id);
        }
    }
    motion::halt(ctx.world, id);

    let position = ctx.world.set_position(id, point - offset)?;
    let entity = ctx.world.entity_mut(id)?;
    if let Some(sway) = entity.components.sway.as_mut() {
        sway.start_drag(position, &mut *ctx.rng, &ctx.config.sway);
    }

    debug!("drag started on {id}");
    ctx.emit(
        SimEventKind::DragStarted { entity: id },
        format!("{id} is picked up"),
    );
    Ok(ActiveDrag { entity: id, offset })
}

/// Move the dragged entity so the grab point sits under `point`.
pub fn drag_to(world: &mut World, drag: &ActiveDrag, point: Vec2) -> SimResult<Vec2> {
    Ok(world.set_position(drag.entity, point - drag.offset)?)
}

fn is_significant(velocity: Vec2, threshold: f32) -> bool {
    velocity.x.abs() > threshold || velocity.y.abs() > threshold
}

/// Let go of the dragged entity, throwing it with its drag velocity.
pub fn end_drag(ctx: &mut SimContext<'_>, drag: ActiveDrag) -> SimResult<()> {
    let id = drag.entity;
    let entity = ctx.world.entity_mut(id)?;
    let kind = entity.kind;
    let position = entity.position();
    let mut velocity = Vec2::ZERO;
    if let Some(sway) = entity.components.sway.as_mut() {
        velocity = sway.drag_velocity();
        sway.stop_drag(position, &ctx.config.sway);
    }

    debug!("drag ended on {id} with velocity {velocity}");
    ctx.emit(
        SimEventKind::DragEnded { entity: id },
        format!("{id} is let go"),
    );

    let significant = ctx.config.actor.significant_throw;
    match kind {
        EntityKind::Actor => {
            let tuning = &ctx.config.actor;
            let mut throw = velocity * tuning.drag_throw_scale;
            let min_upward = tuning.min_upward_throw;

            let margin = ctx.config.interaction.bed_snap_margin;
            let world = &*ctx.world;
            let snap = world.first_overlapping(id, EntityKind::Bed, margin, |e| {
                bed::is_free(world, e)
            });
            if let Some(found) = snap {
                holding::start_holding(ctx, found, id);
                return Ok(());
            }

            actor::set_state(ctx, id, ActorState::Idle);
            if is_significant(throw, significant) {
                throw.y = throw.y.max(min_upward);
                motion::launch(ctx, id, throw);
            }
        }
        EntityKind::Ball => {
            let tuning = &ctx.config.ball;
            let mut throw = velocity * tuning.drag_throw_scale;
            let min_upward = tuning.min_upward_throw;
            if throw.y < min_upward {
                throw.y = min_upward + ctx.unit() * min_upward;
            }

            ball::set_state(ctx, id, BallState::Free);
            if is_significant(throw, significant) {
                motion::launch(ctx, id, throw);
            }
            interaction::try_ball_snap(ctx, id);
        }
        EntityKind::Bed => {
            bed::unload(ctx, id);
            let throw = velocity * ctx.config.bed.drag_throw_scale;
            if is_significant(throw, significant) {
                motion::launch(ctx, id, throw);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn significance_uses_either_axis() {
        assert!(is_significant(Vec2::new(25.0, 0.0), 20.0));
        assert!(is_significant(Vec2::new(0.0, -25.0), 20.0));
        assert!(!is_significant(Vec2::new(20.0, 20.0), 20.0));
    }
}
