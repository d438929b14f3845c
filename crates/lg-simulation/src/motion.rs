use lg_core::{EntityId, Vec2, World};
use log::trace;

use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::system::System;

/// Launch `id` into ballistic flight from where it stands.
///
/// Any running drop hop is cancelled so the two motions never fight over
/// the entity's height. Does nothing for entities without a physics body.
pub fn launch(ctx: &mut SimContext<'_>, id: EntityId, velocity: Vec2) {
    let Some(entity) = ctx.world.get_entity_mut(id) else {
        return;
    };
    let from = entity.position();
    if let Some(sway) = entity.components.sway.as_mut() {
        sway.cancel_drop();
    }
    let Some(body) = entity.components.physics.as_mut() else {
        return;
    };
    body.launch(velocity, from);
    trace!("{id} launched at {velocity}");
    ctx.emit(
        SimEventKind::Thrown {
            entity: id,
            velocity,
        },
        format!("{id} flies off at {velocity}"),
    );
}

/// Stop all motion of `id`: ballistic flight and the drop hop.
pub fn halt(world: &mut World, id: EntityId) {
    let Some(entity) = world.get_entity_mut(id) else {
        return;
    };
    if let Some(body) = entity.components.physics.as_mut() {
        body.stop();
    }
    if let Some(sway) = entity.components.sway.as_mut() {
        sway.cancel_drop();
    }
}

/// First phase of every tick: ballistic motion, sway, drop hops, and drag
/// velocity sampling.
#[derive(Debug, Default)]
pub struct MotionSystem;

impl MotionSystem {
    fn step(ctx: &mut SimContext<'_>, id: EntityId, dt: f32, bounds: Vec2) {
        let held = ctx.world.holding().is_held(id);
        let Some(entity) = ctx.world.get_entity_mut(id) else {
            return;
        };
        let position = entity.position();
        let size = entity.size;

        let mut next = None;
        let mut impacts = Vec::new();
        let mut flying = false;
        if let Some(body) = entity.components.physics.as_mut() {
            let step = if held {
                None
            } else {
                body.update(position, size, Some(bounds), dt, &ctx.config.physics)
            };
            if let Some(step) = step {
                next = Some(step.position);
                impacts = step.impacts;
            }
            flying = body.is_active();
        }

        if let Some(sway) = entity.components.sway.as_mut() {
            if flying {
                sway.cancel_drop();
            }
            let y = next.map_or(position.y, |p| p.y);
            if let Some(new_y) = sway.update(y, dt, &ctx.config.sway) {
                next = Some(Vec2::new(next.map_or(position.x, |p| p.x), new_y));
            }
            if sway.is_dragging() {
                sway.update_drag(position, dt, &ctx.config.sway);
            }
        }

        if let Some(next) = next {
            let _ = ctx.world.set_position(id, next);
        }

        let threshold = ctx.config.physics.impact_threshold;
        for impact in impacts.into_iter().filter(|i| i.speed >= threshold) {
            ctx.emit(
                SimEventKind::Impact {
                    entity: id,
                    at: impact.at,
                    speed: impact.speed,
                    surface: impact.surface,
                },
                format!("{id} hits {:?} at speed {:.0}", impact.surface, impact.speed),
            );
        }
    }
}

impl System for MotionSystem {
    fn name(&self) -> &str {
        "motion"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let dt = ctx.dt();
        if dt <= 0.0 {
            return Ok(());
        }
        let bounds = ctx.world.bounds();
        for id in ctx.world.entity_ids() {
            Self::step(ctx, id, dt, bounds);
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
