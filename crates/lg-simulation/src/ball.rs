use lg_core::{BallComponent, BallState, EntityId, EntityKind, Vec2, World};
use log::debug;

use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::holding::hold_position;
use crate::system::System;

/// The ball component of `id`, if it is a ball.
pub fn component(world: &World, id: EntityId) -> Option<&BallComponent> {
    world.get_entity(id)?.components.ball.as_ref()
}

fn component_mut(world: &mut World, id: EntityId) -> Option<&mut BallComponent> {
    world.get_entity_mut(id)?.components.ball.as_mut()
}

fn changed(ctx: &mut SimContext<'_>, id: EntityId, from: BallState, to: BallState) {
    if from == to {
        return;
    }
    debug!("{id}: {from} -> {to}");
    ctx.emit(
        SimEventKind::BallStateChanged {
            entity: id,
            from,
            to,
        },
        format!("{id} goes from {from} to {to}"),
    );
}

/// Move ball `id` into `state`.
pub fn set_state(ctx: &mut SimContext<'_>, id: EntityId, state: BallState) {
    let Some(ball) = component_mut(ctx.world, id) else {
        return;
    };
    let from = ball.enter(state);
    changed(ctx, id, from, state);
}

/// Start gliding ball `id` from `start` toward its holder's hand.
pub fn begin_catch(ctx: &mut SimContext<'_>, id: EntityId, start: Vec2) {
    let Some(ball) = component_mut(ctx.world, id) else {
        return;
    };
    let from = ball.begin_catch(start);
    changed(ctx, id, from, BallState::BeingCaught);
}

/// Ease-out curve used by the catch glide.
fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Third phase of every tick: runs catch glides and finishes them.
#[derive(Debug, Default)]
pub struct BallSystem;

impl BallSystem {
    fn step(ctx: &mut SimContext<'_>, id: EntityId, dt: f32) {
        let duration = ctx.config.ball.catch_duration;
        let Some(holder) = ctx.world.holding().holder_of(id) else {
            return;
        };
        let Some(target) = hold_position(ctx.world, holder, id) else {
            return;
        };
        let Some(ball) = component_mut(ctx.world, id) else {
            return;
        };
        if ball.state != BallState::BeingCaught {
            return;
        }
        let Some(catch) = ball.catch.as_mut() else {
            set_state(ctx, id, BallState::Carried);
            return;
        };

        catch.elapsed += dt;
        let progress = (catch.elapsed / duration).clamp(0.0, 1.0);
        let start = catch.start;
        let position = start.lerp(target, ease_out(progress));
        let _ = ctx.world.set_position(id, position);

        if progress >= 1.0 {
            set_state(ctx, id, BallState::Carried);
        }
    }
}

impl System for BallSystem {
    fn name(&self) -> &str {
        "balls"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()> {
        let dt = ctx.dt();
        for id in ctx.world.ids_of_kind(EntityKind::Ball) {
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
