//! Mouse and keyboard polling, translated into simulation drag calls.

use lg_core::Vec2;
use lg_simulation::{SimResult, Simulation};
use macroquad::prelude::*;

use crate::theme::Canvas;

/// What the left mouse button did this frame, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pointer {
    /// Went down at this point.
    Pressed(Vec2),
    /// Is held at this point.
    Held(Vec2),
    /// Came up at this point.
    Released(Vec2),
    /// Nothing happening.
    Idle,
}

/// Read the left mouse button for this frame.
pub fn poll_pointer(canvas: &Canvas) -> Pointer {
    let point = canvas.mouse_world_position();
    if is_mouse_button_pressed(MouseButton::Left) {
        Pointer::Pressed(point)
    } else if is_mouse_button_released(MouseButton::Left) {
        Pointer::Released(point)
    } else if is_mouse_button_down(MouseButton::Left) {
        Pointer::Held(point)
    } else {
        Pointer::Idle
    }
}

/// Feed a pointer action into the simulation.
///
/// A press on empty space does nothing; moves and releases only matter
/// while something is being dragged.
pub fn apply_pointer(sim: &mut Simulation, pointer: Pointer) -> SimResult<()> {
    match pointer {
        Pointer::Pressed(point) => {
            sim.press(point)?;
        }
        Pointer::Held(point) => {
            if sim.dragged().is_some() {
                sim.drag_to(point)?;
            }
        }
        Pointer::Released(point) => {
            if sim.dragged().is_some() {
                sim.drag_to(point)?;
                sim.end_drag()?;
            }
        }
        Pointer::Idle => {}
    }
    Ok(())
}

/// Check if the Escape key was pressed this frame.
pub fn escape_pressed() -> bool {
    is_key_pressed(KeyCode::Escape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lg_core::{ActorState, World};
    use lg_simulation::SimConfig;

    fn sim_with_actor() -> (Simulation, lg_core::EntityId) {
        let world = World::new(800.0, 600.0).unwrap();
        let mut sim = Simulation::new(world, SimConfig::default());
        let guy = sim.spawn_actor(Vec2::new(100.0, 0.0)).unwrap();
        (sim, guy)
    }

    #[test]
    fn press_on_empty_space_drags_nothing() {
        let (mut sim, _) = sim_with_actor();
        apply_pointer(&mut sim, Pointer::Pressed(Vec2::new(700.0, 500.0))).unwrap();
        assert_eq!(sim.dragged(), None);
        apply_pointer(&mut sim, Pointer::Held(Vec2::new(710.0, 500.0))).unwrap();
        apply_pointer(&mut sim, Pointer::Released(Vec2::new(710.0, 500.0))).unwrap();
        assert_eq!(sim.dragged(), None);
    }

    #[test]
    fn press_hold_release_carries_the_actor() {
        let (mut sim, guy) = sim_with_actor();
        apply_pointer(&mut sim, Pointer::Pressed(Vec2::new(110.0, 20.0))).unwrap();
        assert_eq!(sim.dragged(), Some(guy));
        assert_eq!(sim.actor_state(guy), Some(ActorState::PickedUp));

        apply_pointer(&mut sim, Pointer::Held(Vec2::new(300.0, 40.0))).unwrap();
        sim.tick(0.016).unwrap();
        apply_pointer(&mut sim, Pointer::Released(Vec2::new(300.0, 40.0))).unwrap();

        assert_eq!(sim.dragged(), None);
        assert_ne!(sim.actor_state(guy), Some(ActorState::PickedUp));
        let x = sim.world().get_entity(guy).unwrap().position().x;
        assert!(x > 250.0, "actor left at x={x}");
    }
}
