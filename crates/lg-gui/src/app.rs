//! Application state: the simulation plus everything the window adds on top.

use log::warn;
use rand::SeedableRng;
use rand::rngs::StdRng;

use lg_simulation::{SimConfig, SimResult, Simulation};

use crate::input::{Pointer, apply_pointer};
use crate::particles::ParticleSystem;
use crate::theme::Canvas;

/// Events kept in memory when the config leaves the log unbounded. The
/// window runs for as long as it stays open.
pub const DEFAULT_EVENT_CAP: usize = 4096;

/// State owned by the frame loop.
pub struct AppState {
    /// The running simulation.
    pub sim: Simulation,
    /// Cosmetic particles.
    pub particles: ParticleSystem,
    /// Canvas matching the world's size.
    pub canvas: Canvas,
    /// Events already turned into particles.
    seen_events: u64,
    /// Randomness for particles only, so visuals never perturb the simulation.
    fx_rng: StdRng,
}

impl AppState {
    /// Build the default scene from `config`, capping an unbounded event log
    /// at [`DEFAULT_EVENT_CAP`].
    pub fn new(mut config: SimConfig) -> SimResult<Self> {
        if config.max_events == 0 {
            config = config.with_max_events(DEFAULT_EVENT_CAP);
        }
        let fx_rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));
        let sim = Simulation::with_default_scene(config)?;
        let canvas = Canvas::new(sim.world().width(), sim.world().height());
        Ok(Self {
            sim,
            particles: ParticleSystem::new(),
            canvas,
            seen_events: 0,
            fx_rng,
        })
    }

    /// Apply input, advance one frame, and spawn particles for new events.
    pub fn update(&mut self, pointer: Pointer, dt: f32) {
        if let Err(e) = apply_pointer(&mut self.sim, pointer) {
            warn!("pointer input rejected: {e}");
        }
        if let Err(e) = self.sim.tick(dt) {
            warn!("tick failed: {e}");
        }

        let events = self.sim.events();
        self.particles
            .absorb(events.since(self.seen_events), &mut self.fx_rng);
        self.seen_events = events.total();
        self.particles.update(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lg_core::Vec2;

    #[test]
    fn new_app_uses_world_sized_canvas() {
        let app = AppState::new(SimConfig::default()).unwrap();
        assert_eq!(app.canvas, Canvas::new(800.0, 600.0));
        assert_eq!(app.sim.world().entity_count(), 3);
    }

    #[test]
    fn unbounded_event_log_is_capped() {
        let app = AppState::new(SimConfig::default()).unwrap();
        assert_eq!(app.sim.config().max_events, DEFAULT_EVENT_CAP);

        let app = AppState::new(SimConfig::default().with_max_events(64)).unwrap();
        assert_eq!(app.sim.config().max_events, 64);
    }

    #[test]
    fn update_consumes_each_event_once() {
        let mut app = AppState::new(SimConfig::default().with_seed(9)).unwrap();
        for _ in 0..120 {
            app.update(Pointer::Idle, 1.0 / 60.0);
        }
        assert_eq!(app.seen_events, app.sim.events().total());
    }

    #[test]
    fn thrown_ball_raises_dust() {
        let mut app = AppState::new(SimConfig::default()).unwrap();
        // Grab the ball, fling it sideways, and let it land.
        app.update(Pointer::Pressed(Vec2::new(210.0, 210.0)), 1.0 / 60.0);
        app.update(Pointer::Held(Vec2::new(260.0, 400.0)), 1.0 / 60.0);
        app.update(Pointer::Held(Vec2::new(360.0, 560.0)), 1.0 / 60.0);
        app.update(Pointer::Released(Vec2::new(460.0, 580.0)), 1.0 / 60.0);

        let mut saw_particles = false;
        for _ in 0..300 {
            app.update(Pointer::Idle, 1.0 / 60.0);
            saw_particles |= !app.particles.is_empty();
        }
        assert!(saw_particles);
    }
}
