use lg_core::World;
use rand::Rng;
use rand::rngs::StdRng;

use crate::clock::SimClock;
use crate::config::{Range, SimConfig};
use crate::event::{EventLog, SimEvent, SimEventKind};

/// Mutable context passed to each system during a tick, and to the holding
/// protocol and drag handlers between ticks.
pub struct SimContext<'a> {
    /// The world being simulated.
    pub world: &'a mut World,
    /// The simulation clock.
    pub clock: &'a SimClock,
    /// Tuning for this run.
    pub config: &'a SimConfig,
    /// The event sink.
    pub events: &'a mut EventLog,
    /// The run's only source of randomness.
    pub rng: &'a mut StdRng,
}

impl SimContext<'_> {
    /// Emit a simulation event at the current tick.
    pub fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events
            .push(SimEvent::new(self.clock.tick(), kind, description));
    }

    /// Current tick number.
    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Sanitized duration of the current tick in seconds.
    pub fn dt(&self) -> f32 {
        self.clock.dt()
    }

    /// A uniform sample in `[0, 1)`.
    pub fn unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// `true` with probability `p`. Exactly never for 0 and always for 1.
    pub fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }

    /// A uniform sample from `range`.
    pub fn sample(&mut self, range: Range) -> f32 {
        let t = self.unit();
        range.at(t)
    }

    /// A uniform sample in `[-spread, spread)`.
    pub fn spread(&mut self, spread: f32) -> f32 {
        (self.unit() - 0.5) * 2.0 * spread
    }
}
