/// Tracks simulation time: a monotonic tick counter and elapsed seconds.
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    tick: u64,
    elapsed: f64,
    last_dt: f32,
}

impl SimClock {
    /// Create a new clock at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one tick lasting `dt` seconds. Returns the new tick number.
    pub fn advance(&mut self, dt: f32) -> u64 {
        self.tick += 1;
        self.last_dt = dt;
        self.elapsed += f64::from(dt);
        self.tick
    }

    /// Return the current tick number.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Duration of the most recent tick in seconds.
    pub fn dt(&self) -> f32 {
        self.last_dt
    }

    /// Total simulated seconds since start.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed
    }
}
