use std::path::Path;

use lg_core::{PhysicsParams, SwayParams, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Configuration for a simulation run.
///
/// Every field has a default, so a JSON file only needs to list what it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for deterministic simulation.
    pub seed: u64,
    /// Width of the world.
    pub world_width: f32,
    /// Height of the world.
    pub world_height: f32,
    /// Largest frame delta a single tick will integrate, in seconds.
    pub max_step: f32,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
    /// Ballistic motion.
    pub physics: PhysicsParams,
    /// Pendulum sway and drop hop.
    pub sway: SwayParams,
    /// Little-guy behaviour.
    pub actor: ActorTuning,
    /// Ball behaviour.
    pub ball: BallTuning,
    /// Bed behaviour.
    pub bed: BedTuning,
    /// Proximity margins for snapping and pickups.
    pub interaction: InteractionTuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            world_width: 800.0,
            world_height: 600.0,
            max_step: 0.1,
            max_events: 0,
            physics: PhysicsParams::default(),
            sway: SwayParams::default(),
            actor: ActorTuning::default(),
            ball: BallTuning::default(),
            bed: BedTuning::default(),
            interaction: InteractionTuning::default(),
        }
    }
}

impl SimConfig {
    /// Set the RNG seed for deterministic simulation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the world size.
    pub fn with_world_size(mut self, width: f32, height: f32) -> Self {
        self.world_width = width;
        self.world_height = height;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Set the per-tick delta clamp.
    pub fn with_max_step(mut self, max_step: f32) -> Self {
        self.max_step = max_step;
        self
    }

    /// Parse a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SimError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SimError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> SimResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SimError::Config(e.to_string()))
    }

    /// Reject values the simulation cannot work with.
    pub fn validate(&self) -> SimResult<()> {
        if !(self.max_step.is_finite() && self.max_step > 0.0) {
            return Err(SimError::Config(format!(
                "max_step must be positive, got {}",
                self.max_step
            )));
        }
        if self.sway.smoothing_window == 0 {
            return Err(SimError::Config("sway.smoothing_window must be at least 1".into()));
        }
        check_range("actor.idle_time", self.actor.idle_time)?;
        check_range("actor.ponder_time", self.actor.ponder_time)?;
        check_range("actor.trail_rate", self.actor.trail_rate)?;
        for (name, p) in [
            ("actor.throw_probability", self.actor.throw_probability),
            ("actor.ponder_probability", self.actor.ponder_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::Config(format!("{name} must be in [0, 1], got {p}")));
            }
        }
        if !(self.ball.catch_duration.is_finite() && self.ball.catch_duration > 0.0) {
            return Err(SimError::Config("ball.catch_duration must be positive".into()));
        }
        Ok(())
    }
}

fn check_range(name: &str, range: Range) -> SimResult<()> {
    if range.min.is_finite() && range.max.is_finite() && 0.0 <= range.min && range.min <= range.max
    {
        Ok(())
    } else {
        Err(SimError::Config(format!(
            "{name} must satisfy 0 <= min <= max, got {}..{}",
            range.min, range.max
        )))
    }
}

/// An inclusive-exclusive range of seconds or speeds to draw from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
}

impl Range {
    /// A range from `min` to `max`.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Map a unit sample `t` in `[0, 1)` into the range.
    pub fn at(&self, t: f32) -> f32 {
        self.min + t * (self.max - self.min)
    }
}

/// Tuning for the little guy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorTuning {
    /// Width and height.
    pub size: Vec2,
    /// Walking speed in units/s.
    pub walk_speed: f32,
    /// Distance at which a walk target counts as reached.
    pub arrive_distance: f32,
    /// Dwell time in Idle.
    pub idle_time: Range,
    /// Dwell time in Pondering.
    pub ponder_time: Range,
    /// Chance of throwing when idle time ends with a ball in hand.
    pub throw_probability: f32,
    /// Chance of pondering when idle time ends empty-handed.
    pub ponder_probability: f32,
    /// Length of the throwing animation.
    pub throw_animation: f32,
    /// Seconds after a throw before another catch is allowed.
    pub pickup_cooldown: f32,
    /// Seconds spent asleep in a bed.
    pub bed_sleep_time: f32,
    /// Seconds after leaving a bed before seeking one again.
    pub bed_cooldown: f32,
    /// Drag velocity multiplier when the player lets go.
    pub drag_throw_scale: f32,
    /// Minimum upward speed of a significant player throw.
    pub min_upward_throw: f32,
    /// Throw speed below which no launch happens.
    pub significant_throw: f32,
    /// Horizontal speed of an autonomous ball throw.
    pub ball_throw_x: Range,
    /// Vertical speed of an autonomous ball throw.
    pub ball_throw_y: Range,
    /// Horizontal spread when dropped out of a holder (±).
    pub drop_spread_x: f32,
    /// Vertical speed when dropped out of a holder.
    pub drop_launch_y: Range,
    /// Where the pointer grabs, as fractions of width and height.
    pub grab_point: Vec2,
    /// Trail notifications per second while walking.
    pub trail_rate: Range,
}

impl Default for ActorTuning {
    fn default() -> Self {
        Self {
            size: Vec2::new(40.0, 60.0),
            walk_speed: 50.0,
            arrive_distance: 5.0,
            idle_time: Range::new(3.0, 10.0),
            ponder_time: Range::new(8.0, 20.0),
            throw_probability: 0.4,
            ponder_probability: 0.3,
            throw_animation: 0.5,
            pickup_cooldown: 2.0,
            bed_sleep_time: 60.0,
            bed_cooldown: 10.0,
            drag_throw_scale: 0.03,
            min_upward_throw: 60.0,
            significant_throw: 20.0,
            ball_throw_x: Range::new(150.0, 250.0),
            ball_throw_y: Range::new(120.0, 200.0),
            drop_spread_x: 30.0,
            drop_launch_y: Range::new(60.0, 100.0),
            grab_point: Vec2::new(0.5, 0.8),
            trail_rate: Range::new(1.0, 3.0),
        }
    }
}

/// Tuning for the ball.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallTuning {
    /// Width and height.
    pub size: Vec2,
    /// Drag velocity multiplier when the player lets go.
    pub drag_throw_scale: f32,
    /// Upward speed a weak player throw is raised to (plus up to the same again).
    pub min_upward_throw: f32,
    /// Seconds the catch animation takes.
    pub catch_duration: f32,
    /// Horizontal spread of an arc drop (±).
    pub arc_spread_x: f32,
    /// Vertical speed of an arc drop.
    pub arc_launch_y: Range,
    /// Where the pointer grabs, as fractions of width and height.
    pub grab_point: Vec2,
}

impl Default for BallTuning {
    fn default() -> Self {
        Self {
            size: Vec2::new(20.0, 20.0),
            drag_throw_scale: 0.27,
            min_upward_throw: 50.0,
            catch_duration: 0.3,
            arc_spread_x: 25.0,
            arc_launch_y: Range::new(80.0, 120.0),
            grab_point: Vec2::new(0.5, 0.5),
        }
    }
}

/// Tuning for the bed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BedTuning {
    /// Width and height.
    pub size: Vec2,
    /// Drag velocity multiplier when the player lets go.
    pub drag_throw_scale: f32,
    /// Where the pointer grabs, as fractions of width and height.
    pub grab_point: Vec2,
}

impl Default for BedTuning {
    fn default() -> Self {
        Self {
            size: Vec2::new(60.0, 80.0),
            drag_throw_scale: 0.12,
            grab_point: Vec2::new(0.5, 0.5),
        }
    }
}

/// Overlap margins for every proximity check. One set, used everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionTuning {
    /// An actor catches a free ball overlapping it within this margin.
    pub collision_margin: f32,
    /// An idle or walking actor climbs into a bed within this margin.
    pub bed_interaction_margin: f32,
    /// An actor dropped by the player snaps into a bed within this margin.
    pub bed_snap_margin: f32,
    /// A resting ball snaps to an available actor within this margin.
    pub ball_snap_margin: f32,
}

impl Default for InteractionTuning {
    fn default() -> Self {
        Self {
            collision_margin: 5.0,
            bed_interaction_margin: 35.0,
            bed_snap_margin: 35.0,
            ball_snap_margin: 40.0,
        }
    }
}
