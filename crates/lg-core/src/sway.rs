use std::f32::consts::FRAC_PI_6;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;

/// Vertical speed below which the drop hop counts as finished.
const DROP_EPSILON: f32 = 0.1;

/// Tunable constants for pendulum sway and the drop hop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwayParams {
    /// Radians of target tilt per unit/s of horizontal drag velocity.
    pub rotation_sensitivity: f32,
    /// Angular velocity multiplier applied once per update.
    pub angular_damping: f32,
    /// Pendulum restoring torque per radian of tilt.
    pub restoring_torque: f32,
    /// Largest tilt the drag target may ask for.
    pub max_tilt: f32,
    /// Overshoot allowance as a multiple of `max_tilt`.
    pub swing_limit_factor: f32,
    /// Spring constant pulling rotation toward the drag target.
    pub spring: f32,
    /// Width of the random angular impulse applied on pickup.
    pub pickup_kick: f32,
    /// Angular velocity added after release when the swing is too weak.
    pub release_kick: f32,
    /// Angular speed below which the release kick is applied.
    pub release_kick_threshold: f32,
    /// Initial vertical velocity of the drop hop.
    pub drop_velocity: f32,
    /// Vertical acceleration of the drop hop.
    pub drop_gravity: f32,
    /// Bounce damping of the drop hop.
    pub drop_bounce: f32,
    /// Vertical speed below which the drop hop ends.
    pub drop_settle: f32,
    /// Tilt below which the pendulum may come to rest.
    pub rest_rotation: f32,
    /// Angular speed below which the pendulum may come to rest.
    pub rest_angular_velocity: f32,
    /// Number of drag velocity samples averaged.
    pub smoothing_window: usize,
}

impl Default for SwayParams {
    fn default() -> Self {
        Self {
            rotation_sensitivity: 0.08,
            angular_damping: 0.96,
            restoring_torque: 15.0,
            max_tilt: FRAC_PI_6,
            swing_limit_factor: 2.0,
            spring: 80.0,
            pickup_kick: 8.0,
            release_kick: 8.0,
            release_kick_threshold: 5.0,
            drop_velocity: -100.0,
            drop_gravity: -300.0,
            drop_bounce: 0.4,
            drop_settle: 20.0,
            rest_rotation: 0.01,
            rest_angular_velocity: 0.1,
            smoothing_window: 5,
        }
    }
}

impl SwayParams {
    /// Largest rotation allowed while swinging freely.
    pub fn swing_limit(&self) -> f32 {
        self.max_tilt * self.swing_limit_factor
    }
}

/// Pendulum rotation and drag-velocity tracking for one draggable entity.
#[derive(Debug, Clone)]
pub struct DragSway {
    dragging: bool,
    just_released: bool,
    rotation: f32,
    angular_velocity: f32,
    release_tilt: f32,
    last_drag: Vec2,
    samples: Vec<Vec2>,
    next_sample: usize,
    drag_velocity: Vec2,
    drop_velocity: f32,
    drop_ground: f32,
}

impl Default for DragSway {
    fn default() -> Self {
        Self::new(SwayParams::default().smoothing_window)
    }
}

impl DragSway {
    /// A resting, undragged sway averaging over `window` samples.
    pub fn new(window: usize) -> Self {
        Self {
            dragging: false,
            just_released: false,
            rotation: 0.0,
            angular_velocity: 0.0,
            release_tilt: 0.0,
            last_drag: Vec2::ZERO,
            samples: vec![Vec2::ZERO; window.max(1)],
            next_sample: 0,
            drag_velocity: Vec2::ZERO,
            drop_velocity: 0.0,
            drop_ground: 0.0,
        }
    }

    /// Current rotation in radians.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Current angular velocity in radians per second.
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Smoothed drag velocity, used as the throw impulse on release.
    pub fn drag_velocity(&self) -> Vec2 {
        self.drag_velocity
    }

    /// Whether the pointer currently holds this entity.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Whether the post-release drop hop is still running.
    pub fn is_dropping(&self) -> bool {
        self.drop_velocity != 0.0
    }

    /// Begin a drag at `position`, adding a random angular kick.
    pub fn start_drag(&mut self, position: Vec2, rng: &mut impl Rng, params: &SwayParams) {
        self.dragging = true;
        self.just_released = false;
        self.angular_velocity += (rng.random::<f32>() - 0.5) * params.pickup_kick;
        self.drop_velocity = 0.0;
        self.last_drag = position;
        self.drag_velocity = Vec2::ZERO;
        self.clear_samples();
    }

    /// Sample the drag motion since the last call and steer the tilt toward it.
    pub fn update_drag(&mut self, position: Vec2, dt: f32, params: &SwayParams) {
        if !self.dragging || dt <= 0.0 || !dt.is_finite() {
            return;
        }

        let current = (position - self.last_drag) * (1.0 / dt);
        self.samples[self.next_sample] = current;
        self.next_sample = (self.next_sample + 1) % self.samples.len();

        let (sum, count) = self
            .samples
            .iter()
            .filter(|s| **s != Vec2::ZERO)
            .fold((Vec2::ZERO, 0u32), |(sum, n), s| (sum + *s, n + 1));
        self.drag_velocity = if count > 0 {
            sum * (1.0 / count as f32)
        } else {
            current
        };

        let target = (-self.drag_velocity.x * params.rotation_sensitivity)
            .clamp(-params.max_tilt, params.max_tilt);
        self.angular_velocity += (target - self.rotation) * params.spring * dt;

        self.last_drag = position;
    }

    /// End the drag at `position`: snap upright and start the drop hop.
    ///
    /// A no-op when not dragging.
    pub fn stop_drag(&mut self, position: Vec2, params: &SwayParams) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        self.just_released = true;
        self.release_tilt = self.rotation;
        self.drop_ground = position.y;
        self.drop_velocity = params.drop_velocity;
        self.rotation = 0.0;
        self.angular_velocity = 0.0;
        self.clear_samples();
    }

    /// Abort the drop hop, e.g. when a throw hands motion to the physics body.
    pub fn cancel_drop(&mut self) {
        self.drop_velocity = 0.0;
    }

    /// Advance the pendulum by `dt`. While the drop hop runs, returns the new
    /// vertical position for an entity currently at height `y`.
    pub fn update(&mut self, y: f32, dt: f32, params: &SwayParams) -> Option<f32> {
        let mut new_y = None;

        if !self.dragging {
            self.angular_velocity += -self.rotation * params.restoring_torque * dt;

            if self.just_released {
                self.just_released = false;
                if self.angular_velocity.abs() < params.release_kick_threshold {
                    // Swing away from the side the entity was leaning to.
                    self.angular_velocity += -self.release_tilt.signum() * params.release_kick;
                }
            }

            if self.drop_velocity.abs() > DROP_EPSILON {
                new_y = Some(self.step_drop(y, dt, params));
            } else {
                self.drop_velocity = 0.0;
            }
        }

        self.rotation += self.angular_velocity * dt;
        self.angular_velocity *= params.angular_damping;

        let limit = params.swing_limit();
        self.rotation = self.rotation.clamp(-limit, limit);

        if self.rotation.abs() < params.rest_rotation
            && self.angular_velocity.abs() < params.rest_angular_velocity
        {
            self.rotation = 0.0;
            self.angular_velocity = 0.0;
        }

        new_y
    }

    fn step_drop(&mut self, y: f32, dt: f32, params: &SwayParams) -> f32 {
        self.drop_velocity += params.drop_gravity * dt;
        let mut next = y + self.drop_velocity * dt;
        let ground = self.drop_ground.max(0.0);
        if next <= ground && self.drop_velocity < 0.0 {
            next = ground;
            self.drop_velocity = -self.drop_velocity * params.drop_bounce;
            if self.drop_velocity.abs() < params.drop_settle {
                self.drop_velocity = 0.0;
            }
        }
        next
    }

    fn clear_samples(&mut self) {
        self.samples.iter_mut().for_each(|s| *s = Vec2::ZERO);
        self.next_sample = 0;
    }
}
