use serde::{Deserialize, Serialize};

use crate::geometry::{Vec2, sanitize_dt};

/// Largest time step a single physics integration will take.
///
/// Larger frame deltas are clamped so a body can never cross the whole
/// world in one step.
pub const MAX_PHYSICS_STEP: f32 = 0.1;

/// Tunable constants for ballistic motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Vertical acceleration in units/s² (negative pulls down).
    pub gravity: f32,
    /// Fraction of vertical speed kept after hitting the ground reference.
    pub ground_bounce: f32,
    /// Fraction of speed kept after hitting a world edge.
    pub wall_bounce: f32,
    /// Horizontal speed multiplier applied on every ground bounce.
    pub friction: f32,
    /// Speed below which a bouncing body settles.
    pub settle_speed: f32,
    /// Impacts slower than this are not worth reporting.
    pub impact_threshold: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: -300.0,
            ground_bounce: 0.6,
            wall_bounce: 0.5,
            friction: 0.8,
            settle_speed: 20.0,
            impact_threshold: 50.0,
        }
    }
}

/// What a body collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    /// The ground reference level captured at launch.
    Ground,
    /// The left or right world edge.
    SideWall,
    /// The top world edge.
    Ceiling,
    /// The bottom world edge.
    Floor,
}

/// A collision reported by a physics step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    /// Where the impact happened.
    pub at: Vec2,
    /// Impact speed.
    pub speed: f32,
    /// What was hit.
    pub surface: Surface,
}

/// Result of one integration step.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhysicsStep {
    /// New bottom-left position (not yet clamped by the world).
    pub position: Vec2,
    /// Collisions during this step, in the order they were resolved.
    pub impacts: Vec<Impact>,
    /// Whether the body came to rest during this step.
    pub settled: bool,
}

/// Ballistic motion for one entity: gravity, ground and wall bounces, settling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhysicsBody {
    velocity: Vec2,
    ground: f32,
    active: bool,
}

impl PhysicsBody {
    /// An inactive body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ballistic motion from `from`, using its height as the ground reference.
    pub fn launch(&mut self, velocity: Vec2, from: Vec2) {
        self.launch_with_ground(velocity, from.y);
    }

    /// Start ballistic motion with an explicit ground reference.
    pub fn launch_with_ground(&mut self, velocity: Vec2, ground: f32) {
        self.velocity = velocity;
        self.ground = ground;
        self.active = true;
    }

    /// Stop immediately and zero the velocity.
    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
        self.active = false;
    }

    /// Whether the body is in flight.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current velocity.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Height the body bounces back toward.
    pub fn ground_level(&self) -> f32 {
        self.ground
    }

    /// Advance one step for an entity at `position` with `size`.
    ///
    /// `bounds` enables wall reflections. Returns `None` while inactive or when
    /// the sanitized `dt` is zero.
    pub fn update(
        &mut self,
        position: Vec2,
        size: Vec2,
        bounds: Option<Vec2>,
        dt: f32,
        params: &PhysicsParams,
    ) -> Option<PhysicsStep> {
        if !self.active {
            return None;
        }
        let dt = sanitize_dt(dt, MAX_PHYSICS_STEP);
        if dt == 0.0 {
            return None;
        }

        let mut step = PhysicsStep::default();
        self.velocity.y += params.gravity * dt;
        let mut next = position + self.velocity * dt;

        if let Some(bounds) = bounds {
            self.reflect_off_walls(&mut next, size, bounds, params, &mut step.impacts);
        }

        if next.y <= self.ground && self.velocity.y < 0.0 {
            next.y = self.ground;
            let impact_speed = self.velocity.y.abs();
            self.velocity.y = -self.velocity.y * params.ground_bounce;
            self.velocity.x *= params.friction;
            step.impacts.push(Impact {
                at: Vec2::new(next.x + size.x / 2.0, next.y),
                speed: impact_speed,
                surface: Surface::Ground,
            });

            if self.velocity.y.abs() < params.settle_speed {
                self.velocity.y = 0.0;
                if self.velocity.x.abs() < params.settle_speed {
                    self.velocity.x = 0.0;
                    self.active = false;
                    step.settled = true;
                }
            }
        }

        if bounds.is_some() {
            self.reflect_off_floor(&mut next, size, params, &mut step.impacts);
        }

        step.position = next;
        Some(step)
    }

    fn reflect_off_walls(
        &mut self,
        next: &mut Vec2,
        size: Vec2,
        bounds: Vec2,
        params: &PhysicsParams,
        impacts: &mut Vec<Impact>,
    ) {
        let center = |p: &Vec2| Vec2::new(p.x + size.x / 2.0, p.y + size.y / 2.0);

        if next.x < 0.0 && self.velocity.x < 0.0 {
            next.x = 0.0;
            self.velocity.x = -self.velocity.x * params.wall_bounce;
            impacts.push(Impact {
                at: center(next),
                speed: self.velocity.x.abs(),
                surface: Surface::SideWall,
            });
        } else if next.x + size.x > bounds.x && self.velocity.x > 0.0 {
            next.x = bounds.x - size.x;
            self.velocity.x = -self.velocity.x * params.wall_bounce;
            impacts.push(Impact {
                at: center(next),
                speed: self.velocity.x.abs(),
                surface: Surface::SideWall,
            });
        }

        if next.y + size.y > bounds.y && self.velocity.y > 0.0 {
            next.y = bounds.y - size.y;
            self.velocity.y = -self.velocity.y * params.wall_bounce;
            impacts.push(Impact {
                at: center(next),
                speed: self.velocity.y.abs(),
                surface: Surface::Ceiling,
            });
        }
    }

    /// Reflect off the bottom edge. Only reachable when the ground reference
    /// sits below the world, since the ground bounce resolves first.
    fn reflect_off_floor(
        &mut self,
        next: &mut Vec2,
        size: Vec2,
        params: &PhysicsParams,
        impacts: &mut Vec<Impact>,
    ) {
        if next.y < 0.0 && self.velocity.y < 0.0 {
            next.y = 0.0;
            self.velocity.y = -self.velocity.y * params.wall_bounce;
            impacts.push(Impact {
                at: Vec2::new(next.x + size.x / 2.0, size.y / 2.0),
                speed: self.velocity.y.abs(),
                surface: Surface::Floor,
            });
        }
    }
}
