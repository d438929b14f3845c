//! Cosmetic dust and footstep particles.
//!
//! Particles never feed back into the simulation. They are spawned from
//! `Impact` and `Trail` events and live in world space (y-up).

use lg_core::Vec2;
use lg_simulation::{SimEvent, SimEventKind};
use rand::Rng;

const GRAVITY: f32 = -120.0;
const BOUNCE_DAMPING: f32 = 0.3;
const REST_SPEED: f32 = 10.0;
const GROUND_FRICTION: f32 = 0.8;
const GROUND_JITTER: f32 = 20.0;

const DUST_PER_SPEED: f32 = 150.0;
const MAX_DUST: usize = 2;
const DUST_SPREAD: f32 = 15.0;
const DUST_VERTICAL_SPREAD: f32 = 8.0;
const DUST_SPEED: (f32, f32) = (25.0, 60.0);
const DUST_LIFETIME: (f32, f32) = (0.6, 0.9);

const TRAIL_SPREAD: f32 = 16.0;
const TRAIL_LIFT: f32 = 10.0;
const TRAIL_BACKWARD_SPEED: f32 = 24.0;
const TRAIL_UPWARD_SPEED: f32 = 60.0;
const TRAIL_LIFETIME: f32 = 2.0;

/// What raised a particle; picks its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    /// Kicked up by an impact.
    Dust,
    /// Left behind by a walking actor.
    Trail,
}

/// A single square speck.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Centre, in world space.
    pub position: Vec2,
    /// Velocity in units per second.
    pub velocity: Vec2,
    /// Seconds left to live.
    pub lifetime: f32,
    /// Starting lifetime, for fading.
    pub max_lifetime: f32,
    /// Edge length.
    pub size: f32,
    /// Dust or trail.
    pub kind: ParticleKind,
    ground: f32,
}

impl Particle {
    /// Opacity scale in `[0, 1]`, fading linearly over the lifetime.
    pub fn alpha(&self) -> f32 {
        if self.max_lifetime <= 0.0 {
            return 0.0;
        }
        (self.lifetime / self.max_lifetime).clamp(0.0, 1.0)
    }

    /// Whether the particle should still be drawn.
    pub fn is_alive(&self) -> bool {
        self.lifetime > 0.0
    }

    fn update(&mut self, dt: f32) {
        self.velocity.y += GRAVITY * dt;
        self.position.x += self.velocity.x * dt;
        self.position.y += self.velocity.y * dt;

        if self.position.y <= self.ground && self.velocity.y < 0.0 {
            self.position.y = self.ground;
            self.velocity.y = -self.velocity.y * BOUNCE_DAMPING;
            if self.velocity.y.abs() < REST_SPEED {
                self.velocity.y = 0.0;
            }
            self.velocity.x *= GROUND_FRICTION;
        }

        self.lifetime -= dt;
    }
}

/// Owns every live particle.
#[derive(Debug, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    /// An empty system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn particles for every cosmetic event in `events`.
    pub fn absorb(&mut self, events: &[SimEvent], rng: &mut impl Rng) {
        for event in events {
            match event.kind {
                SimEventKind::Impact { at, speed, .. } => self.spawn_dust(at, speed, rng),
                SimEventKind::Trail { at, heading, .. } => self.spawn_trail(at, heading, rng),
                _ => {}
            }
        }
    }

    /// A puff of dust at `at`, bigger for harder hits.
    pub fn spawn_dust(&mut self, at: Vec2, speed: f32, rng: &mut impl Rng) {
        let count = (1 + (speed / DUST_PER_SPEED) as usize).min(MAX_DUST);
        for _ in 0..count {
            let angle = rng.random::<f32>() * std::f32::consts::TAU;
            let speed = lerp(DUST_SPEED, rng.random());
            let position = Vec2::new(
                at.x + (rng.random::<f32>() - 0.5) * DUST_SPREAD,
                at.y + (rng.random::<f32>() - 0.5) * DUST_VERTICAL_SPREAD,
            );
            // Mostly upward.
            let velocity = Vec2::new(angle.cos() * speed, angle.sin().abs() * speed * 0.4);
            let lifetime = lerp(DUST_LIFETIME, rng.random());
            self.push(position, velocity, lifetime, ParticleKind::Dust, rng);
        }
    }

    /// One footstep speck behind a walker heading along `heading`.
    pub fn spawn_trail(&mut self, at: Vec2, heading: Vec2, rng: &mut impl Rng) {
        let position = Vec2::new(
            at.x + (rng.random::<f32>() - 0.5) * TRAIL_SPREAD,
            at.y + rng.random::<f32>() * TRAIL_LIFT,
        );
        let velocity = Vec2::new(
            -heading.x * TRAIL_BACKWARD_SPEED + (rng.random::<f32>() - 0.5) * 40.0,
            TRAIL_UPWARD_SPEED + (rng.random::<f32>() - 0.5) * 20.0,
        );
        self.push(position, velocity, TRAIL_LIFETIME, ParticleKind::Trail, rng);
    }

    fn push(
        &mut self,
        position: Vec2,
        velocity: Vec2,
        lifetime: f32,
        kind: ParticleKind,
        rng: &mut impl Rng,
    ) {
        let ground = (position.y + (rng.random::<f32>() - 0.5) * GROUND_JITTER).max(0.0);
        let size = if rng.random::<bool>() { 2.0 } else { 3.0 };
        self.particles.push(Particle {
            position,
            velocity,
            lifetime,
            max_lifetime: lifetime,
            size,
            kind,
            ground,
        });
    }

    /// Advance every particle and drop the dead ones.
    pub fn update(&mut self, dt: f32) {
        for particle in &mut self.particles {
            particle.update(dt);
        }
        self.particles.retain(Particle::is_alive);
    }

    /// Live particles, oldest first.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether there are no live particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

fn lerp((min, max): (f32, f32), t: f32) -> f32 {
    min + (max - min) * t
}
