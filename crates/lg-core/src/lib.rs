//! Core types for LittleGuy: entities, motion components, the holding
//! relationship, and the world model.
//!
//! This crate holds data and per-entity mechanics only. Behaviour that spans
//! several entities (state machines, snapping, dragging) lives in
//! `lg-simulation`.

/// Behaviour components attached to entities (actor and ball state).
pub mod component;
/// Entity identifiers, kinds, and the entity record.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Vectors, rectangles, and time-step sanitising.
pub mod geometry;
/// The one-to-one holder/held relationship table.
pub mod holding;
/// Ballistic motion with ground and wall bounces.
pub mod physics;
/// Pendulum sway and drag-velocity smoothing.
pub mod sway;
/// The world model that owns entities and the holding table.
pub mod world;

/// Re-export component types.
pub use component::{
    ActorComponent, ActorState, BallComponent, BallState, ComponentSet, Mood, MoodBubble,
};
/// Re-export core entity types.
pub use entity::{Entity, EntityId, EntityKind, Layer};
/// Re-export error types.
pub use error::{LgError, LgResult};
/// Re-export geometry types.
pub use geometry::{Rect, Vec2};
/// Re-export holding types.
pub use holding::{HoldPair, HoldingTable, Transfer};
/// Re-export physics types.
pub use physics::{Impact, PhysicsBody, PhysicsParams, Surface};
/// Re-export sway types.
pub use sway::{DragSway, SwayParams};
/// Re-export the world model.
pub use world::World;
