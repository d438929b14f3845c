//! Tick-based simulation for LittleGuy.
//!
//! Drives a [`lg_core::World`] of actors, balls, and beds: per-tick motion,
//! the actor and ball state machines, proximity pickups, and the holding
//! relationship that ties them together. Pointer dragging enters through
//! [`Simulation::begin_drag`], [`Simulation::drag_to`], and
//! [`Simulation::end_drag`]. All randomness comes from one seeded RNG, so a
//! run is reproducible from its [`SimConfig`].

/// Actor state machine and the actor update phase.
pub mod actor;
/// Ball lifecycle and the catch glide.
pub mod ball;
/// Bed occupancy helpers and the bed update phase.
pub mod bed;
/// Simulation clock for tracking ticks and elapsed time.
pub mod clock;
/// Configuration types for simulation runs.
pub mod config;
/// Mutable context passed to systems each tick.
pub mod context;
/// Pointer picking, dragging, and release throws.
pub mod drag;
/// Error types for the simulation crate.
pub mod error;
/// Simulation event types and the event log.
pub mod event;
/// The holder/held protocol and the holding sync phase.
pub mod holding;
/// Proximity-driven pickups.
pub mod interaction;
/// Thought-bubble cues.
pub mod mood;
/// Ballistic motion, sway, and drop hops.
pub mod motion;
/// Top-level simulation orchestrator.
pub mod simulation;
/// The trait that all simulation systems implement.
pub mod system;
/// Read-only draw snapshots.
pub mod view;

/// Re-export of [`clock::SimClock`].
pub use clock::SimClock;
/// Re-exports of the configuration types.
pub use config::{ActorTuning, BallTuning, BedTuning, InteractionTuning, Range, SimConfig};
/// Re-export of [`context::SimContext`].
pub use context::SimContext;
/// Re-export of [`drag::ActiveDrag`].
pub use drag::ActiveDrag;
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], and [`event::SimEventKind`].
pub use event::{EventLog, SimEvent, SimEventKind};
/// Re-export of [`simulation::Simulation`].
pub use simulation::Simulation;
/// Re-export of [`system::System`].
pub use system::System;
/// Re-exports of the draw snapshot types.
pub use view::{EntityView, VisualTag};
