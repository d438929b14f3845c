use std::fmt;

use lg_core::{ActorState, BallState, EntityId, EntityKind, Mood, Surface, Vec2};

/// What kind of simulation event occurred.
///
/// Besides serving as an audit trail, `Impact` and `Trail` are the hooks a
/// renderer uses to spawn cosmetic particles.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEventKind {
    // Lifecycle
    /// An entity was added.
    Spawned {
        /// The new entity.
        entity: EntityId,
        /// Its kind.
        kind: EntityKind,
    },
    /// An entity was removed.
    Despawned {
        /// The removed entity.
        entity: EntityId,
    },

    // State machines
    /// An actor switched behavioural state.
    ActorStateChanged {
        /// The actor.
        entity: EntityId,
        /// The previous state.
        from: ActorState,
        /// The new state.
        to: ActorState,
    },
    /// A ball switched lifecycle state.
    BallStateChanged {
        /// The ball.
        entity: EntityId,
        /// The previous state.
        from: BallState,
        /// The new state.
        to: BallState,
    },
    /// An actor showed a thought bubble.
    MoodShown {
        /// The actor.
        entity: EntityId,
        /// What it is thinking.
        mood: Mood,
    },

    // Holding
    /// A holding relationship was formed.
    HoldingStarted {
        /// The entity doing the holding.
        holder: EntityId,
        /// The entity being held.
        held: EntityId,
    },
    /// A holding relationship was severed.
    HoldingEnded {
        /// The former holder.
        holder: EntityId,
        /// The formerly held entity.
        held: EntityId,
    },

    // Motion
    /// An entity was launched into ballistic flight.
    Thrown {
        /// The launched entity.
        entity: EntityId,
        /// Launch velocity.
        velocity: Vec2,
    },
    /// A flying entity hit something hard enough to raise dust.
    Impact {
        /// The entity that hit.
        entity: EntityId,
        /// Where it hit.
        at: Vec2,
        /// Impact speed.
        speed: f32,
        /// What it hit.
        surface: Surface,
    },
    /// A walking actor left a footstep.
    Trail {
        /// The walking actor.
        entity: EntityId,
        /// Where the footstep is.
        at: Vec2,
        /// Unit direction of travel.
        heading: Vec2,
    },

    // Input
    /// The pointer picked an entity up.
    DragStarted {
        /// The dragged entity.
        entity: EntityId,
    },
    /// The pointer let an entity go.
    DragEnded {
        /// The released entity.
        entity: EntityId,
    },
}

impl SimEventKind {
    /// Check whether a given entity is involved in this event.
    pub fn involves(&self, id: EntityId) -> bool {
        match self {
            Self::Spawned { entity, .. }
            | Self::Despawned { entity }
            | Self::ActorStateChanged { entity, .. }
            | Self::BallStateChanged { entity, .. }
            | Self::MoodShown { entity, .. }
            | Self::Thrown { entity, .. }
            | Self::Impact { entity, .. }
            | Self::Trail { entity, .. }
            | Self::DragStarted { entity }
            | Self::DragEnded { entity } => *entity == id,
            Self::HoldingStarted { holder, held } | Self::HoldingEnded { holder, held } => {
                *holder == id || *held == id
            }
        }
    }

    /// Short machine-friendly label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Spawned { .. } => "spawned",
            Self::Despawned { .. } => "despawned",
            Self::ActorStateChanged { .. } => "actor-state",
            Self::BallStateChanged { .. } => "ball-state",
            Self::MoodShown { .. } => "mood",
            Self::HoldingStarted { .. } => "hold",
            Self::HoldingEnded { .. } => "release",
            Self::Thrown { .. } => "thrown",
            Self::Impact { .. } => "impact",
            Self::Trail { .. } => "trail",
            Self::DragStarted { .. } => "drag-start",
            Self::DragEnded { .. } => "drag-end",
        }
    }

    /// Whether this is a high-frequency cosmetic event (impacts, footsteps).
    pub fn is_cosmetic(&self) -> bool {
        matches!(self, Self::Impact { .. } | Self::Trail { .. })
    }
}

impl fmt::Display for SimEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A record of something that happened during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    /// The simulation tick when this event occurred.
    pub tick: u64,
    /// The specific kind of event that occurred.
    pub kind: SimEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl SimEvent {
    /// Create a new simulation event with the given tick, kind, and description.
    pub fn new(tick: u64, kind: SimEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates events during a simulation run.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
    max_events: usize,
    total: u64,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
            total: 0,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
        self.total += 1;
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all retained events.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Return all events that occurred at the given tick.
    pub fn events_at_tick(&self, tick: u64) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.tick == tick).collect()
    }

    /// Return all events involving the given entity.
    pub fn events_for_entity(&self, id: EntityId) -> Vec<&SimEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// Events pushed after the first `from` ever recorded, as long as they
    /// are still retained. Lets a frame loop pick up only what is new.
    pub fn since(&self, from: u64) -> &[SimEvent] {
        let dropped = self.total - self.events.len() as u64;
        let skip = from.saturating_sub(dropped).min(self.events.len() as u64) as usize;
        &self.events[skip..]
    }

    /// Number of events ever pushed, including trimmed ones.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Return the number of retained events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events are retained.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all retained events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drag(entity: EntityId) -> SimEventKind {
        SimEventKind::DragStarted { entity }
    }

    #[test]
    fn event_log_push_and_query() {
        let mut log = EventLog::new(0);
        let id = EntityId(0);
        log.push(SimEvent::new(1, drag(id), "test"));
        assert_eq!(log.len(), 1);
        assert_eq!(log.events_at_tick(1).len(), 1);
        assert_eq!(log.events_for_entity(id).len(), 1);
        assert!(log.events_for_entity(EntityId(1)).is_empty());
    }

    #[test]
    fn event_log_max_events_trims() {
        let mut log = EventLog::new(2);
        for i in 0..5 {
            log.push(SimEvent::new(i, drag(EntityId(0)), "test"));
        }
        assert_eq!(log.len(), 2);
        assert_eq!(log.total(), 5);
        assert_eq!(log.events()[0].tick, 3);
        assert_eq!(log.events()[1].tick, 4);
    }

    #[test]
    fn holding_events_involve_both_sides() {
        let kind = SimEventKind::HoldingStarted {
            holder: EntityId(0),
            held: EntityId(1),
        };
        assert!(kind.involves(EntityId(0)));
        assert!(kind.involves(EntityId(1)));
        assert!(!kind.involves(EntityId(2)));
    }

    #[test]
    fn since_returns_only_new_events() {
        let mut log = EventLog::new(0);
        log.push(SimEvent::new(1, drag(EntityId(0)), "a"));
        let seen = log.total();
        log.push(SimEvent::new(2, drag(EntityId(0)), "b"));
        let fresh = log.since(seen);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].description, "b");
    }

    #[test]
    fn since_survives_trimming() {
        let mut log = EventLog::new(2);
        for i in 0..4 {
            log.push(SimEvent::new(i, drag(EntityId(0)), "x"));
        }
        assert_eq!(log.since(0).len(), 2);
        assert_eq!(log.since(3).len(), 1);
        assert!(log.since(10).is_empty());
    }

    #[test]
    fn cosmetic_events_flagged() {
        let trail = SimEventKind::Trail {
            entity: EntityId(0),
            at: Vec2::ZERO,
            heading: Vec2::new(1.0, 0.0),
        };
        assert!(trail.is_cosmetic());
        assert!(!drag(EntityId(0)).is_cosmetic());
        assert_eq!(trail.label(), "trail");
    }

    #[test]
    fn event_log_clear() {
        let mut log = EventLog::new(0);
        log.push(SimEvent::new(1, drag(EntityId(0)), "test"));
        assert!(!log.is_empty());
        log.clear();
        assert!(log.is_empty());
    }
}
