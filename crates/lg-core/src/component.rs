use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;
use crate::physics::PhysicsBody;
use crate::sway::DragSway;

/// The set of components attached to an entity.
/// Each entity kind carries its own behaviour component, but any combination is allowed.
#[derive(Debug, Clone, Default)]
pub struct ComponentSet {
    /// Ballistic motion.
    pub physics: Option<PhysicsBody>,
    /// Pendulum sway and drag tracking.
    pub sway: Option<DragSway>,
    /// Little-guy behaviour state.
    pub actor: Option<ActorComponent>,
    /// Ball lifecycle state.
    pub ball: Option<BallComponent>,
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// Behavioural state of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorState {
    /// Standing around until the dwell time runs out.
    Idle,
    /// Heading for a random target point.
    Walking,
    /// Thinking for a while. No map interaction.
    Pondering,
    /// Short animation after releasing the carried ball.
    Throwing,
    /// Held by the pointer.
    PickedUp,
    /// Held by a bed.
    SleepingInBed,
    /// Riding along on a bed the player is dragging.
    CarriedByBed,
}

impl fmt::Display for ActorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Walking => write!(f, "walking"),
            Self::Pondering => write!(f, "pondering"),
            Self::Throwing => write!(f, "throwing"),
            Self::PickedUp => write!(f, "picked up"),
            Self::SleepingInBed => write!(f, "sleeping in bed"),
            Self::CarriedByBed => write!(f, "carried by bed"),
        }
    }
}

/// A short piece of thought text shown above an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    /// "zzz"
    Sleepy,
    /// "!"
    Excited,
    /// "?"
    Confused,
    /// "hmm"
    Thoughtful,
    /// "..."
    Wandering,
}

impl Mood {
    /// The text drawn for this mood.
    pub fn text(self) -> &'static str {
        match self {
            Self::Sleepy => "zzz",
            Self::Excited => "!",
            Self::Confused => "?",
            Self::Thoughtful => "hmm",
            Self::Wandering => "...",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// A visible mood with its remaining display time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodBubble {
    /// What is shown.
    pub mood: Mood,
    /// Total display time in seconds.
    pub duration: f32,
    /// Seconds left before the bubble disappears.
    pub remaining: f32,
}

impl MoodBubble {
    /// A fresh bubble shown for `duration` seconds.
    pub fn new(mood: Mood, duration: f32) -> Self {
        Self {
            mood,
            duration,
            remaining: duration,
        }
    }

    /// Opacity in `[0, 1]`: fully visible for the first 70% of the
    /// duration, then fading out linearly.
    pub fn opacity(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        let elapsed = self.duration - self.remaining;
        let fade_start = self.duration * 0.7;
        if elapsed <= fade_start {
            1.0
        } else {
            (1.0 - (elapsed - fade_start) / (self.duration * 0.3)).clamp(0.0, 1.0)
        }
    }
}

/// Per-actor behaviour state.
///
/// The held ball and the occupied bed are not stored here; they live in the
/// world's [`crate::HoldingTable`].
#[derive(Debug, Clone)]
pub struct ActorComponent {
    /// Current behavioural state.
    pub state: ActorState,
    /// Seconds spent in the current state.
    pub state_timer: f32,
    /// Randomized dwell time for timer-driven states.
    pub dwell: f32,
    /// Where a walking actor is headed.
    pub walk_target: Vec2,
    /// Seconds before the actor may catch a ball again.
    pub pickup_cooldown: f32,
    /// Seconds before the actor may seek a bed again.
    pub bed_cooldown: f32,
    /// Whether trail notifications are emitted.
    pub trail_active: bool,
    /// Seconds until the next trail notification.
    pub trail_timer: f32,
    /// Visible thought text, if any.
    pub mood: Option<MoodBubble>,
}

impl ActorComponent {
    /// A fresh idle actor that will decide after `dwell` seconds.
    pub fn new(dwell: f32) -> Self {
        Self {
            state: ActorState::Idle,
            state_timer: 0.0,
            dwell,
            walk_target: Vec2::ZERO,
            pickup_cooldown: 0.0,
            bed_cooldown: 0.0,
            trail_active: false,
            trail_timer: 0.0,
            mood: None,
        }
    }

    /// Switch to `state` and restart the state timer. Returns the previous state.
    pub fn enter(&mut self, state: ActorState, dwell: f32) -> ActorState {
        let previous = self.state;
        self.state = state;
        self.state_timer = 0.0;
        self.dwell = dwell;
        previous
    }

    /// Count both cooldowns down, never below zero.
    pub fn tick_cooldowns(&mut self, dt: f32) {
        self.pickup_cooldown = (self.pickup_cooldown - dt).max(0.0);
        self.bed_cooldown = (self.bed_cooldown - dt).max(0.0);
    }

    /// Age the mood bubble, dropping it once expired.
    pub fn tick_mood(&mut self, dt: f32) {
        if let Some(bubble) = &mut self.mood {
            bubble.remaining -= dt;
            if bubble.remaining <= 0.0 {
                self.mood = None;
            }
        }
    }

    /// Whether this actor's state allows it to take a ball.
    pub fn is_receptive(&self) -> bool {
        matches!(
            self.state,
            ActorState::Idle | ActorState::Walking | ActorState::Pondering
        )
    }

    /// Whether actor-initiated ball pickup is suppressed in the current state.
    pub fn skips_ball_pickup(&self) -> bool {
        matches!(
            self.state,
            ActorState::PickedUp
                | ActorState::Throwing
                | ActorState::Pondering
                | ActorState::SleepingInBed
                | ActorState::CarriedByBed
        ) || self.pickup_cooldown > 0.0
    }
}

// ---------------------------------------------------------------------------
// Ball
// ---------------------------------------------------------------------------

/// Lifecycle state of a ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallState {
    /// Lying around or flying; eligible for pickup.
    Free,
    /// Held by the pointer.
    PickedUp,
    /// Gliding into a holder's hand.
    BeingCaught,
    /// Attached to a holder.
    Carried,
}

impl fmt::Display for BallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => write!(f, "free"),
            Self::PickedUp => write!(f, "picked up"),
            Self::BeingCaught => write!(f, "being caught"),
            Self::Carried => write!(f, "carried"),
        }
    }
}

/// Progress of a catch animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatchTransition {
    /// Seconds since the catch began.
    pub elapsed: f32,
    /// Where the ball was when the catch began.
    pub start: Vec2,
}

/// Per-ball lifecycle state. The carrier lives in the holding table.
#[derive(Debug, Clone)]
pub struct BallComponent {
    /// Current lifecycle state.
    pub state: BallState,
    /// Set while `state` is [`BallState::BeingCaught`].
    pub catch: Option<CatchTransition>,
}

impl Default for BallComponent {
    fn default() -> Self {
        Self {
            state: BallState::Free,
            catch: None,
        }
    }
}

impl BallComponent {
    /// Switch to `state`, clearing any catch animation unless entering
    /// [`BallState::BeingCaught`]. Returns the previous state.
    pub fn enter(&mut self, state: BallState) -> BallState {
        let previous = self.state;
        self.state = state;
        if state != BallState::BeingCaught {
            self.catch = None;
        }
        previous
    }

    /// Start the catch animation from `start`.
    pub fn begin_catch(&mut self, start: Vec2) -> BallState {
        let previous = self.enter(BallState::BeingCaught);
        self.catch = Some(CatchTransition {
            elapsed: 0.0,
            start,
        });
        previous
    }
}
