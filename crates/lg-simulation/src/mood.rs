use lg_core::{EntityId, Mood, MoodBubble};
use log::trace;

use crate::context::SimContext;
use crate::event::SimEventKind;

/// A mood an actor may show on a transition, with its likelihood and
/// display time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoodCue {
    /// What is shown.
    pub mood: Mood,
    /// Probability of showing it at all.
    pub chance: f32,
    /// How long it stays up.
    pub duration: f32,
}

impl MoodCue {
    const fn new(mood: Mood, chance: f32, duration: f32) -> Self {
        Self {
            mood,
            chance,
            duration,
        }
    }

    /// The same cue with another duration.
    pub fn lasting(self, duration: f32) -> Self {
        Self { duration, ..self }
    }
}

/// Setting off on a walk.
pub const WALKING: MoodCue = MoodCue::new(Mood::Wandering, 0.1, 1.5);
/// Going idle with a ball in hand.
pub const IDLE_WITH_BALL: MoodCue = MoodCue::new(Mood::Thoughtful, 0.1, 2.0);
/// Going idle empty-handed.
pub const IDLE: MoodCue = MoodCue::new(Mood::Sleepy, 0.05, 2.0);
/// Starting to ponder. Duration is replaced by the dwell time.
pub const PONDERING: MoodCue = MoodCue::new(Mood::Thoughtful, 0.6, 0.0);
/// Throwing the ball.
pub const THROWING: MoodCue = MoodCue::new(Mood::Excited, 0.9, 1.0);
/// Catching a ball.
pub const CATCHING: MoodCue = MoodCue::new(Mood::Excited, 0.8, 1.5);
/// Being picked up by the player.
pub const PICKED_UP: MoodCue = MoodCue::new(Mood::Confused, 0.7, 1.0);
/// Scooped up by a dragged bed.
pub const CARRIED: MoodCue = MoodCue::new(Mood::Excited, 0.9, 2.0);
/// Falling asleep in a bed. Duration is replaced by the sleep time.
pub const SLEEPING: MoodCue = MoodCue::new(Mood::Sleepy, 1.0, 0.0);

/// Roll `cue` for `actor` and show the bubble if it comes up, replacing any
/// bubble already showing.
pub fn offer(ctx: &mut SimContext<'_>, actor: EntityId, cue: MoodCue) {
    if !ctx.chance(cue.chance) {
        return;
    }
    let Some(component) = ctx
        .world
        .get_entity_mut(actor)
        .and_then(|e| e.components.actor.as_mut())
    else {
        return;
    };
    component.mood = Some(MoodBubble::new(cue.mood, cue.duration));
    trace!("{actor} shows {}", cue.mood);
    ctx.emit(
        SimEventKind::MoodShown {
            entity: actor,
            mood: cue.mood,
        },
        format!("{actor} thinks \"{}\"", cue.mood),
    );
}
