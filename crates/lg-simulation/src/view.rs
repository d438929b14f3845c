use lg_core::{ActorState, BallState, EntityId, EntityKind, Layer, MoodBubble, Vec2, World};

/// How an entity should look this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualTag {
    /// An actor on its feet.
    ActorAwake,
    /// An actor dangling from the pointer or riding a dragged bed.
    ActorLifted,
    /// An actor asleep in a bed.
    ActorAsleep,
    /// A ball lying or flying free.
    BallFree,
    /// A ball held by the pointer.
    BallLifted,
    /// A ball in, or on its way into, an actor's hand.
    BallCarried,
    /// A bed with nobody in it.
    BedEmpty,
    /// A bed with a sleeper.
    BedOccupied,
}

/// A read-only snapshot of one entity for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityView {
    /// The entity.
    pub id: EntityId,
    /// Its kind.
    pub kind: EntityKind,
    /// Bottom-left corner.
    pub position: Vec2,
    /// Width and height.
    pub size: Vec2,
    /// Sway rotation in radians, about the centre.
    pub rotation: f32,
    /// Draw layer.
    pub layer: Layer,
    /// Appearance.
    pub tag: VisualTag,
    /// Thought bubble, if one is showing.
    pub mood: Option<MoodBubble>,
}

/// Snapshot every entity, ordered back to front (layer, then id).
pub fn views(world: &World) -> Vec<EntityView> {
    let mut views: Vec<EntityView> = world
        .entities()
        .map(|entity| {
            let tag = match entity.kind {
                EntityKind::Actor => match entity.components.actor.as_ref().map(|a| a.state) {
                    Some(ActorState::PickedUp | ActorState::CarriedByBed) => {
                        VisualTag::ActorLifted
                    }
                    Some(ActorState::SleepingInBed) => VisualTag::ActorAsleep,
                    _ => VisualTag::ActorAwake,
                },
                EntityKind::Ball => match entity.components.ball.as_ref().map(|b| b.state) {
                    Some(BallState::PickedUp) => VisualTag::BallLifted,
                    Some(BallState::BeingCaught | BallState::Carried) => VisualTag::BallCarried,
                    _ => VisualTag::BallFree,
                },
                EntityKind::Bed if world.holding().is_holding(entity.id) => {
                    VisualTag::BedOccupied
                }
                EntityKind::Bed => VisualTag::BedEmpty,
            };
            EntityView {
                id: entity.id,
                kind: entity.kind,
                position: entity.position(),
                size: entity.size,
                rotation: entity.rotation(),
                layer: entity.layer,
                tag,
                mood: entity.components.actor.as_ref().and_then(|a| a.mood),
            }
        })
        .collect();
    views.sort_by_key(|v| (v.layer, v.id));
    views
}
