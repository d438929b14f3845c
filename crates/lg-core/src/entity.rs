use std::fmt;

use serde::{Deserialize, Serialize};

use crate::component::ComponentSet;
use crate::geometry::{Rect, Vec2};

/// Arena index identifying an entity within one [`crate::World`].
///
/// Ids are handed out in insertion order and never reused, so ordering by id
/// is the deterministic per-tick entity order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Id carried by an entity that has not been added to a world yet.
    pub const UNASSIGNED: Self = Self(u32::MAX);

    /// Arena slot of this id.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::UNASSIGNED {
            write!(f, "e?")
        } else {
            write!(f, "e{}", self.0)
        }
    }
}

/// The kind of an entity. Determines which components and roles it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// An autonomous little guy.
    Actor,
    /// A throwable ball.
    Ball,
    /// A bed an actor can sleep in.
    Bed,
}

impl EntityKind {
    /// Returns true if an entity of this kind may hold an entity of kind `other`.
    ///
    /// Actors carry balls and beds hold sleeping actors; nothing else pairs up.
    pub fn can_carry(self, other: EntityKind) -> bool {
        matches!(
            (self, other),
            (EntityKind::Actor, EntityKind::Ball) | (EntityKind::Bed, EntityKind::Actor)
        )
    }

    /// Draw layer used by renderers.
    pub fn default_layer(self) -> Layer {
        match self {
            EntityKind::Bed => Layer::Back,
            EntityKind::Actor => Layer::Middle,
            EntityKind::Ball => Layer::Front,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actor => write!(f, "actor"),
            Self::Ball => write!(f, "ball"),
            Self::Bed => write!(f, "bed"),
        }
    }
}

/// Z-order bucket for draw layering. Not used by simulation logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// Drawn first (beds).
    Back,
    /// Drawn between back and front (actors).
    Middle,
    /// Drawn last (balls).
    Front,
}

/// A world object: a rectangle with a kind and optional components.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Arena id, assigned when the entity is added to a world.
    pub id: EntityId,
    /// The kind of this entity.
    pub kind: EntityKind,
    /// Display name.
    pub name: String,
    position: Vec2,
    /// Width and height.
    pub size: Vec2,
    /// Draw layer.
    pub layer: Layer,
    /// Behaviour and motion components attached to this entity.
    pub components: ComponentSet,
}

impl Entity {
    /// Create an unplaced entity at the origin with zero size.
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            kind,
            name: name.into(),
            position: Vec2::ZERO,
            size: Vec2::ZERO,
            layer: kind.default_layer(),
            components: ComponentSet::default(),
        }
    }

    /// Set the initial (unclamped) position. The world clamps it on insertion.
    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    /// Set the size.
    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }

    /// Replace the component set.
    pub fn with_components(mut self, components: ComponentSet) -> Self {
        self.components = components;
        self
    }

    /// Bottom-left corner.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Bounding rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    /// Centre of the bounding rectangle.
    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Whether `point` lies on this entity.
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.rect().contains(point)
    }

    /// Current sway rotation in radians, zero for entities without sway.
    pub fn rotation(&self) -> f32 {
        self.components
            .sway
            .as_ref()
            .map(|s| s.rotation())
            .unwrap_or(0.0)
    }

    /// Whether the entity is currently being dragged by the pointer.
    pub fn is_dragged(&self) -> bool {
        self.components
            .sway
            .as_ref()
            .is_some_and(|s| s.is_dragging())
    }

    /// Whether the entity is in ballistic flight.
    pub fn has_active_physics(&self) -> bool {
        self.components
            .physics
            .as_ref()
            .is_some_and(|p| p.is_active())
    }

    /// Clamp `position` into `[0, bounds - size]` and store it.
    pub(crate) fn place(&mut self, position: Vec2, bounds: Vec2) -> Vec2 {
        self.position = clamp_to_bounds(position, self.size, bounds);
        self.position
    }
}

/// Clamp a bottom-left position so a rectangle of `size` stays inside `bounds`.
///
/// Non-finite input components collapse to zero.
pub fn clamp_to_bounds(position: Vec2, size: Vec2, bounds: Vec2) -> Vec2 {
    let max_x = (bounds.x - size.x).max(0.0);
    let max_y = (bounds.y - size.y).max(0.0);
    let x = if position.x.is_finite() { position.x } else { 0.0 };
    let y = if position.y.is_finite() { position.y } else { 0.0 };
    Vec2::new(x.clamp(0.0, max_x), y.clamp(0.0, max_y))
}
