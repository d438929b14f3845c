use crate::entity::{Entity, EntityId, EntityKind};
use crate::error::{LgError, LgResult};
use crate::geometry::Vec2;
use crate::holding::{HoldPair, HoldingTable};

/// The central world model. Owns every entity and the holding table.
///
/// Entities live in an arena indexed by [`EntityId`]; slots of removed
/// entities stay empty so ids are never reused.
#[derive(Debug, Clone)]
pub struct World {
    width: f32,
    height: f32,
    entities: Vec<Option<Entity>>,
    holding: HoldingTable,
}

impl World {
    /// An empty world of the given size.
    pub fn new(width: f32, height: f32) -> LgResult<Self> {
        let bounds = Vec2::new(width, height);
        if !bounds.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(LgError::InvalidBounds(bounds));
        }
        Ok(Self {
            width,
            height,
            entities: Vec::new(),
            holding: HoldingTable::new(),
        })
    }

    /// World width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// World height.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// World size as a vector.
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    // -----------------------------------------------------------------------
    // Entity CRUD
    // -----------------------------------------------------------------------

    /// Add an entity, clamping its position into bounds. Returns the new id.
    pub fn add_entity(&mut self, mut entity: Entity) -> LgResult<EntityId> {
        if entity.size.x > self.width || entity.size.y > self.height || !entity.size.is_finite()
        {
            return Err(LgError::DoesNotFit {
                name: entity.name,
                size: entity.size,
                bounds: self.bounds(),
            });
        }

        let id = EntityId(self.entities.len() as u32);
        entity.id = id;
        let requested = entity.position();
        entity.place(requested, self.bounds());
        self.entities.push(Some(entity));
        Ok(id)
    }

    /// Remove an entity and every holding pair it takes part in.
    pub fn remove_entity(&mut self, id: EntityId) -> LgResult<(Entity, Vec<HoldPair>)> {
        let entity = self
            .entities
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(LgError::EntityNotFound(id))?;
        let released = self.holding.remove_entity(id);
        Ok((entity, released))
    }

    /// Get a reference to an entity by ID.
    pub fn get_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index()).and_then(Option::as_ref)
    }

    /// Get a mutable reference to an entity by ID.
    pub fn get_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Like [`Self::get_entity`], but unknown ids are an error.
    pub fn entity(&self, id: EntityId) -> LgResult<&Entity> {
        self.get_entity(id).ok_or(LgError::EntityNotFound(id))
    }

    /// Like [`Self::get_entity_mut`], but unknown ids are an error.
    pub fn entity_mut(&mut self, id: EntityId) -> LgResult<&mut Entity> {
        self.get_entity_mut(id).ok_or(LgError::EntityNotFound(id))
    }

    /// Whether `id` refers to a live entity.
    pub fn contains(&self, id: EntityId) -> bool {
        self.get_entity(id).is_some()
    }

    /// Move an entity, clamping into bounds. Returns the stored position.
    pub fn set_position(&mut self, id: EntityId, position: Vec2) -> LgResult<Vec2> {
        let bounds = self.bounds();
        let entity = self.entity_mut(id)?;
        Ok(entity.place(position, bounds))
    }

    // -----------------------------------------------------------------------
    // Holding
    // -----------------------------------------------------------------------

    /// The holding relationship table.
    pub fn holding(&self) -> &HoldingTable {
        &self.holding
    }

    /// Mutable access to the holding relationship table.
    pub fn holding_mut(&mut self) -> &mut HoldingTable {
        &mut self.holding
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// All live entities in id order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().flatten()
    }

    /// Ids of all live entities in ascending order.
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entities().map(|e| e.id).collect()
    }

    /// Ids of all live entities of `kind` in ascending order.
    pub fn ids_of_kind(&self, kind: EntityKind) -> Vec<EntityId> {
        self.entities()
            .filter(|e| e.kind == kind)
            .map(|e| e.id)
            .collect()
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.entities().count()
    }

    /// Count live entities of `kind`.
    pub fn count_of_kind(&self, kind: EntityKind) -> usize {
        self.entities().filter(|e| e.kind == kind).count()
    }

    /// Whether the rectangles of `a` and `b` overlap once `a` is grown by `margin`.
    pub fn overlaps(&self, a: EntityId, b: EntityId, margin: f32) -> bool {
        match (self.get_entity(a), self.get_entity(b)) {
            (Some(a), Some(b)) => a.rect().overlaps(&b.rect(), margin),
            _ => false,
        }
    }

    /// The first entity of `kind` (in id order) overlapping `of` within
    /// `margin` that also satisfies `accept`.
    pub fn first_overlapping(
        &self,
        of: EntityId,
        kind: EntityKind,
        margin: f32,
        mut accept: impl FnMut(&Entity) -> bool,
    ) -> Option<EntityId> {
        let subject = self.get_entity(of)?.rect();
        self.entities()
            .filter(|e| e.kind == kind && e.id != of)
            .find(|e| subject.overlaps(&e.rect(), margin) && accept(e))
            .map(|e| e.id)
    }

    /// The entity of `kind` whose centre is nearest to `point`, limited to
    /// `max_distance` and filtered by `accept`. Ties go to the lower id.
    pub fn nearest_of_kind(
        &self,
        point: Vec2,
        kind: EntityKind,
        max_distance: f32,
        mut accept: impl FnMut(&Entity) -> bool,
    ) -> Option<EntityId> {
        let mut best: Option<(f32, EntityId)> = None;
        for entity in self.entities().filter(|e| e.kind == kind) {
            let distance = entity.center().distance(point);
            if distance > max_distance || !accept(entity) {
                continue;
            }
            if best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, entity.id));
            }
        }
        best.map(|(_, id)| id)
    }

    /// Topmost entity of `kind` under `point`: the one with the highest id.
    pub fn topmost_at(&self, point: Vec2, kind: EntityKind) -> Option<EntityId> {
        self.entities()
            .filter(|e| e.kind == kind && e.contains_point(point))
            .map(|e| e.id)
            .last()
    }
}
