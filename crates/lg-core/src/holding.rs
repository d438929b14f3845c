use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// One "holder holds held" edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HoldPair {
    /// The entity doing the holding.
    pub holder: EntityId,
    /// The entity being held.
    pub held: EntityId,
}

impl fmt::Display for HoldPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} holds {}", self.holder, self.held)
    }
}

/// What a successful [`HoldingTable::start_holding`] changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// Pairs severed to make room, in the order they were released.
    pub released: Vec<HoldPair>,
    /// The pair now in place.
    pub attached: HoldPair,
    /// False when the pair already existed and nothing changed.
    pub is_new: bool,
}

/// The holding relationship as an explicit two-way table.
///
/// Every holder holds at most one entity and every entity has at most one
/// holder. Both directions are updated together, so `held_by(h) == Some(x)`
/// exactly when `holder_of(x) == Some(h)`.
#[derive(Debug, Clone, Default)]
pub struct HoldingTable {
    by_holder: BTreeMap<EntityId, EntityId>,
    by_held: BTreeMap<EntityId, EntityId>,
}

impl HoldingTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `holder` may take `held`: no self-holding and no two-node cycle.
    pub fn can_hold(&self, holder: EntityId, held: EntityId) -> bool {
        holder != held && self.by_holder.get(&held) != Some(&holder)
    }

    /// Attach `held` to `holder`, first releasing whatever either side was
    /// attached to. Returns `None` when [`Self::can_hold`] rejects the pair.
    pub fn start_holding(&mut self, holder: EntityId, held: EntityId) -> Option<Transfer> {
        if !self.can_hold(holder, held) {
            return None;
        }
        let attached = HoldPair { holder, held };
        if self.by_holder.get(&holder) == Some(&held) {
            return Some(Transfer {
                released: Vec::new(),
                attached,
                is_new: false,
            });
        }

        let mut released = Vec::new();
        if let Some(pair) = self.release_held(holder) {
            released.push(pair);
        }
        if let Some(pair) = self.release_holder_of(held) {
            released.push(pair);
        }

        self.by_holder.insert(holder, held);
        self.by_held.insert(held, holder);
        Some(Transfer {
            released,
            attached,
            is_new: true,
        })
    }

    /// Sever `holder -> held`. Returns false if that pair was not in place.
    pub fn stop_holding(&mut self, holder: EntityId, held: EntityId) -> bool {
        if self.by_holder.get(&holder) != Some(&held) {
            return false;
        }
        self.by_holder.remove(&holder);
        self.by_held.remove(&held);
        true
    }

    /// Release whatever `holder` holds.
    pub fn release_held(&mut self, holder: EntityId) -> Option<HoldPair> {
        let held = self.by_holder.remove(&holder)?;
        self.by_held.remove(&held);
        Some(HoldPair { holder, held })
    }

    /// Release `held` from whoever holds it.
    pub fn release_holder_of(&mut self, held: EntityId) -> Option<HoldPair> {
        let holder = self.by_held.remove(&held)?;
        self.by_holder.remove(&holder);
        Some(HoldPair { holder, held })
    }

    /// Drop every pair involving `id`.
    pub fn remove_entity(&mut self, id: EntityId) -> Vec<HoldPair> {
        self.release_held(id)
            .into_iter()
            .chain(self.release_holder_of(id))
            .collect()
    }

    /// What `holder` currently holds.
    pub fn held_by(&self, holder: EntityId) -> Option<EntityId> {
        self.by_holder.get(&holder).copied()
    }

    /// Who currently holds `held`.
    pub fn holder_of(&self, held: EntityId) -> Option<EntityId> {
        self.by_held.get(&held).copied()
    }

    /// Whether `holder` holds anything.
    pub fn is_holding(&self, holder: EntityId) -> bool {
        self.by_holder.contains_key(&holder)
    }

    /// Whether `held` has a holder.
    pub fn is_held(&self, held: EntityId) -> bool {
        self.by_held.contains_key(&held)
    }

    /// All pairs, ordered by holder id.
    pub fn pairs(&self) -> impl Iterator<Item = HoldPair> + '_ {
        self.by_holder
            .iter()
            .map(|(&holder, &held)| HoldPair { holder, held })
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.by_holder.len()
    }

    /// Whether no pairs exist.
    pub fn is_empty(&self) -> bool {
        self.by_holder.is_empty()
    }

    /// Check that both directions agree. Always true unless the table was
    /// corrupted from outside this module.
    pub fn is_consistent(&self) -> bool {
        self.by_holder.len() == self.by_held.len()
            && self
                .by_holder
                .iter()
                .all(|(holder, held)| self.by_held.get(held) == Some(holder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const A: EntityId = EntityId(0);
    const B: EntityId = EntityId(1);
    const C: EntityId = EntityId(2);
    const D: EntityId = EntityId(3);

    #[test]
    fn cannot_hold_self() {
        let mut table = HoldingTable::new();
        assert!(!table.can_hold(A, A));
        assert!(table.start_holding(A, A).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn cannot_form_two_cycle() {
        let mut table = HoldingTable::new();
        table.start_holding(B, A).unwrap();
        assert!(!table.can_hold(A, B));
        assert!(table.start_holding(A, B).is_none());
        assert_eq!(table.held_by(B), Some(A));
    }

    #[test]
    fn new_target_releases_previous() {
        let mut table = HoldingTable::new();
        table.start_holding(A, B).unwrap();
        let transfer = table.start_holding(A, C).unwrap();
        assert_eq!(transfer.released, vec![HoldPair { holder: A, held: B }]);
        assert_eq!(table.holder_of(B), None);
        assert_eq!(table.held_by(A), Some(C));
        assert_eq!(table.holder_of(C), Some(A));
    }

    #[test]
    fn stealing_releases_previous_holder() {
        let mut table = HoldingTable::new();
        table.start_holding(A, C).unwrap();
        table.start_holding(B, D).unwrap();
        let transfer = table.start_holding(B, C).unwrap();
        assert_eq!(
            transfer.released,
            vec![
                HoldPair { holder: B, held: D },
                HoldPair { holder: A, held: C }
            ]
        );
        assert!(!table.is_holding(A));
        assert!(!table.is_held(D));
        assert_eq!(table.held_by(B), Some(C));
        assert!(table.is_consistent());
    }

    #[test]
    fn repeated_attach_is_not_new() {
        let mut table = HoldingTable::new();
        assert!(table.start_holding(A, B).unwrap().is_new);
        let again = table.start_holding(A, B).unwrap();
        assert!(!again.is_new);
        assert!(again.released.is_empty());
    }

    #[test]
    fn stop_holding_is_idempotent() {
        let mut table = HoldingTable::new();
        table.start_holding(A, B).unwrap();
        assert!(!table.stop_holding(A, C));
        assert!(table.stop_holding(A, B));
        assert!(!table.stop_holding(A, B));
        assert!(table.is_empty());
    }

    #[test]
    fn remove_entity_clears_both_roles() {
        let mut table = HoldingTable::new();
        table.start_holding(A, B).unwrap();
        table.start_holding(B, C).unwrap();
        let removed = table.remove_entity(B);
        assert_eq!(removed.len(), 2);
        assert!(table.is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Start(u32, u32),
        Stop(u32, u32),
        Remove(u32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u32..5, 0u32..5).prop_map(|(a, b)| Op::Start(a, b)),
            (0u32..5, 0u32..5).prop_map(|(a, b)| Op::Stop(a, b)),
            (0u32..5).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn table_stays_one_to_one(ops in proptest::collection::vec(op(), 0..64)) {
            let mut table = HoldingTable::new();
            for op in ops {
                match op {
                    Op::Start(h, x) => {
                        let result = table.start_holding(EntityId(h), EntityId(x));
                        if result.is_some() {
                            prop_assert_eq!(table.held_by(EntityId(h)), Some(EntityId(x)));
                        }
                    }
                    Op::Stop(h, x) => {
                        table.stop_holding(EntityId(h), EntityId(x));
                    }
                    Op::Remove(id) => {
                        table.remove_entity(EntityId(id));
                    }
                }
                prop_assert!(table.is_consistent());
                for pair in table.pairs() {
                    prop_assert_ne!(pair.holder, pair.held);
                    prop_assert_eq!(table.holder_of(pair.held), Some(pair.holder));
                }
            }
        }
    }
}
