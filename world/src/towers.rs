//! Authoritative tower storage and identifier allocation.

use std::collections::BTreeMap;

use tower_defence_core::TowerId;

use crate::Tower;

/// Registry that stores towers and manages identifier allocation.
///
/// Towers iterate in identifier order, which is also construction order.
#[derive(Debug)]
pub struct TowerRegistry {
    entries: BTreeMap<TowerId, Tower>,
    next_tower_id: TowerId,
}

impl Default for TowerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Identifier the next inserted tower will receive.
    #[must_use]
    pub const fn next_id(&self) -> TowerId {
        self.next_tower_id
    }

    /// Builds a tower with a freshly allocated identifier and stores it.
    pub fn insert_with<F>(&mut self, build: F) -> TowerId
    where
        F: FnOnce(TowerId) -> Tower,
    {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().wrapping_add(1));
        let _ = self.entries.insert(id, build(id));
        id
    }

    /// Tower with the identifier.
    #[must_use]
    pub fn get(&self, id: TowerId) -> Option<&Tower> {
        self.entries.get(&id)
    }

    /// Tower with the identifier, mutably.
    pub fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.entries.get_mut(&id)
    }

    /// Removes and returns the tower.
    pub fn remove(&mut self, id: TowerId) -> Option<Tower> {
        self.entries.remove(&id)
    }

    /// Towers in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }

    /// Towers in identifier order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tower> {
        self.entries.values_mut()
    }

    /// Number of stored towers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no tower is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every tower and restarts identifier allocation.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_tower_id = TowerId::new(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_defence_core::{CellCoord, TowerCatalogue, TowerTypeId, Vector2};

    fn cannon(id: TowerId) -> Tower {
        let catalogue = TowerCatalogue::standard();
        let cannon = catalogue.get_kind(TowerTypeId::Cannon).expect("cannon");
        Tower::from_type(id, CellCoord::new(0, 0), Vector2::ZERO, 64.0, cannon)
    }

    #[test]
    fn registry_starts_empty_with_zero_identifier() {
        let registry = TowerRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.next_id().get(), 0);
    }

    #[test]
    fn identifiers_increase_with_each_insert() {
        let mut registry = TowerRegistry::new();
        let first = registry.insert_with(cannon);
        let second = registry.insert_with(cannon);

        assert_eq!(first, TowerId::new(0));
        assert_eq!(second, TowerId::new(1));
        assert_eq!(registry.get(second).map(Tower::id), Some(second));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn removed_identifiers_are_not_reused() {
        let mut registry = TowerRegistry::new();
        let first = registry.insert_with(cannon);
        assert!(registry.remove(first).is_some());
        let second = registry.insert_with(cannon);

        assert_ne!(first, second);
        assert!(registry.get(first).is_none());
    }

    #[test]
    fn clear_resets_the_identifier_counter() {
        let mut registry = TowerRegistry::new();
        let _ = registry.insert_with(cannon);
        registry.clear();

        assert!(registry.is_empty());
        assert_eq!(registry.next_id(), TowerId::new(0));
    }
}
