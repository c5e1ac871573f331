//! # Component Pools
//!
//! Packed storage for one component kind, addressed by entity id.
//!
//! ```text
//! sparse:  entity id -> dense index     [_, 2, _, 0, 1]
//! dense:   dense index -> entity id     [3, 4, 1]
//! values:  dense index -> component     [C3, C4, C1]
//! ```
//!
//! - Insert: O(1) amortised (append)
//! - Lookup: O(1) through the sparse table
//! - Remove: O(1) swap-remove, the last value moves into the hole
//!
//! The value array never has holes, so iteration is linear.

use std::any::{type_name, Any};

use super::component::Component;
use super::entity::Entity;
use crate::error::{EcsError, EcsResult};

const EMPTY: u32 = u32::MAX;

/// Type-erased view of a pool.
///
/// The registry keeps pools of every kind in one table and only needs
/// this much to evict a dying entity. Typed access goes through
/// [`as_any`](ErasedPool::as_any) and a checked downcast.
pub trait ErasedPool: Any {
    /// Removes the entity's value if present. Returns whether it was.
    fn remove_entity(&mut self, entity: Entity) -> bool;
    /// Checks if the entity has a value in this pool.
    fn contains_entity(&self, entity: Entity) -> bool;
    /// Number of stored values.
    fn len(&self) -> usize;
    /// Returns `true` if the pool holds nothing.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Type name of the stored component.
    fn component_name(&self) -> &'static str;
    /// Upcast for downcasting to the concrete pool.
    fn as_any(&self) -> &dyn Any;
    /// Mutable upcast for downcasting to the concrete pool.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Dense storage for all values of component kind `T`.
///
/// # Example
///
/// ```rust
/// use canopy_core::{Component, Entity, Pool};
///
/// struct Health(i32);
/// impl Component for Health {}
///
/// let mut pool = Pool::new();
/// pool.set(Entity::from_raw(4), Health(100));
/// assert_eq!(pool.get(Entity::from_raw(4)).map(|h| h.0), Some(100));
/// ```
pub struct Pool<T> {
    /// The packed values.
    values: Vec<T>,
    /// Owner of each packed value, same order as `values`.
    dense: Vec<Entity>,
    /// Entity id -> index into `values`, `EMPTY` when absent.
    sparse: Vec<u32>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            dense: Vec::new(),
            sparse: Vec::new(),
        }
    }
}

impl<T> Pool<T> {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty pool with room for `capacity` values.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            dense: Vec::with_capacity(capacity),
            sparse: Vec::new(),
        }
    }

    #[inline]
    fn slot(&self, entity: Entity) -> Option<usize> {
        match self.sparse.get(entity.index()) {
            Some(&index) if index != EMPTY => Some(index as usize),
            _ => None,
        }
    }

    /// Number of stored values.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the pool holds nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Checks if the entity has a value in this pool.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.slot(entity).is_some()
    }

    /// Stores `value` for `entity`.
    ///
    /// Overwrites in place if the entity already has a value, otherwise
    /// appends. Returns the previous value, if any.
    pub fn set(&mut self, entity: Entity, value: T) -> Option<T> {
        if let Some(index) = self.slot(entity) {
            return Some(std::mem::replace(&mut self.values[index], value));
        }

        if self.sparse.len() <= entity.index() {
            self.sparse.resize(entity.index() + 1, EMPTY);
        }

        // One slot per entity and entity ids are u32, so the dense length
        // stays below EMPTY.
        debug_assert!(self.values.len() < EMPTY as usize);
        #[allow(clippy::cast_possible_truncation)]
        let index = self.values.len() as u32;
        self.sparse[entity.index()] = index;
        self.dense.push(entity);
        self.values.push(value);
        None
    }

    /// Gets the entity's value.
    #[inline]
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.slot(entity).map(|index| &self.values[index])
    }

    /// Gets the entity's value mutably.
    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.slot(entity).map(|index| &mut self.values[index])
    }

    /// Gets the entity's value.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotFound`] if the entity is absent.
    pub fn try_get(&self, entity: Entity) -> EcsResult<&T> {
        self.get(entity).ok_or(EcsError::EntityNotFound(entity.id()))
    }

    /// Gets the entity's value mutably.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotFound`] if the entity is absent.
    pub fn try_get_mut(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.get_mut(entity).ok_or(EcsError::EntityNotFound(entity.id()))
    }

    /// Removes and returns the entity's value.
    ///
    /// The last packed value is moved into the freed slot, so the
    /// relative order of the remaining values is not preserved.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let index = self.slot(entity)?;
        let last = self.values.len() - 1;

        let value = self.values.swap_remove(index);
        self.dense.swap_remove(index);
        if index != last {
            // The former last entry now lives at `index`.
            let moved = self.dense[index];
            #[allow(clippy::cast_possible_truncation)]
            let packed = index as u32;
            self.sparse[moved.index()] = packed;
        }
        self.sparse[entity.index()] = EMPTY;

        Some(value)
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.values.clear();
        self.dense.clear();
        self.sparse.clear();
    }

    /// Owners of the packed values, in storage order.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.dense
    }

    /// The packed values.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// The packed values, mutably.
    #[inline]
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Iterates over `(entity, value)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.dense.iter().copied().zip(self.values.iter())
    }

    /// Iterates mutably over `(entity, value)` pairs in storage order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.dense.iter().copied().zip(self.values.iter_mut())
    }
}

impl<T: Component> ErasedPool for Pool<T> {
    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn contains_entity(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn component_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Mass(f32);
    impl Component for Mass {}

    fn e(id: u32) -> Entity {
        Entity::from_raw(id)
    }

    /// Both index maps agree and the packed array has no holes.
    fn assert_consistent<T>(pool: &Pool<T>) {
        assert_eq!(pool.values.len(), pool.dense.len());
        for (index, owner) in pool.dense.iter().enumerate() {
            assert_eq!(pool.sparse[owner.index()] as usize, index);
        }
        let mapped = pool.sparse.iter().filter(|&&i| i != EMPTY).count();
        assert_eq!(mapped, pool.len());
    }

    #[test]
    fn test_set_and_get() {
        let mut pool = Pool::new();
        assert!(pool.set(e(10), Mass(1.0)).is_none());
        assert!(pool.set(e(3), Mass(2.0)).is_none());

        assert_eq!(pool.get(e(10)), Some(&Mass(1.0)));
        assert_eq!(pool.get(e(3)), Some(&Mass(2.0)));
        assert!(pool.get(e(4)).is_none());
        assert!(pool.get(e(1000)).is_none());
        assert_eq!(pool.len(), 2);
        assert_consistent(&pool);
    }

    #[test]
    fn test_set_packs_sparse_ids() {
        let mut pool = Pool::new();
        pool.set(e(50_000), Mass(1.0));
        pool.set(e(0), Mass(2.0));
        pool.set(e(7), Mass(3.0));

        assert_eq!(pool.sparse[50_000], 0);
        assert_eq!(pool.sparse[0], 1);
        assert_eq!(pool.sparse[7], 2);
        assert_eq!(pool.sparse[8], EMPTY);
        assert_consistent(&pool);
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let mut pool = Pool::new();
        pool.set(e(0), Mass(1.0));
        pool.set(e(1), Mass(2.0));

        assert_eq!(pool.set(e(0), Mass(5.0)), Some(Mass(1.0)));
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.entities(), &[e(0), e(1)]);
        assert_eq!(pool.get(e(0)), Some(&Mass(5.0)));
    }

    #[test]
    fn test_swap_remove_relocates_last() {
        let mut pool = Pool::new();
        for id in 0..4 {
            pool.set(e(id), Mass(id as f32));
        }

        assert_eq!(pool.remove(e(1)), Some(Mass(1.0)));
        assert_eq!(pool.entities(), &[e(0), e(3), e(2)]);
        assert_eq!(pool.get(e(3)), Some(&Mass(3.0)));
        assert!(!pool.contains(e(1)));
        assert_consistent(&pool);

        // Removing the last element needs no relocation.
        assert_eq!(pool.remove(e(2)), Some(Mass(2.0)));
        assert_eq!(pool.entities(), &[e(0), e(3)]);
        assert_consistent(&pool);

        assert!(pool.remove(e(1)).is_none());
    }

    #[test]
    fn test_density_after_mixed_operations() {
        let mut pool = Pool::new();
        let mut expected = std::collections::BTreeMap::new();

        for step in 0..200u32 {
            let id = (step * 7) % 23;
            if step % 3 == 0 {
                pool.remove(e(id));
                expected.remove(&id);
            } else {
                pool.set(e(id), Mass(step as f32));
                expected.insert(id, step as f32);
            }
            assert_consistent(&pool);
        }

        assert_eq!(pool.len(), expected.len());
        for (id, value) in expected {
            assert_eq!(pool.get(e(id)), Some(&Mass(value)));
        }
    }

    #[test]
    fn test_try_get_reports_missing_entity() {
        let mut pool: Pool<Mass> = Pool::new();
        assert_eq!(pool.try_get(e(9)).unwrap_err(), EcsError::EntityNotFound(9));
        pool.set(e(9), Mass(1.0));
        pool.try_get_mut(e(9)).unwrap().0 = 4.0;
        assert_eq!(pool.try_get(e(9)).unwrap(), &Mass(4.0));
    }

    #[test]
    fn test_erased_downcast() {
        let mut boxed: Box<dyn ErasedPool> = Box::new(Pool::<Mass>::new());
        boxed
            .as_any_mut()
            .downcast_mut::<Pool<Mass>>()
            .unwrap()
            .set(e(2), Mass(1.5));

        assert!(boxed.contains_entity(e(2)));
        assert_eq!(boxed.len(), 1);
        assert!(boxed.component_name().ends_with("Mass"));
        assert!(boxed.as_any().downcast_ref::<Pool<u8>>().is_none());

        assert!(boxed.remove_entity(e(2)));
        assert!(!boxed.remove_entity(e(2)));
        assert!(boxed.is_empty());
    }

    #[test]
    fn test_iter_mut() {
        let mut pool = Pool::new();
        pool.set(e(5), Mass(1.0));
        pool.set(e(6), Mass(2.0));

        for (_, mass) in pool.iter_mut() {
            mass.0 *= 10.0;
        }
        let collected: Vec<_> = pool.iter().map(|(id, m)| (id.id(), m.0)).collect();
        assert_eq!(collected, vec![(5, 10.0), (6, 20.0)]);
    }
}
