//! # Component Storage
//!
//! All component data of a registry: the type-to-id table, one pool per
//! component kind, and the per-entity signature table.
//!
//! Pools are created lazily the first time their kind is stored and are
//! kept in a table indexed by [`ComponentId`]. Typed access downcasts the
//! erased pool after the id lookup, so a mismatch is impossible unless
//! the table itself is corrupted.

use std::any::type_name;

use super::component::{Component, ComponentId, ComponentKind, ComponentTypes};
use super::entity::Entity;
use super::pool::{ErasedPool, Pool};
use super::signature::Signature;
use crate::error::{EcsError, EcsResult};

/// Owner of every component value and entity signature.
#[derive(Default)]
pub struct Components {
    /// Component type ids.
    types: ComponentTypes,
    /// Pools indexed by component id, `None` until first use.
    pools: Vec<Option<Box<dyn ErasedPool>>>,
    /// Current signature of every minted entity id.
    signatures: Vec<Signature>,
}

impl Components {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The component type table.
    #[inline]
    #[must_use]
    pub fn types(&self) -> &ComponentTypes {
        &self.types
    }

    /// The component type table, mutably.
    #[inline]
    pub(crate) fn types_mut(&mut self) -> &mut ComponentTypes {
        &mut self.types
    }

    /// Assigns an id to `T` without storing anything.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentCapacity`] when the table is full.
    pub fn register<T: Component>(&mut self) -> EcsResult<ComponentId> {
        self.types.register::<T>()
    }

    /// Assigns an id to a component kind descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentCapacity`] when the table is full.
    pub fn register_kind(&mut self, kind: ComponentKind) -> EcsResult<ComponentId> {
        self.types.register_kind(kind)
    }

    /// Makes sure the signature table covers `entity` and resets its signature.
    pub fn ensure_entity(&mut self, entity: Entity) {
        if self.signatures.len() <= entity.index() {
            self.signatures.resize(entity.index() + 1, Signature::EMPTY);
        }
        self.signatures[entity.index()].reset();
    }

    /// Current signature of `entity` (empty for unknown ids).
    #[inline]
    #[must_use]
    pub fn signature(&self, entity: Entity) -> Signature {
        self.signatures
            .get(entity.index())
            .copied()
            .unwrap_or_default()
    }

    /// Stores `value` for `entity` and sets its signature bit.
    ///
    /// Returns the value it replaced, if any.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentCapacity`] if `T` is a new kind and the
    /// signature is full.
    pub fn insert<T: Component>(&mut self, entity: Entity, value: T) -> EcsResult<Option<T>> {
        let id = self.types.register::<T>()?;

        if self.pools.len() <= id.index() {
            self.pools.resize_with(id.index() + 1, || None);
        }
        let slot = &mut self.pools[id.index()];
        if slot.is_none() {
            tracing::debug!("creating pool for {}", type_name::<T>());
            *slot = Some(Box::new(Pool::<T>::new()));
        }

        let previous = Self::downcast_mut::<T>(slot.as_deref_mut()).map(|pool| pool.set(entity, value));

        if self.signatures.len() <= entity.index() {
            self.signatures.resize(entity.index() + 1, Signature::EMPTY);
        }
        self.signatures[entity.index()].set(id.bit());

        Ok(previous.flatten())
    }

    /// Removes the entity's `T`, clearing its signature bit.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        let id = self.types.id_of::<T>()?;
        if let Some(signature) = self.signatures.get_mut(entity.index()) {
            signature.clear(id.bit());
        }
        self.pool_mut::<T>()?.remove(entity)
    }

    /// Checks the entity's signature for `T`.
    #[inline]
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.types
            .id_of::<T>()
            .is_some_and(|id| self.signature(entity).test(id.bit()))
    }

    /// Gets the entity's `T` if its signature has it.
    #[must_use]
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.try_get(entity).ok()
    }

    /// Gets the entity's `T` mutably if its signature has it.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.try_get_mut(entity).ok()
    }

    /// Gets the entity's `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingComponent`] if the signature bit is unset.
    pub fn try_get<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        if !self.has::<T>(entity) {
            return Err(Self::missing::<T>(entity));
        }
        self.pool::<T>()
            .and_then(|pool| pool.get(entity))
            .ok_or_else(|| Self::missing::<T>(entity))
    }

    /// Gets the entity's `T` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingComponent`] if the signature bit is unset.
    pub fn try_get_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        if !self.has::<T>(entity) {
            return Err(Self::missing::<T>(entity));
        }
        self.pool_mut::<T>()
            .and_then(|pool| pool.get_mut(entity))
            .ok_or_else(|| Self::missing::<T>(entity))
    }

    /// The pool of `T`, if one has been created.
    #[must_use]
    pub fn pool<T: Component>(&self) -> Option<&Pool<T>> {
        let id = self.types.id_of::<T>()?;
        self.pools
            .get(id.index())?
            .as_deref()?
            .as_any()
            .downcast_ref::<Pool<T>>()
    }

    /// The pool of `T` mutably, if one has been created.
    pub fn pool_mut<T: Component>(&mut self) -> Option<&mut Pool<T>> {
        let id = self.types.id_of::<T>()?;
        Self::downcast_mut::<T>(self.pools.get_mut(id.index())?.as_deref_mut())
    }

    /// Number of stored `T` values.
    #[must_use]
    pub fn pool_len<T: Component>(&self) -> usize {
        self.pool::<T>().map_or(0, Pool::len)
    }

    /// Number of pools created so far.
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.pools.iter().filter(|pool| pool.is_some()).count()
    }

    /// Evicts the entity from every pool holding it and resets its signature.
    ///
    /// Returns how many values were removed.
    pub fn clear_entity(&mut self, entity: Entity) -> usize {
        let mut removed = 0;
        for pool in self.pools.iter_mut().flatten() {
            if pool.contains_entity(entity) && pool.remove_entity(entity) {
                removed += 1;
            }
        }
        if let Some(signature) = self.signatures.get_mut(entity.index()) {
            signature.reset();
        }
        removed
    }

    fn downcast_mut<T: Component>(pool: Option<&mut dyn ErasedPool>) -> Option<&mut Pool<T>> {
        pool?.as_any_mut().downcast_mut::<Pool<T>>()
    }

    fn missing<T: Component>(entity: Entity) -> EcsError {
        EcsError::MissingComponent {
            entity: entity.id(),
            component: type_name::<T>(),
        }
    }
}
