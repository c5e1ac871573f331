//! # Entity Handles
//!
//! Short-lived borrows pairing an [`Entity`] with its registry, so the
//! entity-scoped operations read as methods on the entity:
//!
//! ```rust
//! use canopy_core::{Component, Registry};
//!
//! struct Health(i32);
//! impl Component for Health {}
//!
//! let mut registry = Registry::new();
//! let chopper = registry
//!     .spawn()
//!     .with(Health(100))
//!     .tagged("player")
//!     .id();
//!
//! assert!(registry.entity(chopper).has_component::<Health>());
//! ```

use super::component::Component;
use super::entity::Entity;
use super::registry::Registry;

/// Shared handle on one entity.
#[derive(Clone, Copy)]
pub struct EntityRef<'r> {
    registry: &'r Registry,
    entity: Entity,
}

impl<'r> EntityRef<'r> {
    pub(crate) fn new(registry: &'r Registry, entity: Entity) -> Self {
        Self { registry, entity }
    }

    /// The entity id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// See [`Registry::is_alive`].
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.registry.is_alive(self.entity)
    }

    /// See [`Registry::has_component`].
    #[must_use]
    pub fn has_component<T: Component>(&self) -> bool {
        self.registry.has_component::<T>(self.entity)
    }

    /// See [`Registry::get_component`].
    ///
    /// # Panics
    ///
    /// Panics if the entity has no `T`.
    #[track_caller]
    #[must_use]
    pub fn get_component<T: Component>(&self) -> &'r T {
        self.registry.get_component::<T>(self.entity)
    }

    /// The entity's `T`, if present.
    #[must_use]
    pub fn try_component<T: Component>(&self) -> Option<&'r T> {
        self.registry.try_get_component::<T>(self.entity).ok()
    }

    /// See [`Registry::has_tag`].
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.registry.has_tag(self.entity, tag)
    }

    /// See [`Registry::belongs_to_group`].
    #[must_use]
    pub fn belongs_to_group(&self, group: &str) -> bool {
        self.registry.belongs_to_group(self.entity, group)
    }
}

/// Exclusive handle on one entity.
pub struct EntityMut<'r> {
    registry: &'r mut Registry,
    entity: Entity,
}

impl<'r> EntityMut<'r> {
    pub(crate) fn new(registry: &'r mut Registry, entity: Entity) -> Self {
        Self { registry, entity }
    }

    /// The entity id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> Entity {
        self.entity
    }

    /// See [`Registry::add_component`].
    ///
    /// # Panics
    ///
    /// Panics if the entity is not live.
    #[track_caller]
    pub fn add_component<T: Component>(&mut self, value: T) -> &mut Self {
        self.registry.add_component(self.entity, value);
        self
    }

    /// Builder form of [`add_component`](Self::add_component).
    #[track_caller]
    #[must_use]
    pub fn with<T: Component>(mut self, value: T) -> Self {
        self.add_component(value);
        self
    }

    /// See [`Registry::remove_component`].
    pub fn remove_component<T: Component>(&mut self) -> Option<T> {
        self.registry.remove_component::<T>(self.entity)
    }

    /// See [`Registry::has_component`].
    #[must_use]
    pub fn has_component<T: Component>(&self) -> bool {
        self.registry.has_component::<T>(self.entity)
    }

    /// See [`Registry::get_component`].
    ///
    /// # Panics
    ///
    /// Panics if the entity has no `T`.
    #[track_caller]
    #[must_use]
    pub fn get_component<T: Component>(&self) -> &T {
        self.registry.get_component::<T>(self.entity)
    }

    /// See [`Registry::get_component_mut`].
    ///
    /// # Panics
    ///
    /// Panics if the entity has no `T`.
    #[track_caller]
    pub fn get_component_mut<T: Component>(&mut self) -> &mut T {
        self.registry.get_component_mut::<T>(self.entity)
    }

    /// See [`Registry::tag`].
    #[track_caller]
    pub fn tag(&mut self, tag: &str) -> &mut Self {
        self.registry.tag(self.entity, tag);
        self
    }

    /// Builder form of [`tag`](Self::tag).
    #[track_caller]
    #[must_use]
    pub fn tagged(mut self, tag: &str) -> Self {
        self.tag(tag);
        self
    }

    /// See [`Registry::group`].
    #[track_caller]
    pub fn group(&mut self, group: &str) -> &mut Self {
        self.registry.group(self.entity, group);
        self
    }

    /// Builder form of [`group`](Self::group).
    #[track_caller]
    #[must_use]
    pub fn grouped(mut self, group: &str) -> Self {
        self.group(group);
        self
    }

    /// See [`Registry::kill_entity`].
    pub fn kill(&mut self) {
        self.registry.kill_entity(self.entity);
    }

    /// Gives the registry back.
    #[must_use]
    pub fn registry(self) -> &'r mut Registry {
        self.registry
    }
}
