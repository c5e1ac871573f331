//! # Systems
//!
//! A system declares the components it requires and keeps the list of
//! entities whose signature covers that requirement. The registry keeps
//! the list current; the system's own update logic only reads it.
//!
//! Domain systems embed a [`SystemCore`] and implement [`System`]:
//!
//! ```rust
//! use canopy_core::{Component, System, SystemCore};
//!
//! struct Transform;
//! impl Component for Transform {}
//! struct RigidBody;
//! impl Component for RigidBody {}
//!
//! struct MovementSystem {
//!     core: SystemCore,
//! }
//!
//! impl MovementSystem {
//!     fn new() -> Self {
//!         let mut core = SystemCore::new();
//!         core.require_component::<Transform>();
//!         core.require_component::<RigidBody>();
//!         Self { core }
//!     }
//! }
//!
//! impl System for MovementSystem {
//!     fn core(&self) -> &SystemCore { &self.core }
//!     fn core_mut(&mut self) -> &mut SystemCore { &mut self.core }
//! }
//! ```

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

use super::component::{Component, ComponentKind, ComponentTypes};
use super::entity::Entity;
use super::signature::Signature;
use super::storage::Components;
use crate::error::EcsResult;

/// Sort key over an entity's components. `None` means "not orderable".
type OrderKey = Box<dyn Fn(&Components, Entity) -> Option<i64>>;

/// State shared by every system: requirements, signature, interest list.
#[derive(Default)]
pub struct SystemCore {
    /// Declared component requirements.
    requirements: Vec<ComponentKind>,
    /// Requirements resolved against a registry's type table.
    signature: Signature,
    /// Entities currently matching the signature.
    entities: Vec<Entity>,
    /// Optional ordering of the interest list.
    order: Option<OrderKey>,
}

impl SystemCore {
    /// Creates a core with no requirements.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares that matching entities must have a `T`.
    ///
    /// Requirements are turned into signature bits when the system is
    /// added to a registry.
    pub fn require_component<T: Component>(&mut self) {
        let kind = ComponentKind::of::<T>();
        if !self.requirements.contains(&kind) {
            self.requirements.push(kind);
        }
    }

    /// Builder form of [`require_component`](Self::require_component).
    #[must_use]
    pub fn require<T: Component>(mut self) -> Self {
        self.require_component::<T>();
        self
    }

    /// Keeps the interest list sorted by a key read from each entity's `T`.
    ///
    /// The sort is stable: an entity is inserted after every entity with
    /// an equal key. Entities without a `T` are appended unordered.
    #[must_use]
    pub fn order_by<T: Component>(mut self, key: fn(&T) -> i64) -> Self {
        self.order = Some(Box::new(move |components: &Components, entity: Entity| {
            components.get::<T>(entity).map(key)
        }));
        self
    }

    /// Declared requirements, in declaration order.
    #[inline]
    #[must_use]
    pub fn requirements(&self) -> &[ComponentKind] {
        &self.requirements
    }

    /// Resolved required signature.
    #[inline]
    #[must_use]
    pub fn signature(&self) -> Signature {
        self.signature
    }

    /// Entities currently matching the signature.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Checks if `entity` is in the interest list.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// Returns `true` if the system orders its interest list.
    #[inline]
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.order.is_some()
    }

    /// Resolves the declared requirements into a signature.
    pub(crate) fn resolve(&mut self, types: &mut ComponentTypes) -> EcsResult<Signature> {
        let mut signature = Signature::EMPTY;
        for kind in &self.requirements {
            signature.set(types.register_kind(*kind)?.bit());
        }
        self.signature = signature;
        Ok(signature)
    }

    /// Adds `entity` to the interest list. Returns `false` if already present.
    pub(crate) fn add_entity(&mut self, entity: Entity, components: &Components) -> bool {
        if self.contains(entity) {
            return false;
        }

        let Some(order) = &self.order else {
            self.entities.push(entity);
            return true;
        };

        let Some(key) = order(components, entity) else {
            self.entities.push(entity);
            return true;
        };

        let position = self
            .entities
            .iter()
            .position(|&other| order(components, other).is_some_and(|other_key| other_key > key))
            .unwrap_or(self.entities.len());
        self.entities.insert(position, entity);
        true
    }

    /// Removes `entity` from the interest list, keeping the order of the rest.
    pub(crate) fn remove_entity(&mut self, entity: Entity) -> bool {
        match self.entities.iter().position(|&e| e == entity) {
            Some(index) => {
                self.entities.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Base trait for systems.
///
/// Implementors expose their embedded [`SystemCore`]; domain update
/// methods are plain inherent methods taking whatever context they need.
pub trait System: 'static {
    /// The embedded core.
    fn core(&self) -> &SystemCore;

    /// The embedded core, mutably.
    fn core_mut(&mut self) -> &mut SystemCore;

    /// Human-readable name used in logs.
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }

    /// Entities currently matching the system's signature.
    fn entities(&self) -> &[Entity] {
        self.core().entities()
    }

    /// The system's required signature.
    fn signature(&self) -> Signature {
        self.core().signature()
    }
}

/// Object-safe wrapper adding downcasts to any [`System`].
trait AnySystem {
    fn system(&self) -> &dyn System;
    fn system_mut(&mut self) -> &mut dyn System;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<S: System> AnySystem for S {
    fn system(&self) -> &dyn System {
        self
    }

    fn system_mut(&mut self) -> &mut dyn System {
        self
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// System registration table: at most one instance per system type.
///
/// Iteration follows registration order. A slot is empty while its
/// system is lent out by [`Systems::take`].
#[derive(Default)]
pub struct Systems {
    slots: Vec<Option<Box<dyn AnySystem>>>,
    index: HashMap<TypeId, usize>,
}

impl Systems {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a system, returning the instance it replaced.
    pub fn insert<S: System>(&mut self, system: S) -> Option<S> {
        if let Some(&slot) = self.index.get(&TypeId::of::<S>()) {
            let previous = self.slots[slot].replace(Box::new(system));
            return previous.and_then(|old| old.into_any().downcast::<S>().ok().map(|b| *b));
        }

        self.index.insert(TypeId::of::<S>(), self.slots.len());
        self.slots.push(Some(Box::new(system)));
        None
    }

    /// Removes and returns the system of type `S`.
    pub fn remove<S: System>(&mut self) -> Option<S> {
        let slot = self.index.remove(&TypeId::of::<S>())?;
        let removed = self.slots.remove(slot);
        for index in self.index.values_mut() {
            if *index > slot {
                *index -= 1;
            }
        }
        removed
            .and_then(|system| system.into_any().downcast::<S>().ok())
            .map(|system| *system)
    }

    /// Checks if a system of type `S` is registered.
    #[inline]
    #[must_use]
    pub fn contains<S: System>(&self) -> bool {
        self.index.contains_key(&TypeId::of::<S>())
    }

    /// The system of type `S`, unless absent or lent out.
    #[must_use]
    pub fn get<S: System>(&self) -> Option<&S> {
        let slot = *self.index.get(&TypeId::of::<S>())?;
        self.slots[slot].as_ref()?.as_any().downcast_ref::<S>()
    }

    /// The system of type `S` mutably, unless absent or lent out.
    pub fn get_mut<S: System>(&mut self) -> Option<&mut S> {
        let slot = *self.index.get(&TypeId::of::<S>())?;
        self.slots[slot].as_mut()?.as_any_mut().downcast_mut::<S>()
    }

    /// Checks if the system of type `S` is registered but lent out.
    #[must_use]
    pub fn is_lent<S: System>(&self) -> bool {
        self.index
            .get(&TypeId::of::<S>())
            .is_some_and(|&slot| self.slots[slot].is_none())
    }

    /// Lends the system of type `S` out of its slot.
    pub fn take<S: System>(&mut self) -> Option<Box<S>> {
        let slot = *self.index.get(&TypeId::of::<S>())?;
        self.slots[slot].take()?.into_any().downcast::<S>().ok()
    }

    /// Returns a lent system to its slot.
    ///
    /// If the slot was removed or refilled meanwhile, the lent instance
    /// is dropped and `false` is returned.
    pub fn restore<S: System>(&mut self, system: Box<S>) -> bool {
        match self.index.get(&TypeId::of::<S>()) {
            Some(&slot) if self.slots[slot].is_none() => {
                self.slots[slot] = Some(system);
                true
            }
            _ => false,
        }
    }

    /// Number of registered systems.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if no system is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Iterates over present systems in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn System> {
        self.slots.iter().flatten().map(|system| system.system())
    }

    /// Iterates mutably over present systems in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut dyn System> {
        self.slots.iter_mut().flatten().map(|system| system.system_mut())
    }
}
