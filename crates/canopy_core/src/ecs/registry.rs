//! # Registry
//!
//! The central authority for entities, components, systems and the
//! tag/group indices.
//!
//! ## Frame contract
//!
//! ```text
//! during the frame:   create_entity / kill_entity / add_component / remove_component
//!                     └─ stage the entity in a pending set
//! end of frame:       update()
//!                     ├─ 1. pending additions: match signatures against every system
//!                     └─ 2. pending removals: evict from pools, systems, indices; recycle id
//! ```
//!
//! Systems iterating during a frame see membership as of the last
//! [`Registry::update`]. Structural changes never touch an interest list
//! until then.
//!
//! Any entity whose signature changed (new entity, added component,
//! removed component) is staged for matching, so the invariant
//! "an entity is in a system iff its signature covers the system's"
//! holds after every reconciliation, for new and live entities alike.

use std::any::type_name;
use std::collections::BTreeSet;

use super::component::{Component, ComponentId};
use super::entity::{Entity, EntityAllocator};
use super::handle::{EntityMut, EntityRef};
use super::index::{GroupIndex, TagIndex};
use super::signature::Signature;
use super::storage::Components;
use super::system::{System, Systems};
use crate::error::{EcsError, EcsResult};

/// Summary of one reconciliation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Entities processed from the pending-addition set.
    pub matched: usize,
    /// Entities destroyed from the pending-removal set.
    pub removed: usize,
    /// Entity-system memberships created.
    pub joined: usize,
    /// Entity-system memberships dropped.
    pub left: usize,
}

/// Contract violations end the process with the error as diagnostic.
#[cold]
#[track_caller]
fn fatal(err: &EcsError) -> ! {
    tracing::error!("{err}");
    panic!("{err}");
}

/// Owner of all entity state.
///
/// # Example
///
/// ```rust
/// use canopy_core::{Component, Registry};
///
/// struct Health(i32);
/// impl Component for Health {}
///
/// let mut registry = Registry::new();
/// let tank = registry.create_entity();
/// registry.add_component(tank, Health(100));
/// registry.group(tank, "enemies");
/// registry.update();
///
/// assert_eq!(registry.get_component::<Health>(tank).0, 100);
/// assert_eq!(registry.entities_by_group("enemies"), vec![tank]);
/// ```
#[derive(Default)]
pub struct Registry {
    /// Id allocation and liveness.
    entities: EntityAllocator,
    /// Pools and signatures.
    components: Components,
    /// Registered systems.
    systems: Systems,
    /// Tag lookups.
    tags: TagIndex,
    /// Group lookups.
    groups: GroupIndex,
    /// Entities whose system membership must be (re)computed.
    pending_additions: BTreeSet<Entity>,
    /// Entities to destroy at the next reconciliation.
    pending_removals: BTreeSet<Entity>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Entity lifecycle
    // =========================================================================

    /// Creates an entity.
    ///
    /// The id is live immediately; systems see it after the next
    /// [`update`](Self::update).
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.entities.allocate();
        self.components.ensure_entity(entity);
        self.pending_additions.insert(entity);
        tracing::debug!("entity {entity} created");
        entity
    }

    /// Stages `entity` for destruction at the next [`update`](Self::update).
    ///
    /// Killing the same entity twice in a frame is harmless. Killing an id
    /// that is not live is ignored.
    pub fn kill_entity(&mut self, entity: Entity) {
        if !self.entities.is_alive(entity) {
            tracing::warn!("kill ignored: entity {entity} is not alive");
            return;
        }
        if self.pending_removals.insert(entity) {
            tracing::debug!("entity {entity} marked for removal");
        }
    }

    /// Checks if `entity` is live (created and not yet reconciled away).
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Number of live entities.
    #[inline]
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.entities.alive_count()
    }

    /// Number of entities staged for system matching.
    #[inline]
    #[must_use]
    pub fn pending_additions(&self) -> usize {
        self.pending_additions.len()
    }

    /// Number of entities staged for destruction.
    #[inline]
    #[must_use]
    pub fn pending_removals(&self) -> usize {
        self.pending_removals.len()
    }

    /// Checks if `entity` is staged for destruction.
    #[inline]
    #[must_use]
    pub fn is_pending_kill(&self, entity: Entity) -> bool {
        self.pending_removals.contains(&entity)
    }

    /// Iterates over live entities in ascending id order.
    pub fn iter_entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter_alive()
    }

    /// Commits all staged structural changes.
    ///
    /// Additions are processed before removals, so an entity created and
    /// killed in the same frame is matched and then fully destroyed.
    pub fn update(&mut self) -> ReconcileStats {
        let mut stats = ReconcileStats::default();

        let additions = std::mem::take(&mut self.pending_additions);
        for entity in additions {
            if !self.entities.is_alive(entity) {
                continue;
            }
            let signature = self.components.signature(entity);
            for system in self.systems.iter_mut() {
                let core = system.core_mut();
                if signature.contains(core.signature()) {
                    if core.add_entity(entity, &self.components) {
                        stats.joined += 1;
                    }
                } else if core.remove_entity(entity) {
                    stats.left += 1;
                }
            }
            stats.matched += 1;
        }

        let removals = std::mem::take(&mut self.pending_removals);
        for entity in removals {
            if !self.entities.is_alive(entity) {
                continue;
            }
            self.components.clear_entity(entity);
            for system in self.systems.iter_mut() {
                if system.core_mut().remove_entity(entity) {
                    stats.left += 1;
                }
            }
            self.tags.remove_entity(entity);
            self.groups.remove_entity(entity);
            self.entities.release(entity);
            stats.removed += 1;
            tracing::debug!("entity {entity} destroyed, id released");
        }

        if stats != ReconcileStats::default() {
            tracing::debug!(
                "reconciled: {} matched, {} removed, {} joined, {} left",
                stats.matched,
                stats.removed,
                stats.joined,
                stats.left
            );
        }
        stats
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Assigns an id to `T` ahead of use, surfacing capacity problems at start-up.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentCapacity`] when the signature is full.
    pub fn register_component<T: Component>(&mut self) -> EcsResult<ComponentId> {
        self.components.register::<T>()
    }

    /// Attaches `value` to `entity`, replacing any existing `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::DeadEntity`] if the entity is not live and
    /// [`EcsError::ComponentCapacity`] if `T` does not fit the signature.
    pub fn try_add_component<T: Component>(&mut self, entity: Entity, value: T) -> EcsResult<()> {
        if !self.entities.is_alive(entity) {
            return Err(EcsError::DeadEntity { entity: entity.id() });
        }
        self.components.insert(entity, value)?;
        self.pending_additions.insert(entity);
        tracing::trace!("{} added to entity {entity}", type_name::<T>());
        Ok(())
    }

    /// Attaches `value` to `entity`, replacing any existing `T`.
    ///
    /// # Panics
    ///
    /// Panics if the entity is not live or `T` does not fit the signature.
    #[track_caller]
    pub fn add_component<T: Component>(&mut self, entity: Entity, value: T) {
        if let Err(err) = self.try_add_component(entity, value) {
            fatal(&err);
        }
    }

    /// Detaches and returns the entity's `T`.
    ///
    /// The signature bit and pool value go immediately; system membership
    /// follows at the next [`update`](Self::update).
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        let removed = self.components.remove::<T>(entity);
        if removed.is_some() {
            self.pending_additions.insert(entity);
            tracing::trace!("{} removed from entity {entity}", type_name::<T>());
        }
        removed
    }

    /// Checks the entity's signature for `T`.
    #[inline]
    #[must_use]
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.components.has::<T>(entity)
    }

    /// Gets the entity's `T`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingComponent`] if the entity has no `T`.
    pub fn try_get_component<T: Component>(&self, entity: Entity) -> EcsResult<&T> {
        self.components.try_get(entity)
    }

    /// Gets the entity's `T` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingComponent`] if the entity has no `T`.
    pub fn try_get_component_mut<T: Component>(&mut self, entity: Entity) -> EcsResult<&mut T> {
        self.components.try_get_mut(entity)
    }

    /// Gets the entity's `T`.
    ///
    /// # Panics
    ///
    /// Panics if the entity has no `T`. Guard with
    /// [`has_component`](Self::has_component) when unsure.
    #[track_caller]
    #[must_use]
    pub fn get_component<T: Component>(&self, entity: Entity) -> &T {
        match self.components.try_get(entity) {
            Ok(value) => value,
            Err(err) => fatal(&err),
        }
    }

    /// Gets the entity's `T` mutably.
    ///
    /// # Panics
    ///
    /// Panics if the entity has no `T`.
    #[track_caller]
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> &mut T {
        match self.components.try_get_mut(entity) {
            Ok(value) => value,
            Err(err) => fatal(&err),
        }
    }

    /// Current signature of `entity`.
    #[inline]
    #[must_use]
    pub fn signature(&self, entity: Entity) -> Signature {
        self.components.signature(entity)
    }

    /// Read access to all component storage.
    #[inline]
    #[must_use]
    pub fn components(&self) -> &Components {
        &self.components
    }

    // =========================================================================
    // Systems
    // =========================================================================

    /// Registers `system`, replacing any instance of the same type.
    ///
    /// Live entities already matching its signature join it immediately.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentCapacity`] if a required component does
    /// not fit the signature.
    pub fn try_add_system<S: System>(&mut self, mut system: S) -> EcsResult<()> {
        let signature = system.core_mut().resolve(self.components.types_mut())?;

        for entity in self.entities.iter_alive() {
            if self.components.signature(entity).contains(signature) {
                system.core_mut().add_entity(entity, &self.components);
            }
        }

        tracing::info!(
            "system {} registered ({} requirements, {} entities)",
            system.name(),
            system.core().requirements().len(),
            system.entities().len()
        );
        if self.systems.insert(system).is_some() {
            tracing::warn!("system {} replaced an existing instance", type_name::<S>());
        }
        Ok(())
    }

    /// Registers `system`, replacing any instance of the same type.
    ///
    /// # Panics
    ///
    /// Panics if a required component does not fit the signature.
    #[track_caller]
    pub fn add_system<S: System>(&mut self, system: S) {
        if let Err(err) = self.try_add_system(system) {
            fatal(&err);
        }
    }

    /// Unregisters and returns the system of type `S`.
    pub fn remove_system<S: System>(&mut self) -> Option<S> {
        let removed = self.systems.remove::<S>();
        if removed.is_some() {
            tracing::info!("system {} removed", type_name::<S>());
        }
        removed
    }

    /// Checks if a system of type `S` is registered.
    #[inline]
    #[must_use]
    pub fn has_system<S: System>(&self) -> bool {
        self.systems.contains::<S>()
    }

    /// The system of type `S`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingSystem`] if it is not registered or is
    /// currently running.
    pub fn try_get_system<S: System>(&self) -> EcsResult<&S> {
        self.systems.get::<S>().ok_or(EcsError::MissingSystem {
            system: type_name::<S>(),
        })
    }

    /// The system of type `S`.
    ///
    /// # Panics
    ///
    /// Panics if it is not registered.
    #[track_caller]
    #[must_use]
    pub fn get_system<S: System>(&self) -> &S {
        match self.try_get_system::<S>() {
            Ok(system) => system,
            Err(err) => fatal(&err),
        }
    }

    /// The system of type `S`, mutably.
    ///
    /// # Panics
    ///
    /// Panics if it is not registered.
    #[track_caller]
    pub fn get_system_mut<S: System>(&mut self) -> &mut S {
        match self.systems.get_mut::<S>() {
            Some(system) => system,
            None => fatal(&EcsError::MissingSystem {
                system: type_name::<S>(),
            }),
        }
    }

    /// All registered systems, in registration order.
    #[inline]
    #[must_use]
    pub fn systems(&self) -> &Systems {
        &self.systems
    }

    /// Runs `f` with the system of type `S` and the registry side by side.
    ///
    /// The system is lent out of its slot for the duration of the call,
    /// which lets its update logic read and write components, create and
    /// kill entities through the registry. While lent it is skipped by
    /// reconciliation and [`get_system`](Self::get_system) cannot see it.
    ///
    /// # Panics
    ///
    /// Panics if `S` is not registered or is already running.
    #[track_caller]
    pub fn run_system<S: System, R>(&mut self, f: impl FnOnce(&mut S, &mut Self) -> R) -> R {
        if self.systems.is_lent::<S>() {
            let message = format!("system {} is already running", type_name::<S>());
            tracing::error!("{message}");
            panic!("{message}");
        }
        match self.try_run_system(f) {
            Ok(result) => result,
            Err(err) => fatal(&err),
        }
    }

    /// Like [`run_system`](Self::run_system), without panicking.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingSystem`] if `S` is not registered or is
    /// already lent out by an enclosing call. `f` is not run.
    pub fn try_run_system<S: System, R>(
        &mut self,
        f: impl FnOnce(&mut S, &mut Self) -> R,
    ) -> EcsResult<R> {
        let Some(mut system) = self.systems.take::<S>() else {
            return Err(EcsError::MissingSystem {
                system: type_name::<S>(),
            });
        };

        let result = f(&mut system, self);

        if !self.systems.restore(system) {
            tracing::warn!(
                "system {} was removed or replaced while running",
                type_name::<S>()
            );
        }
        Ok(result)
    }

    // =========================================================================
    // Tags and groups
    // =========================================================================

    /// Tags `entity`, replacing its old tag and taking `tag` from any
    /// other entity.
    ///
    /// # Panics
    ///
    /// Panics if the entity is not live.
    #[track_caller]
    pub fn tag(&mut self, entity: Entity, tag: &str) {
        self.assert_alive(entity);
        if let Some(previous) = self.tags.tag(entity, tag) {
            tracing::warn!("tag {tag:?} moved from entity {previous} to entity {entity}");
        }
    }

    /// Checks if `entity` carries `tag`.
    #[must_use]
    pub fn has_tag(&self, entity: Entity, tag: &str) -> bool {
        self.tags.has_tag(entity, tag)
    }

    /// The entity carrying `tag`.
    #[must_use]
    pub fn entity_by_tag(&self, tag: &str) -> Option<Entity> {
        self.tags.entity(tag)
    }

    /// The entity carrying `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnknownTag`] if no entity has it.
    pub fn try_entity_by_tag(&self, tag: &str) -> EcsResult<Entity> {
        self.tags
            .entity(tag)
            .ok_or_else(|| EcsError::UnknownTag(tag.to_owned()))
    }

    /// The tag of `entity`.
    #[must_use]
    pub fn tag_of(&self, entity: Entity) -> Option<&str> {
        self.tags.tag_of(entity)
    }

    /// Drops the tag of `entity`, returning it.
    pub fn remove_tag(&mut self, entity: Entity) -> Option<String> {
        self.tags.remove_entity(entity)
    }

    /// Puts `entity` in `group`, moving it out of its previous group.
    ///
    /// # Panics
    ///
    /// Panics if the entity is not live.
    #[track_caller]
    pub fn group(&mut self, entity: Entity, group: &str) {
        self.assert_alive(entity);
        if let Some(previous) = self.groups.group(entity, group) {
            tracing::debug!("entity {entity} moved from group {previous:?} to {group:?}");
        }
    }

    /// Checks if `entity` is a member of `group`.
    #[must_use]
    pub fn belongs_to_group(&self, entity: Entity, group: &str) -> bool {
        self.groups.belongs_to_group(entity, group)
    }

    /// Members of `group` in ascending id order; empty for unknown groups.
    #[must_use]
    pub fn entities_by_group(&self, group: &str) -> Vec<Entity> {
        self.groups
            .members(group)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Members of `group` in ascending id order.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::UnknownGroup`] if the group has no members.
    pub fn try_entities_by_group(&self, group: &str) -> EcsResult<Vec<Entity>> {
        self.groups
            .members(group)
            .map(|members| members.iter().copied().collect())
            .ok_or_else(|| EcsError::UnknownGroup(group.to_owned()))
    }

    /// The group of `entity`.
    #[must_use]
    pub fn group_of(&self, entity: Entity) -> Option<&str> {
        self.groups.group_of(entity)
    }

    /// Removes `entity` from its group, returning the group's name.
    pub fn remove_group(&mut self, entity: Entity) -> Option<String> {
        self.groups.remove_entity(entity)
    }

    // =========================================================================
    // Handles
    // =========================================================================

    /// Shared handle on `entity`.
    #[must_use]
    pub fn entity(&self, entity: Entity) -> EntityRef<'_> {
        EntityRef::new(self, entity)
    }

    /// Exclusive handle on `entity`.
    pub fn entity_mut(&mut self, entity: Entity) -> EntityMut<'_> {
        EntityMut::new(self, entity)
    }

    /// Creates an entity and returns an exclusive handle on it.
    pub fn spawn(&mut self) -> EntityMut<'_> {
        let entity = self.create_entity();
        EntityMut::new(self, entity)
    }

    #[track_caller]
    fn assert_alive(&self, entity: Entity) {
        if !self.entities.is_alive(entity) {
            fatal(&EcsError::DeadEntity { entity: entity.id() });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::system::SystemCore;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Position {
        x: f64,
        y: f64,
    }
    impl Component for Position {}

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Velocity {
        dx: f64,
        dy: f64,
    }
    impl Component for Velocity {}

    struct Frozen;
    impl Component for Frozen {}

    struct Motion {
        core: SystemCore,
    }

    impl Motion {
        fn new() -> Self {
            Self {
                core: SystemCore::new().require::<Position>().require::<Velocity>(),
            }
        }

        fn update(&mut self, registry: &mut Registry, delta_time: f64) {
            for &entity in self.core.entities() {
                let velocity = *registry.get_component::<Velocity>(entity);
                let position = registry.get_component_mut::<Position>(entity);
                position.x += velocity.dx * delta_time;
                position.y += velocity.dy * delta_time;
            }
        }
    }

    impl System for Motion {
        fn core(&self) -> &SystemCore {
            &self.core
        }
        fn core_mut(&mut self) -> &mut SystemCore {
            &mut self.core
        }
    }

    struct Statics {
        core: SystemCore,
    }

    impl System for Statics {
        fn core(&self) -> &SystemCore {
            &self.core
        }
        fn core_mut(&mut self) -> &mut SystemCore {
            &mut self.core
        }
    }

    fn spawn_mover(registry: &mut Registry) -> Entity {
        let entity = registry.create_entity();
        registry.add_component(entity, Position { x: 10.0, y: 20.0 });
        registry.add_component(entity, Velocity { dx: 5.0, dy: 0.0 });
        entity
    }

    #[test]
    fn test_motion_scenario() {
        let mut registry = Registry::new();
        let entity = spawn_mover(&mut registry);
        registry.add_system(Motion::new());
        registry.update();

        assert_eq!(registry.get_system::<Motion>().entities(), &[entity]);

        registry.run_system::<Motion, _>(|motion, registry| motion.update(registry, 1.0));
        let position = registry.get_component::<Position>(entity);
        assert!((position.x - 15.0).abs() < f64::EPSILON);
        assert!((position.y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_membership_waits_for_update() {
        let mut registry = Registry::new();
        registry.add_system(Motion::new());
        let entity = spawn_mover(&mut registry);

        assert!(registry.get_system::<Motion>().entities().is_empty());
        assert_eq!(registry.pending_additions(), 1);

        let stats = registry.update();
        assert_eq!(stats.matched, 1);
        assert_eq!(stats.joined, 1);
        assert_eq!(registry.get_system::<Motion>().entities(), &[entity]);
        assert_eq!(registry.pending_additions(), 0);
    }

    #[test]
    fn test_partial_signature_does_not_match() {
        let mut registry = Registry::new();
        registry.add_system(Motion::new());
        let entity = registry.create_entity();
        registry.add_component(entity, Position { x: 0.0, y: 0.0 });
        registry.update();

        assert!(registry.get_system::<Motion>().entities().is_empty());
    }

    #[test]
    fn test_live_signature_change_rematches() {
        let mut registry = Registry::new();
        registry.add_system(Motion::new());
        let entity = registry.create_entity();
        registry.add_component(entity, Position { x: 0.0, y: 0.0 });
        registry.update();

        registry.add_component(entity, Velocity { dx: 1.0, dy: 1.0 });
        registry.update();
        assert_eq!(registry.get_system::<Motion>().entities(), &[entity]);

        assert!(registry.remove_component::<Velocity>(entity).is_some());
        assert!(!registry.has_component::<Velocity>(entity));
        // Membership is only dropped at the barrier.
        assert_eq!(registry.get_system::<Motion>().entities(), &[entity]);

        let stats = registry.update();
        assert_eq!(stats.left, 1);
        assert!(registry.get_system::<Motion>().entities().is_empty());
    }

    #[test]
    fn test_kill_evicts_everything() {
        let mut registry = Registry::new();
        registry.add_system(Motion::new());
        let entity = spawn_mover(&mut registry);
        registry.tag(entity, "player");
        registry.group(entity, "units");
        registry.update();

        registry.kill_entity(entity);
        registry.kill_entity(entity);
        assert!(registry.is_alive(entity));
        assert_eq!(registry.pending_removals(), 1);

        let stats = registry.update();
        assert_eq!(stats.removed, 1);
        assert!(!registry.is_alive(entity));
        assert!(registry.get_system::<Motion>().entities().is_empty());
        assert_eq!(registry.components().pool_len::<Position>(), 0);
        assert_eq!(registry.components().pool_len::<Velocity>(), 0);
        assert!(registry.signature(entity).is_empty());
        assert!(registry.entity_by_tag("player").is_none());
        assert!(registry.entities_by_group("units").is_empty());
    }

    #[test]
    fn test_fifo_id_reuse_after_update() {
        let mut registry = Registry::new();
        let entities: Vec<Entity> = (0..5).map(|_| registry.create_entity()).collect();
        registry.update();

        registry.kill_entity(entities[2]);
        // Not recycled before the barrier.
        assert_eq!(registry.create_entity().id(), 5);
        registry.update();

        assert_eq!(registry.create_entity(), entities[2]);
        assert_eq!(registry.create_entity().id(), 6);
    }

    #[test]
    fn test_create_and_kill_same_frame() {
        let mut registry = Registry::new();
        registry.add_system(Motion::new());
        let entity = spawn_mover(&mut registry);
        registry.kill_entity(entity);

        assert_eq!(registry.components().pool_len::<Position>(), 1);

        let stats = registry.update();
        assert_eq!(stats.matched, 1);
        assert_eq!(stats.joined, 1);
        assert_eq!(stats.removed, 1);
        assert_eq!(stats.left, 1);
        assert_eq!(registry.components().pool_len::<Position>(), 0);
        assert!(registry.get_system::<Motion>().entities().is_empty());
        assert_eq!(registry.create_entity(), entity);
    }

    #[test]
    fn test_kill_of_dead_entity_is_ignored() {
        let mut registry = Registry::new();
        let entity = registry.create_entity();
        registry.kill_entity(entity);
        registry.update();

        registry.kill_entity(entity);
        assert_eq!(registry.pending_removals(), 0);
        registry.update();
        assert_eq!(registry.entities.free_count(), 1);
    }

    #[test]
    fn test_system_added_late_sees_existing_entities() {
        let mut registry = Registry::new();
        let entity = spawn_mover(&mut registry);
        registry.update();

        registry.add_system(Motion::new());
        assert_eq!(registry.get_system::<Motion>().entities(), &[entity]);
    }

    #[test]
    fn test_empty_signature_system_matches_all() {
        let mut registry = Registry::new();
        registry.add_system(Statics {
            core: SystemCore::new(),
        });
        let a = registry.create_entity();
        let b = registry.create_entity();
        registry.add_component(b, Frozen);
        registry.update();

        assert_eq!(registry.get_system::<Statics>().entities(), &[a, b]);
    }

    #[test]
    fn test_system_table_operations() {
        let mut registry = Registry::new();
        assert!(!registry.has_system::<Motion>());
        assert!(registry.try_get_system::<Motion>().is_err());

        registry.add_system(Motion::new());
        assert!(registry.has_system::<Motion>());
        assert_eq!(registry.systems().len(), 1);

        assert!(registry.remove_system::<Motion>().is_some());
        assert!(!registry.has_system::<Motion>());
        assert!(registry.remove_system::<Motion>().is_none());
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn test_get_missing_system_is_fatal() {
        let registry = Registry::new();
        let _ = registry.get_system::<Motion>();
    }

    #[test]
    #[should_panic(expected = "has no")]
    fn test_get_missing_component_is_fatal() {
        let mut registry = Registry::new();
        let entity = registry.create_entity();
        let _ = registry.get_component::<Position>(entity);
    }

    #[test]
    fn test_add_component_to_dead_entity_errors() {
        let mut registry = Registry::new();
        let entity = registry.create_entity();
        registry.kill_entity(entity);
        registry.update();

        let err = registry.try_add_component(entity, Frozen).unwrap_err();
        assert_eq!(err, EcsError::DeadEntity { entity: entity.id() });
    }

    #[test]
    fn test_tag_overwrite_scenario() {
        let mut registry = Registry::new();
        let a = registry.create_entity();
        let b = registry.create_entity();

        registry.tag(a, "player");
        assert_eq!(registry.entity_by_tag("player"), Some(a));

        registry.tag(b, "player");
        assert_eq!(registry.entity_by_tag("player"), Some(b));
        assert!(!registry.has_tag(a, "player"));
        assert!(registry.has_tag(b, "player"));
        assert!(matches!(
            registry.try_entity_by_tag("boss"),
            Err(EcsError::UnknownTag(_))
        ));
    }

    #[test]
    fn test_group_queries() {
        let mut registry = Registry::new();
        let tank = registry.create_entity();
        let truck = registry.create_entity();
        registry.group(truck, "enemies");
        registry.group(tank, "enemies");

        assert_eq!(registry.entities_by_group("enemies"), vec![tank, truck]);
        assert!(registry.belongs_to_group(tank, "enemies"));
        assert!(registry.entities_by_group("ghosts").is_empty());
        assert!(matches!(
            registry.try_entities_by_group("ghosts"),
            Err(EcsError::UnknownGroup(_))
        ));

        assert_eq!(registry.remove_group(tank).as_deref(), Some("enemies"));
        assert_eq!(registry.group_of(truck), Some("enemies"));
    }

    #[test]
    fn test_try_run_system_while_lent() {
        let mut registry = Registry::new();
        assert!(registry.try_run_system::<Motion, _>(|_, _| ()).is_err());

        registry.add_system(Motion::new());
        let nested = registry.run_system::<Motion, _>(|_, registry| {
            registry.try_run_system::<Motion, _>(|_, _| ()).is_err()
        });
        assert!(nested);
        assert_eq!(registry.try_run_system::<Motion, _>(|_, _| 7), Ok(7));
    }

    #[test]
    #[should_panic(expected = "already running")]
    fn test_reentrant_run_system_is_fatal() {
        let mut registry = Registry::new();
        registry.add_system(Motion::new());
        registry.run_system::<Motion, _>(|_, registry| {
            registry.run_system::<Motion, _>(|_, _| ());
        });
    }

    #[test]
    fn test_run_system_can_spawn() {
        let mut registry = Registry::new();
        registry.add_system(Motion::new());

        let spawned = registry.run_system::<Motion, _>(|_, registry| spawn_mover(registry));
        assert!(registry.has_system::<Motion>());
        registry.update();
        assert_eq!(registry.get_system::<Motion>().entities(), &[spawned]);
    }
}
