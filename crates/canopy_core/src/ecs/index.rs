//! # Tag and Group Indices
//!
//! String-keyed lookups over existing entities. They never touch
//! signatures or pools.
//!
//! - A tag names exactly one entity, and an entity has at most one tag.
//! - A group names a set of entities, and an entity is in at most one group.
//!
//! Both follow last-write-wins: re-tagging an entity drops its old tag,
//! and giving a tag to a second entity takes it away from the first.
//! Re-grouping an entity moves it out of its previous group.

use std::collections::{BTreeSet, HashMap};

use super::entity::Entity;

/// Unique tag ↔ entity association.
#[derive(Debug, Default)]
pub struct TagIndex {
    by_tag: HashMap<String, Entity>,
    by_entity: HashMap<Entity, String>,
}

impl TagIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags `entity`, replacing its previous tag.
    ///
    /// Returns the other entity that held `tag` before, if any.
    pub fn tag(&mut self, entity: Entity, tag: &str) -> Option<Entity> {
        if let Some(old) = self.by_entity.remove(&entity) {
            self.by_tag.remove(&old);
        }

        let displaced = self.by_tag.insert(tag.to_owned(), entity);
        if let Some(previous) = displaced {
            self.by_entity.remove(&previous);
        }
        self.by_entity.insert(entity, tag.to_owned());
        displaced
    }

    /// Checks if `entity` carries `tag`.
    #[must_use]
    pub fn has_tag(&self, entity: Entity, tag: &str) -> bool {
        self.by_tag.get(tag) == Some(&entity)
    }

    /// The entity carrying `tag`.
    #[must_use]
    pub fn entity(&self, tag: &str) -> Option<Entity> {
        self.by_tag.get(tag).copied()
    }

    /// The tag of `entity`.
    #[must_use]
    pub fn tag_of(&self, entity: Entity) -> Option<&str> {
        self.by_entity.get(&entity).map(String::as_str)
    }

    /// Drops the tag of `entity`, returning it.
    pub fn remove_entity(&mut self, entity: Entity) -> Option<String> {
        let tag = self.by_entity.remove(&entity)?;
        self.by_tag.remove(&tag);
        Some(tag)
    }

    /// Number of tags in use.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    /// Returns `true` if no tag is in use.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }
}

/// Group → members association.
#[derive(Debug, Default)]
pub struct GroupIndex {
    by_group: HashMap<String, BTreeSet<Entity>>,
    by_entity: HashMap<Entity, String>,
}

impl GroupIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `entity` in `group`, returning the group it left, if any.
    pub fn group(&mut self, entity: Entity, group: &str) -> Option<String> {
        let previous = self.remove_entity(entity);
        self.by_group
            .entry(group.to_owned())
            .or_default()
            .insert(entity);
        self.by_entity.insert(entity, group.to_owned());
        previous.filter(|old| old != group)
    }

    /// Checks if `entity` is a member of `group`.
    #[must_use]
    pub fn belongs_to_group(&self, entity: Entity, group: &str) -> bool {
        self.by_group
            .get(group)
            .is_some_and(|members| members.contains(&entity))
    }

    /// Members of `group` in ascending id order, `None` for unknown groups.
    #[must_use]
    pub fn members(&self, group: &str) -> Option<&BTreeSet<Entity>> {
        self.by_group.get(group)
    }

    /// The group of `entity`.
    #[must_use]
    pub fn group_of(&self, entity: Entity) -> Option<&str> {
        self.by_entity.get(&entity).map(String::as_str)
    }

    /// Removes `entity` from its group, returning the group's name.
    ///
    /// Groups left without members are dropped.
    pub fn remove_entity(&mut self, entity: Entity) -> Option<String> {
        let group = self.by_entity.remove(&entity)?;
        if let Some(members) = self.by_group.get_mut(&group) {
            members.remove(&entity);
            if members.is_empty() {
                self.by_group.remove(&group);
            }
        }
        Some(group)
    }

    /// Number of non-empty groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_group.len()
    }

    /// Returns `true` if there are no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_group.is_empty()
    }
}
