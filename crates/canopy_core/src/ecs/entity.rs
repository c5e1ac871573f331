//! # Entity Management
//!
//! Entities are bare integer ids. They carry no data and no reference
//! to the registry that created them; every entity-scoped operation is a
//! registry method taking the id.

use std::collections::VecDeque;
use std::fmt;

/// Unique identifier for a live entity.
///
/// Ids are unique among live entities and are recycled after the entity
/// has been reconciled away.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Entity(u32);

impl Entity {
    /// Creates an entity id from its raw index.
    #[inline]
    #[must_use]
    pub const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }

    /// Returns the id as a table index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out entity ids.
///
/// Released ids are queued and handed out again first-in first-out
/// before any new id is minted.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    /// Liveness flag per minted id.
    alive: Vec<bool>,
    /// Released ids awaiting reuse.
    free_ids: VecDeque<u32>,
    /// Number of currently live ids.
    alive_count: usize,
}

impl EntityAllocator {
    /// Creates an empty allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a live id, recycling the oldest released id if any.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` ids are live at once.
    pub fn allocate(&mut self) -> Entity {
        let id = if let Some(id) = self.free_ids.pop_front() {
            id
        } else {
            let id = u32::try_from(self.alive.len()).expect("entity id space exhausted");
            self.alive.push(false);
            id
        };

        self.alive[id as usize] = true;
        self.alive_count += 1;
        Entity(id)
    }

    /// Releases a live id for reuse.
    ///
    /// Returns `false` (and does nothing) if the id is not live.
    pub fn release(&mut self, entity: Entity) -> bool {
        match self.alive.get_mut(entity.index()) {
            Some(alive) if *alive => {
                *alive = false;
                self.alive_count -= 1;
                self.free_ids.push_back(entity.0);
                true
            }
            _ => false,
        }
    }

    /// Checks if an id is live.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.alive.get(entity.index()).copied().unwrap_or(false)
    }

    /// Number of live ids.
    #[inline]
    #[must_use]
    pub const fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Number of ids ever minted (the next fresh id).
    #[inline]
    #[must_use]
    pub fn minted(&self) -> usize {
        self.alive.len()
    }

    /// Number of released ids waiting for reuse.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free_ids.len()
    }

    /// Iterates over live ids in ascending order.
    pub fn iter_alive(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .filter_map(|(index, _)| u32::try_from(index).ok().map(Entity))
    }
}
