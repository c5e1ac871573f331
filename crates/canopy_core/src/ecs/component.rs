//! # Component Types
//!
//! Components are plain data records attached to entities. Each distinct
//! Rust type gets a small integer id the first time a registry sees it.
//! The id table lives inside the registry, so two registries never share
//! numbering and nothing depends on global initialisation order.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;

use super::signature::MAX_COMPONENTS;
use crate::error::{EcsError, EcsResult};

/// Marker trait for ECS components.
///
/// Components carry data only. Any `'static` type can be one.
///
/// # Example
///
/// ```rust
/// use canopy_core::Component;
///
/// struct Health {
///     percentage: i32,
/// }
///
/// impl Component for Health {}
/// ```
pub trait Component: 'static {}

/// Small integer id of a component kind, equal to its signature bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ComponentId(u8);

impl ComponentId {
    /// Returns the id as a signature bit index.
    #[inline]
    #[must_use]
    pub const fn bit(self) -> u8 {
        self.0
    }

    /// Returns the id as a table index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Type descriptor of a component kind that has not necessarily been
/// given an id yet.
///
/// Systems declare their requirements with these before they are handed
/// to a registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComponentKind {
    type_id: TypeId,
    name: &'static str,
}

impl ComponentKind {
    /// Descriptor for component type `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The Rust type id.
    #[inline]
    #[must_use]
    pub const fn type_id(self) -> TypeId {
        self.type_id
    }

    /// The Rust type name.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.name
    }
}

/// Table mapping component types to ids.
///
/// Ids are assigned in order of first registration, starting at zero,
/// and are never reused.
#[derive(Debug, Default)]
pub struct ComponentTypes {
    ids: HashMap<TypeId, ComponentId>,
    names: Vec<&'static str>,
}

impl ComponentTypes {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id of `T`, assigning the next free one on first use.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentCapacity`] if `T` is new and all
    /// [`MAX_COMPONENTS`] ids are taken.
    pub fn register<T: Component>(&mut self) -> EcsResult<ComponentId> {
        self.register_kind(ComponentKind::of::<T>())
    }

    /// Same as [`register`](Self::register) for a type descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::ComponentCapacity`] when the table is full.
    pub fn register_kind(&mut self, kind: ComponentKind) -> EcsResult<ComponentId> {
        if let Some(&id) = self.ids.get(&kind.type_id) {
            return Ok(id);
        }

        let next = self.names.len();
        if next >= MAX_COMPONENTS {
            return Err(EcsError::ComponentCapacity {
                component: kind.name,
                max: MAX_COMPONENTS,
            });
        }

        #[allow(clippy::cast_possible_truncation)]
        let id = ComponentId(next as u8);
        self.ids.insert(kind.type_id, id);
        self.names.push(kind.name);
        tracing::debug!("component {} registered as {}", kind.name, id);
        Ok(id)
    }

    /// Returns the id of `T` if it has been registered.
    #[inline]
    #[must_use]
    pub fn id_of<T: Component>(&self) -> Option<ComponentId> {
        self.ids.get(&TypeId::of::<T>()).copied()
    }

    /// Returns the type name registered under `id`.
    #[must_use]
    pub fn name_of(&self, id: ComponentId) -> Option<&'static str> {
        self.names.get(id.index()).copied()
    }

    /// Number of registered kinds.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if nothing has been registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    impl Component for A {}
    struct B;
    impl Component for B {}

    #[test]
    fn test_ids_are_stable_and_monotonic() {
        let mut types = ComponentTypes::new();
        let a = types.register::<A>().unwrap();
        let b = types.register::<B>().unwrap();

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(types.register::<A>().unwrap(), a);
        assert_eq!(types.id_of::<B>(), Some(b));
        assert_eq!(types.len(), 2);
        assert!(types.name_of(a).unwrap().ends_with("A"));
    }

    #[test]
    fn test_tables_are_independent() {
        let mut first = ComponentTypes::new();
        let mut second = ComponentTypes::new();
        first.register::<A>().unwrap();

        assert_eq!(second.register::<B>().unwrap().index(), 0);
        assert!(second.id_of::<A>().is_none());
    }

    #[test]
    fn test_capacity_overflow() {
        struct Slot<const N: usize>;
        impl<const N: usize> Component for Slot<N> {}

        macro_rules! fill {
            ($types:ident; $($n:literal)*) => { $( $types.register::<Slot<$n>>().unwrap(); )* };
        }

        let mut types = ComponentTypes::new();
        fill!(types; 0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15
                     16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31);
        assert_eq!(types.len(), MAX_COMPONENTS);

        let err = types.register::<Slot<32>>().unwrap_err();
        assert!(matches!(err, EcsError::ComponentCapacity { max: 32, .. }));
        // Already-known kinds still resolve.
        assert!(types.register::<Slot<5>>().is_ok());
    }
}
