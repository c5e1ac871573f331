//! # CANOPY Core Engine
//!
//! Sparse-set Entity Component System for a frame-stepped simulation:
//! - Packed per-kind component pools with O(1) insert/remove/lookup
//! - Systems that track the entities matching a required signature
//! - Structural changes staged during a frame, committed by [`Registry::update`]
//! - A type-indexed, frame-scoped event bus
//!
//! ## Architecture Rules
//!
//! 1. **The registry owns everything** - pools, systems, signatures, tag/group indices
//! 2. **Entities are plain indices** - no handle keeps a pointer back to the registry
//! 3. **One reconciliation barrier per frame** - additions first, then removals
//!
//! ## Example
//!
//! ```rust
//! use canopy_core::{Component, Registry, System, SystemCore};
//!
//! struct Position(f64);
//! impl Component for Position {}
//!
//! struct Drift { core: SystemCore }
//! impl System for Drift {
//!     fn core(&self) -> &SystemCore { &self.core }
//!     fn core_mut(&mut self) -> &mut SystemCore { &mut self.core }
//! }
//!
//! let mut registry = Registry::new();
//! registry.add_system(Drift { core: SystemCore::new().require::<Position>() });
//!
//! let entity = registry.create_entity();
//! registry.add_component(entity, Position(1.0));
//! registry.update();
//!
//! assert_eq!(registry.get_system::<Drift>().entities(), &[entity]);
//! ```

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ecs;
pub mod error;
pub mod event;
pub mod time;

pub use ecs::{
    Component, ComponentId, ComponentKind, ComponentTypes, Components, Entity,
    EntityAllocator, EntityMut, EntityRef, ErasedPool, GroupIndex, Pool, ReconcileStats,
    Registry, Signature, System, SystemCore, Systems, TagIndex, MAX_COMPONENTS,
};
pub use error::{EcsError, EcsResult};
pub use event::{Event, EventBus};
pub use time::FrameClock;
