//! # Entity Component System
//!
//! A sparse-set ECS for a single-threaded, frame-stepped simulation.
//!
//! ## Design Philosophy
//!
//! - Entity ids are plain indices, recycled first-in first-out
//! - Each component kind lives in its own packed pool
//! - Systems keep a list of the entities whose signature covers theirs
//! - Creating and killing entities is staged; [`Registry::update`] commits it

mod component;
mod entity;
mod handle;
mod index;
mod pool;
mod registry;
mod signature;
mod storage;
mod system;

pub use component::{Component, ComponentId, ComponentKind, ComponentTypes};
pub use entity::{Entity, EntityAllocator};
pub use handle::{EntityMut, EntityRef};
pub use index::{GroupIndex, TagIndex};
pub use pool::{ErasedPool, Pool};
pub use registry::{ReconcileStats, Registry};
pub use signature::{Signature, MAX_COMPONENTS};
pub use storage::Components;
pub use system::{System, SystemCore, Systems};
