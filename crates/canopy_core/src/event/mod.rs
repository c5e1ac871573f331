//! # Event System
//!
//! Synchronous, single-threaded publish/subscribe keyed by event type.
//!
//! ## Frame Scope
//!
//! ```text
//! ┌──────────┐   reset()   ┌─────────────┐  subscribe()  ┌──────────────┐
//! │  frame   │────────────>│  empty bus  │──────────────>│  handlers    │
//! │  start   │             └─────────────┘               │  registered  │
//! └──────────┘                                           └──────┬───────┘
//!                                                               │ emit()
//!                                                        ┌──────▼───────┐
//!                                                        │ handlers run │
//!                                                        │  in order    │
//!                                                        └──────────────┘
//! ```
//!
//! Subscriptions live for one frame: the frame loop resets the bus and
//! systems subscribe again before running.

mod bus;

pub use bus::EventBus;

/// Marker trait for event payloads.
///
/// # Example
///
/// ```rust
/// use canopy_core::event::Event;
/// use canopy_core::Entity;
///
/// struct CollisionEvent {
///     a: Entity,
///     b: Entity,
/// }
///
/// impl Event for CollisionEvent {}
/// ```
pub trait Event: 'static {}
