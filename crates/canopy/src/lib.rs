//! # CANOPY
//!
//! A top-down 2D shooter simulation on the [`canopy_core`] ECS.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                            CANOPY                                │
//! ├──────────────────────────────────────────────────────────────────┤
//! │                                                                  │
//! │   InputEvent ──> Game ──> EventBus ──> event-driven systems      │
//! │                   │                                              │
//! │                   ├──> update systems ──> Registry (staged)      │
//! │                   │                          │                   │
//! │                   │                   registry.update()          │
//! │                   │                                              │
//! │                   └──> render systems ──> dyn RenderTarget       │
//! │                                                                  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `components`: Plain data attached to entities
//! - `config`: TOML start-up settings
//! - `events`: Raw input and bus payloads
//! - `game`: Frame loop
//! - `math`: Vectors and pixel rectangles
//! - `render`: Drawing seam and the recording target
//! - `scene`: Demo level
//! - `systems`: Simulation and render systems

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod components;
pub mod config;
pub mod events;
pub mod game;
pub mod math;
pub mod render;
pub mod scene;
pub mod systems;

pub use canopy_core::{Entity, EventBus, FrameClock, ReconcileStats, Registry};

pub use config::{ConfigError, ConfigResult, GameConfig};
pub use events::{CollisionEvent, InputEvent, Key, KeyPressedEvent, KeyReleasedEvent, UnknownKey};
pub use game::{FrameStats, Game, DEBUG_KEY};
pub use math::{Rect, Vec2};
pub use render::{Color, DrawCommand, RecordingTarget, RenderTarget, SpriteDraw};
pub use scene::DemoScene;
