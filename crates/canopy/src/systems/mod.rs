//! # Simulation Systems
//!
//! Each system declares its required components in `new` and exposes a
//! domain `update` taking the context it needs. Event-driven systems also
//! expose `subscribe_to_events`, called by the frame loop after every
//! bus reset.
//!
//! | System                    | Requires                              | Reacts to          |
//! |---------------------------|---------------------------------------|--------------------|
//! | `MovementSystem`          | Transform, RigidBody                  |                    |
//! | `CollisionSystem`         | Transform, BoxCollider                |                    |
//! | `DamageSystem`            | BoxCollider                           | `CollisionEvent`   |
//! | `LifecycleSystem`         | Lifecycle                             |                    |
//! | `ProjectileEmitSystem`    | ProjectileEmitter, Transform          | `KeyPressedEvent`  |
//! | `AnimationSystem`         | Sprite, Animation                     |                    |
//! | `KeyboardMovementSystem`  | KeyboardControl, Sprite, RigidBody    | key press/release  |
//! | `CameraMovementSystem`    | CameraFollow, Transform               |                    |
//! | `RenderSystem`            | Sprite, Transform (ordered by z)      |                    |
//! | `RenderColliderSystem`    | Transform, BoxCollider                |                    |
//! | `RenderHealthSystem`      | Health, Transform                     |                    |

/// Implements [`canopy_core::System`] for a struct with a `core` field.
macro_rules! impl_system {
    ($ty:ty) => {
        impl canopy_core::System for $ty {
            fn core(&self) -> &canopy_core::SystemCore {
                &self.core
            }

            fn core_mut(&mut self) -> &mut canopy_core::SystemCore {
                &mut self.core
            }
        }
    };
}

mod animation;
mod camera;
mod collision;
mod damage;
mod keyboard;
mod lifecycle;
mod movement;
mod projectile;
mod render;

pub use animation::AnimationSystem;
pub use camera::CameraMovementSystem;
pub use collision::CollisionSystem;
pub use damage::DamageSystem;
pub use keyboard::KeyboardMovementSystem;
pub use lifecycle::LifecycleSystem;
pub use movement::MovementSystem;
pub use projectile::ProjectileEmitSystem;
pub use render::{health_color, RenderColliderSystem, RenderHealthSystem, RenderSystem};

/// Tag of the player entity.
pub const PLAYER_TAG: &str = "player";
/// Group of hostile units.
pub const ENEMIES_GROUP: &str = "enemies";
/// Group of live projectiles.
pub const PROJECTILES_GROUP: &str = "projectiles";
/// Group of map tiles.
pub const TILES_GROUP: &str = "tiles";
