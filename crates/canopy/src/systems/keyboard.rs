//! Arrow-key steering.

use canopy_core::{EventBus, Registry, SystemCore};

use crate::components::{Direction, KeyboardControl, RigidBody, Sprite};
use crate::events::{Key, KeyPressedEvent, KeyReleasedEvent};
use crate::math::Vec2;

/// Steers keyboard-controlled entities with the arrow keys.
///
/// Pressing an arrow sets the velocity and the sprite facing row.
/// Releasing the arrow of the current facing stops the entity.
pub struct KeyboardMovementSystem {
    core: SystemCore,
}

impl KeyboardMovementSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: SystemCore::new()
                .require::<KeyboardControl>()
                .require::<Sprite>()
                .require::<RigidBody>(),
        }
    }

    /// Subscribes the key handlers for this frame.
    pub fn subscribe_to_events(events: &mut EventBus) {
        events.subscribe_system::<KeyPressedEvent, Self>(Self::on_key_pressed);
        events.subscribe_system::<KeyReleasedEvent, Self>(Self::on_key_released);
    }

    /// Starts moving in the arrow's direction.
    pub fn on_key_pressed(&mut self, registry: &mut Registry, event: &mut KeyPressedEvent) {
        let Some(direction) = arrow(event.key) else {
            return;
        };
        tracing::trace!("steering {direction:?}");

        for &entity in self.core.entities() {
            let speed = registry.get_component::<KeyboardControl>(entity).speed;
            registry.get_component_mut::<RigidBody>(entity).velocity = direction.unit() * speed;

            let sprite = registry.get_component_mut::<Sprite>(entity);
            sprite.facing = direction;
            sprite.src_rect.y = direction.row() * sprite.height;
        }
    }

    /// Stops entities facing the released arrow's direction.
    pub fn on_key_released(&mut self, registry: &mut Registry, event: &mut KeyReleasedEvent) {
        let Some(direction) = arrow(event.key) else {
            return;
        };

        for &entity in self.core.entities() {
            if registry.get_component::<Sprite>(entity).facing == direction {
                registry.get_component_mut::<RigidBody>(entity).velocity = Vec2::ZERO;
            }
        }
    }
}

fn arrow(key: Key) -> Option<Direction> {
    match key {
        Key::Up => Some(Direction::Up),
        Key::Right => Some(Direction::Right),
        Key::Down => Some(Direction::Down),
        Key::Left => Some(Direction::Left),
        _ => None,
    }
}

impl Default for KeyboardMovementSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl_system!(KeyboardMovementSystem);
