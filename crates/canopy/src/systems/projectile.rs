//! Projectile spawning.

use canopy_core::{Entity, EventBus, Registry, SystemCore};

use super::PROJECTILES_GROUP;
use crate::components::{
    BoxCollider, Damage, Direction, KeyboardControl, Lifecycle, ProjectileEmitter, RigidBody, Sprite,
    Transform,
};
use crate::events::{Key, KeyPressedEvent};
use crate::math::Vec2;

/// Asset id of spawned projectiles.
pub const PROJECTILE_ASSET: &str = "bullet-image";

/// Fires projectiles from emitters.
///
/// Emitters with a non-zero frequency fire on their own once the interval
/// has elapsed. Keyboard-controlled emitters also fire in their facing
/// direction when the fire key is pressed.
pub struct ProjectileEmitSystem {
    core: SystemCore,
    fire_key: Key,
    now_ms: u64,
    fired: u64,
}

impl ProjectileEmitSystem {
    /// Creates the system with the key that triggers manual fire.
    #[must_use]
    pub fn new(fire_key: Key) -> Self {
        Self {
            core: SystemCore::new()
                .require::<ProjectileEmitter>()
                .require::<Transform>(),
            fire_key,
            now_ms: 0,
            fired: 0,
        }
    }

    /// Subscribes the fire key handler for this frame.
    pub fn subscribe_to_events(events: &mut EventBus) {
        events.subscribe_system::<KeyPressedEvent, Self>(Self::on_key_pressed);
    }

    /// Fires from every keyboard-controlled emitter on the fire key.
    pub fn on_key_pressed(&mut self, registry: &mut Registry, event: &mut KeyPressedEvent) {
        if event.key != self.fire_key {
            return;
        }

        let mut fired = 0;
        for &entity in self.core.entities() {
            if !registry.has_component::<KeyboardControl>(entity) {
                continue;
            }
            let facing = registry
                .try_get_component::<Sprite>(entity)
                .map_or(Direction::Right, |sprite| sprite.facing);
            let velocity = registry
                .get_component::<ProjectileEmitter>(entity)
                .velocity
                .scale(facing.unit());
            Self::fire(registry, entity, velocity, self.now_ms);
            fired += 1;
        }
        self.fired += fired;
    }

    /// Fires every emitter whose interval has elapsed at `now_ms`.
    ///
    /// # Returns
    ///
    /// The number of projectiles spawned.
    pub fn update(&mut self, registry: &mut Registry, now_ms: u64) -> u64 {
        self.now_ms = now_ms;

        let mut fired = 0;
        for &entity in self.core.entities() {
            let emitter = *registry.get_component::<ProjectileEmitter>(entity);
            if emitter.frequency == 0 {
                continue;
            }
            if now_ms.saturating_sub(emitter.last_fired_time) > emitter.frequency {
                Self::fire(registry, entity, emitter.velocity, now_ms);
                fired += 1;
            }
        }
        self.fired += fired;
        fired
    }

    /// Sets the time stamped on shots fired by the fire key.
    ///
    /// [`update`](Self::update) also sets it, so only input delivered
    /// outside a frame step needs this.
    pub fn set_clock(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
    }

    /// Total projectiles spawned since the system was created.
    #[must_use]
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Spawns one projectile from the centre of `source`.
    fn fire(registry: &mut Registry, source: Entity, velocity: Vec2, now_ms: u64) -> Entity {
        let emitter = *registry.get_component::<ProjectileEmitter>(source);
        let transform = *registry.get_component::<Transform>(source);

        let mut position = transform.position;
        if let Ok(sprite) = registry.try_get_component::<Sprite>(source) {
            position.x += transform.scale.x * f64::from(sprite.width) / 2.0;
            position.y += transform.scale.y * f64::from(sprite.height) / 2.0;
        }
        let layer = registry
            .try_get_component::<BoxCollider>(source)
            .map_or(0, |collider| collider.damage_layer);

        let projectile = registry
            .spawn()
            .with(Transform::at(position))
            .with(RigidBody::new(velocity))
            .with(Sprite::new(PROJECTILE_ASSET, 4, 4, 4))
            .with(BoxCollider::new(4, 4).on_layer(layer))
            .with(Lifecycle::new(emitter.duration, now_ms))
            .with(Damage {
                amount: emitter.hit_percent_damage,
                is_friendly: emitter.is_friendly,
            })
            .grouped(PROJECTILES_GROUP)
            .id();

        registry.get_component_mut::<ProjectileEmitter>(source).last_fired_time = now_ms;
        tracing::trace!("entity {source} fired projectile {projectile}");
        projectile
    }
}

impl_system!(ProjectileEmitSystem);
