//! Projectile hits.

use canopy_core::{Entity, EventBus, Registry, SystemCore};

use super::{ENEMIES_GROUP, PLAYER_TAG, PROJECTILES_GROUP};
use crate::components::{BoxCollider, Damage, Health};
use crate::events::CollisionEvent;

/// Applies projectile damage on collision.
///
/// A projectile hitting the player or an enemy on a different damage
/// layer removes its damage from the unit's health and is destroyed.
/// Units are destroyed once their health drops to zero.
pub struct DamageSystem {
    core: SystemCore,
    hits: u64,
}

impl DamageSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: SystemCore::new().require::<BoxCollider>(),
            hits: 0,
        }
    }

    /// Subscribes [`on_collision`](Self::on_collision) for this frame.
    pub fn subscribe_to_events(events: &mut EventBus) {
        events.subscribe_system::<CollisionEvent, Self>(Self::on_collision);
    }

    /// Resolves one colliding pair in both directions.
    pub fn on_collision(&mut self, registry: &mut Registry, event: &mut CollisionEvent) {
        let CollisionEvent { a, b } = *event;

        if registry.belongs_to_group(a, PROJECTILES_GROUP) && is_unit(registry, b) {
            self.on_projectile_hit(registry, a, b);
        }
        if registry.belongs_to_group(b, PROJECTILES_GROUP) && is_unit(registry, a) {
            self.on_projectile_hit(registry, b, a);
        }
    }

    /// Total hits applied since the system was created.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    fn on_projectile_hit(&mut self, registry: &mut Registry, projectile: Entity, unit: Entity) {
        // A projectile is spent by its first hit.
        if registry.is_pending_kill(projectile) {
            return;
        }

        let (Ok(projectile_collider), Ok(unit_collider)) = (
            registry.try_get_component::<BoxCollider>(projectile),
            registry.try_get_component::<BoxCollider>(unit),
        ) else {
            return;
        };
        if projectile_collider.damage_layer == unit_collider.damage_layer {
            return;
        }

        let amount = registry
            .try_get_component::<Damage>(projectile)
            .map_or(0, |damage| damage.amount);

        if let Ok(health) = registry.try_get_component_mut::<Health>(unit) {
            health.health_percentage -= amount;
            let remaining = health.health_percentage;
            tracing::debug!("entity {unit} hit by {projectile}, health now {remaining}%");
            if remaining <= 0 {
                tracing::info!("entity {unit} destroyed");
                registry.kill_entity(unit);
            }
        }

        registry.kill_entity(projectile);
        self.hits += 1;
    }
}

impl Default for DamageSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl_system!(DamageSystem);

fn is_unit(registry: &Registry, entity: Entity) -> bool {
    registry.has_tag(entity, PLAYER_TAG) || registry.belongs_to_group(entity, ENEMIES_GROUP)
}
