//! Pairwise box collision.

use canopy_core::{Entity, EventBus, Registry, SystemCore};

use crate::components::{BoxCollider, Transform};
use crate::events::CollisionEvent;

/// World-space box of one collider.
#[derive(Clone, Copy, Debug)]
struct Aabb {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl Aabb {
    fn of(transform: &Transform, collider: &BoxCollider) -> Self {
        Self {
            x: transform.position.x + collider.offset.x * transform.scale.x,
            y: transform.position.y + collider.offset.y * transform.scale.y,
            w: f64::from(collider.width) * transform.scale.x,
            h: f64::from(collider.height) * transform.scale.y,
        }
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// Flags overlapping colliders and emits one [`CollisionEvent`] per pair.
pub struct CollisionSystem {
    core: SystemCore,
}

impl CollisionSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: SystemCore::new().require::<Transform>().require::<BoxCollider>(),
        }
    }

    /// Tests every pair of colliders.
    ///
    /// # Returns
    ///
    /// The number of colliding pairs.
    pub fn update(&self, registry: &mut Registry, events: &mut EventBus) -> usize {
        let boxes: Vec<(Entity, Aabb)> = self
            .core
            .entities()
            .iter()
            .map(|&entity| {
                let transform = registry.get_component::<Transform>(entity);
                let collider = registry.get_component::<BoxCollider>(entity);
                (entity, Aabb::of(transform, collider))
            })
            .collect();

        let mut pairs = Vec::new();
        for (i, (a, a_box)) in boxes.iter().enumerate() {
            for (b, b_box) in &boxes[i + 1..] {
                if a_box.overlaps(b_box) {
                    pairs.push((*a, *b));
                }
            }
        }

        for &(entity, _) in &boxes {
            registry.get_component_mut::<BoxCollider>(entity).is_colliding = false;
        }
        for &(a, b) in &pairs {
            registry.get_component_mut::<BoxCollider>(a).is_colliding = true;
            registry.get_component_mut::<BoxCollider>(b).is_colliding = true;
        }

        for &(a, b) in &pairs {
            tracing::trace!("collision between {a} and {b}");
            events.emit(registry, CollisionEvent { a, b });
        }
        pairs.len()
    }
}

impl Default for CollisionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl_system!(CollisionSystem);
