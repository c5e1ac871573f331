//! Integrates velocity into position.

use canopy_core::{Registry, SystemCore};

use crate::components::{RigidBody, Transform};

/// Moves every entity with a transform and a rigid body.
pub struct MovementSystem {
    core: SystemCore,
}

impl MovementSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: SystemCore::new().require::<Transform>().require::<RigidBody>(),
        }
    }

    /// Advances positions by `velocity * delta_time` (seconds).
    pub fn update(&self, registry: &mut Registry, delta_time: f64) {
        for &entity in self.core.entities() {
            let velocity = registry.get_component::<RigidBody>(entity).velocity;
            registry.get_component_mut::<Transform>(entity).position += velocity * delta_time;
        }
    }
}

impl Default for MovementSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl_system!(MovementSystem);
