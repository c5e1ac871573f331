//! Time-to-live expiry.

use canopy_core::{Registry, SystemCore};

use crate::components::Lifecycle;

/// Kills entities whose lifetime has run out.
pub struct LifecycleSystem {
    core: SystemCore,
}

impl LifecycleSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: SystemCore::new().require::<Lifecycle>(),
        }
    }

    /// Stages every expired entity for destruction.
    ///
    /// # Returns
    ///
    /// The number of entities that expired this tick.
    pub fn update(&self, registry: &mut Registry, now_ms: u64) -> usize {
        let mut expired = 0;
        for &entity in self.core.entities() {
            let lifecycle = *registry.get_component::<Lifecycle>(entity);
            if now_ms.saturating_sub(lifecycle.start_time) >= lifecycle.time_to_live {
                registry.kill_entity(entity);
                expired += 1;
            }
        }
        expired
    }
}

impl Default for LifecycleSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl_system!(LifecycleSystem);
