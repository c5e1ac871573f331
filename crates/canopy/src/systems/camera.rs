//! Camera follow.

use canopy_core::{Registry, SystemCore};

use crate::components::{CameraFollow, Transform};
use crate::math::{px, Rect};

/// Centres the camera on the followed entity, kept inside the map.
pub struct CameraMovementSystem {
    core: SystemCore,
}

impl CameraMovementSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: SystemCore::new().require::<CameraFollow>().require::<Transform>(),
        }
    }

    /// Moves `camera` so the followed entity is centred.
    ///
    /// With several followed entities the last one wins.
    pub fn update(&self, registry: &Registry, camera: &mut Rect, map_width: i32, map_height: i32) {
        for &entity in self.core.entities() {
            let position = registry.get_component::<Transform>(entity).position;
            let max_x = (map_width - camera.w).max(0);
            let max_y = (map_height - camera.h).max(0);
            camera.x = (px(position.x) - camera.w / 2).clamp(0, max_x);
            camera.y = (px(position.y) - camera.h / 2).clamp(0, max_y);
        }
    }
}

impl Default for CameraMovementSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl_system!(CameraMovementSystem);
