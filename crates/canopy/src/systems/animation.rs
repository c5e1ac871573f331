//! Sprite sheet animation.

use canopy_core::{Registry, SystemCore};

use crate::components::{Animation, Sprite};

/// Advances frame animations and moves the sprite source rectangle.
pub struct AnimationSystem {
    core: SystemCore,
}

impl AnimationSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: SystemCore::new().require::<Sprite>().require::<Animation>(),
        }
    }

    /// Selects the frame for `now_ms` on every animated sprite.
    ///
    /// Looping animations wrap; others hold their last frame.
    pub fn update(&self, registry: &mut Registry, now_ms: u64) {
        for &entity in self.core.entities() {
            let animation = registry.get_component_mut::<Animation>(entity);
            animation.current_frame = frame_at(animation, now_ms);
            let frame = i32::try_from(animation.current_frame).unwrap_or(0);

            let sprite = registry.get_component_mut::<Sprite>(entity);
            sprite.src_rect.x = frame.saturating_mul(sprite.width);
        }
    }
}

fn frame_at(animation: &Animation, now_ms: u64) -> u32 {
    let frames = u64::from(animation.num_frames.max(1));
    let elapsed = now_ms.saturating_sub(animation.start_time);
    let advanced = elapsed.saturating_mul(u64::from(animation.frame_rate_speed)) / 1000;
    let frame = if animation.is_loop {
        advanced % frames
    } else {
        advanced.min(frames - 1)
    };
    u32::try_from(frame).unwrap_or(0)
}

impl Default for AnimationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl_system!(AnimationSystem);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_selection() {
        // 2 frames at 15 fps: a frame lasts ~66ms.
        let looping = Animation::new(2, 15, true, 100);
        assert_eq!(frame_at(&looping, 100), 0);
        assert_eq!(frame_at(&looping, 167), 1);
        assert_eq!(frame_at(&looping, 234), 0);
        assert_eq!(frame_at(&looping, 50), 0);

        let once = Animation::new(3, 10, false, 0);
        assert_eq!(frame_at(&once, 150), 1);
        assert_eq!(frame_at(&once, 10_000), 2);
    }

    #[test]
    fn test_source_rect_follows_frame() {
        let mut registry = Registry::new();
        registry.add_system(AnimationSystem::new());
        let radar = registry
            .spawn()
            .with(Sprite::new("radar-image", 64, 64, 2).fixed())
            .with(Animation::new(8, 5, true, 0))
            .id();
        registry.update();

        registry.run_system::<AnimationSystem, _>(|system, registry| system.update(registry, 650));

        assert_eq!(registry.get_component::<Animation>(radar).current_frame, 3);
        assert_eq!(registry.get_component::<Sprite>(radar).src_rect.x, 192);
    }
}
