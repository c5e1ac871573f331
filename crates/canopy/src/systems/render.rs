//! Draw passes over a [`RenderTarget`].

use canopy_core::{Registry, SystemCore};

use crate::components::{BoxCollider, Health, Sprite, Transform};
use crate::math::{px, Rect};
use crate::render::{Color, RenderTarget, SpriteDraw};

/// Width of a full health bar, in pixels.
const HEALTH_BAR_WIDTH: i32 = 32;
const HEALTH_BAR_HEIGHT: i32 = 5;
const HEALTH_BAR_LIFT: i32 = 10;
const HEALTH_TEXT_GAP: i32 = 10;

/// Draws sprites in ascending z order.
///
/// World sprites are shifted by the camera and skipped when they fall
/// outside the viewport. Fixed sprites are drawn at their raw position.
pub struct RenderSystem {
    core: SystemCore,
}

impl RenderSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: SystemCore::new()
                .require::<Sprite>()
                .require::<Transform>()
                .order_by::<Sprite>(|sprite: &Sprite| i64::from(sprite.z_index)),
        }
    }

    /// Draws every visible sprite.
    ///
    /// # Returns
    ///
    /// The number of sprites drawn.
    pub fn update(&self, registry: &Registry, target: &mut dyn RenderTarget, camera: Rect) -> usize {
        let viewport = Rect::new(0, 0, camera.w, camera.h);
        let mut drawn = 0;

        for &entity in self.core.entities() {
            let transform = registry.get_component::<Transform>(entity);
            let sprite = registry.get_component::<Sprite>(entity);

            let (shift_x, shift_y) = if sprite.is_fixed { (0, 0) } else { (camera.x, camera.y) };
            let dest = Rect::new(
                px(transform.position.x) - shift_x,
                px(transform.position.y) - shift_y,
                px(f64::from(sprite.width) * transform.scale.x),
                px(f64::from(sprite.height) * transform.scale.y),
            );
            if !sprite.is_fixed && !dest.intersects(viewport) {
                continue;
            }

            target.draw_sprite(&SpriteDraw {
                asset_id: &sprite.asset_id,
                src: sprite.src_rect,
                dest,
                rotation: transform.rotation,
                flip: sprite.flip,
            });
            drawn += 1;
        }
        drawn
    }
}

impl Default for RenderSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl_system!(RenderSystem);

/// Debug outlines of every collider, red while colliding.
pub struct RenderColliderSystem {
    core: SystemCore,
}

impl RenderColliderSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: SystemCore::new().require::<Transform>().require::<BoxCollider>(),
        }
    }

    /// Outlines each collider in screen space.
    pub fn update(&self, registry: &Registry, target: &mut dyn RenderTarget, camera: Rect) {
        for &entity in self.core.entities() {
            let transform = registry.get_component::<Transform>(entity);
            let collider = registry.get_component::<BoxCollider>(entity);

            let outline = Rect::new(
                px(transform.position.x + collider.offset.x * transform.scale.x) - camera.x,
                px(transform.position.y + collider.offset.y * transform.scale.y) - camera.y,
                px(f64::from(collider.width) * transform.scale.x),
                px(f64::from(collider.height) * transform.scale.y),
            );
            let color = if collider.is_colliding { Color::RED } else { Color::GREEN };
            target.draw_rect(outline, color);
        }
    }
}

impl Default for RenderColliderSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl_system!(RenderColliderSystem);

/// Health bars with a percentage label above each unit.
pub struct RenderHealthSystem {
    core: SystemCore,
}

impl RenderHealthSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: SystemCore::new().require::<Health>().require::<Transform>(),
        }
    }

    /// Draws a bar and label per entity.
    pub fn update(&self, registry: &Registry, target: &mut dyn RenderTarget, camera: Rect) {
        for &entity in self.core.entities() {
            let position = registry.get_component::<Transform>(entity).position;
            let health = registry.get_component::<Health>(entity).health_percentage;

            let color = health_color(health);
            let x = px(position.x) - camera.x;
            let y = px(position.y) - HEALTH_BAR_LIFT - camera.y;
            let width = HEALTH_BAR_WIDTH * health.clamp(0, 100) / 100;

            target.fill_rect(Rect::new(x, y, width, HEALTH_BAR_HEIGHT), color);
            target.draw_text(&format!("{health}%"), x + width + HEALTH_TEXT_GAP, y, color);
        }
    }
}

impl Default for RenderHealthSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl_system!(RenderHealthSystem);

/// Bar color for a health percentage.
#[must_use]
pub fn health_color(health_percentage: i32) -> Color {
    match health_percentage {
        71.. => Color::GREEN,
        31..=70 => Color::YELLOW,
        _ => Color::RED,
    }
}
