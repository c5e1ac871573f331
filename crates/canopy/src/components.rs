//! # Simulation Components
//!
//! Plain data records attached to entities. Behaviour lives in
//! [`crate::systems`]; nothing here touches the registry.
//!
//! Timestamps are milliseconds on the game's [`canopy_core::FrameClock`].

use canopy_core::Component;

use crate::math::{Rect, Vec2};

/// Placement in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// Top-left corner in world pixels.
    pub position: Vec2,
    /// Per-axis scale.
    pub scale: Vec2,
    /// Rotation in degrees.
    pub rotation: f64,
}

impl Transform {
    /// Creates a transform.
    #[must_use]
    pub const fn new(position: Vec2, scale: Vec2, rotation: f64) -> Self {
        Self {
            position,
            scale,
            rotation,
        }
    }

    /// Unscaled, unrotated transform at `position`.
    #[must_use]
    pub const fn at(position: Vec2) -> Self {
        Self::new(position, Vec2::ONE, 0.0)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(Vec2::ZERO)
    }
}

impl Component for Transform {}

/// Linear motion in pixels per second.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RigidBody {
    /// Velocity.
    pub velocity: Vec2,
}

impl RigidBody {
    /// Creates a rigid body.
    #[must_use]
    pub const fn new(velocity: Vec2) -> Self {
        Self { velocity }
    }
}

impl Component for RigidBody {}

/// Mirroring applied when drawing a sprite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Flip {
    /// Drawn as stored.
    #[default]
    None,
    /// Mirrored left to right.
    Horizontal,
    /// Mirrored top to bottom.
    Vertical,
}

/// Facing of a sprite sheet laid out as one row per direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// Row 0.
    Up,
    /// Row 1.
    #[default]
    Right,
    /// Row 2.
    Down,
    /// Row 3.
    Left,
}

impl Direction {
    /// Sprite sheet row for this facing.
    #[must_use]
    pub const fn row(self) -> i32 {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        }
    }

    /// Unit vector in screen space (y grows downwards).
    #[must_use]
    pub const fn unit(self) -> Vec2 {
        match self {
            Self::Up => Vec2::new(0.0, -1.0),
            Self::Right => Vec2::new(1.0, 0.0),
            Self::Down => Vec2::new(0.0, 1.0),
            Self::Left => Vec2::new(-1.0, 0.0),
        }
    }
}

/// Textured quad.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    /// Opaque asset identifier resolved by the presentation layer.
    pub asset_id: String,
    /// Frame width in texture pixels.
    pub width: i32,
    /// Frame height in texture pixels.
    pub height: i32,
    /// Draw order, lower first.
    pub z_index: i32,
    /// Mirroring.
    pub flip: Flip,
    /// Screen-space sprite (HUD), unaffected by the camera.
    pub is_fixed: bool,
    /// Region of the texture to draw.
    pub src_rect: Rect,
    /// Current facing.
    pub facing: Direction,
}

impl Sprite {
    /// Creates a world-space sprite showing the top-left frame.
    #[must_use]
    pub fn new(asset_id: impl Into<String>, width: i32, height: i32, z_index: i32) -> Self {
        Self {
            asset_id: asset_id.into(),
            width,
            height,
            z_index,
            flip: Flip::None,
            is_fixed: false,
            src_rect: Rect::new(0, 0, width, height),
            facing: Direction::Right,
        }
    }

    /// Makes the sprite screen-space.
    #[must_use]
    pub fn fixed(mut self) -> Self {
        self.is_fixed = true;
        self
    }

    /// Moves the source rectangle to `(x, y)` in the texture.
    #[must_use]
    pub fn with_source(mut self, x: i32, y: i32) -> Self {
        self.src_rect.x = x;
        self.src_rect.y = y;
        self
    }
}

impl Component for Sprite {}

/// Axis-aligned hit box relative to the transform.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxCollider {
    /// Width before scaling.
    pub width: i32,
    /// Height before scaling.
    pub height: i32,
    /// Offset from the transform position, before scaling.
    pub offset: Vec2,
    /// Projectiles never damage colliders on their own layer.
    pub damage_layer: u8,
    /// Set by the collision pass when overlapping anything.
    pub is_colliding: bool,
}

impl BoxCollider {
    /// Creates a collider on damage layer 0.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            offset: Vec2::ZERO,
            damage_layer: 0,
            is_colliding: false,
        }
    }

    /// Sets the damage layer.
    #[must_use]
    pub const fn on_layer(mut self, damage_layer: u8) -> Self {
        self.damage_layer = damage_layer;
        self
    }

    /// Sets the offset.
    #[must_use]
    pub const fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }
}

impl Component for BoxCollider {}

/// Frame animation over a horizontal strip of the sprite sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Animation {
    /// Frames in the strip.
    pub num_frames: u32,
    /// Frame shown now.
    pub current_frame: u32,
    /// Frames per second.
    pub frame_rate_speed: u32,
    /// Tick the animation started at.
    pub start_time: u64,
    /// Restart after the last frame instead of holding it.
    pub is_loop: bool,
}

impl Animation {
    /// Creates an animation starting at `start_time`.
    #[must_use]
    pub const fn new(num_frames: u32, frame_rate_speed: u32, is_loop: bool, start_time: u64) -> Self {
        Self {
            num_frames,
            current_frame: 0,
            frame_rate_speed,
            start_time,
            is_loop,
        }
    }
}

impl Component for Animation {}

/// Limited lifetime; the entity is killed once it expires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Lifecycle {
    /// Lifetime in milliseconds.
    pub time_to_live: u64,
    /// Tick the lifetime started at.
    pub start_time: u64,
}

impl Lifecycle {
    /// Creates a lifecycle.
    #[must_use]
    pub const fn new(time_to_live: u64, start_time: u64) -> Self {
        Self {
            time_to_live,
            start_time,
        }
    }
}

impl Component for Lifecycle {}

/// Periodic or key-triggered projectile spawner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileEmitter {
    /// Velocity given to spawned projectiles.
    pub velocity: Vec2,
    /// Milliseconds between automatic shots; 0 disables auto-fire.
    pub frequency: u64,
    /// Projectile lifetime in milliseconds.
    pub duration: u64,
    /// Health percentage a hit removes.
    pub hit_percent_damage: i32,
    /// Fired by the player side.
    pub is_friendly: bool,
    /// Tick of the last shot.
    pub last_fired_time: u64,
}

impl ProjectileEmitter {
    /// Creates an emitter whose interval starts at `now_ms`.
    #[must_use]
    pub const fn new(velocity: Vec2, frequency: u64, duration: u64, hit_percent_damage: i32, now_ms: u64) -> Self {
        Self {
            velocity,
            frequency,
            duration,
            hit_percent_damage,
            is_friendly: false,
            last_fired_time: now_ms,
        }
    }

    /// Marks the emitter as player-side.
    #[must_use]
    pub const fn friendly(mut self) -> Self {
        self.is_friendly = true;
        self
    }
}

impl Component for ProjectileEmitter {}

/// Remaining health in percent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Health {
    /// 100 is full health, 0 or less is dead.
    pub health_percentage: i32,
}

impl Health {
    /// Creates a health record.
    #[must_use]
    pub const fn new(health_percentage: i32) -> Self {
        Self { health_percentage }
    }
}

impl Component for Health {}

/// Damage dealt on hit, carried by projectiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Damage {
    /// Health percentage removed per hit.
    pub amount: i32,
    /// Fired by the player side.
    pub is_friendly: bool,
}

impl Component for Damage {}

/// Arrow-key steering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyboardControl {
    /// Speed in pixels per second.
    pub speed: f64,
}

impl Component for KeyboardControl {}

/// Marks the entity the camera centres on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CameraFollow;

impl Component for CameraFollow {}
