//! # Render Target
//!
//! The seam between the simulation and whatever draws it. Render systems
//! emit draw calls in screen pixels; a backend implements
//! [`RenderTarget`] to put them on screen. [`RecordingTarget`] keeps the
//! calls in memory for headless runs and tests.

use bytemuck::{Pod, Zeroable};

use crate::components::Flip;
use crate::math::Rect;

/// RGBA color
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Color {
    /// Creates an opaque color
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Background clear color
    pub const BACKGROUND: Self = Self::rgb(21, 21, 21);
    /// Red
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Green
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// Yellow
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
}

/// One textured quad, in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteDraw<'a> {
    /// Opaque asset identifier.
    pub asset_id: &'a str,
    /// Texture region.
    pub src: Rect,
    /// Screen region.
    pub dest: Rect,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Mirroring.
    pub flip: Flip,
}

/// Drawing backend.
pub trait RenderTarget {
    /// Clears the frame.
    fn clear(&mut self, color: Color);

    /// Draws a textured quad.
    fn draw_sprite(&mut self, sprite: &SpriteDraw<'_>);

    /// Draws a rectangle outline.
    fn draw_rect(&mut self, rect: Rect, color: Color);

    /// Draws a filled rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draws a line of text with its top-left corner at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color);

    /// Shows the finished frame.
    fn present(&mut self) {}
}

/// Owned copy of one draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// [`RenderTarget::clear`].
    Clear(Color),
    /// [`RenderTarget::draw_sprite`].
    Sprite {
        /// Asset identifier.
        asset_id: String,
        /// Texture region.
        src: Rect,
        /// Screen region.
        dest: Rect,
        /// Rotation in degrees.
        rotation: f64,
        /// Mirroring.
        flip: Flip,
    },
    /// [`RenderTarget::draw_rect`].
    Outline(Rect, Color),
    /// [`RenderTarget::fill_rect`].
    Fill(Rect, Color),
    /// [`RenderTarget::draw_text`].
    Text {
        /// The text.
        text: String,
        /// Left edge.
        x: i32,
        /// Top edge.
        y: i32,
        /// Color.
        color: Color,
    },
}

/// Render target that records every call.
#[derive(Debug, Default)]
pub struct RecordingTarget {
    commands: Vec<DrawCommand>,
    frames_presented: u64,
}

impl RecordingTarget {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded since the last [`RenderTarget::clear`].
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Asset ids of the recorded sprites, in draw order.
    pub fn sprite_ids(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Sprite { asset_id, .. } => Some(asset_id.as_str()),
            _ => None,
        })
    }

    /// Number of presented frames.
    #[must_use]
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl RenderTarget for RecordingTarget {
    fn clear(&mut self, color: Color) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_sprite(&mut self, sprite: &SpriteDraw<'_>) {
        self.commands.push(DrawCommand::Sprite {
            asset_id: sprite.asset_id.to_owned(),
            src: sprite.src,
            dest: sprite.dest,
            rotation: sprite.rotation,
            flip: sprite.flip,
        });
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Outline(rect, color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Fill(rect, color));
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            x,
            y,
            color,
        });
    }

    fn present(&mut self) {
        self.frames_presented += 1;
    }
}
