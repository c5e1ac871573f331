//! # Simulation Events
//!
//! Payloads carried by the [`canopy_core::EventBus`] during a frame, and
//! the raw input the frame loop turns into them.

use std::fmt;
use std::str::FromStr;

use canopy_core::{Entity, Event};

/// Keyboard key, as reported by the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Space bar.
    Space,
    /// Escape.
    Escape,
    /// Any printable key, lower-cased.
    Char(char),
}

/// A key name could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown key name {0:?}")]
pub struct UnknownKey(pub String);

impl FromStr for Key {
    type Err = UnknownKey;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let key = match name.to_ascii_lowercase().as_str() {
            "up" => Self::Up,
            "down" => Self::Down,
            "left" => Self::Left,
            "right" => Self::Right,
            "space" => Self::Space,
            "escape" => Self::Escape,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_whitespace() => Self::Char(c),
                    _ => return Err(UnknownKey(name.to_owned())),
                }
            }
        };
        Ok(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("Up"),
            Self::Down => f.write_str("Down"),
            Self::Left => f.write_str("Left"),
            Self::Right => f.write_str("Right"),
            Self::Space => f.write_str("Space"),
            Self::Escape => f.write_str("Escape"),
            Self::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
        }
    }
}

/// Raw input fed to [`crate::Game::process_input`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// The window was closed.
    Quit,
    /// A key went down.
    KeyDown(Key),
    /// A key went up.
    KeyUp(Key),
}

/// Two colliders overlap this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionEvent {
    /// First entity of the pair.
    pub a: Entity,
    /// Second entity of the pair.
    pub b: Entity,
}

impl Event for CollisionEvent {}

/// A key went down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPressedEvent {
    /// The key.
    pub key: Key,
}

impl Event for KeyPressedEvent {}

/// A key went up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyReleasedEvent {
    /// The key.
    pub key: Key,
}

impl Event for KeyReleasedEvent {}
