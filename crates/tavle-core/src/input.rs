//! Pointer event vocabulary shared with the host.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Whether a wheel gesture with these modifiers should zoom
    /// (plain wheel input pans instead).
    pub fn zooms(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A pointer event in screen coordinates.
///
/// The host delivers these in strict arrival order; a gesture is always a
/// `Down`, zero or more `Move`s, then an `Up` — even when the pointer is
/// released outside the canvas bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
    Scroll {
        position: Point,
        delta: Vec2,
        modifiers: Modifiers,
    },
}
