//! Tavle Core Library
//!
//! Platform-agnostic engine for an infinite spatial canvas: an unbounded 2D
//! workspace of notes, text blocks, shapes, images, video placeholders, and
//! freehand drawings, connected by directed edges and driven by a
//! pointer-based interaction state machine. The host owns the rendering
//! surface and event loop; the engine owns coordinates, state, and
//! invariants.

pub mod connection;
pub mod element;
pub mod engine;
pub mod input;
pub mod intake;
pub mod snapshot;
pub mod store;
pub mod tools;
pub mod trail;
pub mod viewport;

pub use connection::{Connection, ConnectionId, ConnectionStore};
pub use element::{Element, ElementId, ElementKind, ElementPatch, MIN_ELEMENT_SIZE};
pub use engine::{CanvasEngine, InteractionState, HANDLE_SIZE};
pub use input::{Modifiers, PointerEvent};
pub use intake::AssetDescriptor;
pub use snapshot::{BoardSnapshot, SnapshotError};
pub use store::{ElementStore, LayerMove};
pub use tools::Tool;
pub use trail::{LaserTrail, MAX_TRAIL_POINTS, TRAIL_TTL};
pub use viewport::{Viewport, MAX_SCALE, MIN_SCALE};
