//! The interaction state machine tying viewport, stores, and tools together.

use crate::connection::{ConnectionId, ConnectionStore};
use crate::element::{Element, ElementId, ElementKind, ElementPatch, STROKE_PADDING};
use crate::input::PointerEvent;
use crate::intake::AssetDescriptor;
use crate::snapshot::BoardSnapshot;
use crate::store::{ElementStore, LayerMove};
use crate::tools::Tool;
use crate::trail::LaserTrail;
use crate::viewport::Viewport;
use kurbo::{Point, Size, Vec2};

/// Screen-space side length of the resize grab handle.
///
/// Converted to world units per zoom level so the target stays a constant
/// visual size.
pub const HANDLE_SIZE: f64 = 16.0;

/// Current gesture of the state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Panning {
        last_screen: Point,
    },
    DraggingElement {
        id: ElementId,
        /// Offset from the pointer to the element origin, in world units.
        grab: Vec2,
    },
    ResizingElement {
        id: ElementId,
    },
    DrawingStroke {
        points: Vec<Point>,
    },
    Connecting {
        from: ElementId,
        cursor: Point,
    },
    LaserActive,
}

/// The canvas engine: single synchronous entry point for every mutation.
///
/// Pointer events, host-facing operations, and asset intake all funnel
/// through here, so the store invariants (unique ids, minimum size, lock
/// policy, no dangling connections) hold on every path. All processing is
/// synchronous and in arrival order; there is no background work.
#[derive(Debug, Clone, Default)]
pub struct CanvasEngine {
    pub viewport: Viewport,
    elements: ElementStore,
    connections: ConnectionStore,
    selection: Option<ElementId>,
    tool: Tool,
    state: InteractionState,
    trail: LaserTrail,
    present_mode: bool,
}

impl CanvasEngine {
    /// Create an empty engine.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &ElementStore {
        &self.elements
    }

    pub fn connections(&self) -> &ConnectionStore {
        &self.connections
    }

    pub fn trail(&self) -> &LaserTrail {
        &self.trail
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// The active selection as data (survives present mode).
    pub fn selection(&self) -> Option<ElementId> {
        self.selection
    }

    /// The selection to highlight; suppressed while presenting.
    pub fn selection_highlight(&self) -> Option<ElementId> {
        if self.present_mode { None } else { self.selection }
    }

    /// Switch tools, aborting any gesture in flight.
    pub fn set_tool(&mut self, tool: Tool) {
        self.cancel();
        self.tool = tool;
    }

    pub fn present_mode(&self) -> bool {
        self.present_mode
    }

    /// Toggle present mode: a capability gate, not a data change.
    ///
    /// Entering aborts any mutating gesture and drops the selection
    /// highlight; pan and zoom stay available throughout.
    pub fn set_present_mode(&mut self, on: bool) {
        if on && !self.present_mode {
            self.cancel();
            self.selection = None;
        }
        self.present_mode = on;
    }

    /// Abort the current gesture, discarding partial results.
    pub fn cancel(&mut self) {
        self.state = InteractionState::Idle;
    }

    /// Feed one pointer event through the state machine.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position } => self.pointer_down(position),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position } => self.pointer_up(position),
            PointerEvent::Scroll {
                position,
                delta,
                modifiers,
            } => {
                if modifiers.zooms() {
                    // Wheel up zooms in at the cursor.
                    self.viewport.zoom_around(position, -delta.y);
                } else {
                    // Plain wheel pans the canvas under the viewport.
                    self.viewport.pan_by(Vec2::new(-delta.x, -delta.y));
                }
            }
        }
    }

    fn pointer_down(&mut self, screen: Point) {
        let world = self.viewport.screen_to_world(screen);

        // Hand panning, wheel navigation, and the laser pointer survive
        // present mode; they never mutate the board.
        if self.tool == Tool::Hand {
            self.state = InteractionState::Panning {
                last_screen: screen,
            };
            return;
        }
        if self.tool == Tool::Laser {
            self.trail.push(world);
            self.state = InteractionState::LaserActive;
            return;
        }
        if self.present_mode {
            return;
        }

        if let Some(kind) = self.tool.creates() {
            let id = self.elements.create(kind, world, None);
            self.selection = Some(id);
            self.tool = Tool::Select;
            return;
        }

        match self.tool {
            Tool::Select => self.select_down(world),
            Tool::Connector => {
                if let Some(from) = self.elements.top_hit(world) {
                    self.state = InteractionState::Connecting {
                        from,
                        cursor: world,
                    };
                }
            }
            Tool::Pen => {
                self.state = InteractionState::DrawingStroke {
                    points: vec![world],
                };
            }
            // Creation tools, Hand, and Laser were handled above.
            _ => {}
        }
    }

    fn select_down(&mut self, world: Point) {
        // Grabbing the resize handle of the already-selected element wins
        // over hitting whatever is underneath it.
        if let Some(id) = self.selection {
            if let Some(element) = self.elements.get(id) {
                if !element.locked && self.hit_resize_handle(element, world) {
                    self.state = InteractionState::ResizingElement { id };
                    return;
                }
            }
        }

        match self.elements.top_hit(world) {
            Some(id) => {
                self.selection = Some(id);
                // The element stays addressable while locked, it just
                // refuses to move.
                let locked = self.elements.get(id).map(|e| e.locked).unwrap_or(true);
                if !locked {
                    let origin = self.elements.get(id).map(|e| e.position).unwrap_or(world);
                    self.state = InteractionState::DraggingElement {
                        id,
                        grab: origin - world,
                    };
                }
            }
            None => self.selection = None,
        }
    }

    fn hit_resize_handle(&self, element: &Element, world: Point) -> bool {
        let half = self.viewport.screen_len_to_world(HANDLE_SIZE);
        let corner = element.bottom_right();
        (world.x - corner.x).abs() <= half && (world.y - corner.y).abs() <= half
    }

    fn pointer_move(&mut self, screen: Point) {
        let world = self.viewport.screen_to_world(screen);

        match &mut self.state {
            InteractionState::Idle => {}
            InteractionState::Panning { last_screen } => {
                let delta = screen - *last_screen;
                *last_screen = screen;
                self.viewport.pan_by(delta);
            }
            InteractionState::DraggingElement { id, grab } => {
                let target = world + *grab;
                let id = *id;
                self.elements.update(
                    id,
                    &ElementPatch {
                        x: Some(target.x),
                        y: Some(target.y),
                        ..Default::default()
                    },
                );
            }
            InteractionState::ResizingElement { id } => {
                let id = *id;
                if let Some(origin) = self.elements.get(id).map(|e| e.position) {
                    self.elements.update(
                        id,
                        &ElementPatch {
                            w: Some(world.x - origin.x),
                            h: Some(world.y - origin.y),
                            ..Default::default()
                        },
                    );
                }
            }
            InteractionState::DrawingStroke { points } => points.push(world),
            InteractionState::Connecting { cursor, .. } => *cursor = world,
            InteractionState::LaserActive => self.trail.push(world),
        }
    }

    fn pointer_up(&mut self, screen: Point) {
        let world = self.viewport.screen_to_world(screen);

        // Always lands back in Idle, including for releases delivered from
        // outside the canvas bounds: a stuck gesture is a defect.
        match std::mem::take(&mut self.state) {
            InteractionState::Connecting { from, .. } => {
                match self.elements.top_hit(world) {
                    Some(to) if to != from => {
                        self.connections.create(from, to);
                    }
                    // Released over the source element or empty canvas:
                    // discarded, not an error.
                    _ => {}
                }
            }
            InteractionState::DrawingStroke { points } => {
                if let Some(element) = Element::from_stroke(&points, STROKE_PADDING) {
                    let id = self.elements.insert_on_top(element);
                    self.selection = Some(id);
                }
            }
            // Drag, resize, pan, and laser just commit what already happened.
            _ => {}
        }
    }

    // Host-facing store operations. These are the same funnel the pointer
    // paths use, so external collaborators cannot bypass the invariants.

    /// Create an element centered at a world point.
    pub fn create_element(
        &mut self,
        kind: ElementKind,
        center: Point,
        size: Option<Size>,
    ) -> ElementId {
        self.elements.create(kind, center, size)
    }

    /// Patch an element. Silent no-op on unknown id.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        self.elements.update(id, patch)
    }

    /// Reorder an element's layer.
    pub fn move_layer(&mut self, id: ElementId, dir: LayerMove) -> bool {
        self.elements.move_layer(id, dir)
    }

    /// Delete an element and synchronously prune its connections.
    ///
    /// Silent no-op on unknown id. This and [`Self::delete_selected`] are
    /// the only element-delete paths, so a dangling connection endpoint can
    /// never be observed.
    pub fn delete_element(&mut self, id: ElementId) -> bool {
        if self.elements.remove(id).is_none() {
            return false;
        }
        self.connections.prune_endpoint(id);
        if self.selection == Some(id) {
            self.selection = None;
        }
        if let InteractionState::DraggingElement { id: active, .. }
        | InteractionState::ResizingElement { id: active }
        | InteractionState::Connecting { from: active, .. } = &self.state
        {
            if *active == id {
                self.state = InteractionState::Idle;
            }
        }
        true
    }

    /// Delete the selected element, unless it is locked.
    ///
    /// Locked elements must be explicitly unlocked before deletion; this is
    /// a safety invariant, not an error.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selection else {
            return false;
        };
        let locked = match self.elements.get(id) {
            Some(element) => element.locked,
            None => {
                self.selection = None;
                return false;
            }
        };
        if locked {
            log::debug!("refusing to delete locked element {id}");
            return false;
        }
        self.delete_element(id)
    }

    /// Connect two elements. Silently rejects self-edges, duplicates, and
    /// unknown endpoints.
    pub fn connect(&mut self, from: ElementId, to: ElementId) -> Option<ConnectionId> {
        if !self.elements.contains(from) || !self.elements.contains(to) {
            return None;
        }
        self.connections.create(from, to)
    }

    /// Remove a single connection. Silent no-op on unknown id.
    pub fn delete_connection(&mut self, id: ConnectionId) -> bool {
        self.connections.remove(id)
    }

    /// Both collections as plain data for the host to persist.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            elements: self.elements.to_vec(),
            connections: self.connections.to_vec(),
        }
    }

    /// Replace the canvas contents from a snapshot.
    ///
    /// Ids are repopulated exactly as given (never regenerated) so the
    /// snapshot's connections stay valid. Connections whose endpoints did
    /// not both survive are dropped on the way in, re-establishing the
    /// no-dangling invariant even for snapshots from a buggy host.
    pub fn restore(&mut self, snapshot: BoardSnapshot) {
        self.cancel();
        self.selection = None;
        self.elements.clear();
        self.connections.clear();
        for element in snapshot.elements {
            self.elements.insert(element);
        }
        for connection in snapshot.connections {
            if connection.from != connection.to
                && self.elements.contains(connection.from)
                && self.elements.contains(connection.to)
            {
                self.connections.insert(connection);
            }
        }
    }

    /// Ingest an external payload (library drop, upload, template) at a
    /// screen position.
    ///
    /// The single seam for all external collaborators; it converts through
    /// the viewport and calls the normal creation path, so minimum size,
    /// unique ids, and layer assignment all apply.
    pub fn ingest(&mut self, descriptor: AssetDescriptor, screen_drop: Point) -> ElementId {
        let world = self.viewport.screen_to_world(screen_drop);
        let (kind, size) = descriptor.into_parts();
        log::debug!("ingest external asset at {world:?}");
        self.elements.create(kind, world, size)
    }
}
