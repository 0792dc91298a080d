//! The authoritative collection of placed elements.

use crate::element::{Element, ElementId, ElementKind, ElementPatch};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Direction for a layer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerMove {
    /// Bring to front: `max(all layers) + 1`.
    Up,
    /// Step back one layer, floored at zero.
    Down,
}

/// Mapping of id to element, with deterministic paint order.
///
/// Every mutation path funnels through the operations here so the shared
/// invariants (unique ids, minimum size, lock policy) hold at every call
/// site. Elements render in ascending `layer`, ties broken by insertion
/// order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementStore {
    elements: HashMap<ElementId, Element>,
    /// Insertion order, used as the stable tie-break for equal layers.
    arrival: Vec<ElementId>,
}

impl ElementStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new element centered at a world point and return its id.
    ///
    /// The element lands on top: its layer is one above the current maximum.
    /// Never fails; geometry is clamped to the minimum size.
    pub fn create(&mut self, kind: ElementKind, center: Point, size: Option<Size>) -> ElementId {
        let mut element = Element::new(kind, center, size);
        element.layer = self.max_layer().map_or(0, |l| l + 1);
        let id = element.id;
        log::debug!("create element {id} at layer {}", element.layer);
        self.arrival.push(id);
        self.elements.insert(id, element);
        id
    }

    /// Insert a fully-formed element, keeping its id and layer exactly.
    ///
    /// Used by stroke commit and by snapshot restore, where ids must be
    /// preserved so connections stay valid.
    pub fn insert(&mut self, element: Element) -> ElementId {
        let id = element.id;
        if !self.elements.contains_key(&id) {
            self.arrival.push(id);
        }
        self.elements.insert(id, element);
        id
    }

    /// Insert an element on top of everything else, assigning its layer.
    pub fn insert_on_top(&mut self, mut element: Element) -> ElementId {
        element.layer = self.max_layer().map_or(0, |l| l + 1);
        self.insert(element)
    }

    /// Apply a patch to an element.
    ///
    /// Unknown ids are a silent no-op: deletion can race an in-flight
    /// gesture and that is routine, not an error. Locked elements reject
    /// geometry fields (see [`Element::apply`]).
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        match self.elements.get_mut(&id) {
            Some(element) => element.apply(patch),
            None => false,
        }
    }

    /// Move an element up (bring to front) or down (one step back).
    pub fn move_layer(&mut self, id: ElementId, dir: LayerMove) -> bool {
        let Some(top) = self.max_layer() else {
            return false;
        };
        let Some(element) = self.elements.get_mut(&id) else {
            return false;
        };
        element.layer = match dir {
            LayerMove::Up => top + 1,
            LayerMove::Down => (element.layer - 1).max(0),
        };
        true
    }

    /// Remove an element. Silent no-op on unknown id.
    ///
    /// Plain removal only; connection cascade is owned by the engine, which
    /// is the sole delete path.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let removed = self.elements.remove(&id);
        if removed.is_some() {
            log::debug!("remove element {id}");
            self.arrival.retain(|&a| a != id);
        }
        removed
    }

    /// Get an element by id.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Elements in paint order: ascending layer, stable on insertion order.
    pub fn ordered(&self) -> Vec<&Element> {
        let mut out: Vec<&Element> = self
            .arrival
            .iter()
            .filter_map(|id| self.elements.get(id))
            .collect();
        out.sort_by_key(|e| e.layer);
        out
    }

    /// Topmost element whose bounding box contains the world point.
    pub fn top_hit(&self, point: Point) -> Option<ElementId> {
        self.ordered()
            .iter()
            .rev()
            .find(|e| e.contains(point))
            .map(|e| e.id)
    }

    /// Highest layer currently in use.
    fn max_layer(&self) -> Option<i64> {
        self.elements.values().map(|e| e.layer).max()
    }

    /// All elements as plain data, in paint order.
    pub fn to_vec(&self) -> Vec<Element> {
        self.ordered().into_iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.arrival.clear();
    }
}
