//! Element definitions for the canvas.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an element.
pub type ElementId = Uuid;

/// Minimum element width/height, so everything stays a usable hit target.
pub const MIN_ELEMENT_SIZE: f64 = 50.0;

/// Padding added around a freehand stroke's bounding box.
pub const STROKE_PADDING: f64 = 10.0;

/// Kind-specific payload of an element.
///
/// Colors and URLs are carried as host-facing strings; the engine never
/// interprets them, it only stores and round-trips them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementKind {
    /// A sticky note with editable text.
    Note { content: String, color: String },
    /// A free-standing text block.
    Text { content: String, color: String },
    /// A filled rectangle shape.
    Shape { color: String },
    /// A raster image referenced by URL (data URL or remote).
    Image { url: String },
    /// A placeholder for a video, referenced by the host's library key.
    Video { video_ref: String },
    /// A freehand drawing; points are in the element's local frame,
    /// offset from its top-left corner.
    Drawing { points: Vec<Point>, color: String },
}

impl ElementKind {
    /// A fresh sticky note.
    pub fn note() -> Self {
        Self::Note {
            content: String::new(),
            color: "#fef08a".to_string(),
        }
    }

    /// A fresh text block.
    pub fn text() -> Self {
        Self::Text {
            content: String::new(),
            color: "#111827".to_string(),
        }
    }

    /// A fresh shape.
    pub fn shape() -> Self {
        Self::Shape {
            color: "#93c5fd".to_string(),
        }
    }

    /// An image element for the given URL.
    pub fn image(url: impl Into<String>) -> Self {
        Self::Image { url: url.into() }
    }

    /// A video placeholder for the given library reference.
    pub fn video(video_ref: impl Into<String>) -> Self {
        Self::Video {
            video_ref: video_ref.into(),
        }
    }

    /// Default bounding-box size for this kind.
    pub fn default_size(&self) -> Size {
        match self {
            Self::Note { .. } => Size::new(180.0, 180.0),
            Self::Text { .. } => Size::new(200.0, 60.0),
            Self::Shape { .. } => Size::new(160.0, 120.0),
            Self::Image { .. } => Size::new(400.0, 300.0),
            Self::Video { .. } => Size::new(400.0, 225.0),
            Self::Drawing { .. } => Size::new(MIN_ELEMENT_SIZE, MIN_ELEMENT_SIZE),
        }
    }
}

/// A placed object on the canvas.
///
/// Geometry is a world-space bounding box; `layer` controls paint order
/// (ascending, ties broken by insertion order). Locked elements reject
/// position and size mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    /// Top-left corner in world coordinates.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Paint-order index; not required to be contiguous.
    pub layer: i64,
    #[serde(default)]
    pub locked: bool,
    #[serde(flatten)]
    pub kind: ElementKind,
}

/// A partial update to an element. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub w: Option<f64>,
    pub h: Option<f64>,
    pub content: Option<String>,
    pub color: Option<String>,
    pub url: Option<String>,
    pub video_ref: Option<String>,
    pub locked: Option<bool>,
}

impl ElementPatch {
    /// Whether this patch touches position or size.
    pub fn touches_geometry(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.w.is_some() || self.h.is_some()
    }
}

impl Element {
    /// Create an element of the given kind centered on a world point.
    ///
    /// Uses the kind's default size unless one is given; either way the box
    /// is clamped to the minimum size.
    pub fn new(kind: ElementKind, center: Point, size: Option<Size>) -> Self {
        let size = size.unwrap_or_else(|| kind.default_size());
        let width = size.width.max(MIN_ELEMENT_SIZE);
        let height = size.height.max(MIN_ELEMENT_SIZE);
        Self {
            id: Uuid::new_v4(),
            position: Point::new(center.x - width / 2.0, center.y - height / 2.0),
            width,
            height,
            layer: 0,
            locked: false,
            kind,
        }
    }

    /// Build a `Drawing` element from a pen stroke in world coordinates.
    ///
    /// The element's box is the stroke's bounding box expanded by `padding`,
    /// and the points are re-expressed relative to the box origin. Strokes
    /// with fewer than two points are accidental taps and yield `None`.
    pub fn from_stroke(points: &[Point], padding: f64) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }

        let mut min = points[0];
        let mut max = points[0];
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }

        let origin = Point::new(min.x - padding, min.y - padding);
        let local: Vec<Point> = points
            .iter()
            .map(|p| Point::new(p.x - origin.x, p.y - origin.y))
            .collect();

        Some(Self {
            id: Uuid::new_v4(),
            position: origin,
            // The box still honors the minimum hit-target size; for short
            // strokes it just extends past the padded ink.
            width: ((max.x - min.x) + padding * 2.0).max(MIN_ELEMENT_SIZE),
            height: ((max.y - min.y) + padding * 2.0).max(MIN_ELEMENT_SIZE),
            layer: 0,
            locked: false,
            kind: ElementKind::Drawing {
                points: local,
                color: "#1f2937".to_string(),
            },
        })
    }

    /// World-space bounding box.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, Size::new(self.width, self.height))
    }

    /// World-space center.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// World-space bottom-right corner, where the resize handle sits.
    pub fn bottom_right(&self) -> Point {
        Point::new(self.position.x + self.width, self.position.y + self.height)
    }

    /// Check whether a world point falls inside the bounding box.
    pub fn contains(&self, point: Point) -> bool {
        self.bounds().contains(point)
    }

    /// Apply a patch, enforcing lock and minimum-size invariants.
    ///
    /// Geometry fields are rejected wholesale while the element is locked;
    /// content fields and the lock flag itself still apply. Returns whether
    /// anything changed.
    pub fn apply(&mut self, patch: &ElementPatch) -> bool {
        let mut changed = false;

        if !self.locked && patch.touches_geometry() {
            if let Some(x) = patch.x {
                self.position.x = x;
            }
            if let Some(y) = patch.y {
                self.position.y = y;
            }
            if let Some(w) = patch.w {
                self.width = w.max(MIN_ELEMENT_SIZE);
            }
            if let Some(h) = patch.h {
                self.height = h.max(MIN_ELEMENT_SIZE);
            }
            changed = true;
        }

        if let Some(content) = &patch.content {
            match &mut self.kind {
                ElementKind::Note { content: c, .. } | ElementKind::Text { content: c, .. } => {
                    *c = content.clone();
                    changed = true;
                }
                _ => {}
            }
        }
        if let Some(color) = &patch.color {
            match &mut self.kind {
                ElementKind::Note { color: c, .. }
                | ElementKind::Text { color: c, .. }
                | ElementKind::Shape { color: c }
                | ElementKind::Drawing { color: c, .. } => {
                    *c = color.clone();
                    changed = true;
                }
                _ => {}
            }
        }
        if let Some(url) = &patch.url {
            if let ElementKind::Image { url: u } = &mut self.kind {
                *u = url.clone();
                changed = true;
            }
        }
        if let Some(video_ref) = &patch.video_ref {
            if let ElementKind::Video { video_ref: v } = &mut self.kind {
                *v = video_ref.clone();
                changed = true;
            }
        }
        if let Some(locked) = patch.locked {
            if self.locked != locked {
                self.locked = locked;
                changed = true;
            }
        }

        changed
    }
}
