//! Intake of external payloads: library drops, uploads, templates.

use crate::element::ElementKind;
use kurbo::Size;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A descriptor handed over by an external collaborator.
///
/// The engine never fetches or validates URLs; it stores them as element
/// payload for the host's renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AssetDescriptor {
    /// A video picked from the host's library.
    Video {
        #[serde(rename = "videoRef")]
        video_ref: String,
    },
    /// An uploaded image (data URL or remote URL).
    Image {
        url: String,
        #[serde(default)]
        name: String,
    },
    /// A pre-configured element from the template gallery.
    Template {
        #[serde(default)]
        kind: String,
        #[serde(default)]
        content: String,
        #[serde(default)]
        color: String,
        #[serde(default, rename = "w")]
        width: Option<f64>,
        #[serde(default, rename = "h")]
        height: Option<f64>,
    },
}

impl AssetDescriptor {
    /// Parse a descriptor from loosely-structured JSON.
    ///
    /// Drag payloads arrive partial or malformed routinely; missing fields
    /// get defaults rather than failing the whole drop. Only an unknown
    /// `type` yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let kind = value.get("type").and_then(|t| t.as_str())?;
        let str_field = |name: &str| {
            value
                .get(name)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };

        match kind {
            "video" => Some(Self::Video {
                video_ref: str_field("videoRef"),
            }),
            "image" => Some(Self::Image {
                url: str_field("url"),
                name: str_field("name"),
            }),
            "template" => Some(Self::Template {
                kind: str_field("kind"),
                content: str_field("content"),
                color: str_field("color"),
                width: value.get("w").and_then(|v| v.as_f64()),
                height: value.get("h").and_then(|v| v.as_f64()),
            }),
            other => {
                log::warn!("ignoring drop payload with unknown type {other:?}");
                None
            }
        }
    }

    /// The element kind (and explicit size, if the descriptor carries one)
    /// this payload turns into.
    ///
    /// Video and image placeholders use their kinds' contract sizes
    /// (400x225 and 400x300); templates bring their own.
    pub fn into_parts(self) -> (ElementKind, Option<Size>) {
        match self {
            Self::Video { video_ref } => (ElementKind::video(video_ref), None),
            Self::Image { url, .. } => (ElementKind::image(url), None),
            Self::Template {
                kind,
                content,
                color,
                width,
                height,
            } => {
                let color = if color.is_empty() {
                    "#fef08a".to_string()
                } else {
                    color
                };
                let element_kind = match kind.as_str() {
                    "text" => ElementKind::Text { content, color },
                    "shape" => ElementKind::Shape { color },
                    // Templates default to a sticky note.
                    _ => ElementKind::Note { content, color },
                };
                let size = match (width, height) {
                    (Some(w), Some(h)) => Some(Size::new(w, h)),
                    // Partial sizes fall back to the kind default.
                    _ => None,
                };
                (element_kind, size)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CanvasEngine;
    use kurbo::{Point, Vec2};
    use serde_json::json;

    #[test]
    fn test_video_descriptor_round_trip() {
        let desc = AssetDescriptor::Video {
            video_ref: "launch-keynote".to_string(),
        };
        let json = serde_json::to_string(&desc).unwrap();
        assert!(json.contains("\"type\":\"video\""));
        assert!(json.contains("\"videoRef\":\"launch-keynote\""));
        let back: AssetDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, desc);
    }

    #[test]
    fn test_serde_and_from_value_accept_same_document() {
        let doc = json!({
            "type": "template",
            "kind": "note",
            "content": "agenda",
            "color": "#fde68a",
            "w": 200.0,
            "h": 160.0,
        });
        let strict: AssetDescriptor = serde_json::from_value(doc.clone()).unwrap();
        let lenient = AssetDescriptor::from_value(&doc).unwrap();
        assert_eq!(strict, lenient);
    }

    #[test]
    fn test_from_value_defaults_missing_fields() {
        let desc = AssetDescriptor::from_value(&json!({ "type": "image" })).unwrap();
        let AssetDescriptor::Image { url, name } = desc else {
            panic!("expected image descriptor");
        };
        assert!(url.is_empty());
        assert!(name.is_empty());
    }

    #[test]
    fn test_from_value_unknown_type() {
        assert!(AssetDescriptor::from_value(&json!({ "type": "hologram" })).is_none());
        assert!(AssetDescriptor::from_value(&json!({})).is_none());
    }

    #[test]
    fn test_template_parts() {
        let desc = AssetDescriptor::from_value(&json!({
            "type": "template",
            "kind": "shape",
            "color": "#fca5a5",
            "w": 240.0,
            "h": 120.0,
        }))
        .unwrap();
        let (kind, size) = desc.into_parts();
        assert!(matches!(kind, ElementKind::Shape { .. }));
        let size = size.unwrap();
        assert!((size.width - 240.0).abs() < f64::EPSILON);
        assert!((size.height - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ingest_converts_drop_position() {
        let mut engine = CanvasEngine::new();
        engine.viewport.pan = Vec2::new(100.0, 0.0);
        engine.viewport.scale = 2.0;

        let id = engine.ingest(
            AssetDescriptor::Video {
                video_ref: "intro".to_string(),
            },
            Point::new(300.0, 400.0),
        );

        let el = engine.elements().get(id).unwrap();
        // screen (300, 400) -> world (100, 200), the element's center.
        let center = el.center();
        assert!((center.x - 100.0).abs() < f64::EPSILON);
        assert!((center.y - 200.0).abs() < f64::EPSILON);
        assert!((el.width - 400.0).abs() < f64::EPSILON);
        assert!((el.height - 225.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ingest_respects_min_size() {
        let mut engine = CanvasEngine::new();
        let id = engine.ingest(
            AssetDescriptor::Template {
                kind: "note".to_string(),
                content: String::new(),
                color: String::new(),
                width: Some(4.0),
                height: Some(4.0),
            },
            Point::ZERO,
        );
        let el = engine.elements().get(id).unwrap();
        assert!((el.width - crate::element::MIN_ELEMENT_SIZE).abs() < f64::EPSILON);
        assert!((el.height - crate::element::MIN_ELEMENT_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ingest_assigns_top_layer() {
        let mut engine = CanvasEngine::new();
        let a = engine.create_element(ElementKind::note(), Point::ZERO, None);
        let b = engine.ingest(
            AssetDescriptor::Image {
                url: "data:image/png;base64,AAAA".to_string(),
                name: "pasted".to_string(),
            },
            Point::ZERO,
        );
        assert!(engine.elements().get(a).unwrap().layer < engine.elements().get(b).unwrap().layer);
    }
}
