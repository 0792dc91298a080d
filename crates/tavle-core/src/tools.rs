//! Tool selection for the canvas.

use crate::element::ElementKind;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Tool {
    #[default]
    Select,
    /// Pan the viewport by dragging.
    Hand,
    Note,
    Text,
    Shape,
    Image,
    /// Drag from one element to another to create a connection.
    Connector,
    /// Freehand drawing.
    Pen,
    /// Non-persistent pointer highlight.
    Laser,
}

impl Tool {
    /// The element kind this tool places on click, if it is a creation tool.
    ///
    /// Creation tools revert to `Select` after placing one element.
    pub fn creates(&self) -> Option<ElementKind> {
        match self {
            Tool::Note => Some(ElementKind::note()),
            Tool::Text => Some(ElementKind::text()),
            Tool::Shape => Some(ElementKind::shape()),
            // Placed with an empty URL; the host's upload pipeline fills it in.
            Tool::Image => Some(ElementKind::image("")),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_tools() {
        assert!(Tool::Note.creates().is_some());
        assert!(Tool::Shape.creates().is_some());
        assert!(Tool::Select.creates().is_none());
        assert!(Tool::Connector.creates().is_none());
        assert!(Tool::Laser.creates().is_none());
    }
}
