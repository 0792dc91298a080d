//! Snapshot boundary for host persistence.

use crate::connection::Connection;
use crate::element::Element;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Snapshot errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Plain-data snapshot of both collections.
///
/// The engine does not persist anything itself; the host serializes this and
/// hands it back later. Ids are carried verbatim in both directions so
/// restored connections keep referencing the right elements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub elements: Vec<Element>,
    pub connections: Vec<Connection>,
}

impl BoardSnapshot {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, ElementPatch};
    use crate::engine::CanvasEngine;
    use kurbo::Point;

    fn populated_engine() -> CanvasEngine {
        let mut engine = CanvasEngine::new();
        let a = engine.create_element(ElementKind::note(), Point::new(0.0, 0.0), None);
        let b = engine.create_element(ElementKind::video("intro"), Point::new(500.0, 0.0), None);
        engine.update_element(
            a,
            &ElementPatch {
                content: Some("todo".to_string()),
                ..Default::default()
            },
        );
        engine.connect(a, b);
        engine
    }

    #[test]
    fn test_snapshot_restore_preserves_ids() {
        let engine = populated_engine();
        let ids: Vec<_> = engine.elements().ordered().iter().map(|e| e.id).collect();

        let json = engine.snapshot().to_json().unwrap();
        let mut restored = CanvasEngine::new();
        restored.restore(BoardSnapshot::from_json(&json).unwrap());

        let restored_ids: Vec<_> = restored.elements().ordered().iter().map(|e| e.id).collect();
        assert_eq!(restored_ids, ids);
        assert_eq!(restored.connections().len(), 1);

        // The restored connection still resolves against the store.
        let conn = restored.connections().iter().next().unwrap();
        assert!(conn.curve(restored.elements()).is_some());
    }

    #[test]
    fn test_restore_drops_dangling_connections() {
        let engine = populated_engine();
        let mut snapshot = engine.snapshot();
        // Corrupt the snapshot: drop one endpoint element but keep the edge.
        snapshot.elements.remove(0);

        let mut restored = CanvasEngine::new();
        restored.restore(snapshot);
        assert!(restored.connections().is_empty());
    }

    #[test]
    fn test_restore_replaces_existing_state() {
        let mut engine = populated_engine();
        engine.restore(BoardSnapshot::default());
        assert!(engine.elements().is_empty());
        assert!(engine.connections().is_empty());
        assert!(engine.selection().is_none());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(BoardSnapshot::from_json("not json").is_err());
    }
}
