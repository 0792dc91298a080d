//! Directed connections between elements.

use crate::element::ElementId;
use crate::store::ElementStore;
use kurbo::{CubicBez, Point};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a connection.
pub type ConnectionId = Uuid;

/// A directed edge between two elements.
///
/// Purely referential: no geometry of its own. The rendered curve is derived
/// from the endpoint elements' current centers every frame, so it can never
/// drift out of sync as elements move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub from: ElementId,
    pub to: ElementId,
}

impl Connection {
    /// Cubic curve between the endpoint centers, bowed along the x axis.
    ///
    /// `None` if either endpoint is gone; callers skip rather than error,
    /// since pruning runs in the same call as element deletion.
    pub fn curve(&self, elements: &ElementStore) -> Option<CubicBez> {
        let a = elements.get(self.from)?.center();
        let b = elements.get(self.to)?.center();
        let bow = ((b.x - a.x) / 2.0).abs().max(40.0);
        Some(CubicBez::new(
            a,
            Point::new(a.x + bow, a.y),
            Point::new(b.x - bow, b.y),
            b,
        ))
    }
}

/// The collection of connections, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectionStore {
    connections: Vec<Connection>,
}

impl ConnectionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect `from` to `to` and return the new connection's id.
    ///
    /// Self-referential edges and duplicates of an existing directed pair
    /// are silently rejected.
    pub fn create(&mut self, from: ElementId, to: ElementId) -> Option<ConnectionId> {
        if from == to {
            return None;
        }
        if self.connections.iter().any(|c| c.from == from && c.to == to) {
            return None;
        }
        let id = Uuid::new_v4();
        log::debug!("connect {from} -> {to}");
        self.connections.push(Connection { id, from, to });
        Some(id)
    }

    /// Re-add a connection verbatim (snapshot restore path).
    pub fn insert(&mut self, connection: Connection) {
        self.connections.push(connection);
    }

    /// Remove every connection touching the given element.
    ///
    /// Invoked synchronously whenever an element is deleted, so a dangling
    /// endpoint can never be observed. Returns how many edges went away.
    pub fn prune_endpoint(&mut self, element: ElementId) -> usize {
        let before = self.connections.len();
        self.connections
            .retain(|c| c.from != element && c.to != element);
        before - self.connections.len()
    }

    /// Remove a single connection by id. Silent no-op on unknown id.
    pub fn remove(&mut self, id: ConnectionId) -> bool {
        let before = self.connections.len();
        self.connections.retain(|c| c.id != id);
        before != self.connections.len()
    }

    /// All connections, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    /// All connections as plain data.
    pub fn to_vec(&self) -> Vec<Connection> {
        self.connections.clone()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn clear(&mut self) {
        self.connections.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;

    #[test]
    fn test_rejects_self_edge() {
        let mut conns = ConnectionStore::new();
        let id = ElementId::new_v4();
        assert!(conns.create(id, id).is_none());
        assert!(conns.is_empty());
    }

    #[test]
    fn test_rejects_duplicate_pair() {
        let mut conns = ConnectionStore::new();
        let a = ElementId::new_v4();
        let b = ElementId::new_v4();
        assert!(conns.create(a, b).is_some());
        assert!(conns.create(a, b).is_none());
        // The reverse direction is a distinct edge.
        assert!(conns.create(b, a).is_some());
        assert_eq!(conns.len(), 2);
    }

    #[test]
    fn test_prune_endpoint() {
        let mut conns = ConnectionStore::new();
        let a = ElementId::new_v4();
        let b = ElementId::new_v4();
        let c = ElementId::new_v4();
        conns.create(a, b);
        conns.create(b, c);
        conns.create(c, a);

        let removed = conns.prune_endpoint(b);
        assert_eq!(removed, 2);
        assert_eq!(conns.len(), 1);
        assert!(conns.iter().all(|c2| c2.from != b && c2.to != b));
    }

    #[test]
    fn test_curve_follows_centers() {
        let mut elements = ElementStore::new();
        let a = elements.create(ElementKind::note(), Point::new(0.0, 0.0), None);
        let b = elements.create(ElementKind::note(), Point::new(500.0, 200.0), None);

        let mut conns = ConnectionStore::new();
        conns.create(a, b).unwrap();
        let conn = conns.iter().next().unwrap().clone();

        let curve = conn.curve(&elements).unwrap();
        assert!((curve.p0.x - 0.0).abs() < f64::EPSILON);
        assert!((curve.p3.x - 500.0).abs() < f64::EPSILON);

        // Move an endpoint; the derived curve moves with it.
        elements.update(
            a,
            &crate::element::ElementPatch {
                x: Some(100.0),
                ..Default::default()
            },
        );
        let curve = conn.curve(&elements).unwrap();
        let moved = elements.get(a).unwrap().center();
        assert!((curve.p0.x - moved.x).abs() < f64::EPSILON);
    }

    #[test]
    fn test_curve_none_when_endpoint_missing() {
        let mut elements = ElementStore::new();
        let a = elements.create(ElementKind::note(), Point::ZERO, None);
        let conn = Connection {
            id: Uuid::new_v4(),
            from: a,
            to: ElementId::new_v4(),
        };
        assert!(conn.curve(&elements).is_none());
    }
}
