//! Undirected graph of free-form links between entity ids.
//!
//! The graph does not know what the ids refer to. Connecting two ids always
//! records the edge from both ends, so every adjacency entry has a mirror.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One end of an edge, as seen from the other end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// The entity at the far end.
    pub other_id: String,
    /// Why the two are connected. May be empty.
    pub reason: String,
}

/// Symmetric adjacency lists keyed by entity id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryGraph {
    edges: HashMap<String, Vec<Connection>>,
}

impl StoryGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect two entities in both directions.
    ///
    /// Repeated calls add parallel edges. Connecting an id to itself records
    /// the self-loop twice under the same id.
    pub fn connect(&mut self, a_id: impl AsRef<str>, b_id: impl AsRef<str>, reason: impl Into<String>) {
        let (a, b) = (a_id.as_ref(), b_id.as_ref());
        let reason = reason.into();

        self.edges.entry(a.to_string()).or_default().push(Connection {
            other_id: b.to_string(),
            reason: reason.clone(),
        });
        self.edges.entry(b.to_string()).or_default().push(Connection {
            other_id: a.to_string(),
            reason,
        });
    }

    /// All connections of an entity, in insertion order.
    pub fn connections_for(&self, id: impl AsRef<str>) -> &[Connection] {
        self.edges
            .get(id.as_ref())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check if two entities share at least one edge.
    pub fn are_connected(&self, a_id: impl AsRef<str>, b_id: impl AsRef<str>) -> bool {
        let b = b_id.as_ref();
        self.connections_for(a_id).iter().any(|c| c.other_id == b)
    }

    /// Remove an entity and every edge that points at it.
    ///
    /// Returns the number of edges removed (each undirected edge counts once).
    pub fn disconnect_all(&mut self, id: impl AsRef<str>) -> usize {
        let id = id.as_ref();
        let Some(own) = self.edges.remove(id) else {
            return 0;
        };

        for conn in &own {
            if conn.other_id == id {
                continue;
            }
            if let Some(list) = self.edges.get_mut(&conn.other_id) {
                list.retain(|c| c.other_id != id);
                if list.is_empty() {
                    self.edges.remove(&conn.other_id);
                }
            }
        }

        // Self-loops appear twice in the entity's own list.
        let self_loops = own.iter().filter(|c| c.other_id == id).count();
        own.len() - self_loops / 2
    }

    /// Ids that have at least one connection.
    pub fn entity_ids(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    /// Number of ids with at least one connection.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn clear(&mut self) {
        self.edges.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_is_symmetric() {
        let mut graph = StoryGraph::new();
        graph.connect("a", "b", "rivals");

        assert_eq!(
            graph.connections_for("a"),
            &[Connection {
                other_id: "b".into(),
                reason: "rivals".into()
            }]
        );
        assert_eq!(
            graph.connections_for("b"),
            &[Connection {
                other_id: "a".into(),
                reason: "rivals".into()
            }]
        );
    }

    #[test]
    fn test_unknown_id_has_no_connections() {
        let graph = StoryGraph::new();
        assert!(graph.connections_for("nobody").is_empty());
    }

    #[test]
    fn test_parallel_edges_are_kept() {
        let mut graph = StoryGraph::new();
        graph.connect("a", "b", "");
        graph.connect("a", "b", "");
        assert_eq!(graph.connections_for("a").len(), 2);
        assert_eq!(graph.connections_for("b").len(), 2);
    }

    #[test]
    fn test_self_loop() {
        let mut graph = StoryGraph::new();
        graph.connect("a", "a", "talks to itself");
        assert_eq!(graph.connections_for("a").len(), 2);
        assert_eq!(graph.disconnect_all("a"), 1);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_disconnect_all() {
        let mut graph = StoryGraph::new();
        graph.connect("a", "b", "friends");
        graph.connect("a", "c", "siblings");
        graph.connect("b", "c", "neighbours");

        assert_eq!(graph.disconnect_all("a"), 2);
        assert!(graph.connections_for("a").is_empty());
        assert!(!graph.are_connected("b", "a"));
        assert!(graph.are_connected("b", "c"));
        assert_eq!(graph.len(), 2);
    }
}
