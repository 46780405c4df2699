use crate::graph::Graph;
use crate::hit_test::Hit;
use crate::model::{Edge, Node};
use serde::Serialize;

/// Current selection: one node, one edge, or nothing.
///
/// The selection keeps a snapshot of the selected element so the properties
/// pane can render it without a lookup; [`Selection::refresh`] brings the
/// snapshot in line with a new graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Selection {
    #[default]
    None,
    Node(Node),
    Edge(Edge),
}

/// Descriptor handed to the properties pane.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum SelectedElement {
    Node(Node),
    Edge(Edge),
}

impl Selection {
    pub fn from_hit(hit: Option<Hit<'_>>) -> Self {
        match hit {
            Some(Hit::Node(node)) => Selection::Node(node.clone()),
            Some(Hit::Edge(edge)) => Selection::Edge(edge.clone()),
            None => Selection::None,
        }
    }

    pub fn clear(&mut self) {
        *self = Selection::None;
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::None)
    }

    pub fn node(&self) -> Option<&Node> {
        match self {
            Selection::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn edge(&self) -> Option<&Edge> {
        match self {
            Selection::Edge(edge) => Some(edge),
            _ => None,
        }
    }

    /// Check if the node with `id` is selected
    pub fn is_node(&self, id: &str) -> bool {
        self.node().is_some_and(|n| n.id == id)
    }

    /// Check if the edge with `id` is selected
    pub fn is_edge(&self, id: &str) -> bool {
        self.edge().is_some_and(|e| e.id == id)
    }

    /// Re-read the selected element from `graph`.
    ///
    /// Returns `true` if the snapshot changed. A selected element that no
    /// longer exists clears the selection.
    pub fn refresh(&mut self, graph: &Graph) -> bool {
        let refreshed = match self {
            Selection::None => Selection::None,
            Selection::Node(node) => graph
                .find_node(&node.id)
                .cloned()
                .map_or(Selection::None, Selection::Node),
            Selection::Edge(edge) => graph
                .find_edge(&edge.id)
                .cloned()
                .map_or(Selection::None, Selection::Edge),
        };
        let changed = refreshed != *self;
        *self = refreshed;
        changed
    }

    pub fn element(&self) -> Option<SelectedElement> {
        match self {
            Selection::None => None,
            Selection::Node(node) => Some(SelectedElement::Node(node.clone())),
            Selection::Edge(edge) => Some(SelectedElement::Edge(edge.clone())),
        }
    }
}
