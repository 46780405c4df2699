//! Graph state service: export and property patches.
//!
//! Patches are JSON objects merged shallowly over a node's or edge's current
//! properties. A merged property set must still deserialize into the typed
//! struct for its kind, otherwise the patch is rejected.

use crate::config::NameScope;
use crate::error::{EditError, Result};
use crate::graph::Graph;
use crate::ids::identifier_in_use;
use crate::model::{
    projection_entity, BankProperties, CreditLineProperties, Edge, EdgeProperties, Node, NodeKind,
    NodeProperties, ProjectionProperties, StreetProperties,
};
use log::{debug, info};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::LazyLock;

static PROJECTION_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^PRJ_[A-Za-z0-9]{4}$").expect("valid projection name pattern"));

// ============================================================================
// Export
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedNode<P> {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub properties: P,
}

/// Graph state partitioned by node type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedGraph {
    pub bank_nodes: Vec<ExportedNode<BankProperties>>,
    pub credit_line_nodes: Vec<ExportedNode<CreditLineProperties>>,
    pub projection_nodes: Vec<ExportedNode<ProjectionProperties>>,
    pub street_nodes: Vec<ExportedNode<StreetProperties>>,
    pub edges: Vec<Edge>,
}

impl ExportedGraph {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rebuild a graph. Nodes come back grouped by type: banks, credit lines,
    /// projections, then streets.
    pub fn into_graph(self) -> Graph {
        fn unpack<P>(nodes: Vec<ExportedNode<P>>, wrap: fn(P) -> NodeProperties) -> impl Iterator<Item = Node> {
            nodes.into_iter().map(move |n| Node {
                id: n.id,
                x: n.x,
                y: n.y,
                properties: wrap(n.properties),
            })
        }

        let nodes = unpack(self.bank_nodes, NodeProperties::Bank)
            .chain(unpack(self.credit_line_nodes, NodeProperties::CreditLine))
            .chain(unpack(self.projection_nodes, NodeProperties::Projection))
            .chain(unpack(self.street_nodes, NodeProperties::Street))
            .collect();
        Graph { nodes, edges: self.edges }
    }
}

/// Snapshot the graph as the partitioned export shape.
pub fn export_state(graph: &Graph) -> ExportedGraph {
    let mut out = ExportedGraph { edges: graph.edges.clone(), ..Default::default() };

    for node in &graph.nodes {
        let (id, x, y) = (node.id.clone(), node.x, node.y);
        match &node.properties {
            NodeProperties::Bank(p) => {
                out.bank_nodes.push(ExportedNode { id, x, y, properties: p.clone() })
            }
            NodeProperties::CreditLine(p) => {
                out.credit_line_nodes.push(ExportedNode { id, x, y, properties: p.clone() })
            }
            NodeProperties::Projection(p) => {
                out.projection_nodes.push(ExportedNode { id, x, y, properties: p.clone() })
            }
            NodeProperties::Street(p) => {
                out.street_nodes.push(ExportedNode { id, x, y, properties: p.clone() })
            }
        }
    }
    out
}

// ============================================================================
// Validation
// ============================================================================

/// Old and new name supplied by the properties pane for credit-line renames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameHint {
    pub old_name: String,
    pub new_name: String,
}

fn patched_str<'a>(patch: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    patch.get(key).and_then(Value::as_str)
}

/// True if another node (not `node`) already uses `candidate`.
fn taken_by_other(graph: &Graph, node: &Node, kind: NodeKind, candidate: &str, scope: NameScope) -> bool {
    let others = Graph::with_nodes(graph.nodes.iter().filter(|n| n.id != node.id).cloned().collect());
    identifier_in_use(&others, kind, candidate, scope)
}

/// Check a patch against the uniqueness and format rules for `node`.
///
/// Only identifiers that actually change are checked.
pub fn validate_node_patch(
    graph: &Graph,
    node: &Node,
    patch: &Map<String, Value>,
    scope: NameScope,
) -> Result<()> {
    let kind = node.kind();
    let key = if kind == NodeKind::Bank { "bankId" } else { "name" };
    let Some(candidate) = patched_str(patch, key) else {
        return Ok(());
    };

    if candidate == node.identifier() {
        return Ok(());
    }
    if kind == NodeKind::Projection && !PROJECTION_NAME_RE.is_match(candidate) {
        return Err(EditError::InvalidProjectionName(candidate.to_string()));
    }

    if taken_by_other(graph, node, kind, candidate, NameScope::PerType) {
        return Err(match kind {
            NodeKind::Bank => EditError::DuplicateBankId(candidate.to_string()),
            NodeKind::Projection => EditError::DuplicateProjectionName(candidate.to_string()),
            NodeKind::CreditLine => EditError::DuplicateCreditLineName(candidate.to_string()),
            NodeKind::Street => EditError::DuplicateNodeName(candidate.to_string()),
        });
    }
    if scope == NameScope::Global && taken_by_other(graph, node, kind, candidate, NameScope::Global) {
        return Err(match kind {
            NodeKind::Bank => EditError::DuplicateBankId(candidate.to_string()),
            _ => EditError::DuplicateNodeName(candidate.to_string()),
        });
    }
    Ok(())
}

// ============================================================================
// Patches
// ============================================================================

/// Shallow merge `patch` over `current`, skipping `ignored` keys.
fn merge<T>(current: &T, patch: &Map<String, Value>, ignored: &[&str]) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let mut value = serde_json::to_value(current)?;
    if let Value::Object(map) = &mut value {
        for (key, v) in patch {
            if !ignored.contains(&key.as_str()) {
                map.insert(key.clone(), v.clone());
            }
        }
    }
    Ok(serde_json::from_value(value)?)
}

fn merge_properties(current: &NodeProperties, patch: &Map<String, Value>) -> Result<NodeProperties> {
    Ok(match current {
        NodeProperties::Bank(p) => NodeProperties::Bank(merge(p, patch, &BankProperties::DERIVED_KEYS)?),
        NodeProperties::CreditLine(p) => NodeProperties::CreditLine(merge(p, patch, &[])?),
        NodeProperties::Projection(p) => NodeProperties::Projection(merge(p, patch, &[])?),
        NodeProperties::Street(p) => NodeProperties::Street(merge(p, patch, &[])?),
    })
}

/// Result of a node property patch.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchOutcome {
    pub graph: Graph,
    /// Banks whose `creditLine` followed a credit-line rename
    pub renamed_banks: Vec<String>,
    /// Bank↔projection edges removed because the entities no longer match
    pub pruned_edges: Vec<String>,
}

impl PatchOutcome {
    /// User-facing notice for side effects worth reporting.
    pub fn notice(&self) -> Option<String> {
        if self.pruned_edges.is_empty() {
            None
        } else {
            Some(format!(
                "Removed {} connection(s) due to entity mismatch",
                self.pruned_edges.len()
            ))
        }
    }
}

/// Rewrite a flowId for a credit-line rename.
fn rename_flow_id(flow_id: &str, old: &str, new: &str) -> String {
    let suffix = format!("_{}", old);
    if let Some(head) = flow_id.strip_suffix(&suffix) {
        format!("{}_{}", head, new)
    } else {
        flow_id.replacen(old, new, 1)
    }
}

fn cascade_credit_line_rename(graph: &mut Graph, cl_id: &str, old: &str, new: &str) -> Vec<String> {
    let mut renamed = Vec::new();
    for node in &mut graph.nodes {
        if let Some(bank) = node.as_bank_mut() {
            if bank.credit_line.as_deref() == Some(old) {
                bank.credit_line = Some(new.to_string());
                renamed.push(node.id.clone());
            }
        }
    }
    for edge in graph.edges.iter_mut().filter(|e| e.touches(cl_id)) {
        edge.properties.flow_id = rename_flow_id(&edge.properties.flow_id, old, new);
    }
    info!("credit line rename {} -> {} updated banks {:?}", old, new, renamed);
    renamed
}

/// Remove bank↔projection edges touching `node_id` whose entities disagree,
/// then recompute `projectionAware` on the affected banks.
fn prune_entity_mismatches(graph: &mut Graph, node_id: &str) -> Vec<String> {
    let mismatched: Vec<(String, String)> = graph
        .incident_edges(node_id)
        .filter_map(|edge| {
            let source = graph.find_node(&edge.source)?;
            let target = graph.find_node(&edge.target)?;
            let (bank, projection) = match (source.kind(), target.kind()) {
                (NodeKind::Bank, NodeKind::Projection) => (source, target),
                (NodeKind::Projection, NodeKind::Bank) => (target, source),
                _ => return None,
            };
            let bank_entity = bank.as_bank()?.entity.as_str();
            let entity = projection_entity(projection.identifier());
            (entity != bank_entity).then(|| (edge.id.clone(), bank.id.clone()))
        })
        .collect();

    if mismatched.is_empty() {
        return Vec::new();
    }

    graph.edges.retain(|e| !mismatched.iter().any(|(id, _)| *id == e.id));
    for (_, bank_id) in &mismatched {
        let aware = graph.connected_to_kind(bank_id, NodeKind::Projection, &[], None);
        if let Some(mut bank) = graph.find_node(bank_id).cloned() {
            if let Some(props) = bank.as_bank_mut() {
                props.projection_aware = aware;
            }
            graph.replace_node(bank);
        }
    }

    let pruned: Vec<String> = mismatched.into_iter().map(|(id, _)| id).collect();
    info!("removed {} connection(s) due to entity mismatch: {:?}", pruned.len(), pruned);
    pruned
}

/// Validate and merge `patch` into the properties of node `id`.
///
/// Returns `Ok(None)` for an unknown id. Derived bank keys in the patch are
/// ignored. A credit-line rename (detected from the merged name, or from
/// `rename` when supplied) cascades to bank `creditLine` values and to the
/// flowIds of the renamed node's edges. A bank entity change or projection
/// rename prunes edges whose entities no longer match.
pub fn apply_node_patch(
    graph: &Graph,
    id: &str,
    patch: &Map<String, Value>,
    rename: Option<&RenameHint>,
    scope: NameScope,
) -> Result<Option<PatchOutcome>> {
    let Some(node) = graph.find_node(id) else {
        return Ok(None);
    };
    validate_node_patch(graph, node, patch, scope)?;

    let mut updated = node.clone();
    updated.properties = merge_properties(&node.properties, patch)?;

    let mut next = graph.clone();
    next.replace_node(updated.clone());
    debug!("patched properties of {}", id);

    let mut renamed_banks = Vec::new();
    if node.kind() == NodeKind::CreditLine {
        let old = rename.map_or(node.identifier(), |hint| hint.old_name.as_str());
        let new = updated.identifier();
        if old != new {
            renamed_banks = cascade_credit_line_rename(&mut next, id, old, new);
        }
    }

    let entity_changed = match (&node.properties, &updated.properties) {
        (NodeProperties::Bank(before), NodeProperties::Bank(after)) => before.entity != after.entity,
        (NodeProperties::Projection(before), NodeProperties::Projection(after)) => {
            before.name != after.name
        }
        _ => false,
    };
    let pruned_edges = if entity_changed {
        prune_entity_mismatches(&mut next, id)
    } else {
        Vec::new()
    };

    Ok(Some(PatchOutcome { graph: next, renamed_banks, pruned_edges }))
}

/// Merge `patch` into the properties of edge `id`. Returns `Ok(None)` for an
/// unknown id.
pub fn apply_edge_patch(graph: &Graph, id: &str, patch: &Map<String, Value>) -> Result<Option<Graph>> {
    let Some(index) = graph.edges.iter().position(|e| e.id == id) else {
        return Ok(None);
    };
    let properties: EdgeProperties = merge(&graph.edges[index].properties, patch, &[])?;

    let mut next = graph.clone();
    next.edges[index].properties = properties;
    debug!("patched properties of edge {}", id);
    Ok(Some(next))
}
