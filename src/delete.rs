//! Deletion engine.
//!
//! Removing a credit line, projection or street node reverses the derived
//! property it set on every bank it was connected to. Edge-only deletion
//! leaves bank properties alone unless reconciliation is requested.

use crate::graph::Graph;
use crate::model::{Edge, NodeKind};
use log::{debug, info};

/// Result of a deletion.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteOutcome {
    pub graph: Graph,
    pub removed_node: Option<String>,
    pub removed_edges: Vec<String>,
    /// Banks whose derived properties were reversed
    pub updated_banks: Vec<String>,
}

/// How a credit-line edge removal affects `creditLine`.
#[derive(Clone, Copy, PartialEq, Eq)]
enum CreditLineRule {
    /// Always cleared; used when the credit line node itself goes away
    Clear,
    /// Cleared only if no other credit-line connection survives
    IfNoneSurvive,
}

/// Reverse derived bank properties for `removed` edges, writing into `next`.
///
/// `before` is the graph prior to removal; survival checks skip the removed
/// edge ids.
fn reverse_derived(before: &Graph, next: &mut Graph, removed: &[&Edge], rule: CreditLineRule) -> Vec<String> {
    let skip: Vec<&str> = removed.iter().map(|e| e.id.as_str()).collect();
    let mut updated = Vec::new();

    for edge in removed {
        let (Some(source), Some(target)) = (before.find_node(&edge.source), before.find_node(&edge.target))
        else {
            continue;
        };
        let (bank, other) = match (source.is_bank(), target.is_bank()) {
            (true, false) => (source, target),
            (false, true) => (target, source),
            _ => continue,
        };

        let survives = |kind| before.connected_to_kind(&bank.id, kind, &skip, None);
        let Some(mut node) = next.find_node(&bank.id).cloned() else {
            continue;
        };
        let Some(props) = node.as_bank_mut() else {
            continue;
        };

        let changed = match other.kind() {
            NodeKind::CreditLine => {
                let clear = rule == CreditLineRule::Clear || !survives(NodeKind::CreditLine);
                clear && props.credit_line.take().is_some()
            }
            NodeKind::Projection if !survives(NodeKind::Projection) => {
                std::mem::replace(&mut props.projection_aware, false)
            }
            NodeKind::Street if !survives(NodeKind::Street) => {
                std::mem::replace(&mut props.street_cover, false)
            }
            _ => false,
        };

        if changed {
            debug!("reversed derived property on {} after removing {}", bank.id, edge.id);
            if !updated.contains(&bank.id) {
                updated.push(bank.id.clone());
            }
            next.replace_node(node);
        }
    }
    updated
}

/// Delete the node `id` and every edge touching it.
///
/// Returns `None` if no such node exists.
pub fn delete_node(graph: &Graph, id: &str) -> Option<DeleteOutcome> {
    let node = graph.find_node(id)?;
    let incident: Vec<&Edge> = graph.incident_edges(id).collect();

    let mut next = graph.clone();
    next.nodes.retain(|n| n.id != id);
    next.edges.retain(|e| !e.touches(id));

    let updated_banks = if node.is_bank() {
        Vec::new()
    } else {
        reverse_derived(graph, &mut next, &incident, CreditLineRule::Clear)
    };

    if !updated_banks.is_empty() {
        info!("deleting {} updated banks {:?}", id, updated_banks);
    }
    debug!("deleted node {} and {} edge(s)", id, incident.len());

    Some(DeleteOutcome {
        graph: next,
        removed_node: Some(id.to_string()),
        removed_edges: incident.iter().map(|e| e.id.clone()).collect(),
        updated_banks,
    })
}

/// Delete the edge `id`.
///
/// With `reconcile` set, bank derived properties are reversed the way node
/// deletion would, except that `creditLine` is kept while another
/// credit-line connection survives. Returns `None` if no such edge exists.
pub fn delete_edge(graph: &Graph, id: &str, reconcile: bool) -> Option<DeleteOutcome> {
    let edge = graph.find_edge(id)?;

    let mut next = graph.clone();
    next.edges.retain(|e| e.id != id);

    let updated_banks = if reconcile {
        reverse_derived(graph, &mut next, &[edge], CreditLineRule::IfNoneSurvive)
    } else {
        Vec::new()
    };
    debug!("deleted edge {}", id);

    Some(DeleteOutcome {
        graph: next,
        removed_node: None,
        removed_edges: vec![id.to_string()],
        updated_banks,
    })
}
