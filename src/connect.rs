//! Connection engine.
//!
//! Validates a requested connection against [`CompositeValidator::standard`],
//! builds the edge(s) and applies the derived bank properties. The input graph
//! is never touched; a successful connection returns a new graph.

use crate::error::ValidationError;
use crate::graph::{CompositeValidator, ConnectionRequest, ConnectionValidator, Graph};
use crate::model::{edge_cost, Edge, EdgeProperties, Node, NodeKind, FLOW_TYPE_INTRABANK};
use log::{debug, warn};
use serde_json::Map;

/// Result of a successful connection.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectOutcome {
    pub graph: Graph,
    /// Ids of the edges that were added, in creation order
    pub created: Vec<String>,
    /// Id of the bank whose derived properties changed, if any
    pub updated_bank: Option<String>,
}

fn identifier_or_id(node: &Node) -> &str {
    let ident = node.identifier();
    if ident.is_empty() {
        &node.id
    } else {
        ident
    }
}

fn flow_id(source: &Node, target: &Node) -> String {
    let request = ConnectionRequest::new(source, target);
    if let Some((bank, other)) = request
        .bank_with(NodeKind::CreditLine)
        .or_else(|| request.bank_with(NodeKind::Projection))
    {
        return format!("{}_{}", identifier_or_id(bank), identifier_or_id(other));
    }
    if let Some((bank, _)) = request.bank_with(NodeKind::Street) {
        return format!("{}_STREET", identifier_or_id(bank));
    }
    format!("{}_{}", identifier_or_id(source), identifier_or_id(target))
}

fn cost(source: &Node, target: &Node) -> f64 {
    let request = ConnectionRequest::new(source, target);
    if request.bank_with(NodeKind::CreditLine).is_some() {
        edge_cost::BANK_TO_CREDIT_LINE
    } else if request.bank_with(NodeKind::Projection).is_some() {
        edge_cost::BANK_TO_PROJECTION
    } else if request.bank_with(NodeKind::Street).is_some() {
        edge_cost::BANK_TO_STREET
    } else {
        edge_cost::DEFAULT
    }
}

/// Build the directed edge `source → target` with its derived properties.
pub fn create_edge(source: &Node, target: &Node) -> Edge {
    Edge {
        id: Edge::id_for(&source.id, &target.id),
        source: source.id.clone(),
        target: target.id.clone(),
        properties: EdgeProperties {
            flow_id: flow_id(source, target),
            cost: cost(source, target),
            flow_type: FLOW_TYPE_INTRABANK.to_string(),
            extra: Map::new(),
        },
    }
}

/// Copy of the bank side of the pair with its derived property set, or
/// `None` when the pair has no bank-side effect.
fn connected_bank(source: &Node, target: &Node) -> Option<Node> {
    let request = ConnectionRequest::new(source, target);
    let (bank, other) = [NodeKind::CreditLine, NodeKind::Projection, NodeKind::Street]
        .into_iter()
        .find_map(|kind| request.bank_with(kind))?;

    let mut updated = bank.clone();
    let props = updated.as_bank_mut()?;
    match other.kind() {
        NodeKind::CreditLine => props.credit_line = Some(other.identifier().to_string()),
        NodeKind::Projection => props.projection_aware = true,
        NodeKind::Street => props.street_cover = true,
        NodeKind::Bank => return None,
    }
    Some(updated)
}

/// Both endpoints, or `None` (logged) when either id is unknown.
fn resolve_pair<'a>(graph: &'a Graph, a_id: &str, b_id: &str) -> Option<(&'a Node, &'a Node)> {
    let pair = graph.find_node(a_id).zip(graph.find_node(b_id));
    if pair.is_none() {
        debug!("connect {} / {} ignored: unknown node", a_id, b_id);
    }
    pair
}

fn finish(graph: &Graph, source: &Node, target: &Node, edges: Vec<Edge>) -> ConnectOutcome {
    let mut next = graph.clone();
    let created = edges.iter().map(|e| e.id.clone()).collect();
    next.edges.extend(edges);

    let updated_bank = connected_bank(source, target).map(|bank| {
        let id = bank.id.clone();
        next.replace_node(bank);
        id
    });

    ConnectOutcome { graph: next, created, updated_bank }
}

/// Connect `source_id → target_id`.
///
/// Returns `Ok(None)` if that directed edge already exists (the "click a
/// connected node again" gesture) or if either node is unknown.
pub fn connect(
    graph: &Graph,
    source_id: &str,
    target_id: &str,
) -> Result<Option<ConnectOutcome>, ValidationError> {
    if graph.edge_exists(source_id, target_id) {
        debug!("edge {} already exists, ignoring", Edge::id_for(source_id, target_id));
        return Ok(None);
    }

    let Some((source, target)) = resolve_pair(graph, source_id, target_id) else {
        return Ok(None);
    };

    CompositeValidator::standard()
        .validate(&ConnectionRequest::new(source, target), graph)
        .into_result()
        .inspect_err(|err| warn!("connect {} -> {} rejected: {}", source_id, target_id, err))?;

    let edge = create_edge(source, target);
    debug!("created edge {} ({})", edge.id, edge.properties.flow_id);
    Ok(Some(finish(graph, source, target, vec![edge])))
}

/// Connect `a` and `b` in both directions, adding only the missing edges.
///
/// Returns `Ok(None)` if either node is unknown.
pub fn connect_bidirectional(
    graph: &Graph,
    a_id: &str,
    b_id: &str,
) -> Result<Option<ConnectOutcome>, ValidationError> {
    let Some((a, b)) = resolve_pair(graph, a_id, b_id) else {
        return Ok(None);
    };

    CompositeValidator::standard()
        .validate(&ConnectionRequest::bidirectional(a, b), graph)
        .into_result()
        .inspect_err(|err| warn!("connect {} <-> {} rejected: {}", a_id, b_id, err))?;

    let mut edges = Vec::with_capacity(2);
    if !graph.edge_exists(a_id, b_id) {
        edges.push(create_edge(a, b));
    }
    if !graph.edge_exists(b_id, a_id) {
        edges.push(create_edge(b, a));
    }
    for edge in &edges {
        debug!("created edge {} ({})", edge.id, edge.properties.flow_id);
    }
    Ok(Some(finish(graph, a, b, edges)))
}
