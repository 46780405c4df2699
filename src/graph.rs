//! Graph snapshot, topology queries and the connection validator framework.
//!
//! A [`Graph`] is a plain value: engines take `&Graph` and hand back a new
//! one, so any reader always sees a consistent snapshot.

use crate::error::ValidationError;
use crate::model::{Edge, Node, NodeKind};

/// Nodes in insertion order (later nodes draw on top) and directed edges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes, edges: Vec::new() }
    }

    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn find_edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Check if the directed edge `source → target` exists.
    pub fn edge_exists(&self, source: &str, target: &str) -> bool {
        self.edges
            .iter()
            .any(|e| e.source == source && e.target == target)
    }

    /// Check if both `a → b` and `b → a` exist.
    pub fn bidirectional_exists(&self, a: &str, b: &str) -> bool {
        self.edge_exists(a, b) && self.edge_exists(b, a)
    }

    /// Edges with `node_id` as source or target.
    pub fn incident_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.touches(node_id))
    }

    /// Check if `node_id` has an edge to any node of `kind`.
    ///
    /// Edges whose id is in `skip_edges` and edges leading to `skip_peer` are
    /// ignored, which lets callers ask "would a connection survive without
    /// these?".
    pub fn connected_to_kind(
        &self,
        node_id: &str,
        kind: NodeKind,
        skip_edges: &[&str],
        skip_peer: Option<&str>,
    ) -> bool {
        self.incident_edges(node_id)
            .filter(|e| !skip_edges.contains(&e.id.as_str()))
            .filter(|e| !skip_peer.is_some_and(|peer| e.joins(node_id, peer)))
            .filter_map(|e| e.other_end(node_id))
            .filter_map(|peer| self.find_node(peer))
            .any(|peer| peer.kind() == kind)
    }

    /// Check if any node of `kind` exists.
    pub fn contains_kind(&self, kind: NodeKind) -> bool {
        self.nodes_of_kind(kind).next().is_some()
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(move |n| n.kind() == kind)
    }

    /// Replace the node with the same id. Unknown ids leave the graph unchanged.
    pub fn replace_node(&mut self, node: Node) {
        if let Some(slot) = self.nodes.iter_mut().find(|n| n.id == node.id) {
            *slot = node;
        }
    }
}

// ============================================================================
// Connection Validation Framework
// ============================================================================

/// Result of connection validation with optional rejection reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Connection is allowed
    Valid,
    /// Connection is rejected with a reason
    Invalid(ValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Combine two results (AND logic): returns first error if any
    pub fn and(self, other: ValidationResult) -> ValidationResult {
        match self {
            ValidationResult::Valid => other,
            invalid => invalid,
        }
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(err) => Err(err),
        }
    }
}

/// The two endpoints of a requested connection, in request order.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionRequest<'a> {
    pub source: &'a Node,
    pub target: &'a Node,
    pub bidirectional: bool,
}

impl<'a> ConnectionRequest<'a> {
    pub fn new(source: &'a Node, target: &'a Node) -> Self {
        Self { source, target, bidirectional: false }
    }

    pub fn bidirectional(source: &'a Node, target: &'a Node) -> Self {
        Self { source, target, bidirectional: true }
    }

    /// If the pair is a bank and a node of `kind`, return `(bank, other)`.
    pub fn bank_with(&self, kind: NodeKind) -> Option<(&'a Node, &'a Node)> {
        match (self.source.kind(), self.target.kind()) {
            (NodeKind::Bank, k) if k == kind => Some((self.source, self.target)),
            (k, NodeKind::Bank) if k == kind => Some((self.target, self.source)),
            _ => None,
        }
    }
}

/// Trait for a single connection rule.
///
/// Validators are pure: they read the request and the current graph and
/// never mutate anything.
pub trait ConnectionValidator {
    fn validate(&self, request: &ConnectionRequest<'_>, graph: &Graph) -> ValidationResult;
}

/// Every edge must touch at least one bank.
#[derive(Clone, Copy, Debug, Default)]
pub struct BankEndpointValidator;

impl ConnectionValidator for BankEndpointValidator {
    fn validate(&self, request: &ConnectionRequest<'_>, _graph: &Graph) -> ValidationResult {
        if request.source.is_bank() || request.target.is_bank() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(ValidationError::NonBankPair)
        }
    }
}

/// A bank may hold at most one credit line.
///
/// Both the bank's `creditLine` property and its edges are consulted. Edges
/// between the requested pair are ignored so the missing half of a
/// bidirectional pair can still be added.
#[derive(Clone, Copy, Debug, Default)]
pub struct CreditLineValidator;

impl ConnectionValidator for CreditLineValidator {
    fn validate(&self, request: &ConnectionRequest<'_>, graph: &Graph) -> ValidationResult {
        let Some((bank, credit_line)) = request.bank_with(NodeKind::CreditLine) else {
            return ValidationResult::Valid;
        };
        let Some(props) = bank.as_bank() else {
            return ValidationResult::Valid;
        };

        let property_taken = props
            .credit_line
            .as_deref()
            .is_some_and(|name| !name.is_empty() && name != credit_line.identifier());
        let edge_taken =
            graph.connected_to_kind(&bank.id, NodeKind::CreditLine, &[], Some(&credit_line.id));

        if property_taken || edge_taken {
            ValidationResult::Invalid(ValidationError::CreditLineTaken {
                bank_id: props.bank_id.clone(),
            })
        } else {
            ValidationResult::Valid
        }
    }
}

/// A bank may hold one projection, and its entity must match the bank's.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProjectionValidator;

impl ConnectionValidator for ProjectionValidator {
    fn validate(&self, request: &ConnectionRequest<'_>, graph: &Graph) -> ValidationResult {
        let Some((bank, projection)) = request.bank_with(NodeKind::Projection) else {
            return ValidationResult::Valid;
        };
        let (Some(bank_props), Some(projection_props)) = (bank.as_bank(), projection.as_projection())
        else {
            return ValidationResult::Valid;
        };

        if graph.connected_to_kind(&bank.id, NodeKind::Projection, &[], Some(&projection.id)) {
            return ValidationResult::Invalid(ValidationError::ProjectionTaken {
                bank_id: bank_props.bank_id.clone(),
            });
        }

        let projection_entity = projection_props.entity();
        if projection_entity != bank_props.entity {
            return ValidationResult::Invalid(ValidationError::EntityMismatch {
                projection_entity: projection_entity.to_string(),
                bank_entity: bank_props.entity.clone(),
            });
        }

        ValidationResult::Valid
    }
}

/// Bidirectional requests fail when both directions already exist.
#[derive(Clone, Copy, Debug, Default)]
pub struct BidirectionalValidator;

impl ConnectionValidator for BidirectionalValidator {
    fn validate(&self, request: &ConnectionRequest<'_>, graph: &Graph) -> ValidationResult {
        if request.bidirectional && graph.bidirectional_exists(&request.source.id, &request.target.id)
        {
            ValidationResult::Invalid(ValidationError::BidirectionalExists)
        } else {
            ValidationResult::Valid
        }
    }
}

/// Composite validator that combines multiple validators
///
/// All validators must return Valid for the connection to be valid (AND
/// logic). Returns the first error encountered, in insertion order.
#[derive(Default)]
pub struct CompositeValidator {
    validators: Vec<Box<dyn ConnectionValidator>>,
}

impl CompositeValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validator to the composite
    pub fn add<V: ConnectionValidator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// The editor's rule set, in the order the checks short-circuit.
    pub fn standard() -> Self {
        Self::new()
            .add(BankEndpointValidator)
            .add(CreditLineValidator)
            .add(ProjectionValidator)
            .add(BidirectionalValidator)
    }
}

impl ConnectionValidator for CompositeValidator {
    fn validate(&self, request: &ConnectionRequest<'_>, graph: &Graph) -> ValidationResult {
        for v in &self.validators {
            let result = v.validate(request, graph);
            if !result.is_valid() {
                return result;
            }
        }
        ValidationResult::Valid
    }
}

// ============================================================================
// Tests
// ============================================================================
