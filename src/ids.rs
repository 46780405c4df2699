//! Sequence allocation for new nodes.
//!
//! Each node kind has its own "next id" counter. Allocation starts at the
//! counter, skips every sequence number whose business identifier is already
//! taken, and reports the next counter value alongside the chosen number. The
//! counters are plain values threaded through by the caller.

use crate::config::NameScope;
use crate::graph::Graph;
use crate::model::NodeKind;
use serde::{Deserialize, Serialize};

/// Per-kind "next id" baselines. All start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdCounters {
    pub bank: u32,
    pub credit_line: u32,
    pub projection: u32,
    pub street: u32,
}

impl Default for IdCounters {
    fn default() -> Self {
        Self { bank: 1, credit_line: 1, projection: 1, street: 1 }
    }
}

impl IdCounters {
    pub fn get(&self, kind: NodeKind) -> u32 {
        match kind {
            NodeKind::Bank => self.bank,
            NodeKind::CreditLine => self.credit_line,
            NodeKind::Projection => self.projection,
            NodeKind::Street => self.street,
        }
    }

    /// Copy of the counters with `kind` set to `next`.
    pub fn with(self, kind: NodeKind, next: u32) -> Self {
        let mut counters = self;
        match kind {
            NodeKind::Bank => counters.bank = next,
            NodeKind::CreditLine => counters.credit_line = next,
            NodeKind::Projection => counters.projection = next,
            NodeKind::Street => counters.street = next,
        }
        counters
    }
}

/// Outcome of an allocation: the sequence number to build with and the
/// counter value to store afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub seq: u32,
    pub next: u32,
}

/// Check if `candidate` is already used as a business identifier.
///
/// Per-type scope compares banks against `bankId` and other kinds against
/// `name` of the same kind; global scope compares against every node.
pub fn identifier_in_use(graph: &Graph, kind: NodeKind, candidate: &str, scope: NameScope) -> bool {
    graph.nodes.iter().any(|node| {
        let comparable = match scope {
            NameScope::PerType => node.kind() == kind,
            NameScope::Global => true,
        };
        comparable && node.identifier() == candidate
    })
}

/// Find the first free sequence number for `kind` at or after `start`.
///
/// A number is free when neither its business identifier nor its node id is
/// taken. Node ids can only clash in loaded graphs.
pub fn allocate(graph: &Graph, kind: NodeKind, start: u32, scope: NameScope) -> Allocation {
    let mut seq = start.max(1);
    while identifier_in_use(graph, kind, &kind.business_identifier(seq), scope)
        || graph.find_node(&kind.node_id(seq)).is_some()
    {
        seq += 1;
    }
    Allocation { seq, next: seq + 1 }
}
