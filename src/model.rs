//! Domain model: node kinds, typed property sets, edges and operation modes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flow type stamped on every edge.
pub const FLOW_TYPE_INTRABANK: &str = "INTRABANK";

/// Edge cost table.
pub mod edge_cost {
    pub const DEFAULT: f64 = 4.0;
    pub const BANK_TO_CREDIT_LINE: f64 = 1.0;
    pub const BANK_TO_PROJECTION: f64 = 1.0;
    pub const BANK_TO_STREET: f64 = 1000.0;
}

/// The four node types an editor graph can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Bank,
    CreditLine,
    Projection,
    Street,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Bank,
        NodeKind::CreditLine,
        NodeKind::Projection,
        NodeKind::Street,
    ];

    /// Prefix of the internal node id, e.g. `bank` in `bank-3`.
    pub fn id_prefix(self) -> &'static str {
        match self {
            NodeKind::Bank => "bank",
            NodeKind::CreditLine => "cl",
            NodeKind::Projection => "proj",
            NodeKind::Street => "street",
        }
    }

    /// Human-readable business identifier for sequence number `n`.
    pub fn business_identifier(self, n: u32) -> String {
        match self {
            NodeKind::Bank => format!("BANK{}", n),
            NodeKind::CreditLine => format!("CL{}", n),
            NodeKind::Projection => format!("PRJ_ENT{}", n),
            NodeKind::Street => format!("STREET{}", n),
        }
    }

    pub fn node_id(self, n: u32) -> String {
        format!("{}-{}", self.id_prefix(), n)
    }
}

/// Properties of a bank node.
///
/// `credit_line`, `projection_aware` and `street_cover` are derived from the
/// bank's connections and are never set directly by a property edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankProperties {
    pub bank_id: String,
    pub entity: String,
    pub routing_code: String,
    pub currency: String,
    pub projected: f64,
    pub actual: f64,
    pub min: f64,
    pub max: f64,
    pub credit_line: Option<String>,
    pub beneficial_location: bool,
    pub projection_aware: bool,
    pub street_cover: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BankProperties {
    /// Property keys a patch may not change.
    pub const DERIVED_KEYS: [&'static str; 3] = ["creditLine", "projectionAware", "streetCover"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditLineProperties {
    pub name: String,
    pub amount: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionProperties {
    pub name: String,
    pub factor: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProjectionProperties {
    /// Entity suffix used for bank matching: the text after the first `_`.
    pub fn entity(&self) -> &str {
        projection_entity(&self.name)
    }
}

/// Entity encoded in a projection name (`PRJ_GSCO` → `GSCO`).
pub fn projection_entity(name: &str) -> &str {
    name.split_once('_').map(|(_, rest)| rest).unwrap_or("")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreetProperties {
    pub name: String,
    pub capacity: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Type-dependent property set of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "properties", rename_all = "camelCase")]
pub enum NodeProperties {
    Bank(BankProperties),
    CreditLine(CreditLineProperties),
    Projection(ProjectionProperties),
    Street(StreetProperties),
}

impl NodeProperties {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeProperties::Bank(_) => NodeKind::Bank,
            NodeProperties::CreditLine(_) => NodeKind::CreditLine,
            NodeProperties::Projection(_) => NodeKind::Projection,
            NodeProperties::Street(_) => NodeKind::Street,
        }
    }
}

/// A node placed on the canvas, positioned in world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub x: f32,
    pub y: f32,
    #[serde(flatten)]
    pub properties: NodeProperties,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.properties.kind()
    }

    pub fn is_bank(&self) -> bool {
        self.kind() == NodeKind::Bank
    }

    /// `bankId` for banks, `name` for every other kind.
    pub fn identifier(&self) -> &str {
        match &self.properties {
            NodeProperties::Bank(p) => &p.bank_id,
            NodeProperties::CreditLine(p) => &p.name,
            NodeProperties::Projection(p) => &p.name,
            NodeProperties::Street(p) => &p.name,
        }
    }

    pub fn as_bank(&self) -> Option<&BankProperties> {
        match &self.properties {
            NodeProperties::Bank(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_bank_mut(&mut self) -> Option<&mut BankProperties> {
        match &mut self.properties {
            NodeProperties::Bank(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_projection(&self) -> Option<&ProjectionProperties> {
        match &self.properties {
            NodeProperties::Projection(p) => Some(p),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeProperties {
    pub flow_id: String,
    pub cost: f64,
    pub flow_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A directed edge. `A→B` and `B→A` are distinct edges with distinct ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub properties: EdgeProperties,
}

impl Edge {
    /// Edge id for a direction: `{source}-{target}`.
    pub fn id_for(source: &str, target: &str) -> String {
        format!("{}-{}", source, target)
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// The endpoint opposite `node_id`, if the edge touches it.
    pub fn other_end(&self, node_id: &str) -> Option<&str> {
        if self.source == node_id {
            Some(&self.target)
        } else if self.target == node_id {
            Some(&self.source)
        } else {
            None
        }
    }

    /// True if the edge joins `a` and `b` in either direction.
    pub fn joins(&self, a: &str, b: &str) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}

/// Operation mode chosen by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    #[default]
    Select,
    Connect,
    ConnectBidirectional,
    Delete,
    AddBank,
    AddCreditLine,
    AddProjection,
    AddStreet,
}

impl Mode {
    /// Node kind placed by an `Add*` mode.
    pub fn adds(self) -> Option<NodeKind> {
        match self {
            Mode::AddBank => Some(NodeKind::Bank),
            Mode::AddCreditLine => Some(NodeKind::CreditLine),
            Mode::AddProjection => Some(NodeKind::Projection),
            Mode::AddStreet => Some(NodeKind::Street),
            _ => None,
        }
    }

    pub fn is_connect(self) -> bool {
        matches!(self, Mode::Connect | Mode::ConnectBidirectional)
    }
}
