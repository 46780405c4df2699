//! Node factory.
//!
//! Builds fully populated nodes with type-specific defaults. Callers pass a
//! sequence number that has already been checked for uniqueness (see
//! [`crate::ids`]); nothing here looks at the existing graph.

use crate::model::{
    BankProperties, CreditLineProperties, Node, NodeKind, NodeProperties, ProjectionProperties,
    StreetProperties,
};
use serde_json::Map;

pub fn create_bank_node(x: f32, y: f32, seq: u32) -> Node {
    Node {
        id: NodeKind::Bank.node_id(seq),
        x,
        y,
        properties: NodeProperties::Bank(BankProperties {
            bank_id: NodeKind::Bank.business_identifier(seq),
            entity: "GSCO".to_string(),
            routing_code: "HATRUS33".to_string(),
            currency: "USD".to_string(),
            projected: 500.0,
            actual: 200.0,
            min: 100.0,
            max: 900.0,
            credit_line: None,
            beneficial_location: false,
            projection_aware: false,
            street_cover: false,
            extra: Map::new(),
        }),
    }
}

pub fn create_credit_line_node(x: f32, y: f32, seq: u32) -> Node {
    Node {
        id: NodeKind::CreditLine.node_id(seq),
        x,
        y,
        properties: NodeProperties::CreditLine(CreditLineProperties {
            name: NodeKind::CreditLine.business_identifier(seq),
            amount: 1000.0,
            extra: Map::new(),
        }),
    }
}

pub fn create_projection_node(x: f32, y: f32, seq: u32) -> Node {
    Node {
        id: NodeKind::Projection.node_id(seq),
        x,
        y,
        properties: NodeProperties::Projection(ProjectionProperties {
            name: NodeKind::Projection.business_identifier(seq),
            factor: 1.0,
            extra: Map::new(),
        }),
    }
}

pub fn create_street_node(x: f32, y: f32, seq: u32) -> Node {
    Node {
        id: NodeKind::Street.node_id(seq),
        x,
        y,
        properties: NodeProperties::Street(StreetProperties {
            name: NodeKind::Street.business_identifier(seq),
            capacity: 5000.0,
            extra: Map::new(),
        }),
    }
}

/// Dispatch to the constructor for `kind`.
pub fn create_node(kind: NodeKind, x: f32, y: f32, seq: u32) -> Node {
    match kind {
        NodeKind::Bank => create_bank_node(x, y, seq),
        NodeKind::CreditLine => create_credit_line_node(x, y, seq),
        NodeKind::Projection => create_projection_node(x, y, seq),
        NodeKind::Street => create_street_node(x, y, seq),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_defaults() {
        let node = create_bank_node(100.0, 200.0, 3);
        assert_eq!(node.id, "bank-3");
        assert_eq!((node.x, node.y), (100.0, 200.0));
        let bank = node.as_bank().unwrap();
        assert_eq!(bank.bank_id, "BANK3");
        assert_eq!(bank.entity, "GSCO");
        assert_eq!(bank.routing_code, "HATRUS33");
        assert_eq!(bank.currency, "USD");
        assert_eq!((bank.projected, bank.actual, bank.min, bank.max), (500.0, 200.0, 100.0, 900.0));
        assert_eq!(bank.credit_line, None);
        assert!(!bank.beneficial_location);
        assert!(!bank.projection_aware);
        assert!(!bank.street_cover);
    }

    #[test]
    fn test_credit_line_defaults() {
        let node = create_credit_line_node(0.0, 0.0, 2);
        assert_eq!(node.id, "cl-2");
        assert_eq!(node.identifier(), "CL2");
        assert_eq!(node.kind(), NodeKind::CreditLine);
    }

    #[test]
    fn test_projection_defaults() {
        let node = create_projection_node(0.0, 0.0, 1);
        assert_eq!(node.id, "proj-1");
        let projection = node.as_projection().unwrap();
        assert_eq!(projection.name, "PRJ_ENT1");
        assert_eq!(projection.entity(), "ENT1");
        assert_eq!(projection.factor, 1.0);
    }

    #[test]
    fn test_street_defaults() {
        let node = create_street_node(5.0, 5.0, 1);
        assert_eq!(node.id, "street-1");
        assert_eq!(node.identifier(), "STREET1");
    }

    #[test]
    fn test_create_node_dispatch() {
        for kind in NodeKind::ALL {
            assert_eq!(create_node(kind, 0.0, 0.0, 9).kind(), kind);
        }
    }
}
