//! Level 4: Property Editing Tests
//!
//! Tests node and edge patches, validation messages, the credit-line rename
//! cascade and entity-mismatch pruning.

mod common;

use bank_graph_editor::{EditorConfig, NameScope, NodeKind, RenameHint, SelectedElement};
use common::harness::{as_map, EditorHarness};
use serde_json::json;

fn setup_with(config: EditorConfig) -> EditorHarness {
    let mut h = EditorHarness::with_config(config);
    h.add(NodeKind::Bank, 100.0, 100.0);
    h.add(NodeKind::Bank, 100.0, 400.0);
    h.add(NodeKind::CreditLine, 400.0, 100.0);
    h.add(NodeKind::CreditLine, 400.0, 400.0);
    h.add(NodeKind::Projection, 700.0, 100.0);
    assert!(h.patch_node("proj-1", json!({"name": "PRJ_GSCO"})));
    h.tracker.clear();
    h
}

fn setup() -> EditorHarness {
    setup_with(EditorConfig::default())
}

#[test]
fn test_shallow_merge() {
    let mut h = setup();
    assert!(h.patch_node("bank-1", json!({"currency": "EUR", "projected": 50})));
    let bank = h.bank("bank-1");
    assert_eq!(bank.currency, "EUR");
    assert_eq!(bank.projected, 50.0);
    assert_eq!(bank.routing_code, "HATRUS33");
    assert_eq!(bank.max, 900.0);
}

#[test]
fn test_derived_fields_are_read_only() {
    let mut h = setup();
    assert!(h.patch_node("bank-1", json!({"creditLine": "CL2", "streetCover": true})));
    let bank = h.bank("bank-1");
    assert_eq!(bank.credit_line, None);
    assert!(!bank.street_cover);
}

#[test]
fn test_unknown_node_is_noop() {
    let mut h = setup();
    let graph = h.graph();
    assert!(h.patch_node("bank-99", json!({"currency": "EUR"})));
    assert_eq!(h.graph(), graph);
}

#[test]
fn test_validation_messages() {
    let mut h = setup();

    assert!(!h.patch_node("bank-2", json!({"bankId": "BANK1"})));
    assert_eq!(h.tracker.last_message().as_deref(), Some("Error: Bank ID 'BANK1' already exists"));

    assert!(!h.patch_node("cl-2", json!({"name": "CL1"})));
    assert_eq!(
        h.tracker.last_message().as_deref(),
        Some("Error: A Credit Line node with this name already exists")
    );

    assert!(!h.patch_node("proj-1", json!({"name": "PROJ_1"})));
    assert_eq!(
        h.tracker.last_message().as_deref(),
        Some("Error: Projection node name must follow format PRJ_XXXX where X is alphanumeric")
    );

    assert_eq!(h.bank("bank-2").bank_id, "BANK2");
    assert_eq!(h.node("cl-2").identifier(), "CL2");
}

#[test]
fn test_duplicate_projection_name() {
    let mut h = setup();
    h.add(NodeKind::Projection, 700.0, 400.0);
    assert!(!h.patch_node("proj-2", json!({"name": "PRJ_GSCO"})));
    assert_eq!(
        h.tracker.last_message().as_deref(),
        Some("Error: A Projection node with this name already exists")
    );
}

#[test]
fn test_global_name_scope() {
    let config = EditorConfig { name_scope: NameScope::Global, ..Default::default() };
    let mut h = setup_with(config);
    assert!(!h.patch_node("cl-1", json!({"name": "BANK2"})));
    assert_eq!(h.tracker.last_message().as_deref(), Some("Error: Node name 'BANK2' already exists"));

    let mut per_type = setup();
    assert!(per_type.patch_node("cl-1", json!({"name": "BANK2"})));
}

#[test]
fn test_invalid_value_type_rejected() {
    let mut h = setup();
    assert!(!h.patch_node("cl-1", json!({"amount": "a lot"})));
    let message = h.tracker.last_message().unwrap();
    assert!(message.starts_with("Error: Invalid properties: "));
}

#[test]
fn test_credit_line_rename_cascade() {
    let mut h = setup();
    h.connect("bank-1", "cl-1");
    h.connect("cl-1", "bank-2");

    let hint = RenameHint { old_name: "CL1".into(), new_name: "CL9".into() };
    h.ctrl
        .update_node_properties("cl-1", &as_map(json!({"name": "CL9"})), Some(&hint))
        .unwrap();

    assert_eq!(h.bank("bank-1").credit_line.as_deref(), Some("CL9"));
    assert_eq!(h.bank("bank-2").credit_line.as_deref(), Some("CL9"));
    let flow_ids: Vec<String> = h.graph().edges.iter().map(|e| e.properties.flow_id.clone()).collect();
    assert_eq!(flow_ids, vec!["BANK1_CL9", "BANK2_CL9"]);
}

#[test]
fn test_rename_without_hint_still_cascades() {
    let mut h = setup();
    h.connect("bank-1", "cl-1");
    assert!(h.patch_node("cl-1", json!({"name": "CL7"})));
    assert_eq!(h.bank("bank-1").credit_line.as_deref(), Some("CL7"));
    assert_eq!(h.graph().edges[0].properties.flow_id, "BANK1_CL7");
}

#[test]
fn test_entity_edit_prunes_projection_edge() {
    let mut h = setup();
    h.connect("bank-1", "proj-1");
    assert!(h.bank("bank-1").projection_aware);

    assert!(h.patch_node("bank-1", json!({"entity": "ABCD"})));
    assert!(h.edge_ids().is_empty());
    assert!(!h.bank("bank-1").projection_aware);
    assert_eq!(
        h.tracker.last_message().as_deref(),
        Some("Removed 1 connection(s) due to entity mismatch")
    );
}

#[test]
fn test_projection_rename_prunes_edge() {
    let mut h = setup();
    h.connect("proj-1", "bank-1");
    assert!(h.patch_node("proj-1", json!({"name": "PRJ_WXYZ"})));
    assert!(h.edge_ids().is_empty());
    assert!(!h.bank("bank-1").projection_aware);
}

#[test]
fn test_edge_patch() {
    let mut h = setup();
    h.connect("bank-1", "bank-2");
    assert!(h.patch_edge("bank-1-bank-2", json!({"cost": 12, "flowId": "CUSTOM"})));
    let edge = h.graph().find_edge("bank-1-bank-2").cloned().unwrap();
    assert_eq!(edge.properties.cost, 12.0);
    assert_eq!(edge.properties.flow_id, "CUSTOM");
    assert_eq!(edge.properties.flow_type, "INTRABANK");
}

#[test]
fn test_selected_element_follows_patch() {
    let mut h = setup();
    h.select_at(100.0, 100.0);
    assert!(h.patch_node("bank-1", json!({"currency": "GBP"})));

    match h.ctrl.selected_element() {
        Some(SelectedElement::Node(node)) => {
            assert_eq!(node.as_bank().unwrap().currency, "GBP");
        }
        other => panic!("expected selected node, got {:?}", other),
    }
    let value = serde_json::to_value(h.ctrl.selected_element()).unwrap();
    assert_eq!(value["kind"], json!("node"));
    assert_eq!(value["data"]["properties"]["currency"], json!("GBP"));
}

#[test]
fn test_selected_edge_descriptor() {
    let mut h = setup();
    h.connect("bank-1", "cl-1");
    h.select_at(250.0, 100.0);
    let value = serde_json::to_value(h.ctrl.selected_element()).unwrap();
    assert_eq!(value["kind"], json!("edge"));
    assert_eq!(value["data"]["id"], json!("bank-1-cl-1"));
}
