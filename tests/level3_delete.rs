//! Level 3: Deletion Tests
//!
//! Tests delete mode on nodes and edges, and the reversal of derived bank
//! properties.

mod common;

use bank_graph_editor::{EditorConfig, NodeKind};
use common::harness::EditorHarness;
use serde_json::json;

fn setup_with(config: EditorConfig) -> EditorHarness {
    let mut h = EditorHarness::with_config(config);
    h.add(NodeKind::Bank, 100.0, 100.0);
    h.add(NodeKind::Bank, 100.0, 400.0);
    h.add(NodeKind::CreditLine, 400.0, 100.0);
    h.add(NodeKind::Projection, 400.0, 400.0);
    h.add(NodeKind::Street, 700.0, 250.0);
    assert!(h.patch_node("proj-1", json!({"name": "PRJ_GSCO"})));
    h
}

fn setup() -> EditorHarness {
    setup_with(EditorConfig::default())
}

#[test]
fn test_delete_credit_line_resets_bank() {
    let mut h = setup();
    h.connect("bank-1", "cl-1");
    assert_eq!(h.bank("bank-1").credit_line.as_deref(), Some("CL1"));

    h.delete("cl-1");
    assert!(h.graph().find_node("cl-1").is_none());
    assert!(h.edge_ids().is_empty());
    assert_eq!(h.bank("bank-1").credit_line, None);
}

#[test]
fn test_delete_projection_with_surviving_connection() {
    let mut h = setup();
    h.add(NodeKind::Projection, 700.0, 550.0);
    assert!(h.patch_node("proj-2", json!({"name": "PRJ_ABCD"})));
    h.connect("bank-1", "proj-1");

    // A second projection edge can only come from older state, so load it
    let mut graph = h.graph();
    let bank = graph.find_node("bank-1").cloned().unwrap();
    let proj = graph.find_node("proj-2").cloned().unwrap();
    graph.edges.push(bank_graph_editor::create_edge(&proj, &bank));
    h.ctrl.load_graph(graph);

    h.delete("proj-1");
    assert!(h.bank("bank-1").projection_aware);

    h.delete("proj-2");
    assert!(!h.bank("bank-1").projection_aware);
}

#[test]
fn test_delete_street_clears_all_banks() {
    let mut h = setup();
    h.connect("bank-1", "street-1");
    h.connect("street-1", "bank-2");
    h.delete("street-1");
    assert!(!h.bank("bank-1").street_cover);
    assert!(!h.bank("bank-2").street_cover);
    assert!(h.edge_ids().is_empty());
}

#[test]
fn test_delete_bank_removes_incident_edges() {
    let mut h = setup();
    h.connect("bank-1", "cl-1");
    h.connect("bank-1", "bank-2");
    h.connect("bank-2", "street-1");
    h.delete("bank-1");
    assert_eq!(h.edge_ids(), vec!["bank-2-street-1"]);
    assert!(h.bank("bank-2").street_cover);
}

#[test]
fn test_delete_mode_prefers_node_over_edge() {
    let mut h = setup();
    h.connect("bank-1", "cl-1");
    // Inside bank-1 and on the edge
    h.delete_at(120.0, 100.0);
    assert!(h.graph().find_node("bank-1").is_none());
}

#[test]
fn test_delete_edge_leaves_properties_by_default() {
    let mut h = setup();
    h.connect("bank-1", "cl-1");
    h.delete_at(250.0, 104.0);

    assert!(h.edge_ids().is_empty());
    assert!(h.graph().find_node("cl-1").is_some());
    assert_eq!(h.bank("bank-1").credit_line.as_deref(), Some("CL1"));

    // The stale property still allows reconnecting the same credit line
    h.connect("bank-1", "cl-1");
    assert_eq!(h.edge_ids(), vec!["bank-1-cl-1"]);
}

#[test]
fn test_delete_edge_reconciles_when_configured() {
    let config = EditorConfig { reconcile_on_edge_delete: true, ..Default::default() };
    let mut h = setup_with(config);
    h.connect("bank-1", "cl-1");
    h.connect("bank-1", "proj-1");

    h.delete_at(250.0, 100.0);
    assert_eq!(h.bank("bank-1").credit_line, None);
    assert!(h.bank("bank-1").projection_aware);

    // Diagonal edge bank-1 (100,100) -> proj-1 (400,400)
    h.delete_at(250.0, 250.0);
    assert!(!h.bank("bank-1").projection_aware);
    assert!(h.edge_ids().is_empty());
}

#[test]
fn test_delete_bidirectional_half() {
    let mut h = setup();
    h.connect_bidirectional("bank-1", "cl-1");
    // Forward edge is drawn 5 units above the center line
    h.delete_at(250.0, 95.0);
    assert_eq!(h.edge_ids(), vec!["cl-1-bank-1"]);
}

#[test]
fn test_delete_clears_selection() {
    let mut h = setup();
    h.select_at(400.0, 100.0);
    assert!(h.selection().is_node("cl-1"));

    // Selection survives a direct delete of another node but not its own
    assert!(h.ctrl.delete_node("bank-2"));
    assert!(h.selection().is_node("cl-1"));
    assert!(h.ctrl.delete_node("cl-1"));
    assert!(h.selection().is_empty());
}

#[test]
fn test_delete_on_empty_canvas_is_noop() {
    let mut h = setup();
    let graph = h.graph();
    h.delete_at(250.0, 600.0);
    assert_eq!(h.graph(), graph);
}
