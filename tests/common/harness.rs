//! Test harness driving an `EditorController` with screen-space input.
//!
//! Helpers take world coordinates and convert them through the current
//! viewport, the same way a UI would after the user pans or zooms.

#![allow(dead_code)]

use super::CallbackTracker;
use bank_graph_editor::{
    BankProperties, EditorConfig, EditorController, Graph, Mode, Node, NodeKind, SceneModels,
    Selection, Viewport,
};
use serde_json::{Map, Value};
use slint::{Color, Model, SharedString, VecModel};
use std::rc::Rc;

/// Row type bound to the shape model, standing in for a Slint struct.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeRow {
    pub path: SharedString,
    pub fill: Color,
    pub stroke: Color,
    pub width: f32,
}

pub struct EditorHarness {
    pub ctrl: EditorController,
    pub tracker: CallbackTracker,
    pub scene: SceneModels,
    pub shapes: Rc<VecModel<ShapeRow>>,
    pub labels: Rc<VecModel<SharedString>>,
}

impl EditorHarness {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        let ctrl = EditorController::with_config(config);
        let mut scene = SceneModels::new();
        let shapes = Rc::new(VecModel::<ShapeRow>::default());
        scene.bind_shapes(shapes.clone(), |path, fill, stroke, width| ShapeRow {
            path,
            fill,
            stroke,
            width,
        });
        let labels = Rc::new(VecModel::<SharedString>::default());
        scene.bind_labels(labels.clone(), |text, _x, _y, _size, _color| text);

        let mut harness = Self { ctrl, tracker: CallbackTracker::new(), scene, shapes, labels };
        harness.redraw();
        harness
    }

    /// Re-render into the bound models.
    pub fn redraw(&mut self) {
        self.scene.update(&self.ctrl.render());
    }

    /// Run one input event, record what it changed and redraw.
    fn event(&mut self, f: impl FnOnce(&EditorController)) {
        let graph = self.ctrl.graph();
        let selection = self.ctrl.selection();
        let viewport = self.ctrl.viewport();
        let message = self.ctrl.message();

        f(&self.ctrl);

        if self.ctrl.graph() != graph {
            *self.tracker.graph_changed.borrow_mut() += 1;
        }
        if self.ctrl.selection() != selection {
            *self.tracker.selection_changed.borrow_mut() += 1;
        }
        let vp = self.ctrl.viewport();
        if vp != viewport {
            self.tracker.update_viewport.borrow_mut().push((vp.zoom, vp.pan_x, vp.pan_y));
        }
        let current = self.ctrl.message();
        if current.is_some() && current != message {
            self.tracker.messages.borrow_mut().extend(current);
        }
        self.redraw();
    }

    fn to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        self.ctrl.viewport().world_to_screen(x, y)
    }

    // === Input simulation (world coordinates) ===

    pub fn set_mode(&mut self, mode: Mode) {
        self.event(|c| c.set_mode(mode));
    }

    pub fn click(&mut self, x: f32, y: f32) {
        let (sx, sy) = self.to_screen(x, y);
        self.event(|c| c.click(sx, sy));
    }

    pub fn press(&mut self, x: f32, y: f32) {
        let (sx, sy) = self.to_screen(x, y);
        self.event(|c| c.pointer_down(sx, sy));
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        let (sx, sy) = self.to_screen(x, y);
        self.event(|c| c.pointer_move(sx, sy));
    }

    pub fn release(&mut self) {
        self.event(|c| c.pointer_up());
    }

    /// Press at `from`, move to `to`, release.
    pub fn drag(&mut self, from: (f32, f32), to: (f32, f32)) {
        self.press(from.0, from.1);
        self.move_to(to.0, to.1);
        self.release();
    }

    /// Screen-space pan gesture starting on empty canvas.
    pub fn pan_screen(&mut self, from: (f32, f32), to: (f32, f32)) {
        self.event(|c| c.pointer_down(from.0, from.1));
        self.event(|c| c.pointer_move(to.0, to.1));
        self.event(|c| c.pointer_up());
    }

    pub fn wheel_screen(&mut self, sx: f32, sy: f32, delta_y: f32) {
        self.event(|c| c.wheel(sx, sy, delta_y));
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.event(|c| c.set_viewport(viewport));
    }

    // === Higher-level helpers ===

    /// Place a node by clicking in the matching add mode. Returns the new id.
    pub fn add(&mut self, kind: NodeKind, x: f32, y: f32) -> Option<String> {
        let mode = match kind {
            NodeKind::Bank => Mode::AddBank,
            NodeKind::CreditLine => Mode::AddCreditLine,
            NodeKind::Projection => Mode::AddProjection,
            NodeKind::Street => Mode::AddStreet,
        };
        let before: Vec<String> = self.ctrl.graph().nodes.iter().map(|n| n.id.clone()).collect();
        self.set_mode(mode);
        self.click(x, y);
        self.ctrl
            .graph()
            .nodes
            .iter()
            .map(|n| n.id.clone())
            .find(|id| !before.contains(id))
    }

    /// Connect two nodes by clicking their centers in connect mode.
    pub fn connect(&mut self, from: &str, to: &str) {
        self.connect_in(Mode::Connect, from, to);
    }

    pub fn connect_bidirectional(&mut self, from: &str, to: &str) {
        self.connect_in(Mode::ConnectBidirectional, from, to);
    }

    fn connect_in(&mut self, mode: Mode, from: &str, to: &str) {
        let (ax, ay) = self.position(from);
        let (bx, by) = self.position(to);
        self.set_mode(mode);
        self.click(ax, ay);
        self.click(bx, by);
    }

    /// Delete whatever is under the world point in delete mode.
    pub fn delete_at(&mut self, x: f32, y: f32) {
        self.set_mode(Mode::Delete);
        self.press(x, y);
        self.release();
    }

    pub fn delete(&mut self, id: &str) {
        let (x, y) = self.position(id);
        self.delete_at(x, y);
    }

    /// Select the element under the world point.
    pub fn select_at(&mut self, x: f32, y: f32) {
        self.set_mode(Mode::Select);
        self.click(x, y);
    }

    pub fn patch_node(&mut self, id: &str, patch: Value) -> bool {
        let patch = as_map(patch);
        let mut ok = false;
        self.event(|c| ok = c.update_node_properties(id, &patch, None).is_ok());
        ok
    }

    pub fn patch_edge(&mut self, id: &str, patch: Value) -> bool {
        let patch = as_map(patch);
        let mut ok = false;
        self.event(|c| ok = c.update_edge_properties(id, &patch).is_ok());
        ok
    }

    // === Queries ===

    pub fn graph(&self) -> Graph {
        self.ctrl.graph()
    }

    pub fn node(&self, id: &str) -> Node {
        self.ctrl.graph().find_node(id).cloned().expect("node exists")
    }

    pub fn bank(&self, id: &str) -> BankProperties {
        self.node(id).as_bank().cloned().expect("node is a bank")
    }

    pub fn position(&self, id: &str) -> (f32, f32) {
        let node = self.node(id);
        (node.x, node.y)
    }

    pub fn edge_ids(&self) -> Vec<String> {
        self.ctrl.graph().edges.iter().map(|e| e.id.clone()).collect()
    }

    pub fn selection(&self) -> Selection {
        self.ctrl.selection()
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.row_count()
    }

    pub fn label_texts(&self) -> Vec<String> {
        self.labels.iter().map(|s| s.to_string()).collect()
    }
}

pub fn as_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}
