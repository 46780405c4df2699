//! Interaction controller for the bank graph editor.
//!
//! The [`EditorController`] owns the graph, selection, viewport, id counters
//! and gesture state, and dispatches pointer input according to the current
//! [`Mode`]. Every mutation replaces the graph with a new snapshot.
//!
//! # Example
//!
//! ```ignore
//! use bank_graph_editor::{EditorController, Mode, SceneModels};
//!
//! slint::include_modules!();
//!
//! fn main() {
//!     let window = MainWindow::new().unwrap();
//!     let ctrl = EditorController::new();
//!     let scene = Rc::new(RefCell::new(SceneModels::new()));
//!
//!     // Pointer input in screen coordinates
//!     window.on_pointer_down(ctrl.pointer_down_callback());
//!     window.on_pointer_move(ctrl.pointer_move_callback());
//!     window.on_pointer_up(ctrl.pointer_up_callback());
//!     window.on_clicked(ctrl.click_callback());
//!     window.on_wheel(ctrl.wheel_callback());
//!
//!     window.on_mode_changed({
//!         let ctrl = ctrl.clone();
//!         move |mode| ctrl.set_mode(mode_from_ui(mode))
//!     });
//!
//!     // Redraw after each event
//!     window.on_redraw({
//!         let ctrl = ctrl.clone();
//!         let scene = scene.clone();
//!         move || scene.borrow_mut().update(&ctrl.render())
//!     });
//!
//!     window.run().unwrap();
//! }
//! ```

use crate::config::EditorConfig;
use crate::connect::{connect, connect_bidirectional};
use crate::delete::{delete_edge, delete_node};
use crate::error::{EditError, Result};
use crate::factory::create_node;
use crate::graph::Graph;
use crate::hit_test::{find_edge_at, find_node_at, pick};
use crate::ids::{allocate, IdCounters};
use crate::model::{Mode, NodeKind};
use crate::render::{render_scene, DrawList, PendingPreview};
use crate::selection::{SelectedElement, Selection};
use crate::state::{apply_edge_patch, apply_node_patch, export_state, ExportedGraph, RenameHint};
use crate::viewport::Viewport;
use log::{debug, warn};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

/// Pointer gesture in progress between pointer-down and pointer-up.
#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    Idle,
    /// Dragging a node; the offset is `pointer - node` in world units
    Drag {
        node_id: String,
        offset_x: f32,
        offset_y: f32,
    },
    /// Panning; last pointer position in screen units
    Pan { last_x: f32, last_y: f32 },
}

#[derive(Debug, Clone)]
struct Message {
    text: String,
    raised: Instant,
}

struct EditorState {
    config: EditorConfig,
    graph: Graph,
    selection: Selection,
    viewport: Viewport,
    counters: IdCounters,
    mode: Mode,
    pending: Option<String>,
    gesture: Gesture,
    /// Last pointer position in world units
    cursor: (f32, f32),
    message: Option<Message>,
}

impl EditorState {
    fn new(config: EditorConfig) -> Self {
        Self {
            config,
            graph: Graph::new(),
            selection: Selection::None,
            viewport: Viewport::default(),
            counters: IdCounters::default(),
            mode: Mode::Select,
            pending: None,
            gesture: Gesture::Idle,
            cursor: (0.0, 0.0),
            message: None,
        }
    }

    fn show(&mut self, text: String) {
        self.message = Some(Message { text, raised: Instant::now() });
    }

    /// Surface a rejected operation and hand the error back.
    fn reject<T>(&mut self, err: EditError) -> Result<T> {
        warn!("{}", err);
        self.show(err.to_string());
        Err(err)
    }

    fn commit(&mut self, graph: Graph) {
        self.graph = graph;
        self.selection.refresh(&self.graph);
    }

    fn add_node(&mut self, kind: NodeKind, x: f32, y: f32) -> Result<String> {
        if kind == NodeKind::Street && self.graph.contains_kind(NodeKind::Street) {
            return self.reject(EditError::StreetAlreadyExists);
        }

        let alloc = allocate(&self.graph, kind, self.counters.get(kind), self.config.name_scope);
        let node = create_node(kind, x, y, alloc.seq);
        let id = node.id.clone();
        debug!("added {} at ({:.1}, {:.1})", id, x, y);

        let mut next = self.graph.clone();
        next.nodes.push(node);
        self.commit(next);
        self.counters = self.counters.with(kind, alloc.next);
        Ok(id)
    }

    fn connect(&mut self, a: &str, b: &str, bidirectional: bool) -> Result<()> {
        let outcome = if bidirectional {
            connect_bidirectional(&self.graph, a, b)
        } else {
            connect(&self.graph, a, b)
        };
        match outcome {
            Ok(Some(outcome)) => {
                self.commit(outcome.graph);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => self.reject(err.into()),
        }
    }

    fn delete_node(&mut self, id: &str) -> bool {
        match delete_node(&self.graph, id) {
            Some(outcome) => {
                if self.pending.as_deref() == Some(id) {
                    self.pending = None;
                }
                self.commit(outcome.graph);
                true
            }
            None => false,
        }
    }

    fn delete_edge(&mut self, id: &str) -> bool {
        match delete_edge(&self.graph, id, self.config.reconcile_on_edge_delete) {
            Some(outcome) => {
                self.commit(outcome.graph);
                true
            }
            None => false,
        }
    }

    fn update_node_properties(
        &mut self,
        id: &str,
        patch: &Map<String, Value>,
        rename: Option<&RenameHint>,
    ) -> Result<()> {
        match apply_node_patch(&self.graph, id, patch, rename, self.config.name_scope) {
            Ok(Some(outcome)) => {
                if let Some(notice) = outcome.notice() {
                    self.show(notice);
                }
                self.commit(outcome.graph);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => self.reject(err),
        }
    }

    fn update_edge_properties(&mut self, id: &str, patch: &Map<String, Value>) -> Result<()> {
        match apply_edge_patch(&self.graph, id, patch) {
            Ok(Some(graph)) => {
                self.commit(graph);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => self.reject(err),
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        if mode != Mode::Select {
            self.selection.clear();
        }
        self.pending = None;
        self.gesture = Gesture::Idle;
        self.mode = mode;
        debug!("mode {:?}", mode);
    }

    fn click(&mut self, sx: f32, sy: f32) {
        let (x, y) = self.viewport.screen_to_world(sx, sy);
        self.cursor = (x, y);
        let c = &self.config;

        match self.mode {
            Mode::Select => {
                let hit = pick(
                    x,
                    y,
                    &self.graph.nodes,
                    &self.graph.edges,
                    c.node_radius,
                    c.edge_hit_threshold,
                    c.bidirectional_offset,
                );
                self.selection = Selection::from_hit(hit);
            }
            Mode::Connect | Mode::ConnectBidirectional => {
                let hit = find_node_at(x, y, &self.graph.nodes, c.node_radius).map(|n| n.id.clone());
                let pending = self.pending.take();
                match (pending, hit) {
                    (None, Some(id)) => self.pending = Some(id),
                    (Some(from), Some(to)) if from != to => {
                        let bidirectional = self.mode == Mode::ConnectBidirectional;
                        let _ = self.connect(&from, &to, bidirectional);
                    }
                    _ => debug!("pending connection cancelled"),
                }
            }
            Mode::Delete => {}
            Mode::AddBank | Mode::AddCreditLine | Mode::AddProjection | Mode::AddStreet => {
                if let Some(kind) = self.mode.adds() {
                    let _ = self.add_node(kind, x, y);
                }
            }
        }
    }

    fn pointer_down(&mut self, sx: f32, sy: f32) {
        let (x, y) = self.viewport.screen_to_world(sx, sy);
        self.cursor = (x, y);
        let c = &self.config;

        match self.mode {
            Mode::Select => {
                self.gesture = match find_node_at(x, y, &self.graph.nodes, c.node_radius) {
                    Some(node) => Gesture::Drag {
                        node_id: node.id.clone(),
                        offset_x: x - node.x,
                        offset_y: y - node.y,
                    },
                    None => Gesture::Pan { last_x: sx, last_y: sy },
                };
            }
            Mode::Delete => {
                let node = find_node_at(x, y, &self.graph.nodes, c.node_radius).map(|n| n.id.clone());
                if let Some(id) = node {
                    self.delete_node(&id);
                    return;
                }
                let edge = find_edge_at(
                    x,
                    y,
                    &self.graph.edges,
                    &self.graph.nodes,
                    c.edge_hit_threshold,
                    c.bidirectional_offset,
                )
                .map(|e| e.id.clone());
                if let Some(id) = edge {
                    self.delete_edge(&id);
                }
            }
            _ => {}
        }
    }

    fn pointer_move(&mut self, sx: f32, sy: f32) {
        let (x, y) = self.viewport.screen_to_world(sx, sy);
        self.cursor = (x, y);

        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Drag { node_id, offset_x, offset_y } => {
                let Some(mut node) = self.graph.find_node(node_id).cloned() else {
                    return;
                };
                node.x = x - *offset_x;
                node.y = y - *offset_y;
                self.graph.replace_node(node);
                self.selection.refresh(&self.graph);
            }
            Gesture::Pan { last_x, last_y } => {
                let (dx, dy) = (sx - *last_x, sy - *last_y);
                *last_x = sx;
                *last_y = sy;
                self.viewport.pan_by(dx, dy);
            }
        }
    }

    fn pointer_up(&mut self) {
        if let Gesture::Drag { node_id, .. } = &self.gesture {
            debug!("drag of {} ended", node_id);
        }
        self.gesture = Gesture::Idle;
    }

    fn wheel(&mut self, sx: f32, sy: f32, delta_y: f32) {
        self.viewport.zoom_at(sx, sy, delta_y, &self.config);
        self.cursor = self.viewport.screen_to_world(sx, sy);
    }

    fn message_at(&self, now: Instant) -> Option<String> {
        let message = self.message.as_ref()?;
        let age = now.saturating_duration_since(message.raised);
        (age < self.config.message_duration()).then(|| message.text.clone())
    }

    fn render(&self) -> DrawList {
        let pending = self
            .pending
            .as_deref()
            .map(|from| PendingPreview { from, cursor: self.cursor });
        render_scene(&self.graph, &self.selection, &self.viewport, pending.as_ref(), &self.config)
    }
}

/// Controller that owns editor state and provides callback implementations.
///
/// Clone this controller to share it across callbacks.
#[derive(Clone)]
pub struct EditorController {
    state: Rc<RefCell<EditorState>>,
}

impl Default for EditorController {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorController {
    /// Create a new controller with default settings.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self { state: Rc::new(RefCell::new(EditorState::new(config))) }
    }

    pub fn config(&self) -> EditorConfig {
        self.state.borrow().config.clone()
    }

    // === Snapshots ===

    pub fn graph(&self) -> Graph {
        self.state.borrow().graph.clone()
    }

    pub fn selection(&self) -> Selection {
        self.state.borrow().selection.clone()
    }

    /// Descriptor for the properties pane, if anything is selected.
    pub fn selected_element(&self) -> Option<SelectedElement> {
        self.state.borrow().selection.element()
    }

    pub fn viewport(&self) -> Viewport {
        self.state.borrow().viewport
    }

    pub fn counters(&self) -> IdCounters {
        self.state.borrow().counters
    }

    pub fn mode(&self) -> Mode {
        self.state.borrow().mode
    }

    /// Id of the node a pending connection starts from.
    pub fn pending_connection(&self) -> Option<String> {
        self.state.borrow().pending.clone()
    }

    /// Id of the node being dragged.
    pub fn dragged_node_id(&self) -> Option<String> {
        match &self.state.borrow().gesture {
            Gesture::Drag { node_id, .. } => Some(node_id.clone()),
            _ => None,
        }
    }

    pub fn export_state(&self) -> ExportedGraph {
        export_state(&self.state.borrow().graph)
    }

    /// Replace the whole graph, e.g. after loading saved state. Clears
    /// selection and any gesture.
    pub fn load_graph(&self, graph: Graph) {
        let mut state = self.state.borrow_mut();
        state.graph = graph;
        state.selection.clear();
        state.pending = None;
        state.gesture = Gesture::Idle;
    }

    /// Current transient message, if it has not expired.
    pub fn message(&self) -> Option<String> {
        self.message_at(Instant::now())
    }

    /// Transient message as seen at `now`.
    pub fn message_at(&self, now: Instant) -> Option<String> {
        self.state.borrow().message_at(now)
    }

    pub fn render(&self) -> DrawList {
        self.state.borrow().render()
    }

    // === Direct handlers ===

    pub fn set_mode(&self, mode: Mode) {
        self.state.borrow_mut().set_mode(mode);
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.state.borrow_mut().viewport = viewport;
    }

    /// Add a node of `kind` at world position `(x, y)`. Returns the new id.
    pub fn add_node(&self, kind: NodeKind, x: f32, y: f32) -> Result<String> {
        self.state.borrow_mut().add_node(kind, x, y)
    }

    pub fn connect_nodes(&self, source_id: &str, target_id: &str) -> Result<()> {
        self.state.borrow_mut().connect(source_id, target_id, false)
    }

    pub fn connect_nodes_bidirectional(&self, a: &str, b: &str) -> Result<()> {
        self.state.borrow_mut().connect(a, b, true)
    }

    /// Returns `false` if no node has this id.
    pub fn delete_node(&self, id: &str) -> bool {
        self.state.borrow_mut().delete_node(id)
    }

    /// Returns `false` if no edge has this id.
    pub fn delete_edge(&self, id: &str) -> bool {
        self.state.borrow_mut().delete_edge(id)
    }

    pub fn update_node_properties(
        &self,
        id: &str,
        patch: &Map<String, Value>,
        rename: Option<&RenameHint>,
    ) -> Result<()> {
        self.state.borrow_mut().update_node_properties(id, patch, rename)
    }

    pub fn update_edge_properties(&self, id: &str, patch: &Map<String, Value>) -> Result<()> {
        self.state.borrow_mut().update_edge_properties(id, patch)
    }

    /// Handle a click at screen position `(x, y)`.
    pub fn click(&self, x: f32, y: f32) {
        self.state.borrow_mut().click(x, y);
    }

    pub fn pointer_down(&self, x: f32, y: f32) {
        self.state.borrow_mut().pointer_down(x, y);
    }

    pub fn pointer_move(&self, x: f32, y: f32) {
        self.state.borrow_mut().pointer_move(x, y);
    }

    pub fn pointer_up(&self) {
        self.state.borrow_mut().pointer_up();
    }

    /// Handle a wheel event at screen position `(x, y)`.
    pub fn wheel(&self, x: f32, y: f32, delta_y: f32) {
        self.state.borrow_mut().wheel(x, y, delta_y);
    }

    // === Callback factories ===

    /// Returns a callback for click events.
    pub fn click_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| ctrl.click(x, y)
    }

    /// Returns a callback for pointer-down events.
    pub fn pointer_down_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| ctrl.pointer_down(x, y)
    }

    /// Returns a callback for pointer-move events.
    pub fn pointer_move_callback(&self) -> impl Fn(f32, f32) {
        let ctrl = self.clone();
        move |x, y| ctrl.pointer_move(x, y)
    }

    /// Returns a callback for pointer-up events.
    pub fn pointer_up_callback(&self) -> impl Fn() {
        let ctrl = self.clone();
        move || ctrl.pointer_up()
    }

    /// Returns a callback for wheel events `(x, y, delta_y)`.
    pub fn wheel_callback(&self) -> impl Fn(f32, f32, f32) {
        let ctrl = self.clone();
        move |x, y, delta_y| ctrl.wheel(x, y, delta_y)
    }
}
