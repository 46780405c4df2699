//! # Bank Graph Editor
//!
//! Interaction engine for a visual editor of bank flow graphs: banks, credit
//! lines, projections and a street node, joined by directed, costed edges on
//! a pannable and zoomable canvas.
//!
//! ## Features
//!
//! - **Typed Nodes** - Four node kinds with type-specific properties and business identifiers
//! - **Connection Rules** - Validator framework enforcing bank-centric topology and entity matching
//! - **Derived Properties** - `creditLine`, `projectionAware` and `streetCover` follow the edges
//! - **Cascades** - Deletions, renames and entity edits keep the graph consistent
//! - **Immutable Snapshots** - Engines take a graph and return a new one
//! - **Draw Commands** - Rendering is a pure function producing a command list for Slint
//!
//! ## Core Components
//!
//! - [`EditorController`] - Owns editor state and dispatches pointer input by [`Mode`]
//! - [`Graph`] - Graph snapshot with topology queries
//! - [`CompositeValidator`] - Connection rule set
//! - [`SceneModels`] - Syncs rendered frames into Slint `VecModel`s
//!
//! ## Rust Helpers
//!
//! - [`connect`] / [`connect_bidirectional`] - Connection engine
//! - [`delete_node`] / [`delete_edge`] - Deletion engine with derived-property reversal
//! - [`export_state`] / [`apply_node_patch`] / [`apply_edge_patch`] - Graph state service
//! - [`find_node_at`] / [`find_edge_at`] - Hit-test in world coordinates
//! - [`render_scene`] - Build a [`DrawList`] for a frame

pub mod config;
pub mod connect;
pub mod controller;
pub mod delete;
pub mod error;
pub mod factory;
pub mod geometry;
pub mod graph;
pub mod ids;
pub mod model;
pub mod path;
pub mod render;
pub mod scene;
pub mod selection;
pub mod state;
pub mod viewport;

pub use config::{EditorConfig, NameScope};
pub use connect::{connect, connect_bidirectional, create_edge, ConnectOutcome};
pub use controller::EditorController;
pub use delete::{delete_edge, delete_node, DeleteOutcome};
pub use error::{EditError, Result, ValidationError};
pub use factory::{
    create_bank_node, create_credit_line_node, create_node, create_projection_node,
    create_street_node,
};
pub use geometry::{distance_to_segment, point_in_circle, screen_to_world, world_to_screen, Segment};
pub use graph::{
    Graph,
    // Connection validation framework
    BankEndpointValidator, BidirectionalValidator, CompositeValidator, ConnectionRequest,
    ConnectionValidator, CreditLineValidator, ProjectionValidator, ValidationResult,
};
pub use hit_test::{edge_segment, find_edge_at, find_node_at, pick, Hit};
pub use ids::{allocate, Allocation, IdCounters};
pub use model::{
    BankProperties, CreditLineProperties, Edge, EdgeProperties, Mode, Node, NodeKind,
    NodeProperties, ProjectionProperties, StreetProperties,
};
pub use path::{circle_path, dashed_line_path, line_path, polygon_path, rect_path};
pub use render::{render_scene, DrawCommand, DrawList, PendingPreview, Stroke};
pub use scene::{LabelData, SceneModels, ShapeData};
pub use selection::{SelectedElement, Selection};
pub use state::{
    apply_edge_patch, apply_node_patch, export_state, validate_node_patch, ExportedGraph,
    ExportedNode, PatchOutcome, RenameHint,
};
pub use viewport::Viewport;
