//! Renderer as a draw-command list.
//!
//! [`render_scene`] is a pure function of the graph, selection, viewport and
//! pending connection. Commands are in world coordinates; the [`Viewport`]
//! carried by the [`DrawList`] maps them to the screen. Line widths and font
//! sizes are divided by the zoom so they stay constant on screen.

use crate::config::EditorConfig;
use crate::geometry::Segment;
use crate::graph::Graph;
use crate::hit_test::edge_segment;
use crate::model::{BankProperties, Edge, Node, NodeProperties};
use crate::selection::Selection;
use crate::viewport::Viewport;
use slint::Color;
use std::f32::consts::PI;

pub const ARROW_LENGTH: f32 = 8.0;
pub const ARROW_HALF_ANGLE: f32 = PI / 7.0;

/// Colours used by the renderer.
pub mod palette {
    use slint::Color;

    pub const BANK_CRITICAL: Color = Color::from_rgb_u8(0xff, 0x52, 0x52);
    pub const BANK_OVER: Color = Color::from_rgb_u8(0xff, 0xcc, 0xcb);
    pub const BANK_HEALTHY: Color = Color::from_rgb_u8(0x4c, 0xaf, 0x50);
    pub const BANK_UNKNOWN: Color = Color::from_rgb_u8(0xe0, 0xe0, 0xe0);
    pub const CREDIT_LINE: Color = Color::from_rgb_u8(0x9c, 0x27, 0xb0);
    pub const PROJECTION: Color = Color::from_rgb_u8(0xff, 0x98, 0x00);
    pub const STREET: Color = Color::from_rgb_u8(0x79, 0x55, 0x48);
    pub const EDGE: Color = Color::from_rgb_u8(0x99, 0x99, 0x99);
    pub const EDGE_SELECTED: Color = Color::from_rgb_u8(0x19, 0x76, 0xd2);
    pub const NODE_STROKE: Color = Color::from_rgb_u8(0x33, 0x33, 0x33);
    pub const LABEL: Color = Color::from_rgb_u8(0x00, 0x00, 0x00);
    pub const LABEL_PLATE: Color = Color::from_argb_u8(204, 0xff, 0xff, 0xff);
    pub const SELECTION_RING: Color = Color::from_argb_u8(204, 0xff, 0xff, 0xff);
    pub const PENDING: Color = Color::from_rgb_u8(0x4c, 0xaf, 0x50);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    /// Dash and gap lengths; `None` for a solid line
    pub dash: Option<(f32, f32)>,
}

impl Stroke {
    pub fn solid(color: Color, width: f32) -> Self {
        Self { color, width, dash: None }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        stroke: Stroke,
    },
    Polygon {
        points: Vec<(f32, f32)>,
        fill: Color,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Color,
    },
    /// Text centered on `(x, y)`
    Text {
        x: f32,
        y: f32,
        text: String,
        font_size: f32,
        color: Color,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    pub viewport: Viewport,
    pub commands: Vec<DrawCommand>,
}

/// In-progress connection drawn from the start node to the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingPreview<'a> {
    pub from: &'a str,
    /// Cursor position in world coordinates
    pub cursor: (f32, f32),
}

/// Fill colour of a bank by the health of its balances.
pub fn bank_color(bank: &BankProperties) -> Color {
    if bank.projected < bank.min || bank.actual < 0.0 {
        palette::BANK_CRITICAL
    } else if bank.projected > bank.max {
        palette::BANK_OVER
    } else if bank.projected >= bank.min && bank.projected <= bank.max {
        palette::BANK_HEALTHY
    } else {
        palette::BANK_UNKNOWN
    }
}

pub fn node_color(node: &Node) -> Color {
    match &node.properties {
        NodeProperties::Bank(bank) => bank_color(bank),
        NodeProperties::CreditLine(_) => palette::CREDIT_LINE,
        NodeProperties::Projection(_) => palette::PROJECTION,
        NodeProperties::Street(_) => palette::STREET,
    }
}

pub fn node_label(node: &Node) -> &str {
    match &node.properties {
        NodeProperties::Street(_) => "STREET",
        _ => node.identifier(),
    }
}

/// Rough text width for sizing label plates.
fn estimate_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * 0.6
}

fn arrowhead(segment: &Segment, radius: f32) -> Vec<(f32, f32)> {
    let angle = segment.angle();
    let tip_x = segment.end_x - radius * angle.cos();
    let tip_y = segment.end_y - radius * angle.sin();
    let wing = |a: f32| {
        (
            tip_x - ARROW_LENGTH * a.cos(),
            tip_y - ARROW_LENGTH * a.sin(),
        )
    };
    vec![(tip_x, tip_y), wing(angle - ARROW_HALF_ANGLE), wing(angle + ARROW_HALF_ANGLE)]
}

fn render_edge(out: &mut Vec<DrawCommand>, edge: &Edge, graph: &Graph, selected: bool, zoom: f32, config: &EditorConfig) {
    let Some(segment) = edge_segment(edge, &graph.edges, &graph.nodes, config.bidirectional_offset) else {
        return;
    };
    let (color, width) = if selected {
        (palette::EDGE_SELECTED, 3.0)
    } else {
        (palette::EDGE, 2.0)
    };

    out.push(DrawCommand::Line {
        x1: segment.start_x,
        y1: segment.start_y,
        x2: segment.end_x,
        y2: segment.end_y,
        stroke: Stroke::solid(color, width / zoom),
    });
    out.push(DrawCommand::Polygon { points: arrowhead(&segment, config.node_radius), fill: color });

    // One cost label per bidirectional pair, drawn by the lower source id
    if graph.edge_exists(&edge.target, &edge.source) && edge.source >= edge.target {
        return;
    }

    let text = format!("{}", edge.properties.cost.round() as i64);
    let font_size = (14.0 / zoom).max(8.0);
    let padding = 3.0 / zoom;
    let width = estimate_text_width(&text, font_size) + 2.0 * padding;
    let height = font_size + 2.0 * padding;
    let (mx, my) = segment.midpoint();
    out.push(DrawCommand::Rect {
        x: mx - width / 2.0,
        y: my - height / 2.0,
        width,
        height,
        fill: palette::LABEL_PLATE,
    });
    let label_color = if selected { palette::EDGE_SELECTED } else { palette::NODE_STROKE };
    out.push(DrawCommand::Text { x: mx, y: my, text, font_size, color: label_color });
}

fn render_node(out: &mut Vec<DrawCommand>, node: &Node, selected: bool, zoom: f32, radius: f32) {
    let color = node_color(node);
    if selected {
        out.push(DrawCommand::Circle {
            cx: node.x,
            cy: node.y,
            radius: radius * 1.3,
            fill: None,
            stroke: Some(Stroke::solid(palette::SELECTION_RING, 3.0 / zoom)),
        });
        out.push(DrawCommand::Circle {
            cx: node.x,
            cy: node.y,
            radius: radius * 1.15,
            fill: None,
            stroke: Some(Stroke::solid(color, 2.0 / zoom)),
        });
    }
    out.push(DrawCommand::Circle {
        cx: node.x,
        cy: node.y,
        radius,
        fill: Some(color),
        stroke: Some(Stroke::solid(palette::NODE_STROKE, 2.0 / zoom)),
    });
    out.push(DrawCommand::Text {
        x: node.x,
        y: node.y,
        text: node_label(node).to_string(),
        font_size: (12.0 / zoom).max(6.0),
        color: palette::LABEL,
    });
}

fn render_pending(out: &mut Vec<DrawCommand>, graph: &Graph, pending: &PendingPreview<'_>, zoom: f32, radius: f32) {
    let Some(start) = graph.find_node(pending.from) else {
        return;
    };
    out.push(DrawCommand::Line {
        x1: start.x,
        y1: start.y,
        x2: pending.cursor.0,
        y2: pending.cursor.1,
        stroke: Stroke {
            color: palette::EDGE,
            width: 1.0 / zoom,
            dash: Some((5.0 / zoom, 3.0 / zoom)),
        },
    });
    out.push(DrawCommand::Circle {
        cx: start.x,
        cy: start.y,
        radius: radius + 5.0,
        fill: None,
        stroke: Some(Stroke::solid(palette::PENDING, 2.0 / zoom)),
    });
}

/// Build the draw list for one frame: edges, then nodes in insertion order,
/// then the pending-connection preview on top.
pub fn render_scene(
    graph: &Graph,
    selection: &Selection,
    viewport: &Viewport,
    pending: Option<&PendingPreview<'_>>,
    config: &EditorConfig,
) -> DrawList {
    let zoom = viewport.zoom;
    let mut commands = Vec::new();

    for edge in &graph.edges {
        render_edge(&mut commands, edge, graph, selection.is_edge(&edge.id), zoom, config);
    }
    for node in &graph.nodes {
        render_node(&mut commands, node, selection.is_node(&node.id), zoom, config.node_radius);
    }
    if let Some(pending) = pending {
        render_pending(&mut commands, graph, pending, zoom, config.node_radius);
    }

    DrawList { viewport: *viewport, commands }
}
