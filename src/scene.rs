//! Slint binding for rendered frames.
//!
//! [`SceneModels`] flattens a [`DrawList`] into screen-space shapes (SVG path
//! commands for a Slint `Path`) and text labels, and keeps bound Slint
//! `VecModel`s in sync with them.
//!
//! # Example
//!
//! ```ignore
//! use bank_graph_editor::SceneModels;
//!
//! let mut scene = SceneModels::new();
//! let shapes = Rc::new(VecModel::<ShapeRow>::default());
//! scene.bind_shapes(shapes.clone(), |path, fill, stroke, width| ShapeRow { path, fill, stroke, width });
//! window.set_shapes(ModelRc::from(shapes));
//!
//! // After every state change
//! scene.update(&controller.render());
//! ```

use crate::path::{circle_path, dashed_line_path, line_path, polygon_path, rect_path};
use crate::render::{DrawCommand, DrawList, Stroke};
use slint::{Color, Model, ModelRc, SharedString, VecModel};
use std::rc::Rc;

const TRANSPARENT: Color = Color::from_argb_u8(0, 0, 0, 0);

/// A filled and/or stroked outline in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeData {
    pub path_commands: String,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f32,
}

/// A text label centered on `(x, y)` in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelData {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub color: Color,
}

/// Internal trait for auto-syncing to Slint models.
trait ModelSyncer<T> {
    fn sync(&self, items: &[T]);
}

/// Concrete implementation of ModelSyncer for a specific row type.
struct ConcreteModelSyncer<P, F> {
    model: Rc<VecModel<P>>,
    constructor: F,
}

fn sync_rows<T, P>(model: &VecModel<P>, items: &[T], make: impl Fn(&T) -> P)
where
    P: Clone + 'static,
{
    // Update existing rows or add new ones
    for (i, item) in items.iter().enumerate() {
        let row = make(item);
        if i < model.row_count() {
            model.set_row_data(i, row);
        } else {
            model.push(row);
        }
    }
    // Remove excess rows
    while model.row_count() > items.len() {
        model.remove(model.row_count() - 1);
    }
}

impl<P, F> ModelSyncer<ShapeData> for ConcreteModelSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(SharedString, Color, Color, f32) -> P,
{
    fn sync(&self, items: &[ShapeData]) {
        sync_rows(&self.model, items, |s| {
            (self.constructor)(SharedString::from(s.path_commands.as_str()), s.fill, s.stroke, s.stroke_width)
        });
    }
}

impl<P, F> ModelSyncer<LabelData> for ConcreteModelSyncer<P, F>
where
    P: Clone + 'static,
    F: Fn(SharedString, f32, f32, f32, Color) -> P,
{
    fn sync(&self, items: &[LabelData]) {
        sync_rows(&self.model, items, |l| {
            (self.constructor)(SharedString::from(l.text.as_str()), l.x, l.y, l.font_size, l.color)
        });
    }
}

/// Screen-space shapes and labels of the last rendered frame.
#[derive(Default)]
pub struct SceneModels {
    shapes: Vec<ShapeData>,
    labels: Vec<LabelData>,
    shape_syncer: Option<Box<dyn ModelSyncer<ShapeData>>>,
    label_syncer: Option<Box<dyn ModelSyncer<LabelData>>>,
}

impl SceneModels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a Slint model for shapes, built from
    /// `(path_commands, fill, stroke, stroke_width)`.
    pub fn bind_shapes<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(SharedString, Color, Color, f32) -> P + 'static,
    {
        self.shape_syncer = Some(Box::new(ConcreteModelSyncer { model, constructor }));
    }

    /// Bind a Slint model for labels, built from
    /// `(text, x, y, font_size, color)`.
    pub fn bind_labels<P, F>(&mut self, model: Rc<VecModel<P>>, constructor: F)
    where
        P: Clone + 'static,
        F: Fn(SharedString, f32, f32, f32, Color) -> P + 'static,
    {
        self.label_syncer = Some(Box::new(ConcreteModelSyncer { model, constructor }));
    }

    /// Convert a frame to screen space and push it into the bound models.
    pub fn update(&mut self, list: &DrawList) {
        self.shapes.clear();
        self.labels.clear();

        let vp = list.viewport;
        let zoom = vp.zoom;
        let stroke_parts = |stroke: &Option<Stroke>| match stroke {
            Some(s) => (s.color, s.width * zoom),
            None => (TRANSPARENT, 0.0),
        };

        for command in &list.commands {
            match command {
                DrawCommand::Circle { cx, cy, radius, fill, stroke } => {
                    let (sx, sy) = vp.world_to_screen(*cx, *cy);
                    let (stroke, stroke_width) = stroke_parts(stroke);
                    self.shapes.push(ShapeData {
                        path_commands: circle_path(sx, sy, radius * zoom),
                        fill: fill.unwrap_or(TRANSPARENT),
                        stroke,
                        stroke_width,
                    });
                }
                DrawCommand::Line { x1, y1, x2, y2, stroke } => {
                    let (sx1, sy1) = vp.world_to_screen(*x1, *y1);
                    let (sx2, sy2) = vp.world_to_screen(*x2, *y2);
                    let path_commands = match stroke.dash {
                        Some((dash, gap)) => dashed_line_path(sx1, sy1, sx2, sy2, dash * zoom, gap * zoom),
                        None => line_path(sx1, sy1, sx2, sy2),
                    };
                    self.shapes.push(ShapeData {
                        path_commands,
                        fill: TRANSPARENT,
                        stroke: stroke.color,
                        stroke_width: stroke.width * zoom,
                    });
                }
                DrawCommand::Polygon { points, fill } => {
                    let screen: Vec<(f32, f32)> =
                        points.iter().map(|(x, y)| vp.world_to_screen(*x, *y)).collect();
                    self.shapes.push(ShapeData {
                        path_commands: polygon_path(&screen),
                        fill: *fill,
                        stroke: TRANSPARENT,
                        stroke_width: 0.0,
                    });
                }
                DrawCommand::Rect { x, y, width, height, fill } => {
                    let (sx, sy) = vp.world_to_screen(*x, *y);
                    self.shapes.push(ShapeData {
                        path_commands: rect_path(sx, sy, width * zoom, height * zoom),
                        fill: *fill,
                        stroke: TRANSPARENT,
                        stroke_width: 0.0,
                    });
                }
                DrawCommand::Text { x, y, text, font_size, color } => {
                    let (sx, sy) = vp.world_to_screen(*x, *y);
                    self.labels.push(LabelData {
                        text: text.clone(),
                        x: sx,
                        y: sy,
                        font_size: font_size * zoom,
                        color: *color,
                    });
                }
            }
        }

        if let Some(syncer) = &self.shape_syncer {
            syncer.sync(&self.shapes);
        }
        if let Some(syncer) = &self.label_syncer {
            syncer.sync(&self.labels);
        }
    }

    pub fn shapes(&self) -> &[ShapeData] {
        &self.shapes
    }

    pub fn labels(&self) -> &[LabelData] {
        &self.labels
    }

    /// Create a one-off Slint model of the current shapes.
    pub fn create_shapes_model<P, F>(&self, constructor: F) -> ModelRc<P>
    where
        P: Clone + 'static,
        F: Fn(SharedString, Color, Color, f32) -> P,
    {
        let items: Vec<P> = self
            .shapes
            .iter()
            .map(|s| constructor(SharedString::from(s.path_commands.as_str()), s.fill, s.stroke, s.stroke_width))
            .collect();
        ModelRc::from(Rc::new(VecModel::from(items)))
    }
}
