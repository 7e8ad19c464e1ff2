use crate::config::Config;
use crate::layout::{Point, Rect, content_bounds};
use crate::theme::Theme;
use crate::tree::Tree;
use serde::Serialize;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub color: String,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridPattern {
    pub spacing: f32,
    pub dot_radius: f32,
    pub color: String,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Background {
        width: f32,
        height: f32,
        fill: String,
        grid: Option<GridPattern>,
    },
    /// Cubic curve with horizontal tangents at both ends.
    Link {
        from: Point,
        control_from: Point,
        control_to: Point,
        to: Point,
        stroke: Stroke,
    },
    Box {
        rect: Rect,
        corner_radius: f32,
        fill: String,
        stroke: Stroke,
        shadow: Option<String>,
    },
    /// Text centred horizontally on `position`; `position.y` is the baseline.
    Label {
        position: Point,
        text: String,
        font_size: f32,
        font_family: String,
        fill: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Primitive {
    /// Position in the scene's draw order.
    pub id: usize,
    /// Node this primitive belongs to; links carry their child's id.
    pub node_id: Option<String>,
    pub shape: Shape,
}

/// Ordered drawables (back to front) plus the canvas the host must allocate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    /// Added to layout coordinates so no box lies above or left of the origin.
    pub offset: Point,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn empty(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            offset: Point::default(),
            primitives: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn links(&self) -> impl Iterator<Item = &Primitive> + '_ {
        self.primitives
            .iter()
            .filter(|p| matches!(p.shape, Shape::Link { .. }))
    }

    pub fn boxes(&self) -> impl Iterator<Item = &Primitive> + '_ {
        self.primitives
            .iter()
            .filter(|p| matches!(p.shape, Shape::Box { .. }))
    }

    pub fn labels(&self) -> impl Iterator<Item = &Primitive> + '_ {
        self.primitives
            .iter()
            .filter(|p| matches!(p.shape, Shape::Label { .. }))
    }

    pub fn box_for(&self, node_id: &str) -> Option<&Primitive> {
        self.boxes()
            .find(|p| p.node_id.as_deref() == Some(node_id))
    }
}

struct SceneBuilder {
    primitives: Vec<Primitive>,
}

impl SceneBuilder {
    fn push(&mut self, node_id: Option<&str>, shape: Shape) {
        let id = self.primitives.len();
        self.primitives.push(Primitive {
            id,
            node_id: node_id.map(str::to_string),
            shape,
        });
    }
}

/// Turn a laid-out tree into drawables: background, links, boxes, labels.
#[instrument(level = "debug", skip_all, fields(nodes = tree.len()))]
pub fn render_scene(tree: &Tree, theme: &Theme, config: &Config) -> Scene {
    let geometry = &config.layout.geometry;
    let Canvas {
        width,
        height,
        offset,
    } = canvas(tree, config);
    let mut scene = SceneBuilder {
        primitives: Vec::with_capacity(1 + tree.len() * 3),
    };

    scene.push(
        None,
        Shape::Background {
            width,
            height,
            fill: theme.background.clone(),
            grid: config.render.grid.then(|| GridPattern {
                spacing: theme.grid_spacing,
                dot_radius: theme.grid_dot_radius,
                color: theme.grid_dot_color.clone(),
                opacity: theme.grid_dot_opacity,
            }),
        },
    );

    for link in tree.links() {
        let parent = tree.node(link.parent);
        let child = tree.node(link.child);
        let from = geometry.right_anchor(parent).translate(offset);
        let to = geometry.left_anchor(child).translate(offset);
        let mid_x = (from.x + to.x) / 2.0;
        scene.push(
            Some(child.id()),
            Shape::Link {
                from,
                control_from: Point::new(mid_x, from.y),
                control_to: Point::new(mid_x, to.y),
                to,
                stroke: Stroke {
                    color: theme.line_color.clone(),
                    width: theme.line_width,
                },
            },
        );
    }

    for (_, node) in tree.breadth_first() {
        scene.push(
            Some(node.id()),
            Shape::Box {
                rect: geometry.box_rect(node).translate(offset),
                corner_radius: geometry.corner_radius,
                fill: theme.box_fill.clone(),
                stroke: Stroke {
                    color: theme.box_stroke.clone(),
                    width: theme.box_stroke_width,
                },
                shadow: theme.box_shadow.clone(),
            },
        );
    }

    for (_, node) in tree.breadth_first() {
        let rect = geometry.box_rect(node).translate(offset);
        let tier = node.record.tier;
        scene.push(
            Some(node.id()),
            Shape::Label {
                position: Point::new(
                    rect.center().x,
                    node.position.y + offset.y + geometry.baseline_shift(tier),
                ),
                text: node.record.name.clone(),
                font_size: geometry.font_size(tier),
                font_family: theme.font_family.clone(),
                fill: theme.text_color.clone(),
            },
        );
    }

    debug!(
        primitives = scene.primitives.len(),
        width,
        height,
        offset_x = offset.x,
        offset_y = offset.y,
        "rendered scene"
    );
    Scene {
        width,
        height,
        offset,
        primitives: scene.primitives,
    }
}

struct Canvas {
    width: f32,
    height: f32,
    offset: Point,
}

/// Configured canvas, shifted so boxes spilling past the top or left edge move
/// back inside, and grown when they spill past the right or bottom edge.
fn canvas(tree: &Tree, config: &Config) -> Canvas {
    let mut canvas = Canvas {
        width: config.render.width.max(1.0),
        height: config.render.height.max(1.0),
        offset: Point::default(),
    };
    if let Some(content) = content_bounds(tree, &config.layout) {
        canvas.offset = Point::new((-content.x).max(0.0).ceil(), (-content.y).max(0.0).ceil());
        let content = content.translate(canvas.offset);
        canvas.width = canvas.width.max(content.right().ceil());
        canvas.height = canvas.height.max(content.bottom().ceil());
    }
    canvas
}
