use crate::render::{Scene, Shape};
use crate::theme::Theme;
use serde::Serialize;
use tracing::{debug, warn};

/// Which node, if any, is highlighted. At most one node is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "node", rename_all = "lowercase")]
pub enum Selection {
    #[default]
    Unselected,
    Selected(String),
}

impl Selection {
    /// Clicking always moves the selection to the clicked node.
    pub fn select(self, node_id: impl Into<String>) -> Self {
        Selection::Selected(node_id.into())
    }

    pub fn selected(&self) -> Option<&str> {
        match self {
            Selection::Selected(id) => Some(id),
            Selection::Unselected => None,
        }
    }

    pub fn is_selected(&self, node_id: &str) -> bool {
        self.selected() == Some(node_id)
    }
}

/// Pointer activation of a node box, as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub primitive_id: usize,
    pub node_id: String,
}

impl ClickEvent {
    pub fn new(primitive_id: usize, node_id: impl Into<String>) -> Self {
        Self {
            primitive_id,
            node_id: node_id.into(),
        }
    }

    /// Click on whichever box primitive belongs to `node_id`.
    pub fn on_node(scene: &Scene, node_id: &str) -> Option<Self> {
        scene.box_for(node_id).map(|p| Self::new(p.id, node_id))
    }
}

/// Restyle box strokes so only the selected node carries the highlight.
///
/// Geometry, ordering and every non-box primitive stay untouched.
pub fn apply_selection(scene: &mut Scene, selection: &Selection, theme: &Theme) {
    for primitive in &mut scene.primitives {
        let Shape::Box { stroke, .. } = &mut primitive.shape else {
            continue;
        };
        let selected = primitive
            .node_id
            .as_deref()
            .is_some_and(|id| selection.is_selected(id));
        if selected {
            stroke.color = theme.selected_stroke.clone();
            stroke.width = theme.selected_stroke_width;
        } else {
            stroke.color = theme.box_stroke.clone();
            stroke.width = theme.box_stroke_width;
        }
    }
}

/// Apply a click: returns the next selection and the restyled scene.
///
/// Clicks on ids the scene does not contain leave everything as it was.
pub fn handle_click(
    scene: &Scene,
    selection: Selection,
    event: &ClickEvent,
    theme: &Theme,
) -> (Selection, Scene) {
    if scene.box_for(&event.node_id).is_none() {
        warn!(node = %event.node_id, primitive = event.primitive_id, "click on unknown node ignored");
        return (selection, scene.clone());
    }
    let next = selection.select(event.node_id.as_str());
    let mut restyled = scene.clone();
    apply_selection(&mut restyled, &next, theme);
    debug!(node = %event.node_id, "selection changed");
    (next, restyled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Primitive, Stroke};
    use crate::layout::Rect;

    fn box_primitive(id: usize, node: &str, theme: &Theme) -> Primitive {
        Primitive {
            id,
            node_id: Some(node.to_string()),
            shape: Shape::Box {
                rect: Rect::default(),
                corner_radius: 6.0,
                fill: theme.box_fill.clone(),
                stroke: Stroke {
                    color: theme.box_stroke.clone(),
                    width: theme.box_stroke_width,
                },
                shadow: None,
            },
        }
    }

    fn scene(theme: &Theme) -> Scene {
        Scene {
            primitives: vec![box_primitive(0, "x", theme), box_primitive(1, "y", theme)],
            ..Scene::empty(100.0, 100.0)
        }
    }

    fn highlighted(scene: &Scene, theme: &Theme) -> Vec<String> {
        scene
            .boxes()
            .filter(|p| match &p.shape {
                Shape::Box { stroke, .. } => stroke.color == theme.selected_stroke,
                _ => false,
            })
            .filter_map(|p| p.node_id.clone())
            .collect()
    }

    #[test]
    fn only_the_last_click_stays_highlighted() {
        let theme = Theme::default();
        let base = scene(&theme);

        let (selection, after_x) =
            handle_click(&base, Selection::Unselected, &ClickEvent::new(0, "x"), &theme);
        assert_eq!(selection.selected(), Some("x"));
        assert_eq!(highlighted(&after_x, &theme), ["x"]);

        let (selection, after_y) =
            handle_click(&after_x, selection, &ClickEvent::new(1, "y"), &theme);
        assert_eq!(highlighted(&after_y, &theme), ["y"]);

        let (selection, after_x_again) =
            handle_click(&after_y, selection, &ClickEvent::new(0, "x"), &theme);
        assert_eq!(selection, Selection::Selected("x".into()));
        assert_eq!(highlighted(&after_x_again, &theme), ["x"]);
    }

    #[test]
    fn reclicking_the_selected_node_keeps_it_selected() {
        let theme = Theme::default();
        let base = scene(&theme);
        let (selection, once) =
            handle_click(&base, Selection::Unselected, &ClickEvent::new(0, "x"), &theme);
        let (selection, twice) = handle_click(&once, selection, &ClickEvent::new(0, "x"), &theme);
        assert_eq!(selection.selected(), Some("x"));
        assert_eq!(once, twice);
    }

    #[test]
    fn unknown_node_is_ignored() {
        let theme = Theme::default();
        let base = scene(&theme);
        let (selection, after) = handle_click(
            &base,
            Selection::Selected("y".into()),
            &ClickEvent::new(9, "ghost"),
            &theme,
        );
        assert_eq!(selection.selected(), Some("y"));
        assert_eq!(after, base);
    }

    #[test]
    fn clearing_selection_restores_default_strokes() {
        let theme = Theme::default();
        let mut scene = scene(&theme);
        apply_selection(&mut scene, &Selection::Selected("x".into()), &theme);
        apply_selection(&mut scene, &Selection::Unselected, &theme);
        assert!(highlighted(&scene, &theme).is_empty());
    }
}
