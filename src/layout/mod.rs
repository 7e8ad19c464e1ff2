mod geometry;
mod tidy;
pub(crate) mod types;
pub use geometry::*;
pub use tidy::layout_tree;
pub use types::*;

use crate::config::LayoutConfig;
use crate::tree::Tree;
use tracing::instrument;

/// Position and size every node: tidy-tree placement followed by box geometry.
#[instrument(level = "debug", skip_all, fields(nodes = tree.len()))]
pub fn compute_layout(tree: &mut Tree, bounds: Bounds, config: &LayoutConfig) {
    layout_tree(tree, bounds, config);
    resolve_sizes(tree, &config.geometry, config.tier_depth);
}

/// Smallest rectangle containing every node box.
pub fn content_bounds(tree: &Tree, config: &LayoutConfig) -> Option<Rect> {
    let mut boxes = tree
        .breadth_first()
        .map(|(_, node)| config.geometry.box_rect(node));
    let first = boxes.next()?;
    Some(boxes.fold(first, |acc, rect| {
        let x = acc.x.min(rect.x);
        let y = acc.y.min(rect.y);
        Rect {
            x,
            y,
            width: acc.right().max(rect.right()) - x,
            height: acc.bottom().max(rect.bottom()) - y,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Record;
    use crate::tree::build;

    #[test]
    fn compute_layout_positions_and_sizes_nodes() {
        let records = vec![
            Record::new("root", "Root", None),
            Record::new("A", "Child A", Some("root")),
        ];
        let mut tree = build(&records).unwrap();
        let config = LayoutConfig::default();
        compute_layout(&mut tree, Bounds::new(2500.0, 2200.0), &config);
        let a = tree.get("A").unwrap();
        assert!(a.position.x > tree.node(tree.root()).position.x);
        assert_eq!(a.size.width, 7.0 * 14.0 + 80.0);

        let bounds = content_bounds(&tree, &config).unwrap();
        assert!(bounds.width > a.size.width);
    }
}
