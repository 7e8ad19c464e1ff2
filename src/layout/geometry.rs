use super::{Point, Rect, Size};
use crate::config::GeometryConfig;
use crate::ir::NodeTier;
use crate::tree::{NodeIndex, Tree, TreeNode};
use tracing::{debug, instrument};

impl GeometryConfig {
    pub fn box_size(&self, tier: NodeTier, label_len: usize) -> Size {
        let chars = label_len as f32;
        let height = match tier {
            NodeTier::Compact => self.compact_height,
            NodeTier::Standard => self.min_height.max(chars * self.height_per_char),
        };
        Size::new(chars * self.char_width + self.padding, height)
    }

    pub fn font_size(&self, tier: NodeTier) -> f32 {
        match tier {
            NodeTier::Compact => self.compact_font_size,
            NodeTier::Standard => self.font_size,
        }
    }

    pub fn baseline_shift(&self, tier: NodeTier) -> f32 {
        match tier {
            NodeTier::Compact => self.compact_baseline_shift,
            NodeTier::Standard => self.baseline_shift,
        }
    }

    /// Box of a resolved node: inset from its anchor, vertically centred.
    pub fn box_rect(&self, node: &TreeNode) -> Rect {
        let anchor = node.anchor();
        Rect {
            x: anchor.x - self.box_inset,
            y: anchor.y - node.size.height / 2.0,
            width: node.size.width,
            height: node.size.height,
        }
    }

    /// Where outgoing links leave the box.
    pub fn right_anchor(&self, node: &TreeNode) -> Point {
        let rect = self.box_rect(node);
        Point::new(rect.right(), node.position.y)
    }

    /// Where the incoming link enters the box.
    pub fn left_anchor(&self, node: &TreeNode) -> Point {
        let rect = self.box_rect(node);
        Point::new(rect.x, node.position.y)
    }
}

/// Derive box sizes and link offsets from labels, tiers and depth.
///
/// Sizes do not feed back into the separation units used by the layout walk,
/// so very long labels can still overlap their neighbours.
#[instrument(level = "debug", skip_all, fields(nodes = tree.len()))]
pub fn resolve_sizes(tree: &mut Tree, config: &GeometryConfig, tier_depth: Option<usize>) {
    let order: Vec<NodeIndex> = tree.breadth_first().map(|(idx, _)| idx).collect();
    let mut widest = 0.0f32;
    for idx in order {
        let node = tree.node_mut(idx);
        node.size = config.box_size(node.record.tier, node.record.label_len());
        node.link_offset = if Some(node.depth) == tier_depth {
            config.link_offset
        } else {
            0.0
        };
        widest = widest.max(node.size.width);
    }
    debug!(widest, "resolved box sizes");
}
