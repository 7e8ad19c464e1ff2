//! Tidy tree placement (Buchheim, Junger & Leipert's linear-time refinement of
//! Walker's algorithm).
//!
//! The walk works on an abstract breadth coordinate: adjacent nodes of one
//! depth end up at least `separation(a, b)` units apart, and every parent sits
//! at the midpoint of its first and last child. The result is then scaled into
//! the bounds: breadth onto the vertical axis, depth onto the horizontal one.

use super::{Bounds, Point};
use crate::config::{LayoutConfig, SeparationPolicy};
use crate::tree::{NodeIndex, Tree};
use std::collections::HashMap;
use tracing::{debug, instrument};

#[derive(Debug)]
struct Walker {
    parent: Option<usize>,
    children: Vec<usize>,
    depth: usize,
    /// Index among its siblings.
    number: usize,
    prelim: f32,
    modifier: f32,
    change: f32,
    shift: f32,
    thread: Option<usize>,
    ancestor: usize,
    /// Running "default ancestor" while this node's children are apportioned.
    default_ancestor: Option<usize>,
}

struct TidyWalk {
    nodes: Vec<Walker>,
    policy: SeparationPolicy,
    tier_depth: Option<usize>,
}

impl TidyWalk {
    /// Slots are numbered in pre-order, so slot 0 is the root.
    fn new(
        tree: &Tree,
        order: &[NodeIndex],
        slots: &HashMap<NodeIndex, usize>,
        config: &LayoutConfig,
    ) -> Self {
        let mut nodes: Vec<Walker> = order
            .iter()
            .enumerate()
            .map(|(slot, idx)| {
                let node = tree.node(*idx);
                Walker {
                    parent: node.parent.and_then(|parent| slots.get(&parent).copied()),
                    children: node
                        .children
                        .iter()
                        .filter_map(|child| slots.get(child).copied())
                        .collect(),
                    depth: node.depth,
                    number: 0,
                    prelim: 0.0,
                    modifier: 0.0,
                    change: 0.0,
                    shift: 0.0,
                    thread: None,
                    ancestor: slot,
                    default_ancestor: None,
                }
            })
            .collect();
        for parent in 0..nodes.len() {
            for number in 0..nodes[parent].children.len() {
                let child = nodes[parent].children[number];
                nodes[child].number = number;
            }
        }
        Self {
            nodes,
            policy: config.separation,
            tier_depth: config.tier_depth,
        }
    }

    fn separation(&self, a: usize, b: usize) -> f32 {
        let (a, b) = (&self.nodes[a], &self.nodes[b]);
        if let (Some(units), Some(depth)) = (self.policy.deepest_tier, self.tier_depth) {
            if a.depth == depth && b.depth == depth {
                return units;
            }
        }
        if a.parent == b.parent {
            self.policy.siblings
        } else {
            self.policy.cousins
        }
    }

    fn left_sibling(&self, v: usize) -> Option<usize> {
        let node = &self.nodes[v];
        let parent = node.parent?;
        node.number
            .checked_sub(1)
            .map(|i| self.nodes[parent].children[i])
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.nodes[v].children.first().copied().or(self.nodes[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.nodes[v].children.last().copied().or(self.nodes[v].thread)
    }

    fn first_walk(&mut self, v: usize) {
        let left = self.left_sibling(v);
        let first = self.nodes[v].children.first().copied();
        let last = self.nodes[v].children.last().copied();
        if let (Some(first), Some(last)) = (first, last) {
            self.execute_shifts(v);
            let midpoint = (self.nodes[first].prelim + self.nodes[last].prelim) / 2.0;
            match left {
                Some(w) => {
                    let prelim = self.nodes[w].prelim + self.separation(v, w);
                    self.nodes[v].prelim = prelim;
                    self.nodes[v].modifier = prelim - midpoint;
                }
                None => self.nodes[v].prelim = midpoint,
            }
        } else if let Some(w) = left {
            self.nodes[v].prelim = self.nodes[w].prelim + self.separation(v, w);
        }

        if let Some(parent) = self.nodes[v].parent {
            let ancestor = self.nodes[parent]
                .default_ancestor
                .unwrap_or(self.nodes[parent].children[0]);
            let ancestor = self.apportion(v, left, ancestor);
            self.nodes[parent].default_ancestor = Some(ancestor);
        }
    }

    /// Push the subtree of `v` clear of everything left of it, one depth at a
    /// time along the facing contours.
    fn apportion(&mut self, v: usize, left: Option<usize>, mut ancestor: usize) -> usize {
        let Some(w) = left else {
            return ancestor;
        };
        let leftmost = self.nodes[v]
            .parent
            .map(|parent| self.nodes[parent].children[0])
            .unwrap_or(v);

        // inner/outer contours on the right (v's subtree) and left (siblings).
        let (mut inner_right, mut outer_right) = (v, v);
        let (mut inner_left, mut outer_left) = (w, leftmost);
        let mut sum_inner_right = self.nodes[inner_right].modifier;
        let mut sum_outer_right = self.nodes[outer_right].modifier;
        let mut sum_inner_left = self.nodes[inner_left].modifier;
        let mut sum_outer_left = self.nodes[outer_left].modifier;

        let (next_inner_left, next_inner_right) = loop {
            let next_il = self.next_right(inner_left);
            let next_ir = self.next_left(inner_right);
            let (Some(il), Some(ir)) = (next_il, next_ir) else {
                break (next_il, next_ir);
            };
            inner_left = il;
            inner_right = ir;
            outer_left = self.next_left(outer_left).unwrap_or(outer_left);
            outer_right = self.next_right(outer_right).unwrap_or(outer_right);
            self.nodes[outer_right].ancestor = v;

            let shift = self.nodes[inner_left].prelim + sum_inner_left
                - self.nodes[inner_right].prelim
                - sum_inner_right
                + self.separation(inner_left, inner_right);
            if shift > 0.0 {
                let from = self.next_ancestor(inner_left, v, ancestor);
                self.move_subtree(from, v, shift);
                sum_inner_right += shift;
                sum_outer_right += shift;
            }

            sum_inner_left += self.nodes[inner_left].modifier;
            sum_inner_right += self.nodes[inner_right].modifier;
            sum_outer_left += self.nodes[outer_left].modifier;
            sum_outer_right += self.nodes[outer_right].modifier;
        };

        if let Some(il) = next_inner_left {
            if self.next_right(outer_right).is_none() {
                self.nodes[outer_right].thread = Some(il);
                self.nodes[outer_right].modifier += sum_inner_left - sum_outer_right;
            }
        }
        if let Some(ir) = next_inner_right {
            if self.next_left(outer_left).is_none() {
                self.nodes[outer_left].thread = Some(ir);
                self.nodes[outer_left].modifier += sum_inner_right - sum_outer_left;
                ancestor = v;
            }
        }
        ancestor
    }

    fn next_ancestor(&self, inner_left: usize, v: usize, ancestor: usize) -> usize {
        let candidate = self.nodes[inner_left].ancestor;
        if self.nodes[candidate].parent == self.nodes[v].parent {
            candidate
        } else {
            ancestor
        }
    }

    fn move_subtree(&mut self, from: usize, to: usize, shift: f32) {
        let subtrees = self.nodes[to].number as f32 - self.nodes[from].number as f32;
        let change = shift / subtrees;
        self.nodes[to].change -= change;
        self.nodes[to].shift += shift;
        self.nodes[from].change += change;
        self.nodes[to].prelim += shift;
        self.nodes[to].modifier += shift;
    }

    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        let children = std::mem::take(&mut self.nodes[v].children);
        for child in children.iter().rev() {
            let node = &mut self.nodes[*child];
            node.prelim += shift;
            node.modifier += shift;
            change += node.change;
            shift += node.shift + change;
        }
        self.nodes[v].children = children;
    }

    /// Resolve accumulated modifiers into final breadth coordinates.
    fn second_walk(&mut self) -> Vec<f32> {
        let mut breadth = vec![0.0; self.nodes.len()];
        for slot in 0..self.nodes.len() {
            let parent_modifier = match self.nodes[slot].parent {
                Some(parent) => self.nodes[parent].modifier,
                None => -self.nodes[slot].prelim,
            };
            breadth[slot] = self.nodes[slot].prelim + parent_modifier;
            self.nodes[slot].modifier += parent_modifier;
        }
        breadth
    }
}

/// Assign every node's `position` inside `bounds` minus the configured margins.
#[instrument(level = "debug", skip_all, fields(nodes = tree.len()))]
pub fn layout_tree(tree: &mut Tree, bounds: Bounds, config: &LayoutConfig) {
    let order = tree.pre_order();
    let slots: HashMap<NodeIndex, usize> = order
        .iter()
        .enumerate()
        .map(|(slot, idx)| (*idx, slot))
        .collect();
    let mut walk = TidyWalk::new(tree, &order, &slots, config);
    for idx in tree.post_order() {
        if let Some(slot) = slots.get(&idx) {
            walk.first_walk(*slot);
        }
    }
    let breadth = walk.second_walk();

    let (mut left, mut right, mut bottom) = (0, 0, 0);
    for slot in 0..breadth.len() {
        if breadth[slot] < breadth[left] {
            left = slot;
        }
        if breadth[slot] > breadth[right] {
            right = slot;
        }
        if walk.nodes[slot].depth > walk.nodes[bottom].depth {
            bottom = slot;
        }
    }

    let margin = config.margin;
    let breadth_extent = (bounds.height - margin.top - margin.bottom).max(0.0);
    let depth_extent = (bounds.width - margin.left - margin.right).max(0.0);
    let edge = if left == right {
        1.0
    } else {
        walk.separation(left, right) / 2.0
    };
    let tx = edge - breadth[left];
    let kx = breadth_extent / (breadth[right] + edge + tx);
    let ky = depth_extent / walk.nodes[bottom].depth.max(1) as f32;

    for (slot, idx) in order.iter().enumerate() {
        let depth = walk.nodes[slot].depth;
        tree.node_mut(*idx).position = Point::new(
            margin.left + depth as f32 * ky,
            margin.top + (breadth[slot] + tx) * kx,
        );
    }
    debug!(breadth_unit = kx, depth_unit = ky, "placed nodes");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Record;
    use crate::tree::build;

    const BOUNDS: Bounds = Bounds {
        width: 2500.0,
        height: 2200.0,
    };

    fn tree_of(pairs: &[(&str, Option<&str>)]) -> Tree {
        let records: Vec<Record> = pairs
            .iter()
            .map(|(id, parent)| Record::new(*id, *id, *parent))
            .collect();
        build(&records).unwrap()
    }

    fn y(tree: &Tree, id: &str) -> f32 {
        tree.get(id).unwrap().position.y
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!((actual - expected).abs() < 1e-3, "{actual} != {expected}");
    }

    #[test]
    fn single_node_is_centred() {
        let mut tree = tree_of(&[("root", None)]);
        layout_tree(&mut tree, BOUNDS, &LayoutConfig::default());
        let root = tree.node(tree.root());
        assert_close(root.position.x, 500.0);
        assert_close(root.position.y, 1100.0);
    }

    #[test]
    fn two_children_split_the_breadth() {
        let mut tree = tree_of(&[("root", None), ("A", Some("root")), ("B", Some("root"))]);
        layout_tree(&mut tree, BOUNDS, &LayoutConfig::default());
        assert_close(y(&tree, "A"), 600.0);
        assert_close(y(&tree, "root"), 1100.0);
        assert_close(y(&tree, "B"), 1600.0);
        assert_close(tree.get("A").unwrap().position.x, 2300.0);
    }

    #[test]
    fn cousins_get_wider_separation_than_siblings() {
        let mut tree = tree_of(&[
            ("root", None),
            ("p1", Some("root")),
            ("p2", Some("root")),
            ("a", Some("p1")),
            ("b", Some("p1")),
            ("c", Some("p2")),
        ]);
        layout_tree(&mut tree, BOUNDS, &LayoutConfig::default());
        let siblings = y(&tree, "b") - y(&tree, "a");
        let cousins = y(&tree, "c") - y(&tree, "b");
        assert!((cousins / siblings - 5.0 / 3.0).abs() < 1e-4);
        // parent centred over its children
        assert!((y(&tree, "p1") - (y(&tree, "a") + y(&tree, "b")) / 2.0).abs() < 1e-3);
    }

    #[test]
    fn deepest_tier_uses_its_own_unit() {
        let pairs = [
            ("root", None),
            ("p1", Some("root")),
            ("p2", Some("root")),
            ("a", Some("p1")),
            ("b", Some("p1")),
            ("c", Some("p2")),
        ];
        let mut config = LayoutConfig::default();
        config.tier_depth = Some(2);
        let mut tree = tree_of(&pairs);
        layout_tree(&mut tree, BOUNDS, &config);
        let siblings = y(&tree, "b") - y(&tree, "a");
        let cousins = y(&tree, "c") - y(&tree, "b");
        assert!((cousins - siblings).abs() < 1e-3);

        config.separation = SeparationPolicy::legacy();
        let mut legacy = tree_of(&pairs);
        layout_tree(&mut legacy, BOUNDS, &config);
        let siblings = y(&legacy, "b") - y(&legacy, "a");
        let cousins = y(&legacy, "c") - y(&legacy, "b");
        assert!((cousins / siblings - 7.0 / 5.0).abs() < 1e-4);
    }

    #[test]
    fn deep_subtrees_do_not_collide() {
        let mut tree = tree_of(&[
            ("root", None),
            ("l", Some("root")),
            ("m", Some("root")),
            ("r", Some("root")),
            ("l1", Some("l")),
            ("l2", Some("l")),
            ("l3", Some("l")),
            ("r1", Some("r")),
            ("r2", Some("r")),
            ("r3", Some("r")),
        ]);
        layout_tree(&mut tree, BOUNDS, &LayoutConfig::default());
        let depth_two = ["l1", "l2", "l3", "r1", "r2", "r3"];
        for pair in depth_two.windows(2) {
            assert!(y(&tree, pair[0]) < y(&tree, pair[1]), "{pair:?}");
        }
        assert!(y(&tree, "l") < y(&tree, "m") && y(&tree, "m") < y(&tree, "r"));
    }

    #[test]
    fn wide_fan_out_is_evenly_spaced_in_input_order() {
        let ids: Vec<String> = (0..200).map(|i| format!("c{i}")).collect();
        let mut pairs: Vec<(&str, Option<&str>)> = vec![("root", None)];
        pairs.extend(ids.iter().map(|id| (id.as_str(), Some("root"))));
        let mut tree = tree_of(&pairs);
        layout_tree(&mut tree, BOUNDS, &LayoutConfig::default());

        let gap = y(&tree, "c1") - y(&tree, "c0");
        assert!(gap > 0.0);
        for pair in ids.windows(2) {
            assert_close(y(&tree, &pair[1]) - y(&tree, &pair[0]), gap);
        }
        assert_close(y(&tree, "root"), (y(&tree, "c0") + y(&tree, "c199")) / 2.0);
    }

    #[test]
    fn zero_bounds_collapse_to_margins() {
        let mut tree = tree_of(&[("root", None), ("A", Some("root"))]);
        layout_tree(&mut tree, Bounds::new(10.0, 10.0), &LayoutConfig::default());
        for (_, node) in tree.breadth_first() {
            assert_eq!(node.position, Point::new(500.0, 100.0));
        }
    }
}
