use crate::error::{Error, Result};
use crate::ir::Record;
use crate::layout::{Point, Size};
use generational_arena::Arena;
use std::collections::{HashMap, VecDeque};
use tracing::{debug, instrument};

pub type NodeIndex = generational_arena::Index;

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub record: Record,
    /// Distance from the root (root = 0).
    pub depth: usize,
    /// Back-reference to the owning parent, `None` for the root.
    pub parent: Option<NodeIndex>,
    /// Children in input order.
    pub children: Vec<NodeIndex>,
    /// Node anchor, written by the layout engine.
    pub position: Point,
    /// Box size, written by the geometry resolver.
    pub size: Size,
    /// Extra rightward shift of the box and its incoming link.
    pub link_offset: f32,
}

impl TreeNode {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    /// Position the box and incoming link are drawn at.
    pub fn anchor(&self) -> Point {
        Point::new(self.position.x + self.link_offset, self.position.y)
    }
}

/// A parent -> child edge, only meaningful while the tree is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub parent: NodeIndex,
    pub child: NodeIndex,
}

/// Single-rooted hierarchy built from a record set.
///
/// Nodes live in an arena; parents own their children through index lists and
/// children point back at their parent. A tree is never mutated structurally
/// after [`build`]: a new record set means a new tree.
#[derive(Debug, Clone)]
pub struct Tree {
    arena: Arena<TreeNode>,
    root: NodeIndex,
    by_id: HashMap<String, NodeIndex>,
    breadth_first: Vec<NodeIndex>,
}

impl Tree {
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn node(&self, idx: NodeIndex) -> &TreeNode {
        &self.arena[idx]
    }

    pub fn node_mut(&mut self, idx: NodeIndex) -> &mut TreeNode {
        &mut self.arena[idx]
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.by_id.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&TreeNode> {
        self.index_of(id).map(|idx| &self.arena[idx])
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.breadth_first
            .last()
            .map(|idx| self.arena[*idx].depth)
            .unwrap_or(0)
    }

    /// Nodes level by level, siblings in input order.
    pub fn breadth_first(&self) -> impl Iterator<Item = (NodeIndex, &TreeNode)> + '_ {
        self.breadth_first.iter().map(|idx| (*idx, &self.arena[*idx]))
    }

    pub fn pre_order(&self) -> Vec<NodeIndex> {
        let mut order = Vec::with_capacity(self.len());
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            order.push(idx);
            stack.extend(self.arena[idx].children.iter().rev().copied());
        }
        order
    }

    /// Children before parents, left subtrees before right ones.
    pub fn post_order(&self) -> Vec<NodeIndex> {
        let mut order = Vec::with_capacity(self.len());
        let mut stack = vec![self.root];
        while let Some(idx) = stack.pop() {
            order.push(idx);
            stack.extend(self.arena[idx].children.iter().copied());
        }
        order.reverse();
        order
    }

    /// One link per non-root node, in breadth-first order of the child.
    pub fn links(&self) -> Vec<Link> {
        self.breadth_first
            .iter()
            .filter_map(|child| {
                self.arena[*child].parent.map(|parent| Link {
                    parent,
                    child: *child,
                })
            })
            .collect()
    }
}

/// Assemble records into a tree, rejecting structurally invalid sets.
#[instrument(level = "debug", skip_all, fields(records = records.len()))]
pub fn build(records: &[Record]) -> Result<Tree> {
    let roots: Vec<String> = records
        .iter()
        .filter(|record| record.is_root())
        .map(|record| record.id.clone())
        .collect();
    if roots.len() != 1 {
        return Err(Error::MissingRoot { roots });
    }

    let mut rows: HashMap<&str, usize> = HashMap::with_capacity(records.len());
    for (row, record) in records.iter().enumerate() {
        if let Some(first) = rows.insert(record.id.as_str(), row) {
            return Err(Error::DuplicateId {
                id: record.id.clone(),
                first,
                second: row,
            });
        }
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut root_row = 0;
    for (row, record) in records.iter().enumerate() {
        match record.parent.as_deref() {
            None => root_row = row,
            Some(parent) => match rows.get(parent) {
                Some(parent_row) => children[*parent_row].push(row),
                None => {
                    return Err(Error::DanglingParent {
                        id: record.id.clone(),
                        parent: parent.to_string(),
                    });
                }
            },
        }
    }

    let mut arena = Arena::with_capacity(records.len());
    let mut slots: Vec<Option<NodeIndex>> = vec![None; records.len()];
    let mut breadth_first = Vec::with_capacity(records.len());
    let mut queue = VecDeque::from([(root_row, None::<NodeIndex>, 0usize)]);
    while let Some((row, parent, depth)) = queue.pop_front() {
        let idx = arena.insert(TreeNode {
            record: records[row].clone(),
            depth,
            parent,
            children: Vec::new(),
            position: Point::default(),
            size: Size::default(),
            link_offset: 0.0,
        });
        if let Some(parent) = parent {
            arena[parent].children.push(idx);
        }
        slots[row] = Some(idx);
        breadth_first.push(idx);
        for child in &children[row] {
            queue.push_back((*child, Some(idx), depth + 1));
        }
    }

    // Anything the walk from the root missed sits on a parent loop.
    let unreached: Vec<String> = slots
        .iter()
        .zip(records)
        .filter(|(slot, _)| slot.is_none())
        .map(|(_, record)| record.id.clone())
        .collect();
    if !unreached.is_empty() {
        return Err(Error::CyclicParent { ids: unreached });
    }

    let by_id = breadth_first
        .iter()
        .map(|idx: &NodeIndex| (arena[*idx].record.id.clone(), *idx))
        .collect();
    let root = breadth_first[0];
    let tree = Tree {
        arena,
        root,
        by_id,
        breadth_first,
    };
    debug!(nodes = tree.len(), max_depth = tree.max_depth(), "built tree");
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, parent: Option<&str>) -> Record {
        Record::new(id, id.to_uppercase(), parent)
    }

    fn child_ids(tree: &Tree, id: &str) -> Vec<String> {
        let node = tree.get(id).unwrap();
        node.children
            .iter()
            .map(|idx| tree.node(*idx).id().to_string())
            .collect()
    }

    #[test]
    fn builds_tree_with_depths_and_input_order() {
        let records = vec![
            rec("root", None),
            rec("b", Some("root")),
            rec("b1", Some("b")),
            rec("a", Some("root")),
            rec("b0", Some("b")),
        ];
        let tree = build(&records).unwrap();
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.node(tree.root()).id(), "root");
        assert_eq!(child_ids(&tree, "root"), ["b", "a"]);
        assert_eq!(child_ids(&tree, "b"), ["b1", "b0"]);
        assert_eq!(tree.get("b0").unwrap().depth, 2);
        assert_eq!(tree.max_depth(), 2);

        let b = tree.index_of("b").unwrap();
        assert_eq!(tree.get("b1").unwrap().parent, Some(b));
        assert_eq!(tree.node(tree.root()).parent, None);
    }

    #[test]
    fn orders_traversals() {
        let records = vec![
            rec("r", None),
            rec("a", Some("r")),
            rec("b", Some("r")),
            rec("a1", Some("a")),
        ];
        let tree = build(&records).unwrap();
        let ids = |order: Vec<NodeIndex>| -> Vec<String> {
            order.iter().map(|idx| tree.node(*idx).id().to_string()).collect()
        };
        assert_eq!(ids(tree.pre_order()), ["r", "a", "a1", "b"]);
        assert_eq!(ids(tree.post_order()), ["a1", "a", "b", "r"]);
        let bfs: Vec<&str> = tree.breadth_first().map(|(_, node)| node.id()).collect();
        assert_eq!(bfs, ["r", "a", "b", "a1"]);
        assert_eq!(tree.links().len(), 3);
    }

    #[test]
    fn rejects_missing_or_multiple_roots() {
        let none = vec![rec("a", Some("b")), rec("b", Some("a"))];
        assert_eq!(
            build(&none).unwrap_err(),
            Error::MissingRoot { roots: Vec::new() }
        );

        let two = vec![rec("a", None), rec("b", None)];
        assert_eq!(
            build(&two).unwrap_err(),
            Error::MissingRoot {
                roots: vec!["a".to_string(), "b".to_string()]
            }
        );

        assert!(matches!(build(&[]), Err(Error::MissingRoot { .. })));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let records = vec![rec("root", None), rec("root", Some("root"))];
        assert_eq!(
            build(&records).unwrap_err(),
            Error::DuplicateId {
                id: "root".to_string(),
                first: 0,
                second: 1
            }
        );
    }

    #[test]
    fn rejects_dangling_parent() {
        let records = vec![rec("root", None), rec("a", Some("ghost"))];
        let err = build(&records).unwrap_err();
        assert_eq!(
            err,
            Error::DanglingParent {
                id: "a".to_string(),
                parent: "ghost".to_string()
            }
        );
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn rejects_cycles_detached_from_root() {
        let records = vec![
            rec("root", None),
            rec("a", Some("c")),
            rec("ok", Some("root")),
            rec("b", Some("a")),
            rec("c", Some("b")),
            rec("self", Some("self")),
        ];
        assert_eq!(
            build(&records).unwrap_err(),
            Error::CyclicParent {
                ids: vec![
                    "a".to_string(),
                    "b".to_string(),
                    "c".to_string(),
                    "self".to_string()
                ]
            }
        );
    }
}
