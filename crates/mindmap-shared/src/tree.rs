//! Pure tree-rewrite operations over the node forest.
//!
//! Every operation takes the full forest by value and returns the new
//! forest. Nodes that an operation does not touch keep their identity and
//! field values exactly, which is what keeps whole-document saves safe to
//! reason about.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{Comment, Node, Supporter, WorkType};

/// Field-level patch applied by [`update`]. Only `Some` fields are merged;
/// children are intentionally not patchable so a partial update can never
/// drop a subtree.
#[derive(Debug, Clone, Default)]
pub struct NodePatch {
    pub text: Option<String>,
    pub details: Option<String>,
    pub work_type: Option<WorkType>,
    pub is_category: Option<bool>,
    pub amount: Option<f64>,
    pub supporters: Option<BTreeMap<String, Supporter>>,
    pub comments: Option<Vec<Comment>>,
    pub support_count: Option<i64>,
}

impl NodePatch {
    fn apply(self, node: &mut Node) {
        if let Some(text) = self.text {
            node.text = text;
        }
        if let Some(details) = self.details {
            node.details = details;
        }
        if let Some(work_type) = self.work_type {
            node.work_type = Some(work_type);
        }
        if let Some(is_category) = self.is_category {
            node.is_category = is_category;
        }
        if let Some(amount) = self.amount {
            node.amount = amount;
        }
        if let Some(supporters) = self.supporters {
            node.supporters = supporters;
        }
        if let Some(comments) = self.comments {
            node.comments = comments;
        }
        if let Some(support_count) = self.support_count {
            node.support_count = support_count;
        }
    }
}

/// Appends `new_node` under `parent_id`, or to the root list when the
/// parent is `None`. A parent id that appears nowhere in the forest makes
/// the whole operation a silent no-op (the new node is discarded).
pub fn insert(forest: Vec<Node>, parent_id: Option<&str>, new_node: Node) -> Vec<Node> {
    match parent_id {
        None => {
            let mut forest = forest;
            forest.push(new_node);
            forest
        }
        Some(parent_id) => {
            let mut slot = Some(new_node);
            attach(forest, parent_id, &mut slot)
        }
    }
}

fn attach(nodes: Vec<Node>, parent_id: &str, slot: &mut Option<Node>) -> Vec<Node> {
    nodes
        .into_iter()
        .map(|mut node| {
            if slot.is_some() {
                if node.id == parent_id {
                    if let Some(new_node) = slot.take() {
                        node.children.push(new_node);
                    }
                } else {
                    node.children = attach(std::mem::take(&mut node.children), parent_id, slot);
                }
            }
            node
        })
        .collect()
}

/// Removes the node with `node_id` together with its entire subtree.
/// Deletion is always subtree deletion; children are never reparented.
pub fn delete(forest: Vec<Node>, node_id: &str) -> Vec<Node> {
    forest
        .into_iter()
        .filter_map(|mut node| {
            if node.id == node_id {
                return None;
            }
            node.children = delete(std::mem::take(&mut node.children), node_id);
            Some(node)
        })
        .collect()
}

/// Shallow-merges `patch` into the node with `node_id`. No-op when the id
/// is absent.
pub fn update(forest: Vec<Node>, node_id: &str, patch: NodePatch) -> Vec<Node> {
    let mut slot = Some(patch);
    merge(forest, node_id, &mut slot)
}

fn merge(nodes: Vec<Node>, node_id: &str, slot: &mut Option<NodePatch>) -> Vec<Node> {
    nodes
        .into_iter()
        .map(|mut node| {
            if slot.is_some() {
                if node.id == node_id {
                    if let Some(patch) = slot.take() {
                        patch.apply(&mut node);
                    }
                } else {
                    node.children = merge(std::mem::take(&mut node.children), node_id, slot);
                }
            }
            node
        })
        .collect()
}

/// Moves `dragged_id` to `target_id`'s position within their shared sibling
/// list. The root list counts as a sibling list. When the two ids are not
/// direct siblings anywhere, the forest is returned unchanged; dragging
/// across levels is not supported.
pub fn reorder(mut forest: Vec<Node>, dragged_id: &str, target_id: &str) -> Vec<Node> {
    if parent_of(&forest, dragged_id).is_none() {
        reorder_in_list(&mut forest, dragged_id, target_id);
    } else {
        reorder_in_children(&mut forest, dragged_id, target_id);
    }
    forest
}

fn reorder_in_children(nodes: &mut [Node], dragged_id: &str, target_id: &str) -> bool {
    for node in nodes {
        let has_dragged = node.children.iter().any(|n| n.id == dragged_id);
        let has_target = node.children.iter().any(|n| n.id == target_id);
        if has_dragged && has_target {
            reorder_in_list(&mut node.children, dragged_id, target_id);
            return true;
        }
        if reorder_in_children(&mut node.children, dragged_id, target_id) {
            return true;
        }
    }
    false
}

fn reorder_in_list(list: &mut Vec<Node>, dragged_id: &str, target_id: &str) {
    let dragged = list.iter().position(|n| n.id == dragged_id);
    let target = list.iter().position(|n| n.id == target_id);
    if let (Some(dragged), Some(target)) = (dragged, target) {
        let node = list.remove(dragged);
        // Target index is taken before removal, matching drag semantics:
        // dragging downward lands the node after the hovered sibling.
        list.insert(target.min(list.len()), node);
    }
}

/// Finds a node by id anywhere in the forest.
pub fn find<'a>(forest: &'a [Node], id: &str) -> Option<&'a Node> {
    for node in forest {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find(&node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Finds the parent of a node. `None` means the id is root-level (or absent).
pub fn parent_of<'a>(forest: &'a [Node], id: &str) -> Option<&'a Node> {
    for node in forest {
        if node.children.iter().any(|child| child.id == id) {
            return Some(node);
        }
        if let Some(parent) = parent_of(&node.children, id) {
            return Some(parent);
        }
    }
    None
}

/// Lazy depth-first traversal yielding `(node, depth)`. The subtree of any
/// node whose id is in `collapsed` is skipped entirely; the node itself is
/// still yielded. Each call builds a fresh iterator, so traversal is
/// restartable.
pub fn walk<'a>(forest: &'a [Node], collapsed: &'a BTreeSet<String>) -> Walk<'a> {
    Walk {
        stack: vec![Frame {
            nodes: forest,
            index: 0,
            depth: 0,
        }],
        collapsed,
    }
}

pub struct Walk<'a> {
    stack: Vec<Frame<'a>>,
    collapsed: &'a BTreeSet<String>,
}

struct Frame<'a> {
    nodes: &'a [Node],
    index: usize,
    depth: usize,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (&'a Node, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            if frame.index >= frame.nodes.len() {
                self.stack.pop();
                continue;
            }
            let node = &frame.nodes[frame.index];
            let depth = frame.depth;
            frame.index += 1;
            if !node.children.is_empty() && !self.collapsed.contains(&node.id) {
                self.stack.push(Frame {
                    nodes: &node.children,
                    index: 0,
                    depth: depth + 1,
                });
            }
            return Some((node, depth));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Actor;

    fn actor() -> Actor {
        Actor {
            id: "u1".into(),
            username: "ann".into(),
            is_admin: false,
        }
    }

    fn node(id: &str, children: Vec<Node>) -> Node {
        let mut n = Node::new(id, &actor(), false, Some(WorkType::Feature));
        n.id = id.to_string();
        n.children = children;
        n
    }

    /// root
    /// ├── a
    /// │   ├── a1
    /// │   └── a2
    /// └── b
    fn sample_forest() -> Vec<Node> {
        vec![node(
            "root",
            vec![
                node("a", vec![node("a1", vec![]), node("a2", vec![])]),
                node("b", vec![]),
            ],
        )]
    }

    fn ids(forest: &[Node]) -> Vec<String> {
        let collapsed = BTreeSet::new();
        walk(forest, &collapsed).map(|(n, _)| n.id.clone()).collect()
    }

    #[test]
    fn insert_then_delete_restores_forest_exactly() {
        let original = sample_forest();
        let inserted = insert(original.clone(), Some("a1"), node("new", vec![]));
        assert!(find(&inserted, "new").is_some());

        let restored = delete(inserted, "new");
        assert_eq!(restored, original);
    }

    #[test]
    fn insert_with_unknown_parent_is_a_silent_noop() {
        let original = sample_forest();
        let result = insert(original.clone(), Some("missing"), node("new", vec![]));
        assert_eq!(result, original);
    }

    #[test]
    fn insert_at_root_appends() {
        let result = insert(sample_forest(), None, node("r2", vec![]));
        assert_eq!(result.len(), 2);
        assert_eq!(result[1].id, "r2");
    }

    #[test]
    fn delete_removes_whole_subtree() {
        let result = delete(sample_forest(), "a");
        assert!(find(&result, "a").is_none());
        assert!(find(&result, "a1").is_none());
        assert!(find(&result, "a2").is_none());
        assert!(find(&result, "b").is_some());
    }

    #[test]
    fn update_touches_only_the_target_field() {
        let original = sample_forest();
        let patched = update(
            original.clone(),
            "a1",
            NodePatch {
                text: Some("X".into()),
                ..Default::default()
            },
        );

        // Every node except the target serializes byte-identically.
        let empty = BTreeSet::new();
        let before = walk(&original, &empty)
            .map(|(n, _)| (n.id.clone(), serde_json::to_string(n).unwrap()));
        let after: BTreeMap<String, String> = walk(&patched, &BTreeSet::new())
            .map(|(n, _)| (n.id.clone(), serde_json::to_string(n).unwrap()))
            .collect();
        for (id, serialized) in before {
            if id == "a1" {
                assert_ne!(after[&id], serialized);
            } else {
                assert_eq!(after[&id], serialized);
            }
        }

        let target = find(&patched, "a1").unwrap();
        assert_eq!(target.text, "X");
        assert_eq!(target.details, "");
    }

    #[test]
    fn update_cannot_drop_children() {
        let patched = update(
            sample_forest(),
            "a",
            NodePatch {
                details: Some("notes".into()),
                ..Default::default()
            },
        );
        let a = find(&patched, "a").unwrap();
        assert_eq!(a.children.len(), 2);
        assert_eq!(a.details, "notes");
    }

    #[test]
    fn reorder_siblings_moves_only_order() {
        let forest = sample_forest();
        let reordered = reorder(forest.clone(), "a2", "a1");

        let mut expected = ids(&forest);
        expected.sort();
        let mut got = ids(&reordered);
        got.sort();
        assert_eq!(got, expected);

        let a = find(&reordered, "a").unwrap();
        assert_eq!(a.children[0].id, "a2");
        assert_eq!(a.children[1].id, "a1");
        // Subtree contents untouched.
        assert_eq!(find(&reordered, "b"), find(&forest, "b"));
    }

    #[test]
    fn reorder_root_level_siblings() {
        let mut forest = sample_forest();
        forest.push(node("root2", vec![]));
        let reordered = reorder(forest, "root2", "root");
        assert_eq!(reordered[0].id, "root2");
        assert_eq!(reordered[1].id, "root");
    }

    #[test]
    fn reorder_across_levels_is_a_noop() {
        let forest = sample_forest();
        let result = reorder(forest.clone(), "a1", "b");
        assert_eq!(result, forest);
    }

    #[test]
    fn walk_yields_depth_first_with_depths() {
        let forest = sample_forest();
        let collapsed = BTreeSet::new();
        let visited: Vec<(String, usize)> = walk(&forest, &collapsed)
            .map(|(n, d)| (n.id.clone(), d))
            .collect();
        assert_eq!(
            visited,
            vec![
                ("root".to_string(), 0),
                ("a".to_string(), 1),
                ("a1".to_string(), 2),
                ("a2".to_string(), 2),
                ("b".to_string(), 1),
            ]
        );
    }

    #[test]
    fn walk_skips_collapsed_subtrees() {
        let forest = sample_forest();
        let collapsed: BTreeSet<String> = ["a".to_string()].into();
        let visited: Vec<String> = walk(&forest, &collapsed).map(|(n, _)| n.id.clone()).collect();
        assert_eq!(visited, vec!["root", "a", "b"]);
    }
}
