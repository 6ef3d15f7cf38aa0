//! Per-actor mutation rules.
//!
//! Two layers: a document-wide gate (who may touch the mindmap at all) and
//! a per-node gate (admin or original creator). Creator matching uses the
//! stable actor id stored in `created_by`, never the display name, which an
//! actor could change.

use crate::models::{Actor, MindmapDocument, Node};

/// Whether `actor` may create nodes and mutate the document at all.
/// Read-only documents accept mutations from admins only; otherwise any
/// authenticated, non-guest actor qualifies. Anonymous never does.
pub fn can_edit_mindmap(actor: Option<&Actor>, doc: &MindmapDocument) -> bool {
    let Some(actor) = actor else {
        return false;
    };
    if doc.is_read_only {
        return actor.is_admin();
    }
    !actor.is_guest()
}

/// Whether `actor` may update, delete or drag this particular node.
pub fn can_edit_node(actor: Option<&Actor>, doc: &MindmapDocument, node: &Node) -> bool {
    let Some(actor) = actor else {
        return false;
    };
    if doc.is_read_only {
        return actor.is_admin();
    }
    actor.is_admin() || actor.id == node.created_by
}

/// Drag-reorder uses the same admin-or-creator rule as node edit.
pub fn can_reorder_node(actor: Option<&Actor>, doc: &MindmapDocument, node: &Node) -> bool {
    can_edit_node(actor, doc, node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkType;

    fn admin() -> Actor {
        Actor {
            id: "admin".into(),
            username: "admin".into(),
            is_admin: true,
        }
    }

    fn creator() -> Actor {
        Actor {
            id: "u1".into(),
            username: "ann".into(),
            is_admin: false,
        }
    }

    fn other() -> Actor {
        Actor {
            id: "u2".into(),
            username: "bob".into(),
            is_admin: false,
        }
    }

    fn guest() -> Actor {
        Actor {
            id: "guest".into(),
            username: "guest".into(),
            is_admin: false,
        }
    }

    fn doc(read_only: bool) -> MindmapDocument {
        MindmapDocument {
            is_read_only: read_only,
            ..Default::default()
        }
    }

    fn node() -> Node {
        Node::new("login flow", &creator(), false, Some(WorkType::Feature))
    }

    #[test]
    fn anonymous_and_guest_actors_cannot_edit() {
        assert!(!can_edit_mindmap(None, &doc(false)));
        assert!(!can_edit_mindmap(Some(&guest()), &doc(false)));
        assert!(!can_edit_node(None, &doc(false), &node()));
    }

    #[test]
    fn authenticated_actor_can_edit_writable_mindmap() {
        assert!(can_edit_mindmap(Some(&other()), &doc(false)));
        assert!(can_edit_mindmap(Some(&creator()), &doc(false)));
    }

    #[test]
    fn only_admin_or_creator_edits_a_node() {
        let n = node();
        assert!(can_edit_node(Some(&creator()), &doc(false), &n));
        assert!(can_edit_node(Some(&admin()), &doc(false), &n));
        assert!(!can_edit_node(Some(&other()), &doc(false), &n));
        assert_eq!(
            can_reorder_node(Some(&other()), &doc(false), &n),
            can_edit_node(Some(&other()), &doc(false), &n)
        );
    }

    #[test]
    fn read_only_mindmap_restricts_everyone_but_admin() {
        let n = node();
        // Even the original creator loses node edit on a read-only document.
        assert!(!can_edit_node(Some(&creator()), &doc(true), &n));
        assert!(!can_edit_mindmap(Some(&creator()), &doc(true)));
        assert!(can_edit_node(Some(&admin()), &doc(true), &n));
        assert!(can_edit_mindmap(Some(&admin()), &doc(true)));
    }

    #[test]
    fn literal_admin_id_counts_as_admin() {
        let legacy_admin = Actor {
            id: "admin".into(),
            username: "admin".into(),
            is_admin: false,
        };
        assert!(can_edit_mindmap(Some(&legacy_admin), &doc(true)));
    }
}
