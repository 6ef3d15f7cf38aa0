use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Comment, Node};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

/// A node snapshot submitted as a proposal. The snapshot is a plain copy:
/// it keeps no link to the mindmap node it came from and the two diverge
/// freely afterwards. Entries are append-only and never pruned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingEntry {
    pub id: String,
    pub node: Node,
    pub submitted_by: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    /// Actor ids, at most one vote per actor across both sets.
    #[serde(default)]
    pub upvotes: BTreeSet<String>,
    #[serde(default)]
    pub downvotes: BTreeSet<String>,
    /// Proposal discussion, independent of the snapshot's own comments.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl VotingEntry {
    pub fn has_voted(&self, actor_id: &str) -> bool {
        self.upvotes.contains(actor_id) || self.downvotes.contains(actor_id)
    }
}

/// The per-project `onVoting.json` document. Auto-created empty on first read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VotingDocument {
    #[serde(default)]
    pub nodes: Vec<VotingEntry>,
}
