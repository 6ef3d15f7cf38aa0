//! Client-local side tables.
//!
//! The authoritative document never stores these: collapse state is pure UI
//! state, and the one-support / one-vote rules are tracked only on the
//! acting client. The server does not re-validate them, which a multi-device
//! actor can bypass; that limitation is inherited from the original design.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::VoteDirection;

fn map_key(project_id: &str, mindmap_id: &str) -> String {
    format!("{project_id}_{mindmap_id}")
}

/// Collapsed-node ids per mindmap, keyed `{project_id}_{mindmap_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollapsedNodes {
    #[serde(default)]
    maps: BTreeMap<String, BTreeSet<String>>,
}

impl CollapsedNodes {
    pub fn for_mindmap(&self, project_id: &str, mindmap_id: &str) -> BTreeSet<String> {
        self.maps
            .get(&map_key(project_id, mindmap_id))
            .cloned()
            .unwrap_or_default()
    }

    pub fn toggle(&mut self, project_id: &str, mindmap_id: &str, node_id: &str) {
        let set = self.maps.entry(map_key(project_id, mindmap_id)).or_default();
        if !set.remove(node_id) {
            set.insert(node_id.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.maps.values().all(|set| set.is_empty())
    }

    pub fn is_collapsed(&self, project_id: &str, mindmap_id: &str, node_id: &str) -> bool {
        self.maps
            .get(&map_key(project_id, mindmap_id))
            .is_some_and(|set| set.contains(node_id))
    }
}

/// Which nodes each actor has already upvoted. Consulted by the support
/// flow to keep the +1 idempotent per `(actor, node)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupportLedger {
    #[serde(default)]
    supported: BTreeMap<String, BTreeSet<String>>,
}

impl SupportLedger {
    pub fn has_supported(&self, actor_id: &str, node_id: &str) -> bool {
        self.supported
            .get(actor_id)
            .is_some_and(|nodes| nodes.contains(node_id))
    }

    pub fn record(&mut self, actor_id: &str, node_id: &str) {
        self.supported
            .entry(actor_id.to_string())
            .or_default()
            .insert(node_id.to_string());
    }
}

/// Which proposals each actor has voted on, and in which direction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoteLedger {
    #[serde(default)]
    votes: BTreeMap<String, BTreeMap<String, VoteDirection>>,
}

impl VoteLedger {
    pub fn vote_of(&self, actor_id: &str, entry_id: &str) -> Option<VoteDirection> {
        self.votes.get(actor_id).and_then(|v| v.get(entry_id)).copied()
    }

    pub fn has_voted(&self, actor_id: &str, entry_id: &str) -> bool {
        self.vote_of(actor_id, entry_id).is_some()
    }

    pub fn record(&mut self, actor_id: &str, entry_id: &str, direction: VoteDirection) {
        self.votes
            .entry(actor_id.to_string())
            .or_default()
            .insert(entry_id.to_string(), direction);
    }
}
