//! Collaboration features layered on top of the tree engine: comments,
//! monetary donations, support upvotes and the proposal voting flow.
//!
//! Commenting and donating are deliberately open to anonymous actors; all
//! other mutations go through the permission evaluator first.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MapError;
use crate::models::{
    Actor, Comment, DonationPeriod, Node, Supporter, VoteDirection, VotingDocument, VotingEntry,
    ANONYMOUS,
};
use crate::state::{SupportLedger, VoteLedger};
use crate::tree::{self, NodePatch};

/// Payment selector shown in the donation dialog. Informational only; no
/// settlement happens anywhere in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Alipay,
    Wechat,
}

fn display_name(actor: Option<&Actor>) -> String {
    actor
        .map(|a| a.username.clone())
        .unwrap_or_else(|| ANONYMOUS.to_string())
}

/// Sum of all supporter contributions. Legacy bare-number entries were
/// already normalized at deserialization, so every record counts at face
/// value.
pub fn total_donations(supporters: &BTreeMap<String, Supporter>) -> f64 {
    supporters.values().map(|s| s.amount).sum()
}

/// Appends a comment to the node. Open to anonymous actors; the author
/// field falls back to the literal anonymous marker. Comments cannot be
/// edited or removed afterwards.
pub fn comment(
    forest: Vec<Node>,
    node_id: &str,
    actor: Option<&Actor>,
    text: &str,
) -> Result<Vec<Node>, MapError> {
    if text.trim().is_empty() {
        return Err(MapError::Validation("comment text is required".into()));
    }
    let node = tree::find(&forest, node_id).ok_or(MapError::NotFound)?;

    let mut comments = node.comments.clone();
    comments.push(Comment {
        id: Uuid::new_v4().to_string(),
        text: text.to_string(),
        author: display_name(actor),
        created_at: Utc::now(),
    });

    Ok(tree::update(
        forest,
        node_id,
        NodePatch {
            comments: Some(comments),
            ..Default::default()
        },
    ))
}

/// Records a donation against a work-item node, accumulating into any
/// previous contribution under the same supporter name and rewriting the
/// node's cached `amount` as the new total. The expiry date is stored but
/// never enforced anywhere.
pub fn donate(
    forest: Vec<Node>,
    node_id: &str,
    actor: Option<&Actor>,
    amount: f64,
    period: DonationPeriod,
    _method: PaymentMethod,
) -> Result<Vec<Node>, MapError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(MapError::Validation(
            "donation amount must be a positive number".into(),
        ));
    }
    let node = tree::find(&forest, node_id).ok_or(MapError::NotFound)?;
    if node.is_category {
        return Err(MapError::Validation(
            "category nodes do not accept donations".into(),
        ));
    }

    let now = Utc::now();
    let name = display_name(actor);
    let mut supporters = node.supporters.clone();
    let previous = supporters.get(&name).map(|s| s.amount).unwrap_or(0.0);
    supporters.insert(
        name,
        Supporter {
            amount: previous + amount,
            date: Some(now),
            period: Some(period),
            expire_date: Some(now + period.duration()),
        },
    );
    let total = total_donations(&supporters);

    Ok(tree::update(
        forest,
        node_id,
        NodePatch {
            supporters: Some(supporters),
            amount: Some(total),
            ..Default::default()
        },
    ))
}

/// Non-monetary upvote: +1 exactly once per `(actor, node)`, tracked via
/// the client-side ledger. Requires an authenticated non-guest actor and
/// excludes category nodes. A repeated support call is an idempotent no-op.
pub fn support(
    forest: Vec<Node>,
    node_id: &str,
    actor: Option<&Actor>,
    ledger: &mut SupportLedger,
) -> Result<Vec<Node>, MapError> {
    let actor = actor.ok_or(MapError::PermissionDenied)?;
    if actor.is_guest() {
        return Err(MapError::PermissionDenied);
    }
    let node = tree::find(&forest, node_id).ok_or(MapError::NotFound)?;
    if node.is_category {
        return Err(MapError::Validation(
            "category nodes cannot be supported".into(),
        ));
    }
    if ledger.has_supported(&actor.id, node_id) {
        return Ok(forest);
    }

    let count = node.support_count + 1;
    ledger.record(&actor.id, node_id);
    Ok(tree::update(
        forest,
        node_id,
        NodePatch {
            support_count: Some(count),
            ..Default::default()
        },
    ))
}

/// Copies the node's current state into the project voting document as a
/// new proposal. The snapshot keeps no link to the original node; the two
/// diverge from this point on.
pub fn submit_to_voting(
    mut doc: VotingDocument,
    node: &Node,
    entry_id: impl Into<String>,
    actor: Option<&Actor>,
    description: &str,
) -> VotingDocument {
    doc.nodes.push(VotingEntry {
        id: entry_id.into(),
        node: node.clone(),
        submitted_by: display_name(actor),
        submitted_at: Utc::now(),
        description: description.to_string(),
        upvotes: Default::default(),
        downvotes: Default::default(),
        comments: Vec::new(),
    });
    doc
}

/// Casts a vote on a proposal. One vote per actor per proposal, either
/// direction; there is no retraction and no changing sides, so a second
/// call from the same actor leaves the document untouched.
pub fn vote(
    mut doc: VotingDocument,
    entry_id: &str,
    actor: &Actor,
    direction: VoteDirection,
    ledger: &mut VoteLedger,
) -> Result<VotingDocument, MapError> {
    let entry = doc
        .nodes
        .iter_mut()
        .find(|e| e.id == entry_id)
        .ok_or(MapError::NotFound)?;

    if ledger.has_voted(&actor.id, entry_id) || entry.has_voted(&actor.id) {
        return Ok(doc);
    }

    match direction {
        VoteDirection::Up => entry.upvotes.insert(actor.id.clone()),
        VoteDirection::Down => entry.downvotes.insert(actor.id.clone()),
    };
    ledger.record(&actor.id, entry_id, direction);
    Ok(doc)
}

/// Appends a comment to a proposal's own discussion thread.
pub fn comment_on_proposal(
    mut doc: VotingDocument,
    entry_id: &str,
    actor: Option<&Actor>,
    text: &str,
) -> Result<VotingDocument, MapError> {
    if text.trim().is_empty() {
        return Err(MapError::Validation("comment text is required".into()));
    }
    let entry = doc
        .nodes
        .iter_mut()
        .find(|e| e.id == entry_id)
        .ok_or(MapError::NotFound)?;
    entry.comments.push(Comment {
        id: Uuid::new_v4().to_string(),
        text: text.to_string(),
        author: display_name(actor),
        created_at: Utc::now(),
    });
    Ok(doc)
}
