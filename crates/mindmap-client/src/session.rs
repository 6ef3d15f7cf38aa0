//! An open mindmap being edited by one actor.
//!
//! Mutations apply to the in-memory document first and then schedule a
//! background full-document save. Saves are fire-and-forget: a failed save
//! is logged and the local state stands, matching the optimistic behavior
//! of the reference web client. The server keeps whichever full document
//! arrives last.

use std::mem;
use std::sync::Arc;

use mindmap_shared::state::{SupportLedger, VoteLedger};
use mindmap_shared::{
    collab, permissions, tree, Actor, DonationPeriod, MapError, MindmapDocument, Node,
    VoteDirection, VotingDocument, WorkType,
};
use uuid::Uuid;

use crate::api::{ApiClient, ApiError};

pub use mindmap_shared::collab::PaymentMethod;
pub use mindmap_shared::tree::NodePatch;

pub struct MindmapSession {
    client: Arc<ApiClient>,
    project_id: String,
    mindmap_id: String,
    doc: MindmapDocument,
    actor: Option<Actor>,
}

impl MindmapSession {
    /// Load the document and start an editing session as `actor`
    /// (`None` browses anonymously).
    pub async fn open(
        client: Arc<ApiClient>,
        project_id: &str,
        mindmap_id: &str,
        actor: Option<Actor>,
    ) -> Result<Self, ApiError> {
        let doc = client.load_mindmap(project_id, mindmap_id).await?;
        Ok(Self {
            client,
            project_id: project_id.to_string(),
            mindmap_id: mindmap_id.to_string(),
            doc,
            actor,
        })
    }

    pub fn document(&self) -> &MindmapDocument {
        &self.doc
    }

    pub fn actor(&self) -> Option<&Actor> {
        self.actor.as_ref()
    }

    pub fn find_node(&self, node_id: &str) -> Option<&Node> {
        tree::find(&self.doc.nodes, node_id)
    }

    /// Create a node under `parent_id` (root-level when `None`).
    pub fn add_node(
        &mut self,
        parent_id: Option<&str>,
        text: &str,
        is_category: bool,
        work_type: Option<WorkType>,
    ) -> Result<String, MapError> {
        if !permissions::can_edit_mindmap(self.actor.as_ref(), &self.doc) {
            return Err(MapError::PermissionDenied);
        }
        if text.trim().is_empty() {
            return Err(MapError::Validation("node text is required".into()));
        }
        let actor = self.actor.as_ref().ok_or(MapError::PermissionDenied)?;
        if let Some(parent_id) = parent_id {
            if self.find_node(parent_id).is_none() {
                return Err(MapError::NotFound);
            }
        }

        let node = Node::new(text, actor, is_category, work_type);
        let id = node.id.clone();
        self.doc.nodes = tree::insert(mem::take(&mut self.doc.nodes), parent_id, node);
        self.schedule_save();
        Ok(id)
    }

    pub fn update_node(&mut self, node_id: &str, patch: NodePatch) -> Result<(), MapError> {
        let node = self.find_node(node_id).ok_or(MapError::NotFound)?;
        if !permissions::can_edit_node(self.actor.as_ref(), &self.doc, node) {
            return Err(MapError::PermissionDenied);
        }
        self.doc.nodes = tree::update(mem::take(&mut self.doc.nodes), node_id, patch);
        self.schedule_save();
        Ok(())
    }

    /// Delete the node and its entire subtree.
    pub fn delete_node(&mut self, node_id: &str) -> Result<(), MapError> {
        let node = self.find_node(node_id).ok_or(MapError::NotFound)?;
        if !permissions::can_edit_node(self.actor.as_ref(), &self.doc, node) {
            return Err(MapError::PermissionDenied);
        }
        self.doc.nodes = tree::delete(mem::take(&mut self.doc.nodes), node_id);
        self.schedule_save();
        Ok(())
    }

    /// Drag `dragged_id` to `target_id`'s position among their shared
    /// siblings.
    pub fn reorder_node(&mut self, dragged_id: &str, target_id: &str) -> Result<(), MapError> {
        let node = self.find_node(dragged_id).ok_or(MapError::NotFound)?;
        if !permissions::can_reorder_node(self.actor.as_ref(), &self.doc, node) {
            return Err(MapError::PermissionDenied);
        }
        self.doc.nodes = tree::reorder(mem::take(&mut self.doc.nodes), dragged_id, target_id);
        self.schedule_save();
        Ok(())
    }

    /// Comment on a node. Open to anonymous sessions.
    pub fn comment(&mut self, node_id: &str, text: &str) -> Result<(), MapError> {
        self.doc.nodes = collab::comment(
            mem::take(&mut self.doc.nodes),
            node_id,
            self.actor.as_ref(),
            text,
        )?;
        self.schedule_save();
        Ok(())
    }

    /// Donate to a work item. Open to anonymous sessions.
    pub fn donate(
        &mut self,
        node_id: &str,
        amount: f64,
        period: DonationPeriod,
        method: PaymentMethod,
    ) -> Result<(), MapError> {
        self.doc.nodes = collab::donate(
            mem::take(&mut self.doc.nodes),
            node_id,
            self.actor.as_ref(),
            amount,
            period,
            method,
        )?;
        self.schedule_save();
        Ok(())
    }

    /// Support-upvote a work item, at most once per actor and node.
    pub fn support(&mut self, node_id: &str, ledger: &mut SupportLedger) -> Result<(), MapError> {
        self.doc.nodes = collab::support(
            mem::take(&mut self.doc.nodes),
            node_id,
            self.actor.as_ref(),
            ledger,
        )?;
        self.schedule_save();
        Ok(())
    }

    /// Flip the document-wide read-only flag. Admin only.
    pub fn set_read_only(&mut self, read_only: bool) -> Result<(), MapError> {
        let is_admin = self.actor.as_ref().is_some_and(|a| a.is_admin());
        if !is_admin {
            return Err(MapError::PermissionDenied);
        }
        self.doc.is_read_only = read_only;
        self.schedule_save();
        Ok(())
    }

    /// Snapshot a node into the project's voting document as a new
    /// proposal. The proposal and the live node diverge from here on.
    pub async fn submit_to_voting(
        &self,
        node_id: &str,
        description: &str,
    ) -> Result<String, ApiError> {
        let node = self.find_node(node_id).ok_or(ApiError::NotFound)?;
        let entry_id = Uuid::new_v4().to_string();

        let doc = self.client.load_voting(&self.project_id).await?;
        let doc = collab::submit_to_voting(
            doc,
            node,
            entry_id.clone(),
            self.actor.as_ref(),
            description,
        );
        self.client.save_voting(&self.project_id, &doc).await?;
        Ok(entry_id)
    }

    /// Cast a vote on a proposal, one per actor per proposal.
    pub async fn vote(
        &self,
        entry_id: &str,
        direction: VoteDirection,
        ledger: &mut VoteLedger,
    ) -> Result<VotingDocument, ApiError> {
        let actor = self.actor.as_ref().ok_or(ApiError::Unauthorized)?;
        let doc = self.client.load_voting(&self.project_id).await?;
        let doc = collab::vote(doc, entry_id, actor, direction, ledger)?;
        self.client.save_voting(&self.project_id, &doc).await?;
        Ok(doc)
    }

    /// Comment on a proposal's discussion thread.
    pub async fn comment_on_proposal(
        &self,
        entry_id: &str,
        text: &str,
    ) -> Result<VotingDocument, ApiError> {
        let doc = self.client.load_voting(&self.project_id).await?;
        let doc = collab::comment_on_proposal(doc, entry_id, self.actor.as_ref(), text)?;
        self.client.save_voting(&self.project_id, &doc).await?;
        Ok(doc)
    }

    /// Push the current document without waiting for the next mutation.
    pub async fn save_now(&self) -> Result<(), ApiError> {
        self.client
            .save_mindmap(&self.project_id, &self.mindmap_id, &self.doc)
            .await
    }

    fn schedule_save(&self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime, mindmap save skipped");
            return;
        };
        let client = Arc::clone(&self.client);
        let project_id = self.project_id.clone();
        let mindmap_id = self.mindmap_id.clone();
        let doc = self.doc.clone();
        handle.spawn(async move {
            if let Err(e) = client.save_mindmap(&project_id, &mindmap_id, &doc).await {
                tracing::warn!("Background save of {}/{} failed: {}", project_id, mindmap_id, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(id: &str, name: &str, is_admin: bool) -> Actor {
        Actor {
            id: id.into(),
            username: name.into(),
            is_admin,
        }
    }

    // Background saves target a port nothing listens on; they fail and get
    // logged, which is exactly the fire-and-forget contract.
    fn session(actor: Option<Actor>, doc: MindmapDocument) -> MindmapSession {
        MindmapSession {
            client: Arc::new(ApiClient::new("http://127.0.0.1:9")),
            project_id: "gameA".into(),
            mindmap_id: "roadmap".into(),
            doc,
            actor,
        }
    }

    #[tokio::test]
    async fn add_update_delete_flow() {
        let ann = actor("u1", "ann", false);
        let mut session = session(Some(ann), MindmapDocument::default());

        let root = session.add_node(None, "backend", true, None).unwrap();
        let child = session
            .add_node(Some(&root), "caching layer", false, Some(WorkType::Performance))
            .unwrap();
        assert_eq!(session.document().nodes.len(), 1);
        assert_eq!(session.document().nodes[0].children[0].id, child);

        session
            .update_node(
                &child,
                NodePatch {
                    text: Some("query caching".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(session.find_node(&child).unwrap().text, "query caching");

        session.delete_node(&root).unwrap();
        assert!(session.document().nodes.is_empty());
    }

    #[tokio::test]
    async fn anonymous_session_cannot_create_but_can_comment_and_donate() {
        let ann = actor("u1", "ann", false);
        let mut seed = session(Some(ann), MindmapDocument::default());
        let root = seed.add_node(None, "ideas", true, None).unwrap();
        let item = seed
            .add_node(Some(&root), "dark mode", false, Some(WorkType::Feature))
            .unwrap();

        let mut anon = session(None, seed.doc.clone());
        assert_eq!(
            anon.add_node(None, "x", true, None),
            Err(MapError::PermissionDenied)
        );
        assert_eq!(
            anon.delete_node(&item),
            Err(MapError::PermissionDenied)
        );

        anon.comment(&item, "please!").unwrap();
        anon.donate(&item, 25.0, DonationPeriod::OneMonth, PaymentMethod::Alipay)
            .unwrap();
        let node = anon.find_node(&item).unwrap();
        assert_eq!(node.comments.len(), 1);
        assert_eq!(node.amount, 25.0);
    }

    #[tokio::test]
    async fn only_creator_or_admin_edits_a_node() {
        let ann = actor("u1", "ann", false);
        let mut seed = session(Some(ann), MindmapDocument::default());
        let root = seed.add_node(None, "plan", true, None).unwrap();

        let mut bob = session(Some(actor("u2", "bob", false)), seed.doc.clone());
        assert_eq!(bob.delete_node(&root), Err(MapError::PermissionDenied));

        let mut admin = session(Some(actor("a1", "root", true)), seed.doc.clone());
        admin.delete_node(&root).unwrap();
    }

    #[tokio::test]
    async fn read_only_toggle_is_admin_only_and_locks_out_creators() {
        let ann = actor("u1", "ann", false);
        let mut seed = session(Some(ann.clone()), MindmapDocument::default());
        seed.add_node(None, "plan", true, None).unwrap();
        assert_eq!(seed.set_read_only(true), Err(MapError::PermissionDenied));

        let mut admin = session(Some(actor("a1", "root", true)), seed.doc.clone());
        admin.set_read_only(true).unwrap();

        let mut ann_again = session(Some(ann), admin.doc.clone());
        assert_eq!(
            ann_again.add_node(None, "more", true, None),
            Err(MapError::PermissionDenied)
        );
    }

    #[tokio::test]
    async fn support_uses_the_local_ledger() {
        let ann = actor("u1", "ann", false);
        let mut session = session(Some(ann), MindmapDocument::default());
        let root = session.add_node(None, "ideas", true, None).unwrap();
        let item = session
            .add_node(Some(&root), "offline mode", false, Some(WorkType::Feature))
            .unwrap();

        let mut ledger = SupportLedger::default();
        session.support(&item, &mut ledger).unwrap();
        session.support(&item, &mut ledger).unwrap();
        assert_eq!(session.find_node(&item).unwrap().support_count, 1);
    }
}
