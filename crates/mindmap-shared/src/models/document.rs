use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Node;

/// The whole persisted unit for one mindmap: the root node forest plus
/// document-level metadata. Saved and replaced wholesale on every change;
/// `updated_at` is stamped by the server on each save.
///
/// Unknown top-level fields round-trip through `extra` so older documents
/// survive a load/save cycle untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindmapDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_name: Option<String>,
    /// Once true, all node mutation is restricted to admin actors.
    #[serde(default)]
    pub is_read_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One row of the mindmap listing for a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MindmapSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_document_fields_round_trip() {
        let json = r#"{"nodes":[],"createdAt":"2024-01-01T00:00:00Z","isReadOnly":true,"theme":"dark"}"#;
        let doc: MindmapDocument = serde_json::from_str(json).unwrap();
        assert!(doc.is_read_only);
        assert_eq!(doc.extra["theme"], "dark");

        let out = serde_json::to_value(&doc).unwrap();
        assert_eq!(out["theme"], "dark");
        assert_eq!(out["isReadOnly"], true);
    }
}
