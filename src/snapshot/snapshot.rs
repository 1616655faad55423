use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::dom_node::DomNode;
use super::error::{ProbeError, SnapshotError};

// ============================================================================
// Snapshot trait: the analyzer's only view of a page
// ============================================================================

/// A point-in-time capture of a page's interactive surface.
///
/// Nodes are addressed by document-order index. Implementations backed by a
/// live engine may fail on any single `probe` without invalidating the rest.
pub trait Snapshot {
    /// Number of nodes, or why the page could not be captured at all.
    fn node_count(&self) -> Result<usize, SnapshotError>;

    /// Read one node.
    fn probe(&self, index: usize) -> Result<DomNode, ProbeError>;

    /// Document title, when the engine reported one.
    fn title(&self) -> Option<&str> {
        None
    }
}

// ============================================================================
// Captured page (JSON produced by the extraction script)
// ============================================================================

/// Wire format of a captured page: `{ "url", "title", "nodes": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapturedPage {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub nodes: Vec<Value>,
}

/// Snapshot held in memory. Nodes stay as raw JSON until probed so that one
/// malformed node only costs that node.
#[derive(Debug, Clone, PartialEq)]
pub enum DomSnapshot {
    Captured { title: Option<String>, nodes: Vec<Value> },
    Unavailable { reason: String },
}

impl DomSnapshot {
    pub fn from_capture(page: CapturedPage) -> Self {
        DomSnapshot::Captured {
            title: page.title,
            nodes: page.nodes,
        }
    }

    /// Build from typed nodes.
    pub fn from_nodes(nodes: &[DomNode]) -> Self {
        DomSnapshot::Captured {
            title: None,
            nodes: nodes
                .iter()
                .map(|n| serde_json::to_value(n).unwrap_or(Value::Null))
                .collect(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        DomSnapshot::Unavailable {
            reason: reason.into(),
        }
    }

    /// Parse a capture file. A document that is not a capture at all is
    /// reported as an unavailable snapshot rather than an error.
    pub fn from_json(json: &str) -> Self {
        Self::from_json_with_url(json).0
    }

    /// Like [`DomSnapshot::from_json`], also returning the URL the capture
    /// recorded, if any.
    pub fn from_json_with_url(json: &str) -> (Self, Option<String>) {
        match serde_json::from_str::<CapturedPage>(json) {
            Ok(mut page) => {
                let url = page.url.take();
                (Self::from_capture(page), url)
            }
            Err(e) => (Self::unavailable(format!("capture is not valid JSON: {e}")), None),
        }
    }

    pub fn with_title(self, title: &str) -> Self {
        match self {
            DomSnapshot::Captured { nodes, .. } => DomSnapshot::Captured {
                title: Some(title.to_string()),
                nodes,
            },
            other => other,
        }
    }
}

impl Snapshot for DomSnapshot {
    fn node_count(&self) -> Result<usize, SnapshotError> {
        match self {
            DomSnapshot::Captured { nodes, .. } => Ok(nodes.len()),
            DomSnapshot::Unavailable { reason } => Err(SnapshotError::Unavailable(reason.clone())),
        }
    }

    fn probe(&self, index: usize) -> Result<DomNode, ProbeError> {
        let raw = match self {
            DomSnapshot::Captured { nodes, .. } => nodes.get(index),
            DomSnapshot::Unavailable { .. } => None,
        }
        .ok_or(ProbeError::OutOfRange { index })?;

        let node: DomNode = serde_json::from_value(raw.clone())
            .map_err(|source| ProbeError::Malformed { index, source })?;

        if node.tag.trim().is_empty() {
            return Err(ProbeError::MissingTag { index });
        }

        Ok(node)
    }

    fn title(&self) -> Option<&str> {
        match self {
            DomSnapshot::Captured { title, .. } => title.as_deref(),
            DomSnapshot::Unavailable { .. } => None,
        }
    }
}
