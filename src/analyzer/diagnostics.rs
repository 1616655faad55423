use serde::{Deserialize, Serialize};

use crate::analyzer::page_model::PageModel;

/// A derived name that had to be suffixed to stay unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

/// What the analyzer had to work around while building a model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisDiagnostics {
    /// Set when the page could not be captured at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_error: Option<String>,
    pub skipped_nodes: usize,
    #[serde(default)]
    pub skipped_indices: Vec<usize>,
    /// Non-interactive nodes: hidden inputs, headings, plain containers.
    pub ignored_nodes: usize,
    #[serde(default)]
    pub renamed: Vec<Rename>,
    /// Name of the page-type rule that fired, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_rule: Option<String>,
}

impl AnalysisDiagnostics {
    pub fn is_degraded(&self) -> bool {
        self.snapshot_error.is_some() || self.skipped_nodes > 0
    }
}

/// Analyzer output: the model plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub model: PageModel,
    pub diagnostics: AnalysisDiagnostics,
}
