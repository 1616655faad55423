use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analyzer::classifier::{NodeClass, classify_node, is_submit_label};
use crate::analyzer::diagnostics::{AnalysisDiagnostics, AnalysisReport, Rename};
use crate::analyzer::page_model::{
    ElementDescriptor, ElementKind, FormGroup, PageModel, PageType,
};
use crate::analyzer::rules::{PageTypeRule, RuleError, RuleSet};
use crate::analyzer::selector::{SelectorDeduper, build_selector};
use crate::naming::{NameRegistry, derive_name};
use crate::snapshot::dom_node::non_blank;
use crate::snapshot::{DomNode, Snapshot};

/// Form id used when the page has fields and buttons but no `<form>`.
pub const IMPLICIT_FORM_ID: &str = "page";

// ============================================================================
// PageAnalyzer trait: snapshot in, page model out
// ============================================================================

/// Turns a page snapshot into a structural model.
///
/// Never fails: an unreadable page yields an UNKNOWN model with no elements
/// and the reason in the diagnostics.
pub trait PageAnalyzer {
    fn analyze(&self, snapshot: &dyn Snapshot, url: &str) -> AnalysisReport;
}

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Words of a label kept when deriving an element name.
    #[serde(default = "default_max_label_words")]
    pub max_label_words: usize,
    /// Elements sharing a container before a page counts as a list.
    #[serde(default = "default_min_list_items")]
    pub min_list_items: usize,
}

fn default_max_label_words() -> usize {
    5
}

fn default_min_list_items() -> usize {
    3
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_label_words: default_max_label_words(),
            min_list_items: default_min_list_items(),
        }
    }
}

// ============================================================================
// Rule-based implementation
// ============================================================================

/// Deterministic analyzer driven by the page-type rule table.
#[derive(Debug, Clone)]
pub struct RuleBasedAnalyzer {
    config: AnalyzerConfig,
    rules: RuleSet,
}

impl RuleBasedAnalyzer {
    /// Project rules are evaluated before the built-in ones.
    pub fn new(config: AnalyzerConfig, custom_rules: &[PageTypeRule]) -> Result<Self, RuleError> {
        let rules = RuleSet::new(custom_rules, config.min_list_items)?;
        Ok(Self { config, rules })
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

impl Default for RuleBasedAnalyzer {
    fn default() -> Self {
        let config = AnalyzerConfig::default();
        let rules = RuleSet::builtin(config.min_list_items);
        Self { config, rules }
    }
}

impl PageAnalyzer for RuleBasedAnalyzer {
    fn analyze(&self, snapshot: &dyn Snapshot, url: &str) -> AnalysisReport {
        let mut diagnostics = AnalysisDiagnostics::default();

        let count = match snapshot.node_count() {
            Ok(count) => count,
            Err(e) => {
                warn!(url, error = %e, "page snapshot unavailable, returning empty model");
                diagnostics.snapshot_error = Some(e.to_string());
                return AnalysisReport {
                    model: PageModel::empty(url),
                    diagnostics,
                };
            }
        };

        let mut elements: Vec<ElementDescriptor> = Vec::new();
        let mut first_heading: Option<String> = None;
        let mut names = NameRegistry::new();
        let mut selectors = SelectorDeduper::new();

        for index in 0..count {
            let node = match snapshot.probe(index) {
                Ok(node) => node,
                Err(e) => {
                    warn!(index, error = %e, "skipping unreadable node");
                    diagnostics.skipped_nodes += 1;
                    diagnostics.skipped_indices.push(index);
                    continue;
                }
            };

            let kind = match classify_node(&node) {
                NodeClass::Element(kind) => kind,
                NodeClass::Heading => {
                    diagnostics.ignored_nodes += 1;
                    let selector = selectors.unique(build_selector(&node, ElementKind::Other));
                    if first_heading.is_none() {
                        first_heading = Some(selector);
                    }
                    continue;
                }
                NodeClass::Ignored => {
                    diagnostics.ignored_nodes += 1;
                    continue;
                }
            };

            let selector = selectors.unique(build_selector(&node, kind));
            let raw_label = node.label();
            let base = derive_name(
                raw_label.as_deref(),
                kind.default_name(),
                self.config.max_label_words,
            );
            let derived_name = names.claim(&base);
            if derived_name != base {
                debug!(from = %base, to = %derived_name, "name collision resolved");
                diagnostics.renamed.push(Rename {
                    from: base,
                    to: derived_name.clone(),
                });
            }

            debug!(index, %kind, %selector, name = %derived_name, "element");
            elements.push(ElementDescriptor {
                kind,
                tag: node.tag_name(),
                selector,
                raw_label,
                attributes: relevant_attributes(&node),
                is_required: node.required,
                form_id: non_blank(node.form_id.as_deref()).map(str::to_string),
                collection: non_blank(node.collection.as_deref()).map(str::to_string),
                derived_name,
            });
        }

        let load_indicator_selector = first_heading
            .or_else(|| elements.first().map(|e| e.selector.clone()))
            .unwrap_or_else(|| "body".to_string());
        let forms = group_forms(&elements);

        let mut model = PageModel {
            url: url.to_string(),
            title: snapshot.title().unwrap_or_default().trim().to_string(),
            page_type: PageType::Unknown,
            elements,
            load_indicator_selector,
            forms,
        };

        match self.rules.classify(&model) {
            Some((rule, page_type)) => {
                debug!(rule, %page_type, "page type rule matched");
                diagnostics.matched_rule = Some(rule.to_string());
                model.page_type = page_type;
            }
            None => debug!(url, "no page type rule matched, UNKNOWN"),
        }

        info!(
            url,
            page_type = %model.page_type,
            elements = model.elements.len(),
            forms = model.forms.len(),
            skipped = diagnostics.skipped_nodes,
            "page analyzed"
        );

        AnalysisReport { model, diagnostics }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Present, non-empty attributes worth keeping on a descriptor.
fn relevant_attributes(node: &DomNode) -> BTreeMap<String, String> {
    let mut attrs = BTreeMap::new();
    let mut put = |key: &str, value: Option<&str>| {
        if let Some(v) = non_blank(value) {
            attrs.insert(key.to_string(), v.to_string());
        }
    };

    put("type", node.type_attr().as_deref());
    put("name", node.name.as_deref());
    put("id", node.id.as_deref());
    put("placeholder", node.placeholder.as_deref());
    put("pattern", node.pattern.as_deref());
    put("maxlength", node.maxlength.map(|n| n.to_string()).as_deref());
    put("minlength", node.minlength.map(|n| n.to_string()).as_deref());
    put("min", node.min.as_deref());
    put("max", node.max.as_deref());
    put("href", node.href.as_deref());
    put("role", node.role_attr().as_deref());
    put("aria-label", node.aria_label.as_deref());
    put("form", node.form_id.as_deref());
    if node.disabled {
        put("disabled", Some("true"));
    }

    attrs
}

/// Group elements by submit boundary in first-seen order.
fn group_forms(elements: &[ElementDescriptor]) -> Vec<FormGroup> {
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    for (i, element) in elements.iter().enumerate() {
        let Some(form_id) = element.form_id.as_deref() else {
            continue;
        };
        match groups.iter_mut().find(|(id, _)| id == form_id) {
            Some((_, indices)) => indices.push(i),
            None => groups.push((form_id.to_string(), vec![i])),
        }
    }

    if groups.is_empty() {
        let indices: Vec<usize> = elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.kind.is_field() || e.kind == ElementKind::Button)
            .map(|(i, _)| i)
            .collect();
        let has_field = indices.iter().any(|&i| elements[i].kind.is_field());
        let has_button = indices.iter().any(|&i| elements[i].kind == ElementKind::Button);
        if has_field && has_button {
            groups.push((IMPLICIT_FORM_ID.to_string(), indices));
        }
    }

    groups
        .into_iter()
        .map(|(id, element_indices)| FormGroup {
            submit_index: pick_submit(elements, &element_indices),
            id,
            element_indices,
        })
        .collect()
}

/// Explicit submit control, else a button labelled like one, else the first
/// button.
fn pick_submit(elements: &[ElementDescriptor], indices: &[usize]) -> Option<usize> {
    let buttons: Vec<usize> = indices
        .iter()
        .copied()
        .filter(|&i| elements[i].kind == ElementKind::Button)
        .collect();

    buttons
        .iter()
        .copied()
        .find(|&i| elements[i].is_submit())
        .or_else(|| {
            buttons
                .iter()
                .copied()
                .find(|&i| is_submit_label(elements[i].display_label()))
        })
        .or_else(|| buttons.first().copied())
}
