use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analyzer::classifier::is_submit_label;
use crate::analyzer::page_model::{ElementDescriptor, ElementKind, PageModel, PageType};

// ============================================================================
// Page-type rule table
// ============================================================================

/// One predicate over the aggregate element set of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// An input whose `type` attribute equals the value.
    HasInputType(String),
    /// No input has this `type`.
    LacksInputType(String),
    /// At least `count` inputs of this `type`.
    MinInputType { input_type: String, count: usize },
    /// A submit control exists.
    HasSubmit,
    /// At least `count` elements of a kind.
    MinKind { kind: ElementKind, count: usize },
    /// Number of fields (inputs, selects, choices) is at least `min`.
    FieldCount { min: usize },
    /// Number of text-entry elements lies in `min..=max`.
    TextEntryCount { min: usize, max: usize },
    /// Some repeating container holds at least `min` elements.
    RepeatingGroup { min: usize },
    /// Some form groups at least `min` fields.
    FormWithFields { min: usize },
    /// A button label contains one of the keywords (case-insensitive).
    ButtonLabel(Vec<String>),
    /// The page URL matches the regex (case-insensitive).
    UrlMatches(String),
    /// The page title contains one of the keywords (case-insensitive).
    TitleContains(Vec<String>),
}

/// `when` all conditions hold, the page is `page_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageTypeRule {
    pub name: String,
    pub page_type: PageType,
    #[serde(default)]
    pub when: Vec<Condition>,
}

impl PageTypeRule {
    pub fn new(name: &str, page_type: PageType, when: Vec<Condition>) -> Self {
        Self {
            name: name.to_string(),
            page_type,
            when,
        }
    }
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule '{rule}' has an invalid url pattern: {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },
}

/// Built-in rules in evaluation order.
pub fn builtin_rules(min_list_items: usize) -> Vec<PageTypeRule> {
    vec![
        PageTypeRule::new(
            "register",
            PageType::Register,
            vec![
                Condition::MinInputType {
                    input_type: "password".into(),
                    count: 2,
                },
                Condition::HasSubmit,
            ],
        ),
        PageTypeRule::new(
            "login",
            PageType::Login,
            vec![Condition::HasInputType("password".into()), Condition::HasSubmit],
        ),
        PageTypeRule::new(
            "list",
            PageType::List,
            vec![Condition::RepeatingGroup {
                min: min_list_items,
            }],
        ),
        PageTypeRule::new(
            "form",
            PageType::Form,
            vec![
                Condition::FormWithFields { min: 2 },
                Condition::LacksInputType("password".into()),
            ],
        ),
        PageTypeRule::new(
            "search",
            PageType::Search,
            vec![
                Condition::TextEntryCount { min: 1, max: 1 },
                Condition::ButtonLabel(vec!["search".into()]),
            ],
        ),
        PageTypeRule::new(
            "search_input",
            PageType::Search,
            vec![Condition::HasInputType("search".into())],
        ),
        PageTypeRule::new(
            "detail_url",
            PageType::Detail,
            vec![Condition::UrlMatches(
                r"/(view|detail|details|show)(/|$|\?)|/\d+/?($|\?)".into(),
            )],
        ),
        PageTypeRule::new(
            "dashboard_url",
            PageType::Dashboard,
            vec![Condition::UrlMatches(r"/(dashboard|overview)(/|$|\?)".into())],
        ),
        PageTypeRule::new(
            "settings_url",
            PageType::Settings,
            vec![
                Condition::UrlMatches(r"/(settings|preferences|profile|account)(/|$|\?)".into()),
                Condition::FieldCount { min: 1 },
            ],
        ),
    ]
}

// ============================================================================
// Compiled rule set
// ============================================================================

#[derive(Debug, Clone)]
enum Check {
    Plain(Condition),
    Url(Regex),
}

#[derive(Debug, Clone)]
struct CompiledRule {
    name: String,
    page_type: PageType,
    checks: Vec<Check>,
}

/// Ordered, first-match-wins page classifier.
///
/// Project rules are evaluated before the built-in table, so configuration
/// can both add page types and override built-in decisions.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    pub fn builtin(min_list_items: usize) -> Self {
        // Built-in patterns are constants; a failure here is a programming error
        // caught by the unit tests.
        Self::new(&[], min_list_items).unwrap_or(RuleSet { rules: Vec::new() })
    }

    pub fn new(custom: &[PageTypeRule], min_list_items: usize) -> Result<Self, RuleError> {
        let rules = custom
            .iter()
            .cloned()
            .chain(builtin_rules(min_list_items))
            .map(compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RuleSet { rules })
    }

    /// Names in evaluation order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    /// First matching rule's name and page type.
    pub fn classify(&self, model: &PageModel) -> Option<(&str, PageType)> {
        self.rules
            .iter()
            .find(|rule| rule.checks.iter().all(|check| holds(check, model)))
            .map(|rule| (rule.name.as_str(), rule.page_type.clone()))
    }
}

fn compile(rule: PageTypeRule) -> Result<CompiledRule, RuleError> {
    let checks = rule
        .when
        .into_iter()
        .map(|condition| match condition {
            Condition::UrlMatches(pattern) => Regex::new(&format!("(?i){pattern}"))
                .map(Check::Url)
                .map_err(|source| RuleError::InvalidPattern {
                    rule: rule.name.clone(),
                    source,
                }),
            other => Ok(Check::Plain(other)),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CompiledRule {
        name: rule.name,
        page_type: rule.page_type,
        checks,
    })
}

fn holds(check: &Check, model: &PageModel) -> bool {
    let condition = match check {
        Check::Url(re) => return re.is_match(&model.url),
        Check::Plain(condition) => condition,
    };

    match condition {
        Condition::HasInputType(t) => count_input_type(model, t) > 0,
        Condition::LacksInputType(t) => count_input_type(model, t) == 0,
        Condition::MinInputType { input_type, count } => {
            count_input_type(model, input_type) >= *count
        }
        Condition::HasSubmit => model.elements.iter().any(|e| {
            e.is_submit()
                || (e.kind == ElementKind::Button
                    && e.raw_label.as_deref().is_some_and(is_submit_label))
        }),
        Condition::MinKind { kind, count } => model.elements_of(*kind).count() >= *count,
        Condition::FieldCount { min } => model.fields().count() >= *min,
        Condition::TextEntryCount { min, max } => {
            let n = model.elements.iter().filter(|e| e.kind.is_text_entry()).count();
            n >= *min && n <= *max
        }
        Condition::RepeatingGroup { min } => largest_collection(model) >= *min,
        Condition::FormWithFields { min } => model.forms.iter().any(|form| {
            model.form_elements(form).filter(|e| e.kind.is_field()).count() >= *min
        }),
        Condition::ButtonLabel(keywords) => model
            .elements_of(ElementKind::Button)
            .any(|e| label_contains(e, keywords)),
        Condition::UrlMatches(_) => false,
        Condition::TitleContains(keywords) => {
            let title = model.title.to_lowercase();
            keywords.iter().any(|k| title.contains(&k.to_lowercase()))
        }
    }
}

fn count_input_type(model: &PageModel, input_type: &str) -> usize {
    model
        .elements_of(ElementKind::Input)
        .filter(|e| {
            e.input_type() == input_type
                || (input_type == "search" && e.attr("role") == Some("searchbox"))
        })
        .count()
}

fn largest_collection(model: &PageModel) -> usize {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for collection in model.elements.iter().filter_map(|e| e.collection.as_deref()) {
        match counts.iter_mut().find(|(c, _)| *c == collection) {
            Some((_, n)) => *n += 1,
            None => counts.push((collection, 1)),
        }
    }
    counts.into_iter().map(|(_, n)| n).max().unwrap_or(0)
}

fn label_contains(element: &ElementDescriptor, keywords: &[String]) -> bool {
    let label = element.display_label().to_lowercase();
    keywords.iter().any(|k| label.contains(&k.to_lowercase()))
}
