use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analyzer::PageType;
use crate::plan::dimensions::Dimension;

// ============================================================================
// Test plan document
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    P0,
    P1,
    P2,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::P0, Priority::P1, Priority::P2];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::P0 => "P0",
            Priority::P1 => "P1",
            Priority::P2 => "P2",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a case exercises; decides its priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseKind {
    PageLoad,
    HappyPath,
    Required,
    Format,
    Boundary,
    Negative,
    Navigation,
    Persistence,
    Exploratory,
}

/// A dimension selected for the page, with why it matters there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDimension {
    pub name: Dimension,
    pub rationale: String,
}

/// Value typed into a field by a `fill` step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepValue {
    /// The field's valid fixture value.
    Valid,
    /// The field's invalid fixture value.
    Invalid,
    Empty,
    Repeat { ch: char, count: usize },
    Literal(String),
}

impl fmt::Display for StepValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepValue::Valid => f.write_str("a valid value"),
            StepValue::Invalid => f.write_str("an invalid value"),
            StepValue::Empty => f.write_str("nothing"),
            StepValue::Repeat { ch, count } => write!(f, "{count} x '{ch}'"),
            StepValue::Literal(text) => write!(f, "\"{text}\""),
        }
    }
}

/// One step of a test case. Targets are derived element names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlanStep {
    Navigate,
    ExpectLoaded,
    Fill { target: String, value: StepValue },
    Click { target: String },
    Choose { target: String },
    Toggle { target: String },
    /// Manual verification without a generated action.
    Check { description: String },
}

impl PlanStep {
    pub fn target(&self) -> Option<&str> {
        match self {
            PlanStep::Fill { target, .. }
            | PlanStep::Click { target }
            | PlanStep::Choose { target }
            | PlanStep::Toggle { target } => Some(target),
            PlanStep::Navigate | PlanStep::ExpectLoaded | PlanStep::Check { .. } => None,
        }
    }
}

impl fmt::Display for PlanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStep::Navigate => f.write_str("Open the page"),
            PlanStep::ExpectLoaded => f.write_str("Wait for the page to finish loading"),
            PlanStep::Fill { target, value } => write!(f, "Enter {value} in `{target}`"),
            PlanStep::Click { target } => write!(f, "Click `{target}`"),
            PlanStep::Choose { target } => write!(f, "Choose an option in `{target}`"),
            PlanStep::Toggle { target } => write!(f, "Toggle `{target}`"),
            PlanStep::Check { description } => write!(f, "Verify {description}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseSpec {
    /// `TC-{PREFIX}-{NNN}`, banded by priority.
    pub id: String,
    pub priority: Priority,
    pub dimension: Dimension,
    pub kind: CaseKind,
    pub title: String,
    #[serde(default)]
    pub preconditions: Vec<String>,
    pub steps: Vec<PlanStep>,
    pub expected: String,
}

/// Fixture data for one text-entry element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldData {
    /// Derived name of the element.
    pub name: String,
    pub format: String,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub valid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDataShape {
    pub fields: Vec<FieldData>,
}

impl TestDataShape {
    pub fn field(&self, name: &str) -> Option<&FieldData> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn valid_data(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.valid.clone()))
            .collect()
    }

    pub fn invalid_data(&self) -> BTreeMap<String, String> {
        self.fields
            .iter()
            .filter_map(|f| f.invalid.as_ref().map(|v| (f.name.clone(), v.clone())))
            .collect()
    }
}

/// Prioritized plan for one page. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestPlanDocument {
    pub page_name: String,
    pub url: String,
    pub page_type: PageType,
    pub dimensions: Vec<TestDimension>,
    pub cases: Vec<TestCaseSpec>,
    pub test_data: TestDataShape,
}

impl TestPlanDocument {
    pub fn case(&self, id: &str) -> Option<&TestCaseSpec> {
        self.cases.iter().find(|c| c.id == id)
    }

    pub fn cases_with(&self, priority: Priority) -> impl Iterator<Item = &TestCaseSpec> + '_ {
        self.cases.iter().filter(move |c| c.priority == priority)
    }

    pub fn dimension_names(&self) -> Vec<&'static str> {
        self.dimensions.iter().map(|d| d.name.as_str()).collect()
    }
}
