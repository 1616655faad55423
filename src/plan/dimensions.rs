use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analyzer::PageType;
use crate::plan::plan_model::{CaseKind, Priority};

// ============================================================================
// Dimensions
// ============================================================================

/// A testing concern used to group cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Functional,
    Validation,
    Boundary,
    Security,
    Exception,
    Pagination,
    Filter,
    Navigation,
    Persistence,
    Ui,
}

impl Dimension {
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Functional => "functional",
            Dimension::Validation => "validation",
            Dimension::Boundary => "boundary",
            Dimension::Security => "security",
            Dimension::Exception => "exception",
            Dimension::Pagination => "pagination",
            Dimension::Filter => "filter",
            Dimension::Navigation => "navigation",
            Dimension::Persistence => "persistence",
            Dimension::Ui => "ui",
        }
    }

    pub fn rationale(self) -> &'static str {
        match self {
            Dimension::Functional => "Core behaviour works end to end with valid input.",
            Dimension::Validation => "Required and formatted fields reject bad input.",
            Dimension::Boundary => "Length and range limits hold at their edges.",
            Dimension::Security => "Credentials, secrets and untrusted input are handled safely.",
            Dimension::Exception => "Failures during submission are reported to the user.",
            Dimension::Pagination => "Large collections can be paged through.",
            Dimension::Filter => "Collections can be narrowed down by the user.",
            Dimension::Navigation => "Links lead to the expected destinations.",
            Dimension::Persistence => "Saved changes survive a reload.",
            Dimension::Ui => "Layout and keyboard access stay usable.",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use Dimension::*;

/// Page type name → ordered dimensions. Anything not listed gets
/// `FALLBACK_DIMENSIONS`.
pub const TEST_DIMENSIONS: &[(&str, &[Dimension])] = &[
    ("LOGIN", &[Functional, Validation, Boundary, Security]),
    ("REGISTER", &[Functional, Validation, Boundary, Security]),
    ("FORM", &[Functional, Validation, Boundary, Exception]),
    ("SEARCH", &[Functional, Validation, Boundary]),
    ("LIST", &[Functional, Pagination, Filter, Ui]),
    ("DETAIL", &[Functional, Navigation, Ui]),
    ("DASHBOARD", &[Functional, Navigation, Ui]),
    ("SETTINGS", &[Functional, Validation, Persistence]),
];

pub const FALLBACK_DIMENSIONS: &[Dimension] = &[Functional, Ui];

/// Case kind → priority, first match wins.
pub const PRIORITY_RULES: &[(CaseKind, Priority)] = &[
    (CaseKind::PageLoad, Priority::P0),
    (CaseKind::HappyPath, Priority::P0),
    (CaseKind::Required, Priority::P1),
    (CaseKind::Format, Priority::P1),
    (CaseKind::Boundary, Priority::P1),
    (CaseKind::Negative, Priority::P1),
    (CaseKind::Navigation, Priority::P1),
    (CaseKind::Persistence, Priority::P1),
    (CaseKind::Exploratory, Priority::P2),
];

pub fn priority_for(kind: CaseKind) -> Priority {
    PRIORITY_RULES
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, p)| *p)
        .unwrap_or(Priority::P2)
}

pub fn builtin_dimensions(page_type: &PageType) -> &'static [Dimension] {
    TEST_DIMENSIONS
        .iter()
        .find(|(name, _)| *name == page_type.as_str())
        .map(|(_, dims)| *dims)
        .unwrap_or(FALLBACK_DIMENSIONS)
}

// ============================================================================
// Plan rules (built-ins + configured overrides)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Links turned into navigation cases, in page order.
    #[serde(default = "default_max_navigation_cases")]
    pub max_navigation_cases: usize,
}

fn default_max_navigation_cases() -> usize {
    10
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            max_navigation_cases: default_max_navigation_cases(),
        }
    }
}

/// Everything the plan generator reads besides the model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanRules {
    pub config: PlanConfig,
    pub dimension_overrides: BTreeMap<PageType, Vec<Dimension>>,
}

impl PlanRules {
    pub fn new(config: PlanConfig, dimension_overrides: BTreeMap<PageType, Vec<Dimension>>) -> Self {
        Self {
            config,
            dimension_overrides,
        }
    }

    /// Configured dimensions for a page type, else the built-in table.
    ///
    /// LOGIN and FORM always include `functional`: those pages must yield a
    /// P0 page-load case.
    pub fn dimensions_for(&self, page_type: &PageType) -> Vec<Dimension> {
        let mut dims = match self.dimension_overrides.get(page_type) {
            Some(dims) => dims.clone(),
            None => builtin_dimensions(page_type).to_vec(),
        };

        let mut seen = Vec::with_capacity(dims.len());
        dims.retain(|d| {
            if seen.contains(d) {
                false
            } else {
                seen.push(*d);
                true
            }
        });

        if matches!(page_type, PageType::Login | PageType::Form) && !dims.contains(&Functional) {
            dims.insert(0, Functional);
        }
        dims
    }
}
