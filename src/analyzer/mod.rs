pub mod classifier;
pub mod diagnostics;
pub mod page_analyzer;
pub mod page_model;
pub mod rules;
pub mod selector;

pub use diagnostics::{AnalysisDiagnostics, AnalysisReport, Rename};
pub use page_analyzer::{AnalyzerConfig, IMPLICIT_FORM_ID, PageAnalyzer, RuleBasedAnalyzer};
pub use page_model::{ElementDescriptor, ElementKind, FormGroup, PageModel, PageType};
pub use rules::{Condition, PageTypeRule, RuleError, RuleSet, builtin_rules};
