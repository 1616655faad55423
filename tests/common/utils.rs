use page_scaffold::analyzer::{AnalysisReport, PageAnalyzer, PageModel, RuleBasedAnalyzer};
use page_scaffold::plan::{PlanRules, TestPlanDocument, generate_plan};
use page_scaffold::snapshot::Snapshot;

use super::pages::{LOGIN_URL, login_snapshot};

pub fn analyze(snapshot: &dyn Snapshot, url: &str) -> AnalysisReport {
    RuleBasedAnalyzer::default().analyze(snapshot, url)
}

pub fn login_model() -> PageModel {
    analyze(&login_snapshot(), LOGIN_URL).model
}

pub fn plan_for(model: &PageModel) -> TestPlanDocument {
    generate_plan(model, &PlanRules::default()).expect("model from the analyzer is valid")
}

/// file:// URL of a fixture page under tests/fixtures.
pub fn fixture_page(name: &str) -> String {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    format!("file://{}", path.display())
}
