use crate::{
    analyzer::{AnalysisReport, PageAnalyzer},
    codegen::{GenerateError, GeneratedArtifactSet, generate_artifacts},
    plan::{PlanRules, TestPlanDocument, generate_plan},
    snapshot::Snapshot,
};

pub mod analyzer;
pub mod browser;
pub mod cli;
pub mod codegen;
pub mod naming;
pub mod plan;
pub mod snapshot;

/// Everything produced for one page.
#[derive(Debug)]
pub struct ScaffoldOutput {
    pub report: AnalysisReport,
    pub plan: Option<TestPlanDocument>,
    pub artifacts: GeneratedArtifactSet,
}

/// Analyze a snapshot, plan it (unless `with_plan` is false) and generate
/// the page object, test suite and fixtures.
pub fn scaffold_page(
    snapshot: &dyn Snapshot,
    url: &str,
    analyzer: &dyn PageAnalyzer,
    plan_rules: &PlanRules,
    with_plan: bool,
) -> Result<ScaffoldOutput, GenerateError> {
    let report = analyzer.analyze(snapshot, url);

    let plan = if with_plan {
        Some(generate_plan(&report.model, plan_rules)?)
    } else {
        None
    };
    let artifacts = generate_artifacts(&report.model, plan.as_ref())?;

    Ok(ScaffoldOutput {
        report,
        plan,
        artifacts,
    })
}
