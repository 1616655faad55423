pub mod artifacts;
pub mod error;
pub mod fixtures;
pub mod page_object;
pub mod test_suite;

use tracing::info;

use crate::analyzer::PageModel;
use crate::naming::{class_name_for_page, page_name_from_url};
use crate::plan::{TestDataShape, TestPlanDocument, derive_test_data};

pub use artifacts::{Artifact, ArtifactKind, ArtifactPaths, GeneratedArtifactSet};
pub use error::GenerateError;
pub use fixtures::render_fixtures;
pub use page_object::{
    Action, ActionVerb, Locator, PageContract, PageObjectSpec, VALIDATION_ERROR_SELECTOR,
    method_name, render_page_object, value_getter_name,
};
pub use test_suite::render_test_suite;

// ============================================================================
// Code generation entry point
// ============================================================================

/// Project a page model (and optionally its plan) into a page object, a test
/// suite and fixture data.
///
/// Pure and deterministic: the same inputs always give byte-identical
/// artifacts. Nothing is written to disk here.
pub fn generate_artifacts(
    model: &PageModel,
    plan: Option<&TestPlanDocument>,
) -> Result<GeneratedArtifactSet, GenerateError> {
    model.validate().map_err(GenerateError::InvalidModel)?;
    if let Some(plan) = plan {
        if plan.url != model.url {
            return Err(GenerateError::PlanMismatch(format!(
                "plan is for {} but the model is for {}",
                plan.url, model.url
            )));
        }
    }

    let page_name = page_name_from_url(&model.url);
    let class_name = class_name_for_page(&page_name);
    let paths = ArtifactPaths::for_page(&page_name);

    let derived;
    let data: &TestDataShape = match plan {
        Some(plan) => &plan.test_data,
        None => {
            derived = derive_test_data(model);
            &derived
        }
    };

    let page = PageObjectSpec::from_model(model, &class_name);
    let header = file_header(model);

    let page_object = Artifact {
        kind: ArtifactKind::PageObject,
        relative_path: paths.page_object.clone(),
        contents: render_page_object(&page, &header),
    };
    let test_suite = Artifact {
        kind: ArtifactKind::TestSuite,
        relative_path: paths.test_suite.clone(),
        contents: render_test_suite(&page, plan, data, &paths, &header)?,
    };
    let fixtures = Artifact {
        kind: ArtifactKind::Fixtures,
        relative_path: paths.fixtures.clone(),
        contents: render_fixtures(data)?,
    };

    info!(
        class = %class_name,
        actions = page.actions().len(),
        tests = plan.map_or(1, |p| p.cases.len()),
        "artifacts generated"
    );

    Ok(GeneratedArtifactSet::new(page_object, test_suite, fixtures))
}

/// Comment block stamped on generated sources. Carries the model fingerprint
/// instead of a timestamp.
fn file_header(model: &PageModel) -> String {
    format!(
        "// Generated by page-scaffold from {}\n// Page type: {}\n// Model fingerprint: {}\n// Regenerate instead of editing by hand.\n\n",
        model.url.split_whitespace().collect::<Vec<_>>().join(" "),
        model.page_type,
        model.fingerprint(),
    )
}
