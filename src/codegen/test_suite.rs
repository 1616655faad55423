use crate::codegen::artifacts::ArtifactPaths;
use crate::codegen::error::GenerateError;
use crate::codegen::page_object::{ActionVerb, PageContract, PageObjectSpec, js_string};
use crate::plan::{CaseKind, PlanStep, StepValue, TestCaseSpec, TestDataShape, TestPlanDocument};

const PAGE_OBJECT_VAR: &str = "pageObject";

/// Render the Playwright test module: one test per plan case, or a single
/// page-load smoke test without a plan.
pub fn render_test_suite(
    page: &PageObjectSpec,
    plan: Option<&TestPlanDocument>,
    data: &TestDataShape,
    paths: &ArtifactPaths,
    header: &str,
) -> Result<String, GenerateError> {
    let class = page.class_name();

    let mut uses_data = false;
    let tests = match plan {
        Some(plan) => plan
            .cases
            .iter()
            .map(|case| render_case(page, data, case, &mut uses_data))
            .collect::<Result<Vec<_>, _>>()?,
        None => vec![smoke_test(class)],
    };

    let mut out = String::new();
    out.push_str(header);
    out.push_str("import { test, expect } from '@playwright/test';\n");
    out.push_str(&format!(
        "import {{ {class} }} from '{}';\n",
        paths.page_object_import()
    ));
    if uses_data {
        out.push_str(&format!("import data from '{}';\n", paths.fixtures_import()));
    }
    out.push('\n');

    out.push_str(&format!("test.describe({}, () => {{\n", js_string(class)));
    out.push_str(&tests.join("\n"));
    out.push_str("});\n");
    Ok(out)
}

fn smoke_test(class: &str) -> String {
    format!(
        "  test({title}, {{ tag: ['@P0', '@functional'] }}, async ({{ page }}) => {{\n    const {var} = new {class}(page);\n    await {var}.navigate();\n    expect(await {var}.isLoaded()).toBe(true);\n  }});\n",
        title = js_string("smoke: page loads"),
        var = PAGE_OBJECT_VAR,
    )
}

fn render_case(
    page: &PageObjectSpec,
    data: &TestDataShape,
    case: &TestCaseSpec,
    uses_data: &mut bool,
) -> Result<String, GenerateError> {
    let class = page.class_name();
    let title = js_string(&format!("{}: {}", case.id, case.title));
    let tags = format!("['@{}', '@{}']", case.priority, case.dimension);

    let mut body = String::new();
    for precondition in &case.preconditions {
        body.push_str(&format!("    // Given: {}\n", one_line(precondition)));
    }
    body.push_str(&format!("    const {PAGE_OBJECT_VAR} = new {class}(page);\n"));
    for step in &case.steps {
        body.push_str(&format!("    {}\n", render_step(page, data, case, step, uses_data)?));
    }
    if matches!(case.kind, CaseKind::Required | CaseKind::Format) {
        body.push_str(&format!(
            "    expect(await {PAGE_OBJECT_VAR}.hasValidationError()).toBe(true);\n"
        ));
    }
    if !case.expected.is_empty() {
        body.push_str(&format!("    // Expected: {}\n", one_line(&case.expected)));
    }

    Ok(format!(
        "  test({title}, {{ tag: {tags} }}, async ({{ page }}) => {{\n{body}  }});\n"
    ))
}

fn render_step(
    page: &PageObjectSpec,
    data: &TestDataShape,
    case: &TestCaseSpec,
    step: &PlanStep,
    uses_data: &mut bool,
) -> Result<String, GenerateError> {
    let po = PAGE_OBJECT_VAR;

    Ok(match step {
        PlanStep::Navigate => format!("await {po}.navigate();"),
        PlanStep::ExpectLoaded => format!("expect(await {po}.isLoaded()).toBe(true);"),
        PlanStep::Fill { target, value } => {
            let method = method_for(page, case, target, ActionVerb::Fill)?;
            let value = value_expr(data, case, target, value, uses_data)?;
            format!("await {po}.{method}({value});")
        }
        PlanStep::Click { target } => {
            format!("await {po}.{}();", method_for(page, case, target, ActionVerb::Click)?)
        }
        PlanStep::Choose { target } => {
            format!("await {po}.{}();", method_for(page, case, target, ActionVerb::Choose)?)
        }
        PlanStep::Toggle { target } => {
            format!("await {po}.{}(true);", method_for(page, case, target, ActionVerb::Toggle)?)
        }
        PlanStep::Check { description } => format!("// Verify: {}", one_line(description)),
    })
}

fn method_for<'p>(
    page: &'p PageObjectSpec,
    case: &TestCaseSpec,
    target: &str,
    verb: ActionVerb,
) -> Result<&'p str, GenerateError> {
    match page.action_for(target) {
        Some(action) if action.verb == verb => Ok(action.method.as_str()),
        Some(_) => Err(GenerateError::PlanMismatch(format!(
            "{}: element '{target}' does not support {}",
            case.id,
            verb.prefix()
        ))),
        None => Err(GenerateError::PlanMismatch(format!(
            "{}: unknown element '{target}'",
            case.id
        ))),
    }
}

fn value_expr(
    data: &TestDataShape,
    case: &TestCaseSpec,
    target: &str,
    value: &StepValue,
    uses_data: &mut bool,
) -> Result<String, GenerateError> {
    let missing = || {
        GenerateError::PlanMismatch(format!(
            "{}: no {value} fixture for '{target}'",
            case.id
        ))
    };

    Ok(match value {
        StepValue::Valid => {
            data.field(target).ok_or_else(missing)?;
            *uses_data = true;
            format!("data.valid_data.{target}")
        }
        StepValue::Invalid => {
            data.field(target)
                .and_then(|f| f.invalid.as_ref())
                .ok_or_else(missing)?;
            *uses_data = true;
            format!("data.invalid_data.{target}")
        }
        StepValue::Empty => "''".to_string(),
        StepValue::Repeat { ch, count } => {
            format!("{}.repeat({count})", js_string(&ch.to_string()))
        }
        StepValue::Literal(text) => js_string(text),
    })
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
