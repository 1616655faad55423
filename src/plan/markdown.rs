use crate::analyzer::PageModel;
use crate::codegen::{ArtifactPaths, render_fixtures};
use crate::naming::class_name_for_page;
use crate::plan::plan_model::{Priority, TestPlanDocument};

// ============================================================================
// Markdown plan: human-readable companion of the generated code
// ============================================================================

/// Render a plan for review.
///
/// Sections: overview, dimensions, element mapping, cases grouped by
/// priority, test data, file locations. Deterministic for equal inputs.
pub fn render_markdown(plan: &TestPlanDocument, model: &PageModel) -> String {
    let class_name = class_name_for_page(&plan.page_name);
    let paths = ArtifactPaths::for_page(&plan.page_name);
    let mut out = String::new();

    out.push_str(&format!("# Test Plan: {class_name}\n\n"));

    // Overview
    let counts: Vec<String> = Priority::ALL
        .iter()
        .map(|p| format!("{p}: {}", plan.cases_with(*p).count()))
        .collect();
    out.push_str("## Overview\n\n| Property | Value |\n|---|---|\n");
    out.push_str(&format!("| URL | `{}` |\n", cell(&plan.url)));
    if !model.title.is_empty() {
        out.push_str(&format!("| Title | {} |\n", cell(&model.title)));
    }
    out.push_str(&format!("| Page type | {} |\n", plan.page_type));
    out.push_str(&format!("| Elements | {} |\n", model.elements.len()));
    out.push_str(&format!("| Forms | {} |\n", model.forms.len()));
    out.push_str(&format!(
        "| Test cases | {} ({}) |\n\n",
        plan.cases.len(),
        counts.join(", ")
    ));
    out.push_str(&format!("{}\n\n", plan.page_type.description()));

    // Dimensions
    out.push_str("## Test Dimensions\n\n");
    for (i, dimension) in plan.dimensions.iter().enumerate() {
        out.push_str(&format!(
            "{}. **{}**: {}\n",
            i + 1,
            dimension.name,
            dimension.rationale
        ));
    }
    out.push('\n');

    // Element mapping
    out.push_str("## Element Mapping\n\n");
    if model.elements.is_empty() {
        out.push_str("No interactive elements were found.\n\n");
    } else {
        out.push_str("| Name | Kind | Selector | Required |\n|---|---|---|---|\n");
        for element in &model.elements {
            out.push_str(&format!(
                "| `{}` | {} | `{}` | {} |\n",
                element.derived_name,
                element.kind,
                cell(&element.selector),
                if element.is_required { "yes" } else { "no" }
            ));
        }
        out.push('\n');
    }

    // Cases
    out.push_str("## Test Cases\n\n");
    for priority in Priority::ALL {
        let cases: Vec<_> = plan.cases_with(priority).collect();
        if cases.is_empty() {
            continue;
        }
        out.push_str(&format!("### {priority}\n\n"));
        for case in cases {
            out.push_str(&format!("#### {}: {}\n\n", case.id, case.title));
            out.push_str(&format!("- Dimension: {}\n", case.dimension));
            if !case.preconditions.is_empty() {
                out.push_str(&format!("- Preconditions: {}\n", case.preconditions.join(" ")));
            }
            out.push_str("- Steps:\n");
            for (i, step) in case.steps.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", i + 1, step));
            }
            out.push_str(&format!("- Expected: {}\n\n", case.expected));
        }
    }

    // Test data
    out.push_str("## Test Data\n\n");
    if plan.test_data.fields.is_empty() {
        out.push_str("No text fields need fixture data.\n\n");
    } else {
        out.push_str("| Field | Format | Required | Valid | Invalid |\n|---|---|---|---|---|\n");
        for field in &plan.test_data.fields {
            out.push_str(&format!(
                "| `{}` | {} | {} | `{}` | {} |\n",
                field.name,
                field.format,
                if field.required { "yes" } else { "no" },
                cell(&field.valid),
                field
                    .invalid
                    .as_deref()
                    .map(|v| match v {
                        "" => "(empty)".to_string(),
                        v => format!("`{}`", cell(v)),
                    })
                    .unwrap_or_else(|| "-".to_string()),
            ));
        }
        out.push('\n');
        if let Ok(json) = render_fixtures(&plan.test_data) {
            out.push_str(&format!("```json\n{json}```\n\n"));
        }
    }

    // Files
    out.push_str("## Files\n\n");
    out.push_str(&format!("- Page object: `{}`\n", paths.page_object));
    out.push_str(&format!("- Tests: `{}`\n", paths.test_suite));
    out.push_str(&format!("- Fixtures: `{}`\n", paths.fixtures));
    out.push_str(&format!("- Plan: `{}`\n", paths.plan));

    out
}

/// Keep table cells on one line and their pipes literal.
fn cell(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}
