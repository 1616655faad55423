use tracing::{debug, info};

use crate::analyzer::{ElementDescriptor, ElementKind, PageModel, PageType};
use crate::codegen::GenerateError;
use crate::naming::{case_prefix_for_page, page_name_from_url};
use crate::plan::dimensions::{Dimension, PlanRules, priority_for};
use crate::plan::plan_model::{
    CaseKind, PlanStep, Priority, StepValue, TestCaseSpec, TestDataShape, TestDimension,
    TestPlanDocument,
};
use crate::plan::test_data::{derive_test_data, field_format, is_constrained};

const LONG_INPUT_CHARS: usize = 5000;
const INJECTION_PROBE: &str = "<script>alert(1)</script>";
const WRONG_PASSWORD: &str = "WrongPass123!";

// ============================================================================
// Plan generation
// ============================================================================

/// Build a prioritized test plan for a page model.
///
/// Pure: equal inputs give equal plans. Fails only when the model breaks
/// its own invariants.
pub fn generate_plan(model: &PageModel, rules: &PlanRules) -> Result<TestPlanDocument, GenerateError> {
    model.validate().map_err(GenerateError::InvalidModel)?;

    let page_name = page_name_from_url(&model.url);
    let test_data = derive_test_data(model);
    let dimensions = rules.dimensions_for(&model.page_type);
    let ctx = PlanContext::new(model, &test_data, rules);

    let mut drafts = Vec::new();
    for dimension in &dimensions {
        let emitted = ctx.cases_for(*dimension);
        debug!(dimension = %dimension, cases = emitted.len(), "dimension expanded");
        drafts.extend(emitted);
    }

    let cases = assign_ids(&case_prefix_for_page(&page_name), drafts);
    info!(
        page = %page_name,
        page_type = %model.page_type,
        cases = cases.len(),
        "test plan generated"
    );

    Ok(TestPlanDocument {
        page_name,
        url: model.url.clone(),
        page_type: model.page_type.clone(),
        dimensions: dimensions
            .into_iter()
            .map(|name| TestDimension {
                name,
                rationale: name.rationale().to_string(),
            })
            .collect(),
        cases,
        test_data,
    })
}

/// Case before it gets an id.
struct Draft {
    dimension: Dimension,
    kind: CaseKind,
    title: String,
    preconditions: Vec<String>,
    steps: Vec<PlanStep>,
    expected: String,
}

impl Draft {
    fn new(dimension: Dimension, kind: CaseKind, title: impl Into<String>) -> Self {
        Self {
            dimension,
            kind,
            title: title.into(),
            preconditions: Vec::new(),
            steps: Vec::new(),
            expected: String::new(),
        }
    }

    fn given(mut self, precondition: &str) -> Self {
        self.preconditions.push(precondition.to_string());
        self
    }

    fn steps(mut self, steps: Vec<PlanStep>) -> Self {
        self.steps = steps;
        self
    }

    fn expect(mut self, expected: impl Into<String>) -> Self {
        self.expected = expected.into();
        self
    }
}

/// Ids are `TC-{PREFIX}-{NNN}`: P0 from 001, P1 from 101, P2 from 201. A band
/// that outgrows its hundred pushes the following band up.
fn assign_ids(prefix: &str, drafts: Vec<Draft>) -> Vec<TestCaseSpec> {
    let mut drafts: Vec<(Priority, Draft)> =
        drafts.into_iter().map(|d| (priority_for(d.kind), d)).collect();
    drafts.sort_by_key(|(priority, _)| *priority);

    let mut cases = Vec::with_capacity(drafts.len());
    let mut next_free = 1usize;
    let mut current: Option<Priority> = None;

    for (priority, draft) in drafts {
        if current != Some(priority) {
            let floor = match priority {
                Priority::P0 => 1,
                Priority::P1 => 101,
                Priority::P2 => 201,
            };
            next_free = next_free.max(floor);
            current = Some(priority);
        }

        cases.push(TestCaseSpec {
            id: format!("TC-{prefix}-{next_free:03}"),
            priority,
            dimension: draft.dimension,
            kind: draft.kind,
            title: draft.title,
            preconditions: draft.preconditions,
            steps: draft.steps,
            expected: draft.expected,
        });
        next_free += 1;
    }

    cases
}

// ============================================================================
// Per-dimension case rules
// ============================================================================

/// Fields sharing a submit control. Fields outside every form form one
/// scope without a submit.
struct Scope<'a> {
    id: Option<&'a str>,
    members: Vec<&'a ElementDescriptor>,
    submit: Option<&'a ElementDescriptor>,
}

struct PlanContext<'a> {
    model: &'a PageModel,
    data: &'a TestDataShape,
    rules: &'a PlanRules,
    scopes: Vec<Scope<'a>>,
}

impl<'a> PlanContext<'a> {
    fn new(model: &'a PageModel, data: &'a TestDataShape, rules: &'a PlanRules) -> Self {
        let mut scopes: Vec<Scope<'a>> = model
            .forms
            .iter()
            .map(|form| {
                let submit = model.form_submit(form);
                Scope {
                    id: Some(form.id.as_str()),
                    members: model
                        .form_elements(form)
                        .filter(|e| e.kind.is_field())
                        .collect(),
                    submit,
                }
            })
            .collect();

        let orphans: Vec<&ElementDescriptor> = model
            .elements
            .iter()
            .enumerate()
            .filter(|(i, e)| {
                e.kind.is_field() && !model.forms.iter().any(|f| f.element_indices.contains(i))
            })
            .map(|(_, e)| e)
            .collect();
        if !orphans.is_empty() {
            scopes.push(Scope {
                id: None,
                members: orphans,
                submit: None,
            });
        }

        Self {
            model,
            data,
            rules,
            scopes,
        }
    }

    fn cases_for(&self, dimension: Dimension) -> Vec<Draft> {
        match dimension {
            Dimension::Functional => self.functional(),
            Dimension::Validation => self.validation(),
            Dimension::Boundary => self.boundary(),
            Dimension::Security => self.security(),
            Dimension::Exception => self.exception(),
            Dimension::Pagination => self.pagination(),
            Dimension::Filter => self.filter(),
            Dimension::Navigation => self.navigation(),
            Dimension::Persistence => self.persistence(),
            Dimension::Ui => self.ui(),
        }
    }

    fn functional(&self) -> Vec<Draft> {
        let mut out = vec![
            Draft::new(Dimension::Functional, CaseKind::PageLoad, "page loads")
                .steps(open())
                .expect("The page renders and its load indicator is visible."),
        ];

        let submitting = self.submitting_scopes();
        for scope in &submitting {
            let title = if submitting.len() == 1 {
                "successful submit".to_string()
            } else {
                format!("successful submit of the {} form", scope_name(scope))
            };
            let mut draft = Draft::new(Dimension::Functional, CaseKind::HappyPath, title)
                .steps(self.submit_with(scope, None, None))
                .expect(success_message(&self.model.page_type));
            if self.model.page_type == PageType::Login {
                draft = draft.given("A registered test account exists.");
            }
            out.push(draft);
        }

        if self.model.page_type == PageType::List {
            if let Some(collection) = self.model.elements.iter().find_map(|e| e.collection.as_deref()) {
                let mut steps = open();
                steps.push(PlanStep::Check {
                    description: format!("items of `{collection}` are visible"),
                });
                out.push(
                    Draft::new(Dimension::Functional, CaseKind::HappyPath, "list renders its items")
                        .given("The collection holds at least one item.")
                        .steps(steps)
                        .expect("Every item of the collection is rendered."),
                );
            }
        }

        out
    }

    fn validation(&self) -> Vec<Draft> {
        let mut out = Vec::new();

        for scope in &self.scopes {
            for field in &scope.members {
                let label = field.display_label();
                let name = field.derived_name.as_str();

                if field.is_required {
                    let (title, override_value) = match field.kind {
                        k if k.is_text_entry() => (format!("{label} is required"), Some(StepValue::Empty)),
                        ElementKind::Select => (format!("{label} requires a selection"), None),
                        _ => (format!("{label} must be checked"), None),
                    };
                    out.push(
                        Draft::new(Dimension::Validation, CaseKind::Required, title)
                            .steps(self.submit_with(scope, Some(name), override_value))
                            .expect(format!(
                                "A required-field error is shown for {label} and the form is not submitted."
                            )),
                    );
                }

                if field.kind.is_text_entry() && is_constrained(field) {
                    let has_invalid = self
                        .data
                        .field(name)
                        .and_then(|d| d.invalid.as_deref())
                        .is_some_and(|v| !v.is_empty());
                    if has_invalid {
                        let format = field_format(field);
                        out.push(
                            Draft::new(
                                Dimension::Validation,
                                CaseKind::Format,
                                format!("{label} rejects an invalid {format}"),
                            )
                            .steps(self.submit_with(scope, Some(name), Some(StepValue::Invalid)))
                            .expect(format!("A format error is shown for {label}.")),
                        );
                    }
                }
            }

            if scope.submit.is_some() && !scope.members.iter().any(|f| f.is_required) {
                let mut steps = open();
                steps.extend(click(scope.submit));
                out.push(
                    Draft::new(
                        Dimension::Validation,
                        CaseKind::Negative,
                        format!("empty submit of the {} form", scope_name(scope)),
                    )
                    .steps(steps)
                    .expect("The empty submission is handled and guidance is shown."),
                );
            }
        }

        out
    }

    fn boundary(&self) -> Vec<Draft> {
        let mut out = Vec::new();

        for scope in &self.scopes {
            for field in scope.members.iter().filter(|f| f.kind.is_text_entry()) {
                let label = field.display_label();
                let name = field.derived_name.as_str();
                let mut push = |kind: CaseKind, title: String, value: StepValue, expected: String| {
                    out.push(
                        Draft::new(Dimension::Boundary, kind, title)
                            .steps(self.submit_with(scope, Some(name), Some(value)))
                            .expect(expected),
                    );
                };

                let max = parse_attr::<usize>(field, "maxlength");
                let min = parse_attr::<usize>(field, "minlength");

                if let Some(n) = max {
                    push(
                        CaseKind::Boundary,
                        format!("{label} accepts {n} characters"),
                        StepValue::Repeat { ch: 'a', count: n },
                        format!("All {n} characters are kept."),
                    );
                    if let Some(over) = n.checked_add(1) {
                        push(
                            CaseKind::Boundary,
                            format!("{label} rejects {over} characters"),
                            StepValue::Repeat { ch: 'a', count: over },
                            format!("Input stops at {n} characters or a length error is shown."),
                        );
                    }
                }

                if let Some(m) = min.filter(|m| *m > 0) {
                    let value = if m == 1 {
                        StepValue::Empty
                    } else {
                        StepValue::Repeat { ch: 'a', count: m - 1 }
                    };
                    push(
                        CaseKind::Boundary,
                        format!("{label} rejects {} characters", m - 1),
                        value,
                        format!("A length error is shown for {label}."),
                    );
                }

                if field.input_type() == "number" {
                    for (attr, edge) in [("min", "minimum"), ("max", "maximum")] {
                        let Some(limit) = field.attr(attr) else {
                            continue;
                        };
                        push(
                            CaseKind::Boundary,
                            format!("{label} accepts the {edge} {limit}"),
                            StepValue::Literal(limit.to_string()),
                            format!("The {edge} value {limit} is accepted."),
                        );
                        let outside = limit.parse::<i64>().ok().and_then(|limit| {
                            if attr == "min" {
                                limit.checked_sub(1)
                            } else {
                                limit.checked_add(1)
                            }
                        });
                        if let Some(outside) = outside {
                            push(
                                CaseKind::Boundary,
                                format!("{label} rejects {outside}"),
                                StepValue::Literal(outside.to_string()),
                                format!("A range error is shown for {label}."),
                            );
                        }
                    }
                }

                if max.is_none() {
                    push(
                        CaseKind::Exploratory,
                        format!("very long input in {label}"),
                        StepValue::Repeat {
                            ch: 'a',
                            count: LONG_INPUT_CHARS,
                        },
                        "The page stays responsive and the value is handled gracefully.".to_string(),
                    );
                }
            }
        }

        out
    }

    fn security(&self) -> Vec<Draft> {
        let mut out = Vec::new();

        if self.model.page_type == PageType::Login {
            for scope in self.submitting_scopes() {
                if !scope.members.iter().any(|f| f.is_password()) {
                    continue;
                }
                let mut steps = open();
                for field in scope.members.iter().filter(|f| f.kind.is_text_entry()) {
                    let value = if field.is_password() {
                        StepValue::Literal(WRONG_PASSWORD.to_string())
                    } else {
                        StepValue::Valid
                    };
                    steps.push(fill(field, value));
                }
                steps.extend(click(scope.submit));
                out.push(
                    Draft::new(Dimension::Security, CaseKind::Negative, "invalid credentials are rejected")
                        .steps(steps)
                        .expect("An authentication error is shown and the user stays signed out."),
                );
            }
        }

        for field in self.model.elements.iter().filter(|e| e.is_password()) {
            let label = field.display_label();
            let mut steps = open();
            steps.push(fill(field, StepValue::Valid));
            steps.push(PlanStep::Check {
                description: format!("`{}` shows its value masked", field.derived_name),
            });
            out.push(
                Draft::new(Dimension::Security, CaseKind::Negative, format!("{label} masks its input"))
                    .steps(steps)
                    .expect("Typed characters are not readable on screen."),
            );
        }

        for scope in &self.scopes {
            for field in scope
                .members
                .iter()
                .filter(|f| f.kind.is_text_entry() && !f.is_password())
            {
                out.push(
                    Draft::new(
                        Dimension::Security,
                        CaseKind::Exploratory,
                        format!("script injection in {}", field.display_label()),
                    )
                    .steps(self.submit_with(
                        scope,
                        Some(field.derived_name.as_str()),
                        Some(StepValue::Literal(INJECTION_PROBE.to_string())),
                    ))
                    .expect("The input is escaped and no script runs."),
                );
            }
        }

        out
    }

    fn exception(&self) -> Vec<Draft> {
        self.submitting_scopes()
            .into_iter()
            .map(|scope| {
                Draft::new(
                    Dimension::Exception,
                    CaseKind::Negative,
                    format!("server error on submit of the {} form", scope_name(scope)),
                )
                .given("The backend answers this submission with an error.")
                .steps(self.submit_with(scope, None, None))
                .expect("A readable error is shown and the entered values are kept.")
            })
            .collect()
    }

    fn pagination(&self) -> Vec<Draft> {
        let pager = self
            .model
            .elements
            .iter()
            .filter(|e| matches!(e.kind, ElementKind::Button | ElementKind::Link))
            .find(|e| is_pager_label(e.display_label()));

        let mut steps = open();
        let draft = match pager {
            Some(control) => {
                steps.push(PlanStep::Click {
                    target: control.derived_name.clone(),
                });
                Draft::new(Dimension::Pagination, CaseKind::Navigation, "pagination moves to the next page")
                    .given("The collection holds more items than fit on one page.")
                    .expect("The next set of items is shown.")
            }
            None => {
                steps.push(PlanStep::Check {
                    description: "all items are reachable without pagination controls".into(),
                });
                Draft::new(Dimension::Pagination, CaseKind::Exploratory, "collection fits on one page")
                    .expect("No items are hidden behind missing pagination.")
            }
        };
        vec![draft.steps(steps)]
    }

    fn filter(&self) -> Vec<Draft> {
        self.model
            .elements
            .iter()
            .filter(|e| e.kind.is_text_entry() || e.kind == ElementKind::Select)
            .map(|field| {
                let mut steps = open();
                steps.push(if field.kind == ElementKind::Select {
                    PlanStep::Choose {
                        target: field.derived_name.clone(),
                    }
                } else {
                    fill(field, StepValue::Valid)
                });
                steps.push(PlanStep::Check {
                    description: "only matching items remain".into(),
                });
                Draft::new(
                    Dimension::Filter,
                    CaseKind::Exploratory,
                    format!("filter by {}", field.display_label()),
                )
                .steps(steps)
                .expect("The collection narrows to matching items.")
            })
            .collect()
    }

    fn navigation(&self) -> Vec<Draft> {
        self.model
            .elements_of(ElementKind::Link)
            .take(self.rules.config.max_navigation_cases)
            .map(|link| {
                let mut steps = open();
                steps.push(PlanStep::Click {
                    target: link.derived_name.clone(),
                });
                let expected = match link.attr("href") {
                    Some(href) => format!("The browser navigates to {href}."),
                    None => "The linked page opens.".to_string(),
                };
                Draft::new(
                    Dimension::Navigation,
                    CaseKind::Navigation,
                    format!("{} link navigates", link.display_label()),
                )
                .steps(steps)
                .expect(expected)
            })
            .collect()
    }

    fn persistence(&self) -> Vec<Draft> {
        self.submitting_scopes()
            .into_iter()
            .map(|scope| {
                let mut steps = self.submit_with(scope, None, None);
                steps.push(PlanStep::Navigate);
                steps.push(PlanStep::ExpectLoaded);
                steps.push(PlanStep::Check {
                    description: "the saved values are shown".into(),
                });
                Draft::new(
                    Dimension::Persistence,
                    CaseKind::Persistence,
                    format!("changes to the {} form survive a reload", scope_name(scope)),
                )
                .steps(steps)
                .expect("Previously saved values are displayed after the reload.")
            })
            .collect()
    }

    fn ui(&self) -> Vec<Draft> {
        let check = |description: &str| {
            let mut steps = open();
            steps.push(PlanStep::Check {
                description: description.to_string(),
            });
            steps
        };

        vec![
            Draft::new(Dimension::Ui, CaseKind::Exploratory, "layout renders without overlap")
                .steps(check("no element overlaps or overflows at common viewport sizes"))
                .expect("Content is readable at desktop and mobile widths."),
            Draft::new(Dimension::Ui, CaseKind::Exploratory, "keyboard navigation reaches every control")
                .steps(check("Tab moves focus through every interactive element in order"))
                .expect("Every control can be reached and used without a mouse."),
        ]
    }

    // ------------------------------------------------------------------------

    fn submitting_scopes(&self) -> Vec<&Scope<'a>> {
        self.scopes.iter().filter(|s| s.submit.is_some()).collect()
    }

    /// Open the page, fill the scope with valid data, optionally replace one
    /// field's action, then submit.
    ///
    /// A replaced field with no override value is left untouched.
    fn submit_with(
        &self,
        scope: &Scope<'_>,
        target: Option<&str>,
        value: Option<StepValue>,
    ) -> Vec<PlanStep> {
        let mut steps = open();
        for field in &scope.members {
            if Some(field.derived_name.as_str()) == target {
                if let Some(value) = &value {
                    steps.push(fill(field, value.clone()));
                }
                continue;
            }
            match field.kind {
                k if k.is_text_entry() => steps.push(fill(field, StepValue::Valid)),
                ElementKind::Select if field.is_required => steps.push(PlanStep::Choose {
                    target: field.derived_name.clone(),
                }),
                ElementKind::Checkbox | ElementKind::Radio if field.is_required => {
                    steps.push(PlanStep::Toggle {
                        target: field.derived_name.clone(),
                    })
                }
                _ => {}
            }
        }
        steps.extend(click(scope.submit));
        steps
    }
}

fn open() -> Vec<PlanStep> {
    vec![PlanStep::Navigate, PlanStep::ExpectLoaded]
}

fn fill(field: &ElementDescriptor, value: StepValue) -> PlanStep {
    PlanStep::Fill {
        target: field.derived_name.clone(),
        value,
    }
}

fn click(submit: Option<&ElementDescriptor>) -> Option<PlanStep> {
    submit.map(|s| PlanStep::Click {
        target: s.derived_name.clone(),
    })
}

fn scope_name<'a>(scope: &Scope<'a>) -> &'a str {
    scope.id.unwrap_or("page")
}

fn parse_attr<T: std::str::FromStr>(element: &ElementDescriptor, key: &str) -> Option<T> {
    element.attr(key).and_then(|v| v.parse().ok())
}

fn is_pager_label(label: &str) -> bool {
    let lower = label.to_lowercase();
    ["next", "previous", "prev", "load more", "show more", "page"]
        .iter()
        .any(|k| lower.contains(k))
        || (!lower.is_empty() && lower.chars().all(|c| c.is_ascii_digit()))
}

fn success_message(page_type: &PageType) -> &'static str {
    match page_type {
        PageType::Login => "The user is signed in and leaves the login page.",
        PageType::Register => "The account is created and a confirmation is shown.",
        PageType::Search => "Matching results are shown.",
        PageType::Settings => "The changes are saved and a confirmation is shown.",
        _ => "The form is accepted and a success state is shown.",
    }
}
