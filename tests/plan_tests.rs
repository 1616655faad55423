use std::collections::{BTreeMap, HashSet};

use page_scaffold::analyzer::{PageModel, PageType};
use page_scaffold::codegen::GenerateError;
use page_scaffold::plan::{
    CaseKind, Dimension, PlanConfig, PlanRules, PlanStep, Priority, StepValue, generate_plan,
    render_markdown,
};
use page_scaffold::snapshot::{DomNode, DomSnapshot};

mod common;
use crate::common::pages::{CONTACT_URL, PRODUCTS_URL, product_list_nodes, two_submit_nodes};
use crate::common::utils::{analyze, login_model, plan_for};

fn dashboard_model(links: usize) -> PageModel {
    let nodes: Vec<DomNode> = (0..links)
        .map(|i| DomNode {
            href: Some(format!("/reports/{i}")),
            ..DomNode::new("a").with_text(&format!("Report {i}"))
        })
        .collect();
    analyze(&DomSnapshot::from_nodes(&nodes), "https://app.example.com/dashboard").model
}

fn id_number(id: &str) -> usize {
    id.rsplit('-').next().unwrap().parse().unwrap()
}

// ============================================================================
// Dimensions
// ============================================================================

#[test]
fn login_plan_covers_login_dimensions() {
    let plan = plan_for(&login_model());

    assert_eq!(plan.page_name, "login");
    assert_eq!(plan.page_type, PageType::Login);
    assert_eq!(
        plan.dimension_names(),
        vec!["functional", "validation", "boundary", "security"]
    );
    assert!(plan.dimensions.iter().all(|d| !d.rationale.is_empty()));
}

#[test]
fn unknown_pages_fall_back_to_functional_and_ui() {
    let model = PageModel::empty("https://example.com/blank");
    let plan = plan_for(&model);

    assert_eq!(plan.dimension_names(), vec!["functional", "ui"]);
    assert_eq!(plan.cases[0].title, "page loads");
}

#[test]
fn overrides_replace_builtin_dimensions() {
    let mut overrides = BTreeMap::new();
    overrides.insert(PageType::Login, vec![Dimension::Security, Dimension::Security]);
    let rules = PlanRules::new(PlanConfig::default(), overrides);

    assert_eq!(
        rules.dimensions_for(&PageType::Login),
        vec![Dimension::Functional, Dimension::Security]
    );
    assert_eq!(
        rules.dimensions_for(&PageType::Dashboard),
        vec![Dimension::Functional, Dimension::Navigation, Dimension::Ui]
    );
}

#[test]
fn custom_page_types_use_their_configured_dimensions() {
    let checkout: PageType = "checkout".parse().unwrap();
    let mut overrides = BTreeMap::new();
    overrides.insert(checkout.clone(), vec![Dimension::Validation, Dimension::Exception]);
    let rules = PlanRules::new(PlanConfig::default(), overrides);

    assert_eq!(
        rules.dimensions_for(&checkout),
        vec![Dimension::Validation, Dimension::Exception]
    );
}

// ============================================================================
// Cases and priorities
// ============================================================================

#[test]
fn login_and_form_plans_start_with_a_p0_page_load() {
    let contact = analyze(&DomSnapshot::from_nodes(&two_submit_nodes()), CONTACT_URL).model;
    for model in [login_model(), contact] {
        let plan = plan_for(&model);
        let first = &plan.cases[0];
        assert_eq!(first.kind, CaseKind::PageLoad);
        assert_eq!(first.priority, Priority::P0);
        assert!(first.id.ends_with("-001"), "got {}", first.id);
    }
}

#[test]
fn login_happy_path_fills_and_submits() {
    let plan = plan_for(&login_model());
    let case = plan.case("TC-LOGIN-002").expect("second P0 case");

    assert_eq!(case.title, "successful submit");
    assert_eq!(case.preconditions, vec!["A registered test account exists.".to_string()]);
    assert_eq!(
        case.steps,
        vec![
            PlanStep::Navigate,
            PlanStep::ExpectLoaded,
            PlanStep::Fill {
                target: "username".into(),
                value: StepValue::Valid
            },
            PlanStep::Fill {
                target: "password".into(),
                value: StepValue::Valid
            },
            PlanStep::Click {
                target: "log_in".into()
            },
        ]
    );
}

#[test]
fn login_plan_has_required_and_security_cases() {
    let plan = plan_for(&login_model());
    let titles: Vec<&str> = plan.cases.iter().map(|c| c.title.as_str()).collect();

    assert!(titles.contains(&"Username is required"));
    assert!(titles.contains(&"invalid credentials are rejected"));
    assert!(titles.contains(&"password masks its input"));

    let rejected = plan
        .cases
        .iter()
        .find(|c| c.title == "invalid credentials are rejected")
        .unwrap();
    assert_eq!(rejected.priority, Priority::P1);
    assert!(rejected.steps.contains(&PlanStep::Fill {
        target: "password".into(),
        value: StepValue::Literal("WrongPass123!".into()),
    }));
}

#[test]
fn ids_follow_priority_bands() {
    let plan = plan_for(&login_model());

    let ids: HashSet<&str> = plan.cases.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids.len(), plan.cases.len());

    for case in &plan.cases {
        let n = id_number(&case.id);
        match case.priority {
            Priority::P0 => assert!(n < 101, "{}", case.id),
            Priority::P1 => assert!((101..201).contains(&n), "{}", case.id),
            Priority::P2 => assert!(n >= 201, "{}", case.id),
        }
    }

    let priorities: Vec<Priority> = plan.cases.iter().map(|c| c.priority).collect();
    let mut sorted = priorities.clone();
    sorted.sort();
    assert_eq!(priorities, sorted);
}

#[test]
fn overflowing_band_pushes_the_next_one_up() {
    let model = dashboard_model(120);
    let rules = PlanRules::new(
        PlanConfig {
            max_navigation_cases: 150,
        },
        BTreeMap::new(),
    );
    let plan = generate_plan(&model, &rules).unwrap();

    let p1: Vec<usize> = plan.cases_with(Priority::P1).map(|c| id_number(&c.id)).collect();
    assert_eq!(p1.len(), 120);
    assert_eq!(p1.first(), Some(&101));
    assert_eq!(p1.last(), Some(&220));

    let first_p2 = plan.cases_with(Priority::P2).next().unwrap();
    assert_eq!(id_number(&first_p2.id), 221);
}

#[test]
fn navigation_cases_are_capped() {
    let model = dashboard_model(15);
    assert_eq!(model.page_type, PageType::Dashboard);

    let plan = plan_for(&model);
    let navigation = plan
        .cases
        .iter()
        .filter(|c| c.dimension == Dimension::Navigation)
        .count();
    assert_eq!(navigation, 10);
}

#[test]
fn number_limits_at_the_integer_edge_skip_the_outside_case() {
    let nodes = vec![
        DomNode {
            max: Some(i64::MAX.to_string()),
            min: Some(i64::MIN.to_string()),
            ..DomNode::new("input").with_type("number").with_name("quantity").with_form("order")
        },
        DomNode::new("input").with_name("note").with_form("order"),
        DomNode::new("button").with_type("submit").with_text("Order").with_form("order"),
    ];
    let model = analyze(&DomSnapshot::from_nodes(&nodes), "https://shop.example.com/order").model;
    assert_eq!(model.page_type, PageType::Form);

    let plan = plan_for(&model);
    let titles: Vec<&str> = plan.cases.iter().map(|c| c.title.as_str()).collect();
    assert!(titles.contains(&format!("quantity accepts the maximum {}", i64::MAX).as_str()));
    assert!(titles.contains(&format!("quantity accepts the minimum {}", i64::MIN).as_str()));
    assert!(!titles.iter().any(|t| t.starts_with("quantity rejects")));
}

#[test]
fn number_limits_get_an_outside_case() {
    let nodes = vec![
        DomNode {
            max: Some("10".into()),
            ..DomNode::new("input").with_type("number").with_name("quantity").with_form("order")
        },
        DomNode::new("input").with_name("note").with_form("order"),
        DomNode::new("button").with_type("submit").with_text("Order").with_form("order"),
    ];
    let model = analyze(&DomSnapshot::from_nodes(&nodes), "https://shop.example.com/order").model;

    let plan = plan_for(&model);
    assert!(plan.cases.iter().any(|c| c.title == "quantity rejects 11"));
}

#[test]
fn list_plan_covers_pagination_and_filtering() {
    let model = analyze(&DomSnapshot::from_nodes(&product_list_nodes(4)), PRODUCTS_URL).model;
    let plan = plan_for(&model);

    let pagination = plan
        .cases
        .iter()
        .find(|c| c.dimension == Dimension::Pagination)
        .unwrap();
    assert!(pagination.steps.contains(&PlanStep::Click {
        target: "next_page".into()
    }));
    assert!(plan.cases.iter().any(|c| c.title == "filter by filter"));
    assert!(plan.cases.iter().any(|c| c.title == "list renders its items"));
}

#[test]
fn every_step_targets_an_element_of_the_page() {
    let model = analyze(&DomSnapshot::from_nodes(&two_submit_nodes()), CONTACT_URL).model;
    let plan = plan_for(&model);

    for case in &plan.cases {
        for target in case.steps.iter().filter_map(PlanStep::target) {
            assert!(model.element(target).is_some(), "{}: unknown {target}", case.id);
        }
    }
}

#[test]
fn plans_are_deterministic() {
    let model = login_model();
    assert_eq!(plan_for(&model), plan_for(&model));
}

// ============================================================================
// Test data
// ============================================================================

#[test]
fn login_test_data_has_a_value_per_text_field() {
    let plan = plan_for(&login_model());
    let valid = plan.test_data.valid_data();

    assert_eq!(valid.get("username").map(String::as_str), Some("testuser"));
    assert_eq!(valid.get("password").map(String::as_str), Some("TestPass123!"));
    assert!(!valid.contains_key("log_in"));

    let password = plan.test_data.field("password").unwrap();
    assert_eq!(password.format, "password");
    assert_eq!(password.invalid.as_deref(), Some("123"));
}

#[test]
fn email_fields_get_format_cases() {
    let model = analyze(&DomSnapshot::from_nodes(&two_submit_nodes()), CONTACT_URL).model;
    let plan = plan_for(&model);

    let email = plan.test_data.field("email").unwrap();
    assert_eq!(email.valid, "user@example.com");
    assert_eq!(email.invalid.as_deref(), Some("not-an-email"));
    assert!(
        plan.cases
            .iter()
            .any(|c| c.kind == CaseKind::Format && c.steps.contains(&PlanStep::Fill {
                target: "email".into(),
                value: StepValue::Invalid,
            }))
    );
}

// ============================================================================
// Errors and rendering
// ============================================================================

#[test]
fn duplicate_names_are_rejected() {
    let mut model = login_model();
    model.elements[1].derived_name = "username".into();

    let err = generate_plan(&model, &PlanRules::default()).unwrap_err();
    assert!(matches!(err, GenerateError::InvalidModel(_)));
}

#[test]
fn markdown_plan_lists_cases_by_priority() {
    let model = login_model();
    let plan = plan_for(&model);
    let markdown = render_markdown(&plan, &model);

    assert!(markdown.starts_with("# Test Plan: LoginPage\n"));
    assert!(markdown.contains("| Page type | LOGIN |"));
    assert!(markdown.contains("### P0\n"));
    assert!(markdown.contains("#### TC-LOGIN-001: page loads"));
    assert!(markdown.contains("| `username` | INPUT | `input[name=\"username\"]` | yes |"));
    assert!(markdown.contains("- Page object: `pages/login.page.ts`"));
    assert_eq!(markdown, render_markdown(&plan, &model));
}
