use std::collections::HashSet;

use page_scaffold::analyzer::{
    AnalyzerConfig, Condition, ElementKind, IMPLICIT_FORM_ID, PageAnalyzer, PageType,
    PageTypeRule, RuleBasedAnalyzer, RuleError, Rename,
};
use page_scaffold::snapshot::{DomNode, DomSnapshot};
use serde_json::json;

mod common;
use crate::common::pages::{
    CONTACT_URL, LOGIN_URL, PRODUCTS_URL, capture_json, login_nodes, login_snapshot,
    product_list_nodes, two_submit_nodes,
};
use crate::common::utils::analyze;

// ============================================================================
// Login page
// ============================================================================

#[test]
fn login_page_is_classified_and_named() {
    let report = analyze(&login_snapshot(), LOGIN_URL);
    let model = &report.model;

    assert_eq!(model.page_type, PageType::Login);
    assert_eq!(model.title, "Sign in - Example");
    assert_eq!(report.diagnostics.matched_rule.as_deref(), Some("login"));

    let names: Vec<&str> = model.elements.iter().map(|e| e.derived_name.as_str()).collect();
    assert_eq!(names, vec!["username", "password", "log_in", "forgot_password"]);

    let kinds: Vec<ElementKind> = model.elements.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![ElementKind::Input, ElementKind::Input, ElementKind::Button, ElementKind::Link]
    );
}

#[test]
fn login_page_selectors_and_load_indicator() {
    let model = analyze(&login_snapshot(), LOGIN_URL).model;

    assert_eq!(model.load_indicator_selector, "h1");
    assert_eq!(model.element("username").unwrap().selector, "input[name=\"username\"]");
    assert_eq!(model.element("log_in").unwrap().selector, "button:has-text(\"Log in\")");
    assert_eq!(
        model.element("forgot_password").unwrap().attr("href"),
        Some("/forgot")
    );
}

#[test]
fn login_form_groups_fields_with_submit() {
    let model = analyze(&login_snapshot(), LOGIN_URL).model;

    assert_eq!(model.forms.len(), 1);
    let form = &model.forms[0];
    assert_eq!(form.id, "login");
    assert_eq!(form.element_indices, vec![0, 1, 2]);
    assert_eq!(form.submit_index, Some(2));
    assert_eq!(model.form_submit(form).unwrap().derived_name, "log_in");

    assert!(model.element("username").unwrap().is_required);
    assert!(model.element("password").unwrap().is_password());
}

#[test]
fn analyzer_output_passes_model_validation() {
    let model = analyze(&login_snapshot(), LOGIN_URL).model;
    assert_eq!(model.validate(), Ok(()));
}

// ============================================================================
// Name collisions
// ============================================================================

#[test]
fn repeated_submit_labels_get_suffixes() {
    let report = analyze(&DomSnapshot::from_nodes(&two_submit_nodes()), CONTACT_URL);
    let model = &report.model;

    assert!(model.element("submit").is_some());
    assert!(model.element("submit_2").is_some());
    assert_eq!(
        report.diagnostics.renamed,
        vec![Rename {
            from: "submit".into(),
            to: "submit_2".into()
        }]
    );

    assert_eq!(model.element("submit").unwrap().selector, "button:has-text(\"Submit\")");
    assert_eq!(
        model.element("submit_2").unwrap().selector,
        "button:has-text(\"Submit\") >> nth=1"
    );
}

#[test]
fn each_form_keeps_its_own_submit() {
    let model = analyze(&DomSnapshot::from_nodes(&two_submit_nodes()), CONTACT_URL).model;

    assert_eq!(model.page_type, PageType::Form);
    let ids: Vec<&str> = model.forms.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["contact", "newsletter"]);

    let submits: Vec<&str> = model
        .forms
        .iter()
        .map(|f| model.form_submit(f).unwrap().derived_name.as_str())
        .collect();
    assert_eq!(submits, vec!["submit", "submit_2"]);
}

#[test]
fn names_and_selectors_are_unique_on_repeating_pages() {
    let model = analyze(&DomSnapshot::from_nodes(&product_list_nodes(6)), PRODUCTS_URL).model;

    let names: HashSet<&str> = model.elements.iter().map(|e| e.derived_name.as_str()).collect();
    let selectors: HashSet<&str> = model.elements.iter().map(|e| e.selector.as_str()).collect();
    assert_eq!(names.len(), model.elements.len());
    assert_eq!(selectors.len(), model.elements.len());
    assert!(model.element("view_6").is_some());
}

// ============================================================================
// Degradation
// ============================================================================

#[test]
fn one_unreadable_node_costs_one_element() {
    let mut nodes: Vec<serde_json::Value> = login_nodes()
        .iter()
        .map(|n| serde_json::to_value(n).unwrap())
        .collect();
    nodes[2] = json!({ "tag": 5, "name": "password" });

    let snapshot = DomSnapshot::Captured { title: None, nodes };
    let report = analyze(&snapshot, LOGIN_URL);

    assert_eq!(report.model.elements.len(), 3);
    assert_eq!(report.diagnostics.skipped_nodes, 1);
    assert_eq!(report.diagnostics.skipped_indices, vec![2]);
    assert!(report.diagnostics.is_degraded());
    assert!(report.model.element("password").is_none());
    assert!(report.model.element("username").is_some());
}

#[test]
fn nodes_without_tag_are_skipped() {
    let snapshot = DomSnapshot::Captured {
        title: None,
        nodes: vec![
            json!({ "tag": "   ", "text": "ghost" }),
            json!({ "tag": "button", "text": "Go" }),
        ],
    };
    let report = analyze(&snapshot, "https://example.com/go");

    assert_eq!(report.diagnostics.skipped_indices, vec![0]);
    assert_eq!(report.model.elements.len(), 1);
    assert_eq!(report.model.elements[0].derived_name, "go");
}

#[test]
fn unavailable_snapshot_gives_unknown_empty_model() {
    let snapshot = DomSnapshot::unavailable("net::ERR_NAME_NOT_RESOLVED");
    let report = analyze(&snapshot, "https://nowhere.invalid/login");

    assert_eq!(report.model.page_type, PageType::Unknown);
    assert!(report.model.elements.is_empty());
    assert!(report.model.forms.is_empty());
    assert_eq!(report.model.load_indicator_selector, "body");
    assert!(
        report
            .diagnostics
            .snapshot_error
            .as_deref()
            .is_some_and(|e| e.contains("ERR_NAME_NOT_RESOLVED"))
    );
}

#[test]
fn malformed_capture_json_degrades_instead_of_failing() {
    let snapshot = DomSnapshot::from_json("{ not json");
    let report = analyze(&snapshot, LOGIN_URL);

    assert_eq!(report.model.page_type, PageType::Unknown);
    assert!(report.diagnostics.snapshot_error.is_some());
}

#[test]
fn capture_json_keeps_its_recorded_url() {
    let json = capture_json(LOGIN_URL, "Sign in", &login_nodes());
    let (snapshot, url) = DomSnapshot::from_json_with_url(&json);
    assert_eq!(url.as_deref(), Some(LOGIN_URL));
    assert_eq!(snapshot, DomSnapshot::from_json(&json));

    let (snapshot, url) = DomSnapshot::from_json_with_url("{ not json");
    assert!(url.is_none());
    assert!(matches!(snapshot, DomSnapshot::Unavailable { ref reason } if reason.contains("not valid JSON")));
}

#[test]
fn empty_page_is_unknown() {
    let report = analyze(&DomSnapshot::from_nodes(&[]), "https://example.com/blank");

    assert_eq!(report.model.page_type, PageType::Unknown);
    assert_eq!(report.model.load_indicator_selector, "body");
    assert!(report.diagnostics.matched_rule.is_none());
    assert!(!report.diagnostics.is_degraded());
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn repeating_links_make_a_list_page() {
    let model = analyze(&DomSnapshot::from_nodes(&product_list_nodes(4)), PRODUCTS_URL).model;
    assert_eq!(model.page_type, PageType::List);
}

#[test]
fn short_repeats_stay_below_the_list_threshold() {
    let model = analyze(&DomSnapshot::from_nodes(&product_list_nodes(2)), PRODUCTS_URL).model;
    assert_ne!(model.page_type, PageType::List);
}

#[test]
fn formless_fields_share_the_implicit_form() {
    let nodes = vec![
        DomNode::new("input").with_type("search").with_name("q"),
        DomNode::new("button").with_text("Search"),
    ];
    let model = analyze(&DomSnapshot::from_nodes(&nodes), "https://example.com/find").model;

    assert_eq!(model.page_type, PageType::Search);
    assert_eq!(model.forms.len(), 1);
    assert_eq!(model.forms[0].id, IMPLICIT_FORM_ID);
    assert_eq!(model.forms[0].submit_index, Some(1));
}

#[test]
fn submit_keywords_match_whole_words_only() {
    let nodes = vec![
        DomNode::new("input").with_name("title").with_form("poster"),
        DomNode::new("button").with_type("button").with_text("Design").with_form("poster"),
        DomNode::new("button").with_type("button").with_text("Save").with_form("poster"),
    ];
    let model = analyze(&DomSnapshot::from_nodes(&nodes), "https://example.com/poster").model;

    assert_eq!(model.forms[0].submit_index, Some(2));
}

#[test]
fn two_password_fields_make_a_register_page() {
    let nodes = vec![
        DomNode::new("input").with_type("email").with_name("email").with_form("signup"),
        DomNode::new("input").with_type("password").with_name("password").with_form("signup"),
        DomNode::new("input")
            .with_type("password")
            .with_name("confirm_password")
            .with_form("signup"),
        DomNode::new("button").with_type("submit").with_text("Create account").with_form("signup"),
    ];
    let model = analyze(&DomSnapshot::from_nodes(&nodes), "https://example.com/join").model;
    assert_eq!(model.page_type, PageType::Register);
}

#[test]
fn project_rules_run_before_builtins() {
    let rule = PageTypeRule::new(
        "checkout",
        "CHECKOUT".parse().unwrap(),
        vec![Condition::UrlMatches("/checkout".into())],
    );
    let analyzer = RuleBasedAnalyzer::new(AnalyzerConfig::default(), &[rule]).unwrap();
    let report = analyzer.analyze(&login_snapshot(), "https://shop.example.com/checkout");

    assert_eq!(report.model.page_type, PageType::Custom("CHECKOUT".into()));
    assert_eq!(report.diagnostics.matched_rule.as_deref(), Some("checkout"));
    assert_eq!(analyzer.rules().rule_names()[0], "checkout");
}

#[test]
fn invalid_rule_pattern_is_rejected() {
    let rule = PageTypeRule::new(
        "broken",
        PageType::Detail,
        vec![Condition::UrlMatches("/items/(".into())],
    );
    let err = RuleBasedAnalyzer::new(AnalyzerConfig::default(), &[rule]).unwrap_err();
    assert!(matches!(err, RuleError::InvalidPattern { ref rule, .. } if rule == "broken"));
}

#[test]
fn analysis_is_deterministic() {
    let first = analyze(&login_snapshot(), LOGIN_URL);
    let second = analyze(&login_snapshot(), LOGIN_URL);
    assert_eq!(first, second);
    assert_eq!(first.model.fingerprint(), second.model.fingerprint());
}

#[test]
fn constraint_attributes_are_kept() {
    let nodes = vec![DomNode {
        maxlength: Some(8),
        pattern: Some("[0-9]{5}".into()),
        disabled: true,
        ..DomNode::new("input").with_name("zip")
    }];
    let model = analyze(&DomSnapshot::from_nodes(&nodes), "https://example.com/address").model;
    let zip = model.element("zip").unwrap();

    assert_eq!(zip.attr("maxlength"), Some("8"));
    assert_eq!(zip.attr("pattern"), Some("[0-9]{5}"));
    assert_eq!(zip.attr("disabled"), Some("true"));
    assert_eq!(zip.attr("placeholder"), None);
}
