use page_scaffold::naming::{
    NameRegistry, case_prefix_for_page, class_name_for_page, derive_name, file_stem_for_page,
    page_name_from_url, to_camel_case, to_constant_case, to_pascal_case, to_snake_case,
};

// ============================================================================
// Case conversion
// ============================================================================

#[test]
fn case_projections_of_a_label() {
    assert_eq!(to_snake_case("Log in"), "log_in");
    assert_eq!(to_constant_case("Log in"), "LOG_IN");
    assert_eq!(to_pascal_case("log_in"), "LogIn");
    assert_eq!(to_camel_case("log_in"), "logIn");
}

#[test]
fn camel_input_is_split() {
    assert_eq!(to_snake_case("firstName"), "first_name");
    assert_eq!(to_constant_case("userSettings"), "USER_SETTINGS");
}

// ============================================================================
// Element names
// ============================================================================

#[test]
fn derive_name_keeps_first_words() {
    let name = derive_name(Some("Remember me on this computer please"), "checkbox", 3);
    assert_eq!(name, "remember_me_on");
}

#[test]
fn derive_name_falls_back_for_empty_labels() {
    assert_eq!(derive_name(None, "input", 5), "input");
    assert_eq!(derive_name(Some("  ***  "), "button", 5), "button");
    assert_eq!(derive_name(Some("登录"), "button", 5), "button");
}

#[test]
fn derive_name_never_starts_with_a_digit() {
    assert_eq!(derive_name(Some("2nd address"), "input", 5), "input_2nd_address");
}

#[test]
fn registry_suffixes_in_claim_order() {
    let mut names = NameRegistry::new();
    assert_eq!(names.claim("submit"), "submit");
    assert_eq!(names.claim("submit"), "submit_2");
    assert_eq!(names.claim("submit"), "submit_3");
    assert_eq!(names.len(), 3);
}

#[test]
fn registry_rejects_camel_collisions() {
    let mut names = NameRegistry::new();
    names.claim("submit_2");
    assert!(!names.is_free("submit2"));
    assert_eq!(names.claim("submit2"), "submit2_2");
}

#[test]
fn registry_skips_names_already_taken_literally() {
    let mut names = NameRegistry::new();
    names.claim("save_2");
    names.claim("save");
    assert_eq!(names.claim("save"), "save_3");
}

// ============================================================================
// Page names
// ============================================================================

#[test]
fn page_name_uses_last_meaningful_segment() {
    assert_eq!(page_name_from_url("https://app.example.com/login"), "login");
    assert_eq!(page_name_from_url("https://app.example.com/account/settings/"), "settings");
    assert_eq!(page_name_from_url("https://app.example.com/orders/1042"), "orders");
    assert_eq!(page_name_from_url("https://app.example.com/sign-up.html?ref=x"), "sign_up");
}

#[test]
fn page_name_for_root_and_garbage() {
    assert_eq!(page_name_from_url("https://example.com/"), "home");
    assert_eq!(page_name_from_url("https://example.com"), "home");
    assert_eq!(page_name_from_url("/user-profile"), "user_profile");
    assert_eq!(page_name_from_url("https://example.com/123/456"), "page");
}

#[test]
fn page_artifact_names() {
    assert_eq!(class_name_for_page("login"), "LoginPage");
    assert_eq!(class_name_for_page("landing_page"), "LandingPage");
    assert_eq!(file_stem_for_page("user_settings"), "user_settings");
    assert_eq!(file_stem_for_page(""), "page");
    assert_eq!(case_prefix_for_page("user_settings"), "USER_SETTINGS");
}
