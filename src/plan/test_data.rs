use regex::Regex;
use tracing::{debug, warn};

use crate::analyzer::{ElementDescriptor, PageModel};
use crate::plan::plan_model::{FieldData, TestDataShape};

// ============================================================================
// Test data derivation
// ============================================================================

/// Formats whose values browsers or servers validate on their own.
const CONSTRAINED_FORMATS: [&str; 6] = ["email", "password", "tel", "url", "number", "date"];

/// Tried in order when a valid value has to satisfy a `pattern`.
const PATTERN_CANDIDATES: [&str; 16] = [
    "test",
    "Test",
    "testuser",
    "Test123",
    "TestPass123!",
    "abc123",
    "ABC",
    "12345",
    "123456",
    "1",
    "42",
    "user@example.com",
    "555-0100",
    "https://example.com",
    "2025-01-15",
    "90210",
];

/// Tried in order when an invalid value has to violate a `pattern`.
const PATTERN_VIOLATIONS: [&str; 5] = ["!invalid!", "@@@", "a b", "0", "ZZZZZZZZZZZZZZZZZZZZ"];

/// One fixture entry per text-entry element, in page order.
pub fn derive_test_data(model: &PageModel) -> TestDataShape {
    let fields = model
        .elements
        .iter()
        .filter(|e| e.kind.is_text_entry())
        .map(field_data)
        .collect();
    TestDataShape { fields }
}

fn field_data(element: &ElementDescriptor) -> FieldData {
    let format = field_format(element);
    let pattern = element.attr("pattern").and_then(|p| compile_pattern(element, p));

    let mut valid = fit_length(element, guess_value(element.display_label(), &format));
    if let Some(re) = &pattern {
        if !re.is_match(&valid) {
            match PATTERN_CANDIDATES
                .iter()
                .map(|c| fit_length(element, c.to_string()))
                .find(|c| re.is_match(c))
            {
                Some(candidate) => valid = candidate,
                None => debug!(
                    field = %element.derived_name,
                    "no candidate value satisfies the field pattern"
                ),
            }
        }
    }

    let invalid = invalid_value(element, &format, pattern.as_ref());

    FieldData {
        name: element.derived_name.clone(),
        format,
        required: element.is_required,
        pattern: element.attr("pattern").map(str::to_string),
        valid,
        invalid,
    }
}

/// Whether a field carries a format or pattern constraint.
pub fn is_constrained(element: &ElementDescriptor) -> bool {
    element.attr("pattern").is_some()
        || CONSTRAINED_FORMATS.contains(&field_format(element).as_str())
}

/// Semantic format of a text field: its input type when meaningful, else a
/// guess from the label.
pub fn field_format(element: &ElementDescriptor) -> String {
    let input_type = element.input_type();
    match input_type {
        "email" | "password" | "tel" | "url" | "number" | "date" | "search" => {
            return input_type.to_string();
        }
        "datetime-local" | "datetime" => return "date".to_string(),
        _ => {}
    }

    let label = element.display_label().to_lowercase();
    if label.contains("email") {
        "email"
    } else if label.contains("password") {
        "password"
    } else if label.contains("phone") || label.contains("tel") {
        "tel"
    } else if label.contains("url") || label.contains("website") {
        "url"
    } else if label.contains("date") {
        "date"
    } else {
        "text"
    }
    .to_string()
}

/// Plausible value from the label, then the format.
pub fn guess_value(label: &str, format: &str) -> String {
    let l = label.to_lowercase();

    if l.contains("email") {
        return "user@example.com".into();
    }
    if l.contains("password") {
        return "TestPass123!".into();
    }
    if l.contains("phone") || l.contains("tel") {
        return "555-0100".into();
    }
    if l.contains("url") || l.contains("website") {
        return "https://example.com".into();
    }
    if l.contains("zip") || l.contains("postal") {
        return "90210".into();
    }
    if l.contains("username") || l.contains("user") {
        return "testuser".into();
    }
    if l.contains("name") {
        return "Jane Doe".into();
    }
    if l.contains("search") || l.contains("query") {
        return "test query".into();
    }
    if l.contains("date") {
        return "2025-01-15".into();
    }
    if l.contains("number") || l.contains("amount") || l.contains("quantity") {
        return "42".into();
    }

    match format {
        "email" => "user@example.com".into(),
        "password" => "TestPass123!".into(),
        "tel" => "555-0100".into(),
        "url" => "https://example.com".into(),
        "number" => "42".into(),
        "date" => "2025-01-15".into(),
        "search" => "test query".into(),
        _ => "test".into(),
    }
}

fn invalid_value(element: &ElementDescriptor, format: &str, pattern: Option<&Regex>) -> Option<String> {
    if let Some(re) = pattern {
        if let Some(v) = PATTERN_VIOLATIONS.iter().find(|v| !re.is_match(v)) {
            return Some(v.to_string());
        }
    }

    let by_format = match format {
        "email" => Some("not-an-email"),
        "password" => Some("123"),
        "tel" => Some("phone"),
        "url" => Some("not a url"),
        "number" => Some("abc"),
        "date" => Some("not-a-date"),
        _ => None,
    };
    if let Some(v) = by_format {
        return Some(v.to_string());
    }

    if element.is_required {
        return Some(String::new());
    }

    if pattern.is_some() {
        // The pattern accepts every violation candidate; fall back to empty.
        return Some(String::new());
    }

    None
}

/// Pad or cut a value to respect `minlength` and `maxlength`.
fn fit_length(element: &ElementDescriptor, mut value: String) -> String {
    let min = element.attr("minlength").and_then(|v| v.parse::<usize>().ok());
    let max = element.attr("maxlength").and_then(|v| v.parse::<usize>().ok());

    let len = value.chars().count();
    if let Some(min) = min.filter(|m| *m > len) {
        value.extend(std::iter::repeat_n('a', min - len));
    }
    if let Some(max) = max {
        if let Some((cut, _)) = value.char_indices().nth(max) {
            value.truncate(cut);
        }
    }
    value
}

/// HTML patterns match the whole value.
fn compile_pattern(element: &ElementDescriptor, pattern: &str) -> Option<Regex> {
    match Regex::new(&format!("^(?:{pattern})$")) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(field = %element.derived_name, error = %e, "ignoring unsupported field pattern");
            None
        }
    }
}
