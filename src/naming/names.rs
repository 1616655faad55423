use std::collections::HashSet;

use url::Url;

use super::case::{split_words, to_camel_case, to_constant_case, to_pascal_case, to_snake_case};

// ============================================================================
// Element names
// ============================================================================

/// Derive a snake_case identifier from a human label.
///
/// Only the first `max_words` words of the label are used so that long link
/// texts still produce usable identifiers. An empty result falls back to
/// `fallback`; a result starting with a digit is prefixed with it.
pub fn derive_name(label: Option<&str>, fallback: &str, max_words: usize) -> String {
    let words: Vec<String> = label
        .map(split_words)
        .unwrap_or_default()
        .into_iter()
        .take(max_words.max(1))
        .collect();

    if words.is_empty() {
        return to_snake_case(fallback);
    }

    let name = words.join("_");
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("{}_{}", to_snake_case(fallback), name)
    } else {
        name
    }
}

/// Hands out unique names in claim order.
///
/// A name is free only if neither it nor its camelCase projection has been
/// claimed, so `submit_2` and `submit2` can never both exist and the method
/// names generated from them stay distinct.
#[derive(Debug, Default)]
pub struct NameRegistry {
    taken: HashSet<String>,
    taken_camel: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `base`, or the first free `base_2`, `base_3`, ...
    pub fn claim(&mut self, base: &str) -> String {
        if self.is_free(base) {
            self.insert(base);
            return base.to_string();
        }

        let mut n = 2usize;
        loop {
            let candidate = format!("{base}_{n}");
            if self.is_free(&candidate) {
                self.insert(&candidate);
                return candidate;
            }
            n += 1;
        }
    }

    pub fn is_free(&self, name: &str) -> bool {
        !self.taken.contains(name) && !self.taken_camel.contains(&to_camel_case(name))
    }

    pub fn len(&self) -> usize {
        self.taken.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }

    fn insert(&mut self, name: &str) {
        self.taken.insert(name.to_string());
        self.taken_camel.insert(to_camel_case(name));
    }
}

// ============================================================================
// Page names
// ============================================================================

/// Derive a snake_case page name from a URL path.
///
/// Uses the last path segment that is not an identifier (numeric or
/// hex/uuid-like), without its file extension. The site root maps to `home`;
/// text that cannot be read as a URL or path maps to `page`.
pub fn page_name_from_url(raw: &str) -> String {
    let parsed = Url::parse(raw).or_else(|_| {
        Url::parse("http://localhost/").and_then(|base| base.join(raw.trim()))
    });

    let url = match parsed {
        Ok(url) => url,
        Err(_) => return "page".to_string(),
    };

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    for segment in segments.iter().rev() {
        if is_identifier_segment(segment) {
            continue;
        }
        let name = to_snake_case(strip_extension(segment));
        if !name.is_empty() && !name.starts_with(|c: char| c.is_ascii_digit()) {
            return name;
        }
    }

    if segments.is_empty() {
        "home".to_string()
    } else {
        "page".to_string()
    }
}

/// `login` → `LoginPage`
pub fn class_name_for_page(page_name: &str) -> String {
    let pascal = to_pascal_case(page_name);
    if pascal.ends_with("Page") {
        pascal
    } else {
        format!("{pascal}Page")
    }
}

/// `user_settings` → `user_settings`; used for artifact file names.
pub fn file_stem_for_page(page_name: &str) -> String {
    let stem = to_snake_case(page_name);
    if stem.is_empty() { "page".to_string() } else { stem }
}

/// `user_settings` → `USER_SETTINGS`; used in test-case ids.
pub fn case_prefix_for_page(page_name: &str) -> String {
    let prefix = to_constant_case(page_name);
    if prefix.is_empty() { "PAGE".to_string() } else { prefix }
}

fn is_identifier_segment(segment: &str) -> bool {
    if segment.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    segment.len() >= 8
        && segment.chars().any(|c| c.is_ascii_digit())
        && segment.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}

fn strip_extension(segment: &str) -> &str {
    match segment.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            stem
        }
        _ => segment,
    }
}
