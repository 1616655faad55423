// ============================================================================
// Case conversion
// ============================================================================

/// Split text into lowercase ASCII words.
///
/// A word is a maximal run of ASCII letters and digits; runs are additionally
/// split where a lowercase letter or digit is followed by an uppercase letter
/// (`firstName` → `first`, `name`). Everything else is a separator and
/// non-ASCII characters are dropped.
pub fn split_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in text.chars() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev = None;
            continue;
        }

        let camel_boundary = c.is_ascii_uppercase()
            && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit());
        if camel_boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }

        current.push(c.to_ascii_lowercase());
        prev = Some(c);
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

/// `Log in now` → `log_in_now`
pub fn to_snake_case(text: &str) -> String {
    split_words(text).join("_")
}

/// `log_in` → `LOG_IN`
pub fn to_constant_case(text: &str) -> String {
    to_snake_case(text).to_ascii_uppercase()
}

/// `log_in` → `LogIn`
pub fn to_pascal_case(text: &str) -> String {
    split_words(text).iter().map(|w| capitalize(w)).collect()
}

/// `log_in` → `logIn`
pub fn to_camel_case(text: &str) -> String {
    let words = split_words(text);
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(word);
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
