use std::collections::HashMap;

use crate::analyzer::page_model::ElementKind;
use crate::snapshot::DomNode;
use crate::snapshot::dom_node::non_blank;

const MAX_TEXT_SELECTOR_CHARS: usize = 60;

/// Build a locator for a node, most specific signal first.
pub fn build_selector(node: &DomNode, kind: ElementKind) -> String {
    if let Some(selector) = non_blank(node.selector.as_deref()) {
        return selector.to_string();
    }

    let tag = node.tag_name();

    if let Some(id) = non_blank(node.id.as_deref()) {
        return if is_css_identifier(id) {
            format!("#{id}")
        } else {
            format!("[id=\"{}\"]", escape(id))
        };
    }

    if let Some(name) = non_blank(node.name.as_deref()) {
        return format!("{tag}[name=\"{}\"]", escape(name));
    }

    if let Some(aria) = non_blank(node.aria_label.as_deref()) {
        return format!("{tag}[aria-label=\"{}\"]", escape(aria));
    }

    if let Some(placeholder) = non_blank(node.placeholder.as_deref()) {
        return format!("{tag}[placeholder=\"{}\"]", escape(placeholder));
    }

    if matches!(kind, ElementKind::Button | ElementKind::Link) {
        if let Some(text) = non_blank(node.text.as_deref()) {
            let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
            let short: String = collapsed.chars().take(MAX_TEXT_SELECTOR_CHARS).collect();
            return format!("{tag}:has-text(\"{}\")", escape(&short));
        }
    }

    if let Some(class) = node
        .class
        .as_deref()
        .and_then(|c| c.split_whitespace().find(|c| is_css_identifier(c)))
    {
        return format!("{tag}.{class}");
    }

    tag
}

/// Makes selectors unique in encounter order with Playwright's `nth`
/// combinator: the second `button` becomes `button >> nth=1`.
#[derive(Debug, Default)]
pub struct SelectorDeduper {
    seen: HashMap<String, usize>,
}

impl SelectorDeduper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unique(&mut self, selector: String) -> String {
        let count = self.seen.entry(selector.clone()).or_insert(0);
        let nth = *count;
        *count += 1;
        if nth == 0 {
            selector
        } else {
            format!("{selector} >> nth={nth}")
        }
    }
}

fn is_css_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '-' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preference_order() {
        let mut node = DomNode::new("input").with_name("email");
        assert_eq!(build_selector(&node, ElementKind::Input), "input[name=\"email\"]");
        node.id = Some("email-field".into());
        assert_eq!(build_selector(&node, ElementKind::Input), "#email-field");
        node.id = Some("2nd".into());
        assert_eq!(build_selector(&node, ElementKind::Input), "[id=\"2nd\"]");
        node.selector = Some("form >> input".into());
        assert_eq!(build_selector(&node, ElementKind::Input), "form >> input");
    }

    #[test]
    fn text_selectors_for_buttons() {
        let node = DomNode::new("button").with_text("  Log\n in ");
        assert_eq!(build_selector(&node, ElementKind::Button), "button:has-text(\"Log in\")");
    }

    #[test]
    fn deduper_suffixes_repeats() {
        let mut dedupe = SelectorDeduper::new();
        assert_eq!(dedupe.unique("a".into()), "a");
        assert_eq!(dedupe.unique("a".into()), "a >> nth=1");
        assert_eq!(dedupe.unique("a".into()), "a >> nth=2");
    }
}
