use crate::analyzer::page_model::ElementKind;
use crate::snapshot::DomNode;

/// What the analyzer should do with a probed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    /// Interactive element of the given kind.
    Element(ElementKind),
    /// Heading; candidate for the load indicator.
    Heading,
    /// Present in the snapshot but not part of the interactive surface.
    Ignored,
}

/// Classify a node by tag first, then by ARIA role.
pub fn classify_node(node: &DomNode) -> NodeClass {
    let tag = node.tag_name();
    let role = node.role_attr();

    if is_heading(&tag, role.as_deref()) {
        return NodeClass::Heading;
    }

    match tag.as_str() {
        "input" => classify_input(node.type_attr().as_deref()),
        "textarea" => NodeClass::Element(ElementKind::Textarea),
        "select" => NodeClass::Element(ElementKind::Select),
        "button" => NodeClass::Element(ElementKind::Button),
        "a" => NodeClass::Element(ElementKind::Link),
        _ => classify_role(role.as_deref()),
    }
}

fn is_heading(tag: &str, role: Option<&str>) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6") || role == Some("heading")
}

fn classify_input(input_type: Option<&str>) -> NodeClass {
    match input_type {
        // Explicit actions
        Some("submit") | Some("button") | Some("reset") | Some("image") => {
            NodeClass::Element(ElementKind::Button)
        }

        // Choice inputs
        Some("checkbox") => NodeClass::Element(ElementKind::Checkbox),
        Some("radio") => NodeClass::Element(ElementKind::Radio),

        // Not part of the visible surface
        Some("hidden") => NodeClass::Ignored,

        // Interactive but not text entry
        Some("file") | Some("color") | Some("range") => NodeClass::Element(ElementKind::Other),

        // Textual inputs, including unknown types (browsers render them as text)
        _ => NodeClass::Element(ElementKind::Input),
    }
}

fn classify_role(role: Option<&str>) -> NodeClass {
    match role {
        Some("button") | Some("menuitem") | Some("tab") => NodeClass::Element(ElementKind::Button),
        Some("link") => NodeClass::Element(ElementKind::Link),
        Some("textbox") | Some("searchbox") => NodeClass::Element(ElementKind::Input),
        Some("checkbox") | Some("switch") => NodeClass::Element(ElementKind::Checkbox),
        Some("radio") => NodeClass::Element(ElementKind::Radio),
        Some("combobox") | Some("listbox") => NodeClass::Element(ElementKind::Select),
        Some("slider") | Some("spinbutton") => NodeClass::Element(ElementKind::Other),
        _ => NodeClass::Ignored,
    }
}

/// Whether a label reads like a submit action. Keywords match whole words,
/// so "Design" or "Assign" do not count.
pub fn is_submit_label(label: &str) -> bool {
    const KEYWORDS: [&[&str]; 12] = [
        &["submit"],
        &["save"],
        &["sign", "in"],
        &["sign", "up"],
        &["signin"],
        &["signup"],
        &["log", "in"],
        &["login"],
        &["continue"],
        &["next"],
        &["send"],
        &["search"],
    ];
    let words: Vec<String> = label
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect();
    KEYWORDS.iter().any(|phrase| {
        words
            .windows(phrase.len())
            .any(|window| window.iter().zip(phrase.iter()).all(|(w, k)| w.as_str() == *k))
    })
}
