use serde::{Deserialize, Serialize};

/// One node of a page snapshot as reported by the extraction script.
///
/// Every field except `tag` is optional: engines report what they can read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomNode {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxlength: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minlength: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub required: bool,
    /// Id of the enclosing form (the submit boundary).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    /// Id of the enclosing repeating container (list, table, grid), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    /// Engine-computed locator; preferred over a derived one when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
}

impl DomNode {
    /// Convenience constructor used by tests and capture tooling.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, input_type: &str) -> Self {
        self.input_type = Some(input_type.to_string());
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_role(mut self, role: &str) -> Self {
        self.role = Some(role.to_string());
        self
    }

    pub fn with_form(mut self, form_id: &str) -> Self {
        self.form_id = Some(form_id.to_string());
        self
    }

    pub fn with_collection(mut self, collection: &str) -> Self {
        self.collection = Some(collection.to_string());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Lowercased tag name.
    pub fn tag_name(&self) -> String {
        self.tag.trim().to_ascii_lowercase()
    }

    /// Lowercased `type` attribute, if any.
    pub fn type_attr(&self) -> Option<String> {
        non_blank(self.input_type.as_deref()).map(|t| t.to_ascii_lowercase())
    }

    /// Lowercased ARIA role, if any.
    pub fn role_attr(&self) -> Option<String> {
        non_blank(self.role.as_deref()).map(|r| r.to_ascii_lowercase())
    }

    /// Best-effort human label: aria-label, placeholder, inner text, then the
    /// name attribute. Whitespace is collapsed.
    pub fn label(&self) -> Option<String> {
        [
            self.aria_label.as_deref(),
            self.placeholder.as_deref(),
            self.text.as_deref(),
            self.name.as_deref(),
        ]
        .into_iter()
        .find_map(non_blank)
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

/// `Some` only for strings with visible content.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
