use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::naming::{to_camel_case, to_constant_case, to_snake_case};

// ============================================================================
// Structural page model produced by the analyzer
// ============================================================================

/// Kind of interactive element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementKind {
    Input,
    Button,
    Link,
    Select,
    Checkbox,
    Radio,
    Textarea,
    Other,
}

impl ElementKind {
    /// Anything a user enters or picks a value in.
    pub fn is_field(self) -> bool {
        matches!(
            self,
            ElementKind::Input
                | ElementKind::Textarea
                | ElementKind::Select
                | ElementKind::Checkbox
                | ElementKind::Radio
        )
    }

    /// Free-text entry.
    pub fn is_text_entry(self) -> bool {
        matches!(self, ElementKind::Input | ElementKind::Textarea)
    }

    /// Name used when an element has no usable label.
    pub fn default_name(self) -> &'static str {
        match self {
            ElementKind::Input => "input",
            ElementKind::Button => "button",
            ElementKind::Link => "link",
            ElementKind::Select => "select",
            ElementKind::Checkbox => "checkbox",
            ElementKind::Radio => "radio",
            ElementKind::Textarea => "textarea",
            ElementKind::Other => "element",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.default_name().to_ascii_uppercase())
    }
}

/// Page classification. Custom types come from configured rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PageType {
    Login,
    Register,
    Form,
    List,
    Detail,
    Search,
    Dashboard,
    Settings,
    Unknown,
    Custom(String),
}

impl PageType {
    pub fn as_str(&self) -> &str {
        match self {
            PageType::Login => "LOGIN",
            PageType::Register => "REGISTER",
            PageType::Form => "FORM",
            PageType::List => "LIST",
            PageType::Detail => "DETAIL",
            PageType::Search => "SEARCH",
            PageType::Dashboard => "DASHBOARD",
            PageType::Settings => "SETTINGS",
            PageType::Unknown => "UNKNOWN",
            PageType::Custom(name) => name,
        }
    }

    /// Short description used in plan overviews.
    pub fn description(&self) -> String {
        match self {
            PageType::Login => "Authentication page where users sign in with credentials.".into(),
            PageType::Register => "Sign-up page where new users create an account.".into(),
            PageType::Form => "Data entry page that submits one or more forms.".into(),
            PageType::List => "Collection page that renders repeating items.".into(),
            PageType::Detail => "Detail page that shows a single record.".into(),
            PageType::Search => "Search page with a query input.".into(),
            PageType::Dashboard => "Overview page with summary widgets and navigation.".into(),
            PageType::Settings => "Settings page where users change and save preferences.".into(),
            PageType::Unknown => "Page without a recognised structure.".into(),
            PageType::Custom(name) => format!("Project-defined {name} page."),
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = to_constant_case(s);
        Ok(match name.as_str() {
            "" => return Err(format!("'{s}' is not a page type name")),
            "LOGIN" => PageType::Login,
            "REGISTER" => PageType::Register,
            "FORM" => PageType::Form,
            "LIST" => PageType::List,
            "DETAIL" => PageType::Detail,
            "SEARCH" => PageType::Search,
            "DASHBOARD" => PageType::Dashboard,
            "SETTINGS" => PageType::Settings,
            "UNKNOWN" => PageType::Unknown,
            _ => PageType::Custom(name),
        })
    }
}

impl TryFrom<String> for PageType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PageType> for String {
    fn from(value: PageType) -> Self {
        value.as_str().to_string()
    }
}

/// One interactive element found on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDescriptor {
    pub kind: ElementKind,
    pub tag: String,
    pub selector: String,
    pub raw_label: Option<String>,
    pub attributes: BTreeMap<String, String>,
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    /// Unique within the page; assigned once by the analyzer.
    pub derived_name: String,
}

impl ElementDescriptor {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Lowercased `type` attribute, `text` for untyped inputs.
    pub fn input_type(&self) -> &str {
        self.attr("type").unwrap_or("text")
    }

    pub fn is_password(&self) -> bool {
        self.kind == ElementKind::Input && self.input_type() == "password"
    }

    /// Explicit submit control, or a type-less `<button>` inside a form.
    pub fn is_submit(&self) -> bool {
        if self.kind != ElementKind::Button {
            return false;
        }
        match self.attr("type") {
            Some(t) => t == "submit" || t == "image",
            None => self.tag == "button" && self.form_id.is_some(),
        }
    }

    /// Label for human-facing text, falling back to the derived name.
    pub fn display_label(&self) -> &str {
        self.raw_label.as_deref().unwrap_or(&self.derived_name)
    }
}

/// Elements sharing a submit boundary. Holds indices into
/// `PageModel::elements`, never copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormGroup {
    pub id: String,
    pub element_indices: Vec<usize>,
    pub submit_index: Option<usize>,
}

/// Structural model of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageModel {
    pub url: String,
    #[serde(default)]
    pub title: String,
    pub page_type: PageType,
    pub elements: Vec<ElementDescriptor>,
    pub load_indicator_selector: String,
    pub forms: Vec<FormGroup>,
}

impl PageModel {
    /// Model returned when nothing could be captured.
    pub fn empty(url: &str) -> Self {
        Self {
            url: url.to_string(),
            title: String::new(),
            page_type: PageType::Unknown,
            elements: Vec::new(),
            load_indicator_selector: "body".to_string(),
            forms: Vec::new(),
        }
    }

    pub fn element(&self, derived_name: &str) -> Option<&ElementDescriptor> {
        self.elements.iter().find(|e| e.derived_name == derived_name)
    }

    pub fn elements_of(&self, kind: ElementKind) -> impl Iterator<Item = &ElementDescriptor> + '_ {
        self.elements.iter().filter(move |e| e.kind == kind)
    }

    pub fn fields(&self) -> impl Iterator<Item = &ElementDescriptor> + '_ {
        self.elements.iter().filter(|e| e.kind.is_field())
    }

    /// Elements of a form, in page order.
    pub fn form_elements<'a>(
        &'a self,
        form: &'a FormGroup,
    ) -> impl Iterator<Item = &'a ElementDescriptor> + 'a {
        form.element_indices
            .iter()
            .filter_map(|&i| self.elements.get(i))
    }

    pub fn form_submit(&self, form: &FormGroup) -> Option<&ElementDescriptor> {
        form.submit_index.and_then(|i| self.elements.get(i))
    }

    /// Check the invariants generators rely on. Returns the first violation.
    pub fn validate(&self) -> Result<(), String> {
        if self.url.trim().is_empty() {
            return Err("model has an empty url".into());
        }
        if self.load_indicator_selector.trim().is_empty() {
            return Err("model has an empty load indicator selector".into());
        }

        let mut names = HashSet::new();
        let mut methods = HashSet::new();
        for (i, element) in self.elements.iter().enumerate() {
            let name = element.derived_name.as_str();
            if name.is_empty() {
                return Err(format!("element {i} has no derived name"));
            }
            if to_snake_case(name) != name || name.starts_with(|c: char| c.is_ascii_digit()) {
                return Err(format!("element {i}: '{name}' is not a snake_case identifier"));
            }
            if !names.insert(name) {
                return Err(format!("derived name '{name}' is used more than once"));
            }
            if !methods.insert(to_camel_case(name)) {
                return Err(format!("derived name '{name}' collides with another in camelCase"));
            }
            if element.selector.trim().is_empty() {
                return Err(format!("element '{name}' has an empty selector"));
            }
        }

        for form in &self.forms {
            let out_of_range = form
                .element_indices
                .iter()
                .chain(form.submit_index.iter())
                .find(|&&i| i >= self.elements.len());
            if let Some(i) = out_of_range {
                return Err(format!("form '{}' refers to missing element {i}", form.id));
            }
        }

        Ok(())
    }

    /// SHA-1 over the canonical JSON form of the model.
    ///
    /// Stable for equal models; stamped into generated artifacts in place of
    /// a timestamp.
    pub fn fingerprint(&self) -> String {
        use sha1::{Digest, Sha1};

        let json = serde_json::to_string(self).unwrap_or_default();
        let mut hasher = Sha1::new();
        hasher.update(json.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
