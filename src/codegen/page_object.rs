use crate::analyzer::{ElementKind, PageModel};
use crate::naming::{to_constant_case, to_pascal_case};

// ============================================================================
// Page-object contract
// ============================================================================

/// What a renderable page object must provide. Every generated class
/// implements the `PageObject` interface (`navigate`, `isLoaded`) on top of
/// the per-element actions listed here, and carries `getValidationErrors` /
/// `hasValidationError` for assertions.
pub trait PageContract {
    fn class_name(&self) -> &str;
    fn url(&self) -> &str;
    fn load_indicator(&self) -> &str;
    fn locators(&self) -> &[Locator];
    fn actions(&self) -> &[Action];
}

/// One `SELECTORS` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub constant: String,
    pub selector: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionVerb {
    Fill,
    Click,
    Choose,
    Toggle,
}

impl ActionVerb {
    pub fn for_kind(kind: ElementKind) -> Option<Self> {
        match kind {
            ElementKind::Input | ElementKind::Textarea => Some(ActionVerb::Fill),
            ElementKind::Button | ElementKind::Link => Some(ActionVerb::Click),
            ElementKind::Select => Some(ActionVerb::Choose),
            ElementKind::Checkbox | ElementKind::Radio => Some(ActionVerb::Toggle),
            ElementKind::Other => None,
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            ActionVerb::Fill => "fill",
            ActionVerb::Click => "click",
            ActionVerb::Choose => "choose",
            ActionVerb::Toggle => "toggle",
        }
    }
}

/// A generated method bound to one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub element: String,
    pub method: String,
    pub verb: ActionVerb,
    pub constant: String,
}

/// Method name for an element action, e.g. `fillUsername`, `clickLogIn`.
pub fn method_name(verb: ActionVerb, derived_name: &str) -> String {
    format!("{}{}", verb.prefix(), to_pascal_case(derived_name))
}

/// Reader generated next to every fill action, e.g. `getUsernameValue`.
pub fn value_getter_name(derived_name: &str) -> String {
    format!("get{}Value", to_pascal_case(derived_name))
}

/// Native constraint failures plus the usual error markup.
pub const VALIDATION_ERROR_SELECTOR: &str =
    "input:invalid, textarea:invalid, select:invalid, [aria-invalid=\"true\"], .error-message, [role=\"alert\"]";

/// Page object derived from a page model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageObjectSpec {
    class_name: String,
    url: String,
    load_indicator: String,
    locators: Vec<Locator>,
    actions: Vec<Action>,
}

impl PageObjectSpec {
    pub fn from_model(model: &PageModel, class_name: &str) -> Self {
        let locators = model
            .elements
            .iter()
            .map(|e| Locator {
                constant: to_constant_case(&e.derived_name),
                selector: e.selector.clone(),
            })
            .collect();

        let actions = model
            .elements
            .iter()
            .filter_map(|e| {
                let verb = ActionVerb::for_kind(e.kind)?;
                Some(Action {
                    element: e.derived_name.clone(),
                    method: method_name(verb, &e.derived_name),
                    verb,
                    constant: to_constant_case(&e.derived_name),
                })
            })
            .collect();

        Self {
            class_name: class_name.to_string(),
            url: model.url.clone(),
            load_indicator: model.load_indicator_selector.clone(),
            locators,
            actions,
        }
    }

    pub fn action_for(&self, element: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.element == element)
    }
}

impl PageContract for PageObjectSpec {
    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn load_indicator(&self) -> &str {
        &self.load_indicator
    }

    fn locators(&self) -> &[Locator] {
        &self.locators
    }

    fn actions(&self) -> &[Action] {
        &self.actions
    }
}

// ============================================================================
// TypeScript rendering
// ============================================================================

/// Render a Playwright page-object module.
pub fn render_page_object<P: PageContract>(page: &P, header: &str) -> String {
    let class = page.class_name();
    let mut out = String::new();

    out.push_str(header);
    out.push_str("import type { Page } from '@playwright/test';\n\n");

    out.push_str(
        "export interface PageObject {\n  navigate(): Promise<void>;\n  isLoaded(): Promise<boolean>;\n}\n\n",
    );

    out.push_str("export const SELECTORS = {\n");
    for locator in page.locators() {
        out.push_str(&format!(
            "  {}: {},\n",
            locator.constant,
            js_string(&locator.selector)
        ));
    }
    out.push_str("} as const;\n\n");

    out.push_str(&format!("export class {class} implements PageObject {{\n"));
    out.push_str(&format!("  static readonly URL = {};\n", js_string(page.url())));
    out.push_str(&format!(
        "  static readonly LOAD_INDICATOR = {};\n",
        js_string(page.load_indicator())
    ));
    out.push_str(&format!(
        "  static readonly VALIDATION_ERRORS = {};\n\n",
        js_string(VALIDATION_ERROR_SELECTOR)
    ));
    out.push_str("  constructor(readonly page: Page) {}\n\n");

    out.push_str(&format!(
        "  async navigate(): Promise<void> {{\n    await this.page.goto({class}.URL);\n    await this.page.locator({class}.LOAD_INDICATOR).first().waitFor();\n  }}\n\n"
    ));
    out.push_str(&format!(
        "  async isLoaded(): Promise<boolean> {{\n    return this.page.locator({class}.LOAD_INDICATOR).first().isVisible();\n  }}\n"
    ));

    for action in page.actions() {
        let target = format!("this.page.locator(SELECTORS.{})", action.constant);
        let (params, body) = match action.verb {
            ActionVerb::Fill => ("value: string".to_string(), format!("{target}.fill(value)")),
            ActionVerb::Click => (String::new(), format!("{target}.click()")),
            ActionVerb::Choose => (
                "option: string | { index: number } = { index: 1 }".to_string(),
                format!("{target}.selectOption(option)"),
            ),
            ActionVerb::Toggle => (
                "checked = true".to_string(),
                format!("{target}.setChecked(checked)"),
            ),
        };
        out.push_str(&format!(
            "\n  async {}({params}): Promise<void> {{\n    await {body};\n  }}\n",
            action.method
        ));
        if action.verb == ActionVerb::Fill {
            out.push_str(&format!(
                "\n  async {}(): Promise<string> {{\n    return {target}.inputValue();\n  }}\n",
                value_getter_name(&action.element)
            ));
        }
    }

    // Verification
    out.push_str(&format!(
        "\n  async getValidationErrors(): Promise<string[]> {{\n    const errors = this.page.locator({class}.VALIDATION_ERRORS);\n    const messages = await errors.evaluateAll((els) =>\n      els.map((el) => (el as HTMLInputElement).validationMessage || el.textContent?.trim() || ''),\n    );\n    return messages.filter((m) => m.length > 0);\n  }}\n"
    ));
    out.push_str(&format!(
        "\n  async hasValidationError(): Promise<boolean> {{\n    return (await this.page.locator({class}.VALIDATION_ERRORS).count()) > 0;\n  }}\n"
    ));

    out.push_str("}\n");
    out
}

/// JSON string literal, valid TypeScript for any input.
pub fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}
