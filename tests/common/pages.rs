use page_scaffold::snapshot::{DomNode, DomSnapshot};

pub const LOGIN_URL: &str = "https://app.example.com/login";
pub const CONTACT_URL: &str = "https://app.example.com/contact";
pub const PRODUCTS_URL: &str = "https://shop.example.com/products";

// ============================================================================
// Page builders
// ============================================================================

/// Heading, username, password, "Log in" submit and a "Forgot password?" link.
pub fn login_nodes() -> Vec<DomNode> {
    vec![
        DomNode::new("h1").with_text("Sign in"),
        DomNode {
            aria_label: Some("Username".into()),
            ..DomNode::new("input")
                .with_type("text")
                .with_name("username")
                .with_form("login")
                .required()
        },
        DomNode::new("input")
            .with_type("password")
            .with_name("password")
            .with_form("login")
            .required(),
        DomNode::new("button")
            .with_type("submit")
            .with_text("Log in")
            .with_form("login"),
        DomNode {
            href: Some("/forgot".into()),
            ..DomNode::new("a").with_text("Forgot password?")
        },
    ]
}

pub fn login_snapshot() -> DomSnapshot {
    DomSnapshot::from_nodes(&login_nodes()).with_title("Sign in - Example")
}

/// Two forms on one page, each with a "Submit" button.
pub fn two_submit_nodes() -> Vec<DomNode> {
    vec![
        DomNode::new("h2").with_text("Contact us"),
        DomNode::new("input")
            .with_type("email")
            .with_name("email")
            .with_form("contact")
            .required(),
        DomNode::new("textarea").with_name("message").with_form("contact"),
        DomNode::new("button")
            .with_type("submit")
            .with_text("Submit")
            .with_form("contact"),
        DomNode::new("input")
            .with_type("email")
            .with_name("newsletter")
            .with_form("newsletter"),
        DomNode::new("button")
            .with_type("submit")
            .with_text("Submit")
            .with_form("newsletter"),
    ]
}

/// Product grid: a search box plus `count` "View" links in one list.
pub fn product_list_nodes(count: usize) -> Vec<DomNode> {
    let mut nodes = vec![
        DomNode::new("h1").with_text("Products"),
        DomNode::new("input").with_type("text").with_name("filter"),
    ];
    for i in 0..count {
        nodes.push(DomNode {
            href: Some(format!("/products/{}", i + 1)),
            ..DomNode::new("a").with_text("View").with_collection("product-grid")
        });
    }
    nodes.push(DomNode::new("button").with_text("Next page"));
    nodes
}

/// Capture file contents as written by the extraction script.
pub fn capture_json(url: &str, title: &str, nodes: &[DomNode]) -> String {
    serde_json::json!({
        "url": url,
        "title": title,
        "nodes": nodes,
    })
    .to_string()
}
