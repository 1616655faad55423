pub mod auth;
pub mod error;
pub mod session;

pub use auth::{AuthConfig, AuthStep};
pub use error::SessionError;
pub use session::{BrowserConfig, BrowserRequest, BrowserResponse, BrowserSession, capture_page};
