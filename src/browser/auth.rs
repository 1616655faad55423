use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::browser::error::SessionError;

// ============================================================================
// Pre-navigation authentication
// ============================================================================

/// How to get past a login wall before the target page is opened.
///
/// `storage_state` restores a saved Playwright session (cookies and local
/// storage). `login_url` with `steps` drives a login form instead. Both may
/// be given; the storage state is applied first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_state: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<AuthStep>,
}

/// One action on the login page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AuthStep {
    /// Type into a field. Secrets belong in `value_env`, which names an
    /// environment variable read when the session authenticates.
    Fill {
        selector: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value_env: Option<String>,
    },
    Click {
        selector: String,
    },
    WaitFor {
        selector: String,
    },
}

impl AuthConfig {
    pub fn is_empty(&self) -> bool {
        self.storage_state.is_none() && self.login_url.is_none() && self.steps.is_empty()
    }

    /// Steps with every `value_env` replaced by its value.
    pub fn resolved_steps(&self) -> Result<Vec<AuthStep>, SessionError> {
        self.steps.iter().map(AuthStep::resolve).collect()
    }
}

impl AuthStep {
    fn resolve(&self) -> Result<AuthStep, SessionError> {
        let AuthStep::Fill {
            selector,
            value,
            value_env,
        } = self
        else {
            return Ok(self.clone());
        };

        let value = match (value, value_env) {
            (_, Some(var)) => std::env::var(var).map_err(|_| {
                SessionError::AuthSetup(format!(
                    "environment variable {var} for '{selector}' is not set"
                ))
            })?,
            (Some(value), None) => value.clone(),
            (None, None) => {
                return Err(SessionError::AuthSetup(format!(
                    "fill step for '{selector}' has neither value nor value_env"
                )));
            }
        };

        Ok(AuthStep::Fill {
            selector: selector.clone(),
            value: Some(value),
            value_env: None,
        })
    }
}
