use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::browser::auth::{AuthConfig, AuthStep};
use crate::browser::error::SessionError;
use crate::snapshot::{CapturedPage, DomSnapshot};

// ============================================================================
// Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Node.js executable.
    #[serde(default = "default_node")]
    pub node: String,
    /// Browser server script speaking NDJSON on stdin/stdout.
    #[serde(default = "default_script")]
    pub script: PathBuf,
    /// Per-command budget handed to the engine.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Login performed before the target page is opened.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
}

fn default_node() -> String {
    "node".to_string()
}

fn default_script() -> PathBuf {
    PathBuf::from("node/browser_server.js")
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            node: default_node(),
            script: default_script(),
            timeout_ms: default_timeout_ms(),
            auth: None,
        }
    }
}

// ============================================================================
// Wire protocol
// ============================================================================

/// Request sent to the browser server over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BrowserRequest {
    Navigate {
        cmd: &'static str,
        url: String,
        timeout_ms: u64,
    },
    Extract {
        cmd: &'static str,
        timeout_ms: u64,
    },
    Authenticate {
        cmd: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        storage_state: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        login_url: Option<String>,
        steps: Vec<AuthStep>,
        timeout_ms: u64,
    },
    Quit {
        cmd: &'static str,
    },
}

impl BrowserRequest {
    pub fn navigate(url: &str, timeout_ms: u64) -> Self {
        BrowserRequest::Navigate {
            cmd: "navigate",
            url: url.to_string(),
            timeout_ms,
        }
    }

    pub fn extract(timeout_ms: u64) -> Self {
        BrowserRequest::Extract {
            cmd: "extract",
            timeout_ms,
        }
    }

    /// `steps` must already be resolved (no `value_env` left).
    pub fn authenticate(auth: &AuthConfig, steps: Vec<AuthStep>, timeout_ms: u64) -> Self {
        BrowserRequest::Authenticate {
            cmd: "authenticate",
            storage_state: auth.storage_state.as_ref().map(|p| p.display().to_string()),
            login_url: auth.login_url.clone(),
            steps,
            timeout_ms,
        }
    }

    pub fn quit() -> Self {
        BrowserRequest::Quit { cmd: "quit" }
    }
}

/// Response read from the browser server's stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
}

// ============================================================================
// Session
// ============================================================================

/// A persistent browser session backed by a Node.js/Playwright server.
///
/// The server keeps one page open between commands. Timeouts are enforced
/// by the engine through `timeout_ms` on each request.
pub struct BrowserSession {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    script: String,
    timeout_ms: u64,
    current_url: Option<String>,
    closed: bool,
}

impl BrowserSession {
    /// Spawn the server and wait for its ready signal.
    pub fn launch(config: &BrowserConfig) -> Result<Self, SessionError> {
        let script = config.script.display().to_string();
        debug!(node = %config.node, %script, "launching browser server");

        let mut child = Command::new(&config.node)
            .arg(&config.script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| SessionError::SubprocessSpawn {
                script: script.clone(),
                source: e,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SessionError::SessionIO(format!("failed to capture stdin of {script}")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SessionError::SessionIO(format!("failed to capture stdout of {script}")))?;

        let mut session = BrowserSession {
            child,
            stdin,
            reader: BufReader::new(stdout),
            script,
            timeout_ms: config.timeout_ms,
            current_url: None,
            closed: false,
        };

        let response = session.read_response("ready signal")?;
        if !response.ok || response.ready != Some(true) {
            return Err(SessionError::SessionProtocol {
                command: "launch".into(),
                error: response
                    .error
                    .unwrap_or_else(|| format!("no ready signal from {}", session.script)),
            });
        }

        info!(script = %session.script, "browser session ready");
        Ok(session)
    }

    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, SessionError> {
        let json = serde_json::to_string(request).map_err(|e| SessionError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{json}").map_err(|e| {
            SessionError::SessionIO(format!("failed to write to {}: {e}", self.script))
        })?;
        self.stdin.flush().map_err(|e| {
            SessionError::SessionIO(format!("failed to flush {}: {e}", self.script))
        })?;

        self.read_response("response")
    }

    fn read_response(&mut self, context: &str) -> Result<BrowserResponse, SessionError> {
        let mut line = String::new();
        self.reader.read_line(&mut line).map_err(|e| {
            SessionError::SessionIO(format!("failed to read {context} from {}: {e}", self.script))
        })?;

        if line.trim().is_empty() {
            return Err(SessionError::SessionIO(format!(
                "empty {context} from {} (process may have died)",
                self.script
            )));
        }

        serde_json::from_str(line.trim()).map_err(|e| SessionError::JsonParse {
            context: format!("{} {context}", self.script),
            source: e,
        })
    }

    fn send_ok(
        &mut self,
        request: &BrowserRequest,
        command: &str,
    ) -> Result<BrowserResponse, SessionError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(SessionError::SessionProtocol {
                command: command.into(),
                error: response.error.unwrap_or_else(|| "unknown error".into()),
            });
        }
        Ok(response)
    }

    /// Restore a saved session and/or run the login steps. Must happen before
    /// `navigate`; the server replaces its page when a storage state is given.
    pub fn authenticate(&mut self, auth: &AuthConfig) -> Result<(), SessionError> {
        let steps = auth.resolved_steps()?;
        let request = BrowserRequest::authenticate(auth, steps, self.timeout_ms);
        let response = self.send_ok(&request, "authenticate")?;
        info!(
            login_url = auth.login_url.as_deref().unwrap_or("-"),
            landed = response.url.as_deref().unwrap_or("-"),
            "browser session authenticated"
        );
        Ok(())
    }

    /// Navigate and wait for the page to load.
    pub fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        let response = self.send_ok(&BrowserRequest::navigate(url, self.timeout_ms), "navigate")?;
        self.current_url = Some(response.url.unwrap_or_else(|| url.to_string()));
        Ok(())
    }

    /// Capture the interactive surface of the current page.
    pub fn extract(&mut self) -> Result<CapturedPage, SessionError> {
        let response = self.send_ok(&BrowserRequest::extract(self.timeout_ms), "extract")?;
        let data = response.data.ok_or_else(|| SessionError::SessionProtocol {
            command: "extract".into(),
            error: "no data in extract response".into(),
        })?;
        serde_json::from_value(data).map_err(|e| SessionError::JsonParse {
            context: "extract data".into(),
            source: e,
        })
    }

    /// Navigate and extract. Any failure becomes an unavailable snapshot so
    /// the analyzer can still produce a (degraded) model.
    pub fn capture(&mut self, url: &str) -> DomSnapshot {
        match self.navigate(url).and_then(|_| self.extract()) {
            Ok(page) => {
                let landed = self.last_url().unwrap_or(url);
                debug!(url, landed, nodes = page.nodes.len(), "page captured");
                DomSnapshot::from_capture(page)
            }
            Err(e) => {
                warn!(url, error = %e, "page capture failed");
                DomSnapshot::unavailable(e.to_string())
            }
        }
    }

    /// Last URL the browser reported after navigation.
    pub fn last_url(&self) -> Option<&str> {
        self.current_url.as_deref()
    }

    /// Best-effort shutdown; the process may already be gone.
    pub fn quit(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        let _ = self.send(&BrowserRequest::quit());
        let _ = self.child.wait();
        debug!(script = %self.script, "browser session closed");
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.quit();
    }
}

/// Launch a session, log in if configured, capture one page, shut down. A
/// session that cannot start or authenticate yields an unavailable snapshot.
pub fn capture_page(config: &BrowserConfig, url: &str) -> DomSnapshot {
    let mut session = match BrowserSession::launch(config) {
        Ok(session) => session,
        Err(e) => {
            warn!(url, error = %e, "browser session unavailable");
            return DomSnapshot::unavailable(e.to_string());
        }
    };

    if let Some(auth) = config.auth.as_ref().filter(|a| !a.is_empty()) {
        if let Err(e) = session.authenticate(auth) {
            warn!(url, error = %e, "authentication before capture failed");
            return DomSnapshot::unavailable(e.to_string());
        }
    }

    session.capture(url)
}
