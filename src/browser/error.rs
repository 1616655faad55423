use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Node.js could not start the browser server.
    #[error("failed to spawn {script} (is Node.js installed?): {source}")]
    SubprocessSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// Pipe to or from the browser server broke.
    #[error("browser session I/O failed: {0}")]
    SessionIO(String),

    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured login could not be prepared.
    #[error("authentication setup failed: {0}")]
    AuthSetup(String),

    /// The server answered `ok: false` or an unexpected shape.
    #[error("browser command '{command}' failed: {error}")]
    SessionProtocol { command: String, error: String },
}
