use thiserror::Error;

/// The page as a whole could not be captured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    /// Navigation or extraction failed; carries the engine's reason.
    #[error("snapshot unavailable: {0}")]
    Unavailable(String),
}

/// A single node could not be read. Never fatal for the page.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("node {index} is malformed: {source}")]
    Malformed {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("node {index} has no tag name")]
    MissingTag { index: usize },

    #[error("node {index} is out of range")]
    OutOfRange { index: usize },
}
