use thiserror::Error;

/// Contract violations of the generators. Every other condition degrades.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// The page model breaks an invariant the generators rely on.
    #[error("invalid page model: {0}")]
    InvalidModel(String),

    /// The test plan was not generated from this model.
    #[error("test plan does not match the page model: {0}")]
    PlanMismatch(String),

    #[error("failed to serialize fixtures: {0}")]
    Fixtures(String),
}
