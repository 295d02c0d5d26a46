use thiserror::Error;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum Rejection {
    #[error("group key could not be derived: {0}")]
    GroupKey(String),
    #[error("entries could not be compared: {0}")]
    Compare(String),
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum Termination {
    #[error("stream completed")]
    Completed,
    #[error("stream failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum AdapterError {
    /// The event was dropped and nothing was applied.
    #[error("event dropped: {0}")]
    Malformed(#[from] Rejection),
    #[error("adapter no longer accepts events ({0})")]
    Terminated(Termination),
}

impl AdapterError {
    pub fn is_terminal(&self) -> bool {
        matches!(self, AdapterError::Terminated(_))
    }
}
