/// Convenience result type used across gridpaste.
pub type PasteResult<T> = Result<T, PasteError>;

/// Error type for placement validation, scheduling contracts and I/O glue.
#[derive(thiserror::Error, Debug)]
pub enum PasteError {
    /// The placement does not fit the source or destination grid.
    ///
    /// Raised during demand propagation, before any partition work is dispatched.
    #[error("invalid placement: {0}")]
    InvalidPlacement(String),

    /// A caller broke a contract (partition outside the requested region, overlapping
    /// partitions, mismatched copy regions). Never retried.
    #[error("precondition violated: {0}")]
    Precondition(String),

    /// Malformed construction input (buffer length, zero dimensionality, options).
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration could not be parsed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Errors bubbled up from storage or I/O collaborators, kept as-is.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PasteError {
    pub fn invalid_placement(msg: impl Into<String>) -> Self {
        Self::InvalidPlacement(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for the two contract-level kinds that abort an invocation outright.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::InvalidPlacement(_) | Self::Precondition(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
