//! Error type for transformer operations.
//!
//! None of these are fatal to the host. Callers log them and keep the last
//! valid geometry.

/// Errors raised by the transformer.
#[derive(Debug, thiserror::Error)]
pub enum TransformerError {
    #[error("unknown anchor name: {0}")]
    UnknownAnchor(String),
    #[error("transformer is not attached to a node")]
    NotAttached,
    #[error("non-finite {field} in target geometry")]
    NonFiniteGeometry { field: &'static str },
    #[error("invalid transformer config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

impl TransformerError {
    /// Stable machine-readable code for the host's warning channel.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAnchor(_) => "E_UNKNOWN_ANCHOR",
            Self::NotAttached => "E_NOT_ATTACHED",
            Self::NonFiniteGeometry { .. } => "E_NON_FINITE_GEOMETRY",
            Self::InvalidConfig(_) => "E_INVALID_CONFIG",
        }
    }
}
