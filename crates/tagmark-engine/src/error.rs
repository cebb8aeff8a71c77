use thiserror::Error;

/// Errors reported by engine operations.
///
/// Every variant is raised before any mutation, so a failed call leaves the
/// document untouched.
#[derive(Debug, Error)]
pub enum EditorError {
    /// No importer/exporter for a format, an unknown class name, or a
    /// missing collaborator such as the markdown converter.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("not implemented: {0}")]
    Unsupported(String),

    #[error("no source provided for image")]
    MissingSource,

    #[error("position {line}:{ch} is outside the document")]
    InvalidPosition { line: usize, ch: usize },

    #[error("malformed document state: {0}")]
    State(#[from] serde_json::Error),
}

pub type Result<T, E = EditorError> = std::result::Result<T, E>;
