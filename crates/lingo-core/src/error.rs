use thiserror::Error;

/// Top-level error type for lingo.
#[derive(Debug, Error)]
pub enum LingoError {
    /// The catalog document is not well-formed markup, or not a TS document at all.
    #[error("malformed catalog: {0}")]
    MalformedCatalog(String),

    /// The document parsed, but a required field or structural rule is violated.
    #[error("schema violation: {0}")]
    SchemaViolation(String),

    /// No catalog could be found for the requested locale.
    #[error("locale not found: {0}")]
    LocaleNotFound(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LingoError {
    /// Whether this error came from the catalog document itself rather than
    /// from the environment (missing files, bad config).
    pub fn is_catalog_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedCatalog(_) | Self::SchemaViolation(_)
        )
    }
}
