use thiserror::Error;

/// Raised while turning terms, filters and sorts into AQL text.
///
/// Compilation happens before anything is sent to the database, so any of
/// these aborts the whole builder call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileError {
    #[error("unrecognised search operator: {0}")]
    UnrecognizedOperator(String),

    #[error("invalid search terms: {0}")]
    InvalidTerms(String),

    #[error("invalid filter mode: {0} (expected AND or OR)")]
    InvalidMode(String),
}

/// Errors surfaced by the count/find/search builders.
///
/// `DE` is the database client's own error type; it is carried unmodified.
#[derive(Debug, Error)]
pub enum SearchError<DE> {
    #[error("query compilation failed: {0}")]
    Compile(#[from] CompileError),

    #[error("failed to decode query result: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("database query failed: {0}")]
    Db(DE),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid search config: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CompileError {
    #[inline]
    pub fn invalid_terms(msg: impl Into<String>) -> Self {
        CompileError::InvalidTerms(msg.into())
    }
}
