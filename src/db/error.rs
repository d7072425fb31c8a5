//! Errors raised while reading and writing match documents.
//!
//! Both the SQLite repository and the in-memory store report through
//! [`DbError`], so the scoring service sees one failure type per backend.

use derive_more::{Display, Error};
use tracing::instrument;

/// A match store failure, tagged with the source location that raised it.
#[derive(Debug, Clone, Display, Error)]
#[display("Match store error: {} at {}:{}", message, file, line)]
pub struct DbError {
    /// What went wrong, usually naming the match ID or query.
    pub message: String,
    /// Line that raised it.
    pub line: u32,
    /// File that raised it.
    pub file: &'static str,
}

impl DbError {
    /// Store failure raised at the caller's location.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(format!("SQLite query failed: {}", err))
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(format!("SQLite connection failed: {}", err))
    }
}

/// A stored document that no longer decodes into a `Match`.
impl From<serde_json::Error> for DbError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("Match document is not valid JSON for this schema: {}", err))
    }
}
