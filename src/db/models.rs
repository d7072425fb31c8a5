//! Row types for the `matches` table.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use snooker_engine::{Match, MatchStatus};
use tracing::instrument;

use crate::db::{DbError, schema};

/// A stored match: the JSON document plus columns for filtering.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::matches)]
pub struct MatchRecord {
    id: String,
    status: String,
    document: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl MatchRecord {
    /// Decodes the stored document.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the document is not a valid match.
    #[instrument(skip(self), fields(match_id = %self.id))]
    pub fn to_match(&self) -> Result<Match, DbError> {
        Ok(serde_json::from_str(&self.document)?)
    }

    /// Parses the status column.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] for an unrecognised status string.
    #[instrument(skip(self), fields(status = %self.status))]
    pub fn parse_status(&self) -> Result<MatchStatus, DbError> {
        self.status
            .parse()
            .map_err(|_| DbError::new(format!("Invalid match status: {}", self.status)))
    }
}

/// Insertable form of a match.
#[derive(Debug, Clone, Insertable, AsChangeset, new, Getters)]
#[diesel(table_name = schema::matches)]
pub struct NewMatchRecord {
    id: String,
    status: String,
    document: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl NewMatchRecord {
    /// Encodes a match for storage.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if serialization fails.
    #[instrument(skip(m), fields(match_id = %m.id()))]
    pub fn from_match(m: &Match) -> Result<Self, DbError> {
        Ok(Self::new(
            m.id().clone(),
            m.status().to_string(),
            serde_json::to_string(m)?,
            m.created_at().naive_utc(),
            m.updated_at().naive_utc(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use snooker_engine::{MatchFormat, MatchPlayer};

    #[test]
    fn test_record_encodes_status_and_document() {
        let players = [MatchPlayer::new("a", "A"), MatchPlayer::new("b", "B")];
        let m = Match::new("m1", players, MatchFormat::default(), "admin", Utc::now()).unwrap();
        let record = NewMatchRecord::from_match(&m).unwrap();
        assert_eq!(record.status(), "scheduled");
        assert!(record.document().contains("\"activePlayerId\":\"a\""));
    }

    #[test]
    fn test_document_with_zero_format_rejected() {
        let players = [MatchPlayer::new("a", "A"), MatchPlayer::new("b", "B")];
        let m = Match::new("m1", players, MatchFormat::default(), "admin", Utc::now()).unwrap();
        let row = NewMatchRecord::from_match(&m).unwrap();
        let record = MatchRecord {
            id: row.id().clone(),
            status: row.status().clone(),
            document: row.document().replace("\"bestOfSets\":1", "\"bestOfSets\":0"),
            created_at: *row.created_at(),
            updated_at: *row.updated_at(),
        };

        let err = record.to_match().unwrap_err();
        assert!(err.to_string().starts_with("Match store error: Match document"));
        assert!(err.message.contains("best-of count must be at least 1"));
    }
}
