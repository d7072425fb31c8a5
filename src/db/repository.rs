//! Diesel repository for match documents.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use snooker_engine::{Match, MatchStatus};
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, MatchRecord, NewMatchRecord, schema};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// SQLite repository holding one row per match.
#[derive(Debug, Clone)]
pub struct MatchRepository {
    db_path: String,
}

impl MatchRepository {
    /// Creates a repository for the database file at `db_path`.
    ///
    /// Every operation opens its own connection, so `":memory:"` does not
    /// persist between calls; use a file path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new("Database path is empty"));
        }
        info!(path = %db_path, "Creating MatchRepository");
        Ok(Self { db_path })
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    /// Stores a new match.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the ID already exists or a database error occurs.
    #[instrument(skip(self, m), fields(match_id = %m.id()))]
    pub fn insert(&self, m: &Match) -> Result<MatchRecord, DbError> {
        let mut conn = self.connection()?;
        let row = NewMatchRecord::from_match(m)?;

        let record = diesel::insert_into(schema::matches::table)
            .values(&row)
            .returning(MatchRecord::as_returning())
            .get_result(&mut conn)?;

        info!(status = %record.status(), "Match stored");
        Ok(record)
    }

    /// Replaces the stored document of an existing match.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the match does not exist or a database error occurs.
    #[instrument(skip(self, m), fields(match_id = %m.id(), status = %m.status()))]
    pub fn update(&self, m: &Match) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let row = NewMatchRecord::from_match(m)?;

        let changed = diesel::update(schema::matches::table.find(m.id()))
            .set(&row)
            .execute(&mut conn)?;

        if changed == 0 {
            warn!("Update matched no rows");
            return Err(DbError::new(format!("Match not found: {}", m.id())));
        }
        debug!(history = m.history().len(), "Match updated");
        Ok(())
    }

    /// Gets a match by ID. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs or the document is corrupt.
    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> Result<Option<Match>, DbError> {
        let mut conn = self.connection()?;

        let record = schema::matches::table
            .find(id)
            .select(MatchRecord::as_select())
            .first(&mut conn)
            .optional()?;

        match record {
            Some(r) => Ok(Some(r.to_match()?)),
            None => {
                debug!("Match not found");
                Ok(None)
            }
        }
    }

    /// Lists matches with the given status, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs or a document is corrupt.
    #[instrument(skip(self))]
    pub fn list_by_status(&self, status: MatchStatus) -> Result<Vec<Match>, DbError> {
        let mut conn = self.connection()?;

        let records = schema::matches::table
            .filter(schema::matches::status.eq(status.to_string()))
            .order(schema::matches::updated_at.desc())
            .select(MatchRecord::as_select())
            .load(&mut conn)?;

        info!(count = records.len(), "Matches loaded");
        records.iter().map(MatchRecord::to_match).collect()
    }
}
