//! Storage seam for the scoring service.

use crate::db::{DbError, MatchRepository};
use snooker_engine::{Match, MatchStatus};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

/// Where the scoring service keeps match documents.
pub trait MatchStore {
    /// Loads a match. `None` when the ID is unknown.
    fn get(&self, id: &str) -> Result<Option<Match>, DbError>;

    /// Stores a new match.
    fn insert(&self, m: &Match) -> Result<(), DbError>;

    /// Replaces an existing match.
    fn update(&self, m: &Match) -> Result<(), DbError>;

    /// Matches in the given status.
    fn list_by_status(&self, status: MatchStatus) -> Result<Vec<Match>, DbError>;
}

impl MatchStore for MatchRepository {
    fn get(&self, id: &str) -> Result<Option<Match>, DbError> {
        MatchRepository::get(self, id)
    }

    fn insert(&self, m: &Match) -> Result<(), DbError> {
        MatchRepository::insert(self, m).map(|_| ())
    }

    fn update(&self, m: &Match) -> Result<(), DbError> {
        MatchRepository::update(self, m)
    }

    fn list_by_status(&self, status: MatchStatus) -> Result<Vec<Match>, DbError> {
        MatchRepository::list_by_status(self, status)
    }
}

/// Process-local store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMatchStore {
    matches: Arc<Mutex<HashMap<String, Match>>>,
}

impl InMemoryMatchStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Match>>, DbError> {
        self.matches
            .lock()
            .map_err(|e| DbError::new(format!("Store lock poisoned: {}", e)))
    }
}

impl MatchStore for InMemoryMatchStore {
    fn get(&self, id: &str) -> Result<Option<Match>, DbError> {
        Ok(self.lock()?.get(id).cloned())
    }

    #[instrument(skip(self, m), fields(match_id = %m.id()))]
    fn insert(&self, m: &Match) -> Result<(), DbError> {
        let mut matches = self.lock()?;
        if matches.contains_key(m.id()) {
            return Err(DbError::new(format!("Match already exists: {}", m.id())));
        }
        matches.insert(m.id().clone(), m.clone());
        debug!("Match stored in memory");
        Ok(())
    }

    fn update(&self, m: &Match) -> Result<(), DbError> {
        let mut matches = self.lock()?;
        match matches.get_mut(m.id()) {
            Some(slot) => {
                *slot = m.clone();
                Ok(())
            }
            None => Err(DbError::new(format!("Match not found: {}", m.id()))),
        }
    }

    fn list_by_status(&self, status: MatchStatus) -> Result<Vec<Match>, DbError> {
        let mut found: Vec<Match> = self
            .lock()?
            .values()
            .filter(|m| *m.status() == status)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.updated_at().cmp(a.updated_at()));
        Ok(found)
    }
}
