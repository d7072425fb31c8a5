//! Scoring service: authorisation, persistence and the engine, wired together.

use crate::auth::Principal;
use crate::db::DbError;
use crate::store::MatchStore;
use derive_getters::Getters;
use derive_more::{Display, From};
use derive_new::new;
use snooker_engine::{
    ApplyResult, EngineError, EventStamper, Match, MatchEventData, MatchFormat, MatchPlayer,
    MatchStatus, PlayerMatchStats, ReplayError, SystemStamper, apply_event, undo_last_event,
};
use std::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Errors surfaced by [`ScoringService`].
#[derive(Debug, Display, From)]
pub enum ServiceError {
    /// No match with that ID.
    #[display("Match not found: {}", _0)]
    #[from(ignore)]
    NotFound(String),

    /// The principal lacks the scorer or admin role.
    #[display("User {} is not allowed to {}", user, operation)]
    #[from(ignore)]
    Unauthorized {
        /// Offending user.
        user: String,
        /// What they tried to do.
        operation: &'static str,
    },

    /// Events are refused once a match is abandoned.
    #[display("Match {} is abandoned", _0)]
    #[from(ignore)]
    Abandoned(String),

    /// Events are refused once a match is completed; undo reopens it.
    #[display("Match {} is completed", _0)]
    #[from(ignore)]
    Completed(String),

    /// The player is not in the match.
    #[display("Player {} is not in match {}", player_id, match_id)]
    #[from(ignore)]
    UnknownPlayer {
        /// Match searched.
        match_id: String,
        /// Player requested.
        player_id: String,
    },

    /// Storage failure.
    #[display("{}", _0)]
    Db(DbError),

    /// Invalid match setup.
    #[display("{}", _0)]
    Engine(EngineError),

    /// Undo or replay failure.
    #[display("{}", _0)]
    Replay(ReplayError),
}

impl std::error::Error for ServiceError {}

/// What is needed to schedule a match.
#[derive(Debug, Clone, new, Getters)]
pub struct NewMatch {
    /// The two players; the first breaks off.
    players: [MatchPlayer; 2],
    /// Format, or the service default.
    format: Option<MatchFormat>,
    /// Venue.
    venue: Option<String>,
    /// Referee.
    referee: Option<String>,
}

/// Applies scoring operations to stored matches on behalf of a principal.
///
/// Read-modify-write cycles are serialised so two events for a match never
/// interleave.
#[derive(Debug)]
pub struct ScoringService<S, C = SystemStamper> {
    store: S,
    stamper: C,
    default_format: MatchFormat,
    write_lock: Mutex<()>,
}

impl<S: MatchStore> ScoringService<S, SystemStamper> {
    /// Service using the wall clock and random IDs.
    pub fn new(store: S, default_format: MatchFormat) -> Self {
        Self::with_stamper(store, SystemStamper, default_format)
    }
}

impl<S: MatchStore, C: EventStamper> ScoringService<S, C> {
    /// Service with an explicit stamper.
    pub fn with_stamper(store: S, stamper: C, default_format: MatchFormat) -> Self {
        info!(?default_format, "Creating ScoringService");
        Self {
            store,
            stamper,
            default_format,
            write_lock: Mutex::new(()),
        }
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn authorize(&self, principal: &Principal, operation: &'static str) -> Result<(), ServiceError> {
        if principal.can_score() {
            Ok(())
        } else {
            warn!(user = %principal.user_id(), operation, "Unauthorized");
            Err(ServiceError::Unauthorized {
                user: principal.user_id().to_string(),
                operation,
            })
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, ServiceError> {
        self.write_lock
            .lock()
            .map_err(|e| ServiceError::Db(DbError::new(format!("Write lock poisoned: {}", e))))
    }

    fn load(&self, match_id: &str) -> Result<Match, ServiceError> {
        self.store
            .get(match_id)?
            .ok_or_else(|| ServiceError::NotFound(match_id.to_string()))
    }

    /// Schedules a new match.
    ///
    /// # Errors
    ///
    /// Unauthorized principal, duplicate player IDs, or a storage failure.
    #[instrument(skip(self, principal, request), fields(user = %principal.user_id()))]
    pub fn create_match(&self, principal: &Principal, request: NewMatch) -> Result<Match, ServiceError> {
        self.authorize(principal, "create matches")?;
        let format = request.format.unwrap_or(self.default_format);
        let m = Match::new(
            self.stamper.next_id(),
            request.players,
            format,
            principal.user_id(),
            self.stamper.now(),
        )?
        .with_venue(request.venue)
        .with_referee(request.referee);

        self.store.insert(&m)?;
        info!(match_id = %m.id(), "Match created");
        Ok(m)
    }

    /// Marks a scheduled match live.
    ///
    /// # Errors
    ///
    /// Unauthorized principal, unknown or abandoned match, or a storage failure.
    #[instrument(skip(self, principal), fields(user = %principal.user_id()))]
    pub fn start_match(&self, principal: &Principal, match_id: &str) -> Result<Match, ServiceError> {
        self.authorize(principal, "start matches")?;
        let _guard = self.lock()?;
        let mut m = self.load(match_id)?;
        if *m.status() == MatchStatus::Abandoned {
            return Err(ServiceError::Abandoned(match_id.to_string()));
        }
        m.start(principal.user_id(), self.stamper.now());
        self.store.update(&m)?;
        Ok(m)
    }

    /// Submits a scoring event.
    ///
    /// Rule rejections come back as an invalid [`ApplyResult`] and nothing is
    /// stored. Accepted events are stored with the principal as `updatedBy`.
    ///
    /// # Errors
    ///
    /// Unauthorized principal, unknown, abandoned or completed match, or a
    /// storage failure.
    #[instrument(skip(self, principal, event), fields(user = %principal.user_id(), action = %event.action))]
    pub fn apply_event(
        &self,
        principal: &Principal,
        match_id: &str,
        event: &MatchEventData,
    ) -> Result<ApplyResult, ServiceError> {
        self.authorize(principal, "score matches")?;
        let _guard = self.lock()?;
        let m = self.load(match_id)?;
        match m.status() {
            MatchStatus::Abandoned => return Err(ServiceError::Abandoned(match_id.to_string())),
            MatchStatus::Completed => return Err(ServiceError::Completed(match_id.to_string())),
            MatchStatus::Scheduled | MatchStatus::Live => {}
        }

        match apply_event(&m, event, &self.stamper) {
            Ok(mut next) => {
                let at = *next.updated_at();
                next.touch(principal.user_id(), at);
                self.store.update(&next)?;
                debug!(events = next.history().len(), status = %next.status(), "Event stored");
                Ok(ApplyResult::accepted(next))
            }
            Err(err) => {
                warn!(error = %err, "Event rejected");
                Ok(ApplyResult::rejected(m, &err))
            }
        }
    }

    /// Removes the newest event.
    ///
    /// # Errors
    ///
    /// Unauthorized principal, unknown match, empty history, or a storage failure.
    #[instrument(skip(self, principal), fields(user = %principal.user_id()))]
    pub fn undo_last_event(&self, principal: &Principal, match_id: &str) -> Result<Match, ServiceError> {
        self.authorize(principal, "undo events")?;
        let _guard = self.lock()?;
        let m = self.load(match_id)?;
        let mut undone = undo_last_event(&m)?;
        undone.touch(principal.user_id(), self.stamper.now());
        self.store.update(&undone)?;
        info!(events = undone.history().len(), "Last event undone");
        Ok(undone)
    }

    /// Stops a match. Scores and history are kept.
    ///
    /// # Errors
    ///
    /// Unauthorized principal, unknown match, or a storage failure.
    #[instrument(skip(self, principal), fields(user = %principal.user_id()))]
    pub fn abandon_match(&self, principal: &Principal, match_id: &str) -> Result<Match, ServiceError> {
        self.authorize(principal, "abandon matches")?;
        let _guard = self.lock()?;
        let mut m = self.load(match_id)?;
        m.abandon(principal.user_id(), self.stamper.now());
        self.store.update(&m)?;
        info!("Match abandoned");
        Ok(m)
    }

    /// Loads a match.
    ///
    /// # Errors
    ///
    /// Unknown match or a storage failure.
    #[instrument(skip(self))]
    pub fn get_match(&self, match_id: &str) -> Result<Match, ServiceError> {
        self.load(match_id)
    }

    /// Matches currently being scored.
    ///
    /// # Errors
    ///
    /// Storage failure.
    #[instrument(skip(self))]
    pub fn live_matches(&self) -> Result<Vec<Match>, ServiceError> {
        Ok(self.store.list_by_status(MatchStatus::Live)?)
    }

    /// A player's figures for one match.
    ///
    /// # Errors
    ///
    /// Unknown match, player not in the match, or a storage failure.
    #[instrument(skip(self))]
    pub fn player_stats(&self, match_id: &str, player_id: &str) -> Result<PlayerMatchStats, ServiceError> {
        let m = self.load(match_id)?;
        PlayerMatchStats::from_match(&m, player_id).ok_or_else(|| ServiceError::UnknownPlayer {
            match_id: match_id.to_string(),
            player_id: player_id.to_string(),
        })
    }
}
