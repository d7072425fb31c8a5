//! Rebuilding a match from its event history, and undo.

use crate::action::{EngineError, MatchEvent};
use crate::engine::apply_event;
use crate::stamp::FixedStamper;
use crate::types::{Match, MatchStatus};
use tracing::{info, instrument, warn};

/// Errors from strict replay and undo.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ReplayError {
    /// A recorded event no longer applies.
    #[display("Event {} ({}) rejected during replay: {}", index, event_id, error)]
    Rejected {
        /// Position in the history.
        index: usize,
        /// ID of the rejected event.
        event_id: String,
        /// Why it was rejected.
        error: EngineError,
    },

    /// Undo was requested on an empty history.
    #[display("No events to undo")]
    NothingToUndo,
}

impl std::error::Error for ReplayError {}

fn replay_one(acc: &Match, event: &MatchEvent) -> Result<Match, EngineError> {
    apply_event(acc, &event.data(), &FixedStamper::from_event(event))
}

fn keep_edit_metadata(mut rebuilt: Match, original: &Match) -> Match {
    rebuilt.touch(original.updated_by().clone(), *original.updated_at());
    rebuilt
}

/// Rebuilds a match by applying `events` to a fresh copy of `original`.
///
/// Events keep their recorded IDs and timestamps. An event that no longer
/// applies is logged and skipped, so histories written under older rules still
/// load. The edit metadata of `original` is kept.
#[instrument(skip(original, events), fields(match_id = %original.id(), events = events.len()))]
pub fn reconstruct_match_state(original: &Match, events: &[MatchEvent]) -> Match {
    let rebuilt = events
        .iter()
        .enumerate()
        .fold(original.restarted(), |acc, (index, event)| {
            match replay_one(&acc, event) {
                Ok(next) => next,
                Err(err) => {
                    warn!(index, event_id = %event.id, error = %err, "Skipping event during replay");
                    acc
                }
            }
        });
    keep_edit_metadata(rebuilt, original)
}

/// Like [`reconstruct_match_state`], but stops at the first event that fails.
///
/// # Errors
///
/// Returns [`ReplayError::Rejected`] naming the first rejected event.
#[instrument(skip(original, events), fields(match_id = %original.id(), events = events.len()))]
pub fn replay_strict(original: &Match, events: &[MatchEvent]) -> Result<Match, ReplayError> {
    let rebuilt = events
        .iter()
        .enumerate()
        .try_fold(original.restarted(), |acc, (index, event)| {
            replay_one(&acc, event).map_err(|error| ReplayError::Rejected {
                index,
                event_id: event.id.clone(),
                error,
            })
        })?;
    Ok(keep_edit_metadata(rebuilt, original))
}

/// Removes the newest event by replaying every earlier one.
///
/// Status after undo: an abandoned match stays abandoned, a replay that ends
/// the match is completed, a match that had started stays live, and an
/// untouched match takes whatever the replay produced.
///
/// # Errors
///
/// Returns [`ReplayError::NothingToUndo`] when the history is empty.
#[instrument(skip(m), fields(match_id = %m.id()))]
pub fn undo_last_event(m: &Match) -> Result<Match, ReplayError> {
    let Some((last, earlier)) = m.history().split_last() else {
        return Err(ReplayError::NothingToUndo);
    };

    let mut rebuilt = reconstruct_match_state(m, earlier);
    let status = match (*m.status(), *rebuilt.status()) {
        (MatchStatus::Abandoned, _) => MatchStatus::Abandoned,
        (_, MatchStatus::Completed) => MatchStatus::Completed,
        (original, _) if original != MatchStatus::Scheduled => MatchStatus::Live,
        (_, replayed) => replayed,
    };
    rebuilt.set_status(status);
    info!(undone = %last.id, action = %last.action, remaining = earlier.len(), "Undid event");
    Ok(rebuilt)
}
