//! Snooker match scoring rules engine.
//!
//! Pure functions over an immutable [`Match`] value: validate a scoring event,
//! apply it, advance frames, sets and the match, and rebuild state from the
//! event history. No I/O; callers supply time and IDs through an
//! [`EventStamper`].
//!
//! ```
//! use snooker_engine::{apply_event, Ball, Match, MatchEventData, MatchFormat, MatchPlayer, SystemStamper};
//!
//! let players = [MatchPlayer::new("p1", "Ronnie"), MatchPlayer::new("p2", "Judd")];
//! let m = Match::new("m1", players, MatchFormat::frames(3)?, "scorer", chrono::Utc::now())?;
//! let m = apply_event(&m, &MatchEventData::pot(Ball::Red), &SystemStamper)?;
//! assert_eq!(m.current().points_on_table, 146);
//! # Ok::<(), snooker_engine::EngineError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod ball;
pub mod contracts;
mod engine;
pub mod invariants;
mod progression;
mod replay;
pub mod rules;
mod stamp;
mod stats;
mod types;

#[cfg(test)]
mod testing;

pub use action::{Action, EngineError, MatchEvent, MatchEventData};
pub use ball::{Ball, COLORS_ORDER};
pub use contracts::{Contract, EventContract, LegalEvent};
pub use engine::{apply, apply_event, apply_raw, ApplyResult};
pub use invariants::{Invariant, InvariantSet, InvariantViolation, MatchInvariants};
pub use progression::{derive_match_winner, is_match_complete, is_set_complete};
pub use replay::{reconstruct_match_state, replay_strict, undo_last_event, ReplayError};
pub use rules::{
    ball_value, foul_value, highest_value_on_table, is_snooker_required, is_valid_ball_sequence,
    next_color_in_order, points_on_table, should_respot_black,
};
pub use stamp::{EventStamper, FixedStamper, SequentialStamper, SystemStamper};
pub use stats::{breaks_for, match_stats, PlayerMatchStats};
pub use types::{
    FrameScore, Match, MatchFormat, MatchPlayer, MatchScore, MatchState, MatchStatus,
    MatchTotals, PlayerId, SetScore, Slot,
};
