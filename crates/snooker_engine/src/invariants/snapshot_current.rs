//! The newest history entry describes the live state.

use super::Invariant;
use crate::types::Match;

/// Invariant: the last event's snapshot equals the current state.
pub struct SnapshotMatchesCurrentInvariant;

impl Invariant<Match> for SnapshotMatchesCurrentInvariant {
    fn holds(m: &Match) -> bool {
        m.history()
            .last()
            .is_none_or(|event| event.state_snapshot == *m.current())
    }

    fn description() -> &'static str {
        "Last event snapshot matches current state"
    }
}
