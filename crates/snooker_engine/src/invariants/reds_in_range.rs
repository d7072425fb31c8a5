//! Table counters stay within the rack.

use super::Invariant;
use crate::ball::COLORS_ORDER;
use crate::rules::INITIAL_REDS;
use crate::types::Match;

/// Invariant: at most 15 reds remain and the colour index never passes the black.
pub struct RedsInRangeInvariant;

impl Invariant<Match> for RedsInRangeInvariant {
    fn holds(m: &Match) -> bool {
        let state = m.current();
        state.reds_remaining <= INITIAL_REDS
            && usize::from(state.colors_order_index) <= COLORS_ORDER.len()
    }

    fn description() -> &'static str {
        "Reds remaining within 0..=15 and colour index within 0..=6"
    }
}
