//! The colours phase starts exactly when the reds run out.

use super::Invariant;
use crate::types::Match;

/// Invariant: `colors_phase` is true if and only if no reds remain.
pub struct ColorsPhaseMatchesRedsInvariant;

impl Invariant<Match> for ColorsPhaseMatchesRedsInvariant {
    fn holds(m: &Match) -> bool {
        let state = m.current();
        state.colors_phase == (state.reds_remaining == 0)
    }

    fn description() -> &'static str {
        "Colours phase is active exactly when no reds remain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::new_match;

    #[test]
    fn test_red_phase_holds() {
        assert!(ColorsPhaseMatchesRedsInvariant::holds(&new_match()));
    }

    #[test]
    fn test_colors_with_reds_left_violates() {
        let mut m = new_match();
        m.current_mut().colors_phase = true;
        assert!(!ColorsPhaseMatchesRedsInvariant::holds(&m));
    }
}
