//! The cursor always points at a recorded frame.

use super::Invariant;
use crate::types::Match;

/// Invariant: a frame score exists for the current set and frame.
pub struct CurrentFrameTrackedInvariant;

impl Invariant<Match> for CurrentFrameTrackedInvariant {
    fn holds(m: &Match) -> bool {
        m.current_frame().is_some()
    }

    fn description() -> &'static str {
        "Current set and frame have a frame score"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::new_match;

    #[test]
    fn test_opening_frame_tracked() {
        assert!(CurrentFrameTrackedInvariant::holds(&new_match()));
    }

    #[test]
    fn test_untracked_frame_violates() {
        let mut m = new_match();
        m.current_mut().set_number = 2;
        assert!(!CurrentFrameTrackedInvariant::holds(&m));
    }
}
