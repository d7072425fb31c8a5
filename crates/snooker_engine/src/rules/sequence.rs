//! Ball-on validation.

use crate::ball::{Ball, COLORS_ORDER};
use tracing::instrument;

/// Decides whether `ball` is legal to pot next.
///
/// - A free ball makes any ball the ball on.
/// - In the colours phase the colours go in strict order, except directly after
///   the last red when any colour may be taken.
/// - In the red phase reds and colours alternate within a break, and a break
///   always opens on a red.
#[instrument(level = "trace")]
pub fn is_valid_ball_sequence(
    ball: Ball,
    reds_remaining: u8,
    colors_phase: bool,
    colors_order_index: u8,
    freeball_active: bool,
    last_ball_potted: Option<Ball>,
) -> bool {
    if freeball_active {
        return true;
    }

    if colors_phase {
        if last_ball_potted == Some(Ball::Red) {
            return ball.is_color();
        }
        return COLORS_ORDER.get(usize::from(colors_order_index)) == Some(&ball);
    }

    if reds_remaining > 0 {
        return match last_ball_potted {
            Some(Ball::Red) => ball.is_color(),
            _ => ball.is_red(),
        };
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_break_opens_on_red() {
        assert!(is_valid_ball_sequence(Ball::Red, 15, false, 0, false, None));
        assert!(!is_valid_ball_sequence(Ball::Black, 15, false, 0, false, None));
    }

    #[test]
    fn test_color_follows_red() {
        assert!(is_valid_ball_sequence(Ball::Black, 14, false, 0, false, Some(Ball::Red)));
        assert!(is_valid_ball_sequence(Ball::Yellow, 14, false, 0, false, Some(Ball::Red)));
        assert!(!is_valid_ball_sequence(Ball::Red, 14, false, 0, false, Some(Ball::Red)));
    }

    #[test]
    fn test_red_follows_color() {
        assert!(is_valid_ball_sequence(Ball::Red, 14, false, 0, false, Some(Ball::Pink)));
        assert!(!is_valid_ball_sequence(Ball::Pink, 14, false, 0, false, Some(Ball::Pink)));
    }

    #[test]
    fn test_free_ball_allows_anything() {
        assert!(is_valid_ball_sequence(Ball::Black, 15, false, 0, true, None));
        assert!(is_valid_ball_sequence(Ball::Yellow, 15, false, 0, true, None));
        assert!(is_valid_ball_sequence(Ball::Green, 0, true, 0, true, None));
    }

    #[test]
    fn test_colors_in_strict_order() {
        assert!(is_valid_ball_sequence(Ball::Yellow, 0, true, 0, false, None));
        assert!(!is_valid_ball_sequence(Ball::Green, 0, true, 0, false, None));
        assert!(is_valid_ball_sequence(Ball::Green, 0, true, 1, false, None));
        assert!(is_valid_ball_sequence(Ball::Black, 0, true, 5, false, None));
    }

    #[test]
    fn test_nothing_on_after_last_color() {
        assert!(!is_valid_ball_sequence(Ball::Black, 0, true, 6, false, None));
    }

    #[test]
    fn test_any_color_after_last_red() {
        assert!(is_valid_ball_sequence(Ball::Black, 0, true, 0, false, Some(Ball::Red)));
        assert!(is_valid_ball_sequence(Ball::Green, 0, true, 0, false, Some(Ball::Red)));
        assert!(!is_valid_ball_sequence(Ball::Red, 0, true, 0, false, Some(Ball::Red)));
    }
}
