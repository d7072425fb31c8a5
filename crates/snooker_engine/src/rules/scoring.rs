//! Point values, foul penalties and points-on-table arithmetic.

use crate::ball::{Ball, COLORS_ORDER};
use tracing::instrument;

/// Reds racked at the start of every frame.
pub const INITIAL_REDS: u8 = 15;

/// A foul always costs at least this many points.
pub const MIN_FOUL_POINTS: u32 = 4;

/// Sum of the six colour values (2 + 3 + 4 + 5 + 6 + 7).
pub const COLORS_TOTAL: u32 = 27;

/// Highest break possible without a free ball: fifteen red/black pairs then the colours.
pub const MAXIMUM_BREAK: u32 = INITIAL_REDS as u32 * 8 + COLORS_TOTAL;

/// Point value of a ball.
#[instrument(level = "trace")]
pub fn ball_value(ball: Ball) -> u32 {
    ball.value()
}

/// Penalty awarded to the non-offending player.
///
/// The value of the ball involved, never less than [`MIN_FOUL_POINTS`].
#[instrument(level = "trace")]
pub fn foul_value(ball: Option<Ball>) -> u32 {
    ball.map_or(MIN_FOUL_POINTS, |b| b.value().max(MIN_FOUL_POINTS))
}

/// Maximum points a player could still add from the current table position.
///
/// In the red phase every remaining red can be followed by the black (8 each) and
/// then all six colours are taken. While the player is on a colour after potting a
/// red the black is still available on top, hence the extra 7. The same holds in
/// the colours phase directly after the last red, before the free-choice colour.
#[instrument(level = "trace")]
pub fn points_on_table(
    reds_remaining: u8,
    colors_phase: bool,
    colors_order_index: u8,
    last_ball_potted: Option<Ball>,
) -> u32 {
    let on_color_after_red = if last_ball_potted == Some(Ball::Red) {
        Ball::Black.value()
    } else {
        0
    };

    if !colors_phase {
        return u32::from(reds_remaining) * 8 + COLORS_TOTAL + on_color_after_red;
    }

    let remaining: u32 = COLORS_ORDER
        .iter()
        .skip(usize::from(colors_order_index))
        .map(|b| b.value())
        .sum();

    if remaining == 0 {
        0
    } else {
        remaining + on_color_after_red
    }
}

/// Returns true when the player cannot win the frame on points alone, even by
/// clearing the table.
#[instrument(level = "trace")]
pub fn is_snooker_required(player_points: u32, opponent_points: u32, points_on_table: u32) -> bool {
    player_points + points_on_table <= opponent_points
}

/// A frame level on points is settled on a respotted black.
#[instrument(level = "trace")]
pub fn should_respot_black(p1_points: u32, p2_points: u32) -> bool {
    p1_points == p2_points
}

/// Value of the most valuable ball still in play.
#[instrument(level = "trace")]
pub fn highest_value_on_table(reds_remaining: u8, colors_phase: bool, colors_order_index: u8) -> u32 {
    if !colors_phase && reds_remaining > 0 {
        return Ball::Black.value();
    }
    if colors_phase && usize::from(colors_order_index) < COLORS_ORDER.len() {
        return Ball::Black.value();
    }
    0
}

/// The colour that follows the one at `current_index`, if any.
#[instrument(level = "trace")]
pub fn next_color_in_order(current_index: u8) -> Option<Ball> {
    COLORS_ORDER.get(usize::from(current_index) + 1).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foul_value_minimum_is_four() {
        assert_eq!(foul_value(None), 4);
        assert_eq!(foul_value(Some(Ball::Red)), 4);
        assert_eq!(foul_value(Some(Ball::Yellow)), 4);
        assert_eq!(foul_value(Some(Ball::Green)), 4);
        assert_eq!(foul_value(Some(Ball::Brown)), 4);
    }

    #[test]
    fn test_foul_value_high_balls_use_own_value() {
        assert_eq!(foul_value(Some(Ball::Blue)), 5);
        assert_eq!(foul_value(Some(Ball::Pink)), 6);
        assert_eq!(foul_value(Some(Ball::Black)), 7);
    }

    #[test]
    fn test_points_on_table_full_rack() {
        assert_eq!(points_on_table(15, false, 0, None), 147);
        assert_eq!(points_on_table(15, false, 0, None), MAXIMUM_BREAK);
    }

    #[test]
    fn test_points_on_table_on_color_after_red() {
        assert_eq!(points_on_table(14, false, 0, Some(Ball::Red)), 146);
        assert_eq!(points_on_table(14, false, 0, None), 139);
        assert_eq!(points_on_table(14, false, 0, Some(Ball::Black)), 139);
    }

    #[test]
    fn test_points_on_table_colors_phase() {
        assert_eq!(points_on_table(0, true, 0, None), 27);
        assert_eq!(points_on_table(0, true, 5, None), 7);
        assert_eq!(points_on_table(0, true, 6, None), 0);
        assert_eq!(points_on_table(0, true, 9, None), 0);
    }

    #[test]
    fn test_points_on_table_after_last_red() {
        assert_eq!(points_on_table(0, true, 0, Some(Ball::Red)), 34);
    }

    #[test]
    fn test_snooker_required_boundaries() {
        assert!(is_snooker_required(50, 60, 8));
        assert!(is_snooker_required(50, 58, 8));
        assert!(!is_snooker_required(50, 57, 8));
        assert!(is_snooker_required(0, 1, 0));
        assert!(!is_snooker_required(100, 0, 50));
    }

    #[test]
    fn test_respot_black_only_when_level() {
        assert!(should_respot_black(67, 67));
        assert!(should_respot_black(0, 0));
        assert!(!should_respot_black(67, 60));
        assert!(!should_respot_black(60, 67));
    }

    #[test]
    fn test_highest_value_on_table() {
        assert_eq!(highest_value_on_table(15, false, 0), 7);
        assert_eq!(highest_value_on_table(0, true, 3), 7);
        assert_eq!(highest_value_on_table(0, true, 6), 0);
    }

    #[test]
    fn test_next_color_in_order() {
        assert_eq!(next_color_in_order(0), Some(Ball::Green));
        assert_eq!(next_color_in_order(4), Some(Ball::Black));
        assert_eq!(next_color_in_order(5), None);
    }
}
