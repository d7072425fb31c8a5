//! Snooker rules.
//!
//! Pure functions over ball identities and table position. Nothing here holds
//! state; the match engine consults these to score and validate shots.

pub mod scoring;
pub mod sequence;

pub use scoring::{
    ball_value, foul_value, highest_value_on_table, is_snooker_required, next_color_in_order,
    points_on_table, should_respot_black, COLORS_TOTAL, INITIAL_REDS, MAXIMUM_BREAK,
    MIN_FOUL_POINTS,
};
pub use sequence::is_valid_ball_sequence;
