//! Ball identities and their fixed point values.

use crate::action::EngineError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A snooker ball.
///
/// Serialized with the short scoreboard codes (`R`, `Y`, `G`, `Br`, `Bl`, `P`, `Bk`)
/// used by the persisted match document.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::EnumIter,
)]
pub enum Ball {
    /// Red (1 point).
    #[serde(rename = "R")]
    Red,
    /// Yellow (2 points).
    #[serde(rename = "Y")]
    Yellow,
    /// Green (3 points).
    #[serde(rename = "G")]
    Green,
    /// Brown (4 points).
    #[serde(rename = "Br")]
    Brown,
    /// Blue (5 points).
    #[serde(rename = "Bl")]
    Blue,
    /// Pink (6 points).
    #[serde(rename = "P")]
    Pink,
    /// Black (7 points).
    #[serde(rename = "Bk")]
    Black,
}

/// The fixed order in which colours are cleared once the reds are gone.
pub const COLORS_ORDER: [Ball; 6] = [
    Ball::Yellow,
    Ball::Green,
    Ball::Brown,
    Ball::Blue,
    Ball::Pink,
    Ball::Black,
];

impl Ball {
    /// Point value of the ball.
    pub const fn value(self) -> u32 {
        match self {
            Ball::Red => 1,
            Ball::Yellow => 2,
            Ball::Green => 3,
            Ball::Brown => 4,
            Ball::Blue => 5,
            Ball::Pink => 6,
            Ball::Black => 7,
        }
    }

    /// Returns true for the red ball.
    pub const fn is_red(self) -> bool {
        matches!(self, Ball::Red)
    }

    /// Returns true for any of the six colours.
    pub const fn is_color(self) -> bool {
        !self.is_red()
    }

    /// Scoreboard code for the ball.
    pub const fn code(self) -> &'static str {
        match self {
            Ball::Red => "R",
            Ball::Yellow => "Y",
            Ball::Green => "G",
            Ball::Brown => "Br",
            Ball::Blue => "Bl",
            Ball::Pink => "P",
            Ball::Black => "Bk",
        }
    }
}

impl std::fmt::Display for Ball {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Ball {
    type Err = EngineError;

    /// Parses a scoreboard code (`Bk`) or a full ball name (`black`, any case).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let ball = match trimmed {
            "R" => Ball::Red,
            "Y" => Ball::Yellow,
            "G" => Ball::Green,
            "Br" => Ball::Brown,
            "Bl" => Ball::Blue,
            "P" => Ball::Pink,
            "Bk" => Ball::Black,
            other => match other.to_ascii_lowercase().as_str() {
                "red" => Ball::Red,
                "yellow" => Ball::Yellow,
                "green" => Ball::Green,
                "brown" => Ball::Brown,
                "blue" => Ball::Blue,
                "pink" => Ball::Pink,
                "black" => Ball::Black,
                _ => return Err(EngineError::UnknownBall(trimmed.to_string())),
            },
        };
        Ok(ball)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_values_ascend_from_red_to_black() {
        let values: Vec<u32> = Ball::iter().map(Ball::value).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_colors_order_excludes_red() {
        assert!(COLORS_ORDER.iter().all(|b| b.is_color()));
        assert_eq!(COLORS_ORDER.iter().map(|b| b.value()).sum::<u32>(), 27);
    }

    #[test]
    fn test_parse_codes_and_names() {
        assert_eq!("Bk".parse::<Ball>().unwrap(), Ball::Black);
        assert_eq!("Br".parse::<Ball>().unwrap(), Ball::Brown);
        assert_eq!("BLUE".parse::<Ball>().unwrap(), Ball::Blue);
        assert_eq!(" red ".parse::<Ball>().unwrap(), Ball::Red);
    }

    #[test]
    fn test_parse_unknown_ball_fails() {
        let err = "cue".parse::<Ball>().unwrap_err();
        assert_eq!(err, EngineError::UnknownBall("cue".to_string()));
    }

    #[test]
    fn test_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Ball::Pink).unwrap(), "\"P\"");
        let ball: Ball = serde_json::from_str("\"Bl\"").unwrap();
        assert_eq!(ball, Ball::Blue);
    }
}
