//! Scoring actions, event records and engine errors.

use crate::ball::Ball;
use crate::types::{MatchState, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;

/// Something a scorer can record against the table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter,
)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// A legal pot of the nominated ball.
    Pot,
    /// A foul; the opponent receives the penalty.
    Foul,
    /// A pot of the nominated free ball, scored as a red.
    FreeBallPot,
    /// A missed shot; the break ends.
    Miss,
    /// The player leaves the table without a foul.
    EndTurn,
    /// The balls are racked again and the frame restarts.
    ReRack,
    /// The active player concedes the frame.
    Concede,
    /// The frame is ended by the referee.
    EndFrame,
    /// The match is ended by the referee.
    EndMatch,
}

impl Action {
    /// Wire name of the action.
    pub const fn name(self) -> &'static str {
        match self {
            Action::Pot => "pot",
            Action::Foul => "foul",
            Action::FreeBallPot => "freeBallPot",
            Action::Miss => "miss",
            Action::EndTurn => "endTurn",
            Action::ReRack => "reRack",
            Action::Concede => "concede",
            Action::EndFrame => "endFrame",
            Action::EndMatch => "endMatch",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::iter()
            .find(|action| action.name() == s)
            .ok_or_else(|| EngineError::UnknownAction(s.to_string()))
    }
}

/// An event as submitted by a scorer, before the engine stamps it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEventData {
    /// What happened.
    pub action: Action,
    /// Ball involved, for pots and fouls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ball: Option<Ball>,
    /// Free-text note. A foul note mentioning "snooker" grants a free ball.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl MatchEventData {
    /// An event with no ball or note.
    pub fn new(action: Action) -> Self {
        Self {
            action,
            ball: None,
            note: None,
        }
    }

    /// Pot of `ball`.
    pub fn pot(ball: Ball) -> Self {
        Self::new(Action::Pot).with_ball(ball)
    }

    /// Foul, optionally on a ball.
    pub fn foul(ball: Option<Ball>) -> Self {
        Self {
            action: Action::Foul,
            ball,
            note: None,
        }
    }

    /// Free-ball pot, nominating `ball`.
    pub fn free_ball_pot(ball: Ball) -> Self {
        Self::new(Action::FreeBallPot).with_ball(ball)
    }

    /// Attaches a ball.
    pub fn with_ball(mut self, ball: Ball) -> Self {
        self.ball = Some(ball);
        self
    }

    /// Attaches a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Builds an event from loosely typed input such as CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownAction`] or [`EngineError::UnknownBall`]
    /// when a name does not parse.
    pub fn parse(action: &str, ball: Option<&str>, note: Option<&str>) -> Result<Self, EngineError> {
        Ok(Self {
            action: action.parse()?,
            ball: ball.map(str::parse).transpose()?,
            note: note.map(str::to_string),
        })
    }

    /// Whether the note signals the player was left snookered.
    pub fn signals_snooker(&self) -> bool {
        self.note
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains("snooker"))
    }
}

/// An applied event, as stored in the match history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEvent {
    /// Event ID.
    pub id: String,
    /// When the event was applied.
    pub timestamp: DateTime<Utc>,
    /// Player at the table when the event happened.
    pub player_id: PlayerId,
    /// What happened.
    pub action: Action,
    /// Ball involved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ball: Option<Ball>,
    /// Points the event put on the board (value, penalty, or 1 for a free ball).
    #[serde(default)]
    pub points_delta: u32,
    /// Scorer's note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Match state right after the event.
    pub state_snapshot: MatchState,
}

impl MatchEvent {
    /// The submitted form of this event, for replay.
    pub fn data(&self) -> MatchEventData {
        MatchEventData {
            action: self.action,
            ball: self.ball,
            note: self.note.clone(),
        }
    }
}

/// Errors raised while validating or applying a scoring event.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum EngineError {
    /// A pot was recorded without a ball.
    #[display("Ball required for pot")]
    BallRequiredForPot,

    /// A free-ball pot was recorded without a ball.
    #[display("Ball required for free ball pot")]
    BallRequiredForFreeBall,

    /// The ball is not the ball on.
    #[display("Invalid ball sequence: {}", _0)]
    InvalidBallSequence(Ball),

    /// A free-ball pot was recorded with no free ball awarded.
    #[display("Free ball not active")]
    FreeBallNotActive,

    /// Action name not recognised.
    #[display("Unknown action: {}", _0)]
    UnknownAction(String),

    /// Ball name not recognised.
    #[display("Unknown ball: {}", _0)]
    UnknownBall(String),

    /// Format counts out of range.
    #[display("Invalid match format: {}", _0)]
    InvalidFormat(String),

    /// Player entries unusable.
    #[display("Invalid players: {}", _0)]
    InvalidPlayers(String),

    /// A state invariant broke after applying an event.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names_round_trip() {
        for action in Action::iter() {
            assert_eq!(action.name().parse::<Action>(), Ok(action));
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.name()));
        }
    }

    #[test]
    fn test_unknown_action_message() {
        let err = "jumpShot".parse::<Action>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown action: jumpShot");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(EngineError::BallRequiredForPot.to_string(), "Ball required for pot");
        assert_eq!(
            EngineError::BallRequiredForFreeBall.to_string(),
            "Ball required for free ball pot"
        );
        assert_eq!(
            EngineError::InvalidBallSequence(Ball::Black).to_string(),
            "Invalid ball sequence: Bk"
        );
        assert_eq!(EngineError::FreeBallNotActive.to_string(), "Free ball not active");
    }

    #[test]
    fn test_parse_event_data() {
        let data = MatchEventData::parse("foul", Some("Bl"), Some("Left Snookered")).unwrap();
        assert_eq!(data.action, Action::Foul);
        assert_eq!(data.ball, Some(Ball::Blue));
        assert!(data.signals_snooker());

        let data = MatchEventData::parse("endTurn", None, None).unwrap();
        assert!(!data.signals_snooker());

        assert!(MatchEventData::parse("pot", Some("white"), None).is_err());
    }
}
