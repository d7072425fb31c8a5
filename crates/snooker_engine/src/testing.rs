//! Shared fixtures for unit tests.

use crate::stamp::SequentialStamper;
use crate::types::{Match, MatchFormat, MatchPlayer};
use chrono::{DateTime, TimeZone, Utc};

pub(crate) fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .unwrap()
}

pub(crate) fn stamper() -> SequentialStamper {
    SequentialStamper::new(epoch())
}

pub(crate) fn new_match_with(format: MatchFormat) -> Match {
    let players = [
        MatchPlayer::new("player1", "Player 1"),
        MatchPlayer::new("player2", "Player 2"),
    ];
    Match::new("match-1", players, format, "scorer", epoch()).expect("valid match")
}

pub(crate) fn new_match() -> Match {
    new_match_with(MatchFormat::default())
}
