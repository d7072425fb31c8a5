//! Fixtures shared by the engine integration tests.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use snooker_engine::{
    apply, apply_event, Action, Ball, Match, MatchEventData, MatchFormat, MatchPlayer,
    SequentialStamper,
};

pub fn stamper() -> SequentialStamper {
    SequentialStamper::new(Utc.with_ymd_and_hms(2024, 3, 9, 19, 30, 0).unwrap())
}

pub fn new_match(format: MatchFormat) -> Match {
    let players = [
        MatchPlayer::new("player1", "Player 1"),
        MatchPlayer::new("player2", "Player 2"),
    ];
    Match::new("match-1", players, format, "scorer", Utc.with_ymd_and_hms(2024, 3, 9, 19, 0, 0).unwrap())
        .expect("valid match")
}

pub fn single_frame() -> Match {
    new_match(MatchFormat::frames(1).unwrap())
}

/// Applies every event, panicking on the first rejection.
pub fn play(m: &Match, events: &[MatchEventData]) -> Match {
    let stamper = stamper();
    events.iter().enumerate().fold(m.clone(), |acc, (i, event)| {
        apply_event(&acc, event, &stamper)
            .unwrap_or_else(|e| panic!("event {i} ({:?}) rejected: {e}", event.action))
    })
}

/// Applies every event, keeping the match unchanged on rejections.
pub fn play_lenient(m: &Match, events: &[MatchEventData]) -> Match {
    let stamper = stamper();
    events
        .iter()
        .fold(m.clone(), |acc, event| apply(&acc, event, &stamper).into_match())
}

pub fn pot(ball: Ball) -> MatchEventData {
    MatchEventData::pot(ball)
}

pub fn event(action: Action) -> MatchEventData {
    MatchEventData::new(action)
}

/// Fifteen red/black pairs then the colours in order.
pub fn maximum_break() -> Vec<MatchEventData> {
    let mut events: Vec<MatchEventData> = (0..15)
        .flat_map(|_| [pot(Ball::Red), pot(Ball::Black)])
        .collect();
    events.extend(snooker_engine::COLORS_ORDER.iter().map(|b| pot(*b)));
    events
}

/// Player 1 pots one red and player 2 pots nothing, then the frame is ended.
pub fn win_frame_for_player1() -> Vec<MatchEventData> {
    vec![pot(Ball::Red), event(Action::EndFrame)]
}
