//! Per-player statistics derived from a match.

use crate::action::{Action, MatchEvent};
use crate::types::{Match, PlayerId};
use serde::Serialize;
use tracing::instrument;

/// Summary of one player's match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMatchStats {
    /// Player the figures belong to.
    pub player_id: PlayerId,
    /// Match winner flag.
    pub won: bool,
    /// Frames won.
    pub frames_won: u32,
    /// Decided frames won by the opponent.
    pub frames_lost: u32,
    /// Points across all frames, penalties received included.
    pub total_points: u32,
    /// Largest single break.
    pub highest_break: u32,
    /// Breaks of 50 or more.
    pub breaks_50_plus: u32,
    /// Breaks of 100 or more.
    pub breaks_100_plus: u32,
}

fn is_scoring_visit(event: &MatchEvent) -> bool {
    matches!(event.action, Action::Pot | Action::FreeBallPot)
}

/// Final size of each break the player made, in order.
///
/// A break is a run of consecutive pots by the player; it ends at their next
/// non-pot event. The snapshot's break total marks where a new break starts, and
/// drops to zero when the pot also ended the frame.
pub fn breaks_for(m: &Match, player_id: &str) -> Vec<u32> {
    let mut breaks = Vec::new();
    let mut running = 0;

    for event in m.history().iter().filter(|e| e.player_id == player_id) {
        if !is_scoring_visit(event) {
            if running > 0 {
                breaks.push(running);
            }
            running = 0;
            continue;
        }

        let after = event.state_snapshot.break_points;
        if after == event.points_delta {
            if running > 0 {
                breaks.push(running);
            }
            running = after;
        } else if after > event.points_delta {
            running = after;
        } else {
            breaks.push(running + event.points_delta);
            running = 0;
        }
    }
    if running > 0 {
        breaks.push(running);
    }
    breaks
}

impl PlayerMatchStats {
    /// Derives the player's figures. `None` when the player is not in the match.
    #[instrument(skip(m), fields(match_id = %m.id()))]
    pub fn from_match(m: &Match, player_id: &str) -> Option<Self> {
        if !m.players().iter().any(|p| p.player_id == player_id) {
            return None;
        }
        let slot = m.slot_of(player_id);
        let frames = &m.score().frames;

        let frames_won = frames
            .iter()
            .filter(|f| f.winner_player_id.as_deref() == Some(player_id))
            .count() as u32;
        let frames_decided = frames.iter().filter(|f| f.is_decided()).count() as u32;
        let total_points = frames.iter().map(|f| f.points(slot)).sum();

        let breaks = breaks_for(m, player_id);
        Some(Self {
            player_id: player_id.to_string(),
            won: m.score().totals.winner_player_id.as_deref() == Some(player_id),
            frames_won,
            frames_lost: frames_decided - frames_won,
            total_points,
            highest_break: breaks.iter().copied().max().unwrap_or(0),
            breaks_50_plus: breaks.iter().filter(|b| **b >= 50).count() as u32,
            breaks_100_plus: breaks.iter().filter(|b| **b >= 100).count() as u32,
        })
    }
}

/// Statistics for both players, in slot order.
pub fn match_stats(m: &Match) -> Vec<PlayerMatchStats> {
    m.players()
        .iter()
        .filter_map(|p| PlayerMatchStats::from_match(m, &p.player_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::MatchEventData;
    use crate::ball::Ball;
    use crate::engine::apply_event;
    use crate::testing::{new_match, stamper};

    fn play(events: &[MatchEventData]) -> Match {
        let stamper = stamper();
        events.iter().fold(new_match(), |acc, e| {
            apply_event(&acc, e, &stamper).expect("event applies")
        })
    }

    #[test]
    fn test_break_closed_by_end_turn() {
        let m = play(&[
            MatchEventData::pot(Ball::Red),
            MatchEventData::pot(Ball::Black),
            MatchEventData::pot(Ball::Red),
            MatchEventData::new(Action::EndTurn),
            MatchEventData::pot(Ball::Red),
            MatchEventData::new(Action::Miss),
        ]);
        assert_eq!(breaks_for(&m, "player1"), vec![9]);
        assert_eq!(breaks_for(&m, "player2"), vec![1]);

        let stats = PlayerMatchStats::from_match(&m, "player1").unwrap();
        assert_eq!(stats.highest_break, 9);
        assert_eq!(stats.total_points, 9);
        assert_eq!(stats.breaks_50_plus, 0);
        assert!(!stats.won);
    }

    #[test]
    fn test_unknown_player_has_no_stats() {
        assert!(PlayerMatchStats::from_match(&new_match(), "nobody").is_none());
        assert_eq!(match_stats(&new_match()).len(), 2);
    }

    #[test]
    fn test_foul_penalty_counts_toward_total() {
        let m = play(&[MatchEventData::foul(Some(Ball::Pink))]);
        let stats = PlayerMatchStats::from_match(&m, "player2").unwrap();
        assert_eq!(stats.total_points, 6);
        assert_eq!(stats.highest_break, 0);
    }
}
