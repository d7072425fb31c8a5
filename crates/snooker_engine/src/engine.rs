//! The match state machine: applies one scoring event to a match.

use crate::action::{Action, EngineError, MatchEvent, MatchEventData};
use crate::ball::Ball;
use crate::contracts::{Contract, EventContract};
use crate::progression::{ensure_match_winner, finalize_frame};
use crate::rules::{foul_value, is_snooker_required};
use crate::stamp::EventStamper;
use crate::types::{Match, MatchState, MatchStatus, Slot};
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Outcome of [`apply`]: the resulting match, or the unchanged input plus an error.
#[derive(Debug, Clone, Serialize)]
pub struct ApplyResult {
    #[serde(rename = "match")]
    snapshot: Match,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApplyResult {
    /// A successful application.
    pub fn accepted(next: Match) -> Self {
        Self {
            snapshot: next,
            valid: true,
            error: None,
        }
    }

    /// A rejection carrying the unchanged match.
    pub fn rejected(unchanged: Match, error: &EngineError) -> Self {
        Self {
            snapshot: unchanged,
            valid: false,
            error: Some(error.to_string()),
        }
    }

    /// Whether the event was applied.
    pub fn valid(&self) -> bool {
        self.valid
    }

    /// Why the event was rejected.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The match after the event, or the original when rejected.
    pub fn current_match(&self) -> &Match {
        &self.snapshot
    }

    /// Consumes the result, returning the match.
    pub fn into_match(self) -> Match {
        self.snapshot
    }
}

/// Applies an event, never failing. Rejections return the original match.
pub fn apply<S: EventStamper + ?Sized>(
    current: &Match,
    event: &MatchEventData,
    stamper: &S,
) -> ApplyResult {
    match apply_event(current, event, stamper) {
        Ok(next) => ApplyResult::accepted(next),
        Err(err) => rejected(current, err),
    }
}

/// Parses loosely typed input, then [`apply`]s it.
///
/// An unknown action or ball is reported the same way as a rule rejection.
pub fn apply_raw<S: EventStamper + ?Sized>(
    current: &Match,
    action: &str,
    ball: Option<&str>,
    note: Option<&str>,
    stamper: &S,
) -> ApplyResult {
    match MatchEventData::parse(action, ball, note) {
        Ok(event) => apply(current, &event, stamper),
        Err(err) => rejected(current, err),
    }
}

fn rejected(current: &Match, err: EngineError) -> ApplyResult {
    warn!(match_id = %current.id(), error = %err, "Event rejected");
    ApplyResult::rejected(current.clone(), &err)
}

/// Applies one event to a match, returning the new match.
///
/// The input is never modified. On success exactly one [`MatchEvent`] is appended
/// to the history, attributed to the player who was at the table, and its
/// snapshot equals the new current state.
///
/// # Errors
///
/// Returns an [`EngineError`] when a precondition fails (missing ball, ball not
/// on, no free ball), or, in debug builds, when a postcondition fails.
#[instrument(skip(current, stamper), fields(match_id = %current.id(), action = %event.action))]
pub fn apply_event<S: EventStamper + ?Sized>(
    current: &Match,
    event: &MatchEventData,
    stamper: &S,
) -> Result<Match, EngineError> {
    EventContract::pre(current, event)?;

    let mut next = current.clone();
    let mut state = current.current().clone();
    let acting_player = state.active_player_id.clone();

    match event.action {
        Action::Pot => {
            let ball = event.ball.ok_or(EngineError::BallRequiredForPot)?;
            pot(&mut next, &mut state, ball);
        }
        Action::Foul => foul(&mut next, &mut state, event),
        Action::FreeBallPot => free_ball_pot(&mut next, &mut state),
        Action::Miss | Action::EndTurn => end_break(&next, &mut state),
        Action::Concede => {
            let winner = next.opponent_of(&state.active_player_id);
            finalize_frame(&mut next, &mut state, Some(winner));
        }
        Action::EndFrame => finalize_frame(&mut next, &mut state, None),
        Action::EndMatch => {
            ensure_match_winner(&mut next);
            next.set_status(MatchStatus::Completed);
        }
        Action::ReRack => rerack(&mut next, &mut state),
    }

    refresh_snookers_required(&next, &mut state);
    if *next.status() == MatchStatus::Scheduled {
        next.set_status(MatchStatus::Live);
    }

    let now = stamper.now();
    next.push_event(MatchEvent {
        id: stamper.next_id(),
        timestamp: now,
        player_id: acting_player,
        action: event.action,
        ball: event.ball,
        points_delta: points_delta(event),
        note: event.note.clone(),
        state_snapshot: state.clone(),
    });
    next.set_current(state);
    next.set_updated_at(now);

    #[cfg(debug_assertions)]
    EventContract::post(current, &next)?;

    debug!(
        set = next.current().set_number,
        frame = next.current().frame_number,
        break_points = next.current().break_points,
        points_on_table = next.current().points_on_table,
        "Event applied"
    );
    Ok(next)
}

fn points_delta(event: &MatchEventData) -> u32 {
    match event.action {
        Action::Pot => event.ball.map_or(0, Ball::value),
        Action::Foul => foul_value(event.ball),
        Action::FreeBallPot => 1,
        _ => 0,
    }
}

fn add_points(m: &mut Match, state: &MatchState, slot: Slot, points: u32) {
    if let Some(frame) = m
        .score_mut()
        .frame_mut(state.set_number, state.frame_number)
    {
        frame.add_points(slot, points);
    }
}

fn record_break(m: &mut Match, state: &MatchState) {
    if let Some(frame) = m
        .score_mut()
        .frame_mut(state.set_number, state.frame_number)
    {
        let best = frame.highest_break.unwrap_or(0).max(state.break_points);
        frame.highest_break = Some(best);
    }
}

fn pot(m: &mut Match, state: &mut MatchState, ball: Ball) {
    let slot = m.slot_of(&state.active_player_id);
    let value = ball.value();
    add_points(m, state, slot, value);
    state.break_points += value;
    record_break(m, state);

    let was_colors_phase = state.colors_phase;
    let previous_on_table = state.points_on_table;
    let after_red = state.last_ball_potted_in_break == Some(Ball::Red);

    if ball.is_red() {
        state.reds_remaining = state.reds_remaining.saturating_sub(1);
        state.last_ball_potted_in_break = Some(Ball::Red);
        if state.reds_remaining == 0 {
            // Still on a colour: last stays Red so any colour may follow.
            state.colors_phase = true;
            state.colors_order_index = 0;
        }
    } else if state.colors_phase && !after_red {
        state.colors_order_index += 1;
        state.last_ball_potted_in_break = None;
    } else {
        // Colour taken with reds (or the final red) before it is respotted.
        state.last_ball_potted_in_break = None;
    }
    state.freeball_active = false;

    state.points_on_table = if ball.is_red() && !was_colors_phase {
        previous_on_table.saturating_sub(1)
    } else if after_red {
        previous_on_table.saturating_sub(value)
    } else {
        state.derived_points_on_table()
    };

    if state.colors_phase && state.colors_order_index >= 6 {
        finalize_frame(m, state, None);
    }
}

fn foul(m: &mut Match, state: &mut MatchState, event: &MatchEventData) {
    let offender = m.slot_of(&state.active_player_id);
    add_points(m, state, offender.opponent(), foul_value(event.ball));

    let awaiting_black = m
        .current_frame_for(state)
        .is_some_and(|f| f.decided_on_black && !f.is_decided());

    end_break(m, state);
    if event.signals_snooker() {
        state.freeball_active = true;
    }

    if awaiting_black {
        finalize_frame(m, state, None);
    }
}

fn free_ball_pot(m: &mut Match, state: &mut MatchState) {
    let slot = m.slot_of(&state.active_player_id);
    add_points(m, state, slot, 1);
    state.break_points += 1;
    record_break(m, state);
    state.freeball_active = false;
    state.last_ball_potted_in_break = None;
    state.points_on_table = state.derived_points_on_table();
}

/// Hands the table over. `points_on_table` is re-derived here, which clears any
/// drift left by the per-pot subtraction during the break.
fn end_break(m: &Match, state: &mut MatchState) {
    state.break_points = 0;
    state.last_ball_potted_in_break = None;
    state.active_player_id = m.opponent_of(&state.active_player_id);
    state.points_on_table = state.derived_points_on_table();
}

fn rerack(m: &mut Match, state: &mut MatchState) {
    state.rerack();
    if let Some(frame) = m
        .score_mut()
        .frame_mut(state.set_number, state.frame_number)
    {
        frame.p1_points = 0;
        frame.p2_points = 0;
        frame.winner_player_id = None;
        frame.decided_on_black = false;
        frame.highest_break = None;
    }
}

fn refresh_snookers_required(m: &Match, state: &mut MatchState) {
    state.snookers_required = m.current_frame_for(state).is_some_and(|frame| {
        let (low, high) = if frame.p1_points <= frame.p2_points {
            (frame.p1_points, frame.p2_points)
        } else {
            (frame.p2_points, frame.p1_points)
        };
        low < high && is_snooker_required(low, high, state.points_on_table)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{new_match, stamper};

    fn run(m: &Match, events: &[MatchEventData]) -> Match {
        let stamper = stamper();
        events.iter().fold(m.clone(), |acc, event| {
            apply_event(&acc, event, &stamper).expect("event applies")
        })
    }

    #[test]
    fn test_free_ball_pot_scores_one() {
        let mut m = new_match();
        m.current_mut().freeball_active = true;
        let next = apply_event(&m, &MatchEventData::free_ball_pot(Ball::Green), &stamper()).unwrap();

        let state = next.current();
        assert_eq!(next.score().frames[0].p1_points, 1);
        assert_eq!(state.break_points, 1);
        assert!(!state.freeball_active);
        assert_eq!(state.last_ball_potted_in_break, None);
        assert_eq!(state.points_on_table, 147);
        assert_eq!(next.history()[0].points_delta, 1);
    }

    #[test]
    fn test_free_ball_needs_ball_before_award() {
        let mut m = new_match();
        m.current_mut().freeball_active = true;
        let err = apply_event(&m, &MatchEventData::new(Action::FreeBallPot), &stamper()).unwrap_err();
        assert_eq!(err.to_string(), "Ball required for free ball pot");
    }

    #[test]
    fn test_foul_on_respotted_black_settles_frame() {
        let mut m = new_match();
        let state = m.current_mut();
        state.reds_remaining = 0;
        state.colors_phase = true;
        state.colors_order_index = 5;
        state.points_on_table = 7;
        if let Some(frame) = m.score_mut().frame_mut(1, 1) {
            frame.p1_points = 67;
            frame.p2_points = 67;
            frame.decided_on_black = true;
        }

        let next = apply_event(&m, &MatchEventData::foul(Some(Ball::Black)), &stamper()).unwrap();
        let frame = &next.score().frames[0];
        assert_eq!(frame.p2_points, 74);
        assert_eq!(frame.winner_player_id.as_deref(), Some("player2"));
        assert_eq!(*next.status(), MatchStatus::Completed);
    }

    #[test]
    fn test_input_match_untouched() {
        let m = new_match();
        let before = m.clone();
        let _ = apply_event(&m, &MatchEventData::pot(Ball::Red), &stamper()).unwrap();
        assert_eq!(m, before);
    }

    #[test]
    fn test_rejection_leaves_match_as_is() {
        let m = new_match();
        let result = apply(&m, &MatchEventData::pot(Ball::Pink), &stamper());
        assert!(!result.valid());
        assert_eq!(result.error(), Some("Invalid ball sequence: P"));
        assert_eq!(result.current_match(), &m);
    }

    #[test]
    fn test_apply_raw_unknown_action() {
        let m = new_match();
        let result = apply_raw(&m, "push", None, None, &stamper());
        assert!(!result.valid());
        assert_eq!(result.error(), Some("Unknown action: push"));
    }

    #[test]
    fn test_pot_after_red_subtracts_color_value() {
        let m = run(
            &new_match(),
            &[MatchEventData::pot(Ball::Red), MatchEventData::pot(Ball::Blue)],
        );
        assert_eq!(m.current().points_on_table, 141);
        assert_eq!(m.current().break_points, 6);
        assert_eq!(m.score().frames[0].highest_break, Some(6));
    }

    #[test]
    fn test_end_turn_recomputes_table() {
        let m = run(
            &new_match(),
            &[
                MatchEventData::pot(Ball::Red),
                MatchEventData::pot(Ball::Yellow),
                MatchEventData::new(Action::EndTurn),
            ],
        );
        let state = m.current();
        assert_eq!(state.active_player_id, "player2");
        assert_eq!(state.break_points, 0);
        assert_eq!(state.points_on_table, 139);
    }

    #[test]
    fn test_snookers_required_tracked() {
        let mut m = new_match();
        let state = m.current_mut();
        state.reds_remaining = 0;
        state.colors_phase = true;
        state.colors_order_index = 4;
        state.points_on_table = 13;
        if let Some(frame) = m.score_mut().frame_mut(1, 1) {
            frame.p1_points = 40;
            frame.p2_points = 60;
        }
        let next = apply_event(&m, &MatchEventData::new(Action::Miss), &stamper()).unwrap();
        assert!(next.current().snookers_required);
    }

    #[test]
    fn test_end_match_keeps_status_completed() {
        let m = run(&new_match(), &[MatchEventData::new(Action::EndMatch)]);
        assert_eq!(*m.status(), MatchStatus::Completed);
        assert_eq!(m.score().totals.winner_player_id, None);
    }
}
