//! Scoring behaviour of single events.

mod common;

use common::{event, new_match, play, pot, single_frame, stamper};
use snooker_engine::{apply, Action, Ball, MatchEventData, MatchFormat, MatchStatus};

#[test]
fn test_opening_red_scores_one() {
    let m = play(&single_frame(), &[pot(Ball::Red)]);
    let state = m.current();
    assert_eq!(state.reds_remaining, 14);
    assert_eq!(state.break_points, 1);
    assert_eq!(m.score().frames[0].p1_points, 1);
    assert_eq!(state.last_ball_potted_in_break, Some(Ball::Red));
    assert_eq!(*m.status(), MatchStatus::Live);
}

#[test]
fn test_black_after_red_is_respotted() {
    let m = play(&single_frame(), &[pot(Ball::Red), pot(Ball::Black)]);
    let state = m.current();
    assert_eq!(state.break_points, 8);
    assert_eq!(m.score().frames[0].p1_points, 8);
    assert_eq!(state.reds_remaining, 14);
    assert!(!state.colors_phase);
    assert_eq!(state.last_ball_potted_in_break, None);
    assert_eq!(state.points_on_table, 139);
}

#[test]
fn test_foul_on_black_gives_opponent_seven() {
    let m = play(&single_frame(), &[MatchEventData::foul(Some(Ball::Black))]);
    let state = m.current();
    assert_eq!(m.score().frames[0].p2_points, 7);
    assert_eq!(state.active_player_id, "player2");
    assert_eq!(state.break_points, 0);
    assert!(!state.freeball_active);
    assert_eq!(m.history()[0].player_id, "player1");
    assert_eq!(m.history()[0].points_delta, 7);
}

#[test]
fn test_foul_without_ball_gives_minimum() {
    let m = play(&single_frame(), &[MatchEventData::foul(None)]);
    assert_eq!(m.score().frames[0].p2_points, 4);
    assert_eq!(m.score().frames[0].p1_points, 0);
}

#[test]
fn test_snooker_note_awards_free_ball() {
    let m = play(
        &single_frame(),
        &[MatchEventData::foul(Some(Ball::Red)).with_note("Left SNOOKERED behind green")],
    );
    assert!(m.current().freeball_active);

    let m = play(&m, &[MatchEventData::free_ball_pot(Ball::Green)]);
    assert_eq!(m.score().frames[0].p2_points, 5);
    assert!(!m.current().freeball_active);
}

#[test]
fn test_plain_foul_keeps_awarded_free_ball() {
    let m = play(
        &single_frame(),
        &[
            MatchEventData::foul(Some(Ball::Red)).with_note("snooker"),
            MatchEventData::foul(None),
        ],
    );
    assert!(m.current().freeball_active);
    assert_eq!(m.current().active_player_id, "player1");

    let result = apply(&m, &MatchEventData::free_ball_pot(Ball::Green), &stamper());
    assert!(result.valid(), "rejected: {:?}", result.error());
    assert_eq!(result.current_match().score().frames[0].p1_points, 5);
}

#[test]
fn test_all_reds_enter_colors_phase() {
    let events: Vec<_> = (0..15)
        .flat_map(|_| [pot(Ball::Red), event(Action::EndTurn)])
        .collect();
    let m = play(&single_frame(), &events);
    let state = m.current();
    assert_eq!(state.reds_remaining, 0);
    assert!(state.colors_phase);
    assert_eq!(state.colors_order_index, 0);
    assert_eq!(state.points_on_table, 27);
}

#[test]
fn test_wrong_color_in_clearance_rejected() {
    let mut events: Vec<_> = (0..15)
        .flat_map(|_| [pot(Ball::Red), event(Action::EndTurn)])
        .collect();
    events.push(pot(Ball::Yellow));
    let m = play(&single_frame(), &events);
    assert_eq!(m.current().colors_order_index, 1);

    let result = apply(&m, &pot(Ball::Brown), &stamper());
    assert!(!result.valid());
    assert!(result.error().unwrap().contains("Invalid ball sequence"));
    assert_eq!(result.current_match(), &m);
}

#[test]
fn test_free_ball_pot_without_award_rejected() {
    let m = single_frame();
    let result = apply(&m, &MatchEventData::free_ball_pot(Ball::Yellow), &stamper());
    assert!(!result.valid());
    assert_eq!(result.error(), Some("Free ball not active"));
    assert!(result.current_match().history().is_empty());
}

#[test]
fn test_pot_without_ball_rejected() {
    let result = apply(&single_frame(), &event(Action::Pot), &stamper());
    assert_eq!(result.error(), Some("Ball required for pot"));
}

#[test]
fn test_maximum_break_scores_147() {
    let m = play(&single_frame(), &common::maximum_break());
    let frame = &m.score().frames[0];
    assert_eq!(frame.p1_points, 147);
    assert_eq!(frame.highest_break, Some(147));
    assert_eq!(frame.winner_player_id.as_deref(), Some("player1"));
    assert_eq!(*m.status(), MatchStatus::Completed);
    assert_eq!(m.score().totals.winner_player_id.as_deref(), Some("player1"));

    let snapshots: Vec<u32> = m
        .history()
        .iter()
        .map(|e| e.state_snapshot.points_on_table)
        .collect();
    assert_eq!(snapshots[0], 146);
    assert_eq!(snapshots[29], 27);
    assert_eq!(snapshots[35], 0);
}

#[test]
fn test_points_on_table_after_each_pot_of_maximum() {
    let events = common::maximum_break();
    let mut m = new_match(MatchFormat::frames(3).unwrap());
    let stamper = stamper();
    let mut expected_remaining = 147;
    for e in &events {
        expected_remaining -= e.ball.map_or(0, |b| b.value());
        m = snooker_engine::apply_event(&m, e, &stamper).unwrap();
        if m.current().frame_number == 1 {
            assert_eq!(m.current().points_on_table, expected_remaining);
        }
    }
    assert_eq!(m.current().frame_number, 2);
}

#[test]
fn test_re_rack_resets_frame() {
    let m = play(
        &single_frame(),
        &[pot(Ball::Red), pot(Ball::Pink), event(Action::ReRack)],
    );
    let state = m.current();
    assert_eq!(state.reds_remaining, 15);
    assert_eq!(state.points_on_table, 147);
    assert_eq!(state.break_points, 0);
    let frame = &m.score().frames[0];
    assert_eq!((frame.p1_points, frame.p2_points), (0, 0));
    assert_eq!(frame.highest_break, None);
}

#[test]
fn test_unknown_action_reported() {
    let result = snooker_engine::apply_raw(&single_frame(), "safety", None, None, &stamper());
    assert!(!result.valid());
    assert_eq!(result.error(), Some("Unknown action: safety"));
}
