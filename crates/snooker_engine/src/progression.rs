//! Frame, set and match progression.

use crate::types::{FrameScore, Match, MatchState, MatchStatus, PlayerId, SetScore, Slot};
use tracing::{debug, info, instrument};

/// Reset the table for a respotted black: only the black remains, no break running.
fn respot_black(state: &mut MatchState) {
    state.reds_remaining = 0;
    state.colors_phase = true;
    state.colors_order_index = 5;
    state.last_ball_potted_in_break = None;
    state.freeball_active = false;
    state.break_points = 0;
    state.points_on_table = state.derived_points_on_table();
}

/// Whether the set has reached its winning frame count. Always false without sets.
pub fn is_set_complete(m: &Match, set_no: u32) -> bool {
    if !m.format().sets_enabled() {
        return false;
    }
    let needed = m.format().frames_to_win_set();
    m.score()
        .set(set_no)
        .is_some_and(|set| set.p1_frames.max(set.p2_frames) >= needed)
}

/// Whether the match is over.
///
/// Without sets the match ends once `best_of_sets` frames have been decided,
/// whoever won them. With sets it ends when a player reaches the winning set count.
pub fn is_match_complete(m: &Match) -> bool {
    let format = m.format();
    if !format.sets_enabled() {
        let decided = m.score().frames.iter().filter(|f| f.is_decided()).count();
        return decided >= format.best_of_sets() as usize;
    }
    let (p1, p2) = sets_won(m);
    p1.max(p2) >= format.sets_to_win_match()
}

fn sets_won(m: &Match) -> (u32, u32) {
    let p1 = m.player_id(Slot::First);
    let p2 = m.player_id(Slot::Second);
    m.score()
        .sets
        .iter()
        .fold((0, 0), |(a, b), set| match set.winner_player_id.as_deref() {
            Some(id) if id == p1 => (a + 1, b),
            Some(id) if id == p2 => (a, b + 1),
            _ => (a, b),
        })
}

fn frames_won(m: &Match) -> (u32, u32) {
    m.score()
        .frames
        .iter()
        .filter_map(|f| f.winner_player_id.as_deref())
        .fold((0, 0), |(a, b), id| match m.slot_of(id) {
            Slot::First => (a + 1, b),
            Slot::Second => (a, b + 1),
        })
}

/// The player ahead on sets (or frames, without sets). `None` when level.
///
/// Pure; calling it again on the same match gives the same answer.
pub fn derive_match_winner(m: &Match) -> Option<PlayerId> {
    let (p1, p2) = if m.format().sets_enabled() {
        sets_won(m)
    } else {
        frames_won(m)
    };
    match p1.cmp(&p2) {
        std::cmp::Ordering::Greater => Some(m.player_id(Slot::First).to_string()),
        std::cmp::Ordering::Less => Some(m.player_id(Slot::Second).to_string()),
        std::cmp::Ordering::Equal => None,
    }
}

/// Records a match winner if none is set and one can be derived.
pub(crate) fn ensure_match_winner(m: &mut Match) {
    if m.score().totals.winner_player_id.is_some() {
        return;
    }
    let winner = derive_match_winner(m);
    m.score_mut().totals.winner_player_id = winner;
}

fn record_frame_win(m: &mut Match, set_no: u32, slot: Slot) {
    let sets_enabled = m.format().sets_enabled();
    let needed = m.format().frames_to_win_set();
    let winner_id = m.player_id(slot).to_string();

    let score = m.score_mut();
    let index = match score.sets.iter().position(|s| s.set_no == set_no) {
        Some(index) => index,
        None => {
            score.sets.push(SetScore::new(set_no));
            score.sets.len() - 1
        }
    };
    let set = &mut score.sets[index];
    match slot {
        Slot::First => set.p1_frames += 1,
        Slot::Second => set.p2_frames += 1,
    }

    if sets_enabled && set.winner_player_id.is_none() && set.frames(slot) >= needed {
        set.winner_player_id = Some(winner_id);
        match slot {
            Slot::First => score.totals.p1_sets += 1,
            Slot::Second => score.totals.p2_sets += 1,
        }
        info!(set_no, ?slot, "Set won");
    }
}

fn start_next_frame(m: &mut Match, state: &mut MatchState) {
    if m.format().sets_enabled() && is_set_complete(m, state.set_number) {
        state.set_number += 1;
        state.frame_number = 1;
    } else {
        state.frame_number += 1;
    }
    state.rerack();
    m.score_mut()
        .frames
        .push(FrameScore::new(state.set_number, state.frame_number));
    debug!(set = state.set_number, frame = state.frame_number, "Next frame");
}

/// Closes the current frame.
///
/// With no explicit winner the higher score takes the frame, and a level frame
/// goes to a respotted black instead. A frame that already has a winner is left
/// alone. Closing a frame may complete the set and the match; otherwise the next
/// frame is racked and recorded.
#[instrument(skip(m, state), fields(set = state.set_number, frame = state.frame_number))]
pub(crate) fn finalize_frame(m: &mut Match, state: &mut MatchState, winner: Option<PlayerId>) {
    let (set_no, frame_no) = (state.set_number, state.frame_number);
    let Some(frame) = m.score().frame(set_no, frame_no).cloned() else {
        debug!("No frame score to finalize");
        return;
    };
    if frame.is_decided() {
        debug!("Frame already decided");
        return;
    }

    let slot = match winner {
        Some(id) => m.slot_of(&id),
        None if frame.p1_points == frame.p2_points => {
            if let Some(frame) = m.score_mut().frame_mut(set_no, frame_no) {
                frame.decided_on_black = true;
            }
            respot_black(state);
            info!(points = frame.p1_points, "Scores level, black respotted");
            return;
        }
        None if frame.p1_points > frame.p2_points => Slot::First,
        None => Slot::Second,
    };

    let winner_id = m.player_id(slot).to_string();
    if let Some(frame) = m.score_mut().frame_mut(set_no, frame_no) {
        frame.winner_player_id = Some(winner_id.clone());
    }
    info!(winner = %winner_id, "Frame won");
    record_frame_win(m, set_no, slot);

    if is_match_complete(m) {
        ensure_match_winner(m);
        m.set_status(MatchStatus::Completed);
        info!(winner = ?m.score().totals.winner_player_id, "Match complete");
    } else {
        start_next_frame(m, state);
    }
}
