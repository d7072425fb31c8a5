//! Core domain types for a snooker match.

use crate::action::{EngineError, MatchEvent};
use crate::ball::Ball;
use crate::rules::{points_on_table, INITIAL_REDS};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Unique identifier for a player.
pub type PlayerId = String;

/// Which of the two fixed player positions a player occupies.
///
/// Position one maps to the `p1*` fields of every score record, position two to `p2*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// First player listed on the match (breaks off the first frame).
    First,
    /// Second player listed on the match.
    Second,
}

impl Slot {
    /// Returns the other slot.
    pub fn opponent(self) -> Self {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }

    /// Index into the match's player list.
    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }
}

/// Lifecycle status of a match.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MatchStatus {
    /// Created, nothing scored yet.
    Scheduled,
    /// Being scored.
    Live,
    /// Finished; the winner is recorded when one can be derived.
    Completed,
    /// Stopped out of band; never produced by the engine.
    Abandoned,
}

fn default_count() -> u32 {
    1
}

/// Stored shape of a [`MatchFormat`], checked on the way in.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredFormat {
    #[serde(default)]
    sets_enabled: bool,
    #[serde(default = "default_count")]
    best_of_sets: u32,
    #[serde(default = "default_count")]
    frames_per_set: u32,
}

impl TryFrom<StoredFormat> for MatchFormat {
    type Error = EngineError;

    fn try_from(stored: StoredFormat) -> Result<Self, Self::Error> {
        Self::new(stored.sets_enabled, stored.best_of_sets, stored.frames_per_set)
    }
}

/// How many frames and sets a match is played over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredFormat")]
pub struct MatchFormat {
    sets_enabled: bool,
    best_of_sets: u32,
    frames_per_set: u32,
}

impl MatchFormat {
    /// Creates a format. Without sets, `best_of_sets` counts frames.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidFormat`] if either count is zero.
    #[instrument]
    pub fn new(sets_enabled: bool, best_of_sets: u32, frames_per_set: u32) -> Result<Self, EngineError> {
        if best_of_sets == 0 {
            return Err(EngineError::InvalidFormat("best-of count must be at least 1".to_string()));
        }
        if frames_per_set == 0 {
            return Err(EngineError::InvalidFormat("frames per set must be at least 1".to_string()));
        }
        Ok(Self {
            sets_enabled,
            best_of_sets,
            frames_per_set,
        })
    }

    /// A frames-only match over `best_of` frames.
    pub fn frames(best_of: u32) -> Result<Self, EngineError> {
        Self::new(false, best_of, 1)
    }

    /// A match over `best_of_sets` sets of `frames_per_set` frames.
    pub fn sets(best_of_sets: u32, frames_per_set: u32) -> Result<Self, EngineError> {
        Self::new(true, best_of_sets, frames_per_set)
    }

    /// Whether frames are grouped into sets.
    pub fn sets_enabled(&self) -> bool {
        self.sets_enabled
    }

    /// Best-of count: sets when sets are enabled, frames otherwise.
    pub fn best_of_sets(&self) -> u32 {
        self.best_of_sets
    }

    /// Frames played per set.
    pub fn frames_per_set(&self) -> u32 {
        self.frames_per_set
    }

    /// Frames a player needs to take a set.
    pub fn frames_to_win_set(&self) -> u32 {
        self.frames_per_set.div_ceil(2)
    }

    /// Sets a player needs to take the match.
    pub fn sets_to_win_match(&self) -> u32 {
        self.best_of_sets.div_ceil(2)
    }
}

impl Default for MatchFormat {
    fn default() -> Self {
        Self {
            sets_enabled: false,
            best_of_sets: 1,
            frames_per_set: 1,
        }
    }
}

/// A player entered in a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPlayer {
    /// Player's unique ID.
    pub player_id: PlayerId,
    /// Display name.
    pub name: String,
    /// Tournament seeding, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

impl MatchPlayer {
    /// Creates an unseeded player entry.
    pub fn new(player_id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            name: name.into(),
            seed: None,
        }
    }
}

/// The live cursor of a match: whose turn it is and what is left on the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchState {
    /// Player at the table.
    pub active_player_id: PlayerId,
    /// Current set (1-based).
    pub set_number: u32,
    /// Current frame within the set (1-based).
    pub frame_number: u32,
    /// Points scored in the running break.
    pub break_points: u32,
    /// Reds still on the table (0..=15).
    pub reds_remaining: u8,
    /// True once every red has been potted.
    pub colors_phase: bool,
    /// Position in the colour clearance order (0..=6).
    #[serde(default)]
    pub colors_order_index: u8,
    /// Most points still available from the current position.
    pub points_on_table: u32,
    /// The player may nominate any ball as the ball on.
    #[serde(default)]
    pub freeball_active: bool,
    /// The trailing player needs snookers to win the frame.
    #[serde(default)]
    pub snookers_required: bool,
    /// Last ball potted in the running break, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_ball_potted_in_break: Option<Ball>,
}

impl MatchState {
    /// State at the start of a match: full rack, first player to break.
    pub fn opening(active_player_id: impl Into<PlayerId>) -> Self {
        Self {
            active_player_id: active_player_id.into(),
            set_number: 1,
            frame_number: 1,
            break_points: 0,
            reds_remaining: INITIAL_REDS,
            colors_phase: false,
            colors_order_index: 0,
            points_on_table: points_on_table(INITIAL_REDS, false, 0, None),
            freeball_active: false,
            snookers_required: false,
            last_ball_potted_in_break: None,
        }
    }

    /// The general points-on-table formula for this position.
    pub fn derived_points_on_table(&self) -> u32 {
        points_on_table(
            self.reds_remaining,
            self.colors_phase,
            self.colors_order_index,
            self.last_ball_potted_in_break,
        )
    }

    /// Puts back a full rack, leaving set, frame and player untouched.
    pub(crate) fn rerack(&mut self) {
        self.reds_remaining = INITIAL_REDS;
        self.colors_phase = false;
        self.colors_order_index = 0;
        self.break_points = 0;
        self.freeball_active = false;
        self.snookers_required = false;
        self.last_ball_potted_in_break = None;
        self.points_on_table = self.derived_points_on_table();
    }
}

/// Points and result of a single frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameScore {
    /// Set the frame belongs to.
    pub set_no: u32,
    /// Frame number within the set.
    pub frame_no: u32,
    /// Points of the first player.
    pub p1_points: u32,
    /// Points of the second player.
    pub p2_points: u32,
    /// Frame winner, once decided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_player_id: Option<PlayerId>,
    /// Largest break made in the frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highest_break: Option<u32>,
    /// The frame went to a respotted black.
    #[serde(default)]
    pub decided_on_black: bool,
}

impl FrameScore {
    /// A fresh 0-0 frame.
    pub fn new(set_no: u32, frame_no: u32) -> Self {
        Self {
            set_no,
            frame_no,
            p1_points: 0,
            p2_points: 0,
            winner_player_id: None,
            highest_break: None,
            decided_on_black: false,
        }
    }

    /// Points held by the given slot.
    pub fn points(&self, slot: Slot) -> u32 {
        match slot {
            Slot::First => self.p1_points,
            Slot::Second => self.p2_points,
        }
    }

    pub(crate) fn add_points(&mut self, slot: Slot, points: u32) {
        match slot {
            Slot::First => self.p1_points += points,
            Slot::Second => self.p2_points += points,
        }
    }

    /// Whether a winner has been recorded.
    pub fn is_decided(&self) -> bool {
        self.winner_player_id.is_some()
    }
}

/// Frames won by each player within a set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetScore {
    /// Set number.
    pub set_no: u32,
    /// Frames taken by the first player.
    pub p1_frames: u32,
    /// Frames taken by the second player.
    pub p2_frames: u32,
    /// Set winner, once the set is complete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_player_id: Option<PlayerId>,
}

impl SetScore {
    /// A set with no frames decided.
    pub fn new(set_no: u32) -> Self {
        Self {
            set_no,
            p1_frames: 0,
            p2_frames: 0,
            winner_player_id: None,
        }
    }

    /// Frames held by the given slot.
    pub fn frames(&self, slot: Slot) -> u32 {
        match slot {
            Slot::First => self.p1_frames,
            Slot::Second => self.p2_frames,
        }
    }
}

/// Match-level tally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTotals {
    /// Sets taken by the first player.
    pub p1_sets: u32,
    /// Sets taken by the second player.
    pub p2_sets: u32,
    /// Match winner, once derivable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_player_id: Option<PlayerId>,
}

/// Every score record of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScore {
    /// One entry per frame started, in order.
    pub frames: Vec<FrameScore>,
    /// One entry per set with a decided frame, in order.
    #[serde(default)]
    pub sets: Vec<SetScore>,
    /// Match totals and winner.
    #[serde(rename = "match", default)]
    pub totals: MatchTotals,
}

impl MatchScore {
    fn opening() -> Self {
        Self {
            frames: vec![FrameScore::new(1, 1)],
            sets: Vec::new(),
            totals: MatchTotals::default(),
        }
    }

    /// The frame record for a set/frame pair.
    pub fn frame(&self, set_no: u32, frame_no: u32) -> Option<&FrameScore> {
        self.frames
            .iter()
            .find(|f| f.set_no == set_no && f.frame_no == frame_no)
    }

    pub(crate) fn frame_mut(&mut self, set_no: u32, frame_no: u32) -> Option<&mut FrameScore> {
        self.frames
            .iter_mut()
            .find(|f| f.set_no == set_no && f.frame_no == frame_no)
    }

    /// The set record for a set number.
    pub fn set(&self, set_no: u32) -> Option<&SetScore> {
        self.sets.iter().find(|s| s.set_no == set_no)
    }
}

/// A snooker match: the aggregate root the engine reads and rewrites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    /// Match ID.
    id: String,
    /// Lifecycle status.
    status: MatchStatus,
    /// Frames/sets format.
    format: MatchFormat,
    /// The two players, in slot order.
    players: [MatchPlayer; 2],
    /// Live cursor.
    current: MatchState,
    /// Frame, set and match records.
    score: MatchScore,
    /// Append-only event log.
    #[serde(default)]
    history: Vec<MatchEvent>,
    /// Where the match is played.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    venue: Option<String>,
    /// Referee officiating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    referee: Option<String>,
    /// Creation time.
    created_at: DateTime<Utc>,
    /// Time of the last change.
    updated_at: DateTime<Utc>,
    /// Principal who created the match.
    created_by: String,
    /// Principal who made the last change.
    updated_by: String,
}

impl Match {
    /// Creates a scheduled match with a full rack and an empty first frame.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPlayers`] if both entries share a player ID.
    #[instrument(skip(players, format), fields(p1 = %players[0].player_id, p2 = %players[1].player_id))]
    pub fn new(
        id: impl Into<String> + std::fmt::Debug,
        players: [MatchPlayer; 2],
        format: MatchFormat,
        created_by: impl Into<String> + std::fmt::Debug,
        created_at: DateTime<Utc>,
    ) -> Result<Self, EngineError> {
        if players[0].player_id == players[1].player_id {
            return Err(EngineError::InvalidPlayers(format!(
                "both players have ID '{}'",
                players[0].player_id
            )));
        }
        let created_by = created_by.into();
        Ok(Self {
            id: id.into(),
            status: MatchStatus::Scheduled,
            format,
            current: MatchState::opening(players[0].player_id.clone()),
            players,
            score: MatchScore::opening(),
            history: Vec::new(),
            venue: None,
            referee: None,
            created_at,
            updated_at: created_at,
            updated_by: created_by.clone(),
            created_by,
        })
    }

    /// Sets the venue.
    pub fn with_venue(mut self, venue: Option<String>) -> Self {
        self.venue = venue;
        self
    }

    /// Sets the referee.
    pub fn with_referee(mut self, referee: Option<String>) -> Self {
        self.referee = referee;
        self
    }

    /// A fresh match carrying this match's static fields (ID, format, players,
    /// venue, referee, creation metadata) and none of its play.
    pub(crate) fn restarted(&self) -> Self {
        Self {
            id: self.id.clone(),
            status: MatchStatus::Scheduled,
            format: self.format,
            current: MatchState::opening(self.players[0].player_id.clone()),
            players: self.players.clone(),
            score: MatchScore::opening(),
            history: Vec::new(),
            venue: self.venue.clone(),
            referee: self.referee.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            created_by: self.created_by.clone(),
            updated_by: self.updated_by.clone(),
        }
    }

    /// Slot of a player. IDs not on the match fall to the second slot.
    pub fn slot_of(&self, player_id: &str) -> Slot {
        if self.players[0].player_id == player_id {
            Slot::First
        } else {
            Slot::Second
        }
    }

    /// Player ID in a slot.
    pub fn player_id(&self, slot: Slot) -> &str {
        &self.players[slot.index()].player_id
    }

    /// ID of the other player.
    pub fn opponent_of(&self, player_id: &str) -> PlayerId {
        self.player_id(self.slot_of(player_id).opponent()).to_string()
    }

    /// The frame record the cursor points at.
    pub fn current_frame(&self) -> Option<&FrameScore> {
        self.current_frame_for(&self.current)
    }

    /// The frame record a (possibly newer) state points at.
    pub fn current_frame_for(&self, state: &MatchState) -> Option<&FrameScore> {
        self.score.frame(state.set_number, state.frame_number)
    }

    /// Whether the match accepts no more play.
    pub fn is_finished(&self) -> bool {
        matches!(self.status, MatchStatus::Completed | MatchStatus::Abandoned)
    }

    /// Marks a scheduled match live.
    #[instrument(skip(self), fields(match_id = %self.id))]
    pub fn start(&mut self, by: impl Into<String> + std::fmt::Debug, at: DateTime<Utc>) {
        if self.status == MatchStatus::Scheduled {
            self.status = MatchStatus::Live;
        }
        self.touch(by, at);
    }

    /// Marks the match abandoned. Scores and history are kept.
    #[instrument(skip(self), fields(match_id = %self.id))]
    pub fn abandon(&mut self, by: impl Into<String> + std::fmt::Debug, at: DateTime<Utc>) {
        self.status = MatchStatus::Abandoned;
        self.touch(by, at);
    }

    /// Records who changed the match and when.
    pub fn touch(&mut self, by: impl Into<String>, at: DateTime<Utc>) {
        self.updated_by = by.into();
        self.updated_at = at;
    }

    pub(crate) fn set_status(&mut self, status: MatchStatus) {
        self.status = status;
    }

    pub(crate) fn set_current(&mut self, state: MatchState) {
        self.current = state;
    }

    pub(crate) fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    pub(crate) fn score_mut(&mut self) -> &mut MatchScore {
        &mut self.score
    }

    pub(crate) fn push_event(&mut self, event: MatchEvent) {
        self.history.push(event);
    }

    #[cfg(test)]
    pub(crate) fn current_mut(&mut self) -> &mut MatchState {
        &mut self.current
    }
}
