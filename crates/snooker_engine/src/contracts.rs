//! Preconditions and postconditions for scoring events.
//!
//! A contract states what must hold before an event is applied and what the
//! engine guarantees afterwards: {P(match, event)} apply {Q(before, after)}.

use crate::action::{Action, EngineError, MatchEventData};
use crate::ball::{Ball, COLORS_ORDER};
use crate::invariants::check_match;
use crate::rules::is_valid_ball_sequence;
use crate::types::{Match, MatchState};
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// Preconditions and postconditions for a state transition.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), EngineError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), EngineError>;
}

// ─────────────────────────────────────────────────────────────
//  Event Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: pots name the ball they potted.
pub struct BallPresent;

impl BallPresent {
    /// Returns the ball, or the missing-ball error for the action.
    pub fn check(event: &MatchEventData) -> Result<Ball, EngineError> {
        match (event.action, event.ball) {
            (_, Some(ball)) => Ok(ball),
            (Action::FreeBallPot, None) => Err(EngineError::BallRequiredForFreeBall),
            _ => Err(EngineError::BallRequiredForPot),
        }
    }
}

/// Precondition: the potted ball is the ball on and is still on the table.
pub struct BallOn;

impl BallOn {
    /// Checks the ball against the sequence rules and what is left to pot.
    #[instrument(skip(state))]
    pub fn check(ball: Ball, state: &MatchState) -> Result<(), EngineError> {
        let legal = is_valid_ball_sequence(
            ball,
            state.reds_remaining,
            state.colors_phase,
            state.colors_order_index,
            state.freeball_active,
            state.last_ball_potted_in_break,
        );
        let on_table = match ball {
            Ball::Red => state.reds_remaining > 0,
            _ => !state.colors_phase || usize::from(state.colors_order_index) < COLORS_ORDER.len(),
        };

        if legal && on_table {
            Ok(())
        } else {
            warn!(%ball, reds = state.reds_remaining, index = state.colors_order_index, "Ball not on");
            Err(EngineError::InvalidBallSequence(ball))
        }
    }
}

/// Precondition: a free ball has been awarded.
pub struct FreeBallAwarded;

impl FreeBallAwarded {
    /// Checks the free-ball flag.
    #[instrument(skip(state))]
    pub fn check(state: &MatchState) -> Result<(), EngineError> {
        if state.freeball_active {
            Ok(())
        } else {
            Err(EngineError::FreeBallNotActive)
        }
    }
}

/// Composite precondition for any event.
pub struct LegalEvent;

impl LegalEvent {
    /// Validates every precondition that applies to the event's action.
    #[instrument(skip(state), fields(action = %event.action))]
    pub fn check(event: &MatchEventData, state: &MatchState) -> Result<(), EngineError> {
        match event.action {
            Action::Pot => {
                let ball = BallPresent::check(event)?;
                BallOn::check(ball, state)
            }
            Action::FreeBallPot => {
                BallPresent::check(event)?;
                FreeBallAwarded::check(state)
            }
            _ => Ok(()),
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Event Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for scoring events.
///
/// Preconditions:
/// - Pots and free-ball pots carry a ball
/// - A potted ball is the ball on
/// - A free-ball pot needs an awarded free ball
///
/// Postconditions:
/// - Exactly one event was appended
/// - Every [`MatchInvariants`](crate::invariants::MatchInvariants) member holds
pub struct EventContract;

impl Contract<Match, MatchEventData> for EventContract {
    fn pre(m: &Match, event: &MatchEventData) -> Result<(), EngineError> {
        LegalEvent::check(event, m.current())
    }

    fn post(before: &Match, after: &Match) -> Result<(), EngineError> {
        if after.history().len() != before.history().len() + 1 {
            return Err(EngineError::InvariantViolation(
                "Postcondition failed: history must grow by one event".to_string(),
            ));
        }
        check_match(after).map_err(|descriptions| {
            EngineError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })
    }
}
