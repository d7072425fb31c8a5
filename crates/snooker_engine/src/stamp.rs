//! Clock and ID sources used to stamp applied events.
//!
//! The engine never reads the system clock directly; callers pass a stamper so
//! that replay and tests are deterministic.

use crate::action::MatchEvent;
use chrono::{DateTime, Utc};
use std::cell::Cell;

/// Supplies the timestamp and ID recorded on each applied event.
pub trait EventStamper {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;

    /// A fresh event ID.
    fn next_id(&self) -> String;
}

/// Wall clock time and random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemStamper;

impl EventStamper for SystemStamper {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Always returns the same ID and time. Used to re-apply a recorded event.
#[derive(Debug, Clone)]
pub struct FixedStamper {
    id: String,
    at: DateTime<Utc>,
}

impl FixedStamper {
    /// Stamper returning `id` and `at`.
    pub fn new(id: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self { id: id.into(), at }
    }

    /// Stamper reproducing a recorded event's identity.
    pub fn from_event(event: &MatchEvent) -> Self {
        Self::new(event.id.clone(), event.timestamp)
    }
}

impl EventStamper for FixedStamper {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }

    fn next_id(&self) -> String {
        self.id.clone()
    }
}

/// Fixed time, sequential IDs (`evt-1`, `evt-2`, ...).
#[derive(Debug)]
pub struct SequentialStamper {
    at: DateTime<Utc>,
    counter: Cell<u64>,
}

impl SequentialStamper {
    /// Starts counting from one at time `at`.
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            at,
            counter: Cell::new(0),
        }
    }
}

impl EventStamper for SequentialStamper {
    fn now(&self) -> DateTime<Utc> {
        self.at
    }

    fn next_id(&self) -> String {
        let next = self.counter.get() + 1;
        self.counter.set(next);
        format!("evt-{next}")
    }
}
