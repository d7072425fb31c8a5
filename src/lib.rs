//! Snooker Scorer library - persistence and service layer over the rules engine
//!
//! # Architecture
//!
//! - **Engine**: [`snooker_engine`] validates and applies scoring events
//! - **Store**: [`MatchStore`] over SQLite ([`MatchRepository`]) or memory
//! - **Service**: [`ScoringService`] checks roles, serialises writes and persists
//!
//! # Example
//!
//! ```no_run
//! use snooker_scorer::{InMemoryMatchStore, NewMatch, Principal, Role, ScoringService};
//! use snooker_engine::{Ball, MatchEventData, MatchFormat, MatchPlayer};
//!
//! # fn example() -> anyhow::Result<()> {
//! let service = ScoringService::new(InMemoryMatchStore::new(), MatchFormat::frames(7)?);
//! let scorer = Principal::new("ref-1", vec![Role::Scorer]);
//! let players = [MatchPlayer::new("p1", "Ronnie"), MatchPlayer::new("p2", "Judd")];
//! let m = service.create_match(&scorer, NewMatch::new(players, None, None, None))?;
//! let result = service.apply_event(&scorer, m.id(), &MatchEventData::pot(Ball::Red))?;
//! assert!(result.valid());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod auth;
mod cli;
mod config;
mod db;
mod service;
mod store;

pub use auth::{Principal, Role};
pub use cli::{Cli, Command};
pub use config::{ConfigError, DB_PATH_ENV, ScorerConfig};
pub use db::{DbError, MIGRATIONS, MatchRecord, MatchRepository, NewMatchRecord};
pub use service::{NewMatch, ScoringService, ServiceError};
pub use store::{InMemoryMatchStore, MatchStore};
