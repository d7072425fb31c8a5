//! SQLite persistence for match documents.

mod error;
mod models;
mod repository;
mod schema;

pub use error::DbError;
pub use models::{MatchRecord, NewMatchRecord};
pub use repository::{MIGRATIONS, MatchRepository};
