//! Command-line interface for snooker_scorer.

use crate::auth::Role;
use clap::{Parser, Subcommand};

/// Snooker Scorer - score matches from the terminal
#[derive(Parser, Debug)]
#[command(name = "snooker_scorer")]
#[command(about = "Snooker match scoring with replayable event history", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// User recorded as the author of changes
    #[arg(short, long, global = true, default_value = "scorer")]
    pub user: String,

    /// Role held by the user
    #[arg(short, long, global = true, value_enum, default_value = "scorer")]
    pub role: Role,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Schedule a new match
    New {
        /// First player's ID (breaks off)
        #[arg(long)]
        p1_id: String,

        /// First player's name
        #[arg(long)]
        p1_name: String,

        /// Second player's ID
        #[arg(long)]
        p2_id: String,

        /// Second player's name
        #[arg(long)]
        p2_name: String,

        /// Best-of count (frames, or sets with --frames-per-set)
        #[arg(long)]
        best_of: Option<u32>,

        /// Play in sets of this many frames
        #[arg(long)]
        frames_per_set: Option<u32>,

        /// Venue
        #[arg(long)]
        venue: Option<String>,

        /// Referee
        #[arg(long)]
        referee: Option<String>,
    },

    /// Mark a match live
    Start {
        /// Match ID
        match_id: String,
    },

    /// Record a scoring event
    Event {
        /// Match ID
        match_id: String,

        /// Action: pot, foul, freeBallPot, miss, endTurn, reRack, concede, endFrame, endMatch
        action: String,

        /// Ball code (R, Y, G, Br, Bl, P, Bk) or name
        #[arg(short, long)]
        ball: Option<String>,

        /// Note; a foul note mentioning "snooker" awards a free ball
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Undo the last event
    Undo {
        /// Match ID
        match_id: String,
    },

    /// Abandon a match
    Abandon {
        /// Match ID
        match_id: String,
    },

    /// Print a match document as JSON
    Show {
        /// Match ID
        match_id: String,
    },

    /// List live matches
    Live,

    /// Print a player's statistics for a match
    Stats {
        /// Match ID
        match_id: String,

        /// Player ID
        player_id: String,
    },
}
