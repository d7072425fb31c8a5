//! Snooker Scorer - CLI
//!
//! Scores matches against a local SQLite database.

#![warn(missing_docs)]

use anyhow::{Context, Result};
use clap::Parser;
use snooker_engine::{MatchEventData, MatchFormat, MatchPlayer};
use snooker_scorer::{
    Cli, Command, MatchRepository, NewMatch, Principal, ScorerConfig, ScoringService,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ScorerConfig::load(cli.config.as_deref())?;
    info!(db_path = %config.db_path(), "Opening match database");

    let repository = MatchRepository::new(config.db_path().clone())?;
    repository.run_migrations()?;
    let service = ScoringService::new(repository, *config.default_format());
    let principal = Principal::new(cli.user.clone(), vec![cli.role]);

    run(&service, &principal, cli.command)
}

#[instrument(skip(service, principal))]
fn run(
    service: &ScoringService<MatchRepository>,
    principal: &Principal,
    command: Command,
) -> Result<()> {
    match command {
        Command::New {
            p1_id,
            p1_name,
            p2_id,
            p2_name,
            best_of,
            frames_per_set,
            venue,
            referee,
        } => {
            let format = match (best_of, frames_per_set) {
                (None, None) => None,
                (best_of, Some(fps)) => Some(MatchFormat::sets(best_of.unwrap_or(1), fps)?),
                (Some(best_of), None) => Some(MatchFormat::frames(best_of)?),
            };
            let players = [MatchPlayer::new(p1_id, p1_name), MatchPlayer::new(p2_id, p2_name)];
            let m = service.create_match(principal, NewMatch::new(players, format, venue, referee))?;
            println!("{}", m.id());
        }
        Command::Start { match_id } => {
            let m = service.start_match(principal, &match_id)?;
            println!("{}", serde_json::to_string_pretty(&m)?);
        }
        Command::Event {
            match_id,
            action,
            ball,
            note,
        } => {
            let event = MatchEventData::parse(&action, ball.as_deref(), note.as_deref())
                .context("Invalid event")?;
            let result = service.apply_event(principal, &match_id, &event)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Undo { match_id } => {
            let m = service.undo_last_event(principal, &match_id)?;
            println!("{}", serde_json::to_string_pretty(m.current())?);
        }
        Command::Abandon { match_id } => {
            service.abandon_match(principal, &match_id)?;
            println!("{match_id} abandoned");
        }
        Command::Show { match_id } => {
            let m = service.get_match(&match_id)?;
            println!("{}", serde_json::to_string_pretty(&m)?);
        }
        Command::Live => {
            for m in service.live_matches()? {
                let frame = m.current_frame();
                println!(
                    "{}\t{} v {}\t{}-{}",
                    m.id(),
                    m.players()[0].name,
                    m.players()[1].name,
                    frame.map_or(0, |f| f.p1_points),
                    frame.map_or(0, |f| f.p2_points),
                );
            }
        }
        Command::Stats {
            match_id,
            player_id,
        } => {
            let stats = service.player_stats(&match_id, &player_id)?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
