use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use committee::api::routes::tournaments::CreateTournamentRequest;
use committee::api::state::AppState;
use committee::config::AppConfig;
use committee::models::{MatchKey, PointsTableEntry, ScoreUpdate};
use committee::storage::{StorageConfig, TournamentStore};

#[derive(Parser)]
#[command(name = "committee")]
#[command(about = "League tables and tie-breaks for amateur tournaments")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Create a tournament from a JSON file
    Create {
        /// Tournament definition (name, teams, rounds, groups, settings)
        file: PathBuf,
    },

    /// List stored tournaments
    List,

    /// Print a league table
    Standings {
        id: Uuid,

        /// Only this group's table
        #[arg(long)]
        group: Option<String>,

        /// Mark the top N teams as qualified
        #[arg(long)]
        qualify: Option<u32>,
    },

    /// Enter or correct a result
    Score {
        id: Uuid,

        /// Match id, e.g. r1m2 or gAr1m2
        match_id: String,

        score1: u32,
        score2: u32,

        /// Tie-break scores as "3-2"
        #[arg(long)]
        tiebreak: Option<String>,
    },

    /// Lock a result against further edits
    Lock {
        id: Uuid,
        match_id: String,

        /// Remove the lock instead
        #[arg(long)]
        unlock: bool,
    },

    /// Seed the knockout round from the group qualifiers
    SeedKnockout { id: Uuid },

    /// Schedule the next knockout round once the current one is decided
    AdvanceKnockout { id: Uuid },
}

fn parse_tiebreak(s: &str) -> Result<(u32, u32)> {
    let (a, b) = s
        .split_once('-')
        .with_context(|| format!("Invalid tiebreak {:?}, expected \"3-2\"", s))?;
    Ok((a.trim().parse()?, b.trim().parse()?))
}

fn print_table(table: &[PointsTableEntry]) {
    println!(
        "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}",
        "#", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"
    );
    for (i, e) in table.iter().enumerate() {
        let marker = if e.is_qualified() { "*" } else { "" };
        println!(
            "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>+4} {:>4} {}",
            i + 1,
            e.team_name,
            e.played,
            e.won,
            e.drawn,
            e.lost,
            e.goals_for,
            e.goals_against,
            e.goal_difference,
            e.points,
            marker
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Loading {}", cli.config.display()))?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    let log_level = cli.log_level.unwrap_or_else(|| config.log_level.clone());

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(cli.json_logs.then(|| fmt::layer().json()))
        .with((!cli.json_logs).then(fmt::layer))
        .init();

    tracing::info!("Starting committee v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.data_dir.clone());

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState::new(storage, config.standings.settings());
            let app = committee::api::build_router(state, &config.server.cors_origin);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Create { file } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("Reading {}", file.display()))?;
            let req: CreateTournamentRequest = serde_json::from_str(&contents)?;
            let tournament = req.into_tournament(&config.standings.settings());
            tournament.validate()?;

            TournamentStore::new(storage).insert(&tournament)?;
            println!("{}", tournament.id);
        }
        Commands::List => {
            for t in TournamentStore::new(storage).list()? {
                println!(
                    "{}  {:<32} {:>3} teams  {}",
                    t.id,
                    t.name,
                    t.teams.len(),
                    t.created_at.format("%Y-%m-%d")
                );
            }
        }
        Commands::Standings { id, group, qualify } => {
            let tournament = TournamentStore::new(storage).get(id)?;
            let table = tournament.table(group.as_deref(), qualify)?;
            print_table(&table);
        }
        Commands::Score {
            id,
            match_id,
            score1,
            score2,
            tiebreak,
        } => {
            let key: MatchKey = match_id.parse()?;
            let tiebreak = tiebreak.as_deref().map(parse_tiebreak).transpose()?;
            let update = ScoreUpdate {
                score1: Some(score1),
                score2: Some(score2),
                score1_tiebreak: tiebreak.map(|t| t.0),
                score2_tiebreak: tiebreak.map(|t| t.1),
            };

            let store = TournamentStore::new(storage);
            let mut tournament = store.get(id)?;
            tournament.record_score(key.clone(), &update)?;
            store.upsert(&tournament)?;
            tracing::info!("Recorded {} {}-{}", key, score1, score2);
        }
        Commands::Lock {
            id,
            match_id,
            unlock,
        } => {
            let key: MatchKey = match_id.parse()?;
            let store = TournamentStore::new(storage);
            let mut tournament = store.get(id)?;
            tournament.set_locked(key.clone(), !unlock)?;
            store.upsert(&tournament)?;
            tracing::info!("{} {}", if unlock { "Unlocked" } else { "Locked" }, key);
        }
        Commands::SeedKnockout { id } => {
            let store = TournamentStore::new(storage);
            let mut tournament = store.get(id)?;
            let round = tournament.seed_knockout()?.clone();
            store.upsert(&tournament)?;

            println!("Round {}", round.round_number);
            for m in &round.matches {
                println!("  m{}: {} v {}", m.match_number, m.team1, m.team2);
            }
        }
        Commands::AdvanceKnockout { id } => {
            let store = TournamentStore::new(storage);
            let mut tournament = store.get(id)?;
            let Some(round) = tournament.advance_knockout()?.cloned() else {
                bail!("Current round is not decided yet, or the final has been played");
            };
            store.upsert(&tournament)?;

            println!("Round {}", round.round_number);
            for m in &round.matches {
                println!("  m{}: {} v {}", m.match_number, m.team1, m.team2);
            }
        }
    }

    Ok(())
}
