//! Weekend Warrior CLI
//!
//! Runs the web server and answers lookups from the terminal.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use weekend_warrior_analyzer::{Analyzer, WeekendStats};
use weekend_warrior_api::{create_router, AppState};
use weekend_warrior_collector::{github::GithubCollector, CollectorConfig};
use weekend_warrior_database::{Database, LeaderboardStore};

#[derive(Parser)]
#[command(name = "ww")]
#[command(about = "Weekend Warrior - GitHub weekend coding stats")]
#[command(version)]
struct Cli {
    /// Leaderboard database URL, e.g. sqlite://weekend-warrior.db
    #[arg(short, long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Address to bind to
        #[arg(short, long, default_value = "127.0.0.1:3000")]
        bind: SocketAddr,

        /// Static files directory
        #[arg(short, long)]
        static_dir: Option<PathBuf>,
    },

    /// Compute a player's weekend stats
    Lookup {
        /// GitHub username
        username: String,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Show the top players
    Leaderboard {
        /// Number of players to show (1-100)
        #[arg(
            short,
            long,
            default_value_t = 10,
            value_parser = clap::value_parser!(i64).range(1..=100)
        )]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    let store = open_store(cli.database_url.as_deref()).await;

    match cli.command {
        Commands::Serve { bind, static_dir } => {
            serve(store, bind, static_dir).await?;
        }
        Commands::Lookup { username, json } => {
            lookup(store, &username, json).await?;
        }
        Commands::Leaderboard { limit } => {
            leaderboard(store, limit).await?;
        }
    }

    Ok(())
}

/// Connect to the leaderboard, or run without one
async fn open_store(url: Option<&str>) -> Option<Arc<dyn LeaderboardStore>> {
    let Some(url) = url else {
        warn!("DATABASE_URL not set, leaderboard disabled");
        return None;
    };

    match Database::connect(url).await {
        Ok(db) => Some(Arc::new(db)),
        Err(e) => {
            warn!(error = %e, "Leaderboard database unavailable, continuing without it");
            None
        }
    }
}

fn github_collector() -> Result<GithubCollector> {
    let config = CollectorConfig::default();

    if config.github_token.is_none() {
        warn!("GITHUB_TOKEN not set, stats lookups will fail");
    }

    Ok(GithubCollector::new(config)?)
}

async fn serve(
    store: Option<Arc<dyn LeaderboardStore>>,
    bind: SocketAddr,
    static_dir: Option<PathBuf>,
) -> Result<()> {
    let state = Arc::new(AppState::new(github_collector()?, store));
    let router = create_router(state, static_dir.clone());

    info!("Starting Weekend Warrior server on {}", bind);
    if let Some(ref dir) = static_dir {
        info!("Serving static files from {}", dir.display());
    }
    info!("API available at http://{}/api", bind);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

async fn lookup(store: Option<Arc<dyn LeaderboardStore>>, username: &str, json: bool) -> Result<()> {
    let collector = github_collector()?;
    let stats = Analyzer::lookup(&collector, store.as_deref(), username).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_stats(&stats);
    }

    Ok(())
}

fn print_stats(stats: &WeekendStats) {
    let summary = &stats.summary;
    let standing = &stats.standing;

    println!("Player: {}", summary.username);
    println!(
        "Weekend commits: {} (Sat: {}, Sun: {})",
        summary.total_weekend_commits, summary.saturday_commits, summary.sunday_commits
    );
    println!("Dedication: {}% of weekends", summary.dedication_percentage);
    println!(
        "Streak: {} longest, {} current",
        summary.longest_streak, summary.current_streak
    );
    if let Some(ref day) = summary.busiest_day {
        println!("Busiest day: {} ({} commits)", day.date, day.commits);
    }
    println!(
        "Rank: #{} of {} (top {}%)",
        standing.global_rank,
        standing.total_players,
        100 - standing.percentile
    );

    if !summary.top_languages.is_empty() {
        println!("\nTop Languages:");
        for lang in &summary.top_languages {
            println!("  {:<15} {:>5} commits {:>3}%", lang.name, lang.commits, lang.percentage);
        }
    }

    if !summary.top_repos.is_empty() {
        println!("\nTop Repositories:");
        for repo in &summary.top_repos {
            println!("  {:<30} {:>5} commits", repo.name, repo.commits);
        }
    }

    println!("\nAchievements:");
    for badge in &summary.achievements {
        let mark = if badge.unlocked { "✓" } else { " " };
        println!("  [{}] {} {} - {}", mark, badge.icon, badge.name, badge.requirement);
    }
}

async fn leaderboard(store: Option<Arc<dyn LeaderboardStore>>, limit: i64) -> Result<()> {
    let Some(store) = store else {
        println!("No leaderboard configured. Set DATABASE_URL or pass --database-url.");
        return Ok(());
    };

    let entries = store.list(limit).await?;

    println!(
        "{:<5} {:<20} {:>8} {:>6} {:>6} {:>7} {:>7}",
        "RANK", "PLAYER", "COMMITS", "SAT", "SUN", "STREAK", "BADGES"
    );
    println!("{}", "-".repeat(65));

    for ranked in &entries {
        let entry = &ranked.entry;
        println!(
            "{:<5} {:<20} {:>8} {:>6} {:>6} {:>7} {:>7}",
            ranked.rank,
            entry.username,
            entry.total_weekend_commits,
            entry.saturday_commits,
            entry.sunday_commits,
            entry.longest_streak,
            entry.achievements_unlocked
        );
    }

    if entries.is_empty() {
        println!("No players yet. Run 'ww lookup <username>' first.");
    }

    Ok(())
}
