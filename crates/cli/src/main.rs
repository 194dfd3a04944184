use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use data_loader::timestamp::parse_timestamp;
use data_loader::{DataIndex, Movie, MovieId, WatchRecord};
use pipeline::{genres_present, years_present, HistoryFilter, SortBy, SortOrder};
use service::{HistoryQuery, MovieService, Session, WatchlistChange};
use stats::{format_duration, time_remaining, AggregateStats};
use std::path::PathBuf;
use std::time::Instant;

/// reelwatch - personal movie library
#[derive(Parser)]
#[command(name = "reelwatch")]
#[command(about = "Watchlist, ratings and watch statistics for your movie library", long_about = None)]
struct Cli {
    /// Directory holding watchlist.json, ratings.json and history.json
    #[arg(short, long, global = true, default_value = "data")]
    data_dir: PathBuf,

    /// Signed-in user; omit to act signed out
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show aggregate watch statistics
    Stats {
        /// Print JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// List watch history with filters and sorting
    History(HistoryArgs),

    /// List release years present in the history (newest first)
    Years,

    /// List genres present in the history
    Genres,

    /// Movies started but not finished
    Continue {
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// Profile summary: counts, watch time and recent activity
    Summary {
        #[arg(long)]
        json: bool,
    },

    /// Show or edit the watchlist
    Watchlist {
        #[command(subcommand)]
        action: WatchlistAction,
    },

    /// Rate a movie (0-5) with an optional review
    Rate {
        #[arg(long)]
        movie_id: MovieId,

        #[arg(long)]
        rating: f32,

        #[arg(long, default_value = "")]
        review: String,
    },

    /// Log a watched movie to the history
    Log(LogArgs),
}

#[derive(Args)]
struct HistoryArgs {
    /// Case-insensitive text matched against title and genres
    #[arg(long, default_value = "")]
    search: String,

    /// Exact genre name, or "all"
    #[arg(long, default_value = "all")]
    genre: String,

    /// Release year, or "all"
    #[arg(long, default_value = "all")]
    year: String,

    /// Minimum rating on the 5-star scale, 0 for none
    #[arg(long, default_value = "0")]
    min_rating: String,

    /// date, title or rating
    #[arg(long, default_value = "date")]
    sort_by: String,

    /// asc or desc
    #[arg(long, default_value = "desc")]
    order: String,

    #[arg(long)]
    limit: Option<usize>,

    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum WatchlistAction {
    /// Print the watchlist
    List,

    /// Add a movie
    Add(MovieArgs),

    /// Remove a movie by id
    Remove {
        #[arg(long)]
        movie_id: MovieId,
    },

    /// Add the movie if absent, remove it otherwise
    Toggle(MovieArgs),
}

#[derive(Args)]
struct MovieArgs {
    #[arg(long)]
    movie_id: MovieId,

    #[arg(long, default_value = "")]
    title: String,

    /// Comma-separated genre names
    #[arg(long, value_delimiter = ',')]
    genres: Vec<String>,

    #[arg(long)]
    release_date: Option<String>,

    /// Catalog average, 0-10
    #[arg(long)]
    vote_average: Option<f32>,

    /// Minutes
    #[arg(long)]
    runtime: Option<u32>,
}

impl MovieArgs {
    fn into_movie(self) -> Movie {
        Movie {
            id: self.movie_id,
            title: self.title,
            poster_path: None,
            release_date: self.release_date,
            vote_average: self.vote_average,
            genres: self.genres,
            runtime: self.runtime,
        }
    }
}

#[derive(Args)]
struct LogArgs {
    #[command(flatten)]
    movie: MovieArgs,

    /// When it was watched; defaults to now
    #[arg(long)]
    watched_at: Option<String>,

    /// Your rating, 0-5
    #[arg(long)]
    rating: Option<f32>,

    /// Minutes actually watched
    #[arg(long)]
    duration_watched: Option<u32>,

    /// Percent watched, 0-100
    #[arg(long)]
    progress: Option<f32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let start = Instant::now();
    let service = MovieService::open(&cli.data_dir)
        .await
        .with_context(|| format!("Failed to load data from {}", cli.data_dir.display()))?;
    tracing::debug!("Loaded {} in {:?}", cli.data_dir.display(), start.elapsed());

    let session = match cli.user {
        Some(user) => Session::signed_in(user),
        None => Session::signed_out(),
    };

    // Dispatch to appropriate command handler
    let modified = match cli.command {
        Commands::Stats { json } => handle_stats(&service, &session, json).await?,
        Commands::History(args) => handle_history(&service, &session, args).await?,
        Commands::Years => handle_years(&service, &session).await?,
        Commands::Genres => handle_genres(&service, &session).await?,
        Commands::Continue { limit } => handle_continue(&service, &session, limit).await?,
        Commands::Summary { json } => handle_summary(&service, &session, json).await?,
        Commands::Watchlist { action } => handle_watchlist(&service, &session, action).await?,
        Commands::Rate {
            movie_id,
            rating,
            review,
        } => handle_rate(&service, &session, movie_id, rating, review).await?,
        Commands::Log(args) => handle_log(&service, &session, args).await?,
    };

    if modified {
        service
            .save(&cli.data_dir)
            .await
            .with_context(|| format!("Failed to save data to {}", cli.data_dir.display()))?;
    }

    Ok(())
}

type Service = MovieService<DataIndex>;

/// Handle the 'stats' command
async fn handle_stats(service: &Service, session: &Session, json: bool) -> Result<bool> {
    let stats = service.watch_stats(session).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_stats(&stats);
    }
    Ok(false)
}

/// Handle the 'history' command
async fn handle_history(service: &Service, session: &Session, args: HistoryArgs) -> Result<bool> {
    let query = HistoryQuery {
        filter: HistoryFilter::from_selections(&args.search, &args.genre, &args.year, &args.min_rating),
        sort_by: SortBy::parse(&args.sort_by),
        order: SortOrder::parse(&args.order),
        limit: args.limit,
    };
    let records = service.history_view(session, &query).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(false);
    }

    if query.filter.is_active() {
        println!("{}", format!("Watch history ({} matching):", records.len()).bold().blue());
    } else {
        println!("{}", format!("Watch history ({}):", records.len()).bold().blue());
    }
    print_records(&records);
    Ok(false)
}

async fn handle_years(service: &Service, session: &Session) -> Result<bool> {
    let history = service.history(session).await?;
    for year in years_present(&history) {
        println!("{}", year);
    }
    Ok(false)
}

async fn handle_genres(service: &Service, session: &Session) -> Result<bool> {
    let history = service.history(session).await?;
    for genre in genres_present(&history) {
        println!("{}", genre);
    }
    Ok(false)
}

/// Handle the 'continue' command
async fn handle_continue(service: &Service, session: &Session, limit: usize) -> Result<bool> {
    let records = service.continue_watching(session, limit).await?;
    println!("{}", "Continue watching:".bold().blue());
    if records.is_empty() {
        println!("  nothing in progress");
    }
    for record in &records {
        let progress = record.progress.unwrap_or(0.0);
        let runtime = record.runtime.unwrap_or(0);
        println!(
            "{} {} - {:.0}% watched, {} left",
            "•".green(),
            record.title_or_empty(),
            progress,
            format_duration(time_remaining(runtime, progress))
        );
    }
    Ok(false)
}

/// Handle the 'summary' command
///
/// Signed out, this fails with the guard's redirect in both output modes.
async fn handle_summary(service: &Service, session: &Session, json: bool) -> Result<bool> {
    let summary = service.summary(session).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(false);
    }

    println!("{}", format!("Profile: {}", session.user_id().unwrap_or_default()).bold().blue());
    println!("{}Watchlist: {}", "• ".green(), summary.watchlist_count);
    println!("{}Rated: {}", "• ".green(), summary.rated_count);
    println!("{}Watched: {}", "• ".green(), summary.watched_count);
    println!("{}Watch time: {}", "• ".green(), format_duration(summary.total_watch_time));
    println!("Recent activity:");
    print_records(&summary.recent_activity);
    Ok(false)
}

/// Handle the 'watchlist' command
async fn handle_watchlist(service: &Service, session: &Session, action: WatchlistAction) -> Result<bool> {
    match action {
        WatchlistAction::List => {
            let movies = service.watchlist(session).await?;
            println!("{}", format!("Watchlist ({}):", movies.len()).bold().blue());
            for movie in &movies {
                println!("  {}: {}", movie.id, movie.title);
            }
            Ok(false)
        }
        WatchlistAction::Add(args) => {
            let movie = args.into_movie();
            let id = movie.id;
            if service.add_to_watchlist(session, movie).await? {
                println!("{} Added {} to watchlist", "✓".green(), id);
                Ok(true)
            } else {
                println!("{} {} is already on the watchlist", "•".yellow(), id);
                Ok(false)
            }
        }
        WatchlistAction::Remove { movie_id } => {
            if service.remove_from_watchlist(session, movie_id).await? {
                println!("{} Removed {} from watchlist", "✓".green(), movie_id);
                Ok(true)
            } else {
                println!("{} {} was not on the watchlist", "•".yellow(), movie_id);
                Ok(false)
            }
        }
        WatchlistAction::Toggle(args) => {
            let movie = args.into_movie();
            let id = movie.id;
            match service.toggle_watchlist(session, movie).await? {
                WatchlistChange::Added => println!("{} Added {} to watchlist", "✓".green(), id),
                WatchlistChange::Removed => println!("{} Removed {} from watchlist", "✓".green(), id),
            }
            Ok(true)
        }
    }
}

/// Handle the 'rate' command
async fn handle_rate(
    service: &Service,
    session: &Session,
    movie_id: MovieId,
    rating: f32,
    review: String,
) -> Result<bool> {
    let stats = service.rate_movie(session, movie_id, rating, review).await?;
    println!(
        "{} Rated {}: {:.1}. Average now {:.2} over {} ratings",
        "✓".green(),
        movie_id,
        rating,
        stats.average_rating,
        stats.rating_count
    );
    Ok(true)
}

/// Handle the 'log' command
async fn handle_log(service: &Service, session: &Session, args: LogArgs) -> Result<bool> {
    let watched_at = match args.watched_at.as_deref() {
        Some(raw) => Some(
            parse_timestamp(raw).with_context(|| format!("Unrecognised date/time: {}", raw))?,
        ),
        None => None,
    };
    let movie = args.movie.into_movie();
    let record = WatchRecord {
        user_rating: args.rating,
        duration_watched: args.duration_watched,
        progress: args.progress,
        ..WatchRecord::from_movie(&movie, watched_at)
    };

    let stored = service.add_to_history(session, record).await?;
    println!(
        "{} Logged {} ({})",
        "✓".green(),
        stored.title_or_empty(),
        stored
            .watched_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    );
    Ok(true)
}

/// Helper function to print a history list
fn print_records(records: &[WatchRecord]) {
    for (i, record) in records.iter().enumerate() {
        let year = record
            .release_year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "????".to_string());
        let rating = record
            .effective_rating()
            .map(|r| format!("★ {:.1}", r))
            .unwrap_or_else(|| "unrated".to_string());
        let watched = record
            .watched_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "unknown date".to_string());
        println!(
            "{}. {} ({}) [{}] {} - {}",
            (i + 1).to_string().green(),
            record.title_or_empty(),
            year,
            record.genres.join(", "),
            rating,
            watched
        );
    }
}

/// Helper function to print the stats report
fn print_stats(stats: &AggregateStats) {
    println!("{}", "Watch statistics:".bold().blue());
    println!("{}Movies watched: {}", "• ".green(), stats.total_movies_watched);
    println!("{}Total watch time: {}", "• ".green(), format_duration(stats.total_watch_time));
    println!(
        "{}Average per movie: {}",
        "• ".green(),
        format_duration(stats.avg_watch_time.round() as u64)
    );
    if let Some(last) = stats.last_watched {
        println!("{}Last watched: {}", "• ".green(), last.format("%Y-%m-%d"));
    }
    if let Some(favorite) = &stats.favorite_time {
        println!(
            "{}Favorite time: {}s around {:02}:00 ({})",
            "• ".cyan(),
            favorite.day,
            favorite.hour,
            favorite.time_of_day
        );
    }

    if !stats.genre_distribution.is_empty() {
        println!("Top genres:");
        for genre in stats.top_genres(5) {
            println!("  - {}: {}", genre.genre, genre.count);
        }
    }

    if !stats.movies_per_month.is_empty() {
        println!("Movies per month:");
        for (month, count) in &stats.movies_per_month {
            println!("  {} {}", month, "#".repeat(*count as usize).cyan());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::ServiceError;

    #[test]
    fn test_cli_parses_history_flags() {
        let cli = Cli::try_parse_from([
            "reelwatch", "--user", "alice", "history", "--genre", "Drama", "--sort-by", "title",
            "--order", "asc", "--limit", "3",
        ])
        .unwrap();
        assert_eq!(cli.user.as_deref(), Some("alice"));
        match cli.command {
            Commands::History(args) => {
                assert_eq!(args.genre, "Drama");
                assert_eq!(SortBy::parse(&args.sort_by), SortBy::Title);
                assert_eq!(args.limit, Some(3));
            }
            _ => panic!("expected history"),
        }
    }

    #[tokio::test]
    async fn test_summary_requires_sign_in() {
        let service = MovieService::new(DataIndex::new());
        for json in [true, false] {
            let err = handle_summary(&service, &Session::signed_out(), json)
                .await
                .unwrap_err();
            assert!(matches!(
                err.downcast_ref::<ServiceError>(),
                Some(ServiceError::NotAuthenticated { .. })
            ));
        }
        assert!(!handle_summary(&service, &Session::signed_in("alice"), true)
            .await
            .unwrap());
    }

    #[test]
    fn test_log_builds_movie() {
        let cli = Cli::try_parse_from([
            "reelwatch", "log", "--movie-id", "603", "--title", "The Matrix", "--genres",
            "Action,Science Fiction", "--runtime", "136",
        ])
        .unwrap();
        let Commands::Log(args) = cli.command else {
            panic!("expected log");
        };
        let movie = args.movie.into_movie();
        assert_eq!(movie.id, 603);
        assert_eq!(movie.genres, vec!["Action", "Science Fiction"]);
        assert_eq!(movie.runtime, Some(136));
    }
}
