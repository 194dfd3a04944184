//! End-to-end flows through `MovieService` over an in-memory store.

use data_loader::timestamp::parse_timestamp;
use data_loader::{DataIndex, DataLoadError, Movie, MovieStore, WatchRecord};
use pipeline::{HistoryFilter, SortBy, SortOrder};
use service::{HistoryQuery, MovieService, RouteGuard, ServiceError, Session, WatchlistChange};
use tempfile::TempDir;

fn movie(id: u64, title: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        ..Movie::default()
    }
}

fn watched(id: u64, title: &str, genres: &[&str], runtime: u32, at: &str) -> WatchRecord {
    WatchRecord {
        title: Some(title.to_string()),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        runtime: Some(runtime),
        watched_at: parse_timestamp(at),
        ..WatchRecord::new(id)
    }
}

async fn seeded_service() -> MovieService<DataIndex> {
    let service = MovieService::new(DataIndex::new());
    let alice = Session::signed_in("alice");
    for record in [
        watched(603, "The Matrix", &["Action", "Science Fiction"], 136, "2024-01-10T20:00:00Z"),
        watched(13, "Forrest Gump", &["Comedy", "Drama"], 142, "2024-02-14T19:30:00Z"),
        watched(550, "Fight Club", &["Drama"], 139, "2024-03-01T22:00:00Z"),
    ] {
        service.add_to_history(&alice, record).await.unwrap();
    }
    service
}

#[tokio::test]
async fn test_signed_out_is_rejected() {
    let service = MovieService::new(DataIndex::new()).with_guard(RouteGuard::new("/login"));
    let err = service.watchlist(&Session::signed_out()).await.unwrap_err();
    match err {
        ServiceError::NotAuthenticated { redirect } => assert_eq!(redirect, "/login"),
        other => panic!("unexpected error: {other}"),
    }

    // Profile data degrades to empty instead
    let data = service.load_user_data(&Session::signed_out()).await.unwrap();
    assert!(data.watchlist.is_empty());
    assert_eq!(data.summary.watched_count, 0);
}

#[tokio::test]
async fn test_watchlist_toggle() {
    let service = MovieService::new(DataIndex::new());
    let alice = Session::signed_in("alice");

    assert!(service.add_to_watchlist(&alice, movie(603, "The Matrix")).await.unwrap());
    assert!(!service.add_to_watchlist(&alice, movie(603, "The Matrix")).await.unwrap());
    assert!(service.is_in_watchlist(&alice, 603).await.unwrap());

    let change = service.toggle_watchlist(&alice, movie(603, "The Matrix")).await.unwrap();
    assert_eq!(change, WatchlistChange::Removed);
    assert!(!service.is_in_watchlist(&alice, 603).await.unwrap());

    let change = service.toggle_watchlist(&alice, movie(27205, "Inception")).await.unwrap();
    assert_eq!(change, WatchlistChange::Added);
    assert_eq!(service.watchlist(&alice).await.unwrap().len(), 1);

    // Other users are unaffected
    let bob = Session::signed_in("bob");
    assert!(service.watchlist(&bob).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rating_aggregates_across_users() {
    let service = MovieService::new(DataIndex::new());
    let alice = Session::signed_in("alice");
    let bob = Session::signed_in("bob");

    service.rate_movie(&alice, 603, 4.0, "").await.unwrap();
    let stats = service.rate_movie(&bob, 603, 5.0, "classic").await.unwrap();
    assert_eq!(stats.rating_count, 2);
    assert!((stats.average_rating - 4.5).abs() < 1e-6);

    // Re-rating replaces the earlier rating
    let stats = service.rate_movie(&alice, 603, 2.0, "").await.unwrap();
    assert_eq!(stats.rating_count, 2);
    assert!((stats.average_rating - 3.5).abs() < 1e-6);
    assert_eq!(service.user_rating(&alice, 603).await.unwrap(), Some(2.0));
    assert_eq!(service.user_rating(&alice, 550).await.unwrap(), None);

    let err = service.rate_movie(&alice, 603, 7.5, "").await.unwrap_err();
    assert!(matches!(err, ServiceError::Store(_)));
}

#[tokio::test]
async fn test_add_to_history_stamps_time() {
    let service = MovieService::new(DataIndex::new());
    let alice = Session::signed_in("alice");

    let stored = service.add_to_history(&alice, WatchRecord::new(11)).await.unwrap();
    assert!(stored.watched_at.is_some());
    assert_eq!(service.history(&alice).await.unwrap(), vec![stored]);

    assert!(service.remove_from_history(&alice, 11).await.unwrap());
    assert!(!service.remove_from_history(&alice, 11).await.unwrap());
}

#[tokio::test]
async fn test_history_view_and_recent() {
    let service = seeded_service().await;
    let alice = Session::signed_in("alice");

    let query = HistoryQuery {
        filter: HistoryFilter {
            genre: Some("Drama".to_string()),
            ..HistoryFilter::default()
        },
        sort_by: SortBy::Title,
        order: SortOrder::Asc,
        limit: None,
    };
    let view = service.history_view(&alice, &query).await.unwrap();
    let titles: Vec<&str> = view.iter().map(|r| r.title_or_empty()).collect();
    assert_eq!(titles, vec!["Fight Club", "Forrest Gump"]);

    let recent = service.recent_history(&alice, 2).await.unwrap();
    let ids: Vec<u64> = recent.iter().map(|r| r.movie_id).collect();
    assert_eq!(ids, vec![550, 13]);
}

#[tokio::test]
async fn test_stats_and_summary() {
    let service = seeded_service().await;
    let alice = Session::signed_in("alice");
    service.add_to_watchlist(&alice, movie(27205, "Inception")).await.unwrap();
    service.rate_movie(&alice, 603, 5.0, "").await.unwrap();

    let stats = service.watch_stats(&alice).await.unwrap();
    assert_eq!(stats.total_movies_watched, 3);
    assert_eq!(stats.total_watch_time, 417);
    assert_eq!(stats.genre_distribution[0].genre, "Drama");
    assert_eq!(stats.genre_distribution[0].count, 2);

    let data = service.load_user_data(&alice).await.unwrap();
    assert_eq!(data.summary.watchlist_count, 1);
    assert_eq!(data.summary.rated_count, 1);
    assert_eq!(data.summary.watched_count, 3);
    assert_eq!(data.summary.total_watch_time, 417);
    assert_eq!(data.summary.recent_activity[0].movie_id, 550);
    assert_eq!(data.summary, service.summary(&alice).await.unwrap());
}

#[tokio::test]
async fn test_save_and_reopen() {
    let dir = TempDir::new().unwrap();
    let service = seeded_service().await;
    let alice = Session::signed_in("alice");
    service.rate_movie(&alice, 13, 3.5, "sweet").await.unwrap();
    service.save(dir.path()).await.unwrap();

    let reopened = MovieService::open(dir.path()).await.unwrap();
    assert_eq!(reopened.history(&alice).await.unwrap().len(), 3);
    assert_eq!(reopened.user_rating(&alice, 13).await.unwrap(), Some(3.5));

    let store = reopened.store();
    let stats = store.read().await.movie_rating_stats(13).unwrap();
    assert_eq!(stats.rating_count, 1);
}

#[tokio::test]
async fn test_out_of_range_writes_are_rejected() {
    let dir = TempDir::new().unwrap();
    let service = seeded_service().await;
    let alice = Session::signed_in("alice");

    let bad_rating = WatchRecord {
        user_rating: Some(7.0),
        ..watched(11, "Star Wars", &["Adventure"], 121, "2024-04-01")
    };
    let bad_progress = WatchRecord {
        progress: Some(150.0),
        ..watched(12, "Finding Nemo", &["Animation"], 100, "2024-04-02")
    };
    for record in [bad_rating, bad_progress] {
        let err = service.add_to_history(&alice, record).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store(DataLoadError::InvalidValue { .. })));
    }

    let bad_movie = Movie {
        vote_average: Some(12.0),
        ..movie(27205, "Inception")
    };
    assert!(service.add_to_watchlist(&alice, bad_movie.clone()).await.is_err());
    assert!(service.toggle_watchlist(&alice, bad_movie).await.is_err());

    assert_eq!(service.history(&alice).await.unwrap().len(), 3);
    assert!(service.watchlist(&alice).await.unwrap().is_empty());

    // The directory written after the rejected writes still loads
    service.save(dir.path()).await.unwrap();
    let reopened = MovieService::open(dir.path()).await.unwrap();
    assert_eq!(reopened.history(&alice).await.unwrap().len(), 3);
}
