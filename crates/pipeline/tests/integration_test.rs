//! Integration tests for the pipeline.
//!
//! These tests verify that filters, sorting and option extraction work
//! together on a history decoded from a stored document.

use data_loader::WatchRecord;
use pipeline::filters::*;
use pipeline::{
    FilterPipeline, HistoryFilter, SortBy, SortOrder, continue_watching, filter_history,
    genres_present, sort_history, years_present,
};

fn create_test_history() -> Vec<WatchRecord> {
    let json = r#"[
        {"movieId": 27205, "title": "Inception", "genres": ["Action", "Science Fiction"],
         "runtime": 148, "release_date": "2010-07-15", "watchedAt": "2024-01-10T20:00:00Z",
         "userRating": 4.5, "vote_average": 8.4},
        {"movieId": 157336, "title": "Interstellar", "genres": ["Adventure", "Drama", "Science Fiction"],
         "runtime": 169, "release_date": "2014-11-05", "watchedAt": "2024-02-03T21:15:00Z",
         "vote_average": 8.4, "progress": 40},
        {"movieId": 13, "title": "Forrest Gump", "genres": ["Comedy", "Drama", "Romance"],
         "runtime": 142, "release_date": "1994-06-23", "watchedAt": "2023-12-24T15:00:00Z",
         "userRating": 3.0},
        {"movieId": 550, "title": "Fight Club", "genres": ["Drama"],
         "runtime": 139, "release_date": "1999-10-15", "watchedAt": "not a date",
         "vote_average": 8.4},
        {"movieId": 11, "title": "Star Wars", "genres": null, "release_date": "1977-05-25"}
    ]"#;
    serde_json::from_str(json).unwrap()
}

fn ids(records: &[WatchRecord]) -> Vec<u64> {
    records.iter().map(|r| r.movie_id).collect()
}

#[test]
fn test_filter_then_sort() {
    let history = create_test_history();

    let criteria = HistoryFilter::from_selections("", "Drama", "all", "4");
    let filtered = filter_history(&history, &criteria);
    // Forrest Gump is 3.0 by the user, Inception isn't Drama
    assert_eq!(ids(&filtered), vec![157336, 550]);

    let sorted = sort_history(&filtered, SortBy::Date, SortOrder::Desc);
    // Fight Club's unparseable date sorts last in descending order
    assert_eq!(ids(&sorted), vec![157336, 550]);
}

#[test]
fn test_search_matches_genre_text() {
    let history = create_test_history();
    let criteria = HistoryFilter::from_selections("science", "all", "all", "0");
    assert_eq!(ids(&filter_history(&history, &criteria)), vec![27205, 157336]);
}

#[test]
fn test_pipeline_matches_criteria() {
    let history = create_test_history();

    let by_hand = FilterPipeline::new()
        .add_filter(GenreFilter::new("Drama"))
        .add_filter(ReleaseYearFilter::new(1994))
        .apply(history.clone());

    let criteria = HistoryFilter {
        genre: Some("Drama".to_string()),
        year: Some(1994),
        ..HistoryFilter::default()
    };

    assert_eq!(by_hand, filter_history(&history, &criteria));
    assert_eq!(ids(&by_hand), vec![13]);
}

#[test]
fn test_dropdown_options() {
    let history = create_test_history();

    assert_eq!(years_present(&history), vec![2014, 2010, 1999, 1994, 1977]);
    assert_eq!(
        genres_present(&history),
        vec!["Action", "Adventure", "Comedy", "Drama", "Romance", "Science Fiction"]
    );
}

#[test]
fn test_continue_watching_row() {
    let history = create_test_history();
    let row = continue_watching(&history, 5);
    assert_eq!(ids(&row), vec![157336]);
}

#[test]
fn test_rating_sort_uses_halved_catalog_average() {
    let history = create_test_history();
    let sorted = sort_history(&history, SortBy::Rating, SortOrder::Desc);
    // 4.5 (user), 4.2, 4.2 (catalog halves, input order kept), 3.0, unrated
    assert_eq!(ids(&sorted), vec![27205, 157336, 550, 13, 11]);
}
