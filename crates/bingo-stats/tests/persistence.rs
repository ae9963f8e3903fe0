//! Stats survive a restart through the JSON file store

use std::fs;

use bingo_core::GameResult;
use bingo_stats::{JsonFileStore, StatsAggregate, StatsStore, StatsTracker};
use chrono::Utc;

#[test]
fn test_stats_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bingo-stats.json");

    {
        let mut tracker = StatsTracker::open(JsonFileStore::new(&path));
        tracker.record(&GameResult::win("Speed", Some(95), 14), Utc::now());
        tracker.record(&GameResult::loss("Speed", Some(180), 33), Utc::now());
    }

    let tracker = StatsTracker::open(JsonFileStore::new(&path));
    let stats = tracker.stats();
    assert_eq!(stats.games_played, 2);
    assert_eq!(stats.games_won, 1);
    assert_eq!(stats.fastest_win_secs, Some(95));
    assert_eq!(stats.fewest_calls, Some(14));
    assert_eq!(stats.total_play_time_secs, 275);
    assert_eq!(stats.win_history.len(), 1);
}

#[test]
fn test_corrupt_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bingo-stats.json");
    fs::write(&path, "garbage").unwrap();

    let mut tracker = StatsTracker::open(JsonFileStore::new(&path));
    assert_eq!(tracker.stats(), &StatsAggregate::default());

    // The next update overwrites the unreadable record
    tracker.record(&GameResult::win("Classic", Some(60), 20), Utc::now());
    let reloaded = JsonFileStore::new(&path).load().unwrap().unwrap();
    assert_eq!(reloaded.games_won, 1);
}

#[test]
fn test_written_record_uses_camel_case() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bingo-stats.json");

    let mut tracker = StatsTracker::open(JsonFileStore::new(&path));
    tracker.record(&GameResult::win("Challenge", Some(42), 9), Utc::now());

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"gamesPlayed\""));
    assert!(raw.contains("\"fewestCalls\""));
    assert!(raw.contains("\"winHistory\""));
}
