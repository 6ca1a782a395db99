use std::fs;

use tinyquest::game::{Leaderboard, LeaderboardEntry, LEADERBOARD_LIMIT};

#[test]
fn empty_file_loads_as_empty_leaderboard() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaderboard.json");
    fs::write(&path, "").unwrap();
    let board = Leaderboard::load(&path).expect("empty file is not an error");
    assert!(board.entries().is_empty());
    assert_eq!(board.format_lines(), vec!["No scores recorded yet.".to_string()]);
}

#[test]
fn hand_edited_file_is_sorted_and_capped_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaderboard.json");
    let entries: Vec<String> = (0..14)
        .map(|i| format!(r#"{{"name": "p{}", "score": {}}}"#, i, (i * 7) % 13))
        .collect();
    fs::write(&path, format!("[{}]", entries.join(","))).unwrap();

    let board = Leaderboard::load(&path).unwrap();
    assert_eq!(board.entries().len(), LEADERBOARD_LIMIT);
    assert_eq!(board.entries()[0].score, 12);
    assert!(board
        .entries()
        .windows(2)
        .all(|w| w[0].score >= w[1].score));
}

#[test]
fn save_rewrites_whole_file_as_readable_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("leaderboard.json");
    let mut board = Leaderboard::empty(&path);
    board.record(LeaderboardEntry::new("ada", 40));
    board.record(LeaderboardEntry::new("bob", 55));
    board.save().unwrap();
    board.record(LeaderboardEntry::new("ada", 12));
    board.save().unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let raw: serde_json::Value = serde_json::from_str(&text).unwrap();
    let list = raw.as_array().expect("a JSON array");
    assert_eq!(list.len(), 3);
    assert_eq!(list[0]["name"], "bob");
    assert_eq!(list[2]["score"], 12);

    // No temp files left next to it.
    let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains(".tmp-"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn corrupt_file_becomes_empty_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaderboard.json");
    fs::write(&path, "{ this is not a leaderboard").unwrap();
    let (board, warning) = Leaderboard::load_or_empty(&path);
    assert!(board.entries().is_empty());
    assert!(warning.unwrap().ends_with("starting empty"));
    assert_eq!(board.format_lines(), vec!["No scores recorded yet.".to_string()]);

    // The next save replaces the damaged file.
    let mut board = board;
    board.record(LeaderboardEntry::new("cy", 9));
    board.save().unwrap();
    assert_eq!(Leaderboard::load(&path).unwrap().entries()[0].name, "cy");
}
