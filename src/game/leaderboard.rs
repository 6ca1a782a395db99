//! Ranked leaderboard persisted as a JSON array.
//!
//! - Sorted by score, highest first; ties keep arrival order
//! - Capped at [`LEADERBOARD_LIMIT`] entries; names are not deduplicated
//! - Rewritten in full on every session end (temp file + rename under an fs2 lock)
//! - A missing or blank file is an empty leaderboard

use chrono::{DateTime, Utc};
use fs2::FileExt;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::errors::GameError;
use super::types::Player;

pub const LEADERBOARD_LIMIT: usize = 10;

/// How a finished run is turned into a score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringRule {
    /// navigation count + items carried + gold + xp
    #[default]
    Progress,
    /// NPCs defeated
    Kills,
}

impl ScoringRule {
    pub fn score(self, player: &Player) -> u64 {
        match self {
            ScoringRule::Progress => {
                u64::from(player.navigation_count)
                    + player.total_item_quantity()
                    + u64::from(player.gold)
                    + u64::from(player.xp)
            }
            ScoringRule::Kills => u64::from(player.kills),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    #[serde(alias = "username")]
    pub name: String,
    pub score: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl LeaderboardEntry {
    pub fn new(name: &str, score: u64) -> Self {
        LeaderboardEntry {
            name: name.to_string(),
            score,
            recorded_at: Some(Utc::now()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Leaderboard {
    path: PathBuf,
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// An empty leaderboard that will persist to `path`.
    pub fn empty<P: Into<PathBuf>>(path: P) -> Self {
        Leaderboard {
            path: path.into(),
            entries: Vec::new(),
        }
    }

    /// Read the leaderboard at `path`. Missing or blank files are empty; a file
    /// that does not parse is an error.
    pub fn load<P: Into<PathBuf>>(path: P) -> Result<Self, GameError> {
        let path = path.into();
        let text = match read_shared(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::empty(path)),
            Err(e) => return Err(e.into()),
        };
        let cleaned = text.trim_start_matches('\0').trim();
        if cleaned.is_empty() {
            return Ok(Self::empty(path));
        }
        let mut entries: Vec<LeaderboardEntry> = serde_json::from_str(cleaned)?;
        normalize(&mut entries);
        debug!("leaderboard: loaded {} entries from {:?}", entries.len(), path);
        Ok(Leaderboard { path, entries })
    }

    /// Like [`Leaderboard::load`], but a damaged file becomes an empty board plus
    /// a warning line instead of an error.
    pub fn load_or_empty<P: Into<PathBuf>>(path: P) -> (Self, Option<String>) {
        let path = path.into();
        match Self::load(path.clone()) {
            Ok(board) => (board, None),
            Err(e) => {
                let msg = format!("leaderboard {} unreadable ({}); starting empty", path.display(), e);
                warn!("{}", msg);
                (Self::empty(path), Some(msg))
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Insert an entry, re-rank, and truncate. Returns the 1-based rank when the
    /// entry made the cut.
    pub fn record(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        // Lands after any existing entries with the same score.
        let pos = self
            .entries
            .iter()
            .position(|e| e.score < entry.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(LEADERBOARD_LIMIT);
        (pos < LEADERBOARD_LIMIT).then_some(pos + 1)
    }

    /// Rewrite the whole file.
    pub fn save(&self) -> Result<(), GameError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        write_json_atomic(&self.path, &json)?;
        debug!("leaderboard: wrote {} entries to {:?}", self.entries.len(), self.path);
        Ok(())
    }

    pub fn format_lines(&self) -> Vec<String> {
        format_entries(&self.entries)
    }
}

/// `1. name: score points` lines for display.
pub fn format_entries(entries: &[LeaderboardEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec!["No scores recorded yet.".to_string()];
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{}. {}: {} points", i + 1, e.name, e.score))
        .collect()
}

/// Hand-edited files may arrive unsorted or oversized.
fn normalize(entries: &mut Vec<LeaderboardEntry>) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(LEADERBOARD_LIMIT);
}

fn read_shared(path: &Path) -> std::io::Result<String> {
    let file = File::open(path)?;
    let _ = FileExt::lock_shared(&file);
    let text = fs::read_to_string(path);
    let _ = FileExt::unlock(&file);
    text
}

fn write_json_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir)?;
    // Lock the target (without truncating it) while the replacement is prepared.
    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(path)?;
    FileExt::lock_exclusive(&lock_file)?;
    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("leaderboard.json");
    let mut counter = 0u32;
    let tmp_path = loop {
        let cand = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
        match OpenOptions::new().write(true).create_new(true).open(&cand) {
            Ok(mut tmp) => {
                tmp.write_all(content.as_bytes())?;
                tmp.flush()?;
                let _ = tmp.sync_all();
                break cand;
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                counter = counter.saturating_add(1);
            }
            Err(e) => return Err(e),
        }
    };
    fs::rename(&tmp_path, path)?;
    if let Ok(dirf) = File::open(&dir) {
        let _ = dirf.sync_all();
    }
    let _ = FileExt::unlock(&lock_file);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u64) -> LeaderboardEntry {
        LeaderboardEntry {
            name: name.to_string(),
            score,
            recorded_at: None,
        }
    }

    #[test]
    fn record_keeps_order_and_limit() {
        let mut board = Leaderboard::empty("unused.json");
        for i in 0..15u64 {
            board.record(entry(&format!("p{}", i), i * 3 % 11));
        }
        assert_eq!(board.entries().len(), LEADERBOARD_LIMIT);
        assert!(board
            .entries()
            .windows(2)
            .all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn ties_keep_arrival_order_and_names_repeat() {
        let mut board = Leaderboard::empty("unused.json");
        assert_eq!(board.record(entry("ann", 5)), Some(1));
        assert_eq!(board.record(entry("ann", 5)), Some(2));
        assert_eq!(board.record(entry("bob", 9)), Some(1));
        let names: Vec<_> = board.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["bob", "ann", "ann"]);
    }

    #[test]
    fn low_score_on_full_board_is_not_ranked() {
        let mut board = Leaderboard::empty("unused.json");
        for _ in 0..LEADERBOARD_LIMIT {
            board.record(entry("hi", 100));
        }
        assert_eq!(board.record(entry("lo", 1)), None);
        assert!(board.entries().iter().all(|e| e.name == "hi"));
    }

    #[test]
    fn missing_and_blank_files_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = Leaderboard::load(dir.path().join("none.json")).unwrap();
        assert!(missing.entries().is_empty());
        let blank = dir.path().join("blank.json");
        fs::write(&blank, "  \n").unwrap();
        assert!(Leaderboard::load(&blank).unwrap().entries().is_empty());
    }

    #[test]
    fn corrupt_file_recovers_with_warning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lb.json");
        fs::write(&path, "[{\"name\": ").unwrap();
        assert!(Leaderboard::load(&path).is_err());
        let (board, warning) = Leaderboard::load_or_empty(&path);
        assert!(board.entries().is_empty());
        assert!(warning.unwrap().contains("starting empty"));
    }

    #[test]
    fn save_then_load_and_legacy_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("lb.json");
        let mut board = Leaderboard::empty(&path);
        board.record(LeaderboardEntry::new("ada", 42));
        board.save().unwrap();
        let again = Leaderboard::load(&path).unwrap();
        assert_eq!(again.entries()[0].name, "ada");
        assert_eq!(again.entries()[0].score, 42);
        assert!(again.entries()[0].recorded_at.is_some());

        fs::write(
            &path,
            r#"[{"username": "old", "score": 3}, {"username": "new", "score": 8}]"#,
        )
        .unwrap();
        let legacy = Leaderboard::load(&path).unwrap();
        assert_eq!(legacy.entries()[0].name, "new");
        assert_eq!(legacy.format_lines()[1], "2. old: 3 points");
    }

    #[test]
    fn scoring_rules() {
        let mut p = Player::new("s", 100, 10);
        p.navigation_count = 4;
        p.xp = 20;
        p.kills = 3;
        assert_eq!(ScoringRule::Progress.score(&p), 34);
        assert_eq!(ScoringRule::Kills.score(&p), 3);
    }
}
