//! High score leaderboard
//!
//! Ranked list of `{name, score, timestamp}` kept sorted by score, highest
//! first, with ties in insertion order. Storage goes through a
//! [`ScoreStore`]; failures there are logged and never interrupt play.

use serde::{Deserialize, Serialize};

use crate::platform::storage::ScoreStore;

/// Default leaderboard length
pub const MAX_HIGH_SCORES: usize = 10;

/// Name recorded when the player leaves the field blank
pub const ANONYMOUS: &str = "Anonymous";

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
    #[serde(skip, default = "default_capacity")]
    capacity: usize,
}

fn default_capacity() -> usize {
    MAX_HIGH_SCORES
}

impl Default for HighScores {
    fn default() -> Self {
        Self::new()
    }
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::with_capacity(MAX_HIGH_SCORES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Build from arbitrary entries: sorted, trimmed
    pub fn from_entries(entries: Vec<HighScoreEntry>, capacity: usize) -> Self {
        let mut scores = Self::with_capacity(capacity);
        scores.entries = entries;
        scores.normalize();
        scores
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < self.capacity {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, name: &str, score: u64, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let name = name.trim();
        let entry = HighScoreEntry {
            name: if name.is_empty() { ANONYMOUS } else { name }.to_string(),
            score,
            timestamp,
        };

        // Below every equal score, so earlier entries keep their place
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(self.capacity);
        log::info!("New high score {} at rank {}", score, rank);

        Some(rank)
    }

    /// Rank (1-indexed) of the first entry with exactly this score
    pub fn rank_of(&self, score: u64) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.score == score)
            .map(|i| i + 1)
    }

    /// Fold another list in, dropping exact duplicates. Returns whether the
    /// board changed.
    pub fn merge(&mut self, other: &[HighScoreEntry]) -> bool {
        let before = self.entries.clone();
        for entry in other {
            if !self.entries.contains(entry) {
                self.entries.push(entry.clone());
            }
        }
        self.normalize();
        self.entries != before
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from `store`, falling back to an empty board
    pub fn load_from(store: &dyn ScoreStore, capacity: usize) -> Self {
        match store.load() {
            Ok(entries) => {
                log::info!("Loaded {} high scores", entries.len());
                Self::from_entries(entries, capacity)
            }
            Err(e) => {
                log::warn!("Could not load high scores, starting with empty list: {}", e);
                Self::with_capacity(capacity)
            }
        }
    }

    /// Merge the entries held by a secondary store (a bundled list, an
    /// import file). An unreadable source leaves the board as it was.
    pub fn import_from(&mut self, source: &dyn ScoreStore) -> bool {
        match source.load() {
            Ok(entries) => {
                let changed = self.merge(&entries);
                log::info!("Imported {} high scores (board changed: {})", entries.len(), changed);
                changed
            }
            Err(e) => {
                log::warn!("Could not import high scores: {}", e);
                false
            }
        }
    }

    /// Save to `store`. Returns whether the write went through.
    pub fn save_to(&self, store: &mut dyn ScoreStore) -> bool {
        match store.save(&self.entries) {
            Ok(()) => {
                log::info!("High scores saved ({} entries)", self.entries.len());
                true
            }
            Err(e) => {
                log::error!("Error saving high scores: {}", e);
                false
            }
        }
    }

    fn normalize(&mut self) {
        // Stable sort keeps insertion order among equal scores
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(self.capacity);
    }
}

/// Format a timestamp as a relative date string
pub fn format_age(now_ms: f64, timestamp: f64) -> String {
    let diff_secs = (now_ms - timestamp) / 1000.0;
    let diff_mins = diff_secs / 60.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        match days {
            1 => "Yesterday".to_string(),
            2..=6 => format!("{} days ago", days),
            7..=13 => "Last week".to_string(),
            _ => format!("{} weeks ago", days / 7),
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::platform::storage::MemoryStore;

    fn entry(name: &str, score: u64, timestamp: f64) -> HighScoreEntry {
        HighScoreEntry {
            name: name.to_string(),
            score,
            timestamp,
        }
    }

    #[test]
    fn test_zero_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert!(scores.qualifies(1));
    }

    #[test]
    fn test_add_score_sorted_and_capped() {
        let mut scores = HighScores::with_capacity(3);
        assert_eq!(scores.add_score("a", 10, 1.0), Some(1));
        assert_eq!(scores.add_score("b", 30, 2.0), Some(1));
        assert_eq!(scores.add_score("c", 20, 3.0), Some(2));
        assert_eq!(scores.add_score("d", 5, 4.0), None);
        assert_eq!(scores.add_score("e", 15, 5.0), Some(3));

        let order: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![30, 20, 15]);
        assert_eq!(scores.top_score(), Some(30));
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut scores = HighScores::new();
        scores.add_score("first", 12, 1.0);
        assert_eq!(scores.potential_rank(12), Some(2));
        scores.add_score("second", 12, 2.0);
        assert_eq!(scores.entries[0].name, "first");
        assert_eq!(scores.entries[1].name, "second");
        assert_eq!(scores.rank_of(12), Some(1));
    }

    #[test]
    fn test_full_board_needs_to_beat_last() {
        let mut scores = HighScores::with_capacity(2);
        scores.add_score("a", 10, 1.0);
        scores.add_score("b", 8, 2.0);
        assert!(!scores.qualifies(8));
        assert!(scores.qualifies(9));
        assert_eq!(scores.potential_rank(9), Some(2));
    }

    #[test]
    fn test_blank_name_is_anonymous() {
        let mut scores = HighScores::new();
        scores.add_score("   ", 3, 1.0);
        scores.add_score("  Ada ", 2, 2.0);
        assert_eq!(scores.entries[0].name, ANONYMOUS);
        assert_eq!(scores.entries[1].name, "Ada");
    }

    #[test]
    fn test_merge_dedupes() {
        let mut scores = HighScores::from_entries(vec![entry("a", 5, 1.0), entry("b", 9, 2.0)], 10);
        scores.merge(&[entry("a", 5, 1.0), entry("c", 7, 3.0)]);
        let names: Vec<&str> = scores.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_store_round_trip() {
        let mut store = MemoryStore::default();
        let mut scores = HighScores::new();
        scores.add_score("a", 4, 1.0);
        assert!(scores.save_to(&mut store));
        let loaded = HighScores::load_from(&store, MAX_HIGH_SCORES);
        assert_eq!(loaded, scores);
    }

    struct BrokenStore;

    impl ScoreStore for BrokenStore {
        fn load(&self) -> Result<Vec<HighScoreEntry>, StorageError> {
            Err(StorageError::Unavailable("offline".into()))
        }

        fn save(&mut self, _entries: &[HighScoreEntry]) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("offline".into()))
        }
    }

    #[test]
    fn test_storage_failures_are_contained() {
        let scores = HighScores::load_from(&BrokenStore, MAX_HIGH_SCORES);
        assert!(scores.is_empty());
        assert!(!scores.save_to(&mut BrokenStore));
    }

    #[test]
    fn test_format_age() {
        let now = 10.0 * 24.0 * 3600.0 * 1000.0;
        assert_eq!(format_age(now, now - 5_000.0), "Just now");
        assert_eq!(format_age(now, now - 60_000.0), "1 min ago");
        assert_eq!(format_age(now, now - 3.0 * 3_600_000.0), "3 hours ago");
        assert_eq!(format_age(now, now - 86_400_000.0), "Yesterday");
        assert_eq!(format_age(now, now - 8.0 * 86_400_000.0), "Last week");
        assert_eq!(format_age(now * 3.0, now * 3.0 - 21.0 * 86_400_000.0), "3 weeks ago");
    }
}
