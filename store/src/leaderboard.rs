use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tilematch_core::{Level, Score};

use crate::*;

/// Winning sessions kept on the board.
pub const LEADERBOARD_CAPACITY: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: u64,
    pub score: Score,
    pub level: Level,
    pub date: DateTime<Utc>,
}

/// Top winning scores, highest first.
///
/// Equal scores keep insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Adds a win and drops whatever falls below the cut.
    ///
    /// Returns the new entry, also when it did not make the board.
    pub fn insert(&mut self, score: Score, level: Level, date: DateTime<Utc>) -> LeaderboardEntry {
        let entry = LeaderboardEntry {
            id: self.next_id(),
            score,
            level,
            date,
        };
        self.entries.push(entry.clone());
        self.normalize();
        entry
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Owned copy of the board, optionally only one level's entries.
    pub fn top(&self, level: Option<Level>) -> Vec<LeaderboardEntry> {
        self.entries
            .iter()
            .filter(|entry| level.is_none_or(|level| entry.level == level))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Restores ordering and the cap, stored data may have neither.
    pub(crate) fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(LEADERBOARD_CAPACITY);
    }

    fn next_id(&mut self) -> u64 {
        let highest = self.entries.iter().map(|entry| entry.id).max().unwrap_or(0);
        if let Some(id) = highest.checked_add(1) {
            return id;
        }

        log::warn!("Leaderboard ids exhausted, renumbering {} entries", self.len());
        for (id, entry) in (1..).zip(self.entries.iter_mut()) {
            entry.id = id;
        }
        self.entries.len() as u64 + 1
    }
}

impl StorageKey for Leaderboard {
    const KEY: &'static str = "tilematch:leaderboard";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(secs, 0).unwrap()
    }

    fn scores(board: &Leaderboard) -> Vec<Score> {
        board.entries().iter().map(|entry| entry.score).collect()
    }

    #[test]
    fn keeps_scores_descending() {
        let mut board = Leaderboard::default();
        board.insert(50, Level::Easy, at(1));
        board.insert(30, Level::Easy, at(2));
        board.insert(80, Level::Easy, at(3));

        assert_eq!(scores(&board), vec![80, 50, 30]);
    }

    #[test]
    fn caps_at_ten_entries() {
        let mut board = Leaderboard::default();
        for score in 1..=15 {
            board.insert(score * 10, Level::Medium, at(score.into()));
        }

        assert_eq!(board.len(), LEADERBOARD_CAPACITY);
        assert_eq!(board.entries()[0].score, 150);
        assert_eq!(board.entries()[9].score, 60);

        let low = board.insert(10, Level::Medium, at(99));
        assert!(!board.contains(low.id));
        assert_eq!(board.len(), LEADERBOARD_CAPACITY);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut board = Leaderboard::default();
        let first = board.insert(40, Level::Easy, at(1));
        let second = board.insert(40, Level::Complex, at(2));
        board.insert(90, Level::Easy, at(3));

        let ids: Vec<u64> = board.entries().iter().map(|entry| entry.id).collect();
        assert_eq!(ids[1..], [first.id, second.id]);
    }

    #[test]
    fn ids_are_unique_among_entries() {
        let mut board = Leaderboard::default();
        let a = board.insert(10, Level::Easy, at(1));
        let b = board.insert(10, Level::Easy, at(2));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn exhausted_ids_are_renumbered() {
        let mut board = Leaderboard::default();
        board.insert(10, Level::Easy, at(1));
        board.insert(30, Level::Easy, at(2));
        board.entries[0].id = u64::MAX;

        let entry = board.insert(20, Level::Easy, at(3));
        assert_eq!(entry.id, 3);
        let ids: Vec<u64> = board.entries().iter().map(|entry| entry.id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[test]
    fn top_filters_by_level() {
        let mut board = Leaderboard::default();
        board.insert(10, Level::Easy, at(1));
        board.insert(70, Level::Complex, at(2));
        board.insert(20, Level::Easy, at(3));

        let easy: Vec<Score> = board
            .top(Some(Level::Easy))
            .iter()
            .map(|entry| entry.score)
            .collect();
        assert_eq!(easy, vec![20, 10]);
        assert_eq!(board.top(None).len(), 3);
    }

    #[test]
    fn serializes_as_plain_record_list() {
        let mut board = Leaderboard::default();
        board.insert(50, Level::Easy, at(0));

        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "id": 1,
                "score": 50,
                "level": "Easy",
                "date": "1970-01-01T00:00:00Z",
            }])
        );
    }

    #[test]
    fn unsorted_stored_list_is_normalized_on_load() {
        let mut store = MemoryStore::new();
        let raw = serde_json::json!([
            {"id": 1, "score": 10, "level": "Easy", "date": "2026-01-01T00:00:00Z"},
            {"id": 2, "score": 30, "level": "Medium", "date": "2026-01-02T00:00:00Z"},
        ]);
        store.write(Leaderboard::KEY, &raw.to_string()).unwrap();

        let mut board = Leaderboard::load_or_default(&store);
        board.normalize();
        assert_eq!(scores(&board), vec![30, 10]);
    }
}
