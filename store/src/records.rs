use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tilematch_core::{Level, Score, ScoreKeeper, SessionResult};

use crate::*;

struct Inner<S> {
    store: S,
    leaderboard: Leaderboard,
    best: BestScore,
}

/// Best score and leaderboard over a key-value backend.
///
/// Calls are serialized, so concurrent wins never lose each other's entries.
pub struct Records<S> {
    inner: Mutex<Inner<S>>,
    clock: fn() -> DateTime<Utc>,
}

impl<S: KeyValueStore> Records<S> {
    /// Loads both records. Missing or malformed data starts empty.
    pub fn open(store: S) -> Self {
        Self::with_clock(store, Utc::now)
    }

    pub fn with_clock(store: S, clock: fn() -> DateTime<Utc>) -> Self {
        let mut leaderboard = Leaderboard::load_or_default(&store);
        leaderboard.normalize();
        let best = BestScore::load_or_default(&store);
        log::debug!(
            "Loaded {} leaderboard entries, best score {}",
            leaderboard.len(),
            best.0
        );

        Self {
            inner: Mutex::new(Inner {
                store,
                leaderboard,
                best,
            }),
            clock,
        }
    }

    /// Adds a won session to the leaderboard and persists it.
    ///
    /// The best score is raised too when the win beats it.
    pub fn record_win(&self, score: Score, level: Level) -> Result<LeaderboardEntry> {
        let mut inner = self.lock();
        let Inner {
            store,
            leaderboard,
            best,
        } = &mut *inner;

        // memory follows disk: the new board is kept only once written
        let mut updated = leaderboard.clone();
        let entry = updated.insert(score, level, (self.clock)());
        let saved = updated.save(store);
        if saved.is_ok() {
            *leaderboard = updated;
        }
        if best.offer(score) {
            best.save(store)?;
        }
        saved?;

        log::info!(
            "Recorded {} win with score {} (entry {})",
            level,
            score,
            entry.id
        );
        Ok(entry)
    }

    /// Copy of the board, highest first, optionally one level only.
    pub fn top_entries(&self, level: Option<Level>) -> Vec<LeaderboardEntry> {
        self.lock().leaderboard.top(level)
    }

    pub fn best_score(&self) -> Score {
        self.lock().best.0
    }

    /// Persists `score` if it beats the best. Returns whether it did.
    pub fn offer_score(&self, score: Score) -> Result<bool> {
        let mut inner = self.lock();
        let Inner { store, best, .. } = &mut *inner;
        if !best.offer(score) {
            return Ok(false);
        }
        best.save(store)?;
        log::debug!("New best score {score}");
        Ok(true)
    }

    /// Re-reads both records from the backend.
    pub fn reload(&self) {
        let mut inner = self.lock();
        let mut leaderboard = Leaderboard::load_or_default(&inner.store);
        leaderboard.normalize();
        inner.best = BestScore::load_or_default(&inner.store);
        inner.leaderboard = leaderboard;
    }

    /// Clears both records in memory and in the backend.
    pub fn reset(&self) -> Result<()> {
        let mut inner = self.lock();
        inner.store.remove(Leaderboard::KEY)?;
        inner.store.remove(BestScore::KEY)?;
        inner.leaderboard = Leaderboard::default();
        inner.best = BestScore::default();
        Ok(())
    }

    pub fn into_store(self) -> S {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .store
    }

    fn lock(&self) -> MutexGuard<'_, Inner<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: KeyValueStore> ScoreKeeper for Records<S> {
    fn score_changed(&self, score: Score, _level: Level) {
        if let Err(err) = self.offer_score(score) {
            log::error!("Failed to save best score: {err}");
        }
    }

    fn session_won(&self, result: &SessionResult) {
        if !result.won {
            return;
        }
        if let Err(err) = self.record_win(result.score, result.level) {
            log::error!("Failed to save leaderboard: {err}");
        }
    }
}

impl<S> std::fmt::Debug for Records<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Records").finish_non_exhaustive()
    }
}
