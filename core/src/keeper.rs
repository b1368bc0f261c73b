use crate::*;

/// Receives scores the engine wants persisted.
///
/// Only winning results are ever passed to `session_won`.
pub trait ScoreKeeper {
    /// Running score went up after a match.
    fn score_changed(&self, score: Score, level: Level) {
        let _ = (score, level);
    }

    fn session_won(&self, result: &SessionResult);
}
