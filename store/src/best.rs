use serde::{Deserialize, Serialize};
use tilematch_core::Score;

use crate::*;

/// Highest score ever reached, won or not.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BestScore(pub Score);

impl BestScore {
    /// Keeps `score` if it beats the current best.
    pub fn offer(&mut self, score: Score) -> bool {
        if score > self.0 {
            self.0 = score;
            true
        } else {
            false
        }
    }
}

impl StorageKey for BestScore {
    const KEY: &'static str = "tilematch:best-score";
}
