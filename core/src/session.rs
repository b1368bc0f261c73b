use serde::{Deserialize, Serialize};

use crate::*;

/// Remaining allowance before the session is lost.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Budget {
    Lives(u8),
    /// Seconds left on the countdown.
    Time(u32),
}

impl Budget {
    pub const fn is_exhausted(self) -> bool {
        matches!(self, Self::Lives(0) | Self::Time(0))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub score: Score,
    /// Number of second-of-pair taps.
    pub moves: u32,
    pub matched_pairs: CellCount,
    pub pair_count: CellCount,
    pub budget: Budget,
}

impl SessionStats {
    pub(crate) const fn new(pair_count: CellCount, budget: Budget) -> Self {
        Self {
            score: 0,
            moves: 0,
            matched_pairs: 0,
            pair_count,
            budget,
        }
    }

    pub const fn lives(&self) -> Option<u8> {
        match self.budget {
            Budget::Lives(lives) => Some(lives),
            Budget::Time(_) => None,
        }
    }

    pub const fn time_remaining(&self) -> Option<u32> {
        match self.budget {
            Budget::Time(secs) => Some(secs),
            Budget::Lives(_) => None,
        }
    }

    pub const fn all_matched(&self) -> bool {
        self.matched_pairs >= self.pair_count
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    pub const fn is_win(self) -> bool {
        matches!(self, Self::Won)
    }
}

/// Valid transitions:
/// - Idle -> OneSelected
/// - OneSelected -> Resolving
/// - Resolving -> Idle
/// - Idle | OneSelected | Resolving -> Ended
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Idle,
    OneSelected,
    /// A pair or the final outcome is waiting on its pacing delay, taps are ignored.
    Resolving,
    Ended(Outcome),
}

impl SessionPhase {
    pub const fn is_ended(self) -> bool {
        matches!(self, Self::Ended(_))
    }

    pub const fn accepts_taps(self) -> bool {
        matches!(self, Self::Idle | Self::OneSelected)
    }
}

impl Default for SessionPhase {
    fn default() -> Self {
        Self::Idle
    }
}

/// Face-up cells waiting to be compared.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub first: Option<CellIndex>,
    pub second: Option<CellIndex>,
    pub processing: bool,
}

impl Selection {
    pub const fn pending_count(&self) -> usize {
        self.first.is_some() as usize + self.second.is_some() as usize
    }
}

/// Frozen once the session reaches `Ended`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub won: bool,
    pub score: Score,
    pub level: Level,
    pub moves: u32,
    pub matched_pairs: CellCount,
}

impl SessionResult {
    pub(crate) const fn freeze(outcome: Outcome, stats: &SessionStats, level: Level) -> Self {
        Self {
            won: outcome.is_win(),
            score: stats.score,
            level,
            moves: stats.moves,
            matched_pairs: stats.matched_pairs,
        }
    }
}

/// Immutable view published to the presentation after every transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot<T> {
    pub generation: Generation,
    pub level: Level,
    pub grid: Grid<T>,
    pub stats: SessionStats,
    pub phase: SessionPhase,
    pub selection: Selection,
    pub hint: Option<(CellIndex, CellIndex)>,
    pub result: Option<SessionResult>,
}

impl<T> SessionSnapshot<T> {
    pub const fn is_ended(&self) -> bool {
        self.phase.is_ended()
    }

    /// Cells currently face-up and not solved.
    pub fn pending_cells(&self) -> impl Iterator<Item = &Cell<T>> {
        self.grid.cells().iter().filter(|cell| cell.is_pending())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_exhaustion() {
        assert!(Budget::Lives(0).is_exhausted());
        assert!(Budget::Time(0).is_exhausted());
        assert!(!Budget::Lives(1).is_exhausted());
    }

    #[test]
    fn result_freezes_stats() {
        let mut stats = SessionStats::new(4, Budget::Lives(5));
        stats.score = 40;
        stats.moves = 6;
        stats.matched_pairs = 4;

        let result = SessionResult::freeze(Outcome::Won, &stats, Level::Easy);

        assert!(result.won);
        assert_eq!(result.score, 40);
        assert_eq!(result.moves, 6);
        assert_eq!(result.level, Level::Easy);
    }

    #[test]
    fn only_idle_and_one_selected_take_taps() {
        assert!(SessionPhase::Idle.accepts_taps());
        assert!(SessionPhase::OneSelected.accepts_taps());
        assert!(!SessionPhase::Resolving.accepts_taps());
        assert!(!SessionPhase::Ended(Outcome::Lost).accepts_taps());
    }
}
