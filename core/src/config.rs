use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Difficulty label, also the leaderboard's grouping key.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    #[default]
    Easy,
    Medium,
    Complex,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Easy, Level::Medium, Level::Complex];

    pub const fn label(self) -> &'static str {
        use Level::*;
        match self {
            Easy => "Easy",
            Medium => "Medium",
            Complex => "Complex",
        }
    }

    pub const fn default_grid_size(self) -> GridSize {
        use Level::*;
        match self {
            Easy => 3,
            Medium => 5,
            Complex => 7,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Level {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Level::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::UnknownLevel(s.to_string()))
    }
}

/// Inputs for one round, validated at construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    grid_size: GridSize,
    level: Level,
}

impl SessionConfig {
    pub fn new(grid_size: GridSize, level: Level) -> Result<Self> {
        if grid_size < MIN_GRID_SIZE {
            return Err(GameError::GridTooSmall(grid_size));
        }
        Ok(Self { grid_size, level })
    }

    pub fn for_level(level: Level) -> Self {
        Self {
            grid_size: level.default_grid_size(),
            level,
        }
    }

    /// Requested side length, before any even rounding.
    pub const fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    pub const fn level(&self) -> Level {
        self.level
    }
}

/// What ends a session other than clearing the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Lose once this many mismatches have been made.
    Lives(u8),
    /// Lose when the countdown, `grid_size * seconds_per_size`, runs out.
    Countdown { seconds_per_size: u32 },
}

impl Termination {
    pub const DEFAULT_LIVES: u8 = 5;
    pub const DEFAULT_SECONDS_PER_SIZE: u32 = 12;

    pub(crate) fn initial_budget(self, grid_size: GridSize) -> Budget {
        match self {
            Self::Lives(lives) => Budget::Lives(lives),
            Self::Countdown { seconds_per_size } => {
                Budget::Time(u32::from(grid_size).saturating_mul(seconds_per_size))
            }
        }
    }
}

/// UI pacing delays, the engine never needs them for correctness.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pacing {
    /// Wait after the second tap before comparing the pair.
    pub resolve_delay: Duration,
    /// Wait after the deciding resolution before the session ends.
    pub finish_delay: Duration,
    /// How long a hinted pair stays face-up.
    pub hint_duration: Duration,
    /// Countdown granularity.
    pub tick_interval: Duration,
}

impl Pacing {
    /// Zero delays, pairs resolve and sessions end synchronously.
    pub const fn immediate() -> Self {
        Self {
            resolve_delay: Duration::ZERO,
            finish_delay: Duration::ZERO,
            hint_duration: Self::DEFAULT.hint_duration,
            tick_interval: Self::DEFAULT.tick_interval,
        }
    }

    const DEFAULT: Pacing = Pacing {
        resolve_delay: Duration::from_millis(800),
        finish_delay: Duration::from_millis(500),
        hint_duration: Duration::from_secs(2),
        tick_interval: Duration::from_secs(1),
    };
}

impl Default for Pacing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Everything that differs between the game variants.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RuleSet {
    pub termination: Termination,
    /// Round odd grid sizes up so every cell has a partner.
    pub even_grid: bool,
    pub pacing: Pacing,
}

impl RuleSet {
    /// Colour pairs, five lives, odd grids keep their orphan cell.
    pub const fn classic() -> Self {
        Self {
            termination: Termination::Lives(Termination::DEFAULT_LIVES),
            even_grid: false,
            pacing: Pacing::DEFAULT,
        }
    }

    /// Icon pairs against the clock on an even grid.
    pub const fn timed() -> Self {
        Self {
            termination: Termination::Countdown {
                seconds_per_size: Termination::DEFAULT_SECONDS_PER_SIZE,
            },
            even_grid: true,
            pacing: Pacing::DEFAULT,
        }
    }

    pub const fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub const fn with_termination(mut self, termination: Termination) -> Self {
        self.termination = termination;
        self
    }

    /// Side length of the grid actually generated for `config`.
    pub const fn effective_grid_size(&self, config: &SessionConfig) -> GridSize {
        if self.even_grid {
            round_to_even(config.grid_size)
        } else {
            config.grid_size
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parses_known_labels_only() {
        assert_eq!("Easy".parse::<Level>(), Ok(Level::Easy));
        assert_eq!(" complex ".parse::<Level>(), Ok(Level::Complex));
        assert_eq!(
            "Nightmare".parse::<Level>(),
            Err(GameError::UnknownLevel("Nightmare".into()))
        );
    }

    #[test]
    fn session_config_rejects_tiny_grids() {
        assert_eq!(SessionConfig::new(1, Level::Easy), Err(GameError::GridTooSmall(1)));
        assert_eq!(SessionConfig::new(0, Level::Easy), Err(GameError::GridTooSmall(0)));
        assert!(SessionConfig::new(2, Level::Easy).is_ok());
    }

    #[test]
    fn countdown_uses_requested_size() {
        let budget = RuleSet::timed().termination.initial_budget(3);
        assert_eq!(budget, Budget::Time(36));
    }

    #[test]
    fn timed_rules_round_grid_to_even() {
        let config = SessionConfig::for_level(Level::Medium);
        assert_eq!(RuleSet::timed().effective_grid_size(&config), 6);
        assert_eq!(RuleSet::classic().effective_grid_size(&config), 5);
    }
}
