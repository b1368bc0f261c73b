#![no_std]

extern crate alloc;
#[cfg(any(feature = "std", test))]
extern crate std;

use alloc::vec::Vec;
use core::ops::{Index, IndexMut};
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use keeper::*;
pub use schedule::*;
pub use session::*;
pub use timer::*;
pub use token::*;
pub use types::*;

mod cell;
mod config;
mod engine;
mod error;
mod generator;
mod keeper;
mod schedule;
mod session;
mod timer;
mod token;
mod types;

/// Square board of cells, stored row-major.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    size: GridSize,
    cells: Vec<Cell<T>>,
}

impl<T> Grid<T> {
    /// Lays `tokens` out in order, one per cell.
    pub fn from_tokens(size: GridSize, tokens: Vec<T>) -> Result<Self> {
        if size < MIN_GRID_SIZE {
            return Err(GameError::GridTooSmall(size));
        }
        let expected = usize::from(square(size));
        if tokens.len() != expected {
            return Err(GameError::InvalidLayout {
                expected,
                actual: tokens.len(),
            });
        }

        let cells = tokens
            .into_iter()
            .enumerate()
            .map(|(i, token)| Cell::new(i as CellIndex, token))
            .collect();
        Ok(Self { size, cells })
    }

    pub const fn size(&self) -> GridSize {
        self.size
    }

    pub const fn total_cells(&self) -> CellCount {
        square(self.size)
    }

    /// Pairs needed to win, an odd grid's orphan cell is not counted.
    pub const fn pair_count(&self) -> CellCount {
        self.total_cells() / 2
    }

    pub fn cells(&self) -> &[Cell<T>] {
        &self.cells
    }

    pub fn get(&self, index: CellIndex) -> Option<&Cell<T>> {
        self.cells.get(usize::from(index))
    }

    pub fn validate_index(&self, index: CellIndex) -> Result<CellIndex> {
        if usize::from(index) < self.cells.len() {
            Ok(index)
        } else {
            Err(GameError::InvalidIndex(index))
        }
    }

    pub fn matched_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.is_matched()).count() as CellCount
    }

    pub fn pending_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_pending()).count()
    }
}

impl<T: Token> Grid<T> {
    /// First pair, by ascending index, of face-down cells sharing a token.
    pub fn first_hidden_pair(&self) -> Option<(CellIndex, CellIndex)> {
        let hidden: Vec<&Cell<T>> = self
            .cells
            .iter()
            .filter(|cell| !cell.is_revealed() && !cell.is_matched())
            .collect();

        hidden.iter().enumerate().find_map(|(pos, a)| {
            hidden[pos + 1..]
                .iter()
                .find(|b| a.token().matches(b.token()))
                .map(|b| (a.index(), b.index()))
        })
    }
}

impl<T> Index<CellIndex> for Grid<T> {
    type Output = Cell<T>;

    fn index(&self, index: CellIndex) -> &Self::Output {
        &self.cells[usize::from(index)]
    }
}

impl<T> IndexMut<CellIndex> for Grid<T> {
    fn index_mut(&mut self, index: CellIndex) -> &mut Self::Output {
        &mut self.cells[usize::from(index)]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    NoChange,
    Matched,
    Mismatched,
    /// The match completed the grid.
    Won,
    /// The mismatch used up the last life.
    Lost,
}

impl Resolution {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn outcome(self) -> Option<Outcome> {
        match self {
            Self::Won => Some(Outcome::Won),
            Self::Lost => Some(Outcome::Lost),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    NoChange,
    /// First cell of a pair is face-up.
    Revealed,
    /// Second cell is face-up, comparison waits on the resolve delay.
    PairPending,
    /// Second cell is face-up and the pair was compared right away.
    Resolved(Resolution),
}

impl SelectOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    NoChange,
    /// Seconds left after this tick.
    Counted(u32),
    TimeUp,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HintOutcome {
    NoChange,
    Shown(CellIndex, CellIndex),
}
