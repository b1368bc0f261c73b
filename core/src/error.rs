use alloc::string::String;
use thiserror::Error;

use crate::{CellIndex, GridSize};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Grid size {0} is too small, at least 2 is required")]
    GridTooSmall(GridSize),
    #[error("Token pool is empty")]
    EmptyTokenPool,
    #[error("Unknown level {0:?}")]
    UnknownLevel(String),
    #[error("Cell index {0} is out of bounds")]
    InvalidIndex(CellIndex),
    #[error("Layout has {actual} tokens but the grid needs {expected}")]
    InvalidLayout { expected: usize, actual: usize },
    #[error("Grid size {0} is odd, these rules need an even grid")]
    OddGrid(GridSize),
}

pub type Result<T> = core::result::Result<T, GameError>;
