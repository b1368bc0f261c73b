use serde::{Deserialize, Serialize};

use crate::*;

/// One grid position and the token hidden under it.
///
/// A matched cell is always revealed, `hide` leaves it alone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell<T> {
    index: CellIndex,
    token: T,
    revealed: bool,
    matched: bool,
}

impl<T> Cell<T> {
    pub const fn new(index: CellIndex, token: T) -> Self {
        Self {
            index,
            token,
            revealed: false,
            matched: false,
        }
    }

    pub const fn index(&self) -> CellIndex {
        self.index
    }

    pub const fn token(&self) -> &T {
        &self.token
    }

    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub const fn is_matched(&self) -> bool {
        self.matched
    }

    /// Face-up but not solved yet.
    pub const fn is_pending(&self) -> bool {
        self.revealed && !self.matched
    }

    pub(crate) fn reveal(&mut self) {
        self.revealed = true;
    }

    pub(crate) fn hide(&mut self) {
        if !self.matched {
            self.revealed = false;
        }
    }

    pub(crate) fn mark_matched(&mut self) {
        self.revealed = true;
        self.matched = true;
    }
}
