/// Side length of a square grid.
pub type GridSize = u8;

/// Position of a cell in the flattened, row-major grid.
pub type CellIndex = u16;

/// Count type used for cell, pair and match counts.
pub type CellCount = u16;

/// Points accumulated during a session.
pub type Score = u32;

/// Smallest grid side that still holds a pair.
pub const MIN_GRID_SIZE: GridSize = 2;

/// Points awarded for every matched pair.
pub const MATCH_POINTS: Score = 10;

pub const fn square(size: GridSize) -> CellCount {
    let size = size as CellCount;
    size.saturating_mul(size)
}

/// Rounds odd sizes up by one, or down when rounding up would not fit.
pub const fn round_to_even(size: GridSize) -> GridSize {
    if size % 2 == 0 {
        size
    } else if size == GridSize::MAX {
        size - 1
    } else {
        size + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_even_bumps_odd_sizes() {
        assert_eq!(round_to_even(3), 4);
        assert_eq!(round_to_even(4), 4);
        assert_eq!(round_to_even(7), 8);
        assert_eq!(round_to_even(GridSize::MAX), GridSize::MAX - 1);
    }

    #[test]
    fn square_covers_largest_grid() {
        assert_eq!(square(255), 65025);
    }
}
