use crate::*;
pub use random::*;

mod random;

pub trait PairGenerator {
    /// Builds a shuffled `grid_size x grid_size` grid, each pool token used in pairs.
    fn generate<T: Token>(&mut self, grid_size: GridSize, pool: &[T]) -> Result<Grid<T>>;
}
