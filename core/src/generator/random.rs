use alloc::vec::Vec;
use rand::prelude::*;

use super::*;

/// Cycles through the pool to assign pair tokens, then shuffles uniformly.
///
/// Odd grids get one extra token picked at random from the pool, that cell
/// can never be matched.
#[derive(Clone, Debug)]
pub struct RandomPairGenerator {
    rng: SmallRng,
}

impl RandomPairGenerator {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    #[cfg(feature = "std")]
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }
}

impl PairGenerator for RandomPairGenerator {
    fn generate<T: Token>(&mut self, grid_size: GridSize, pool: &[T]) -> Result<Grid<T>> {
        if pool.is_empty() {
            return Err(GameError::EmptyTokenPool);
        }
        if grid_size < MIN_GRID_SIZE {
            return Err(GameError::GridTooSmall(grid_size));
        }

        let total_cells = usize::from(square(grid_size));
        let pair_count = total_cells / 2;
        if pair_count > pool.len() {
            log::trace!(
                "Reusing tokens, {} pairs from a pool of {}",
                pair_count,
                pool.len()
            );
        }

        let mut tokens = Vec::with_capacity(total_cells);
        for i in 0..pair_count {
            let token = &pool[i % pool.len()];
            tokens.push(token.clone());
            tokens.push(token.clone());
        }

        if total_cells % 2 == 1 {
            let extra = self.rng.random_range(0..pool.len());
            log::debug!("Odd grid, orphan token {:?}", pool[extra]);
            tokens.push(pool[extra].clone());
        }

        tokens.shuffle(&mut self.rng);
        Grid::from_tokens(grid_size, tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn occurrences<T: Token>(grid: &Grid<T>, token: &T) -> usize {
        grid.cells()
            .iter()
            .filter(|cell| cell.token().matches(token))
            .count()
    }

    #[test]
    fn four_by_four_uses_every_token_twice() {
        let pool = vec!['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];
        let grid = RandomPairGenerator::from_seed(7).generate(4, &pool).unwrap();

        assert_eq!(grid.cells().len(), 16);
        for token in &pool {
            assert_eq!(occurrences(&grid, token), 2, "token {token}");
        }
    }

    #[test]
    fn every_size_pairs_all_but_one_cell() {
        let pool = Color::vibrant_pool();
        let mut generator = RandomPairGenerator::from_seed(42);

        for size in 2..=9 {
            let grid = generator.generate(size, &pool).unwrap();
            assert_eq!(grid.cells().len(), usize::from(size) * usize::from(size));

            let odd_tokens = pool
                .iter()
                .filter(|token| occurrences(&grid, *token) % 2 == 1)
                .count();
            let expected_odd = usize::from(size % 2 == 1);
            assert_eq!(odd_tokens, expected_odd, "size {size}");

            for cell in grid.cells() {
                assert!(!cell.is_revealed());
                assert!(!cell.is_matched());
            }
        }
    }

    #[test]
    fn small_pool_is_cycled_in_order() {
        let pool = vec!['x', 'y'];
        let grid = RandomPairGenerator::from_seed(1).generate(4, &pool).unwrap();

        // 8 pairs over 2 tokens, 4 pairs each
        assert_eq!(occurrences(&grid, &'x'), 8);
        assert_eq!(occurrences(&grid, &'y'), 8);
    }

    #[test]
    fn single_token_pool_with_odd_grid() {
        let grid = RandomPairGenerator::from_seed(3).generate(3, &['z']).unwrap();
        assert_eq!(occurrences(&grid, &'z'), 9);
        assert_eq!(grid.pair_count(), 4);
    }

    #[test]
    fn cell_indices_follow_positions() {
        let grid = RandomPairGenerator::from_seed(9)
            .generate(5, &Color::vibrant_pool())
            .unwrap();
        for (i, cell) in grid.cells().iter().enumerate() {
            assert_eq!(usize::from(cell.index()), i);
        }
    }

    #[test]
    fn seeds_reproduce_layouts() {
        let pool = IconToken::pool();
        let a = RandomPairGenerator::from_seed(5).generate(6, &pool).unwrap();
        let b = RandomPairGenerator::from_seed(5).generate(6, &pool).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn layout_is_shuffled() {
        let pool = IconToken::pool();
        let grid = RandomPairGenerator::from_seed(5).generate(6, &pool).unwrap();

        let dealt: Vec<IconToken> = grid.cells().iter().map(|cell| *cell.token()).collect();
        let in_order: Vec<IconToken> = (0..18)
            .flat_map(|i| [pool[i % pool.len()]; 2])
            .collect();
        assert_ne!(dealt, in_order);
    }

    #[test]
    fn rejects_empty_pool_and_tiny_grid() {
        let mut generator = RandomPairGenerator::from_seed(0);
        assert_eq!(
            generator.generate::<char>(4, &[]),
            Err(GameError::EmptyTokenPool)
        );
        assert_eq!(
            generator.generate(1, &['a']),
            Err(GameError::GridTooSmall(1))
        );
    }
}
