use rand::Rng;
use rand::seq::IteratorRandom;
use tracing::debug;

use crate::config::{FOOD_PLACEMENT_ATTEMPTS, GridSize};
use crate::error::GameError;
use crate::snake::{Position, Snake};

/// Picks a food cell inside `grid` that the snake does not occupy.
///
/// Draws uniformly over the grid up to [`FOOD_PLACEMENT_ATTEMPTS`] times,
/// then picks uniformly among the free cells left. Returns
/// [`GameError::FullGrid`] when the snake covers every cell.
pub fn place_food<R: Rng + ?Sized>(
    rng: &mut R,
    snake: &Snake,
    grid: GridSize,
) -> Result<Position, GameError> {
    // Segments never overlap, so a snake this long covers the board.
    if snake.len() >= grid.total_cells() {
        return Err(GameError::FullGrid { size: grid.size() });
    }

    let size = i32::from(grid.size());

    for _ in 0..FOOD_PLACEMENT_ATTEMPTS {
        let candidate = Position::new(rng.gen_range(0..size), rng.gen_range(0..size));
        if !snake.occupies(candidate) {
            return Ok(candidate);
        }
    }

    debug!(
        snake_len = snake.len(),
        attempts = FOOD_PLACEMENT_ATTEMPTS,
        "random food draws exhausted, choosing among free cells"
    );

    random_free_cell(rng, snake, grid).ok_or(GameError::FullGrid { size: grid.size() })
}

fn random_free_cell<R: Rng + ?Sized>(rng: &mut R, snake: &Snake, grid: GridSize) -> Option<Position> {
    let size = i32::from(grid.size());

    (0..size)
        .flat_map(|y| (0..size).map(move |x| Position::new(x, y)))
        .filter(|position| !snake.occupies(*position))
        .choose(rng)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::config::GridSize;
    use crate::error::GameError;
    use crate::input::Direction;
    use crate::snake::{Position, Snake};

    use super::{place_food, random_free_cell};

    /// Boustrophedon fill of a grid, head first, leaving `free` cells at the end.
    fn filled_snake(size: i32, free: usize) -> Snake {
        let mut cells = Vec::new();
        for y in 0..size {
            let row: Vec<i32> = if y % 2 == 0 {
                (0..size).collect()
            } else {
                (0..size).rev().collect()
            };
            for x in row {
                cells.push(Position::new(x, y));
            }
        }
        let keep = cells.len() - free;
        cells.truncate(keep);
        cells.reverse();
        Snake::from_segments(cells, Direction::Left)
    }

    #[test]
    fn food_never_overlaps_snake() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = GridSize::new(8).expect("valid grid");
        let snake = Snake::from_segments(
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(2, 0),
            ],
            Direction::Right,
        );

        for _ in 0..200 {
            let food = place_food(&mut rng, &snake, grid).expect("free cells remain");
            assert!(food.is_within(grid));
            assert!(!snake.occupies(food));
        }
    }

    #[test]
    fn fallback_spreads_evenly_over_free_cells() {
        let mut rng = StdRng::seed_from_u64(21);
        let grid = GridSize::new(20).expect("valid grid");
        let snake = filled_snake(20, 40);
        let mut counts: HashMap<Position, u32> = HashMap::new();

        for _ in 0..10_000 {
            let cell = random_free_cell(&mut rng, &snake, grid).expect("free cells remain");
            *counts.entry(cell).or_insert(0) += 1;
        }

        // 40 free cells, so each expects about 250 hits.
        assert_eq!(counts.len(), 40);
        assert!(counts.keys().all(|cell| !snake.occupies(*cell)));
        assert!(counts.values().all(|hits| (150..=350).contains(hits)), "{counts:?}");
    }

    #[test]
    fn placement_on_nearly_full_grid_is_not_biased_to_the_first_free_cell() {
        let mut rng = StdRng::seed_from_u64(5);
        let grid = GridSize::new(20).expect("valid grid");
        let snake = filled_snake(20, 40);
        let first_free = Position::new(0, 18);
        assert!(!snake.occupies(first_free));

        let hits = (0..10_000)
            .filter(|_| place_food(&mut rng, &snake, grid) == Ok(first_free))
            .count();

        assert!((150..=350).contains(&hits), "first free cell chosen {hits} times");
    }

    #[test]
    fn nearly_full_grid_finds_the_last_free_cell() {
        let mut rng = StdRng::seed_from_u64(11);
        let grid = GridSize::new(5).expect("valid grid");
        let snake = filled_snake(5, 1);

        let food = place_food(&mut rng, &snake, grid).expect("one free cell remains");

        // Row 4 is traversed left to right, so its last cell stays free.
        assert_eq!(food, Position::new(4, 4));
    }

    #[test]
    fn full_grid_reports_instead_of_looping() {
        let mut rng = StdRng::seed_from_u64(3);
        let grid = GridSize::new(5).expect("valid grid");
        let snake = filled_snake(5, 0);

        assert_eq!(
            place_food(&mut rng, &snake, grid),
            Err(GameError::FullGrid { size: 5 })
        );
    }
}
