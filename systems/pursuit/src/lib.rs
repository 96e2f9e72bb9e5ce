#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Adversary policy that chases adjacent protagonists and wanders otherwise.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ratmaze_core::{BoardView, Category, Direction, GridCoord, Order};

/// Orders drawn uniformly when no protagonist is adjacent.
const WANDER_ORDERS: [Order; 5] = [
    Order::Step(Direction::Up),
    Order::Step(Direction::Down),
    Order::Step(Direction::Left),
    Order::Step(Direction::Right),
    Order::Stop,
];

/// Configuration parameters required to construct the pursuit system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system producing one order per adversary per tick.
#[derive(Debug)]
pub struct Pursuit {
    rng: ChaCha8Rng,
}

impl Pursuit {
    /// Creates a new pursuit system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Chooses the order for the adversary whose top-left corner is `origin`.
    pub fn decide(&mut self, origin: GridCoord, view: &BoardView<'_>) -> Order {
        chase(origin, view).unwrap_or_else(|| self.wander())
    }

    fn wander(&mut self) -> Order {
        WANDER_ORDERS[self.rng.gen_range(0..WANDER_ORDERS.len())]
    }
}

/// Deterministic part of the policy.
///
/// Returns `Stop` when a protagonist already shares the adversary's cell, the
/// first direction (Up, Down, Left, Right) whose neighbour one stride away
/// holds a protagonist, or `None` when nothing is adjacent.
#[must_use]
pub fn chase(origin: GridCoord, view: &BoardView<'_>) -> Option<Order> {
    if view.contains(origin, Category::Protagonist) {
        return Some(Order::Stop);
    }

    let board = view.board();
    Direction::ALL
        .into_iter()
        .find(|direction| {
            board
                .step(origin, *direction)
                .is_some_and(|neighbor| view.contains(neighbor, Category::Protagonist))
        })
        .map(Order::Step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratmaze_core::{Board, Cell, Occupant, PieceId};

    fn grid_with_protagonists(board: Board, at: &[GridCoord]) -> Vec<Cell> {
        let capacity = usize::try_from(board.cell_count()).expect("small board");
        let mut cells = vec![Cell::default(); capacity];
        for (index, coord) in at.iter().enumerate() {
            let slot = board.index(*coord).expect("coordinate on board");
            cells[slot].insert_front(Occupant {
                piece: PieceId::new(index as u32),
                category: Category::Protagonist,
            });
        }
        cells
    }

    #[test]
    fn chase_prefers_fixed_priority() {
        let board = Board::default();
        let origin = GridCoord::new(20, 20);
        let cells = grid_with_protagonists(
            board,
            &[
                GridCoord::new(20, 25),
                GridCoord::new(15, 20),
                GridCoord::new(25, 20),
            ],
        );
        let view = BoardView::new(board, &cells);
        assert_eq!(chase(origin, &view), Some(Order::Step(Direction::Down)));
    }

    #[test]
    fn chase_skips_out_of_bounds_probes() {
        let board = Board::default();
        let cells = grid_with_protagonists(board, &[GridCoord::new(5, 0)]);
        let view = BoardView::new(board, &cells);
        assert_eq!(
            chase(GridCoord::new(0, 0), &view),
            Some(Order::Step(Direction::Right))
        );
    }

    #[test]
    fn wander_draws_from_every_order() {
        let mut pursuit = Pursuit::new(Config::new(1));
        let mut seen = Vec::new();
        for _ in 0..200 {
            let order = pursuit.wander();
            if !seen.contains(&order) {
                seen.push(order);
            }
        }
        assert_eq!(seen.len(), WANDER_ORDERS.len());
    }
}
