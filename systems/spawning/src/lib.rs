#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Population maintenance system responsible for emitting piece spawn commands.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ratmaze_core::{
    BoardView, Category, Command, GridCoord, Population, ADVERSARY_QUOTA, GOAL_QUOTA,
    PROTAGONIST_QUOTA, WALL_QUOTA,
};

/// Number of pieces each category is topped up to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quotas {
    protagonists: usize,
    walls: usize,
    goals: usize,
    adversaries: usize,
}

impl Quotas {
    /// Creates quotas with explicit per-category targets.
    #[must_use]
    pub const fn new(protagonists: usize, walls: usize, goals: usize, adversaries: usize) -> Self {
        Self {
            protagonists,
            walls,
            goals,
            adversaries,
        }
    }

    /// Target population for the provided category.
    #[must_use]
    pub const fn target(&self, category: Category) -> usize {
        match category {
            Category::Protagonist => self.protagonists,
            Category::Wall => self.walls,
            Category::Goal => self.goals,
            Category::Adversary => self.adversaries,
        }
    }

    /// Number of pieces present once every quota is met.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.protagonists + self.walls + self.goals + self.adversaries
    }
}

impl Default for Quotas {
    fn default() -> Self {
        Self::new(PROTAGONIST_QUOTA, WALL_QUOTA, GOAL_QUOTA, ADVERSARY_QUOTA)
    }
}

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    quotas: Quotas,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided quotas and seed.
    #[must_use]
    pub const fn new(quotas: Quotas, rng_seed: u64) -> Self {
        Self { quotas, rng_seed }
    }
}

/// Pure system that tops every category back up to its quota.
#[derive(Debug)]
pub struct Spawning {
    quotas: Quotas,
    rng: ChaCha8Rng,
    claimed: Vec<GridCoord>,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            quotas: config.quotas,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            claimed: Vec::new(),
        }
    }

    /// Quotas enforced by the system.
    #[must_use]
    pub const fn quotas(&self) -> Quotas {
        self.quotas
    }

    /// Emits one spawn command per missing piece.
    ///
    /// Categories are topped up in [`Category::ALL`] order. Origins chosen in
    /// the same call never collide, so the world can apply every command of
    /// the batch.
    pub fn handle(&mut self, population: Population, view: &BoardView<'_>, out: &mut Vec<Command>) {
        self.claimed.clear();
        let board = view.board();
        if board.slot_count() == 0 {
            return;
        }

        let mut vacant = view.vacant_slots();
        for category in Category::ALL {
            let missing = self
                .quotas
                .target(category)
                .saturating_sub(population.count(category));
            for _ in 0..missing {
                debug_assert!(vacant > 0, "spawn quotas exceed board capacity");
                let origin = self.sample_origin(view);
                self.claimed.push(origin);
                vacant = vacant.saturating_sub(1);
                out.push(Command::SpawnPiece { category, origin });
            }
        }
    }

    /// Rejection-samples slot origins until one holds no piece.
    fn sample_origin(&mut self, view: &BoardView<'_>) -> GridCoord {
        let board = view.board();
        loop {
            let column = self.rng.gen_range(0..board.slot_columns());
            let row = self.rng.gen_range(0..board.slot_rows());
            let candidate = board.slot_origin(column, row);
            if view.is_vacant(candidate) && !self.claimed.contains(&candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratmaze_core::{Board, Cell};

    #[test]
    fn default_quotas_match_game_rules() {
        let quotas = Quotas::default();
        assert_eq!(quotas.target(Category::Protagonist), 1);
        assert_eq!(quotas.target(Category::Wall), 25);
        assert_eq!(quotas.target(Category::Goal), 1);
        assert_eq!(quotas.target(Category::Adversary), 3);
        assert_eq!(quotas.total(), 30);
    }

    #[test]
    fn boards_without_slots_spawn_nothing() {
        let board = Board::new(3, 3, 5);
        let cells = vec![Cell::default(); 9];
        let view = BoardView::new(board, &cells);
        let mut spawning = Spawning::new(Config::new(Quotas::default(), 7));
        let mut commands = Vec::new();
        spawning.handle(Population::default(), &view, &mut commands);
        assert!(commands.is_empty());
    }
}
