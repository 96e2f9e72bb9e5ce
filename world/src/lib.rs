#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state management for Rat Maze.

mod grid;

use std::collections::VecDeque;

use ratmaze_core::{
    Board, Category, Command, Direction, Event, GridCoord, MoveError, Occupant, Order, Outcome,
    PieceId, SpawnError,
};

use crate::grid::Grid;

/// Represents the authoritative Rat Maze game state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    pieces: Vec<Piece>,
    rosters: Rosters,
    player_orders: VecDeque<Direction>,
    adversary_orders: VecDeque<Order>,
    outcome: Option<Outcome>,
}

impl World {
    /// Creates an empty world on the default 56 x 56 board.
    #[must_use]
    pub fn new() -> Self {
        Self::with_board(Board::default())
    }

    /// Creates an empty world on the provided board.
    #[must_use]
    pub fn with_board(board: Board) -> Self {
        Self {
            grid: Grid::new(board),
            pieces: Vec::new(),
            rosters: Rosters::default(),
            player_orders: VecDeque::new(),
            adversary_orders: VecDeque::new(),
            outcome: None,
        }
    }

    fn rebuild(&mut self, board: Board, out_events: &mut Vec<Event>) {
        *self = Self::with_board(board);
        out_events.push(Event::BoardReset { board });
    }

    fn spawn(&mut self, category: Category, origin: GridCoord, out_events: &mut Vec<Event>) {
        let board = self.grid.board();
        let rejection = if !board.fits(origin) {
            Some(SpawnError::OutOfBounds)
        } else if !board.is_aligned(origin) {
            Some(SpawnError::Misaligned)
        } else if !self.grid.view().is_vacant(origin) {
            Some(SpawnError::Occupied)
        } else {
            None
        };

        if let Some(reason) = rejection {
            out_events.push(Event::SpawnRejected {
                category,
                origin,
                reason,
            });
            return;
        }

        let id = PieceId::new(u32::try_from(self.pieces.len()).unwrap_or(u32::MAX));
        self.pieces.push(Piece {
            id,
            category,
            origin,
        });
        self.rosters.of_mut(category).push(id);
        self.grid.insert_front(
            origin,
            Occupant {
                piece: id,
                category,
            },
        );
        out_events.push(Event::PieceSpawned {
            piece: id,
            category,
            origin,
        });
    }

    fn apply_player_orders(&mut self, out_events: &mut Vec<Event>) {
        for index in 0..self.rosters.protagonists.len() {
            let piece = self.rosters.protagonists[index];
            let Some(direction) = self.player_orders.pop_front() else {
                break;
            };
            self.resolve_step(piece, direction, out_events);
        }
    }

    fn step_adversary(&mut self, piece: PieceId, order: Order, out_events: &mut Vec<Event>) {
        self.adversary_orders.push_back(order);
        let Some(order) = self.adversary_orders.pop_front() else {
            return;
        };
        let is_adversary = self
            .piece(piece)
            .is_some_and(|candidate| candidate.category == Category::Adversary);
        if !is_adversary {
            return;
        }

        match order {
            Order::Step(direction) => self.resolve_step(piece, direction, out_events),
            Order::Stop => out_events.push(Event::PieceHeld { piece }),
        }
    }

    /// Applies a single step to `piece`, enforcing bounds, collisions and
    /// outcome side effects. The caller has already consumed the order.
    fn resolve_step(&mut self, piece: PieceId, direction: Direction, out_events: &mut Vec<Event>) {
        let Some(mover) = self.piece(piece).copied() else {
            return;
        };
        let from = mover.origin;

        let Some(to) = self.grid.board().step(from, direction) else {
            out_events.push(Event::MoveRejected {
                piece,
                direction,
                reason: MoveError::OutOfBounds,
            });
            return;
        };
        let Some(destination) = self.grid.cell(to) else {
            return;
        };

        let collided = mover
            .category
            .opponent()
            .is_some_and(|opponent| destination.contains(opponent));
        let collected = mover.category.collects_goal() && destination.contains(Category::Goal);
        let permitted = mover.category.may_enter(destination);

        // A protagonist collecting a guarded goal still wins.
        if collected {
            self.conclude(Outcome::Won, piece, out_events);
        }
        if collided {
            self.conclude(Outcome::Lost, piece, out_events);
        }

        if !permitted {
            out_events.push(Event::MoveRejected {
                piece,
                direction,
                reason: MoveError::Obstructed,
            });
            return;
        }

        self.grid.relocate(piece, from, to);
        if let Some(entry) = self.piece_mut(piece) {
            entry.origin = to;
        }
        out_events.push(Event::PieceMoved { piece, from, to });
    }

    fn conclude(&mut self, outcome: Outcome, piece: PieceId, out_events: &mut Vec<Event>) {
        if self.outcome.is_some() {
            return;
        }
        self.outcome = Some(outcome);
        out_events.push(Event::GameConcluded { outcome, piece });
    }

    fn piece(&self, id: PieceId) -> Option<&Piece> {
        let index = usize::try_from(id.get()).ok()?;
        self.pieces.get(index)
    }

    fn piece_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        let index = usize::try_from(id.get()).ok()?;
        self.pieces.get_mut(index)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureBoard { board } => world.rebuild(board, out_events),
        Command::ResetGame => {
            let board = world.grid.board();
            world.rebuild(board, out_events);
        }
        Command::SpawnPiece { category, origin } => world.spawn(category, origin, out_events),
        Command::QueuePlayerOrder { direction } => {
            world.player_orders.push_back(direction);
            out_events.push(Event::PlayerOrderQueued { direction });
        }
        Command::ApplyPlayerOrders => world.apply_player_orders(out_events),
        Command::StepAdversary { piece, order } => world.step_adversary(piece, order, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use ratmaze_core::{
        Board, BoardView, Category, Cell, GridCoord, Outcome, PieceId, PieceSnapshot, Population,
    };

    /// Geometry of the board the world was built on.
    #[must_use]
    pub fn board(world: &World) -> Board {
        world.grid.board()
    }

    /// Exposes a read-only view of the grid.
    #[must_use]
    pub fn board_view(world: &World) -> BoardView<'_> {
        world.grid.view()
    }

    /// Returns the cell at `coord`, if it lies on the grid.
    #[must_use]
    pub fn cell(world: &World, coord: GridCoord) -> Option<&Cell> {
        world.grid.cell(coord)
    }

    /// Outcome reached by the current game, if any.
    #[must_use]
    pub fn outcome(world: &World) -> Option<Outcome> {
        world.outcome
    }

    /// Reports whether a protagonist reached the goal.
    #[must_use]
    pub fn is_won(world: &World) -> bool {
        world.outcome == Some(Outcome::Won)
    }

    /// Reports whether a protagonist collided with an adversary.
    #[must_use]
    pub fn is_lost(world: &World) -> bool {
        world.outcome == Some(Outcome::Lost)
    }

    /// Captures the pieces of one category in spawn order.
    #[must_use]
    pub fn pieces(world: &World, category: Category) -> Vec<PieceSnapshot> {
        world
            .rosters
            .of(category)
            .iter()
            .filter_map(|id| piece(world, *id))
            .collect()
    }

    /// Captures a single piece, if it exists.
    #[must_use]
    pub fn piece(world: &World, id: PieceId) -> Option<PieceSnapshot> {
        world.piece(id).map(|piece| PieceSnapshot {
            id: piece.id,
            category: piece.category,
            origin: piece.origin,
        })
    }

    /// Number of pieces present per category.
    #[must_use]
    pub fn population(world: &World) -> Population {
        Population {
            protagonists: world.rosters.protagonists.len(),
            walls: world.rosters.walls.len(),
            goals: world.rosters.goals.len(),
            adversaries: world.rosters.adversaries.len(),
        }
    }

    /// Number of player orders still waiting in the queue.
    #[must_use]
    pub fn pending_player_orders(world: &World) -> usize {
        world.player_orders.len()
    }

    /// Number of adversary orders still waiting in the queue.
    #[must_use]
    pub fn pending_adversary_orders(world: &World) -> usize {
        world.adversary_orders.len()
    }
}

#[derive(Clone, Copy, Debug)]
struct Piece {
    id: PieceId,
    category: Category,
    origin: GridCoord,
}

#[derive(Clone, Debug, Default)]
struct Rosters {
    protagonists: Vec<PieceId>,
    walls: Vec<PieceId>,
    goals: Vec<PieceId>,
    adversaries: Vec<PieceId>,
}

impl Rosters {
    fn of(&self, category: Category) -> &[PieceId] {
        match category {
            Category::Protagonist => &self.protagonists,
            Category::Wall => &self.walls,
            Category::Goal => &self.goals,
            Category::Adversary => &self.adversaries,
        }
    }

    fn of_mut(&mut self, category: Category) -> &mut Vec<PieceId> {
        match category {
            Category::Protagonist => &mut self.protagonists,
            Category::Wall => &mut self.walls,
            Category::Goal => &mut self.goals,
            Category::Adversary => &mut self.adversaries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(world: &mut World, category: Category, x: u32, y: u32) -> PieceId {
        let mut events = Vec::new();
        apply(
            world,
            Command::SpawnPiece {
                category,
                origin: GridCoord::new(x, y),
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::PieceSpawned { piece, .. }] => *piece,
            other => panic!("unexpected spawn events: {other:?}"),
        }
    }

    #[test]
    fn spawn_inserts_at_front_of_cell() {
        let mut world = World::new();
        let piece = spawn(&mut world, Category::Wall, 10, 15);

        let cell = query::cell(&world, GridCoord::new(10, 15)).expect("cell on grid");
        assert_eq!(cell.contents().len(), 1);
        assert_eq!(cell.contents()[0].piece, piece);
        assert_eq!(query::population(&world).walls, 1);
    }

    #[test]
    fn spawn_rejects_invalid_origins() {
        let mut world = World::new();
        let _ = spawn(&mut world, Category::Goal, 0, 0);

        let cases = [
            (GridCoord::new(0, 0), SpawnError::Occupied),
            (GridCoord::new(3, 0), SpawnError::Misaligned),
            (GridCoord::new(55, 0), SpawnError::OutOfBounds),
        ];
        for (origin, expected) in cases {
            let mut events = Vec::new();
            apply(
                &mut world,
                Command::SpawnPiece {
                    category: Category::Wall,
                    origin,
                },
                &mut events,
            );
            assert_eq!(
                events,
                vec![Event::SpawnRejected {
                    category: Category::Wall,
                    origin,
                    reason: expected,
                }]
            );
        }
        assert_eq!(query::population(&world).walls, 0);
    }

    #[test]
    fn piece_ids_follow_spawn_order() {
        let mut world = World::new();
        let first = spawn(&mut world, Category::Wall, 0, 0);
        let second = spawn(&mut world, Category::Adversary, 5, 0);
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn stop_order_is_consumed_without_moving() {
        let mut world = World::new();
        let adversary = spawn(&mut world, Category::Adversary, 10, 10);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::StepAdversary {
                piece: adversary,
                order: Order::Stop,
            },
            &mut events,
        );

        assert_eq!(events, vec![Event::PieceHeld { piece: adversary }]);
        assert_eq!(query::pending_adversary_orders(&world), 0);
        let snapshot = query::piece(&world, adversary).expect("adversary exists");
        assert_eq!(snapshot.origin, GridCoord::new(10, 10));
    }

    #[test]
    fn reset_clears_everything() {
        let mut world = World::new();
        let _ = spawn(&mut world, Category::Protagonist, 0, 0);
        let _ = spawn(&mut world, Category::Goal, 5, 0);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::QueuePlayerOrder {
                direction: Direction::Right,
            },
            &mut events,
        );
        apply(&mut world, Command::ApplyPlayerOrders, &mut events);
        assert!(query::is_won(&world));

        events.clear();
        apply(
            &mut world,
            Command::QueuePlayerOrder {
                direction: Direction::Down,
            },
            &mut events,
        );
        apply(&mut world, Command::ResetGame, &mut events);

        assert_eq!(query::outcome(&world), None);
        assert_eq!(query::population(&world).total(), 0);
        assert_eq!(query::pending_player_orders(&world), 0);
        assert_eq!(query::board_view(&world).occupied().count(), 0);
        assert_eq!(query::board(&world), Board::default());
        assert_eq!(events.last(), Some(&Event::BoardReset { board: Board::default() }));
    }
}
