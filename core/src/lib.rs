#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rat Maze engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The session submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then reports [`Event`] values describing what
//! actually happened. Systems query immutable [`BoardView`] snapshots and
//! respond exclusively with new commands or orders.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Number of grid units covered by a single movable step.
pub const BLOCKS_PER_CELL: u32 = 5;

/// Number of surface pixels drawn for a single grid unit.
pub const PIXELS_PER_UNIT: u32 = 5;

/// Edge length of the default square drawing surface in pixels.
pub const DEFAULT_SURFACE_PIXELS: u32 = 280;

/// Minimum number of protagonists kept on the board.
pub const PROTAGONIST_QUOTA: usize = 1;

/// Exact number of walls kept on the board.
pub const WALL_QUOTA: usize = 25;

/// Minimum number of goal items kept on the board.
pub const GOAL_QUOTA: usize = 1;

/// Exact number of adversaries kept on the board.
pub const ADVERSARY_QUOTA: usize = 3;

/// Fixed cadence between two simulation ticks.
pub const TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Delay between the end of a game and the automatic reset.
pub const RESET_DELAY: Duration = Duration::from_millis(3000);

/// Marker that flags a solid sub-cell inside a shape mask row.
pub const SOLID_MARKER: char = '0';

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the board geometry and rebuilds an empty game state.
    ConfigureBoard {
        /// Geometry the rebuilt grid should follow.
        board: Board,
    },
    /// Rebuilds the game state using the current board geometry.
    ResetGame,
    /// Requests that a new piece be placed with its top-left corner at `origin`.
    SpawnPiece {
        /// Role assigned to the new piece.
        category: Category,
        /// Top-left grid coordinate for the new piece.
        origin: GridCoord,
    },
    /// Appends a direction press to the tail of the player order queue.
    QueuePlayerOrder {
        /// Direction pressed by the player.
        direction: Direction,
    },
    /// Lets every protagonist consume the head of the player order queue.
    ApplyPlayerOrders,
    /// Queues an adversary order and resolves it immediately.
    StepAdversary {
        /// Adversary that issued the order.
        piece: PieceId,
        /// Order produced by the adversary policy.
        order: Order,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Announces that the game state was rebuilt from scratch.
    BoardReset {
        /// Geometry of the freshly generated grid.
        board: Board,
    },
    /// Confirms that a piece was placed onto the board.
    PieceSpawned {
        /// Identifier assigned to the piece.
        piece: PieceId,
        /// Role of the placed piece.
        category: Category,
        /// Top-left grid coordinate of the piece.
        origin: GridCoord,
    },
    /// Reports that a spawn request could not be honoured.
    SpawnRejected {
        /// Role requested for the piece.
        category: Category,
        /// Origin provided in the request.
        origin: GridCoord,
        /// Specific reason the spawn failed.
        reason: SpawnError,
    },
    /// Confirms that a direction press entered the player queue.
    PlayerOrderQueued {
        /// Direction that was queued.
        direction: Direction,
    },
    /// Confirms that a piece moved between two grid coordinates.
    PieceMoved {
        /// Identifier of the piece that moved.
        piece: PieceId,
        /// Coordinate the piece occupied before moving.
        from: GridCoord,
        /// Coordinate the piece occupies after moving.
        to: GridCoord,
    },
    /// Reports that an order was consumed without moving its piece.
    MoveRejected {
        /// Identifier of the piece that attempted to move.
        piece: PieceId,
        /// Direction of the attempted step.
        direction: Direction,
        /// Specific reason the step failed.
        reason: MoveError,
    },
    /// Reports that an adversary consumed a `Stop` order.
    PieceHeld {
        /// Identifier of the adversary that stood still.
        piece: PieceId,
    },
    /// Announces that the game reached its outcome.
    GameConcluded {
        /// Outcome that became active.
        outcome: Outcome,
        /// Piece whose move caused the outcome.
        piece: PieceId,
    },
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnError {
    /// The requested footprint extends beyond the board.
    OutOfBounds,
    /// The origin is not a multiple of the board stride.
    Misaligned,
    /// The target cell already holds a piece.
    Occupied,
}

/// Reasons a step may fail to move its piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveError {
    /// The step would leave the board.
    OutOfBounds,
    /// The destination holds a piece the mover may not share a cell with.
    Obstructed,
}

/// Final result of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// A protagonist reached the goal item.
    Won,
    /// A protagonist and an adversary collided.
    Lost,
}

impl Outcome {
    /// Text displayed to the player once the game ends.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Won => "Victory!",
            Self::Lost => "Defeat!",
        }
    }
}

/// Role played by a piece on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Player-controlled piece.
    Protagonist,
    /// Static obstacle.
    Wall,
    /// Collectible that wins the game.
    Goal,
    /// Roaming piece that chases the protagonist.
    Adversary,
}

impl Category {
    /// Every category in population maintenance order.
    pub const ALL: [Self; 4] = [Self::Protagonist, Self::Wall, Self::Goal, Self::Adversary];

    /// Categories in back-to-front drawing order.
    pub const DRAW_ORDER: [Self; 4] = [Self::Wall, Self::Goal, Self::Adversary, Self::Protagonist];

    /// Category whose contact ends the game in defeat, if any.
    #[must_use]
    pub const fn opponent(self) -> Option<Self> {
        match self {
            Self::Protagonist => Some(Self::Adversary),
            Self::Adversary => Some(Self::Protagonist),
            Self::Wall | Self::Goal => None,
        }
    }

    /// Reports whether pieces of this category win by entering the goal cell.
    #[must_use]
    pub const fn collects_goal(self) -> bool {
        matches!(self, Self::Protagonist)
    }

    /// Reports whether a piece of this category may step into `cell`.
    ///
    /// Walls block everything. A protagonist additionally refuses cells that
    /// only hold another protagonist, while adversaries may pile up freely.
    #[must_use]
    pub fn may_enter(self, cell: &Cell) -> bool {
        if cell.is_empty() {
            return true;
        }
        let shared = cell.contains(Self::Adversary) || cell.contains(Self::Goal);
        match self {
            Self::Protagonist => shared,
            Self::Adversary => shared || cell.contains(Self::Protagonist),
            Self::Wall | Self::Goal => false,
        }
    }

    /// Display color associated with the category.
    #[must_use]
    pub const fn color(self) -> PieceColor {
        match self {
            Self::Protagonist => PieceColor::from_rgb(0x64, 0x64, 0x64),
            Self::Wall => PieceColor::from_rgb(0x00, 0xc8, 0x00),
            Self::Goal => PieceColor::from_rgb(0xff, 0xff, 0x00),
            Self::Adversary => PieceColor::from_rgb(0xff, 0x00, 0x00),
        }
    }

    /// Occupancy mask drawn for pieces of this category.
    #[must_use]
    pub const fn shape(self) -> Shape {
        match self {
            Self::Protagonist => Shape::new(&["  0  ", "0 00 ", "00000", "0 0  ", "0 0  "]),
            Self::Wall => Shape::new(&["00000", "00000", "00000", "00000", "00000"]),
            Self::Goal => Shape::new(&["0    ", " 0   ", "000  ", "00 0 ", "00000"]),
            Self::Adversary => Shape::new(&["0   0", "00 00", "00000", "0 0 0", "00000"]),
        }
    }
}

/// Rectangular occupancy mask made of equal-length rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: &'static [&'static str],
}

impl Shape {
    /// Wraps the provided mask rows.
    #[must_use]
    pub const fn new(rows: &'static [&'static str]) -> Self {
        Self { rows }
    }

    /// Rows of the mask from top to bottom.
    #[must_use]
    pub const fn rows(&self) -> &'static [&'static str] {
        self.rows
    }

    /// Number of sub-cells along the horizontal axis.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.rows
            .first()
            .map_or(0, |row| u32::try_from(row.chars().count()).unwrap_or(u32::MAX))
    }

    /// Number of sub-cells along the vertical axis.
    #[must_use]
    pub fn height(&self) -> u32 {
        u32::try_from(self.rows.len()).unwrap_or(u32::MAX)
    }

    /// Reports whether the sub-cell at the provided offset is solid.
    #[must_use]
    pub fn is_solid(&self, column: u32, row: u32) -> bool {
        let Ok(row) = usize::try_from(row) else {
            return false;
        };
        let Ok(column) = usize::try_from(column) else {
            return false;
        };
        self.rows
            .get(row)
            .and_then(|line| line.chars().nth(column))
            .is_some_and(|marker| marker == SOLID_MARKER)
    }

    /// Offsets of every solid sub-cell in row-major order.
    pub fn solid_offsets(&self) -> impl Iterator<Item = (u32, u32)> + 'static {
        let rows = self.rows;
        rows.iter().zip(0u32..).flat_map(|(line, row)| {
            line.chars()
                .zip(0u32..)
                .filter(|(marker, _)| *marker == SOLID_MARKER)
                .map(move |(_, column)| (column, row))
        })
    }
}

/// Visual appearance applied to a piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PieceColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl PieceColor {
    /// Creates a new piece color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Cardinal directions a piece may step in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing `y`.
    Up,
    /// Movement toward increasing `y`.
    Down,
    /// Movement toward decreasing `x`.
    Left,
    /// Movement toward increasing `x`.
    Right,
}

impl Direction {
    /// Every direction in chase probing priority order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];
}

/// Symbolic order consumed from an order queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    /// Step one stride in the given direction.
    Step(Direction),
    /// Stay in place for this tick. Only adversaries issue it.
    Stop,
}

impl From<Direction> for Order {
    fn from(direction: Direction) -> Self {
        Self::Step(direction)
    }
}

/// Unique identifier assigned to a piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(u32);

impl PieceId {
    /// Creates a new piece identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location on the grid expressed in grid units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    x: u32,
    y: u32,
}

impl GridCoord {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based horizontal position.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based vertical position.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }
}

/// Geometry of the play area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    width: u32,
    height: u32,
    stride: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self::from_surface(
            DEFAULT_SURFACE_PIXELS,
            DEFAULT_SURFACE_PIXELS,
            PIXELS_PER_UNIT,
            BLOCKS_PER_CELL,
        )
    }
}

impl Board {
    /// Creates a board with explicit grid dimensions and step stride.
    #[must_use]
    pub const fn new(width: u32, height: u32, stride: u32) -> Self {
        Self {
            width,
            height,
            stride,
        }
    }

    /// Derives the grid dimensions from a drawing surface measured in pixels.
    ///
    /// A zero `pixels_per_unit` yields an empty board.
    #[must_use]
    pub const fn from_surface(
        width_px: u32,
        height_px: u32,
        pixels_per_unit: u32,
        stride: u32,
    ) -> Self {
        if pixels_per_unit == 0 {
            return Self::new(0, 0, stride);
        }
        Self::new(width_px / pixels_per_unit, height_px / pixels_per_unit, stride)
    }

    /// Number of grid units along the horizontal axis.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of grid units along the vertical axis.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Grid units covered by one step.
    #[must_use]
    pub const fn stride(&self) -> u32 {
        self.stride
    }

    /// Total number of grid cells.
    #[must_use]
    pub const fn cell_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Reports whether the coordinate addresses a cell of the grid.
    #[must_use]
    pub const fn contains(&self, coord: GridCoord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Reports whether the coordinate lies on a stride multiple on both axes.
    #[must_use]
    pub const fn is_aligned(&self, coord: GridCoord) -> bool {
        self.stride != 0 && coord.x % self.stride == 0 && coord.y % self.stride == 0
    }

    /// Number of stride-aligned placement slots along the horizontal axis.
    #[must_use]
    pub const fn slot_columns(&self) -> u32 {
        slots_along(self.width, self.stride)
    }

    /// Number of stride-aligned placement slots along the vertical axis.
    #[must_use]
    pub const fn slot_rows(&self) -> u32 {
        slots_along(self.height, self.stride)
    }

    /// Total number of placement slots on the board.
    #[must_use]
    pub const fn slot_count(&self) -> u64 {
        self.slot_columns() as u64 * self.slot_rows() as u64
    }

    /// Top-left coordinate of the slot at the given slot column and row.
    #[must_use]
    pub const fn slot_origin(&self, column: u32, row: u32) -> GridCoord {
        GridCoord::new(column * self.stride, row * self.stride)
    }

    /// Reports whether a full piece footprint fits at `origin`.
    #[must_use]
    pub const fn fits(&self, origin: GridCoord) -> bool {
        self.stride <= self.width
            && self.stride <= self.height
            && origin.x <= self.width - self.stride
            && origin.y <= self.height - self.stride
    }

    /// Coordinate one stride away from `from`, if it keeps the footprint on the board.
    #[must_use]
    pub fn step(&self, from: GridCoord, direction: Direction) -> Option<GridCoord> {
        let candidate = match direction {
            Direction::Up => GridCoord::new(from.x, from.y.checked_sub(self.stride)?),
            Direction::Down => GridCoord::new(from.x, from.y.checked_add(self.stride)?),
            Direction::Left => GridCoord::new(from.x.checked_sub(self.stride)?, from.y),
            Direction::Right => GridCoord::new(from.x.checked_add(self.stride)?, from.y),
        };
        self.fits(candidate).then_some(candidate)
    }

    /// Row-major index of the cell at `coord`, if it lies on the grid.
    #[must_use]
    pub fn index(&self, coord: GridCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let row = usize::try_from(coord.y).ok()?;
        let column = usize::try_from(coord.x).ok()?;
        let width = usize::try_from(self.width).ok()?;
        Some(row * width + column)
    }
}

const fn slots_along(length: u32, stride: u32) -> u32 {
    if stride == 0 || length < stride {
        0
    } else {
        (length - stride) / stride + 1
    }
}

/// Entry in a cell's content list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Occupant {
    /// Piece occupying the cell.
    pub piece: PieceId,
    /// Role of the occupying piece.
    pub category: Category,
}

/// Ordered list of pieces located at a single grid coordinate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    contents: Vec<Occupant>,
}

impl Cell {
    /// Occupants from front to back.
    #[must_use]
    pub fn contents(&self) -> &[Occupant] {
        &self.contents
    }

    /// Reports whether no piece occupies the cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Reports whether any occupant has the provided category.
    #[must_use]
    pub fn contains(&self, category: Category) -> bool {
        self.contents
            .iter()
            .any(|occupant| occupant.category == category)
    }

    /// Places the occupant at the front of the content list.
    pub fn insert_front(&mut self, occupant: Occupant) {
        self.contents.insert(0, occupant);
    }

    /// Removes the entry of the provided piece, keeping the others in order.
    pub fn take(&mut self, piece: PieceId) -> Option<Occupant> {
        let position = self
            .contents
            .iter()
            .position(|occupant| occupant.piece == piece)?;
        Some(self.contents.remove(position))
    }
}

/// Read-only view into the grid handed to systems.
#[derive(Clone, Copy, Debug)]
pub struct BoardView<'a> {
    board: Board,
    cells: &'a [Cell],
}

impl<'a> BoardView<'a> {
    /// Captures a new view backed by the provided row-major cell slice.
    #[must_use]
    pub fn new(board: Board, cells: &'a [Cell]) -> Self {
        Self { board, cells }
    }

    /// Geometry of the viewed board.
    #[must_use]
    pub const fn board(&self) -> Board {
        self.board
    }

    /// Returns the cell at `coord`, if it lies on the grid.
    #[must_use]
    pub fn cell(&self, coord: GridCoord) -> Option<&'a Cell> {
        self.board
            .index(coord)
            .and_then(|index| self.cells.get(index))
    }

    /// Reports whether the cell at `coord` holds a piece of `category`.
    #[must_use]
    pub fn contains(&self, coord: GridCoord, category: Category) -> bool {
        self.cell(coord).is_some_and(|cell| cell.contains(category))
    }

    /// Reports whether the cell at `coord` holds none of the piece categories.
    #[must_use]
    pub fn is_vacant(&self, coord: GridCoord) -> bool {
        Category::ALL
            .iter()
            .all(|category| !self.contains(coord, *category))
    }

    /// Number of placement slots currently holding no piece.
    #[must_use]
    pub fn vacant_slots(&self) -> u64 {
        let mut vacant = 0;
        for row in 0..self.board.slot_rows() {
            for column in 0..self.board.slot_columns() {
                if self.is_vacant(self.board.slot_origin(column, row)) {
                    vacant += 1;
                }
            }
        }
        vacant
    }

    /// Iterator over every cell that currently holds at least one piece.
    pub fn occupied(&self) -> impl Iterator<Item = &'a Cell> + 'a {
        self.cells.iter().filter(|cell| !cell.is_empty())
    }
}

/// Immutable representation of a single piece used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PieceSnapshot {
    /// Unique identifier assigned to the piece.
    pub id: PieceId,
    /// Role of the piece.
    pub category: Category,
    /// Top-left grid coordinate of the piece.
    pub origin: GridCoord,
}

impl PieceSnapshot {
    /// Occupancy mask of the piece.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        self.category.shape()
    }

    /// Display color of the piece.
    #[must_use]
    pub const fn color(&self) -> PieceColor {
        self.category.color()
    }
}

/// Number of pieces present per category.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Population {
    /// Protagonists on the board.
    pub protagonists: usize,
    /// Walls on the board.
    pub walls: usize,
    /// Goal items on the board.
    pub goals: usize,
    /// Adversaries on the board.
    pub adversaries: usize,
}

impl Population {
    /// Count recorded for the provided category.
    #[must_use]
    pub const fn count(&self, category: Category) -> usize {
        match category {
            Category::Protagonist => self.protagonists,
            Category::Wall => self.walls,
            Category::Goal => self.goals,
            Category::Adversary => self.adversaries,
        }
    }

    /// Sum over every category.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.protagonists + self.walls + self.goals + self.adversaries
    }
}
