use ratmaze_core::{Board, BoardView, Cell, GridCoord, Occupant, PieceId};

/// Dense row-major grid of cells sized to the board.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    board: Board,
    cells: Vec<Cell>,
}

impl Grid {
    pub(crate) fn new(board: Board) -> Self {
        let capacity = usize::try_from(board.cell_count()).unwrap_or(0);
        Self {
            board,
            cells: vec![Cell::default(); capacity],
        }
    }

    pub(crate) fn board(&self) -> Board {
        self.board
    }

    pub(crate) fn cell(&self, coord: GridCoord) -> Option<&Cell> {
        self.board
            .index(coord)
            .and_then(|index| self.cells.get(index))
    }

    fn cell_mut(&mut self, coord: GridCoord) -> Option<&mut Cell> {
        self.board
            .index(coord)
            .and_then(|index| self.cells.get_mut(index))
    }

    pub(crate) fn insert_front(&mut self, coord: GridCoord, occupant: Occupant) {
        if let Some(cell) = self.cell_mut(coord) {
            cell.insert_front(occupant);
        }
    }

    /// Moves the piece's entry from `from` to the front of `to`.
    pub(crate) fn relocate(&mut self, piece: PieceId, from: GridCoord, to: GridCoord) {
        let Some(occupant) = self.cell_mut(from).and_then(|cell| cell.take(piece)) else {
            return;
        };
        self.insert_front(to, occupant);
    }

    pub(crate) fn view(&self) -> BoardView<'_> {
        BoardView::new(self.board, &self.cells)
    }
}
