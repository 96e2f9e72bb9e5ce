use std::fmt;

use ratmaze_core::{Board, Category, PieceSnapshot};
use ratmaze_rendering::{Color, Surface};

/// Glyph drawn for grid units no piece covers.
const EMPTY: char = ' ';

/// Terminal surface that draws one character per grid unit.
#[derive(Clone, Debug)]
pub(crate) struct AsciiSurface {
    width: usize,
    height: usize,
    background: Color,
    glyphs: Vec<char>,
}

impl AsciiSurface {
    /// Creates a blank surface covering the whole board.
    #[must_use]
    pub(crate) fn new(board: Board) -> Self {
        let width = board.width() as usize;
        let height = board.height() as usize;
        Self {
            width,
            height,
            background: ratmaze_rendering::NEUTRAL_BACKGROUND,
            glyphs: vec![EMPTY; width * height],
        }
    }

    fn glyph(category: Category) -> char {
        match category {
            Category::Protagonist => '@',
            Category::Wall => '#',
            Category::Goal => '*',
            Category::Adversary => 'x',
        }
    }
}

impl Surface for AsciiSurface {
    fn set_background(&mut self, color: Color) {
        self.background = color;
        self.glyphs.fill(EMPTY);
    }

    fn draw_piece(&mut self, piece: &PieceSnapshot) {
        let glyph = Self::glyph(piece.category);
        for rect in ratmaze_rendering::piece_rects(piece, 1) {
            let column = rect.min.x as usize;
            let row = rect.min.y as usize;
            if column < self.width && row < self.height {
                self.glyphs[row * self.width + column] = glyph;
            }
        }
    }
}

impl fmt::Display for AsciiSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        writeln!(
            f,
            "background #{:02x}{:02x}{:02x}",
            channel(self.background.red),
            channel(self.background.green),
            channel(self.background.blue)
        )?;

        let border = "-".repeat(self.width);
        writeln!(f, "+{border}+")?;
        for row in self.glyphs.chunks(self.width.max(1)) {
            let line: String = row.iter().collect();
            writeln!(f, "|{line}|")?;
        }
        write!(f, "+{border}+")
    }
}
