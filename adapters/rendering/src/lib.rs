#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Rat Maze adapters.
//!
//! The simulation never draws. Once per frame the session captures a
//! [`Scene`] and hands it to [`present`], which drives any [`Surface`]
//! implementation in a fixed back-to-front order.

use glam::Vec2;
use ratmaze_core::{Category, Outcome, PieceColor, PieceSnapshot};

/// Background shown while the game is undecided.
pub const NEUTRAL_BACKGROUND: Color = Color::from_rgb_u8(0xe5, 0xe5, 0xe5);

/// Background shown after a win.
pub const WON_BACKGROUND: Color = Color::from_rgb_u8(0xaa, 0xff, 0xaa);

/// Background shown after a loss.
pub const LOST_BACKGROUND: Color = Color::from_rgb_u8(0xff, 0xaa, 0xaa);

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

impl From<PieceColor> for Color {
    fn from(color: PieceColor) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

/// Background color reflecting the outcome of the game.
#[must_use]
pub const fn background_color(outcome: Option<Outcome>) -> Color {
    match outcome {
        Some(Outcome::Won) => WON_BACKGROUND,
        Some(Outcome::Lost) => LOST_BACKGROUND,
        None => NEUTRAL_BACKGROUND,
    }
}

/// Everything a surface needs to draw one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    outcome: Option<Outcome>,
    pieces: Vec<PieceSnapshot>,
}

impl Scene {
    /// Captures a frame from the outcome and every piece on the board.
    #[must_use]
    pub fn new(outcome: Option<Outcome>, pieces: Vec<PieceSnapshot>) -> Self {
        Self { outcome, pieces }
    }

    /// Outcome reached by the captured game, if any.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Pieces in back-to-front drawing order.
    ///
    /// Walls come first, then goals, adversaries and protagonists. Pieces of
    /// the same category keep their capture order.
    pub fn draw_order(&self) -> impl Iterator<Item = &PieceSnapshot> {
        Category::DRAW_ORDER.into_iter().flat_map(move |category| {
            self.pieces
                .iter()
                .filter(move |piece| piece.category == category)
        })
    }
}

/// Sink receiving the drawing calls of a frame.
pub trait Surface {
    /// Clears the surface with the provided color.
    fn set_background(&mut self, color: Color);

    /// Draws a single piece on top of everything drawn so far.
    fn draw_piece(&mut self, piece: &PieceSnapshot);
}

/// Presents the scene: background first, then every piece back to front.
pub fn present<S>(scene: &Scene, surface: &mut S)
where
    S: Surface + ?Sized,
{
    surface.set_background(background_color(scene.outcome()));
    for piece in scene.draw_order() {
        surface.draw_piece(piece);
    }
}

/// Axis-aligned rectangle expressed in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelRect {
    /// Top-left corner of the rectangle.
    pub min: Vec2,
    /// Width and height of the rectangle.
    pub size: Vec2,
}

/// Projects the solid sub-cells of a piece's shape onto surface pixels.
pub fn piece_rects(
    piece: &PieceSnapshot,
    pixels_per_unit: u32,
) -> impl Iterator<Item = PixelRect> {
    let scale = pixels_per_unit as f32;
    let origin = Vec2::new(piece.origin.x() as f32, piece.origin.y() as f32);
    let size = Vec2::splat(scale);
    piece
        .shape()
        .solid_offsets()
        .map(move |(column, row)| PixelRect {
            min: (origin + Vec2::new(column as f32, row as f32)) * scale,
            size,
        })
}
