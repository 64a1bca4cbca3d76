//! Pure rendering of board and prediction state.
//!
//! Both front ends share the cell layout, glyphs and number formatting
//! defined here; [`text`] targets a terminal and [`html`] produces markup
//! for the static page.

pub mod html;
pub mod text;

use shakmaty::{Color, Piece, Role};

use crate::board::{BoardState, square_name};

/// One square of the rendered board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    /// Algebraic name, e.g. `e4`.
    pub square: String,
    pub light: bool,
    pub piece: Option<Piece>,
}

/// The 64 cells in display order: rank 8 to rank 1, file a to h.
pub fn cells(board: &BoardState) -> impl Iterator<Item = Cell> + '_ {
    (0..64).map(move |i| {
        let (row, col) = (i / 8, i % 8);
        Cell {
            row,
            col,
            square: square_name(row, col),
            light: (row + col) % 2 == 0,
            piece: board.get(row, col),
        }
    })
}

pub fn glyph(piece: Piece) -> char {
    match (piece.color, piece.role) {
        (Color::White, Role::King) => '♔',
        (Color::White, Role::Queen) => '♕',
        (Color::White, Role::Rook) => '♖',
        (Color::White, Role::Bishop) => '♗',
        (Color::White, Role::Knight) => '♘',
        (Color::White, Role::Pawn) => '♙',
        (Color::Black, Role::King) => '♚',
        (Color::Black, Role::Queen) => '♛',
        (Color::Black, Role::Rook) => '♜',
        (Color::Black, Role::Bishop) => '♝',
        (Color::Black, Role::Knight) => '♞',
        (Color::Black, Role::Pawn) => '♟',
    }
}

pub fn turn_label(turn: Color) -> &'static str {
    match turn {
        Color::White => "Tour: Blancs",
        Color::Black => "Tour: Noirs",
    }
}

/// `0.73` becomes `"73.0%"`. Values outside `[0, 1]` are shown as they are.
pub fn percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}
