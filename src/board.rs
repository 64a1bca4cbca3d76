use std::{fmt, str::FromStr};

use shakmaty::{Color, Piece};

use crate::error::FenError;

/// The standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const FILES: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

/// An 8×8 grid of optional pieces.
///
/// Cells are stored row-major in FEN order: index 0 is a8, index 7 is h8,
/// index 63 is h1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    cells: [Option<Piece>; 64],
}

impl BoardState {
    pub fn empty() -> Self {
        Self { cells: [None; 64] }
    }

    /// Board from 64 cells in FEN order.
    pub fn from_cells(cells: [Option<Piece>; 64]) -> Self {
        Self { cells }
    }

    /// Piece at `row` (0 = rank 8) and `col` (0 = file a). Coordinates
    /// outside the board yield `None`.
    pub fn get(&self, row: usize, col: usize) -> Option<Piece> {
        if row >= 8 || col >= 8 {
            return None;
        }
        self.cells[row * 8 + col]
    }

    /// All 64 cells in FEN order.
    pub fn cells(&self) -> &[Option<Piece>; 64] {
        &self.cells
    }

    /// Rows from rank 8 down to rank 1.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Piece>]> {
        self.cells.chunks(8)
    }

    pub fn piece_count(&self) -> usize {
        self.cells.iter().flatten().count()
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::empty()
    }
}

/// Algebraic name of the square at `row` (0 = rank 8) and `col`.
pub fn square_name(row: usize, col: usize) -> String {
    format!("{}{}", FILES[col], 8 - row)
}

/// A decoded FEN string.
///
/// Only the placement and side to move are interpreted. Castling rights,
/// en passant square and move clocks are kept verbatim in `tail`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    pub board: BoardState,
    pub turn: Color,
    pub tail: String,
}

impl Fen {
    pub fn start() -> Self {
        // START_FEN is a compile-time constant known to decode.
        match decode(START_FEN) {
            Ok(fen) => fen,
            Err(e) => unreachable!("start position failed to decode: {e}"),
        }
    }
}

impl FromStr for Fen {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(&self.board, self.turn, &self.tail))
    }
}

/// Parse a FEN string into a board and side to move.
pub fn decode(fen: &str) -> Result<Fen, FenError> {
    let mut fields = fen.splitn(3, ' ');
    let placement = fields.next().unwrap_or_default();
    let turn = fields
        .next()
        .ok_or_else(|| FenError::MalformedFen("expected at least 2 fields".to_string()))?;
    let tail = fields.next().unwrap_or_default();

    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::MalformedFen(format!(
            "expected 8 rows, found {}",
            rows.len()
        )));
    }

    let mut board = BoardState::empty();
    for (row, text) in rows.iter().enumerate() {
        decode_row(row, text, &mut board)?;
    }

    let turn = match turn {
        "w" => Color::White,
        "b" => Color::Black,
        other => return Err(FenError::InvalidTurnChar(other.to_string())),
    };

    Ok(Fen {
        board,
        turn,
        tail: tail.to_string(),
    })
}

fn decode_row(row: usize, text: &str, board: &mut BoardState) -> Result<(), FenError> {
    let mut col = 0;
    for ch in text.chars() {
        match ch {
            '1'..='8' => {
                col += ch as usize - '0' as usize;
            }
            _ => {
                let piece = Piece::from_char(ch).ok_or(FenError::InvalidPieceChar { row, ch })?;
                if col < 8 {
                    board.cells[row * 8 + col] = Some(piece);
                }
                col += 1;
            }
        }
        if col > 8 {
            return Err(FenError::RowOverflow { row });
        }
    }
    if col < 8 {
        return Err(FenError::RowUnderflow { row });
    }
    Ok(())
}

/// Serialize a board, side to move and the untouched tail fields.
pub fn encode(board: &BoardState, turn: Color, tail: &str) -> String {
    let mut out = String::with_capacity(90);
    for (i, row) in board.rows().enumerate() {
        if i > 0 {
            out.push('/');
        }
        let mut empty = 0;
        for cell in row {
            match cell {
                Some(piece) => {
                    if empty > 0 {
                        out.push_str(&empty.to_string());
                        empty = 0;
                    }
                    out.push(piece.char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push_str(&empty.to_string());
        }
    }

    out.push(' ');
    out.push(match turn {
        Color::White => 'w',
        Color::Black => 'b',
    });
    if !tail.is_empty() {
        out.push(' ');
        out.push_str(tail);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::Role;

    #[test]
    fn test_start_position() {
        let fen = decode(START_FEN).unwrap();
        assert_eq!(fen.turn, Color::White);
        assert_eq!(fen.tail, "KQkq - 0 1");
        assert_eq!(fen.board.piece_count(), 32);

        assert_eq!(
            fen.board.get(0, 0),
            Some(Piece {
                color: Color::Black,
                role: Role::Rook
            })
        );
        assert_eq!(
            fen.board.get(7, 4),
            Some(Piece {
                color: Color::White,
                role: Role::King
            })
        );
        assert_eq!(
            fen.board.get(1, 3),
            Some(Piece {
                color: Color::Black,
                role: Role::Pawn
            })
        );
        for row in 2..6 {
            for col in 0..8 {
                assert_eq!(fen.board.get(row, col), None);
            }
        }
    }

    #[test]
    fn test_canonical_round_trip() {
        let fens = [
            START_FEN,
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R b KQkq - 0 1",
            "8/8/8/8/8/8/8/8 w - - 0 1",
            "7k/8/8/8/8/8/8/K7 b - -",
        ];
        for fen in fens {
            let decoded = decode(fen).unwrap();
            assert_eq!(decoded.to_string(), fen);
            assert_eq!(decode(&decoded.to_string()).unwrap(), decoded);
        }
    }

    #[test]
    fn test_non_canonical_runs_normalize() {
        let decoded = decode("44/8/8/8/8/8/8/8 w - - 0 1").unwrap();
        assert_eq!(decoded.to_string(), "8/8/8/8/8/8/8/8 w - - 0 1");
        assert_eq!(decode(&decoded.to_string()).unwrap(), decoded);
    }

    #[test]
    fn test_two_field_fen_has_empty_tail() {
        let decoded = decode("8/8/8/8/8/8/8/8 b").unwrap();
        assert_eq!(decoded.turn, Color::Black);
        assert_eq!(decoded.tail, "");
        assert_eq!(decoded.to_string(), "8/8/8/8/8/8/8/8 b");
    }

    #[test]
    fn test_tail_is_opaque() {
        let decoded = decode("8/8/8/8/8/8/8/8 w whatever goes here").unwrap();
        assert_eq!(decoded.tail, "whatever goes here");
        assert_eq!(decoded.to_string(), "8/8/8/8/8/8/8/8 w whatever goes here");
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(decode(""), Err(FenError::MalformedFen(_))));
        assert!(matches!(
            decode("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
            Err(FenError::MalformedFen(_))
        ));
        assert!(matches!(
            decode("8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::MalformedFen(_))
        ));
        assert!(matches!(
            decode("8/8/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::MalformedFen(_))
        ));
    }

    #[test]
    fn test_row_overflow_and_underflow() {
        assert_eq!(
            decode("pppppppp1/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::RowOverflow { row: 0 })
        );
        assert_eq!(
            decode("8/8/8/ppppppp/8/8/8/8 w - - 0 1"),
            Err(FenError::RowUnderflow { row: 3 })
        );
        assert_eq!(
            decode("8/8/8/8/8/8/8/ w - - 0 1"),
            Err(FenError::RowUnderflow { row: 7 })
        );
        assert_eq!(
            decode("8/8/8/8/8/8/8/4k4 w - - 0 1"),
            Err(FenError::RowOverflow { row: 7 })
        );
    }

    #[test]
    fn test_invalid_piece_char() {
        assert_eq!(
            decode("8/8/8/8/8/8/8/XNBQKBNR w - - 0 1"),
            Err(FenError::InvalidPieceChar { row: 7, ch: 'X' })
        );
        assert_eq!(
            decode("8/8/8/8/9/8/8/8 w - - 0 1"),
            Err(FenError::InvalidPieceChar { row: 4, ch: '9' })
        );
        assert_eq!(
            decode("08/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::InvalidPieceChar { row: 0, ch: '0' })
        );
    }

    #[test]
    fn test_invalid_turn() {
        assert_eq!(
            decode("8/8/8/8/8/8/8/8 x - - 0 1"),
            Err(FenError::InvalidTurnChar("x".to_string()))
        );
        assert_eq!(
            decode("8/8/8/8/8/8/8/8 white - - 0 1"),
            Err(FenError::InvalidTurnChar("white".to_string()))
        );
        // Double space leaves an empty turn field.
        assert_eq!(
            decode("8/8/8/8/8/8/8/8  w - - 0 1"),
            Err(FenError::InvalidTurnChar(String::new()))
        );
    }

    #[test]
    fn test_get_out_of_range() {
        let fen = decode(START_FEN).unwrap();
        assert_eq!(fen.board.get(8, 0), None);
        assert_eq!(fen.board.get(0, 8), None);
        assert_eq!(fen.board.get(usize::MAX, usize::MAX), None);
    }

    #[test]
    fn test_square_names() {
        assert_eq!(square_name(0, 0), "a8");
        assert_eq!(square_name(7, 7), "h1");
        assert_eq!(square_name(4, 4), "e4");
    }
}
