use std::fmt::Write;

use crate::{board::Fen, types::PredictionResult};

use super::{cells, glyph, percent, turn_label};

const BAR_WIDTH: usize = 20;

/// Board with rank and file labels followed by the turn line.
pub fn board(fen: &Fen) -> String {
    let mut out = String::new();
    for cell in cells(&fen.board) {
        if cell.col == 0 {
            let _ = write!(out, "{} ", 8 - cell.row);
        }
        let ch = match cell.piece {
            Some(piece) => glyph(piece),
            None if cell.light => '·',
            None => ' ',
        };
        out.push(ch);
        if cell.col == 7 {
            out.push('\n');
        } else {
            out.push(' ');
        }
    }
    out.push_str("  a b c d e f g h\n");
    out.push_str(turn_label(fen.turn));
    out.push('\n');
    out
}

/// One ranked entry, e.g. `1. e4 — 41.0%`.
pub fn ranked_move(rank: usize, mv: &str, probability: f64) -> String {
    format!("{rank}. {mv} — {}", percent(probability))
}

/// Fill bar for a probability. Only the drawn length is bounded; NaN and
/// negative values draw an empty bar.
pub fn bar(probability: f64) -> String {
    let filled = ((probability * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    let empty = BAR_WIDTH - filled;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

pub fn prediction(result: Option<&PredictionResult>) -> String {
    let Some(result) = result else {
        return "Aucune prédiction pour le moment\n".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Probabilité de Gain: {} {}",
        bar(result.win_probability),
        percent(result.win_probability)
    );
    out.push_str("Coups Suggérés:\n");
    for (i, mv) in result.top_moves.iter().enumerate() {
        let _ = writeln!(out, "{}", ranked_move(i + 1, &mv.mv, mv.probability));
    }
    out
}
