use std::fmt::Write;

use crate::{board::Fen, types::PredictionResult};

use super::{cells, glyph, percent, turn_label};

/// Escape text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn board(fen: &Fen) -> String {
    let mut out = String::from("<div id=\"chess-board\">");
    for cell in cells(&fen.board) {
        let shade = if cell.light { "light" } else { "dark" };
        let _ = write!(
            out,
            "<div class=\"square {shade}\" data-row=\"{}\" data-col=\"{}\" data-square=\"{}\">",
            cell.row, cell.col, cell.square
        );
        if let Some(piece) = cell.piece {
            out.push(glyph(piece));
        }
        out.push_str("</div>");
    }
    out.push_str("</div>");
    let _ = write!(
        out,
        "<div id=\"turn-indicator\">{}</div>",
        turn_label(fen.turn)
    );
    out
}

pub fn prediction(result: Option<&PredictionResult>) -> String {
    let Some(result) = result else {
        return concat!(
            "<div id=\"results-content\">",
            "<p>Aucune prédiction pour le moment</p>",
            "<p class=\"caption\">Configurez les paramètres et cliquez sur \"Prédire\"</p>",
            "</div>"
        )
        .to_string();
    };

    let win = percent(result.win_probability);
    let mut out = String::new();
    let _ = write!(
        out,
        concat!(
            "<div id=\"win-probability\">",
            "<div class=\"probability-bar\"><div id=\"probability-fill\" style=\"width: {win}\"></div></div>",
            "<div id=\"probability-text\">{win}</div>",
            "</div>"
        ),
        win = win
    );

    out.push_str("<div id=\"move-suggestions\"><div id=\"suggestions-list\">");
    for (i, mv) in result.top_moves.iter().enumerate() {
        let prob = percent(mv.probability);
        let _ = write!(
            out,
            concat!(
                "<div class=\"suggestion-item\">",
                "<div class=\"suggestion-rank\">{rank}</div>",
                "<div class=\"suggestion-move\">{mv}</div>",
                "<div class=\"suggestion-bar\"><div class=\"suggestion-bar-fill\" style=\"width: {prob}\"></div></div>",
                "<div class=\"suggestion-probability\">{prob}</div>",
                "</div>"
            ),
            rank = i + 1,
            mv = escape(&mv.mv),
            prob = prob
        );
    }
    out.push_str("</div></div>");
    out
}

/// A complete standalone page for the board and prediction panel.
pub fn page(fen: &Fen, result: Option<&PredictionResult>) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n<html lang=\"fr\">\n<head>\n<meta charset=\"utf-8\">\n",
            "<title>Maia2</title>\n</head>\n<body>\n{board}\n{results}\n</body>\n</html>\n"
        ),
        board = board(fen),
        results = prediction(result)
    )
}
