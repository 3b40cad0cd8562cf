//! # Terminal Rendering
//!
//! Text views of the board, hands, and piece shapes for the `play` front end.
//! Colour goes through `colored`; with colour off the output is plain ASCII
//! and stable enough to assert on in tests.

use crate::board::{Board, Hand, Hands, Player, BOARD_SIZE};
use crate::pieces;
use crate::shape::{Coord, Shape};
use colored::{ColoredString, Colorize};
use std::collections::HashSet;

fn paint(text: &str, player: Player) -> ColoredString {
    match player {
        Player::Blue => text.blue().bold(),
        Player::Yellow => text.yellow().bold(),
        Player::Red => text.red().bold(),
        Player::Green => text.green().bold(),
    }
}

/// Draws the board with x/y axis labels
///
/// Cells in `highlight` are drawn as `*` (or `!` when `legal` is false), the
/// way a placement preview looks under the cursor.
pub fn render_board(board: &Board, highlight: &[Coord], legal: bool, color: bool) -> String {
    let marked: HashSet<Coord> = highlight.iter().copied().collect();
    let mut out = String::from("   ");
    for x in 0..BOARD_SIZE {
        out.push_str(&format!("{}", x % 10));
    }
    out.push('\n');

    for (y, row) in board.rows().enumerate() {
        out.push_str(&format!("{:>2} ", y));
        for (x, cell) in row.iter().enumerate() {
            let pos = Coord::new(x as i32, y as i32);
            if marked.contains(&pos) {
                let mark = if legal { "*" } else { "!" };
                if color {
                    let painted = if legal { mark.white().bold() } else { mark.red().reversed() };
                    out.push_str(&painted.to_string());
                } else {
                    out.push_str(mark);
                }
                continue;
            }
            match cell {
                Some(player) => {
                    let symbol = player.symbol().to_string();
                    if color {
                        out.push_str(&paint(&symbol, *player).to_string());
                    } else {
                        out.push_str(&symbol);
                    }
                }
                None => out.push('.'),
            }
        }
        out.push('\n');
    }
    out
}

/// One line listing the pieces in a hand as `id:name`
pub fn render_hand(hand: &Hand) -> String {
    if hand.is_empty() {
        return String::from("(no pieces left)");
    }
    hand.iter()
        .filter_map(pieces::get)
        .map(|def| format!("{}:{}", def.id, def.name))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A shape drawn in a small grid of `#` and `.`
pub fn render_shape(shape: &Shape) -> String {
    let cells: HashSet<Coord> = shape.blocks().iter().copied().collect();
    let mut out = String::new();
    for y in 0..shape.height() {
        for x in 0..shape.width() {
            out.push(if cells.contains(&Coord::new(x, y)) { '#' } else { '.' });
        }
        out.push('\n');
    }
    out
}

/// Pieces and squares left for each player
pub fn render_scores(hands: &Hands, color: bool) -> String {
    Player::ALL
        .iter()
        .map(|&player| {
            let hand = hands.get(player);
            let name = if color {
                paint(player.name(), player).to_string()
            } else {
                player.name().to_string()
            };
            format!(
                "{}: {} pieces ({} squares) left",
                name,
                hand.len(),
                hand.remaining_squares()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
