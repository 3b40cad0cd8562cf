//! # Bot Module - Single-Ply Move Selection
//!
//! Picks a move for a computer-controlled player from the full list of legal
//! moves. There is no lookahead; each difficulty is a different way of
//! choosing from the current position only.
//!
//! ## Difficulties
//! - **Easy**: any legal move, uniformly at random
//! - **Medium**: one of the moves that places the most blocks, chosen at random
//! - **Hard**: the move with the best heuristic score (see [`score_move`]) plus
//!   a small random jitter
//!
//! All randomness comes from the generator passed in, so a seeded generator
//! gives repeatable games.

use crate::board::{Board, Hand, Player, BOARD_SIZE};
use crate::movegen::{all_legal_moves, PlacedMove};
use crate::rules::corner_touches;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Weight per block placed
const BLOCK_WEIGHT: f64 = 10.0;
/// Weight per diagonal contact with the player's own cells
const CORNER_WEIGHT: f64 = 5.0;
/// Weight of each block's closeness to the board centre
const CENTER_WEIGHT: f64 = 0.5;
/// Upper bound of the random nudge added to hard scores
const JITTER: f64 = 2.0;

/// Bot strength setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("Unknown difficulty '{}'", other)),
        }
    }
}

/// Chooses a move for `player`, or `None` if there is nothing legal to play
///
/// `None` means the caller must pass the turn.
pub fn select_move<R: Rng>(
    board: &Board,
    hand: &Hand,
    player: Player,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<PlacedMove> {
    let moves = all_legal_moves(board, hand, player);
    tracing::debug!(%player, %difficulty, candidates = moves.len(), "bot choosing move");
    choose(board, moves, player, difficulty, rng)
}

/// Applies a difficulty's selection rule to an already enumerated move list
pub fn choose<R: Rng>(
    board: &Board,
    mut moves: Vec<PlacedMove>,
    player: Player,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<PlacedMove> {
    if moves.is_empty() {
        return None;
    }

    let index = match difficulty {
        Difficulty::Easy => rng.random_range(0..moves.len()),
        Difficulty::Medium => {
            // Biggest pieces first; ties are resolved by an explicit seeded pick.
            let largest = moves.iter().map(PlacedMove::size).max().unwrap_or(0);
            let tier: Vec<usize> = moves
                .iter()
                .enumerate()
                .filter(|(_, mv)| mv.size() == largest)
                .map(|(i, _)| i)
                .collect();
            tier[rng.random_range(0..tier.len())]
        }
        Difficulty::Hard => {
            let mut best = 0;
            let mut best_score = f64::NEG_INFINITY;
            for (i, mv) in moves.iter().enumerate() {
                let score = score_move(board, mv, player) + rng.random::<f64>() * JITTER;
                if score > best_score {
                    best = i;
                    best_score = score;
                }
            }
            best
        }
    };

    Some(moves.swap_remove(index))
}

/// Deterministic part of the hard bot's evaluation
///
/// `10 × blocks + 5 × own-corner contacts + Σ 0.5 × (20 − distance of each
/// block from the board centre)`.
pub fn score_move(board: &Board, mv: &PlacedMove, player: Player) -> f64 {
    let center = BOARD_SIZE as f64 / 2.0;
    let blocks = mv.size() as f64;
    let corners = corner_touches(board, &mv.shape, mv.origin, player) as f64;
    let centrality: f64 = mv
        .cells()
        .map(|c| {
            let dx = c.x as f64 - center;
            let dy = c.y as f64 - center;
            CENTER_WEIGHT * (BOARD_SIZE as f64 - (dx * dx + dy * dy).sqrt())
        })
        .sum();
    BLOCK_WEIGHT * blocks + CORNER_WEIGHT * corners + centrality
}
