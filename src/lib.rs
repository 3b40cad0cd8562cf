//! # Blokus Rules Engine
//!
//! Four-player Blokus on a 20×20 board: piece geometry, placement legality,
//! move enumeration, heuristic bots, and a turn controller with cancellable
//! deferred bot turns.
//!
//! ## Layers
//! ```text
//! shape ─► pieces ─► rules ─► movegen ─► bot
//!                      ▲                  │
//!                    board                ▼
//!                      └──── game_controller ◄── scheduler (tokio)
//! ```
//! The functions at the crate root are the surface a user interface calls.
//! None of them mutate their inputs.

pub mod board;
pub mod bot;
pub mod config;
pub mod game_controller;
pub mod logging;
pub mod movegen;
pub mod pieces;
pub mod render;
pub mod rules;
pub mod scheduler;
pub mod selection;
pub mod shape;

pub use board::{Board, Hand, Hands, Player, BOARD_SIZE};
pub use bot::Difficulty;
pub use movegen::PlacedMove;
pub use pieces::PieceId;
pub use shape::{Coord, Shape};

use rand::Rng;
use std::fmt;

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// The winner placed every piece
    HandEmptied,
    /// Nobody holding pieces can move; fewest remaining pieces wins
    AllPlayersStuck,
}

/// Terminal outcome of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    pub winner: Player,
    pub reason: GameOverReason,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            GameOverReason::HandEmptied => write!(f, "{} wins by placing every piece", self.winner),
            GameOverReason::AllPlayersStuck => {
                write!(f, "{} wins with the fewest pieces left", self.winner)
            }
        }
    }
}

/// Every legal move for `player`
pub fn legal_moves(board: &Board, hands: &Hands, player: Player) -> Vec<PlacedMove> {
    movegen::all_legal_moves(board, hands.get(player), player)
}

/// True if `player` has at least one legal move
///
/// Always false for an empty hand. That player has already won; it is not
/// the same thing as being stuck.
pub fn has_legal_move(board: &Board, hands: &Hands, player: Player) -> bool {
    movegen::has_any_legal_move(board, hands.get(player), player)
}

/// Returns the board and hands that result from `player` making `mv`
///
/// The inputs are left untouched. Legality is the caller's responsibility;
/// see [`rules::is_legal_placement`].
pub fn apply_move(board: &Board, hands: &Hands, mv: &PlacedMove, player: Player) -> (Board, Hands) {
    let mut board = board.clone();
    let mut hands = hands.clone();
    board.fill(mv.cells(), player);
    hands.get_mut(player).remove(mv.piece);
    (board, hands)
}

/// The bot's choice for `player`, or `None` if it must pass
pub fn bot_select_move<R: Rng>(
    board: &Board,
    hands: &Hands,
    player: Player,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<PlacedMove> {
    bot::select_move(board, hands.get(player), player, difficulty, rng)
}

/// Detects a finished game
///
/// A player with an empty hand wins outright (the first such player in turn
/// order). Otherwise, if every player still holding pieces has no legal move,
/// the player with the fewest pieces left wins, ties going to the earliest
/// player in turn order.
pub fn check_game_over(hands: &Hands, board: &Board) -> Option<GameResult> {
    check_game_over_with(hands, |player| has_legal_move(board, hands, player))
}

/// [`check_game_over`] with the mobility test supplied by the caller
///
/// The controller passes a cached lookup so a position is never searched twice.
pub(crate) fn check_game_over_with(
    hands: &Hands,
    mut can_move: impl FnMut(Player) -> bool,
) -> Option<GameResult> {
    if let Some(winner) = Player::ALL.into_iter().find(|&p| hands.get(p).is_empty()) {
        return Some(GameResult {
            winner,
            reason: GameOverReason::HandEmptied,
        });
    }

    if Player::ALL.into_iter().any(&mut can_move) {
        return None;
    }

    let winner = Player::ALL
        .into_iter()
        .min_by_key(|&p| hands.get(p).len())
        .unwrap_or(Player::Blue);
    Some(GameResult {
        winner,
        reason: GameOverReason::AllPlayersStuck,
    })
}
