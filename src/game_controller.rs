//! # Game Controller Module - Central Game State Management
//!
//! The `GameController` is the single source of truth for a Blokus game. It
//! owns the board, the four hands, whose turn it is, and the move history.
//! Nothing else commits changes to them.
//!
//! ## Phases
//! ```text
//!  AwaitingMenuSetup ──start──► AwaitingTurnInput ◄──────────────┐
//!         ▲                      │        │                      │
//!       reset             human move   bot seat                  │
//!         │                 or pass       ▼                      │
//!      GameOver ◄──────────────┤     BotThinking ──finish──┐     │
//!                              ▼                           ▼     │
//!                       EvaluatingAutoPass ◄───────────────┘     │
//!                          │   │    └──────has a move────────────┘
//!                          │   └──no move: forced pass (next player)
//!                          └──win check──► GameOver
//! ```
//!
//! ## Generations
//! Every committed change bumps a monotonic `generation`. Work started
//! against an older generation (a bot search, a delayed auto-pass check) is
//! rejected when it tries to commit, so a reset or game over can never be
//! followed by a stale move.
//!
//! ## Mobility Cache
//! Whether a player has any legal move is cached per player and cleared
//! whenever the board changes. Passes leave the board untouched, so a round
//! of passes never repeats a search.

use crate::board::{Board, Hands, Player};
use crate::bot::{self, Difficulty};
use crate::config::{GameConfig, Seat};
use crate::movegen::{all_legal_moves, has_any_legal_move, PlacedMove};
use crate::pieces::PieceId;
use crate::rules::is_legal_placement;
use crate::shape::Coord;
use crate::{check_game_over_with, GameOverReason, GameResult};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::fmt;
use std::time::SystemTime;
use thiserror::Error;

/// What a player did on their turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnAction {
    /// A piece was placed
    Place(PlacedMove),
    /// The player chose to pass
    Pass,
    /// The player had no legal move and was skipped
    AutoPass,
}

impl fmt::Display for TurnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnAction::Place(mv) => write!(f, "{}", mv),
            TurnAction::Pass => f.write_str("pass"),
            TurnAction::AutoPass => f.write_str("pass (no legal move)"),
        }
    }
}

/// Result of attempting to apply a move
#[derive(Debug, Clone)]
pub enum MoveResult {
    /// Move was successfully applied
    Success {
        /// What was applied
        action: TurnAction,
        /// Player who acted
        player: Player,
        /// Set when this action ended the game
        result: Option<GameResult>,
    },
    /// Move was rejected; nothing changed
    Invalid {
        /// Reason the move was rejected
        reason: MoveValidationError,
    },
    /// Game is already over, no more moves allowed
    GameOver,
}

impl MoveResult {
    pub fn is_success(&self) -> bool {
        matches!(self, MoveResult::Success { .. })
    }
}

/// Reasons a request to the controller is refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveValidationError {
    /// The game has already finished
    #[error("game is already over")]
    GameAlreadyOver,
    /// The controller is not in a phase that accepts this request
    #[error("not accepted while {0}")]
    WrongPhase(&'static str),
    /// The current seat is a bot
    #[error("it is not a human player's turn")]
    NotHumanTurn,
    /// The current seat is human
    #[error("it is not a bot's turn")]
    NotBotTurn,
    /// The piece id does not exist
    #[error("no piece with id {0}")]
    UnknownPiece(u8),
    /// The piece was already placed
    #[error("piece {0} is not in {1}'s hand")]
    PieceNotInHand(PieceId, Player),
    /// Orientation index outside 0..8
    #[error("orientation {0} is out of range")]
    BadOrientation(usize),
    /// Bounds, overlap, or adjacency rule failed
    #[error("{0} cannot place {1} there")]
    IllegalPlacement(Player, PieceId),
    /// The work was started before the game state last changed
    #[error("stale request from generation {0}")]
    StaleGeneration(u64),
}

/// A single entry in the move history
#[derive(Debug, Clone)]
pub struct MoveHistoryEntry {
    /// When the action was committed
    pub timestamp: SystemTime,
    /// Player who acted
    pub player: Player,
    /// The action
    pub action: TurnAction,
    /// Turn number (1-indexed)
    pub move_number: usize,
}

impl MoveHistoryEntry {
    pub fn new(player: Player, action: TurnAction, move_number: usize) -> Self {
        Self {
            timestamp: SystemTime::now(),
            player,
            action,
            move_number,
        }
    }
}

/// Controller state machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingMenuSetup,
    AwaitingTurnInput,
    EvaluatingAutoPass,
    BotThinking,
    GameOver(GameResult),
}

impl Phase {
    fn describe(self) -> &'static str {
        match self {
            Phase::AwaitingMenuSetup => "awaiting setup",
            Phase::AwaitingTurnInput => "awaiting turn input",
            Phase::EvaluatingAutoPass => "evaluating auto-pass",
            Phase::BotThinking => "a bot is thinking",
            Phase::GameOver(_) => "the game is over",
        }
    }
}

/// Outcome of an auto-pass evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoPassOutcome {
    /// The player has a legal move and may now act
    Ready(Player),
    /// The player had no legal move and was skipped
    Passed(Player),
    /// The evaluation ended the game
    GameOver(GameResult),
}

/// Everything a bot needs to choose a move away from the controller
///
/// Holds copies of the board and hands, so the search can run on another
/// thread while the controller stays available.
#[derive(Debug, Clone)]
pub struct BotTurn {
    pub generation: u64,
    pub player: Player,
    pub difficulty: Difficulty,
    pub board: Board,
    pub hands: Hands,
    rng: Xoshiro256PlusPlus,
}

impl BotTurn {
    /// Runs the bot policy; `None` means pass
    pub fn compute(&mut self) -> Option<PlacedMove> {
        bot::select_move(
            &self.board,
            self.hands.get(self.player),
            self.player,
            self.difficulty,
            &mut self.rng,
        )
    }
}

/// The central game controller that owns the authoritative game state
///
/// # Usage
/// ```rust
/// use blokus::config::GameConfig;
/// use blokus::game_controller::{AutoPassOutcome, GameController};
/// use blokus::{Coord, PieceId, Player};
///
/// let mut controller = GameController::new(GameConfig::all_human());
/// controller.start();
///
/// let monomino = PieceId::new(1).unwrap();
/// let result = controller.try_place(monomino, 0, Coord::new(0, 0));
/// assert!(result.is_success());
/// assert_eq!(controller.current_player(), Player::Yellow);
/// assert_eq!(
///     controller.evaluate_auto_pass(),
///     Ok(AutoPassOutcome::Ready(Player::Yellow))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct GameController {
    config: GameConfig,
    board: Board,
    hands: Hands,
    current: Player,
    phase: Phase,
    move_history: Vec<MoveHistoryEntry>,
    generation: u64,
    mobility: [Option<bool>; 4],
    rng: Xoshiro256PlusPlus,
}

impl GameController {
    /// Creates a controller waiting for `start`
    pub fn new(config: GameConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        tracing::debug!(seed, "seeding bot generator");
        Self {
            config,
            board: Board::new(),
            hands: Hands::full(),
            current: Player::Blue,
            phase: Phase::AwaitingMenuSetup,
            move_history: Vec::new(),
            generation: 0,
            mobility: [None; 4],
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Creates a controller already in play from an arbitrary position
    ///
    /// The first phase is `EvaluatingAutoPass` for `to_move`, exactly as if
    /// the previous player had just finished.
    pub fn from_position(config: GameConfig, board: Board, hands: Hands, to_move: Player) -> Self {
        let mut controller = Self::new(config);
        controller.board = board;
        controller.hands = hands;
        controller.current = to_move;
        controller.phase = Phase::EvaluatingAutoPass;
        controller
    }

    /// Leaves setup: empty board, full hands, Blue to move
    pub fn start(&mut self) {
        self.board = Board::new();
        self.hands = Hands::full();
        self.current = Player::Blue;
        self.move_history.clear();
        self.mobility = [None; 4];
        self.phase = Phase::AwaitingTurnInput;
        self.generation += 1;
        tracing::info!(seats = ?self.config.seats, "game started");
    }

    /// Returns to setup, invalidating any outstanding work
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.hands = Hands::full();
        self.current = Player::Blue;
        self.move_history.clear();
        self.mobility = [None; 4];
        self.phase = Phase::AwaitingMenuSetup;
        self.generation += 1;
        tracing::info!(generation = self.generation, "game reset");
    }

    /// Resolves and checks a human placement without applying it
    pub fn validate_move(
        &self,
        piece: PieceId,
        orientation: usize,
        origin: Coord,
    ) -> Result<PlacedMove, MoveValidationError> {
        self.expect_phase(Phase::AwaitingTurnInput)?;
        if self.config.seat(self.current).is_bot() {
            return Err(MoveValidationError::NotHumanTurn);
        }
        self.resolve(piece, orientation, origin)
    }

    /// Attempts a human placement for the current player
    pub fn try_place(&mut self, piece: PieceId, orientation: usize, origin: Coord) -> MoveResult {
        if self.is_game_over() {
            return MoveResult::GameOver;
        }
        match self.validate_move(piece, orientation, origin) {
            Ok(mv) => self.commit(TurnAction::Place(mv)),
            Err(reason) => MoveResult::Invalid { reason },
        }
    }

    /// The current human player passes voluntarily
    pub fn pass(&mut self) -> MoveResult {
        if self.is_game_over() {
            return MoveResult::GameOver;
        }
        if let Err(reason) = self.expect_phase(Phase::AwaitingTurnInput) {
            return MoveResult::Invalid { reason };
        }
        if self.config.seat(self.current).is_bot() {
            return MoveResult::Invalid {
                reason: MoveValidationError::NotHumanTurn,
            };
        }
        self.commit(TurnAction::Pass)
    }

    /// Decides whether the current player can act or must be skipped
    pub fn evaluate_auto_pass(&mut self) -> Result<AutoPassOutcome, MoveValidationError> {
        if let Phase::GameOver(result) = self.phase {
            return Ok(AutoPassOutcome::GameOver(result));
        }
        self.expect_phase(Phase::EvaluatingAutoPass)?;

        let player = self.current;
        if self.hands.get(player).is_empty() {
            let result = GameResult {
                winner: player,
                reason: GameOverReason::HandEmptied,
            };
            self.finish(result);
            return Ok(AutoPassOutcome::GameOver(result));
        }

        if self.can_move(player) {
            self.phase = Phase::AwaitingTurnInput;
            return Ok(AutoPassOutcome::Ready(player));
        }

        tracing::debug!(%player, "no legal move, passing automatically");
        match self.commit(TurnAction::AutoPass) {
            MoveResult::Success {
                result: Some(result),
                ..
            } => Ok(AutoPassOutcome::GameOver(result)),
            _ => Ok(AutoPassOutcome::Passed(player)),
        }
    }

    /// Hands the current bot seat a snapshot to think about
    pub fn begin_bot_turn(&mut self) -> Result<BotTurn, MoveValidationError> {
        self.expect_phase(Phase::AwaitingTurnInput)?;
        let Seat::Bot(difficulty) = self.config.seat(self.current) else {
            return Err(MoveValidationError::NotBotTurn);
        };
        self.phase = Phase::BotThinking;
        let rng = Xoshiro256PlusPlus::seed_from_u64(self.rng.random());
        Ok(BotTurn {
            generation: self.generation,
            player: self.current,
            difficulty,
            board: self.board.clone(),
            hands: self.hands.clone(),
            rng,
        })
    }

    /// Commits a bot's choice computed from the snapshot of `generation`
    ///
    /// `None` passes. A generation mismatch means the game moved on while the
    /// bot was thinking; the choice is dropped.
    pub fn finish_bot_turn(&mut self, generation: u64, choice: Option<PlacedMove>) -> MoveResult {
        if generation != self.generation {
            tracing::warn!(generation, current = self.generation, "dropping stale bot move");
            return MoveResult::Invalid {
                reason: MoveValidationError::StaleGeneration(generation),
            };
        }
        if self.is_game_over() {
            return MoveResult::GameOver;
        }
        if let Err(reason) = self.expect_phase(Phase::BotThinking) {
            return MoveResult::Invalid { reason };
        }

        match choice {
            Some(mv) => match self.resolve(mv.piece, mv.orientation, mv.origin) {
                Ok(mv) => self.commit(TurnAction::Place(mv)),
                Err(reason) => {
                    // Leave the seat able to try again.
                    self.phase = Phase::AwaitingTurnInput;
                    MoveResult::Invalid { reason }
                }
            },
            None => self.commit(TurnAction::Pass),
        }
    }

    /// Gives up a bot turn started under `generation` without acting
    ///
    /// The seat goes back to `AwaitingTurnInput` so the turn can be retried.
    /// Does nothing if the game has moved on.
    pub fn abandon_bot_turn(&mut self, generation: u64) {
        if generation == self.generation && self.phase == Phase::BotThinking {
            self.phase = Phase::AwaitingTurnInput;
        }
    }

    /// Runs a whole bot turn synchronously
    pub fn play_bot_turn(&mut self) -> MoveResult {
        if self.is_game_over() {
            return MoveResult::GameOver;
        }
        match self.begin_bot_turn() {
            Ok(mut turn) => {
                let choice = turn.compute();
                self.finish_bot_turn(turn.generation, choice)
            }
            Err(reason) => MoveResult::Invalid { reason },
        }
    }

    /// Advances bot seats and auto-pass checks until a human must act or the
    /// game ends
    ///
    /// Returns the result once the game is over.
    pub fn run_until_human_turn(&mut self) -> Option<GameResult> {
        loop {
            match self.phase {
                Phase::GameOver(result) => return Some(result),
                Phase::EvaluatingAutoPass => {
                    if self.evaluate_auto_pass().is_err() {
                        return None;
                    }
                }
                Phase::AwaitingTurnInput if self.config.seat(self.current).is_bot() => {
                    if let MoveResult::Invalid { reason } = self.play_bot_turn() {
                        tracing::error!(%reason, "bot turn rejected");
                        return None;
                    }
                }
                _ => return None,
            }
        }
    }

    /// Legal moves for the player to act (empty once the game is over)
    pub fn legal_moves(&self) -> Vec<PlacedMove> {
        if self.is_game_over() {
            Vec::new()
        } else {
            all_legal_moves(&self.board, self.hands.get(self.current), self.current)
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn hands(&self) -> &Hands {
        &self.hands
    }

    pub fn current_player(&self) -> Player {
        self.current
    }

    pub fn current_seat(&self) -> Seat {
        self.config.seat(self.current)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Remaining-piece count per player (lower is better)
    pub fn scores(&self) -> [usize; 4] {
        self.hands.scores()
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    pub fn result(&self) -> Option<GameResult> {
        match self.phase {
            Phase::GameOver(result) => Some(result),
            _ => None,
        }
    }

    /// Get the complete move history
    pub fn move_history(&self) -> &[MoveHistoryEntry] {
        &self.move_history
    }

    /// Format move history as plain text
    pub fn format_history(&self) -> String {
        if self.move_history.is_empty() {
            return String::from("No moves made yet.");
        }

        let mut output = String::from("=== Blokus Game History ===\n\n");
        for entry in &self.move_history {
            output.push_str(&format!(
                "{}. {} - {}\n",
                entry.move_number, entry.player, entry.action
            ));
        }

        match self.phase {
            Phase::GameOver(result) => output.push_str(&format!("\nResult: {}\n", result)),
            _ => output.push_str(&format!("\n(Game in progress - {} to move)\n", self.current)),
        }
        output
    }

    fn expect_phase(&self, wanted: Phase) -> Result<(), MoveValidationError> {
        match self.phase {
            Phase::GameOver(_) => Err(MoveValidationError::GameAlreadyOver),
            phase if phase == wanted => Ok(()),
            phase => Err(MoveValidationError::WrongPhase(phase.describe())),
        }
    }

    fn resolve(
        &self,
        piece: PieceId,
        orientation: usize,
        origin: Coord,
    ) -> Result<PlacedMove, MoveValidationError> {
        let player = self.current;
        if !self.hands.get(player).contains(piece) {
            return Err(MoveValidationError::PieceNotInHand(piece, player));
        }
        let mv = PlacedMove::new(piece, orientation, origin)
            .ok_or(MoveValidationError::BadOrientation(orientation))?;
        if !is_legal_placement(&self.board, &mv.shape, mv.origin, player) {
            return Err(MoveValidationError::IllegalPlacement(player, piece));
        }
        Ok(mv)
    }

    fn can_move(&mut self, player: Player) -> bool {
        let board = &self.board;
        let hand = self.hands.get(player);
        *self.mobility[player.index()].get_or_insert_with(|| has_any_legal_move(board, hand, player))
    }

    /// Applies an action for the current player, checks for the end of the
    /// game, and passes the turn on
    fn commit(&mut self, action: TurnAction) -> MoveResult {
        let player = self.current;
        if let TurnAction::Place(mv) = &action {
            self.board.fill(mv.cells(), player);
            self.hands.get_mut(player).remove(mv.piece);
            self.mobility = [None; 4];
            tracing::info!(%player, mv = %mv, left = self.hands.get(player).len(), "piece placed");
        } else {
            tracing::info!(%player, %action, "turn passed");
        }

        let move_number = self.move_history.len() + 1;
        self.move_history
            .push(MoveHistoryEntry::new(player, action.clone(), move_number));
        self.generation += 1;

        let result = self.detect_game_over(player);
        match result {
            Some(result) => self.finish(result),
            None => {
                self.current = player.next();
                self.phase = Phase::EvaluatingAutoPass;
            }
        }

        MoveResult::Success {
            action,
            player,
            result,
        }
    }

    fn detect_game_over(&mut self, acting: Player) -> Option<GameResult> {
        if self.hands.get(acting).is_empty() {
            return Some(GameResult {
                winner: acting,
                reason: GameOverReason::HandEmptied,
            });
        }
        let board = &self.board;
        let hands = &self.hands;
        let mobility = &mut self.mobility;
        check_game_over_with(hands, |p| {
            *mobility[p.index()].get_or_insert_with(|| has_any_legal_move(board, hands.get(p), p))
        })
    }

    fn finish(&mut self, result: GameResult) {
        self.phase = Phase::GameOver(result);
        self.generation += 1;
        tracing::info!(winner = %result.winner, reason = ?result.reason, scores = ?self.hands.scores(), "game over");
    }
}
