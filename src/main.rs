//! # Blokus Arena - Terminal Front End
//!
//! Plays a four-player game of Blokus in the terminal. Each colour is seated
//! by a human or a bot (easy, medium, hard). Bot turns and forced passes are
//! deferred by the think time so the game can be followed as it runs.
//!
//! ## Usage
//! ```text
//! play --blue human --yellow hard --red medium --green easy --think-ms 400
//! ```
//! Type `help` at the prompt for the list of commands.

use anyhow::{anyhow, bail, Context};
use blokus::config::{GameConfig, Seat};
use blokus::game_controller::{GameController, MoveResult};
use blokus::render::{render_board, render_hand, render_scores, render_shape};
use blokus::scheduler::TurnScheduler;
use blokus::selection::PieceSelection;
use blokus::{logging, Coord, Difficulty, PieceId};
use clap::{Parser, ValueEnum};
use parking_lot::Mutex;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Who controls a colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SeatKind {
    Human,
    Easy,
    Medium,
    Hard,
}

impl From<SeatKind> for Seat {
    fn from(kind: SeatKind) -> Self {
        match kind {
            SeatKind::Human => Seat::Human,
            SeatKind::Easy => Seat::Bot(Difficulty::Easy),
            SeatKind::Medium => Seat::Bot(Difficulty::Medium),
            SeatKind::Hard => Seat::Bot(Difficulty::Hard),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "play", about = "Four-player Blokus against heuristic bots")]
struct Args {
    #[arg(long, value_enum, default_value_t = SeatKind::Human)]
    blue: SeatKind,

    #[arg(long, value_enum, default_value_t = SeatKind::Medium)]
    yellow: SeatKind,

    #[arg(long, value_enum, default_value_t = SeatKind::Medium)]
    red: SeatKind,

    #[arg(long, value_enum, default_value_t = SeatKind::Medium)]
    green: SeatKind,

    /// Delay before each bot move or forced pass
    #[arg(long, default_value_t = 600)]
    think_ms: u64,

    /// Seed for the bots; random if omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads for move enumeration
    #[arg(long, default_value_t = num_cpus::get())]
    threads: usize,

    #[arg(long, action = clap::ArgAction::SetTrue)]
    no_color: bool,

    /// More log output on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn game_config(&self) -> anyhow::Result<GameConfig> {
        let mut config = GameConfig::all_human().with_think_time_ms(self.think_ms)?;
        config.seats = [self.blue, self.yellow, self.red, self.green].map(Seat::from);
        config.seed = self.seed;
        Ok(config)
    }
}

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Select(u8),
    Rotate,
    Flip,
    Preview(i32, i32),
    Place(i32, i32),
    Move(u8, usize, i32, i32),
    Pass,
    Moves,
    Board,
    Hand,
    History,
    New,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&head, rest)) = words.split_first() else {
            bail!("empty command");
        };
        let int = |i: usize| -> anyhow::Result<i32> {
            let word = rest.get(i).ok_or_else(|| anyhow!("'{}' needs more arguments", head))?;
            word.parse().with_context(|| format!("'{}' is not a number", word))
        };
        let piece = |word: Option<&&str>| -> anyhow::Result<u8> {
            let word = word.ok_or_else(|| anyhow!("'{}' needs a piece", head))?;
            word.parse::<PieceId>()
                .map(PieceId::get)
                .or_else(|_| word.parse::<u8>())
                .map_err(|_| anyhow!("unknown piece '{}'", word))
        };

        let command = match head.to_ascii_lowercase().as_str() {
            "select" | "s" => Command::Select(piece(rest.first())?),
            "rotate" | "r" => Command::Rotate,
            "flip" | "f" => Command::Flip,
            "preview" => Command::Preview(int(0)?, int(1)?),
            "place" | "p" => Command::Place(int(0)?, int(1)?),
            "move" => Command::Move(piece(rest.first())?, int(1)? as usize, int(2)?, int(3)?),
            "pass" => Command::Pass,
            "moves" => Command::Moves,
            "board" | "b" => Command::Board,
            "hand" | "h" => Command::Hand,
            "history" => Command::History,
            "new" => Command::New,
            "help" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => bail!("unknown command '{}' (try 'help')", other),
        };
        Ok(command)
    }
}

const HELP: &str = "\
commands:
  select <piece>       pick up a piece by id (1-21) or name (e.g. x5)
  rotate | flip        turn or mirror the selected piece
  preview <x> <y>      show the selected piece at (x, y)
  place <x> <y>        place the selected piece at (x, y)
  move <piece> <o> <x> <y>
                       place a piece in orientation o (0-7) directly
  pass                 give up this turn
  moves                list your legal moves
  board | hand         redraw the board or your pieces
  history              print the move list
  new                  start a new game
  quit";

/// Human-side state between prompts
struct Session {
    color: bool,
    selection: Option<PieceSelection>,
    shown_history: usize,
}

impl Session {
    fn show_turn(&self, controller: &GameController) {
        let player = controller.current_player();
        println!("\n{}", render_board(controller.board(), &[], true, self.color));
        println!("{} to move. Pieces: {}", player, render_hand(controller.hands().get(player)));
        if let Some(selection) = &self.selection {
            println!("Holding piece {} (orientation {}):", selection.piece(), selection.orientation());
            print!("{}", render_shape(&selection.shape()));
        }
    }

    fn report_new_history(&mut self, controller: &GameController) {
        for entry in controller.move_history().iter().skip(self.shown_history) {
            println!("{}. {} - {}", entry.move_number, entry.player, entry.action);
        }
        self.shown_history = controller.move_history().len();
    }

    /// Runs one command; returns false to quit
    fn handle(&mut self, command: Command, scheduler: &TurnScheduler) -> anyhow::Result<bool> {
        let mut controller = scheduler.controller().lock();
        let player = controller.current_player();
        match command {
            Command::Select(raw) => {
                let selection = PieceSelection::select(controller.hands().get(player), player, raw)?;
                print!("{}", render_shape(&selection.shape()));
                self.selection = Some(selection);
            }
            Command::Rotate | Command::Flip => {
                let selection = self.selection.as_mut().ok_or_else(|| anyhow!("no piece selected"))?;
                if command == Command::Rotate {
                    selection.rotate();
                } else {
                    selection.flip();
                }
                print!("{}", render_shape(&selection.shape()));
            }
            Command::Preview(x, y) => {
                let selection = self.selection.ok_or_else(|| anyhow!("no piece selected"))?;
                let preview = selection.preview(controller.board(), player, Coord::new(x, y));
                println!("{}", render_board(controller.board(), &preview.cells, preview.legal, self.color));
                println!("{}", if preview.legal { "legal" } else { "not legal" });
            }
            Command::Place(x, y) => {
                let selection = self.selection.ok_or_else(|| anyhow!("no piece selected"))?;
                let result = controller.try_place(selection.piece(), selection.orientation(), Coord::new(x, y));
                self.after_move(result)?;
            }
            Command::Move(raw, orientation, x, y) => {
                let piece = PieceId::new(raw).ok_or_else(|| anyhow!("no piece with id {}", raw))?;
                let result = controller.try_place(piece, orientation, Coord::new(x, y));
                self.after_move(result)?;
            }
            Command::Pass => {
                let result = controller.pass();
                self.after_move(result)?;
            }
            Command::Moves => {
                let moves = controller.legal_moves();
                println!("{} legal moves", moves.len());
                for mv in moves.iter().take(40) {
                    println!("  move {} {} {} {}", mv.piece, mv.orientation, mv.origin.x, mv.origin.y);
                }
            }
            Command::Board => self.show_turn(&controller),
            Command::Hand => println!("{}", render_hand(controller.hands().get(player))),
            Command::History => println!("{}", controller.format_history()),
            Command::New => {
                drop(controller);
                scheduler.cancel_pending();
                let mut controller = scheduler.controller().lock();
                controller.reset();
                controller.start();
                self.selection = None;
                self.shown_history = 0;
                println!("New game.");
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    fn after_move(&mut self, result: MoveResult) -> anyhow::Result<()> {
        match result {
            MoveResult::Success { .. } => {
                self.selection = None;
                Ok(())
            }
            MoveResult::Invalid { reason } => Err(reason.into()),
            MoveResult::GameOver => bail!("the game is over"),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_tracing(args.verbose);

    rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads.max(1))
        .build_global()
        .context("failed to configure the worker pool")?;

    let config = args.game_config()?;
    tracing::info!(?config, threads = args.threads, "starting");
    let think_time = config.think_time;
    let controller = Arc::new(Mutex::new(GameController::new(config)));
    controller.lock().start();
    let scheduler = TurnScheduler::new(controller, think_time);

    let mut session = Session {
        color: !args.no_color,
        selection: None,
        shown_history: 0,
    };
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", HELP);

    loop {
        let finished = scheduler.run_until_human_turn().await;
        {
            let controller = scheduler.controller().lock();
            session.report_new_history(&controller);
            if let Some(result) = finished {
                println!("\n{}", render_board(controller.board(), &[], true, session.color));
                println!("{}\n{}", result, render_scores(controller.hands(), session.color));
                println!("Type 'new' to play again or 'quit'.");
            } else {
                session.show_turn(&controller);
            }
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => match session.handle(command, &scheduler) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => println!("error: {:#}", err),
            },
            Err(err) => println!("error: {:#}", err),
        }
    }

    scheduler.cancel_pending();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!("select 21".parse::<Command>().unwrap(), Command::Select(21));
        assert_eq!("s x5".parse::<Command>().unwrap(), Command::Select(21));
        assert_eq!("place 3 4".parse::<Command>().unwrap(), Command::Place(3, 4));
        assert_eq!("move 1 0 0 0".parse::<Command>().unwrap(), Command::Move(1, 0, 0, 0));
        assert_eq!("  PASS ".parse::<Command>().unwrap(), Command::Pass);
        assert!("place 3".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
        assert!("".parse::<Command>().is_err());
    }

    #[test]
    fn test_args_to_config() {
        let args = Args::parse_from(["play", "--blue", "hard", "--green", "human", "--seed", "4", "--think-ms", "0"]);
        let config = args.game_config().unwrap();
        assert_eq!(config.seats[0], Seat::Bot(Difficulty::Hard));
        assert_eq!(config.seats[3], Seat::Human);
        assert_eq!(config.seed, Some(4));
        assert!(Args::parse_from(["play", "--think-ms", "999999"]).game_config().is_err());
    }
}
