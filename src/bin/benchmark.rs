use blokus::config::GameConfig;
use blokus::game_controller::GameController;
use blokus::{legal_moves, logging, Board, Difficulty, Hands, Player};
use clap::{Parser, ValueEnum};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Level {
    Easy,
    Medium,
    Hard,
}

impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Easy => Difficulty::Easy,
            Level::Medium => Difficulty::Medium,
            Level::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Move generation and bot self-play timings", long_about = None)]
struct Args {
    /// Number of full bot-vs-bot games to play
    #[arg(long, default_value_t = 5)]
    games: u64,

    /// Repetitions of the opening-position enumeration
    #[arg(long, default_value_t = 50)]
    enumerations: u32,

    /// Difficulty used by all four bots
    #[arg(long, value_enum, default_value_t = Level::Hard)]
    difficulty: Level,

    /// Worker threads for enumeration (default: all cores)
    #[arg(long, default_value_t = num_cpus::get())]
    threads: usize,

    /// First seed; game `n` uses `seed + n`
    #[arg(long, default_value_t = 1)]
    seed: u64,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_tracing(args.verbose);
    rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads.max(1))
        .build_global()?;

    println!("Blokus Arena - Benchmark Tool");
    println!("=============================");
    println!("Threads: {}", args.threads);
    println!("Games: {} ({} bots)", args.games, Difficulty::from(args.difficulty));
    println!("-----------------------------");

    #[cfg(debug_assertions)]
    println!("WARNING: Running in debug mode. Performance will be significantly lower.\nUse --release for accurate benchmarks.\n");

    bench_enumeration(args.enumerations);
    bench_games(&args);
    Ok(())
}

fn bench_enumeration(rounds: u32) {
    let board = Board::new();
    let hands = Hands::full();
    let start = Instant::now();
    let mut total = 0;
    for _ in 0..rounds {
        total += legal_moves(&board, &hands, Player::Blue).len();
    }
    let elapsed = start.elapsed();
    println!("\nOpening enumeration:");
    println!("  Moves per call: {}", total / rounds.max(1) as usize);
    println!("  Time per call: {:.3} ms", per_call_ms(elapsed, rounds as u64));
}

fn bench_games(args: &Args) {
    let difficulty = Difficulty::from(args.difficulty);
    let mut wins = [0u64; 4];
    let mut turns = 0usize;
    let start = Instant::now();

    for n in 0..args.games {
        let mut controller = GameController::new(GameConfig::all_bots(difficulty).with_seed(args.seed + n));
        controller.start();
        match controller.run_until_human_turn() {
            Some(result) => {
                wins[result.winner.index()] += 1;
                tracing::info!(game = n, %result, scores = ?controller.scores(), "game finished");
            }
            None => tracing::warn!(game = n, "game stopped without a result"),
        }
        turns += controller.move_history().len();
    }

    let elapsed = start.elapsed();
    println!("\nSelf-play ({} games):", args.games);
    println!("  Total turns: {}", turns);
    println!("  Time per game: {:.1} ms", per_call_ms(elapsed, args.games));
    for player in Player::ALL {
        println!("  {} wins: {}", player, wins[player.index()]);
    }
}

fn per_call_ms(elapsed: Duration, calls: u64) -> f64 {
    elapsed.as_secs_f64() * 1000.0 / calls.max(1) as f64
}
