use blokus::config::{GameConfig, Seat};
use blokus::game_controller::{GameController, Phase, TurnAction};
use blokus::scheduler::{DeferredTask, TaskOutcome, TurnScheduler};
use blokus::{Coord, Difficulty, PieceId, Player};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

fn human_blue() -> Arc<Mutex<GameController>> {
    let config = GameConfig::all_bots(Difficulty::Medium)
        .with_seat(Player::Blue, Seat::Human)
        .with_seed(2024);
    let mut controller = GameController::new(config);
    controller.start();
    Arc::new(Mutex::new(controller))
}

#[tokio::test]
async fn test_bots_answer_a_human_move() {
    let controller = human_blue();
    let scheduler = TurnScheduler::new(controller.clone(), Duration::from_millis(1));

    assert!(scheduler.schedule_next().is_none());
    assert!(controller
        .lock()
        .try_place(PieceId::new(10).unwrap(), 0, Coord::new(0, 0))
        .is_success());
    // Blue has moved; the next request waits for Yellow's auto-pass check.
    assert!(!controller
        .lock()
        .try_place(PieceId::new(1).unwrap(), 0, Coord::new(5, 1))
        .is_success());

    assert_eq!(scheduler.run_until_human_turn().await, None);

    let controller = controller.lock();
    assert_eq!(controller.current_player(), Player::Blue);
    assert_eq!(controller.phase(), Phase::AwaitingTurnInput);
    let history = controller.move_history();
    assert_eq!(history.len(), 4);
    let players: Vec<Player> = history.iter().map(|e| e.player).collect();
    assert_eq!(players, Player::ALL.to_vec());
    assert!(history.iter().all(|e| matches!(e.action, TurnAction::Place(_))));
}

#[tokio::test]
async fn test_new_game_cancels_pending_bot_move() {
    let controller = human_blue();
    let scheduler = TurnScheduler::new(controller.clone(), Duration::from_millis(50));
    assert!(controller.lock().pass().is_success());

    // Yellow's auto-pass check fires, then its bot move is pending.
    let check = scheduler.schedule_next().expect("auto-pass check");
    assert!(matches!(check.await, Ok(TaskOutcome::AutoPass(_))));
    let pending = scheduler.schedule(DeferredTask::BotMove);

    scheduler.cancel_pending();
    {
        let mut controller = controller.lock();
        controller.reset();
        controller.start();
    }

    assert!(matches!(pending.await, Ok(TaskOutcome::Cancelled)));
    let controller = controller.lock();
    assert!(controller.move_history().is_empty());
    assert_eq!(controller.board().occupied_count(Player::Yellow), 0);
    assert_eq!(controller.current_player(), Player::Blue);
}
