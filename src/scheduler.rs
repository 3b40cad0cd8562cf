//! # Turn Scheduler - Deferred Bot Moves and Auto-Pass Checks
//!
//! Bot moves and auto-pass checks do not happen the instant a turn begins;
//! they fire after a think delay so a person watching can follow the game.
//! Each delayed step is a tokio task.
//!
//! ## Cancellation
//! A task can be stopped in two ways:
//! - `cancel_pending` wakes every sleeping task and tells it to give up
//! - every task records the controller generation it was scheduled under and
//!   does nothing if the generation has changed by the time it fires (reset,
//!   game over, or any other move in between)
//!
//! Bot searches run on the blocking pool against a snapshot, so the
//! controller lock is only held to read the snapshot and to commit.

use crate::game_controller::{AutoPassOutcome, GameController, MoveResult, Phase};
use crate::GameResult;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// The kinds of delayed work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    /// Let the current bot seat choose and play a move
    BotMove,
    /// Decide whether the current player must be skipped
    AutoPassCheck,
}

/// What a deferred task ended up doing
#[derive(Debug, Clone)]
pub enum TaskOutcome {
    /// The bot's move (or pass) went to the controller
    BotMoved(MoveResult),
    /// The auto-pass check ran
    AutoPass(AutoPassOutcome),
    /// Cancelled, or the game moved on before the task fired
    Cancelled,
}

/// Schedules delayed steps against a shared controller
pub struct TurnScheduler {
    controller: Arc<Mutex<GameController>>,
    think_time: Duration,
    cancel: watch::Sender<u64>,
}

impl TurnScheduler {
    pub fn new(controller: Arc<Mutex<GameController>>, think_time: Duration) -> Self {
        let (cancel, _) = watch::channel(0);
        Self {
            controller,
            think_time,
            cancel,
        }
    }

    pub fn controller(&self) -> &Arc<Mutex<GameController>> {
        &self.controller
    }

    /// Schedules `task` against the controller's current generation
    pub fn schedule(&self, task: DeferredTask) -> JoinHandle<TaskOutcome> {
        let generation = self.controller.lock().generation();
        self.spawn(task, generation)
    }

    /// Schedules whatever the controller's phase calls for
    ///
    /// Returns `None` when a human has to act, during setup, or once the game
    /// is over.
    pub fn schedule_next(&self) -> Option<JoinHandle<TaskOutcome>> {
        let (task, generation) = {
            let controller = self.controller.lock();
            let task = match controller.phase() {
                Phase::EvaluatingAutoPass => DeferredTask::AutoPassCheck,
                Phase::AwaitingTurnInput if controller.current_seat().is_bot() => {
                    DeferredTask::BotMove
                }
                _ => return None,
            };
            (task, controller.generation())
        };
        Some(self.spawn(task, generation))
    }

    /// Stops every task that has not committed yet
    pub fn cancel_pending(&self) {
        self.cancel.send_modify(|epoch| *epoch += 1);
        tracing::debug!("pending turn tasks cancelled");
    }

    /// Plays deferred steps until a human must act or the game ends
    ///
    /// Returns the result once the game is over, `None` if a human is to move
    /// or the run was cancelled.
    pub async fn run_until_human_turn(&self) -> Option<GameResult> {
        while let Some(handle) = self.schedule_next() {
            match handle.await {
                Ok(TaskOutcome::Cancelled) => return None,
                Ok(_) => {}
                Err(err) => {
                    tracing::error!(%err, "turn task failed");
                    return None;
                }
            }
        }
        self.controller.lock().result()
    }

    fn spawn(&self, task: DeferredTask, generation: u64) -> JoinHandle<TaskOutcome> {
        let controller = Arc::clone(&self.controller);
        let think_time = self.think_time;
        let cancel = self.cancel.subscribe();
        tracing::trace!(?task, generation, ?think_time, "scheduling turn task");
        tokio::spawn(run_task(controller, task, generation, think_time, cancel))
    }
}

async fn run_task(
    controller: Arc<Mutex<GameController>>,
    task: DeferredTask,
    generation: u64,
    think_time: Duration,
    mut cancel: watch::Receiver<u64>,
) -> TaskOutcome {
    let epoch = *cancel.borrow();
    tokio::select! {
        _ = tokio::time::sleep(think_time) => {}
        _ = cancel.changed() => return TaskOutcome::Cancelled,
    }

    match task {
        DeferredTask::AutoPassCheck => {
            let mut controller = controller.lock();
            if controller.generation() != generation {
                tracing::debug!(generation, "auto-pass check is stale");
                return TaskOutcome::Cancelled;
            }
            match controller.evaluate_auto_pass() {
                Ok(outcome) => TaskOutcome::AutoPass(outcome),
                Err(reason) => {
                    tracing::warn!(%reason, "auto-pass check rejected");
                    TaskOutcome::Cancelled
                }
            }
        }
        DeferredTask::BotMove => {
            let turn = {
                let mut controller = controller.lock();
                if controller.generation() != generation {
                    tracing::debug!(generation, "bot move is stale");
                    return TaskOutcome::Cancelled;
                }
                match controller.begin_bot_turn() {
                    Ok(turn) => turn,
                    Err(reason) => {
                        tracing::warn!(%reason, "bot turn could not start");
                        return TaskOutcome::Cancelled;
                    }
                }
            };

            let search = tokio::task::spawn_blocking(move || {
                let mut turn = turn;
                let choice = turn.compute();
                (turn.generation, choice)
            });
            let (turn_generation, choice) = match search.await {
                Ok(found) => found,
                Err(err) => {
                    tracing::error!(%err, "bot search failed");
                    controller.lock().abandon_bot_turn(generation);
                    return TaskOutcome::Cancelled;
                }
            };

            let mut controller = controller.lock();
            if *cancel.borrow() != epoch {
                controller.abandon_bot_turn(turn_generation);
                return TaskOutcome::Cancelled;
            }
            TaskOutcome::BotMoved(controller.finish_bot_turn(turn_generation, choice))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::Difficulty;
    use crate::config::{GameConfig, Seat};
    use crate::Player;

    fn shared(config: GameConfig) -> Arc<Mutex<GameController>> {
        let mut controller = GameController::new(config.with_seed(17));
        controller.start();
        Arc::new(Mutex::new(controller))
    }

    #[tokio::test]
    async fn test_bots_play_to_the_end() {
        let controller = shared(GameConfig::all_bots(Difficulty::Easy));
        let scheduler = TurnScheduler::new(controller.clone(), Duration::ZERO);
        let result = scheduler.run_until_human_turn().await;
        assert!(result.is_some());
        assert_eq!(controller.lock().result(), result);
    }

    #[tokio::test]
    async fn test_human_turn_stops_the_run() {
        let config = GameConfig::all_human().with_seat(Player::Blue, Seat::Bot(Difficulty::Hard));
        let controller = shared(config);
        let scheduler = TurnScheduler::new(controller.clone(), Duration::ZERO);

        assert_eq!(scheduler.run_until_human_turn().await, None);
        let controller = controller.lock();
        assert_eq!(controller.current_player(), Player::Yellow);
        assert_eq!(controller.phase(), Phase::AwaitingTurnInput);
        assert!(controller.board().occupied_count(Player::Blue) > 0);
    }

    #[tokio::test]
    async fn test_cancel_before_fire() {
        let controller = shared(GameConfig::all_bots(Difficulty::Medium));
        let scheduler = TurnScheduler::new(controller.clone(), Duration::from_secs(30));
        let handle = scheduler.schedule(DeferredTask::BotMove);
        scheduler.cancel_pending();

        assert!(matches!(handle.await, Ok(TaskOutcome::Cancelled)));
        let controller = controller.lock();
        assert_eq!(controller.board().occupied_count(Player::Blue), 0);
        assert_eq!(controller.phase(), Phase::AwaitingTurnInput);
    }

    #[tokio::test]
    async fn test_reset_makes_task_stale() {
        let controller = shared(GameConfig::all_bots(Difficulty::Hard));
        let scheduler = TurnScheduler::new(controller.clone(), Duration::from_millis(20));
        let handle = scheduler.schedule_next().expect("bot seat to move");
        {
            let mut controller = controller.lock();
            controller.reset();
            controller.start();
        }

        assert!(matches!(handle.await, Ok(TaskOutcome::Cancelled)));
        assert_eq!(controller.lock().move_history().len(), 0);
    }

    #[tokio::test]
    async fn test_nothing_scheduled_during_setup() {
        let controller = Arc::new(Mutex::new(GameController::new(GameConfig::all_bots(
            Difficulty::Easy,
        ))));
        let scheduler = TurnScheduler::new(controller, Duration::ZERO);
        assert!(scheduler.schedule_next().is_none());
    }
}
