//! # Game Configuration
//!
//! Who sits in each of the four seats, how long bots "think" before moving,
//! and the seed for the bots' random generator.

use crate::board::Player;
use crate::bot::Difficulty;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default delay before a deferred bot move or auto-pass check fires
pub const DEFAULT_THINK_TIME: Duration = Duration::from_millis(600);

/// Errors raised while building a configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown seat type '{0}' (expected human, easy, medium or hard)")]
    UnknownSeat(String),
    #[error("think time of {0} ms is too long (max {} ms)", MAX_THINK_TIME_MS)]
    ThinkTimeTooLong(u64),
}

/// Upper bound on the configurable think time
pub const MAX_THINK_TIME_MS: u64 = 60_000;

/// Controller of one seat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seat {
    Human,
    Bot(Difficulty),
}

impl Seat {
    pub fn is_bot(self) -> bool {
        matches!(self, Seat::Bot(_))
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seat::Human => f.write_str("human"),
            Seat::Bot(difficulty) => write!(f, "{} bot", difficulty),
        }
    }
}

impl FromStr for Seat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("human") {
            return Ok(Seat::Human);
        }
        s.parse::<Difficulty>()
            .map(Seat::Bot)
            .map_err(|_| ConfigError::UnknownSeat(s.trim().to_string()))
    }
}

/// Settings fixed for the lifetime of a game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Seat for each player, indexed by `Player::index`
    pub seats: [Seat; 4],
    /// Delay applied to deferred bot moves and auto-pass checks
    pub think_time: Duration,
    /// Seed for bot randomness; `None` draws one at start-up
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Four human seats
    pub fn all_human() -> Self {
        Self {
            seats: [Seat::Human; 4],
            think_time: DEFAULT_THINK_TIME,
            seed: None,
        }
    }

    /// Four bots of the same difficulty
    pub fn all_bots(difficulty: Difficulty) -> Self {
        Self {
            seats: [Seat::Bot(difficulty); 4],
            ..Self::all_human()
        }
    }

    pub fn with_seat(mut self, player: Player, seat: Seat) -> Self {
        self.seats[player.index()] = seat;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_think_time_ms(mut self, millis: u64) -> Result<Self, ConfigError> {
        if millis > MAX_THINK_TIME_MS {
            return Err(ConfigError::ThinkTimeTooLong(millis));
        }
        self.think_time = Duration::from_millis(millis);
        Ok(self)
    }

    pub fn seat(&self, player: Player) -> Seat {
        self.seats[player.index()]
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::all_human()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seats() {
        assert_eq!("human".parse::<Seat>(), Ok(Seat::Human));
        assert_eq!(" Medium ".parse::<Seat>(), Ok(Seat::Bot(Difficulty::Medium)));
        assert_eq!(
            "robot".parse::<Seat>(),
            Err(ConfigError::UnknownSeat("robot".to_string()))
        );
    }

    #[test]
    fn test_builder_methods() {
        let config = GameConfig::all_human()
            .with_seat(Player::Red, Seat::Bot(Difficulty::Hard))
            .with_seed(9)
            .with_think_time_ms(0)
            .unwrap();
        assert_eq!(config.seat(Player::Red), Seat::Bot(Difficulty::Hard));
        assert_eq!(config.seat(Player::Blue), Seat::Human);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.think_time, Duration::ZERO);
        assert!(GameConfig::default().with_think_time_ms(MAX_THINK_TIME_MS + 1).is_err());
    }

    #[test]
    fn test_all_bots() {
        let config = GameConfig::all_bots(Difficulty::Easy);
        assert!(Player::ALL.iter().all(|&p| config.seat(p).is_bot()));
    }
}
