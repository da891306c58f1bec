//! Live caller session.
//!
//! A `GameSession` is the single "current game" shown on the display and
//! driven from the admin panel. It is an ordinary owned value: whoever hosts
//! the game (the web server, a test) holds it and hands out references.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::constants::{
    DEFAULT_BOARD_COUNT, DEFAULT_BOARD_SIZE, DEFAULT_DISPLAY_SCALE, DEFAULT_MAX_NUM,
    DEFAULT_MIN_NUM, MAX_BOARD_COUNT, MAX_BOARD_SIZE, MAX_DISPLAY_SCALE, MAX_RANGE_SIZE,
    MIN_DISPLAY_SCALE,
};
use crate::simulator::{evaluate, generate_board, Board, WinCondition};

/// Rejected admin command. The session is left unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("number {number} is outside {min}-{max}")]
    OutOfRange { number: i32, min: i32, max: i32 },

    #[error("number {0} has already been called")]
    AlreadyCalled(i32),

    #[error("invalid settings: {0}")]
    InvalidSettings(&'static str),
}

/// Board layout and display options for the live game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    pub board_count: usize,
    pub board_size: usize,
    pub number_range_min: i32,
    pub number_range_max: i32,
    pub display_scale: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            board_count: DEFAULT_BOARD_COUNT,
            board_size: DEFAULT_BOARD_SIZE,
            number_range_min: DEFAULT_MIN_NUM,
            number_range_max: DEFAULT_MAX_NUM,
            display_scale: DEFAULT_DISPLAY_SCALE,
        }
    }
}

impl GameSettings {
    fn validate(&self) -> Result<(), SessionError> {
        if self.board_count < 1 {
            return Err(SessionError::InvalidSettings("board count must be at least 1"));
        }
        if self.board_count > MAX_BOARD_COUNT {
            return Err(SessionError::InvalidSettings("board count is too large"));
        }
        if self.board_size < 1 {
            return Err(SessionError::InvalidSettings("board size must be at least 1"));
        }
        if self.board_size > MAX_BOARD_SIZE {
            return Err(SessionError::InvalidSettings("board size is too large"));
        }
        if self.number_range_min >= self.number_range_max {
            return Err(SessionError::InvalidSettings(
                "range min must be less than range max",
            ));
        }
        let range = self.number_range_max as i64 - self.number_range_min as i64 + 1;
        if range > MAX_RANGE_SIZE as i64 {
            return Err(SessionError::InvalidSettings("number range is too wide"));
        }
        Ok(())
    }

    /// Copy of these settings with the fields present in `patch` replaced.
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        Self {
            board_count: patch.board_count.unwrap_or(self.board_count),
            board_size: patch.board_size.unwrap_or(self.board_size),
            number_range_min: patch.number_range_min.unwrap_or(self.number_range_min),
            number_range_max: patch.number_range_max.unwrap_or(self.number_range_max),
            display_scale: self.display_scale,
        }
    }
}

/// Partial settings sent by the admin panel. Missing fields keep their value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub board_count: Option<usize>,
    pub board_size: Option<usize>,
    pub number_range_min: Option<i32>,
    pub number_range_max: Option<i32>,
}

/// Admin panel commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionCommand {
    CallNumber { number: i32 },
    UndoNumber,
    NewGame(SettingsPatch),
    UpdateSettings(SettingsPatch),
    UpdateDisplayScale { scale: u32 },
}

/// Notifications for connected viewers, sent alongside the full state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionEvent {
    NumberCalled { number: i32 },
    NumberUndone { number: i32 },
    NewGameStarted,
}

/// The game currently on the display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    /// Changes on every deal
    pub id: Uuid,
    pub settings: GameSettings,
    pub boards: Vec<Board>,
    pub called_numbers: Vec<i32>,
    /// 0-based board indices, in the order they won
    pub winners: Vec<usize>,
}

impl GameSession {
    /// Validate `settings` and deal a fresh set of boards.
    pub fn new<R: Rng + ?Sized>(settings: GameSettings, rng: &mut R) -> Result<Self, SessionError> {
        settings.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            settings,
            boards: deal(&settings, rng),
            called_numbers: Vec::new(),
            winners: Vec::new(),
        })
    }

    pub fn last_called(&self) -> Option<i32> {
        self.called_numbers.last().copied()
    }

    /// Call `number`: stamp it on every board and record any new winners.
    pub fn call_number(&mut self, number: i32) -> Result<SessionEvent, SessionError> {
        let (min, max) = (self.settings.number_range_min, self.settings.number_range_max);
        if number < min || number > max {
            return Err(SessionError::OutOfRange { number, min, max });
        }
        if self.called_numbers.contains(&number) {
            return Err(SessionError::AlreadyCalled(number));
        }

        self.called_numbers.push(number);
        for (index, board) in self.boards.iter_mut().enumerate() {
            board.stamp(number);
            if !self.winners.contains(&index) && evaluate(board, WinCondition::Any).is_some() {
                info!(board = index + 1, number, "Board has a winning line");
                self.winners.push(index);
            }
        }
        Ok(SessionEvent::NumberCalled { number })
    }

    /// Take back the most recent call. Returns None when nothing has been called.
    pub fn undo_last(&mut self) -> Option<SessionEvent> {
        let number = self.called_numbers.pop()?;
        for board in &mut self.boards {
            board.unstamp(number);
        }
        self.recompute_winners();
        Some(SessionEvent::NumberUndone { number })
    }

    /// Apply `patch`, deal new boards and clear all calls.
    pub fn new_game<R: Rng + ?Sized>(
        &mut self,
        patch: &SettingsPatch,
        rng: &mut R,
    ) -> Result<SessionEvent, SessionError> {
        self.update_settings(patch, rng)?;
        info!(id = %self.id, "New game started");
        Ok(SessionEvent::NewGameStarted)
    }

    /// Apply `patch` and re-deal. Unlike `new_game`, viewers get no announcement.
    pub fn update_settings<R: Rng + ?Sized>(
        &mut self,
        patch: &SettingsPatch,
        rng: &mut R,
    ) -> Result<(), SessionError> {
        let settings = self.settings.merged(patch);
        settings.validate()?;
        let boards = deal(&settings, rng);

        self.settings = settings;
        self.boards = boards;
        self.called_numbers.clear();
        self.winners.clear();
        self.id = Uuid::new_v4();
        Ok(())
    }

    /// Set the display zoom, clamped to 50-200%. The game is not reset.
    pub fn set_display_scale(&mut self, scale: u32) -> u32 {
        self.settings.display_scale = scale.clamp(MIN_DISPLAY_SCALE, MAX_DISPLAY_SCALE);
        self.settings.display_scale
    }

    /// Run an admin command and return the events to announce.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        command: &SessionCommand,
        rng: &mut R,
    ) -> Result<Vec<SessionEvent>, SessionError> {
        match command {
            SessionCommand::CallNumber { number } => Ok(vec![self.call_number(*number)?]),
            SessionCommand::UndoNumber => Ok(self.undo_last().into_iter().collect()),
            SessionCommand::NewGame(patch) => Ok(vec![self.new_game(patch, rng)?]),
            SessionCommand::UpdateSettings(patch) => {
                self.update_settings(patch, rng)?;
                Ok(Vec::new())
            }
            SessionCommand::UpdateDisplayScale { scale } => {
                self.set_display_scale(*scale);
                Ok(Vec::new())
            }
        }
    }

    fn recompute_winners(&mut self) {
        self.winners = self
            .boards
            .iter()
            .enumerate()
            .filter(|(_, b)| evaluate(b, WinCondition::Any).is_some())
            .map(|(i, _)| i)
            .collect();
    }
}

fn deal<R: Rng + ?Sized>(settings: &GameSettings, rng: &mut R) -> Vec<Board> {
    (0..settings.board_count)
        .map(|_| {
            generate_board(
                settings.board_size,
                settings.number_range_min,
                settings.number_range_max,
                rng,
            )
        })
        .collect()
}
