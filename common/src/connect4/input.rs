use crate::connect4::game_state::GameState;
use crate::connect4::player::PlayerNum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum InputError {
    #[error("Column {column} is full")]
    ColumnFull { column: usize },
    #[error("Column {column} is out of range for a board {width} columns wide")]
    InvalidColumn { column: usize, width: usize },
    #[error("It is not {player_num:?}'s turn")]
    NotYourTurn { player_num: PlayerNum },
    #[error("The game is already over")]
    GameOver,
}

// A column drop as it arrives off the wire, before any validation
#[derive(Serialize, Deserialize, Copy, Clone, Debug)]
pub struct RawInput {
    pub column: usize,
}

/// A drop that has been checked against the current game state and carries
/// the row its piece will land in.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ValidInput {
    column: usize,
    row: usize,
}

impl ValidInput {
    // Enforce the following constraints:
    // - The game is still in progress
    // - The submitting player is the active player
    // - The column is in range and has an open cell
    pub fn new(
        raw: RawInput,
        game_state: &GameState,
        player_num: PlayerNum,
    ) -> Result<Self, InputError> {
        if game_state.is_over() {
            return Err(InputError::GameOver);
        }
        if game_state.current_player() != player_num {
            return Err(InputError::NotYourTurn { player_num });
        }
        let board = game_state.board();
        if raw.column >= board.width() {
            return Err(InputError::InvalidColumn {
                column: raw.column,
                width: board.width(),
            });
        }
        let row = board
            .lowest_open_row(raw.column)
            .ok_or(InputError::ColumnFull { column: raw.column })?;
        Ok(ValidInput {
            column: raw.column,
            row,
        })
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn row(&self) -> usize {
        self.row
    }
}
