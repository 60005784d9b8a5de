use crate::connect4::board::{Board, BoardError};
use crate::connect4::input::{InputError, RawInput, ValidInput};
use crate::connect4::player::{Player, PlayerNum, Players};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq)]
pub enum Phase {
    InProgress,
    Won(PlayerNum),
    Tied,
}

/// What a single accepted move did: where the piece landed and the phase the
/// game moved into.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MoveReport {
    pub row: usize,
    pub column: usize,
    pub phase: Phase,
}

#[derive(Debug)]
pub struct GameState {
    board: Board,
    players: Players,
    current_player: PlayerNum,
    phase: Phase,
}

impl GameState {
    /// Empty board, player 1 to move.
    pub fn new(players: Players, height: usize, width: usize) -> Result<Self, BoardError> {
        Ok(GameState {
            board: Board::new(height, width)?,
            players,
            current_player: PlayerNum::P1,
            phase: Phase::InProgress,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self, num: PlayerNum) -> &Player {
        &self.players[num]
    }

    pub fn current_player(&self) -> PlayerNum {
        self.current_player
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    // Won and Tied are absorbing: no further moves are accepted
    pub fn is_over(&self) -> bool {
        !matches!(self.phase, Phase::InProgress)
    }

    pub fn winner(&self) -> Option<&Player> {
        match self.phase {
            Phase::Won(num) => Some(&self.players[num]),
            _ => None,
        }
    }

    /// Commit a validated drop for the active player, then run the win check,
    /// then the tie check, then hand the turn to the opponent if the game
    /// continues.
    pub fn apply(&mut self, input: ValidInput) -> MoveReport {
        let num = self.current_player;
        // ValidInput resolved an empty in-range cell, so a failure here is a bug
        self.board
            .place(input.row(), input.column(), num)
            .expect("validated input targets an empty cell");

        self.phase = if self.board.check_for_win(num) {
            Phase::Won(num)
        } else if self.board.is_full() {
            Phase::Tied
        } else {
            self.current_player = num.other();
            Phase::InProgress
        };

        MoveReport {
            row: input.row(),
            column: input.column(),
            phase: self.phase,
        }
    }

    /// Validate-then-apply convenience for the active player.
    pub fn attempt_move(&mut self, column: usize) -> Result<MoveReport, InputError> {
        let input = ValidInput::new(RawInput { column }, self, self.current_player)?;
        Ok(self.apply(input))
    }
}
