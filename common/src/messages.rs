use crate::connect4::{Board, Player, PlayerNum};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

#[derive(Serialize, Deserialize, Debug)]
pub enum Response {
    /// Sent when two clients are paired; prompts the color choice.
    Joined { player_num: PlayerNum },
    /// Full board snapshot pushed after setup and after every accepted move.
    GameState {
        board: Board,
        player: Player,
        current_player: PlayerNum,
    },
    GameEnd { outcome: Outcome },
    /// A move the engine refused, with a displayable reason.
    Rejected { reason: String },
}
