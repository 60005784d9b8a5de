mod connect4;
pub mod messages;

pub use connect4::{
    Board, BoardError, BoardSpace, GameState, InputError, MoveReport, Phase, Player, PlayerNum,
    Players, RawInput, ValidInput, DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
