mod board;
mod game_state;
mod input;
mod player;

pub use board::{Board, BoardError, BoardSpace, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use game_state::{GameState, MoveReport, Phase};
pub use input::{InputError, RawInput, ValidInput};
pub use player::{Player, PlayerNum, Players};
