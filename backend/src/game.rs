use crate::client::SendMsg;
use crate::util;
use common::{
    messages::{Outcome, Response},
    GameState, InputError, Phase, Player, PlayerNum, Players, RawInput, ValidInput,
    DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
use hashbrown::HashMap;
use serde::Serialize;
use serde_json::from_str;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

pub type Games = Arc<RwLock<HashMap<String, Game>>>;

#[derive(Clone, Debug)]
enum ProtocolState {
    // Each player picks a display color before the first piece drops
    Setup([Option<String>; 2]),
    InGame,
    // true means that the player wants a rematch, false means they don't
    Rematch([Option<bool>; 2]),
    End,
}

#[derive(Debug)]
pub struct Game {
    // None until both players have chosen their colors
    game_state: Option<GameState>,
    // The first element is Player 1's ID and the second is Player 2's ID
    player_ids: [String; 2],
    protocol_state: ProtocolState,
}

impl Game {
    pub fn new(player_ids: [String; 2]) -> Self {
        Game {
            game_state: None,
            player_ids,
            protocol_state: ProtocolState::Setup([None, None]),
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.protocol_state, ProtocolState::End)
    }

    // Given a client's ID, gets the opponent's ID for the game they have joined
    pub fn opponent_id(&self, id: String) -> String {
        if id == self.player_ids[0] {
            self.player_ids[1].clone()
        } else if id == self.player_ids[1] {
            self.player_ids[0].clone()
        } else {
            panic!(
                "Client with ID {} did not match any of the game's client IDs {:?}",
                id, self.player_ids
            );
        }
    }

    pub fn handle_message(
        &mut self,
        player_num: PlayerNum,
        msg: &str,
        client: &impl SendMsg,
        opponent: &impl SendMsg,
    ) {
        use ProtocolState::*;
        self.protocol_state = match self.protocol_state.clone() {
            Setup(choices) => {
                let color: String = match from_str(msg) {
                    Ok(color) => color,
                    Err(err) => {
                        warn!("Failed to deserialize input into color choice: {}", err);
                        return;
                    }
                };
                if color.is_empty() {
                    warn!("Ignoring empty color choice from {:?}", player_num);
                    return;
                }
                self.process_color_choice(client, opponent, choices, player_num, color)
            }
            InGame => {
                let input: RawInput = match from_str(msg) {
                    Ok(input) => input,
                    Err(err) => {
                        warn!("Failed to deserialize input into column drop: {}", err);
                        return;
                    }
                };
                match self.process_input(client, opponent, player_num, input) {
                    Ok(state) => state,
                    Err(err @ InputError::ColumnFull { .. }) => {
                        // A full column is a normal negative outcome; the
                        // client simply ignores the click
                        warn!("Ignoring drop from {:?}: {}", player_num, err);
                        return;
                    }
                    Err(err) => {
                        warn!("Rejected drop from {:?}: {}", player_num, err);
                        send_message(
                            client,
                            Response::Rejected {
                                reason: err.to_string(),
                            },
                        );
                        return;
                    }
                }
            }
            Rematch(choices) => {
                let choice: bool = match from_str(msg) {
                    Ok(choice) => choice,
                    Err(err) => {
                        warn!("Failed to deserialize input into rematch choice: {}", err);
                        return;
                    }
                };
                self.process_rematch_choice(client, opponent, choices, player_num, choice)
            }
            End => End,
        }
    }

    fn process_color_choice(
        &mut self,
        client: &impl SendMsg,
        opponent: &impl SendMsg,
        choices: [Option<String>; 2],
        player_num: PlayerNum,
        color: String,
    ) -> ProtocolState {
        let choices = match player_num {
            PlayerNum::P1 => [Some(color), choices[1].clone()],
            PlayerNum::P2 => [choices[0].clone(), Some(color)],
        };
        match choices {
            [Some(color1), Some(color2)] => {
                let players = Players::new([
                    Player::new(color1, PlayerNum::P1),
                    Player::new(color2, PlayerNum::P2),
                ]);
                // The default board dimensions are nonzero, so this cannot fail
                let game_state = GameState::new(players, DEFAULT_HEIGHT, DEFAULT_WIDTH)
                    .expect("default board dimensions are nonzero");
                send_state_responses(&game_state, player_num, client, opponent);
                info!("Game between {:?} started", self.player_ids);
                self.game_state = Some(game_state);
                ProtocolState::InGame
            }
            incomplete => ProtocolState::Setup(incomplete),
        }
    }

    fn process_input(
        &mut self,
        client: &impl SendMsg,
        opponent: &impl SendMsg,
        player_num: PlayerNum,
        input: RawInput,
    ) -> Result<ProtocolState, InputError> {
        let game_state = self
            .game_state
            .as_mut()
            .expect("game state exists while in game");
        let validated = ValidInput::new(input, game_state, player_num)?;
        let report = game_state.apply(validated);
        info!(
            "{:?} dropped a piece into column {}, landing at row {}",
            player_num, report.column, report.row
        );
        let state = match report.phase {
            Phase::InProgress => {
                send_state_responses(game_state, player_num, client, opponent);
                ProtocolState::InGame
            }
            Phase::Won(winner) => {
                info!("{:?} won the game", winner);
                if winner == player_num {
                    send_outcomes(client, Outcome::Win, opponent, Outcome::Lose);
                } else {
                    send_outcomes(client, Outcome::Lose, opponent, Outcome::Win);
                }
                ProtocolState::Rematch([None, None])
            }
            Phase::Tied => {
                info!("The game ended in a tie");
                send_outcomes(client, Outcome::Draw, opponent, Outcome::Draw);
                ProtocolState::Rematch([None, None])
            }
        };
        Ok(state)
    }

    fn process_rematch_choice(
        &mut self,
        client: &impl SendMsg,
        opponent: &impl SendMsg,
        choices: [Option<bool>; 2],
        player_num: PlayerNum,
        choice: bool,
    ) -> ProtocolState {
        let choices = match player_num {
            PlayerNum::P1 => [Some(choice), choices[1]],
            PlayerNum::P2 => [choices[0], Some(choice)],
        };
        match choices {
            [Some(true), Some(true)] => {
                // The old session is replaced wholesale; only the colors carry over
                let players = {
                    let game_state = self
                        .game_state
                        .as_ref()
                        .expect("game state exists after a finished game");
                    Players::new([
                        game_state.player(PlayerNum::P1).clone(),
                        game_state.player(PlayerNum::P2).clone(),
                    ])
                };
                let game_state = GameState::new(players, DEFAULT_HEIGHT, DEFAULT_WIDTH)
                    .expect("default board dimensions are nonzero");
                send_state_responses(&game_state, player_num, client, opponent);
                info!("Rematch between {:?} started", self.player_ids);
                self.game_state = Some(game_state);
                ProtocolState::InGame
            }
            // Let ws module handle removing the game
            [_, Some(false)] | [Some(false), _] => ProtocolState::End,
            incomplete => ProtocolState::Rematch(incomplete),
        }
    }
}

fn send_state_responses(
    game_state: &GameState,
    player_num: PlayerNum,
    client: &impl SendMsg,
    opponent: &impl SendMsg,
) {
    let client_msg = Response::GameState {
        board: game_state.board().clone(),
        player: game_state.player(player_num).clone(),
        current_player: game_state.current_player(),
    };
    let opponent_msg = Response::GameState {
        board: game_state.board().clone(),
        player: game_state.player(player_num.other()).clone(),
        current_player: game_state.current_player(),
    };
    send_messages(client, client_msg, opponent, opponent_msg);
}

fn send_outcomes(
    client: &impl SendMsg,
    client_outcome: Outcome,
    opponent: &impl SendMsg,
    opponent_outcome: Outcome,
) {
    let client_msg = Response::GameEnd {
        outcome: client_outcome,
    };
    let opponent_msg = Response::GameEnd {
        outcome: opponent_outcome,
    };
    send_messages(client, client_msg, opponent, opponent_msg);
}

fn send_message<M: Serialize>(client: &impl SendMsg, message: M) {
    // If the message fails to send even after retries, there's not much we can do but proceed
    let _ = util::retry(1, || client.send(&serde_json::to_string(&message).unwrap()));
}

fn send_messages<M1: Serialize, M2: Serialize>(
    client1: &impl SendMsg,
    message1: M1,
    client2: &impl SendMsg,
    message2: M2,
) {
    send_message(client1, message1);
    send_message(client2, message2);
}
