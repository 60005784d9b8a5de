use serde::{Deserialize, Serialize};
use std::ops::Index;

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayerNum {
    P1,
    P2,
}

impl PlayerNum {
    pub fn other(self) -> PlayerNum {
        match self {
            PlayerNum::P1 => PlayerNum::P2,
            PlayerNum::P2 => PlayerNum::P1,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Player {
    color: String,
    num: PlayerNum,
}

impl Player {
    pub fn new(color: String, num: PlayerNum) -> Self {
        Player { color, num }
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn num(&self) -> PlayerNum {
        self.num
    }
}

#[derive(Clone, Debug)]
pub struct Players([Player; 2]);

impl Index<PlayerNum> for Players {
    type Output = Player;
    fn index(&self, index: PlayerNum) -> &Self::Output {
        match index {
            PlayerNum::P1 => &self.0[0],
            PlayerNum::P2 => &self.0[1],
        }
    }
}

impl Players {
    pub fn new(players: [Player; 2]) -> Self {
        Players(players)
    }
}
