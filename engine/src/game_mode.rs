use std::fmt::Display;

use crate::{
    game_state::{GameObject, PADDLE_SPEED, SCORE_WIN},
    input::{Button, Buttons},
};

pub const EASY_SPEED: f32 = 0.085;
pub const HARD_SPEED: f32 = 0.12;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Hard,
}

impl Difficulty {
    pub fn ai_speed(self) -> f32 {
        match self {
            Difficulty::Easy => EASY_SPEED,
            Difficulty::Hard => HARD_SPEED,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameMode {
    /// player 1 against the computer, which drives paddle 2.
    Single(Difficulty),
    Multi,
}

impl GameMode {
    /// decides whether the session is over for the given scores.
    pub fn outcome(self, p1_score: u8, p2_score: u8) -> Option<SessionOutcome> {
        let winner = if p1_score >= SCORE_WIN {
            Player::One
        } else if p2_score >= SCORE_WIN {
            Player::Two
        } else {
            return None;
        };
        // only a human beating the computer makes it onto the table in single-player.
        let record_high_score = match self {
            GameMode::Multi => true,
            GameMode::Single(_) => winner == Player::One,
        };
        Some(SessionOutcome {
            winner,
            record_high_score,
        })
    }
}

impl Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameMode::Single(Difficulty::Easy) => Display::fmt("single-player (easy)", f),
            GameMode::Single(Difficulty::Hard) => Display::fmt("single-player (hard)", f),
            GameMode::Multi => Display::fmt("multiplayer", f),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Player {
    One,
    Two,
}

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::One => Display::fmt("player 1", f),
            Player::Two => Display::fmt("player 2", f),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionOutcome {
    pub winner: Player,
    pub record_high_score: bool,
}

/// paddle velocity for a human player. `up` wins when both buttons are held.
pub fn player_velocity(buttons: Buttons, up: Button, down: Button) -> f32 {
    if buttons.contains(up) {
        -PADDLE_SPEED
    } else if buttons.contains(down) {
        PADDLE_SPEED
    } else {
        0.0
    }
}

/// paddle velocity for the computer player: head towards the ball's row.
pub fn ai_velocity(ball: &GameObject, paddle: &GameObject, speed: f32) -> f32 {
    let target = paddle.mid_y();
    if ball.y < target {
        -speed
    } else if ball.y > target {
        speed
    } else {
        0.0
    }
}
