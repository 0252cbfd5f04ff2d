use std::fmt::Display;

use thiserror::Error;

pub mod bitplane;
pub mod font;
pub mod game_mode;
pub mod game_state;
pub mod high_score;
pub mod input;
pub mod physics;
pub mod render;

use bitplane::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use high_score::NUM_HIGH_SCORES;
use physics::MAX_CORRECTION_STEPS;

#[derive(Debug, Error)]
#[cfg_attr(test, derive(PartialEq))]
pub enum EngineError {
    #[error(
        "{width}x{height} object at ({x}, {y}) does not fit the {w}x{h} display",
        w = DISPLAY_WIDTH,
        h = DISPLAY_HEIGHT
    )]
    OutOfBounds {
        x: f32,
        y: f32,
        width: u8,
        height: u8,
    },
    #[error("{correction} correction did not settle within {max} steps", max = MAX_CORRECTION_STEPS)]
    CorrectionDiverged { correction: Correction },
    #[error("high-score table is full ({max} entries)", max = NUM_HIGH_SCORES)]
    HighScoreTableFull,
    #[error("invalid initial {0:?}, expected A-Z")]
    InvalidInitial(char),
}

/// the walk-forward loops that push the ball out of whatever it collided with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Correction {
    Wall,
    Paddle,
}

impl Display for Correction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Correction::Wall => Display::fmt("wall", f),
            Correction::Paddle => Display::fmt("paddle", f),
        }
    }
}

#[cfg(test)]
#[macro_export]
macro_rules! assert_lit {
    ($buffer:expr, $x:expr, $y:expr $(,)?) => {
        assert!(
            $buffer.is_on($x, $y),
            "expected pixel ({}, {}) to be lit",
            $x,
            $y
        )
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! assert_unlit {
    ($buffer:expr, $x:expr, $y:expr $(,)?) => {
        assert!(
            !$buffer.is_on($x, $y),
            "expected pixel ({}, {}) to be dark",
            $x,
            $y
        )
    };
}

/// asserts that exactly the pixels inside the rectangle are lit.
#[cfg(test)]
#[macro_export]
macro_rules! assert_lit_rect {
    ($buffer:expr, $x:expr, $y:expr, $width:expr, $height:expr $(,)?) => {
        for px in 0..$crate::bitplane::DISPLAY_WIDTH {
            for py in 0..$crate::bitplane::DISPLAY_HEIGHT {
                if ($x..$x + $width).contains(&px) && ($y..$y + $height).contains(&py) {
                    $crate::assert_lit!($buffer, px, py);
                } else {
                    $crate::assert_unlit!($buffer, px, py);
                }
            }
        }
    };
}
