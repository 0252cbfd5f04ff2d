use log::info;

use crate::{
    bitplane::{PageBuffer, DISPLAY_HEIGHT, DISPLAY_WIDTH},
    game_mode::{self, GameMode, SessionOutcome},
    input::{Button, Buttons},
    physics::{self, BallEvent},
    render::{draw_object, draw_score, draw_screen},
    EngineError,
};

/// right-most column the ball may reach before a point is scored.
pub const FIELD_WIDTH: f32 = 127.0;
/// lowest row of the play field; objects bounce or stop here.
pub const FIELD_HEIGHT: f32 = 31.0;

pub const PADDLE_HEIGHT: u8 = 8;
pub const PADDLE_WIDTH: u8 = 2;
pub const PADDLE_SPEED: f32 = 0.15;
pub const PADDLE_1_X: f32 = 5.0;
pub const PADDLE_2_X: f32 = 122.0;
pub const PADDLE_START_Y: f32 = 15.0;

pub const BALL_START_X: f32 = 63.0;
pub const BALL_START_Y: f32 = 15.0;
pub const BALL_SIZE: u8 = 2;
pub const BALL_SPEED: f32 = 0.25;

/// scales how much a paddle hit away from the centre bends the ball.
pub const BASE_MODIFIER: f32 = 0.004;
/// growth of the ball's speed modifier per tick.
pub const SPEED_MODIFIER_STEP: f32 = 0.0005;

pub const SCORE_WIN: u8 = 8;

pub const TICK_HZ: u32 = 100;
/// ticks a menu waits for before reading buttons again.
pub const DELAY_TICKS: u8 = 50;
const DELAY_COUNTER_WRAP: u8 = 100;

const _CHECKS: () = {
    assert!(
        (FIELD_HEIGHT as usize) < DISPLAY_HEIGHT,
        "the bottom wall must be a row of the display"
    );
    assert!(
        (FIELD_WIDTH as usize) < DISPLAY_WIDTH,
        "the scoring edge must be a column of the display"
    );
    assert!(
        PADDLE_HEIGHT as f32 <= FIELD_HEIGHT,
        "paddles must have room to travel"
    );
    assert!(
        PADDLE_2_X as usize + PADDLE_WIDTH as usize <= DISPLAY_WIDTH,
        "the right paddle does not fit the display"
    );
    assert!(
        SCORE_WIN <= 9,
        "the score overlay only has room for a single digit per player"
    );
    assert!(DELAY_TICKS <= DELAY_COUNTER_WRAP);
};

#[derive(Clone, Debug)]
pub struct GameObject {
    pub x: f32,
    pub y: f32,
    pub v_x: f32,
    pub v_y: f32,
    pub width: u8,
    pub height: u8,
    pub score: u8,
    layer: PageBuffer,
}

impl GameObject {
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            v_x: 0.0,
            v_y: 0.0,
            width,
            height,
            score: 0,
            layer: PageBuffer::blank(),
        }
    }

    pub fn paddle() -> Self {
        Self::new(PADDLE_WIDTH, PADDLE_HEIGHT)
    }

    pub fn ball() -> Self {
        Self::new(BALL_SIZE, BALL_SIZE)
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn moving(mut self, v_x: f32, v_y: f32) -> Self {
        self.v_x = v_x;
        self.v_y = v_y;
        self
    }

    /// vertical centre, using the integer half of the height.
    pub fn mid_y(&self) -> f32 {
        self.y + (self.height / 2) as f32
    }

    /// advances the position by one unscaled velocity step.
    pub fn step(&mut self) {
        self.x += self.v_x;
        self.y += self.v_y;
    }

    pub fn layer(&self) -> &PageBuffer {
        &self.layer
    }

    pub(crate) fn layer_mut(&mut self) -> &mut PageBuffer {
        &mut self.layer
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// per-rally ball tempo: the speed modifier grows every tick and is reset whenever a point is
/// scored, at which point the serve direction also alternates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rally {
    pub speed_modifier: f32,
    pub serve: Direction,
}

impl Rally {
    pub fn new() -> Self {
        Self {
            speed_modifier: 1.0,
            serve: Direction::Right,
        }
    }

    pub fn accelerate(&mut self) {
        self.speed_modifier += SPEED_MODIFIER_STEP;
    }
}

impl Default for Rally {
    fn default() -> Self {
        Self::new()
    }
}

/// counts ticks for the menus' input delay. wraps back to 0 once it passes 100.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DelayCounter(u8);

impl DelayCounter {
    pub fn advance(&mut self) {
        self.0 += 1;
        if self.0 > DELAY_COUNTER_WRAP {
            self.0 = 0;
        }
    }

    pub fn restart(&mut self) {
        self.0 = 0;
    }

    pub fn count(self) -> u8 {
        self.0
    }
}

/// everything the game loop and the tick share: the three objects, the score layer, the
/// composited frame and the session bookkeeping.
pub struct GameState {
    pub p1: GameObject,
    pub p2: GameObject,
    pub ball: GameObject,
    pub rally: Rally,
    buttons: Buttons,
    delay: DelayCounter,
    score: PageBuffer,
    frame: PageBuffer,
    session: Option<GameMode>,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            p1: GameObject::paddle(),
            p2: GameObject::paddle(),
            ball: GameObject::ball(),
            rally: Rally::new(),
            buttons: Buttons::NONE,
            delay: DelayCounter::default(),
            score: PageBuffer::blank(),
            frame: PageBuffer::blank(),
            session: None,
        }
    }

    /// the fixed-rate tick. stores the button snapshot, advances the delay counter and the
    /// ball's speed modifier, and returns whether the frame should be pushed to the display.
    pub fn tick(&mut self, buttons: Buttons) -> bool {
        self.delay.advance();
        self.rally.accelerate();
        self.buttons = buttons;
        self.in_game()
    }

    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    pub fn restart_delay(&mut self) {
        self.delay.restart();
    }

    pub fn delay_elapsed(&self) -> bool {
        self.delay.count() == DELAY_TICKS
    }

    pub fn in_game(&self) -> bool {
        self.session.is_some()
    }

    pub fn start_session(&mut self, mode: GameMode) -> Result<(), EngineError> {
        self.p1 = GameObject::paddle().at(PADDLE_1_X, PADDLE_START_Y);
        draw_object(&mut self.p1)?;
        self.p2 = GameObject::paddle().at(PADDLE_2_X, PADDLE_START_Y);
        draw_object(&mut self.p2)?;
        self.ball = GameObject::ball()
            .at(BALL_START_X, BALL_START_Y)
            .moving(BALL_SPEED / 2.0, BALL_SPEED / 2.0);
        draw_object(&mut self.ball)?;
        self.rally.speed_modifier = 1.0;
        draw_score(&mut self.score, self.p1.score, self.p2.score);
        self.draw_screen();
        self.session = Some(mode);
        info!("session started: {mode}");
        Ok(())
    }

    /// leaves the session without a winner.
    pub fn abandon_session(&mut self) {
        if let Some(mode) = self.session.take() {
            info!("session abandoned: {mode}");
        }
    }

    /// one iteration of the game loop. returns the outcome once a player reaches
    /// [`SCORE_WIN`], after which the session is no longer active.
    pub fn step(&mut self) -> Result<Option<SessionOutcome>, EngineError> {
        let Some(mode) = self.session else {
            return Ok(None);
        };
        let event =
            physics::move_ball(&mut self.ball, &mut self.p1, &mut self.p2, &mut self.rally)?;
        physics::move_paddle(&mut self.p1)?;
        physics::move_paddle(&mut self.p2)?;
        // the digits only change on a point.
        if let BallEvent::Scored(_) = event {
            draw_score(&mut self.score, self.p1.score, self.p2.score);
        }

        self.p1.v_y = game_mode::player_velocity(self.buttons, Button::Btn4, Button::Btn3);
        self.p2.v_y = match mode {
            GameMode::Multi => game_mode::player_velocity(self.buttons, Button::Btn2, Button::Btn1),
            GameMode::Single(difficulty) => {
                game_mode::ai_velocity(&self.ball, &self.p2, difficulty.ai_speed())
            }
        };

        self.draw_screen();

        let outcome = mode.outcome(self.p1.score, self.p2.score);
        if let Some(outcome) = &outcome {
            self.session = None;
            info!(
                "session over: {} won {}-{}",
                outcome.winner, self.p1.score, self.p2.score
            );
        }
        Ok(outcome)
    }

    pub fn draw_screen(&mut self) {
        draw_screen(
            &mut self.frame,
            self.p1.layer(),
            self.p2.layer(),
            self.ball.layer(),
            &self.score,
        );
    }

    pub fn frame(&self) -> &PageBuffer {
        &self.frame
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
