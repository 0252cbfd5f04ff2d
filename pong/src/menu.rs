use engine::{
    bitplane::PageBuffer,
    game_mode::{Difficulty, GameMode, SessionOutcome},
    game_state::GameState,
    high_score::{HighScoreTable, Initials, TOP_SHOWN},
    input::{Button, Buttons},
    render::draw_text,
    EngineError,
};
use tracing::{info, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Window {
    Main,
    Difficulty,
    Playing,
    HighScores,
    Initials(InitialsEntry),
}

/// the initials prompt shown after a recorded win. one letter is selected at a time and up to
/// three are accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitialsEntry {
    letter: u8,
    entered: Vec<u8>,
}

impl InitialsEntry {
    pub fn new() -> Self {
        Self {
            letter: b'A',
            entered: Vec::with_capacity(3),
        }
    }

    /// applies one button snapshot. returns whether anything changed.
    fn handle(&mut self, buttons: Buttons) -> bool {
        if buttons.contains(Button::Btn3) && self.letter < b'Z' {
            self.letter += 1;
        } else if buttons.contains(Button::Btn4) && self.letter > b'A' {
            self.letter -= 1;
        } else if buttons.contains(Button::Btn2) && self.entered.len() < 3 {
            self.entered.push(self.letter);
        } else if buttons.contains(Button::Btn1) && !self.entered.is_empty() {
            self.entered.pop();
        } else {
            return false;
        }
        true
    }

    fn complete(&self) -> Option<Initials> {
        let initials: [u8; 3] = self.entered.as_slice().try_into().ok()?;
        Initials::new(initials).ok()
    }

    fn prompt(&self) -> String {
        let entered = String::from_utf8_lossy(&self.entered);
        format!("4<{}>3  {entered}", self.letter as char)
    }
}

impl Default for InitialsEntry {
    fn default() -> Self {
        Self::new()
    }
}

/// the window state machine around the game. menus only read buttons once the delay has
/// elapsed after entering a window or acting on a press.
pub struct Menu {
    window: Window,
    waiting: bool,
    high_scores: HighScoreTable,
}

impl Menu {
    pub fn new(state: &mut GameState) -> Self {
        let mut menu = Self {
            window: Window::Main,
            waiting: false,
            high_scores: HighScoreTable::new(),
        };
        menu.wait(state);
        menu
    }

    /// skips the menus and starts a session straight away.
    pub fn start(mode: GameMode, state: &mut GameState) -> Result<Self, EngineError> {
        let mut menu = Self::new(state);
        menu.play(mode, state)?;
        Ok(menu)
    }

    #[cfg(test)]
    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn high_scores(&self) -> &HighScoreTable {
        &self.high_scores
    }

    /// runs the current window against this tick's buttons.
    pub fn update(&mut self, state: &mut GameState) -> Result<(), EngineError> {
        if self.waiting {
            if !state.delay_elapsed() {
                return Ok(());
            }
            self.waiting = false;
        }
        let buttons = state.buttons();
        match &mut self.window {
            Window::Main => {
                if buttons.contains(Button::Btn4) {
                    self.enter(Window::Difficulty, state);
                } else if buttons.contains(Button::Btn3) {
                    self.play(GameMode::Multi, state)?;
                } else if buttons.contains(Button::Btn2) {
                    self.enter(Window::HighScores, state);
                }
            }
            Window::Difficulty => {
                if buttons.contains(Button::Btn1) {
                    self.play(GameMode::Single(Difficulty::Easy), state)?;
                } else if buttons.contains(Button::Btn2) {
                    self.play(GameMode::Single(Difficulty::Hard), state)?;
                } else if buttons.contains(Button::Btn3) {
                    self.enter(Window::Main, state);
                }
            }
            Window::HighScores => {
                if buttons.contains(Button::Btn3) {
                    self.enter(Window::Main, state);
                }
            }
            Window::Initials(entry) => {
                if entry.handle(buttons) {
                    if let Some(initials) = entry.complete() {
                        self.record(initials);
                        self.enter(Window::Main, state);
                    } else {
                        self.wait(state);
                    }
                }
            }
            Window::Playing => {}
        }
        Ok(())
    }

    pub fn session_over(&mut self, outcome: SessionOutcome, state: &mut GameState) {
        if outcome.record_high_score {
            self.enter(Window::Initials(InitialsEntry::new()), state);
        } else {
            self.enter(Window::Main, state);
        }
    }

    /// leaves a running session without recording anything.
    pub fn back(&mut self, state: &mut GameState) {
        if self.window == Window::Playing {
            state.abandon_session();
            self.enter(Window::Main, state);
        }
    }

    /// the text frame for the current window. blank while playing.
    pub fn screen(&self) -> PageBuffer {
        match &self.window {
            Window::Main => draw_text(&["PONG", "4 Single-player", "3 Multiplayer", "2 High-score"]),
            Window::Difficulty => draw_text(&["DIFFICULTY", "1 Easy", "2 Hard", "3 Return"]),
            Window::HighScores => {
                let mut lines: Vec<String> = self
                    .high_scores
                    .top(TOP_SHOWN)
                    .iter()
                    .map(|entry| entry.format_entry())
                    .collect();
                lines.resize(TOP_SHOWN, String::new());
                lines.push("3 Return".to_owned());
                let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
                draw_text(&lines)
            }
            Window::Initials(entry) => {
                let prompt = entry.prompt();
                draw_text(&["Enter 3 initials", "to save score", "", prompt.as_str()])
            }
            Window::Playing => PageBuffer::blank(),
        }
    }

    fn play(&mut self, mode: GameMode, state: &mut GameState) -> Result<(), EngineError> {
        state.start_session(mode)?;
        self.window = Window::Playing;
        self.waiting = false;
        Ok(())
    }

    fn record(&mut self, initials: Initials) {
        match self.high_scores.record_win(initials) {
            Ok(score) => info!(%initials, score, "high score recorded"),
            Err(err) => warn!("dropping win for {initials}: {err}"),
        }
    }

    fn enter(&mut self, window: Window, state: &mut GameState) {
        self.window = window;
        self.wait(state);
    }

    fn wait(&mut self, state: &mut GameState) {
        state.restart_delay();
        self.waiting = true;
    }
}
