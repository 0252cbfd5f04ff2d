use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use engine::input::{Button, Buttons};

/// what a key press means to the game loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyInput {
    Press(Button),
    /// leave the running session for the main menu.
    Back,
    Quit,
}

impl KeyInput {
    /// maps a terminal key event onto the board's buttons.
    ///
    /// `1`-`4` are the buttons themselves. player 1 also has `w`/`s` (BTN4/BTN3) and player 2
    /// the arrow keys (BTN2/BTN1).
    pub fn from_event(event: KeyEvent) -> Option<Self> {
        if event.kind == KeyEventKind::Release {
            return None;
        }
        if event.modifiers == KeyModifiers::CONTROL && event.code == KeyCode::Char('c') {
            return Some(KeyInput::Quit);
        }
        if event.modifiers != KeyModifiers::NONE && event.modifiers != KeyModifiers::SHIFT {
            return None;
        }
        let button = match event.code {
            KeyCode::Char('1') | KeyCode::Down => Button::Btn1,
            KeyCode::Char('2') | KeyCode::Up => Button::Btn2,
            KeyCode::Char('3') | KeyCode::Char('s') | KeyCode::Char('S') => Button::Btn3,
            KeyCode::Char('4') | KeyCode::Char('w') | KeyCode::Char('W') => Button::Btn4,
            KeyCode::Esc => return Some(KeyInput::Back),
            KeyCode::Char('q') => return Some(KeyInput::Quit),
            _ => return None,
        };
        Some(KeyInput::Press(button))
    }
}

/// turns key presses into held buttons.
///
/// terminals only report presses (and auto-repeats), so a button stays down for `hold_ticks`
/// ticks after its last press.
pub struct KeyLatch {
    hold_ticks: u32,
    remaining: [u32; Button::ALL.len()],
}

impl KeyLatch {
    pub fn new(hold_ticks: u32) -> Self {
        Self {
            hold_ticks,
            remaining: [0; Button::ALL.len()],
        }
    }

    pub fn press(&mut self, button: Button) {
        if let Some(i) = Button::ALL.iter().position(|b| *b == button) {
            self.remaining[i] = self.hold_ticks;
        }
    }

    /// the snapshot for this tick. every held button then loses one tick.
    pub fn tick(&mut self) -> Buttons {
        let mut buttons = Buttons::NONE;
        for (button, remaining) in Button::ALL.iter().zip(self.remaining.iter_mut()) {
            if *remaining > 0 {
                buttons = buttons.with(*button);
                *remaining -= 1;
            }
        }
        buttons
    }

    pub fn release_all(&mut self) {
        self.remaining = [0; Button::ALL.len()];
    }
}
