//! the four push buttons of the board, sampled once per tick.
//!
//! BTN1 is bit 0 and BTN4 is bit 3 of the bitmask.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Button {
    Btn1 = 0b0001,
    Btn2 = 0b0010,
    Btn3 = 0b0100,
    Btn4 = 0b1000,
}

impl Button {
    pub const ALL: [Button; 4] = [Button::Btn1, Button::Btn2, Button::Btn3, Button::Btn4];
}

/// snapshot of pressed buttons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Buttons(u8);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);

    pub fn contains(self, button: Button) -> bool {
        self.0 & button as u8 != 0
    }

    pub fn with(self, button: Button) -> Self {
        Self(self.0 | button as u8)
    }
}

impl From<Button> for Buttons {
    fn from(button: Button) -> Self {
        Self(button as u8)
    }
}
