use std::io::{self, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::Print,
    terminal::{self, disable_raw_mode, enable_raw_mode},
};
use engine::bitplane::{PageBuffer, DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// terminal rows needed for one frame, border included. two pixel rows share a character cell.
pub const FRAME_ROWS: usize = DISPLAY_HEIGHT / 2 + 2;

/// renders a frame as lines of half-block characters inside a box.
pub fn frame_rows(frame: &PageBuffer) -> Vec<String> {
    let mut rows = Vec::with_capacity(FRAME_ROWS);
    rows.push(format!("┌{}┐", "─".repeat(DISPLAY_WIDTH)));
    for y in (0..DISPLAY_HEIGHT).step_by(2) {
        let mut row = String::with_capacity(DISPLAY_WIDTH * 3 + 6);
        row.push('│');
        for x in 0..DISPLAY_WIDTH {
            row.push(match (frame.is_on(x, y), frame.is_on(x, y + 1)) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            });
        }
        row.push('│');
        rows.push(row);
    }
    rows.push(format!("└{}┘", "─".repeat(DISPLAY_WIDTH)));
    rows
}

/// the terminal standing in for the display. frames identical to the last one are skipped.
pub struct Screen<W: Write> {
    out: W,
    last: Option<PageBuffer>,
}

impl<W: Write> Screen<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn draw(&mut self, frame: &PageBuffer) -> io::Result<()> {
        if self.last.as_ref() == Some(frame) {
            return Ok(());
        }
        for (i, row) in frame_rows(frame).into_iter().enumerate() {
            queue!(self.out, MoveTo(0, i as u16), Print(row))?;
        }
        self.out.flush()?;
        self.last = Some(frame.clone());
        Ok(())
    }
}

pub fn enter(out: &mut impl Write) -> io::Result<()> {
    enable_raw_mode()?;
    execute!(
        out,
        terminal::EnterAlternateScreen,
        terminal::Clear(terminal::ClearType::All),
        cursor::Hide,
        cursor::MoveTo(0, 0)
    )
}

pub fn leave(out: &mut impl Write) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(out, terminal::LeaveAlternateScreen, cursor::Show)
}

#[cfg(test)]
mod tests {
    use engine::{
        bitplane::{PageBuffer, DISPLAY_WIDTH},
        render::draw_text,
    };
    use pretty_assertions::assert_eq;

    use super::{frame_rows, Screen, FRAME_ROWS};

    #[test]
    fn blank_frame() {
        let rows = frame_rows(&PageBuffer::blank());
        assert_eq!(rows.len(), FRAME_ROWS);
        for row in &rows {
            assert_eq!(row.chars().count(), DISPLAY_WIDTH + 2);
        }
        assert_eq!(rows[1], format!("│{}│", " ".repeat(DISPLAY_WIDTH)));
    }

    #[test]
    fn half_blocks() {
        let mut frame = PageBuffer::blank();
        frame.light(0, 0);
        frame.light(1, 1);
        frame.light(2, 0);
        frame.light(2, 1);
        frame.light(127, 31);
        let rows = frame_rows(&frame);
        assert!(rows[1].starts_with("│▀▄█ "));
        assert!(rows[16].ends_with("▄│"));
    }

    #[test]
    fn identical_frames_are_written_once() {
        let mut out = Vec::new();
        let mut screen = Screen::new(&mut out);
        let text = draw_text(&["PONG"]);
        screen.draw(&text).unwrap();
        screen.draw(&text).unwrap();
        let written = out.len();
        assert!(written > 0);

        let mut out = Vec::new();
        let mut screen = Screen::new(&mut out);
        screen.draw(&text).unwrap();
        assert_eq!(out.len(), written);
    }
}
