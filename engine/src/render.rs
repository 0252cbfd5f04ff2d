use crate::{
    bitplane::{PageBuffer, DISPLAY_HEIGHT, DISPLAY_WIDTH, PAGE_COUNT},
    font::glyph,
    game_state::GameObject,
    EngineError,
};

/// byte offset of player 1's score digit in the top page.
pub const SCORE_1_OFFSET: usize = 50;
/// byte offset of player 2's score digit in the top page.
pub const SCORE_2_OFFSET: usize = 76;

pub const TEXT_COLUMNS: usize = DISPLAY_WIDTH / GLYPH_WIDTH;
pub const TEXT_LINES: usize = PAGE_COUNT;
const GLYPH_WIDTH: usize = 8;

/// redraws the object's own layer as a filled rectangle at its current position, truncating the
/// position to whole pixels. nothing is written when the rectangle would leave the display.
///
/// the frame is not recomposited here; callers composite once all objects of a step are drawn.
pub fn draw_object(object: &mut GameObject) -> Result<(), EngineError> {
    let out_of_bounds = EngineError::OutOfBounds {
        x: object.x,
        y: object.y,
        width: object.width,
        height: object.height,
    };
    // truncation toward zero matches how the layout addresses fractional positions, so a
    // position in (-1, 0) still lands on row or column 0.
    let (x, y) = (object.x.trunc(), object.y.trunc());
    if x < 0.0 || y < 0.0 {
        return Err(out_of_bounds);
    }
    let (x, y) = (x as usize, y as usize);
    let (width, height) = (object.width as usize, object.height as usize);
    if x + width > DISPLAY_WIDTH || y + height > DISPLAY_HEIGHT {
        return Err(out_of_bounds);
    }
    let layer = object.layer_mut();
    layer.clear();
    for column in 0..width {
        for row in 0..height {
            layer.light(x + column, y + row);
        }
    }
    Ok(())
}

/// composites the object layers and the score overlay into `frame`.
pub fn draw_screen(
    frame: &mut PageBuffer,
    p1: &PageBuffer,
    p2: &PageBuffer,
    ball: &PageBuffer,
    score: &PageBuffer,
) {
    *frame = p1.clone();
    frame.and_assign(p2);
    frame.and_assign(ball);
    frame.and_assign(score);
}

/// draws both players' single-digit scores into the top page of the score layer.
pub fn draw_score(score: &mut PageBuffer, s1: u8, s2: u8) {
    debug_assert!(s1 <= 9 && s2 <= 9, "scores {s1} and {s2} need more than one digit");
    score.clear();
    draw_glyph(score, 0, SCORE_1_OFFSET, b'0' + s1);
    draw_glyph(score, 0, SCORE_2_OFFSET, b'0' + s2);
}

/// renders up to four lines of up to 16 characters, one line per page, as an active-low frame.
/// longer lines are cut off.
pub fn draw_text(lines: &[&str]) -> PageBuffer {
    let mut text = PageBuffer::blank();
    for (page, line) in lines.iter().take(TEXT_LINES).enumerate() {
        for (cell, c) in line.bytes().take(TEXT_COLUMNS).enumerate() {
            draw_glyph(&mut text, page, cell * GLYPH_WIDTH, c);
        }
    }
    text
}

fn draw_glyph(layer: &mut PageBuffer, page: usize, offset: usize, c: u8) {
    for (i, column) in glyph(c).iter().enumerate() {
        layer.set_column(page, offset + i, !column);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{draw_object, draw_score, draw_screen, draw_text, SCORE_1_OFFSET, SCORE_2_OFFSET};
    use crate::{
        assert_lit, assert_lit_rect, assert_unlit,
        bitplane::{PageBuffer, ALL_OFF, DISPLAY_WIDTH},
        font::glyph,
        game_state::GameObject,
        EngineError,
    };

    fn composite(objects: [&GameObject; 3], score: &PageBuffer) -> PageBuffer {
        let mut frame = PageBuffer::blank();
        draw_screen(
            &mut frame,
            objects[0].layer(),
            objects[1].layer(),
            objects[2].layer(),
            score,
        );
        frame
    }

    #[test]
    fn rectangle_is_exact() {
        let mut paddle = GameObject::paddle().at(5.0, 15.0);
        draw_object(&mut paddle).unwrap();
        assert_lit_rect!(paddle.layer(), 5, 15, 2, 8);
        // the paddle straddles pages 1 and 2.
        assert_eq!(paddle.layer().as_bytes()[DISPLAY_WIDTH + 5], 0b0111_1111);
        assert_eq!(paddle.layer().as_bytes()[2 * DISPLAY_WIDTH + 5], 0b1000_0000);
    }

    #[test]
    fn rectangle_survives_compositing() {
        let mut ball = GameObject::ball().at(63.7, 15.2);
        draw_object(&mut ball).unwrap();
        let empty = GameObject::paddle();
        let frame = composite([&empty, &empty, &ball], &PageBuffer::blank());
        // fractional positions are truncated.
        assert_lit_rect!(frame, 63, 15, 2, 2);
    }

    #[test]
    fn redraw_erases_previous_position() {
        let mut ball = GameObject::ball().at(10.0, 10.0);
        draw_object(&mut ball).unwrap();
        ball.x = 20.0;
        draw_object(&mut ball).unwrap();
        assert_lit_rect!(ball.layer(), 20, 10, 2, 2);
    }

    #[test]
    fn corners_fit() {
        let mut ball = GameObject::ball().at(0.0, 0.0);
        draw_object(&mut ball).unwrap();
        assert_lit_rect!(ball.layer(), 0, 0, 2, 2);
        let mut ball = GameObject::ball().at(126.0, 30.0);
        draw_object(&mut ball).unwrap();
        assert_lit_rect!(ball.layer(), 126, 30, 2, 2);
    }

    #[test]
    fn out_of_bounds() {
        let mut ball = GameObject::ball().at(126.5, 4.0);
        draw_object(&mut ball).unwrap();
        ball.x = 127.0;
        assert_eq!(
            draw_object(&mut ball),
            Err(EngineError::OutOfBounds {
                x: 127.0,
                y: 4.0,
                width: 2,
                height: 2,
            })
        );
        // the previous drawing is kept.
        assert_lit_rect!(ball.layer(), 126, 4, 2, 2);
        ball.x = 3.0;
        ball.y = -1.5;
        assert!(draw_object(&mut ball).is_err());
        ball.y = 31.0;
        assert!(draw_object(&mut ball).is_err());
    }

    #[test]
    fn layers_do_not_blank_each_other() {
        let mut p1 = GameObject::paddle().at(5.0, 0.0);
        let mut p2 = GameObject::paddle().at(122.0, 23.0);
        let mut ball = GameObject::ball().at(64.0, 16.0);
        for object in [&mut p1, &mut p2, &mut ball] {
            draw_object(object).unwrap();
        }
        let frame = composite([&p1, &p2, &ball], &PageBuffer::blank());
        assert_lit!(frame, 5, 0);
        assert_lit!(frame, 123, 30);
        assert_lit!(frame, 65, 17);
        assert_unlit!(frame, 64, 18);
        assert_eq!(frame.lit_count(), 16 + 16 + 4);
    }

    #[test]
    fn compositing_is_idempotent() {
        let mut p1 = GameObject::paddle().at(5.0, 3.0);
        let mut p2 = GameObject::paddle().at(122.0, 9.0);
        let mut ball = GameObject::ball().at(40.0, 20.0);
        for object in [&mut p1, &mut p2, &mut ball] {
            draw_object(object).unwrap();
        }
        let mut score = PageBuffer::blank();
        draw_score(&mut score, 3, 7);
        let mut frame = PageBuffer::blank();
        draw_screen(&mut frame, p1.layer(), p2.layer(), ball.layer(), &score);
        let first = frame.clone();
        draw_screen(&mut frame, p1.layer(), p2.layer(), ball.layer(), &score);
        assert_eq!(frame, first);
    }

    #[test]
    fn score_overlay() {
        let mut score = PageBuffer::blank();
        score.light(0, 20);
        draw_score(&mut score, 1, 8);
        let bytes = score.as_bytes();
        for i in 0..8 {
            assert_eq!(bytes[SCORE_1_OFFSET + i], !glyph(b'1')[i]);
            assert_eq!(bytes[SCORE_2_OFFSET + i], !glyph(b'8')[i]);
        }
        // the previous contents are cleared and nothing else is drawn.
        assert_unlit!(score, 0, 20);
        assert!(bytes[..SCORE_1_OFFSET].iter().all(|byte| *byte == ALL_OFF));
        assert!(bytes[SCORE_1_OFFSET + 8..SCORE_2_OFFSET]
            .iter()
            .all(|byte| *byte == ALL_OFF));
        assert!(bytes[SCORE_2_OFFSET + 8..].iter().all(|byte| *byte == ALL_OFF));
    }

    #[test]
    fn text_lines_map_to_pages() {
        let text = draw_text(&["PONG", "", "", "3 Return"]);
        let bytes = text.as_bytes();
        for i in 0..8 {
            assert_eq!(bytes[i], !glyph(b'P')[i]);
            assert_eq!(bytes[3 * 8 + i], !glyph(b'G')[i]);
            assert_eq!(bytes[3 * DISPLAY_WIDTH + 2 * 8 + i], !glyph(b'R')[i]);
        }
        assert!(bytes[DISPLAY_WIDTH..2 * DISPLAY_WIDTH]
            .iter()
            .all(|byte| *byte == ALL_OFF));
    }

    #[test]
    fn text_is_clipped() {
        let long = "abcdefghijklmnopqrstuvwxyz";
        let text = draw_text(&[long, long, long, long, long]);
        assert_eq!(text, draw_text(&[&long[..16]; 4]));
    }
}
