use log::{debug, warn};

use crate::{
    game_mode::Player,
    game_state::{
        GameObject, Rally, BALL_SPEED, BALL_START_X, BALL_START_Y, BASE_MODIFIER, FIELD_HEIGHT,
        FIELD_WIDTH,
    },
    render::draw_object,
    Correction, EngineError,
};

/// upper bound on walk-forward steps after a collision. at the slowest velocities the game
/// produces the ball leaves a wall or paddle in well under a hundred steps.
pub const MAX_CORRECTION_STEPS: u32 = 4096;

/// how close to a paddle's top or bottom edge a hit counts as clipping the edge.
pub const EDGE_TOLERANCE: f32 = 0.2;
/// extra vertical speed for a ball that clips a paddle's edge.
pub const EDGE_BOOST: f32 = 1.02;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BallEvent {
    InPlay,
    Bounced(Player),
    Scored(Player),
}

/// moves a paddle by its velocity, unless that would take it past the top or bottom of the
/// field, then redraws it.
pub fn move_paddle(paddle: &mut GameObject) -> Result<(), EngineError> {
    let y = paddle.y + paddle.v_y;
    if y >= 0.0 && y <= FIELD_HEIGHT - paddle.height as f32 {
        paddle.y = y;
    }
    draw_object(paddle)
}

/// whether any cell of `o1` lies within the bounds of `o2`. every bound is inclusive, so the
/// column just past `o2`'s right edge and the row just past its bottom edge still count.
pub fn in_object(o1: &GameObject, o2: &GameObject) -> bool {
    (0..o1.width).any(|i| {
        let x = o1.x + i as f32;
        (0..o1.height).any(|j| {
            let y = o1.y + j as f32;
            x >= o2.x
                && x <= o2.x + o2.width as f32
                && y <= o2.y + o2.height as f32
                && y >= o2.y
        })
    })
}

/// advances the ball one step, resolving walls, scoring edges and paddles, then redraws it.
pub fn move_ball(
    ball: &mut GameObject,
    p1: &mut GameObject,
    p2: &mut GameObject,
    rally: &mut Rally,
) -> Result<BallEvent, EngineError> {
    ball.x += ball.v_x * rally.speed_modifier;
    ball.y += ball.v_y * rally.speed_modifier;

    let mut event = match resolve_edges(ball, p1, p2, rally)? {
        Some(scorer) => BallEvent::Scored(scorer),
        None => BallEvent::InPlay,
    };
    if event == BallEvent::InPlay {
        let hit = if in_object(ball, p1) {
            bounce_paddle(ball, p1)?;
            Some(Player::One)
        } else if in_object(ball, p2) {
            bounce_paddle(ball, p2)?;
            Some(Player::Two)
        } else {
            None
        };
        if let Some(player) = hit {
            debug!("ball bounced off {player}'s paddle");
            // walking out of a paddle near a corner can carry the ball past a wall.
            event = match resolve_edges(ball, p1, p2, rally)? {
                Some(scorer) => BallEvent::Scored(scorer),
                None => BallEvent::Bounced(player),
            };
        }
    }

    draw_object(ball)?;
    Ok(event)
}

/// reflects the ball off the top and bottom walls and awards a point when it passes the left or
/// right edge. returns the scoring player, if any.
fn resolve_edges(
    ball: &mut GameObject,
    p1: &mut GameObject,
    p2: &mut GameObject,
    rally: &mut Rally,
) -> Result<Option<Player>, EngineError> {
    let bottom = FIELD_HEIGHT - ball.height as f32;
    let against_wall = |ball: &GameObject| ball.y <= 0.0 || ball.y >= bottom;
    if against_wall(ball) {
        reflect_off_wall(ball);
        walk_while(ball, Correction::Wall, against_wall)?;
    }

    if ball.x <= 0.0 || ball.x >= FIELD_WIDTH - ball.width as f32 {
        let scorer = if ball.x <= 0.0 {
            p2.score += 1;
            Player::Two
        } else {
            p1.score += 1;
            Player::One
        };
        debug!("point to {scorer}: {}-{}", p1.score, p2.score);
        serve(ball, rally);
        return Ok(Some(scorer));
    }
    Ok(None)
}

/// swaps the roles of the two velocity components instead of mirroring, which sends the ball
/// off the wall along the other diagonal.
fn reflect_off_wall(ball: &mut GameObject) {
    let same_sign = (ball.v_x > 0.0 && ball.v_y > 0.0) || (ball.v_x < 0.0 && ball.v_y < 0.0);
    let (v_x, v_y) = if same_sign {
        (ball.v_y, -ball.v_x)
    } else {
        (-ball.v_y, ball.v_x)
    };
    ball.v_x = v_x;
    ball.v_y = v_y;
}

/// puts the ball back at the centre, slows the rally back down and alternates the serve.
fn serve(ball: &mut GameObject, rally: &mut Rally) {
    ball.x = BALL_START_X;
    ball.y = BALL_START_Y;
    rally.serve = rally.serve.flipped();
    rally.speed_modifier = 1.0;
    let speed = rally.serve.sign() * BALL_SPEED / 2.0;
    ball.v_x = speed;
    ball.v_y = speed;
}

/// bends the ball's path depending on where along the paddle it hit, then walks it clear of the
/// paddle so the same hit can't trigger twice.
pub fn bounce_paddle(ball: &mut GameObject, paddle: &GameObject) -> Result<(), EngineError> {
    let mid_ball = ball.mid_y();
    let mid_paddle = paddle.y + paddle.height as f32 / 2.0;
    let modifier = (mid_paddle - mid_ball).abs() * BASE_MODIFIER;

    ball.v_x = -ball.v_x;
    if ball.v_x > 0.0 {
        ball.v_x -= modifier;
    } else {
        ball.v_x += modifier;
    }
    if ball.v_y < 0.0 {
        ball.v_y -= modifier;
    } else {
        ball.v_y += modifier;
    }

    let ball_bottom = ball.y + ball.height as f32;
    let paddle_bottom = paddle.y + paddle.height as f32;
    if ball_bottom > paddle.y && mid_ball < mid_paddle {
        // upper half: always leave upwards.
        if ball_bottom >= paddle.y && ball_bottom < paddle.y + EDGE_TOLERANCE {
            ball.v_y *= EDGE_BOOST;
        }
        if ball.v_y > 0.0 {
            ball.v_y = -ball.v_y;
        }
    } else if mid_ball > mid_paddle && ball.y < paddle_bottom {
        // lower half: always leave downwards.
        if ball.y <= paddle_bottom && ball.y > paddle_bottom - EDGE_TOLERANCE {
            ball.v_y *= EDGE_BOOST;
        }
        if ball.v_y < 0.0 {
            ball.v_y = -ball.v_y;
        }
    } else {
        ball.v_y = -ball.v_y;
    }

    walk_while(ball, Correction::Paddle, |ball| in_object(ball, paddle))
}

/// steps the ball by its unscaled velocity while `stuck` holds.
fn walk_while<F>(ball: &mut GameObject, correction: Correction, stuck: F) -> Result<(), EngineError>
where
    F: Fn(&GameObject) -> bool,
{
    for _ in 0..MAX_CORRECTION_STEPS {
        if !stuck(ball) {
            return Ok(());
        }
        ball.step();
    }
    if !stuck(ball) {
        return Ok(());
    }
    warn!(
        "{correction} correction gave up at ({}, {}) with velocity ({}, {})",
        ball.x, ball.y, ball.v_x, ball.v_y
    );
    Err(EngineError::CorrectionDiverged { correction })
}
