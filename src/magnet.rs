//! Magnetism law
//!
//! When an alpha bounces off a wall, every ball linked to it is either
//! left alone or redirected along the ball->alpha axis, depending on the
//! ball's charge. The comparison speed gets a charge boost: +16.6% at
//! |charge| 2, +33.3% at 3, +50% at 4 and above.

use glam::IVec2;

use crate::geom::scale_round;

/// Speed multiplier for a given charge magnitude
fn charge_boost(magnitude: i32) -> f64 {
    match magnitude {
        1 => 1.0,
        2 => 1.166,
        3 => 1.333,
        _ => 1.5,
    }
}

/// Velocity of a linked ball after its alpha bounced off a wall.
///
/// If the ball-to-alpha distance exceeds the charge-boosted speed, the
/// ball is redirected to that boosted speed along the ball->alpha axis:
/// toward the alpha for positive charge, away from it for negative.
/// Otherwise the velocity is returned unchanged.
///
/// Panics on `charge == 0`; the charge invariant makes that impossible
/// for any linked ball.
pub fn magnet_velocity(alpha_pos: IVec2, ball_pos: IVec2, charge: i32, ball_vel: IVec2) -> IVec2 {
    assert_ne!(charge, 0, "a linked ball always carries a non-zero charge");

    // Lengths in f64: a cross-field separation squares past i32::MAX.
    let ball_to_alpha = alpha_pos - ball_pos;
    let distance = ball_to_alpha.as_dvec2().length();
    let speed = ball_vel.as_dvec2().length() * charge_boost(charge.abs());

    if distance > speed {
        let scaled = scale_round(ball_to_alpha, speed / distance);
        if charge > 0 { scaled } else { -scaled }
    } else {
        ball_vel
    }
}
