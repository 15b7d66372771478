//! Collision detection and response
//!
//! Overlap tests with minimum-translation push-out, swept-segment side
//! classification for fast balls against rectangles, and the paddle
//! deflection rule that aims the bounce instead of reflecting it.

use glam::Vec2;

use crate::actor::Actor;
use crate::shape::{self, Mtv};
use crate::tuning::Tuning;

/// Exact overlap check behind an AABB broad phase. Returns the MTV that would
/// push `a` out of `b`.
fn check_overlap(a: &Actor, b: &Actor) -> Option<Mtv> {
    let poly_a = a.bounding_polygon();
    let poly_b = b.bounding_polygon();
    if !shape::aabb_overlap(&poly_a, &poly_b) {
        return None;
    }
    shape::overlap_mtv(&poly_a, &poly_b)
}

/// Whether two actors collide. Overlap shallower than
/// `tuning.penetration_threshold` counts as touching and reports false.
pub fn overlaps(a: &Actor, b: &Actor, tuning: &Tuning) -> bool {
    check_overlap(a, b)
        .map(|mtv| mtv.depth > tuning.penetration_threshold)
        .unwrap_or(false)
}

/// Like [`overlaps`], but any overlap additionally displaces `a` (and only
/// `a`) out of `b` along the minimum translation vector.
pub fn overlaps_resolve(a: &mut Actor, b: &Actor, tuning: &Tuning) -> bool {
    match check_overlap(a, b) {
        Some(mtv) => {
            a.pos += mtv.normal * mtv.depth;
            mtv.depth > tuning.penetration_threshold
        }
        None => false,
    }
}

/// Proximity test: does `a`, grown by `distance` on every side, overlap `b`?
pub fn is_within_distance(a: &Actor, b: &Actor, distance: f32) -> bool {
    let poly_a = a.grown_polygon(distance);
    let poly_b = b.bounding_polygon();
    shape::aabb_overlap(&poly_a, &poly_b) && shape::overlap_mtv(&poly_a, &poly_b).is_some()
}

/// Which velocity components a rectangle contact reversed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BounceReport {
    pub reversed_x: bool,
    pub reversed_y: bool,
    /// Neither swept edge test fired despite overlap; both components reversed
    pub corner: bool,
}

fn orient(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).perp_dot(c - a)
}

fn on_segment(a: Vec2, b: Vec2, p: Vec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Whether segments a1-a2 and b1-b2 cross. Collinear endpoint touches count.
pub fn segments_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let d1 = orient(b1, b2, a1);
    let d2 = orient(b1, b2, a2);
    let d3 = orient(a1, a2, b1);
    let d4 = orient(a1, a2, b2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(b1, b2, a1))
        || (d2 == 0.0 && on_segment(b1, b2, a2))
        || (d3 == 0.0 && on_segment(a1, a2, b1))
        || (d4 == 0.0 && on_segment(a1, a2, b2))
}

/// Classify which rectangle side a moving circle struck this frame.
///
/// Call only after overlap has been established. A fast circle can cross a
/// thin rectangle within one step, so each axis is judged by whether the path
/// of the circle's extreme point crossed the facing edge: rightward motion
/// tests the rightmost point against the target's left edge, and so on for
/// the other three directions. Axis tests are independent; when none fires
/// the contact is a corner hit and both components reverse.
pub fn classify_rect_contact(
    prev_center: Vec2,
    center: Vec2,
    radius: f32,
    velocity: Vec2,
    rect_pos: Vec2,
    rect_size: Vec2,
) -> BounceReport {
    let left_bottom = rect_pos;
    let right_bottom = rect_pos + Vec2::new(rect_size.x, 0.0);
    let right_top = rect_pos + rect_size;
    let left_top = rect_pos + Vec2::new(0.0, rect_size.y);

    let mut report = BounceReport::default();

    if velocity.x > 0.0 {
        // Rightmost point of the circle across the target's left edge
        let from = prev_center + Vec2::new(radius, 0.0);
        let to = center + Vec2::new(radius, 0.0);
        if segments_intersect(from, to, left_bottom, left_top) {
            report.reversed_x = true;
        }
    } else if velocity.x < 0.0 {
        let from = prev_center - Vec2::new(radius, 0.0);
        let to = center - Vec2::new(radius, 0.0);
        if segments_intersect(from, to, right_bottom, right_top) {
            report.reversed_x = true;
        }
    }

    if velocity.y > 0.0 {
        // Upward motion meets the target's bottom edge
        let from = prev_center + Vec2::new(0.0, radius);
        let to = center + Vec2::new(0.0, radius);
        if segments_intersect(from, to, left_bottom, right_bottom) {
            report.reversed_y = true;
        }
    } else if velocity.y < 0.0 {
        let from = prev_center - Vec2::new(0.0, radius);
        let to = center - Vec2::new(0.0, radius);
        if segments_intersect(from, to, left_top, right_top) {
            report.reversed_y = true;
        }
    }

    if !report.reversed_x && !report.reversed_y {
        report.corner = true;
        report.reversed_x = true;
        report.reversed_y = true;
    }

    report
}

/// Bounce a moving actor off a rectangular target, reversing velocity
/// components per the swept side classification. The caller is responsible
/// for having established overlap first.
pub fn bounce_off_rect(ball: &mut Actor, target: &Actor) -> BounceReport {
    let Some(kin) = ball.kinematics.as_mut() else {
        return BounceReport::default();
    };
    let report = classify_rect_contact(
        ball.prev_pos + ball.size / 2.0,
        ball.pos + ball.size / 2.0,
        ball.size.max_element() / 2.0,
        kin.velocity,
        target.pos,
        target.size,
    );
    if report.reversed_x {
        kin.velocity.x = -kin.velocity.x;
    }
    if report.reversed_y {
        kin.velocity.y = -kin.velocity.y;
    }
    if report.corner {
        log::debug!("corner hit: actor {} vs {}", ball.id, target.id);
    }
    report
}

/// Paddle deflection: the outgoing angle is interpolated from the ball's
/// horizontal position across the paddle's width, left edge to right edge,
/// preserving speed. This aims the bounce instead of reflecting it.
pub fn paddle_deflect(ball: &mut Actor, paddle: &Actor, tuning: &Tuning) {
    let center_x = ball.pos.x + ball.size.x / 2.0;
    let Some(kin) = ball.kinematics.as_mut() else {
        return;
    };
    let t = (center_x - paddle.pos.x) / paddle.size.x;
    let angle = tuning.paddle_angle_left_deg
        + (tuning.paddle_angle_right_deg - tuning.paddle_angle_left_deg) * t;
    let speed = kin.speed();
    kin.set_velocity_polar(angle, speed);
}

/// Clamp an actor's box inside a world rectangle anchored at the origin
pub fn bound_to_world(actor: &mut Actor, world_width: f32, world_height: f32) {
    actor.pos.x = actor.pos.x.clamp(0.0, world_width - actor.size.x);
    actor.pos.y = actor.pos.y.clamp(0.0, world_height - actor.size.y);
}

/// Teleport an actor that fully left the world across to the opposite edge
pub fn wrap_around_world(actor: &mut Actor, world_width: f32, world_height: f32) {
    if actor.pos.x + actor.size.x < 0.0 {
        actor.pos.x = world_width;
    } else if actor.pos.x > world_width {
        actor.pos.x = -actor.size.x;
    }
    if actor.pos.y + actor.size.y < 0.0 {
        actor.pos.y = world_height;
    } else if actor.pos.y > world_height {
        actor.pos.y = -actor.size.y;
    }
}
