//! Movement paths over the 24 board points.
//!
//! Each color traverses the board along a fixed permutation of the 24
//! points, from its entry region toward its bear-off edge. The paths are
//! data, not derived geometry:
//! - White: 12, 11, ..., 1, 24, 23, ..., 13
//! - Black: 13, 14, ..., 24, 1, 2, ..., 12
//!
//! This module also owns the per-color constants that hang off the path:
//! the home (bear-off) region, the bar re-entry target for a die, and the
//! pip distance used by the bear-off rules.

use crate::board::Color;

/// Number of points on the board.
pub const NUM_POINTS: usize = 24;

/// White's traversal order, entry side first.
pub const WHITE_PATH: [u8; NUM_POINTS] = [
    12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 24, 23, 22, 21, 20, 19, 18, 17, 16, 15, 14, 13,
];

/// Black's traversal order, entry side first.
pub const BLACK_PATH: [u8; NUM_POINTS] = [
    13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12,
];

/// The traversal order for a color.
pub fn path(color: Color) -> &'static [u8; NUM_POINTS] {
    match color {
        Color::White => &WHITE_PATH,
        Color::Black => &BLACK_PATH,
    }
}

/// Position of a point within a color's path (0 = start of path).
///
/// Panics if `point` is outside `1..=24`; point indices are validated at
/// the selection boundary before they reach path arithmetic.
pub fn path_index(color: Color, point: u8) -> usize {
    path(color)
        .iter()
        .position(|&p| p == point)
        .expect("point index out of range")
}

/// The point reached by moving `pips` steps along `color`'s path from
/// `point`, or `None` when the move runs past the end of the path.
///
/// Running off the end is not a bear-off; bear-off legality is governed
/// by [`bear_off_distance`] and home eligibility, not by path exhaustion.
pub fn step(color: Color, point: u8, pips: u8) -> Option<u8> {
    let idx = path_index(color, point) + pips as usize;
    if idx < NUM_POINTS {
        Some(path(color)[idx])
    } else {
        None
    }
}

/// Whether `point` lies in `color`'s home (bear-off) region.
///
/// White bears off from points 1-6, Black from points 19-24.
pub fn is_home_point(color: Color, point: u8) -> bool {
    match color {
        Color::White => (1..=6).contains(&point),
        Color::Black => (19..=24).contains(&point),
    }
}

/// The point a bar checker re-enters on for die `d`.
///
/// White enters on point `d`, Black on point `18 + d`.
pub fn entry_point(color: Color, die: u8) -> u8 {
    match color {
        Color::White => die,
        Color::Black => 18 + die,
    }
}

/// Pip distance from `point` to `color`'s bear-off edge.
///
/// White: the point number itself. Black: `25 - point`. A die equal to
/// this distance bears the checker off exactly; a larger die may only be
/// used under the overshoot rule.
pub fn bear_off_distance(color: Color, point: u8) -> u8 {
    match color {
        Color::White => point,
        Color::Black => 25 - point,
    }
}
