//! Board representation: 24 points, the bars, and the borne-off trays.
//!
//! This module contains:
//! - Checker colors and the slot coordinate used for selections
//! - The `Board` with its point stacks, bar counts, and home counts
//! - The standard starting layout
//! - Single-die mutation and the queries the legality rules build on
//! - Invariant validation (15 checkers per color, one color per point)

use crate::path;
use serde::{Deserialize, Serialize};

/// A checker color. Two-variant and closed; `opponent` is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Both colors, White first.
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// The other color. `opponent(Black)` is `White`, explicitly; there
    /// is no fallback arm.
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

/// A selectable location: a board point, a color's bar, or the bear-off
/// tray. `Off` is the bear-off sentinel used as a move target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    /// A board point, numbered 1-24.
    Point(u8),
    /// The acting color's bar.
    Bar,
    /// The bear-off tray (target only, never a source).
    Off,
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Point(p) => write!(f, "point {p}"),
            Slot::Bar => write!(f, "bar"),
            Slot::Off => write!(f, "off"),
        }
    }
}

/// The checkers on a single point. A point never holds both colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointStack {
    pub color: Color,
    pub count: u8,
}

/// Full board state: 24 point stacks plus per-color bar and home counts.
///
/// Mutation is synchronous and total; callers pre-validate moves with the
/// generator in [`crate::moves`] before applying them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    points: [Option<PointStack>; 24],
    bar: [u8; 2],
    home: [u8; 2],
}

impl Board {
    /// An empty board with no checkers anywhere. Test and scenario
    /// builder; combine with [`Board::place`].
    pub fn empty() -> Self {
        Self {
            points: [None; 24],
            bar: [0; 2],
            home: [0; 2],
        }
    }

    /// The standard starting layout.
    ///
    /// Mirrored placement along each color's path: 2 checkers on the
    /// second path point, 5 on the fifth, 3 on the eighth, 5 on the
    /// twelfth. White: 11x2, 8x5, 5x3, 1x5. Black: 14x2, 17x5, 20x3,
    /// 24x5. Every checker starts within the first half of its path,
    /// so both home regions stay reachable and the path ends (13 and
    /// 19) are open.
    pub fn standard() -> Self {
        let mut board = Self::empty();
        for color in Color::ALL {
            for (path_idx, count) in [(1, 2), (4, 5), (7, 3), (11, 5)] {
                board.place(path::path(color)[path_idx], color, count);
            }
        }
        board
    }

    /// Put `count` checkers of `color` on `point`, stacking on any
    /// already there. Panics if the point holds the other color; layouts
    /// are built on empty boards.
    pub fn place(&mut self, point: u8, color: Color, count: u8) {
        let stack = &mut self.points[point as usize - 1];
        match stack {
            None => *stack = Some(PointStack { color, count }),
            Some(s) => {
                assert_eq!(s.color, color, "point {point} already holds {}", s.color);
                s.count += count;
            }
        }
    }

    /// Put `count` checkers of `color` on its bar. Scenario builder.
    pub fn place_on_bar(&mut self, color: Color, count: u8) {
        self.bar[color.index()] += count;
    }

    /// Mark `count` checkers of `color` as already borne off. Scenario
    /// builder.
    pub fn place_off(&mut self, color: Color, count: u8) {
        self.home[color.index()] += count;
    }

    /// The stack on `point`, if any.
    pub fn point(&self, point: u8) -> Option<PointStack> {
        self.points[point as usize - 1]
    }

    /// Checkers of `color` sitting on `point`.
    pub fn checkers_on(&self, point: u8, color: Color) -> u8 {
        match self.point(point) {
            Some(s) if s.color == color => s.count,
            _ => 0,
        }
    }

    /// Checkers of `color` on its bar.
    pub fn bar(&self, color: Color) -> u8 {
        self.bar[color.index()]
    }

    /// Checkers of `color` borne off.
    pub fn home(&self, color: Color) -> u8 {
        self.home[color.index()]
    }

    /// Whether `point` is blocked for `color`: it holds two or more
    /// opposing checkers. A single opposing checker is a blot and a
    /// legal (hitting) destination.
    pub fn is_blocked(&self, point: u8, color: Color) -> bool {
        self.checkers_on(point, color.opponent()) >= 2
    }

    /// Whether `point` holds exactly one opposing checker.
    pub fn is_blot(&self, point: u8, color: Color) -> bool {
        self.checkers_on(point, color.opponent()) == 1
    }

    /// Whether `color` may bear off: bar empty and every remaining
    /// checker inside the home region.
    pub fn home_eligible(&self, color: Color) -> bool {
        if self.bar(color) > 0 {
            return false;
        }
        (1..=24).all(|p| self.checkers_on(p, color) == 0 || path::is_home_point(color, p))
    }

    /// The largest bear-off distance among `color`'s board checkers, or
    /// `None` when none remain on the board. Drives the overshoot rule:
    /// an oversized die only bears off a checker no other checker sits
    /// strictly farther than.
    pub fn farthest_distance(&self, color: Color) -> Option<u8> {
        (1..=24)
            .filter(|&p| self.checkers_on(p, color) > 0)
            .map(|p| path::bear_off_distance(color, p))
            .max()
    }

    /// Checkers of `color` still on board points.
    pub fn on_board(&self, color: Color) -> u8 {
        (1..=24).map(|p| self.checkers_on(p, color)).sum()
    }

    /// Pip count for `color`: bar checkers count a full 25, board
    /// checkers their bear-off distance.
    pub fn pip_count(&self, color: Color) -> u32 {
        let on_bar = self.bar(color) as u32 * 25;
        let on_points: u32 = (1..=24)
            .map(|p| self.checkers_on(p, color) as u32 * path::bear_off_distance(color, p) as u32)
            .sum();
        on_bar + on_points
    }

    /// Move one checker of `color` from `from` to `to`, sending any
    /// opposing blot on the destination to its bar. Returns the hit
    /// `(point, color)` if one happened.
    ///
    /// This is a single-die step; chained moves apply one step per die.
    pub fn apply_step(&mut self, from: Slot, to: Slot, color: Color) -> Option<(u8, Color)> {
        self.lift(from, color);
        let mut hit = None;
        if let Slot::Point(p) = to {
            if self.is_blot(p, color) {
                let victim = color.opponent();
                self.lift(Slot::Point(p), victim);
                self.bar[victim.index()] += 1;
                hit = Some((p, victim));
            }
        }
        self.put(to, color);
        hit
    }

    /// Remove one checker of `color` from a slot (`Off` pulls back a
    /// borne-off checker; used by undo).
    pub(crate) fn lift(&mut self, slot: Slot, color: Color) {
        match slot {
            Slot::Point(p) => {
                let stack = &mut self.points[p as usize - 1];
                match stack {
                    Some(s) if s.color == color && s.count > 1 => s.count -= 1,
                    Some(s) if s.color == color => *stack = None,
                    _ => panic!("no {color} checker on point {p}"),
                }
            }
            Slot::Bar => {
                assert!(self.bar[color.index()] > 0, "{color} bar is empty");
                self.bar[color.index()] -= 1;
            }
            Slot::Off => {
                assert!(self.home[color.index()] > 0, "{color} has borne off none");
                self.home[color.index()] -= 1;
            }
        }
    }

    /// Add one checker of `color` to a slot. Point destinations must be
    /// empty or already held by `color`; hits are handled by
    /// [`Board::apply_step`], not here.
    pub(crate) fn put(&mut self, slot: Slot, color: Color) {
        match slot {
            Slot::Point(p) => self.place(p, color, 1),
            Slot::Bar => self.bar[color.index()] += 1,
            Slot::Off => self.home[color.index()] += 1,
        }
    }

    /// Check the board invariants: each color accounts for exactly 15
    /// checkers across points, bar, and home, and every stack is
    /// non-empty (the one-color-per-point invariant is structural).
    pub fn validate(&self) -> Result<(), String> {
        for color in Color::ALL {
            let total =
                self.on_board(color) as u32 + self.bar(color) as u32 + self.home(color) as u32;
            if total != 15 {
                return Err(format!("{color} accounts for {total} checkers, expected 15"));
            }
        }
        for p in 1..=24u8 {
            if let Some(s) = self.point(p) {
                if s.count == 0 {
                    return Err(format!("point {p} holds an empty {} stack", s.color));
                }
            }
        }
        Ok(())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}
