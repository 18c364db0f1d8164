//! Legal-move generation.
//!
//! Given a source (a board point or the bar) and the dice still unspent
//! this turn, the generator enumerates every reachable target together
//! with the dice a move to it consumes. A single logical move may chain
//! up to four single-die steps (four only on doubles); every step is
//! validated against a cloned intermediate board so exploration can
//! simulate hits without touching live state. Nothing is committed until
//! the state machine applies a fully validated option.

use crate::board::{Board, Color, Slot};
use crate::path;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One legal move from a given source: the target reached and the dice
/// consumed, in the order they are played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOption {
    /// Destination: a board point, or [`Slot::Off`] for a bear-off.
    pub target: Slot,
    /// Die values consumed, in play order (1 to 4 entries).
    pub dice_used: Vec<u8>,
}

/// A fully applied move, recorded for the turn-scoped undo stack.
///
/// `hits` lists every opposing blot sent to the bar, in landing order; a
/// chained move can hit one blot per intermediate landing, and each must
/// be restored for undo to be exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub from: Slot,
    pub to: Slot,
    pub color: Color,
    pub dice_used: Vec<u8>,
    pub hits: Vec<(u8, Color)>,
}

impl MoveRecord {
    /// Whether this move sent at least one opposing checker to the bar.
    pub fn hit_opponent(&self) -> bool {
        !self.hits.is_empty()
    }
}

/// All legal moves of `color` from `source` given the unspent `dice`.
///
/// While `color` has checkers on the bar, the bar is the only legal
/// source and each usable die yields a single-die re-entry. Otherwise a
/// board point held by `color` is explored recursively over every order
/// and sub-multiset of the dice. Multiple dice paths reaching the same
/// target collapse to one option, preferring fewer dice and then the
/// higher summed pip value (a presentation policy, not a legality rule:
/// the collapsed alternatives reach the identical target).
pub fn legal_moves(board: &Board, color: Color, source: Slot, dice: &[u8]) -> Vec<MoveOption> {
    if dice.is_empty() {
        return Vec::new();
    }

    if board.bar(color) > 0 {
        if source != Slot::Bar {
            return Vec::new();
        }
        let mut seen = [false; 7];
        let mut options = Vec::new();
        for &die in dice {
            if seen[die as usize] {
                continue;
            }
            seen[die as usize] = true;
            let target = path::entry_point(color, die);
            if !board.is_blocked(target, color) {
                options.push(MoveOption {
                    target: Slot::Point(target),
                    dice_used: vec![die],
                });
            }
        }
        options.sort_by_key(|o| o.target);
        return options;
    }

    let start = match source {
        Slot::Point(p) if (1..=24).contains(&p) && board.checkers_on(p, color) > 0 => p,
        _ => return Vec::new(),
    };

    let mut found: Vec<(Slot, Vec<u8>)> = Vec::new();
    let mut used: Vec<u8> = Vec::new();
    explore(board, color, start, dice, &mut used, &mut found);
    dedup(found)
}

/// Depth-first exploration of every dice order from `from`.
///
/// `board` already reflects the chain played so far (the moving checker
/// sits on `from`); each recursion clones it, so sibling branches never
/// observe each other's hits.
fn explore(
    board: &Board,
    color: Color,
    from: u8,
    dice: &[u8],
    used: &mut Vec<u8>,
    found: &mut Vec<(Slot, Vec<u8>)>,
) {
    let mut seen = [false; 7];
    for (i, &die) in dice.iter().enumerate() {
        if seen[die as usize] {
            continue;
        }
        seen[die as usize] = true;

        if let Some(next_point) = path::step(color, from, die) {
            if !board.is_blocked(next_point, color) {
                let mut next = board.clone();
                next.apply_step(Slot::Point(from), Slot::Point(next_point), color);
                used.push(die);
                found.push((Slot::Point(next_point), used.clone()));
                let mut remaining = dice.to_vec();
                remaining.remove(i);
                explore(&next, color, next_point, &remaining, used, found);
                used.pop();
            }
        }

        // Bear-off is terminal: the checker leaves play, no recursion.
        if bear_off_legal(board, color, from, die) {
            used.push(die);
            found.push((Slot::Off, used.clone()));
            used.pop();
        }
    }
}

/// Whether a checker of `color` on `from` may bear off with `die`.
///
/// Requires home eligibility (empty bar, all checkers home), then either
/// an exact pip match or an overshoot: a die larger than the distance is
/// legal only when no checker of `color` sits strictly farther from the
/// bear-off edge than this one.
fn bear_off_legal(board: &Board, color: Color, from: u8, die: u8) -> bool {
    if !board.home_eligible(color) {
        return false;
    }
    let dist = path::bear_off_distance(color, from);
    die == dist || (die > dist && board.farthest_distance(color).map_or(true, |f| f <= dist))
}

/// Collapse duplicate targets, keeping one option per target: fewer dice
/// first, then the higher summed pip value.
fn dedup(found: Vec<(Slot, Vec<u8>)>) -> Vec<MoveOption> {
    let mut best: HashMap<Slot, Vec<u8>> = HashMap::new();
    for (target, dice_used) in found {
        match best.get(&target) {
            Some(held) if !prefers(&dice_used, held) => {}
            _ => {
                best.insert(target, dice_used);
            }
        }
    }
    let mut options: Vec<MoveOption> = best
        .into_iter()
        .map(|(target, dice_used)| MoveOption { target, dice_used })
        .collect();
    options.sort_by_key(|o| o.target);
    options
}

/// Tie-break between two dice paths to the same target.
fn prefers(candidate: &[u8], held: &[u8]) -> bool {
    let pip = |d: &[u8]| d.iter().map(|&x| x as u32).sum::<u32>();
    candidate.len() < held.len() || (candidate.len() == held.len() && pip(candidate) > pip(held))
}

/// Whether `color` has any legal move at all with `dice`.
///
/// Short-circuits on the first move found; bar re-entry is checked first
/// because no other action is legal while the bar is occupied. A single
/// legal die step implies a legal move, and every legal chain begins
/// with one, so only single-die steps need checking.
pub fn any_legal_move(board: &Board, color: Color, dice: &[u8]) -> bool {
    if dice.is_empty() {
        return false;
    }

    if board.bar(color) > 0 {
        return dice
            .iter()
            .any(|&die| !board.is_blocked(path::entry_point(color, die), color));
    }

    let eligible = board.home_eligible(color);
    for point in 1..=24u8 {
        if board.checkers_on(point, color) == 0 {
            continue;
        }
        for &die in dice {
            if let Some(target) = path::step(color, point, die) {
                if !board.is_blocked(target, color) {
                    return true;
                }
            }
            if eligible && bear_off_legal(board, color, point, die) {
                return true;
            }
        }
    }
    false
}

/// Commit a validated option: replay its chain step by step on the live
/// board, sending hit blots to the bar, and return the reversible record
/// for the undo stack.
///
/// The option must come from [`legal_moves`] for the same board, color,
/// and source; intermediate landings are recomputed deterministically
/// from the recorded dice order.
pub fn apply_option(
    board: &mut Board,
    color: Color,
    source: Slot,
    option: &MoveOption,
) -> MoveRecord {
    // An option with no dice moves nothing; record it as such rather
    // than walking an empty chain.
    if option.dice_used.is_empty() {
        return MoveRecord {
            from: source,
            to: source,
            color,
            dice_used: Vec::new(),
            hits: Vec::new(),
        };
    }
    let last = option.dice_used.len() - 1;
    let mut current = source;
    let mut hits = Vec::new();

    for (i, &die) in option.dice_used.iter().enumerate() {
        let to = if i == last {
            option.target
        } else {
            let from = match current {
                Slot::Point(p) => p,
                // Bar entries are always single-die, so a chain's
                // intermediate position is a board point.
                _ => unreachable!("chained move passing through {current}"),
            };
            Slot::Point(path::step(color, from, die).expect("validated chain left the path"))
        };
        if let Some(hit) = board.apply_step(current, to, color) {
            hits.push(hit);
        }
        current = to;
    }

    MoveRecord {
        from: source,
        to: option.target,
        color,
        dice_used: option.dice_used.clone(),
        hits,
    }
}

/// Exactly reverse an applied record: the checker returns to its source,
/// every hit checker comes off the bar back to the point it was hit on
/// (in reverse landing order), and a borne-off checker rejoins the board.
pub fn undo_record(board: &mut Board, record: &MoveRecord) {
    board.lift(record.to, record.color);
    board.put(record.from, record.color);
    for &(point, victim) in record.hits.iter().rev() {
        board.lift(Slot::Bar, victim);
        board.put(Slot::Point(point), victim);
    }
}
