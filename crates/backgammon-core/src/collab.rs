//! Collaborator interfaces.
//!
//! The engine never performs I/O and never generates randomness of its
//! own: dice come from a [`DiceRoller`] collaborator and finished-game
//! results flow out to a [`MatchSink`]. Drivers decide what stands
//! behind each trait (an RNG, a replay log, a database, a UI).

use crate::actions::{GameEvent, MatchScore};
use crate::board::Color;
use rand::prelude::*;
use std::collections::VecDeque;

/// Produces dice rolls for the engine to consume.
pub trait DiceRoller {
    /// Two die faces, each 1-6.
    fn roll(&mut self) -> (u8, u8);
}

/// Fair dice backed by `StdRng`.
pub struct RandomRoller {
    rng: StdRng,
}

impl RandomRoller {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic roller for replays and tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomRoller {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceRoller for RandomRoller {
    fn roll(&mut self) -> (u8, u8) {
        (self.rng.gen_range(1..=6), self.rng.gen_range(1..=6))
    }
}

/// Scripted dice for tests and scenario replays. Panics when the
/// script runs dry.
pub struct FixedRoller {
    rolls: VecDeque<(u8, u8)>,
}

impl FixedRoller {
    pub fn new(rolls: impl IntoIterator<Item = (u8, u8)>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
        }
    }
}

impl DiceRoller for FixedRoller {
    fn roll(&mut self) -> (u8, u8) {
        self.rolls.pop_front().expect("fixed roller exhausted")
    }
}

/// Consumes game and match completions for durable recording. The
/// engine supplies only the data; storage is the collaborator's job
/// and its failures must never touch engine state.
pub trait MatchSink {
    fn on_game_won(&mut self, winner: Color, score: &MatchScore);
    fn on_match_won(&mut self, winner: Color, final_score: &MatchScore);
}

/// A sink that discards everything.
pub struct NullSink;

impl MatchSink for NullSink {
    fn on_game_won(&mut self, _winner: Color, _score: &MatchScore) {}
    fn on_match_won(&mut self, _winner: Color, _final_score: &MatchScore) {}
}

/// Forward completion events from an event batch to a sink.
pub fn notify_sink(events: &[GameEvent], sink: &mut dyn MatchSink) {
    for event in events {
        match event {
            GameEvent::GameWon { winner, score } => sink.on_game_won(*winner, score),
            GameEvent::MatchWon { winner, score } => sink.on_match_won(*winner, score),
            _ => {}
        }
    }
}
