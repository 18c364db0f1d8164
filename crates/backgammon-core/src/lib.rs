//! Tavla - a two-player backgammon rules engine
//!
//! This crate provides the core match logic for Tavla, including:
//! - Board representation (24 points, bars, borne-off trays)
//! - Fixed per-color movement paths and the full legality rules
//! - Dice-driven legal-move generation with chained multi-die moves
//! - Turn, game, and match lifecycle with single-turn undo
//!
//! # Architecture
//!
//! The engine is synchronous and free of I/O. External collaborators
//! feed it dice values and selection events and receive immutable
//! snapshots and event data back; rendering, persistence, and the
//! source of randomness all live behind the traits in [`collab`].
//!
//! # Modules
//!
//! - [`path`]: Per-color traversal order, home regions, entry points
//! - [`board`]: Board state, starting layout, invariants
//! - [`moves`]: Legal-move generation and reversible move records
//! - [`game`]: Turn/match state machine
//! - [`actions`]: Action and event types
//! - [`collab`]: Dice and persistence collaborator interfaces

pub mod actions;
pub mod board;
pub mod collab;
pub mod game;
pub mod moves;
pub mod path;

// Re-export commonly used types
pub use actions::{GameEvent, MatchScore, PlayerAction, SkipReason};
pub use board::{Board, Color, PointStack, Slot};
pub use collab::{notify_sink, DiceRoller, FixedRoller, MatchSink, NullSink, RandomRoller};
pub use game::{GameError, GameState, MatchState, Phase, Snapshot};
pub use moves::{any_legal_move, legal_moves, MoveOption, MoveRecord};
