//! Player actions and the events they produce.
//!
//! Actions are the discrete external inputs the engine accepts (a dice
//! roll intake, a selection, an undo request); events describe what the
//! engine did in response. Both are plain serde data so a driver can
//! ship them over any transport.

use crate::board::{Color, Slot};
use crate::moves::MoveRecord;
use serde::{Deserialize, Serialize};

/// All external inputs the state machine accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Feed in two rolled die faces (1-6 each). The source of randomness
    /// is a collaborator; the engine only consumes the values.
    Roll { dice: (u8, u8) },
    /// Select a source or target slot. Selecting the current source
    /// again deselects it.
    Select { slot: Slot },
    /// Undo the most recent move of the current turn.
    Undo,
}

/// Why a turn was skipped without any move being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Checkers on the bar and every usable entry point is blocked.
    BarBlocked,
    /// No legal move exists anywhere for the rolled dice.
    NoLegalMoves,
}

/// Running game score of a match, exact game-win counts per color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    pub white: u8,
    pub black: u8,
}

impl MatchScore {
    /// Games won by `color`.
    pub fn for_color(&self, color: Color) -> u8 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }
}

/// Events emitted by accepted actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Dice were fed in for the current player.
    DiceRolled { color: Color, roll: (u8, u8) },

    /// The rolled dice allow no move; the turn ends untouched. `dice`
    /// is the full dice set as rolled (doubles already expanded).
    TurnSkipped {
        color: Color,
        dice: Vec<u8>,
        reason: SkipReason,
    },

    /// A source was selected and targets can now be queried.
    SourceSelected { color: Color, source: Slot },

    /// The current selection was cleared without moving.
    SelectionCleared { color: Color },

    /// A validated move was committed to the board.
    MoveApplied { record: MoveRecord },

    /// The most recent move of the turn was exactly reversed.
    MoveUndone { record: MoveRecord },

    /// The turn ended (dice spent or no further legal move).
    TurnEnded { color: Color, next: Color },

    /// A game ended by bearing off the fifteenth checker. `score` is
    /// the match score including this win.
    GameWon { winner: Color, score: MatchScore },

    /// The match reached its majority; the engine is now inert.
    MatchWon { winner: Color, score: MatchScore },
}
