//! Turn and match state machine.
//!
//! `MatchState` owns the board exclusively and is its only writer. All
//! transitions are triggered by discrete external events (roll intake,
//! selection, undo) and run to completion before the next is accepted;
//! rendering and persistence collaborators receive immutable snapshots
//! and event data, never references into live state.

use crate::actions::{GameEvent, MatchScore, PlayerAction, SkipReason};
use crate::board::{Board, Color, Slot};
use crate::collab::DiceRoller;
use crate::moves::{self, MoveOption, MoveRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the current game stands within a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the current player's dice.
    AwaitingRoll,
    /// Dice are available; waiting for a source selection.
    AwaitingSelection,
    /// A source is selected; waiting for a target (or deselection).
    SourceSelected { source: Slot },
    /// The match is decided; the engine is inert until restarted.
    MatchOver { winner: Color },
}

/// Advisory rejections and the defect signal.
///
/// Every variant except `CorruptState` is advisory: the action was a
/// no-op, the message says why, and state is unchanged. `CorruptState`
/// reports a violated board invariant and means the engine refuses to
/// proceed rather than play on a corrupt board.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameError {
    #[error("match format must be an odd number of games")]
    InvalidFormat,

    #[error("die faces must be between 1 and 6")]
    InvalidDie,

    #[error("rolling is only allowed at the start of a turn")]
    RollNotExpected,

    #[error("roll the dice before selecting")]
    SelectionNotExpected,

    #[error("checkers on the bar must re-enter before any other move")]
    MustEnterFromBar,

    #[error("that is not a selectable checker of the current player")]
    NotYourChecker,

    #[error("no legal move reaches that target")]
    IllegalTarget,

    #[error("bearing off needs every checker in the home board")]
    NotAllHome,

    #[error("nothing to undo this turn")]
    NothingToUndo,

    #[error("the match is over")]
    MatchFinished,

    #[error("engine state corrupt: {0}")]
    CorruptState(String),
}

/// Per-game state nested inside a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub current_player: Color,
    /// Unspent die values for the current turn (doubles expand to 4).
    pub dice: Vec<u8>,
    pub phase: Phase,
    /// Turn-scoped undo stack, cleared on every roll and turn end.
    history: Vec<MoveRecord>,
}

/// Immutable view handed to rendering collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub board: Board,
    pub current_player: Color,
    pub dice: Vec<u8>,
    pub score: MatchScore,
    pub phase: Phase,
    pub format: u8,
}

/// A best-of-`format` backgammon match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    /// Odd number of games; the first color to a majority wins.
    pub format: u8,
    score: MatchScore,
    pub game: GameState,
}

impl MatchState {
    /// Start a match. `format` must be odd (first to `format/2 + 1`
    /// game wins takes the match).
    pub fn new(format: u8) -> Result<Self, GameError> {
        if format == 0 || format % 2 == 0 {
            return Err(GameError::InvalidFormat);
        }
        Ok(Self {
            format,
            score: MatchScore::default(),
            game: GameState {
                board: Board::standard(),
                current_player: Color::White,
                dice: Vec::new(),
                phase: Phase::AwaitingRoll,
                history: Vec::new(),
            },
        })
    }

    /// Start a match from an arbitrary position, awaiting a roll by
    /// `current_player`. Scenario and test entry point.
    pub fn with_position(format: u8, board: Board, current_player: Color) -> Result<Self, GameError> {
        let mut state = Self::new(format)?;
        state.game.board = board;
        state.game.current_player = current_player;
        Ok(state)
    }

    /// Game wins needed to take the match.
    pub fn games_needed(&self) -> u8 {
        self.format / 2 + 1
    }

    /// Current game-win counts.
    pub fn score(&self) -> MatchScore {
        self.score
    }

    /// Whether the match is decided.
    pub fn is_finished(&self) -> bool {
        matches!(self.game.phase, Phase::MatchOver { .. })
    }

    /// The match winner, if decided.
    pub fn winner(&self) -> Option<Color> {
        match self.game.phase {
            Phase::MatchOver { winner } => Some(winner),
            _ => None,
        }
    }

    /// Apply an external input to the state machine.
    pub fn apply(&mut self, action: PlayerAction) -> Result<Vec<GameEvent>, GameError> {
        match action {
            PlayerAction::Roll { dice: (d1, d2) } => self.roll(d1, d2),
            PlayerAction::Select { slot } => self.select(slot),
            PlayerAction::Undo => self.undo(),
        }
    }

    /// Draw two faces from a dice collaborator and feed them in.
    pub fn roll_with<R: DiceRoller + ?Sized>(
        &mut self,
        roller: &mut R,
    ) -> Result<Vec<GameEvent>, GameError> {
        let (d1, d2) = roller.roll();
        self.roll(d1, d2)
    }

    /// Feed in a dice roll for the current player.
    ///
    /// Doubles expand to a four-die set. If the roll allows no move at
    /// all the turn is skipped: the skip event reports the full dice
    /// set as rolled, then the turn passes without any board change.
    pub fn roll(&mut self, d1: u8, d2: u8) -> Result<Vec<GameEvent>, GameError> {
        match self.game.phase {
            Phase::AwaitingRoll => {}
            Phase::MatchOver { .. } => return Err(GameError::MatchFinished),
            _ => return Err(GameError::RollNotExpected),
        }
        if !(1..=6).contains(&d1) || !(1..=6).contains(&d2) {
            return Err(GameError::InvalidDie);
        }

        let color = self.game.current_player;
        self.game.history.clear();
        self.game.dice = if d1 == d2 {
            vec![d1; 4]
        } else {
            vec![d1, d2]
        };

        let mut events = vec![GameEvent::DiceRolled {
            color,
            roll: (d1, d2),
        }];

        if moves::any_legal_move(&self.game.board, color, &self.game.dice) {
            self.game.phase = Phase::AwaitingSelection;
        } else {
            let reason = if self.game.board.bar(color) > 0 {
                SkipReason::BarBlocked
            } else {
                SkipReason::NoLegalMoves
            };
            events.push(GameEvent::TurnSkipped {
                color,
                dice: self.game.dice.clone(),
                reason,
            });
            self.end_turn(&mut events);
        }

        Ok(events)
    }

    /// Select a slot: a source while none is selected, a target (or a
    /// different source, or a deselection) while one is.
    pub fn select(&mut self, slot: Slot) -> Result<Vec<GameEvent>, GameError> {
        let color = self.game.current_player;
        match self.game.phase.clone() {
            Phase::MatchOver { .. } => Err(GameError::MatchFinished),
            Phase::AwaitingRoll => Err(GameError::SelectionNotExpected),
            Phase::AwaitingSelection => {
                self.check_source(slot)?;
                self.game.phase = Phase::SourceSelected { source: slot };
                Ok(vec![GameEvent::SourceSelected {
                    color,
                    source: slot,
                }])
            }
            Phase::SourceSelected { source } => {
                if slot == source {
                    self.game.phase = Phase::AwaitingSelection;
                    return Ok(vec![GameEvent::SelectionCleared { color }]);
                }

                // A landing on the player's own point is a move, not a
                // reselection; only non-targets fall through.
                let options =
                    moves::legal_moves(&self.game.board, color, source, &self.game.dice);
                if let Some(option) = options.into_iter().find(|o| o.target == slot) {
                    return self.commit_move(source, option);
                }

                if self.check_source(slot).is_ok() {
                    self.game.phase = Phase::SourceSelected { source: slot };
                    return Ok(vec![GameEvent::SourceSelected {
                        color,
                        source: slot,
                    }]);
                }

                if slot == Slot::Off && !self.game.board.home_eligible(color) {
                    Err(GameError::NotAllHome)
                } else {
                    Err(GameError::IllegalTarget)
                }
            }
        }
    }

    /// Legal moves from the currently selected source, if any.
    pub fn legal_targets(&self) -> Vec<MoveOption> {
        match self.game.phase {
            Phase::SourceSelected { source } => moves::legal_moves(
                &self.game.board,
                self.game.current_player,
                source,
                &self.game.dice,
            ),
            _ => Vec::new(),
        }
    }

    /// Undo the most recent move of this turn, exactly.
    ///
    /// Turn-scoped only: the stack is cleared on every roll and turn
    /// end, so undo never crosses a turn boundary and never resurrects
    /// a finished game or match.
    pub fn undo(&mut self) -> Result<Vec<GameEvent>, GameError> {
        match self.game.phase {
            Phase::AwaitingSelection | Phase::SourceSelected { .. } => {}
            Phase::MatchOver { .. } => return Err(GameError::MatchFinished),
            Phase::AwaitingRoll => return Err(GameError::NothingToUndo),
        }
        let record = self.game.history.pop().ok_or(GameError::NothingToUndo)?;

        moves::undo_record(&mut self.game.board, &record);
        self.game.dice.extend_from_slice(&record.dice_used);
        self.game.phase = Phase::AwaitingSelection;
        self.check_invariants()?;

        Ok(vec![GameEvent::MoveUndone { record }])
    }

    /// Snapshot for rendering collaborators.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.game.board.clone(),
            current_player: self.game.current_player,
            dice: self.game.dice.clone(),
            score: self.score,
            phase: self.game.phase.clone(),
            format: self.format,
        }
    }

    // ==================== Helpers ====================

    /// Whether `slot` is a selectable source for the current player.
    fn check_source(&self, slot: Slot) -> Result<(), GameError> {
        let color = self.game.current_player;
        if self.game.board.bar(color) > 0 {
            return match slot {
                Slot::Bar => Ok(()),
                _ => Err(GameError::MustEnterFromBar),
            };
        }
        match slot {
            Slot::Point(p) if (1..=24).contains(&p) => {
                if self.game.board.checkers_on(p, color) > 0 {
                    Ok(())
                } else {
                    Err(GameError::NotYourChecker)
                }
            }
            _ => Err(GameError::NotYourChecker),
        }
    }

    /// Commit a validated option, then run the automatic follow-ups:
    /// game/match completion or turn end.
    fn commit_move(
        &mut self,
        source: Slot,
        option: MoveOption,
    ) -> Result<Vec<GameEvent>, GameError> {
        let color = self.game.current_player;
        let record = moves::apply_option(&mut self.game.board, color, source, &option);

        for die in &record.dice_used {
            let spent = self
                .game
                .dice
                .iter()
                .position(|d| d == die)
                .expect("consumed die was available");
            self.game.dice.remove(spent);
        }
        self.game.history.push(record.clone());
        self.game.phase = Phase::AwaitingSelection;
        self.check_invariants()?;

        let mut events = vec![GameEvent::MoveApplied { record }];

        if self.game.board.home(color) == 15 {
            // Bearing off the last checker ends the game immediately,
            // even mid-turn with dice left over.
            self.finish_game(color, &mut events);
        } else if self.game.dice.is_empty()
            || !moves::any_legal_move(&self.game.board, color, &self.game.dice)
        {
            self.end_turn(&mut events);
        }

        Ok(events)
    }

    /// Pass the turn to the opponent.
    fn end_turn(&mut self, events: &mut Vec<GameEvent>) {
        let color = self.game.current_player;
        let next = color.opponent();
        self.game.dice.clear();
        self.game.history.clear();
        self.game.current_player = next;
        self.game.phase = Phase::AwaitingRoll;
        events.push(GameEvent::TurnEnded { color, next });
    }

    /// Record a game win, then either set up the next game or end the
    /// match once a majority of `format` is reached.
    fn finish_game(&mut self, winner: Color, events: &mut Vec<GameEvent>) {
        match winner {
            Color::White => self.score.white += 1,
            Color::Black => self.score.black += 1,
        }
        self.game.dice.clear();
        self.game.history.clear();

        events.push(GameEvent::GameWon {
            winner,
            score: self.score,
        });

        if self.score.for_color(winner) >= self.games_needed() {
            self.game.phase = Phase::MatchOver { winner };
            events.push(GameEvent::MatchWon {
                winner,
                score: self.score,
            });
        } else {
            self.game.board = Board::standard();
            self.game.current_player = Color::White;
            self.game.phase = Phase::AwaitingRoll;
        }
    }

    /// Defect signal: refuse to proceed on a violated board invariant.
    fn check_invariants(&self) -> Result<(), GameError> {
        self.game
            .board
            .validate()
            .map_err(GameError::CorruptState)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn format_must_be_odd() {
        assert_eq!(MatchState::new(4).unwrap_err(), GameError::InvalidFormat);
        assert_eq!(MatchState::new(0).unwrap_err(), GameError::InvalidFormat);
        assert!(MatchState::new(1).is_ok());
        assert!(MatchState::new(7).is_ok());
    }

    #[test]
    fn new_match_awaits_whites_roll() {
        let m = MatchState::new(3).unwrap();
        assert_eq!(m.game.phase, Phase::AwaitingRoll);
        assert_eq!(m.game.current_player, Color::White);
        assert_eq!(m.score(), MatchScore::default());
    }

    #[test]
    fn roll_expands_doubles() {
        let mut m = MatchState::new(3).unwrap();
        m.roll(4, 4).unwrap();
        assert_eq!(m.game.dice, vec![4, 4, 4, 4]);

        let mut m = MatchState::new(3).unwrap();
        m.roll(2, 5).unwrap();
        assert_eq!(m.game.dice, vec![2, 5]);
        assert_eq!(m.game.phase, Phase::AwaitingSelection);
    }

    #[test]
    fn roll_rejects_bad_faces_and_phase() {
        let mut m = MatchState::new(3).unwrap();
        assert_eq!(m.roll(0, 3).unwrap_err(), GameError::InvalidDie);
        assert_eq!(m.roll(3, 7).unwrap_err(), GameError::InvalidDie);
        m.roll(2, 5).unwrap();
        assert_eq!(m.roll(1, 2).unwrap_err(), GameError::RollNotExpected);
    }

    #[test]
    fn blocked_bar_roll_skips_the_turn() {
        let mut board = Board::empty();
        board.place(12, Color::White, 13);
        board.place_on_bar(Color::White, 2);
        board.place(3, Color::Black, 2);
        board.place(5, Color::Black, 2);
        board.place(20, Color::Black, 11);

        let mut m = MatchState::with_position(3, board, Color::White).unwrap();
        let events = m.roll(3, 5).unwrap();

        assert!(events.contains(&GameEvent::TurnSkipped {
            color: Color::White,
            dice: vec![3, 5],
            reason: SkipReason::BarBlocked,
        }));
        assert!(events.contains(&GameEvent::TurnEnded {
            color: Color::White,
            next: Color::Black,
        }));
        assert_eq!(m.game.current_player, Color::Black);
        assert_eq!(m.game.phase, Phase::AwaitingRoll);
        assert!(m.game.dice.is_empty());
    }

    #[test]
    fn select_requires_dice() {
        let mut m = MatchState::new(3).unwrap();
        assert_eq!(
            m.select(Slot::Point(12)).unwrap_err(),
            GameError::SelectionNotExpected
        );
    }

    #[test]
    fn select_deselect_round_trip() {
        let mut m = MatchState::new(3).unwrap();
        m.roll(3, 1).unwrap();

        let events = m.select(Slot::Point(8)).unwrap();
        assert_eq!(
            events,
            vec![GameEvent::SourceSelected {
                color: Color::White,
                source: Slot::Point(8),
            }]
        );
        assert!(!m.legal_targets().is_empty());

        let events = m.select(Slot::Point(8)).unwrap();
        assert_eq!(events, vec![GameEvent::SelectionCleared { color: Color::White }]);
        assert_eq!(m.game.phase, Phase::AwaitingSelection);
        assert!(m.legal_targets().is_empty());
    }

    #[test]
    fn rejected_selections_leave_state_unchanged() {
        let mut m = MatchState::new(3).unwrap();
        m.roll(3, 1).unwrap();
        let before = m.snapshot();

        // 14 belongs to Black, Off is not a source.
        assert_eq!(m.select(Slot::Point(14)).unwrap_err(), GameError::NotYourChecker);
        assert_eq!(m.select(Slot::Off).unwrap_err(), GameError::NotYourChecker);

        let after = m.snapshot();
        assert_eq!(before.board, after.board);
        assert_eq!(before.dice, after.dice);
        assert_eq!(before.phase, after.phase);
    }

    #[test]
    fn move_consumes_exactly_the_dice_used() {
        let mut m = MatchState::new(3).unwrap();
        m.roll(3, 1).unwrap();
        m.select(Slot::Point(8)).unwrap();

        // 8 -> 7 uses the 1.
        let events = m.select(Slot::Point(7)).unwrap();
        assert!(matches!(events[0], GameEvent::MoveApplied { .. }));
        assert_eq!(m.game.dice, vec![3]);
        assert_eq!(m.game.board.checkers_on(7, Color::White), 1);
        assert_eq!(m.game.phase, Phase::AwaitingSelection);
    }

    #[test]
    fn undo_restores_board_and_dice() {
        let mut m = MatchState::new(3).unwrap();
        m.roll(6, 2).unwrap();
        let before_board = m.game.board.clone();

        m.select(Slot::Point(1)).unwrap();
        m.select(Slot::Point(19)).unwrap();
        assert_ne!(m.game.board, before_board);

        let events = m.undo().unwrap();
        assert!(matches!(events[0], GameEvent::MoveUndone { .. }));
        assert_eq!(m.game.board, before_board);
        let mut dice = m.game.dice.clone();
        dice.sort_unstable();
        assert_eq!(dice, vec![2, 6]);

        assert_eq!(m.undo().unwrap_err(), GameError::NothingToUndo);
    }

    #[test]
    fn undo_reverses_a_hit() {
        let mut board = Board::empty();
        board.place(12, Color::White, 15);
        board.place(9, Color::Black, 1);
        board.place(20, Color::Black, 14);

        let mut m = MatchState::with_position(3, board.clone(), Color::White).unwrap();
        m.roll(3, 1).unwrap();
        m.select(Slot::Point(12)).unwrap();
        m.select(Slot::Point(9)).unwrap();
        assert_eq!(m.game.board.bar(Color::Black), 1);

        m.undo().unwrap();
        assert_eq!(m.game.board, board);
    }

    #[test]
    fn bar_entry_is_forced() {
        let mut board = Board::empty();
        board.place(12, Color::White, 14);
        board.place_on_bar(Color::White, 1);
        board.place(20, Color::Black, 15);

        let mut m = MatchState::with_position(3, board, Color::White).unwrap();
        m.roll(3, 5).unwrap();

        assert_eq!(
            m.select(Slot::Point(12)).unwrap_err(),
            GameError::MustEnterFromBar
        );
        m.select(Slot::Bar).unwrap();
        m.select(Slot::Point(3)).unwrap();
        assert_eq!(m.game.board.bar(Color::White), 0);
        assert_eq!(m.game.board.checkers_on(3, Color::White), 1);
        // Bar empty now: board sources open up for the remaining 5.
        m.select(Slot::Point(12)).unwrap();
        m.select(Slot::Point(7)).unwrap();
        assert_eq!(m.game.phase, Phase::AwaitingRoll);
    }

    #[test]
    fn bearing_off_the_last_checker_wins_the_game() {
        let mut board = Board::empty();
        board.place(1, Color::White, 1);
        board.place_off(Color::White, 14);
        board.place(19, Color::Black, 15);

        let mut m = MatchState::with_position(3, board, Color::White).unwrap();
        m.roll(1, 2).unwrap();
        m.select(Slot::Point(1)).unwrap();
        let events = m.select(Slot::Off).unwrap();

        assert!(events.contains(&GameEvent::GameWon {
            winner: Color::White,
            score: MatchScore { white: 1, black: 0 },
        }));
        // Score 1 of 3 is no majority: fresh board, White to roll.
        assert_eq!(m.game.phase, Phase::AwaitingRoll);
        assert_eq!(m.game.board, Board::standard());
        assert!(!m.is_finished());
    }

    #[test]
    fn majority_ends_the_match_and_engine_goes_inert() {
        let mut m = {
            let mut board = Board::empty();
            board.place(1, Color::White, 1);
            board.place_off(Color::White, 14);
            board.place(19, Color::Black, 15);
            MatchState::with_position(1, board, Color::White).unwrap()
        };

        m.roll(4, 2).unwrap();
        m.select(Slot::Point(1)).unwrap();
        let events = m.select(Slot::Off).unwrap();

        assert!(events.contains(&GameEvent::MatchWon {
            winner: Color::White,
            score: MatchScore { white: 1, black: 0 },
        }));
        assert!(m.is_finished());
        assert_eq!(m.winner(), Some(Color::White));
        assert_eq!(m.roll(3, 3).unwrap_err(), GameError::MatchFinished);
        assert_eq!(m.select(Slot::Point(1)).unwrap_err(), GameError::MatchFinished);
        assert_eq!(m.undo().unwrap_err(), GameError::MatchFinished);
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut m = MatchState::new(5).unwrap();
        m.roll(6, 1).unwrap();
        let snap = m.snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.board, snap.board);
        assert_eq!(back.dice, snap.dice);
        assert_eq!(back.phase, snap.phase);
    }
}
