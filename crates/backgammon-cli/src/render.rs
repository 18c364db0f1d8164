//! Plain-text board and event rendering.

use backgammon_core::{Board, Color, GameEvent, MatchState, Phase, SkipReason};

fn cell(board: &Board, point: u8) -> String {
    match board.point(point) {
        Some(stack) => {
            let letter = match stack.color {
                Color::White => 'W',
                Color::Black => 'B',
            };
            format!("{}{}", letter, stack.count)
        }
        None => ".".to_string(),
    }
}

fn row(board: &Board, points: impl Iterator<Item = u8>) -> String {
    points.map(|p| format!("{:>4}", cell(board, p))).collect()
}

fn side_line(board: &Board, color: Color) -> String {
    format!(
        "{}: bar {}, off {}, pips {}",
        color,
        board.bar(color),
        board.home(color),
        board.pip_count(color)
    )
}

/// Render the whole match to a multi-line string: the 24 points in two
/// rows, both side tallies, the score, and what the engine is waiting
/// for.
pub fn board(m: &MatchState) -> String {
    let board = &m.game.board;
    let score = m.score();

    let mut out = String::new();
    out.push_str(&(13..=24).map(|p| format!("{:>4}", p)).collect::<String>());
    out.push('\n');
    out.push_str(&row(board, 13..=24));
    out.push('\n');
    out.push_str(&row(board, (1..=12).rev()));
    out.push('\n');
    out.push_str(&(1..=12).rev().map(|p| format!("{:>4}", p)).collect::<String>());
    out.push('\n');
    out.push_str(&side_line(board, Color::White));
    out.push('\n');
    out.push_str(&side_line(board, Color::Black));
    out.push('\n');
    out.push_str(&format!(
        "Score: White {} - Black {} (first to {})\n",
        score.white,
        score.black,
        m.games_needed()
    ));

    match &m.game.phase {
        Phase::AwaitingRoll => {
            out.push_str(&format!("{} to roll.", m.game.current_player));
        }
        Phase::AwaitingSelection => {
            out.push_str(&format!(
                "{} to move, dice {:?}. Pick a source.",
                m.game.current_player, m.game.dice
            ));
        }
        Phase::SourceSelected { source } => {
            out.push_str(&format!(
                "{} moving from {}, dice {:?}. Pick a target.",
                m.game.current_player, source, m.game.dice
            ));
        }
        Phase::MatchOver { winner } => {
            out.push_str(&format!("Match over. {} wins.", winner));
        }
    }
    out
}

/// One human-readable line per event.
pub fn describe(event: &GameEvent) -> String {
    match event {
        GameEvent::DiceRolled { color, roll } => {
            format!("{} rolled {}-{}.", color, roll.0, roll.1)
        }
        GameEvent::TurnSkipped { color, dice, reason } => {
            let why = match reason {
                SkipReason::BarBlocked => "cannot enter from the bar",
                SkipReason::NoLegalMoves => "has no legal move",
            };
            format!("{} {} with {:?}; turn skipped.", color, why, dice)
        }
        GameEvent::SourceSelected { color, source } => {
            format!("{} selected {}.", color, source)
        }
        GameEvent::SelectionCleared { color } => {
            format!("{} cleared the selection.", color)
        }
        GameEvent::MoveApplied { record } => {
            let hit = if record.hit_opponent() { " (hit)" } else { "" };
            format!(
                "{} moved {} -> {} using {:?}{}.",
                record.color, record.from, record.to, record.dice_used, hit
            )
        }
        GameEvent::MoveUndone { record } => {
            format!(
                "{} took back {} -> {}.",
                record.color, record.from, record.to
            )
        }
        GameEvent::TurnEnded { color, next } => {
            format!("{} finished; {} to roll.", color, next)
        }
        GameEvent::GameWon { winner, score } => {
            format!(
                "{} wins the game. Score: White {} - Black {}.",
                winner, score.white, score.black
            )
        }
        GameEvent::MatchWon { winner, score } => {
            format!(
                "{} wins the match {} - {}.",
                winner,
                score.for_color(*winner),
                score.for_color(winner.opponent())
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_board_renders_both_tallies() {
        let m = MatchState::new(3).unwrap();
        let text = board(&m);
        assert!(text.contains("White: bar 0, off 0, pips 82"));
        assert!(text.contains("Black: bar 0, off 0, pips 82"));
        assert!(text.contains("White to roll."));
    }

    #[test]
    fn events_describe_the_actor() {
        let line = describe(&GameEvent::DiceRolled {
            color: Color::Black,
            roll: (6, 2),
        });
        assert_eq!(line, "Black rolled 6-2.");
    }
}
