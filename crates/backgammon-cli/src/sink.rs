//! Durable match results, one JSON line per completion.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use backgammon_core::{Color, MatchScore, MatchSink};
use serde_json::json;
use tracing::warn;

/// Appends game and match completions to a JSON-lines file. Storage
/// failures are logged and swallowed so the engine never sees them.
pub struct JsonFileSink {
    file: File,
}

impl JsonFileSink {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self { file })
    }

    fn write_line(&mut self, value: serde_json::Value) {
        if let Err(e) = writeln!(self.file, "{}", value) {
            warn!("Failed to record result: {}", e);
        }
    }
}

impl MatchSink for JsonFileSink {
    fn on_game_won(&mut self, winner: Color, score: &MatchScore) {
        self.write_line(json!({
            "event": "game_won",
            "winner": winner,
            "white": score.white,
            "black": score.black,
        }));
    }

    fn on_match_won(&mut self, winner: Color, final_score: &MatchScore) {
        self.write_line(json!({
            "event": "match_won",
            "winner": winner,
            "white": final_score.white,
            "black": final_score.black,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_appends_one_line_per_completion() {
        let path = std::env::temp_dir().join(format!(
            "tavla-results-{}.jsonl",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let score = MatchScore { white: 2, black: 1 };
        let mut sink = JsonFileSink::open(&path).unwrap();
        sink.on_game_won(Color::White, &score);
        sink.on_match_won(Color::White, &score);
        drop(sink);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "game_won");
        assert_eq!(first["winner"], "White");
        assert_eq!(first["white"], 2);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["event"], "match_won");

        let _ = std::fs::remove_file(&path);
    }
}
