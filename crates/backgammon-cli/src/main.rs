//! Tavla terminal driver.
//!
//! Reads commands from stdin, feeds them to the rules engine, and
//! prints the board and the events each action produced. Configuration
//! comes from the environment: `MATCH_FORMAT` (odd, default 3),
//! `DICE_SEED` for reproducible dice, and `RESULTS_FILE` to append
//! completed games and matches as JSON lines.

use std::io::{self, BufRead, Write};

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod render;
mod sink;

use backgammon_core::{
    notify_sink, DiceRoller, MatchSink, MatchState, NullSink, PlayerAction, RandomRoller, Slot,
};
use sink::JsonFileSink;

/// One parsed line of input.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Roll,
    Select(Slot),
    Undo,
    Targets,
    Board,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        "" => None,
        "roll" | "r" => Some(Command::Roll),
        "bar" => Some(Command::Select(Slot::Bar)),
        "off" => Some(Command::Select(Slot::Off)),
        "undo" | "u" => Some(Command::Undo),
        "targets" | "t" => Some(Command::Targets),
        "board" | "b" => Some(Command::Board),
        "help" | "h" | "?" => Some(Command::Help),
        "quit" | "q" => Some(Command::Quit),
        other => match other.parse::<u8>() {
            Ok(p) if (1..=24).contains(&p) => Some(Command::Select(Slot::Point(p))),
            _ => Some(Command::Help),
        },
    }
}

fn print_help() {
    println!("Commands:");
    println!("  roll        roll the dice for the current player");
    println!("  <1-24>      select a point as source or target");
    println!("  bar         select the bar as source");
    println!("  off         bear the selected checker off");
    println!("  targets     list legal targets for the selection");
    println!("  undo        take back the last move of this turn");
    println!("  board       reprint the board");
    println!("  quit        leave the match");
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let format: u8 = std::env::var("MATCH_FORMAT")
        .unwrap_or_else(|_| "3".into())
        .parse()?;
    let mut roller: Box<dyn DiceRoller> = match std::env::var("DICE_SEED") {
        Ok(seed) => Box::new(RandomRoller::with_seed(seed.parse()?)),
        Err(_) => Box::new(RandomRoller::new()),
    };
    let mut sink: Box<dyn MatchSink> = match std::env::var("RESULTS_FILE") {
        Ok(path) => {
            info!("Recording results to {}", path);
            Box::new(JsonFileSink::open(path)?)
        }
        Err(_) => Box::new(NullSink),
    };

    let mut m = MatchState::new(format)?;
    info!("Starting a first-to-{} tavla match", m.games_needed());

    println!("{}", render::board(&m));
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        let result = match command {
            Command::Roll => m.roll_with(roller.as_mut()),
            Command::Select(slot) => m.apply(PlayerAction::Select { slot }),
            Command::Undo => m.apply(PlayerAction::Undo),
            Command::Targets => {
                for option in m.legal_targets() {
                    println!("  {} using {:?}", option.target, option.dice_used);
                }
                continue;
            }
            Command::Board => {
                println!("{}", render::board(&m));
                continue;
            }
            Command::Help => {
                print_help();
                continue;
            }
            Command::Quit => break,
        };

        match result {
            Ok(events) => {
                notify_sink(&events, sink.as_mut());
                for event in &events {
                    println!("{}", render::describe(event));
                }
                println!("{}", render::board(&m));
            }
            Err(e) => println!("Rejected: {}", e),
        }

        if m.is_finished() {
            break;
        }
        print!("> ");
        io::stdout().flush()?;
    }

    Ok(())
}
