use crate::domain::session::{GameSession, SelectOutcome, TickOutcome};
use crate::error::Result;
use crate::interfaces::terminal::board_view::{render_session, render_status};
use rand::Rng;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::{Instant, sleep_until};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Select { col: usize, row: usize },
    New,
    Status,
    Quit,
}

pub fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let first = parts.next()?;
    let command = match first.to_ascii_lowercase().as_str() {
        "new" => Command::New,
        "status" => Command::Status,
        "quit" | "exit" => Command::Quit,
        _ => {
            let col = first.parse().ok()?;
            let row = parts.next()?.parse().ok()?;
            Command::Select { col, row }
        }
    };
    if parts.next().is_some() {
        return None;
    }
    Some(command)
}

const HELP: &str = "Commands: `<col> <row>` to pick a square, `new`, `status`, `quit`.";

/// Plays the game on a line-oriented terminal.
///
/// Input lines and countdown ticks are handled as they arrive; the countdown
/// stops when the input ends or `quit` is read.
pub async fn run<R, I, W>(
    session: &mut GameSession<R>,
    input: I,
    output: &mut W,
    tick: Duration,
) -> Result<()>
where
    R: Rng,
    I: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut next_tick = Instant::now() + tick;

    writeln!(output, "{HELP}")?;
    writeln!(output, "{}", render_status(session))?;

    loop {
        tokio::select! {
            _ = sleep_until(next_tick) => {
                next_tick = Instant::now() + tick;
                if session.tick() == TickOutcome::TimedOut {
                    writeln!(output, "{}", render_status(session))?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Some(Command::Quit) => break,
                    Some(Command::Status) => {
                        writeln!(output, "{}", render_status(session))?;
                    }
                    Some(Command::New) => {
                        session.start()?;
                        next_tick = Instant::now() + tick;
                        write!(output, "{}", render_session(session))?;
                        writeln!(output, "{}", render_status(session))?;
                    }
                    Some(Command::Select { col, row }) => match session.select(col, row) {
                        Ok(outcome) => {
                            match outcome {
                                SelectOutcome::Matched { points } => {
                                    writeln!(output, "Match! Points: {points}")?;
                                }
                                SelectOutcome::LevelCleared { next_level, .. } => {
                                    writeln!(output, "Level cleared! On to level {next_level}.")?;
                                }
                                SelectOutcome::Reselected => writeln!(output, "No match.")?,
                                SelectOutcome::Won { .. } => {}
                                SelectOutcome::Selected | SelectOutcome::Ignored => {}
                            }
                            write!(output, "{}", render_session(session))?;
                            writeln!(output, "{}", render_status(session))?;
                        }
                        Err(e) => writeln!(output, "{e}")?,
                    },
                    None => writeln!(output, "{HELP}")?,
                }
            }
        }
        output.flush()?;
    }
    Ok(())
}
