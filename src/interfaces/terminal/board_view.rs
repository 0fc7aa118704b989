use crate::domain::board::{Board, GameSquare};
use crate::domain::session::{GameSession, SessionStatus};
use rand::Rng;
use std::collections::HashMap;
use std::fmt::Write;

/// Spreadsheet-style column name: A..Z, then AA, AB and so on.
fn category_label(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Draws the board of a running session, or nothing when there is none.
pub fn render_session<R: Rng>(session: &GameSession<R>) -> String {
    match session.board() {
        Some(board) => render_board(
            board,
            session.selected().map(|s| s.unique_key.as_str()),
            |square| session.is_paired(square),
        ),
        None => String::new(),
    }
}

/// Draws the board row by row. Each category gets a label in order of first
/// appearance, the selected square is bracketed and paired squares are dots.
pub fn render_board<F>(board: &Board, selected: Option<&str>, is_paired: F) -> String
where
    F: Fn(&GameSquare) -> bool,
{
    let mut labels: HashMap<&str, String> = HashMap::new();
    for square in board.squares() {
        let next = category_label(labels.len());
        labels.entry(square.category_id.as_str()).or_insert(next);
    }
    let inner = labels.values().map(String::len).max().unwrap_or(1);
    let width = inner + 2;

    let mut out = String::from("   ");
    for col in 0..board.config.width {
        let _ = write!(out, "{col:^width$}");
    }
    out.push('\n');

    for row in 0..board.config.height {
        let _ = write!(out, "{row:>2} ");
        for col in 0..board.config.width {
            let Some(square) = board.square(col, row) else {
                continue;
            };
            let label = &labels[square.category_id.as_str()];
            let _ = if is_paired(square) {
                write!(out, "{:^width$}", ".")
            } else if selected == Some(square.unique_key.as_str()) {
                write!(out, "[{label:^inner$}]")
            } else {
                write!(out, "{label:^width$}")
            };
        }
        out.push('\n');
    }
    out
}

/// One-line summary of level, points, time and squares left.
pub fn render_status<R: Rng>(session: &GameSession<R>) -> String {
    match session.status() {
        SessionStatus::Idle => "Type `new` to start a game.".to_string(),
        SessionStatus::Won => format!("You Win! Total Points: {}", session.points()),
        SessionStatus::TimedOut => format!("Time is up! Total Points: {}", session.points()),
        SessionStatus::Playing => format!(
            "Level: {}  Points: {}  Remaining Time: {}  Remaining Squares: {}",
            session.level(),
            session.points(),
            session.remaining_ms().div_ceil(1000),
            session.remaining_squares()
        ),
    }
}
