use crate::domain::board::{Board, GameSquare, generate_board, is_valid_pair};
use crate::domain::level::{
    MAX_LEVEL, TICK_MS, next_grid_config, points_per_pair, time_bonus, time_for_level,
};
use crate::error::{Result, ToolError};
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Playing,
    Won,
    TimedOut,
}

/// What happened when a square was clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Nothing was selected before; this square is now selected.
    Selected,
    /// Same square again, or a square that is already paired.
    Ignored,
    /// Not a pair with the previous selection; selection moved here.
    Reselected,
    Matched { points: u64 },
    LevelCleared { points: u64, next_level: u32 },
    Won { points: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running { remaining_ms: u64 },
    TimedOut,
    Stopped,
}

/// One play-through of the matching game.
///
/// Owns its random source so that a seeded session replays the same boards.
pub struct GameSession<R: Rng> {
    rng: R,
    status: SessionStatus,
    level: u32,
    points: u64,
    board: Option<Board>,
    paired: HashSet<String>,
    selected: Option<GameSquare>,
    remaining_ms: u64,
}

impl<R: Rng> GameSession<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            status: SessionStatus::Idle,
            level: 1,
            points: 0,
            board: None,
            paired: HashSet::new(),
            selected: None,
            remaining_ms: 0,
        }
    }

    /// Starts over at level 1 with zero points.
    pub fn start(&mut self) -> Result<()> {
        self.points = 0;
        self.load_level(1)?;
        self.status = SessionStatus::Playing;
        tracing::info!("new game started");
        Ok(())
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn selected(&self) -> Option<&GameSquare> {
        self.selected.as_ref()
    }

    pub fn is_paired(&self, square: &GameSquare) -> bool {
        self.paired.contains(&square.unique_key)
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn remaining_squares(&self) -> usize {
        self.board
            .as_ref()
            .map(|board| board.config.square_count() - self.paired.len())
            .unwrap_or(0)
    }

    /// Handles a click on the square at (`col`, `row`).
    pub fn select(&mut self, col: usize, row: usize) -> Result<SelectOutcome> {
        if self.status != SessionStatus::Playing {
            return Err(ToolError::NotPlaying);
        }
        let board = self.board.as_ref().ok_or(ToolError::NotPlaying)?;
        let square = board
            .square(col, row)
            .ok_or(ToolError::OutOfBounds { col, row })?
            .clone();

        if self.paired.contains(&square.unique_key) {
            return Ok(SelectOutcome::Ignored);
        }

        let Some(previous) = self.selected.take() else {
            self.selected = Some(square);
            return Ok(SelectOutcome::Selected);
        };

        if previous.unique_key == square.unique_key {
            self.selected = Some(previous);
            return Ok(SelectOutcome::Ignored);
        }

        if !is_valid_pair(&previous, &square) {
            self.selected = Some(square);
            return Ok(SelectOutcome::Reselected);
        }

        self.paired.insert(previous.unique_key);
        self.paired.insert(square.unique_key);

        let end_of_level = self.paired.len() == board.config.square_count();
        let mut total = Decimal::from(self.points) + Decimal::from(points_per_pair(self.level));
        if end_of_level {
            total += time_bonus(self.remaining_ms);
        }
        self.points = total
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u64()
            .unwrap_or(self.points);

        if !end_of_level {
            return Ok(SelectOutcome::Matched {
                points: self.points,
            });
        }

        if self.level >= MAX_LEVEL {
            self.finish(SessionStatus::Won);
            return Ok(SelectOutcome::Won {
                points: self.points,
            });
        }

        let next_level = self.level + 1;
        self.load_level(next_level)?;
        tracing::info!(level = next_level, points = self.points, "level cleared");
        Ok(SelectOutcome::LevelCleared {
            points: self.points,
            next_level,
        })
    }

    /// Advances the countdown by one tick.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != SessionStatus::Playing {
            return TickOutcome::Stopped;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(TICK_MS);
        if self.remaining_ms == 0 {
            self.finish(SessionStatus::TimedOut);
            return TickOutcome::TimedOut;
        }
        TickOutcome::Running {
            remaining_ms: self.remaining_ms,
        }
    }

    fn load_level(&mut self, level: u32) -> Result<()> {
        let board = generate_board(next_grid_config(level), &mut self.rng)?;
        self.level = level;
        self.board = Some(board);
        self.paired.clear();
        self.selected = None;
        self.remaining_ms = time_for_level(level);
        Ok(())
    }

    fn finish(&mut self, status: SessionStatus) {
        tracing::info!(?status, level = self.level, points = self.points, "game over");
        self.status = status;
        self.board = None;
        self.paired.clear();
        self.selected = None;
        self.remaining_ms = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::board::Board;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Coordinates of every pair on the board, grouped by category.
    fn pairs(board: &Board) -> Vec<((usize, usize), (usize, usize))> {
        let mut open: Vec<&GameSquare> = Vec::new();
        let mut result = Vec::new();
        for square in board.squares() {
            if let Some(pos) = open.iter().position(|s| is_valid_pair(s, square)) {
                let other = open.remove(pos);
                result.push(((other.col, other.row), (square.col, square.row)));
            } else {
                open.push(square);
            }
        }
        result
    }

    fn mismatch(board: &Board) -> Option<((usize, usize), (usize, usize))> {
        let first = board.square(0, 0)?;
        board
            .squares()
            .find(|s| s.category_id != first.category_id)
            .map(|s| ((0, 0), (s.col, s.row)))
    }

    fn clear_level(session: &mut GameSession<StdRng>) -> SelectOutcome {
        let board = session.board().unwrap().clone();
        let mut last = SelectOutcome::Ignored;
        for ((c1, r1), (c2, r2)) in pairs(&board) {
            assert_eq!(session.select(c1, r1).unwrap(), SelectOutcome::Selected);
            last = session.select(c2, r2).unwrap();
        }
        last
    }

    #[test]
    fn test_select_before_start_fails() {
        let mut session = GameSession::new(StdRng::seed_from_u64(1));
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(matches!(session.select(0, 0), Err(ToolError::NotPlaying)));
    }

    #[test]
    fn test_start_loads_level_one() {
        let mut session = GameSession::new(StdRng::seed_from_u64(1));
        session.start().unwrap();
        assert_eq!(session.status(), SessionStatus::Playing);
        assert_eq!(session.level(), 1);
        assert_eq!(session.remaining_ms(), 15_000);
        assert_eq!(session.remaining_squares(), 4);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut session = GameSession::new(StdRng::seed_from_u64(1));
        session.start().unwrap();
        assert!(matches!(
            session.select(5, 0),
            Err(ToolError::OutOfBounds { col: 5, row: 0 })
        ));
    }

    #[test]
    fn test_same_square_twice_is_ignored() {
        let mut session = GameSession::new(StdRng::seed_from_u64(1));
        session.start().unwrap();
        session.select(0, 0).unwrap();
        assert_eq!(session.select(0, 0).unwrap(), SelectOutcome::Ignored);
        assert_eq!(session.selected().unwrap().unique_key, "0_0");
    }

    #[test]
    fn test_mismatch_moves_selection() {
        // Search for a seed whose first board has two categories in different places.
        for seed in 0..50 {
            let mut session = GameSession::new(StdRng::seed_from_u64(seed));
            session.start().unwrap();
            let Some(((c1, r1), (c2, r2))) = mismatch(session.board().unwrap()) else {
                continue;
            };
            session.select(c1, r1).unwrap();
            assert_eq!(session.select(c2, r2).unwrap(), SelectOutcome::Reselected);
            assert_eq!(session.selected().unwrap().unique_key, format!("{c2}_{r2}"));
            assert_eq!(session.points(), 0);
            return;
        }
        panic!("no seed produced a mismatch");
    }

    #[test]
    fn test_paired_square_cannot_be_selected() {
        let mut session = GameSession::new(StdRng::seed_from_u64(2));
        session.start().unwrap();
        let board = session.board().unwrap().clone();
        let ((c1, r1), (c2, r2)) = pairs(&board)[0];
        session.select(c1, r1).unwrap();
        assert_eq!(
            session.select(c2, r2).unwrap(),
            SelectOutcome::Matched { points: 10 }
        );
        assert_eq!(session.select(c1, r1).unwrap(), SelectOutcome::Ignored);
        assert!(session.selected().is_none());
        assert_eq!(session.remaining_squares(), 2);
    }

    #[test]
    fn test_clearing_level_one_advances() {
        let mut session = GameSession::new(StdRng::seed_from_u64(3));
        session.start().unwrap();
        session.tick();
        session.tick();

        let outcome = clear_level(&mut session);
        // 2 pairs at 10 points plus 13 seconds at 0.25 points.
        assert_eq!(
            outcome,
            SelectOutcome::LevelCleared {
                points: 23,
                next_level: 2
            }
        );
        assert_eq!(session.level(), 2);
        assert_eq!(session.board().unwrap().config, next_grid_config(2));
        assert_eq!(session.remaining_ms(), time_for_level(2));
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_clearing_last_level_wins() {
        let mut session = GameSession::new(StdRng::seed_from_u64(4));
        session.start().unwrap();
        for _ in 1..MAX_LEVEL {
            assert!(matches!(
                clear_level(&mut session),
                SelectOutcome::LevelCleared { .. }
            ));
        }
        assert!(matches!(clear_level(&mut session), SelectOutcome::Won { .. }));
        assert_eq!(session.status(), SessionStatus::Won);
        assert!(session.board().is_none());
        assert_eq!(session.tick(), TickOutcome::Stopped);
    }

    #[test]
    fn test_countdown_times_out() {
        let mut session = GameSession::new(StdRng::seed_from_u64(5));
        session.start().unwrap();
        for _ in 0..14 {
            assert!(matches!(session.tick(), TickOutcome::Running { .. }));
        }
        assert_eq!(session.tick(), TickOutcome::TimedOut);
        assert_eq!(session.status(), SessionStatus::TimedOut);
        assert!(session.board().is_none());
        assert!(matches!(session.select(0, 0), Err(ToolError::NotPlaying)));
    }

    #[test]
    fn test_restart_after_timeout() {
        let mut session = GameSession::new(StdRng::seed_from_u64(6));
        session.start().unwrap();
        while session.tick() != TickOutcome::TimedOut {}
        session.start().unwrap();
        assert_eq!(session.status(), SessionStatus::Playing);
        assert_eq!(session.points(), 0);
        assert_eq!(session.level(), 1);
    }
}
