use playtime::domain::board::{Board, GameSquare, GridConfig, is_valid_pair};
use playtime::domain::level::{next_grid_config, points_per_pair, time_bonus, time_for_level};
use playtime::domain::session::{GameSession, SelectOutcome, SessionStatus};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_decimal::RoundingStrategy;
use rust_decimal::prelude::ToPrimitive;

fn pairs(board: &Board) -> Vec<(GameSquare, GameSquare)> {
    let mut open: Vec<&GameSquare> = Vec::new();
    let mut result = Vec::new();
    for square in board.squares() {
        match open.iter().position(|s| is_valid_pair(s, square)) {
            Some(pos) => result.push((open.remove(pos).clone(), square.clone())),
            None => open.push(square),
        }
    }
    result
}

#[test]
fn test_level_one_to_two() {
    let mut session = GameSession::new(StdRng::seed_from_u64(2024));
    session.start().unwrap();
    assert_eq!(session.board().unwrap().config, GridConfig::new(2, 2, 2));

    let board = session.board().unwrap().clone();
    let pairs = pairs(&board);
    assert_eq!(pairs.len(), 2);

    let (a, b) = &pairs[0];
    session.select(a.col, a.row).unwrap();
    assert_eq!(
        session.select(b.col, b.row).unwrap(),
        SelectOutcome::Matched {
            points: points_per_pair(1)
        }
    );

    let remaining = session.remaining_ms();
    let expected = 2 * points_per_pair(1)
        + time_bonus(remaining)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u64()
            .unwrap();

    let (a, b) = &pairs[1];
    session.select(a.col, a.row).unwrap();
    assert_eq!(
        session.select(b.col, b.row).unwrap(),
        SelectOutcome::LevelCleared {
            points: expected,
            next_level: 2
        }
    );

    assert_eq!(session.status(), SessionStatus::Playing);
    assert_eq!(session.level(), 2);
    assert_eq!(next_grid_config(2), GridConfig::new(2, 3, 3));
    assert_eq!(session.board().unwrap().config, next_grid_config(2));
    assert_eq!(session.remaining_ms(), time_for_level(2));
    assert_eq!(session.remaining_squares(), 6);
    assert!(session.selected().is_none());
}

#[test]
fn test_mismatch_has_no_penalty() {
    let mut session = GameSession::new(StdRng::seed_from_u64(77));
    session.start().unwrap();
    let board = session.board().unwrap().clone();

    let first = board.square(0, 0).unwrap();
    let other = board
        .squares()
        .find(|s| s.category_id != first.category_id)
        .unwrap();

    session.select(first.col, first.row).unwrap();
    assert_eq!(
        session.select(other.col, other.row).unwrap(),
        SelectOutcome::Reselected
    );
    assert_eq!(session.points(), 0);
    assert_eq!(session.remaining_squares(), 4);
}
