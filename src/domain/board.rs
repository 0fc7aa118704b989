use crate::domain::palette::{PALETTE_SIZE, unique_color};
use crate::error::{Result, ToolError};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Shape of a board and the number of distinct pairing categories on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    pub option_count: usize,
}

impl GridConfig {
    pub const fn new(width: usize, height: usize, option_count: usize) -> Self {
        Self {
            width,
            height,
            option_count,
        }
    }

    pub fn square_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    pub fn total_pairs(&self) -> usize {
        self.square_count() / 2
    }

    /// Checks that the board splits into pairs and has room for every category.
    pub fn validate(&self) -> Result<()> {
        let Some(squares) = self.width.checked_mul(self.height) else {
            return Err(ToolError::InvalidGrid(format!(
                "grid {}x{} is too large",
                self.width, self.height
            )));
        };
        if squares % 2 == 1 {
            return Err(ToolError::InvalidGrid(format!(
                "grid must have an even number of squares, got {}x{}",
                self.width, self.height
            )));
        }
        if self.option_count == 0 {
            return Err(ToolError::InvalidGrid(
                "option count must be at least 1".to_string(),
            ));
        }
        if self.option_count > squares / 2 {
            return Err(ToolError::InvalidGrid(format!(
                "option count {} greater than number of pairs {}",
                self.option_count,
                squares / 2
            )));
        }
        if self.option_count > PALETTE_SIZE {
            return Err(ToolError::InvalidGrid(format!(
                "option count {} exceeds the {PALETTE_SIZE} distinct categories available",
                self.option_count
            )));
        }
        Ok(())
    }
}

/// Key used to track selected and paired squares.
pub fn square_key(col: usize, row: usize) -> String {
    format!("{col}_{row}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSquare {
    pub col: usize,
    pub row: usize,
    pub category_id: String,
    pub unique_key: String,
}

impl GameSquare {
    pub fn new(col: usize, row: usize, category_id: String) -> Self {
        Self {
            col,
            row,
            category_id,
            unique_key: square_key(col, row),
        }
    }
}

/// Two squares pair up when they share a category and are not the same square.
pub fn is_valid_pair(a: &GameSquare, b: &GameSquare) -> bool {
    a.category_id == b.category_id && a.unique_key != b.unique_key
}

/// A fully assigned board. The grid is column-major: `grid[col][row]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub config: GridConfig,
    pub grid: Vec<Vec<GameSquare>>,
}

impl Board {
    pub fn square(&self, col: usize, row: usize) -> Option<&GameSquare> {
        self.grid.get(col).and_then(|column| column.get(row))
    }

    pub fn squares(&self) -> impl Iterator<Item = &GameSquare> {
        self.grid.iter().flatten()
    }
}

/// Generates a board for `config`, drawing every random choice from `rng`.
///
/// Each of the first `option_count` categories receives one pair; the
/// remaining pairs are handed to randomly chosen categories. Cells are then
/// filled column by column from the categories that still have slots left,
/// so every category ends up on an even number of squares.
pub fn generate_board<R: Rng + ?Sized>(config: GridConfig, rng: &mut R) -> Result<Board> {
    config.validate()?;

    let total_pairs = config.total_pairs();
    let mut remaining = vec![2usize; config.option_count];
    for _ in config.option_count..total_pairs {
        let index = rng.gen_range(0..config.option_count);
        remaining[index] += 2;
    }

    let colors: Vec<String> = (0..config.option_count).map(unique_color).collect();
    let mut eligible: Vec<usize> = (0..config.option_count).collect();

    let mut grid = Vec::with_capacity(config.width);
    for col in 0..config.width {
        let mut column = Vec::with_capacity(config.height);
        for row in 0..config.height {
            let pick = rng.gen_range(0..eligible.len());
            let category = eligible[pick];
            column.push(GameSquare::new(col, row, colors[category].clone()));

            remaining[category] -= 1;
            if remaining[category] == 0 {
                eligible.remove(pick);
            }
        }
        grid.push(column);
    }

    tracing::debug!(
        width = config.width,
        height = config.height,
        options = config.option_count,
        "generated board"
    );

    Ok(Board { config, grid })
}
