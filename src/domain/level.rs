use crate::domain::board::GridConfig;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

pub const INITIAL_GRID_CONFIG: GridConfig = GridConfig::new(2, 2, 2);
pub const MAX_LEVEL: u32 = 6;
pub const MAX_OPTIONS: usize = 12;

pub const POINTS_PER_MATCH_BASE: Decimal = dec!(10);
pub const POINTS_LEVEL_MODIFIER: Decimal = dec!(0.1);
pub const POINTS_PER_REMAINING_SECOND: Decimal = dec!(0.25);

/// 15 seconds.
pub const TIME_LEVEL_BASE_MS: Decimal = dec!(15000);
pub const TIME_LEVEL_MODIFIER: Decimal = dec!(1.5);

pub const TICK_MS: u64 = 1000;

/// Board configuration for `level`, starting from the initial 2x2 board.
///
/// Each level grows the smaller side by one unless that would leave an odd
/// number of squares, in which case the larger side grows. Ties grow the
/// height. The option count rises by one per level up to `MAX_OPTIONS`.
pub fn next_grid_config(level: u32) -> GridConfig {
    let mut config = INITIAL_GRID_CONFIG;
    for _ in 1..level {
        let width_is_lower = config.width < config.height;
        let (lower, higher) = if width_is_lower {
            (config.width, config.height)
        } else {
            (config.height, config.width)
        };

        let grow_lower = ((lower + 1) * higher) % 2 == 0;
        match (grow_lower, width_is_lower) {
            (true, true) | (false, false) => config.width += 1,
            (true, false) | (false, true) => config.height += 1,
        }

        if config.option_count < MAX_OPTIONS {
            config.option_count += 1;
        }
    }
    config
}

fn level_factor(modifier: Decimal, level: u32) -> Decimal {
    Decimal::ONE + modifier * Decimal::from(level.saturating_sub(1))
}

pub fn points_per_pair(level: u32) -> u64 {
    (POINTS_PER_MATCH_BASE * level_factor(POINTS_LEVEL_MODIFIER, level))
        .ceil()
        .to_u64()
        .unwrap_or_default()
}

/// Countdown budget for `level`, in milliseconds.
pub fn time_for_level(level: u32) -> u64 {
    (TIME_LEVEL_BASE_MS * level_factor(TIME_LEVEL_MODIFIER, level))
        .ceil()
        .to_u64()
        .unwrap_or_default()
}

/// Points awarded for the time left when a level is cleared.
pub fn time_bonus(remaining_ms: u64) -> Decimal {
    Decimal::from(remaining_ms) / dec!(1000) * POINTS_PER_REMAINING_SECOND
}
