/// Hue step between consecutive categories. Coprime with 360, so every run
/// of 360 indices lands on 360 different hues.
const HUE_STEP: usize = 137;
const HUES: usize = 360;

/// Lightness of each successive run of 360 hues.
const LIGHTNESS: [u8; 5] = [55, 40, 70, 30, 80];

/// Number of categories that get distinct colours.
pub const PALETTE_SIZE: usize = HUES * LIGHTNESS.len();

/// Returns a stable colour identifier for the category at `index`.
/// Distinct for every index below `PALETTE_SIZE`.
pub fn unique_color(index: usize) -> String {
    let hue = (index % HUES * HUE_STEP) % HUES;
    let lightness = LIGHTNESS[index / HUES % LIGHTNESS.len()];
    format!("hsl({hue}, 70%, {lightness}%)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_unique_color_is_stable() {
        assert_eq!(unique_color(0), "hsl(0, 70%, 55%)");
        assert_eq!(unique_color(1), "hsl(137, 70%, 55%)");
        assert_eq!(unique_color(3), unique_color(3));
    }

    #[test]
    fn test_unique_color_distinct_across_palette() {
        let colors: HashSet<String> = (0..PALETTE_SIZE).map(unique_color).collect();
        assert_eq!(colors.len(), PALETTE_SIZE);
        assert_eq!(unique_color(360), "hsl(0, 70%, 40%)");
    }
}
