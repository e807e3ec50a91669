//! Seasonal suitability of a planting month

use std::collections::BTreeSet;

use crate::types::month_from_abbreviation;

/// Multiplier when planting inside an ideal season
pub const IN_SEASON_FACTOR: f64 = 1.0;
/// Multiplier when planting one month before or after an ideal season
pub const SHOULDER_FACTOR: f64 = 0.9;
/// Multiplier for any other month
pub const OFF_SEASON_FACTOR: f64 = 0.8;

/// Collect the months (1-12) covered by an ideal-seasons string like
/// `"Jan-Mar, Jul-Sep"` or `"Nov-Feb"`.
///
/// Blocks that are not a known abbreviation or a `Start-End` range of them
/// are skipped.
pub fn suitable_months(ideal_seasons: &str) -> BTreeSet<u32> {
    let compact: String = ideal_seasons.chars().filter(|c| !c.is_whitespace()).collect();
    let mut months = BTreeSet::new();

    for block in compact.split(',') {
        match parse_season_block(block) {
            Some((start, end)) if start <= end => months.extend(start..=end),
            // Wraps across the new year, e.g. Nov-Feb
            Some((start, end)) => {
                months.extend(start..=12);
                months.extend(1..=end);
            }
            None => {}
        }
    }

    months
}

/// Suitability multiplier for planting in `month` (1-12).
///
/// An empty string places no constraint and always scores 1.0.
pub fn season_factor(ideal_seasons: &str, month: u32) -> f64 {
    if ideal_seasons.trim().is_empty() {
        return IN_SEASON_FACTOR;
    }

    let months = suitable_months(ideal_seasons);
    if months.contains(&month) {
        IN_SEASON_FACTOR
    } else if months
        .iter()
        .any(|&m| next_month(m) == month || previous_month(m) == month)
    {
        SHOULDER_FACTOR
    } else {
        OFF_SEASON_FACTOR
    }
}

/// Parse `"Jun"` or `"Jun-Nov"` into an inclusive (start, end) month pair
fn parse_season_block(block: &str) -> Option<(u32, u32)> {
    match block.split_once('-') {
        Some((start, end)) => {
            Some((month_from_abbreviation(start)?, month_from_abbreviation(end)?))
        }
        None => month_from_abbreviation(block).map(|m| (m, m)),
    }
}

fn next_month(month: u32) -> u32 {
    month % 12 + 1
}

fn previous_month(month: u32) -> u32 {
    (month + 10) % 12 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MONTH_ABBREVIATIONS;
    use proptest::prelude::*;

    #[test]
    fn test_month_neighbours_wrap() {
        assert_eq!(next_month(12), 1);
        assert_eq!(next_month(1), 2);
        assert_eq!(previous_month(1), 12);
        assert_eq!(previous_month(12), 11);
    }

    #[test]
    fn test_simple_range() {
        let months = suitable_months("Jun-Nov");
        assert_eq!(months.into_iter().collect::<Vec<_>>(), vec![6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn test_wrapping_range() {
        let months = suitable_months("Nov-Feb");
        assert_eq!(months.into_iter().collect::<Vec<_>>(), vec![1, 2, 11, 12]);
    }

    #[test]
    fn test_multiple_blocks_and_single_months() {
        let months = suitable_months("Jan-Mar, Jul, Sep-Sep");
        assert_eq!(months.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 7, 9]);
    }

    #[test]
    fn test_unparseable_blocks_skipped() {
        let months = suitable_months("Jun-Nov, Summer, Foo-Bar, Jan-Feb-Mar, ,Dec");
        assert_eq!(
            months.into_iter().collect::<Vec<_>>(),
            vec![6, 7, 8, 9, 10, 11, 12]
        );
    }

    #[test]
    fn test_season_tiers() {
        assert_eq!(season_factor("Jun-Nov", 7), 1.0);
        assert_eq!(season_factor("Jun-Nov", 12), 0.9);
        assert_eq!(season_factor("Jun-Nov", 5), 0.9);
        assert_eq!(season_factor("Jun-Nov", 2), 0.8);
    }

    #[test]
    fn test_wrap_tiers() {
        assert_eq!(season_factor("Nov-Feb", 1), 1.0);
        assert_eq!(season_factor("Nov-Feb", 3), 0.9);
        assert_eq!(season_factor("Nov-Feb", 10), 0.9);
        assert_eq!(season_factor("Nov-Feb", 6), 0.8);
    }

    #[test]
    fn test_shoulder_across_year_end() {
        assert_eq!(season_factor("Jan", 12), 0.9);
        assert_eq!(season_factor("Dec", 1), 0.9);
    }

    #[test]
    fn test_empty_seasons_are_unconstrained() {
        assert_eq!(season_factor("", 4), 1.0);
        assert_eq!(season_factor("   ", 4), 1.0);
    }

    #[test]
    fn test_all_blocks_invalid_scores_off_season() {
        assert_eq!(season_factor("rainy season", 4), 0.8);
    }

    #[test]
    fn test_whole_year() {
        for month in 1..=12 {
            assert_eq!(season_factor("Jan-Dec", month), 1.0);
        }
    }

    proptest! {
        #[test]
        fn prop_factor_is_one_of_three_tiers(month in 1u32..=12, start in 0usize..12, end in 0usize..12) {
            let seasons = format!(
                "{}-{}",
                MONTH_ABBREVIATIONS[start],
                MONTH_ABBREVIATIONS[end]
            );
            let factor = season_factor(&seasons, month);
            prop_assert!(factor == 1.0 || factor == 0.9 || factor == 0.8);
            prop_assert_eq!(factor == 1.0, suitable_months(&seasons).contains(&month));
        }
    }
}
