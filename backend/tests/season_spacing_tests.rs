//! Tests for seasonal suitability, spacing parsing and planting validation

use proptest::prelude::*;
use shared::{
    parse_spacing, plants_per_hectare, season_factor, suitable_months, validate_ideal_seasons,
    validate_spacing, IN_SEASON_FACTOR, OFF_SEASON_FACTOR, SHOULDER_FACTOR,
};

// =============================================================================
// Seasonal suitability
// =============================================================================

mod seasons {
    use super::*;

    #[test]
    fn rice_has_two_windows() {
        let months = suitable_months("Jun-Nov, Dec-Apr");
        assert_eq!(months.len(), 11);
        assert!(!months.contains(&5));
        // May sits next to both windows
        assert_eq!(season_factor("Jun-Nov, Dec-Apr", 5), SHOULDER_FACTOR);
    }

    #[test]
    fn wrapping_block_covers_the_new_year() {
        for month in [11, 12, 1, 2] {
            assert_eq!(season_factor("Nov-Feb", month), IN_SEASON_FACTOR);
        }
        assert_eq!(season_factor("Nov-Feb", 10), SHOULDER_FACTOR);
        assert_eq!(season_factor("Nov-Feb", 3), SHOULDER_FACTOR);
        assert_eq!(season_factor("Nov-Feb", 6), OFF_SEASON_FACTOR);
    }

    #[test]
    fn single_month_block() {
        assert_eq!(season_factor("Mar", 3), IN_SEASON_FACTOR);
        assert_eq!(season_factor("Mar", 4), SHOULDER_FACTOR);
        assert_eq!(season_factor("Mar", 9), OFF_SEASON_FACTOR);
    }

    #[test]
    fn empty_seasons_are_neutral() {
        assert_eq!(season_factor("", 8), IN_SEASON_FACTOR);
        assert_eq!(season_factor("   ", 8), IN_SEASON_FACTOR);
    }

    #[test]
    fn unparseable_seasons_are_off_season() {
        assert_eq!(season_factor("Rainy season", 8), OFF_SEASON_FACTOR);
        assert!(validate_ideal_seasons("Rainy season").is_err());
        assert!(validate_ideal_seasons("Jun-Nov, Dec-Apr").is_ok());
    }

    #[test]
    fn bad_blocks_are_skipped() {
        assert_eq!(season_factor("Foo-Bar, Jul-Sep", 8), IN_SEASON_FACTOR);
    }
}

// =============================================================================
// Spacing
// =============================================================================

mod spacing {
    use super::*;

    #[test]
    fn corn_rows_and_hills() {
        let density = plants_per_hectare(&parse_spacing("75x25 cm").unwrap()).unwrap();
        assert!((density - 53_333.333_333).abs() < 1e-3);
    }

    #[test]
    fn banana_spacing() {
        let density = plants_per_hectare(&parse_spacing("3x3 m").unwrap()).unwrap();
        assert!((density - 1111.111_111).abs() < 1e-3);
    }

    #[test]
    fn validation_matches_parser() {
        assert!(validate_spacing("20x20 cm").is_ok());
        assert!(validate_spacing("10 x 10 m").is_ok());
        assert!(validate_spacing("0x10 m").is_err());
        assert!(validate_spacing("ten by ten").is_err());
    }
}

proptest! {
    #[test]
    fn every_month_gets_a_known_tier(seasons in "[A-Za-z, -]{0,24}", month in 1u32..=12) {
        let factor = season_factor(&seasons, month);
        prop_assert!(
            factor == IN_SEASON_FACTOR || factor == SHOULDER_FACTOR || factor == OFF_SEASON_FACTOR
        );
    }

    #[test]
    fn full_year_is_always_in_season(month in 1u32..=12) {
        prop_assert_eq!(season_factor("Jan-Dec", month), IN_SEASON_FACTOR);
    }

    #[test]
    fn spacing_in_meters_and_centimeters_agree(row in 1u32..500, hill in 1u32..500) {
        let cm = parse_spacing(&format!("{}x{} cm", row, hill)).unwrap();
        let m = parse_spacing(&format!("{}x{} m", row as f64 / 100.0, hill as f64 / 100.0)).unwrap();
        prop_assert!((cm.row_m - m.row_m).abs() < 1e-9);
        prop_assert!((cm.hill_m - m.hill_m).abs() < 1e-9);
    }
}
