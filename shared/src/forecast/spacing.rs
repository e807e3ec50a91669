//! Planting spacing parsing and density

use crate::types::Spacing;

/// Square meters in one hectare
pub const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// Parse a row x hill spacing such as `"20x20 cm"`, `"10 X 10m"` or `"75x25"`.
///
/// The unit is `cm` or `m` and defaults to centimeters. Anything that does not
/// match the pattern yields `None`.
pub fn parse_spacing(text: &str) -> Option<Spacing> {
    let (row, rest) = split_number(text.trim())?;
    let rest = rest.trim_start().strip_prefix(|c: char| c == 'x' || c == 'X')?;
    let (hill, rest) = split_number(rest.trim_start())?;

    let divisor = match rest.trim() {
        "" => 100.0,
        unit if unit.eq_ignore_ascii_case("cm") => 100.0,
        unit if unit.eq_ignore_ascii_case("m") => 1.0,
        _ => return None,
    };

    Some(Spacing::new(row / divisor, hill / divisor))
}

/// Plants per hectare for a spacing, assuming one plant per spacing cell.
///
/// Returns `None` when either dimension is non-positive.
pub fn plants_per_hectare(spacing: &Spacing) -> Option<f64> {
    if spacing.row_m <= 0.0 || spacing.hill_m <= 0.0 {
        return None;
    }
    Some(SQUARE_METERS_PER_HECTARE / spacing.area_per_plant_m2())
}

/// Split a leading unsigned decimal (`12` or `12.5`) off the front of `s`
fn split_number(s: &str) -> Option<(f64, &str)> {
    let int_len = s.bytes().take_while(u8::is_ascii_digit).count();
    if int_len == 0 {
        return None;
    }

    let mut end = int_len;
    if s[end..].starts_with('.') {
        let frac_len = s[end + 1..].bytes().take_while(u8::is_ascii_digit).count();
        if frac_len > 0 {
            end += 1 + frac_len;
        }
    }

    let value = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}
