//! Validation Utilities
//!
//! Pure functions shared by the layer and level managers: name and color
//! validation, elevation bounds, and half-open interval arithmetic.
//! No dependencies on any manager state.

use crate::error::{DraftError, Result};

/// Maximum length of a layer name in characters
pub const MAX_NAME_LEN: usize = 50;

/// Lowest allowed level elevation in meters (relative to site)
pub const ELEVATION_MIN: f64 = -100.0;

/// Highest allowed level elevation in meters (relative to site)
pub const ELEVATION_MAX: f64 = 1000.0;

/// Validate an entity name: non-empty after trimming, at most
/// [`MAX_NAME_LEN`] characters.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DraftError::validation("name must not be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DraftError::validation(format!(
            "name exceeds {} characters: '{}'",
            MAX_NAME_LEN, name
        )));
    }
    Ok(())
}

/// Validate a display color in `#RRGGBB` form (6 hex digits).
pub fn validate_hex_color(color: &str) -> Result<()> {
    let digits = color.strip_prefix('#').unwrap_or(color);
    if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(DraftError::validation(format!(
            "color must be a 6-hex-digit RGB value, got '{}'",
            color
        )))
    }
}

/// Validate that an elevation lies within the allowed world bounds.
pub fn validate_elevation_bounds(elevation: f64) -> Result<()> {
    if !elevation.is_finite() {
        return Err(DraftError::validation("elevation must be a finite number"));
    }
    if !(ELEVATION_MIN..=ELEVATION_MAX).contains(&elevation) {
        return Err(DraftError::validation(format!(
            "elevation {} m is outside the allowed range [{}, {}]",
            elevation, ELEVATION_MIN, ELEVATION_MAX
        )));
    }
    Ok(())
}

/// Validate a level's floor-to-ceiling height (strictly positive, finite).
pub fn validate_height(height: f64) -> Result<()> {
    if !height.is_finite() || height <= 0.0 {
        return Err(DraftError::validation(format!(
            "height must be a positive number, got {}",
            height
        )));
    }
    Ok(())
}

/// Check whether two half-open elevation ranges `[a, a+a_height)` and
/// `[b, b+b_height)` intersect.
///
/// Adjacent ranges (one ending exactly where the other begins) do not
/// intersect; this is what lets "Ground" `[0, 3)` and "First" `[3, 6)`
/// coexist.
pub fn ranges_overlap(a: f64, a_height: f64, b: f64, b_height: f64) -> bool {
    a < b + b_height && b < a + a_height
}

/// Check whether a point elevation falls inside the half-open range
/// `[start, start+height)`.
pub fn range_contains(start: f64, height: f64, point: f64) -> bool {
    point >= start && point < start + height
}

/// Vertical gap between two half-open elevation ranges in meters.
///
/// Returns `0.0` when the ranges overlap or touch.
pub fn range_distance(a: f64, a_height: f64, b: f64, b_height: f64) -> f64 {
    if ranges_overlap(a, a_height, b, b_height) {
        return 0.0;
    }
    if a + a_height <= b {
        b - (a + a_height)
    } else {
        a - (b + b_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Walls" => true; "plain name")]
    #[test_case("  " => false; "whitespace only")]
    #[test_case("" => false; "empty")]
    #[test_case("Structure/Beams" => true; "path-like name")]
    fn test_validate_name(name: &str) -> bool {
        validate_name(name).is_ok()
    }

    #[test]
    fn test_name_length_limit() {
        let ok = "a".repeat(MAX_NAME_LEN);
        assert!(validate_name(&ok).is_ok());

        let too_long = "a".repeat(MAX_NAME_LEN + 1);
        assert!(validate_name(&too_long).is_err());
    }

    #[test_case("#FFAA00" => true; "with hash")]
    #[test_case("ffaa00" => true; "bare digits")]
    #[test_case("#FFAA0" => false; "five digits")]
    #[test_case("#GGAA00" => false; "non hex")]
    #[test_case("" => false; "empty color")]
    fn test_validate_hex_color(color: &str) -> bool {
        validate_hex_color(color).is_ok()
    }

    #[test_case(0.0 => true; "ground")]
    #[test_case(-100.0 => true; "lower bound inclusive")]
    #[test_case(1000.0 => true; "upper bound inclusive")]
    #[test_case(-100.1 => false; "below grade limit")]
    #[test_case(1000.5 => false; "above limit")]
    #[test_case(f64::NAN => false; "nan")]
    fn test_elevation_bounds(elevation: f64) -> bool {
        validate_elevation_bounds(elevation).is_ok()
    }

    #[test]
    fn test_height_must_be_positive() {
        assert!(validate_height(3.0).is_ok());
        assert!(validate_height(0.0).is_err());
        assert!(validate_height(-2.5).is_err());
        assert!(validate_height(f64::INFINITY).is_err());
    }

    #[test]
    fn test_ranges_overlap_half_open() {
        // [0, 3) vs [3, 6): adjacent, no overlap
        assert!(!ranges_overlap(0.0, 3.0, 3.0, 3.0));
        // [0, 3) vs [1.5, 2.5): nested
        assert!(ranges_overlap(0.0, 3.0, 1.5, 1.0));
        // [0, 3) vs [-1, 1): starts below, ends inside
        assert!(ranges_overlap(0.0, 3.0, -1.0, 2.0));
        // [0, 3) vs [5, 8): disjoint
        assert!(!ranges_overlap(0.0, 3.0, 5.0, 3.0));
    }

    #[test]
    fn test_range_contains() {
        assert!(range_contains(0.0, 3.0, 0.0));
        assert!(range_contains(0.0, 3.0, 2.999));
        // Half-open: the ceiling belongs to the next level
        assert!(!range_contains(0.0, 3.0, 3.0));
        assert!(!range_contains(0.0, 3.0, -0.1));
    }

    #[test]
    fn test_range_distance() {
        assert_eq!(range_distance(0.0, 3.0, 5.0, 3.0), 2.0);
        assert_eq!(range_distance(5.0, 3.0, 0.0, 3.0), 2.0);
        // Touching ranges have zero distance
        assert_eq!(range_distance(0.0, 3.0, 3.0, 3.0), 0.0);
        // Overlapping ranges have zero distance
        assert_eq!(range_distance(0.0, 3.0, 1.0, 3.0), 0.0);
    }
}
