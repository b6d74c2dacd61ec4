//! Field parsing for PHMSA incident tables.
//!
//! The exported CSVs mix integer and float renderings of the same column
//! (`2015` vs `2015.0`, `1` vs `1.0`) and leave numeric cells blank when the
//! value was not reported.

/// Parses a coordinate. Returns `None` if the cell is blank, unparseable, or
/// not finite.
#[must_use]
pub fn parse_coordinate(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a year, accepting integral float renderings.
#[must_use]
pub fn parse_year(s: &str) -> Option<i32> {
    let trimmed = s.trim();
    if let Ok(year) = trimmed.parse::<i32>() {
        return Some(year);
    }
    let value = trimmed.parse::<f64>().ok()?;
    if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    Some(value as i32)
}

/// Parses a casualty count. Blank cells count as zero; negative or
/// fractional values are rejected.
#[must_use]
pub fn parse_count(s: &str) -> Option<u32> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Some(0);
    }
    if let Ok(count) = trimmed.parse::<u32>() {
        return Some(count);
    }
    let value = trimmed.parse::<f64>().ok()?;
    if value.fract() != 0.0 || value < 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(value as u32)
}

/// Parses a `YES`/`NO` indicator. Anything other than `YES` is `false`.
#[must_use]
pub fn parse_flag(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case("yes")
}
