use crate::models::PRESENT;

/// Reduces a `YYYY-MM` date to its year. `Present` and year-only values
/// pass through unchanged, so applying it twice is the same as once.
pub fn format_year(date: &str) -> String {
    if date == PRESENT {
        return date.to_string();
    }
    match date.split_once('-') {
        Some((year, _)) => year.to_string(),
        None => date.to_string(),
    }
}
