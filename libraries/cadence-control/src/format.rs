//! Elapsed/duration label formatting

/// Format a position in seconds as `M:SS`.
///
/// Unknown values (NaN, infinite, negative) render as `0:00`. Minutes are not
/// wrapped into hours, so a 75 minute track shows `75:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }

    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(5.0), "0:05");
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(600.0), "10:00");
    }

    #[test]
    fn truncates_fractional_seconds() {
        assert_eq!(format_time(59.999), "0:59");
        assert_eq!(format_time(61.5), "1:01");
    }

    #[test]
    fn does_not_wrap_into_hours() {
        assert_eq!(format_time(4500.0), "75:00");
    }

    #[test]
    fn unknown_values_render_zero() {
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
        assert_eq!(format_time(-3.0), "0:00");
    }
}
