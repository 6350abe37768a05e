use crate::error::AlignmentError;

/// Guards the millisecond truncation against values like `3.3 * 1000`
/// landing on `3299.9999`.
const MS_EPSILON: f64 = 1e-6;

/// `HH:MM:SS,mmm`, every field truncated. Negative input clamps to zero.
pub fn format_seconds(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0 + MS_EPSILON).floor() as u64;
    let millis = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;
    format!("{hours:02}:{mins:02}:{secs:02},{millis:03}")
}

/// Formats a resolved time, or the placeholder when there is none. Zero is a
/// real time and formats as `00:00:00,000`.
pub fn format_timestamp(seconds: Option<f64>, placeholder: &str) -> String {
    match seconds {
        Some(s) if s.is_finite() => format_seconds(s),
        _ => placeholder.to_string(),
    }
}

/// Parses `HH:MM:SS,mmm`, `HH:MM:SS.mmm`, `MM:SS` or plain seconds.
pub fn parse_timestamp(value: &str) -> Result<f64, AlignmentError> {
    let invalid = || AlignmentError::invalid_input(format!("invalid timestamp '{value}'"));
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    if parts.len() > 3 {
        return Err(invalid());
    }
    let (units, last) = parts.split_at(parts.len() - 1);
    let seconds: f64 = last[0].replace(',', ".").parse().map_err(|_| invalid())?;
    if !seconds.is_finite() || seconds < 0.0 || (!units.is_empty() && seconds >= 60.0) {
        return Err(invalid());
    }

    let mut total = 0.0;
    for (i, unit) in units.iter().enumerate() {
        let n: u64 = unit.parse().map_err(|_| invalid())?;
        // Minutes are bounded only when hours precede them.
        if i > 0 && n >= 60 {
            return Err(invalid());
        }
        total = total * 60.0 + n as f64;
    }
    Ok(total * 60.0 + seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_hours_minutes_seconds_millis() {
        assert_eq!(format_seconds(3723.456), "01:02:03,456");
        assert_eq!(format_seconds(0.0), "00:00:00,000");
        assert_eq!(format_seconds(59.9999), "00:00:59,999");
    }

    #[test]
    fn truncates_rather_than_rounds() {
        assert_eq!(format_seconds(1.0009), "00:00:01,000");
        assert_eq!(format_seconds(3.3), "00:00:03,300");
    }

    #[test]
    fn negative_clamps_to_zero() {
        assert_eq!(format_seconds(-2.5), "00:00:00,000");
    }

    #[test]
    fn absent_formats_to_placeholder_and_zero_does_not() {
        assert_eq!(format_timestamp(None, "???"), "???");
        assert_eq!(format_timestamp(Some(0.0), "???"), "00:00:00,000");
        assert_eq!(format_timestamp(Some(f64::NAN), "???"), "???");
    }

    #[test]
    fn parses_common_forms() {
        assert!((parse_timestamp("01:02:03,456").unwrap() - 3723.456).abs() < 1e-9);
        assert!((parse_timestamp("00:00:07.5").unwrap() - 7.5).abs() < 1e-9);
        assert!((parse_timestamp("2:30").unwrap() - 150.0).abs() < 1e-9);
        assert!((parse_timestamp("12.25").unwrap() - 12.25).abs() < 1e-9);
    }

    #[test]
    fn rejects_malformed_timestamps() {
        for bad in ["", "abc", "1:2:3:4", "00:61:00", "00:00:75", "-3"] {
            assert!(parse_timestamp(bad).is_err(), "accepted '{bad}'");
        }
    }

    #[test]
    fn parse_then_format_is_stable() {
        let value = parse_timestamp("00:12:34,567").unwrap();
        assert_eq!(format_seconds(value), "00:12:34,567");
    }
}
