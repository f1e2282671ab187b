//! `HH:MM:SS` task durations.

use crate::errors::TaskError;

/// Longest accepted duration: 9999 hours, 59 minutes, 59 seconds.
pub const MAX_DURATION_SECS: u64 = 9999 * 3600 + 59 * 60 + 59;

/// Parse an `HH:MM:SS` string into whole seconds.
///
/// Hours go up to 9999; minutes and seconds must be below 60. A zero-length
/// duration is rejected since a task with no effort can never be started.
pub fn parse_hms(input: &str) -> Result<u64, TaskError> {
    let trimmed = input.trim();
    let invalid = |reason: &str| TaskError::InvalidDuration {
        input: trimmed.to_string(),
        reason: reason.to_string(),
    };

    let fields: Vec<&str> = trimmed.split(':').collect();
    if fields.len() != 3 {
        return Err(invalid("expected three fields"));
    }

    let mut parsed = [0u64; 3];
    for (slot, field) in parsed.iter_mut().zip(&fields) {
        if field.is_empty() || !field.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("fields must be unsigned integers"));
        }
        *slot = field
            .parse()
            .map_err(|_| invalid("field out of range"))?;
    }

    let [hours, minutes, seconds] = parsed;
    if minutes >= 60 || seconds >= 60 {
        return Err(invalid("minutes and seconds must be below 60"));
    }

    let total = hours
        .checked_mul(3600)
        .and_then(|h| h.checked_add(minutes * 60 + seconds))
        .filter(|&total| total <= MAX_DURATION_SECS)
        .ok_or_else(|| invalid("hours must not exceed 9999"))?;
    if total == 0 {
        return Err(invalid("duration must be greater than zero"));
    }
    Ok(total)
}

/// Check a duration that did not come through [`parse_hms`].
pub fn validate_secs(secs: u64) -> Result<u64, TaskError> {
    if secs == 0 || secs > MAX_DURATION_SECS {
        return Err(TaskError::InvalidDuration {
            input: format_hms(secs),
            reason: "duration must be between 00:00:01 and 9999:59:59".to_string(),
        });
    }
    Ok(secs)
}

/// Render seconds as zero-padded `HH:MM:SS`.
pub fn format_hms(total_secs: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        total_secs / 3600,
        (total_secs % 3600) / 60,
        total_secs % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_durations() {
        assert_eq!(parse_hms("00:00:01").unwrap(), 1);
        assert_eq!(parse_hms("00:25:00").unwrap(), 1500);
        assert_eq!(parse_hms("01:30:15").unwrap(), 5415);
        assert_eq!(parse_hms("  2:0:0 ").unwrap(), 7200);
        assert_eq!(parse_hms("120:00:00").unwrap(), 432_000);
        assert_eq!(parse_hms("9999:59:59").unwrap(), MAX_DURATION_SECS);
    }

    #[test]
    fn rejects_wrong_field_count() {
        for input in ["", "25", "00:25", "00:00:00:01"] {
            assert!(
                matches!(parse_hms(input), Err(TaskError::InvalidDuration { .. })),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_non_numeric_fields() {
        for input in ["aa:bb:cc", "1:-2:3", "1::3", "+1:02:03", "1.5:00:00"] {
            assert!(parse_hms(input).is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn rejects_out_of_range_minutes_and_seconds() {
        assert!(parse_hms("00:60:00").is_err());
        assert!(parse_hms("00:00:60").is_err());
        assert!(parse_hms("99999999999999999999:00:00").is_err());
    }

    #[test]
    fn rejects_hours_beyond_limit() {
        let err = parse_hms("9999999999:00:00").unwrap_err();
        assert!(matches!(err, TaskError::InvalidDuration { .. }));
        assert!(err.to_string().contains("9999"));
        assert!(parse_hms("10000:00:00").is_err());
    }

    #[test]
    fn validate_secs_bounds() {
        assert_eq!(validate_secs(1).unwrap(), 1);
        assert_eq!(validate_secs(MAX_DURATION_SECS).unwrap(), MAX_DURATION_SECS);
        assert!(validate_secs(0).is_err());
        assert!(validate_secs(MAX_DURATION_SECS + 1).is_err());
        assert!(validate_secs(u64::MAX).is_err());
    }

    #[test]
    fn rejects_zero_duration() {
        let err = parse_hms("00:00:00").unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
    }

    #[test]
    fn formats_seconds() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(5415), "01:30:15");
        assert_eq!(format_hms(432_000), "120:00:00");
    }
}
