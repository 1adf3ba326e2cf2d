//! Clock and progress rendering helpers

/// Render remaining seconds as `MM:SS`.
///
/// Minutes are not wrapped into hours; anything past 99 minutes simply
/// gets more digits.
pub fn format_clock(remaining_seconds: u64) -> String {
    format!("{:02}:{:02}", remaining_seconds / 60, remaining_seconds % 60)
}

/// Fraction of the stage already elapsed, always within `[0, 1]`.
///
/// A zero-length stage reports 0 rather than dividing by zero.
pub fn progress_fraction(remaining_seconds: u64, duration_seconds: u64) -> f64 {
    if duration_seconds == 0 {
        return 0.0;
    }
    let elapsed = duration_seconds.saturating_sub(remaining_seconds);
    (elapsed as f64 / duration_seconds as f64).clamp(0.0, 1.0)
}

/// Text progress bar such as `[####------]`
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = ((fraction * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock_pads_fields() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(9), "00:09");
        assert_eq!(format_clock(25 * 60), "25:00");
        assert_eq!(format_clock(5 * 60 + 7), "05:07");
    }

    #[test]
    fn test_format_clock_beyond_two_digit_minutes() {
        assert_eq!(format_clock(100 * 60), "100:00");
        assert_eq!(format_clock(125 * 60 + 30), "125:30");
    }

    #[test]
    fn test_progress_fraction_bounds() {
        assert_eq!(progress_fraction(1500, 1500), 0.0);
        assert_eq!(progress_fraction(0, 1500), 1.0);
        assert_eq!(progress_fraction(750, 1500), 0.5);
        // remaining above the stage length clamps instead of going negative
        assert_eq!(progress_fraction(2000, 1500), 0.0);
    }

    #[test]
    fn test_progress_fraction_zero_duration() {
        let fraction = progress_fraction(0, 0);
        assert!(!fraction.is_nan());
        assert_eq!(fraction, 0.0);
        assert_eq!(progress_fraction(10, 0), 0.0);
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0, 10), "[----------]");
        assert_eq!(progress_bar(0.5, 10), "[#####-----]");
        assert_eq!(progress_bar(1.0, 4), "[####]");
        assert_eq!(progress_bar(f64::NAN, 4), "[----]");
        assert_eq!(progress_bar(3.0, 4), "[####]");
    }
}
