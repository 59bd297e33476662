// Separator between the date and the clock part of an ISO-8601 timestamp
const DATE_TIME_SEPARATOR: char = 'T';

/// Width of a normalized clock time ("hh:mm")
pub const CLOCK_WIDTH: usize = 5;

/// Extract the "hh:mm" part of a server timestamp.
///
/// Takes the 5 characters right after the first `T` and drops date, seconds
/// and offset. No timezone conversion: the server's local time is shown as is.
/// Returns an empty string when there is no `T` or fewer than 5 characters
/// follow it.
pub fn normalize_time(timestamp: &str) -> String {
    let Some(idx) = timestamp.find(DATE_TIME_SEPARATOR) else {
        return String::new();
    };

    let clock: String = timestamp[idx + DATE_TIME_SEPARATOR.len_utf8()..]
        .chars()
        .take(CLOCK_WIDTH)
        .collect();

    if clock.chars().count() < CLOCK_WIDTH {
        return String::new();
    }
    clock
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_timestamp() {
        assert_eq!(normalize_time("2024-05-01T14:07:33+12:00"), "14:07");
    }

    #[test]
    fn test_utc_timestamp() {
        assert_eq!(normalize_time("2024-01-01T08:02:00Z"), "08:02");
    }

    #[test]
    fn test_no_conversion_applied() {
        // Offsets are ignored, not applied
        assert_eq!(normalize_time("2024-01-01T23:59:00-05:00"), "23:59");
    }

    #[test]
    fn test_missing_separator() {
        assert_eq!(normalize_time("2024-01-01 08:00:00"), "");
        assert_eq!(normalize_time(""), "");
    }

    #[test]
    fn test_short_clock_part() {
        assert_eq!(normalize_time("2024-01-01T08:0"), "");
        assert_eq!(normalize_time("2024-01-01T"), "");
    }

    #[test]
    fn test_exactly_five_after_separator() {
        assert_eq!(normalize_time("T12:34"), "12:34");
    }

    #[test]
    fn test_multibyte_after_separator() {
        // Counts characters, never splits a code point
        assert_eq!(normalize_time("xTé1:23"), "é1:23");
        assert_eq!(normalize_time("xTé1:2"), "");
    }
}
