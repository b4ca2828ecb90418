use std::time::Duration;

use crate::{Error, Result};

/// Parse a human-friendly duration string.
///
/// Supported suffixes: `s` (seconds), `m` (minutes), `h` (hours), `d` (days).
/// Examples: `"30s"`, `"5m"`, `"2h"`, `"1d"`.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_duration(input, "empty duration string"));
    }

    let Some(split) = trimmed.find(|c: char| c.is_alphabetic()) else {
        return Err(Error::invalid_duration(
            input,
            "missing unit suffix (s/m/h/d)",
        ));
    };
    let (num_str, suffix) = trimmed.split_at(split);

    let value: u64 = num_str
        .trim()
        .parse()
        .map_err(|_| Error::invalid_duration(input, format!("invalid number: {num_str}")))?;
    if value == 0 {
        return Err(Error::invalid_duration(input, "duration must be > 0"));
    }

    let secs_per_unit = match suffix {
        "s" => 1,
        "m" => 60,
        "h" => 3_600,
        "d" => 86_400,
        _ => {
            return Err(Error::invalid_duration(
                input,
                format!("unknown suffix: {suffix} (expected s/m/h/d)"),
            ));
        },
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| Error::invalid_duration(input, "duration overflows"))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("30s", 30)]
    #[case("5m", 300)]
    #[case("2h", 7_200)]
    #[case("1d", 86_400)]
    #[case("  10m  ", 600)]
    fn parses_valid_durations(#[case] input: &str, #[case] secs: u64) {
        assert_eq!(parse_duration(input).unwrap(), Duration::from_secs(secs));
    }

    #[rstest]
    #[case("")]
    #[case("100")]
    #[case("0s")]
    #[case("10x")]
    #[case("-5m")]
    #[case("99999999999999999999d")]
    fn rejects_invalid_durations(#[case] input: &str) {
        assert!(matches!(
            parse_duration(input),
            Err(Error::InvalidDuration { .. })
        ));
    }
}
