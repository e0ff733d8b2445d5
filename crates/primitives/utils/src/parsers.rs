use anyhow::{anyhow, bail};

use std::time::Duration;

/// Parses a string duration & return it as [Duration].
pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
    let s = s.trim();
    let split_index = s.find(|c: char| !c.is_ascii_digit()).ok_or_else(|| anyhow!("Invalid duration format: {}", s))?;

    let (value_str, suffix) = s.split_at(split_index);
    let value: u64 = value_str.parse().map_err(|_| anyhow!("Invalid duration value: {}", value_str))?;

    let secs_per_unit = match suffix.trim() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "min" => 60,
        "h" => 60 * 60,
        _ => bail!("Invalid duration suffix: {}. Expected 'ms', 's', 'min' or 'h'.", suffix),
    };
    let secs = value.checked_mul(secs_per_unit).ok_or_else(|| anyhow!("Duration too large: {}", s))?;
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_parse_duration() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("200ms").unwrap(), Duration::from_millis(200));
        assert_eq!(parse_duration("5min").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("1 min").unwrap(), Duration::from_secs(60));
        assert_eq!(parse_duration("5h").unwrap(), Duration::from_secs(5 * 60 * 60));
        assert_eq!(parse_duration("10 s").unwrap(), Duration::from_secs(10));
        assert!(parse_duration("2x").is_err());
        assert!(parse_duration("200").is_err());
        assert!(parse_duration("ms200").is_err());
        assert!(parse_duration("-5s").is_err());
        assert!(parse_duration("5.5s").is_err());
    }

    #[rstest]
    #[case::minutes("307445734561825861min")]
    #[case::hours("5124095576030432h")]
    #[case::not_a_u64("18446744073709551616s")]
    fn test_parse_duration_rejects_overflow(#[case] input: &str) {
        assert!(parse_duration(input).is_err());
    }

    #[test]
    fn test_parse_duration_largest_values() {
        assert_eq!(parse_duration("307445734561825860min").unwrap(), Duration::from_secs(307445734561825860 * 60));
        assert_eq!(parse_duration("5124095576030431h").unwrap(), Duration::from_secs(5124095576030431 * 3600));
    }
}
