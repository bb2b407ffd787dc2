//! Human-readable durations for configuration files.
//!
//! Accepts strings with a unit suffix (`"30s"`, `"5m"`, `"1h"`, `"1d"`) or a
//! bare integer number of seconds.

use std::time::Duration;

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDuration {
    Seconds(u64),
    Text(String),
}

/// Serde `deserialize_with` helper.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    match RawDuration::deserialize(deserializer)? {
        RawDuration::Seconds(secs) => Ok(Duration::from_secs(secs)),
        RawDuration::Text(text) => parse(&text).map_err(de::Error::custom),
    }
}

/// Parse a duration such as `"30m"`.
pub fn parse(s: &str) -> Result<Duration, String> {
    let s = s.trim().to_lowercase();
    let (value, unit_secs) = if let Some(days) = s.strip_suffix('d') {
        (days, 86_400)
    } else if let Some(hours) = s.strip_suffix('h') {
        (hours, 3_600)
    } else if let Some(mins) = s.strip_suffix('m') {
        (mins, 60)
    } else if let Some(secs) = s.strip_suffix('s') {
        (secs, 1)
    } else {
        (s.as_str(), 1)
    };

    let count: u64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration: {s}"))?;
    count
        .checked_mul(unit_secs)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration out of range: {s}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_units() {
        assert_eq!(parse("30s"), Ok(Duration::from_secs(30)));
        assert_eq!(parse("30m"), Ok(Duration::from_secs(1800)));
        assert_eq!(parse("1h"), Ok(Duration::from_secs(3600)));
        assert_eq!(parse("1d"), Ok(Duration::from_secs(86_400)));
        assert_eq!(parse(" 15M "), Ok(Duration::from_secs(900)));
        assert_eq!(parse("45"), Ok(Duration::from_secs(45)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("").is_err());
        assert!(parse("fast").is_err());
        assert!(parse("-5m").is_err());
        assert!(parse("1.5h").is_err());
    }

    #[test]
    fn deserializes_integers_and_strings() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(deserialize_with = "deserialize")]
            interval: Duration,
        }

        let w: Wrapper = toml::from_str("interval = 90").expect("integer seconds");
        assert_eq!(w.interval, Duration::from_secs(90));

        let w: Wrapper = toml::from_str("interval = \"2h\"").expect("string");
        assert_eq!(w.interval, Duration::from_secs(7200));

        assert!(toml::from_str::<Wrapper>("interval = \"soon\"").is_err());
    }
}
