//! Timeframe definitions and bucket alignment.

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit of a timeframe duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeframeUnit {
    Minute,
    Hour,
    Day,
}

/// Candle timeframe parsed from a compact label such as "1m", "5m", "1h" or "1d".
///
/// The unit determines bucket alignment: minute timeframes align within
/// the hour, hour timeframes within the day, day timeframes to midnight UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timeframe {
    count: u32,
    unit: TimeframeUnit,
}

impl Timeframe {
    /// Create a minute timeframe. The count must be positive.
    pub const fn minutes(count: u32) -> Self {
        Self {
            count,
            unit: TimeframeUnit::Minute,
        }
    }

    /// Create an hour timeframe. The count must be positive.
    pub const fn hours(count: u32) -> Self {
        Self {
            count,
            unit: TimeframeUnit::Hour,
        }
    }

    /// Create a day timeframe. The count must be positive.
    pub const fn days(count: u32) -> Self {
        Self {
            count,
            unit: TimeframeUnit::Day,
        }
    }

    /// Get the duration of the timeframe.
    pub fn duration(&self) -> Duration {
        match self.unit {
            TimeframeUnit::Minute => Duration::minutes(self.count as i64),
            TimeframeUnit::Hour => Duration::hours(self.count as i64),
            TimeframeUnit::Day => Duration::days(self.count as i64),
        }
    }

    /// Get the duration of the timeframe in seconds.
    pub fn as_secs(&self) -> u64 {
        match self.unit {
            TimeframeUnit::Minute => self.count as u64 * 60,
            TimeframeUnit::Hour => self.count as u64 * 3600,
            TimeframeUnit::Day => self.count as u64 * 86400,
        }
    }

    /// Compute the bucket start for a timestamp under this timeframe's
    /// alignment rule.
    ///
    /// The bucket start is the largest aligned instant not after `ts`:
    /// minute counts floor the minute-of-hour, hour counts floor the
    /// hour-of-day, day timeframes floor to midnight.
    pub fn bucket_start(&self, ts: DateTime<Utc>) -> DateTime<Utc> {
        let aligned = match self.unit {
            TimeframeUnit::Minute => {
                let minute = (ts.minute() / self.count) * self.count;
                ts.date_naive().and_hms_opt(ts.hour(), minute, 0)
            }
            TimeframeUnit::Hour => {
                let hour = (ts.hour() / self.count) * self.count;
                ts.date_naive().and_hms_opt(hour, 0, 0)
            }
            TimeframeUnit::Day => ts.date_naive().and_hms_opt(0, 0, 0),
        };
        aligned.map(|dt| dt.and_utc()).unwrap_or(ts)
    }

    /// Compute the earliest bucket start eligible for candle formation
    /// given the engine start time.
    ///
    /// A start exactly on a bucket boundary makes that bucket eligible;
    /// otherwise eligibility begins at the next boundary.
    pub fn first_allowed_from(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        let bucket = self.bucket_start(start);
        if bucket == start {
            bucket
        } else {
            bucket + self.duration()
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            TimeframeUnit::Minute => 'm',
            TimeframeUnit::Hour => 'h',
            TimeframeUnit::Day => 'd',
        };
        write!(f, "{}{}", self.count, unit)
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let unit_ch = s
            .chars()
            .last()
            .ok_or_else(|| format!("Invalid timeframe: {}", s))?;
        let unit = match unit_ch {
            'm' => TimeframeUnit::Minute,
            'h' => TimeframeUnit::Hour,
            'd' => TimeframeUnit::Day,
            _ => return Err(format!("Invalid timeframe: {}", s)),
        };
        let count: u32 = s[..s.len() - unit_ch.len_utf8()]
            .parse()
            .map_err(|_| format!("Invalid timeframe: {}", s))?;
        if count == 0 {
            return Err(format!("Invalid timeframe: {}", s));
        }
        Ok(Self { count, unit })
    }
}

impl TryFrom<String> for Timeframe {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Timeframe> for String {
    fn from(tf: Timeframe) -> Self {
        tf.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, h, m, s).unwrap()
    }

    #[test]
    fn test_timeframe_parse() {
        assert_eq!(Timeframe::from_str("1m").unwrap(), Timeframe::minutes(1));
        assert_eq!(Timeframe::from_str("5m").unwrap(), Timeframe::minutes(5));
        assert_eq!(Timeframe::from_str("4h").unwrap(), Timeframe::hours(4));
        assert_eq!(Timeframe::from_str("1d").unwrap(), Timeframe::days(1));
        assert_eq!(Timeframe::from_str(" 15m ").unwrap(), Timeframe::minutes(15));
    }

    #[test]
    fn test_timeframe_parse_invalid() {
        assert!(Timeframe::from_str("").is_err());
        assert!(Timeframe::from_str("m").is_err());
        assert!(Timeframe::from_str("0m").is_err());
        assert!(Timeframe::from_str("5x").is_err());
        assert!(Timeframe::from_str("5").is_err());
        assert!(Timeframe::from_str("-1m").is_err());
    }

    #[test]
    fn test_timeframe_display() {
        assert_eq!(Timeframe::minutes(1).to_string(), "1m");
        assert_eq!(Timeframe::minutes(15).to_string(), "15m");
        assert_eq!(Timeframe::hours(4).to_string(), "4h");
        assert_eq!(Timeframe::days(1).to_string(), "1d");
    }

    #[test]
    fn test_timeframe_duration() {
        assert_eq!(Timeframe::minutes(1).as_secs(), 60);
        assert_eq!(Timeframe::minutes(5).as_secs(), 300);
        assert_eq!(Timeframe::hours(1).as_secs(), 3600);
        assert_eq!(Timeframe::days(1).as_secs(), 86400);
        assert_eq!(Timeframe::minutes(5).duration(), Duration::minutes(5));
    }

    #[test]
    fn test_bucket_start_minutes() {
        let tf = Timeframe::minutes(5);
        assert_eq!(tf.bucket_start(at(12, 34, 56)), at(12, 30, 0));
        assert_eq!(tf.bucket_start(at(12, 30, 0)), at(12, 30, 0));
        assert_eq!(tf.bucket_start(at(12, 4, 59)), at(12, 0, 0));
    }

    #[test]
    fn test_bucket_start_hours() {
        let tf = Timeframe::hours(4);
        assert_eq!(tf.bucket_start(at(15, 20, 10)), at(12, 0, 0));
        assert_eq!(tf.bucket_start(at(3, 0, 0)), at(0, 0, 0));
    }

    #[test]
    fn test_bucket_start_days() {
        let tf = Timeframe::days(1);
        assert_eq!(tf.bucket_start(at(15, 20, 10)), at(0, 0, 0));
    }

    #[test]
    fn test_first_allowed_mid_bucket() {
        let tf = Timeframe::minutes(5);
        assert_eq!(tf.first_allowed_from(at(0, 2, 0)), at(0, 5, 0));
        assert_eq!(tf.first_allowed_from(at(0, 4, 59)), at(0, 5, 0));
    }

    #[test]
    fn test_first_allowed_on_boundary() {
        let tf = Timeframe::minutes(5);
        assert_eq!(tf.first_allowed_from(at(0, 5, 0)), at(0, 5, 0));
        assert_eq!(tf.first_allowed_from(at(0, 0, 0)), at(0, 0, 0));
    }

    #[test]
    fn test_serde_label_roundtrip() {
        let tf: Timeframe = serde_json::from_str("\"5m\"").unwrap();
        assert_eq!(tf, Timeframe::minutes(5));
        assert_eq!(serde_json::to_string(&tf).unwrap(), "\"5m\"");
        assert!(serde_json::from_str::<Timeframe>("\"5x\"").is_err());
    }
}
