//! Calendar-day bucketing
//!
//! Maps timestamps to `YYYY-MM-DD` day keys in a fixed zone and generates the
//! trailing day-key window ending at an injected "today".

use chrono::{DateTime, Days, FixedOffset, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Zone in which calendar days are counted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BucketZone {
    /// Process-local time, including DST transitions
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl BucketZone {
    /// Calendar date of `ts` in this zone
    pub fn date_of(&self, ts: DateTime<Utc>) -> NaiveDate {
        match self {
            BucketZone::Local => ts.with_timezone(&Local).date_naive(),
            BucketZone::Utc => ts.date_naive(),
            BucketZone::Fixed(offset) => ts.with_timezone(offset).date_naive(),
        }
    }

    /// Formats `ts` as wall-clock time in this zone
    pub fn format(&self, ts: DateTime<Utc>, fmt: &str) -> String {
        match self {
            BucketZone::Local => ts.with_timezone(&Local).format(fmt).to_string(),
            BucketZone::Utc => ts.format(fmt).to_string(),
            BucketZone::Fixed(offset) => ts.with_timezone(offset).format(fmt).to_string(),
        }
    }
}

impl std::str::FromStr for BucketZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(BucketZone::Local),
            "utc" | "z" => Ok(BucketZone::Utc),
            other => parse_offset(other)
                .map(BucketZone::Fixed)
                .ok_or_else(|| format!("invalid timezone `{s}`; expected local|utc|+HH:MM")),
        }
    }
}

impl TryFrom<String> for BucketZone {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BucketZone> for String {
    fn from(zone: BucketZone) -> Self {
        match zone {
            BucketZone::Local => "local".to_string(),
            BucketZone::Utc => "utc".to_string(),
            BucketZone::Fixed(offset) => offset.to_string(),
        }
    }
}

fn parse_offset(raw: &str) -> Option<FixedOffset> {
    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };
    let (hours, minutes) = rest.split_once(':').unwrap_or((rest, "0"));
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Day-key generator pinned to one "today"
#[derive(Debug, Clone, Copy)]
pub struct DayBucketer {
    zone: BucketZone,
    today: NaiveDate,
}

impl DayBucketer {
    pub fn new(now: DateTime<Utc>, zone: BucketZone) -> Self {
        Self {
            zone,
            today: zone.date_of(now),
        }
    }

    /// Bucketer for the current wall-clock instant
    pub fn now(zone: BucketZone) -> Self {
        Self::new(Utc::now(), zone)
    }

    pub fn zone(&self) -> BucketZone {
        self.zone
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn today_key(&self) -> String {
        format_day(self.today)
    }

    pub fn day(&self, ts: DateTime<Utc>) -> NaiveDate {
        self.zone.date_of(ts)
    }

    pub fn day_key(&self, ts: DateTime<Utc>) -> String {
        format_day(self.day(ts))
    }

    /// The `n` calendar days ending today, oldest first
    pub fn last_n_days(&self, n: usize) -> Vec<NaiveDate> {
        (0..n as u64)
            .rev()
            .filter_map(|back| self.today.checked_sub_days(Days::new(back)))
            .collect()
    }

    /// Same window as [`last_n_days`](Self::last_n_days), formatted as day keys
    pub fn last_n_day_keys(&self, n: usize) -> Vec<String> {
        self.last_n_days(n).into_iter().map(format_day).collect()
    }
}

pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_KEY_FORMAT).to_string()
}
