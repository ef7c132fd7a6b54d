use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ir::MINUTES_PER_DAY;

static CLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\d{1,2})(?::(\d{2}))?\s*(am|pm)?$").expect("clock regex is valid")
});

/// Parses `"9"`, `"09:30"`, `"9:30pm"`, `"12am"` or `"24:00"` into minutes from midnight.
pub fn parse_clock(input: &str) -> Option<u16> {
    let caps = CLOCK_RE.captures(input.trim())?;
    let mut hours: u16 = caps.get(1)?.as_str().parse().ok()?;
    let minutes: u16 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    if minutes >= 60 {
        return None;
    }
    if let Some(meridiem) = caps.get(3) {
        if hours == 0 || hours > 12 {
            return None;
        }
        let pm = meridiem.as_str().eq_ignore_ascii_case("pm");
        hours = match (hours, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
    }
    let total = hours * 60 + minutes;
    (total <= MINUTES_PER_DAY).then_some(total)
}

pub fn format_minute_offset(minutes: u16, twenty_four: bool) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if twenty_four {
        return format!("{hours:02}:{mins:02}");
    }
    let hours = hours % 24;
    let suffix = if hours < 12 { "AM" } else { "PM" };
    let display = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{display}:{mins:02} {suffix}")
}

/// A time written either as raw minutes from midnight or as a clock string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    Minutes(u16),
    Clock(String),
}

impl TimeValue {
    pub fn to_minutes(&self) -> Option<u16> {
        match self {
            TimeValue::Minutes(m) => (*m <= MINUTES_PER_DAY).then_some(*m),
            TimeValue::Clock(text) => parse_clock(text),
        }
    }
}

impl std::fmt::Display for TimeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeValue::Minutes(m) => write!(f, "{m}"),
            TimeValue::Clock(text) => f.write_str(text),
        }
    }
}
