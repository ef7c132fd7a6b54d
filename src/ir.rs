use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::LayoutError;

/// Minutes in a day; the upper bound for any meeting or grid time.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Default display days.
    pub const WEEK_DAYS: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    /// Three-letter column header.
    pub fn short(self) -> &'static str {
        &self.name()[..3]
    }

    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim().to_ascii_lowercase();
        if token.len() < 3 {
            return None;
        }
        Day::ALL
            .into_iter()
            .find(|day| day.name().to_ascii_lowercase().starts_with(&token))
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown day `{0}`")]
pub struct UnknownDay(pub String);

impl FromStr for Day {
    type Err = UnknownDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Day::from_token(s).ok_or_else(|| UnknownDay(s.to_string()))
    }
}

impl TryFrom<String> for Day {
    type Error = UnknownDay;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Day> for String {
    fn from(day: Day) -> Self {
        day.name().to_string()
    }
}

/// A single scheduled block on one weekday for one course.
///
/// Construction validates `0 <= start < end <= 1440`; a `Meeting` is never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    day: Day,
    start_time: u16,
    end_time: u16,
    course_key: u32,
    identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,
}

impl Meeting {
    pub fn new(
        day: Day,
        start_time: u16,
        end_time: u16,
        course_key: u32,
        identifier: impl Into<String>,
    ) -> Result<Self, LayoutError> {
        if start_time >= end_time || end_time > MINUTES_PER_DAY {
            return Err(LayoutError::InvalidInterval {
                start: start_time,
                end: end_time,
            });
        }
        Ok(Self {
            day,
            start_time,
            end_time,
            course_key,
            identifier: identifier.into(),
            title: None,
            location: None,
        })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn day(&self) -> Day {
        self.day
    }

    pub fn start_time(&self) -> u16 {
        self.start_time
    }

    pub fn end_time(&self) -> u16 {
        self.end_time
    }

    pub fn duration(&self) -> u16 {
        self.end_time - self.start_time
    }

    pub fn course_key(&self) -> u32 {
        self.course_key
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Text shown inside the meeting's cell.
    pub fn display_label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.identifier)
    }

    /// Half-open overlap on the same day. Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Meeting) -> bool {
        self.day == other.day
            && self.start_time < other.end_time
            && other.start_time < self.end_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_day_tokens() {
        assert_eq!("Mon".parse::<Day>(), Ok(Day::Monday));
        assert_eq!("wednesday".parse::<Day>(), Ok(Day::Wednesday));
        assert_eq!(" THU ".parse::<Day>(), Ok(Day::Thursday));
        assert_eq!("tues".parse::<Day>(), Ok(Day::Tuesday));
        assert!("M".parse::<Day>().is_err());
        assert_eq!(
            "Funday".parse::<Day>().unwrap_err().to_string(),
            "unknown day `Funday`"
        );
        assert_eq!(Day::Saturday.short(), "Sat");
    }

    #[test]
    fn rejects_inverted_and_empty_intervals() {
        assert!(Meeting::new(Day::Monday, 600, 540, 0, "A").is_err());
        assert!(Meeting::new(Day::Monday, 600, 600, 0, "A").is_err());
        assert!(Meeting::new(Day::Monday, 1400, 1441, 0, "A").is_err());
        assert!(Meeting::new(Day::Monday, 0, 1440, 0, "A").is_ok());
    }

    #[test]
    fn touching_meetings_do_not_overlap() {
        let a = Meeting::new(Day::Monday, 540, 600, 0, "A").unwrap();
        let b = Meeting::new(Day::Monday, 600, 660, 1, "B").unwrap();
        let c = Meeting::new(Day::Monday, 599, 660, 2, "C").unwrap();
        let d = Meeting::new(Day::Tuesday, 540, 600, 3, "D").unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(!a.overlaps(&d));
    }

    #[test]
    fn display_label_prefers_title() {
        let m = Meeting::new(Day::Friday, 540, 600, 0, "COMP1511").unwrap();
        assert_eq!(m.display_label(), "COMP1511");
        let m = m.with_title("Programming Fundamentals").with_location("Quad 1001");
        assert_eq!(m.display_label(), "Programming Fundamentals");
        assert_eq!(m.location(), Some("Quad 1001"));
    }
}
