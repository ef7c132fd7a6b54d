use serde::Deserialize;
use thiserror::Error;

use crate::ir::{Day, Meeting};
use crate::layout::LayoutError;
use crate::time::TimeValue;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid input: {0}")]
    Syntax(#[from] json5::Error),
    #[error("meeting {index}: unknown day `{day}`")]
    UnknownDay { index: usize, day: String },
    #[error("meeting {index}: invalid {field} time `{value}`")]
    InvalidTime {
        index: usize,
        field: &'static str,
        value: String,
    },
    #[error("meeting {index} ({identifier}): {source}")]
    Meeting {
        index: usize,
        identifier: String,
        #[source]
        source: LayoutError,
    },
}

#[derive(Debug, Clone)]
pub struct ParsedTimetable {
    pub meetings: Vec<Meeting>,
    pub init_config: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMeeting {
    day: String,
    #[serde(alias = "startTime")]
    start: TimeValue,
    #[serde(alias = "endTime")]
    end: TimeValue,
    #[serde(default)]
    course_key: u32,
    identifier: String,
    title: Option<String>,
    location: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Bare(Vec<RawMeeting>),
    Wrapped {
        meetings: Vec<RawMeeting>,
        config: Option<serde_json::Value>,
    },
}

fn resolve(index: usize, field: &'static str, value: &TimeValue) -> Result<u16, ParseError> {
    value.to_minutes().ok_or_else(|| ParseError::InvalidTime {
        index,
        field,
        value: value.to_string(),
    })
}

impl RawMeeting {
    fn into_meeting(self, index: usize) -> Result<Meeting, ParseError> {
        let day = Day::from_token(&self.day).ok_or_else(|| ParseError::UnknownDay {
            index,
            day: self.day.clone(),
        })?;
        let start = resolve(index, "start", &self.start)?;
        let end = resolve(index, "end", &self.end)?;
        let mut meeting = Meeting::new(day, start, end, self.course_key, self.identifier.as_str())
            .map_err(|source| ParseError::Meeting {
                index,
                identifier: self.identifier.clone(),
                source,
            })?;
        if let Some(title) = self.title {
            meeting = meeting.with_title(title);
        }
        if let Some(location) = self.location {
            meeting = meeting.with_location(location);
        }
        Ok(meeting)
    }
}

/// Parses a JSON or JSON5 meeting document.
///
/// Accepts a bare array of meetings or `{ meetings: [...], config: {...} }`.
pub fn parse_timetable(input: &str) -> Result<ParsedTimetable, ParseError> {
    let document: RawDocument = json5::from_str(input)?;
    let (raw, init_config) = match document {
        RawDocument::Bare(raw) => (raw, None),
        RawDocument::Wrapped { meetings, config } => (meetings, config),
    };

    let meetings = raw
        .into_iter()
        .enumerate()
        .map(|(index, raw)| raw.into_meeting(index))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(meetings = meetings.len(), "parsed timetable input");

    Ok(ParsedTimetable {
        meetings,
        init_config,
    })
}
