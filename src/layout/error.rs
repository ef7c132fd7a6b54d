use thiserror::Error;

use crate::ir::{Day, MINUTES_PER_DAY};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("invalid meeting interval {start}..{end}: start must precede end within 0..={max}", max = MINUTES_PER_DAY)]
    InvalidInterval { start: u16, end: u16 },
    #[error("invalid grid: {reason}")]
    OutOfRangeGrid { reason: GridProblem },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridProblem {
    #[error("resolution {0} must be in 1..=60 minutes")]
    Resolution(u16),
    #[error("min time {min} is after max time {max}")]
    InvertedWindow { min: u16, max: u16 },
    #[error("time {0} is past the end of the day")]
    PastMidnight(u16),
    #[error("no display days configured")]
    NoDays,
    #[error("{0} is listed more than once in the display days")]
    DuplicateDay(Day),
}

impl From<GridProblem> for LayoutError {
    fn from(reason: GridProblem) -> Self {
        LayoutError::OutOfRangeGrid { reason }
    }
}
