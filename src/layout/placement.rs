use serde::Serialize;

use crate::ir::{Day, MINUTES_PER_DAY, Meeting};

use super::error::{GridProblem, LayoutError};
use super::partition::MeetingGroup;

/// Coordinate system of the grid: row `i` sits at `min_time + i * resolution`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridParams {
    min_time: u16,
    max_time: u16,
    resolution: u16,
    days: Vec<Day>,
}

impl GridParams {
    pub fn new(
        min_time: u16,
        max_time: u16,
        resolution: u16,
        days: Vec<Day>,
    ) -> Result<Self, LayoutError> {
        if resolution == 0 || resolution > 60 {
            return Err(GridProblem::Resolution(resolution).into());
        }
        if max_time > MINUTES_PER_DAY {
            return Err(GridProblem::PastMidnight(max_time).into());
        }
        if min_time > max_time {
            return Err(GridProblem::InvertedWindow {
                min: min_time,
                max: max_time,
            }
            .into());
        }
        if days.is_empty() {
            return Err(GridProblem::NoDays.into());
        }
        if let Some((idx, _)) = days
            .iter()
            .enumerate()
            .find(|(idx, day)| days[..*idx].contains(*day))
        {
            return Err(GridProblem::DuplicateDay(days[idx]).into());
        }
        Ok(Self {
            min_time,
            max_time,
            resolution,
            days,
        })
    }

    pub fn min_time(&self) -> u16 {
        self.min_time
    }

    pub fn max_time(&self) -> u16 {
        self.max_time
    }

    pub fn resolution(&self) -> u16 {
        self.resolution
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    /// Row times from `min_time` through `max_time` inclusive.
    pub fn row_times(&self) -> impl Iterator<Item = u16> + '_ {
        (self.min_time..=self.max_time).step_by(self.resolution as usize)
    }

    pub fn row_count(&self) -> usize {
        ((self.max_time - self.min_time) / self.resolution) as usize + 1
    }

    /// Row index of `time` when it falls exactly on a row inside the window.
    pub fn row_of(&self, time: u16) -> Option<usize> {
        if time < self.min_time || time > self.max_time {
            return None;
        }
        let offset = time - self.min_time;
        (offset % self.resolution == 0).then_some((offset / self.resolution) as usize)
    }

    /// Rows needed to hold `minutes`, rounding partial rows up.
    pub fn row_span(&self, minutes: u16) -> usize {
        minutes.div_ceil(self.resolution) as usize
    }

    /// Rows per hour when the resolution divides an hour evenly.
    pub fn rows_per_hour(&self) -> Option<usize> {
        (60 % self.resolution == 0).then_some((60 / self.resolution) as usize)
    }
}

/// Geometry of one meeting inside its group's cell, in percent of the cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPlacement {
    pub meeting: Meeting,
    pub index: usize,
    pub count: usize,
    pub left_pct: f64,
    pub width_pct: f64,
    pub top_pct: f64,
    pub height_pct: f64,
}

impl SlotPlacement {
    /// Whole-cell placement used for a group without conflicts.
    pub fn is_full_cell(&self) -> bool {
        self.count == 1
    }
}

/// Where a group lands in the grid and how its cell is divided.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPlacement {
    pub day: Day,
    pub row: usize,
    pub start_time: u16,
    pub end_time: u16,
    pub row_span: usize,
    pub slots: Vec<SlotPlacement>,
}

impl GroupPlacement {
    pub fn is_conflict(&self) -> bool {
        self.slots.len() > 1
    }

    /// Rows this placement covers, starting row included.
    pub fn covers_row(&self, row: usize) -> bool {
        row >= self.row && row < self.row + self.row_span
    }
}

/// A group the row sweep can never reach: it starts off the row grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnplacedGroup {
    pub day: Day,
    pub start_time: u16,
    pub end_time: u16,
    pub meetings: usize,
}

/// Slot geometry for every member of `group`.
///
/// Horizontal slots split the cell evenly in member order; vertical offset and
/// height are fractions of the group's time extent. No rounding is applied.
pub fn place_slots(group: &MeetingGroup) -> Vec<SlotPlacement> {
    let count = group.len();
    let span = f64::from(group.span());
    let width_pct = 100.0 / count as f64;
    group
        .meetings()
        .iter()
        .enumerate()
        .map(|(index, meeting)| {
            let (top_pct, height_pct) = if count == 1 {
                (0.0, 100.0)
            } else {
                (
                    f64::from(meeting.start_time() - group.min_start_time()) / span * 100.0,
                    f64::from(meeting.duration()) / span * 100.0,
                )
            };
            SlotPlacement {
                meeting: meeting.clone(),
                index,
                count,
                left_pct: index as f64 * width_pct,
                width_pct,
                top_pct,
                height_pct,
            }
        })
        .collect()
}

/// Places a group at the row of its earliest start, or reports why it can't be.
pub fn place_group(group: &MeetingGroup, grid: &GridParams) -> Result<GroupPlacement, UnplacedGroup> {
    let Some(row) = grid.row_of(group.min_start_time()) else {
        return Err(UnplacedGroup {
            day: group.day(),
            start_time: group.min_start_time(),
            end_time: group.max_end_time(),
            meetings: group.len(),
        });
    };
    Ok(GroupPlacement {
        day: group.day(),
        row,
        start_time: group.min_start_time(),
        end_time: group.max_end_time(),
        row_span: grid.row_span(group.span()),
        slots: place_slots(group),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::partition::partition;

    fn grid(min: u16, max: u16, resolution: u16) -> GridParams {
        GridParams::new(min, max, resolution, Day::WEEK_DAYS.to_vec()).unwrap()
    }

    fn mon(start: u16, end: u16, id: &str) -> Meeting {
        Meeting::new(Day::Monday, start, end, 0, id).unwrap()
    }

    #[test]
    fn validates_grid_bounds() {
        let days = Day::WEEK_DAYS.to_vec();
        assert!(matches!(
            GridParams::new(480, 1320, 0, days.clone()),
            Err(LayoutError::OutOfRangeGrid { reason: GridProblem::Resolution(0) })
        ));
        assert!(GridParams::new(480, 1320, 61, days.clone()).is_err());
        assert!(GridParams::new(600, 480, 15, days.clone()).is_err());
        assert!(GridParams::new(480, 1441, 15, days.clone()).is_err());
        assert!(GridParams::new(480, 1320, 15, Vec::new()).is_err());
        assert!(GridParams::new(480, 480, 15, days.clone()).is_ok());
        assert!(GridParams::new(0, 1440, 60, days).is_ok());
    }

    #[test]
    fn repeated_days_are_rejected() {
        assert_eq!(
            GridParams::new(480, 600, 30, vec![Day::Monday, Day::Monday]),
            Err(LayoutError::OutOfRangeGrid {
                reason: GridProblem::DuplicateDay(Day::Monday)
            })
        );
        assert!(matches!(
            GridParams::new(480, 600, 30, vec![Day::Friday, Day::Monday, Day::Friday]),
            Err(LayoutError::OutOfRangeGrid { reason: GridProblem::DuplicateDay(Day::Friday) })
        ));
        let reordered = GridParams::new(480, 600, 30, vec![Day::Friday, Day::Monday]).unwrap();
        assert_eq!(reordered.days(), &[Day::Friday, Day::Monday]);
    }

    #[test]
    fn row_span_rounds_up() {
        let g = grid(480, 1320, 15);
        assert_eq!(g.row_span(90), 6);
        assert_eq!(g.row_span(100), 7);
        assert_eq!(g.row_span(1), 1);
    }

    #[test]
    fn rows_follow_resolution_inclusively() {
        let g = grid(480, 540, 15);
        assert_eq!(g.row_times().collect::<Vec<_>>(), vec![480, 495, 510, 525, 540]);
        assert_eq!(g.row_count(), 5);
        let uneven = grid(480, 530, 15);
        assert_eq!(uneven.row_times().collect::<Vec<_>>(), vec![480, 495, 510, 525]);
        assert_eq!(uneven.row_count(), 4);
        assert_eq!(g.row_of(510), Some(2));
        assert_eq!(g.row_of(500), None);
        assert_eq!(g.row_of(600), None);
    }

    #[test]
    fn places_group_at_start_row() {
        let groups = partition(&[mon(540, 630, "A")]);
        let placed = place_group(&groups[0], &grid(480, 1320, 15)).unwrap();
        assert_eq!(placed.row, 4);
        assert_eq!(placed.row_span, 6);
        assert!(!placed.is_conflict());
        let slot = &placed.slots[0];
        assert!(slot.is_full_cell());
        assert_eq!((slot.left_pct, slot.width_pct, slot.top_pct, slot.height_pct), (0.0, 100.0, 0.0, 100.0));
    }

    #[test]
    fn three_way_conflict_splits_into_thirds() {
        let groups = partition(&[mon(540, 600, "A"), mon(540, 600, "B"), mon(540, 600, "C")]);
        let slots = place_slots(&groups[0]);
        assert_eq!(slots.len(), 3);
        for slot in &slots {
            assert!((slot.width_pct - 33.333).abs() < 0.01);
        }
        assert!(slots[0].left_pct.abs() < 1e-9);
        assert!((slots[1].left_pct - 33.333).abs() < 0.01);
        assert!((slots[2].left_pct - 66.667).abs() < 0.01);
    }

    #[test]
    fn vertical_geometry_is_relative_to_group_extent() {
        // Group spans 540..660 (120 minutes).
        let groups = partition(&[mon(540, 630, "A"), mon(600, 660, "B")]);
        let slots = place_slots(&groups[0]);
        assert_eq!(slots[0].top_pct, 0.0);
        assert_eq!(slots[0].height_pct, 75.0);
        assert_eq!(slots[1].top_pct, 50.0);
        assert_eq!(slots[1].height_pct, 50.0);
    }

    #[test]
    fn off_grid_groups_are_unplaced() {
        let g = grid(480, 1320, 15);
        let groups = partition(&[mon(490, 530, "A"), mon(420, 470, "B")]);
        for group in &groups {
            assert!(place_group(group, &g).is_err());
        }
    }
}
