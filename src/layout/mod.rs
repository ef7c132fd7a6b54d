mod cache;
mod error;
mod partition;
mod placement;
mod rows;

pub use cache::LayoutCache;
pub use error::{GridProblem, LayoutError};
pub use partition::{GroupsByDay, MeetingGroup, group_by_day, partition};
pub use placement::{
    GridParams, GroupPlacement, SlotPlacement, UnplacedGroup, place_group, place_slots,
};
pub use rows::{Cell, Row, emit_rows};

use serde::Serialize;

use crate::ir::{Day, Meeting};

/// Immutable result of one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableLayout {
    pub grid: GridParams,
    pub rows: Vec<Row>,
    /// Placed groups, day-major in display order, then by start time.
    pub placements: Vec<GroupPlacement>,
    pub unplaced: Vec<UnplacedGroup>,
    /// Meetings whose day has no column.
    pub dropped: usize,
}

impl TimetableLayout {
    pub fn days(&self) -> &[Day] {
        self.grid.days()
    }

    pub fn placement(&self, idx: usize) -> Option<&GroupPlacement> {
        self.placements.get(idx)
    }

    /// Placed groups that split their cell between several meetings.
    pub fn conflicts(&self) -> impl Iterator<Item = &GroupPlacement> + '_ {
        self.placements.iter().filter(|p| p.is_conflict())
    }

    pub fn placements_for(&self, day: Day) -> impl Iterator<Item = &GroupPlacement> + '_ {
        self.placements.iter().filter(move |p| p.day == day)
    }
}

pub(crate) fn layout_from_groups(groups: &GroupsByDay, grid: &GridParams) -> TimetableLayout {
    let mut placements = Vec::new();
    let mut unplaced = Vec::new();
    for (day, day_groups) in groups.iter() {
        for group in day_groups {
            match place_group(group, grid) {
                Ok(placement) => placements.push(placement),
                Err(missing) => {
                    tracing::warn!(
                        %day,
                        start = missing.start_time,
                        end = missing.end_time,
                        min_time = grid.min_time(),
                        max_time = grid.max_time(),
                        resolution = grid.resolution(),
                        "group does not start on a grid row; it will not be drawn"
                    );
                    unplaced.push(missing);
                }
            }
        }
    }

    let rows = emit_rows(&placements, grid);
    tracing::debug!(
        rows = rows.len(),
        placements = placements.len(),
        unplaced = unplaced.len(),
        "timetable layout computed"
    );

    TimetableLayout {
        grid: grid.clone(),
        rows,
        placements,
        unplaced,
        dropped: groups.dropped(),
    }
}

/// Runs the full pipeline: group by day, partition, place, emit rows.
pub fn compute_layout(meetings: &[Meeting], grid: &GridParams) -> TimetableLayout {
    let groups = group_by_day(meetings, grid.days());
    layout_from_groups(&groups, grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meeting(day: Day, start: u16, end: u16, id: &str) -> Meeting {
        Meeting::new(day, start, end, 0, id).unwrap()
    }

    #[test]
    fn overlapping_meetings_share_one_cell() {
        let grid = GridParams::new(480, 1320, 15, Day::WEEK_DAYS.to_vec()).unwrap();
        let layout = compute_layout(
            &[meeting(Day::Monday, 540, 630, "A"), meeting(Day::Monday, 600, 660, "B")],
            &grid,
        );
        assert_eq!(layout.placements.len(), 1);
        let placed = &layout.placements[0];
        assert_eq!((placed.start_time, placed.end_time), (540, 660));
        assert_eq!(placed.row_span, 8);
        assert_eq!(layout.conflicts().count(), 1);
        assert_eq!(layout.rows.len(), 57);
    }

    #[test]
    fn unknown_days_are_dropped_not_rejected() {
        let grid = GridParams::new(480, 600, 60, vec![Day::Monday]).unwrap();
        let layout = compute_layout(&[meeting(Day::Sunday, 480, 540, "S")], &grid);
        assert_eq!(layout.dropped, 1);
        assert!(layout.placements.is_empty());
        for row in &layout.rows {
            assert_eq!(row.cells[1], Cell::Empty { day: Day::Monday });
        }
    }

    #[test]
    fn off_grid_groups_are_reported_and_leave_rows_empty() {
        let grid = GridParams::new(480, 600, 30, vec![Day::Tuesday]).unwrap();
        let layout = compute_layout(&[meeting(Day::Tuesday, 500, 560, "T")], &grid);
        assert!(layout.placements.is_empty());
        assert_eq!(layout.unplaced.len(), 1);
        assert_eq!(layout.unplaced[0].start_time, 500);
        assert!(layout.rows.iter().all(|row| row.cells.len() == 2));
    }

    #[test]
    fn placements_are_day_major_in_display_order() {
        let grid = GridParams::new(480, 1320, 30, vec![Day::Friday, Day::Monday]).unwrap();
        let layout = compute_layout(
            &[
                meeting(Day::Monday, 540, 600, "M1"),
                meeting(Day::Friday, 600, 660, "F2"),
                meeting(Day::Friday, 480, 540, "F1"),
            ],
            &grid,
        );
        let order: Vec<(Day, u16)> = layout.placements.iter().map(|p| (p.day, p.start_time)).collect();
        assert_eq!(order, vec![(Day::Friday, 480), (Day::Friday, 600), (Day::Monday, 540)]);
        assert_eq!(layout.placements_for(Day::Friday).count(), 2);
    }
}
