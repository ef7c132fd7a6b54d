use serde::Serialize;

use crate::ir::Day;

use super::placement::{GridParams, GroupPlacement};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Cell {
    TimeLabel { time: u16 },
    /// Index into [`super::TimetableLayout::placements`].
    Occupied { day: Day, placement: usize, row_span: usize },
    Empty { day: Day },
}

/// One grid row. Days covered by an earlier row-span contribute no cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub time: u16,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn occupied(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells.iter().filter_map(|cell| match cell {
            Cell::Occupied { placement, .. } => Some(*placement),
            _ => None,
        })
    }
}

/// Sweeps the time axis and emits one row per grid time.
///
/// `placements` must hold at most one entry per (day, row), which holds for
/// groups produced by the partitioner since same-day groups are disjoint.
pub fn emit_rows(placements: &[GroupPlacement], grid: &GridParams) -> Vec<Row> {
    let mut rows = Vec::with_capacity(grid.row_count());
    for (row_idx, time) in grid.row_times().enumerate() {
        let mut cells = Vec::with_capacity(grid.days().len() + 1);
        cells.push(Cell::TimeLabel { time });

        for &day in grid.days() {
            let mut covered = false;
            let mut started = None;
            for (idx, placement) in placements.iter().enumerate() {
                if placement.day != day {
                    continue;
                }
                if placement.row == row_idx {
                    started = Some((idx, placement.row_span));
                    break;
                }
                if placement.covers_row(row_idx) {
                    covered = true;
                }
            }

            match started {
                Some((placement, row_span)) => cells.push(Cell::Occupied {
                    day,
                    placement,
                    row_span,
                }),
                None if !covered => cells.push(Cell::Empty { day }),
                None => {}
            }
        }

        rows.push(Row { time, cells });
    }
    rows
}
