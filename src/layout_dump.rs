use crate::layout::{Cell, TimetableLayout};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub min_time: u16,
    pub max_time: u16,
    pub resolution: u16,
    pub days: Vec<String>,
    pub rows: Vec<RowDump>,
    pub groups: Vec<GroupDump>,
    pub unplaced: Vec<UnplacedDump>,
    pub dropped: usize,
}

#[derive(Debug, Serialize)]
pub struct RowDump {
    pub time: u16,
    /// One entry per emitted cell: `"time"`, `"empty:<Day>"` or `"group:<index>"`.
    pub cells: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDump {
    pub day: String,
    pub row: usize,
    pub row_span: usize,
    pub start_time: u16,
    pub end_time: u16,
    pub slots: Vec<SlotDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDump {
    pub identifier: String,
    pub course_key: u32,
    pub start_time: u16,
    pub end_time: u16,
    pub left_pct: f64,
    pub width_pct: f64,
    pub top_pct: f64,
    pub height_pct: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnplacedDump {
    pub day: String,
    pub start_time: u16,
    pub end_time: u16,
    pub meetings: usize,
}

impl LayoutDump {
    pub fn from_layout(layout: &TimetableLayout) -> Self {
        let rows = layout
            .rows
            .iter()
            .map(|row| RowDump {
                time: row.time,
                cells: row
                    .cells
                    .iter()
                    .map(|cell| match cell {
                        Cell::TimeLabel { .. } => "time".to_string(),
                        Cell::Empty { day } => format!("empty:{day}"),
                        Cell::Occupied { placement, .. } => format!("group:{placement}"),
                    })
                    .collect(),
            })
            .collect();

        let groups = layout
            .placements
            .iter()
            .map(|group| GroupDump {
                day: group.day.to_string(),
                row: group.row,
                row_span: group.row_span,
                start_time: group.start_time,
                end_time: group.end_time,
                slots: group
                    .slots
                    .iter()
                    .map(|slot| SlotDump {
                        identifier: slot.meeting.identifier().to_string(),
                        course_key: slot.meeting.course_key(),
                        start_time: slot.meeting.start_time(),
                        end_time: slot.meeting.end_time(),
                        left_pct: slot.left_pct,
                        width_pct: slot.width_pct,
                        top_pct: slot.top_pct,
                        height_pct: slot.height_pct,
                    })
                    .collect(),
            })
            .collect();

        let unplaced = layout
            .unplaced
            .iter()
            .map(|u| UnplacedDump {
                day: u.day.to_string(),
                start_time: u.start_time,
                end_time: u.end_time,
                meetings: u.meetings,
            })
            .collect();

        LayoutDump {
            min_time: layout.grid.min_time(),
            max_time: layout.grid.max_time(),
            resolution: layout.grid.resolution(),
            days: layout.days().iter().map(|d| d.to_string()).collect(),
            rows,
            groups,
            unplaced,
            dropped: layout.dropped,
        }
    }
}

pub fn layout_dump_json(layout: &TimetableLayout) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&LayoutDump::from_layout(layout))?)
}

pub fn write_layout_dump(path: &Path, layout: &TimetableLayout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
