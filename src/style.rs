//! Presentation adapter: attaches colours, labels and highlight state to the
//! pure geometry produced by [`crate::layout`].

use serde::{Deserialize, Serialize};

use crate::ir::{Day, Meeting};
use crate::layout::{Cell, GroupPlacement, SlotPlacement, TimetableLayout};
use crate::theme::{PaletteId, Theme, course_key_to_colour};
use crate::time::format_minute_offset;

/// Presentation-only switches. The layout never reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Presentation {
    pub palette: PaletteId,
    pub dark: bool,
    pub highlight_conflicts: bool,
    pub twenty_four: bool,
    pub show_time: bool,
    pub emphasize_on_hover: bool,
    /// Row height scale; 45 matches the stock look.
    pub scale: f32,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            palette: PaletteId::Default,
            dark: false,
            highlight_conflicts: true,
            twenty_four: true,
            show_time: true,
            emphasize_on_hover: true,
            scale: 45.0,
        }
    }
}

/// Snapshot of hover and selection state owned by the host application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Interaction {
    pub hover_course_key: Option<u32>,
    pub selected: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledSlot {
    pub identifier: String,
    pub course_key: u32,
    pub label: String,
    pub detail: String,
    pub left_pct: f64,
    pub width_pct: f64,
    pub top_pct: f64,
    pub height_pct: f64,
    pub index: usize,
    pub count: usize,
    pub fill: String,
    pub text_color: String,
    pub highlight: bool,
    pub selected: bool,
    pub conflict: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StyledCell {
    TimeLabel { text: String },
    Meeting {
        day: Day,
        row_span: usize,
        conflict: bool,
        slots: Vec<StyledSlot>,
    },
    Empty { day: Day },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledRow {
    pub time: u16,
    /// First row of an hour; minor rows draw a tick instead of the label.
    pub major: bool,
    pub cells: Vec<StyledCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledTimetable {
    pub headers: Vec<String>,
    pub days: Vec<Day>,
    pub rows: Vec<StyledRow>,
    pub resolution: u16,
    pub presentation: Presentation,
}

impl StyledTimetable {
    /// `(row index, column index, cell)` for every meeting cell.
    pub fn meeting_cells(&self) -> impl Iterator<Item = (usize, usize, &StyledCell)> + '_ {
        self.rows.iter().enumerate().flat_map(move |(row_idx, row)| {
            row.cells
                .iter()
                .filter_map(move |cell| match cell {
                    StyledCell::Meeting { day, .. } => {
                        let col = self.days.iter().position(|d| d == day)?;
                        Some((row_idx, col, cell))
                    }
                    _ => None,
                })
        })
    }
}

fn slot_detail(meeting: &Meeting, twenty_four: bool) -> String {
    let range = format!(
        "{} – {}",
        format_minute_offset(meeting.start_time(), twenty_four),
        format_minute_offset(meeting.end_time(), twenty_four)
    );
    match meeting.location() {
        Some(location) => format!("{range} · {location}"),
        None => range,
    }
}

fn style_slot(
    slot: &SlotPlacement,
    conflict: bool,
    presentation: &Presentation,
    interaction: &Interaction,
    theme: &Theme,
) -> StyledSlot {
    let meeting = &slot.meeting;
    let hovered = interaction.hover_course_key == Some(meeting.course_key());
    let highlight = hovered && presentation.emphasize_on_hover;
    let selected = interaction.selected.as_deref() == Some(meeting.identifier());

    let lighten = match (presentation.dark, highlight) {
        (false, false) => 0.0,
        (false, true) => -10.0,
        (true, false) => -40.0,
        (true, true) => -25.0,
    };
    let course_fill = course_key_to_colour(meeting.course_key(), presentation.palette, 1.0, lighten);

    let flagged = conflict && presentation.highlight_conflicts;
    let fill = if flagged && !highlight {
        theme.conflict_color.clone()
    } else {
        course_fill
    };

    let dark_text = if conflict {
        !(presentation.dark || presentation.highlight_conflicts) || (highlight && !presentation.dark)
    } else {
        !presentation.dark
    };
    let text_color = if dark_text {
        theme.dark_text_color.clone()
    } else {
        theme.light_text_color.clone()
    };

    StyledSlot {
        identifier: meeting.identifier().to_string(),
        course_key: meeting.course_key(),
        label: meeting.display_label().to_string(),
        detail: slot_detail(meeting, presentation.twenty_four),
        left_pct: slot.left_pct,
        width_pct: slot.width_pct,
        top_pct: slot.top_pct,
        height_pct: slot.height_pct,
        index: slot.index,
        count: slot.count,
        fill,
        text_color,
        highlight,
        selected,
        conflict: flagged,
    }
}

fn style_placement(
    placement: &GroupPlacement,
    presentation: &Presentation,
    interaction: &Interaction,
    theme: &Theme,
) -> StyledCell {
    let conflict = placement.is_conflict();
    StyledCell::Meeting {
        day: placement.day,
        row_span: placement.row_span,
        conflict,
        slots: placement
            .slots
            .iter()
            .map(|slot| style_slot(slot, conflict, presentation, interaction, theme))
            .collect(),
    }
}

/// Decorates a computed layout for display.
pub fn decorate(
    layout: &TimetableLayout,
    presentation: &Presentation,
    interaction: &Interaction,
    theme: &Theme,
) -> StyledTimetable {
    let rows_per_hour = layout.grid.rows_per_hour();
    let rows = layout
        .rows
        .iter()
        .enumerate()
        .map(|(row_idx, row)| {
            let major = rows_per_hour.is_some_and(|n| row_idx % n == 0);
            let cells = row
                .cells
                .iter()
                .filter_map(|cell| match cell {
                    Cell::TimeLabel { time } => Some(StyledCell::TimeLabel {
                        text: if presentation.show_time {
                            format_minute_offset(*time, presentation.twenty_four)
                        } else {
                            String::new()
                        },
                    }),
                    Cell::Occupied { placement, .. } => layout
                        .placement(*placement)
                        .map(|p| style_placement(p, presentation, interaction, theme)),
                    Cell::Empty { day } => Some(StyledCell::Empty { day: *day }),
                })
                .collect();
            StyledRow {
                time: row.time,
                major,
                cells,
            }
        })
        .collect();

    StyledTimetable {
        headers: layout.days().iter().map(|d| d.short().to_string()).collect(),
        days: layout.days().to_vec(),
        rows,
        resolution: layout.grid.resolution(),
        presentation: presentation.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{GridParams, compute_layout};

    fn layout() -> TimetableLayout {
        let meetings = vec![
            Meeting::new(Day::Monday, 540, 630, 1, "COMP1511").unwrap().with_title("Programming"),
            Meeting::new(Day::Monday, 600, 660, 2, "MATH1131").unwrap().with_location("Quad"),
            Meeting::new(Day::Tuesday, 540, 600, 3, "PHYS1121").unwrap(),
        ];
        let grid = GridParams::new(480, 720, 30, vec![Day::Monday, Day::Tuesday]).unwrap();
        compute_layout(&meetings, &grid)
    }

    fn slots(styled: &StyledTimetable, day: Day) -> Vec<StyledSlot> {
        styled
            .meeting_cells()
            .filter_map(|(_, _, cell)| match cell {
                StyledCell::Meeting { day: d, slots, .. } if *d == day => Some(slots.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    #[test]
    fn conflicts_are_flagged_red_unless_hovered() {
        let theme = Theme::light();
        let styled = decorate(&layout(), &Presentation::default(), &Interaction::default(), &theme);
        let monday = slots(&styled, Day::Monday);
        assert_eq!(monday.len(), 2);
        assert!(monday.iter().all(|s| s.conflict && s.fill == theme.conflict_color));
        assert!(monday.iter().all(|s| s.text_color == theme.light_text_color));

        let hover = Interaction {
            hover_course_key: Some(2),
            selected: None,
        };
        let styled = decorate(&layout(), &Presentation::default(), &hover, &theme);
        let monday = slots(&styled, Day::Monday);
        assert_eq!(monday[0].fill, theme.conflict_color);
        assert_ne!(monday[1].fill, theme.conflict_color);
        assert!(monday[1].highlight);
        assert_eq!(monday[1].text_color, theme.dark_text_color);
    }

    #[test]
    fn conflict_highlighting_can_be_disabled() {
        let theme = Theme::light();
        let presentation = Presentation {
            highlight_conflicts: false,
            ..Presentation::default()
        };
        let styled = decorate(&layout(), &presentation, &Interaction::default(), &theme);
        let monday = slots(&styled, Day::Monday);
        assert!(monday.iter().all(|s| !s.conflict && s.fill != theme.conflict_color));
        assert!(monday.iter().all(|s| s.text_color == theme.dark_text_color));
    }

    #[test]
    fn selection_and_labels_pass_through() {
        let theme = Theme::light();
        let interaction = Interaction {
            hover_course_key: None,
            selected: Some("PHYS1121".to_string()),
        };
        let presentation = Presentation {
            twenty_four: false,
            ..Presentation::default()
        };
        let styled = decorate(&layout(), &presentation, &interaction, &theme);
        let tuesday = slots(&styled, Day::Tuesday);
        assert_eq!(tuesday.len(), 1);
        assert!(tuesday[0].selected);
        assert_eq!(tuesday[0].detail, "9:00 AM – 10:00 AM");

        let monday = slots(&styled, Day::Monday);
        assert_eq!(monday[0].label, "Programming");
        assert_eq!(monday[1].label, "MATH1131");
        assert!(monday[1].detail.ends_with("· Quad"));
        assert_eq!(styled.headers, vec!["Mon", "Tue"]);
    }

    #[test]
    fn hour_rows_are_major_and_labels_follow_show_time() {
        let styled = decorate(&layout(), &Presentation::default(), &Interaction::default(), &Theme::light());
        let majors: Vec<u16> = styled.rows.iter().filter(|r| r.major).map(|r| r.time).collect();
        assert_eq!(majors, vec![480, 540, 600, 660, 720]);
        assert_eq!(styled.rows[0].cells[0], StyledCell::TimeLabel { text: "08:00".to_string() });

        let hidden = Presentation {
            show_time: false,
            ..Presentation::default()
        };
        let styled = decorate(&layout(), &hidden, &Interaction::default(), &Theme::light());
        assert_eq!(styled.rows[0].cells[0], StyledCell::TimeLabel { text: String::new() });
    }
}
