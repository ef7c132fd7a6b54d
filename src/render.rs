use crate::config::RenderConfig;
use crate::style::{StyledCell, StyledSlot, StyledTimetable};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

// Slot insets, in em of the cell font.
const FIRST_SLOT_INSET: f32 = 0.3;
const SLOT_GAP: f32 = 0.1;
const SLOT_WIDTH_TRIM: f32 = 0.4;
const SLOT_HEIGHT_TRIM: f32 = 0.1;
const SLOT_TOP_NUDGE_PX: f32 = 1.6;
// Whole-cell insets for a meeting without conflicts.
const CELL_INSET_X: f32 = 0.3;
const CELL_INSET_TOP: f32 = 0.2;

const CELL_FONT_SCALE: f32 = 1.2;
const AVG_CHAR_WIDTH: f32 = 0.58;

struct Grid {
    x0: f32,
    y0: f32,
    col_width: f32,
    row_height: f32,
    width: f32,
    height: f32,
}

impl Grid {
    fn new(table: &StyledTimetable, config: &RenderConfig) -> Self {
        let x0 = config.time_column_width;
        let y0 = config.header_height;
        let columns = table.days.len().max(1) as f32;
        let col_width = ((config.width - x0) / columns).max(1.0);
        let row_height = config.row_height(table.resolution, table.presentation.scale);
        let height = y0 + table.rows.len() as f32 * row_height;
        Self {
            x0,
            y0,
            col_width,
            row_height,
            width: x0 + col_width * columns,
            height,
        }
    }

    fn column_x(&self, col: usize) -> f32 {
        self.x0 + col as f32 * self.col_width
    }

    fn row_y(&self, row: usize) -> f32 {
        self.y0 + row as f32 * self.row_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

/// Rectangle of one slot inside a cell at `(x, y)` of size `w` x `h`.
fn slot_rect(slot: &StyledSlot, x: f32, y: f32, w: f32, h: f32, em: f32) -> Rect {
    if slot.count <= 1 {
        return Rect {
            x: x + CELL_INSET_X * em,
            y: y + CELL_INSET_TOP * em,
            width: (w - 2.0 * CELL_INSET_X * em).max(1.0),
            height: (h - CELL_INSET_TOP * em).max(1.0),
        };
    }
    let inset = if slot.index == 0 { FIRST_SLOT_INSET } else { SLOT_GAP };
    Rect {
        x: x + (slot.left_pct as f32 / 100.0) * w + inset * em,
        y: y + (slot.top_pct as f32 / 100.0) * h + SLOT_TOP_NUDGE_PX,
        width: ((slot.width_pct as f32 / 100.0) * w - SLOT_WIDTH_TRIM * em).max(1.0),
        height: ((slot.height_pct as f32 / 100.0) * h - SLOT_HEIGHT_TRIM * em).max(1.0),
    }
}

fn fit_text(text: &str, width: f32, font_size: f32) -> String {
    let max_chars = (width / (font_size * AVG_CHAR_WIDTH)).floor().max(0.0) as usize;
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    if max_chars <= 1 {
        return String::new();
    }
    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

pub fn render_svg(table: &StyledTimetable, theme: &Theme, config: &RenderConfig) -> String {
    let grid = Grid::new(table, config);
    let width = grid.width;
    let height = grid.height;
    let em = theme.font_size * CELL_FONT_SCALE;
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">"
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    for (col, header) in table.headers.iter().enumerate() {
        let cx = grid.column_x(col) + grid.col_width / 2.0;
        svg.push_str(&format!(
            "<text x=\"{cx:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"600\" fill=\"{}\">{}</text>",
            grid.y0 * 0.65,
            escape_xml(&theme.font_family),
            theme.font_size * 1.6,
            theme.header_color,
            escape_xml(header)
        ));
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let y = grid.row_y(row_idx);
        if row.major {
            svg.push_str(&format!(
                "<line x1=\"{:.2}\" y1=\"{y:.2}\" x2=\"{:.2}\" y2=\"{y:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
                grid.x0, width, theme.hour_line_color
            ));
        }
        if let Some(StyledCell::TimeLabel { text }) = row.cells.first() {
            if text.is_empty() {
                continue;
            }
            let (label, fill) = if row.major {
                (text.as_str(), theme.text_color.as_str())
            } else {
                ("-", theme.muted_text_color.as_str())
            };
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                grid.x0 - 8.0,
                y + theme.font_size * 0.4,
                escape_xml(&theme.label_font_family),
                theme.font_size * 1.2,
                fill,
                escape_xml(label)
            ));
        }
    }

    for col in 0..=table.days.len() {
        let x = grid.column_x(col);
        svg.push_str(&format!(
            "<line x1=\"{x:.2}\" y1=\"{:.2}\" x2=\"{x:.2}\" y2=\"{height:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
            grid.y0 * 0.3,
            theme.grid_line_color
        ));
    }

    for (row_idx, col, cell) in table.meeting_cells() {
        let StyledCell::Meeting { row_span, slots, .. } = cell else {
            continue;
        };
        let x = grid.column_x(col);
        let y = grid.row_y(row_idx);
        let h = *row_span as f32 * grid.row_height;
        for slot in slots {
            let rect = slot_rect(slot, x, y, grid.col_width, h, em);
            svg.push_str(&slot_svg(slot, rect, theme, em));
        }
    }

    svg.push_str("</svg>");
    svg
}

fn slot_svg(slot: &StyledSlot, rect: Rect, theme: &Theme, em: f32) -> String {
    let mut out = String::new();
    let stroke = if slot.selected {
        format!(
            " stroke=\"{}\" stroke-width=\"{:.2}\"",
            theme.selection_color,
            em * 0.15 * 2.0
        )
    } else {
        String::new()
    };
    out.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"2\" ry=\"2\" fill=\"{}\"{stroke}/>",
        rect.x, rect.y, rect.width, rect.height, slot.fill
    ));

    let pad = em * 0.5;
    let text_width = rect.width - pad * 1.5;
    let line = theme.font_size * 1.3;
    let lines = [
        (fit_text(&slot.label, text_width, theme.font_size), "500"),
        (fit_text(&slot.detail, text_width, theme.font_size), "400"),
    ];
    let mut ty = rect.y + pad + theme.font_size;
    for (text, weight) in lines {
        if text.is_empty() || ty > rect.y + rect.height {
            break;
        }
        out.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{ty:.2}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"{weight}\" fill=\"{}\">{}</text>",
            rect.x + pad,
            escape_xml(&theme.font_family),
            theme.font_size,
            slot.text_color,
            escape_xml(&text)
        ));
        ty += line;
    }
    out
}

/// Renders the rows as an HTML `<table>`; occupied cells use `rowspan` and
/// covered cells are omitted.
pub fn render_html(table: &StyledTimetable, theme: &Theme, config: &RenderConfig) -> String {
    let row_height = config.row_height(table.resolution, table.presentation.scale);
    let mut html = String::new();
    html.push_str(&format!(
        "<style>.timetable{{border-collapse:collapse;width:100%;min-width:500px;font-family:{font};font-size:{size}px;background:{bg};color:{text}}}\
.timetable th{{border-right:1px solid {grid};padding-bottom:0.8em;color:{header}}}\
.timetable td{{padding:0;position:relative;border-right:1px solid {grid}}}\
.timetable td.time{{width:1px;padding-right:1em;text-align:right;font-family:{label_font};color:{muted}}}\
.timetable tr.major td.time{{color:{text};font-weight:500}}\
.timetable tr.major td{{border-top:1px solid {hour}}}\
.timetable .meeting-time{{position:absolute;overflow:hidden;text-overflow:ellipsis;padding:0.6rem;padding-right:0;font-weight:500;box-shadow:1px 1px 4px -3px {shadow}}}\
.timetable .meeting-time.selected{{box-shadow:inset 0 0 0 0.15rem {selection};cursor:default}}\
.timetable .meeting-time small{{display:block;font-weight:400}}</style>",
        font = theme.font_family,
        size = theme.font_size,
        bg = theme.background,
        text = theme.text_color,
        grid = theme.grid_line_color,
        header = theme.header_color,
        label_font = theme.label_font_family,
        muted = theme.muted_text_color,
        hour = theme.hour_line_color,
        shadow = theme.shadow_color,
        selection = theme.selection_color,
    ));

    html.push_str("<table class=\"timetable\"><thead><tr><th></th>");
    for header in &table.headers {
        html.push_str(&format!("<th>{}</th>", escape_xml(header)));
    }
    html.push_str("</tr></thead><tbody>");

    let columns = table.days.len().max(1);
    for row in &table.rows {
        let class = if row.major { "major" } else { "minor" };
        html.push_str(&format!(
            "<tr class=\"{class}\" data-time=\"{}\" style=\"height:{row_height:.2}px\">",
            row.time
        ));
        for cell in &row.cells {
            match cell {
                StyledCell::TimeLabel { text } => {
                    let shown = if text.is_empty() {
                        "&nbsp;".to_string()
                    } else if row.major {
                        escape_xml(text)
                    } else {
                        "-".to_string()
                    };
                    html.push_str(&format!("<td class=\"time\">{shown}</td>"));
                }
                StyledCell::Empty { .. } => {
                    html.push_str(&format!("<td style=\"width:calc(100% / {columns})\"></td>"));
                }
                StyledCell::Meeting {
                    row_span, slots, ..
                } => {
                    html.push_str(&format!(
                        "<td rowspan=\"{row_span}\" style=\"width:calc(100% / {columns})\">"
                    ));
                    for slot in slots {
                        html.push_str(&slot_html(slot));
                    }
                    html.push_str("</td>");
                }
            }
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

fn slot_html(slot: &StyledSlot) -> String {
    let geometry = if slot.count <= 1 {
        "top:0.2em;right:0.3em;bottom:0;left:0.3em".to_string()
    } else {
        let inset = if slot.index == 0 { FIRST_SLOT_INSET } else { SLOT_GAP };
        format!(
            "width:calc({:.4}% - {SLOT_WIDTH_TRIM}em);height:calc({:.4}% - {SLOT_HEIGHT_TRIM}em);left:calc({:.4}% + {inset}em);top:calc({:.4}% + 0.1rem)",
            slot.width_pct, slot.height_pct, slot.left_pct, slot.top_pct
        )
    };
    let class = if slot.selected {
        "meeting-time selected"
    } else {
        "meeting-time"
    };
    format!(
        "<div class=\"{class}\" data-identifier=\"{}\" data-course-key=\"{}\" style=\"{geometry};background-color:{};color:{}\">{}<small>{}</small></div>",
        escape_xml(&slot.identifier),
        slot.course_key,
        slot.fill,
        slot.text_color,
        escape_xml(&slot.label),
        escape_xml(&slot.detail)
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .map(|f| f.trim().trim_matches('"').to_string())
        .unwrap_or_else(|| "Inter".to_string());
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.height) {
        opt.default_size = size;
    }
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Day, Meeting};
    use crate::layout::{GridParams, compute_layout};
    use crate::style::{Interaction, Presentation, decorate};

    fn styled() -> StyledTimetable {
        let meetings = vec![
            Meeting::new(Day::Monday, 540, 630, 1, "A&B").unwrap().with_title("Alpha <1>"),
            Meeting::new(Day::Monday, 600, 660, 2, "C").unwrap(),
            Meeting::new(Day::Wednesday, 600, 720, 3, "D").unwrap(),
        ];
        let grid = GridParams::new(480, 720, 30, vec![Day::Monday, Day::Tuesday, Day::Wednesday]).unwrap();
        let layout = compute_layout(&meetings, &grid);
        decorate(&layout, &Presentation::default(), &Interaction::default(), &Theme::light())
    }

    #[test]
    fn render_svg_basic() {
        let svg = render_svg(&styled(), &Theme::light(), &RenderConfig::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(">Mon<"));
        assert!(svg.contains(">Wed<"));
        assert!(svg.contains("Alpha &lt;1&gt;"));
        assert!(svg.contains(&Theme::light().conflict_color));
    }

    #[test]
    fn render_html_uses_rowspans_and_skips_covered_cells() {
        let table = styled();
        let html = render_html(&table, &Theme::light(), &RenderConfig::default());
        assert!(html.contains("rowspan=\"4\""));
        assert!(html.contains("data-identifier=\"A&amp;B\""));
        // One time label plus one cell per uncovered day in each row.
        assert_eq!(html.matches("<tr class=").count(), table.rows.len());
        assert_eq!(html.matches("<td class=\"time\">").count(), table.rows.len());
        let tds = html.matches("<td").count();
        let covered = 3 + 3;
        assert_eq!(tds, table.rows.len() * 4 - covered);
    }

    #[test]
    fn conflict_slots_are_inset_and_split() {
        let table = styled();
        let (_, _, cell) = table.meeting_cells().next().unwrap();
        let StyledCell::Meeting { slots, .. } = cell else {
            panic!("expected meeting cell");
        };
        let em = 12.0;
        let first = slot_rect(&slots[0], 100.0, 0.0, 200.0, 120.0, em);
        let second = slot_rect(&slots[1], 100.0, 0.0, 200.0, 120.0, em);
        assert!((first.x - (100.0 + 0.3 * em)).abs() < 1e-3);
        assert!((second.x - (200.0 + 0.1 * em)).abs() < 1e-3);
        assert!((first.width - (100.0 - 0.4 * em)).abs() < 1e-3);
        assert!(second.y > first.y);
    }

    #[test]
    fn fit_text_truncates_with_ellipsis() {
        assert_eq!(fit_text("short", 100.0, 10.0), "short");
        let cut = fit_text("a much longer label", 40.0, 10.0);
        assert!(cut.ends_with('…'));
        assert!(cut.chars().count() <= 6);
        assert_eq!(fit_text("anything", 5.0, 10.0), "");
    }
}
