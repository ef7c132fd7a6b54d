#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod style;
pub mod theme;
pub mod time;
pub mod timetable;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, GridConfig, RenderConfig, load_config, merge_init_config};
pub use ir::{Day, Meeting};
pub use layout::{
    Cell, GridParams, GroupPlacement, LayoutCache, LayoutError, MeetingGroup, Row, SlotPlacement,
    TimetableLayout, compute_layout, partition,
};
pub use parser::{ParseError, ParsedTimetable, parse_timetable};
pub use render::{render_html, render_svg};
pub use style::{Interaction, Presentation, StyledTimetable, decorate};
pub use theme::{PaletteId, Theme};
pub use timetable::Timetable;

/// Everything needed to turn an input document into markup.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub config: Config,
    pub interaction: Interaction,
}

impl RenderOptions {
    pub fn light() -> Self {
        Self::default()
    }

    pub fn dark() -> Self {
        let mut options = Self::default();
        options.config.presentation.dark = true;
        options.config.theme = Theme::dark();
        options
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    Svg,
    Html,
}

/// Parses `input`, applies any embedded config block and renders it.
pub fn render_with_options(input: &str, options: RenderOptions, markup: Markup) -> anyhow::Result<String> {
    let parsed = parse_timetable(input)?;
    let mut config = options.config;
    if let Some(init) = parsed.init_config {
        config = merge_init_config(config, init)?;
    }
    let mut timetable = Timetable::new(config);
    timetable.set_interaction(options.interaction);
    let out = match markup {
        Markup::Svg => timetable.to_svg(&parsed.meetings)?,
        Markup::Html => timetable.to_html(&parsed.meetings)?,
    };
    Ok(out)
}
