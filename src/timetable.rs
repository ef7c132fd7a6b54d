use crate::config::Config;
use crate::ir::Meeting;
use crate::layout::{LayoutCache, LayoutError, TimetableLayout};
use crate::render::{render_html, render_svg};
use crate::style::{Interaction, StyledTimetable, decorate};

/// A long-lived timetable view: configuration, interaction state and the
/// grouping memo. Re-rendering with an unchanged meeting set and day list
/// skips clustering.
pub struct Timetable {
    config: Config,
    interaction: Interaction,
    cache: LayoutCache,
}

impl Timetable {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            interaction: Interaction::default(),
            cache: LayoutCache::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn set_interaction(&mut self, interaction: Interaction) {
        self.interaction = interaction;
    }

    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    pub fn layout(&mut self, meetings: &[Meeting]) -> Result<TimetableLayout, LayoutError> {
        let grid = self.config.grid.to_params()?;
        Ok(self.cache.layout(meetings, &grid))
    }

    pub fn styled(&mut self, meetings: &[Meeting]) -> Result<StyledTimetable, LayoutError> {
        let layout = self.layout(meetings)?;
        Ok(decorate(
            &layout,
            &self.config.presentation,
            &self.interaction,
            &self.config.theme,
        ))
    }

    pub fn to_svg(&mut self, meetings: &[Meeting]) -> Result<String, LayoutError> {
        let styled = self.styled(meetings)?;
        Ok(render_svg(&styled, &self.config.theme, &self.config.render))
    }

    pub fn to_html(&mut self, meetings: &[Meeting]) -> Result<String, LayoutError> {
        let styled = self.styled(meetings)?;
        Ok(render_html(&styled, &self.config.theme, &self.config.render))
    }
}

impl Default for Timetable {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
