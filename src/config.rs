use crate::ir::Day;
use crate::layout::{GridParams, LayoutError};
use crate::style::Presentation;
use crate::theme::{PaletteId, Theme};
use crate::time::TimeValue;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config syntax: {0}")]
    Syntax(#[from] json5::Error),
    #[error("invalid config block: {0}")]
    Block(#[from] serde_json::Error),
    #[error("invalid time `{value}` for {field}")]
    InvalidTime { field: &'static str, value: String },
    #[error("unknown day `{0}` in days")]
    UnknownDay(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub min_time: u16,
    pub max_time: u16,
    pub resolution: u16,
    pub days: Vec<Day>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            min_time: 8 * 60,
            max_time: 22 * 60,
            resolution: 15,
            days: Day::WEEK_DAYS.to_vec(),
        }
    }
}

impl GridConfig {
    pub fn to_params(&self) -> Result<GridParams, LayoutError> {
        GridParams::new(self.min_time, self.max_time, self.resolution, self.days.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub header_height: f32,
    pub time_column_width: f32,
    /// Height of one hour at scale 45.
    pub hour_height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            header_height: 32.0,
            time_column_width: 64.0,
            hour_height: 60.0,
        }
    }
}

impl RenderConfig {
    pub fn row_height(&self, resolution: u16, scale: f32) -> f32 {
        (self.hour_height * f32::from(resolution) / 60.0 * scale / 45.0).max(1.0)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub grid: GridConfig,
    pub presentation: Presentation,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let presentation = Presentation::default();
        Self {
            theme: Theme::for_presentation(presentation.dark),
            grid: GridConfig::default(),
            presentation,
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    text_color: Option<String>,
    background: Option<String>,
    grid_line_color: Option<String>,
    hour_line_color: Option<String>,
    header_color: Option<String>,
    conflict_color: Option<String>,
    selection_color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    min_time: Option<TimeValue>,
    max_time: Option<TimeValue>,
    resolution: Option<u16>,
    days: Option<Vec<String>>,
    palette: Option<PaletteId>,
    dark: Option<bool>,
    highlight_conflicts: Option<bool>,
    twenty_four: Option<bool>,
    show_time: Option<bool>,
    emphasize_on_hover: Option<bool>,
    scale: Option<f32>,
    width: Option<f32>,
    hour_height: Option<f32>,
}

fn resolve_time(field: &'static str, value: &TimeValue) -> Result<u16, ConfigError> {
    value.to_minutes().ok_or_else(|| ConfigError::InvalidTime {
        field,
        value: value.to_string(),
    })
}

impl ConfigFile {
    fn apply(self, config: &mut Config) -> Result<(), ConfigError> {
        if let Some(v) = self.min_time.as_ref() {
            config.grid.min_time = resolve_time("minTime", v)?;
        }
        if let Some(v) = self.max_time.as_ref() {
            config.grid.max_time = resolve_time("maxTime", v)?;
        }
        if let Some(v) = self.resolution {
            config.grid.resolution = v;
        }
        if let Some(days) = self.days {
            config.grid.days = days
                .iter()
                .map(|d| Day::from_token(d).ok_or_else(|| ConfigError::UnknownDay(d.clone())))
                .collect::<Result<_, _>>()?;
        }

        let p = &mut config.presentation;
        if let Some(v) = self.palette {
            p.palette = v;
        }
        if let Some(v) = self.dark {
            p.dark = v;
            config.theme = Theme::for_presentation(v);
        }
        if let Some(v) = self.highlight_conflicts {
            p.highlight_conflicts = v;
        }
        if let Some(v) = self.twenty_four {
            p.twenty_four = v;
        }
        if let Some(v) = self.show_time {
            p.show_time = v;
        }
        if let Some(v) = self.emphasize_on_hover {
            p.emphasize_on_hover = v;
        }
        if let Some(v) = self.scale {
            p.scale = v;
        }

        if let Some(name) = self.theme.as_deref() {
            match name {
                "dark" => {
                    config.presentation.dark = true;
                    config.theme = Theme::dark();
                }
                "light" | "default" => {
                    config.presentation.dark = false;
                    config.theme = Theme::light();
                }
                other => tracing::warn!(theme = other, "unknown theme name ignored"),
            }
        }
        if let Some(vars) = self.theme_variables {
            let theme = &mut config.theme;
            if let Some(v) = vars.font_family {
                theme.font_family = v;
            }
            if let Some(v) = vars.font_size {
                theme.font_size = v;
            }
            if let Some(v) = vars.text_color {
                theme.text_color = v;
            }
            if let Some(v) = vars.background {
                theme.background = v;
            }
            if let Some(v) = vars.grid_line_color {
                theme.grid_line_color = v;
            }
            if let Some(v) = vars.hour_line_color {
                theme.hour_line_color = v;
            }
            if let Some(v) = vars.header_color {
                theme.header_color = v;
            }
            if let Some(v) = vars.conflict_color {
                theme.conflict_color = v;
            }
            if let Some(v) = vars.selection_color {
                theme.selection_color = v;
            }
        }

        if let Some(v) = self.width {
            config.render.width = v;
        }
        if let Some(v) = self.hour_height {
            config.render.hour_height = v;
        }
        Ok(())
    }
}

/// Applies a JSON5 config document on top of `config`.
pub fn apply_config_str(config: &mut Config, contents: &str) -> Result<(), ConfigError> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    parsed.apply(config)
}

/// Applies a `config` block embedded in an input document.
pub fn merge_init_config(mut config: Config, init: serde_json::Value) -> Result<Config, ConfigError> {
    let parsed: ConfigFile = serde_json::from_value(init)?;
    parsed.apply(&mut config)?;
    Ok(config)
}

pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    apply_config_str(&mut config, &contents)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}
