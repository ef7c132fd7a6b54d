use serde::Deserialize;
use timetable_grid::{Interaction, Markup, PaletteId, RenderOptions, render_with_options};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimetableRenderOptions {
    theme: Option<String>,
    palette: Option<String>,
    twenty_four: Option<bool>,
    highlight_conflicts: Option<bool>,
    font_family: Option<String>,
    font_size: Option<f32>,
    width: Option<f32>,
    hover_course_key: Option<u32>,
    selected: Option<String>,
}

fn build_render_options(options: TimetableRenderOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("dark") {
        RenderOptions::dark()
    } else {
        RenderOptions::light()
    };

    let config = &mut render_options.config;
    if let Some(palette) = options.palette.as_deref().and_then(PaletteId::from_name) {
        config.presentation.palette = palette;
    }
    if let Some(twenty_four) = options.twenty_four {
        config.presentation.twenty_four = twenty_four;
    }
    if let Some(highlight) = options.highlight_conflicts {
        config.presentation.highlight_conflicts = highlight;
    }
    if let Some(font_family) = options.font_family {
        config.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        config.theme.font_size = font_size;
    }
    if let Some(width) = options.width {
        config.render.width = width;
    }
    render_options.interaction = Interaction {
        hover_course_key: options.hover_course_key,
        selected: options.selected,
    };

    render_options
}

fn render(input: &str, options_json: Option<String>, markup: Markup) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<TimetableRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        TimetableRenderOptions::default()
    };

    render_with_options(input, build_render_options(options), markup)
        .map_err(|error| JsValue::from_str(&format!("{error:#}")))
}

#[wasm_bindgen]
pub fn render_timetable_svg(input: &str, options_json: Option<String>) -> Result<String, JsValue> {
    render(input, options_json, Markup::Svg)
}

#[wasm_bindgen]
pub fn render_timetable_html(input: &str, options_json: Option<String>) -> Result<String, JsValue> {
    render(input, options_json, Markup::Html)
}

#[cfg(test)]
mod tests {
    use timetable_grid::{Markup, render_with_options};

    use crate::{TimetableRenderOptions, build_render_options};

    #[test]
    fn renders_overlapping_week() {
        let input = r#"[
            { day: "mon", start: "9:00", end: "10:30", courseKey: 1, identifier: "CS 101" },
            { day: "mon", start: "10:00", end: "11:00", courseKey: 2, identifier: "MATH 220" },
            { day: "thu", start: "13:00", end: "14:00", courseKey: 3, identifier: "WRIT 100" },
        ]"#;

        let options: TimetableRenderOptions =
            serde_json::from_str(r#"{"theme":"dark","hoverCourseKey":2,"selected":"WRIT 100"}"#)
                .unwrap();
        let options = build_render_options(options);
        assert!(options.config.presentation.dark);
        assert_eq!(options.interaction.hover_course_key, Some(2));

        let html = render_with_options(input, options, Markup::Html)
            .expect("overlapping meetings should render");
        assert!(html.contains("data-identifier=\"CS 101\""));
        assert!(html.contains("data-identifier=\"MATH 220\""));
        assert!(html.contains("meeting-time selected"));

        let svg = render_with_options(input, build_render_options(TimetableRenderOptions::default()), Markup::Svg)
            .expect("svg should render");
        assert!(svg.contains("<svg"));
    }
}
