use serde::{Deserialize, Serialize};

const DEFAULT_PALETTE: [&str; 11] = [
    "eaeaea", "fce8b1", "e0f2ff", "c0fac7", "d6d5f2", "c0dcf3", "ffe6de", "d1dbf5", "e6f9d9",
    "c1f1e7", "dbcfed",
];

const ACCESSIBLE_PALETTE: [&str; 6] = ["70ff63", "6863ff", "f00", "0f0", "00f", "0ff"];

const MONOCHROME_PALETTE: [&str; 1] = ["eaeaea"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteId {
    #[default]
    Default,
    Accessible,
    Monochrome,
}

impl PaletteId {
    pub fn colours(self) -> &'static [&'static str] {
        match self {
            PaletteId::Default => &DEFAULT_PALETTE,
            PaletteId::Accessible => &ACCESSIBLE_PALETTE,
            PaletteId::Monochrome => &MONOCHROME_PALETTE,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "default" => Some(Self::Default),
            "accessible" => Some(Self::Accessible),
            "monochrome" | "mono" => Some(Self::Monochrome),
            _ => None,
        }
    }
}

/// Parses `#rgb`, `rgb`, `#rrggbb` or `rrggbb`.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim().trim_start_matches('#');
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let channel = |i: usize| u8::from_str_radix(expanded.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// CSS `rgba(...)` colour for a course, cycling through the palette.
///
/// `lighten_percent` scales each channel by `(100 + p) / 100`, capped at 255.
pub fn course_key_to_colour(
    course_key: u32,
    palette: PaletteId,
    alpha: f32,
    lighten_percent: f32,
) -> String {
    let colours = palette.colours();
    let hex = colours[course_key as usize % colours.len()];
    let (r, g, b) = hex_to_rgb(hex).unwrap_or((0xea, 0xea, 0xea));
    let scale = |c: u8| (f32::from(c) * (100.0 + lighten_percent) / 100.0).clamp(0.0, 255.0);
    format!(
        "rgba({}, {}, {}, {})",
        fmt_channel(scale(r)),
        fmt_channel(scale(g)),
        fmt_channel(scale(b)),
        alpha
    )
}

fn fmt_channel(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as u32)
    } else {
        format!("{value:.2}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub label_font_family: String,
    pub text_color: String,
    pub muted_text_color: String,
    pub dark_text_color: String,
    pub light_text_color: String,
    pub grid_line_color: String,
    pub hour_line_color: String,
    pub header_color: String,
    pub background: String,
    pub conflict_color: String,
    pub selection_color: String,
    pub shadow_color: String,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 10.0,
            label_font_family: "interstate-mono, monospace".to_string(),
            text_color: "#333333".to_string(),
            muted_text_color: "rgba(0, 0, 0, 0.2)".to_string(),
            dark_text_color: "#1A202C".to_string(),
            light_text_color: "#FFFFFF".to_string(),
            grid_line_color: "#E2E8F0".to_string(),
            hour_line_color: "#CBD5E0".to_string(),
            header_color: "#1A202C".to_string(),
            background: "#FFFFFF".to_string(),
            conflict_color: "#c53030".to_string(),
            selection_color: "rgba(60, 142, 230, 0.7)".to_string(),
            shadow_color: "rgba(0, 0, 0, 0.4)".to_string(),
        }
    }

    pub fn dark() -> Self {
        Self {
            text_color: "#E2E8F0".to_string(),
            muted_text_color: "rgba(255, 255, 255, 0.2)".to_string(),
            grid_line_color: "#2D3748".to_string(),
            hour_line_color: "#4A5568".to_string(),
            header_color: "#F7FAFC".to_string(),
            background: "#1A202C".to_string(),
            shadow_color: "rgba(0, 0, 0, 0.8)".to_string(),
            ..Self::light()
        }
    }

    pub fn for_presentation(dark: bool) -> Self {
        if dark { Self::dark() } else { Self::light() }
    }
}
