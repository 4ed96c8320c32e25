use eframe::egui::{self, Color32};

/// Colours used by the enhancer window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub window_fill: Color32,
    pub panel_fill: Color32,
    pub surface: Color32,
    pub surface_hovered: Color32,
    pub accent: Color32,
    pub accent_text: Color32,
    pub text: Color32,
    pub muted: Color32,
    pub error: Color32,
}

impl Palette {
    pub const fn enhancer() -> Self {
        Self {
            window_fill: Color32::from_rgb(17, 12, 30),
            panel_fill: Color32::from_rgb(26, 19, 44),
            surface: Color32::from_rgb(44, 33, 72),
            surface_hovered: Color32::from_rgb(63, 48, 102),
            accent: Color32::from_rgb(245, 166, 35),
            accent_text: Color32::from_rgb(28, 18, 4),
            text: Color32::from_rgb(236, 232, 245),
            muted: Color32::from_rgb(150, 140, 175),
            error: Color32::from_rgb(248, 113, 113),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::enhancer()
    }
}

pub fn palette_to_visuals(palette: &Palette, defaults: &egui::Visuals) -> egui::Visuals {
    let mut visuals = defaults.clone();
    visuals.dark_mode = true;
    visuals.window_fill = palette.window_fill;
    visuals.panel_fill = palette.panel_fill;
    visuals.extreme_bg_color = palette.window_fill;
    visuals.override_text_color = Some(palette.text);

    visuals.widgets.noninteractive.bg_fill = palette.panel_fill;
    visuals.widgets.inactive.bg_fill = palette.surface;
    visuals.widgets.inactive.weak_bg_fill = palette.surface;
    visuals.widgets.hovered.bg_fill = palette.surface_hovered;
    visuals.widgets.hovered.weak_bg_fill = palette.surface_hovered;
    visuals.widgets.hovered.bg_stroke.color = palette.accent;
    visuals.widgets.active.bg_fill = palette.surface_hovered;
    visuals.widgets.active.bg_stroke.color = palette.accent;

    visuals.selection.bg_fill = palette.accent;
    visuals.selection.stroke.color = palette.accent_text;
    visuals.hyperlink_color = palette.accent;
    visuals.warn_fg_color = palette.accent;
    visuals.error_fg_color = palette.error;

    visuals
}
