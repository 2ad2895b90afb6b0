use egui::{Color32, FontFamily, FontId, Margin, RichText, Stroke, TextStyle};

// Slate background with indigo accents.
pub const PANEL_FILL: Color32 = Color32::from_rgb(17, 24, 39);
pub const WINDOW_FILL: Color32 = Color32::from_rgb(12, 17, 29);
pub const CARD_BG: Color32 = Color32::from_rgb(31, 41, 55);
pub const CARD_BORDER: Color32 = Color32::from_rgb(55, 65, 81);
pub const INPUT_BG: Color32 = Color32::from_rgb(38, 48, 64);
pub const TEXT_STRONG: Color32 = Color32::from_rgb(229, 231, 235);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(156, 163, 175);
pub const ACCENT_PRIMARY: Color32 = Color32::from_rgb(99, 102, 241);
pub const ACCENT_PLAY: Color32 = Color32::from_rgb(239, 68, 68);
pub const ACCENT_SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);
pub const ACCENT_ERROR: Color32 = Color32::from_rgb(220, 38, 38);
pub const ACCENT_SPEED: Color32 = Color32::from_rgb(250, 204, 21);

const DARK_INK: Color32 = Color32::from_rgb(17, 24, 39);

const TEXT_SIZES: [(TextStyle, f32); 4] = [
    (TextStyle::Heading, 22.0),
    (TextStyle::Body, 15.0),
    (TextStyle::Button, 15.0),
    (TextStyle::Small, 12.0),
];

pub fn apply_eduwatch_theme(ctx: &egui::Context) {
    ctx.set_visuals(visuals());
    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(12.0, 8.0);
        style.spacing.button_padding = egui::vec2(14.0, 8.0);
        style.spacing.menu_margin = Margin::same(8);
        style.spacing.window_margin = Margin::same(16);
        for (text_style, size) in TEXT_SIZES {
            style
                .text_styles
                .insert(text_style, FontId::new(size, FontFamily::Proportional));
        }
    });
}

fn visuals() -> egui::Visuals {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = PANEL_FILL;
    visuals.window_fill = WINDOW_FILL;
    visuals.window_stroke = Stroke::new(1.0, CARD_BORDER);
    visuals.faint_bg_color = CARD_BG;
    visuals.extreme_bg_color = INPUT_BG;
    visuals.selection.bg_fill = ACCENT_PRIMARY;
    visuals.hyperlink_color = ACCENT_PRIMARY;
    visuals
}

/// Filled button for the main action of a screen or dialog.
pub fn accent_button(label: &str, color: Color32) -> egui::Button<'static> {
    egui::Button::new(RichText::new(label).strong().color(contrast_text(color)))
        .fill(color)
        .min_size(egui::vec2(96.0, 30.0))
}

/// Chip that is solid when selected and a faint wash of `color` otherwise.
pub fn choice_chip(ui: &mut egui::Ui, selected: bool, label: &str, color: Color32) -> bool {
    let (fill, text) = if selected {
        (color, contrast_text(color))
    } else {
        (color.gamma_multiply(0.2), color)
    };
    ui.add(
        egui::Button::new(RichText::new(label).strong().color(text))
            .fill(fill)
            .min_size(egui::vec2(64.0, 26.0)),
    )
    .clicked()
}

/// Dark ink on light fills, white on dark ones.
pub fn contrast_text(fill: Color32) -> Color32 {
    let luma = 0.2126 * f32::from(fill.r())
        + 0.7152 * f32::from(fill.g())
        + 0.0722 * f32::from(fill.b());
    if luma > 150.0 { DARK_INK } else { Color32::WHITE }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contrast_picks_dark_ink_on_light_fills() {
        assert_eq!(contrast_text(ACCENT_SPEED), DARK_INK);
        assert_eq!(contrast_text(ACCENT_SUCCESS), DARK_INK);
        assert_eq!(contrast_text(ACCENT_PRIMARY), Color32::WHITE);
        assert_eq!(contrast_text(ACCENT_PLAY), Color32::WHITE);
    }
}
