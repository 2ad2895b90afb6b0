use egui::{Context, CornerRadius, Frame, Margin, RichText, Stroke};

use crate::ui::theme::{
    ACCENT_ERROR, ACCENT_PRIMARY, CARD_BG, CARD_BORDER, TEXT_MUTED, TEXT_STRONG, accent_button,
};

use super::AppState;

pub(super) fn render(state: &mut AppState, ctx: &Context) {
    let mut submit = false;

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.add_space((ui.available_height() * 0.2).max(24.0));
        ui.vertical_centered(|ui| {
            ui.heading(RichText::new("Welcome to EduWatch").size(30.0).color(TEXT_STRONG));
            ui.label(
                RichText::new("Upload, watch and discuss educational videos.").color(TEXT_MUTED),
            );
            ui.add_space(20.0);

            Frame::default()
                .fill(CARD_BG)
                .stroke(Stroke::new(1.0, CARD_BORDER))
                .corner_radius(CornerRadius::same(10))
                .inner_margin(Margin::same(20))
                .show(ui, |ui| {
                    ui.set_max_width(320.0);
                    let splash = &mut state.splash;
                    let first = ui.add(
                        egui::TextEdit::singleline(&mut splash.first_name)
                            .hint_text("First name")
                            .desired_width(f32::INFINITY),
                    );
                    let last = ui.add(
                        egui::TextEdit::singleline(&mut splash.last_name)
                            .hint_text("Last name")
                            .desired_width(f32::INFINITY),
                    );
                    let entered = (first.lost_focus() || last.lost_focus())
                        && ui.input(|input| input.key_pressed(egui::Key::Enter));
                    if let Some(error) = &splash.error {
                        ui.colored_label(ACCENT_ERROR, error.as_str());
                    }
                    ui.add_space(8.0);
                    let ready = !splash.first_name.trim().is_empty()
                        && !splash.last_name.trim().is_empty();
                    let clicked = ui
                        .add_enabled(ready, accent_button("Continue", ACCENT_PRIMARY))
                        .clicked();
                    submit = clicked || entered;
                });
        });
    });

    if submit {
        state.sign_in();
    }
}
