use egui::{Align, Align2, Context, CornerRadius, Frame, Id, Layout, Margin, Order, RichText};

use crate::ui::theme::{
    ACCENT_PLAY, ACCENT_PRIMARY, PANEL_FILL, TEXT_MUTED, TEXT_STRONG, accent_button,
    contrast_text,
};

use super::AppState;

pub(super) fn render(state: &mut AppState, ctx: &Context) {
    let Some(identity) = state.shell.identity().cloned() else {
        return;
    };
    let mut upload_requested = false;
    let mut menu_anchor = None;

    egui::TopBottomPanel::top("header")
        .resizable(false)
        .show(ctx, |ui| {
            Frame::default()
                .fill(PANEL_FILL)
                .inner_margin(Margin::symmetric(16, 12))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.heading(RichText::new("EduWatch").color(TEXT_STRONG).strong());
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            let avatar = egui::Button::new(
                                RichText::new(identity.initials())
                                    .strong()
                                    .color(contrast_text(ACCENT_PRIMARY)),
                            )
                            .fill(ACCENT_PRIMARY)
                            .corner_radius(CornerRadius::same(18))
                            .min_size(egui::vec2(36.0, 36.0));
                            let response = ui.add(avatar).on_hover_text(identity.display_name());
                            if response.clicked() {
                                state.shell.profile_menu_open = !state.shell.profile_menu_open;
                            }
                            menu_anchor = Some(response.rect.right_bottom());

                            ui.add_space(8.0);
                            if ui
                                .add(accent_button("Upload", ACCENT_PLAY))
                                .on_hover_text("Add a new video by URL")
                                .clicked()
                            {
                                upload_requested = true;
                            }
                        });
                    });
                });
        });

    if upload_requested {
        state.open_upload();
    }

    if !state.shell.profile_menu_open {
        return;
    }
    if ctx.input(|input| input.key_pressed(egui::Key::Escape)) {
        state.shell.profile_menu_open = false;
        return;
    }

    let mut logout_requested = false;
    let anchor = menu_anchor.unwrap_or_default() + egui::vec2(0.0, 6.0);
    egui::Area::new(Id::new("profile_menu"))
        .order(Order::Foreground)
        .pivot(Align2::RIGHT_TOP)
        .fixed_pos(anchor)
        .show(ctx, |ui| {
            Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_min_width(180.0);
                ui.label(RichText::new(identity.display_name()).strong());
                ui.label(RichText::new(identity.as_str()).small().color(TEXT_MUTED));
                ui.separator();
                if ui.button("Logout").clicked() {
                    logout_requested = true;
                }
            });
        });

    if logout_requested {
        state.logout();
    }
}
