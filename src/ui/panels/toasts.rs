use egui::{Align2, Context, CornerRadius, Frame, Id, Margin, Order, RichText};

use crate::notify::ToastKind;
use crate::ui::theme::{ACCENT_ERROR, ACCENT_SUCCESS, contrast_text};

use super::AppState;

pub(super) fn render(state: &mut AppState, ctx: &Context) {
    if state.notifications.active().is_empty() {
        return;
    }
    let mut dismissed = None;

    egui::Area::new(Id::new("toasts"))
        .order(Order::Tooltip)
        .anchor(Align2::RIGHT_TOP, [-16.0, 16.0])
        .show(ctx, |ui| {
            for (index, toast) in state.notifications.active().iter().enumerate() {
                let fill = match toast.kind {
                    ToastKind::Success => ACCENT_SUCCESS,
                    ToastKind::Error => ACCENT_ERROR,
                };
                let response = Frame::default()
                    .fill(fill)
                    .corner_radius(CornerRadius::same(8))
                    .inner_margin(Margin::symmetric(14, 10))
                    .show(ui, |ui| {
                        ui.set_max_width(320.0);
                        ui.label(RichText::new(&toast.message).color(contrast_text(fill)));
                    })
                    .response
                    .interact(egui::Sense::click());
                if response.clicked() {
                    dismissed = Some(index);
                }
                ui.add_space(6.0);
            }
        });

    if let Some(index) = dismissed {
        state.notifications.dismiss(index);
    }
}
