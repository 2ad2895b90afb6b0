use egui::{
    Align2, Color32, Context, CornerRadius, FontId, Frame, Image, Margin, RichText, Sense, Stroke,
    StrokeKind, Vec2,
};

use crate::api::Video;
use crate::filters::SortMode;
use crate::listing::ListStatus;
use crate::ui::theme::{
    ACCENT_ERROR, ACCENT_PRIMARY, CARD_BG, CARD_BORDER, TEXT_MUTED, TEXT_STRONG, accent_button,
};
use crate::ui::thumbnails::{
    CARD_THUMB_HEIGHT, CARD_THUMB_WIDTH, ThumbnailCache, ThumbnailStatus,
};
use crate::ui::utils::{format_time_ago, truncate_chars};

use super::AppState;

const CARD_WIDTH: f32 = CARD_THUMB_WIDTH + 24.0;

pub(super) fn render(state: &mut AppState, ctx: &Context) {
    let mut selected: Option<Video> = None;
    let mut retry = false;

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("My Videos");
            ui.add_space(12.0);
            let mut query = state.list.query().to_owned();
            let search = ui.add(
                egui::TextEdit::singleline(&mut query)
                    .hint_text("Search videos...")
                    .desired_width(280.0),
            );
            if search.changed() {
                state.list.set_query(query);
            }
            ui.add_space(8.0);
            let mut sort = state.list.sort();
            egui::ComboBox::from_label("Sort")
                .selected_text(sort.label())
                .show_ui(ui, |ui| {
                    for mode in SortMode::ALL {
                        ui.selectable_value(&mut sort, mode, mode.label());
                    }
                });
            state.list.set_sort(sort);
        });
        if let Some(summary) = state.list.results_summary() {
            ui.label(RichText::new(summary).color(TEXT_MUTED));
        }
        ui.add_space(8.0);

        match state.list.status().clone() {
            ListStatus::Idle | ListStatus::Loading => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading videos...");
                });
            }
            ListStatus::Failed(message) => {
                ui.colored_label(ACCENT_ERROR, message);
                ui.add_space(6.0);
                if ui.add(accent_button("Try Again", ACCENT_PRIMARY)).clicked() {
                    retry = true;
                }
            }
            ListStatus::Ready => {
                if let Some(empty) = state.list.empty_state() {
                    ui.add_space(40.0);
                    ui.vertical_centered(|ui| {
                        ui.heading(empty.heading());
                        ui.label(RichText::new(empty.hint()).color(TEXT_MUTED));
                    });
                } else {
                    let thumbnails = &state.thumbnail_cache;
                    let visible = state.list.visible();
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        ui.horizontal_wrapped(|ui| {
                            ui.spacing_mut().item_spacing = egui::vec2(16.0, 16.0);
                            for video in visible {
                                if render_video_card(thumbnails, ui, video) {
                                    selected = Some(video.clone());
                                }
                            }
                        });
                    });
                }
            }
        }
    });

    if retry {
        state.launch_list_fetch();
    }
    if let Some(video) = selected {
        state.shell.select_video(video);
    }
}

/// Returns true when the card was clicked.
fn render_video_card(thumbnails: &ThumbnailCache, ui: &mut egui::Ui, video: &Video) -> bool {
    let max = Vec2::new(CARD_THUMB_WIDTH, CARD_THUMB_HEIGHT);
    let thumbnail = thumbnails.thumbnail(&video.id, max);
    let thumb_status = thumbnails.status(&video.id);
    let now = time::OffsetDateTime::now_utc();

    let inner = ui.allocate_ui(egui::vec2(CARD_WIDTH, CARD_THUMB_HEIGHT + 110.0), |ui| {
        Frame::default()
            .fill(CARD_BG)
            .stroke(Stroke::new(1.0, CARD_BORDER))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(Margin::same(12))
            .show(ui, |ui| {
                ui.set_width(CARD_THUMB_WIDTH);
                ui.vertical(|ui| {
                    match &thumbnail {
                        Some(thumb) => {
                            ui.add(
                                Image::new((thumb.texture.id(), thumb.display_size))
                                    .corner_radius(CornerRadius::same(6)),
                            );
                        }
                        None => render_placeholder(ui, thumb_status),
                    }
                    ui.add_space(6.0);
                    ui.add(
                        egui::Label::new(
                            RichText::new(truncate_chars(&video.title, 60))
                                .strong()
                                .color(TEXT_STRONG),
                        )
                        .wrap(),
                    );
                    ui.add(
                        egui::Label::new(
                            RichText::new(truncate_chars(&video.description, 90))
                                .color(TEXT_MUTED),
                        )
                        .wrap(),
                    );
                    ui.label(
                        RichText::new(format_time_ago(&video.created_at, now))
                            .small()
                            .color(TEXT_MUTED),
                    );
                });
            })
    });

    let response = inner
        .response
        .interact(Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand);
    if response.hovered() {
        ui.painter().rect_stroke(
            response.rect,
            CornerRadius::same(8),
            Stroke::new(1.5, ACCENT_PRIMARY),
            StrokeKind::Inside,
        );
    }
    response.clicked()
}

fn render_placeholder(ui: &mut egui::Ui, status: ThumbnailStatus) {
    let desired = egui::vec2(CARD_THUMB_WIDTH, CARD_THUMB_HEIGHT);
    let (rect, _) = ui.allocate_exact_size(desired, Sense::hover());
    let rounding = CornerRadius::same(6);
    ui.painter()
        .rect_filled(rect, rounding, Color32::from_rgb(30, 34, 42));
    ui.painter().rect_stroke(
        rect,
        rounding,
        Stroke::new(1.0, CARD_BORDER),
        StrokeKind::Inside,
    );
    let message = match status {
        ThumbnailStatus::Loading => "Loading...",
        ThumbnailStatus::Failed => "Failed to load",
        ThumbnailStatus::Missing => "No thumbnail",
    };
    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        message,
        FontId::proportional(12.0),
        Color32::from_gray(180),
    );
}
