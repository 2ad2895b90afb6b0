use egui::{Context, CornerRadius, Frame, Margin, RichText, Stroke};

use crate::forms::MAX_COMMENT_CHARS;
use crate::identity::author_label;
use crate::player::{CommentsStatus, PlaybackSpeed};
use crate::ui::theme::{
    ACCENT_ERROR, ACCENT_PLAY, ACCENT_PRIMARY, ACCENT_SPEED, CARD_BG, CARD_BORDER, TEXT_MUTED,
    TEXT_STRONG, accent_button, choice_chip,
};
use crate::ui::utils::format_time_ago;

use super::AppState;

enum PlayerAction {
    Back,
    Play(String),
    Edit,
    Submit,
    Cancel,
    RetryComments,
}

pub(super) fn render(state: &mut AppState, ctx: &Context) {
    let Some(video) = state.shell.selected_video().cloned() else {
        return;
    };
    let mut action = None;

    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical().show(ui, |ui| {
            if ui.button("< Back to videos").clicked() {
                action = Some(PlayerAction::Back);
            }
            ui.add_space(8.0);

            Frame::default()
                .fill(CARD_BG)
                .stroke(Stroke::new(1.0, CARD_BORDER))
                .corner_radius(CornerRadius::same(8))
                .inner_margin(Margin::same(16))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if ui
                            .add(accent_button("Play", ACCENT_PLAY))
                            .on_hover_text(video.video_url.as_str())
                            .clicked()
                        {
                            action = Some(PlayerAction::Play(video.video_url.clone()));
                        }
                        ui.add_space(12.0);
                        let speed_label = format!("Speed: {}", state.player.speed.label());
                        if ui
                            .button(speed_label)
                            .on_hover_text("Used when Play opens mpv or VLC")
                            .clicked()
                        {
                            state.player.speed_menu_open = !state.player.speed_menu_open;
                        }
                        if state.player.speed_menu_open {
                            for speed in PlaybackSpeed::ALL {
                                let active = state.player.speed == speed;
                                if choice_chip(ui, active, &speed.label(), ACCENT_SPEED) {
                                    state.player.set_speed(speed);
                                }
                            }
                        }
                    });
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        ui.add(
                            egui::Label::new(
                                RichText::new(&video.title).heading().color(TEXT_STRONG),
                            )
                            .wrap(),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Edit").clicked() {
                                action = Some(PlayerAction::Edit);
                            }
                        });
                    });
                    ui.label(
                        RichText::new(format_time_ago(
                            &video.created_at,
                            time::OffsetDateTime::now_utc(),
                        ))
                        .small()
                        .color(TEXT_MUTED),
                    );
                    ui.add_space(6.0);
                    ui.add(egui::Label::new(video.description.as_str()).wrap());
                });

            ui.add_space(16.0);
            render_comments(state, ui, &mut action);
        });
    });

    match action {
        Some(PlayerAction::Back) => state.shell.back_to_list(),
        Some(PlayerAction::Play(url)) => state.open_video(&url),
        Some(PlayerAction::Edit) => state.open_edit(),
        Some(PlayerAction::Submit) => state.submit_comment(),
        Some(PlayerAction::Cancel) => state.player.thread.cancel_draft(),
        Some(PlayerAction::RetryComments) => state.retry_comments(),
        None => {}
    }
}

fn render_comments(state: &mut AppState, ui: &mut egui::Ui, action: &mut Option<PlayerAction>) {
    let thread = &mut state.player.thread;
    ui.heading(thread.header_label());
    ui.add_space(6.0);

    let submitting = thread.is_submitting();
    let has_draft = !thread.draft.trim().is_empty();
    ui.add(
        egui::TextEdit::multiline(&mut thread.draft)
            .hint_text("Add a comment...")
            .char_limit(MAX_COMMENT_CHARS)
            .desired_rows(3)
            .desired_width(f32::INFINITY)
            .interactive(!submitting),
    );
    ui.horizontal(|ui| {
        ui.label(
            RichText::new(format!(
                "{}/{}",
                thread.draft.chars().count(),
                MAX_COMMENT_CHARS
            ))
            .small()
            .color(TEXT_MUTED),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let label = if submitting { "Posting..." } else { "Comment" };
            if ui
                .add_enabled(!submitting && has_draft, accent_button(label, ACCENT_PRIMARY))
                .clicked()
            {
                *action = Some(PlayerAction::Submit);
            }
            if ui.add_enabled(!submitting, egui::Button::new("Cancel")).clicked() {
                *action = Some(PlayerAction::Cancel);
            }
        });
    });
    if let Some(error) = thread.error() {
        ui.colored_label(ACCENT_ERROR, error);
    }
    ui.add_space(10.0);

    match thread.status() {
        CommentsStatus::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading comments...");
            });
        }
        CommentsStatus::Failed(message) => {
            ui.colored_label(ACCENT_ERROR, message.as_str());
            if ui.button("Try Again").clicked() {
                *action = Some(PlayerAction::RetryComments);
            }
        }
        CommentsStatus::Ready if thread.comments().is_empty() => {
            ui.label(RichText::new("No comments yet. Be the first!").color(TEXT_MUTED));
        }
        CommentsStatus::Ready => {}
    }

    let now = time::OffsetDateTime::now_utc();
    for comment in thread.comments() {
        Frame::default()
            .fill(CARD_BG)
            .corner_radius(CornerRadius::same(6))
            .inner_margin(Margin::symmetric(12, 8))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(author_label(comment.user_id.as_deref()))
                            .strong()
                            .color(TEXT_STRONG),
                    );
                    ui.label(
                        RichText::new(format_time_ago(&comment.created_at, now))
                            .small()
                            .color(TEXT_MUTED),
                    );
                });
                ui.add(egui::Label::new(comment.content.as_str()).wrap());
            });
        ui.add_space(4.0);
    }
}
