use egui::{Align2, Context, RichText};

use crate::forms::{MAX_DESCRIPTION_CHARS, MAX_TITLE_CHARS, SubmitState};
use crate::ui::theme::{ACCENT_ERROR, ACCENT_PRIMARY, TEXT_MUTED, accent_button};

use super::AppState;

#[derive(Clone, Copy, PartialEq, Eq)]
enum FormAction {
    Submit,
    Cancel,
}

pub(super) fn render_upload(state: &mut AppState, ctx: &Context) {
    let mut action = None;
    let form = &mut state.upload;

    modal("Upload Video").show(ctx, |ui| {
        error_banner(ui, &form.state);
        let busy = form.state.submitting;
        ui.label("Title");
        counted_field(ui, &mut form.title, MAX_TITLE_CHARS, busy, false, "Enter a title");
        ui.label("Description");
        counted_field(
            ui,
            &mut form.description,
            MAX_DESCRIPTION_CHARS,
            busy,
            true,
            "What is this video about?",
        );
        ui.label("Video URL");
        ui.add(
            egui::TextEdit::singleline(&mut form.video_url)
                .hint_text("https://...")
                .desired_width(f32::INFINITY)
                .interactive(!busy),
        );
        ui.add_space(10.0);
        action = buttons(ui, &form.state, "Upload", "Uploading...");
    });

    match action {
        Some(FormAction::Submit) => state.submit_upload(),
        Some(FormAction::Cancel) => state.close_upload(),
        None => {}
    }
}

pub(super) fn render_edit(state: &mut AppState, ctx: &Context) {
    let Some(form) = state.edit.as_mut() else {
        state.shell.close_edit();
        return;
    };
    let mut action = None;

    modal("Edit Video").show(ctx, |ui| {
        error_banner(ui, &form.state);
        let busy = form.state.submitting;
        ui.label("Title");
        counted_field(ui, &mut form.title, MAX_TITLE_CHARS, busy, false, "Enter a title");
        ui.label("Description");
        counted_field(
            ui,
            &mut form.description,
            MAX_DESCRIPTION_CHARS,
            busy,
            true,
            "What is this video about?",
        );
        ui.add_space(10.0);
        action = buttons(ui, &form.state, "Save Changes", "Saving...");
    });

    match action {
        Some(FormAction::Submit) => state.submit_edit(),
        Some(FormAction::Cancel) => state.close_edit(),
        None => {}
    }
}

fn modal(title: &str) -> egui::Window<'static> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .default_width(460.0)
}

fn error_banner(ui: &mut egui::Ui, state: &SubmitState) {
    if let Some(error) = &state.error {
        ui.colored_label(ACCENT_ERROR, error.as_str());
        ui.add_space(4.0);
    }
}

fn counted_field(
    ui: &mut egui::Ui,
    text: &mut String,
    limit: usize,
    busy: bool,
    multiline: bool,
    hint: &str,
) {
    let editor = if multiline {
        egui::TextEdit::multiline(text).desired_rows(4)
    } else {
        egui::TextEdit::singleline(text)
    };
    ui.add(
        editor
            .hint_text(hint)
            .char_limit(limit)
            .desired_width(f32::INFINITY)
            .interactive(!busy),
    );
    ui.label(
        RichText::new(format!("{}/{}", text.chars().count(), limit))
            .small()
            .color(TEXT_MUTED),
    );
}

fn buttons(
    ui: &mut egui::Ui,
    state: &SubmitState,
    submit_label: &str,
    busy_label: &str,
) -> Option<FormAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        let label = if state.submitting {
            busy_label
        } else {
            submit_label
        };
        if ui
            .add_enabled(!state.submitting, accent_button(label, ACCENT_PRIMARY))
            .clicked()
        {
            action = Some(FormAction::Submit);
        }
        if ui
            .add_enabled(!state.submitting, egui::Button::new("Cancel"))
            .clicked()
        {
            action = Some(FormAction::Cancel);
        }
    });
    if ui.input(|input| input.key_pressed(egui::Key::Escape)) && !state.submitting {
        action = Some(FormAction::Cancel);
    }
    action
}
