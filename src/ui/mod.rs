mod app_state;
mod panels;
mod theme;
mod thumbnails;
pub mod utils;

pub use app_state::{AppState, TaskEvent};

use std::time::Instant;

use egui::Context;

use crate::shell::Screen;

impl eframe::App for AppState {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_events();
        self.thumbnail_cache.update(ctx);
        self.sync_screen();

        match self.shell.screen() {
            Screen::Splash => self.render_splash(ctx),
            Screen::List => {
                self.render_header(ctx);
                self.render_video_list(ctx);
            }
            Screen::Player => {
                self.render_header(ctx);
                self.render_player(ctx);
            }
        }

        if self.shell.is_upload_open() {
            self.render_upload_window(ctx);
        }
        if self.shell.is_edit_open() {
            self.render_edit_window(ctx);
        }

        if let Some(wait) = self.notifications.prune(Instant::now()) {
            ctx.request_repaint_after(wait);
        }
        self.render_toasts(ctx);
    }
}
