use egui::Context;

use super::app_state::AppState;

mod forms;
mod list;
mod player;
mod splash;
mod toasts;
mod top;

impl AppState {
    pub fn render_splash(&mut self, ctx: &Context) {
        splash::render(self, ctx);
    }

    pub fn render_header(&mut self, ctx: &Context) {
        top::render(self, ctx);
    }

    pub fn render_video_list(&mut self, ctx: &Context) {
        list::render(self, ctx);
    }

    pub fn render_player(&mut self, ctx: &Context) {
        player::render(self, ctx);
    }

    pub fn render_upload_window(&mut self, ctx: &Context) {
        forms::render_upload(self, ctx);
    }

    pub fn render_edit_window(&mut self, ctx: &Context) {
        forms::render_edit(self, ctx);
    }

    pub fn render_toasts(&mut self, ctx: &Context) {
        toasts::render(self, ctx);
    }
}
