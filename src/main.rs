use eduwatch::{logging, ui};

fn main() -> eframe::Result<()> {
    logging::init();

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1200.0, 800.0])
        .with_min_inner_size([900.0, 600.0]);
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "EduWatch",
        native_options,
        Box::new(|cc| Ok(Box::new(ui::AppState::new(cc)))),
    )
}
