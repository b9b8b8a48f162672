mod core;
mod display;
mod gui;
mod hotkeys;
mod media;
mod overlay;
mod scene;
mod subtitles;
mod tv;

use eframe::egui;
use gui::TvRoomApp;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title("TV Room"),
        ..Default::default()
    };

    eframe::run_native(
        "TV Room",
        options,
        Box::new(|cc| {
            match TvRoomApp::new(cc) {
                Ok(app) => Ok(Box::new(app)),
                Err(e) => {
                    eprintln!("Failed to initialize app: {}", e);
                    std::process::exit(1);
                }
            }
        }),
    ).map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
