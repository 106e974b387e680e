use classifier_app::main::ClassifierApp;
use config::Config;
use eframe::egui;
use library::logger::{impl_console::LoggerConsole, interface::Logger};
use resources::{impl_cached::ResourceLoaderCached, impl_fs::ResourceLoaderFs};
use std::sync::Arc;

mod classifier_app;
mod config;
mod image_classifier;
mod library;
mod resources;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new(config.logger_timezone));

    let resource_loader = Arc::new(ResourceLoaderCached::new(
        Arc::new(ResourceLoaderFs::new(config.clone(), logger.clone())),
        logger.clone(),
    ));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.window_title.clone())
            .with_inner_size(config.window_size)
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let title = config.window_title.clone();
    let app = ClassifierApp::new(config, logger.clone(), resource_loader);

    eframe::run_native(&title, options, Box::new(|_cc| Box::new(app)))?;

    let _ = logger.info("Window closed");

    Ok(())
}
