use photo_enhancer::enhance::{EnhancementClient, GeminiTransport};
use photo_enhancer::gui::EnhancerApp;
use photo_enhancer::logging;
use photo_enhancer::preferences::JsonFilePreferences;
use photo_enhancer::session::Session;
use photo_enhancer::settings::{Settings, SETTINGS_FILE};

use eframe::egui;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load(SETTINGS_FILE)?;
    logging::init(settings.debug_logging, settings.log_file());

    let transport = GeminiTransport::from_settings(&settings)?;
    let preferences = JsonFilePreferences::new(settings.preferences_file());
    tracing::info!(
        model = %settings.model,
        url = %transport.url(),
        preferences = %preferences.path().display(),
        "starting photo enhancer"
    );

    let enhancer = Arc::new(EnhancementClient::new(transport));
    let session = Session::new(Box::new(preferences));

    let (width, height) = settings.window_size;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("AI Photo Enhancer")
            .with_inner_size([width, height])
            .with_min_inner_size([720.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "AI Photo Enhancer",
        native_options,
        Box::new(move |cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Box::new(EnhancerApp::new(&cc.egui_ctx, session, enhancer, &settings))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
