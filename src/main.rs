mod app;
mod color;
mod state;
mod ui;

use std::path::Path;

use app::ListingsDashApp;
use eframe::egui;
use listings_dash::config::{DashboardConfig, CONFIG_FILE};
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let (config, config_error) = match DashboardConfig::load(Path::new(CONFIG_FILE)) {
        Ok(config) => (config, None),
        Err(e) => {
            log::error!("Failed to read {CONFIG_FILE}: {e:#}");
            (DashboardConfig::default(), Some(format!("Config error: {e:#}")))
        }
    };

    let data_path = config.data_path.clone();
    let mut state = AppState::new(config);
    state.load_path(&data_path);
    if let Some(msg) = config_error {
        state.status_message.get_or_insert(msg);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Vehicle Listings Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(ListingsDashApp::new(state)))),
    )
}
