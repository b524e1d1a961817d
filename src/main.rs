mod app;
mod color;
mod data;
mod features;
mod inference;
mod schema;
mod state;
mod ui;

use std::path::{Path, PathBuf};

use app::EstateAdvisorApp;
use eframe::egui;
use inference::Advisor;
use inference::onnx::{OnnxClassifier, OnnxRegressor};
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let data_path = std::env::var("ESTATE_DATA")
        .unwrap_or_else(|_| "data/india_housing_prices.csv".to_string());
    let models_dir =
        PathBuf::from(std::env::var("ESTATE_MODELS").unwrap_or_else(|_| "models".to_string()));

    let mut state = AppState::default();

    // Load the reference dataset and the two model artifacts up front so the
    // UI only ever sees immutable handles. Either can be absent; the
    // dashboard then opens in explore-only mode.
    match data::loader::load_file(Path::new(&data_path)) {
        Ok(dataset) => {
            log::info!("Loaded {} listings from {data_path}", dataset.len());
            state.set_dataset(dataset);
        }
        Err(e) => {
            log::warn!("No dataset at {data_path}: {e:#}");
            state.status_message = Some(format!("Dataset not loaded: {e:#}"));
        }
    }

    match load_advisor(&models_dir) {
        Ok(advisor) => state.set_advisor(advisor),
        Err(e) => {
            log::warn!(
                "Models not loaded from {}: {e:#}",
                models_dir.display()
            );
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Estate Advisor – Real Estate Investment Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(EstateAdvisorApp::new(state)))),
    )
}

/// Load both pre-trained capability objects from the models directory.
fn load_advisor(models_dir: &Path) -> anyhow::Result<Advisor> {
    let classifier = OnnxClassifier::load(&models_dir.join("investment_classifier.onnx"))?;
    let regressor = OnnxRegressor::load(&models_dir.join("price_regressor.onnx"))?;
    Ok(Advisor::new(Box::new(classifier), Box::new(regressor)))
}
