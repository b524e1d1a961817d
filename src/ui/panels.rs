use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Properties");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone the BHK value set so we can mutate the filter inside the loop.
    let bhk_values: Vec<i64> = dataset.bhk_values.iter().copied().collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Price (Lakhs)");
            ui.add(egui::Slider::new(&mut state.filter.min_price, 0.0..=1000.0).text("Min"));
            ui.add(egui::Slider::new(&mut state.filter.max_price, 0.0..=5000.0).text("Max"));
            ui.separator();

            ui.strong("Size (sqft)");
            ui.add(egui::Slider::new(&mut state.filter.min_size, 200.0..=10000.0).text("Min"));
            ui.add(egui::Slider::new(&mut state.filter.max_size, 200.0..=20000.0).text("Max"));
            ui.separator();

            ui.strong("BHK");
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.filter.bhk = bhk_values.iter().copied().collect();
                }
                if ui.small_button("None").clicked() {
                    state.filter.bhk.clear();
                }
            });
            for bhk in &bhk_values {
                let mut checked = state.filter.bhk.contains(bhk);
                if ui.checkbox(&mut checked, format!("{bhk} BHK")).changed() {
                    if checked {
                        state.filter.bhk.insert(*bhk);
                    } else {
                        state.filter.bhk.remove(bhk);
                    }
                }
            }
        });

    // Recompute visible indices after any widget changes.
    state.refilter();
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open dataset…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} listings loaded, {} match the filters",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if state.advisor.is_none() {
            ui.separator();
            ui.label(RichText::new("models not loaded – explore only").color(Color32::YELLOW));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open housing dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.loading = true;
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} listings across {} states",
                    dataset.len(),
                    dataset.states.len()
                );
                state.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
                state.loading = false;
            }
        }
    }
}
