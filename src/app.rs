use eframe::egui;

use crate::state::AppState;
use crate::ui::{form, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EstateAdvisorApp {
    pub state: AppState,
}

impl EstateAdvisorApp {
    /// Wrap the state assembled at startup (dataset and model handles are
    /// loaded in `main`, not lazily behind globals).
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for EstateAdvisorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: form, results, insights ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    form::property_form(ui, &mut self.state);

                    ui.add_space(12.0);
                    ui.separator();

                    ui.scope(|ui| {
                        ui.set_min_height(320.0);
                        plot::market_insights(ui, &self.state);
                    });

                    ui.add_space(12.0);
                    egui::CollapsingHeader::new("Filtered Listings")
                        .default_open(false)
                        .show(ui, |ui| {
                            table::listings_table(ui, &self.state);
                        });
                });
        });
    }
}
