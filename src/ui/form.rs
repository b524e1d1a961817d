use eframe::egui::{self, ProgressBar, RichText, Ui};

use crate::inference::Verdict;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Property details form + analysis results
// ---------------------------------------------------------------------------

/// Render the property form and, below it, the latest analysis.
pub fn property_form(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Property Details");

    // Clone the dropdown choices so the form fields can be mutated freely.
    let (states, cities, localities, property_types, furnished) = match &state.dataset {
        Some(ds) => (
            ds.states.iter().cloned().collect::<Vec<_>>(),
            ds.cities_in(&state.form.state)
                .map(|c| c.iter().cloned().collect::<Vec<_>>())
                .unwrap_or_default(),
            ds.localities_in(&state.form.city)
                .map(|l| l.iter().cloned().collect::<Vec<_>>())
                .unwrap_or_default(),
            ds.property_types.iter().cloned().collect::<Vec<_>>(),
            ds.furnished_statuses.iter().cloned().collect::<Vec<_>>(),
        ),
        None => {
            ui.label("Load a dataset to fill in property details.");
            return;
        }
    };

    let mut location_changed = false;

    ui.columns(2, |cols| {
        let left = &mut cols[0];
        location_changed |= combo(left, "State", &mut state.form.state, &states);
        location_changed |= combo(left, "City", &mut state.form.city, &cities);
        location_changed |= combo(left, "Locality", &mut state.form.locality, &localities);
        combo(left, "Property Type", &mut state.form.property_type, &property_types);
        int_field(left, "BHK", &mut state.form.bhk, 1..=10);
        float_field(left, "Size (sqft)", &mut state.form.size_in_sqft, 200.0..=20000.0);

        let right = &mut cols[1];
        float_field(
            right,
            "Current Price (Lakhs)",
            &mut state.form.price_in_lakhs,
            5.0..=5000.0,
        );
        combo(
            right,
            "Furnished Status",
            &mut state.form.furnished_status,
            &furnished,
        );
        int_field(right, "Floor No", &mut state.form.floor_no, 0..=50);
        int_field(right, "Total Floors", &mut state.form.total_floors, 1..=100);
        int_field(right, "Nearby Schools", &mut state.form.nearby_schools, 0..=20);
        int_field(right, "Nearby Hospitals", &mut state.form.nearby_hospitals, 0..=20);
    });

    if location_changed {
        if let Some(ds) = &state.dataset {
            state.form.sync_location(ds);
        }
    }

    ui.add_space(8.0);
    let button = egui::Button::new(RichText::new("Get Investment Analysis").strong());
    if ui.add_enabled(state.can_analyze(), button).clicked() {
        state.run_analysis();
    }

    if let Some(analysis) = &state.analysis {
        ui.add_space(8.0);
        ui.separator();

        ui.columns(3, |cols| {
            metric(&mut cols[0], "Price in 5 Years", format!("₹{:.0}L", analysis.future_price_lakhs));
            metric(&mut cols[1], "Decision", analysis.verdict.label().to_string());
            metric(
                &mut cols[2],
                "Confidence",
                format!("{:.1}%", analysis.good_probability * 100.0),
            );
        });

        let bar = ProgressBar::new(analysis.good_probability as f32).show_percentage();
        let bar = match analysis.verdict {
            Verdict::GoodInvestment => bar.fill(egui::Color32::DARK_GREEN),
            Verdict::NotIdeal => bar.fill(egui::Color32::DARK_RED),
        };
        ui.add(bar);
    }
}

// ---------------------------------------------------------------------------
// Widget helpers
// ---------------------------------------------------------------------------

/// A labelled dropdown. Returns true when the selection changed.
fn combo(ui: &mut Ui, label: &str, value: &mut String, choices: &[String]) -> bool {
    let mut changed = false;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(label)
            .selected_text(value.clone())
            .show_ui(ui, |ui: &mut Ui| {
                for choice in choices {
                    if ui.selectable_label(*value == *choice, choice).clicked() {
                        *value = choice.clone();
                        changed = true;
                    }
                }
            });
    });
    changed
}

fn int_field(ui: &mut Ui, label: &str, value: &mut i64, range: std::ops::RangeInclusive<i64>) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        let range = *range.start() as f64..=*range.end() as f64;
        ui.add(egui::DragValue::new(value).range(range));
    });
}

fn float_field(ui: &mut Ui, label: &str, value: &mut f64, range: std::ops::RangeInclusive<f64>) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        ui.add(egui::DragValue::new(value).range(range).speed(10.0));
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(label);
        ui.label(RichText::new(value).heading());
    });
}
