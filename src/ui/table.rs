use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

/// How many rows the table renders at most; the filter narrows from there.
const MAX_TABLE_ROWS: usize = 500;

// ---------------------------------------------------------------------------
// Filtered listings table
// ---------------------------------------------------------------------------

/// Render the filtered listings as a table.
pub fn listings_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };

    let n_rows = state.visible_indices.len().min(MAX_TABLE_ROWS);
    if state.visible_indices.len() > MAX_TABLE_ROWS {
        ui.label(format!(
            "Showing first {MAX_TABLE_ROWS} of {} matching listings",
            state.visible_indices.len()
        ));
    }

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(90.0)) // City
        .column(Column::auto().at_least(110.0)) // Locality
        .column(Column::auto().at_least(90.0)) // Type
        .column(Column::auto()) // BHK
        .column(Column::auto()) // Size
        .column(Column::auto()) // Price
        .column(Column::remainder()) // Price/SqFt
        .header(18.0, |mut header| {
            for title in [
                "City",
                "Locality",
                "Type",
                "BHK",
                "Size (sqft)",
                "Price (Lakhs)",
                "Price/SqFt",
            ] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, n_rows, |mut row| {
                let listing = &dataset.listings[state.visible_indices[row.index()]];
                row.col(|ui| {
                    ui.label(&listing.city);
                });
                row.col(|ui| {
                    ui.label(&listing.locality);
                });
                row.col(|ui| {
                    ui.label(&listing.property_type);
                });
                row.col(|ui| {
                    ui.label(listing.bhk.to_string());
                });
                row.col(|ui| {
                    ui.label(format!("{:.0}", listing.size_in_sqft));
                });
                row.col(|ui| {
                    ui.label(format!("{:.1}", listing.price_in_lakhs));
                });
                row.col(|ui| {
                    ui.label(format!("{:.0}", listing.derived.price_per_sqft));
                });
            });
        });
}
