use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::state::AppState;

/// How many scatter points to draw at most, matching the original
/// dashboard's down-sampling.
const MAX_SCATTER_POINTS: usize = 1000;

// ---------------------------------------------------------------------------
// Market insights (central panel)
// ---------------------------------------------------------------------------

/// Render the two market-insight charts over the currently filtered rows.
pub fn market_insights(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to view market insights  (File → Open dataset…)");
        });
        return;
    };

    ui.heading("Market Insights");
    ui.columns(2, |cols| {
        avg_price_by_city(&mut cols[0], state, dataset);
        price_vs_size(&mut cols[1], state, dataset);
    });
}

/// Horizontal bars: mean price per city, ascending, one chart per city so
/// the legend doubles as the category axis.
fn avg_price_by_city(
    ui: &mut Ui,
    state: &AppState,
    dataset: &crate::data::model::HousingDataset,
) {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for &idx in &state.visible_indices {
        let l = &dataset.listings[idx];
        let entry = sums.entry(l.city.as_str()).or_default();
        entry.0 += l.price_in_lakhs;
        entry.1 += 1;
    }

    let mut averages: Vec<(&str, f64)> = sums
        .into_iter()
        .map(|(city, (sum, n))| (city, sum / n as f64))
        .collect();
    averages.sort_by(|a, b| a.1.total_cmp(&b.1));

    ui.label("Average Price by City (filtered)");
    Plot::new("avg_price_by_city")
        .legend(Legend::default())
        .x_axis_label("Price (Lakhs)")
        .show_axes([true, false])
        .show(ui, |plot_ui| {
            for (i, (city, avg)) in averages.iter().enumerate() {
                let color = state
                    .city_colors
                    .as_ref()
                    .map(|cc| cc.color_for(city))
                    .unwrap_or(Color32::LIGHT_BLUE);

                let chart = BarChart::new(vec![Bar::new(i as f64, *avg).width(0.7)])
                    .horizontal()
                    .name(*city)
                    .color(color);
                plot_ui.bar_chart(chart);
            }
        });
}

/// Scatter of size vs price over the filtered rows, capped at
/// [`MAX_SCATTER_POINTS`].
fn price_vs_size(
    ui: &mut Ui,
    state: &AppState,
    dataset: &crate::data::model::HousingDataset,
) {
    let points: PlotPoints = state
        .visible_indices
        .iter()
        .take(MAX_SCATTER_POINTS)
        .map(|&idx| {
            let l = &dataset.listings[idx];
            [l.size_in_sqft, l.price_in_lakhs]
        })
        .collect();

    ui.label("Price vs Size (filtered)");
    Plot::new("price_vs_size")
        .x_axis_label("Size (sqft)")
        .y_axis_label("Price (Lakhs)")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(points)
                    .radius(2.0)
                    .color(Color32::LIGHT_BLUE),
            );
        });
}
