use crate::color::CityColors;
use crate::data::filter::{ListingFilter, filtered_indices};
use crate::data::model::HousingDataset;
use crate::inference::{Advisor, Analysis};
use crate::schema::PropertyInput;

// ---------------------------------------------------------------------------
// Property form
// ---------------------------------------------------------------------------

/// The property-details form. Widget-backed values; dropdown fields are
/// seeded from the dataset once one is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyForm {
    pub state: String,
    pub city: String,
    pub locality: String,
    pub property_type: String,
    pub furnished_status: String,
    pub bhk: i64,
    pub size_in_sqft: f64,
    pub price_in_lakhs: f64,
    pub floor_no: i64,
    pub total_floors: i64,
    pub nearby_schools: i64,
    pub nearby_hospitals: i64,
}

impl Default for PropertyForm {
    fn default() -> Self {
        PropertyForm {
            state: String::new(),
            city: String::new(),
            locality: String::new(),
            property_type: String::new(),
            furnished_status: String::new(),
            bhk: 3,
            size_in_sqft: 1200.0,
            price_in_lakhs: 100.0,
            floor_no: 2,
            total_floors: 10,
            nearby_schools: 3,
            nearby_hospitals: 2,
        }
    }
}

impl PropertyForm {
    pub fn to_input(&self) -> PropertyInput {
        PropertyInput {
            state: self.state.clone(),
            city: self.city.clone(),
            locality: self.locality.clone(),
            property_type: self.property_type.clone(),
            bhk: self.bhk,
            size_in_sqft: self.size_in_sqft,
            price_in_lakhs: self.price_in_lakhs,
            furnished_status: self.furnished_status.clone(),
            floor_no: self.floor_no,
            total_floors: self.total_floors,
            nearby_schools: self.nearby_schools,
            nearby_hospitals: self.nearby_hospitals,
        }
    }

    /// Keep the dependent State → City → Locality selections consistent with
    /// the dataset, falling back to the first available value when the
    /// current one is no longer valid.
    pub fn sync_location(&mut self, dataset: &HousingDataset) {
        if !dataset.states.contains(&self.state) {
            self.state = dataset.states.iter().next().cloned().unwrap_or_default();
        }
        let cities = dataset.cities_in(&self.state);
        if cities.map_or(true, |c| !c.contains(&self.city)) {
            self.city = cities
                .and_then(|c| c.iter().next().cloned())
                .unwrap_or_default();
        }
        let localities = dataset.localities_in(&self.city);
        if localities.map_or(true, |l| !l.contains(&self.locality)) {
            self.locality = localities
                .and_then(|l| l.iter().next().cloned())
                .unwrap_or_default();
        }
        if !dataset.property_types.contains(&self.property_type) {
            self.property_type = dataset
                .property_types
                .iter()
                .next()
                .cloned()
                .unwrap_or_default();
        }
        if !dataset.furnished_statuses.contains(&self.furnished_status) {
            self.furnished_status = dataset
                .furnished_statuses
                .iter()
                .next()
                .cloned()
                .unwrap_or_default();
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded reference dataset (None until a file is loaded).
    pub dataset: Option<HousingDataset>,

    /// Model handles, loaded once at startup. None when the artifacts were
    /// not found; the dashboard then runs in explore-only mode.
    pub advisor: Option<Advisor>,

    /// Sidebar filter selections.
    pub filter: ListingFilter,

    /// Indices of listings passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// City → colour mapping for the charts.
    pub city_colors: Option<CityColors>,

    /// The property-details form.
    pub form: PropertyForm,

    /// Result of the last analysis, if any.
    pub analysis: Option<Analysis>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            advisor: None,
            filter: ListingFilter::default(),
            visible_indices: Vec::new(),
            city_colors: None,
            form: PropertyForm::default(),
            analysis: None,
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset, seed the filter and form, recompute
    /// the visible set.
    pub fn set_dataset(&mut self, dataset: HousingDataset) {
        self.filter.seed_bhk(&dataset);
        self.form.sync_location(&dataset);

        let mut cities = std::collections::BTreeSet::new();
        for c in dataset.cities_by_state.values() {
            cities.extend(c.iter().cloned());
        }
        self.city_colors = Some(CityColors::new(&cities));

        self.visible_indices = (0..dataset.len()).collect();
        self.dataset = Some(dataset);
        self.refilter();

        self.analysis = None;
        self.status_message = None;
        self.loading = false;
    }

    /// Install the model handles produced at startup.
    pub fn set_advisor(&mut self, advisor: Advisor) {
        self.advisor = Some(advisor);
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.filter);
        }
    }

    /// Whether the analysis button should be enabled.
    pub fn can_analyze(&self) -> bool {
        self.dataset.is_some() && self.advisor.is_some()
    }

    /// One button press → one synchronous derive + dual-inference call.
    pub fn run_analysis(&mut self) {
        let (Some(dataset), Some(advisor)) = (&self.dataset, &self.advisor) else {
            self.status_message =
                Some("Load the dataset and model artifacts before analyzing.".to_string());
            return;
        };

        match advisor.analyze(&self.form.to_input(), &dataset.stats) {
            Ok(analysis) => {
                log::info!(
                    "{}: p={:.3}, 5y price {:.0}L",
                    analysis.verdict.label(),
                    analysis.good_probability,
                    analysis.future_price_lakhs
                );
                self.analysis = Some(analysis);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("analysis failed: {e:#}");
                self.analysis = None;
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::listing;
    use crate::inference::{InvestmentClassifier, PriceRegressor};
    use crate::schema::FeatureRow;

    struct StubClassifier(f64);
    impl InvestmentClassifier for StubClassifier {
        fn predict_probability(&self, _row: &FeatureRow) -> anyhow::Result<f64> {
            Ok(self.0)
        }
    }

    struct StubRegressor;
    impl PriceRegressor for StubRegressor {
        fn predict_value(&self, _row: &FeatureRow) -> anyhow::Result<f64> {
            Ok(123.0)
        }
    }

    fn dataset() -> HousingDataset {
        HousingDataset::from_listings(vec![
            listing("Maharashtra", "Mumbai", 2, 900.0, 80.0),
            listing("Karnataka", "Bengaluru", 3, 1400.0, 95.0),
        ])
        .unwrap()
    }

    #[test]
    fn set_dataset_seeds_form_and_visible_rows() {
        let mut state = AppState::default();
        state.set_dataset(dataset());

        // First state alphabetically, with a matching city and locality.
        assert_eq!(state.form.state, "Karnataka");
        assert_eq!(state.form.city, "Bengaluru");
        assert_eq!(state.form.locality, "Bengaluru Central");
        assert_eq!(state.visible_indices, vec![0, 1]);
    }

    #[test]
    fn refilter_narrows_visible_rows() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.filter.max_price = 85.0;
        state.refilter();
        assert_eq!(state.visible_indices, vec![0]);
    }

    #[test]
    fn run_analysis_without_models_sets_status() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.run_analysis();
        assert!(state.analysis.is_none());
        assert!(state.status_message.is_some());
    }

    #[test]
    fn run_analysis_stores_result() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.set_advisor(Advisor::new(
            Box::new(StubClassifier(0.9)),
            Box::new(StubRegressor),
        ));
        state.run_analysis();

        let analysis = state.analysis.expect("analysis should succeed");
        assert_eq!(analysis.future_price_lakhs, 123.0);
        assert_eq!(
            analysis.verdict,
            crate::inference::Verdict::GoodInvestment
        );
    }
}
