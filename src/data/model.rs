use std::collections::{BTreeMap, BTreeSet};

use crate::features::DerivedFeatures;

use super::stats::{DatasetStats, StatsError};

// ---------------------------------------------------------------------------
// Listing – one row of the reference dataset
// ---------------------------------------------------------------------------

/// A single housing listing (one row of the source table), raw columns plus
/// the engineered features computed at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub state: String,
    pub city: String,
    pub locality: String,
    pub property_type: String,
    pub bhk: i64,
    pub size_in_sqft: f64,
    pub price_in_lakhs: f64,
    pub year_built: i64,
    pub age_of_property: i64,
    pub nearby_schools: i64,
    pub nearby_hospitals: i64,
    pub public_transport_accessibility: String,
    pub parking_space: String,
    pub furnished_status: String,
    pub floor_no: i64,
    pub total_floors: i64,
    pub security: String,
    pub amenities: String,
    pub facing: String,
    pub owner_type: String,
    pub availability_status: String,
    /// Engineered columns, always present once a listing is loaded.
    pub derived: DerivedFeatures,
}

// ---------------------------------------------------------------------------
// HousingDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed value indices for the UI and
/// the back-fill statistics for inference. Built once at load time and
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct HousingDataset {
    /// All listings (rows).
    pub listings: Vec<Listing>,
    /// Sorted unique states.
    pub states: BTreeSet<String>,
    /// state → sorted unique cities, for the dependent form dropdowns.
    pub cities_by_state: BTreeMap<String, BTreeSet<String>>,
    /// city → sorted unique localities.
    pub localities_by_city: BTreeMap<String, BTreeSet<String>>,
    /// Sorted unique property types.
    pub property_types: BTreeSet<String>,
    /// Sorted unique furnished statuses.
    pub furnished_statuses: BTreeSet<String>,
    /// Sorted unique BHK counts, drives the filter checkboxes.
    pub bhk_values: BTreeSet<i64>,
    /// Medians and most-frequent values backing the inference row.
    pub stats: DatasetStats,
}

impl HousingDataset {
    /// Build value indices and statistics from loaded listings.
    pub fn from_listings(listings: Vec<Listing>) -> Result<Self, StatsError> {
        let stats = DatasetStats::compute(&listings)?;

        let mut states = BTreeSet::new();
        let mut cities_by_state: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut localities_by_city: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut property_types = BTreeSet::new();
        let mut furnished_statuses = BTreeSet::new();
        let mut bhk_values = BTreeSet::new();

        for l in &listings {
            states.insert(l.state.clone());
            cities_by_state
                .entry(l.state.clone())
                .or_default()
                .insert(l.city.clone());
            localities_by_city
                .entry(l.city.clone())
                .or_default()
                .insert(l.locality.clone());
            property_types.insert(l.property_type.clone());
            furnished_statuses.insert(l.furnished_status.clone());
            bhk_values.insert(l.bhk);
        }

        Ok(HousingDataset {
            listings,
            states,
            cities_by_state,
            localities_by_city,
            property_types,
            furnished_statuses,
            bhk_values,
            stats,
        })
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Cities of a given state, if the state occurs in the dataset.
    pub fn cities_in(&self, state: &str) -> Option<&BTreeSet<String>> {
        self.cities_by_state.get(state)
    }

    /// Localities of a given city.
    pub fn localities_in(&self, city: &str) -> Option<&BTreeSet<String>> {
        self.localities_by_city.get(city)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A small fixed listing used across the data-layer tests.
    pub(crate) fn listing(
        state: &str,
        city: &str,
        bhk: i64,
        size: f64,
        price: f64,
    ) -> Listing {
        Listing {
            state: state.to_string(),
            city: city.to_string(),
            locality: format!("{city} Central"),
            property_type: "Apartment".into(),
            bhk,
            size_in_sqft: size,
            price_in_lakhs: price,
            year_built: 2010,
            age_of_property: 15,
            nearby_schools: 3,
            nearby_hospitals: 2,
            public_transport_accessibility: "High".into(),
            parking_space: "Yes".into(),
            furnished_status: "Semi-Furnished".into(),
            floor_no: 2,
            total_floors: 10,
            security: "Yes".into(),
            amenities: "Gym".into(),
            facing: "East".into(),
            owner_type: "Owner".into(),
            availability_status: "Ready_to_Move".into(),
            derived: DerivedFeatures::compute(size, price, 3, 2).unwrap(),
        }
    }

    #[test]
    fn indices_are_built_per_state_and_city() {
        let ds = HousingDataset::from_listings(vec![
            listing("Maharashtra", "Mumbai", 2, 900.0, 80.0),
            listing("Maharashtra", "Pune", 3, 1100.0, 60.0),
            listing("Karnataka", "Bengaluru", 3, 1400.0, 95.0),
        ])
        .unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.states.len(), 2);
        let mh = ds.cities_in("Maharashtra").unwrap();
        assert!(mh.contains("Mumbai") && mh.contains("Pune"));
        assert!(ds.cities_in("Kerala").is_none());
        assert_eq!(
            ds.localities_in("Pune").unwrap().iter().next().unwrap(),
            "Pune Central"
        );
        assert_eq!(ds.bhk_values, [2, 3].into_iter().collect());
    }

    #[test]
    fn empty_dataset_is_rejected() {
        assert!(HousingDataset::from_listings(Vec::new()).is_err());
    }
}
