use std::collections::BTreeSet;

use super::model::{HousingDataset, Listing};

// ---------------------------------------------------------------------------
// Filter predicate: price range ∧ size range ∧ BHK membership
// ---------------------------------------------------------------------------

/// The sidebar filter state. A listing is visible only when it satisfies all
/// three predicates at once.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingFilter {
    /// Price bounds in lakhs, inclusive on both ends.
    pub min_price: f64,
    pub max_price: f64,
    /// Size bounds in sqft, inclusive on both ends.
    pub min_size: f64,
    pub max_size: f64,
    /// Selected BHK counts. An empty selection matches nothing.
    pub bhk: BTreeSet<i64>,
}

impl Default for ListingFilter {
    fn default() -> Self {
        ListingFilter {
            min_price: 10.0,
            max_price: 500.0,
            min_size: 500.0,
            max_size: 5000.0,
            bhk: [2, 3].into_iter().collect(),
        }
    }
}

impl ListingFilter {
    /// Whether a single listing passes every predicate.
    pub fn matches(&self, listing: &Listing) -> bool {
        listing.price_in_lakhs >= self.min_price
            && listing.price_in_lakhs <= self.max_price
            && listing.size_in_sqft >= self.min_size
            && listing.size_in_sqft <= self.max_size
            && self.bhk.contains(&listing.bhk)
    }

    /// Seed the BHK selection from the dataset, keeping the {2, 3} default
    /// where those values exist.
    pub fn seed_bhk(&mut self, dataset: &HousingDataset) {
        self.bhk = dataset
            .bhk_values
            .iter()
            .copied()
            .filter(|b| [2, 3].contains(b))
            .collect();
        if self.bhk.is_empty() {
            self.bhk = dataset.bhk_values.clone();
        }
    }
}

/// Return indices of listings that pass all active filters.
pub fn filtered_indices(dataset: &HousingDataset, filter: &ListingFilter) -> Vec<usize> {
    dataset
        .listings
        .iter()
        .enumerate()
        .filter(|(_, l)| filter.matches(l))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::model::tests::listing;
    use super::*;

    fn dataset() -> HousingDataset {
        HousingDataset::from_listings(vec![
            listing("Maharashtra", "Mumbai", 2, 900.0, 80.0), // passes default
            listing("Maharashtra", "Pune", 3, 5200.0, 60.0),  // size too large
            listing("Karnataka", "Bengaluru", 5, 1400.0, 95.0), // bhk not selected
            listing("Karnataka", "Mysuru", 3, 1400.0, 700.0), // price too high
            listing("Delhi", "New Delhi", 3, 500.0, 10.0),    // boundary values
        ])
        .unwrap()
    }

    #[test]
    fn conjunction_of_all_three_predicates() {
        let ds = dataset();
        let idx = filtered_indices(&ds, &ListingFilter::default());
        assert_eq!(idx, vec![0, 4]);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let ds = dataset();
        let filter = ListingFilter::default();
        // price == min_price, size == min_size
        assert!(filter.matches(&ds.listings[4]));
    }

    #[test]
    fn empty_bhk_selection_matches_nothing() {
        let ds = dataset();
        let filter = ListingFilter {
            bhk: BTreeSet::new(),
            ..ListingFilter::default()
        };
        assert!(filtered_indices(&ds, &filter).is_empty());
    }

    #[test]
    fn seed_bhk_falls_back_to_all_values() {
        let ds = HousingDataset::from_listings(vec![
            listing("Delhi", "New Delhi", 1, 800.0, 50.0),
            listing("Delhi", "New Delhi", 4, 1800.0, 150.0),
        ])
        .unwrap();
        let mut filter = ListingFilter::default();
        filter.seed_bhk(&ds);
        assert_eq!(filter.bhk, [1, 4].into_iter().collect());
    }
}
