use std::collections::BTreeMap;

use thiserror::Error;

use super::model::Listing;

// ---------------------------------------------------------------------------
// Dataset-wide statistics backing the inference row
// ---------------------------------------------------------------------------

/// Medians and most-frequent values for the columns the prediction form does
/// not ask the user for. Computed once when the dataset is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub year_built_median: f64,
    pub age_of_property_median: f64,
    pub public_transport_mode: String,
    pub parking_space_mode: String,
    pub security_mode: String,
    pub amenities_mode: String,
    pub facing_mode: String,
    pub owner_type_mode: String,
    pub availability_status_mode: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("cannot compute dataset statistics: the dataset is empty")]
    EmptyDataset,
    #[error("cannot compute most-frequent value: column '{0}' has no non-empty values")]
    EmptyColumn(&'static str),
}

impl DatasetStats {
    pub fn compute(listings: &[Listing]) -> Result<Self, StatsError> {
        if listings.is_empty() {
            return Err(StatsError::EmptyDataset);
        }
        Ok(DatasetStats {
            year_built_median: median(listings.iter().map(|l| l.year_built as f64)),
            age_of_property_median: median(listings.iter().map(|l| l.age_of_property as f64)),
            public_transport_mode: mode(
                listings.iter().map(|l| l.public_transport_accessibility.as_str()),
                "Public_Transport_Accessibility",
            )?,
            parking_space_mode: mode(
                listings.iter().map(|l| l.parking_space.as_str()),
                "Parking_Space",
            )?,
            security_mode: mode(listings.iter().map(|l| l.security.as_str()), "Security")?,
            amenities_mode: mode(listings.iter().map(|l| l.amenities.as_str()), "Amenities")?,
            facing_mode: mode(listings.iter().map(|l| l.facing.as_str()), "Facing")?,
            owner_type_mode: mode(listings.iter().map(|l| l.owner_type.as_str()), "Owner_Type")?,
            availability_status_mode: mode(
                listings.iter().map(|l| l.availability_status.as_str()),
                "Availability_Status",
            )?,
        })
    }
}

/// Median of a non-empty numeric sequence (mean of the middle pair for even
/// lengths, matching pandas).
fn median(values: impl Iterator<Item = f64>) -> f64 {
    let mut v: Vec<f64> = values.collect();
    v.sort_by(f64::total_cmp);
    let n = v.len();
    if n % 2 == 1 {
        v[n / 2]
    } else {
        (v[n / 2 - 1] + v[n / 2]) / 2.0
    }
}

/// Most frequent non-empty value of a string column. Ties break to the
/// smallest value so the result is deterministic.
fn mode<'a>(
    values: impl Iterator<Item = &'a str>,
    column: &'static str,
) -> Result<String, StatsError> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for v in values {
        if !v.is_empty() {
            *counts.entry(v).or_default() += 1;
        }
    }
    counts
        .iter()
        // BTreeMap iterates in key order, so `>` keeps the first (smallest)
        // key among equal counts.
        .fold(None::<(&str, usize)>, |best, (&k, &c)| match best {
            Some((_, bc)) if c <= bc => best,
            _ => Some((k, c)),
        })
        .map(|(k, _)| k.to_string())
        .ok_or(StatsError::EmptyColumn(column))
}
