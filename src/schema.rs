use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::data::stats::DatasetStats;
use crate::features::DerivedFeatures;

// ---------------------------------------------------------------------------
// Feature schema – the single source of truth for the model input contract
// ---------------------------------------------------------------------------

/// Bumped whenever the trained column contract changes. Model manifests
/// carry the version they were exported against and are checked at load.
pub const SCHEMA_VERSION: u32 = 1;

/// The exact columns, in the exact order, the models were fitted on.
/// The models accept arbitrarily shaped tabular input without validation,
/// so any drift here mispredicts silently; everything that touches model
/// input goes through this list.
pub const FEATURE_COLUMNS: [&str; 24] = [
    "State",
    "City",
    "Locality",
    "Property_Type",
    "BHK",
    "Size_in_SqFt",
    "Price_in_Lakhs",
    "Price_per_SqFt",
    "Year_Built",
    "Age_of_Property",
    "Nearby_Schools",
    "Nearby_Hospitals",
    "Public_Transport_Accessibility",
    "Parking_Space",
    "Furnished_Status",
    "Floor_No",
    "Total_Floors",
    "Security",
    "Amenities",
    "Facing",
    "Owner_Type",
    "Availability_Status",
    "School_Density_Score",
    "Hospital_Density_Score",
];

/// The engineered columns, computed by the feature deriver rather than read
/// from the source table.
pub const DERIVED_COLUMNS: [&str; 3] = [
    "Price_per_SqFt",
    "School_Density_Score",
    "Hospital_Density_Score",
];

/// The 21 columns the source table must provide.
pub fn raw_columns() -> impl Iterator<Item = &'static str> {
    FEATURE_COLUMNS
        .iter()
        .copied()
        .filter(|c| !DERIVED_COLUMNS.contains(c))
}

// ---------------------------------------------------------------------------
// FeatureValue – one cell of the model input row
// ---------------------------------------------------------------------------

/// A single cell of the assembled feature row: numeric or categorical.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Number(f64),
    Text(String),
}

impl FeatureValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(v) => Some(*v),
            FeatureValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            FeatureValue::Number(_) => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Number(v) => write!(f, "{v}"),
            FeatureValue::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// PropertyInput – what the form supplies
// ---------------------------------------------------------------------------

/// The user-supplied attributes of the property under evaluation.
/// Everything else in the 24-column contract is derived or back-filled
/// from dataset statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyInput {
    pub state: String,
    pub city: String,
    pub locality: String,
    pub property_type: String,
    pub bhk: i64,
    pub size_in_sqft: f64,
    pub price_in_lakhs: f64,
    pub furnished_status: String,
    pub floor_no: i64,
    pub total_floors: i64,
    pub nearby_schools: i64,
    pub nearby_hospitals: i64,
}

// ---------------------------------------------------------------------------
// FeatureRow – the assembled, validated model input
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("feature row is missing expected column '{0}'")]
    MissingColumn(&'static str),
    #[error("feature row contains unexpected column '{0}'")]
    UnexpectedColumn(String),
}

/// A single model input row: exactly the [`FEATURE_COLUMNS`] fields, in
/// schema order. Construction validates the field set, so a `FeatureRow`
/// in hand is always safe to hand to a model backend.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    values: Vec<FeatureValue>,
}

impl FeatureRow {
    /// Build a row from a named field map, enforcing that it contains every
    /// schema column and nothing else.
    pub fn from_named(mut fields: BTreeMap<&'static str, FeatureValue>) -> Result<Self, SchemaError> {
        let mut values = Vec::with_capacity(FEATURE_COLUMNS.len());
        for col in FEATURE_COLUMNS {
            let value = fields.remove(col).ok_or(SchemaError::MissingColumn(col))?;
            values.push(value);
        }
        if let Some((extra, _)) = fields.into_iter().next() {
            return Err(SchemaError::UnexpectedColumn(extra.to_string()));
        }
        Ok(FeatureRow { values })
    }

    /// Assemble the full 24-column row from user input, engineered features
    /// and dataset-wide back-fill statistics.
    pub fn assemble(
        input: &PropertyInput,
        derived: &DerivedFeatures,
        stats: &DatasetStats,
    ) -> Result<Self, SchemaError> {
        let mut fields: BTreeMap<&'static str, FeatureValue> = BTreeMap::new();
        let text = |s: &str| FeatureValue::Text(s.to_string());

        fields.insert("State", text(&input.state));
        fields.insert("City", text(&input.city));
        fields.insert("Locality", text(&input.locality));
        fields.insert("Property_Type", text(&input.property_type));
        fields.insert("BHK", FeatureValue::Number(input.bhk as f64));
        fields.insert("Size_in_SqFt", FeatureValue::Number(input.size_in_sqft));
        fields.insert("Price_in_Lakhs", FeatureValue::Number(input.price_in_lakhs));
        fields.insert("Price_per_SqFt", FeatureValue::Number(derived.price_per_sqft));
        fields.insert("Year_Built", FeatureValue::Number(stats.year_built_median));
        fields.insert(
            "Age_of_Property",
            FeatureValue::Number(stats.age_of_property_median),
        );
        fields.insert(
            "Nearby_Schools",
            FeatureValue::Number(input.nearby_schools as f64),
        );
        fields.insert(
            "Nearby_Hospitals",
            FeatureValue::Number(input.nearby_hospitals as f64),
        );
        fields.insert(
            "Public_Transport_Accessibility",
            text(&stats.public_transport_mode),
        );
        fields.insert("Parking_Space", text(&stats.parking_space_mode));
        fields.insert("Furnished_Status", text(&input.furnished_status));
        fields.insert("Floor_No", FeatureValue::Number(input.floor_no as f64));
        fields.insert("Total_Floors", FeatureValue::Number(input.total_floors as f64));
        fields.insert("Security", text(&stats.security_mode));
        fields.insert("Amenities", text(&stats.amenities_mode));
        fields.insert("Facing", text(&stats.facing_mode));
        fields.insert("Owner_Type", text(&stats.owner_type_mode));
        fields.insert("Availability_Status", text(&stats.availability_status_mode));
        fields.insert(
            "School_Density_Score",
            FeatureValue::Number(derived.school_density_score),
        );
        fields.insert(
            "Hospital_Density_Score",
            FeatureValue::Number(derived.hospital_density_score),
        );

        FeatureRow::from_named(fields)
    }

    /// Values in schema order, paired with their column names.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FeatureValue)> {
        FEATURE_COLUMNS.iter().copied().zip(self.values.iter())
    }

    /// Look up a value by column name.
    pub fn get(&self, column: &str) -> Option<&FeatureValue> {
        FEATURE_COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|i| &self.values[i])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::stats::DatasetStats;

    fn sample_input() -> PropertyInput {
        PropertyInput {
            state: "Maharashtra".into(),
            city: "Mumbai".into(),
            locality: "Andheri".into(),
            property_type: "Apartment".into(),
            bhk: 3,
            size_in_sqft: 1200.0,
            price_in_lakhs: 100.0,
            furnished_status: "Semi-Furnished".into(),
            floor_no: 2,
            total_floors: 10,
            nearby_schools: 3,
            nearby_hospitals: 2,
        }
    }

    fn sample_stats() -> DatasetStats {
        DatasetStats {
            year_built_median: 2005.0,
            age_of_property_median: 20.0,
            public_transport_mode: "High".into(),
            parking_space_mode: "Yes".into(),
            security_mode: "Yes".into(),
            amenities_mode: "Gym, Pool".into(),
            facing_mode: "East".into(),
            owner_type_mode: "Owner".into(),
            availability_status_mode: "Ready_to_Move".into(),
        }
    }

    #[test]
    fn assembled_row_has_all_columns_in_schema_order() {
        let input = sample_input();
        let derived =
            crate::features::DerivedFeatures::compute(1200.0, 100.0, 3, 2).unwrap();
        let row = FeatureRow::assemble(&input, &derived, &sample_stats()).unwrap();

        assert_eq!(row.len(), 24);
        let names: Vec<&str> = row.iter().map(|(n, _)| n).collect();
        assert_eq!(names, FEATURE_COLUMNS.to_vec());
    }

    #[test]
    fn backfilled_fields_come_from_stats() {
        let input = sample_input();
        let derived =
            crate::features::DerivedFeatures::compute(1200.0, 100.0, 3, 2).unwrap();
        let row = FeatureRow::assemble(&input, &derived, &sample_stats()).unwrap();

        assert_eq!(row.get("Year_Built").unwrap().as_f64(), Some(2005.0));
        assert_eq!(row.get("Facing").unwrap().as_str(), Some("East"));
        assert_eq!(
            row.get("Availability_Status").unwrap().as_str(),
            Some("Ready_to_Move")
        );
        assert_eq!(
            row.get("Price_per_SqFt").unwrap().as_f64(),
            Some(100.0 * 1e5 / 1200.0)
        );
    }

    #[test]
    fn missing_column_is_rejected() {
        let mut fields: BTreeMap<&'static str, FeatureValue> = BTreeMap::new();
        for col in FEATURE_COLUMNS.iter().skip(1) {
            fields.insert(col, FeatureValue::Number(0.0));
        }
        assert_eq!(
            FeatureRow::from_named(fields),
            Err(SchemaError::MissingColumn("State"))
        );
    }

    #[test]
    fn unexpected_column_is_rejected() {
        let mut fields: BTreeMap<&'static str, FeatureValue> = BTreeMap::new();
        for col in FEATURE_COLUMNS {
            fields.insert(col, FeatureValue::Number(0.0));
        }
        fields.insert("Swimming_Pools", FeatureValue::Number(1.0));
        assert!(matches!(
            FeatureRow::from_named(fields),
            Err(SchemaError::UnexpectedColumn(_))
        ));
    }
}
