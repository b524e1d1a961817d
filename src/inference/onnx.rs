//! ONNX-backed implementations of the model capability traits.
//!
//! The training side exports each pipeline as a `.onnx` graph plus a JSON
//! sidecar manifest (same file stem, `.json` extension) describing the input
//! encoding it was exported with: column order, category vocabularies for
//! the categorical columns, and the output tensor name. This module checks
//! the manifest against the compiled-in feature schema and applies it; the
//! graph itself stays opaque.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow, bail};
use ndarray::Array2;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Value;
use serde::Deserialize;

use crate::schema::{FEATURE_COLUMNS, FeatureRow, FeatureValue, SCHEMA_VERSION};

use super::{InvestmentClassifier, PriceRegressor};

// ---------------------------------------------------------------------------
// Sidecar manifest
// ---------------------------------------------------------------------------

/// Input-encoding description exported alongside a model artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelManifest {
    /// Feature-schema version the model was exported against.
    pub schema_version: u32,
    /// Name of the output tensor to read after `session.run`.
    pub output_name: String,
    /// Column specs in model input order.
    pub columns: Vec<ColumnSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    /// Category vocabulary for categorical columns; `None` means numeric.
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

impl ModelManifest {
    /// Parse and cross-check a manifest against the compiled-in schema.
    /// Any drift between the two is a load-time error, not a silent
    /// misprediction later.
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: ModelManifest = serde_json::from_str(json).context("parsing manifest")?;
        if manifest.schema_version != SCHEMA_VERSION {
            bail!(
                "manifest schema version {} does not match expected {SCHEMA_VERSION}",
                manifest.schema_version
            );
        }
        if manifest.columns.len() != FEATURE_COLUMNS.len() {
            bail!(
                "manifest declares {} columns, expected {}",
                manifest.columns.len(),
                FEATURE_COLUMNS.len()
            );
        }
        for (spec, expected) in manifest.columns.iter().zip(FEATURE_COLUMNS) {
            if spec.name != expected {
                bail!(
                    "manifest column '{}' does not match expected '{expected}' at that position",
                    spec.name
                );
            }
        }
        Ok(manifest)
    }

    /// Encode a validated feature row into the `(1, 24)` f32 tensor layout
    /// the exported graph expects.
    pub fn encode(&self, row: &FeatureRow) -> Result<Array2<f32>> {
        let mut encoded = Vec::with_capacity(self.columns.len());
        for (spec, (name, value)) in self.columns.iter().zip(row.iter()) {
            let cell = match (&spec.categories, value) {
                (None, FeatureValue::Number(v)) => *v as f32,
                (None, FeatureValue::Text(s)) => {
                    bail!("column '{name}' is numeric but got text value '{s}'")
                }
                (Some(categories), FeatureValue::Text(s)) => categories
                    .iter()
                    .position(|c| c == s)
                    .map(|i| i as f32)
                    .with_context(|| {
                        format!("value '{s}' for column '{name}' is not in the model vocabulary")
                    })?,
                (Some(_), FeatureValue::Number(v)) => {
                    bail!("column '{name}' is categorical but got number {v}")
                }
            };
            encoded.push(cell);
        }
        Array2::from_shape_vec((1, encoded.len()), encoded).context("shaping input tensor")
    }
}

// ---------------------------------------------------------------------------
// OnnxModel – one session + its manifest
// ---------------------------------------------------------------------------

/// One loaded ONNX artifact. Sessions are single-threaded and invoked one
/// request at a time; the mutex keeps the handle shareable behind `&self`.
pub struct OnnxModel {
    session: Mutex<Session>,
    manifest: ModelManifest,
}

impl OnnxModel {
    /// Load a model and its sidecar manifest from `<path>` and
    /// `<path with .json extension>`.
    pub fn load(path: &Path) -> Result<Self> {
        let manifest_path = path.with_extension("json");
        let manifest_json = std::fs::read_to_string(&manifest_path)
            .with_context(|| format!("reading manifest {}", manifest_path.display()))?;
        let manifest = ModelManifest::from_json(&manifest_json)
            .with_context(|| format!("manifest {}", manifest_path.display()))?;

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(ort::Error::<()>::from)?
            .with_intra_threads(1)
            .map_err(ort::Error::<()>::from)?
            .commit_from_file(path)
            .with_context(|| format!("loading model {}", path.display()))?;

        log::info!(
            "loaded model {} ({} input columns, output '{}')",
            path.display(),
            manifest.columns.len(),
            manifest.output_name
        );

        Ok(OnnxModel {
            session: Mutex::new(session),
            manifest,
        })
    }

    /// Encode, run, and read back the declared output tensor.
    fn run(&self, row: &FeatureRow) -> Result<Vec<f32>> {
        let input = self.manifest.encode(row)?;
        let input_tensor = Value::from_array(input)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("model session lock poisoned"))?;
        let outputs = session.run(ort::inputs![input_tensor])?;

        let output = outputs
            .get(self.manifest.output_name.as_str())
            .with_context(|| {
                format!("model has no output named '{}'", self.manifest.output_name)
            })?;
        let tensor_data = output.try_extract_tensor::<f32>()?;
        Ok(tensor_data.1.to_vec())
    }
}

// ---------------------------------------------------------------------------
// Capability implementations
// ---------------------------------------------------------------------------

pub struct OnnxClassifier(OnnxModel);

impl OnnxClassifier {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(OnnxClassifier(OnnxModel::load(path)?))
    }
}

impl InvestmentClassifier for OnnxClassifier {
    fn predict_probability(&self, row: &FeatureRow) -> Result<f64> {
        let probabilities = self.0.run(row)?;
        // Binary classifier: [p(not good), p(good)].
        if probabilities.len() < 2 {
            bail!(
                "classifier returned {} probabilities, expected 2",
                probabilities.len()
            );
        }
        Ok(probabilities[1] as f64)
    }
}

pub struct OnnxRegressor(OnnxModel);

impl OnnxRegressor {
    pub fn load(path: &Path) -> Result<Self> {
        Ok(OnnxRegressor(OnnxModel::load(path)?))
    }
}

impl PriceRegressor for OnnxRegressor {
    fn predict_value(&self, row: &FeatureRow) -> Result<f64> {
        let values = self.0.run(row)?;
        let value = values
            .first()
            .context("regressor returned an empty output tensor")?;
        Ok(*value as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::stats::DatasetStats;
    use crate::features::DerivedFeatures;
    use crate::schema::PropertyInput;

    fn manifest_json(version: u32) -> String {
        let columns: Vec<String> = FEATURE_COLUMNS
            .iter()
            .map(|name| {
                let categorical = matches!(
                    *name,
                    "State"
                        | "City"
                        | "Locality"
                        | "Property_Type"
                        | "Public_Transport_Accessibility"
                        | "Parking_Space"
                        | "Furnished_Status"
                        | "Security"
                        | "Amenities"
                        | "Facing"
                        | "Owner_Type"
                        | "Availability_Status"
                );
                if categorical {
                    format!(
                        r#"{{"name": "{name}", "categories": ["Alpha", "Beta", "Gamma"]}}"#
                    )
                } else {
                    format!(r#"{{"name": "{name}"}}"#)
                }
            })
            .collect();
        format!(
            r#"{{"schema_version": {version}, "output_name": "probabilities", "columns": [{}]}}"#,
            columns.join(",")
        )
    }

    fn sample_row() -> FeatureRow {
        let input = PropertyInput {
            state: "Alpha".into(),
            city: "Beta".into(),
            locality: "Gamma".into(),
            property_type: "Alpha".into(),
            bhk: 3,
            size_in_sqft: 1200.0,
            price_in_lakhs: 100.0,
            furnished_status: "Beta".into(),
            floor_no: 2,
            total_floors: 10,
            nearby_schools: 3,
            nearby_hospitals: 2,
        };
        let stats = DatasetStats {
            year_built_median: 2005.0,
            age_of_property_median: 20.0,
            public_transport_mode: "Alpha".into(),
            parking_space_mode: "Beta".into(),
            security_mode: "Gamma".into(),
            amenities_mode: "Alpha".into(),
            facing_mode: "Beta".into(),
            owner_type_mode: "Gamma".into(),
            availability_status_mode: "Alpha".into(),
        };
        let derived = DerivedFeatures::compute(1200.0, 100.0, 3, 2).unwrap();
        FeatureRow::assemble(&input, &derived, &stats).unwrap()
    }

    #[test]
    fn manifest_parses_and_encodes_in_schema_order() {
        let manifest = ModelManifest::from_json(&manifest_json(SCHEMA_VERSION)).unwrap();
        let encoded = manifest.encode(&sample_row()).unwrap();

        assert_eq!(encoded.shape(), &[1, 24]);
        // "State" = "Alpha" → vocabulary index 0; "City" = "Beta" → 1.
        assert_eq!(encoded[[0, 0]], 0.0);
        assert_eq!(encoded[[0, 1]], 1.0);
        // "BHK" is numeric and sits at schema position 4.
        assert_eq!(encoded[[0, 4]], 3.0);
        // "Size_in_SqFt" at position 5.
        assert_eq!(encoded[[0, 5]], 1200.0);
    }

    #[test]
    fn schema_version_mismatch_is_rejected() {
        let err = ModelManifest::from_json(&manifest_json(SCHEMA_VERSION + 1)).unwrap_err();
        assert!(err.to_string().contains("schema version"));
    }

    #[test]
    fn unknown_category_is_a_descriptive_error() {
        let manifest = ModelManifest::from_json(&manifest_json(SCHEMA_VERSION)).unwrap();
        // A state outside the vocabulary.
        let input = PropertyInput {
            state: "Atlantis".into(),
            city: "Beta".into(),
            locality: "Gamma".into(),
            property_type: "Alpha".into(),
            bhk: 3,
            size_in_sqft: 1200.0,
            price_in_lakhs: 100.0,
            furnished_status: "Beta".into(),
            floor_no: 2,
            total_floors: 10,
            nearby_schools: 3,
            nearby_hospitals: 2,
        };
        let stats = DatasetStats {
            year_built_median: 2005.0,
            age_of_property_median: 20.0,
            public_transport_mode: "Alpha".into(),
            parking_space_mode: "Beta".into(),
            security_mode: "Gamma".into(),
            amenities_mode: "Alpha".into(),
            facing_mode: "Beta".into(),
            owner_type_mode: "Gamma".into(),
            availability_status_mode: "Alpha".into(),
        };
        let derived = DerivedFeatures::compute(1200.0, 100.0, 3, 2).unwrap();
        let row = FeatureRow::assemble(&input, &derived, &stats).unwrap();

        let err = manifest.encode(&row).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Atlantis") && msg.contains("State"), "{msg}");
    }

    #[test]
    fn wrong_column_order_is_rejected() {
        let json = manifest_json(SCHEMA_VERSION).replace(
            r#"{"name": "BHK"}"#,
            r#"{"name": "Bedrooms"}"#,
        );
        let err = ModelManifest::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("Bedrooms"));
    }
}
