use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use crate::features::DerivedFeatures;
use crate::schema::raw_columns;

use super::model::{HousingDataset, Listing};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the housing reference dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – delimited text with one header row (the canonical format)
/// * `.json`    – records orientation, `[{ "State": ..., "City": ..., ... }]`
/// * `.parquet` – scalar columns, as written by `df.to_parquet()`
///
/// Every row passes through the feature deriver, so the engineered columns
/// of the bulk dataset are computed by the same code that handles a
/// user-entered record at prediction time.
pub fn load_file(path: &Path) -> Result<HousingDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let listings = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    HousingDataset::from_listings(listings).context("building dataset indices")
}

// ---------------------------------------------------------------------------
// Row assembly shared by all loaders
// ---------------------------------------------------------------------------

/// Raw cell values for one row, keyed by column name. Loaders fill this,
/// `build_listing` parses and derives.
type RawRow = BTreeMap<&'static str, String>;

fn build_listing(row: &RawRow, row_no: usize) -> Result<Listing> {
    let text = |col: &'static str| -> Result<String> {
        row.get(col)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Row {row_no}: missing '{col}'"))
    };
    let number = |col: &'static str| -> Result<f64> {
        let s = text(col)?;
        s.parse::<f64>()
            .with_context(|| format!("Row {row_no}, {col}: '{s}' is not a number"))
    };
    let integer = |col: &'static str| -> Result<i64> {
        let s = text(col)?;
        // Pandas exports sometimes render integer columns as "3.0".
        s.parse::<i64>()
            .or_else(|_| s.parse::<f64>().map(|v| v as i64))
            .with_context(|| format!("Row {row_no}, {col}: '{s}' is not an integer"))
    };

    let size_in_sqft = number("Size_in_SqFt")?;
    let price_in_lakhs = number("Price_in_Lakhs")?;
    let nearby_schools = integer("Nearby_Schools")?;
    let nearby_hospitals = integer("Nearby_Hospitals")?;
    let derived =
        DerivedFeatures::compute(size_in_sqft, price_in_lakhs, nearby_schools, nearby_hospitals)
            .with_context(|| format!("Row {row_no}"))?;

    Ok(Listing {
        state: text("State")?,
        city: text("City")?,
        locality: text("Locality")?,
        property_type: text("Property_Type")?,
        bhk: integer("BHK")?,
        size_in_sqft,
        price_in_lakhs,
        year_built: integer("Year_Built")?,
        age_of_property: integer("Age_of_Property")?,
        nearby_schools,
        nearby_hospitals,
        public_transport_accessibility: text("Public_Transport_Accessibility")?,
        parking_space: text("Parking_Space")?,
        furnished_status: text("Furnished_Status")?,
        floor_no: integer("Floor_No")?,
        total_floors: integer("Total_Floors")?,
        security: text("Security")?,
        amenities: text("Amenities")?,
        facing: text("Facing")?,
        owner_type: text("Owner_Type")?,
        availability_status: text("Availability_Status")?,
        derived,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<Listing>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    // Check the full column set up front so a schema mismatch is one clear
    // error instead of a failure on the first row.
    let mut col_idx: BTreeMap<&'static str, usize> = BTreeMap::new();
    for col in raw_columns() {
        let idx = headers
            .iter()
            .position(|h| h == col)
            .with_context(|| format!("CSV missing '{col}' column"))?;
        col_idx.insert(col, idx);
    }

    let mut listings = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let mut row = RawRow::new();
        for (&col, &idx) in &col_idx {
            row.insert(col, record.get(idx).unwrap_or("").to_string());
        }
        listings.push(build_listing(&row, row_no)?);
    }

    Ok(listings)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records orientation, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "State": "Maharashtra", "City": "Mumbai", "BHK": 3, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<Listing>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut listings = Vec::with_capacity(records.len());
    for (row_no, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {row_no} is not a JSON object"))?;

        let mut row = RawRow::new();
        for col in raw_columns() {
            let val = obj
                .get(col)
                .with_context(|| format!("Row {row_no}: missing '{col}'"))?;
            row.insert(col, json_to_cell(val));
        }
        listings.push(build_listing(&row, row_no)?);
    }

    Ok(listings)
}

fn json_to_cell(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load the dataset from a Parquet file with scalar columns, as written by
/// both **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<Listing>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut listings = Vec::new();
    let mut row_no = 0usize;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let mut columns: BTreeMap<&'static str, &Arc<dyn Array>> = BTreeMap::new();
        for col in raw_columns() {
            let idx = schema
                .index_of(col)
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{col}' column"))?;
            columns.insert(col, batch.column(idx));
        }

        for batch_row in 0..batch.num_rows() {
            let mut row = RawRow::new();
            for (&col, array) in &columns {
                let cell = cell_to_string(array, batch_row)
                    .with_context(|| format!("Row {row_no}: failed to read '{col}'"))?;
                row.insert(col, cell);
            }
            listings.push(build_listing(&row, row_no)?);
            row_no += 1;
        }
    }

    Ok(listings)
}

/// Render a scalar Arrow cell as text for the shared row parser.
fn cell_to_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        return Ok(String::new());
    }
    let s = match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            arr.value(row).to_string()
        }
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            arr.value(row).to_string()
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            arr.value(row).to_string()
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            arr.value(row).to_string()
        }
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            arr.value(row).to_string()
        }
        DataType::Boolean => {
            let arr = col
                .as_any()
                .downcast_ref::<BooleanArray>()
                .context("expected BooleanArray")?;
            arr.value(row).to_string()
        }
        other => bail!("Unsupported column type {other:?}"),
    };
    Ok(s)
}
