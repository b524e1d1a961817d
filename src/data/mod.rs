/// Data layer: core types, loading, statistics, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file, derive features → HousingDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ HousingDataset │  Vec<Listing>, value indices, DatasetStats
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  price ∧ size ∧ BHK predicates → filtered indices
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod stats;
