/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  final_meteorite_data.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse CSV → MeteoriteDataset (rows without
///   └──────────┘  coordinates or a year are dropped here)
///        │
///        ▼
///   ┌─────────────────┐
///   │ MeteoriteDataset │  Vec<MeteoriteRecord>, category indices
///   └─────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year range + fall/status predicates → indices
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
