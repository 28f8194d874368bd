/// Data layer: record model, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Record>, filter options
///   └──────────┘
///        │  + FilterCriteria
///        ▼
///   ┌──────────┐
///   │  filter   │  apply criteria → Vec<&Record>
///   └──────────┘
///        │
///        ▼
///   grouping · series · stats · ratio   (one scan each)
///        │
///        ▼
///   ┌──────────┐
///   │   view    │  DashboardView
///   └──────────┘
/// ```

pub mod dates;
pub mod filter;
pub mod grouping;
pub mod loader;
pub mod model;
pub mod ratio;
pub mod series;
pub mod stats;
pub mod view;
