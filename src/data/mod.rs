/// Data layer: core types, loading, filtering and export.
///
/// Architecture:
/// ```text
///  .csv / .xlsx / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  header + cells → Vec<SessionRecord>, bad rows dropped
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐      ┌──────────────┐
///   │  filter   │ ◄─── │ CountyRegistry│
///   └──────────┘      └──────────────┘
///        │  FilteredView: matching rows + counties with no submissions
///        ▼
///   ┌──────────┐  ┌──────────┐
///   │ summary   │  │  export   │  per-county counts, CSV download
///   └──────────┘  └──────────┘
/// ```

pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod registry;
pub mod summary;
