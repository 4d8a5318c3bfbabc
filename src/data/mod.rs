/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → JobDataset (text columns trimmed)
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ JobDataset │  Vec<JobPosting>, column names
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  city / company / title criteria → FilterResult
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  value counts, top-N → chart input
///   └───────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
