/// Data layer: core types, loading, aggregation and the table view.
///
/// Architecture:
/// ```text
///  embedded .json / .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  coerce loose records → StudentDataset (or MalformedRecord)
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ StudentDataset  │  Vec<Student>, persona index, read-only
///   └────────────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │  stats    │   │  view     │  search + stable sort → visible indices
///   └──────────┘   └──────────┘
/// ```

pub mod error;
pub mod loader;
pub mod model;
pub mod stats;
pub mod view;
