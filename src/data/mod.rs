/// Data layer: core types, loading, querying and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → StructureTable
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ StructureTable  │  Vec<Structure>, immutable after load
///   └────────────────┘
///        │
///        ├──► filter  predicates + projection → Projection
///        ├──► stats   extremum / mean / mode → facts
///        ├──► geo     global / location / proximity → MapProjection
///        └──► charts  distributions, histogram, top-N, year vs height
/// ```

pub mod charts;
pub mod error;
pub mod export;
pub mod filter;
pub mod geo;
pub mod loader;
pub mod model;
pub mod stats;

pub use error::{DataError, Result};
pub use model::{CellValue, Column, Projection, Structure, StructureTable, Unit};
