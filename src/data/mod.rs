/// Data layer: core types, loading, and column classification.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset  │  header row + aligned rows of cells
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  schema  │  header name → numeric / categorical
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod schema;
