/// Data layer: core types, loading, and splitting.
///
/// Architecture:
/// ```text
///  .csv / .tsv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table, columns typed by content
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   Table   │  Vec<Column>, rows aligned by position
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  split    │  random row partition → training / validation
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod split;
