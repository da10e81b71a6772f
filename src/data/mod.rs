/// Data layer: raw experiments, loading, projection and range selection.
///
/// Architecture:
/// ```text
///  .txt (KinTek) / .csv (ProDataCSV)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawFile (t, w, z)
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ FileCollection │  Vec<RawFile>, import order
///   └────────────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ projection │  RawFile + Axis → selectable (label, x, y) rows
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  range    │  linear/log targets → nearest row indices
///   └──────────┘
/// ```

pub mod collection;
pub mod loader;
pub mod model;
pub mod projection;
pub mod range;
