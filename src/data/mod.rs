/// Data layer: result-file parsing, normalization, reports, and export.
///
/// Architecture:
/// ```text
///  <sim>/data/<quantity>/DIMM{1..8}{x,y,z}.txt
///        │
///        ▼
///   ┌──────────┐
///   │  reader   │  header + freq/amp/phase rows → RawSeries
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  units    │  m → mm, m/s² → g  → SensorSeries
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ assembler  │  8 sensors × 3 axes → QuantityDataset   (cache)
///   └───────────┘
///
///  <sim>/data/<q>_<axis>_description.txt ──► summary ──► DescriptionTable ──► format
///  <sim>/modes.txt                       ──► modes   ──► Vec<f64>
/// ```

pub mod assembler;
pub mod cache;
pub mod describe;
pub mod error;
pub mod export;
pub mod format;
pub mod model;
pub mod modes;
pub mod reader;
pub mod summary;
pub mod units;
