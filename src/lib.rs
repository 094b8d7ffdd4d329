//! Frequency-response viewer for 8-sensor DIMM simulation results.
//!
//! The library holds everything that does not need a window: parsing,
//! normalization, report handling, export and settings. The `freq-response-viewer`
//! binary builds the egui front end on top of it.

pub mod config;
pub mod data;
