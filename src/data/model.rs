use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of DIMM sensor positions in every simulation.
pub const SENSOR_COUNT: usize = 8;

// ---------------------------------------------------------------------------
// Quantity / Axis – what was measured and in which direction
// ---------------------------------------------------------------------------

/// The physical quantity a result file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantity {
    Velocity,
    Deformation,
    Acceleration,
}

impl Quantity {
    pub const ALL: [Quantity; 3] = [Quantity::Velocity, Quantity::Deformation, Quantity::Acceleration];

    /// Directory name under `<sim>/data/`, also used in report and export names.
    pub const fn dir_name(self) -> &'static str {
        match self {
            Quantity::Velocity => "velocity",
            Quantity::Deformation => "deformation",
            Quantity::Acceleration => "acceleration",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Quantity::Velocity => "Velocity",
            Quantity::Deformation => "Deformation",
            Quantity::Acceleration => "Acceleration",
        }
    }

    /// Unit of the amplitude column as written by the solver.
    pub const fn raw_unit(self) -> &'static str {
        match self {
            Quantity::Velocity => "m/s",
            Quantity::Deformation => "m",
            Quantity::Acceleration => "m/s2",
        }
    }

    /// Unit of the amplitude that gets plotted.
    pub const fn display_unit(self) -> &'static str {
        match self {
            Quantity::Velocity => "m/s",
            Quantity::Deformation => "mm",
            Quantity::Acceleration => "g",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Quantity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "velocity" => Ok(Quantity::Velocity),
            "deformation" => Ok(Quantity::Deformation),
            "acceleration" => Ok(Quantity::Acceleration),
            other => Err(format!("unknown quantity '{other}'")),
        }
    }
}

/// Measurement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub const fn as_str(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Raw rows – exactly what the result file says
// ---------------------------------------------------------------------------

/// One `frequency amplitude phase` row, in the solver's units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub frequency: f64,
    pub amplitude: f64,
    pub phase: f64,
}

/// Rows of a single result file, before any unit conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeries {
    pub source: PathBuf,
    /// Header line as found in the file (never written back).
    pub header: String,
    pub samples: Vec<RawSample>,
}

// ---------------------------------------------------------------------------
// Sample / SensorSeries – normalized data consumed by the charts
// ---------------------------------------------------------------------------

/// A unit-normalized row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Hz.
    pub frequency: f64,
    /// Amplitude in the quantity's base display unit (m/s, mm, m/s2).
    pub amplitude: f64,
    /// Alternate unit form, only present for acceleration (g).
    pub amplitude_alt: Option<f64>,
    /// Degrees.
    pub phase: f64,
}

/// Normalized frequency response of one sensor on one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorSeries {
    pub quantity: Quantity,
    pub axis: Axis,
    /// 1-based DIMM number.
    pub sensor: usize,
    pub source: PathBuf,
    pub samples: Vec<Sample>,
}

impl SensorSeries {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The amplitude charts use: g for acceleration, the base amplitude otherwise.
    pub fn plotted_amplitude(&self, sample: &Sample) -> f64 {
        match self.quantity {
            Quantity::Acceleration => sample.amplitude_alt.unwrap_or(sample.amplitude),
            Quantity::Velocity | Quantity::Deformation => sample.amplitude,
        }
    }

    /// `(frequency, plotted amplitude)` pairs in file order.
    pub fn points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.samples
            .iter()
            .map(move |s| [s.frequency, self.plotted_amplitude(s)])
    }

    /// Sample with the largest plotted amplitude (first one on ties).
    pub fn peak(&self) -> Option<&Sample> {
        self.samples.iter().fold(None, |best: Option<&Sample>, s| match best {
            Some(b) if self.plotted_amplitude(b) >= self.plotted_amplitude(s) => Some(b),
            _ => Some(s),
        })
    }

    /// Sample whose frequency is nearest to `frequency`.
    pub fn closest_to(&self, frequency: f64) -> Option<&Sample> {
        self.samples.iter().min_by(|a, b| {
            (a.frequency - frequency)
                .abs()
                .total_cmp(&(b.frequency - frequency).abs())
        })
    }

    pub fn frequency_range(&self) -> Option<(f64, f64)> {
        let first = self.samples.first()?;
        Some(self.samples.iter().fold(
            (first.frequency, first.frequency),
            |(lo, hi), s| (lo.min(s.frequency), hi.max(s.frequency)),
        ))
    }

    /// Whether frequencies never decrease.
    pub fn is_monotonic(&self) -> bool {
        self.samples
            .windows(2)
            .all(|pair| pair[0].frequency <= pair[1].frequency)
    }
}

// ---------------------------------------------------------------------------
// SensorSet – the eight DIMMs of one (quantity, axis)
// ---------------------------------------------------------------------------

/// Peak of one sensor, as shown on the bar chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorPeak {
    pub sensor: usize,
    pub frequency: f64,
    pub amplitude: f64,
}

/// Exactly [`SENSOR_COUNT`] series, ordered by DIMM number.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorSet {
    pub quantity: Quantity,
    pub axis: Axis,
    series: [SensorSeries; SENSOR_COUNT],
}

impl SensorSet {
    pub fn new(quantity: Quantity, axis: Axis, series: [SensorSeries; SENSOR_COUNT]) -> Self {
        SensorSet {
            quantity,
            axis,
            series,
        }
    }

    /// Series for a 1-based sensor number.
    pub fn get(&self, sensor: usize) -> Option<&SensorSeries> {
        sensor.checked_sub(1).and_then(|i| self.series.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SensorSeries> {
        self.series.iter()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn peaks(&self) -> Vec<SensorPeak> {
        self.series
            .iter()
            .filter_map(|s| {
                s.peak().map(|p| SensorPeak {
                    sensor: s.sensor,
                    frequency: p.frequency,
                    amplitude: s.plotted_amplitude(p),
                })
            })
            .collect()
    }

    /// Cross-sensor overlays are only meaningful when every series has the same length.
    pub fn has_uniform_length(&self) -> bool {
        let first = self.series[0].len();
        self.series.iter().all(|s| s.len() == first)
    }
}

/// All three axes of one quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantityDataset {
    pub quantity: Quantity,
    pub folder: PathBuf,
    pub x: SensorSet,
    pub y: SensorSet,
    pub z: SensorSet,
}

impl QuantityDataset {
    pub fn axis(&self, axis: Axis) -> &SensorSet {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

// ---------------------------------------------------------------------------
// Description tables – precomputed statistics from the summary reports
// ---------------------------------------------------------------------------

/// Statistic rows of a description block, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    Mean,
    Std,
    Min,
    Q25,
    Q50,
    Q75,
    Max,
}

impl Statistic {
    pub const ALL: [Statistic; 7] = [
        Statistic::Mean,
        Statistic::Std,
        Statistic::Min,
        Statistic::Q25,
        Statistic::Q50,
        Statistic::Q75,
        Statistic::Max,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Std => "std",
            Statistic::Min => "min",
            Statistic::Q25 => "25%",
            Statistic::Q50 => "50%",
            Statistic::Q75 => "75%",
            Statistic::Max => "max",
        }
    }
}

/// Columns a description report can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportColumn {
    Frequency,
    Amplitude,
    AmplitudeG,
    PhaseAngle,
}

impl ReportColumn {
    pub const fn label(self) -> &'static str {
        match self {
            ReportColumn::Frequency => "Frequency",
            ReportColumn::Amplitude => "Amplitude",
            ReportColumn::AmplitudeG => "Amplitude_g",
            ReportColumn::PhaseAngle => "Phase_Angle",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Frequency" => Some(ReportColumn::Frequency),
            "Amplitude" => Some(ReportColumn::Amplitude),
            "Amplitude_g" => Some(ReportColumn::AmplitudeG),
            "Phase_Angle" => Some(ReportColumn::PhaseAngle),
            _ => None,
        }
    }
}

/// Statistics of one sensor as loaded from a description report.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptionTable {
    pub sensor: usize,
    pub quantity: Quantity,
    /// Canonical column order for the quantity.
    pub columns: Vec<ReportColumn>,
    /// Unit found in the report header for each column, if any.
    pub units: Vec<Option<String>>,
    /// One row per [`Statistic::ALL`] entry, one value per column.
    pub rows: Vec<Vec<f64>>,
}

impl DescriptionTable {
    pub fn value(&self, statistic: Statistic, column: ReportColumn) -> Option<f64> {
        let row = Statistic::ALL.iter().position(|s| *s == statistic)?;
        let col = self.columns.iter().position(|c| *c == column)?;
        self.rows.get(row)?.get(col).copied()
    }
}
