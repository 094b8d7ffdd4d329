//! Descriptive statistics and the description report writer.
//!
//! [`render_report`] produces exactly the layout [`super::summary`] reads.

use std::fmt::Write as _;

use super::model::{Axis, Quantity, ReportColumn, Sample, SensorSeries, SensorSet, Statistic};

/// Summary statistics of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnStats {
    pub fn get(&self, statistic: Statistic) -> f64 {
        match statistic {
            Statistic::Mean => self.mean,
            Statistic::Std => self.std,
            Statistic::Min => self.min,
            Statistic::Q25 => self.q25,
            Statistic::Q50 => self.q50,
            Statistic::Q75 => self.q75,
            Statistic::Max => self.max,
        }
    }
}

/// Linear interpolation between closest ranks of a sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Count, mean, std, min, quartiles and max of `values`. NaN where undefined.
pub fn describe(values: &[f64]) -> ColumnStats {
    let count = values.len();
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mean = if count == 0 {
        f64::NAN
    } else {
        values.iter().sum::<f64>() / count as f64
    };
    let std = if count < 2 {
        f64::NAN
    } else {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    };

    ColumnStats {
        count,
        mean,
        std,
        min: sorted.first().copied().unwrap_or(f64::NAN),
        q25: quantile(&sorted, 0.25),
        q50: quantile(&sorted, 0.50),
        q75: quantile(&sorted, 0.75),
        max: sorted.last().copied().unwrap_or(f64::NAN),
    }
}

fn column_value(column: ReportColumn, sample: &Sample) -> f64 {
    match column {
        ReportColumn::Frequency => sample.frequency,
        ReportColumn::Amplitude => sample.amplitude,
        ReportColumn::AmplitudeG => sample.amplitude_alt.unwrap_or(f64::NAN),
        ReportColumn::PhaseAngle => sample.phase,
    }
}

fn column_stats(series: &SensorSeries, column: ReportColumn) -> ColumnStats {
    let values: Vec<f64> = series.samples.iter().map(|s| column_value(column, s)).collect();
    describe(&values)
}

/// Columns in the order the report prints them.
fn written_columns(quantity: Quantity) -> &'static [ReportColumn] {
    match quantity {
        Quantity::Acceleration => &[
            ReportColumn::Frequency,
            ReportColumn::AmplitudeG,
            ReportColumn::Amplitude,
            ReportColumn::PhaseAngle,
        ],
        Quantity::Velocity | Quantity::Deformation => &[
            ReportColumn::Frequency,
            ReportColumn::Amplitude,
            ReportColumn::PhaseAngle,
        ],
    }
}

fn written_header(column: ReportColumn) -> &'static str {
    match column {
        ReportColumn::PhaseAngle => "Phase Angle",
        other => other.label(),
    }
}

fn format_stat(value: f64) -> String {
    let magnitude = value.abs();
    if value != 0.0 && value.is_finite() && !(1.0..1e6).contains(&magnitude) {
        format!("{value:.6e}")
    } else {
        format!("{value:.6}")
    }
}

const LABEL_WIDTH: usize = 6;
const BLOCK_GAP: usize = 3;

/// Render the description report for one (quantity, axis).
pub fn render_report(quantity: Quantity, axis: Axis, set: &SensorSet) -> String {
    let title = format!("{} ({}) Description", quantity.label(), axis.label());
    let mut out = String::new();
    let _ = writeln!(out, "{title}\n{}\n\n", "-".repeat(title.len()));

    let columns = written_columns(quantity);
    for (i, series) in set.iter().enumerate() {
        if i > 0 {
            out.push_str(&"\n".repeat(BLOCK_GAP));
        }
        let stats: Vec<ColumnStats> = columns.iter().map(|c| column_stats(series, *c)).collect();

        let mut cells: Vec<Vec<String>> = Vec::with_capacity(Statistic::ALL.len() + 1);
        cells.push(stats.iter().map(|s| format!("{:.6}", s.count as f64)).collect());
        for statistic in Statistic::ALL {
            cells.push(stats.iter().map(|s| format_stat(s.get(statistic))).collect());
        }

        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(c, column)| {
                cells
                    .iter()
                    .map(|row| row[c].len())
                    .chain(std::iter::once(written_header(*column).len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let _ = writeln!(out, "DIMM{}\n-----", series.sensor);
        let mut header = " ".repeat(LABEL_WIDTH);
        for (column, &width) in columns.iter().zip(&widths) {
            let _ = write!(header, "  {:>width$}", written_header(*column));
        }
        let _ = writeln!(out, "{}", header.trim_end());

        let labels = std::iter::once("count").chain(Statistic::ALL.iter().map(|s| s.label()));
        for (label, row) in labels.zip(&cells) {
            let _ = write!(out, "{label:<width$}", width = LABEL_WIDTH);
            for (cell, &width) in row.iter().zip(&widths) {
                let _ = write!(out, "  {cell:>width$}");
            }
            out.push('\n');
        }
    }
    out
}
