//! Export naming and writers: chart PNGs and description tables as CSV.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use super::format::{format_table, FormattedTable};
use super::model::{Axis, DescriptionTable, Quantity};

/// Amplitude axis scaling of the 4×2 grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scale {
    Linear,
    Log,
}

impl Scale {
    pub const fn dir_name(self) -> &'static str {
        match self {
            Scale::Linear => "linear",
            Scale::Log => "log",
        }
    }
}

/// A chart that can be written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartExport {
    /// Peak amplitude per sensor.
    PeakBar { quantity: Quantity, axis: Axis },
    /// The eight sensors of one axis, 4×2.
    Grid { quantity: Quantity, axis: Axis, scale: Scale },
    /// The eight sensors with X, Y and Z overlaid, 4×2.
    XyzGrid { quantity: Quantity, scale: Scale },
}

impl ChartExport {
    pub const fn quantity(&self) -> Quantity {
        match *self {
            ChartExport::PeakBar { quantity, .. }
            | ChartExport::Grid { quantity, .. }
            | ChartExport::XyzGrid { quantity, .. } => quantity,
        }
    }

    /// Path relative to the export directory.
    pub fn entry_path(&self) -> PathBuf {
        let q = self.quantity().dir_name();
        let base = PathBuf::from("plots").join(q);
        match *self {
            ChartExport::PeakBar { axis, .. } => base.join("bar").join(format!("{q}_{axis}_peaks.png")),
            ChartExport::Grid { axis, scale, .. } => base
                .join("subplots")
                .join(scale.dir_name())
                .join(format!("{q}_{axis}.png")),
            ChartExport::XyzGrid { scale, .. } => base
                .join("subplots")
                .join(scale.dir_name())
                .join(format!("{q}XYZ.png")),
        }
    }
}

/// Every chart of a full export, in batch order.
pub fn export_manifest() -> Vec<ChartExport> {
    let mut charts = Vec::with_capacity(33);
    for quantity in Quantity::ALL {
        for axis in Axis::ALL {
            charts.push(ChartExport::PeakBar { quantity, axis });
        }
    }
    for scale in [Scale::Linear, Scale::Log] {
        for quantity in Quantity::ALL {
            for axis in Axis::ALL {
                charts.push(ChartExport::Grid { quantity, axis, scale });
            }
        }
        for quantity in Quantity::ALL {
            charts.push(ChartExport::XyzGrid { quantity, scale });
        }
    }
    charts
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

/// Save tightly packed RGBA pixels as PNG.
pub fn write_png(path: &Path, width: u32, height: u32, rgba: Vec<u8>) -> Result<()> {
    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        bail!(
            "Image buffer for {} has {} bytes, expected {expected} for {width}x{height}",
            path.display(),
            rgba.len()
        );
    }
    let image = image::RgbaImage::from_raw(width, height, rgba)
        .with_context(|| format!("Invalid image buffer for {}", path.display()))?;

    ensure_parent(path)?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// `tables/<quantity>_<axis>_description.csv`
pub fn description_csv_path(quantity: Quantity, axis: Axis) -> PathBuf {
    PathBuf::from("tables").join(format!("{}_{}_description.csv", quantity.dir_name(), axis))
}

/// Write formatted description tables as one CSV: `Sensor, Statistic, <columns>`.
pub fn write_description_csv(path: &Path, tables: &[DescriptionTable]) -> Result<()> {
    let formatted: Vec<FormattedTable> = tables.iter().map(format_table).collect();
    let Some(first) = formatted.first() else {
        bail!("No description tables to write to {}", path.display());
    };

    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut header = vec!["Sensor".to_string(), "Statistic".to_string()];
    header.extend(first.headers.iter().cloned());
    writer.write_record(&header)?;

    for table in &formatted {
        if table.headers != first.headers {
            bail!("DIMM{} has different columns than DIMM{}", table.sensor, first.sensor);
        }
        let sensor = format!("DIMM{}", table.sensor);
        for (label, cells) in &table.rows {
            let mut record = vec![sensor.as_str(), label.as_str()];
            record.extend(cells.iter().map(String::as_str));
            writer.write_record(&record)?;
        }
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Wrote {} description tables to {}", formatted.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ReportColumn;
    use tempfile::TempDir;

    #[test]
    fn manifest_lists_every_chart_once_in_batch_order() {
        let manifest = export_manifest();
        assert_eq!(manifest.len(), 33);

        let paths: Vec<String> = manifest
            .iter()
            .map(|c| c.entry_path().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(paths[0], "plots/velocity/bar/velocity_x_peaks.png");
        assert_eq!(paths[8], "plots/acceleration/bar/acceleration_z_peaks.png");
        assert_eq!(paths[9], "plots/velocity/subplots/linear/velocity_x.png");
        assert_eq!(paths[18], "plots/velocity/subplots/linear/velocityXYZ.png");
        assert_eq!(paths[21], "plots/velocity/subplots/log/velocity_x.png");
        assert_eq!(paths[32], "plots/acceleration/subplots/log/accelerationXYZ.png");

        let mut unique = paths.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), paths.len());
    }

    #[test]
    fn png_is_written_under_nested_path() {
        let temp = TempDir::new().expect("tempdir should be created");
        let chart = ChartExport::Grid {
            quantity: Quantity::Deformation,
            axis: Axis::Y,
            scale: Scale::Log,
        };
        let path = temp.path().join(chart.entry_path());
        write_png(&path, 2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255]).expect("png written");

        let decoded = image::open(&path).expect("readable png").to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 1));
        assert_eq!(decoded.get_pixel(1, 0).0, [0, 0, 255, 255]);

        assert!(write_png(&path, 3, 3, vec![0; 4]).is_err());
    }

    #[test]
    fn description_csv_has_one_row_per_statistic_and_sensor() {
        let temp = TempDir::new().expect("tempdir should be created");
        let tables: Vec<DescriptionTable> = (1..=2)
            .map(|sensor| DescriptionTable {
                sensor,
                quantity: Quantity::Velocity,
                columns: vec![ReportColumn::Frequency, ReportColumn::Amplitude, ReportColumn::PhaseAngle],
                units: vec![None, None, None],
                rows: vec![vec![12.34567, 0.0001234567, -12.3456]; 7],
            })
            .collect();
        let path = temp.path().join(description_csv_path(Quantity::Velocity, Axis::X));
        write_description_csv(&path, &tables).expect("csv written");

        let mut reader = csv::Reader::from_path(&path).expect("csv readable");
        let header = reader.headers().expect("header").clone();
        assert_eq!(header.iter().collect::<Vec<_>>(), vec!["Sensor", "Statistic", "Frequency", "Amplitude", "Phase_Angle"]);
        let records: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>().expect("records");
        assert_eq!(records.len(), 14);
        assert_eq!(records[0].iter().collect::<Vec<_>>(), vec!["DIMM1", "mean", "12.34", "0.000123", "-12.34"]);
        assert_eq!(&records[13][0], "DIMM2");
        assert_eq!(&records[13][1], "max");

        assert!(write_description_csv(&path, &[]).is_err());
    }
}
