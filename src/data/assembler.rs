use std::path::{Path, PathBuf};

use super::error::{DataError, DataResult};
use super::model::{Axis, Quantity, QuantityDataset, SensorSeries, SensorSet, SENSOR_COUNT};
use super::reader::{read_series, RecordHeader};
use super::units::normalize;

// ---------------------------------------------------------------------------
// File discovery
// ---------------------------------------------------------------------------

/// `<folder>/data/<quantity>/`
pub fn quantity_dir(folder: &Path, quantity: Quantity) -> PathBuf {
    folder.join("data").join(quantity.dir_name())
}

/// Result files of one quantity, grouped by axis and ordered by sensor number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisFiles {
    pub x: Vec<PathBuf>,
    pub y: Vec<PathBuf>,
    pub z: Vec<PathBuf>,
}

impl AxisFiles {
    pub fn axis(&self, axis: Axis) -> &[PathBuf] {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut Vec<PathBuf> {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }
}

/// Axis encoded by the file name: `DIMM3x.txt` → X. Anything else is ignored.
pub fn axis_of_file_name(name: &str) -> Option<Axis> {
    Axis::ALL
        .into_iter()
        .find(|axis| name.ends_with(&format!("{}.txt", axis.as_str())))
}

/// Last run of ASCII digits in the file stem: `DIMM3x.txt` → 3.
pub fn sensor_number(path: &Path) -> Option<u32> {
    let stem = path.file_stem()?.to_str()?;
    let end = stem.rfind(|c: char| c.is_ascii_digit())? + 1;
    let start = stem[..end]
        .rfind(|c: char| !c.is_ascii_digit())
        .map_or(0, |i| i + 1);
    stem[start..end].parse().ok()
}

/// List `<folder>/data/<quantity>/` and bucket the result files per axis.
pub fn discover_axis_files(folder: &Path, quantity: Quantity) -> DataResult<AxisFiles> {
    let dir = quantity_dir(folder, quantity);
    if !dir.is_dir() {
        return Err(DataError::DirectoryNotFound { path: dir });
    }

    let mut files = AxisFiles::default();
    for entry in std::fs::read_dir(&dir).map_err(|e| DataError::io(&dir, e))? {
        let entry = entry.map_err(|e| DataError::io(&dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        match axis_of_file_name(&name) {
            Some(axis) => files.axis_mut(axis).push(path),
            None => log::trace!("skipping {} (no axis suffix)", path.display()),
        }
    }

    for axis in Axis::ALL {
        // Numbered names first, by number; then plain lexical order.
        files.axis_mut(axis).sort_by_key(|p| {
            let number = sensor_number(p);
            (number.is_none(), number, p.file_name().map(|n| n.to_os_string()))
        });
    }
    log::debug!(
        "{}: {} x / {} y / {} z files",
        dir.display(),
        files.x.len(),
        files.y.len(),
        files.z.len()
    );
    Ok(files)
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Check that an axis group really is DIMM1..DIMM8.
fn validate_sensor_files(dir: &Path, quantity: Quantity, axis: Axis, paths: &[PathBuf]) -> DataResult<()> {
    if paths.len() != SENSOR_COUNT {
        return Err(DataError::SensorCountMismatch {
            dir: dir.to_path_buf(),
            quantity,
            axis,
            expected: SENSOR_COUNT,
            found: paths.len(),
        });
    }

    let numbers: Vec<u32> = paths.iter().filter_map(|p| sensor_number(p)).collect();
    // Fully un-numbered groups fall back to name order. Once any file carries a
    // number, every file must, and together they must be exactly 1..=8.
    if numbers.is_empty() {
        return Ok(());
    }
    let expected: Vec<u32> = (1..=SENSOR_COUNT as u32).collect();
    if numbers.len() != paths.len() || numbers != expected {
        return Err(DataError::SensorNumbering {
            dir: dir.to_path_buf(),
            axis,
            numbers,
        });
    }
    Ok(())
}

/// Amplitude unit declared in a result header when it is not `quantity`'s raw unit.
///
/// Headers without units, or without an amplitude column, are accepted silently.
fn unexpected_amplitude_unit(header: &str, quantity: Quantity) -> Option<String> {
    let unit = RecordHeader::parse(header).unit_of("Amplitude")?.to_string();
    let spelled = unit.replace('^', "").replace('\u{b2}', "2");
    (spelled != quantity.raw_unit()).then_some(unit)
}

fn assemble_set(dir: &Path, quantity: Quantity, axis: Axis, paths: &[PathBuf]) -> DataResult<SensorSet> {
    validate_sensor_files(dir, quantity, axis, paths)?;

    let mut series: Vec<SensorSeries> = Vec::with_capacity(SENSOR_COUNT);
    for (idx, path) in paths.iter().enumerate() {
        let raw = read_series(path)?;
        if let Some(unit) = unexpected_amplitude_unit(&raw.header, quantity) {
            log::warn!(
                "{}: amplitude unit is [{unit}], expected [{}] for {quantity}; converting anyway",
                path.display(),
                quantity.raw_unit()
            );
        }
        let normalized = normalize(&raw, quantity, axis, idx + 1);
        if !normalized.is_monotonic() {
            log::warn!("{}: frequencies are not non-decreasing", path.display());
        }
        series.push(normalized);
    }

    let series: [SensorSeries; SENSOR_COUNT] = series.try_into().map_err(|v: Vec<SensorSeries>| {
        DataError::SensorCountMismatch {
            dir: dir.to_path_buf(),
            quantity,
            axis,
            expected: SENSOR_COUNT,
            found: v.len(),
        }
    })?;

    let set = SensorSet::new(quantity, axis, series);
    if !set.has_uniform_length() {
        log::warn!(
            "{}: {} {} series have different lengths; overlays may not line up",
            dir.display(),
            quantity,
            axis
        );
    }
    Ok(set)
}

/// Load the eight sensors of one (quantity, axis).
pub fn load_axis(folder: &Path, quantity: Quantity, axis: Axis) -> DataResult<SensorSet> {
    let files = discover_axis_files(folder, quantity)?;
    assemble_set(&quantity_dir(folder, quantity), quantity, axis, files.axis(axis))
}

/// Load all three axes of one quantity.
pub fn load_quantity(folder: &Path, quantity: Quantity) -> DataResult<QuantityDataset> {
    let files = discover_axis_files(folder, quantity)?;
    let dir = quantity_dir(folder, quantity);

    let dataset = QuantityDataset {
        quantity,
        folder: folder.to_path_buf(),
        x: assemble_set(&dir, quantity, Axis::X, &files.x)?,
        y: assemble_set(&dir, quantity, Axis::Y, &files.y)?,
        z: assemble_set(&dir, quantity, Axis::Z, &files.z)?,
    };
    let first = dataset.x.get(1);
    let (lo, hi) = first.and_then(SensorSeries::frequency_range).unwrap_or((f64::NAN, f64::NAN));
    log::info!(
        "Loaded {} data from {} ({} samples per x series, {lo}..{hi} Hz)",
        quantity,
        folder.display(),
        first.map_or(0, SensorSeries::len)
    );
    Ok(dataset)
}
