use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use super::error::{DataError, DataResult};

/// Name of the column holding modal frequencies.
pub const FREQUENCY_COLUMN: &str = "Frequency";

/// `<folder>/modes.txt`
pub fn modes_path(folder: &Path) -> PathBuf {
    folder.join("modes.txt")
}

fn is_frequency_header(name: &str) -> bool {
    name == FREQUENCY_COLUMN
        || name
            .strip_prefix(FREQUENCY_COLUMN)
            .is_some_and(|rest| rest.trim_start().starts_with('['))
}

/// Read the `Frequency` column of a tab-separated modes file, in file order.
pub fn load_modal_frequencies(path: &Path) -> DataResult<Vec<f64>> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    let modes = parse_modal_frequencies(&text, path)?;
    log::info!("Loaded {} modal frequencies from {}", modes.len(), path.display());
    Ok(modes)
}

pub fn parse_modal_frequencies(text: &str, path: &Path) -> DataResult<Vec<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(|e| DataError::Format {
        path: path.to_path_buf(),
        line: 1,
        reason: e.to_string(),
    })?;
    let column = headers
        .iter()
        .position(is_frequency_header)
        .ok_or_else(|| DataError::MissingColumn {
            path: path.to_path_buf(),
            column: FREQUENCY_COLUMN.to_string(),
        })?;

    let mut frequencies = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        // Header is line 1.
        let fallback_line = idx + 2;
        let record = record.map_err(|e| DataError::Format {
            path: path.to_path_buf(),
            line: fallback_line,
            reason: e.to_string(),
        })?;
        let line = record
            .position()
            .map_or(fallback_line, |p| p.line() as usize);

        let cell = match record.get(column) {
            Some(cell) if !cell.is_empty() => cell,
            _ if record.iter().all(str::is_empty) => continue,
            _ => {
                return Err(DataError::Format {
                    path: path.to_path_buf(),
                    line,
                    reason: format!("no value in column '{FREQUENCY_COLUMN}'"),
                })
            }
        };
        let value = cell.parse::<f64>().map_err(|_| DataError::Format {
            path: path.to_path_buf(),
            line,
            reason: format!("'{cell}' is not a frequency"),
        })?;
        frequencies.push(value);
    }
    Ok(frequencies)
}

/// Parse the listing variant found in uploaded archives.
///
/// `#` lines are comments, the first remaining line is a header and every
/// later line is `<mode index> <frequency>`.
pub fn parse_mode_listing(text: &str, path: &Path) -> DataResult<Vec<f64>> {
    let mut frequencies = Vec::new();
    let entries = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.starts_with('#'))
        .skip(1);

    for (idx, line) in entries {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value = line
            .split_once(|c: char| c.is_whitespace())
            .map(|(_, rest)| rest.trim())
            .ok_or_else(|| DataError::Format {
                path: path.to_path_buf(),
                line: idx + 1,
                reason: "expected '<mode index> <frequency>'".to_string(),
            })?;
        let frequency = value.parse::<f64>().map_err(|_| DataError::Format {
            path: path.to_path_buf(),
            line: idx + 1,
            reason: format!("'{value}' is not a frequency"),
        })?;
        frequencies.push(frequency);
    }
    Ok(frequencies)
}

/// Render a modes file both readers understand.
pub fn write_modes(frequencies: &[f64]) -> String {
    let mut out = format!("Mode\t{FREQUENCY_COLUMN} [Hz]\n");
    for (i, f) in frequencies.iter().enumerate() {
        let _ = writeln!(out, "{}\t{f}", i + 1);
    }
    out
}
