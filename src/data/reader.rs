use std::fmt::Write as _;
use std::path::Path;

use super::error::{DataError, DataResult};
use super::model::{Quantity, RawSample, RawSeries};

/// Fields on every data row: frequency, amplitude, phase angle.
const FIELDS_PER_ROW: usize = 3;

// ---------------------------------------------------------------------------
// Header interpretation (in memory only)
// ---------------------------------------------------------------------------

/// One header label, e.g. `Amplitude [m/s2]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderColumn {
    pub name: String,
    pub unit: Option<String>,
}

/// Column labels found on the first line of a result file.
///
/// Solver headers vary between exports (with or without units, tab or space
/// separated), so the header is only interpreted, never trusted for layout:
/// data rows are always read as frequency, amplitude, phase.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordHeader {
    pub columns: Vec<HeaderColumn>,
}

impl RecordHeader {
    /// Tab-separated headers give one label per field; anything else is split
    /// on whitespace with bracketed units attached to the preceding word.
    pub fn parse(line: &str) -> Self {
        let fields: Vec<&str> = line
            .split('\t')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect();

        let columns = if fields.len() >= FIELDS_PER_ROW {
            fields.into_iter().map(split_unit).collect()
        } else {
            let mut columns: Vec<HeaderColumn> = Vec::new();
            for token in line.split_whitespace() {
                match (token.strip_prefix('[').and_then(|t| t.strip_suffix(']')), columns.last_mut()) {
                    (Some(unit), Some(last)) => last.unit = Some(unit.to_string()),
                    _ => columns.push(HeaderColumn {
                        name: token.to_string(),
                        unit: None,
                    }),
                }
            }
            columns
        };

        RecordHeader { columns }
    }

    /// Unit attached to the first column whose name starts with `prefix`.
    pub fn unit_of(&self, prefix: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.name.starts_with(prefix))
            .and_then(|c| c.unit.as_deref())
    }
}

fn split_unit(field: &str) -> HeaderColumn {
    match field.find('[') {
        Some(open) if field.ends_with(']') => HeaderColumn {
            name: field[..open].trim().to_string(),
            unit: Some(field[open + 1..field.len() - 1].trim().to_string()),
        },
        _ => HeaderColumn {
            name: field.to_string(),
            unit: None,
        },
    }
}

/// The normalized header for a quantity's raw result files.
pub fn canonical_header(quantity: Quantity) -> String {
    format!(
        "\tFrequency [Hz]\tAmplitude [{}]\tPhase Angle [deg]",
        quantity.raw_unit()
    )
}

// ---------------------------------------------------------------------------
// Record reading
// ---------------------------------------------------------------------------

/// Read one raw result file. The file is only ever opened for reading.
pub fn read_series(path: &Path) -> DataResult<RawSeries> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    parse_series(&text, path)
}

/// Parse result text: one header line, then `frequency amplitude phase` rows.
///
/// Blank lines are skipped. Any other row must hold exactly three numbers.
pub fn parse_series(text: &str, source: &Path) -> DataResult<RawSeries> {
    let mut lines = text.lines();
    let header = lines.next().unwrap_or("").to_string();

    let mut samples = Vec::new();
    for (idx, line) in lines.enumerate() {
        // +2: 1-based, and the header is line 1.
        let line_no = idx + 2;
        if line.trim().is_empty() {
            continue;
        }
        samples.push(parse_row(line, line_no, source)?);
    }

    if samples.is_empty() {
        return Err(DataError::EmptyData {
            path: source.to_path_buf(),
        });
    }

    Ok(RawSeries {
        source: source.to_path_buf(),
        header,
        samples,
    })
}

fn parse_row(line: &str, line_no: usize, source: &Path) -> DataResult<RawSample> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != FIELDS_PER_ROW {
        return Err(DataError::Format {
            path: source.to_path_buf(),
            line: line_no,
            reason: format!(
                "expected {FIELDS_PER_ROW} numeric fields, found {}",
                tokens.len()
            ),
        });
    }

    let mut values = [0.0_f64; FIELDS_PER_ROW];
    for (slot, token) in values.iter_mut().zip(&tokens) {
        *slot = token.parse::<f64>().map_err(|_| DataError::Format {
            path: source.to_path_buf(),
            line: line_no,
            reason: format!("'{token}' is not a number"),
        })?;
    }

    Ok(RawSample {
        frequency: values[0],
        amplitude: values[1],
        phase: values[2],
    })
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

/// Render a series with the canonical header, one tab-separated row per sample.
///
/// Values use the shortest representation that parses back to the same
/// `f64`, so writing a parsed file again reproduces its data rows.
pub fn write_series(series: &RawSeries, quantity: Quantity) -> String {
    let mut out = canonical_header(quantity);
    out.push('\n');
    for s in &series.samples {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{}\t{}\t{}", s.frequency, s.amplitude, s.phase);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn src() -> PathBuf {
        PathBuf::from("sim1/data/velocity/DIMM1x.txt")
    }

    #[test]
    fn reads_rows_after_header() {
        let text = "Frequency Amplitude Phase Angle\n1.0 2.0 3.0\n\n2.5\t-1e-3\t-179.5\n";
        let series = parse_series(text, &src()).expect("valid file");
        assert_eq!(series.header, "Frequency Amplitude Phase Angle");
        assert_eq!(
            series.samples,
            vec![
                RawSample { frequency: 1.0, amplitude: 2.0, phase: 3.0 },
                RawSample { frequency: 2.5, amplitude: -1e-3, phase: -179.5 },
            ]
        );
    }

    #[test]
    fn wrong_field_count_is_a_format_error() {
        let err = parse_series("h\n1.0 2.0 3.0\n1.0 2.0\n", &src()).unwrap_err();
        match err {
            DataError::Format { line, reason, .. } => {
                assert_eq!(line, 3);
                assert!(reason.contains("found 2"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_numeric_token_is_a_format_error() {
        let err = parse_series("h\n1.0 abc 3.0\n", &src()).unwrap_err();
        assert!(matches!(err, DataError::Format { line: 2, .. }), "{err}");
    }

    #[test]
    fn header_only_is_empty_data() {
        let err = parse_series("\tFrequency [Hz]\tAmplitude [m/s]\tPhase Angle [deg]\n\n", &src())
            .unwrap_err();
        assert!(matches!(err, DataError::EmptyData { .. }), "{err}");
        assert!(matches!(parse_series("", &src()), Err(DataError::EmptyData { .. })));
    }

    #[test]
    fn header_units_are_interpreted() {
        let header = RecordHeader::parse(&canonical_header(Quantity::Acceleration));
        assert_eq!(header.columns.len(), 3);
        assert_eq!(header.unit_of("Frequency"), Some("Hz"));
        assert_eq!(header.unit_of("Amplitude"), Some("m/s2"));
        assert_eq!(header.columns[2].name, "Phase Angle");

        let header = RecordHeader::parse("Freq [Hz] Amplitude [m] Phase Angle");
        assert_eq!(header.unit_of("Freq"), Some("Hz"));
        assert_eq!(header.unit_of("Amplitude"), Some("m"));
        assert_eq!(header.unit_of("Phase"), None);
    }

    #[test]
    fn rewritten_output_is_stable() {
        let text = "whatever header\n1.0 2.0 3.0\n10.25 0.000123 -45.5\n";
        let parsed = parse_series(text, &src()).expect("valid file");
        let first = write_series(&parsed, Quantity::Velocity);
        let reparsed = parse_series(&first, &src()).expect("own output parses");
        let second = write_series(&reparsed, Quantity::Velocity);
        assert_eq!(first, second);
        assert!(first.starts_with("\tFrequency [Hz]\tAmplitude [m/s]\tPhase Angle [deg]\n"));
        assert_eq!(reparsed.samples, parsed.samples);
    }

    #[test]
    fn reading_never_modifies_the_file() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("DIMM1x.txt");
        let original = "Frequency Amplitude Phase Angle\n1.0 2.0 3.0\n";
        std::fs::write(&path, original).expect("fixture written");

        read_series(&path).expect("readable");
        read_series(&path).expect("readable twice");

        assert_eq!(std::fs::read_to_string(&path).expect("still there"), original);
    }

    #[test]
    fn missing_file_is_io_error_with_path() {
        let err = read_series(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
        assert!(err.to_string().starts_with("/definitely/not/here.txt"));
    }
}
