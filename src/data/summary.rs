//! Parser for the fixed-layout description reports.
//!
//! A report looks like this (one block per DIMM, `count` row dropped):
//! ```text
//! Acceleration (X) Description          ┐
//! ----------------------------          │ preamble (6 lines)
//! <blank>                               │
//! <blank>                               │
//! DIMM1                                 │
//! -----                                 ┘
//!        Frequency  Amplitude_g  ...    ┐ header          ┐
//! count  ...                            │ skipped row     │
//! mean   ...                            │                 │ stride
//! ...                                   │ 7 statistic rows│ (14 lines)
//! max    ...                            ┘ (block width 9) │
//! <3 blanks>, DIMM2, -----                                ┘
//! ```

use std::path::{Path, PathBuf};

use super::error::{DataError, DataResult};
use super::model::{Axis, DescriptionTable, Quantity, ReportColumn, Statistic, SENSOR_COUNT};

// ---------------------------------------------------------------------------
// Layout and schema
// ---------------------------------------------------------------------------

/// Where the blocks sit in a report, in lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    pub preamble_lines: usize,
    pub block_count: usize,
    /// Distance between the first lines of consecutive blocks.
    pub stride: usize,
    /// Lines of a block that carry the table (header + rows).
    pub block_width: usize,
    /// Block-relative rows to drop before reading statistics.
    pub skipped_rows: &'static [usize],
}

/// Layout written by the simulation post-processing scripts.
pub const DESCRIPTION_LAYOUT: BlockLayout = BlockLayout {
    preamble_lines: 6,
    block_count: 8,
    stride: 14,
    block_width: 9,
    skipped_rows: &[1],
};

impl BlockLayout {
    /// Shortest input that still contains every block.
    pub const fn min_lines(&self) -> usize {
        self.preamble_lines + (self.block_count - 1) * self.stride + self.block_width
    }

    /// Slice each block out of `lines`. Callers check [`Self::min_lines`] first.
    pub fn blocks<'a, T>(&self, lines: &'a [T]) -> impl Iterator<Item = &'a [T]> + 'a {
        let layout = *self;
        (0..layout.block_count).filter_map(move |k| {
            let start = layout.preamble_lines + k * layout.stride;
            lines.get(start..start + layout.block_width)
        })
    }

    /// Block lines with the skipped rows removed.
    fn table_rows<'a>(&self, block: &[&'a str]) -> Vec<&'a str> {
        block
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.skipped_rows.contains(i))
            .map(|(_, line)| *line)
            .collect()
    }
}

/// Columns a report for a given quantity must contain, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSchema {
    pub quantity: Quantity,
    pub columns: &'static [ReportColumn],
}

impl ReportSchema {
    pub const fn for_quantity(quantity: Quantity) -> Self {
        let columns: &'static [ReportColumn] = match quantity {
            Quantity::Acceleration => &[
                ReportColumn::Frequency,
                ReportColumn::Amplitude,
                ReportColumn::AmplitudeG,
                ReportColumn::PhaseAngle,
            ],
            Quantity::Velocity | Quantity::Deformation => &[
                ReportColumn::Frequency,
                ReportColumn::Amplitude,
                ReportColumn::PhaseAngle,
            ],
        };
        ReportSchema { quantity, columns }
    }
}

/// `<folder>/data/<quantity>_<axis>_description.txt`
pub fn report_path(folder: &Path, quantity: Quantity, axis: Axis) -> PathBuf {
    folder
        .join("data")
        .join(format!("{}_{}_description.txt", quantity.dir_name(), axis.as_str()))
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderCell {
    name: String,
    unit: Option<String>,
}

/// Split a block header into column names.
///
/// `[..]` groups become the unit of the preceding column and a bare `Angle`
/// joins the preceding word (`Phase Angle` → `Phase_Angle`).
fn parse_header(line: &str) -> Vec<HeaderCell> {
    let mut cells: Vec<HeaderCell> = Vec::new();
    let mut open_unit: Option<String> = None;

    for token in line.split_whitespace() {
        if let Some(mut unit) = open_unit.take() {
            unit.push(' ');
            unit.push_str(token);
            close_unit(unit, &mut cells, &mut open_unit);
        } else if token.starts_with('[') {
            close_unit(token.to_string(), &mut cells, &mut open_unit);
        } else if token == "Angle" && cells.last().is_some_and(|c| c.unit.is_none()) {
            if let Some(last) = cells.last_mut() {
                last.name.push_str("_Angle");
            }
        } else {
            cells.push(HeaderCell {
                name: token.to_string(),
                unit: None,
            });
        }
    }
    cells
}

fn close_unit(unit: String, cells: &mut [HeaderCell], open_unit: &mut Option<String>) {
    match unit.strip_suffix(']') {
        Some(done) => {
            if let Some(last) = cells.last_mut() {
                last.unit = Some(done.trim_start_matches('[').trim().to_string());
            }
        }
        None => *open_unit = Some(unit),
    }
}

/// Map header cells onto the schema. Returns, for each canonical column, its
/// position in the report and its unit.
fn resolve_columns(
    cells: &[HeaderCell],
    schema: &ReportSchema,
    path: &Path,
    block: usize,
) -> DataResult<Vec<(usize, Option<String>)>> {
    let mut found: Vec<ReportColumn> = Vec::with_capacity(cells.len());
    for cell in cells {
        let column = ReportColumn::from_label(&cell.name)
            .filter(|c| schema.columns.contains(c))
            .ok_or_else(|| {
                DataError::malformed(
                    path,
                    Some(block),
                    format!("unexpected column '{}' in {} report", cell.name, schema.quantity),
                )
            })?;
        if found.contains(&column) {
            return Err(DataError::malformed(
                path,
                Some(block),
                format!("column '{}' appears twice", column.label()),
            ));
        }
        found.push(column);
    }

    schema
        .columns
        .iter()
        .map(|wanted| {
            found
                .iter()
                .position(|c| c == wanted)
                .map(|pos| (pos, cells[pos].unit.clone()))
                .ok_or_else(|| {
                    DataError::malformed(
                        path,
                        Some(block),
                        format!("header is missing '{}'", wanted.label()),
                    )
                })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

fn parse_block(
    lines: &[&str],
    layout: &BlockLayout,
    schema: &ReportSchema,
    path: &Path,
    block: usize,
) -> DataResult<DescriptionTable> {
    let rows = layout.table_rows(lines);
    let Some((header, stat_lines)) = rows.split_first() else {
        return Err(DataError::malformed(path, Some(block), "empty block"));
    };
    if stat_lines.len() != Statistic::ALL.len() {
        return Err(DataError::malformed(
            path,
            Some(block),
            format!("expected {} statistic rows, found {}", Statistic::ALL.len(), stat_lines.len()),
        ));
    }

    let cells = parse_header(header);
    let placement = resolve_columns(&cells, schema, path, block)?;

    let mut values: Vec<Vec<f64>> = Vec::with_capacity(Statistic::ALL.len());
    for (statistic, line) in Statistic::ALL.iter().zip(stat_lines) {
        let mut tokens = line.split_whitespace();
        let label = tokens.next().unwrap_or("");
        if label != statistic.label() {
            return Err(DataError::malformed(
                path,
                Some(block),
                format!("expected '{}' row, found '{label}'", statistic.label()),
            ));
        }

        let raw: Vec<f64> = tokens
            .map(|t| {
                t.parse::<f64>().map_err(|_| {
                    DataError::malformed(
                        path,
                        Some(block),
                        format!("'{t}' in '{label}' row is not a number"),
                    )
                })
            })
            .collect::<DataResult<_>>()?;
        if raw.len() != cells.len() {
            return Err(DataError::malformed(
                path,
                Some(block),
                format!("'{label}' row has {} values for {} columns", raw.len(), cells.len()),
            ));
        }

        values.push(placement.iter().map(|(pos, _)| raw[*pos]).collect());
    }

    Ok(DescriptionTable {
        sensor: block + 1,
        quantity: schema.quantity,
        columns: schema.columns.to_vec(),
        units: placement.into_iter().map(|(_, unit)| unit).collect(),
        rows: values,
    })
}

/// Parse a whole report into one table per DIMM.
pub fn parse_report(
    text: &str,
    quantity: Quantity,
    path: &Path,
) -> DataResult<[DescriptionTable; SENSOR_COUNT]> {
    let tables = parse_report_with(text, &DESCRIPTION_LAYOUT, &ReportSchema::for_quantity(quantity), path)?;
    tables.try_into().map_err(|v: Vec<DescriptionTable>| {
        DataError::malformed(path, None, format!("expected {SENSOR_COUNT} blocks, found {}", v.len()))
    })
}

/// Parse a report with an explicit layout and schema.
fn parse_report_with(
    text: &str,
    layout: &BlockLayout,
    schema: &ReportSchema,
    path: &Path,
) -> DataResult<Vec<DescriptionTable>> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    if lines.len() < layout.min_lines() {
        return Err(DataError::malformed(
            path,
            None,
            format!(
                "expected at least {} lines for {} blocks, found {}",
                layout.min_lines(),
                layout.block_count,
                lines.len()
            ),
        ));
    }

    layout
        .blocks(&lines)
        .enumerate()
        .map(|(k, block)| parse_block(block, layout, schema, path, k))
        .collect()
}

/// Read and parse `<folder>/data/<quantity>_<axis>_description.txt`.
pub fn read_report(path: &Path, quantity: Quantity) -> DataResult<[DescriptionTable; SENSOR_COUNT]> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
    let tables = parse_report(&text, quantity, path)?;
    log::info!("Parsed {} description blocks from {}", tables.len(), path.display());
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCEL_HEADER: &str = "Frequency  Amplitude_g  Amplitude  Phase Angle";
    const VEL_HEADER: &str = "Frequency  Amplitude  Phase Angle";

    /// Build a report the way the post-processing script prints it.
    fn report(title: &str, header: &str, columns: usize) -> String {
        let mut out = format!("{title}\n{}\n\n\n", "-".repeat(title.len()));
        for dimm in 1..=8 {
            out.push_str(&format!("DIMM{dimm}\n-----\n"));
            out.push_str(&format!("       {header}\n"));
            out.push_str(&format!("count  {}\n", vec!["101.0"; columns].join("  ")));
            for (r, label) in ["mean", "std", "min", "25%", "50%", "75%", "max"].iter().enumerate() {
                let values: Vec<String> = (0..columns)
                    .map(|c| format!("{}", (dimm * 100 + r * 10 + c) as f64 * if c == columns - 1 { -1.0 } else { 1.0 }))
                    .collect();
                out.push_str(&format!("{label:<6} {}\n", values.join("  ")));
            }
            if dimm != 8 {
                out.push_str("\n\n\n");
            }
        }
        out
    }

    fn path() -> PathBuf {
        PathBuf::from("sim1/data/acceleration_x_description.txt")
    }

    #[test]
    fn layout_constants_match_report_shape() {
        assert_eq!(DESCRIPTION_LAYOUT.min_lines(), 6 + 8 * 14 - 5);
        let text = report("Acceleration (X) Description", ACCEL_HEADER, 4);
        assert_eq!(text.lines().count(), DESCRIPTION_LAYOUT.min_lines());
    }

    #[test]
    fn acceleration_report_yields_eight_four_column_tables() {
        let text = report("Acceleration (X) Description", ACCEL_HEADER, 4);
        let tables = parse_report(&text, Quantity::Acceleration, &path()).expect("well formed");
        assert_eq!(tables.len(), 8);
        for (i, table) in tables.iter().enumerate() {
            assert_eq!(table.sensor, i + 1);
            assert_eq!(table.rows.len(), 7);
            assert!(table.rows.iter().all(|r| r.len() == 4));
            assert_eq!(
                table.columns,
                vec![
                    ReportColumn::Frequency,
                    ReportColumn::Amplitude,
                    ReportColumn::AmplitudeG,
                    ReportColumn::PhaseAngle
                ]
            );
        }
    }

    #[test]
    fn acceleration_amplitude_columns_are_reordered_by_name() {
        let text = report("Acceleration (X) Description", ACCEL_HEADER, 4);
        let tables = parse_report(&text, Quantity::Acceleration, &path()).expect("well formed");
        let dimm2 = &tables[1];
        // Raw order is Frequency(+0), Amplitude_g(+1), Amplitude(+2), Phase(+3).
        assert_eq!(dimm2.value(Statistic::Mean, ReportColumn::Frequency), Some(200.0));
        assert_eq!(dimm2.value(Statistic::Mean, ReportColumn::AmplitudeG), Some(201.0));
        assert_eq!(dimm2.value(Statistic::Mean, ReportColumn::Amplitude), Some(202.0));
        assert_eq!(dimm2.value(Statistic::Max, ReportColumn::PhaseAngle), Some(-263.0));
    }

    #[test]
    fn velocity_report_yields_three_columns() {
        let text = report("Velocity (Y) Description", VEL_HEADER, 3);
        let tables = parse_report(&text, Quantity::Velocity, &path()).expect("well formed");
        assert_eq!(tables.len(), 8);
        assert!(tables.iter().all(|t| t.columns.len() == 3 && t.rows.len() == 7));
        assert_eq!(tables[7].value(Statistic::Q75, ReportColumn::Amplitude), Some(851.0));
    }

    #[test]
    fn units_in_header_are_kept() {
        let header = "Frequency [Hz]  Amplitude [m / s]  Phase Angle [deg]";
        let text = report("Velocity (Y) Description", header, 3);
        let tables = parse_report(&text, Quantity::Velocity, &path()).expect("well formed");
        assert_eq!(
            tables[0].units,
            vec![Some("Hz".to_string()), Some("m / s".to_string()), Some("deg".to_string())]
        );
    }

    #[test]
    fn short_report_is_malformed() {
        let text = report("Velocity (Y) Description", VEL_HEADER, 3);
        let truncated: String = text.lines().take(100).map(|l| format!("{l}\n")).collect();
        let err = parse_report(&truncated, Quantity::Velocity, &path()).unwrap_err();
        assert!(matches!(err, DataError::MalformedReport { block: None, .. }), "{err}");
        assert!(err.to_string().contains("at least 113 lines"), "{err}");
    }

    #[test]
    fn wrong_schema_is_malformed() {
        // A velocity report handed to the acceleration parser lacks Amplitude_g.
        let text = report("Velocity (X) Description", VEL_HEADER, 3);
        let err = parse_report(&text, Quantity::Acceleration, &path()).unwrap_err();
        assert!(err.to_string().contains("missing 'Amplitude_g'"), "{err}");

        // And the reverse carries a column velocity reports never have.
        let text = report("Acceleration (X) Description", ACCEL_HEADER, 4);
        let err = parse_report(&text, Quantity::Velocity, &path()).unwrap_err();
        assert!(err.to_string().contains("unexpected column 'Amplitude_g'"), "{err}");
    }

    #[test]
    fn broken_row_names_block() {
        let text = report("Velocity (X) Description", VEL_HEADER, 3);
        let broken = text.replacen("75%    ", "p75    ", 3);
        let err = parse_report(&broken, Quantity::Velocity, &path()).unwrap_err();
        assert!(matches!(err, DataError::MalformedReport { block: Some(0), .. }), "{err}");

        let text = report("Velocity (X) Description", VEL_HEADER, 3);
        let broken = text.replacen("mean   ", "mean   oops ", 1);
        let err = parse_report(&broken, Quantity::Velocity, &path()).unwrap_err();
        assert!(err.to_string().contains("'oops'"), "{err}");
    }

    #[test]
    fn header_tokens_merge_angle_and_units() {
        let cells = parse_header("Frequency [Hz] Amplitude_g Amplitude [m/s2] Phase Angle [deg]");
        let names: Vec<&str> = cells.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Frequency", "Amplitude_g", "Amplitude", "Phase_Angle"]);
        assert_eq!(cells[2].unit.as_deref(), Some("m/s2"));
        assert_eq!(cells[3].unit.as_deref(), Some("deg"));
    }

    #[test]
    fn report_path_follows_naming() {
        let p = report_path(Path::new("sim5"), Quantity::Deformation, Axis::Z);
        assert_eq!(p, PathBuf::from("sim5/data/deformation_z_description.txt"));
    }
}
