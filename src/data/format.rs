//! Display strings for description tables.
//!
//! Parsers keep everything as `f64`; rounding and truncation happen only here,
//! right before a table is drawn or exported.

use super::model::{DescriptionTable, Quantity, ReportColumn, Statistic};

/// Round to `places` decimals from the exact binary value, so `0.0055` (stored
/// just below the tie) rounds down. Scaling by `10^places` first would land on
/// `5.5` and round up.
fn round_dp(value: f64, places: usize) -> f64 {
    format!("{value:.places$}").parse().unwrap_or(value)
}

/// `nan`, `inf` and `-inf` as the summary reports spell them.
fn non_finite(value: f64) -> Option<String> {
    if value.is_nan() {
        Some("nan".to_string())
    } else if value.is_infinite() {
        Some(if value < 0.0 { "-inf" } else { "inf" }.to_string())
    } else {
        None
    }
}

fn truncate(mut text: String, width: usize) -> String {
    if let Some((idx, _)) = text.char_indices().nth(width) {
        text.truncate(idx);
    }
    text
}

/// Format one value for display.
///
/// | column | rendering | width |
/// |---|---|---|
/// | Frequency | 4 decimals | 5 |
/// | Amplitude (acceleration) / Amplitude_g | 4 decimals | 6 |
/// | Amplitude (velocity, deformation) | 6 decimals | 8 |
/// | Phase_Angle | rounded to 3, shown with 4 | 6 if negative, else 5 |
pub fn format_cell(quantity: Quantity, column: ReportColumn, value: f64) -> String {
    if let Some(text) = non_finite(value) {
        return text;
    }
    match column {
        ReportColumn::Frequency => truncate(format!("{value:.4}"), 5),
        ReportColumn::Amplitude => match quantity {
            Quantity::Acceleration => truncate(format!("{:.4}", round_dp(value, 4)), 6),
            Quantity::Velocity | Quantity::Deformation => {
                truncate(format!("{:.6}", round_dp(value, 6)), 8)
            }
        },
        ReportColumn::AmplitudeG => truncate(format!("{:.4}", round_dp(value, 4)), 6),
        ReportColumn::PhaseAngle => {
            let rounded = round_dp(value, 3);
            let width = if rounded < 0.0 { 6 } else { 5 };
            truncate(format!("{rounded:.4}"), width)
        }
    }
}

/// Column header with its unit, e.g. `Frequency [Hz]`.
pub fn column_title(column: ReportColumn, unit: Option<&str>) -> String {
    match unit {
        Some(unit) => format!("{} [{unit}]", column.label()),
        None => column.label().to_string(),
    }
}

/// A description table rendered to strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedTable {
    pub sensor: usize,
    pub headers: Vec<String>,
    /// `(statistic label, cells)` in [`Statistic::ALL`] order.
    pub rows: Vec<(String, Vec<String>)>,
}

pub fn format_table(table: &DescriptionTable) -> FormattedTable {
    let headers = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| column_title(*column, table.units.get(i).and_then(|u| u.as_deref())))
        .collect();

    let rows = Statistic::ALL
        .iter()
        .zip(&table.rows)
        .map(|(statistic, values)| {
            let cells = table
                .columns
                .iter()
                .zip(values)
                .map(|(column, value)| format_cell(table.quantity, *column, *value))
                .collect();
            (statistic.label().to_string(), cells)
        })
        .collect();

    FormattedTable {
        sensor: table.sensor,
        headers,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_keeps_five_characters() {
        assert_eq!(format_cell(Quantity::Velocity, ReportColumn::Frequency, 12.34567), "12.34");
        assert_eq!(format_cell(Quantity::Velocity, ReportColumn::Frequency, 5.0), "5.000");
        assert_eq!(format_cell(Quantity::Velocity, ReportColumn::Frequency, 1234.5), "1234.");
    }

    #[test]
    fn amplitude_precision_depends_on_quantity() {
        assert_eq!(format_cell(Quantity::Acceleration, ReportColumn::Amplitude, 1.234567), "1.2346");
        assert_eq!(format_cell(Quantity::Acceleration, ReportColumn::AmplitudeG, 0.20387), "0.2039");
        assert_eq!(format_cell(Quantity::Velocity, ReportColumn::Amplitude, 0.0001234567), "0.000123");
        assert_eq!(format_cell(Quantity::Deformation, ReportColumn::Amplitude, 2.5), "2.500000");
    }

    #[test]
    fn phase_width_follows_sign_of_rounded_value() {
        assert_eq!(format_cell(Quantity::Velocity, ReportColumn::PhaseAngle, -12.3456), "-12.34");
        assert_eq!(format_cell(Quantity::Velocity, ReportColumn::PhaseAngle, 12.3456), "12.34");
        assert_eq!(format_cell(Quantity::Velocity, ReportColumn::PhaseAngle, -1.5), "-1.500");
        // Rounds to -0.0, which is not below zero.
        assert_eq!(format_cell(Quantity::Velocity, ReportColumn::PhaseAngle, -0.0001), "-0.00");
    }

    #[test]
    fn rounding_uses_the_stored_value_not_the_scaled_one() {
        assert_eq!(format_cell(Quantity::Velocity, ReportColumn::PhaseAngle, -0.0055), "-0.005");
        assert_eq!(format_cell(Quantity::Acceleration, ReportColumn::AmplitudeG, 0.00035), "0.0003");
        assert_eq!(format_cell(Quantity::Velocity, ReportColumn::Amplitude, 3.5e-6), "0.000003");
    }

    #[test]
    fn undefined_statistics_print_as_nan() {
        // std of a single-sample series.
        for column in [ReportColumn::Frequency, ReportColumn::Amplitude, ReportColumn::PhaseAngle] {
            assert_eq!(format_cell(Quantity::Deformation, column, f64::NAN), "nan");
        }
        assert_eq!(format_cell(Quantity::Acceleration, ReportColumn::AmplitudeG, f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn table_has_headers_and_seven_labeled_rows() {
        let table = DescriptionTable {
            sensor: 3,
            quantity: Quantity::Acceleration,
            columns: vec![
                ReportColumn::Frequency,
                ReportColumn::Amplitude,
                ReportColumn::AmplitudeG,
                ReportColumn::PhaseAngle,
            ],
            units: vec![Some("Hz".into()), None, None, Some("deg".into())],
            rows: vec![vec![100.0, 9.81, 1.0, -90.0]; 7],
        };
        let formatted = format_table(&table);
        assert_eq!(formatted.sensor, 3);
        assert_eq!(
            formatted.headers,
            vec!["Frequency [Hz]", "Amplitude", "Amplitude_g", "Phase_Angle [deg]"]
        );
        assert_eq!(formatted.rows.len(), 7);
        assert_eq!(formatted.rows[0].0, "mean");
        assert_eq!(formatted.rows[6].0, "max");
        assert_eq!(formatted.rows[2].1, vec!["100.0", "9.8100", "1.0000", "-90.00"]);
    }
}
