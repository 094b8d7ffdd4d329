use std::fs;
use std::path::Path;

use freq_response_viewer::data::assembler::{load_axis, load_quantity, quantity_dir};
use freq_response_viewer::data::cache::DatasetCache;
use freq_response_viewer::data::describe::render_report;
use freq_response_viewer::data::format::format_table;
use freq_response_viewer::data::model::{Axis, Quantity, ReportColumn, Statistic};
use freq_response_viewer::data::modes::{load_modal_frequencies, modes_path};
use freq_response_viewer::data::summary::{read_report, report_path};
use tempfile::TempDir;

fn write_axis(folder: &Path, quantity: Quantity, axis: Axis, body: &str) {
    let dir = quantity_dir(folder, quantity);
    fs::create_dir_all(&dir).expect("data dir");
    for n in 1..=8 {
        fs::write(dir.join(format!("DIMM{n}{axis}.txt")), body).expect("fixture");
    }
}

#[test]
fn acceleration_z_set_is_converted_to_g() {
    let temp = TempDir::new().expect("tempdir should be created");
    let sim = temp.path().join("simX");
    write_axis(&sim, Quantity::Acceleration, Axis::Z, "Frequency Amplitude Phase\n1.0 2.0 3.0\n");

    let set = load_axis(&sim, Quantity::Acceleration, Axis::Z).expect("set loads");
    assert_eq!(set.len(), 8);
    for (i, series) in set.iter().enumerate() {
        assert_eq!(series.sensor, i + 1);
        assert_eq!(series.samples.len(), 1);
        let s = series.samples[0];
        assert_eq!((s.frequency, s.amplitude, s.phase), (1.0, 2.0, 3.0));
        let g = s.amplitude_alt.expect("acceleration carries g");
        assert!((g - 0.2039).abs() < 1e-4, "{g}");
    }
}

#[test]
fn folder_round_trip_through_reports_and_modes() {
    let temp = TempDir::new().expect("tempdir should be created");
    let sim = temp.path();
    let body: String = std::iter::once("\tFrequency [Hz]\tAmplitude [m]\tPhase Angle [deg]\n".to_string())
        .chain((0..20).map(|i| format!("{}\t{}\t{}\n", 10.0 + i as f64, 1e-3 * (1 + i % 5) as f64, -2.0 * i as f64)))
        .collect();
    for axis in Axis::ALL {
        write_axis(sim, Quantity::Deformation, axis, &body);
    }
    fs::write(modes_path(sim), "Mode\tFrequency [Hz]\n1\t12.0\n2\t25.5\n").expect("modes");

    let mut cache = DatasetCache::new();
    let dataset = cache.get_or_load(sim, Quantity::Deformation).expect("dataset loads");
    assert_eq!(dataset.y.get(3).map(|s| s.samples[0].amplitude), Some(1.0));

    for axis in Axis::ALL {
        let path = report_path(sim, Quantity::Deformation, axis);
        fs::write(&path, render_report(Quantity::Deformation, axis, dataset.axis(axis))).expect("report");
        let tables = read_report(&path, Quantity::Deformation).expect("report parses");
        assert_eq!(tables.len(), 8);

        let table = &tables[0];
        assert_eq!(table.value(Statistic::Min, ReportColumn::Frequency), Some(10.0));
        assert_eq!(table.value(Statistic::Max, ReportColumn::Amplitude), Some(5.0));
        let formatted = format_table(table);
        assert_eq!(formatted.rows[6].1[0], "29.00");
    }

    assert_eq!(load_modal_frequencies(&modes_path(sim)).expect("modes load"), vec![12.0, 25.5]);
    assert!(load_quantity(sim, Quantity::Velocity).is_err());
}
