use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui, Vec2};
use egui_extras::{Column, TableBuilder};
use egui_plot::{
    Bar, BarChart, GridMark, HLine, Legend, Line, LineStyle, MarkerShape, Plot, PlotPoints, PlotUi, Points, VLine,
};

use freq_response_viewer::config::{ModalMarker, PlotOptions};
use freq_response_viewer::data::export::Scale;
use freq_response_viewer::data::format::format_table;
use freq_response_viewer::data::model::{Axis, Quantity, QuantityDataset, SensorSeries, SensorSet, SENSOR_COUNT};

use crate::color::{axis_color, generate_palette, MARKER};
use crate::state::{AppState, View};

const GRID_ROWS: usize = 4;
const GRID_COLUMNS: usize = 2;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render whatever the current view is.
pub fn central_view(ui: &mut Ui, state: &AppState) {
    if state.view == View::Descriptions {
        description_tables(ui, state);
        return;
    }

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a simulation folder to view results  (File → Open folder…)");
            });
            return;
        }
    };

    let options = &state.config.plot;
    let set = dataset.axis(state.axis);
    match state.view {
        View::Sensor => {
            if let Some(series) = set.get(state.sensor) {
                ui.heading(format!("{} {} DIMM{}", dataset.quantity.label(), state.axis.label(), state.sensor));
                amplitude_plot(ui, "sensor_plot", dataset.quantity, Scale::Linear, None, |plot_ui| {
                    draw_series(plot_ui, series, &series_name(series), axis_color(series.axis), options, Scale::Linear);
                    draw_modal_lines(plot_ui, options);
                });
            }
        }
        View::SensorXyz => {
            ui.heading(format!("{} XYZ DIMM{}", dataset.quantity.label(), state.sensor));
            amplitude_plot(ui, "sensor_xyz_plot", dataset.quantity, Scale::Linear, None, |plot_ui| {
                for axis in Axis::ALL {
                    if let Some(series) = dataset.axis(axis).get(state.sensor) {
                        draw_series(plot_ui, series, &series_name(series), axis_color(axis), options, Scale::Linear);
                    }
                }
                draw_modal_lines(plot_ui, options);
            });
        }
        View::Grid(scale) => {
            ui.heading(format!("{} {} – all sensors", dataset.quantity.label(), state.axis.label()));
            sensor_grid(ui, dataset, &[state.axis], scale, options);
        }
        View::XyzGrid(scale) => {
            ui.heading(format!("{} XYZ – all sensors", dataset.quantity.label()));
            sensor_grid(ui, dataset, &Axis::ALL, scale, options);
        }
        View::PeakBar => {
            ui.heading(format!("{} {} – peak amplitudes", dataset.quantity.label(), state.axis.label()));
            peak_bar_chart(ui, set);
        }
        View::Descriptions => {}
    }
}

// ---------------------------------------------------------------------------
// Amplitude charts
// ---------------------------------------------------------------------------

fn series_name(series: &SensorSeries) -> String {
    format!("DIMM{} {}", series.sensor, series.axis)
}

fn amplitude_label(quantity: Quantity, scale: Scale) -> String {
    match scale {
        Scale::Linear => format!("Amplitude [{}]", quantity.display_unit()),
        Scale::Log => format!("log10 Amplitude [{}]", quantity.display_unit()),
    }
}

/// Amplitude in plot space; `None` when it has no logarithm.
fn scaled(amplitude: f64, scale: Scale) -> Option<f64> {
    match scale {
        Scale::Linear => Some(amplitude),
        Scale::Log if amplitude > 0.0 => Some(amplitude.log10()),
        Scale::Log => None,
    }
}

fn scaled_points(series: &SensorSeries, scale: Scale) -> Vec<[f64; 2]> {
    series
        .points()
        .filter_map(|[f, a]| scaled(a, scale).map(|y| [f, y]))
        .collect()
}

fn log_tick(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    format!("{:.0e}", 10f64.powf(mark.value))
}

fn amplitude_plot(
    ui: &mut Ui,
    id: impl std::hash::Hash,
    quantity: Quantity,
    scale: Scale,
    size: Option<Vec2>,
    add: impl FnOnce(&mut PlotUi),
) {
    let mut plot = Plot::new(id)
        .legend(Legend::default())
        .x_axis_label("Frequency [Hz]")
        .y_axis_label(amplitude_label(quantity, scale))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if scale == Scale::Log {
        plot = plot.y_axis_formatter(log_tick);
    }
    if let Some(size) = size {
        plot = plot.width(size.x).height(size.y);
    }
    plot.show(ui, |plot_ui| add(plot_ui));
}

fn draw_series(
    plot_ui: &mut PlotUi,
    series: &SensorSeries,
    name: &str,
    color: Color32,
    options: &PlotOptions,
    scale: Scale,
) {
    let points = scaled_points(series, scale);
    let baseline = match scale {
        Scale::Linear => 0.0,
        Scale::Log => points.iter().map(|p| p[1]).fold(f64::INFINITY, f64::min),
    };

    let mut line = Line::new(PlotPoints::from(points.clone()))
        .name(name)
        .color(color)
        .width(1.5);
    if options.fill && baseline.is_finite() {
        line = line.fill(baseline as f32);
    }
    plot_ui.line(line);

    if options.markers {
        plot_ui.points(
            Points::new(PlotPoints::from(points))
                .name(name)
                .color(color)
                .shape(MarkerShape::Circle)
                .radius(options.marker_size),
        );
    }

    if options.locate_peaks {
        if let Some((peak, y)) = series
            .peak()
            .and_then(|p| scaled(series.plotted_amplitude(p), scale).map(|y| (p, y)))
        {
            plot_ui.hline(HLine::new(y).color(color).style(LineStyle::dashed_loose()).width(1.0));
            plot_ui.points(
                Points::new(vec![[peak.frequency, y]])
                    .name("Peaks")
                    .color(MARKER)
                    .shape(MarkerShape::Up)
                    .radius(options.marker_size + 3.0),
            );
        }
    }

    if options.locate_modal_freq_with == ModalMarker::Markers {
        let marks: Vec<[f64; 2]> = options
            .modal_freq
            .iter()
            .filter_map(|&f| series.closest_to(f))
            .filter_map(|s| scaled(series.plotted_amplitude(s), scale).map(|y| [s.frequency, y]))
            .collect();
        if !marks.is_empty() {
            plot_ui.points(
                Points::new(marks)
                    .name("Modal frequencies")
                    .color(MARKER)
                    .shape(MarkerShape::Diamond)
                    .radius(options.marker_size + 2.0),
            );
        }
    }
}

/// Vertical lines at the modal frequencies, when lines are the chosen marker.
fn draw_modal_lines(plot_ui: &mut PlotUi, options: &PlotOptions) {
    if options.locate_modal_freq_with != ModalMarker::Lines {
        return;
    }
    for &f in &options.modal_freq {
        plot_ui.vline(
            VLine::new(f)
                .name("Modal frequencies")
                .color(MARKER)
                .style(LineStyle::dotted_dense())
                .width(1.0),
        );
    }
}

/// 4×2 grid with one plot per sensor, overlaying `axes`.
fn sensor_grid(ui: &mut Ui, dataset: &QuantityDataset, axes: &[Axis], scale: Scale, options: &PlotOptions) {
    let spacing = ui.spacing().item_spacing;
    let title_height = ui.text_style_height(&egui::TextStyle::Body) + spacing.y;
    let available = ui.available_size();
    let cell = Vec2::new(
        ((available.x - spacing.x * (GRID_COLUMNS - 1) as f32) / GRID_COLUMNS as f32).max(120.0),
        ((available.y - spacing.y * (GRID_ROWS - 1) as f32) / GRID_ROWS as f32 - title_height).max(80.0),
    );

    egui::Grid::new(("sensor_grid", dataset.quantity, axes.len(), scale))
        .num_columns(GRID_COLUMNS)
        .show(ui, |ui: &mut Ui| {
            for row in 0..GRID_ROWS {
                for column in 0..GRID_COLUMNS {
                    let sensor = row * GRID_COLUMNS + column + 1;
                    ui.vertical(|ui: &mut Ui| {
                        ui.label(RichText::new(format!("DIMM{sensor}")).strong());
                        let id = ("grid_plot", dataset.quantity, axes[0], axes.len(), scale, sensor);
                        amplitude_plot(ui, id, dataset.quantity, scale, Some(cell), |plot_ui| {
                            for &axis in axes {
                                if let Some(series) = dataset.axis(axis).get(sensor) {
                                    draw_series(plot_ui, series, &series_name(series), axis_color(axis), options, scale);
                                }
                            }
                            draw_modal_lines(plot_ui, options);
                        });
                    });
                }
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// Peak bar chart
// ---------------------------------------------------------------------------

/// `value` with `digits` significant digits.
fn significant(value: f64, digits: i32) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let exponent = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - exponent).max(0) as usize;
    format!("{value:.decimals$}")
}

fn sensor_tick(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    let v = mark.value;
    if v.fract() == 0.0 && (1.0..=SENSOR_COUNT as f64).contains(&v) {
        format!("DIMM{}", v as usize)
    } else {
        String::new()
    }
}

fn peak_bar_chart(ui: &mut Ui, set: &SensorSet) {
    let palette = generate_palette(SENSOR_COUNT);
    let bars: Vec<Bar> = set
        .peaks()
        .into_iter()
        .map(|p| {
            let color = palette.get(p.sensor - 1).copied().unwrap_or(Color32::GRAY);
            Bar::new(p.sensor as f64, p.amplitude)
                .name(format!("DIMM{} ({} Hz)", p.sensor, significant(p.frequency, 5)))
                .fill(color)
                .width(0.6)
        })
        .collect();

    Plot::new(("peak_bar", set.quantity, set.axis))
        .legend(Legend::default())
        .x_axis_label("Sensor")
        .y_axis_label(amplitude_label(set.quantity, Scale::Linear))
        .x_axis_formatter(sensor_tick)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Peak amplitude"));
        });
}

// ---------------------------------------------------------------------------
// Description tables
// ---------------------------------------------------------------------------

fn description_tables(ui: &mut Ui, state: &AppState) {
    ui.heading(format!("{} {} – description", state.quantity.label(), state.axis.label()));
    let tables = match &state.descriptions {
        None => {
            ui.label("No simulation folder open.");
            return;
        }
        Some(Err(message)) => {
            ui.label(RichText::new(message).color(Color32::RED));
            return;
        }
        Some(Ok(tables)) => tables,
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for table in tables {
                let formatted = format_table(table);
                ui.push_id(("description", formatted.sensor), |ui: &mut Ui| {
                    ui.strong(format!("DIMM{}", formatted.sensor));
                    TableBuilder::new(ui)
                        .striped(true)
                        .vscroll(false)
                        .column(Column::exact(60.0))
                        .columns(Column::auto().at_least(90.0), formatted.headers.len())
                        .header(20.0, |mut header| {
                            header.col(|ui: &mut Ui| {
                                ui.strong("");
                            });
                            for title in &formatted.headers {
                                header.col(|ui: &mut Ui| {
                                    ui.strong(title);
                                });
                            }
                        })
                        .body(|mut body| {
                            for (label, cells) in &formatted.rows {
                                body.row(18.0, |mut row| {
                                    row.col(|ui: &mut Ui| {
                                        ui.label(label);
                                    });
                                    for cell in cells {
                                        row.col(|ui: &mut Ui| {
                                            ui.monospace(cell);
                                        });
                                    }
                                });
                            }
                        });
                });
                ui.add_space(12.0);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn significant_digits_follow_magnitude() {
        assert_eq!(significant(123.456, 5), "123.46");
        assert_eq!(significant(5.0, 5), "5.0000");
        assert_eq!(significant(12345.6, 5), "12346");
        assert_eq!(significant(0.0123456, 5), "0.012346");
    }

    #[test]
    fn log_scale_drops_non_positive_amplitudes() {
        assert_eq!(scaled(100.0, Scale::Log), Some(2.0));
        assert_eq!(scaled(0.0, Scale::Log), None);
        assert_eq!(scaled(-1.0, Scale::Linear), Some(-1.0));
    }
}
