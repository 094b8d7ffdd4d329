use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use freq_response_viewer::config::ModalMarker;
use freq_response_viewer::data::export::{description_csv_path, export_manifest, write_description_csv};
use freq_response_viewer::data::model::{Axis, Quantity, SENSOR_COUNT};

use crate::color::axis_color;
use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Left side panel – selection and plot options
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Simulation");
    ui.separator();

    match &state.folder {
        Some(folder) => {
            ui.label(RichText::new(folder.display().to_string()).monospace());
        }
        None => {
            ui.label("No folder open.");
        }
    }
    if ui.button("Open folder…").clicked() {
        open_folder_dialog(state);
    }
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let enabled = !state.exporting();
            ui.add_enabled_ui(enabled, |ui: &mut Ui| {
                selectors(ui, state);
                ui.separator();
                plot_options(ui, state);
                ui.separator();
                export_section(ui, state);
            });
        });
}

fn selectors(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Quantity");
    ui.horizontal(|ui: &mut Ui| {
        for quantity in Quantity::ALL {
            if ui.selectable_label(state.quantity == quantity, quantity.label()).clicked() {
                state.set_quantity(quantity);
            }
        }
    });

    ui.strong("Axis");
    ui.horizontal(|ui: &mut Ui| {
        for axis in Axis::ALL {
            let text = RichText::new(axis.label()).color(axis_color(axis));
            if ui.selectable_label(state.axis == axis, text).clicked() {
                state.set_axis(axis);
            }
        }
    });

    ui.strong("Sensor");
    egui::ComboBox::from_id_salt("sensor")
        .selected_text(format!("DIMM{}", state.sensor))
        .show_ui(ui, |ui: &mut Ui| {
            for sensor in 1..=SENSOR_COUNT {
                ui.selectable_value(&mut state.sensor, sensor, format!("DIMM{sensor}"));
            }
        });

    ui.strong("View");
    for view in View::ALL {
        ui.radio_value(&mut state.view, view, view.label());
    }
}

fn plot_options(ui: &mut Ui, state: &mut AppState) {
    let options = &mut state.config.plot;
    egui::CollapsingHeader::new(RichText::new("Plot options").strong())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.checkbox(&mut options.fill, "Fill under curves");
            ui.checkbox(&mut options.markers, "Sample markers");
            ui.add(egui::Slider::new(&mut options.marker_size, 0.5..=8.0).text("Marker size"));
            ui.checkbox(&mut options.locate_peaks, "Locate peaks");

            ui.label("Modal frequencies as");
            ui.horizontal(|ui: &mut Ui| {
                ui.radio_value(&mut options.locate_modal_freq_with, ModalMarker::Lines, "Lines");
                ui.radio_value(&mut options.locate_modal_freq_with, ModalMarker::Markers, "Markers");
            });

            if options.modal_freq.is_empty() {
                ui.label(RichText::new("No modal frequencies loaded").weak());
            } else {
                let list: Vec<String> = options.modal_freq.iter().map(|f| format!("{f} Hz")).collect();
                ui.label(format!("{} modes: {}", list.len(), list.join(", ")));
            }
        });
}

fn export_section(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Export");
    match &state.config.export_dir {
        Some(dir) => {
            ui.label(RichText::new(dir.display().to_string()).monospace());
        }
        None => {
            ui.label(RichText::new("No export directory").weak());
        }
    }
    if ui.button("Choose export directory…").clicked() {
        pick_export_dir(state);
    }

    let ready = state.dataset.is_some() && state.config.export_dir.is_some();
    ui.add_enabled_ui(ready, |ui: &mut Ui| {
        let current = state.view.export_target(state.quantity, state.axis);
        if ui
            .add_enabled(current.is_some(), egui::Button::new("Export current chart"))
            .clicked()
        {
            state.queue_exports(current);
        }
        if ui.button("Export all charts").clicked() {
            state.queue_exports(export_manifest());
        }
        if ui.button("Export description table (CSV)").clicked() {
            export_descriptions(state);
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if let Some(last) = state.config.last_folder.clone() {
                if state.folder.as_ref() != Some(&last) && ui.button("Reopen last folder").clicked() {
                    state.open_folder(last);
                    ui.close_menu();
                }
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let samples = ds.axis(state.axis).get(1).map_or(0, |s| s.len());
            ui.label(format!(
                "{} – {} samples per series, {} modal frequencies",
                ds.quantity.label(),
                samples,
                state.config.plot.modal_freq.len()
            ));
        }

        if state.exporting() {
            ui.separator();
            ui.spinner();
            ui.label(format!("Exporting… {} left", state.export_queue.len() + 1));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Dialogs and exports
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let mut dialog = rfd::FileDialog::new().set_title("Open simulation folder");
    if let Some(last) = &state.config.last_folder {
        dialog = dialog.set_directory(last);
    }
    if let Some(folder) = dialog.pick_folder() {
        state.open_folder(folder);
    }
}

fn pick_export_dir(state: &mut AppState) {
    let mut dialog = rfd::FileDialog::new().set_title("Choose export directory");
    if let Some(dir) = state.config.export_dir.as_ref().or(state.folder.as_ref()) {
        dialog = dialog.set_directory(dir);
    }
    if let Some(dir) = dialog.pick_folder() {
        log::info!("Export directory set to {}", dir.display());
        state.config.export_dir = Some(dir);
        if let Err(e) = state.config.save() {
            log::warn!("Could not save settings: {e:#}");
        }
    }
}

fn export_descriptions(state: &mut AppState) {
    let Some(dir) = state.config.export_dir.clone() else {
        return;
    };
    let result = match &state.descriptions {
        Some(Ok(tables)) => {
            let path = dir.join(description_csv_path(state.quantity, state.axis));
            write_description_csv(&path, tables).map(|()| path)
        }
        Some(Err(message)) => Err(anyhow::anyhow!("Description report unavailable: {message}")),
        None => Err(anyhow::anyhow!("No description report loaded")),
    };
    match result {
        Ok(path) => state.status_message = Some(format!("Wrote {}", path.display())),
        Err(e) => {
            log::error!("Table export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
