use std::sync::Arc;

use eframe::egui;

use freq_response_viewer::config::ViewerConfig;
use freq_response_viewer::data::export::write_png;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FreqResponseApp {
    pub state: AppState,
    /// Screen area of the central panel in the last frame, in points.
    chart_rect: egui::Rect,
}

impl FreqResponseApp {
    pub fn new(config: ViewerConfig) -> Self {
        let reopen = config.last_folder.clone().filter(|f| f.is_dir());
        let mut state = AppState::new(config);
        if let Some(folder) = reopen {
            state.open_folder(folder);
        }
        Self {
            state,
            chart_rect: egui::Rect::NOTHING,
        }
    }

    /// Drive the export queue: show the next chart, let it settle, then screenshot it.
    fn step_export(&mut self, ctx: &egui::Context) {
        self.state.advance_export();
        let Some(job) = self.state.export_job.as_mut() else {
            return;
        };
        if job.settle_frames > 0 {
            job.settle_frames -= 1;
        } else if !job.requested {
            job.requested = true;
            ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
        }
        ctx.request_repaint();
    }

    fn receive_screenshot(&mut self, ctx: &egui::Context) {
        let Some(image) = ctx.input(|i| {
            i.events.iter().rev().find_map(|e| match e {
                egui::Event::Screenshot { image, .. } => Some(Arc::clone(image)),
                _ => None,
            })
        }) else {
            return;
        };
        let Some(job) = self.state.export_job.take() else {
            return;
        };

        let region = image.region(&self.chart_rect, Some(ctx.pixels_per_point()));
        let [width, height] = region.size;
        let rgba: Vec<u8> = region.pixels.iter().flat_map(|p| p.to_array()).collect();

        let Some(dir) = self.state.config.export_dir.clone() else {
            self.state.export_queue.clear();
            return;
        };
        let path = dir.join(job.chart.entry_path());
        match write_png(&path, width as u32, height as u32, rgba) {
            Ok(()) => {
                self.state.status_message = Some(format!("Wrote {}", path.display()));
            }
            Err(e) => {
                log::error!("Chart export failed: {e:#}");
                self.state.status_message = Some(format!("Error: {e:#}"));
                self.state.export_queue.clear();
            }
        }
    }
}

impl eframe::App for FreqResponseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.receive_screenshot(ctx);
        if self.state.exporting() || self.state.view_before_export.is_some() {
            self.step_export(ctx);
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: selection ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart ----
        let central = egui::CentralPanel::default().show(ctx, |ui| {
            plot::central_view(ui, &self.state);
        });
        self.chart_rect = central.response.rect;
    }
}
