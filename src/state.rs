use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use freq_response_viewer::config::ViewerConfig;
use freq_response_viewer::data::cache::DatasetCache;
use freq_response_viewer::data::error::DataError;
use freq_response_viewer::data::export::{ChartExport, Scale};
use freq_response_viewer::data::model::{Axis, DescriptionTable, Quantity, QuantityDataset, SENSOR_COUNT};
use freq_response_viewer::data::modes::{load_modal_frequencies, modes_path};
use freq_response_viewer::data::summary::{read_report, report_path};

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// What the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Selected sensor on the selected axis.
    Sensor,
    /// Selected sensor with X, Y and Z overlaid.
    SensorXyz,
    /// All eight sensors of the selected axis.
    Grid(Scale),
    /// All eight sensors with X, Y and Z overlaid.
    XyzGrid(Scale),
    /// Peak amplitude per sensor.
    PeakBar,
    /// Description tables of the selected axis.
    Descriptions,
}

impl View {
    pub const ALL: [View; 8] = [
        View::Sensor,
        View::SensorXyz,
        View::Grid(Scale::Linear),
        View::Grid(Scale::Log),
        View::XyzGrid(Scale::Linear),
        View::XyzGrid(Scale::Log),
        View::PeakBar,
        View::Descriptions,
    ];

    pub fn label(self) -> &'static str {
        match self {
            View::Sensor => "Single sensor",
            View::SensorXyz => "Sensor XYZ",
            View::Grid(Scale::Linear) => "All sensors",
            View::Grid(Scale::Log) => "All sensors (log)",
            View::XyzGrid(Scale::Linear) => "All sensors XYZ",
            View::XyzGrid(Scale::Log) => "All sensors XYZ (log)",
            View::PeakBar => "Peak amplitudes",
            View::Descriptions => "Description tables",
        }
    }

    /// The export entry matching this view, if it has one.
    pub fn export_target(self, quantity: Quantity, axis: Axis) -> Option<ChartExport> {
        match self {
            View::Grid(scale) => Some(ChartExport::Grid { quantity, axis, scale }),
            View::XyzGrid(scale) => Some(ChartExport::XyzGrid { quantity, scale }),
            View::PeakBar => Some(ChartExport::PeakBar { quantity, axis }),
            View::Sensor | View::SensorXyz | View::Descriptions => None,
        }
    }
}

/// A chart waiting to be captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportJob {
    pub chart: ChartExport,
    /// Frames to draw before the screenshot is taken.
    pub settle_frames: u8,
    pub requested: bool,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ViewerConfig,

    /// Open simulation folder.
    pub folder: Option<PathBuf>,
    pub cache: DatasetCache,

    /// Dataset of the selected quantity (None until a folder loads).
    pub dataset: Option<Arc<QuantityDataset>>,

    pub quantity: Quantity,
    pub axis: Axis,
    /// 1-based DIMM number.
    pub sensor: usize,
    pub view: View,

    /// Reports of the selected (quantity, axis); the error text if parsing failed.
    pub descriptions: Option<Result<[DescriptionTable; SENSOR_COUNT], String>>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Charts still to be exported, and the one being captured.
    pub export_queue: VecDeque<ChartExport>,
    pub export_job: Option<ExportJob>,
    /// View to restore once the queue is drained.
    pub view_before_export: Option<(Quantity, Axis, View)>,
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            folder: None,
            cache: DatasetCache::new(),
            dataset: None,
            quantity: Quantity::Velocity,
            axis: Axis::X,
            sensor: 1,
            view: View::Sensor,
            descriptions: None,
            status_message: None,
            export_queue: VecDeque::new(),
            export_job: None,
            view_before_export: None,
        }
    }

    fn report_error(&mut self, context: &str, e: &DataError) {
        log::error!("{context}: {e}");
        self.status_message = Some(format!("{context}: {e}"));
    }

    /// Open a simulation folder: reset cached data, read modes and the current view's data.
    pub fn open_folder(&mut self, folder: PathBuf) {
        log::info!("Opening simulation folder {}", folder.display());
        self.cache.clear();
        self.status_message = None;
        self.config.plot.modal_freq = self.load_modes(&folder);
        self.config.last_folder = Some(folder.clone());
        self.folder = Some(folder);
        self.reload();

        if let Err(e) = self.config.save() {
            log::warn!("Could not save settings: {e:#}");
        }
    }

    fn load_modes(&mut self, folder: &Path) -> Vec<f64> {
        let path = modes_path(folder);
        if !path.is_file() {
            log::warn!("{} not found; no modal frequencies to mark", path.display());
            return Vec::new();
        }
        match load_modal_frequencies(&path) {
            Ok(modes) => modes,
            Err(e) => {
                self.report_error("Failed to load modal frequencies", &e);
                Vec::new()
            }
        }
    }

    /// Load the selected quantity (cached) and the selected axis' reports.
    pub fn reload(&mut self) {
        let Some(folder) = self.folder.clone() else {
            return;
        };

        match self.cache.get_or_load(&folder, self.quantity) {
            Ok(dataset) => self.dataset = Some(dataset),
            Err(e) => {
                self.dataset = None;
                self.report_error(&format!("Failed to load {} data", self.quantity), &e);
            }
        }
        self.reload_descriptions(&folder);
    }

    fn reload_descriptions(&mut self, folder: &Path) {
        let path = report_path(folder, self.quantity, self.axis);
        self.descriptions = Some(read_report(&path, self.quantity).map_err(|e| {
            log::error!("Failed to read description report: {e}");
            e.to_string()
        }));
    }

    pub fn set_quantity(&mut self, quantity: Quantity) {
        if self.quantity != quantity {
            self.quantity = quantity;
            self.reload();
        }
    }

    pub fn set_axis(&mut self, axis: Axis) {
        if self.axis != axis {
            self.axis = axis;
            if let Some(folder) = self.folder.clone() {
                self.reload_descriptions(&folder);
            }
        }
    }

    /// Switch quantity, axis and view to what `chart` shows.
    pub fn show_chart(&mut self, chart: ChartExport) {
        let (quantity, axis, view) = match chart {
            ChartExport::PeakBar { quantity, axis } => (quantity, axis, View::PeakBar),
            ChartExport::Grid { quantity, axis, scale } => (quantity, axis, View::Grid(scale)),
            ChartExport::XyzGrid { quantity, scale } => (quantity, self.axis, View::XyzGrid(scale)),
        };
        self.set_quantity(quantity);
        self.set_axis(axis);
        self.view = view;
    }

    pub fn queue_exports(&mut self, charts: impl IntoIterator<Item = ChartExport>) {
        if self.export_queue.is_empty() && self.export_job.is_none() {
            self.view_before_export = Some((self.quantity, self.axis, self.view));
        }
        self.export_queue.extend(charts);
    }

    /// Start the next queued export, or restore the view when done.
    pub fn advance_export(&mut self) {
        if self.export_job.is_some() {
            return;
        }
        match self.export_queue.pop_front() {
            Some(chart) => {
                self.show_chart(chart);
                if self.dataset.is_none() {
                    // Nothing to capture; keep the load error visible.
                    let remaining = self.export_queue.len();
                    self.export_queue.clear();
                    log::error!("Export of {} aborted ({remaining} more skipped)", chart.entry_path().display());
                    let reason = self.status_message.take().unwrap_or_else(|| "no data loaded".to_string());
                    self.status_message = Some(format!("Export aborted: {reason}"));
                    return;
                }
                self.export_job = Some(ExportJob {
                    chart,
                    settle_frames: 2,
                    requested: false,
                });
            }
            None => {
                if let Some((quantity, axis, view)) = self.view_before_export.take() {
                    self.set_quantity(quantity);
                    self.set_axis(axis);
                    self.view = view;
                }
            }
        }
    }

    pub fn exporting(&self) -> bool {
        self.export_job.is_some() || !self.export_queue.is_empty()
    }
}
