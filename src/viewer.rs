//! Refresh orchestration
//!
//! [`EventViewer`] is what a host talks to. Every refresh hands it the
//! current matrix and viewport; it decides how much of the pipeline has to
//! run again:
//!
//! - same matrix, same viewport: nothing, [`Update::Unchanged`]
//! - same matrix, new viewport: re-layout only; converted devices are kept
//!   but their geometry is invalidated and recomputed against the new scales
//! - anything else: full rebuild from validation onward
//!
//! Invalid input clears the cached view and reports which requirements
//! failed.

use crate::config::Settings;
use crate::format::{tooltip, TimeFormatter, TooltipItem};
use crate::input::DataMatrix;
use crate::measure::{ApproximateTextMeasurer, TextMeasurer};
use crate::palette::{ColorPalette, DefaultPalette};
use crate::pipeline::{
    compute_axis_dimensions, compute_geometry, compute_legend_dimensions,
    compute_plot_dimensions, compute_scales, convert, derive_intervals, invalidate_geometry,
    AxisDimensions, Conversion, ConvertedData, Legend, LegendDimensions, PlotDimensions, Scales,
    ValidationReport, Viewport,
};
use crate::types::{Device, TimeWindow};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Default locale when the host does not provide one
pub const DEFAULT_LOCALE: &str = "en-US";

// ============================================================================
// View
// ============================================================================

/// Viewport-dependent part of a view
#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub viewport: Viewport,
    pub axis: AxisDimensions,
    pub legend: LegendDimensions,
    pub plot: PlotDimensions,
    #[serde(skip)]
    pub scales: Scales,
}

/// Everything a renderer needs to draw the timeline
#[derive(Debug, Clone, Serialize)]
pub struct TimelineView {
    /// Devices in row order, intervals with geometry and keys
    pub devices: Vec<Device>,
    pub legend: Legend,
    /// Padded visible window
    pub window: TimeWindow,
    /// Observed bounds before padding
    pub observed: TimeWindow,
    /// Distinct timestamps, ascending; one axis tick each
    pub time_series: Vec<DateTime<Utc>>,
    pub layout: Layout,
    #[serde(skip)]
    pub formatter: TimeFormatter,
}

impl TimelineView {
    pub fn device(&self, name: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.name == name)
    }

    /// Tooltip rows for one interval
    pub fn tooltip(&self, device: usize, interval: usize) -> Option<Vec<TooltipItem>> {
        let device = self.devices.get(device)?;
        let interval = device.intervals.get(interval)?;
        Some(tooltip(&device.name, interval, &self.formatter))
    }

    pub fn format_time(&self, time: DateTime<Utc>) -> String {
        self.formatter.format(time)
    }
}

/// Legend colour exposed for per-index overrides
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorInstance {
    /// Legend index, used as the override key
    pub selector: String,
    pub display_name: String,
    pub color: String,
}

/// Outcome of [`EventViewer::update`]
#[derive(Debug)]
pub enum Update<'a> {
    /// Same matrix and viewport as the previous call
    Unchanged,
    /// Requirements not met; no view
    Invalid(ValidationReport),
    Rendered(&'a TimelineView),
}

impl Update<'_> {
    pub fn is_rendered(&self) -> bool {
        matches!(self, Update::Rendered(_))
    }
}

// ============================================================================
// Viewer
// ============================================================================

/// Stateful front of the pipeline
pub struct EventViewer {
    settings: Settings,
    locale: String,
    palette: Box<dyn ColorPalette>,
    measurer: Box<dyn TextMeasurer>,
    last_matrix: Option<DataMatrix>,
    last_viewport: Option<Viewport>,
    report: ValidationReport,
    view: Option<TimelineView>,
}

impl EventViewer {
    /// Viewer with the stock palette and the approximate text measurer
    pub fn new(settings: Settings, locale: impl Into<String>) -> Self {
        Self {
            settings,
            locale: locale.into(),
            palette: Box::new(DefaultPalette::new()),
            measurer: Box::new(ApproximateTextMeasurer::default()),
            last_matrix: None,
            last_viewport: None,
            report: ValidationReport::default(),
            view: None,
        }
    }

    pub fn with_palette(mut self, palette: impl ColorPalette + 'static) -> Self {
        self.palette = Box::new(palette);
        self
    }

    pub fn with_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.measurer = Box::new(measurer);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings; the next update rebuilds from scratch
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.last_matrix = None;
    }

    /// Checklist from the most recent update
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn view(&self) -> Option<&TimelineView> {
        self.view.as_ref()
    }

    /// Run as much of the pipeline as the change requires
    pub fn update(&mut self, matrix: &DataMatrix, viewport: Viewport) -> Update<'_> {
        let _span =
            tracing::info_span!("update", width = viewport.width, height = viewport.height)
                .entered();

        let same_data = self.last_matrix.as_ref() == Some(matrix);
        if same_data && self.last_viewport == Some(viewport) {
            tracing::debug!("Input unchanged, skipping refresh");
            return Update::Unchanged;
        }
        self.last_viewport = Some(viewport);

        if same_data {
            match self.view.take() {
                Some(mut view) => {
                    tracing::debug!("Viewport changed, re-laying out");
                    invalidate_geometry(&mut view.devices);
                    view.layout = self.layout(
                        &mut view.devices,
                        &view.legend,
                        &view.time_series,
                        &view.formatter,
                        &view.window,
                        viewport,
                    );
                    return Update::Rendered(self.view.insert(view));
                }
                None => return Update::Invalid(self.report),
            }
        }

        self.last_matrix = Some(matrix.clone());
        match convert(matrix, &self.settings, self.palette.as_mut(), &self.locale) {
            Conversion::Invalid(report) => {
                if let Some((title, message)) = report.time_warning() {
                    tracing::warn!("{}: {}", title, message);
                }
                self.report = report;
                self.view = None;
                Update::Invalid(report)
            }
            Conversion::Valid(data) => {
                self.report = ValidationReport::passing();
                let view = self.build(data, viewport);
                tracing::info!(
                    "Rendered {} devices, {} legend entries",
                    view.devices.len(),
                    view.legend.len()
                );
                Update::Rendered(self.view.insert(view))
            }
        }
    }

    fn build(&self, data: ConvertedData, viewport: Viewport) -> TimelineView {
        let ConvertedData {
            mut devices,
            legend,
            window,
            observed,
            time_series,
            formatter,
        } = data;

        derive_intervals(&mut devices, &window, &self.settings.unknown, &legend);
        let layout = self.layout(
            &mut devices,
            &legend,
            &time_series,
            &formatter,
            &window,
            viewport,
        );

        TimelineView {
            devices,
            legend,
            window,
            observed,
            time_series,
            layout,
            formatter,
        }
    }

    fn layout(
        &self,
        devices: &mut [Device],
        legend: &Legend,
        time_series: &[DateTime<Utc>],
        formatter: &TimeFormatter,
        window: &TimeWindow,
        viewport: Viewport,
    ) -> Layout {
        let measurer = self.measurer.as_ref();
        let axis =
            compute_axis_dimensions(devices, time_series, formatter, &self.settings, measurer);
        let legend_dims = compute_legend_dimensions(legend, &self.settings.legend, measurer);
        let plot = compute_plot_dimensions(viewport, &self.settings, &axis, &legend_dims);
        let scales = compute_scales(devices, window, &plot);
        compute_geometry(devices, &scales);

        Layout {
            viewport,
            axis,
            legend: legend_dims,
            plot,
            scales,
        }
    }

    /// Legend colours in index order, for persisting overrides
    pub fn legend_color_instances(&self) -> Vec<ColorInstance> {
        self.view
            .iter()
            .flat_map(|view| view.legend.iter())
            .map(|entry| ColorInstance {
                selector: entry.index.to_string(),
                display_name: entry.label.clone(),
                color: entry.color.clone(),
            })
            .collect()
    }
}

impl Default for EventViewer {
    fn default() -> Self {
        Self::new(Settings::default(), DEFAULT_LOCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{MatrixNode, MatrixRow, Role};
    use chrono::TimeZone;

    fn t(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, h, 0, 0).unwrap()
    }

    fn matrix() -> DataMatrix {
        let mut matrix = DataMatrix::with_standard_columns();
        matrix.rows = vec![
            MatrixRow::new(
                "Press 1",
                vec![MatrixNode::new(t(8), "Running"), MatrixNode::new(t(10), "Idle")],
            ),
            MatrixRow::new("Press 2", vec![MatrixNode::new(t(9), "Running")]),
        ];
        matrix
    }

    #[test]
    fn test_full_render() {
        let mut viewer = EventViewer::default();
        let Update::Rendered(view) = viewer.update(&matrix(), Viewport::default()) else {
            panic!("expected a rendered view");
        };
        assert_eq!(view.devices.len(), 2);
        assert_eq!(view.legend.len(), 3);
        assert!(view
            .devices
            .iter()
            .flat_map(|d| d.intervals.iter())
            .all(|i| i.geometry().is_some()));
        assert!(viewer.report().is_valid());
    }

    #[test]
    fn test_unchanged_input_short_circuits() {
        let mut viewer = EventViewer::default();
        let m = matrix();
        viewer.update(&m, Viewport::default());
        assert!(matches!(viewer.update(&m, Viewport::default()), Update::Unchanged));
        assert!(viewer.view().is_some());
    }

    #[test]
    fn test_viewport_change_recomputes_geometry() {
        let mut viewer = EventViewer::default();
        let m = matrix();
        viewer.update(&m, Viewport::new(800.0, 400.0));
        let narrow_x2 = viewer.view().unwrap().devices[0].intervals[0]
            .geometry()
            .unwrap()
            .x2;

        let Update::Rendered(view) = viewer.update(&m, Viewport::new(1600.0, 400.0)) else {
            panic!("expected a re-layout");
        };
        let wide_x2 = view.devices[0].intervals[0].geometry().unwrap().x2;
        assert!(wide_x2 > narrow_x2);
        assert_eq!(view.layout.viewport.width, 1600.0);
    }

    #[test]
    fn test_invalid_input_clears_view() {
        let mut viewer = EventViewer::default();
        viewer.update(&matrix(), Viewport::default());

        let mut broken = matrix();
        broken.columns.retain(|c| !c.has_role(Role::Device));
        match viewer.update(&broken, Viewport::default()) {
            Update::Invalid(report) => assert!(!report.device_field),
            other => panic!("expected invalid, got {:?}", other),
        }
        assert!(viewer.view().is_none());
        assert!(viewer.legend_color_instances().is_empty());

        // a resize does not resurrect the view
        assert!(matches!(
            viewer.update(&broken, Viewport::new(300.0, 300.0)),
            Update::Invalid(_)
        ));
    }

    #[test]
    fn test_legend_color_instances() {
        let mut viewer = EventViewer::default();
        viewer.update(&matrix(), Viewport::default());
        let instances = viewer.legend_color_instances();
        let names: Vec<_> = instances.iter().map(|i| i.display_name.as_str()).collect();
        assert_eq!(names, vec!["Unknown", "Running", "Idle"]);
        assert_eq!(instances[0].selector, "0");
        assert_eq!(instances[0].color, "#EEEEEE");
    }

    #[test]
    fn test_settings_change_forces_rebuild() {
        let mut viewer = EventViewer::default();
        let m = matrix();
        viewer.update(&m, Viewport::default());

        let mut settings = Settings::default();
        settings.unknown.show = false;
        viewer.set_settings(settings);
        let Update::Rendered(view) = viewer.update(&m, Viewport::default()) else {
            panic!("expected a rebuild");
        };
        assert!(view.legend.unknown().is_none());
    }

    #[test]
    fn test_tooltip_lookup() {
        let mut viewer = EventViewer::default();
        viewer.update(&matrix(), Viewport::default());
        let view = viewer.view().unwrap();
        let rows = view.tooltip(0, 0).unwrap();
        assert_eq!(rows[0].header, "Press 1");
        assert_eq!(rows[0].value, "Running");
        assert!(view.tooltip(5, 0).is_none());
    }
}
