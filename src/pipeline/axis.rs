//! Axis sizing: how much room the device and time labels need.
//!
//! Sizing depends only on device names and raw timestamps, so it runs before
//! any scale exists. The resulting gutters shrink the plot rectangle that the
//! scales are later built on.

use crate::config::Settings;
use crate::format::TimeFormatter;
use crate::measure::TextMeasurer;
use crate::types::Device;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Space added around the widest/tallest axis label
pub const AXIS_LABEL_MARGIN: f64 = 20.0;

/// Gutters reserved for axis labels, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AxisDimensions {
    /// Left gutter for device names
    pub device_axis_width: f64,
    /// Bottom gutter for time tick labels
    pub time_axis_height: f64,
}

/// Measure the axis gutters
///
/// With no devices (or no timestamps) the corresponding gutter is just the
/// margin.
pub fn compute_axis_dimensions(
    devices: &[Device],
    time_series: &[DateTime<Utc>],
    formatter: &TimeFormatter,
    settings: &Settings,
    measurer: &dyn TextMeasurer,
) -> AxisDimensions {
    let _span = tracing::debug_span!("compute_axis_dimensions").entered();

    let device_font = settings.device_axis.font.text_properties();
    let widest = devices
        .iter()
        .map(|device| measurer.measure_width(&device_font, &device.name))
        .fold(0.0, f64::max);

    let time_font = settings.time_axis.font.text_properties();
    let tallest = time_series
        .iter()
        .map(|&time| measurer.measure_height(&time_font, &formatter.format(time)))
        .fold(0.0, f64::max);

    let dimensions = AxisDimensions {
        device_axis_width: widest + AXIS_LABEL_MARGIN,
        time_axis_height: tallest + AXIS_LABEL_MARGIN,
    };
    tracing::debug!(
        "Axis gutters: device {:.1}px, time {:.1}px",
        dimensions.device_axis_width,
        dimensions.time_axis_height
    );
    dimensions
}
