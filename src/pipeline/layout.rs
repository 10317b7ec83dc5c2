//! Layout: viewport → legend band → plot rectangle.
//!
//! The plot rectangle is what remains of the viewport after the outer
//! padding, the device-axis gutter on the left, the legend band on top or
//! bottom, and the time-axis gutter at the bottom.

use crate::config::{LegendSettings, Settings};
use crate::measure::TextMeasurer;
use crate::pipeline::axis::AxisDimensions;
use crate::pipeline::legend::Legend;
use serde::{Deserialize, Serialize};

/// Space added around the tallest legend label
pub const LEGEND_MARGIN: f64 = 10.0;

/// Drawing surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 400.0)
    }
}

/// Height of the legend band at the top or bottom of the viewport
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LegendDimensions {
    pub top_height: f64,
    pub bottom_height: f64,
}

/// Plot area in pixels
///
/// `x1..x2` is the horizontal span of the time scale, `y1..y2` the vertical
/// span of the device scale.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PlotDimensions {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

impl PlotDimensions {
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Whether the rectangle has no positive area
    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
}

/// Size the legend band
///
/// Zero when the legend is hidden or has no entries.
pub fn compute_legend_dimensions(
    legend: &Legend,
    settings: &LegendSettings,
    measurer: &dyn TextMeasurer,
) -> LegendDimensions {
    let _span = tracing::debug_span!("compute_legend_dimensions").entered();

    if !settings.show || legend.is_empty() {
        return LegendDimensions::default();
    }

    let font = settings.font.text_properties();
    let height = legend
        .iter()
        .map(|entry| measurer.measure_height(&font, &entry.label))
        .fold(0.0, f64::max)
        + LEGEND_MARGIN;

    if settings.position.is_top() {
        LegendDimensions {
            top_height: height,
            bottom_height: 0.0,
        }
    } else {
        LegendDimensions {
            top_height: 0.0,
            bottom_height: height,
        }
    }
}

/// Compute the plot rectangle
pub fn compute_plot_dimensions(
    viewport: Viewport,
    settings: &Settings,
    axis: &AxisDimensions,
    legend: &LegendDimensions,
) -> PlotDimensions {
    let _span = tracing::debug_span!("compute_plot_dimensions").entered();

    let padding = settings.general.padding;
    let inner_width = viewport.width - 2.0 * padding;
    let inner_height = viewport.height - 2.0 * padding;

    let plot = PlotDimensions {
        x1: padding + axis.device_axis_width,
        x2: inner_width - padding,
        y1: padding + legend.top_height,
        y2: padding + inner_height - legend.bottom_height - axis.time_axis_height,
    };

    if plot.is_empty() {
        tracing::warn!(
            "Viewport {}x{} leaves no room to plot ({:?})",
            viewport.width,
            viewport.height,
            plot
        );
    }
    plot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LegendPosition, StateColorSettings};
    use crate::measure::MockTextMeasurer;
    use crate::palette::DefaultPalette;

    fn legend_with(labels: &[&str]) -> Legend {
        let colors = StateColorSettings::default();
        let mut palette = DefaultPalette::new();
        let mut legend = Legend::new();
        for label in labels {
            legend.resolve(label, &colors, &mut palette);
        }
        legend
    }

    fn measurer(height: f64) -> MockTextMeasurer {
        let mut measurer = MockTextMeasurer::new();
        measurer.expect_measure_height().return_const(height);
        measurer
    }

    #[test]
    fn test_legend_on_top() {
        let dims = compute_legend_dimensions(
            &legend_with(&["Running", "Idle"]),
            &LegendSettings::default(),
            &measurer(14.0),
        );
        assert_eq!(dims.top_height, 14.0 + LEGEND_MARGIN);
        assert_eq!(dims.bottom_height, 0.0);
    }

    #[test]
    fn test_legend_at_bottom() {
        let settings = LegendSettings {
            position: LegendPosition::BottomCenter,
            ..Default::default()
        };
        let dims = compute_legend_dimensions(&legend_with(&["Running"]), &settings, &measurer(14.0));
        assert_eq!(dims.top_height, 0.0);
        assert_eq!(dims.bottom_height, 14.0 + LEGEND_MARGIN);
    }

    #[test]
    fn test_hidden_or_empty_legend() {
        let hidden = LegendSettings {
            show: false,
            ..Default::default()
        };
        let mut never = MockTextMeasurer::new();
        never.expect_measure_height().never();

        let dims = compute_legend_dimensions(&legend_with(&["Running"]), &hidden, &never);
        assert_eq!(dims, LegendDimensions::default());
        let dims = compute_legend_dimensions(&Legend::new(), &LegendSettings::default(), &never);
        assert_eq!(dims, LegendDimensions::default());
    }

    #[test]
    fn test_plot_dimensions() {
        let axis = AxisDimensions {
            device_axis_width: 60.0,
            time_axis_height: 35.0,
        };
        let legend = LegendDimensions {
            top_height: 25.0,
            bottom_height: 0.0,
        };
        let plot = compute_plot_dimensions(
            Viewport::new(800.0, 400.0),
            &Settings::default(),
            &axis,
            &legend,
        );
        assert_eq!(
            plot,
            PlotDimensions {
                x1: 65.0,
                x2: 785.0,
                y1: 30.0,
                y2: 360.0,
            }
        );
        assert!(!plot.is_empty());
    }

    #[test]
    fn test_tiny_viewport_is_empty() {
        let plot = compute_plot_dimensions(
            Viewport::new(30.0, 30.0),
            &Settings::default(),
            &AxisDimensions {
                device_axis_width: 40.0,
                time_axis_height: 40.0,
            },
            &LegendDimensions::default(),
        );
        assert!(plot.is_empty());
    }
}
