//! Visual settings consumed by the pipeline
//!
//! These mirror the property groups a host exposes to the user. Every field
//! has a default, so a partial settings file only needs to name what it
//! changes.
//!
//! # Main Types
//!
//! - [`Settings`] - Root settings object passed explicitly into every stage
//! - [`TimeAxisSettings`] - Lead/lag padding of the time window plus axis font
//! - [`UnknownSettings`] - Synthetic "unknown" leading state
//! - [`StateColorSettings`] - Per-legend-index colour overrides
//! - [`FontSettings`] - Font description, convertible to [`TextProperties`]

use crate::measure::TextProperties;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default font stack used for axis and legend labels
pub const DEFAULT_FONT_FAMILY: &str =
    "'Segoe UI', wf_segoe-ui_normal, helvetica, arial, sans-serif";

/// Default padding around the plot in pixels
pub const DEFAULT_PADDING: f64 = 5.0;

/// Root settings object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub legend: LegendSettings,
    pub device_axis: DeviceAxisSettings,
    pub time_axis: TimeAxisSettings,
    pub state_color: StateColorSettings,
    pub unknown: UnknownSettings,
}

/// Layout settings shared by every stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Padding around the plot in pixels
    pub padding: f64,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
        }
    }
}

/// Where the legend band sits relative to the plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LegendPosition {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl LegendPosition {
    /// Whether the legend occupies space above the plot
    pub fn is_top(&self) -> bool {
        matches!(
            self,
            LegendPosition::TopLeft | LegendPosition::TopCenter | LegendPosition::TopRight
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegendSettings {
    pub show: bool,
    pub position: LegendPosition,
    pub font: FontSettings,
}

impl Default for LegendSettings {
    fn default() -> Self {
        Self {
            show: true,
            position: LegendPosition::TopLeft,
            font: FontSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DeviceAxisSettings {
    pub font: FontSettings,
}

/// Unit a lead/lag offset is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimePrecision {
    #[default]
    Second,
    Minute,
    Hour,
}

impl TimePrecision {
    /// Multiplier turning an offset in this unit into seconds
    pub fn seconds(&self) -> f64 {
        match self {
            TimePrecision::Second => 1.0,
            TimePrecision::Minute => 60.0,
            TimePrecision::Hour => 3600.0,
        }
    }
}

/// Time axis settings, including the padding of the visible window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TimeAxisSettings {
    /// Offset applied to the earliest observation; `None` means no padding
    pub lead_time: Option<f64>,
    pub lead_time_precision: TimePrecision,
    /// Offset applied to the latest observation; `None` means no padding
    pub lag_time: Option<f64>,
    pub lag_time_precision: TimePrecision,
    pub font: FontSettings,
}

impl TimeAxisSettings {
    /// Lead offset in seconds, already scaled by its precision
    pub fn lead_seconds(&self) -> f64 {
        self.lead_time.unwrap_or(0.0) * self.lead_time_precision.seconds()
    }

    /// Lag offset in seconds, already scaled by its precision
    pub fn lag_seconds(&self) -> f64 {
        self.lag_time.unwrap_or(0.0) * self.lag_time_precision.seconds()
    }
}

/// State colour settings
///
/// `overrides` is keyed by legend index, so the order in which states are
/// first encountered decides which override a state picks up. Keys are the
/// index in decimal so the map survives TOML, which only has string keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StateColorSettings {
    pub overrides: BTreeMap<String, String>,
}

impl StateColorSettings {
    pub fn override_for(&self, index: usize) -> Option<&str> {
        self.overrides.get(&index.to_string()).map(String::as_str)
    }

    pub fn set_override(&mut self, index: usize, color: impl Into<String>) {
        self.overrides.insert(index.to_string(), color.into());
    }
}

/// Synthetic "unknown" state shown before a device's first observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnknownSettings {
    pub show: bool,
    pub label: String,
    pub color: String,
}

impl Default for UnknownSettings {
    fn default() -> Self {
        Self {
            show: true,
            label: "Unknown".to_string(),
            color: "#EEEEEE".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl std::fmt::Display for FontStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontStyle::Normal => write!(f, "Normal"),
            FontStyle::Italic => write!(f, "Italic"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    SemiBold,
    Bold,
}

impl FontWeight {
    /// CSS numeric weight
    pub fn value(&self) -> u16 {
        match self {
            FontWeight::Normal => 400,
            FontWeight::SemiBold => 600,
            FontWeight::Bold => 800,
        }
    }
}

/// Font description for a group of labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSettings {
    pub color: String,
    /// Size in points
    pub size: f64,
    pub family: String,
    pub style: FontStyle,
    pub weight: FontWeight,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            color: "#666666".to_string(),
            size: 11.0,
            family: DEFAULT_FONT_FAMILY.to_string(),
            style: FontStyle::Normal,
            weight: FontWeight::Normal,
        }
    }
}

impl FontSettings {
    /// CSS font size string, e.g. `11pt`
    pub fn size_css(&self) -> String {
        format!("{}pt", self.size)
    }

    pub fn text_properties(&self) -> TextProperties {
        TextProperties {
            font_family: self.family.clone(),
            font_size_pt: self.size,
            font_style: self.style,
            font_weight: self.weight,
        }
    }
}
